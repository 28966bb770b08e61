//! Schema registry: collects vertex types, edges and relationship entities,
//! validating each registration before it takes effect.
//!
//! Registration is all-or-nothing: a call that returns an error leaves the
//! registry exactly as it was.

use std::collections::HashMap;

use tracing::{debug, warn};

use stepgraph_steps::{
    Cardinality, EdgeDescriptor, EdgeName, EdgeSpec, Step, StepDescriptor, Vertex,
};

use crate::config::RegistryConfig;
use crate::decl::SchemaDecl;
use crate::entity::EntityDescriptor;
use crate::error::{SchemaError, SchemaResult};
use crate::validate::{validate_entity, ValidatedEntity};

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    config: RegistryConfig,
    name: Option<String>,
    edges: Vec<EdgeDescriptor>,
    edge_index: HashMap<EdgeName, usize>,
    entities: Vec<ValidatedEntity>,
    entity_index: HashMap<String, usize>,
    relationships: HashMap<EdgeName, usize>,
}

impl SchemaRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register everything a parsed declaration file declares: vertex types
    /// first, then edges, then relationship entities.
    pub fn from_decl(decl: &SchemaDecl, config: RegistryConfig) -> SchemaResult<Self> {
        let mut registry = Self::new(config);
        registry.name = decl.name.clone();
        for vertex in &decl.vertices {
            registry.register_entity(vertex.clone())?;
        }
        for edge in &decl.edges {
            registry.register_edge(edge.clone())?;
        }
        for relationship in &decl.relationships {
            registry.register_entity(relationship.clone())?;
        }
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Register an edge and return its forward step descriptor.
    pub fn register_edge(&mut self, edge: EdgeDescriptor) -> SchemaResult<StepDescriptor> {
        self.check_edge(&edge).map_err(|err| {
            warn!(edge = %edge.name, error = %err, "rejected edge");
            err
        })?;
        Ok(self.insert_edge(edge))
    }

    /// Validate and register a vertex or relationship entity.
    pub fn register_entity(&mut self, entity: EntityDescriptor) -> SchemaResult<()> {
        let validated = self.check_entity(&entity).map_err(|err| {
            warn!(entity = %entity.name, error = %err, "rejected entity");
            err
        })?;
        self.insert_entity(validated);
        Ok(())
    }

    /// Register a relationship entity for a typed edge spec, registering the
    /// edge itself if it is not known yet. Returns the spec's forward step,
    /// whose cardinality is the variant's forward cardinality.
    pub fn register_relationship<E: EdgeSpec>(
        &mut self,
        spec: &E,
        entity: EntityDescriptor,
    ) -> SchemaResult<Step<E::From, E::To, E::Forward>> {
        let (edge, validated) = self.check_relationship(spec, &entity).map_err(|err| {
            warn!(entity = %entity.name, edge = %spec.name(), error = %err, "rejected relationship");
            err
        })?;
        if let Some(edge) = edge {
            self.insert_edge(edge);
        }
        self.insert_entity(validated);
        Ok(spec.forward())
    }

    pub fn finish(self) -> Schema {
        debug!(
            edges = self.edges.len(),
            entities = self.entities.len(),
            "schema registry finished"
        );
        Schema {
            name: self.name,
            edges: self.edges,
            edge_index: self.edge_index,
            entities: self.entities,
            entity_index: self.entity_index,
            relationships: self.relationships,
        }
    }

    fn check_edge(&self, edge: &EdgeDescriptor) -> SchemaResult<()> {
        edge.validate()?;
        if self.edge_index.contains_key(&edge.name) {
            return Err(SchemaError::DuplicateEdgeName(edge.name.to_string()));
        }
        self.config.check_label(edge.name.as_str())?;
        for vertex in [&edge.from, &edge.to] {
            let known = self
                .entity_index
                .get(vertex)
                .is_some_and(|&idx| self.entities[idx].descriptor.is_vertex());
            if !known {
                return Err(SchemaError::UnknownVertex {
                    edge: edge.name.to_string(),
                    vertex: vertex.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_entity(&self, entity: &EntityDescriptor) -> SchemaResult<ValidatedEntity> {
        if self.entity_index.contains_key(&entity.name) {
            return Err(SchemaError::DuplicateEntity(entity.name.clone()));
        }
        let validated = validate_entity(entity, &self.config)?;
        if let Some(edge) = entity.edge() {
            if !self.edge_index.contains_key(edge) {
                return Err(SchemaError::UnknownEdge {
                    entity: entity.name.clone(),
                    edge: edge.to_string(),
                });
            }
            if let Some(&idx) = self.relationships.get(edge) {
                return Err(SchemaError::DuplicateRelationship {
                    edge: edge.to_string(),
                    first: self.entities[idx].name().to_string(),
                    second: entity.name.clone(),
                });
            }
        }
        Ok(validated)
    }

    /// Returns the edge to insert (if new) and the validated entity.
    fn check_relationship<E: EdgeSpec>(
        &self,
        spec: &E,
        entity: &EntityDescriptor,
    ) -> SchemaResult<(Option<EdgeDescriptor>, ValidatedEntity)> {
        if entity.edge() != Some(spec.name()) {
            return Err(SchemaError::NotARelationship {
                entity: entity.name.clone(),
                edge: spec.name().to_string(),
            });
        }

        let declared = spec.descriptor();
        let new_edge = match self.edge_index.get(spec.name()) {
            Some(&idx) if self.edges[idx] == declared => None,
            Some(&idx) => {
                return Err(SchemaError::EdgeMismatch {
                    name: spec.name().to_string(),
                    registered: self.edges[idx].clone(),
                    declared,
                })
            }
            None => {
                self.check_edge(&declared)?;
                Some(declared)
            }
        };

        // `check_entity` would reject the pending edge as unknown.
        if self.entity_index.contains_key(&entity.name) {
            return Err(SchemaError::DuplicateEntity(entity.name.clone()));
        }
        if let Some(&idx) = self.relationships.get(spec.name()) {
            return Err(SchemaError::DuplicateRelationship {
                edge: spec.name().to_string(),
                first: self.entities[idx].name().to_string(),
                second: entity.name.clone(),
            });
        }
        let validated = validate_entity(entity, &self.config)?;
        debug!(
            entity = %entity.name,
            cardinality = %<E::Forward as Cardinality>::KIND,
            "typed relationship validated"
        );
        Ok((new_edge, validated))
    }

    fn insert_edge(&mut self, edge: EdgeDescriptor) -> StepDescriptor {
        debug!(edge = %edge, "registered edge");
        let forward = edge.forward_step();
        self.edge_index.insert(edge.name.clone(), self.edges.len());
        self.edges.push(edge);
        forward
    }

    fn insert_entity(&mut self, validated: ValidatedEntity) {
        let idx = self.entities.len();
        if let Some(edge) = validated.descriptor.edge() {
            self.relationships.insert(edge.clone(), idx);
        }
        debug!(
            entity = %validated.name(),
            members = validated.descriptor.members.len(),
            "registered entity"
        );
        self.entity_index.insert(validated.name().to_string(), idx);
        self.entities.push(validated);
    }
}

/// A finished, read-only schema.
#[derive(Debug, Clone)]
pub struct Schema {
    name: Option<String>,
    edges: Vec<EdgeDescriptor>,
    edge_index: HashMap<EdgeName, usize>,
    entities: Vec<ValidatedEntity>,
    entity_index: HashMap<String, usize>,
    relationships: HashMap<EdgeName, usize>,
}

impl Schema {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Edges in registration order.
    pub fn edges(&self) -> &[EdgeDescriptor] {
        &self.edges
    }

    /// Entities in registration order.
    pub fn entities(&self) -> &[ValidatedEntity] {
        &self.entities
    }

    pub fn edge(&self, name: &str) -> Option<&EdgeDescriptor> {
        self.edge_index.get(name).map(|&idx| &self.edges[idx])
    }

    pub fn entity(&self, name: &str) -> Option<&ValidatedEntity> {
        self.entity_index.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn relationship_for(&self, edge: &str) -> Option<&ValidatedEntity> {
        self.relationships.get(edge).map(|&idx| &self.entities[idx])
    }

    /// Typed forward step of a registered edge. `FROM` and `TO` must be the
    /// edge's declared endpoints; `C` must be at least as coarse as the edge's
    /// forward cardinality.
    pub fn forward_step<FROM: Vertex, TO: Vertex, C: Cardinality>(
        &self,
        edge: &str,
    ) -> SchemaResult<Step<FROM, TO, C>> {
        let descriptor = self
            .edge(edge)
            .ok_or_else(|| SchemaError::NoSuchEdge(edge.to_string()))?;
        if FROM::LABEL != descriptor.from || TO::LABEL != descriptor.to {
            return Err(SchemaError::EndpointMismatch {
                edge: edge.to_string(),
                declared: format!("{} -> {}", descriptor.from, descriptor.to),
                requested: format!("{} -> {}", FROM::LABEL, TO::LABEL),
            });
        }
        Ok(descriptor.forward_step().typed()?)
    }
}
