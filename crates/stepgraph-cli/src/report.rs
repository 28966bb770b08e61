//! Human and JSON renderings of a checked schema.

use colored::Colorize;
use serde::Serialize;

use stepgraph_schema::{Role, Schema, ValidatedEntity};
use stepgraph_steps::{EdgeDescriptor, StepDescriptor};

#[derive(Debug, Serialize)]
pub struct SchemaReport<'a> {
    pub name: Option<&'a str>,
    pub edges: Vec<EdgeReport<'a>>,
    pub entities: &'a [ValidatedEntity],
}

#[derive(Debug, Serialize)]
pub struct EdgeReport<'a> {
    #[serde(flatten)]
    pub edge: &'a EdgeDescriptor,
    pub forward: StepDescriptor,
    pub inverse: Option<StepDescriptor>,
    pub relationship: Option<&'a str>,
}

impl<'a> SchemaReport<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let edges = schema
            .edges()
            .iter()
            .map(|edge| EdgeReport {
                edge,
                forward: edge.forward_step(),
                inverse: edge.inverse_step(),
                relationship: schema
                    .relationship_for(edge.name.as_str())
                    .map(ValidatedEntity::name),
            })
            .collect();
        Self {
            name: schema.name(),
            edges,
            entities: schema.entities(),
        }
    }

    pub fn print(&self) {
        if let Some(name) = self.name {
            println!("  Schema: {}", name.cyan());
        }
        let vertices: Vec<&ValidatedEntity> = self
            .entities
            .iter()
            .filter(|entity| entity.descriptor.is_vertex())
            .collect();
        println!("  Vertices: {}", vertices.len());
        for vertex in vertices {
            match vertex.holder(Role::Id) {
                Some(id) => println!("    {} (id: {})", vertex.name().yellow(), id),
                None => println!("    {}", vertex.name().yellow()),
            }
        }

        println!("  Edges: {}", self.edges.len());
        for edge in &self.edges {
            println!("    {}", edge.edge.to_string().yellow());
            println!("      forward  {}", edge.forward);
            match &edge.inverse {
                Some(inverse) => println!("      inverse  {inverse}"),
                None => println!("      inverse  {}", "(none)".dimmed()),
            }
            if let Some(entity) = edge
                .relationship
                .and_then(|name| self.entities.iter().find(|e| e.name() == name))
            {
                println!(
                    "      relationship {} ({} -> {}, {} properties)",
                    entity.name().cyan(),
                    describe(entity, Role::FromVertex),
                    describe(entity, Role::ToVertex),
                    entity.properties.len()
                );
            }
        }
    }
}

fn describe(entity: &ValidatedEntity, role: Role) -> String {
    entity
        .holder(role)
        .map(|member| member.display_name().to_string())
        .unwrap_or_else(|| "?".to_string())
}
