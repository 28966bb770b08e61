//! Role validation for entity metadata.
//!
//! Runs once per entity at registration. Members are scanned in declaration
//! order; the first conflict is reported, naming both members involved.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::RegistryConfig;
use crate::entity::{EntityDescriptor, EntityKind, MemberRef, Role};
use crate::error::{SchemaError, SchemaResult};

/// An entity whose members passed role validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedEntity {
    pub descriptor: EntityDescriptor,
    pub id: Option<MemberRef>,
    pub from: Option<MemberRef>,
    pub to: Option<MemberRef>,
    pub properties: Vec<MemberRef>,
}

impl ValidatedEntity {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The member holding an exclusive role.
    pub fn holder(&self, role: Role) -> Option<&MemberRef> {
        match role {
            Role::Id => self.id.as_ref(),
            Role::FromVertex => self.from.as_ref(),
            Role::ToVertex => self.to.as_ref(),
            Role::Property => None,
        }
    }
}

pub fn validate_entity(
    entity: &EntityDescriptor,
    config: &RegistryConfig,
) -> SchemaResult<ValidatedEntity> {
    let mut exclusive: BTreeMap<Role, MemberRef> = BTreeMap::new();
    let mut properties = Vec::new();

    for member in &entity.members {
        let member_ref = member.member_ref();
        if member.role.is_endpoint() && entity.is_vertex() {
            return Err(SchemaError::RoleNotAllowed {
                entity: entity.name.clone(),
                role: member.role,
                member: member_ref,
            });
        }
        if !member.role.is_exclusive() {
            properties.push(member_ref);
            continue;
        }
        if let Some(first) = exclusive.get(&member.role) {
            return Err(SchemaError::duplicate_role(
                &entity.name,
                member.role,
                first.clone(),
                member_ref,
            ));
        }
        exclusive.insert(member.role, member_ref);
    }

    if config.require_endpoints && matches!(entity.kind, EntityKind::Relationship { .. }) {
        for role in [Role::FromVertex, Role::ToVertex] {
            if !exclusive.contains_key(&role) {
                return Err(SchemaError::MissingRole {
                    entity: entity.name.clone(),
                    role,
                });
            }
        }
    }

    Ok(ValidatedEntity {
        descriptor: entity.clone(),
        id: exclusive.remove(&Role::Id),
        from: exclusive.remove(&Role::FromVertex),
        to: exclusive.remove(&Role::ToVertex),
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{MemberDecl, MemberKind};
    use stepgraph_steps::EdgeName;

    fn friendship() -> EntityDescriptor {
        EntityDescriptor::relationship("Friendship", EdgeName::new("FRIENDS_WITH").expect("name"))
    }

    #[test]
    fn two_from_vertex_params_name_both_members() {
        let entity = friendship()
            .with_member(MemberDecl::param("a", Role::FromVertex))
            .with_member(MemberDecl::param("b", Role::FromVertex));

        let err = validate_entity(&entity, &RegistryConfig::default()).expect_err("duplicate");
        let message = err.to_string();
        assert!(message.contains("Friendship"), "{message}");
        assert!(message.contains("`a`"), "{message}");
        assert!(message.contains("`b`"), "{message}");
        assert!(message.contains("constructor parameter"), "{message}");
        assert!(message.contains("@FromVertex"), "{message}");
        assert!(matches!(err, SchemaError::DuplicateRole { role: Role::FromVertex, .. }));
    }

    #[test]
    fn unnamed_members_are_reported_as_unnamed() {
        let entity = friendship()
            .with_member(MemberDecl::unnamed(MemberKind::MemberProperty, Role::ToVertex))
            .with_member(MemberDecl::property("target", Role::ToVertex));

        let err = validate_entity(&entity, &RegistryConfig::default()).expect_err("duplicate");
        assert_eq!(
            err.to_string(),
            "only one member property may be annotated with @ToVertex in `Friendship`; \
             found `unnamed` and `target`"
        );
    }

    #[test]
    fn mixed_member_kinds_are_spelled_out() {
        let entity = friendship()
            .with_member(MemberDecl::param("a", Role::FromVertex))
            .with_member(MemberDecl::property("b", Role::FromVertex));

        let err = validate_entity(&entity, &RegistryConfig::default()).expect_err("duplicate");
        assert_eq!(
            err.to_string(),
            "only one member may be annotated with @FromVertex in `Friendship`; \
             found constructor parameter `a` and member property `b`"
        );
    }

    #[test]
    fn exactly_one_of_each_endpoint_passes() {
        let entity = friendship()
            .with_member(MemberDecl::param("a", Role::FromVertex))
            .with_member(MemberDecl::param("b", Role::ToVertex))
            .with_member(MemberDecl::property("id", Role::Id))
            .with_member(MemberDecl::property("since", Role::Property))
            .with_member(MemberDecl::property("note", Role::Property));

        let validated = validate_entity(&entity, &RegistryConfig::default()).expect("valid");
        assert_eq!(validated.holder(Role::FromVertex).and_then(|m| m.name.as_deref()), Some("a"));
        assert_eq!(validated.holder(Role::ToVertex).and_then(|m| m.name.as_deref()), Some("b"));
        assert_eq!(validated.holder(Role::Id).map(|m| m.kind), Some(MemberKind::MemberProperty));
        assert_eq!(validated.properties.len(), 2);
    }

    #[test]
    fn missing_endpoints_depend_on_config() {
        let entity = friendship().with_member(MemberDecl::param("a", Role::FromVertex));

        let err = validate_entity(&entity, &RegistryConfig::default()).expect_err("missing to");
        assert!(matches!(err, SchemaError::MissingRole { role: Role::ToVertex, .. }));

        let lenient = RegistryConfig {
            require_endpoints: false,
            ..RegistryConfig::default()
        };
        assert!(validate_entity(&entity, &lenient).is_ok());
    }

    #[test]
    fn vertices_cannot_hold_endpoint_roles() {
        let entity = EntityDescriptor::vertex("Person")
            .with_member(MemberDecl::property("id", Role::Id))
            .with_member(MemberDecl::property("friend", Role::FromVertex));

        let err = validate_entity(&entity, &RegistryConfig::default()).expect_err("vertex");
        assert_eq!(
            err.to_string(),
            "member property `friend` of vertex `Person` may not be annotated with @FromVertex"
        );
    }
}
