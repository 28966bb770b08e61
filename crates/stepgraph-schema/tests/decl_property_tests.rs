use proptest::prelude::*;
use stepgraph_schema::{
    format_schema_decl, parse_schema_decl, EntityDescriptor, MemberDecl, MemberKind, Role,
    SchemaDecl,
};
use stepgraph_steps::{EdgeDescriptor, EdgeName, EdgeVariant};

fn ident() -> BoxedStrategy<String> {
    "[A-Za-z][A-Za-z0-9_]{0,10}".boxed()
}

/// Anything `EdgeName::new` accepts: non-empty, no whitespace.
fn any_label() -> BoxedStrategy<String> {
    prop_oneof![ident(), "[^\\s]{1,8}"].boxed()
}

fn any_member_name() -> BoxedStrategy<String> {
    prop_oneof![ident(), Just("_".to_string()), "[^\\s]{1,6}"].boxed()
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn member(name: BoxedStrategy<String>) -> impl Strategy<Value = MemberDecl> {
    (
        prop::option::of(name),
        prop::sample::select(vec![MemberKind::ConstructorParameter, MemberKind::MemberProperty]),
        prop::sample::select(Role::ALL.to_vec()),
    )
        .prop_map(|(name, kind, role)| MemberDecl { name, kind, role })
}

fn members(name: BoxedStrategy<String>) -> impl Strategy<Value = Vec<MemberDecl>> {
    prop::collection::vec(member(name), 0..4)
}

fn edge(label: BoxedStrategy<String>) -> impl Strategy<Value = EdgeDescriptor> {
    (
        label,
        prop::sample::select(EdgeVariant::ALL.to_vec()),
        ident(),
        ident(),
    )
        .prop_map(|(name, variant, from, to)| {
            let to = if variant.is_symmetric() { from.clone() } else { to };
            EdgeDescriptor::new(EdgeName::new(name).expect("label"), variant, from, to)
                .expect("symmetric endpoints agree")
        })
}

fn decl_with(
    label: BoxedStrategy<String>,
    member_name: BoxedStrategy<String>,
) -> impl Strategy<Value = SchemaDecl> {
    (
        prop::option::of(ident()),
        prop::collection::vec((ident(), members(member_name.clone())), 0..3),
        prop::collection::vec(edge(label.clone()), 0..4),
        prop::collection::vec((ident(), label, members(member_name)), 0..3),
    )
        .prop_map(|(name, vertices, edges, relationships)| SchemaDecl {
            name,
            vertices: vertices
                .into_iter()
                .map(|(name, members)| EntityDescriptor {
                    members,
                    ..EntityDescriptor::vertex(name)
                })
                .collect(),
            edges,
            relationships: relationships
                .into_iter()
                .map(|(name, edge, members)| EntityDescriptor {
                    members,
                    ..EntityDescriptor::relationship(name, EdgeName::new(edge).expect("label"))
                })
                .collect(),
        })
}

fn decl() -> impl Strategy<Value = SchemaDecl> {
    decl_with(ident(), ident())
}

fn names_are_writable(decl: &SchemaDecl) -> bool {
    let edges = decl.edges.iter().all(|edge| is_ident(edge.name.as_str()));
    let relationship_edges = decl
        .relationships
        .iter()
        .filter_map(EntityDescriptor::edge)
        .all(|edge| is_ident(edge.as_str()));
    let members = decl
        .vertices
        .iter()
        .chain(&decl.relationships)
        .flat_map(|entity| &entity.members)
        .filter_map(|member| member.name.as_deref())
        .all(|name| name != "_" && is_ident(name));
    edges && relationship_edges && members
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn format_then_parse_is_identity(decl in decl()) {
        let text = format_schema_decl(&decl);
        prop_assert!(text.is_ok(), "{:?}", text);
        let text = text.expect("checked above");
        let reparsed = parse_schema_decl(&text);
        prop_assert!(reparsed.is_ok(), "{:?}\n{}", reparsed, text);
        prop_assert_eq!(reparsed.expect("checked above"), decl);
    }

    #[test]
    fn formatting_is_idempotent(decl in decl()) {
        let once = format_schema_decl(&decl).expect("identifier names");
        let twice = format_schema_decl(&parse_schema_decl(&once).expect("reparse"))
            .expect("identifier names");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn any_label_either_reads_back_or_is_refused(
        decl in decl_with(any_label(), any_member_name()),
    ) {
        let formatted = format_schema_decl(&decl);
        prop_assert_eq!(formatted.is_ok(), names_are_writable(&decl), "{:?}", formatted);
        if let Ok(text) = formatted {
            let reparsed = parse_schema_decl(&text);
            prop_assert!(reparsed.is_ok(), "{:?}\n{}", reparsed, text);
            prop_assert_eq!(reparsed.expect("checked above"), decl);
        }
    }
}
