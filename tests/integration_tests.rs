//! End-to-end tests across the workspace crates:
//! declaration file -> schema registry -> typed steps -> bound execution on
//! the in-memory graph.
//!
//! Run with: cargo test --test integration_tests

use std::io::Write;

use stepgraph_memgraph::{KeyMapper, KeyedEntity, MemGraph};
use stepgraph_schema::{
    parse_schema_decl, EntityDescriptor, MemberDecl, RegistryConfig, Role, Schema, SchemaDecl,
    SchemaError, SchemaRegistry,
};
use stepgraph_steps::{
    EdgeName, EdgeSpec, ExecuteError, InvertibleEdgeSpec, ManyToManyEdgeSpec,
    ManyToManySymmetricEdgeSpec, ManyToOneEdgeSpec, ShapeError, Step, ToMany, ToOptional,
    ToSingle, Vertex,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Person(String);

impl Vertex for Person {
    const LABEL: &'static str = "Person";
}

impl KeyedEntity for Person {
    fn key(&self) -> String {
        self.0.clone()
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(Person(key.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Company(String);

impl Vertex for Company {
    const LABEL: &'static str = "Company";
}

impl KeyedEntity for Company {
    fn key(&self) -> String {
        self.0.clone()
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(Company(key.to_string()))
    }
}

fn person(name: &str) -> Person {
    Person(name.to_string())
}

fn company(name: &str) -> Company {
    Company(name.to_string())
}

const SOCIAL: &str = "\
schema Social

vertex Person
  id property name
vertex Company

edge FRIENDS_WITH: many_to_many_symmetric(Person)
edge WORKS_AT: many_to_one(Person, Company)
edge MANAGED_BY: many_to_optional(Person, Person)
edge INVESTS_IN: many_to_many(Person, Company)

relationship Friendship on FRIENDS_WITH
  from param a
  to param b
  field property since
";

fn social_schema() -> Schema {
    let decl = parse_schema_decl(SOCIAL).expect("parse");
    SchemaRegistry::from_decl(&decl, RegistryConfig::default())
        .expect("register")
        .finish()
}

/// alice - bob - carol friendships, everyone but dave employed.
fn social_graph() -> MemGraph {
    let mut graph = MemGraph::new();
    let [alice, bob, carol, _dave] = ["alice", "bob", "carol", "dave"]
        .map(|name| graph.add_vertex("Person", name).expect("vertex"));
    let acme = graph.add_vertex("Company", "acme").expect("vertex");
    let globex = graph.add_vertex("Company", "globex").expect("vertex");

    for (a, b) in [(alice, bob), (carol, bob)] {
        graph.add_edge("FRIENDS_WITH", a, b).expect("edge");
    }
    for (p, c) in [(alice, acme), (bob, acme), (carol, globex)] {
        graph.add_edge("WORKS_AT", p, c).expect("edge");
    }
    graph.add_edge("MANAGED_BY", alice, carol).expect("edge");
    for (p, c) in [(alice, acme), (alice, globex), (bob, globex)] {
        graph.add_edge("INVESTS_IN", p, c).expect("edge");
    }
    graph
}

// ============================================================================
// Declaration file -> registry -> typed steps
// ============================================================================

#[test]
fn declaration_file_on_disk_registers_every_edge() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SOCIAL.as_bytes()).expect("write");

    let text = std::fs::read_to_string(file.path()).expect("read back");
    let decl = parse_schema_decl(&text).expect("parse");
    let schema = SchemaRegistry::from_decl(&decl, RegistryConfig::default())
        .expect("register")
        .finish();

    let names: Vec<&str> = schema.edges().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["FRIENDS_WITH", "WORKS_AT", "MANAGED_BY", "INVESTS_IN"]);
    let friendship = schema.relationship_for("FRIENDS_WITH").expect("relationship");
    assert_eq!(friendship.properties.len(), 1);
}

#[test]
fn declarations_survive_a_json_round_trip() {
    let decl = parse_schema_decl(SOCIAL).expect("parse");
    let json = serde_json::to_string(&decl).expect("serialize");
    let back: SchemaDecl = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, decl);
}

#[test]
fn schema_steps_match_the_typed_edge_specs() {
    let schema = social_schema();

    let works_at = ManyToOneEdgeSpec::<Person, Company>::new("WORKS_AT").expect("spec");
    let from_schema: Step<Person, Company, ToSingle> =
        schema.forward_step("WORKS_AT").expect("step");
    assert_eq!(from_schema, works_at.forward());

    let invests = ManyToManyEdgeSpec::<Person, Company>::new("INVESTS_IN").expect("spec");
    let backers: Step<Company, Person, ToMany> = invests.inverse().forward();
    let inverse = schema
        .edge("INVESTS_IN")
        .and_then(|edge| edge.inverse_step())
        .expect("inverse");
    assert_eq!(&inverse.plan, backers.plan());

    // A to-single edge may be requested as to-many, never the other way round.
    assert!(schema.forward_step::<Person, Company, ToMany>("WORKS_AT").is_ok());
    assert!(schema.forward_step::<Person, Person, ToSingle>("FRIENDS_WITH").is_err());

    // Endpoints are checked too: WORKS_AT runs from Person to Company.
    assert!(matches!(
        schema.forward_step::<Company, Person, ToSingle>("WORKS_AT"),
        Err(SchemaError::EndpointMismatch { .. })
    ));
}

// ============================================================================
// Execution on the in-memory graph
// ============================================================================

#[test]
fn symmetric_friends_are_found_from_either_side() {
    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let friends = ManyToManySymmetricEdgeSpec::<Person>::new("FRIENDS_WITH").expect("spec");

    let bob_friends = friends
        .forward()
        .bind(person("bob"))
        .execute(&graph, &mapper)
        .expect("execute");
    assert_eq!(bob_friends, vec![person("alice"), person("carol")]);

    let via_inverse = friends
        .inverse()
        .forward()
        .bind(person("alice"))
        .execute(&graph, &mapper)
        .expect("execute");
    assert_eq!(via_inverse, vec![person("bob")]);
}

#[test]
fn to_single_and_to_optional_shapes() {
    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let schema = social_schema();

    let works_at: Step<Person, Company, ToSingle> = schema.forward_step("WORKS_AT").expect("step");
    assert_eq!(
        works_at.bind(person("alice")).execute(&graph, &mapper).expect("execute"),
        company("acme")
    );
    assert!(matches!(
        works_at.bind(person("dave")).execute(&graph, &mapper),
        Err(ExecuteError::Shape(ShapeError { actual: 0, .. }))
    ));

    let managed_by: Step<Person, Person, ToOptional> =
        schema.forward_step("MANAGED_BY").expect("step");
    assert_eq!(
        managed_by.bind(person("alice")).execute(&graph, &mapper).expect("execute"),
        Some(person("carol"))
    );
    assert_eq!(
        managed_by.bind(person("bob")).execute_optional(&graph, &mapper).expect("execute"),
        None
    );
}

#[test]
fn composed_steps_join_cardinalities_and_dedup() {
    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let friends = ManyToManySymmetricEdgeSpec::<Person>::new("FRIENDS_WITH").expect("spec");
    let works_at = ManyToOneEdgeSpec::<Person, Company>::new("WORKS_AT").expect("spec");

    let employers_of_friends: Step<Person, Company, ToMany> =
        friends.forward().then(&works_at.forward());
    assert_eq!(
        employers_of_friends.plan().to_string(),
        "both(FRIENDS_WITH).out(WORKS_AT)"
    );

    let results = employers_of_friends
        .dedup()
        .bind_all([person("alice"), person("bob"), person("dave")])
        .execute(&graph, &mapper)
        .expect("execute");
    assert_eq!(
        results,
        vec![
            (person("alice"), vec![company("acme")]),
            (person("bob"), vec![company("acme"), company("globex")]),
            (person("dave"), vec![]),
        ]
    );
}

#[test]
fn first_truncates_a_to_many_step() {
    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let invests = ManyToManyEdgeSpec::<Person, Company>::new("INVESTS_IN").expect("spec");

    let first: Step<Person, Company, ToOptional> = invests.forward().first();
    assert_eq!(
        first.bind(person("alice")).execute(&graph, &mapper).expect("execute"),
        Some(company("acme"))
    );
    assert_eq!(
        first.bind(person("carol")).execute(&graph, &mapper).expect("execute"),
        None
    );
}

#[test]
fn unknown_origins_surface_as_mapping_errors() {
    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let works_at = ManyToOneEdgeSpec::<Person, Company>::new("WORKS_AT").expect("spec");

    let err = works_at
        .forward()
        .bind(person("mallory"))
        .execute(&graph, &mapper)
        .expect_err("unknown origin");
    assert!(matches!(err, ExecuteError::Mapping(_)));
    assert!(err.to_string().contains("mallory"), "{err}");
}

#[test]
fn typed_relationship_registration_feeds_execution() {
    let mut registry = SchemaRegistry::new(RegistryConfig::default());
    registry
        .register_entity(EntityDescriptor::vertex("Person"))
        .expect("vertex");

    let friends = ManyToManySymmetricEdgeSpec::<Person>::new("FRIENDS_WITH").expect("spec");
    let step = registry
        .register_relationship(
            &friends,
            EntityDescriptor::relationship(
                "Friendship",
                EdgeName::new("FRIENDS_WITH").expect("label"),
            )
            .with_member(MemberDecl::param("a", Role::FromVertex))
            .with_member(MemberDecl::param("b", Role::ToVertex)),
        )
        .expect("register");

    let graph = social_graph();
    let mapper = KeyMapper::new(&graph);
    let carol_friends = step
        .bind(person("carol"))
        .execute(&graph, &mapper)
        .expect("execute");
    assert_eq!(carol_friends, vec![person("bob")]);
}
