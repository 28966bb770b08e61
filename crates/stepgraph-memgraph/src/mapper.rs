//! Mapping between typed entities and [`MemGraph`] vertices by `(label, key)`.

use std::fmt;

use stepgraph_steps::{EntityMapper, Vertex};

use crate::error::MemGraphError;
use crate::graph::{MemGraph, VertexId};

/// An entity identified in the graph by its vertex label and a string key.
pub trait KeyedEntity: Vertex + Sized {
    fn key(&self) -> String;

    /// Rebuild the entity from its key. `None` when the key is malformed.
    fn from_key(key: &str) -> Option<Self>;
}

/// Maps any [`KeyedEntity`] to and from the vertices of one graph.
pub struct KeyMapper<'g> {
    graph: &'g MemGraph,
}

impl<'g> KeyMapper<'g> {
    pub fn new(graph: &'g MemGraph) -> Self {
        Self { graph }
    }
}

impl fmt::Debug for KeyMapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMapper")
            .field("vertices", &self.graph.vertex_count())
            .finish()
    }
}

impl<T: KeyedEntity> EntityMapper<T> for KeyMapper<'_> {
    type Element = VertexId;
    type Error = MemGraphError;

    fn to_element(&self, entity: &T) -> Result<VertexId, MemGraphError> {
        let key = entity.key();
        self.graph
            .lookup(T::LABEL, &key)
            .ok_or_else(|| MemGraphError::UnknownKey {
                label: T::LABEL.to_string(),
                key,
            })
    }

    fn from_element(&self, element: VertexId) -> Result<T, MemGraphError> {
        let (label, key) = self.graph.vertex(element)?;
        if label != T::LABEL {
            return Err(MemGraphError::LabelMismatch {
                id: element,
                expected: T::LABEL.to_string(),
                found: label,
            });
        }
        T::from_key(key).ok_or_else(|| MemGraphError::Decode {
            label,
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
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

    #[derive(Debug, PartialEq)]
    struct Year(u16);

    impl Vertex for Year {
        const LABEL: &'static str = "Year";
    }

    impl KeyedEntity for Year {
        fn key(&self) -> String {
            self.0.to_string()
        }

        fn from_key(key: &str) -> Option<Self> {
            key.parse().ok().map(Year)
        }
    }

    #[test]
    fn maps_by_label_and_key() {
        let mut graph = MemGraph::new();
        let alice = graph.add_vertex("Person", "alice").expect("vertex");
        let mapper = KeyMapper::new(&graph);

        assert_eq!(mapper.to_element(&Person("alice".into())), Ok(alice));
        assert_eq!(
            EntityMapper::<Person>::from_element(&mapper, alice),
            Ok(Person("alice".into()))
        );
        assert_eq!(
            mapper.to_element(&Person("bob".into())),
            Err(MemGraphError::UnknownKey {
                label: "Person".into(),
                key: "bob".into()
            })
        );
    }

    #[test]
    fn rejects_wrong_labels_and_bad_keys() {
        let mut graph = MemGraph::new();
        let alice = graph.add_vertex("Person", "alice").expect("vertex");
        let bad_year = graph.add_vertex("Year", "MMXX").expect("vertex");
        let mapper = KeyMapper::new(&graph);

        assert!(matches!(
            EntityMapper::<Year>::from_element(&mapper, alice),
            Err(MemGraphError::LabelMismatch { .. })
        ));
        assert!(matches!(
            EntityMapper::<Year>::from_element(&mapper, bad_year),
            Err(MemGraphError::Decode { .. })
        ));
    }
}
