//! Label interning. Vertex and edge labels are stored once and referred to by
//! a 4-byte [`LabelId`].

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct LabelId(u32);

impl LabelId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
pub struct LabelInterner {
    label_to_id: DashMap<String, LabelId>,
    id_to_label: DashMap<LabelId, String>,
    next_id: AtomicU32,
}

impl LabelInterner {
    pub fn new() -> Self {
        Self {
            label_to_id: DashMap::new(),
            id_to_label: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Intern a label, returning its id. Safe to call concurrently.
    pub fn intern(&self, label: &str) -> LabelId {
        if let Some(id) = self.label_to_id.get(label) {
            return *id;
        }
        *self
            .label_to_id
            .entry(label.to_string())
            .or_insert_with(|| {
                let id = LabelId(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.id_to_label.insert(id, label.to_string());
                id
            })
    }

    /// Existing id for a label, without inserting.
    pub fn id_of(&self, label: &str) -> Option<LabelId> {
        self.label_to_id.get(label).map(|id| *id)
    }

    pub fn lookup(&self, id: LabelId) -> Option<String> {
        self.id_to_label.get(&id).map(|label| label.clone())
    }

    pub fn len(&self) -> usize {
        self.label_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_to_id.is_empty()
    }
}

impl Default for LabelInterner {
    fn default() -> Self {
        Self::new()
    }
}
