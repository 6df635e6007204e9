//! Activity id interning.
//!
//! Maps caller-supplied string ids to dense integer indices so the network
//! can be stored as plain vectors (an arena indexed by activity).

use rustc_hash::FxHashMap;

/// Interned activity index (u32 for compact edge storage).
pub type ActivityIdx = u32;

/// Bidirectional map between activity id strings and arena indices.
///
/// Indices are handed out in insertion order, so for a network built from a
/// slice of activities the index equals the position in that slice.
#[derive(Debug, Clone)]
pub struct ActivityIdInterner {
    to_idx: FxHashMap<String, ActivityIdx>,
    from_idx: Vec<String>,
}

impl ActivityIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Intern a new id. Returns `None` if the id is already present.
    pub fn insert_unique(&mut self, id: &str) -> Option<ActivityIdx> {
        if self.to_idx.contains_key(id) {
            return None;
        }
        let idx = self.from_idx.len() as ActivityIdx;
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Some(idx)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<ActivityIdx> {
        self.to_idx.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: ActivityIdx) -> Option<&str> {
        self.from_idx.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

impl Default for ActivityIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
