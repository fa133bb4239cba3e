//! Registry of encoded structures
//!
//! Holds the latest hypervector per label. Iteration follows the order in
//! which labels were first stored; overwriting a label keeps its position.

use std::collections::HashMap;

use crate::HyperVector;

/// Insertion-ordered mapping from labels to encoded hypervectors
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    entries: Vec<(String, HyperVector)>,
    index: HashMap<String, usize>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `hv` under `label`, returning the previous value if any
    pub fn insert(&mut self, label: &str, hv: HyperVector) -> Option<HyperVector> {
        match self.index.get(label) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, hv)),
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), hv));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&HyperVector> {
        self.index.get(label).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Iterate over `(label, hypervector)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HyperVector)> + '_ {
        self.entries.iter().map(|(label, hv)| (label.as_str(), hv))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
