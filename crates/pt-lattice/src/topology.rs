//! Interface adjacency maps.
//!
//! Both the lattice reported by the prober and the ground-truth topology of
//! a target are reduced to the same shape: each interface label maps to the
//! set of interfaces seen directly after it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Label given to the traceroute source.
pub const START_LABEL: &str = "start";

/// Label given to the probed destination.
pub const END_LABEL: &str = "end";

/// Mapping from interface label to the set of its successor interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyMap {
    nodes: BTreeMap<String, BTreeSet<String>>,
}

impl AdjacencyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the edge `parent -> child`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn insert(&mut self, parent: impl Into<String>, child: impl Into<String>) -> bool {
        self.nodes
            .entry(parent.into())
            .or_default()
            .insert(child.into())
    }

    /// Children of `label`, if it has any recorded edge.
    pub fn children(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.nodes.get(label)
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        self.nodes
            .get(parent)
            .is_some_and(|children| children.contains(child))
    }

    /// Labels that have at least one child, in sorted order.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// All edges as `(parent, child)` pairs, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(BTreeSet::len).sum()
    }

    /// Nodes with more than one child, with their child sets.
    pub fn branch_points(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.nodes
            .iter()
            .filter(|(_, children)| children.len() > 1)
            .map(|(label, children)| (label.as_str(), children))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<P, C> FromIterator<(P, C)> for AdjacencyMap
where
    P: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (parent, child) in iter {
            map.insert(parent, child);
        }
        map
    }
}
