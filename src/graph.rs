//! Deduplicated, undirected view over the directed semantic link table.
//!
//! The link table may hold several rows for one pair of documents: one per
//! direction, or repeated detections. Graph consumers want a single edge per
//! unordered pair, so [`build_graph`] collapses rows at read time and keeps
//! the strongest one.
//!
//! # Algorithm
//!
//! 1. Drop links with either endpoint outside the requested documents
//! 2. Key each remaining link by `(min(source, target), max(source, target))`
//! 3. Keep the strongest link per key; on equal strength the first one seen wins
//! 4. Drop edges below `min_strength`, after deduplication
//! 5. Emit edge endpoints as nodes, or every requested document when
//!    `keep_isolated` is set

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{DocumentId, LinkId, SemanticLink};

/// Options controlling [`build_graph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Edges weaker than this are dropped after deduplication.
    pub min_strength: Option<u32>,
    /// Emit every requested document as a node, even with no edges.
    pub keep_isolated: bool,
}

impl GraphOptions {
    pub fn min_strength(mut self, min_strength: u32) -> Self {
        self.min_strength = Some(min_strength);
        self
    }

    pub fn keep_isolated(mut self, keep_isolated: bool) -> Self {
        self.keep_isolated = keep_isolated;
        self
    }
}

/// One canonical edge between two documents.
///
/// Carries the winning link as stored, so `source`/`target` keep the
/// direction that link was asserted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub link_id: LinkId,
    pub source: DocumentId,
    pub target: DocumentId,
    pub link_type: String,
    pub strength: u32,
}

impl From<&SemanticLink> for GraphEdge {
    fn from(link: &SemanticLink) -> Self {
        Self {
            link_id: link.id,
            source: link.source,
            target: link.target,
            link_type: link.link_type.clone(),
            strength: link.strength,
        }
    }
}

/// Nodes and deduplicated edges over a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticGraph {
    /// Ascending by id.
    pub nodes: Vec<DocumentId>,
    /// In order of each pair's first appearance in the input.
    pub edges: Vec<GraphEdge>,
}

impl SemanticGraph {
    /// Returns the edge between `a` and `b`, in either direction.
    pub fn edge_between(&self, a: DocumentId, b: DocumentId) -> Option<&GraphEdge> {
        let key = crate::pair_key(a, b);
        self.edges
            .iter()
            .find(|e| crate::pair_key(e.source, e.target) == key)
    }

    /// Documents adjacent to `document` with the connecting strength,
    /// strongest first.
    pub fn neighbors(&self, document: DocumentId) -> Vec<(DocumentId, u32)> {
        neighbors(&self.edges, document)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::compute(&self.nodes, &self.edges)
    }
}

/// Builds the deduplicated graph over `documents` from raw `links`.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use docgraph::{DocumentId, LinkId, SemanticLink};
/// use docgraph::graph::{GraphOptions, build_graph};
///
/// let link = |id, source, target, strength| SemanticLink {
///     id: LinkId::new(id),
///     source: DocumentId::new(source),
///     target: DocumentId::new(target),
///     link_type: "related".to_string(),
///     strength,
/// };
/// let docs: HashSet<_> = [DocumentId::new(1), DocumentId::new(2)].into();
///
/// let graph = build_graph(&docs, &[link(1, 1, 2, 4), link(2, 2, 1, 7)], GraphOptions::default());
/// assert_eq!(graph.edges.len(), 1);
/// assert_eq!(graph.edges[0].strength, 7);
/// ```
pub fn build_graph(
    documents: &HashSet<DocumentId>,
    links: &[SemanticLink],
    options: GraphOptions,
) -> SemanticGraph {
    let mut slots: HashMap<(DocumentId, DocumentId), usize> = HashMap::new();
    let mut strongest: Vec<&SemanticLink> = Vec::new();

    for link in links
        .iter()
        .filter(|l| documents.contains(&l.source) && documents.contains(&l.target))
    {
        match slots.entry(link.pair()) {
            Entry::Occupied(slot) => {
                let kept = &mut strongest[*slot.get()];
                if link.strength > kept.strength {
                    *kept = link;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(strongest.len());
                strongest.push(link);
            }
        }
    }

    let edges: Vec<GraphEdge> = strongest
        .into_iter()
        .filter(|l| options.min_strength.is_none_or(|min| l.strength >= min))
        .map(GraphEdge::from)
        .collect();

    let nodes: BTreeSet<DocumentId> = if options.keep_isolated {
        documents.iter().copied().collect()
    } else {
        edges.iter().flat_map(|e| [e.source, e.target]).collect()
    };

    SemanticGraph {
        nodes: nodes.into_iter().collect(),
        edges,
    }
}

pub(crate) fn neighbors(edges: &[GraphEdge], document: DocumentId) -> Vec<(DocumentId, u32)> {
    let mut adjacent: Vec<(DocumentId, u32)> = edges
        .iter()
        .filter_map(|e| {
            if e.source == document {
                Some((e.target, e.strength))
            } else if e.target == document {
                Some((e.source, e.strength))
            } else {
                None
            }
        })
        .collect();
    adjacent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    adjacent
}

/// Summary numbers for a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes that no edge touches; only non-zero with `keep_isolated`.
    pub isolated_count: usize,
    /// 0.0 for a graph without edges.
    pub average_strength: f64,
    pub max_strength: Option<u32>,
    /// Edge count per link type.
    pub link_types: BTreeMap<String, usize>,
}

impl GraphStats {
    pub fn compute(nodes: &[DocumentId], edges: &[GraphEdge]) -> Self {
        let connected: HashSet<DocumentId> =
            edges.iter().flat_map(|e| [e.source, e.target]).collect();
        let isolated_count = nodes.iter().filter(|&n| !connected.contains(n)).count();

        let total: u64 = edges.iter().map(|e| u64::from(e.strength)).sum();
        let average_strength = if edges.is_empty() {
            0.0
        } else {
            total as f64 / edges.len() as f64
        };

        let mut link_types = BTreeMap::new();
        for edge in edges {
            *link_types.entry(edge.link_type.clone()).or_insert(0) += 1;
        }

        Self {
            node_count: nodes.len(),
            edge_count: edges.len(),
            isolated_count,
            average_strength,
            max_strength: edges.iter().map(|e| e.strength).max(),
            link_types,
        }
    }
}

/// A document as shown in a graph, with the fields renderers label it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: DocumentId,
    pub title: String,
    pub category: Option<String>,
    pub file_type: String,
}

/// A [`SemanticGraph`] whose nodes carry document details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DocumentGraph {
    pub fn neighbors(&self, document: DocumentId) -> Vec<(DocumentId, u32)> {
        neighbors(&self.edges, document)
    }

    pub fn stats(&self) -> GraphStats {
        let ids: Vec<DocumentId> = self.nodes.iter().map(|n| n.id).collect();
        GraphStats::compute(&ids, &self.edges)
    }
}
