//! Compressed citation graph with forward and reverse adjacency

use crate::graph::opinion::{OpinionId, OpinionRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Direction for walking the citation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    /// From a case to the authorities it cites (backward in time)
    Cites,
    /// From a case to the later cases citing it (forward in time)
    CitedBy,
}

/// An opinion placed at its chronological position
#[derive(Debug, Clone)]
pub struct Opinion {
    /// 0-based position after the chronological sort
    pub index: usize,

    /// Parsed filing date
    pub date: NaiveDate,

    /// The record as loaded
    pub record: OpinionRecord,
}

impl Opinion {
    pub fn id(&self) -> &OpinionId {
        &self.record.id
    }
}

/// Order-independent key of a link: the smaller id always comes first
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkKey {
    pub low: OpinionId,
    pub high: OpinionId,
}

impl LinkKey {
    pub fn new(a: &OpinionId, b: &OpinionId) -> Self {
        if a <= b {
            Self { low: a.clone(), high: b.clone() }
        } else {
            Self { low: b.clone(), high: a.clone() }
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

/// A citation between two opinions, collapsed with its reverse if present
#[derive(Debug, Clone)]
pub struct Link {
    pub key: LinkKey,

    /// Index of the opinion whose citation created the link
    pub citing: usize,

    /// Index of the opinion it cites
    pub cited: usize,

    /// Both opinions cite each other
    pub mutual: bool,
}

/// Citation entries discarded or merged while resolving the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Citations to opinions outside the working set
    pub dangling_citations: usize,

    /// Opinions citing themselves
    pub self_citations: usize,

    /// Citations folded into an existing link by the reverse citation
    pub mutual_citations: usize,
}

/// Citation graph over a chronologically sorted set of opinions.
///
/// Adjacency is stored in offset/target form in both directions. Each target
/// array has a parallel array holding the link slot of that citation, so the
/// traversals can record per-link depths without hashing.
#[derive(Debug, Clone)]
pub struct CitationGraph {
    /// Number of opinions
    pub node_count: usize,

    /// Opinions ordered by `index`
    pub opinions: Vec<Opinion>,

    /// `cites_offsets[i]..cites_offsets[i+1]` is the range of opinion i's authorities
    pub cites_offsets: Vec<u32>,
    pub cites: Vec<u32>,
    pub cites_links: Vec<u32>,

    /// Same layout for the reverse index
    pub cited_by_offsets: Vec<u32>,
    pub cited_by: Vec<u32>,
    pub cited_by_links: Vec<u32>,

    /// Collapsed links, addressed by slot
    pub links: Vec<Link>,

    pub stats: BuildStats,

    pub(crate) index: HashMap<OpinionId, u32>,
}

impl CitationGraph {
    pub fn opinion(&self, node: usize) -> &Opinion {
        &self.opinions[node]
    }

    pub fn index_of(&self, id: &OpinionId) -> Option<usize> {
        self.index.get(id).map(|&idx| idx as usize)
    }

    /// Earliest and latest opinion indices
    pub fn roots(&self) -> (usize, usize) {
        (0, self.node_count.saturating_sub(1))
    }

    /// Neighbors of a node in the given direction with the link slot of each
    pub fn neighbors(&self, node: usize, direction: TraversalDirection) -> (&[u32], &[u32]) {
        let (offsets, targets, links) = match direction {
            TraversalDirection::Cites => (&self.cites_offsets, &self.cites, &self.cites_links),
            TraversalDirection::CitedBy => {
                (&self.cited_by_offsets, &self.cited_by, &self.cited_by_links)
            }
        };
        let start = offsets[node] as usize;
        let end = offsets[node + 1] as usize;
        (&targets[start..end], &links[start..end])
    }

    /// Opinions cited by a node, oldest first
    pub fn cites(&self, node: usize) -> &[u32] {
        self.neighbors(node, TraversalDirection::Cites).0
    }

    /// Opinions citing a node, oldest first
    pub fn cited_by(&self, node: usize) -> &[u32] {
        self.neighbors(node, TraversalDirection::CitedBy).0
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.cites(node).len()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.cited_by(node).len()
    }

    /// Check if `src` cites `dst`
    pub fn has_citation(&self, src: usize, dst: u32) -> bool {
        self.cites(src).binary_search(&dst).is_ok()
    }

    /// Link slot joining two opinions, whichever one does the citing
    pub fn link_between(&self, a: usize, b: usize) -> Option<u32> {
        let lookup = |src: usize, dst: usize| {
            let (targets, links) = self.neighbors(src, TraversalDirection::Cites);
            targets
                .binary_search(&(dst as u32))
                .ok()
                .map(|pos| links[pos])
        };
        lookup(a, b).or_else(|| lookup(b, a))
    }

    pub fn link(&self, slot: u32) -> &Link {
        &self.links[slot as usize]
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of resolved citations (a mutual pair counts twice)
    pub fn citation_count(&self) -> usize {
        self.cites.len()
    }

    pub fn is_isolated(&self, node: usize) -> bool {
        self.out_degree(node) == 0 && self.in_degree(node) == 0
    }
}
