//! Trimming a computed map down to a degree limit

use crate::config::ChartMode;
use crate::error::{MapError, Result};
use crate::graph::Degree;
use crate::map::CitationMap;
use itertools::Itertools;
use serde::Serialize;

/// An opinion kept by trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrimmedNode {
    /// Index in the full graph
    pub index: usize,

    /// 1-based position among the kept opinions
    pub position: usize,

    pub degree: Degree,
}

/// A link kept by trimming, endpoints given as full-graph indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrimmedLink {
    pub slot: u32,

    /// Citing opinion, or the child in genealogy mode
    pub from: usize,

    /// Cited opinion, or the parent in genealogy mode
    pub to: usize,

    pub degree: Degree,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrimmedMap {
    pub limit: usize,
    pub mode: ChartMode,
    pub nodes: Vec<TrimmedNode>,
    pub links: Vec<TrimmedLink>,
}

impl TrimmedMap {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Position of a full-graph index, if it was kept
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.nodes
            .binary_search_by_key(&index, |node| node.index)
            .ok()
            .map(|pos| self.nodes[pos].position)
    }
}

/// Keep opinions whose degree falls under `limit` and the links between them.
///
/// In degrees mode a link must also fall under the limit itself. Spaeth mode
/// keeps every citation between kept opinions, genealogy mode keeps the
/// selected parent links between kept opinions.
pub fn trim_to_degree(map: &CitationMap, limit: usize) -> Result<TrimmedMap> {
    if limit == 0 {
        return Err(MapError::InvalidDegreeLimit(limit));
    }

    let graph = map.graph();
    let mode = map.mode();

    // Filter opinions, renumbering the survivors
    let mut keep = vec![false; graph.node_count];
    let mut nodes = Vec::with_capacity(graph.node_count);
    for node in 0..graph.node_count {
        let degree = map.node_degree(node);
        if degree.index() < limit {
            keep[node] = true;
            nodes.push(TrimmedNode {
                index: node,
                position: nodes.len() + 1,
                degree,
            });
        }
    }

    let links: Vec<TrimmedLink> = match mode {
        ChartMode::Genealogy => map
            .genealogy()
            .links()
            .filter(|parent| keep[parent.child] && keep[parent.parent])
            .unique_by(|parent| parent.link)
            .map(|parent| TrimmedLink {
                slot: parent.link,
                from: parent.child,
                to: parent.parent,
                degree: map.link_degree(parent.link),
            })
            .collect(),
        ChartMode::Degrees | ChartMode::Spaeth => graph
            .links
            .iter()
            .enumerate()
            .map(|(slot, link)| TrimmedLink {
                slot: slot as u32,
                from: link.citing,
                to: link.cited,
                degree: map.link_degree(slot as u32),
            })
            .filter(|link| keep[link.from] && keep[link.to])
            .filter(|link| !mode.thresholds_links() || link.degree.index() < limit)
            .collect(),
    };

    log::info!(
        "Trimmed to {} degrees ({}): kept {} of {} opinions and {} links",
        limit,
        mode.as_str(),
        nodes.len(),
        graph.node_count,
        links.len()
    );

    Ok(TrimmedMap {
        limit,
        mode,
        nodes,
        links,
    })
}
