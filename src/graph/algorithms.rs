//! Graph algorithms for the degrees-of-separation map

use crate::error::GraphWarning;
use crate::graph::compressed::{CitationGraph, TraversalDirection};
use crate::graph::degree::Degree;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// Shortest-path depths from both traversal roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distances {
    /// Distance from the earliest opinion along cited-by links
    pub forward: Vec<Option<u32>>,

    /// Distance from the latest opinion along cites links
    pub backward: Vec<Option<u32>>,

    /// Minimum depth at which the forward pass crossed each link
    pub link_forward: Vec<Option<u32>>,

    /// Minimum depth at which the backward pass crossed each link
    pub link_backward: Vec<Option<u32>>,
}

/// Degree categories for every node and link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degrees {
    pub nodes: Vec<Degree>,
    pub links: Vec<Degree>,
}

impl Degrees {
    /// Largest category over nodes and links
    pub fn max(&self) -> Degree {
        self.nodes
            .iter()
            .chain(self.links.iter())
            .copied()
            .max()
            .unwrap_or(Degree::First)
    }
}

/// Compute forward and backward distances for every opinion.
///
/// The two passes are independent and run in parallel.
pub fn compute_distances(graph: &CitationGraph) -> Distances {
    log::info!("Computing citation distances for {} opinions", graph.node_count);

    let (earliest, latest) = graph.roots();
    let ((forward, link_forward), (backward, link_backward)) = rayon::join(
        || relax_from(graph, earliest, TraversalDirection::CitedBy),
        || relax_from(graph, latest, TraversalDirection::Cites),
    );

    let unreachable = forward
        .iter()
        .zip(&backward)
        .filter(|(f, b)| f.is_none() || b.is_none())
        .count();
    if unreachable > 0 {
        log::debug!("{} opinions are not connected to both roots", unreachable);
    }

    Distances {
        forward,
        backward,
        link_forward,
        link_backward,
    }
}

/// Unit-weight relaxation from a single root.
///
/// A node is queued again only when its distance strictly improves, so cycles
/// and self-loops cannot keep the worklist alive. Every link crossed is
/// stamped with the depth of its far endpoint, keeping the minimum.
fn relax_from(
    graph: &CitationGraph,
    root: usize,
    direction: TraversalDirection,
) -> (Vec<Option<u32>>, Vec<Option<u32>>) {
    let mut distance: Vec<Option<u32>> = vec![None; graph.node_count];
    let mut link_depth: Vec<Option<u32>> = vec![None; graph.link_count()];
    let mut worklist = VecDeque::new();

    distance[root] = Some(0);
    worklist.push_back(root);

    while let Some(node) = worklist.pop_front() {
        let Some(depth) = distance[node] else {
            continue;
        };
        let next = depth + 1;
        let (targets, links) = graph.neighbors(node, direction);

        for (&target, &link) in targets.iter().zip(links) {
            let slot = &mut link_depth[link as usize];
            if slot.map_or(true, |known| next < known) {
                *slot = Some(next);
            }

            let target = target as usize;
            if distance[target].map_or(true, |known| next < known) {
                distance[target] = Some(next);
                worklist.push_back(target);
            }
        }
    }

    (distance, link_depth)
}

/// Turn distances into degree categories
pub fn assign_degrees(graph: &CitationGraph, distances: &Distances) -> Degrees {
    let nodes = (0..graph.node_count)
        .map(|node| {
            Degree::for_node(
                node,
                graph.node_count,
                distances.forward[node],
                distances.backward[node],
            )
        })
        .collect();

    let links = distances
        .link_forward
        .iter()
        .zip(&distances.link_backward)
        .map(|(&forward, &backward)| Degree::for_link(forward, backward))
        .collect();

    Degrees { nodes, links }
}

/// Report groups of opinions that cite each other in a loop.
///
/// Cycles are tolerated by the traversal; they only produce warnings.
pub fn find_citation_cycles(graph: &CitationGraph) -> Vec<GraphWarning> {
    let mut citations: DiGraph<usize, ()> =
        DiGraph::with_capacity(graph.node_count, graph.citation_count());
    let nodes: Vec<NodeIndex> = (0..graph.node_count)
        .map(|node| citations.add_node(node))
        .collect();
    for src in 0..graph.node_count {
        for &dst in graph.cites(src) {
            citations.add_edge(nodes[src], nodes[dst as usize], ());
        }
    }

    let mut warnings: Vec<GraphWarning> = petgraph::algo::tarjan_scc(&citations)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut members: Vec<usize> = component
                .into_iter()
                .map(|node| citations[node])
                .collect();
            members.sort_unstable();
            GraphWarning::CitationCycle {
                members: members
                    .into_iter()
                    .map(|node| graph.opinion(node).id().clone())
                    .collect(),
            }
        })
        .collect();
    warnings.sort_by(|a, b| {
        let GraphWarning::CitationCycle { members: left } = a;
        let GraphWarning::CitationCycle { members: right } = b;
        left.cmp(right)
    });

    for warning in &warnings {
        let GraphWarning::CitationCycle { members } = warning;
        log::warn!("Citation cycle among {} opinions: {:?}", members.len(), members);
    }

    warnings
}
