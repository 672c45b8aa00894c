//! A computed citation map for one dataset.
//!
//! Distances, degrees and the genealogy selection are computed once when the
//! map is built; trimming to a degree limit re-runs against that state.

use crate::cache::{AuthorityCache, AuthoritySummary};
use crate::config::{ChartMode, Config};
use crate::data::preprocessing::{self, TrimmedMap};
use crate::error::{GraphWarning, MapError, Result};
use crate::genealogy::{selection, Genealogy};
use crate::graph::algorithms::{self, Degrees, Distances};
use crate::graph::{CitationGraph, Degree, GraphBuilder, OpinionId, OpinionRecord};

pub struct CitationMap {
    graph: CitationGraph,
    distances: Distances,
    degrees: Degrees,
    genealogy: Genealogy,
    warnings: Vec<GraphWarning>,
    mode: ChartMode,
    cache: AuthorityCache,
}

impl CitationMap {
    /// Build the graph from records and compute everything needed to draw it
    pub fn build(records: Vec<OpinionRecord>, config: &Config) -> Result<Self> {
        let graph = GraphBuilder::from_records(records)?;
        Ok(Self::from_graph(graph, config))
    }

    pub fn from_graph(graph: CitationGraph, config: &Config) -> Self {
        let distances = algorithms::compute_distances(&graph);
        let degrees = algorithms::assign_degrees(&graph, &distances);
        let warnings = algorithms::find_citation_cycles(&graph);
        let genealogy = selection::select_parents(&graph);

        log::info!(
            "Citation map ready: {} opinions, max degree {}, {} warnings",
            graph.node_count,
            degrees.max(),
            warnings.len()
        );

        Self {
            graph,
            distances,
            degrees,
            genealogy,
            warnings,
            mode: config.mode,
            cache: AuthorityCache::new(config.cache_capacity),
        }
    }

    pub fn graph(&self) -> &CitationGraph {
        &self.graph
    }

    pub fn distances(&self) -> &Distances {
        &self.distances
    }

    pub fn genealogy(&self) -> &Genealogy {
        &self.genealogy
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    pub fn mode(&self) -> ChartMode {
        self.mode
    }

    /// Switch chart mode without recomputing distances
    pub fn set_mode(&mut self, mode: ChartMode) {
        self.mode = mode;
    }

    pub fn node_degree(&self, node: usize) -> Degree {
        self.degrees.nodes[node]
    }

    pub fn link_degree(&self, slot: u32) -> Degree {
        self.degrees.links[slot as usize]
    }

    pub fn degree_of(&self, id: &OpinionId) -> Option<Degree> {
        self.graph.index_of(id).map(|node| self.node_degree(node))
    }

    /// Largest degree over opinions and links
    pub fn max_degree(&self) -> Degree {
        self.degrees.max()
    }

    /// Number of opinions in each degree category
    pub fn degree_histogram(&self) -> Vec<(Degree, usize)> {
        Degree::ALL
            .iter()
            .map(|&degree| {
                let count = self.degrees.nodes.iter().filter(|&&d| d == degree).count();
                (degree, count)
            })
            .collect()
    }

    /// Opinions and links that fall under a degree limit
    pub fn trim(&self, limit: usize) -> Result<TrimmedMap> {
        preprocessing::trim_to_degree(self, limit)
    }

    /// Authority counts for one opinion, served from the lookup cache
    pub fn authorities(&mut self, id: &OpinionId) -> Result<AuthoritySummary> {
        let node = self
            .graph
            .index_of(id)
            .ok_or_else(|| MapError::UnknownOpinion(id.clone()))?;
        let graph = &self.graph;

        self.cache.get_or_insert_with(id, || -> Result<AuthoritySummary> {
            let opinion = graph.opinion(node);
            Ok(AuthoritySummary {
                authority_ids: opinion.record.cited.keys().cloned().collect(),
                authority_count: graph.out_degree(node),
                citing_count: graph.in_degree(node),
            })
        })
    }

    pub fn cache(&self) -> &AuthorityCache {
        &self.cache
    }
}
