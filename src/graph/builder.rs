//! Graph construction module

use crate::error::{MapError, Result};
use crate::graph::compressed::{BuildStats, CitationGraph, Link, LinkKey, Opinion};
use crate::graph::opinion::{OpinionId, OpinionRecord};
use chrono::{DateTime, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Builder collecting opinion records before they are indexed
pub struct GraphBuilder {
    /// Records with their parsed filing dates
    records: Vec<(NaiveDate, OpinionRecord)>,

    /// Ids seen so far
    seen: HashSet<OpinionId>,
}

/// Parse a filing date, accepting `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date_filed(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            // Naive timestamps such as `1973-01-22T00:00:00`
            raw.split_once('T')
                .and_then(|(date, _)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        })
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Build a graph straight from a collection of records
    pub fn from_records<I>(records: I) -> Result<CitationGraph>
    where
        I: IntoIterator<Item = OpinionRecord>,
    {
        let records = records.into_iter();
        let mut builder = Self::with_capacity(records.size_hint().0);
        for record in records {
            builder.add_opinion(record)?;
        }
        builder.build()
    }

    /// Add one opinion, rejecting duplicate ids and unreadable dates
    pub fn add_opinion(&mut self, record: OpinionRecord) -> Result<()> {
        let date = parse_date_filed(&record.date_filed).ok_or_else(|| MapError::InvalidDate {
            id: record.id.clone(),
            value: record.date_filed.clone(),
        })?;

        if !self.seen.insert(record.id.clone()) {
            return Err(MapError::DuplicateOpinion(record.id));
        }

        self.records.push((date, record));
        Ok(())
    }

    /// Sort, index and resolve citations into a compressed graph
    pub fn build(mut self) -> Result<CitationGraph> {
        if self.records.is_empty() {
            return Err(MapError::EmptyDataset);
        }

        // Oldest first; on the same day an opinion citing less of the set sorts earlier
        let seen = &self.seen;
        self.records.sort_by_cached_key(|(date, record)| {
            let resolved = record
                .cited
                .keys()
                .filter(|cited| **cited != record.id && seen.contains(*cited))
                .count();
            (*date, resolved, record.id.clone())
        });

        let node_count = self.records.len();
        let mut index: HashMap<OpinionId, u32> = HashMap::with_capacity(node_count);
        let opinions: Vec<Opinion> = self
            .records
            .into_iter()
            .enumerate()
            .map(|(idx, (date, record))| {
                index.insert(record.id.clone(), idx as u32);
                Opinion { index: idx, date, record }
            })
            .collect();

        // Resolve cited ids to indices
        let mut stats = BuildStats::default();
        let mut adjacency_lists: Vec<Vec<u32>> = Vec::with_capacity(node_count);
        for opinion in &opinions {
            let mut targets = Vec::with_capacity(opinion.record.cited.len());
            for cited_id in opinion.record.cited.keys() {
                match index.get(cited_id) {
                    None => stats.dangling_citations += 1,
                    Some(&target) if target as usize == opinion.index => stats.self_citations += 1,
                    Some(&target) => targets.push(target),
                }
            }
            targets.sort_unstable();
            targets.dedup();
            adjacency_lists.push(targets);
        }

        // Forward adjacency, collapsing each citation pair into one link
        let edge_count: usize = adjacency_lists.iter().map(|list| list.len()).sum();
        let mut link_slots: HashMap<LinkKey, u32> = HashMap::with_capacity(edge_count);
        let mut links: Vec<Link> = Vec::with_capacity(edge_count);
        let mut cites_offsets = Vec::with_capacity(node_count + 1);
        let mut cites = Vec::with_capacity(edge_count);
        let mut cites_links = Vec::with_capacity(edge_count);
        cites_offsets.push(0);

        for (src, targets) in adjacency_lists.iter().enumerate() {
            for &dst in targets {
                let key = LinkKey::new(opinions[src].id(), opinions[dst as usize].id());
                let slot = match link_slots.get(&key) {
                    Some(&slot) => {
                        links[slot as usize].mutual = true;
                        stats.mutual_citations += 1;
                        slot
                    }
                    None => {
                        let slot = links.len() as u32;
                        links.push(Link {
                            key: key.clone(),
                            citing: src,
                            cited: dst as usize,
                            mutual: false,
                        });
                        link_slots.insert(key, slot);
                        slot
                    }
                };
                cites.push(dst);
                cites_links.push(slot);
            }
            cites_offsets.push(cites.len() as u32);
        }

        // Reverse adjacency; scanning sources in order keeps each list sorted
        let mut in_counts = vec![0u32; node_count];
        for &dst in &cites {
            in_counts[dst as usize] += 1;
        }

        let mut cited_by_offsets = Vec::with_capacity(node_count + 1);
        cited_by_offsets.push(0);
        let mut current_offset = 0;
        for &count in &in_counts {
            current_offset += count;
            cited_by_offsets.push(current_offset);
        }

        let mut cursor: Vec<u32> = cited_by_offsets[..node_count].to_vec();
        let mut cited_by = vec![0u32; cites.len()];
        let mut cited_by_links = vec![0u32; cites.len()];
        for src in 0..node_count {
            let start = cites_offsets[src] as usize;
            let end = cites_offsets[src + 1] as usize;
            for pos in start..end {
                let dst = cites[pos] as usize;
                let at = cursor[dst] as usize;
                cited_by[at] = src as u32;
                cited_by_links[at] = cites_links[pos];
                cursor[dst] += 1;
            }
        }

        if stats.dangling_citations > 0 {
            log::debug!(
                "Ignored {} citations to opinions outside the working set",
                stats.dangling_citations
            );
        }
        if stats.self_citations > 0 {
            log::debug!("Ignored {} self-citations", stats.self_citations);
        }
        log::info!(
            "Built citation graph with {} opinions, {} citations and {} links",
            node_count,
            cites.len(),
            links.len()
        );

        Ok(CitationGraph {
            node_count,
            opinions,
            cites_offsets,
            cites,
            cites_links,
            cited_by_offsets,
            cited_by,
            cited_by_links,
            links,
            stats,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(id: u64) -> OpinionId {
        OpinionId::Number(id)
    }

    fn ids(graph: &CitationGraph) -> Vec<OpinionId> {
        graph.opinions.iter().map(|o| o.id().clone()).collect()
    }

    #[test]
    fn test_sorts_chronologically() {
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(3u64, "1990-05-01").citing([1u64]),
            OpinionRecord::new(1u64, "1950-02-10"),
            OpinionRecord::new(2u64, "1973-01-22").citing([1u64]),
        ])
        .unwrap();

        assert_eq!(ids(&graph), vec![num(1), num(2), num(3)]);
        assert!(graph.opinions.windows(2).all(|pair| pair[0].date <= pair[1].date));
        for (idx, opinion) in graph.opinions.iter().enumerate() {
            assert_eq!(opinion.index, idx);
            assert_eq!(graph.index_of(opinion.id()), Some(idx));
        }
    }

    #[test]
    fn test_same_day_ties_break_on_citation_count() {
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(10u64, "2001-06-01").citing([11u64]),
            OpinionRecord::new(11u64, "2001-06-01"),
        ])
        .unwrap();

        assert_eq!(ids(&graph), vec![num(11), num(10)]);
    }

    #[test]
    fn test_same_day_ties_ignore_citations_outside_the_set() {
        // 9 cites only missing opinions and itself, so it sorts before 3
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(1u64, "1900-01-01"),
            OpinionRecord::new(2u64, "1950-01-01").citing([1u64]),
            OpinionRecord::new(3u64, "2000-01-01").citing([2u64]),
            OpinionRecord::new(9u64, "2000-01-01").citing([700u64, 701, 9]),
        ])
        .unwrap();

        assert_eq!(ids(&graph), vec![num(1), num(2), num(9), num(3)]);
        assert_eq!(graph.roots(), (0, 3));
        assert_eq!(graph.stats.dangling_citations, 2);
        assert_eq!(graph.stats.self_citations, 1);
    }

    #[test]
    fn test_builds_reverse_index() {
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(1u64, "1900-01-01"),
            OpinionRecord::new(2u64, "1910-01-01").citing([1u64]),
            OpinionRecord::new(3u64, "1920-01-01").citing([1u64, 2]),
        ])
        .unwrap();

        assert_eq!(graph.cited_by(0), &[1, 2]);
        assert_eq!(graph.cited_by(1), &[2]);
        assert!(graph.cited_by(2).is_empty());
        assert_eq!(graph.cites(2), &[0, 1]);
        assert!(graph.has_citation(2, 0));
        assert!(!graph.has_citation(0, 2));
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn test_dangling_and_self_citations_are_dropped() {
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(1u64, "1900-01-01").citing([1u64]),
            OpinionRecord::new(2u64, "1910-01-01").citing([1u64, 999]),
        ])
        .unwrap();

        assert_eq!(graph.stats.dangling_citations, 1);
        assert_eq!(graph.stats.self_citations, 1);
        assert_eq!(graph.citation_count(), 1);
        assert_eq!(graph.link_count(), 1);
        assert!(graph.cites(0).is_empty());
    }

    #[test]
    fn test_mutual_citations_share_a_link() {
        let graph = GraphBuilder::from_records(vec![
            OpinionRecord::new(5u64, "1900-01-01").citing([4u64]),
            OpinionRecord::new(4u64, "1900-01-02").citing([5u64]),
        ])
        .unwrap();

        assert_eq!(graph.citation_count(), 2);
        assert_eq!(graph.link_count(), 1);
        let link = graph.link(0);
        assert!(link.mutual);
        assert_eq!(link.key.low, OpinionId::Number(4));
        assert_eq!(graph.link_between(0, 1), Some(0));
        assert_eq!(graph.link_between(1, 0), Some(0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            GraphBuilder::from_records(Vec::new()),
            Err(MapError::EmptyDataset)
        ));
        assert!(matches!(
            GraphBuilder::from_records(vec![
                OpinionRecord::new(1u64, "1900-01-01"),
                OpinionRecord::new("1", "1901-01-01"),
            ]),
            Err(MapError::DuplicateOpinion(OpinionId::Number(1)))
        ));
        assert!(matches!(
            GraphBuilder::from_records(vec![OpinionRecord::new(1u64, "January 1900")]),
            Err(MapError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parses_timestamps() {
        let expected = NaiveDate::from_ymd_opt(1973, 1, 22);
        assert_eq!(parse_date_filed("1973-01-22"), expected);
        assert_eq!(parse_date_filed("1973-01-22T00:00:00Z"), expected);
        assert_eq!(parse_date_filed("1973-01-22T00:00:00"), expected);
        assert_eq!(parse_date_filed(""), None);
    }
}
