//! Bounded lookup of per-opinion authority summaries

use crate::graph::OpinionId;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// What the start-case picker shows for an opinion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthoritySummary {
    /// Every id the opinion cites, inside the working set or not
    pub authority_ids: Vec<OpinionId>,

    /// Authorities that are part of the working set
    pub authority_count: usize,

    /// Opinions in the working set citing this one
    pub citing_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Least-recently-used cache keyed by opinion id
#[derive(Debug, Clone)]
pub struct AuthorityCache {
    capacity: usize,
    entries: HashMap<OpinionId, AuthoritySummary>,
    /// Front is least recently used
    recency: VecDeque<OpinionId>,
    stats: CacheStats,
}

impl AuthorityCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn contains(&self, id: &OpinionId) -> bool {
        self.entries.contains_key(id)
    }

    fn touch(&mut self, id: &OpinionId) {
        if let Some(pos) = self.recency.iter().position(|entry| entry == id) {
            if let Some(entry) = self.recency.remove(pos) {
                self.recency.push_back(entry);
            }
        }
    }

    /// Look up an entry, marking it most recently used
    pub fn get(&mut self, id: &OpinionId) -> Option<&AuthoritySummary> {
        if self.entries.contains_key(id) {
            self.stats.hits += 1;
            self.touch(id);
            self.entries.get(id)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Insert or replace an entry, evicting the least recently used one when full
    pub fn insert(&mut self, id: OpinionId, summary: AuthoritySummary) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.contains_key(&id) {
            self.touch(&id);
            self.entries.insert(id, summary);
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.recency.pop_front() {
                self.entries.remove(&evicted);
                self.stats.evictions += 1;
                log::debug!("Evicted authority summary for {}", evicted);
            }
        }
        self.recency.push_back(id.clone());
        self.entries.insert(id, summary);
    }

    /// Return the cached entry or compute, store and return a new one
    pub fn get_or_insert_with<F, E>(&mut self, id: &OpinionId, compute: F) -> Result<AuthoritySummary, E>
    where
        F: FnOnce() -> Result<AuthoritySummary, E>,
    {
        if let Some(summary) = self.get(id) {
            return Ok(summary.clone());
        }
        let summary = compute()?;
        self.insert(id.clone(), summary.clone());
        Ok(summary)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}
