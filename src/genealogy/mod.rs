//! Genealogy mode: one parent link per opinion

pub mod selection;

use serde::Serialize;

/// Which rule picked a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Most recent cited opinion decided in the same direction
    SameDirectionAuthority,

    /// Most recent cited opinion regardless of direction
    LatestAuthority,

    /// No authorities in the set: most recent opinion citing this one
    LatestCitingCase,
}

/// Parent chosen for one opinion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentLink {
    /// Index of the opinion being placed
    pub child: usize,

    /// Index of its parent
    pub parent: usize,

    /// Link slot joining the two
    pub link: u32,

    pub rule: SelectionRule,
}

/// Spanning selection of parent links, indexed by opinion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genealogy {
    pub parents: Vec<Option<ParentLink>>,
}

impl Genealogy {
    pub fn parent_of(&self, node: usize) -> Option<&ParentLink> {
        self.parents.get(node).and_then(Option::as_ref)
    }

    /// All chosen parent links, in child order
    pub fn links(&self) -> impl Iterator<Item = &ParentLink> {
        self.parents.iter().flatten()
    }

    /// Opinions left without a parent (true isolates)
    pub fn orphan_count(&self) -> usize {
        self.parents.iter().filter(|parent| parent.is_none()).count()
    }

    /// How many parents each rule produced
    pub fn rule_counts(&self) -> [(SelectionRule, usize); 3] {
        let count = |rule| self.links().filter(|link| link.rule == rule).count();
        [
            (
                SelectionRule::SameDirectionAuthority,
                count(SelectionRule::SameDirectionAuthority),
            ),
            (SelectionRule::LatestAuthority, count(SelectionRule::LatestAuthority)),
            (SelectionRule::LatestCitingCase, count(SelectionRule::LatestCitingCase)),
        ]
    }
}
