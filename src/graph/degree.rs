//! Degree-of-separation categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of degree categories used to group and color the map.
///
/// Degrees start at `First`; anything past `Ninth` is `Distant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Distant,
}

impl Degree {
    pub const ALL: [Degree; 10] = [
        Degree::First,
        Degree::Second,
        Degree::Third,
        Degree::Fourth,
        Degree::Fifth,
        Degree::Sixth,
        Degree::Seventh,
        Degree::Eighth,
        Degree::Ninth,
        Degree::Distant,
    ];

    /// Category for a zero-based degree value, clamped to `Distant`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Degree::First => "first",
            Degree::Second => "second",
            Degree::Third => "third",
            Degree::Fourth => "fourth",
            Degree::Fifth => "fifth",
            Degree::Sixth => "sixth",
            Degree::Seventh => "seventh",
            Degree::Eighth => "eighth",
            Degree::Ninth => "ninth",
            Degree::Distant => "distant",
        }
    }

    /// Combine the two traversal distances of an opinion.
    ///
    /// The earliest and latest opinions are always `First`, as is anything
    /// at distance zero from a root. An opinion one of the traversals never
    /// reached is `Distant`.
    pub fn for_node(
        index: usize,
        node_count: usize,
        forward: Option<u32>,
        backward: Option<u32>,
    ) -> Self {
        if index == 0 || index + 1 == node_count {
            return Degree::First;
        }
        match (forward, backward) {
            (Some(0), _) | (_, Some(0)) => Degree::First,
            (Some(forward), Some(backward)) => {
                Self::from_index((forward + backward - 1) as usize)
            }
            _ => Degree::Distant,
        }
    }

    /// Combine the minimum depths at which each traversal crossed a link.
    /// Depths count the far endpoint, so they are at least one.
    pub fn for_link(forward: Option<u32>, backward: Option<u32>) -> Self {
        match (forward, backward) {
            (Some(forward), Some(backward)) => {
                Self::from_index((forward + backward).saturating_sub(2) as usize)
            }
            _ => Degree::Distant,
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
