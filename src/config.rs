//! Configuration management for the citation map

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How links are chosen and how the chart is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Degrees of separation: links thresholded by their own degree
    #[default]
    #[value(name = "dos")]
    #[serde(rename = "dos")]
    Degrees,

    /// Opinions placed by vote split and decision direction
    Spaeth,

    /// One parent link per opinion
    #[value(alias = "gene")]
    Genealogy,
}

impl ChartMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartMode::Degrees => "dos",
            ChartMode::Spaeth => "spaeth",
            ChartMode::Genealogy => "genealogy",
        }
    }

    /// Whether trimming drops links past the degree limit
    pub fn thresholds_links(self) -> bool {
        self == ChartMode::Degrees
    }
}

/// Default configuration for the citation map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Largest degree of separation shown; `3` keeps first through third
    pub max_degree: usize,

    /// Chart mode
    pub mode: ChartMode,

    /// Connection opacity when the citation carries none
    pub edge_opacity: f32,

    /// Entries kept by the authority lookup cache
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_degree: 3,
            mode: ChartMode::Degrees,
            edge_opacity: 0.5,
            cache_capacity: 256,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        max_degree: usize,
        mode: ChartMode,
        edge_opacity: f32,
        cache_capacity: usize,
    ) -> Self {
        Self {
            max_degree,
            mode,
            edge_opacity,
            cache_capacity,
        }
    }
}
