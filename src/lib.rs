//! Core library functions for the SCOTUS citation map

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod genealogy;
pub mod graph;
pub mod layout;
pub mod map;
pub mod storage;

pub use config::{ChartMode, Config};
pub use error::{GraphWarning, MapError, Result};
pub use map::CitationMap;
