//! Citation graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod degree;
pub mod opinion;

pub use builder::GraphBuilder;
pub use compressed::{CitationGraph, Link, LinkKey, Opinion, TraversalDirection};
pub use degree::Degree;
pub use opinion::{CitationMeta, DecisionDirection, OpinionId, OpinionRecord};
