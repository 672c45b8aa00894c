//! Data loading and preprocessing module

pub mod json;
pub mod preprocessing;

pub use preprocessing::{TrimmedLink, TrimmedMap, TrimmedNode};
