//! Shared data models.

pub mod graph;

pub use graph::{GraphQueryResult, GraphRow, ParamValue, Parameters};
