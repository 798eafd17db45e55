//! UI components.

pub mod study_graph;
