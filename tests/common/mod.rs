//! Shared helpers for integration tests
//!
//! Builds throwaway graph directories on disk so tests exercise the real
//! loader, analyzers, aggregator and renderer together.

pub mod demo;
pub mod graph;

pub use demo::{demo_as_of, demo_graph};
pub use graph::TestGraph;
