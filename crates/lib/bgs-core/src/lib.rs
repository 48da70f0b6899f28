//! Core geospatial query engine for bgs-mcp.
//!
//! This crate normalizes raw BGS OGC API features into canonical borehole
//! records, exposes the control plane implementing the search and summary
//! operations, and provides the upstream fetcher contract plus its reqwest
//! implementation.

pub mod control;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod summary;
