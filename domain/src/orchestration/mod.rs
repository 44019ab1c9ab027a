//! Council orchestration domain
//!
//! Stage identifiers, council membership and the immutable result types
//! produced by one run of the pipeline.

pub mod entities;
pub mod value_objects;
