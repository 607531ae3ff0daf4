//! Business logic services for the BloomWatch analytics server

pub mod pipeline;

pub use pipeline::PipelineService;
