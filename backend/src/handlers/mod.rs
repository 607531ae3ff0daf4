//! HTTP handlers for the BloomWatch API

pub mod classify;
pub mod export;
pub mod forecast;
pub mod health;
pub mod pipeline;
pub mod reports;

pub use classify::*;
pub use export::*;
pub use forecast::*;
pub use health::*;
pub use pipeline::*;
pub use reports::*;
