//! Analytics core for the BloomWatch dashboards
//!
//! Pure, synchronous feature derivation and rule-based classification over
//! vegetation, soil and climate observations. Shared by the backend server
//! and, via WASM, by the dashboards themselves.
//!
//! ```text
//! RawObservation --validate--> Observation --derive--> DerivedRecord
//!     --classify--> ClassifiedRecord --> forecast / aggregate / export
//! ```

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod export;
pub mod features;
pub mod forecast;
pub mod models;
pub mod stats;
pub mod types;
pub mod validation;

pub use aggregate::*;
pub use classify::*;
pub use error::*;
pub use export::*;
pub use features::*;
pub use forecast::*;
pub use models::*;
pub use types::*;
pub use validation::*;
