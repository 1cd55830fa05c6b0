//! Placement decisions for the ds-sim client.
//!
//! Given a job and the session's server catalog, pick the server the job
//! should run on. The engine only reads the catalog; committing the
//! placement (local accounting and the `SCHD` exchange) belongs to the
//! session.
//!
//! # Components
//!
//! - **`algorithm`**: the selectable algorithms and their short names
//! - **`policy`**: the stateless selection rules (first/best/worst fit)
//! - **`round_robin`**: the largest-type round-robin cursor
//! - **`engine`**: ties an algorithm to its per-session state

pub mod algorithm;
pub mod engine;
pub mod policy;
pub mod round_robin;

pub use algorithm::{Algorithm, PlacementError};
pub use engine::PlacementEngine;
pub use round_robin::LargestRoundRobin;
