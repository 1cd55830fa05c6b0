//! Core types for the ds-sim scheduling client.
//!
//! These mirror the simulator-side objects the client needs to reason about
//! placement:
//!
//! - **`resources`**: the `(cores, memory, disk)` capacity triple
//! - **`job`**: a job record and its current server binding
//! - **`server`**: a server with its assigned jobs and derived free capacity
//! - **`catalog`**: the ordered, fixed set of servers for one session
//! - **`config`**: client configuration (`dsclient.toml`)

pub mod catalog;
pub mod config;
pub mod job;
pub mod resources;
pub mod server;

pub use catalog::Catalog;
pub use config::ClientConfig;
pub use job::{ArrivalKind, Job, JobId};
pub use resources::{Dominance, ResourceVector};
pub use server::{Server, ServerId};
