//! Concurrent import pipeline
//!
//! # Architecture
//! - **Coordinator** ([`Pipeline`]): loads the inventory, spawns one
//!   [`RepositoryWorker`] per repository and exactly one [`ResultWriter`]
//! - **Workers**: per repository, sequential over files; every submission
//!   passes the shared rate gate and yields one outcome on the handoff
//! - **Writer**: drains the handoff and upserts each outcome
//!
//! # Error Handling
//! - Per-repository isolation: a failed scan-results query ends one worker
//! - Per-file isolation: a failed submission becomes a `success = false`
//!   outcome and the worker moves on
//! - Persistence failures are logged and counted; the writer keeps draining

pub mod coordinator;
pub mod worker;
pub mod writer;

pub use coordinator::{Pipeline, DEFAULT_HANDOFF_CAPACITY};
pub use worker::RepositoryWorker;
pub use writer::{ResultWriter, WriterReport};
