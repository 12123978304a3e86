//! Input/output helpers.
//!
//! - snapshot retrieval from files, stdin, or HTTP (`fetch`)
//! - JSON/CSV parsing into domain types (`ingest`)
//! - chart HTML and simulation JSON exports (`export`)

pub mod export;
pub mod fetch;
pub mod ingest;

pub use export::*;
pub use fetch::*;
pub use ingest::*;
