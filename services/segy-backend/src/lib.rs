//! Line-oriented JSON backend for desktop front ends.
//!
//! [`serve`] reads one `{"endpoint", "params"}` request per stdin line and
//! answers with one JSON line on stdout. [`run_batch_command`] is the
//! one-shot batch mode used from scripts.

pub mod batch;
pub mod config;
pub mod protocol;
pub mod stdio;

pub use batch::run_batch_command;
pub use config::BackendConfig;
pub use protocol::{Backend, Reply, Request};
pub use stdio::serve;
