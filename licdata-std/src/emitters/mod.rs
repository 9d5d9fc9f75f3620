//! Standard emitters.
//!
//! - [`TransportEmitter`]: hands events to a [`Transport`](licdata_core::Transport)
//! - [`LoggingEmitter`]: logs events without publishing them

mod logging;
mod transport;

pub use logging::LoggingEmitter;
pub use transport::TransportEmitter;
