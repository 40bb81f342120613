//! Reconciliation with a remote quote endpoint.
//!
//! - [`Reconciler::pull`] fetches the remote list and merges quotes whose
//!   text is not held locally
//! - [`Reconciler::push`] sends one quote and re-inserts the server's copy
//!   if it is missing locally
//! - [`start_polling`] runs a Pull every poll interval until stopped
//!
//! Pull and Push complete after a simulated latency on the tokio runtime;
//! both return a [`JoinHandle`](tokio::task::JoinHandle) the caller may
//! await or drop.

pub mod reconciler;
pub mod remote;
pub mod scheduler;

pub use reconciler::{merge_remote, PullReport, PushOutcome, Reconciler, DEFAULT_REMOTE_LATENCY};
pub use remote::{sample_remote_quotes, RemoteEndpoint, SimulatedRemote};
pub use scheduler::{start_polling, PollHandle, DEFAULT_POLL_INTERVAL};
