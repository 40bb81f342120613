//! Remote quote endpoint.
//!
//! The remote side of sync is a capability with two calls: list every quote
//! the server knows about, and create one (the server echoes what it
//! stored). [`SimulatedRemote`] stands in for a real server with a fixed
//! pair of quotes; latency is applied by the [`Reconciler`](super::Reconciler),
//! not here.

use crate::quotes::Quote;

/// A server holding quotes.
pub trait RemoteEndpoint: Send + Sync {
    /// Everything the server holds.
    fn list(&self) -> Vec<Quote>;

    /// Store a quote and return the server's copy.
    fn create(&self, quote: &Quote) -> Quote;
}

/// The quotes [`SimulatedRemote`] serves.
pub fn sample_remote_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Simplicity is the soul of efficiency.", "Work"),
        Quote::new("Whatever you are, be a good one.", "Life"),
    ]
}

/// In-process server that always lists the sample quotes and echoes creates.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRemote;

impl SimulatedRemote {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteEndpoint for SimulatedRemote {
    fn list(&self) -> Vec<Quote> {
        sample_remote_quotes()
    }

    fn create(&self, quote: &Quote) -> Quote {
        quote.clone()
    }
}
