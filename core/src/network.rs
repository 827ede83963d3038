//! Process-wide network lifecycle.
//!
//! # Design
//! `Network` is the explicit init/teardown bracket around every connection
//! the process makes. The standard library already initializes the platform
//! socket library on first use, so `init` has no platform work left to do;
//! what the handle adds is a single place that owns the lifetime and counts
//! live connections, which is how tests prove that a failed `connect` leaves
//! no socket behind.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::client::HttpClient;
use crate::connection::{ConnectOptions, Connection};
use crate::error::ClientError;

/// Handle to the initialized network subsystem.
///
/// Create one with `Network::init` before the first connection and drop it
/// after the last one.
#[derive(Debug)]
pub struct Network {
    live: Arc<AtomicUsize>,
}

impl Network {
    pub fn init() -> Self {
        debug!("network subsystem initialized");
        Self {
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of connections opened through this handle that are still alive.
    pub fn open_connections(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Connect to `host` on port 80.
    pub fn connect(&self, host: &str) -> Result<HttpClient, ClientError> {
        self.connect_with(host, &ConnectOptions::default())
    }

    pub fn connect_with(
        &self,
        host: &str,
        options: &ConnectOptions,
    ) -> Result<HttpClient, ClientError> {
        Connection::open(self, host, options).map(HttpClient::new)
    }

    pub(crate) fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live)
    }
}

impl Drop for Network {
    fn drop(&mut self) {
        let open = self.open_connections();
        if open > 0 {
            warn!("network subsystem torn down with {open} connection(s) still open");
        } else {
            debug!("network subsystem torn down");
        }
    }
}
