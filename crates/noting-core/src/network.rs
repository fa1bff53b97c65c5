//! Network reachability checks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

use crate::error::{Error, Result};

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1500;

/// Synchronous, side-effect-free reachability predicate
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Reachability switch set by the host (OS callbacks, tests, `--offline`)
#[derive(Clone, Debug)]
pub struct ConnectivityFlag(Arc<AtomicBool>);

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Considers the network up when a TCP connection to the remote host succeeds.
///
/// Probing is async and meant to run once up front; its answer seeds a
/// [`ConnectivityFlag`] so reconciliation never waits on a connect.
#[derive(Clone, Debug)]
pub struct TcpProbe {
    host: String,
    port: u16,
}

impl TcpProbe {
    /// Probe the host and port of an `http(s)` URL
    pub fn for_url(url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(url.trim())
            .map_err(|error| Error::Config(format!("invalid remote URL '{url}': {error}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::Config(format!("remote URL '{url}' has no host")))?
            .to_string();
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| Error::Config(format!("remote URL '{url}' has no port")))?;

        Ok(Self { host, port })
    }

    /// Whether the host accepts a TCP connection within the probe timeout
    pub async fn check(&self) -> bool {
        let limit = Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS);
        let target = (self.host.as_str(), self.port);
        match timeout(limit, async {
            for addr in lookup_host(target).await? {
                if TcpStream::connect(addr).await.is_ok() {
                    return Ok(true);
                }
            }
            Ok::<_, std::io::Error>(false)
        })
        .await
        {
            Ok(Ok(reachable)) => reachable,
            Ok(Err(error)) => {
                tracing::debug!("Could not resolve {}: {error}; treating as offline", self.host);
                false
            }
            Err(_) => {
                tracing::debug!("Probe of {} timed out; treating as offline", self.host);
                false
            }
        }
    }

    /// Probe once and freeze the answer into a flag
    pub async fn into_flag(self) -> ConnectivityFlag {
        ConnectivityFlag::new(self.check().await)
    }
}
