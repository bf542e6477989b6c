//! The computed launch plan.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::{NonZeroU16, NonZeroU64, NonZeroUsize};

use serde::Serialize;

/// Port used when no valid `PORT` override is present.
pub const DEFAULT_PORT: NonZeroU16 = match NonZeroU16::new(8000) {
    Some(port) => port,
    None => unreachable!(),
};

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: NonZeroU64 = match NonZeroU64::new(300) {
    Some(secs) => secs,
    None => unreachable!(),
};

/// Wildcard bind address (all interfaces).
pub const WILDCARD_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Worker pool launch settings, computed once at startup.
///
/// Fields are private: a plan only comes out of
/// [`compute_plan`](super::compute_plan) and is never edited afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LaunchPlan {
    worker_count: NonZeroUsize,
    bind_host: IpAddr,
    port: NonZeroU16,
    request_timeout_secs: NonZeroU64,
}

impl LaunchPlan {
    pub(super) fn new(
        worker_count: NonZeroUsize,
        port: NonZeroU16,
        request_timeout_secs: NonZeroU64,
    ) -> Self {
        Self {
            worker_count,
            bind_host: WILDCARD_HOST,
            port,
            request_timeout_secs,
        }
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count.get()
    }

    #[inline]
    pub fn bind_host(&self) -> IpAddr {
        self.bind_host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port.get()
    }

    #[inline]
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.get()
    }

    /// Bind host and port as a socket address (`0.0.0.0:8000`).
    #[inline]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port.get())
    }
}
