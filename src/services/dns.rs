//! Captive DNS responder.
//!
//! Answers every `A`/`IN` question with the device address so any host name
//! a phone probes lands on the login page. Everything else gets an empty
//! answer section. The query is echoed back with the response bits set; no
//! name parsing is done beyond checking the trailing type/class.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const DNS_MAX_LEN: usize = 512;
const HEADER_LEN: usize = 12;
const TYPE_A_CLASS_IN: [u8; 4] = [0x00, 0x01, 0x00, 0x01];
const ANSWER_TTL_SECS: u32 = 10;
const RECV_BACKOFF_BASE: Duration = Duration::from_millis(50);
const RECV_BACKOFF_MAX: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("failed to bind DNS socket {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Build the reply for one query datagram, or `None` if it is shorter than
/// a DNS header.
#[must_use]
pub fn build_response(query: &[u8], ip: Ipv4Addr) -> Option<Vec<u8>> {
    if query.len() < HEADER_LEN {
        return None;
    }
    let mut response = Vec::with_capacity(DNS_MAX_LEN);
    response.extend_from_slice(query);
    // QR (response) and RA (recursion available).
    response[2] |= 0x80;
    response[3] |= 0x80;

    if query.ends_with(&TYPE_A_CLASS_IN) {
        response[7] = 1;
        // Name pointer to the question at offset 12, type A, class IN.
        response.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
        response.extend_from_slice(&ANSWER_TTL_SECS.to_be_bytes());
        response.extend_from_slice(&4u16.to_be_bytes());
        response.extend_from_slice(&ip.octets());
    } else {
        response[7] = 0;
    }
    Some(response)
}

/// Pause after the `failures`-th receive error in a row: doubles from 50 ms,
/// capped at 5 s.
#[must_use]
pub fn recv_backoff(failures: u32) -> Duration {
    let shift = failures.saturating_sub(1).min(16);
    RECV_BACKOFF_BASE.saturating_mul(1 << shift).min(RECV_BACKOFF_MAX)
}

/// Running responder task. Dropping it stops the task.
pub struct DnsServer {
    local_addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl DnsServer {
    /// Bind `addr` and start answering with `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Bind`] if the socket cannot be bound (port 53
    /// usually needs elevated privileges).
    pub async fn spawn(addr: SocketAddr, ip: Ipv4Addr) -> Result<Self, DnsError> {
        let socket = UdpSocket::bind(addr).await.map_err(|source| DnsError::Bind { addr, source })?;
        let local_addr = socket.local_addr().map_err(|source| DnsError::Bind { addr, source })?;
        let handle = tokio::spawn(serve(socket, ip));
        Ok(Self { local_addr, handle })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for DnsServer {
    fn drop(&mut self) {
        self.handle.abort();
        info!("DNS responder stopped");
    }
}

async fn serve(socket: UdpSocket, ip: Ipv4Addr) {
    let mut buf = [0u8; DNS_MAX_LEN];
    let mut failures = 0u32;
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => {
                failures = 0;
                received
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                let pause = recv_backoff(failures);
                error!(error = %e, failures, ?pause, "DNS receive failed");
                tokio::time::sleep(pause).await;
                continue;
            }
        };
        let Some(response) = build_response(&buf[..len], ip) else {
            warn!(%peer, len, "dropping short DNS packet");
            continue;
        };
        debug!(%peer, answered = response[7] == 1, "DNS query");
        if let Err(e) = socket.send_to(&response, peer).await {
            error!(%peer, error = %e, "DNS send failed");
        }
    }
}

#[cfg(test)]
#[path = "dns_test.rs"]
mod tests;
