//! UDP publisher - one JSON datagram per command

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::info;

use super::VelocityPublisher;
use crate::joystick::TwistMessage;

/// Sends each command as a JSON datagram to a fixed `host:port`
pub struct UdpPublisher {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpPublisher {
    /// Resolve `target` and bind an ephemeral local socket of the same family
    pub async fn connect(target: &str) -> Result<Self> {
        let target = lookup_host(target)
            .await
            .with_context(|| format!("Failed to resolve UDP target: {}", target))?
            .next()
            .with_context(|| format!("UDP target resolved to no addresses: {}", target))?;

        let bind_addr: SocketAddr = if target.is_ipv6() {
            "[::]:0".parse()?
        } else {
            "0.0.0.0:0".parse()?
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .with_context(|| format!("Failed to bind UDP socket on {}", bind_addr))?;
        socket
            .connect(target)
            .await
            .with_context(|| format!("Failed to connect UDP socket to {}", target))?;

        info!("UDP publisher sending to {}", target);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

#[async_trait]
impl VelocityPublisher for UdpPublisher {
    fn name(&self) -> &str {
        "udp"
    }

    async fn publish(&self, msg: &TwistMessage) -> Result<()> {
        let payload = serde_json::to_vec(msg).context("Failed to serialize velocity command")?;
        self.socket
            .send(&payload)
            .await
            .with_context(|| format!("Failed to send datagram to {}", self.target))?;
        Ok(())
    }
}
