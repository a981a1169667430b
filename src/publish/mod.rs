//! Velocity publishers (console, JSON lines, UDP)
//!
//! A publisher receives one [`TwistMessage`] per tick from the
//! [`PublishLoop`]. Delivery failures stay inside the publish path: they are
//! logged and counted, and never reach the joystick core.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{PublisherConfig, PublisherKind};
use crate::joystick::TwistMessage;

pub mod console;
pub mod json_lines;
pub mod ticker;
pub mod udp;

pub use console::ConsolePublisher;
pub use json_lines::JsonLinesPublisher;
pub use ticker::{PublishLoop, PublishStats};
pub use udp::UdpPublisher;

/// Publisher trait - every output transport implements this
///
/// Methods take `&self` so a publisher can live behind `Arc<dyn VelocityPublisher>`;
/// implementations use interior mutability for their own state.
#[async_trait]
pub trait VelocityPublisher: Send + Sync {
    /// Publisher name for logs (e.g. "console", "udp")
    fn name(&self) -> &str;

    /// Deliver one velocity command
    async fn publish(&self, msg: &TwistMessage) -> Result<()>;

    /// Release transport resources
    ///
    /// Default implementation: nothing to release
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Build the publisher selected in the configuration
pub async fn from_config(config: &PublisherConfig) -> Result<Arc<dyn VelocityPublisher>> {
    let publisher: Arc<dyn VelocityPublisher> = match config.kind {
        PublisherKind::Console => Arc::new(ConsolePublisher::new("console")),
        PublisherKind::Json => Arc::new(JsonLinesPublisher::stdout()),
        PublisherKind::Udp => {
            let target = config
                .udp_target
                .as_deref()
                .context("publisher.udp_target is required for the udp publisher")?;
            Arc::new(UdpPublisher::connect(target).await?)
        }
    };
    Ok(publisher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_selects_backend() -> Result<()> {
        let mut config = PublisherConfig::default();
        assert_eq!(from_config(&config).await?.name(), "console");

        config.kind = PublisherKind::Json;
        assert_eq!(from_config(&config).await?.name(), "json");

        config.kind = PublisherKind::Udp;
        assert!(from_config(&config).await.is_err());

        config.udp_target = Some("127.0.0.1:9870".to_string());
        assert_eq!(from_config(&config).await?.name(), "udp");
        Ok(())
    }
}
