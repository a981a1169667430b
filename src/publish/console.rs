//! Console publisher - logs velocity commands for testing and debugging

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::VelocityPublisher;
use crate::joystick::TwistMessage;

/// Logs every command at debug level and each change at info level.
///
/// Useful for trying the widget without a motion consumer attached.
pub struct ConsolePublisher {
    name: String,
    last: Mutex<Option<TwistMessage>>,
    publish_count: Mutex<u64>,
}

impl ConsolePublisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last: Mutex::new(None),
            publish_count: Mutex::new(0),
        }
    }

    pub fn publish_count(&self) -> u64 {
        *self.publish_count.lock()
    }
}

#[async_trait]
impl VelocityPublisher for ConsolePublisher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, msg: &TwistMessage) -> Result<()> {
        let count = {
            let mut count = self.publish_count.lock();
            *count += 1;
            *count
        };

        let changed = {
            let mut last = self.last.lock();
            let changed = last.as_ref() != Some(msg);
            if changed {
                *last = Some(msg.clone());
            }
            changed
        };

        if changed {
            info!(
                "🕹️  [{}] {} → linear=({:.3}, {:.3})",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                msg.topic,
                msg.linear.x,
                msg.linear.y
            );
        }

        debug!(
            publisher = %self.name,
            topic = %msg.topic,
            x = msg.linear.x,
            y = msg.linear.y,
            tick = count,
            "ConsolePublisher tick"
        );

        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        info!(
            "ConsolePublisher '{}' stopped after {} messages",
            self.name,
            self.publish_count()
        );
        Ok(())
    }
}
