//! JSON lines publisher - one serialized command per line

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use super::VelocityPublisher;
use crate::joystick::TwistMessage;

/// Writes each command as a JSON object followed by `\n`.
///
/// With stdout as the sink, the joystick can be piped straight into another
/// process (`stick-gw | robot-bridge`).
pub struct JsonLinesPublisher<W> {
    writer: Mutex<W>,
}

impl JsonLinesPublisher<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> JsonLinesPublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> VelocityPublisher for JsonLinesPublisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        "json"
    }

    async fn publish(&self, msg: &TwistMessage) -> Result<()> {
        let mut line = serde_json::to_vec(msg).context("Failed to serialize velocity command")?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .context("Failed to write velocity command")?;
        writer.flush().await.context("Failed to flush velocity command")?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}
