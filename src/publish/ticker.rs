//! Fixed-cadence publish loop
//!
//! Samples the joystick once per tick and hands the resulting command to the
//! configured publisher. Runs on its own tokio task until the shutdown watch
//! flips; the command in flight at that moment is not guaranteed delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use super::VelocityPublisher;
use crate::config::{MAX_RATE_HZ, MIN_RATE_HZ};
use crate::joystick::{JoystickHandle, TwistMessage};

/// Consecutive delivery failures before the loop starts warning
const FAILURE_WARN_THRESHOLD: u64 = 3;

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub ticks: u64,
    pub delivered: u64,
    pub failed: u64,
}

/// Periodic sampler that publishes the joystick velocity
pub struct PublishLoop {
    joystick: JoystickHandle,
    publisher: Arc<dyn VelocityPublisher>,
    topic: String,
    period: Duration,
}

impl PublishLoop {
    /// `rate_hz` is clamped to `MIN_RATE_HZ..=MAX_RATE_HZ`
    pub fn new(
        joystick: JoystickHandle,
        publisher: Arc<dyn VelocityPublisher>,
        topic: impl Into<String>,
        rate_hz: f64,
    ) -> Self {
        Self {
            joystick,
            publisher,
            topic: topic.into(),
            period: Duration::from_secs_f64(1.0 / rate_hz.clamp(MIN_RATE_HZ, MAX_RATE_HZ)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the loop on the current tokio runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<PublishStats> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run until `shutdown` becomes `true` or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> PublishStats {
        let mut stats = PublishStats::default();
        let mut consecutive_failures: u64 = 0;

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Publishing to '{}' via {} every {:.1} ms",
            self.topic,
            self.publisher.name(),
            self.period.as_secs_f64() * 1000.0
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped, stopping publish loop");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    stats.ticks += 1;
                    let msg = TwistMessage::planar(self.topic.as_str(), self.joystick.current_velocity());

                    match self.publisher.publish(&msg).await {
                        Ok(()) => {
                            stats.delivered += 1;
                            if consecutive_failures >= FAILURE_WARN_THRESHOLD {
                                info!(
                                    "{} publisher recovered after {} failed ticks",
                                    self.publisher.name(),
                                    consecutive_failures
                                );
                            }
                            consecutive_failures = 0;
                        }
                        Err(e) => {
                            stats.failed += 1;
                            consecutive_failures += 1;
                            if consecutive_failures == FAILURE_WARN_THRESHOLD {
                                warn!(
                                    "{} publisher failing ({} consecutive ticks): {:#}",
                                    self.publisher.name(),
                                    consecutive_failures,
                                    e
                                );
                            } else {
                                trace!("Publish error (attempt {}): {:#}", consecutive_failures, e);
                            }
                        }
                    }
                }
            }
        }

        if let Err(e) = self.publisher.shutdown().await {
            warn!("Failed to shut down {} publisher: {:#}", self.publisher.name(), e);
        }

        info!(
            "Publish loop stopped: {} ticks, {} delivered, {} failed",
            stats.ticks, stats.delivered, stats.failed
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlConfig, JoystickConfig};
    use crate::joystick::{EngagementState, PointerEventSink, PointerSample, Vector2};
    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        messages: Mutex<Vec<TwistMessage>>,
        shut_down: Mutex<bool>,
    }

    #[async_trait]
    impl VelocityPublisher for RecordingPublisher {
        fn name(&self) -> &str {
            "recording"
        }

        async fn publish(&self, msg: &TwistMessage) -> Result<()> {
            self.messages.lock().push(msg.clone());
            Ok(())
        }

        async fn shutdown(&self) -> Result<()> {
            *self.shut_down.lock() = true;
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl VelocityPublisher for FailingPublisher {
        fn name(&self) -> &str {
            "failing"
        }

        async fn publish(&self, _msg: &TwistMessage) -> Result<()> {
            anyhow::bail!("consumer unreachable")
        }
    }

    fn joystick() -> JoystickHandle {
        JoystickHandle::new(ControlConfig::new(&JoystickConfig::default()).unwrap())
    }

    #[test]
    fn test_period_from_rate() {
        let publish = PublishLoop::new(joystick(), Arc::new(FailingPublisher), "/t", 50.0);
        assert_eq!(publish.period(), Duration::from_millis(20));
    }

    #[test]
    fn test_period_stays_within_rate_bounds() {
        let fast = PublishLoop::new(joystick(), Arc::new(FailingPublisher), "/t", 1e12);
        assert_eq!(fast.period(), Duration::from_millis(1));

        let slow = PublishLoop::new(joystick(), Arc::new(FailingPublisher), "/t", 1e-300);
        assert_eq!(slow.period(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_current_velocity_each_tick() {
        let mut joystick = joystick();
        joystick.on_pointer_down(PointerSample::new(125.0, 125.0));
        joystick.on_pointer_move(PointerSample::new(195.0, 125.0));

        let recorder = Arc::new(RecordingPublisher::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = PublishLoop::new(joystick.clone(), recorder.clone(), "/turtle1/cmd_vel", 50.0)
            .spawn(shutdown_rx);

        // Ticks at 0, 20, 40, 60, 80, 100 ms
        tokio::time::sleep(Duration::from_millis(110)).await;
        shutdown_tx.send(true).unwrap();
        let stats = task.await.unwrap();

        let messages = recorder.messages.lock();
        assert_eq!(stats.ticks, messages.len() as u64);
        assert!(messages.len() >= 5 && messages.len() <= 7, "got {} ticks", messages.len());
        assert!(messages.iter().all(|m| m.topic == "/turtle1/cmd_vel"));
        assert!((messages[0].linear.x - 5.0).abs() < 1e-12);
        assert_eq!(messages[0].linear.y, 0.0);
        assert!(*recorder.shut_down.lock());
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_is_published_as_stop() {
        let mut joystick = joystick();
        joystick.on_pointer_down(PointerSample::new(125.0, 125.0));
        joystick.on_pointer_move(PointerSample::new(125.0, 90.0));

        let recorder = Arc::new(RecordingPublisher::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = PublishLoop::new(joystick.clone(), recorder.clone(), "/cmd_vel", 100.0)
            .spawn(shutdown_rx);

        tokio::time::sleep(Duration::from_millis(25)).await;
        joystick.on_pointer_up(PointerSample::new(125.0, 90.0));
        tokio::time::sleep(Duration::from_millis(25)).await;
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        let messages = recorder.messages.lock();
        assert!((messages[0].linear.y - 2.5).abs() < 1e-12);
        assert!(messages.last().unwrap().is_stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_touch_joystick_state() {
        let mut joystick = joystick();
        joystick.on_pointer_down(PointerSample::new(125.0, 125.0));
        joystick.on_pointer_move(PointerSample::new(140.0, 125.0));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = PublishLoop::new(joystick.clone(), Arc::new(FailingPublisher), "/t", 100.0)
            .spawn(shutdown_rx);

        tokio::time::sleep(Duration::from_millis(55)).await;
        shutdown_tx.send(true).unwrap();
        let stats = task.await.unwrap();

        assert!(stats.failed >= 5);
        assert_eq!(stats.delivered, 0);
        assert_eq!(joystick.state(), EngagementState::Dragging);
        assert_eq!(joystick.current_displacement_for_render(), Vector2::new(15.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_sender_stops_loop() {
        let recorder = Arc::new(RecordingPublisher::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = PublishLoop::new(joystick(), recorder.clone(), "/t", 60.0).spawn(shutdown_rx);

        drop(shutdown_tx);
        let stats = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("loop should stop")
            .unwrap();
        assert!(stats.ticks <= 1);
        assert!(*recorder.shut_down.lock());
    }
}
