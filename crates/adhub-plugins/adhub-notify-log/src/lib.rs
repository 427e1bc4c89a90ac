//! # adhub-notify-log
//!
//! `Notifier` implementation that writes outbound messages to the log
//! instead of an SMS gateway. Meant for demos and local runs; a real
//! deployment swaps in a gateway-backed plugin.

use adhub_core::{Notifier, Result};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, message: &str) -> Result<()> {
        // Message bodies stay out of the log on purpose.
        tracing::info!(%to, length = message.len(), "outbound sms");
        Ok(())
    }
}
