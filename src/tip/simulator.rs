use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::{SendTipCapability, TipError};
use crate::chain::amount::format_eth;
use crate::chain::{Address, Amount};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// Stand-in for a real transfer: waits, then reports success.
#[derive(Debug, Clone)]
pub struct SimulatedTipSender {
    delay: Duration,
    failing: HashSet<Address>,
}

impl SimulatedTipSender {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing: HashSet::new(),
        }
    }

    /// Tips to these recipients fail after the delay, for demoing partial batches.
    pub fn with_failing(mut self, recipients: impl IntoIterator<Item = Address>) -> Self {
        self.failing.extend(recipients);
        self
    }
}

impl Default for SimulatedTipSender {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl SendTipCapability for SimulatedTipSender {
    async fn send_tip(&self, recipient: Address, amount: Amount) -> Result<(), TipError> {
        tracing::debug!(%recipient, amount = %format_eth(amount), "simulating tip");
        tokio::time::sleep(self.delay).await;

        if self.failing.contains(&recipient) {
            return Err(TipError::Rejected(format!("simulated failure for {recipient}")));
        }
        Ok(())
    }
}
