pub mod desk;
pub mod simulator;
pub mod spend_permission;

use async_trait::async_trait;

use crate::chain::amount::AmountError;
use crate::chain::{Address, Amount};
use crate::wallet::WalletError;

pub use desk::TipDesk;
pub use simulator::SimulatedTipSender;
pub use spend_permission::{SimulatedPermissionProvider, SpendPermissionSender};

/// Every variant is surfaced to the user the same way: the tip did not go out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TipError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("invalid tip amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("tip sender unavailable: {0}")]
    Unavailable(String),
    #[error("tip rejected: {0}")]
    Rejected(String),
    #[error("tip provider error: {0}")]
    Provider(String),
}

impl From<WalletError> for TipError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotConnected => TipError::NotConnected,
            other => TipError::Unavailable(other.to_string()),
        }
    }
}

/// Moves value from the connected account to a creator.
#[async_trait]
pub trait SendTipCapability: Send + Sync {
    async fn send_tip(&self, recipient: Address, amount: Amount) -> Result<(), TipError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Records every call in order and fails for the configured recipients.
    #[derive(Default)]
    pub struct RecordingSender {
        pub calls: Mutex<Vec<(Address, Amount)>>,
        pub failing: HashSet<Address>,
    }

    impl RecordingSender {
        pub fn failing_for(recipients: impl IntoIterator<Item = Address>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: recipients.into_iter().collect(),
            }
        }

        pub fn recipients(&self) -> Vec<Address> {
            self.calls
                .lock()
                .expect("calls lock")
                .iter()
                .map(|(to, _)| *to)
                .collect()
        }
    }

    #[async_trait]
    impl SendTipCapability for RecordingSender {
        async fn send_tip(&self, recipient: Address, amount: Amount) -> Result<(), TipError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((recipient, amount));
            if self.failing.contains(&recipient) {
                return Err(TipError::Rejected("user rejected the request".to_string()));
            }
            Ok(())
        }
    }
}
