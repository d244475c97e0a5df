use super::{SendTipCapability, TipError};
use crate::chain::amount::parse_amount;
use crate::models::Creator;
use crate::notify::{Notification, Notifier};

/// Single-creator tip action behind each card's button.
#[derive(Debug, Default)]
pub struct TipDesk {
    loading_creator_id: Option<String>,
}

impl TipDesk {
    pub fn loading_creator_id(&self) -> Option<&str> {
        self.loading_creator_id.as_deref()
    }

    pub fn is_loading(&self, creator_id: &str) -> bool {
        self.loading_creator_id.as_deref() == Some(creator_id)
    }

    pub async fn tip(
        &mut self,
        creator: &Creator,
        amount: &str,
        sender: &dyn SendTipCapability,
        notifier: &mut dyn Notifier,
    ) -> Result<(), TipError> {
        let _loading = Loading::start(&mut self.loading_creator_id, &creator.id);

        let result = match parse_amount(amount) {
            Ok(wei) => sender.send_tip(creator.wallet_address, wei).await,
            Err(err) => Err(err.into()),
        };

        match &result {
            Ok(()) => {
                notifier.notify(Notification::success(format!(
                    "Successfully tipped {}! 🎉",
                    creator.name
                )));
            }
            Err(err) => {
                tracing::error!(creator = %creator.id, error = %err, "tip failed");
                notifier.notify(Notification::error("Failed to send tip. Please try again."));
            }
        }

        result
    }
}

/// Clears the loading flag however the tip ends, including a dropped future.
struct Loading<'a>(&'a mut Option<String>);

impl<'a> Loading<'a> {
    fn start(slot: &'a mut Option<String>, creator_id: &str) -> Self {
        *slot = Some(creator_id.to_string());
        Self(slot)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        *self.0 = None;
    }
}
