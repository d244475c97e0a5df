//! Batch tipping: pick several creators, set an amount for each, then send
//! the tips one after another.

use std::collections::HashSet;

use crate::chain::Amount;
use crate::chain::amount::{DEFAULT_TIP, format_eth, parse_amount, step_down, step_up};
use crate::models::Creator;
use crate::notify::{Notification, Notifier};
use crate::tip::{SendTipCapability, TipError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTipItem {
    pub creator: Creator,
    pub amount: String,
    pub selected: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Please select at least one creator to tip")]
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to tip {creator_name}: {source}")]
pub struct SendFailed {
    pub creator_id: String,
    pub creator_name: String,
    #[source]
    pub source: TipError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub items: Vec<BatchTipItem>,
    pub total: Amount,
    /// Creator ids whose amount could not be parsed; they add nothing to `total`.
    pub invalid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: BatchTipItem,
    pub result: Result<(), SendFailed>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BatchTipItem> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| &o.item)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SendFailed> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchTipCoordinator {
    items: Vec<BatchTipItem>,
}

impl BatchTipCoordinator {
    /// Replaces any previous batch. Repeated creator ids keep the first entry.
    pub fn initialize(&mut self, creators: &[Creator]) {
        let mut seen = HashSet::new();
        self.items = creators
            .iter()
            .filter(|c| seen.insert(c.id.clone()))
            .map(|creator| BatchTipItem {
                creator: creator.clone(),
                amount: DEFAULT_TIP.to_string(),
                selected: false,
            })
            .collect();
        tracing::debug!(items = self.items.len(), "batch initialized");
    }

    pub fn items(&self) -> &[BatchTipItem] {
        &self.items
    }

    pub fn toggle_selection(&mut self, creator_id: &str) {
        if let Some(item) = self.item_mut(creator_id) {
            item.selected = !item.selected;
        }
    }

    /// Stored verbatim; parsing happens when totals are computed or tips sent.
    pub fn set_amount(&mut self, creator_id: &str, amount: &str) {
        if let Some(item) = self.item_mut(creator_id) {
            item.amount = amount.to_string();
        }
    }

    pub fn step_amount_up(&mut self, creator_id: &str) {
        if let Some(item) = self.item_mut(creator_id) {
            item.amount = step_up(&item.amount);
        }
    }

    pub fn step_amount_down(&mut self, creator_id: &str) {
        if let Some(item) = self.item_mut(creator_id) {
            item.amount = step_down(&item.amount);
        }
    }

    pub fn select_all(&mut self) {
        self.items.iter_mut().for_each(|item| item.selected = true);
    }

    pub fn deselect_all(&mut self) {
        self.items.iter_mut().for_each(|item| item.selected = false);
    }

    pub fn compute_selection(&self) -> Selection {
        let mut total = Amount::ZERO;
        let mut invalid = Vec::new();
        let items: Vec<BatchTipItem> = self.items.iter().filter(|i| i.selected).cloned().collect();

        for item in &items {
            match parse_amount(&item.amount) {
                Ok(wei) => total = total.saturating_add(wei),
                Err(_) => invalid.push(item.creator.id.clone()),
            }
        }

        Selection {
            items,
            total,
            invalid,
        }
    }

    /// Sends every selected tip in list order, one at a time. A failed tip is
    /// reported and skipped; the batch always runs to the end.
    pub async fn execute_batch(
        &self,
        sender: &dyn SendTipCapability,
        notifier: &mut dyn Notifier,
    ) -> Result<BatchReport, BatchError> {
        let selection = self.compute_selection();
        if selection.items.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        tracing::info!(
            count = selection.items.len(),
            total = %format_eth(selection.total),
            "batch tip started"
        );

        let mut outcomes = Vec::with_capacity(selection.items.len());
        for item in selection.items {
            let result = send_one(&item, sender).await;
            match &result {
                Ok(()) => notifier.notify(Notification::success(format!(
                    "Tipped {} {} ETH",
                    item.creator.name, item.amount
                ))),
                Err(failed) => {
                    tracing::error!(creator = %failed.creator_id, error = %failed.source, "batch tip item failed");
                    notifier.notify(Notification::error(format!(
                        "Failed to tip {}",
                        item.creator.name
                    )));
                }
            }
            outcomes.push(ItemOutcome { item, result });
        }

        // Counts every attempted creator, failed ones included.
        notifier.notify(Notification::success(format!(
            "Batch tip completed! Tipped {} creators",
            outcomes.len()
        )));

        let report = BatchReport { outcomes };
        tracing::info!(
            attempted = report.attempted(),
            failed = report.failures().count(),
            "batch tip finished"
        );
        Ok(report)
    }

    fn item_mut(&mut self, creator_id: &str) -> Option<&mut BatchTipItem> {
        self.items.iter_mut().find(|i| i.creator.id == creator_id)
    }
}

async fn send_one(item: &BatchTipItem, sender: &dyn SendTipCapability) -> Result<(), SendFailed> {
    let attempt = match parse_amount(&item.amount) {
        Ok(wei) => sender.send_tip(item.creator.wallet_address, wei).await,
        Err(err) => Err(TipError::from(err)),
    };
    attempt.map_err(|source| SendFailed {
        creator_id: item.creator.id.clone(),
        creator_name: item.creator.name.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::amount::STEP_WEI;
    use crate::directory::CreatorDirectory;
    use crate::notify::NotificationKind;
    use crate::tip::testing::RecordingSender;
    use alloy_primitives::U256;

    fn three_creators() -> Vec<Creator> {
        CreatorDirectory::builtin().all()[..3].to_vec()
    }

    fn coordinator() -> BatchTipCoordinator {
        let mut batch = BatchTipCoordinator::default();
        batch.initialize(&three_creators());
        batch
    }

    #[test]
    fn initialize_gives_one_unselected_item_per_creator() {
        let batch = coordinator();
        assert_eq!(batch.items().len(), 3);
        assert!(
            batch
                .items()
                .iter()
                .all(|i| !i.selected && i.amount == DEFAULT_TIP)
        );
    }

    #[test]
    fn initialize_replaces_previous_state_and_drops_duplicates() {
        let mut batch = coordinator();
        batch.select_all();
        batch.set_amount("creator-1", "0.5");

        let creators = CreatorDirectory::builtin().all().to_vec();
        let mut with_dup = vec![creators[4].clone(), creators[5].clone()];
        with_dup.push(creators[4].clone());
        batch.initialize(&with_dup);

        let ids: Vec<_> = batch.items().iter().map(|i| i.creator.id.as_str()).collect();
        assert_eq!(ids, ["creator-5", "creator-6"]);
        assert!(batch.compute_selection().items.is_empty());
    }

    #[test]
    fn toggle_flips_and_ignores_unknown_ids() {
        let mut batch = coordinator();
        batch.toggle_selection("creator-2");
        batch.toggle_selection("nobody");
        let selected: Vec<_> = batch
            .compute_selection()
            .items
            .into_iter()
            .map(|i| i.creator.id)
            .collect();
        assert_eq!(selected, ["creator-2"]);

        batch.toggle_selection("creator-2");
        assert!(batch.compute_selection().items.is_empty());
    }

    #[test]
    fn select_all_and_deselect_all() {
        let mut batch = coordinator();
        batch.select_all();
        assert_eq!(batch.compute_selection().items.len(), 3);
        batch.deselect_all();
        assert!(batch.compute_selection().items.is_empty());
    }

    #[test]
    fn total_covers_only_selected_items() {
        let mut batch = coordinator();
        batch.set_amount("creator-1", "0.010");
        batch.set_amount("creator-2", "0.25");
        batch.set_amount("creator-3", "1");
        batch.toggle_selection("creator-1");
        batch.toggle_selection("creator-3");

        let selection = batch.compute_selection();
        assert_eq!(selection.total, STEP_WEI * U256::from(1010u64));
        assert_eq!(format_eth(selection.total), "1.010");
        assert!(selection.invalid.is_empty());
    }

    #[test]
    fn unparsable_amount_is_listed_and_adds_nothing() {
        let mut batch = coordinator();
        batch.set_amount("creator-2", "lots");
        batch.select_all();

        let selection = batch.compute_selection();
        assert_eq!(selection.invalid, ["creator-2"]);
        assert_eq!(selection.total, STEP_WEI * U256::from(2u64));
    }

    #[test]
    fn steppers_update_amount_and_clamp() {
        let mut batch = coordinator();
        batch.step_amount_up("creator-1");
        batch.step_amount_down("creator-2");
        batch.step_amount_down("creator-2");
        assert_eq!(batch.items()[0].amount, "0.002");
        assert_eq!(batch.items()[1].amount, "0.000");
    }

    #[tokio::test]
    async fn empty_selection_sends_nothing() {
        let batch = coordinator();
        let sender = RecordingSender::default();
        let mut seen: Vec<Notification> = Vec::new();

        let result = batch.execute_batch(&sender, &mut seen).await;

        assert!(matches!(result, Err(BatchError::EmptySelection)));
        assert!(sender.recipients().is_empty());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn failed_item_does_not_stop_the_batch() {
        let creators = three_creators();
        let mut batch = coordinator();
        batch.select_all();
        let sender = RecordingSender::failing_for([creators[1].wallet_address]);
        let mut seen: Vec<Notification> = Vec::new();

        let report = batch.execute_batch(&sender, &mut seen).await.expect("batch");

        let expected: Vec<_> = creators.iter().map(|c| c.wallet_address).collect();
        assert_eq!(sender.recipients(), expected);
        assert_eq!(report.attempted(), 3);
        let failed: Vec<_> = report.failures().map(|f| f.creator_id.as_str()).collect();
        assert_eq!(failed, ["creator-2"]);
        assert_eq!(report.succeeded().count(), 2);

        let last = seen.last().expect("completion notice");
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "Batch tip completed! Tipped 3 creators");
        assert_eq!(seen[1], Notification::error("Failed to tip Maya Rodriguez"));
    }

    #[tokio::test]
    async fn sends_follow_list_order_not_selection_order() {
        let creators = CreatorDirectory::builtin().all().to_vec();
        let mut batch = BatchTipCoordinator::default();
        batch.initialize(&creators);
        batch.toggle_selection("creator-7");
        batch.toggle_selection("creator-2");
        batch.toggle_selection("creator-5");
        let sender = RecordingSender::default();
        let mut seen: Vec<Notification> = Vec::new();

        batch.execute_batch(&sender, &mut seen).await.expect("batch");

        let by_id = |id: &str| {
            creators
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.wallet_address)
                .expect("creator")
        };
        assert_eq!(
            sender.recipients(),
            vec![by_id("creator-2"), by_id("creator-5"), by_id("creator-7")]
        );
    }

    #[tokio::test]
    async fn invalid_amount_fails_that_item_without_a_send() {
        let mut batch = coordinator();
        batch.select_all();
        batch.set_amount("creator-1", "");
        let sender = RecordingSender::default();
        let mut seen: Vec<Notification> = Vec::new();

        let report = batch.execute_batch(&sender, &mut seen).await.expect("batch");

        assert_eq!(sender.recipients().len(), 2);
        let failure = report.failures().next().expect("one failure");
        assert!(matches!(failure.source, TipError::InvalidAmount(_)));
    }
}
