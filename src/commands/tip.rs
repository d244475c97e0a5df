use anyhow::{Result, anyhow};

use gratchain::chain::amount::parse_amount;
use gratchain::context::AppContext;
use gratchain::models::NewTip;
use gratchain::notify::ConsoleNotifier;
use gratchain::render;
use gratchain::tip::TipDesk;

pub async fn run(ctx: &AppContext, reference: &str, amount: &str) -> Result<()> {
    let account = ctx.session.require_account()?;
    let creator = ctx
        .directory
        .resolve(reference)
        .ok_or_else(|| anyhow!("指定されたcreatorが存在しません: {reference}"))?;
    parse_amount(amount)?;
    let sender = ctx.sender()?;

    let mut desk = TipDesk::default();
    println!("{}", render::creator_card(creator, true));

    let mut notifier = ConsoleNotifier;
    desk.tip(creator, amount, sender.as_ref(), &mut notifier).await?;

    let id = ctx.db.insert_tip(&NewTip {
        creator_id: creator.id.clone(),
        creator_name: creator.name.clone(),
        sender: account,
        recipient: creator.wallet_address,
        amount: amount.trim().to_string(),
        batch_id: None,
    })?;
    tracing::debug!(tip_id = id, "tip recorded");
    println!("次: history --creator {}", creator.id);
    Ok(())
}
