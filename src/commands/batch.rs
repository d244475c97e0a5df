use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};

use gratchain::batch::BatchTipCoordinator;
use gratchain::context::AppContext;
use gratchain::models::{Category, NewTip};
use gratchain::notify::ConsoleNotifier;
use gratchain::render;

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub category: Option<Category>,
    pub all: bool,
    pub select: Vec<String>,
    pub amounts: Vec<String>,
    pub step_up: Vec<String>,
    pub step_down: Vec<String>,
    pub dry_run: bool,
}

pub async fn run(ctx: &AppContext, opts: &BatchOptions) -> Result<()> {
    let account = ctx.session.require_account()?;

    let in_scope = match opts.category {
        Some(category) => ctx.directory.by_category(category),
        None => ctx.directory.all().to_vec(),
    };

    let mut batch = BatchTipCoordinator::default();
    batch.initialize(&in_scope);

    if opts.all {
        batch.select_all();
    }
    for id in &opts.select {
        ensure_in_batch(&batch, id)?;
        batch.toggle_selection(id);
    }
    for arg in &opts.amounts {
        let (id, amount) = parse_amount_arg(arg)?;
        ensure_in_batch(&batch, id)?;
        batch.set_amount(id, amount);
    }
    for id in &opts.step_up {
        ensure_in_batch(&batch, id)?;
        batch.step_amount_up(id);
    }
    for id in &opts.step_down {
        ensure_in_batch(&batch, id)?;
        batch.step_amount_down(id);
    }

    let selection = batch.compute_selection();
    println!("{}", render::batch_panel(batch.items(), &selection));
    if opts.dry_run {
        println!("次: --dry-run を外すと送信します");
        return Ok(());
    }

    let sender = ctx.sender()?;
    let mut notifier = ConsoleNotifier;
    let report = batch
        .execute_batch(sender.as_ref(), &mut notifier)
        .await
        .context("--all か --select <ID> でcreatorを選んでください")?;

    let batch_id = new_batch_id();
    let rows: Vec<NewTip> = report
        .succeeded()
        .map(|item| NewTip {
            creator_id: item.creator.id.clone(),
            creator_name: item.creator.name.clone(),
            sender: account,
            recipient: item.creator.wallet_address,
            amount: item.amount.trim().to_string(),
            batch_id: Some(batch_id.clone()),
        })
        .collect();
    let recorded = ctx.db.insert_tips(&rows);
    if let Err(err) = &recorded {
        tracing::error!(batch = %batch_id, error = %err, "batch tips not recorded");
    }

    let failed = report.failures().count();
    println!(
        "batch={batch_id} sent={} failed={failed}",
        report.attempted() - failed
    );
    recorded.context("送信済みtipを履歴に記録できませんでした")?;
    println!("次: history");
    Ok(())
}

fn ensure_in_batch(batch: &BatchTipCoordinator, creator_id: &str) -> Result<()> {
    if batch.items().iter().any(|i| i.creator.id == creator_id) {
        Ok(())
    } else {
        Err(anyhow!("バッチ対象にcreatorが存在しません: {creator_id}"))
    }
}

/// `creator-1=0.002`
fn parse_amount_arg(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .map(|(id, amount)| (id.trim(), amount.trim()))
        .filter(|(id, _)| !id.is_empty())
        .ok_or_else(|| anyhow!("--amount は <ID>=<ETH> の形式で指定してください: {arg}"))
}

fn new_batch_id() -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("batch-{ms}")
}
