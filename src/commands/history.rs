use anyhow::Result;

use gratchain::db::Db;

pub fn run(db: &Db, creator_id: Option<&str>, limit: u32) -> Result<()> {
    let rows = match creator_id {
        Some(id) => db.history_by_creator(id)?,
        None => db.recent_tips(limit)?,
    };

    if rows.is_empty() {
        println!("履歴はまだありません: creator={}", creator_id.unwrap_or("*"));
        return Ok(());
    }

    for row in rows {
        let batch = row.batch_id.unwrap_or_else(|| "-".to_string());
        println!(
            "id={} creator={} ({}) amount={} ETH from={} to={} batch={} at={}",
            row.id,
            row.creator_name,
            row.creator_id,
            row.amount,
            row.sender,
            row.recipient,
            batch,
            row.created_at
        );
    }

    Ok(())
}
