use anyhow::{Result, anyhow};

use gratchain::context::AppContext;
use gratchain::render;

pub fn run(ctx: &AppContext, reference: &str) -> Result<()> {
    let creator = ctx
        .directory
        .resolve(reference)
        .ok_or_else(|| anyhow!("指定されたcreatorが存在しません: {reference}"))?;

    println!("{}", render::creator_card(creator, false));
    println!("wallet={} avatar={}", creator.wallet_address, creator.avatar);
    Ok(())
}
