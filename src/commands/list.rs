use anyhow::{Context, Result};

use gratchain::context::AppContext;
use gratchain::models::Category;
use gratchain::render;

pub fn run(ctx: &AppContext, category: Option<Category>, json: bool) -> Result<()> {
    let creators = match category {
        Some(category) => ctx.directory.by_category(category),
        None => ctx.directory.all().to_vec(),
    };

    if json {
        let out = serde_json::to_string_pretty(&creators).context("JSON変換に失敗しました")?;
        println!("{out}");
        return Ok(());
    }

    println!("{}\n", render::hero());
    if !ctx.session.is_connected() {
        println!("{}", render::connect_prompt());
        return Ok(());
    }

    println!("Featured Creators\n");
    println!("{}", render::creator_grid(&creators, None));
    println!();
    println!("次: tip --creator <ID> または batch --all");
    Ok(())
}
