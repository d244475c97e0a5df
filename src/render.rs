//! Plain-text versions of the creator cards, grid and batch panel.

use std::fmt::Write;

use crate::batch::{BatchTipItem, Selection};
use crate::chain::amount::{DEFAULT_TIP, format_eth};
use crate::models::Creator;
use crate::wallet::truncate_address;

pub fn hero() -> String {
    [
        "Tip Seamlessly Onchain",
        "Support creators with zero-popup tipping powered by Base.",
        "",
        "  * Zero Pop-ups     tip multiple creators without repeated wallet confirmations",
        "  * Batch Tipping    tip multiple creators in one go",
        "  * Support Creators empower artists, devs, and writers with onchain value",
    ]
    .join("\n")
}

pub fn connect_prompt() -> &'static str {
    "Connect to See Creators: pass --wallet <ADDRESS> (or set GRATCHAIN_WALLET) to discover and tip creators on Base."
}

pub fn social_links(creator: &Creator) -> Vec<String> {
    let Some(socials) = &creator.socials else {
        return Vec::new();
    };
    let mut links = Vec::new();
    if let Some(handle) = &socials.twitter {
        links.push(format!("https://twitter.com/{handle}"));
    }
    if let Some(handle) = &socials.github {
        links.push(format!("https://github.com/{handle}"));
    }
    if let Some(handle) = &socials.farcaster {
        links.push(format!("https://warpcast.com/{handle}"));
    }
    links
}

pub fn creator_card(creator: &Creator, loading: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "┌ {} {} [{}]", creator.name, creator.username, creator.category);
    let _ = writeln!(out, "│ {}", creator.bio);
    for link in social_links(creator) {
        let _ = writeln!(out, "│ {link}");
    }
    let action = if loading {
        "Tipping...".to_string()
    } else {
        format!("Tip {DEFAULT_TIP} ETH")
    };
    let _ = writeln!(out, "│ [{action}]  id={}", creator.id);
    let _ = write!(out, "└ {}", truncate_address(&creator.wallet_address));
    out
}

pub fn creator_grid(creators: &[Creator], loading_creator_id: Option<&str>) -> String {
    if creators.is_empty() {
        return "No creators found".to_string();
    }
    creators
        .iter()
        .map(|c| creator_card(c, loading_creator_id == Some(c.id.as_str())))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn batch_panel(items: &[BatchTipItem], selection: &Selection) -> String {
    let mut out = String::from("Batch Tipping: tip multiple creators at once\n");
    for item in items {
        let mark = if item.selected { "x" } else { " " };
        let _ = writeln!(
            out,
            "[{mark}] {:<16} {:<14} {:>8} ETH",
            item.creator.name, item.creator.username, item.amount
        );
    }
    let _ = writeln!(out, "Selected: {} creators", selection.items.len());
    let _ = write!(out, "Total: {} ETH", format_eth(selection.total));
    if !selection.invalid.is_empty() {
        let _ = write!(out, "\nInvalid amounts: {}", selection.invalid.join(", "));
    }
    out
}
