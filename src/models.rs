use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Artist,
    Developer,
    Writer,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Artist => "artist",
            Category::Developer => "developer",
            Category::Writer => "writer",
            Category::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farcaster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub username: String,
    pub wallet_address: Address,
    pub bio: String,
    pub avatar: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,
}

#[derive(Debug, Clone)]
pub struct NewTip {
    pub creator_id: String,
    pub creator_name: String,
    pub sender: Address,
    pub recipient: Address,
    pub amount: String,
    pub batch_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TipRecord {
    pub id: i64,
    pub creator_id: String,
    pub creator_name: String,
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub batch_id: Option<String>,
    pub created_at: String,
}
