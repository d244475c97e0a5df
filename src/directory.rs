use std::fs;
use std::path::Path;
use std::str::FromStr;

use alloy_primitives::address;
use anyhow::{Context, Result, anyhow};

use crate::chain::Address;
use crate::models::{Category, Creator, Socials};

/// Creators known to the app, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct CreatorDirectory {
    creators: Vec<Creator>,
}

impl CreatorDirectory {
    pub fn new(creators: Vec<Creator>) -> Self {
        Self { creators }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_creators())
    }

    /// Reads a JSON array of creators (`walletAddress`, `socials`, ... in camelCase).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("creatorファイルを読めませんでした: path={}", path.display()))?;
        let creators: Vec<Creator> = serde_json::from_str(&raw)
            .with_context(|| format!("creatorファイルのJSONが不正です: path={}", path.display()))?;
        if creators.is_empty() {
            return Err(anyhow!("creatorファイルが空です: path={}", path.display()));
        }
        tracing::debug!(count = creators.len(), path = %path.display(), "loaded creators");
        Ok(Self::new(creators))
    }

    pub fn all(&self) -> &[Creator] {
        &self.creators
    }

    pub fn by_id(&self, id: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.id == id)
    }

    /// Case-insensitive, like comparing lowercased hex strings.
    pub fn by_address(&self, address: &str) -> Option<&Creator> {
        let wanted = Address::from_str(address.trim()).ok()?;
        self.creators.iter().find(|c| c.wallet_address == wanted)
    }

    pub fn by_category(&self, category: Category) -> Vec<Creator> {
        self.creators
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect()
    }

    /// Resolves a CLI reference that may be either an id or a wallet address.
    pub fn resolve(&self, reference: &str) -> Option<&Creator> {
        self.by_id(reference).or_else(|| self.by_address(reference))
    }
}

#[allow(clippy::too_many_arguments)]
fn creator(
    id: &str,
    name: &str,
    username: &str,
    wallet_address: Address,
    bio: &str,
    avatar: &str,
    category: Category,
    socials: Socials,
) -> Creator {
    Creator {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        wallet_address,
        bio: bio.to_string(),
        avatar: avatar.to_string(),
        category,
        socials: Some(socials),
    }
}

fn socials(twitter: Option<&str>, farcaster: Option<&str>, github: Option<&str>) -> Socials {
    Socials {
        twitter: twitter.map(ToString::to_string),
        farcaster: farcaster.map(ToString::to_string),
        github: github.map(ToString::to_string),
    }
}

// Mock data until there is a registry to read from.
fn builtin_creators() -> Vec<Creator> {
    vec![
        creator(
            "creator-1",
            "Alex Chen",
            "@alexbuilds",
            address!("742d35Cc6634C0532925a3b844Bc9e7595f0bEb1"),
            "Building the future of decentralized social. Open source enthusiast and Base advocate.",
            "https://i.pravatar.cc/150?img=1",
            Category::Developer,
            socials(Some("alexbuilds"), None, Some("alexchen")),
        ),
        creator(
            "creator-2",
            "Maya Rodriguez",
            "@mayaart",
            address!("8d12A197cB00D4747a1fe03395095ce2A5CC6819"),
            "Digital artist exploring the intersection of AI and blockchain. NFT creator.",
            "https://i.pravatar.cc/150?img=5",
            Category::Artist,
            socials(Some("mayaart"), Some("maya"), None),
        ),
        creator(
            "creator-3",
            "Dev Patel",
            "@devonchain",
            address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
            "Smart contract security researcher. Making onchain safer, one audit at a time.",
            "https://i.pravatar.cc/150?img=12",
            Category::Developer,
            socials(Some("devonchain"), None, Some("devpatel")),
        ),
        creator(
            "creator-4",
            "Luna Brooks",
            "@lunawrits",
            address!("90F79bf6EB2c4f870365E785982E1f101E93b906"),
            "Web3 writer and educator. Simplifying crypto for everyone. Check out my newsletter!",
            "https://i.pravatar.cc/150?img=9",
            Category::Writer,
            socials(Some("lunawrits"), Some("luna"), None),
        ),
        creator(
            "creator-5",
            "Sam Johnson",
            "@samcodes",
            address!("15d34AAf54267DB7D7c367839AAf71A00a2C6A65"),
            "Full-stack dev building cool apps on Base. Creator of popular DeFi tools.",
            "https://i.pravatar.cc/150?img=33",
            Category::Developer,
            socials(Some("samcodes"), None, Some("samjohnson")),
        ),
        creator(
            "creator-6",
            "Zara Kim",
            "@zara3d",
            address!("9965507D1a55bcC2695C58ba16FB37d819B0A4dc"),
            "3D artist and metaverse builder. Creating immersive onchain experiences.",
            "https://i.pravatar.cc/150?img=20",
            Category::Artist,
            socials(Some("zara3d"), None, None),
        ),
        creator(
            "creator-7",
            "Marcus Lee",
            "@marcusmusic",
            address!("976EA74026E726554dB657fA54763abd0C3a0aa9"),
            "Electronic music producer. Releasing music as NFTs. Support independent artists!",
            "https://i.pravatar.cc/150?img=68",
            Category::Other,
            socials(Some("marcusmusic"), Some("marcus"), None),
        ),
        creator(
            "creator-8",
            "Priya Singh",
            "@priyateaches",
            address!("14dC79964da2C08b23698B3D3cc7Ca32193d9955"),
            "Educator creating free blockchain courses. Teaching the next generation of builders.",
            "https://i.pravatar.cc/150?img=45",
            Category::Other,
            socials(Some("priyateaches"), None, Some("priyasingh")),
        ),
    ]
}
