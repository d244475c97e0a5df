use std::fmt;
use std::str::FromStr;

use crate::chain::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Base,
    BaseSepolia,
}

impl Network {
    pub const SUPPORTED: [Network; 2] = [Network::BaseSepolia, Network::Base];

    pub fn chain_id(self) -> u64 {
        match self {
            Network::Base => 8453,
            Network::BaseSepolia => 84532,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Network::Base => "Base",
            Network::BaseSepolia => "Base Sepolia",
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|n| n.chain_id() == chain_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.chain_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("wrong network: chain id {0} is not supported, switch to Base Sepolia or Base")]
    WrongNetwork(u64),
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Connection {
    account: Address,
    network: Network,
}

/// Connected account and network, handed explicitly to whoever needs them.
#[derive(Debug, Clone, Default)]
pub struct WalletSession {
    connection: Option<Connection>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, account: &str, chain_id: u64) -> Result<(), WalletError> {
        let account = Address::from_str(account.trim())
            .map_err(|_| WalletError::InvalidAddress(account.to_string()))?;
        let network = Network::from_chain_id(chain_id).ok_or(WalletError::WrongNetwork(chain_id))?;
        tracing::info!(account = %account, network = %network, "wallet connected");
        self.connection = Some(Connection { account, network });
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            tracing::info!(account = %conn.account, "wallet disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.connection.map(|c| c.account)
    }

    pub fn network(&self) -> Option<Network> {
        self.connection.map(|c| c.network)
    }

    pub fn require_account(&self) -> Result<Address, WalletError> {
        self.account().ok_or(WalletError::NotConnected)
    }
}

/// `0x742d...bEb1`
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
