//! Tipping through spend permissions: one approval, then repeated transfers
//! to the same recipient without a wallet prompt each time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::utils::format_ether;
use async_trait::async_trait;

use super::{SendTipCapability, TipError};
use crate::chain::amount::format_eth;
use crate::chain::{Address, Amount};
use crate::wallet::{Network, WalletSession};

pub const PERMISSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
pub const NATIVE_TOKEN: &str = "native";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendPermission {
    pub id: String,
    pub amount: String,
    pub recipient: Address,
    pub token: String,
    pub expires_at_ms: u64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    pub account: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub token: String,
    pub description: String,
    pub expires_at_ms: u64,
}

/// The account SDK side of spend permissions.
#[async_trait]
pub trait SpendPermissionProvider: Send + Sync {
    /// Returns the id of the new permission.
    async fn create(&self, request: &PermissionRequest) -> Result<String, TipError>;
    async fn revoke(&self, id: &str) -> Result<(), TipError>;
    async fn execute(&self, id: &str, recipient: Address, amount: Amount) -> Result<(), TipError>;
}

pub struct SpendPermissionSender<P> {
    account: Address,
    provider: P,
    permissions: Mutex<Vec<SpendPermission>>,
}

impl<P: SpendPermissionProvider> SpendPermissionSender<P> {
    /// Only available for a connected wallet on Base mainnet.
    pub fn new(session: &WalletSession, provider: P) -> Result<Self, TipError> {
        let account = session.require_account()?;
        if session.network() != Some(Network::Base) {
            return Err(TipError::Unavailable(format!(
                "spend permissions need {}",
                Network::Base
            )));
        }
        Ok(Self {
            account,
            provider,
            permissions: Mutex::new(Vec::new()),
        })
    }

    pub fn permissions(&self) -> Vec<SpendPermission> {
        self.lock().clone()
    }

    pub fn has_active_permissions(&self) -> bool {
        self.lock().iter().any(|p| p.is_active)
    }

    pub async fn create_permission(
        &self,
        amount: Amount,
        recipient: Address,
    ) -> Result<SpendPermission, TipError> {
        let request = PermissionRequest {
            account: self.account,
            recipient,
            amount,
            token: NATIVE_TOKEN.to_string(),
            description: format!("Auto-tip permission for {recipient}"),
            expires_at_ms: now_ms().saturating_add(PERMISSION_TTL.as_millis() as u64),
        };
        let id = self.provider.create(&request).await?;

        let permission = SpendPermission {
            id,
            amount: format_ether(amount),
            recipient,
            token: request.token,
            expires_at_ms: request.expires_at_ms,
            is_active: true,
        };
        tracing::info!(id = %permission.id, %recipient, "spend permission created");
        self.lock().push(permission.clone());
        Ok(permission)
    }

    pub async fn revoke_permission(&self, id: &str) -> Result<(), TipError> {
        self.provider.revoke(id).await?;
        self.lock().retain(|p| p.id != id);
        tracing::info!(%id, "spend permission revoked");
        Ok(())
    }

    fn active_for(&self, recipient: Address) -> Option<String> {
        self.lock()
            .iter()
            .find(|p| p.is_active && p.recipient == recipient)
            .map(|p| p.id.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SpendPermission>> {
        self.permissions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<P: SpendPermissionProvider> SendTipCapability for SpendPermissionSender<P> {
    async fn send_tip(&self, recipient: Address, amount: Amount) -> Result<(), TipError> {
        let id = match self.active_for(recipient) {
            Some(id) => id,
            None => self.create_permission(amount, recipient).await?.id,
        };
        self.provider.execute(&id, recipient, amount).await
    }
}

/// Issues sequential permission ids after a delay; nothing is signed.
#[derive(Debug)]
pub struct SimulatedPermissionProvider {
    delay: Duration,
    next_id: AtomicU64,
}

impl SimulatedPermissionProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl SpendPermissionProvider for SimulatedPermissionProvider {
    async fn create(&self, request: &PermissionRequest) -> Result<String, TipError> {
        tokio::time::sleep(self.delay).await;
        let id = format!("perm-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, description = %request.description, "simulated permission");
        Ok(id)
    }

    async fn revoke(&self, _id: &str) -> Result<(), TipError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn execute(&self, id: &str, recipient: Address, amount: Amount) -> Result<(), TipError> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(%id, %recipient, amount = %format_eth(amount), "simulated spend");
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::chain::amount::{STEP_WEI, parse_amount};

    const ACCOUNT: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

    #[derive(Default)]
    struct FakeProvider {
        log: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpendPermissionProvider for FakeProvider {
        async fn create(&self, _request: &PermissionRequest) -> Result<String, TipError> {
            let mut log = self.log.lock().expect("log");
            let id = format!("p{}", log.len());
            log.push(format!("create {id}"));
            Ok(id)
        }

        async fn revoke(&self, id: &str) -> Result<(), TipError> {
            self.log.lock().expect("log").push(format!("revoke {id}"));
            Ok(())
        }

        async fn execute(&self, id: &str, _recipient: Address, _amount: Amount) -> Result<(), TipError> {
            self.log.lock().expect("log").push(format!("execute {id}"));
            Ok(())
        }
    }

    fn session(chain_id: u64) -> WalletSession {
        let mut session = WalletSession::disconnected();
        session.connect(ACCOUNT, chain_id).expect("connect");
        session
    }

    fn recipient() -> Address {
        Address::from_str("0x14dC79964da2C08b23698B3D3cc7Ca32193d9955").expect("address")
    }

    #[test]
    fn requires_base_mainnet() {
        let err = SpendPermissionSender::new(&session(84532), FakeProvider::default()).err();
        assert!(matches!(err, Some(TipError::Unavailable(_))));

        let err = SpendPermissionSender::new(&WalletSession::disconnected(), FakeProvider::default()).err();
        assert_eq!(err, Some(TipError::NotConnected));
    }

    #[tokio::test]
    async fn reuses_active_permission_for_same_recipient() {
        let sender = SpendPermissionSender::new(&session(8453), FakeProvider::default())
            .expect("sender");

        sender.send_tip(recipient(), STEP_WEI).await.expect("first tip");
        sender.send_tip(recipient(), STEP_WEI).await.expect("second tip");

        let log = sender.provider.log.lock().expect("log").clone();
        assert_eq!(log, ["create p0", "execute p0", "execute p0"]);
        assert!(sender.has_active_permissions());
        let permissions = sender.permissions();
        assert_eq!(permissions.len(), 1);
        assert_eq!(parse_amount(&permissions[0].amount), Ok(STEP_WEI));
        assert_eq!(permissions[0].token, NATIVE_TOKEN);
    }

    #[tokio::test]
    async fn permission_keeps_sub_milli_amounts_exact() {
        let sender = SpendPermissionSender::new(&session(8453), FakeProvider::default())
            .expect("sender");
        let tiny = parse_amount("0.0004").expect("amount");

        let permission = sender.create_permission(tiny, recipient()).await.expect("create");

        assert_eq!(parse_amount(&permission.amount), Ok(tiny));
        assert_ne!(permission.amount, "0.000");
    }

    #[tokio::test]
    async fn revoke_drops_the_permission() {
        let sender = SpendPermissionSender::new(&session(8453), FakeProvider::default())
            .expect("sender");
        let permission = sender
            .create_permission(STEP_WEI, recipient())
            .await
            .expect("create");

        sender.revoke_permission(&permission.id).await.expect("revoke");

        assert!(!sender.has_active_permissions());
        assert!(sender.permissions().is_empty());
    }

    #[tokio::test]
    async fn simulated_provider_numbers_permissions() {
        let sender = SpendPermissionSender::new(
            &session(8453),
            SimulatedPermissionProvider::new(Duration::ZERO),
        )
        .expect("sender");
        let first = sender.create_permission(STEP_WEI, recipient()).await.expect("create");
        assert_eq!(first.id, "perm-1");
        assert!(first.expires_at_ms > now_ms());
    }
}
