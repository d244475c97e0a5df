use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::chain::Address;
use crate::db::Db;
use crate::directory::CreatorDirectory;
use crate::tip::{
    SendTipCapability, SimulatedPermissionProvider, SimulatedTipSender, SpendPermissionSender,
};
use crate::wallet::WalletSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SenderKind {
    /// Wait, then pretend the tip went through.
    Simulated,
    /// Go through spend permissions (Base mainnet only).
    SpendPermission,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: String,
    pub creators_file: Option<PathBuf>,
    pub wallet: Option<String>,
    pub chain_id: u64,
    pub tip_delay: Duration,
    pub sender: SenderKind,
    pub fail_recipients: Vec<String>,
}

/// Everything a command needs, built once in `main`.
pub struct AppContext {
    pub db: Db,
    pub directory: CreatorDirectory,
    pub session: WalletSession,
    sender_kind: SenderKind,
    tip_delay: Duration,
    fail_recipients: Vec<String>,
}

impl AppContext {
    pub fn build(settings: &Settings) -> Result<Self> {
        let db = Db::open(&settings.db_path)?;

        let directory = match &settings.creators_file {
            Some(path) => CreatorDirectory::from_json_file(path)?,
            None => CreatorDirectory::builtin(),
        };

        let mut session = WalletSession::disconnected();
        if let Some(wallet) = &settings.wallet {
            session
                .connect(wallet, settings.chain_id)
                .context("ウォレットに接続できませんでした")?;
        }

        Ok(Self {
            db,
            directory,
            session,
            sender_kind: settings.sender,
            tip_delay: settings.tip_delay,
            fail_recipients: settings.fail_recipients.clone(),
        })
    }

    /// Built on demand so commands that never send do not depend on it.
    pub fn sender(&self) -> Result<Box<dyn SendTipCapability>> {
        self.session.require_account()?;

        match self.sender_kind {
            SenderKind::Simulated => {
                let failing = self
                    .fail_recipients
                    .iter()
                    .map(|raw| {
                        Address::from_str(raw)
                            .map_err(|_| anyhow!("アドレスの形式が不正です: {raw}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(
                    SimulatedTipSender::new(self.tip_delay).with_failing(failing),
                ))
            }
            SenderKind::SpendPermission => {
                let provider = SimulatedPermissionProvider::new(self.tip_delay);
                let sender = SpendPermissionSender::new(&self.session, provider)
                    .context("spend permissionを初期化できませんでした")?;
                Ok(Box::new(sender))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const ACCOUNT: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

    fn settings(db: &NamedTempFile, wallet: Option<&str>, chain_id: u64) -> Settings {
        Settings {
            db_path: db.path().to_str().expect("path string").to_string(),
            creators_file: None,
            wallet: wallet.map(ToString::to_string),
            chain_id,
            tip_delay: Duration::ZERO,
            sender: SenderKind::SpendPermission,
            fail_recipients: Vec::new(),
        }
    }

    #[test]
    fn spend_permission_off_base_still_builds_context() {
        let db = NamedTempFile::new().expect("tmp file");
        let ctx = AppContext::build(&settings(&db, Some(ACCOUNT), 84532)).expect("context");

        assert!(ctx.session.is_connected());
        assert!(ctx.sender().is_err());
    }

    #[test]
    fn spend_permission_without_wallet_builds_context_but_cannot_send() {
        let db = NamedTempFile::new().expect("tmp file");
        let ctx = AppContext::build(&settings(&db, None, 84532)).expect("context");

        assert!(!ctx.session.is_connected());
        assert!(ctx.sender().is_err());
    }

    #[test]
    fn spend_permission_on_base_gives_a_sender() {
        let db = NamedTempFile::new().expect("tmp file");
        let ctx = AppContext::build(&settings(&db, Some(ACCOUNT), 8453)).expect("context");
        assert!(ctx.sender().is_ok());
    }

    #[test]
    fn bad_fail_recipient_only_matters_when_sending() {
        let db = NamedTempFile::new().expect("tmp file");
        let mut settings = settings(&db, Some(ACCOUNT), 84532);
        settings.sender = SenderKind::Simulated;
        settings.fail_recipients = vec!["0x12".to_string()];

        let ctx = AppContext::build(&settings).expect("context");
        assert!(ctx.sender().is_err());
    }
}
