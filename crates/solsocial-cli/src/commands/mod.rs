//! Subcommand implementations and the shared app bootstrap.

pub mod comments;
pub mod config;
pub mod receipt;
pub mod watch;

use anyhow::Context;
use async_lock::RwLock;
use solsocial_app::workflows::restore_persisted;
use solsocial_app::{AppCore, AppEffects};
use solsocial_core::effects::SystemClock;
use solsocial_core::{ClientConfig, ContentId, ContentRef, WalletAddress};
use solsocial_transport::{FileStorage, HttpSocialApi};
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub config_path: PathBuf,
    pub overrides: Vec<String>,
    pub wallet: Option<String>,
}

/// Defaults, then the file if present, then `SOLSOCIAL_*`, then `--set`.
pub fn load_config(opts: &GlobalOpts) -> anyhow::Result<ClientConfig> {
    let mut config = if opts.config_path.exists() {
        ClientConfig::load_from_file(&opts.config_path)?
    } else {
        tracing::debug!(path = %opts.config_path.display(), "no config file, using defaults");
        ClientConfig::default()
    };
    config.merge_with_env()?;
    for entry in &opts.overrides {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("override must be KEY=VALUE, got {entry}"))?;
        config.set_from_string(key.trim(), value)?;
    }
    config.validate()?;
    Ok(config)
}

/// Build the app core against the configured backend and restore persisted state.
pub async fn bootstrap(opts: &GlobalOpts) -> anyhow::Result<Arc<RwLock<AppCore>>> {
    let config = load_config(opts)?;
    let api = HttpSocialApi::new(&config.api)?;
    let storage = FileStorage::new(config.data_dir());
    tracing::debug!(
        base_url = %config.api.base_url,
        data_dir = %storage.base_path().display(),
        "bootstrapping client"
    );

    let effects = AppEffects {
        api: Arc::new(api),
        storage: Arc::new(storage),
        time: Arc::new(SystemClock),
    };
    let mut core = AppCore::new(config, effects)?;
    if let Some(wallet) = &opts.wallet {
        core.set_wallet(Some(WalletAddress::new(wallet.clone())));
    }

    let app_core = Arc::new(RwLock::new(core));
    let unread = restore_persisted(&app_core).await;
    tracing::debug!(unread, "restored notification state");
    Ok(app_core)
}

/// Digits (or `post:<id>`) name a post id; anything else is a signature.
pub fn parse_content(raw: &str) -> anyhow::Result<ContentId> {
    let raw = raw.trim();
    let reference = if raw.starts_with("post:") || raw.chars().all(|c| c.is_ascii_digit()) {
        ContentRef::post_id(raw)
    } else {
        ContentRef::signature(raw)
    };
    Ok(ContentId::canonical(&reference)?)
}
