//! API key commands.

use tokio::runtime::Runtime;

use super::Context;
use crate::error::ResultExt;
use crate::lookup::KeyStatus;
use crate::workflow::SettingsController;

/// Probe the configured API key
pub fn cmd_check_key(rt: &Runtime, ctx: &Context) -> anyhow::Result<()> {
    let settings = settings_controller(ctx);
    if !settings.can_check() {
        anyhow::bail!(
            "No API key configured. Use --api-key, set IPSTACK_API_KEY, or run `track-my-ip set-key <key>`"
        );
    }

    rt.block_on(async {
        let (status, notice) = settings.check_api_key().await;
        println!("{}", notice);
        match status {
            KeyStatus::Valid => Ok(()),
            KeyStatus::Invalid => anyhow::bail!("API key rejected"),
            KeyStatus::Unreachable(reason) => anyhow::bail!("API key check failed: {}", reason),
        }
    })
}

/// Save a new API key, probing it first unless `no_check`
pub fn cmd_set_key(rt: &Runtime, ctx: &Context, key: &str, no_check: bool) -> anyhow::Result<()> {
    let settings = settings_controller(ctx);
    settings.set_api_key_input(key);
    if !settings.can_save() {
        anyhow::bail!("The API key can't be empty");
    }

    rt.block_on(async {
        if !no_check {
            let (status, notice) = settings.check_api_key().await;
            println!("{}", notice);
            match status {
                KeyStatus::Valid => {}
                KeyStatus::Invalid => anyhow::bail!("Not saving a rejected API key"),
                KeyStatus::Unreachable(_) => {
                    anyhow::bail!("Could not verify the API key, retry or pass --no-check")
                }
            }
        }

        let notice = settings.save().await.with_context("saving API key")?;
        println!("{}", notice);
        Ok(())
    })
}

/// Only saving needs the config path, checking works without one.
fn settings_controller(ctx: &Context) -> SettingsController {
    let settings =
        SettingsController::new(ctx.config.clone(), ctx.config_path.clone(), ctx.client.clone());

    // An --api-key / IPSTACK_API_KEY override is what gets checked
    let active = ctx.client.api_key();
    if !active.is_empty() {
        settings.set_api_key_input(active);
    }
    settings
}
