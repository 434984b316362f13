use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use wasend_store::error::StoreError;
use wasend_store::paths;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BackupReport {
    output: String,
    size_bytes: u64,
}

pub fn backup(ctx: &Context<'_>, args: BackupArgs) -> Result<()> {
    let out = match args.out {
        Some(path) => path,
        None => paths::backup_path()?,
    };

    ctx.store.backup_to(&out).map_err(|err| {
        let action = if matches!(err, StoreError::InvalidBackupPath(_)) {
            "backup path matches database"
        } else {
            "backup database to"
        };
        anyhow::Error::new(err).context(format!("{} {}", action, out.display()))
    })?;

    let size = fs::metadata(&out)
        .with_context(|| format!("stat backup file {}", out.display()))?
        .len();

    if ctx.json {
        return print_json(&BackupReport {
            output: out.display().to_string(),
            size_bytes: size,
        });
    }

    println!("Backup written to {}", out.display());
    Ok(())
}
