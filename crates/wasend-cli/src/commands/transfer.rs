use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use wasend_store::repo::ImportMode;

use crate::util::now_utc;

pub const DEFAULT_EXPORT_FILENAME: &str = "contacts.json";

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write to a file instead of stdout (a directory gets contacts.json)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file produced by `export`, or `-` for stdin
    pub file: PathBuf,
    /// Replace all contacts instead of merging by id
    #[arg(long)]
    pub replace: bool,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    output: String,
}

pub fn export_contacts(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let data = ctx.store.contacts().export_json()?;
    let Some(out) = args.out else {
        println!("{}", data);
        return Ok(());
    };

    let out = if out.is_dir() {
        out.join(DEFAULT_EXPORT_FILENAME)
    } else {
        out
    };
    fs::write(&out, format!("{}\n", data))
        .with_context(|| format!("write export file {}", out.display()))?;
    if ctx.json {
        return print_json(&ExportReport {
            output: out.display().to_string(),
        });
    }
    println!("Exported contacts to {}", out.display());
    Ok(())
}

pub fn import_contacts(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let text = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .with_context(|| "read import data from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("read import file {}", args.file.display()))?
    };

    let mode = if args.replace {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };
    let report = ctx.store.contacts().import_json(now_utc(), &text, mode)?;

    if ctx.json {
        return print_json(&report);
    }
    println!(
        "Imported {} new, {} updated ({} total)",
        report.added, report.updated, report.total
    );
    Ok(())
}
