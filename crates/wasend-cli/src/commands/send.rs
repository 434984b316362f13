use crate::commands::contacts::print_contact_rows;
use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::opener::open_link;
use crate::util::join_words;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;
use wasend_core::domain::Contact;
use wasend_core::link::{build_chat_link, parse_prefill, resolve_recipient};
use wasend_core::matching::find_matches;
use wasend_core::CoreError;

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Saved contact name, or a phone number with country code
    pub query: Option<String>,
    /// Message text; remaining words are joined with spaces. Put it after
    /// `--` when it starts with a dash.
    pub message: Vec<String>,
    /// Prefill name and message from a link carrying `q` and `text` parameters
    #[arg(long, value_name = "URL")]
    pub from_url: Option<String>,
    /// Print the chat link instead of opening it
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SendReport<'a> {
    link: &'a str,
    phone_digits: &'a str,
    contact: Option<&'a Contact>,
    opened: bool,
}

pub fn send(ctx: &Context<'_>, args: SendArgs) -> Result<()> {
    let prefill = match args.from_url.as_deref() {
        Some(raw) => {
            let url = Url::parse(raw.trim())
                .map_err(|err| invalid_input(format!("invalid --from-url: {}", err)))?;
            parse_prefill(&url)
        }
        None => Default::default(),
    };
    let query = args.query.or(prefill.query).unwrap_or_default();
    let message = join_words(&args.message)
        .or(prefill.text)
        .unwrap_or_default();

    let contacts = ctx.store.contacts().list()?;
    let recipient = match resolve_recipient(&query, &message, &contacts, &ctx.config.dialing()) {
        Ok(recipient) => recipient,
        Err(err) => {
            if let CoreError::NoUniqueMatch { candidates, .. } = &err {
                if !candidates.is_empty() {
                    eprintln!("matching contacts: {}", candidates.join(", "));
                }
            }
            return Err(err.into());
        }
    };
    let link = build_chat_link(&ctx.config.link_base, &recipient.phone_digits, &message)?;
    debug!(link = %link, "chat link built");

    let open = !args.print && ctx.config.open.enabled;
    if open {
        open_link(&link, ctx.config.open.command.as_deref())
            .with_context(|| "open chat link")?;
        info!(phone = %recipient.phone_digits, "chat link opened");
    }

    if ctx.json {
        return print_json(&SendReport {
            link: link.as_str(),
            phone_digits: &recipient.phone_digits,
            contact: recipient.contact.as_ref(),
            opened: open,
        });
    }
    if open {
        let target = recipient
            .contact
            .as_ref()
            .map(|contact| contact.name.as_str())
            .unwrap_or(recipient.phone_digits.as_str());
        println!("Opened chat with {}", target);
    } else {
        println!("{}", link);
    }
    Ok(())
}

pub fn suggest(ctx: &Context<'_>, args: SuggestArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.suggestion_limit);
    if limit == 0 {
        return Err(invalid_input("limit must be at least 1"));
    }
    let query = args.query.join(" ");
    let contacts = ctx.store.contacts().list()?;
    let mut matches = find_matches(&query, &contacts);
    matches.truncate(limit);

    if ctx.json {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!("No matching contacts");
        return Ok(());
    }
    print_contact_rows(&matches);
    Ok(())
}
