use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{now_utc, parse_contact_id};
use anyhow::Result;
use clap::Args;
use wasend_core::domain::Contact;
use wasend_store::repo::ContactUpdate;

#[derive(Debug, Args)]
pub struct AddContactArgs {
    #[arg(long)]
    pub name: String,
    /// Phone number, ideally with country code
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct EditContactArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn add_contact(ctx: &Context<'_>, args: AddContactArgs) -> Result<()> {
    let contact = Contact::new(&args.name, &args.phone)?;
    let contact = ctx.store.contacts().upsert(now_utc(), contact)?;

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("created {} {}", contact.id, contact.name);
    }
    Ok(())
}

pub fn edit_contact(ctx: &Context<'_>, args: EditContactArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let update = ContactUpdate {
        name: args.name,
        phone: args.phone,
    };
    if update.is_empty() {
        return Err(invalid_input("no updates provided"));
    }

    let contact = ctx.store.contacts().update(now_utc(), id, update)?;
    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("updated {} {}", contact.id, contact.name);
    }
    Ok(())
}

pub fn show_contact(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let contact = ctx
        .store
        .contacts()
        .get(id)?
        .ok_or_else(|| not_found("contact not found"))?;

    if ctx.json {
        return print_json(&contact);
    }
    println!("{}", contact.name);
    println!("  id: {}", contact.id);
    println!("  phone: {}", contact.phone);
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>) -> Result<()> {
    let contacts = ctx.store.contacts().list()?;
    if ctx.json {
        return print_json(&contacts);
    }
    if contacts.is_empty() {
        println!("No contacts yet");
        return Ok(());
    }
    print_contact_rows(&contacts);
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let removed = ctx.store.contacts().delete(now_utc(), id)?;
    if ctx.json {
        print_json(&removed)?;
    } else {
        println!("deleted {} {}", removed.id, removed.name);
    }
    Ok(())
}

pub fn print_contact_rows(contacts: &[Contact]) {
    let width = contacts
        .iter()
        .map(|contact| contact.name.chars().count())
        .max()
        .unwrap_or(0);
    for contact in contacts {
        println!(
            "{}  {:<width$}  {}",
            contact.id,
            contact.name,
            contact.phone,
            width = width
        );
    }
}
