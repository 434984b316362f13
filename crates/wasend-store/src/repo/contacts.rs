use crate::error::{Result, StoreError};
use crate::repo::kv::KvRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};
use wasend_core::domain::{Contact, ContactId};

/// Storage key for the contact list; bump the suffix if the shape changes.
pub const CONTACTS_KEY: &str = "contacts:v1";

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Upsert imported contacts by id, keeping everything else.
    #[default]
    Merge,
    /// Replace the whole list with the imported contacts.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
struct ImportedContact {
    #[serde(default)]
    id: Option<String>,
    name: String,
    phone: String,
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn kv(&self) -> KvRepo<'a> {
        KvRepo::new(self.conn)
    }

    pub fn list(&self) -> Result<Vec<Contact>> {
        let Some(raw) = self.kv().get(CONTACTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Contact>>(&raw) {
            Ok(contacts) => Ok(contacts),
            Err(err) => {
                warn!(
                    key = CONTACTS_KEY,
                    error = %err,
                    "stored contacts are unreadable, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        Ok(self.list()?.into_iter().find(|contact| contact.id == id))
    }

    pub fn save_all(&self, now_utc: i64, contacts: &[Contact]) -> Result<()> {
        for contact in contacts {
            contact.validate()?;
        }
        let raw = serde_json::to_string(contacts)?;
        self.kv().set(now_utc, CONTACTS_KEY, &raw)?;
        debug!(count = contacts.len(), "contacts saved");
        Ok(())
    }

    pub fn upsert(&self, now_utc: i64, contact: Contact) -> Result<Contact> {
        contact.validate()?;
        let mut contacts = self.list()?;
        match contacts.iter_mut().find(|existing| existing.id == contact.id) {
            Some(existing) => *existing = contact.clone(),
            None => contacts.push(contact.clone()),
        }
        self.save_all(now_utc, &contacts)?;
        Ok(contact)
    }

    pub fn update(&self, now_utc: i64, id: ContactId, update: ContactUpdate) -> Result<Contact> {
        let mut contacts = self.list()?;
        let existing = contacts
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("contact {}", id)))?;

        let name = update.name.as_deref().unwrap_or(&existing.name);
        let phone = update.phone.as_deref().unwrap_or(&existing.phone);
        let updated = Contact::with_id(id, name, phone)?;
        *existing = updated.clone();

        self.save_all(now_utc, &contacts)?;
        Ok(updated)
    }

    pub fn delete(&self, now_utc: i64, id: ContactId) -> Result<Contact> {
        let mut contacts = self.list()?;
        let index = contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("contact {}", id)))?;
        let removed = contacts.remove(index);
        self.save_all(now_utc, &contacts)?;
        Ok(removed)
    }

    pub fn export_json(&self) -> Result<String> {
        let contacts = self.list()?;
        Ok(serde_json::to_string_pretty(&contacts)?)
    }

    /// Imports a JSON array of contacts. Nothing is written unless every
    /// entry is valid.
    pub fn import_json(
        &self,
        now_utc: i64,
        text: &str,
        mode: ImportMode,
    ) -> Result<ImportReport> {
        let parsed: Vec<ImportedContact> = serde_json::from_str(text.trim())
            .map_err(|err| StoreError::InvalidImport(err.to_string()))?;

        let mut incoming = Vec::with_capacity(parsed.len());
        for (index, entry) in parsed.into_iter().enumerate() {
            let contact = imported_to_contact(entry).map_err(|reason| {
                StoreError::InvalidImport(format!("entry {}: {}", index, reason))
            })?;
            incoming.push(contact);
        }

        let mut contacts = match mode {
            ImportMode::Merge => self.list()?,
            ImportMode::Replace => Vec::new(),
        };
        let mut added = 0;
        let mut updated = 0;
        for contact in incoming {
            match contacts.iter_mut().find(|existing| existing.id == contact.id) {
                Some(existing) => {
                    *existing = contact;
                    updated += 1;
                }
                None => {
                    contacts.push(contact);
                    added += 1;
                }
            }
        }

        self.save_all(now_utc, &contacts)?;
        debug!(added, updated, total = contacts.len(), "contacts imported");
        Ok(ImportReport {
            added,
            updated,
            total: contacts.len(),
        })
    }
}

fn imported_to_contact(entry: ImportedContact) -> std::result::Result<Contact, String> {
    let id = match entry.id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            ContactId::from_str(raw).map_err(|_| format!("invalid id {:?}", raw))?
        }
        _ => ContactId::new(),
    };
    Contact::with_id(id, &entry.name, &entry.phone).map_err(|err| err.to_string())
}
