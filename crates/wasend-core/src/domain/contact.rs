use crate::domain::ids::ContactId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Builds a contact with a fresh id from user input.
    pub fn new(name: &str, phone: &str) -> Result<Self, CoreError> {
        Self::with_id(ContactId::new(), name, phone)
    }

    pub fn with_id(id: ContactId, name: &str, phone: &str) -> Result<Self, CoreError> {
        let contact = Self {
            id,
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
        };
        contact.validate()?;
        Ok(contact)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        if self.phone.trim().is_empty() {
            return Err(CoreError::EmptyPhone);
        }
        Ok(())
    }
}
