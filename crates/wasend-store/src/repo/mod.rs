pub mod contacts;
pub mod kv;

pub use contacts::{ContactUpdate, ContactsRepo, ImportMode, ImportReport, CONTACTS_KEY};
pub use kv::KvRepo;
