pub mod domain;
pub mod error;
pub mod link;
pub mod matching;

pub use domain::*;
pub use error::CoreError;
pub use link::{build_chat_link, parse_prefill, resolve_recipient, Dialing, Prefill, Recipient};
pub use matching::{find_matches, normalize_name, resolve_by_name, Resolution};
