pub mod contact;
pub mod ids;
pub mod phone;

pub use contact::Contact;
pub use ids::ContactId;
pub use phone::{looks_like_phone, normalize_for_dialing, sanitize_digits, RAW_PHONE_MIN_DIGITS};
