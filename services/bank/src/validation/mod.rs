//! Input validation for signup and funding payloads
//!
//! Every validator is a pure function returning `Ok(())` for valid input or
//! an `Err` carrying the first applicable human-readable message, so route
//! handlers can surface the message as a bad-request failure unchanged.

pub mod card;
pub mod email;
pub mod password;
pub mod phone;
pub mod state;

pub use card::validate_card_number;
pub use email::validate_email;
pub use password::{is_common_password, validate_password_complexity};
pub use phone::validate_phone;
pub use state::validate_state_code;
