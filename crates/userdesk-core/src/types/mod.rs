//! Validated domain types.

mod api_url;
mod role;
mod user_id;

pub use api_url::{ApiUrl, DEFAULT_API_URL};
pub use role::Role;
pub use user_id::UserId;
