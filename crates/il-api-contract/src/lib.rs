//! Instructor-led training API contract types and validation
//!
//! These types are what a transport (the `il` CLI, or an HTTP layer) hands to
//! the workflows in `il-core`: the authenticated principal and the request
//! payloads, together with their validation rules.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::{parse_time_of_day, UploadWindow, DEFAULT_ALLOWED_EXTENSIONS};
