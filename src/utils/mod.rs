pub mod client_name;
pub mod url_validator;

pub use client_name::derive_client_name;
pub use url_validator::{validate_url, validation_error_message, UrlValidationError};
