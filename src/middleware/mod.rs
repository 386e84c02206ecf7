//! Custom middleware definitions

mod auth;
mod csrf;

pub use auth::AuthLayer;
pub use csrf::{CSRF_TOKEN_HEADER, CsrfLayer};
