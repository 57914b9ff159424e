//! Feature controllers attached to the app as components.

pub mod auth;

pub use auth::AuthController;
