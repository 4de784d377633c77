//! Client facade.
//!
//! Keep the public surface small: one [`KnowbaseClient`] owning the session,
//! the JSON dispatcher and the uploader. Endpoint groups live in [`crate::api`].

pub mod builder;
pub mod core;

pub use builder::KnowbaseClientBuilder;
pub use core::KnowbaseClient;
