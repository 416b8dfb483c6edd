//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the corresponding repository in `tempo_db` and map
//! errors via [`crate::error::AppError`].

pub mod auth;
pub mod notes;
pub mod work;
