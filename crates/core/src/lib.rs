//! Pure domain logic for the catalog service.
//!
//! Nothing in this crate touches the database or the network: the category
//! tree, slug derivation, layout/view selection, render plans, webhook
//! signature checks and media URL helpers are all plain functions so they can
//! be unit tested in isolation.

pub mod error;
pub mod layout;
pub mod media;
pub mod pagination;
pub mod render;
pub mod slug;
pub mod tree;
pub mod types;
pub mod validation;
pub mod webhook;
