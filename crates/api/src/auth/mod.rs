//! Verification of session tokens issued by the external identity provider.

pub mod jwt;
