//! Secret handling utilities.
//!
//! Re-exports secrecy types used for access tokens and client secrets.

pub use secrecy::{ExposeSecret, SecretString};
