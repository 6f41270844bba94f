//! # box-v2
//!
//! Typed client for the Box content API.
//!
//! Provides configuration, bearer-token auth, a reqwest transport, JSON
//! decoding into typed records, and the events manager for polling the
//! Box event stream, plus OpenTelemetry observability.

pub mod auth;
pub mod client;
pub mod config;
pub mod converter;
pub mod error;
pub mod managers;
pub mod model;
pub mod request;
pub mod service;
pub mod telemetry;

pub use client::BoxClient;
pub use error::{Error, Result};
