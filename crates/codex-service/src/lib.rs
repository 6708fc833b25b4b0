//! Codex HTTP API Service.
//!
//! This crate provides the HTTP API for the Codex collection backend,
//! including:
//!
//! - User session sync and role administration
//! - Progression mutations (battle victories, card awards and discards)
//! - Codex Trials league pack claims with ledger-derived idempotency
//! - Store pack catalog and purchases
//! - Collection and deck management
//!
//! # Authentication
//!
//! Requests carry a JWT issued by the identity provider, validated against
//! its JWKS endpoint. Admin endpoints additionally require the caller's
//! stored role to be `admin`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Read-only handlers stay async for consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod progression;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
