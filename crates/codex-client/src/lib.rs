//! Codex Client SDK.
//!
//! This crate provides a client library for game services (matchmaker,
//! trials judge, companion apps) to interact with the codex-service API on
//! behalf of a player session.
//!
//! # Example
//!
//! ```no_run
//! use codex_client::CodexClient;
//!
//! # async fn example() -> Result<(), codex_client::ClientError> {
//! let client = CodexClient::new("http://codex-service.game.svc:8080");
//!
//! // Report a battle victory for the player holding this session token
//! let response = client.report_battle_victory("player-session-jwt").await?;
//!
//! println!("New coin balance: {}", response.wallet.coins);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CodexClient};
pub use error::ClientError;
pub use types::*;
