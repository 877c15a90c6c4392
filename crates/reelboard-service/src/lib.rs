//! Reelboard HTTP API Service.
//!
//! This crate provides the HTTP API in front of the credit award engine:
//!
//! - Viewing session start/completion
//! - Credit balance and transaction history
//! - Boost spends
//! - Credit package listing
//! - Video catalog registration (service-to-service)
//! - Payment provider webhooks
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **User bearer tokens** - Gateway-verified end-user identity
//! 2. **Service API keys** - For service-to-service requests (the upload
//!    pipeline registering videos)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for the router

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
