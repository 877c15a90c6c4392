//! HTTP request handlers.

pub mod credits;
pub mod health;
pub mod sessions;
pub mod videos;
pub mod webhooks;
