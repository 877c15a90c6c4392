//! Core domain types for the Reelboard credit award engine.
//!
//! This crate contains pure types and decision logic, no I/O:
//!
//! - Strongly-typed identifiers ([`UserId`], [`VideoId`], [`SessionId`],
//!   [`TransactionId`])
//! - The credit ledger entry ([`CreditTransaction`])
//! - Viewing session lifecycle ([`ViewingSession`])
//! - The authoritative credit package table ([`PackageCatalog`])
//! - Award decision logic ([`AwardPolicy`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod ids;
pub mod package;
pub mod policy;
pub mod session;
pub mod transaction;
pub mod video;

pub use account::Account;
pub use ids::{IdError, SessionId, TransactionId, UserId, VideoId};
pub use package::{CreditPackage, PackageCatalog};
pub use policy::AwardPolicy;
pub use session::{SessionState, ViewingSession};
pub use transaction::{CreditTransaction, TransactionType};
pub use video::VideoMeta;
