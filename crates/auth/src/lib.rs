//! Bearer token issuance and revocable session registry.
//!
//! Signed JWTs (access + refresh) backed by a key-value registry of the
//! tokens still valid per principal, enabling logout-everywhere on password
//! change.
//!
//! ## Tokens
//!
//! - [`TokenCodec`]: signs and verifies `header.payload.signature` tokens
//! - [`Claims`]: `sub`, `type`, `exp` payload
//! - [`Kind`]: access or refresh
//!
//! ## Sessions
//!
//! - [`SessionRegistry`]: valid tokens per (principal, kind) bucket
//! - [`KeyValueStore`]: store capability, with [`MemoryStore`] and `RedisStore`
//!
//! ## Flows
//!
//! - [`AuthOrchestrator`]: login, refresh, authorize, change password
//! - [`PrincipalDirectory`]: where accounts live, with [`MemoryDirectory`]
//! - [`password`]: Argon2 hashing and verification
mod claims;
mod codec;
mod config;
mod directory;
mod dto;
mod error;
mod kind;
mod orchestrator;
pub mod password;
mod principal;
mod registry;
mod store;

pub use claims::*;
pub use codec::*;
pub use config::*;
pub use directory::*;
pub use dto::*;
pub use error::*;
pub use kind::*;
pub use orchestrator::*;
pub use principal::*;
pub use registry::*;
pub use store::*;

#[cfg(feature = "redis")]
mod remote;
#[cfg(feature = "redis")]
pub use remote::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
