//! Warden - Request Governance Layer
//!
//! This crate implements the request governance layer for a GraphQL service:
//! per-identifier rate limiting with fixed-window counters, operation
//! deadlines raced against resolver execution, and the lifecycle plugin that
//! wires both into the surrounding request pipeline. The GraphQL schema,
//! resolvers, and persistence layer are external collaborators that call
//! into this crate; they are not implemented here.

pub mod config;
pub mod error;
pub mod governance;
pub mod observability;
pub mod pipeline;
pub mod ratelimit;
pub mod timeout;

pub use config::GovernanceConfig;
pub use error::{Result, WardenError};
pub use governance::Governance;
