//! Vouch verification node.
//!
//! Wires configured DID resolution, type authorization, root policy, and
//! registry fetching into a [`state::NodeState`] and serves it over HTTP.

pub mod api;
pub mod config;
pub mod state;

pub use api::{build_router, start_api_server};
pub use config::VouchConfig;
pub use state::NodeState;
