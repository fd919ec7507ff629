use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// Bounds applied to a single trust-chain walk.
///
/// A walk that hits any of these fails closed: it is reported as an error,
/// never truncated to a valid verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLimits {
    /// Maximum number of authorization hops above the submitted credential.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Deadline for each external lookup (DID resolution, type mapping, registry fetch).
    #[serde(default = "default_hop_timeout_ms")]
    pub hop_timeout_ms: u64,
    /// Deadline for the whole walk.
    #[serde(default = "default_chain_timeout_ms")]
    pub chain_timeout_ms: u64,
}

fn default_max_depth() -> usize {
    8
}
fn default_hop_timeout_ms() -> u64 {
    5_000
}
fn default_chain_timeout_ms() -> u64 {
    30_000
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            hop_timeout_ms: default_hop_timeout_ms(),
            chain_timeout_ms: default_chain_timeout_ms(),
        }
    }
}

impl ChainLimits {
    pub fn hop_timeout(&self) -> Duration {
        Duration::from_millis(self.hop_timeout_ms)
    }

    pub fn chain_timeout(&self) -> Duration {
        Duration::from_millis(self.chain_timeout_ms)
    }

    /// Reject limits that would make every walk fail or never time out.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_depth == 0 {
            return Err(CoreError::ValidationError(
                "chain.max_depth must be at least 1".into(),
            ));
        }
        if self.hop_timeout_ms == 0 || self.chain_timeout_ms == 0 {
            return Err(CoreError::ValidationError(
                "chain timeouts must be non-zero".into(),
            ));
        }
        if self.hop_timeout_ms > self.chain_timeout_ms {
            tracing::warn!(
                hop_timeout_ms = self.hop_timeout_ms,
                chain_timeout_ms = self.chain_timeout_ms,
                "hop timeout exceeds chain timeout; the chain deadline will win"
            );
        }
        Ok(())
    }
}
