//! Refresh-secret hashing cost configuration.

use serde::{Deserialize, Serialize};

/// Argon2id cost parameters for refresh-secret digests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasherConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
