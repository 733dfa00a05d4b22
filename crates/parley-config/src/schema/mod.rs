//! Configuration schema types for parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod prompt;
mod storage;
mod system;

pub use backend::*;
pub use prompt::*;
pub use storage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for parley.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ParleyConfig {
    pub backend: BackendConfig,
    pub prompt: PromptConfig,
    pub usage: UsageConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
