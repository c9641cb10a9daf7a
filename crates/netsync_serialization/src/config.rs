//! # Buffer Configuration
//!
//! Sizing policy for scratch buffers, loaded once at startup.
//!
//! ```toml
//! initial_capacity = 1200
//! max_capacity = 65536
//! ```
//!
//! Leaving out `max_capacity` makes every buffer fixed-size.

use std::path::Path;

use netsync_shared::MAX_PACKET_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::{SerializationError, SerializationResult};

/// Sizing policy for a [`BufferWriter`](crate::BufferWriter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Bytes allocated up front.
    pub initial_capacity: usize,
    /// Upper bound for growth. `None` means the buffer never grows.
    pub max_capacity: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MAX_PACKET_SIZE,
            max_capacity: None,
        }
    }
}

impl BufferConfig {
    /// Fixed buffer of `capacity` bytes.
    #[must_use]
    pub const fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            max_capacity: None,
        }
    }

    /// Buffer starting at `initial_capacity` and growing up to `max_capacity`.
    #[must_use]
    pub const fn growable(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: Some(max_capacity),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidConfig`] on malformed TOML or an
    /// inconsistent sizing policy.
    pub fn from_toml_str(source: &str) -> SerializationResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| SerializationError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidConfig`] if the file cannot be read
    /// or does not hold a valid configuration.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SerializationResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            SerializationError::InvalidConfig(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks the sizing policy is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidConfig`] for a zero initial
    /// capacity or a maximum below the initial capacity.
    pub fn validate(&self) -> SerializationResult<()> {
        if self.initial_capacity == 0 {
            return Err(SerializationError::InvalidConfig(
                "initial_capacity must be greater than zero".to_string(),
            ));
        }
        if let Some(max) = self.max_capacity {
            if max < self.initial_capacity {
                return Err(SerializationError::InvalidConfig(format!(
                    "max_capacity {max} is below initial_capacity {}",
                    self.initial_capacity
                )));
            }
        }
        Ok(())
    }

    /// Effective growth limit.
    #[must_use]
    pub fn effective_max_capacity(&self) -> usize {
        self.max_capacity.unwrap_or(self.initial_capacity)
    }
}
