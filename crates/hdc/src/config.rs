//! Configuration for the structure encoder

use serde::{Deserialize, Serialize};

use crate::{HdcError, Result, DEFAULT_DIMENSION};

/// How bound pairs are folded together during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleMode {
    /// Sum every bound pair, then sign-normalize once
    #[default]
    Batch,

    /// Sign-normalize the running total after each pair is added
    ///
    /// Earlier pairs lose weight as later ones arrive, so the result depends
    /// on pair order.
    Incremental,
}

/// Structure encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdcConfig {
    /// Hypervector dimension, shared by every symbol and structure
    pub dimension: usize,

    /// Seed for codebook generation; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Pair folding strategy for `encode`
    pub bundle_mode: BundleMode,
}

impl Default for HdcConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            seed: None,
            bundle_mode: BundleMode::Batch,
        }
    }
}

impl HdcConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set hypervector dimension
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the bundling mode
    pub fn with_bundle_mode(mut self, mode: BundleMode) -> Self {
        self.bundle_mode = mode;
        self
    }

    /// Reject configurations that cannot produce hypervectors
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(HdcError::InvalidDimension(self.dimension));
        }
        Ok(())
    }
}
