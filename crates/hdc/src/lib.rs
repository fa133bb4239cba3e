//! Hyperdimensional Computing (HDC) encoder for key-value structures
//!
//! Symbols are mapped to random bipolar hypervectors (components in {-1, +1}).
//! A dictionary of symbol pairs is encoded by binding each key to its value and
//! bundling the bound pairs into a single hypervector, which is stored under a
//! label and can later be retrieved by cosine similarity.

pub mod hypervector;
pub mod operations;
pub mod codebook;
pub mod registry;
pub mod encoder;
pub mod similarity;
pub mod config;

pub use hypervector::HyperVector;
pub use operations::{bind, bundle, permute, Accumulator};
pub use codebook::Codebook;
pub use registry::StructureRegistry;
pub use encoder::HdStructure;
pub use similarity::cosine_similarity;
pub use config::{BundleMode, HdcConfig};

/// Default dimension for hypervectors
pub const DEFAULT_DIMENSION: usize = 10_000;

/// HDC error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HdcError {
    #[error("Invalid dimension: {0} (must be positive)")]
    InvalidDimension(usize),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cannot bundle an empty vector set")]
    EmptyBundle,

    #[error("Degenerate input: cosine similarity of a zero-norm vector")]
    DegenerateInput,

    #[error("Byte length mismatch: expected {expected}, got {actual}")]
    ByteLength { expected: usize, actual: usize },

    #[error("Invalid component {value} at index {index} (must be -1 or +1)")]
    InvalidComponent { index: usize, value: i8 },
}

pub type Result<T> = std::result::Result<T, HdcError>;

/// Fail with `DimensionMismatch` unless both dimensions agree.
pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(HdcError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
