//! Core HDC operations: bind, bundle, permute
//!
//! These operations form the algebra of bipolar (MAP) hyperdimensional computing:
//! - BIND: elementwise product - associates a key with a value, self-inverse
//! - BUNDLE: elementwise sum + sign - superimposes vectors, similar to each input
//! - PERMUTE: cyclic rotation - order-sensitive and reversible

use crate::similarity::best_match;
use crate::{check_dimensions, HdcError, HyperVector, Result};
use bitvec::prelude::*;

/// Bind two hypervectors by elementwise multiplication
///
/// The result is dissimilar to both inputs.
/// Key property: bind(bind(a, b), b) == a
pub fn bind(a: &HyperVector, b: &HyperVector) -> Result<HyperVector> {
    a.bind(b)
}

/// Unbind a key from a bound vector
///
/// Given C = bind(A, B), retrieve B by computing bind(C, A)
pub fn unbind(bound: &HyperVector, key: &HyperVector) -> Result<HyperVector> {
    bind(bound, key)
}

/// Bundle hypervectors by elementwise sum and sign normalization
///
/// A component summing to zero becomes +1. Bundling zero vectors is an error.
pub fn bundle(vectors: &[HyperVector]) -> Result<HyperVector> {
    bundle_iter(vectors)
}

/// Bundle any ordered sequence of hypervectors
pub fn bundle_iter<'a, I>(vectors: I) -> Result<HyperVector>
where
    I: IntoIterator<Item = &'a HyperVector>,
{
    let mut vectors = vectors.into_iter();
    let first = vectors.next().ok_or(HdcError::EmptyBundle)?;

    let mut acc = Accumulator::from(first);
    for v in vectors {
        acc.add(v)?;
    }

    Ok(acc.normalize())
}

/// Rotate a hypervector by one position (component D-1 moves to 0)
pub fn permute(v: &HyperVector) -> HyperVector {
    v.rotate(1)
}

/// Rotate by an arbitrary number of positions; negative amounts undo positive ones
pub fn permute_by(v: &HyperVector, positions: isize) -> HyperVector {
    v.rotate(positions)
}

/// Clean up a noisy hypervector against a set of candidates
///
/// Returns the most similar candidate, the first one on ties, or `None` when
/// there are no candidates.
pub fn cleanup<'a>(
    noisy: &HyperVector,
    candidates: &'a [HyperVector],
) -> Result<Option<&'a HyperVector>> {
    Ok(best_match(noisy, candidates.iter().map(|hv| (hv, hv)))?.map(|(hv, _)| hv))
}

/// Unnormalized integer sum of hypervectors
///
/// Unlike HyperVector this may hold zeros and magnitudes above one. It is the
/// working state of bundling and of the structure encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    sums: Vec<i32>,
}

impl Accumulator {
    /// All-zero accumulator
    pub fn zeros(dimension: usize) -> Self {
        Self {
            sums: vec![0; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.sums.len()
    }

    /// Raw per-component sums
    pub fn sums(&self) -> &[i32] {
        &self.sums
    }

    /// Add a hypervector componentwise
    pub fn add(&mut self, v: &HyperVector) -> Result<()> {
        check_dimensions(self.sums.len(), v.dimension())?;

        for (sum, component) in self.sums.iter_mut().zip(v.iter()) {
            *sum += component as i32;
        }

        Ok(())
    }

    /// Sign-normalize into a hypervector, mapping zero to +1
    pub fn normalize(&self) -> HyperVector {
        let bits: BitVec<u64, Lsb0> = self.sums.iter().map(|&s| s < 0).collect();
        HyperVector::from_bitvec(bits)
    }

    /// Replace every sum with its sign (zero becomes +1)
    pub fn renormalize(&mut self) {
        for sum in self.sums.iter_mut() {
            *sum = if *sum < 0 { -1 } else { 1 };
        }
    }

    /// Cosine similarity of the raw sums
    ///
    /// Fails with `DegenerateInput` if either accumulator has zero norm.
    pub fn cosine_similarity(&self, other: &Accumulator) -> Result<f32> {
        check_dimensions(self.sums.len(), other.sums.len())?;

        let mut dot = 0i64;
        let mut norm_a = 0i64;
        let mut norm_b = 0i64;
        for (&a, &b) in self.sums.iter().zip(other.sums.iter()) {
            let (a, b) = (a as i64, b as i64);
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a == 0 || norm_b == 0 {
            return Err(HdcError::DegenerateInput);
        }

        Ok((dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt())) as f32)
    }
}

impl From<&HyperVector> for Accumulator {
    fn from(v: &HyperVector) -> Self {
        Self {
            sums: v.iter().map(i32::from).collect(),
        }
    }
}
