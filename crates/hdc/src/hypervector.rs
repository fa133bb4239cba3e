//! Bipolar hypervectors
//!
//! A HyperVector holds D components, each either +1 or -1. Components are
//! bit-packed: a clear bit is +1 and a set bit is -1, so the elementwise
//! product of two vectors is the XOR of their bits and the dot product falls
//! out of the Hamming distance.
//!
//! The infallible constructors (`random*`, `ones`) accept a dimension of 0 and
//! build an empty vector; it has zero norm, so `similarity` rejects it with
//! `DegenerateInput`. `HdStructure` and the checked constructors
//! (`from_bipolar`, `from_bytes`) refuse a zero dimension up front.

use bitvec::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{check_dimensions, HdcError, Result};

/// A high-dimensional bipolar vector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HyperVector {
    /// Sign bits, set = -1
    bits: BitVec<u64, Lsb0>,
    /// Dimension of the vector
    dimension: usize,
}

impl HyperVector {
    /// Create a new random hypervector using the thread-local generator
    pub fn random(dimension: usize) -> Self {
        Self::random_with(dimension, &mut rand::thread_rng())
    }

    /// Create a random hypervector with seed for deterministic generation
    pub fn random_seeded(dimension: usize, seed: u64) -> Self {
        Self::random_with(dimension, &mut StdRng::seed_from_u64(seed))
    }

    /// Create a random hypervector drawing each component uniformly from {-1, +1}
    pub fn random_with<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Self {
        let mut bits = BitVec::with_capacity(dimension);

        for _ in 0..dimension {
            bits.push(rng.gen_bool(0.5));
        }

        Self { bits, dimension }
    }

    /// Create an all-(+1) hypervector
    pub fn ones(dimension: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, dimension),
            dimension,
        }
    }

    /// Build from explicit components, each of which must be -1 or +1
    pub fn from_bipolar(components: &[i8]) -> Result<Self> {
        if components.is_empty() {
            return Err(HdcError::InvalidDimension(0));
        }

        let mut bits = BitVec::with_capacity(components.len());
        for (index, &value) in components.iter().enumerate() {
            match value {
                1 => bits.push(false),
                -1 => bits.push(true),
                _ => return Err(HdcError::InvalidComponent { index, value }),
            }
        }

        Ok(Self {
            bits,
            dimension: components.len(),
        })
    }

    /// Components as a `Vec` of -1/+1
    pub fn to_bipolar(&self) -> Vec<i8> {
        self.iter().collect()
    }

    /// Iterate over components as -1/+1
    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.bits.iter().by_vals().map(sign_of)
    }

    /// Get the dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get a specific component
    pub fn get(&self, index: usize) -> Option<i8> {
        self.bits.get(index).map(|b| sign_of(*b))
    }

    /// Negate a specific component
    pub fn flip(&mut self, index: usize) {
        if let Some(mut bit) = self.bits.get_mut(index) {
            let val = *bit;
            bit.set(!val);
        }
    }

    /// Number of -1 components
    pub fn count_negative(&self) -> usize {
        self.bits.count_ones()
    }

    /// Number of positions where the two vectors disagree
    pub fn hamming_distance(&self, other: &HyperVector) -> Result<usize> {
        check_dimensions(self.dimension, other.dimension)?;

        Ok((self.bits.clone() ^ other.bits.clone()).count_ones())
    }

    /// Integer dot product: agreements minus disagreements
    pub fn dot(&self, other: &HyperVector) -> Result<i64> {
        let distance = self.hamming_distance(other)? as i64;
        Ok(self.dimension as i64 - 2 * distance)
    }

    /// Cosine similarity in [-1, 1]
    ///
    /// Every bipolar vector has norm sqrt(D), so this is `dot / D`. A
    /// zero-dimension vector has zero norm and is rejected.
    pub fn similarity(&self, other: &HyperVector) -> Result<f32> {
        let dot = self.dot(other)?;
        if self.dimension == 0 {
            return Err(HdcError::DegenerateInput);
        }
        Ok(dot as f32 / self.dimension as f32)
    }

    /// Elementwise product (XOR of sign bits)
    pub fn bind(&self, other: &HyperVector) -> Result<HyperVector> {
        check_dimensions(self.dimension, other.dimension)?;

        Ok(HyperVector {
            bits: self.bits.clone() ^ other.bits.clone(),
            dimension: self.dimension,
        })
    }

    /// Cyclic shift; positive amounts move component `i` to `i + positions`
    pub fn rotate(&self, positions: isize) -> HyperVector {
        let mut result = self.clone();

        if positions == 0 || self.dimension == 0 {
            return result;
        }

        let shift = positions.rem_euclid(self.dimension as isize) as usize;

        if shift > 0 {
            result.bits.rotate_right(shift);
        }

        result
    }

    /// Create from packed sign bytes (LSB first, set = -1)
    ///
    /// `bytes` must hold exactly `ceil(dimension / 8)` bytes; padding bits in
    /// the last byte are ignored.
    pub fn from_bytes(bytes: &[u8], dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(HdcError::InvalidDimension(0));
        }

        let expected = (dimension + 7) / 8;
        if bytes.len() != expected {
            return Err(HdcError::ByteLength {
                expected,
                actual: bytes.len(),
            });
        }

        let bits: BitVec<u64, Lsb0> = (0..dimension)
            .map(|i| (bytes[i / 8] >> (i % 8)) & 1 == 1)
            .collect();

        Ok(Self { bits, dimension })
    }

    /// Convert to packed sign bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.dimension + 7) / 8);

        for chunk in self.bits.chunks(8) {
            let mut byte = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                if *bit {
                    byte |= 1 << i;
                }
            }
            bytes.push(byte);
        }

        bytes
    }

    pub(crate) fn from_bitvec(bits: BitVec<u64, Lsb0>) -> Self {
        let dimension = bits.len();
        Self { bits, dimension }
    }
}

#[inline]
fn sign_of(negative: bool) -> i8 {
    if negative {
        -1
    } else {
        1
    }
}

impl Serialize for HyperVector {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("HyperVector", 2)?;
        state.serialize_field("bytes", &self.to_bytes())?;
        state.serialize_field("dimension", &self.dimension)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for HyperVector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        struct HyperVectorVisitor;

        impl<'de> Visitor<'de> for HyperVectorVisitor {
            type Value = HyperVector;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct HyperVector")
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<HyperVector, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut bytes = None;
                let mut dimension = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "bytes" => {
                            bytes = Some(map.next_value()?);
                        }
                        "dimension" => {
                            dimension = Some(map.next_value()?);
                        }
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let bytes: Vec<u8> = bytes.ok_or_else(|| de::Error::missing_field("bytes"))?;
                let dimension: usize =
                    dimension.ok_or_else(|| de::Error::missing_field("dimension"))?;
                HyperVector::from_bytes(&bytes, dimension).map_err(de::Error::custom)
            }
        }

        const FIELDS: &[&str] = &["bytes", "dimension"];
        deserializer.deserialize_struct("HyperVector", FIELDS, HyperVectorVisitor)
    }
}

impl fmt::Display for HyperVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = if self.dimension == 0 {
            0
        } else {
            (self.count_negative() as f32 / self.dimension as f32 * 100.0) as u32
        };
        write!(f, "HyperVector[{}D, {}% negative]", self.dimension, negative)
    }
}
