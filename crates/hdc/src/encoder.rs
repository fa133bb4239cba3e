//! Structure encoder
//!
//! `HdStructure` owns a symbol codebook and a registry of encoded structures.
//! A dictionary is encoded by binding each key's hypervector to its value's
//! hypervector and bundling the bound pairs:
//!
//! ```text
//! encode({k1: v1, k2: v2}) = sign(k1 * v1 + k2 * v2)
//! ```
//!
//! Stored structures are retrieved by cosine similarity.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::borrow::Borrow;
use std::hash::Hash;

use crate::operations::{bind, unbind, Accumulator};
use crate::similarity::{best_match, cosine_similarity};
use crate::{BundleMode, Codebook, HdcConfig, HyperVector, Result, StructureRegistry};

/// Codebook plus registry of labelled structure encodings
#[derive(Debug, Clone)]
pub struct HdStructure<S = String> {
    config: HdcConfig,
    codebook: Codebook<S>,
    registry: StructureRegistry,
    rng: StdRng,
}

impl<S> HdStructure<S>
where
    S: Eq + Hash + Clone,
{
    /// Create a structure encoder with a codebook for `symbols`
    ///
    /// Fails with `InvalidDimension` if `dimension` is zero.
    pub fn new<I>(dimension: usize, symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        Self::with_config(HdcConfig::new().with_dimension(dimension), symbols)
    }

    /// Create a structure encoder from a full configuration
    pub fn with_config<I>(config: HdcConfig, symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let codebook = Codebook::new(config.dimension, symbols, &mut rng);

        tracing::debug!(
            "Created HD structure: dimension={}, symbols={}, mode={:?}",
            config.dimension,
            codebook.len(),
            config.bundle_mode
        );

        Ok(Self {
            config,
            codebook,
            registry: StructureRegistry::new(),
            rng,
        })
    }

    /// Add a symbol to the codebook
    ///
    /// Known symbols keep their existing hypervector. Returns `true` if the
    /// symbol was new.
    pub fn add_data(&mut self, symbol: S) -> bool {
        let added = self.codebook.add(symbol, &mut self.rng);
        if added {
            tracing::debug!("Added symbol to codebook (size {})", self.codebook.len());
        }
        added
    }

    /// Encode a dictionary of symbol pairs and store it under `label`
    ///
    /// Pairs whose key or value is missing from the codebook are skipped. An
    /// empty dictionary, or one with no known pairs, encodes to all +1. Any
    /// earlier structure stored under `label` is replaced. Pairs are bound as
    /// given: a key repeated with different values contributes every pair.
    pub fn encode<'p, Q, I>(&mut self, pairs: I, label: &str) -> Result<HyperVector>
    where
        I: IntoIterator<Item = (&'p Q, &'p Q)>,
        Q: Hash + Eq + ?Sized + 'p,
        S: Borrow<Q>,
    {
        let mut acc = Accumulator::zeros(self.config.dimension);
        let mut bound = 0usize;
        let mut skipped = 0usize;

        for (key, value) in pairs {
            let (key_hv, value_hv) = match (self.codebook.get(key), self.codebook.get(value)) {
                (Some(k), Some(v)) => (k, v),
                _ => {
                    tracing::trace!("Skipping pair with unknown symbol in '{}'", label);
                    skipped += 1;
                    continue;
                }
            };

            acc.add(&bind(key_hv, value_hv)?)?;
            if self.config.bundle_mode == BundleMode::Incremental {
                acc.renormalize();
            }
            bound += 1;
        }

        let encoded = acc.normalize();
        self.registry.insert(label, encoded.clone());

        tracing::debug!(
            "Encoded structure '{}': {} pairs bound, {} skipped",
            label,
            bound,
            skipped
        );

        Ok(encoded)
    }

    /// Cosine similarity between two hypervectors
    pub fn similarity(&self, a: &HyperVector, b: &HyperVector) -> Result<f32> {
        cosine_similarity(a, b)
    }

    /// Label of the stored structure most similar to `query`
    ///
    /// Ties go to the label stored first. `None` if nothing is stored.
    pub fn decode(&self, query: &HyperVector) -> Result<Option<&str>> {
        Ok(best_match(query, self.registry.iter())?.map(|(label, _)| label))
    }

    /// Up to `k` stored labels ranked by similarity to `query`
    pub fn decode_ranked(&self, query: &HyperVector, k: usize) -> Result<Vec<(&str, f32)>> {
        let mut ranked = self
            .registry
            .iter()
            .map(|(label, hv)| Ok((label, cosine_similarity(query, hv)?)))
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked)
    }

    /// Symbol most likely bound to `key` in the structure stored under `label`
    ///
    /// Unbinds the key from the structure and cleans the noisy result up
    /// against the codebook. Recovery is reliable when the structure bundles
    /// an odd number of pairs; with two pairs the zero-to-+1 convention biases
    /// the unbound vector towards the key itself. `None` if the label or key
    /// is unknown.
    pub fn query<Q>(&self, label: &str, key: &Q) -> Result<Option<&S>>
    where
        S: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (structure, key_hv) = match (self.registry.get(label), self.codebook.get(key)) {
            (Some(structure), Some(key_hv)) => (structure, key_hv),
            _ => return Ok(None),
        };

        let noisy = unbind(structure, key_hv)?;
        Ok(best_match(&noisy, self.codebook.iter())?.map(|(symbol, _)| symbol))
    }

    /// Stored structure for `label`
    pub fn get(&self, label: &str) -> Option<&HyperVector> {
        self.registry.get(label)
    }

    /// Labels in the order they were first encoded
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.labels()
    }

    /// Known symbols in the order they were added
    pub fn symbols(&self) -> &[S] {
        self.codebook.symbols()
    }

    pub fn codebook(&self) -> &Codebook<S> {
        &self.codebook
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HdcConfig {
        &self.config
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HdcError;

    fn seeded(dimension: usize, mode: BundleMode, symbols: &[&str]) -> HdStructure {
        let config = HdcConfig::new()
            .with_dimension(dimension)
            .with_seed(42)
            .with_bundle_mode(mode);
        HdStructure::with_config(config, symbols.iter().map(|s| s.to_string())).unwrap()
    }

    #[test]
    fn test_invalid_dimension() {
        let result = HdStructure::new(0, vec!["A".to_string()]);
        assert!(matches!(result, Err(HdcError::InvalidDimension(0))));
    }

    #[test]
    fn test_encode_single_pair_is_binding() {
        let mut hd = seeded(1000, BundleMode::Batch, &["A", "X"]);

        let encoded = hd.encode([("A", "X")], "one").unwrap();
        let expected = bind(hd.codebook().get("A").unwrap(), hd.codebook().get("X").unwrap()).unwrap();

        assert_eq!(encoded, expected);
        assert_eq!(hd.get("one"), Some(&expected));
    }

    #[test]
    fn test_unknown_symbols_skipped() {
        let mut hd = seeded(1000, BundleMode::Batch, &["A", "X"]);

        let with_unknown = hd.encode([("A", "X"), ("Q", "X"), ("A", "R")], "a").unwrap();
        let clean = hd.encode([("A", "X")], "b").unwrap();

        assert_eq!(with_unknown, clean);
    }

    #[test]
    fn test_empty_dictionary_is_all_positive() {
        let mut hd = seeded(500, BundleMode::Batch, &["A"]);

        let empty: [(&str, &str); 0] = [];
        let encoded = hd.encode(empty, "empty").unwrap();
        assert_eq!(encoded, HyperVector::ones(500));

        let unknown = hd.encode([("Y", "Z")], "unknown").unwrap();
        assert_eq!(unknown, HyperVector::ones(500));
    }

    #[test]
    fn test_batch_matches_bundle() {
        let mut hd = seeded(2000, BundleMode::Batch, &["A", "B", "C", "X", "Y", "Z"]);
        let cb = hd.codebook().clone();
        let pair = |k: &str, v: &str| bind(cb.get(k).unwrap(), cb.get(v).unwrap()).unwrap();

        let encoded = hd.encode([("A", "X"), ("B", "Y"), ("C", "Z")], "abc").unwrap();
        let expected =
            crate::bundle(&[pair("A", "X"), pair("B", "Y"), pair("C", "Z")]).unwrap();

        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_incremental_renormalizes_each_step() {
        let mut hd = seeded(2000, BundleMode::Incremental, &["A", "B", "C", "X", "Y", "Z"]);
        let cb = hd.codebook().clone();
        let pair = |k: &str, v: &str| bind(cb.get(k).unwrap(), cb.get(v).unwrap()).unwrap();

        let encoded = hd.encode([("A", "X"), ("B", "Y"), ("C", "Z")], "abc").unwrap();

        let step1 = pair("A", "X");
        let step2 = crate::bundle(&[step1, pair("B", "Y")]).unwrap();
        let expected = crate::bundle(&[step2, pair("C", "Z")]).unwrap();

        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_duplicate_keys_each_bound() {
        let mut hd = seeded(2000, BundleMode::Batch, &["A", "X", "Y", "Z"]);
        let cb = hd.codebook().clone();
        let pair = |k: &str, v: &str| bind(cb.get(k).unwrap(), cb.get(v).unwrap()).unwrap();

        let encoded = hd.encode([("A", "X"), ("A", "Y"), ("A", "Z")], "dup").unwrap();
        let expected =
            crate::bundle(&[pair("A", "X"), pair("A", "Y"), pair("A", "Z")]).unwrap();

        assert_eq!(encoded, expected);
        assert_ne!(encoded, pair("A", "Z"));
    }

    #[test]
    fn test_reencode_overwrites() {
        let mut hd = seeded(1000, BundleMode::Batch, &["A", "B", "X"]);

        hd.encode([("A", "X")], "d").unwrap();
        let second = hd.encode([("B", "X")], "d").unwrap();

        assert_eq!(hd.get("d"), Some(&second));
        assert_eq!(hd.labels().count(), 1);
    }

    #[test]
    fn test_decode_empty_registry() {
        let hd = seeded(100, BundleMode::Batch, &["A"]);
        let query = HyperVector::random_seeded(100, 1);

        assert_eq!(hd.decode(&query).unwrap(), None);
    }

    #[test]
    fn test_decode_dimension_mismatch() {
        let mut hd = seeded(100, BundleMode::Batch, &["A", "X"]);
        hd.encode([("A", "X")], "d").unwrap();

        let query = HyperVector::ones(99);
        assert_eq!(
            hd.decode(&query),
            Err(HdcError::DimensionMismatch { expected: 99, actual: 100 })
        );
    }

    #[test]
    fn test_decode_tie_goes_to_first() {
        let mut hd = seeded(100, BundleMode::Batch, &["A", "X"]);

        // Both encode to all +1
        hd.encode([("Q", "R")], "first").unwrap();
        hd.encode([("S", "T")], "second").unwrap();

        assert_eq!(hd.decode(&HyperVector::ones(100)).unwrap(), Some("first"));
    }

    #[test]
    fn test_decode_ranked() {
        let mut hd = seeded(4000, BundleMode::Batch, &["A", "B", "C", "X", "Y", "Z"]);

        let target = hd.encode([("A", "X"), ("B", "Y"), ("C", "Z")], "target").unwrap();
        hd.encode([("A", "Y"), ("B", "Z"), ("C", "X")], "other").unwrap();

        let ranked = hd.decode_ranked(&target, 5).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], ("target", 1.0));
        assert_eq!(ranked[1].0, "other");
        assert!(ranked[1].1 < 0.5);
    }

    #[test]
    fn test_query_recovers_value() {
        let mut hd = seeded(10_000, BundleMode::Batch, &["A", "B", "C", "X", "Y", "Z"]);
        hd.encode([("A", "X"), ("B", "Y"), ("C", "Z")], "abc").unwrap();

        assert_eq!(hd.query("abc", "A").unwrap().map(String::as_str), Some("X"));
        assert_eq!(hd.query("abc", "B").unwrap().map(String::as_str), Some("Y"));
        assert_eq!(hd.query("abc", "C").unwrap().map(String::as_str), Some("Z"));

        assert_eq!(hd.query("missing", "A").unwrap(), None);
        assert_eq!(hd.query("abc", "Q").unwrap(), None);
    }

    #[test]
    fn test_add_data_then_encode() {
        let mut hd = seeded(1000, BundleMode::Batch, &["A", "B"]);

        assert!(hd.add_data("D".to_string()));
        assert!(!hd.add_data("D".to_string()));
        assert_eq!(hd.symbols().len(), 3);

        let encoded = hd.encode([("A", "D")], "x").unwrap();
        assert_ne!(encoded, HyperVector::ones(1000));
    }
}
