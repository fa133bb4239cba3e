//! Symbol codebook
//!
//! Maps every known symbol to a fixed random bipolar hypervector. The
//! codebook only grows: entries are never removed or regenerated.

use rand::Rng;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::HyperVector;

/// Append-only mapping from symbols to random base hypervectors
#[derive(Debug, Clone)]
pub struct Codebook<S> {
    dimension: usize,
    /// Symbols in insertion order
    symbols: Vec<S>,
    vectors: HashMap<S, HyperVector>,
}

impl<S> Codebook<S>
where
    S: Eq + Hash + Clone,
{
    /// Empty codebook for vectors of the given dimension
    pub fn empty(dimension: usize) -> Self {
        Self {
            dimension,
            symbols: Vec::new(),
            vectors: HashMap::new(),
        }
    }

    /// Generate one random hypervector per distinct symbol
    pub fn new<I, R>(dimension: usize, symbols: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = S>,
        R: Rng + ?Sized,
    {
        let mut codebook = Self::empty(dimension);
        for symbol in symbols {
            codebook.add(symbol, rng);
        }
        codebook
    }

    /// Insert a fresh random hypervector for `symbol` unless it is already known
    ///
    /// Returns `true` if the symbol was new.
    pub fn add<R: Rng + ?Sized>(&mut self, symbol: S, rng: &mut R) -> bool {
        if self.vectors.contains_key(&symbol) {
            return false;
        }

        let hv = HyperVector::random_with(self.dimension, rng);
        self.symbols.push(symbol.clone());
        self.vectors.insert(symbol, hv);
        true
    }

    /// Look up a symbol's hypervector
    pub fn get<Q>(&self, symbol: &Q) -> Option<&HyperVector>
    where
        S: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.vectors.get(symbol)
    }

    pub fn contains<Q>(&self, symbol: &Q) -> bool
    where
        S: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.vectors.contains_key(symbol)
    }

    /// Known symbols in the order they were added
    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }

    /// Iterate over `(symbol, hypervector)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&S, &HyperVector)> + '_ {
        self.symbols
            .iter()
            .filter_map(move |s| self.vectors.get(s).map(|hv| (s, hv)))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
