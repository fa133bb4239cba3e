//! Similarity metrics for hypervectors

use crate::{HyperVector, Result};

/// Cosine similarity between two hypervectors
///
/// Returns a value in [-1, 1] where 1 is identical and -1 is the exact negation.
pub fn cosine_similarity(a: &HyperVector, b: &HyperVector) -> Result<f32> {
    a.similarity(b)
}

/// Hamming distance (number of differing components)
pub fn hamming_distance(a: &HyperVector, b: &HyperVector) -> Result<usize> {
    a.hamming_distance(b)
}

/// Most similar candidate to `query`
///
/// Candidates are scanned in order; a later candidate only wins with a
/// strictly higher similarity. `None` when there are no candidates.
pub fn best_match<'a, K, I>(query: &HyperVector, candidates: I) -> Result<Option<(K, f32)>>
where
    I: IntoIterator<Item = (K, &'a HyperVector)>,
{
    let mut best: Option<(K, f32)> = None;

    for (key, hv) in candidates {
        let sim = query.similarity(hv)?;
        let better = match &best {
            Some((_, best_sim)) => sim > *best_sim,
            None => true,
        };
        if better {
            best = Some((key, sim));
        }
    }

    Ok(best)
}

/// Find k most similar vectors from a set
///
/// Sorted by descending similarity; equal similarities keep input order.
pub fn top_k_similar<'a>(
    query: &HyperVector,
    candidates: &'a [HyperVector],
    k: usize,
) -> Result<Vec<(usize, &'a HyperVector, f32)>> {
    let mut similarities = candidates
        .iter()
        .enumerate()
        .map(|(idx, hv)| Ok((idx, hv, query.similarity(hv)?)))
        .collect::<Result<Vec<_>>>()?;

    similarities.sort_by(|a, b| b.2.total_cmp(&a.2));
    similarities.truncate(k);

    Ok(similarities)
}

/// Threshold-based search: find all vectors at or above a similarity threshold
pub fn threshold_search<'a>(
    query: &HyperVector,
    candidates: &'a [HyperVector],
    threshold: f32,
) -> Result<Vec<(usize, &'a HyperVector, f32)>> {
    let mut results = Vec::new();

    for (idx, hv) in candidates.iter().enumerate() {
        let sim = query.similarity(hv)?;
        if sim >= threshold {
            results.push((idx, hv, sim));
        }
    }

    Ok(results)
}
