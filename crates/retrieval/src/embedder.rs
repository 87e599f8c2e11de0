//! Query embedder
//!
//! Deterministic hashed bag-of-tokens projection. The offline index build
//! and live query embedding share this code so their vectors live in the
//! same space; the same text always produces the same vector.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use car_advisor_text::tokenize;

/// Embedding width; loaded index artifacts must match
pub const EMBEDDING_DIM: usize = 256;

#[derive(Debug, Clone)]
pub struct QueryEmbedder {
    dim: usize,
}

impl Default for QueryEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEmbedder {
    pub fn new() -> Self {
        Self { dim: EMBEDDING_DIM }
    }

    pub fn with_dim(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed text into an L2-normalized vector; text with no tokens yields
    /// the zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            let hash = hash_token(&token);
            let slot = (hash as usize) % self.dim;
            // Sign bit from the hash, so unrelated tokens cancel rather
            // than pile up in shared slots.
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }
        l2_normalize(&mut vector);
        vector
    }
}

fn hash_token(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let embedder = QueryEmbedder::new();
        assert_eq!(embedder.embed("toyota camry 2022"), embedder.embed("toyota camry 2022"));
    }

    #[test]
    fn test_normalized() {
        let embedder = QueryEmbedder::new();
        let vector = embedder.embed("reliable family SUV with low mileage");
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = QueryEmbedder::new();
        let vector = embedder.embed("   ");
        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert!(vector.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_similar_text_scores_higher() {
        let embedder = QueryEmbedder::new();
        let query = embedder.embed("toyota camry sedan");
        let close = embedder.embed("toyota camry sedan 2022");
        let far = embedder.embed("ducati panigale motorcycle");

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&query, &close) > dot(&query, &far));
    }
}
