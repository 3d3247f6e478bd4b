//! Deterministic hashing embedding source.
//!
//! Terms are hashed into fixed-dimension buckets and weighted by term
//! frequency. No model, no network: the same text always yields the same
//! vector, which makes it usable offline and in tests.

use std::collections::HashMap;

use aurora_core::errors::AuroraResult;
use aurora_core::traits::IEmbeddingSource;
use aurora_keyword::tokenize;

pub const HASHING_SOURCE_NAME: &str = "hashing";

/// Bucket-hashing embedding source.
///
/// Uses the identifier-aware tokenizer, so `validateToken` and
/// "validate token" land in overlapping buckets.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingSource {
    dimensions: usize,
}

impl HashingEmbeddingSource {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket for a term.
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in tf {
            // IDF stand-in: longer terms weigh more.
            let weight = 1.0 + (term.len() as f32).ln();
            vec[Self::bucket(term, self.dimensions)] += (count / total) * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingSource for HashingEmbeddingSource {
    fn embed(&self, text: &str) -> AuroraResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> AuroraResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        HASHING_SOURCE_NAME
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn empty_text_is_zero_vector() {
        let s = HashingEmbeddingSource::new(64);
        let v = s.embed("").unwrap();
        assert_eq!(v.len(), 64);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn unit_norm() {
        let s = HashingEmbeddingSource::new(256);
        let v = s.embed("connection pool acquire timeout").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn deterministic_across_instances() {
        let a = HashingEmbeddingSource::new(128).embed("same text").unwrap();
        let b = HashingEmbeddingSource::new(128).embed("same text").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_dimensions_clamped() {
        let s = HashingEmbeddingSource::new(0);
        assert_eq!(s.dimensions(), 1);
        assert_eq!(s.embed("anything here").unwrap().len(), 1);
    }

    #[test]
    fn identifier_matches_its_words() {
        let s = HashingEmbeddingSource::new(384);
        let ident = s.embed("validateToken").unwrap();
        let words = s.embed("validate the token").unwrap();
        let other = s.embed("render html template").unwrap();
        assert!(cosine_similarity(&ident, &words) > cosine_similarity(&ident, &other));
    }

    #[test]
    fn batch_matches_single() {
        let s = HashingEmbeddingSource::new(96);
        let texts = vec!["alpha beta".to_string(), "gamma delta".to_string()];
        let batch = s.embed_batch(&texts).unwrap();
        for (text, vec) in texts.iter().zip(&batch) {
            assert_eq!(&s.embed(text).unwrap(), vec);
        }
    }
}
