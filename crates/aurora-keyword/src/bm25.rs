//! BM25 inverted index.
//!
//! score(q, d) = Σ_t idf(t) · tf(t,d)·(k1+1) / (tf(t,d) + k1·(1 − b + b·|d|/avgdl))
//! with the non-negative Lucene idf: ln(1 + (N − n_t + 0.5) / (n_t + 0.5)).
//! Query terms are deduplicated before scoring.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use aurora_core::chunk::Chunk;
use aurora_core::config::KeywordConfig;

use crate::tokenizer::tokenize_with;

/// One document's term frequency for a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: u32,
    pub tf: u32,
}

/// An immutable BM25 index over a fixed document set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Index {
    k1: f64,
    b: f64,
    min_token_len: usize,
    doc_ids: Vec<String>,
    doc_lengths: Vec<u32>,
    postings: BTreeMap<String, Vec<Posting>>,
    #[serde(skip)]
    positions: HashMap<String, u32>,
}

impl Bm25Index {
    /// Build from `(id, text)` pairs. Tokenization runs in parallel.
    pub fn build(docs: &[(String, String)], config: &KeywordConfig) -> Self {
        let tokenized: Vec<Vec<String>> = docs
            .par_iter()
            .map(|(_, text)| tokenize_with(text, config.min_token_len))
            .collect();

        let mut doc_ids = Vec::with_capacity(docs.len());
        let mut doc_lengths = Vec::with_capacity(docs.len());
        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();

        for (idx, ((id, _), tokens)) in docs.iter().zip(tokenized).enumerate() {
            let doc = idx as u32;
            doc_ids.push(id.clone());
            doc_lengths.push(tokens.len() as u32);

            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tf.entry(token).or_insert(0) += 1;
            }
            for (term, count) in tf {
                postings.entry(term).or_default().push(Posting { doc, tf: count });
            }
        }

        let mut index = Self {
            k1: config.k1,
            b: config.b,
            min_token_len: config.min_token_len,
            doc_ids,
            doc_lengths,
            postings,
            positions: HashMap::new(),
        };
        index.rebuild_positions();
        index
    }

    /// Build over chunks, indexing name, signature, body and docstring.
    pub fn from_chunks(chunks: &[Chunk], config: &KeywordConfig) -> Self {
        let docs: Vec<(String, String)> = chunks
            .iter()
            .map(|c| (c.id.clone(), c.searchable_text()))
            .collect();
        Self::build(&docs, config)
    }

    /// Restore derived lookup state after deserialization.
    pub fn rebuild_positions(&mut self) {
        self.positions = self
            .doc_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as u32))
            .collect();
    }

    pub fn k1(&self) -> f64 {
        self.k1
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Whether this index was built with the same parameters as `config`.
    pub fn matches_config(&self, config: &KeywordConfig) -> bool {
        self.k1 == config.k1 && self.b == config.b && self.min_token_len == config.min_token_len
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    fn avg_doc_len(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        let total: u64 = self.doc_lengths.iter().map(|&l| u64::from(l)).sum();
        total as f64 / self.doc_lengths.len() as f64
    }

    fn idf(&self, doc_freq: usize) -> f64 {
        let n = self.doc_ids.len() as f64;
        let df = doc_freq as f64;
        ((n - df + 0.5) / (df + 0.5)).ln_1p()
    }

    fn query_terms(&self, query: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        tokenize_with(query, self.min_token_len)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    /// Per-document scores for every document matching at least one term.
    fn accumulate(&self, query: &str) -> HashMap<u32, f64> {
        let mut scores: HashMap<u32, f64> = HashMap::new();
        let avgdl = self.avg_doc_len();
        if avgdl == 0.0 {
            return scores;
        }
        for term in self.query_terms(query) {
            let Some(list) = self.postings.get(&term) else {
                continue;
            };
            let idf = self.idf(list.len());
            for p in list {
                let tf = f64::from(p.tf);
                let dl = f64::from(self.doc_lengths[p.doc as usize]);
                let denom = tf + self.k1 * (1.0 - self.b + self.b * dl / avgdl);
                *scores.entry(p.doc).or_insert(0.0) += idf * tf * (self.k1 + 1.0) / denom;
            }
        }
        scores
    }

    /// Score a single document. Unknown ids score 0.
    pub fn score(&self, query: &str, id: &str) -> f64 {
        let Some(&doc) = self.positions.get(id) else {
            return 0.0;
        };
        self.accumulate(query).get(&doc).copied().unwrap_or(0.0)
    }

    /// Scores for every document with a positive score.
    pub fn score_all(&self, query: &str) -> HashMap<String, f64> {
        self.accumulate(query)
            .into_iter()
            .map(|(doc, s)| (self.doc_ids[doc as usize].clone(), s))
            .collect()
    }

    /// Top matches, score descending then id ascending.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(String, f64)> {
        let mut hits: Vec<(String, f64)> = self.score_all(query).into_iter().collect();
        hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        hits.truncate(limit);
        hits
    }
}
