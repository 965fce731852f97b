//! Vector Similarity Engine — pluggable, trait-based relevance scorer.
//!
//! Default: `TfIdfScorer` (pure-Rust, deterministic, request-scoped vocabulary).
//!
//! `AppState` holds an `Arc<dyn RelevanceScorer>`; the pipeline only sees the trait.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::models::candidate::MatchMode;
use crate::ranking::normalize::{tokenize, CharClass};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores each candidate text against the target text on a 0–100 scale.
///
/// Implementations must return exactly one score per candidate, in input
/// order, and must not keep state between calls.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, target: &str, candidates: &[String], mode: MatchMode) -> Vec<f64>;

    /// Short backend label reported alongside ranked output.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// TF-IDF cosine relevance over the corpus {target} ∪ {candidates}.
///
/// Algorithm:
/// 1. Tokenize every document (stop words dropped in description mode)
/// 2. idf(t) = ln((1 + n) / (1 + df(t))) + 1
/// 3. weight = raw term count × idf
/// 4. relevance = cosine(target, candidate) × 100
pub struct TfIdfScorer;

impl RelevanceScorer for TfIdfScorer {
    fn score(&self, target: &str, candidates: &[String], mode: MatchMode) -> Vec<f64> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let (class, drop_stop_words) = analyzer_for(mode);
        let target_terms = tokenize(target, class, drop_stop_words);
        let candidate_terms: Vec<Vec<String>> = candidates
            .iter()
            .map(|text| tokenize(text, class, drop_stop_words))
            .collect();

        let space = VectorSpace::build(
            std::iter::once(&target_terms).chain(candidate_terms.iter()),
        );

        if space.is_degenerate() {
            debug!(
                vocabulary = space.len(),
                candidates = candidates.len(),
                "degenerate corpus; similarity defaults to 0"
            );
            return vec![0.0; candidates.len()];
        }

        let target_vec = space.vectorize(&target_terms);
        candidate_terms
            .iter()
            .map(|terms| {
                let candidate_vec = space.vectorize(terms);
                (cosine_similarity(&target_vec, &candidate_vec) * 100.0).clamp(0.0, 100.0)
            })
            .collect()
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

fn analyzer_for(mode: MatchMode) -> (CharClass, bool) {
    match mode {
        MatchMode::Description => (CharClass::Alphanumeric, true),
        MatchMode::Skills => (CharClass::Alphabetic, false),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vector space
// ────────────────────────────────────────────────────────────────────────────

/// Request-scoped vocabulary with per-term idf weights.
/// `BTreeMap` keeps term order, and so summation order, stable across runs.
struct VectorSpace {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl VectorSpace {
    fn build<'a>(documents: impl Iterator<Item = &'a Vec<String>>) -> Self {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut n_docs = 0usize;

        for terms in documents {
            n_docs += 1;
            let distinct: BTreeSet<&String> = terms.iter().collect();
            for term in distinct {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = n_docs as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Self { vocabulary, idf }
    }

    fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// An empty vocabulary, or one with a single term, cannot separate documents.
    fn is_degenerate(&self) -> bool {
        self.len() < 2
    }

    fn vectorize(&self, terms: &[String]) -> Vec<f64> {
        let mut weights = vec![0.0; self.len()];
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                weights[index] += 1.0;
            }
        }
        for (weight, idf) in weights.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }
        weights
    }
}

/// Cosine similarity in [0, 1]; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
