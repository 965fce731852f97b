//! Pipeline Orchestrator — validates a batch, runs relevance and feature
//! scoring, and returns the ranked output.
//!
//! Holds no state between calls: every vocabulary and score lives only for
//! the duration of one `rank_batch` invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::candidate::{CandidateRecord, RankedBatch, TargetProfile};
use crate::ranking::composite::{rank_candidates, score_candidate, ScoringWeights, SubScores};
use crate::ranking::features::{experience_score, EducationRanks, DEFAULT_EXPERIENCE_CAP_YEARS};
use crate::ranking::similarity::RelevanceScorer;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Invalid candidate #{index} (id '{id}'): {reason}")]
    InvalidInput {
        index: usize,
        id: String,
        reason: String,
    },

    #[error("Invalid target profile: {0}")]
    InvalidTarget(String),

    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal ranking error: {0}")]
    Internal(String),
}

/// Tunables for one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub experience_cap_years: f64,
    pub education_ranks: EducationRanks,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            experience_cap_years: DEFAULT_EXPERIENCE_CAP_YEARS,
            education_ranks: EducationRanks::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), RankingError> {
        if !self.weights.is_valid() {
            return Err(RankingError::InvalidConfig(format!(
                "weights must be non-negative and sum to 1.0 (got {:.4})",
                self.weights.sum()
            )));
        }
        if !(self.experience_cap_years.is_finite() && self.experience_cap_years > 0.0) {
            return Err(RankingError::InvalidConfig(format!(
                "experience cap must be a positive number of years (got {})",
                self.experience_cap_years
            )));
        }
        Ok(())
    }
}

/// Ranks `candidates` against `target`.
///
/// Policy: the first invalid record rejects the whole batch. An empty batch
/// is not an error and yields an empty result. An invalid `config` is
/// rejected before any candidate is looked at.
pub fn rank_batch(
    candidates: Vec<CandidateRecord>,
    target: &TargetProfile,
    config: &ScoringConfig,
    relevance: &dyn RelevanceScorer,
) -> Result<RankedBatch, RankingError> {
    config.validate()?;

    if candidates.is_empty() {
        debug!("empty candidate batch; nothing to rank");
        return Ok(RankedBatch::empty(relevance.backend()));
    }

    if target.is_blank() {
        return Err(RankingError::InvalidTarget(
            "target description or skills cannot be empty".to_string(),
        ));
    }

    for (index, candidate) in candidates.iter().enumerate() {
        validate_candidate(index, candidate)?;
    }

    let mode = target.mode();
    info!(
        candidates = candidates.len(),
        ?mode,
        backend = relevance.backend(),
        "ranking candidate batch"
    );

    let texts: Vec<String> = candidates.iter().map(|c| c.scoring_text(mode)).collect();
    let similarities = relevance.score(&target.text(), &texts, mode);
    if similarities.len() != candidates.len() {
        return Err(RankingError::Internal(format!(
            "relevance backend '{}' returned {} scores for {} candidates",
            relevance.backend(),
            similarities.len(),
            candidates.len()
        )));
    }

    let scored = candidates
        .into_iter()
        .zip(similarities)
        .map(|(candidate, similarity)| {
            let scores = SubScores {
                similarity,
                experience: experience_score(
                    candidate.experience_years,
                    config.experience_cap_years,
                ),
                education: config.education_ranks.score(&candidate.education_level),
            };
            score_candidate(candidate, scores, &config.weights)
        })
        .collect();

    Ok(RankedBatch {
        candidates: rank_candidates(scored),
        scorer_backend: relevance.backend().to_string(),
    })
}

fn validate_candidate(index: usize, candidate: &CandidateRecord) -> Result<(), RankingError> {
    let invalid = |reason: String| RankingError::InvalidInput {
        index,
        id: candidate.id.clone(),
        reason,
    };

    if candidate.name.trim().is_empty() {
        return Err(invalid("name cannot be empty".to_string()));
    }
    if !candidate.experience_years.is_finite() {
        return Err(invalid("experience_years must be a finite number".to_string()));
    }
    if candidate.experience_years < 0.0 {
        return Err(invalid(format!(
            "experience_years cannot be negative (got {})",
            candidate.experience_years
        )));
    }
    Ok(())
}
