//! Composite Ranker — blends sub-scores into one composite and orders candidates.

use serde::{Deserialize, Serialize};

use crate::models::candidate::{CandidateRecord, RankedCandidate, ScoredCandidate, StatusTier};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.60,
            experience: 0.25,
            education: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.experience + self.education
    }

    /// Weights must be finite, non-negative and sum to 1.0 (±1e-6).
    pub fn is_valid(&self) -> bool {
        let parts = [self.skill, self.experience, self.education];
        parts.iter().all(|w| w.is_finite() && *w >= 0.0) && (self.sum() - 1.0).abs() <= 1e-6
    }
}

/// The three normalized inputs to the composite, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub similarity: f64,
    pub experience: f64,
    pub education: f64,
}

/// Rounds half away from zero to two decimals.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combined score: W_skill*similarity + W_exp*experience + W_edu*education,
/// rounded to two decimals and clamped to [0, 100].
pub fn compute_composite(scores: &SubScores, weights: &ScoringWeights) -> f64 {
    let blended = scores.similarity * weights.skill
        + scores.experience * weights.experience
        + scores.education * weights.education;
    round_to_cents(blended).clamp(0.0, 100.0)
}

pub fn build_summary(scores: &SubScores) -> String {
    format!(
        "Skill relevance {:.1}/100, experience {:.1}/100, education {:.1}/100.",
        scores.similarity, scores.experience, scores.education
    )
}

pub fn score_candidate(
    candidate: CandidateRecord,
    scores: SubScores,
    weights: &ScoringWeights,
) -> ScoredCandidate {
    let composite = compute_composite(&scores, weights);
    ScoredCandidate {
        composite,
        status: StatusTier::from_composite(composite),
        summary: build_summary(&scores),
        similarity: scores.similarity,
        experience: scores.experience,
        education: scores.education,
        candidate,
    }
}

/// Sorts descending by composite and assigns 1-based ranks.
/// `sort_by` is stable, so equal composites keep their input order.
pub fn rank_candidates(mut scored: Vec<ScoredCandidate>) -> Vec<RankedCandidate> {
    scored.sort_by(|a, b| b.composite.total_cmp(&a.composite));
    scored
        .into_iter()
        .enumerate()
        .map(|(index, scored)| RankedCandidate {
            rank: index + 1,
            scored,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(id: &str) -> CandidateRecord {
        CandidateRecord {
            id: id.to_string(),
            name: format!("Applicant {id}"),
            email: None,
            role: None,
            skills: vec![],
            text: None,
            experience_years: 0.0,
            education_level: "none".to_string(),
        }
    }

    fn subs(similarity: f64, experience: f64, education: f64) -> SubScores {
        SubScores {
            similarity,
            experience,
            education,
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-9);
        assert!(w.is_valid());
    }

    #[test]
    fn test_invalid_weights_detected() {
        let w = ScoringWeights {
            skill: 0.5,
            experience: 0.5,
            education: 0.5,
        };
        assert!(!w.is_valid());
        let w = ScoringWeights {
            skill: 1.2,
            experience: -0.2,
            education: 0.0,
        };
        assert!(!w.is_valid());
    }

    #[test]
    fn test_composite_full_marks() {
        let w = ScoringWeights::default();
        assert_eq!(compute_composite(&subs(100.0, 100.0, 100.0), &w), 100.0);
    }

    #[test]
    fn test_composite_partial() {
        let w = ScoringWeights::default();
        // 0.6*50 + 0.25*40 + 0.15*60 = 30 + 10 + 9 = 49
        let score = compute_composite(&subs(50.0, 40.0, 60.0), &w);
        assert!((score - 49.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_composite_rounds_to_two_decimals() {
        let w = ScoringWeights {
            skill: 1.0,
            experience: 0.0,
            education: 0.0,
        };
        assert_eq!(compute_composite(&subs(28.671_1, 0.0, 0.0), &w), 28.67);
        assert_eq!(compute_composite(&subs(28.676, 0.0, 0.0), &w), 28.68);
    }

    #[test]
    fn test_summary_order_and_precision() {
        let summary = build_summary(&subs(28.6711, 40.0, 60.0));
        assert_eq!(
            summary,
            "Skill relevance 28.7/100, experience 40.0/100, education 60.0/100."
        );
    }

    #[test]
    fn test_status_follows_composite() {
        let w = ScoringWeights::default();
        let top = score_candidate(candidate("top"), subs(100.0, 100.0, 80.0), &w);
        assert_eq!(top.composite, 97.0);
        assert_eq!(top.status, StatusTier::HighlyRecommended);
        let low = score_candidate(candidate("low"), subs(10.0, 10.0, 10.0), &w);
        assert_eq!(low.status, StatusTier::UnderReview);
    }

    #[test]
    fn test_rank_is_descending() {
        let w = ScoringWeights::default();
        let scored = vec![
            score_candidate(candidate("a"), subs(10.0, 10.0, 10.0), &w),
            score_candidate(candidate("b"), subs(90.0, 90.0, 90.0), &w),
            score_candidate(candidate("c"), subs(50.0, 50.0, 50.0), &w),
        ];
        let ranked = rank_candidates(scored);
        let ids: Vec<&str> = ranked.iter().map(|r| r.scored.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let w = ScoringWeights::default();
        let scored: Vec<_> = ["first", "second", "third"]
            .into_iter()
            .map(|id| score_candidate(candidate(id), subs(20.0, 20.0, 20.0), &w))
            .collect();
        let ranked = rank_candidates(scored);
        let ids: Vec<&str> = ranked.iter().map(|r| r.scored.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    fn arb_weights() -> impl Strategy<Value = ScoringWeights> {
        (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            ScoringWeights {
                skill: lo,
                experience: hi - lo,
                education: 1.0 - hi,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_composite_stays_in_range(
            weights in arb_weights(),
            s in 0.0f64..=100.0,
            e in 0.0f64..=100.0,
            d in 0.0f64..=100.0,
        ) {
            let score = compute_composite(&subs(s, e, d), &weights);
            prop_assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
    }
}
