use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPERIENCE_CAP_YEARS: f64 = 10.0;

/// Education level → rank lookup. Keys are stored lowercase and trimmed.
///
/// Default: phd=5, masters=4, bachelor=3, hnd=2, diploma=1, none=0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRanks {
    ranks: BTreeMap<String, u32>,
}

impl Default for EducationRanks {
    fn default() -> Self {
        Self::from_pairs([
            ("phd", 5),
            ("masters", 4),
            ("bachelor", 3),
            ("hnd", 2),
            ("diploma", 1),
            ("none", 0),
        ])
    }
}

impl EducationRanks {
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, u32)>) -> Self {
        let ranks = pairs
            .into_iter()
            .map(|(level, rank)| (level.as_ref().trim().to_lowercase(), rank))
            .collect();
        Self { ranks }
    }

    /// Unknown, blank and "none" levels all rank 0.
    pub fn rank_of(&self, level: &str) -> u32 {
        self.ranks
            .get(&level.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn max_rank(&self) -> u32 {
        self.ranks.values().copied().max().unwrap_or(0)
    }

    /// `rank / max_rank × 100`; 0 when the table has no positive rank.
    pub fn score(&self, level: &str) -> f64 {
        let max = self.max_rank();
        if max == 0 {
            return 0.0;
        }
        self.rank_of(level) as f64 / max as f64 * 100.0
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// `min(years, cap) / cap × 100`. Callers reject negative years beforehand.
pub fn experience_score(years: f64, cap_years: f64) -> f64 {
    years.min(cap_years) / cap_years * 100.0
}
