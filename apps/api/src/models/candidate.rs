use serde::{Deserialize, Deserializer, Serialize};

/// How the target and candidate texts are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Free-text job description against resume bodies.
    Description,
    /// Target skill list against candidate skill lists.
    Skills,
}

/// One applicant as submitted for ranking.
///
/// `skills` and `text` may both be empty: such a candidate still ranks, with a
/// similarity sub-score of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub experience_years: f64,
    #[serde(default = "default_education_level")]
    pub education_level: String,
}

pub fn default_education_level() -> String {
    "none".to_string()
}

impl CandidateRecord {
    /// Skills with case-insensitive duplicates collapsed, first spelling wins.
    pub fn distinct_skills(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for skill in &self.skills {
            let trimmed = skill.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                out.push(trimmed);
            }
        }
        out
    }

    /// The text the relevance engine sees for this candidate.
    ///
    /// Description mode prefers the resume body; skills mode prefers the skill
    /// list. Either falls back to the other when its first choice is blank.
    pub fn scoring_text(&self, mode: MatchMode) -> String {
        let body = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let skills = self.distinct_skills().join(" ");

        match (mode, body) {
            (MatchMode::Description, Some(body)) => body.to_string(),
            (MatchMode::Skills, Some(body)) if skills.is_empty() => body.to_string(),
            _ => skills,
        }
    }
}

/// The role candidates are ranked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetProfile {
    Description(String),
    Skills(Vec<String>),
}

impl TargetProfile {
    pub fn mode(&self) -> MatchMode {
        match self {
            TargetProfile::Description(_) => MatchMode::Description,
            TargetProfile::Skills(_) => MatchMode::Skills,
        }
    }

    pub fn text(&self) -> String {
        match self {
            TargetProfile::Description(text) => text.clone(),
            TargetProfile::Skills(skills) => skills
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Builds a target from upload form fields. A non-blank skill list wins
    /// over a description; `None` when neither carries any text.
    pub fn from_form_fields(
        description: Option<&str>,
        skills_csv: Option<&str>,
    ) -> Option<TargetProfile> {
        let skills: Vec<String> = skills_csv
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !skills.is_empty() {
            return Some(TargetProfile::Skills(skills));
        }
        description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| TargetProfile::Description(d.to_string()))
    }
}

/// A candidate with its three sub-scores (0–100) and the blended composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: CandidateRecord,
    pub similarity: f64,
    pub experience: f64,
    pub education: f64,
    /// Two-decimal composite score, 0 – 100.
    pub composite: f64,
    pub status: StatusTier,
    pub summary: String,
}

/// Recommendation tier derived from the composite score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTier {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider")]
    Consider,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl StatusTier {
    pub fn from_composite(composite: f64) -> Self {
        if composite >= 90.0 {
            StatusTier::HighlyRecommended
        } else if composite >= 80.0 {
            StatusTier::Recommended
        } else if composite >= 70.0 {
            StatusTier::Consider
        } else {
            StatusTier::UnderReview
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based position after sorting.
    pub rank: usize,
    #[serde(flatten)]
    pub scored: ScoredCandidate,
}

/// Candidates sorted by composite descending; ties keep input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBatch {
    pub candidates: Vec<RankedCandidate>,
    pub scorer_backend: String, // "tfidf" — for transparency
}

impl RankedBatch {
    pub fn empty(scorer_backend: &str) -> Self {
        Self {
            candidates: Vec::new(),
            scorer_backend: scorer_backend.to_string(),
        }
    }

    /// Tier counts and the mean composite (two decimals, 0 for an empty batch).
    pub fn statistics(&self) -> BatchStatistics {
        let mut stats = BatchStatistics {
            total: self.candidates.len(),
            ..BatchStatistics::default()
        };
        let mut sum = 0.0;
        for ranked in &self.candidates {
            sum += ranked.scored.composite;
            match ranked.scored.status {
                StatusTier::HighlyRecommended => stats.highly_recommended += 1,
                StatusTier::Recommended => stats.recommended += 1,
                StatusTier::Consider => stats.consider += 1,
                StatusTier::UnderReview => stats.under_review += 1,
            }
        }
        if stats.total > 0 {
            stats.average_score = (sum / stats.total as f64 * 100.0).round() / 100.0;
        }
        stats
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.candidates
            .iter()
            .map(|ranked| ExportRow {
                id: ranked.scored.candidate.id.clone(),
                name: ranked.scored.candidate.name.clone(),
                email: ranked.scored.candidate.email.clone(),
                score: ranked.scored.composite,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total: usize,
    pub highly_recommended: usize,
    pub recommended: usize,
    pub consider: usize,
    pub under_review: usize,
    pub average_score: f64,
}

/// Compact LMS export projection of a ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub score: f64,
}

/// Accepts `"id": 7` as well as `"id": "7"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}
