// Intake: turns uploads (CSV sheets, resume documents) into CandidateRecords.
// No scoring happens here.

pub mod csv_rows;
pub mod documents;
pub mod resume;

use thiserror::Error;

use crate::intake::documents::extract_document;
use crate::intake::resume::infer_profile;
use crate::models::candidate::CandidateRecord;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("CSV row {row} could not be read: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV row {row}: invalid {field}: {reason}")]
    InvalidField {
        row: usize,
        field: &'static str,
        reason: String,
    },
}

/// Extracts and infers one record per uploaded resume. Ids are 1-based
/// upload positions; unreadable documents become empty-text candidates.
pub fn candidates_from_resumes<'a>(
    files: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Vec<CandidateRecord> {
    files
        .into_iter()
        .enumerate()
        .map(|(index, (file_name, bytes))| {
            let document = extract_document(file_name, bytes);
            infer_profile(&document.text, file_name)
                .into_record((index + 1).to_string(), document.text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::candidate::TargetProfile;
    use crate::ranking::pipeline::{rank_batch, ScoringConfig};
    use crate::ranking::similarity::TfIdfScorer;

    #[test]
    fn test_candidates_from_resumes_keeps_bad_files() {
        let files: Vec<(&str, &[u8])> = vec![
            ("ada.txt", &b"Ada Obi\n4 years of experience with Python and SQL. BSc Maths."[..]),
            ("broken.docx", &b"garbage"[..]),
        ];
        let records = candidates_from_resumes(files);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].name, "Ada Obi");
        assert_eq!(records[0].experience_years, 4.0);
        assert_eq!(records[0].education_level, "bachelor");

        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].name, "broken");
        assert_eq!(records[1].text.as_deref(), Some(""));
        assert!(records[1].skills.is_empty());
    }

    #[test]
    fn test_absurd_experience_claim_does_not_sink_batch() {
        let huge = format!("Tolu Ade\n{} years of experience", "9".repeat(400));
        let files: Vec<(&str, &[u8])> = vec![
            ("ok.txt", &b"Kemi Ade\n3 years of experience"[..]),
            ("big.txt", huge.as_bytes()),
        ];
        let records = candidates_from_resumes(files);
        let years: Vec<f64> = records.iter().map(|r| r.experience_years).collect();
        assert_eq!(years, vec![3.0, 0.0]);

        let batch = rank_batch(
            records,
            &TargetProfile::Description("experienced analyst".to_string()),
            &ScoringConfig::default(),
            &TfIdfScorer,
        )
        .unwrap();
        assert_eq!(batch.candidates.len(), 2);
    }
}
