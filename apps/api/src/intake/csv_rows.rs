//! CSV intake — decodes an uploaded applicant sheet into `CandidateRecord`s.
//!
//! Expected header (order free, extra columns ignored):
//! `name,email,role,skills,experience_years,education_level[,text]`

use serde::Deserialize;
use tracing::debug;

use crate::intake::IntakeError;
use crate::models::candidate::{default_education_level, CandidateRecord};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    /// Comma-separated inside the (quoted) field.
    #[serde(default)]
    skills: Option<String>,
    #[serde(default)]
    experience_years: Option<String>,
    #[serde(default)]
    education_level: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Parses CSV bytes. Row ids are 1-based data-row numbers.
///
/// A missing or unparseable `experience_years` rejects the upload rather
/// than defaulting to 0.
pub fn parse_candidates_csv(bytes: &[u8]) -> Result<Vec<CandidateRecord>, IntakeError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|source| IntakeError::Csv {
            row: row_number,
            source,
        })?;
        records.push(row_to_record(row_number, row)?);
    }

    debug!(rows = records.len(), "decoded applicant CSV");
    Ok(records)
}

fn row_to_record(row_number: usize, row: CsvRow) -> Result<CandidateRecord, IntakeError> {
    let raw_years = non_blank(row.experience_years).ok_or_else(|| IntakeError::InvalidField {
        row: row_number,
        field: "experience_years",
        reason: "missing value".to_string(),
    })?;
    let experience_years = raw_years
        .parse::<f64>()
        .map_err(|_| IntakeError::InvalidField {
            row: row_number,
            field: "experience_years",
            reason: format!("'{raw_years}' is not a number"),
        })?;

    let skills = row
        .skills
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    Ok(CandidateRecord {
        id: row_number.to_string(),
        name: non_blank(row.name).unwrap_or_else(|| format!("Applicant {row_number}")),
        email: non_blank(row.email),
        role: non_blank(row.role),
        skills,
        text: non_blank(row.text),
        experience_years,
        education_level: non_blank(row.education_level).unwrap_or_else(default_education_level),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
