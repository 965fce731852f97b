//! Resume inference — pulls candidate fields out of extracted resume text with
//! simple patterns. No NLP model; misses fall back to neutral defaults.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::candidate::CandidateRecord;

/// Common skills recognized in resume text (matched case-insensitively on
/// word boundaries).
const COMMON_SKILLS: &[&str] = &[
    // Programming languages
    "JavaScript", "Python", "Java", "C++", "C#", "PHP", "Ruby", "Go", "Rust", "TypeScript",
    "Swift", "Kotlin", "Dart", "Scala", "R", "MATLAB",
    // Web
    "React", "Angular", "Vue.js", "Node.js", "Express", "Django", "Flask", "Spring Boot",
    "Laravel", "HTML", "CSS", "SASS", "Tailwind CSS",
    // Mobile
    "React Native", "Flutter", "Android", "iOS",
    // Databases
    "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis", "Oracle", "SQLite", "DynamoDB",
    "Cassandra", "Elasticsearch",
    // Cloud and DevOps
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Terraform", "Ansible",
    "DevOps", "Linux", "Git",
    // Data
    "Machine Learning", "Deep Learning", "TensorFlow", "PyTorch", "Scikit-learn", "Pandas",
    "NumPy", "Data Analysis", "Data Science", "NLP", "Computer Vision", "Excel",
    // Other
    "Agile", "Scrum", "REST API", "GraphQL", "Microservices", "Unit Testing",
    "Integration Testing", "Security", "Blockchain", "Web3", "Communication",
];

/// Degree patterns, highest rank first, mapped to education table keys.
const EDUCATION_PATTERNS: &[(&str, &str)] = &[
    ("phd", r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral)\b"),
    ("masters", r"(?i)\b(?:masters?|m\.?sc|mba|m\.?tech)\b"),
    ("bachelor", r"(?i)\b(?:bachelors?|b\.?sc|b\.?eng|b\.?tech)\b"),
    ("hnd", r"(?i)\b(?:hnd|higher national diploma)\b"),
    ("diploma", r"(?i)\bdiploma\b"),
];

const EXPERIENCE_PATTERNS: &[&str] = &[
    r"(?i)(\d+(?:\.\d+)?)\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:professional\s+)?experience",
    r"(?i)experience\s*[:\-]?\s*(\d+(?:\.\d+)?)\+?\s*(?:years?|yrs?)",
    r"(?i)(\d+(?:\.\d+)?)\+?\s*(?:years?|yrs?)\s+in\b",
];

/// Stated or date-derived experience outside (0, 35) years is discarded.
const MAX_PLAUSIBLE_YEARS: f64 = 35.0;

/// Fields inferred from one resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub education_level: String,
    pub experience_years: f64,
    /// Completeness heuristic, 0 – 100. Informational; not part of the composite.
    pub quality_score: u32,
}

impl ResumeProfile {
    pub fn into_record(self, id: String, text: String) -> CandidateRecord {
        CandidateRecord {
            id,
            name: self.name,
            email: self.email,
            role: None,
            skills: self.skills,
            text: Some(text),
            experience_years: self.experience_years,
            education_level: self.education_level,
        }
    }
}

/// Infers a profile from resume text. `file_name` supplies the fallback name.
pub fn infer_profile(text: &str, file_name: &str) -> ResumeProfile {
    let email = extract_email(text);
    let phone = extract_phone(text);
    let skills = extract_skills(text);
    let education = extract_education(text);
    let experience = extract_experience(text);

    let quality_score = quality_score(
        text.split_whitespace().count(),
        &[
            (email.is_some(), 15),
            (phone.is_some(), 10),
            (education.is_some(), 15),
            (experience.is_some(), 15),
            (!skills.is_empty(), 15),
        ],
    );

    ResumeProfile {
        name: extract_name(text).unwrap_or_else(|| file_stem(file_name)),
        email,
        phone,
        skills,
        education_level: education.unwrap_or("none").to_string(),
        experience_years: experience.unwrap_or(0.0),
        quality_score,
    }
}

/// Resume completeness: a length band plus points for each detected section.
pub fn resume_quality(text: &str) -> u32 {
    infer_profile(text, "").quality_score
}

fn quality_score(word_count: usize, sections: &[(bool, u32)]) -> u32 {
    let length_points = match word_count {
        500..=2000 => 30,
        300..=499 | 2001..=3000 => 20,
        _ => 0,
    };
    let section_points: u32 = sections
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum();
    (length_points + section_points).min(100)
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("valid regex")
    })
}

fn labelled_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?i:name)\s*:\s*([A-Z][a-z]+[ \t]+[A-Z][a-z]+)").expect("valid regex")
    })
}

fn name_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z'-]+){1,3}$").expect("valid regex"))
}

fn skill_res() -> &'static [(&'static str, Regex)] {
    static RES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RES.get_or_init(|| {
        COMMON_SKILLS
            .iter()
            .map(|&skill| {
                let pattern = format!(
                    r"(?i)(?:^|[^a-z0-9+#&]){}(?:$|[^a-z0-9+#&])",
                    regex::escape(skill)
                );
                (skill, Regex::new(&pattern).expect("escaped skill pattern"))
            })
            .collect()
    })
}

fn education_res() -> &'static [(&'static str, Regex)] {
    static RES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RES.get_or_init(|| {
        EDUCATION_PATTERNS
            .iter()
            .map(|&(key, pattern)| (key, Regex::new(pattern).expect("valid regex")))
            .collect()
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"))
}

fn experience_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        EXPERIENCE_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).expect("valid regex"))
            .collect()
    })
}

pub fn extract_email(text: &str) -> Option<String> {
    email_re().find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    phone_re().find(text).map(|m| m.as_str().trim().to_string())
}

/// `Name: First Last`, else the first line shaped like a personal name.
pub fn extract_name(text: &str) -> Option<String> {
    if let Some(caps) = labelled_name_re().captures(text) {
        return Some(caps[1].split_whitespace().collect::<Vec<_>>().join(" "));
    }
    text.lines()
        .map(str::trim)
        .find(|line| name_line_re().is_match(line))
        .map(String::from)
}

pub fn extract_skills(text: &str) -> Vec<String> {
    skill_res()
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

/// Highest-ranked degree mentioned, as an education table key.
pub fn extract_education(text: &str) -> Option<&'static str> {
    education_res()
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(key, _)| *key)
}

/// First plausible "N years" statement, else the span between the earliest
/// and latest four-digit year in the text.
pub fn extract_experience(text: &str) -> Option<f64> {
    experience_res()
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .find(|years| is_plausible_years(*years))
        .or_else(|| experience_from_year_span(text))
}

fn experience_from_year_span(text: &str) -> Option<f64> {
    let years: Vec<u32> = year_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    let (min, max) = (years.iter().min()?, years.iter().max()?);
    let span = f64::from(max - min);
    is_plausible_years(span).then_some(span)
}

fn is_plausible_years(years: f64) -> bool {
    years.is_finite() && years > 0.0 && years < MAX_PLAUSIBLE_YEARS
}

fn file_stem(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
        .trim();
    if stem.is_empty() {
        "Unnamed applicant".to_string()
    } else {
        stem.to_string()
    }
}
