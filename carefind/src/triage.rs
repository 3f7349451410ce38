//! Screening envelopes returned by the external AI analysis service.
//!
//! The model's output is free text that usually, but not always, contains a
//! JSON object, sometimes wrapped in a Markdown code fence. The parsers here
//! never fail: when the text does not decode into the expected shape they
//! return a fixed fallback built from the raw text.
//!
//! The module also carries the keyword-based emergency check, which runs
//! locally without calling the model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted symptom description, in characters.
pub const MAX_SYMPTOMS_LEN: usize = 2000;

/// Disclaimer attached to symptom analyses that lack one.
pub const SYMPTOM_DISCLAIMER: &str = "This AI screening is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of your physician or other qualified health provider with any questions you may have regarding a medical condition.";

/// Disclaimer attached to image analyses that lack one.
pub const IMAGE_DISCLAIMER: &str = "This image analysis is not a substitute for professional medical diagnosis. Please consult a healthcare provider for proper evaluation.";

/// Disclaimer attached to refined follow-up analyses that lack one.
pub const FOLLOW_UP_DISCLAIMER: &str =
    "This AI screening is not a substitute for professional medical advice.";

/// Phrases that flag a description as an emergency without calling the model.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "can't breathe",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "not breathing",
    "heart attack",
    "stroke",
    "seizure",
    "severe allergic reaction",
    "anaphylaxis",
    "suicide",
    "severe burn",
    "poisoning",
    "overdose",
];

/// How serious the model judged the symptoms to be.
///
/// Parsed case-insensitively; anything unrecognized becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Emergency,
    #[default]
    Unknown,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" => Self::Mild,
            "moderate" => Self::Moderate,
            "severe" => Self::Severe,
            "emergency" => Self::Emergency,
            _ => Self::Unknown,
        }
    }
}

/// Structured result of a symptom analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomAnalysis {
    pub possible_causes: Vec<String>,
    pub severity: Severity,
    pub care_advice: String,
    pub doctor_visit_needed: bool,
    pub emergency: bool,
    pub follow_up_questions: Vec<String>,
    pub disclaimer: String,
}

impl Default for SymptomAnalysis {
    fn default() -> Self {
        Self {
            possible_causes: Vec::new(),
            severity: Severity::Unknown,
            care_advice: String::new(),
            doctor_visit_needed: true,
            emergency: false,
            follow_up_questions: Vec::new(),
            disclaimer: String::new(),
        }
    }
}

impl SymptomAnalysis {
    /// Whether to raise an emergency alert, combining the model's flag with
    /// the local keyword check on the original description.
    pub fn emergency_alert(&self, symptoms: &str) -> bool {
        self.emergency || quick_emergency_check(symptoms)
    }
}

/// Structured result of an image analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAnalysis {
    pub description: String,
    pub concerns: Vec<String>,
    pub medical_attention_recommended: bool,
    pub advice: String,
    pub disclaimer: String,
}

impl Default for ImageAnalysis {
    fn default() -> Self {
        Self {
            description: String::new(),
            concerns: Vec::new(),
            medical_attention_recommended: true,
            advice: String::new(),
            disclaimer: String::new(),
        }
    }
}

/// Body of the first fence opened by `opener`, if it is closed and non-empty.
fn fenced_body<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim()).filter(|body| !body.is_empty())
}

/// Pick the part of a model response that should hold the JSON object.
///
/// Prefers a ```` ```json ```` fence, then any ```` ``` ```` fence, then the
/// whole text.
///
/// # Examples
///
/// ```
/// use carefind::triage::extract_json_body;
///
/// assert_eq!(extract_json_body("Here:\n```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(extract_json_body("{\"a\": 1}"), "{\"a\": 1}");
/// ```
pub fn extract_json_body(text: &str) -> &str {
    fenced_body(text, "```json")
        .or_else(|| fenced_body(text, "```"))
        .unwrap_or(text)
}

fn decode<T: for<'de> Deserialize<'de>>(text: &str) -> Option<T> {
    match serde_json::from_str(extract_json_body(text).trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Model response is not the expected JSON, using fallback");
            None
        }
    }
}

fn ensure_disclaimer(disclaimer: &mut String, default: &str) {
    if disclaimer.trim().is_empty() {
        *disclaimer = default.to_string();
    }
}

/// Parse a symptom analysis response.
///
/// On failure, returns a fallback whose only possible cause is the first 200
/// characters of the text, with severity `Unknown`, the full text as advice,
/// and a doctor visit recommended.
pub fn parse_symptom_analysis(text: &str) -> SymptomAnalysis {
    let mut analysis = decode(text).unwrap_or_else(|| SymptomAnalysis {
        possible_causes: vec![text.chars().take(200).collect()],
        care_advice: text.to_string(),
        disclaimer: "This is AI-generated information and not a medical diagnosis. Please consult a healthcare professional.".to_string(),
        ..SymptomAnalysis::default()
    });
    ensure_disclaimer(&mut analysis.disclaimer, SYMPTOM_DISCLAIMER);
    analysis
}

/// Parse a refined analysis produced from follow-up answers.
pub fn parse_follow_up_analysis(text: &str) -> SymptomAnalysis {
    let mut analysis = decode(text).unwrap_or_else(|| SymptomAnalysis {
        possible_causes: vec!["Could not parse refined analysis".to_string()],
        care_advice: text.to_string(),
        disclaimer: "Analysis error. Please consult a doctor.".to_string(),
        ..SymptomAnalysis::default()
    });
    ensure_disclaimer(&mut analysis.disclaimer, FOLLOW_UP_DISCLAIMER);
    analysis
}

/// Parse an image analysis response.
///
/// On failure, returns the full text as the description with medical
/// attention recommended.
pub fn parse_image_analysis(text: &str) -> ImageAnalysis {
    let mut analysis = decode(text).unwrap_or_else(|| ImageAnalysis {
        description: text.to_string(),
        advice: "Please consult with a healthcare professional for proper evaluation.".to_string(),
        disclaimer: "This AI analysis is not a medical diagnosis.".to_string(),
        ..ImageAnalysis::default()
    });
    ensure_disclaimer(&mut analysis.disclaimer, IMAGE_DISCLAIMER);
    analysis
}

/// Check a description for emergency keywords, ignoring case.
///
/// # Examples
///
/// ```
/// use carefind::triage::quick_emergency_check;
///
/// assert!(quick_emergency_check("Sudden CHEST PAIN since morning"));
/// assert!(!quick_emergency_check("mild headache"));
/// ```
pub fn quick_emergency_check(symptoms: &str) -> bool {
    let lower = symptoms.to_lowercase();
    EMERGENCY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Result of the keyword-only emergency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyCheck {
    pub is_emergency: bool,
    pub message: &'static str,
    pub disclaimer: &'static str,
}

/// Run the keyword check and attach the user-facing wording.
pub fn check_emergency(symptoms: &str) -> EmergencyCheck {
    let is_emergency = quick_emergency_check(symptoms);
    EmergencyCheck {
        is_emergency,
        message: if is_emergency {
            "Emergency symptoms detected. Seek immediate medical attention!"
        } else {
            "No immediate emergency keywords detected. However, if you feel this is urgent, please seek medical help."
        },
        disclaimer: "This is a basic keyword check and not a complete medical assessment.",
    }
}

/// Rejected symptom descriptions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymptomsError {
    #[error("Symptoms are required: please provide a description of your symptoms")]
    Empty,

    #[error("Symptoms description too long: {len} characters (limit {max})")]
    TooLong { len: usize, max: usize },
}

/// Validate a symptom description, returning it trimmed.
pub fn validate_symptoms(symptoms: &str) -> Result<&str, SymptomsError> {
    let trimmed = symptoms.trim();
    if trimmed.is_empty() {
        return Err(SymptomsError::Empty);
    }
    let len = symptoms.chars().count();
    if len > MAX_SYMPTOMS_LEN {
        return Err(SymptomsError::TooLong {
            len,
            max: MAX_SYMPTOMS_LEN,
        });
    }
    Ok(trimmed)
}
