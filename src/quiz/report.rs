use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::quiz::catalog::{Catalog, Category};
use crate::quiz::content::{self, UNANSWERED_LABEL};
use crate::quiz::scoring::ScoreSummary;
use crate::quiz::{AnswerSet, MAX_ANSWER_VALUE};

/// Narrative report for one finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub selected_persona_id: String,
    pub persona_explanation: String,
    pub persona_overview: String,
    pub appearance_analysis: String,
    pub social_analysis: String,
    pub interaction_analysis: String,
    pub mindset_analysis: String,
    pub coach_general_advice: String,
}

impl Report {
    /// Parses a model completion. Markdown code fences around the JSON are
    /// tolerated.
    pub fn from_completion(text: &str) -> Result<Self, ReportError> {
        let cleaned = text.replace("```json", "").replace("```", "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(ReportError::EmptyResponse);
        }
        let report: Report = serde_json::from_str(cleaned)?;
        report.validate()
    }

    pub fn validate(self) -> Result<Self, ReportError> {
        if self.selected_persona_id.trim().is_empty() {
            return Err(ReportError::MissingField("selectedPersonaId"));
        }
        Ok(self)
    }

    pub fn analysis_for(&self, category: Category) -> &str {
        match category {
            Category::Appearance => &self.appearance_analysis,
            Category::SocialPresence => &self.social_analysis,
            Category::Interaction => &self.interaction_analysis,
            Category::Mindset => &self.mindset_analysis,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report generator failed: {0}")]
    Backend(String),

    #[error("Report generator returned an empty response")]
    EmptyResponse,

    #[error("Malformed report: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to encode report request: {0}")]
    Encode(serde_json::Error),

    #[error("Report is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Report generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured for the report generator")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: String,
    pub category: Category,
    pub answer_label: String,
}

/// Everything the report generator gets to see.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub total_score: u32,
    pub max_score: u32,
    pub per_category_scores: Vec<CategoryScore>,
    pub answers: Vec<AnsweredQuestion>,
}

impl ReportRequest {
    pub fn new(summary: &ScoreSummary, answers: &AnswerSet, catalog: &Catalog) -> Self {
        Self {
            total_score: summary.total,
            max_score: catalog.len() as u32 * u32::from(MAX_ANSWER_VALUE),
            per_category_scores: summary
                .dimensions
                .iter()
                .map(|d| CategoryScore {
                    category: d.category,
                    score: d.score,
                })
                .collect(),
            answers: catalog
                .questions()
                .iter()
                .map(|q| AnsweredQuestion {
                    question: q.text.clone(),
                    category: q.category,
                    answer_label: answers
                        .get(q.id)
                        .and_then(|v| catalog.option_by_value(v))
                        .map(|o| o.label)
                        .unwrap_or(UNANSWERED_LABEL)
                        .to_string(),
                })
                .collect(),
        }
    }
}

/// External service that writes the narrative report.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, request: &ReportRequest) -> Result<Report, ReportError>;
}

/// Stand-in used when no API key is configured. Always fails, so every run
/// settles on the fallback report.
pub struct OfflineGenerator;

#[async_trait]
impl ReportGenerator for OfflineGenerator {
    async fn generate(&self, _request: &ReportRequest) -> Result<Report, ReportError> {
        Err(ReportError::MissingApiKey)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOrigin {
    Generated,
    /// Built locally; carries why the generator's report was not used.
    Fallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledReport {
    pub report: Report,
    pub origin: ReportOrigin,
}

impl SettledReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ReportOrigin::Fallback(_))
    }
}

/// How a fallback report picks its persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Totals strictly above this get the strong persona.
    pub strong_threshold: u32,
    pub strong_persona_id: String,
    pub neutral_persona_id: String,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            strong_threshold: 36,
            strong_persona_id: "charmer".to_string(),
            neutral_persona_id: "neighbor".to_string(),
        }
    }
}

impl FallbackPolicy {
    pub fn report(&self, summary: &ScoreSummary) -> Report {
        let text = &content::FALLBACK_TEXT;
        let persona = if summary.total > self.strong_threshold {
            &self.strong_persona_id
        } else {
            &self.neutral_persona_id
        };
        Report {
            selected_persona_id: persona.clone(),
            persona_explanation: text.persona_explanation.to_string(),
            persona_overview: text.persona_overview.to_string(),
            appearance_analysis: text.appearance_analysis.to_string(),
            social_analysis: text.social_analysis.to_string(),
            interaction_analysis: text.interaction_analysis.to_string(),
            mindset_analysis: text.mindset_analysis.to_string(),
            coach_general_advice: text.coach_general_advice.to_string(),
        }
    }
}
