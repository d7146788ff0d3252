use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::llm_client::ProviderId;

// ────────────────────────────────────────────────────────────────────────────
// Résumé profile (structured input)
// ────────────────────────────────────────────────────────────────────────────
//
// Every field is optional or defaults to empty: profiles arrive from a form
// and from LLM output, and neither is guaranteed to be complete.
// Dates are kept as the caller wrote them.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub city: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub profile_image_data_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub job_title: Option<String>,
    pub core_role_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub currently_working: bool,
    pub responsibilities: Option<String>,
    pub tech_stack: Vec<String>,
    pub tools: Vec<String>,
    pub project_story: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: Option<String>,
    pub university: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub percentage_cgpa: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub title: Option<String>,
    pub provider: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub certificate_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub tools: Option<String>,
    pub github_link: Option<String>,
    pub project_link: Option<String>,
    pub completion_date: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: Option<String>,
    pub proficiency: Option<String>,
}

/// The structured résumé a user submits. List fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
}

/// Normalized generation output: the profile shape plus a top-level summary.
///
/// Every list field is always present. `suggestions` is never part of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizedResumePayload {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
}

/// Per-résumé generation defaults: which provider and which instruction to use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub provider: ProviderId,
    pub prompt: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation status
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle of the most recent generation attempt on a résumé.
///
/// `pending → processing → {completed | failed}`; a new attempt moves either
/// terminal state back to `processing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    /// Parses a stored status. Unknown values read as `pending`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "processing" => GenerationStatus::Processing,
            "completed" => GenerationStatus::Completed,
            "failed" => GenerationStatus::Failed,
            _ => GenerationStatus::Pending,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile: Json<ResumeProfile>,
    pub ai_settings: Json<AiSettings>,
    pub generation_status: String,
    pub last_generation_provider: Option<String>,
    pub last_generation_error: Option<String>,
    pub latest_pdf_url: Option<String>,
    pub latest_suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn status(&self) -> GenerationStatus {
        GenerationStatus::from_db(&self.generation_status)
    }
}

/// Append-only history entry for one completed generation attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub pdf_url: String,
    pub prompt: String,
    pub provider: String,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    pub fn new(
        resume_id: Uuid,
        pdf_url: String,
        prompt: String,
        provider: ProviderId,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume_id,
            pdf_url,
            prompt,
            provider: provider.as_str().to_string(),
            suggestions,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_missing_lists_default_to_empty() {
        let json = r#"{"personal_info": {"full_name": "Ada Lovelace"}}"#;
        let profile: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.personal_info.full_name.as_deref(),
            Some("Ada Lovelace")
        );
        assert!(profile.work_experience.is_empty());
        assert!(profile.education.is_empty());
        assert!(profile.certifications.is_empty());
        assert!(profile.projects.is_empty());
        assert!(profile.languages.is_empty());
    }

    #[test]
    fn test_partial_entry_deserializes() {
        let json = r#"{"work_experience": [{"company": "Initech"}]}"#;
        let profile: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.work_experience.len(), 1);
        assert_eq!(profile.work_experience[0].company.as_deref(), Some("Initech"));
        assert!(!profile.work_experience[0].currently_working);
        assert!(profile.work_experience[0].tech_stack.is_empty());
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let json = serde_json::to_string(&GenerationStatus::Processing).unwrap();
        assert_eq!(json, r#""processing""#);
    }

    #[test]
    fn test_status_from_db_roundtrips_known_values() {
        for status in [
            GenerationStatus::Pending,
            GenerationStatus::Processing,
            GenerationStatus::Completed,
            GenerationStatus::Failed,
        ] {
            assert_eq!(GenerationStatus::from_db(status.as_str()), status);
        }
        assert_eq!(GenerationStatus::from_db("bogus"), GenerationStatus::Pending);
    }

    #[test]
    fn test_ai_settings_default_provider_is_openai() {
        let settings: AiSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.provider, ProviderId::OpenAi);
        assert!(settings.prompt.is_empty());
    }

    #[test]
    fn test_generation_record_tags_provider() {
        let record = GenerationRecord::new(
            Uuid::new_v4(),
            "http://localhost:8080/uploads/r.md".to_string(),
            String::new(),
            ProviderId::Gemini,
            vec!["Tighten the summary".to_string()],
        );
        assert_eq!(record.provider, "gemini");
        assert_eq!(record.suggestions.len(), 1);
    }
}
