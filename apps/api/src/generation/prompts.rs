// All LLM prompt constants for the Generation module.
// The JSON-only system instruction lives in llm_client::prompts and is sent by every adapter.

/// Instruction used when the user does not supply one.
pub const DEFAULT_INSTRUCTION: &str = "Focus on clarity, metrics, and keyword density.";

/// The exact JSON shape the model must return. Field names match
/// `OptimizedResumePayload` plus the `suggestions` array.
pub const OUTPUT_SCHEMA: &str = r#"{
  "personal_info": {
    "full_name": "string", "email": "string", "phone": "string",
    "country_code": "string", "state_code": "string", "city": "string",
    "linkedin": "string", "website": "string", "summary": "string"
  },
  "summary": "string — a 2-4 sentence professional summary",
  "work_experience": [
    {
      "job_title": "string", "company": "string",
      "start_date": "string", "end_date": "string", "currently_working": false,
      "core_role_skills": ["string"], "soft_skills": ["string"],
      "responsibilities": "string", "tech_stack": ["string"], "tools": ["string"],
      "project_story": "string"
    }
  ],
  "education": [
    {
      "degree": "string", "university": "string", "specialization": "string",
      "start_date": "string", "end_date": "string", "percentage_cgpa": "string"
    }
  ],
  "certifications": [
    {
      "title": "string", "provider": "string", "start_date": "string",
      "end_date": "string", "certificate_url": "string", "description": "string"
    }
  ],
  "projects": [
    {
      "project_name": "string", "description": "string", "tech_stack": "string",
      "tools": "string", "github_link": "string", "project_link": "string",
      "completion_date": "string", "roles": ["string"]
    }
  ],
  "languages": [
    {"language": "string", "proficiency": "string"}
  ],
  "suggestions": ["string — concrete advice for the candidate"]
}"#;

/// Résumé optimization prompt template.
/// Replace: {output_schema}, {profile_json}, {instruction}
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below so it reads clearly, quantifies impact, and passes applicant tracking systems.

Return ONLY a JSON object with this EXACT schema (no extra fields, no prose):
{output_schema}

HARD RULES:
1. Keep every fact from the input — do NOT invent employers, dates, degrees, or metrics
2. Keep every entry of every list, in the same order
3. Keep contact details (email, phone, links) unchanged
4. Return every list field, using [] when the input list is empty
5. `suggestions` holds 3-6 short, actionable tips for the candidate

RESUME DATA:
{profile_json}

USER INSTRUCTION:
{instruction}"#;
