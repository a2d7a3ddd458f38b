//! Prompt construction for the two analysis calls.
//!
//! Pure string templating — deterministic for a given resume and category.
//! No validation happens here; the normalizer owns everything that comes back.

use crate::llm_client::{PromptPayload, RESPONSE_FORMAT_JSON};
use crate::models::analysis::JobCategory;

const MAIN_TEMPERATURE: f32 = 0.7;
const MAIN_MAX_OUTPUT_TOKENS: u32 = 2000;
const HIGHLIGHT_TEMPERATURE: f32 = 0.3;
const HIGHLIGHT_MAX_OUTPUT_TOKENS: u32 = 1500;

/// System prompt for the main structured-analysis call.
pub const MAIN_ANALYSIS_SYSTEM: &str = "You are an expert resume reviewer. \
    Analyze resumes and provide detailed, constructive feedback in JSON format.";

/// System prompt for the highlighted-segment call.
pub const HIGHLIGHT_SYSTEM: &str = "You are an expert resume reviewer. \
    Identify specific text segments that represent strengths and weaknesses.";

/// Main analysis template. Replace `{job_category}` (human-readable),
/// `{job_category_slug}` and `{resume_text}` before sending.
const MAIN_ANALYSIS_TEMPLATE: &str = r#"You are an expert resume reviewer and career coach. Analyze the following resume for a {job_category} role and provide detailed feedback.

Resume Text:
{resume_text}

Analyze the resume and respond with JSON in exactly this format:
{
  "fullName": "extracted full name from resume",
  "jobCategory": "{job_category_slug}",
  "overallScore": <number 0-100>,
  "sections": {
    "education": {
      "score": <number 0-100>,
      "feedback": "detailed feedback about education section"
    },
    "experience": {
      "score": <number 0-100>,
      "feedback": "detailed feedback about work experience"
    },
    "skills": {
      "score": <number 0-100>,
      "feedback": "detailed feedback about skills section"
    },
    "projects": {
      "score": <number 0-100>,
      "feedback": "detailed feedback about projects section if present"
    }
  },
  "summary": "overall resume assessment and key recommendations",
  "suggestedFixes": {
    "fix1": "specific improvement suggestion with before/after example",
    "fix2": "another specific improvement suggestion",
    "fix3": "additional improvement suggestion"
  },
  "atsScore": {
    "format": <number 0-100>,
    "keywords": <number 0-100>,
    "readability": <number 0-100>
  }
}

Provide constructive, actionable feedback. Focus on:
1. Quantifiable achievements and impact
2. Relevant keywords for the target role
3. ATS optimization
4. Professional presentation
5. Specific improvements with examples"#;

/// Highlight template. Replace `{job_category}` and `{resume_text}`.
const HIGHLIGHT_TEMPLATE: &str = r#"You are an expert resume reviewer. Analyze the resume text and identify specific sentences or phrases that are either strengths or weaknesses for a {job_category} role.

Resume Text:
{resume_text}

Identify key phrases and sentences that are:
1. STRENGTHS - Strong points that contribute positively to the resume
2. WEAKNESSES - Areas that need improvement or detract from the resume
3. NEUTRAL - Important but neutral content

For each identified text segment, provide:
- The exact text from the resume
- Whether it's a strength, weakness, or neutral
- The section it belongs to (education, experience, skills, projects, etc.)
- A brief reason why it's classified as such

Respond with JSON in this format:
{
  "highlights": [
    {
      "text": "exact text from resume",
      "type": "strength|weakness|neutral",
      "section": "education|experience|skills|projects|other",
      "reason": "brief explanation"
    }
  ]
}

Focus on identifying 10-15 key text segments that best represent the resume's strengths and weaknesses."#;

/// Builds the payload for the mandatory structured-analysis call.
pub fn build_main_prompt(resume_text: &str, job_category: JobCategory) -> PromptPayload {
    let user_message = MAIN_ANALYSIS_TEMPLATE
        .replace("{job_category_slug}", job_category.slug())
        .replace("{job_category}", &job_category.human_label())
        .replace("{resume_text}", resume_text);

    PromptPayload {
        system_message: MAIN_ANALYSIS_SYSTEM.to_string(),
        user_message,
        response_format: RESPONSE_FORMAT_JSON,
        temperature: MAIN_TEMPERATURE,
        max_output_tokens: MAIN_MAX_OUTPUT_TOKENS,
    }
}

/// Builds the payload for the optional highlighted-segment call.
pub fn build_highlight_prompt(resume_text: &str, job_category: JobCategory) -> PromptPayload {
    let user_message = HIGHLIGHT_TEMPLATE
        .replace("{job_category}", &job_category.human_label())
        .replace("{resume_text}", resume_text);

    PromptPayload {
        system_message: HIGHLIGHT_SYSTEM.to_string(),
        user_message,
        response_format: RESPONSE_FORMAT_JSON,
        temperature: HIGHLIGHT_TEMPERATURE,
        max_output_tokens: HIGHLIGHT_MAX_OUTPUT_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe, B.S. Computer Science, 3 years backend experience";

    #[test]
    fn test_main_prompt_parameters() {
        let payload = build_main_prompt(RESUME, JobCategory::SoftwareDeveloper);
        assert_eq!(payload.temperature, 0.7);
        assert_eq!(payload.max_output_tokens, 2000);
        assert_eq!(payload.response_format, "json_object");
        assert_eq!(payload.system_message, MAIN_ANALYSIS_SYSTEM);
    }

    #[test]
    fn test_highlight_prompt_parameters() {
        let payload = build_highlight_prompt(RESUME, JobCategory::SoftwareDeveloper);
        assert_eq!(payload.temperature, 0.3);
        assert_eq!(payload.max_output_tokens, 1500);
        assert_eq!(payload.response_format, "json_object");
    }

    #[test]
    fn test_main_prompt_embeds_category_and_text() {
        let payload = build_main_prompt(RESUME, JobCategory::DevopsEngineer);
        // Human-readable category in prose, slug inside the instructed JSON.
        assert!(payload.user_message.contains("for a devops engineer role"));
        assert!(payload
            .user_message
            .contains(r#""jobCategory": "devops-engineer""#));
        assert!(payload.user_message.contains(RESUME));
        assert!(!payload.user_message.contains("{resume_text}"));
        assert!(!payload.user_message.contains("{job_category}"));
    }

    #[test]
    fn test_main_prompt_instructs_required_shape() {
        let payload = build_main_prompt(RESUME, JobCategory::DataEngineer);
        for key in [
            "\"fullName\"",
            "\"overallScore\"",
            "\"education\"",
            "\"experience\"",
            "\"skills\"",
            "\"projects\"",
            "\"summary\"",
            "\"suggestedFixes\"",
            "\"atsScore\"",
            "\"format\"",
            "\"keywords\"",
            "\"readability\"",
        ] {
            assert!(
                payload.user_message.contains(key),
                "main prompt missing {key}"
            );
        }
    }

    #[test]
    fn test_highlight_prompt_instructs_segment_shape() {
        let payload = build_highlight_prompt(RESUME, JobCategory::ProductManager);
        assert!(payload.user_message.contains("\"highlights\""));
        assert!(payload
            .user_message
            .contains("\"type\": \"strength|weakness|neutral\""));
        assert!(payload.user_message.contains("10-15"));
        assert!(payload.user_message.contains("for a product manager role"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let a = build_main_prompt(RESUME, JobCategory::UiUxDesigner);
        let b = build_main_prompt(RESUME, JobCategory::UiUxDesigner);
        assert_eq!(a, b);

        let c = build_highlight_prompt(RESUME, JobCategory::UiUxDesigner);
        let d = build_highlight_prompt(RESUME, JobCategory::UiUxDesigner);
        assert_eq!(c, d);
    }
}
