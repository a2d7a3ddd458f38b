//! Normalization boundary between untrusted model output and the canonical
//! `AnalysisResult`.
//!
//! Model output is prompt-driven text and is treated as hostile: every field
//! is optional, every score is clamped, and output that fails to parse at all
//! degrades to an empty object so the analysis still yields a best-effort
//! result instead of aborting. Never deserialize model output directly into
//! the canonical type — everything passes through here first.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::analysis::{
    AnalysisResult, AtsScore, HighlightedSegment, JobCategory, SectionAnalysis, SectionScores,
};

const DEFAULT_FULL_NAME: &str = "Unknown";
const DEFAULT_SUMMARY: &str = "Resume analysis completed";

/// Reshapes the raw main-analysis response into a canonical result.
///
/// `job_category` is the caller-validated category; the model's echoed value
/// is ignored (trust boundary — model output never overrides validated input).
/// The returned result has no `original_text`/`highlighted_text`; the
/// orchestrator attaches those.
pub fn normalize_main(raw: &str, job_category: JobCategory) -> AnalysisResult {
    let root = parse_or_empty(raw);
    let sections = root.get("sections");
    let ats = root.get("atsScore");

    // The three mandatory sections always exist in the output. `projects` is
    // asymmetric: present only when the model supplied it (null counts as
    // absent).
    let projects = match sections.and_then(|s| s.get("projects")) {
        Some(value) if !value.is_null() => Some(normalize_section(
            Some(value),
            "No projects feedback available",
        )),
        _ => None,
    };

    AnalysisResult {
        full_name: string_or(root.get("fullName"), DEFAULT_FULL_NAME),
        job_category,
        overall_score: clamp_score(root.get("overallScore")),
        sections: SectionScores {
            education: normalize_section(
                sections.and_then(|s| s.get("education")),
                "No education feedback available",
            ),
            experience: normalize_section(
                sections.and_then(|s| s.get("experience")),
                "No experience feedback available",
            ),
            skills: normalize_section(
                sections.and_then(|s| s.get("skills")),
                "No skills feedback available",
            ),
            projects,
        },
        summary: string_or(root.get("summary"), DEFAULT_SUMMARY),
        suggested_fixes: root
            .get("suggestedFixes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        ats_score: AtsScore {
            format: clamp_score(ats.and_then(|a| a.get("format"))),
            keywords: clamp_score(ats.and_then(|a| a.get("keywords"))),
            readability: clamp_score(ats.and_then(|a| a.get("readability"))),
        },
        original_text: None,
        highlighted_text: None,
    }
}

/// Reshapes the raw highlight response into an ordered segment list.
///
/// Missing or non-array `highlights` yields an empty list. Entries that fail
/// strict deserialization (including an unrecognized `type`) are dropped with
/// a warning rather than flowing through untyped.
pub fn normalize_highlights(raw: &str) -> Vec<HighlightedSegment> {
    let root = parse_or_empty(raw);
    let Some(items) = root.get("highlights").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(segment) => Some(segment),
            Err(e) => {
                warn!("dropping malformed highlight entry: {e}");
                None
            }
        })
        .collect()
}

fn parse_or_empty(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Missing or non-numeric → 0, then clamped into [0, 100].
fn clamp_score(value: Option<&Value>) -> i32 {
    let n = value.and_then(Value::as_f64).unwrap_or(0.0);
    (n.round() as i64).clamp(0, 100) as i32
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn normalize_section(section: Option<&Value>, default_feedback: &str) -> SectionAnalysis {
    SectionAnalysis {
        score: clamp_score(section.and_then(|s| s.get("score"))),
        feedback: string_or(section.and_then(|s| s.get("feedback")), default_feedback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::HighlightType;

    const CATEGORY: JobCategory = JobCategory::SoftwareDeveloper;

    #[test]
    fn test_scores_are_clamped_into_bounds() {
        let raw = r#"{
            "overallScore": 150,
            "sections": {
                "education": {"score": -5, "feedback": "ok"},
                "experience": {"score": "eighty", "feedback": "good"},
                "skills": {"feedback": "fine"}
            },
            "atsScore": {"format": 90.6, "keywords": -1, "readability": 1000}
        }"#;

        let result = normalize_main(raw, CATEGORY);
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.sections.education.score, 0);
        assert_eq!(result.sections.experience.score, 0); // non-numeric → 0
        assert_eq!(result.sections.skills.score, 0); // missing → 0
        assert_eq!(result.ats_score.format, 91);
        assert_eq!(result.ats_score.keywords, 0);
        assert_eq!(result.ats_score.readability, 100);
    }

    #[test]
    fn test_model_echoed_category_is_never_trusted() {
        let raw = r#"{"jobCategory": "data-engineer", "overallScore": 50}"#;
        let result = normalize_main(raw, JobCategory::SoftwareDeveloper);
        assert_eq!(result.job_category, JobCategory::SoftwareDeveloper);
    }

    #[test]
    fn test_projects_absent_stays_absent() {
        let raw = r#"{"sections": {
            "education": {"score": 10, "feedback": "a"},
            "experience": {"score": 20, "feedback": "b"},
            "skills": {"score": 30, "feedback": "c"}
        }}"#;
        let result = normalize_main(raw, CATEGORY);
        assert!(result.sections.projects.is_none());
    }

    #[test]
    fn test_projects_null_counts_as_absent() {
        let raw = r#"{"sections": {"projects": null}}"#;
        let result = normalize_main(raw, CATEGORY);
        assert!(result.sections.projects.is_none());
    }

    #[test]
    fn test_projects_partial_gets_defaults_filled() {
        let raw = r#"{"sections": {"projects": {"score": 42}}}"#;
        let result = normalize_main(raw, CATEGORY);
        let projects = result.sections.projects.unwrap();
        assert_eq!(projects.score, 42);
        assert_eq!(projects.feedback, "No projects feedback available");
    }

    #[test]
    fn test_malformed_json_yields_all_defaults() {
        for raw in ["", "not json at all", "{\"unterminated\": "] {
            let result = normalize_main(raw, CATEGORY);
            assert_eq!(result.full_name, "Unknown");
            assert_eq!(result.summary, "Resume analysis completed");
            assert_eq!(result.overall_score, 0);
            assert_eq!(result.sections.education.score, 0);
            assert_eq!(
                result.sections.education.feedback,
                "No education feedback available"
            );
            assert!(result.sections.projects.is_none());
            assert!(result.suggested_fixes.is_empty());
            assert_eq!(result.ats_score.format, 0);
        }
    }

    #[test]
    fn test_suggested_fixes_pass_through_verbatim_in_order() {
        let raw = r#"{"suggestedFixes": {
            "zFix": "last alphabetically, first in order",
            "aFix": "quantify your impact",
            "odd": 42
        }}"#;
        let result = normalize_main(raw, CATEGORY);
        let keys: Vec<&String> = result.suggested_fixes.keys().collect();
        assert_eq!(keys, ["zFix", "aFix", "odd"]);
        // Values are untouched, even non-string ones.
        assert_eq!(result.suggested_fixes["odd"], 42);
    }

    // The worked example from the design discussion: oversized and negative
    // scores clamp, projects stays out, category is the caller's.
    #[test]
    fn test_worked_example() {
        let raw = r#"{"fullName":"Jane Doe","overallScore":150,
            "sections":{"education":{"score":-5,"feedback":"ok"},
                        "experience":{"score":80,"feedback":"good"},
                        "skills":{"score":70,"feedback":"fine"}},
            "summary":"Strong","suggestedFixes":{},
            "atsScore":{"format":90,"keywords":60,"readability":75}}"#;

        let result = normalize_main(raw, JobCategory::SoftwareDeveloper);
        assert_eq!(result.full_name, "Jane Doe");
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.sections.education.score, 0);
        assert_eq!(result.sections.experience.score, 80);
        assert!(result.sections.projects.is_none());
        assert_eq!(result.job_category, JobCategory::SoftwareDeveloper);
        assert_eq!(result.ats_score.keywords, 60);
    }

    #[test]
    fn test_highlights_missing_or_not_an_array_yield_empty() {
        assert!(normalize_highlights("{}").is_empty());
        assert!(normalize_highlights("not json").is_empty());
        assert!(normalize_highlights(r#"{"highlights": "lots"}"#).is_empty());
    }

    #[test]
    fn test_highlights_parse_in_order() {
        let raw = r#"{"highlights": [
            {"text": "led a team of 5", "type": "strength", "section": "experience", "reason": "ownership"},
            {"text": "no dates listed", "type": "weakness"}
        ]}"#;
        let segments = normalize_highlights(raw);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, HighlightType::Strength);
        assert_eq!(segments[0].section.as_deref(), Some("experience"));
        assert_eq!(segments[1].kind, HighlightType::Weakness);
        assert!(segments[1].section.is_none());
        assert!(segments[1].reason.is_none());
    }

    #[test]
    fn test_malformed_highlight_entries_are_dropped() {
        let raw = r#"{"highlights": [
            {"text": "fine", "type": "neutral"},
            {"text": "bad type", "type": "catastrophic"},
            {"type": "strength"},
            "not even an object"
        ]}"#;
        let segments = normalize_highlights(raw);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "fine");
    }
}
