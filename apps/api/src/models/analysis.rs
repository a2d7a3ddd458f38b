use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Target role a resume is evaluated against. Closed set — membership is
/// checked at the HTTP boundary, before the pipeline runs. The model's echoed
/// category is never trusted (see `analysis::normalizer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategory {
    SoftwareDeveloper,
    DataEngineer,
    FoundersOffice,
    ProductManager,
    DevopsEngineer,
    UiUxDesigner,
}

impl JobCategory {
    pub const ALL: [JobCategory; 6] = [
        JobCategory::SoftwareDeveloper,
        JobCategory::DataEngineer,
        JobCategory::FoundersOffice,
        JobCategory::ProductManager,
        JobCategory::DevopsEngineer,
        JobCategory::UiUxDesigner,
    ];

    /// Wire and storage identifier, e.g. `software-developer`.
    pub fn slug(&self) -> &'static str {
        match self {
            JobCategory::SoftwareDeveloper => "software-developer",
            JobCategory::DataEngineer => "data-engineer",
            JobCategory::FoundersOffice => "founders-office",
            JobCategory::ProductManager => "product-manager",
            JobCategory::DevopsEngineer => "devops-engineer",
            JobCategory::UiUxDesigner => "ui-ux-designer",
        }
    }

    /// Human-readable form embedded in prompts ("software developer").
    pub fn human_label(&self) -> String {
        self.slug().replace('-', " ")
    }

    /// Parses a slug back into a category. Returns `None` for anything
    /// outside the closed set.
    pub fn parse(slug: &str) -> Option<JobCategory> {
        Self::ALL.iter().copied().find(|c| c.slug() == slug)
    }

    /// Display metadata for the category picker on the dashboard.
    pub fn info(&self) -> CategoryInfo {
        let (name, description, icon, color) = match self {
            JobCategory::SoftwareDeveloper => (
                "Software Developer",
                "Frontend, Backend, Full-stack",
                "Code",
                "blue",
            ),
            JobCategory::DataEngineer => ("Data Engineer", "ETL, Analytics, ML", "Database", "green"),
            JobCategory::FoundersOffice => {
                ("Founder's Office", "Strategy, Operations", "Rocket", "purple")
            }
            JobCategory::ProductManager => {
                ("Product Manager", "Strategy, Analytics", "TrendingUp", "orange")
            }
            JobCategory::DevopsEngineer => {
                ("DevOps Engineer", "Infrastructure, CI/CD", "Server", "red")
            }
            JobCategory::UiUxDesigner => ("UI/UX Designer", "Design, Research", "Palette", "pink"),
        };
        CategoryInfo {
            id: self.slug(),
            name,
            description,
            icon,
            color,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Score + feedback for one resume dimension (education, experience, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub score: i32,
    pub feedback: String,
}

/// The three mandatory sections plus the optional projects section.
/// `projects` is serialized only when the model actually returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub education: SectionAnalysis,
    pub experience: SectionAnalysis,
    pub skills: SectionAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<SectionAnalysis>,
}

/// Applicant-tracking-system sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub format: i32,
    pub keywords: i32,
    pub readability: i32,
}

/// Classification of a highlighted resume excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightType {
    Strength,
    Weakness,
    Neutral,
}

/// A verbatim excerpt of the resume text flagged as a strength, weakness or
/// neutral segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedSegment {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: HighlightType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The canonical, fully-normalized analysis. Every score is an integer in
/// [0, 100]; `full_name` and `summary` are never empty placeholders-gone-null.
/// Field names follow the original wire shape (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub full_name: String,
    pub job_category: JobCategory,
    pub overall_score: i32,
    pub sections: SectionScores,
    pub summary: String,
    /// Free-form label → suggestion map, passed through from the model
    /// verbatim. Insertion order is preserved.
    pub suggested_fixes: Map<String, Value>,
    pub ats_score: AtsScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_text: Option<Vec<HighlightedSegment>>,
}

/// A persisted analysis record, owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub job_category: String,
    pub full_name: String,
    pub overall_score: i32,
    pub sections: Value,
    pub summary: String,
    pub suggested_fixes: Value,
    pub ats_score: Value,
    pub original_text: Option<String>,
    pub highlighted_text: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_analyses: i64,
    pub average_score: i32,
    pub last_analysis: Option<DateTime<Utc>>,
    pub top_job_category: Option<String>,
    pub score_improvement: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_category_slug_round_trips_through_serde() {
        for category in JobCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.slug()));
            let back: JobCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_job_category_parse_rejects_unknown_slug() {
        assert_eq!(JobCategory::parse("astronaut"), None);
        assert_eq!(JobCategory::parse(""), None);
        assert_eq!(
            JobCategory::parse("devops-engineer"),
            Some(JobCategory::DevopsEngineer)
        );
    }

    #[test]
    fn test_human_label_replaces_hyphens() {
        assert_eq!(
            JobCategory::SoftwareDeveloper.human_label(),
            "software developer"
        );
        assert_eq!(JobCategory::UiUxDesigner.human_label(), "ui ux designer");
    }

    #[test]
    fn test_highlight_type_deserializes_lowercase_only() {
        let ok: HighlightType = serde_json::from_str("\"strength\"").unwrap();
        assert_eq!(ok, HighlightType::Strength);
        assert!(serde_json::from_str::<HighlightType>("\"Strength\"").is_err());
        assert!(serde_json::from_str::<HighlightType>("\"critical\"").is_err());
    }

    #[test]
    fn test_analysis_result_omits_absent_optional_fields() {
        let result = AnalysisResult {
            full_name: "Jane Doe".to_string(),
            job_category: JobCategory::SoftwareDeveloper,
            overall_score: 80,
            sections: SectionScores {
                education: SectionAnalysis {
                    score: 70,
                    feedback: "ok".to_string(),
                },
                experience: SectionAnalysis {
                    score: 80,
                    feedback: "good".to_string(),
                },
                skills: SectionAnalysis {
                    score: 75,
                    feedback: "fine".to_string(),
                },
                projects: None,
            },
            summary: "Strong".to_string(),
            suggested_fixes: Map::new(),
            ats_score: AtsScore {
                format: 90,
                keywords: 60,
                readability: 75,
            },
            original_text: None,
            highlighted_text: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("projects").is_none());
        assert!(json["sections"].get("projects").is_none());
        assert!(json.get("originalText").is_none());
        assert!(json.get("highlightedText").is_none());
        assert_eq!(json["jobCategory"], "software-developer");
        assert_eq!(json["fullName"], "Jane Doe");
    }
}
