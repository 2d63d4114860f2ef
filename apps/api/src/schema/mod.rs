//! Schema Model: the shape of every structured record the pipeline produces.
//!
//! Field names follow the vocabulary the prompts ask for (`title`, `organization`,
//! `dates`, `bullets`); aliases accept the older `role`/`company`/`duration`/
//! `achievements` vocabulary models sometimes fall back to.
//!
//! All list-valued fields keep source/generation order. Order is meaningful:
//! most relevant or most recent first.

pub mod validation;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use validation::{
    field_path, validate_payload, Problem, SchemaValidationError, Validate,
    Violations,
};

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collapses blank optional strings to `None` and trims the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Section records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, alias = "role", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, alias = "company", deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default, alias = "duration", deserialize_with = "null_as_default")]
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "achievements", deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

impl Validate for Experience {
    fn check(&self, path: &str, out: &mut Violations) {
        if is_blank(&self.title) && is_blank(&self.organization) {
            out.push(path, Problem::Empty);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, alias = "duration", deserialize_with = "null_as_default")]
    pub dates: String,
    /// GPA, honours, or anything else printed under the degree line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Validate for Education {
    fn check(&self, path: &str, out: &mut Violations) {
        if is_blank(&self.institution) && is_blank(&self.degree) {
            out.push(path, Problem::Empty);
        }
    }
}

/// A synthesized project. Created fresh each run, never merged with prior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, alias = "bullets", deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

impl Validate for Project {
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_text(field_path(path, "name"), Some(&self.name));
        if self.technologies.iter().all(|t| is_blank(t)) {
            out.push(field_path(path, "technologies"), Problem::Empty);
        }
        if self.achievements.iter().all(|a| is_blank(a)) {
            out.push(field_path(path, "achievements"), Problem::Empty);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionOfResponsibility {
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, alias = "duration", deserialize_with = "null_as_default")]
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Validate for PositionOfResponsibility {
    fn check(&self, path: &str, out: &mut Violations) {
        if is_blank(&self.organization) && is_blank(&self.role) {
            out.push(path, Problem::Empty);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Validate for Certification {
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_text(field_path(path, "name"), Some(&self.name));
    }
}

/// One row of the skills section: a category name and its skills, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

impl Validate for SkillCategory {
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_text(field_path(path, "category"), Some(&self.category));
        if self.skills.iter().all(|s| is_blank(s)) {
            out.push(field_path(path, "skills"), Problem::Empty);
        }
    }
}

fn check_each<T: Validate>(items: &[T], prefix: &str, field: &str, out: &mut Violations) {
    for (i, item) in items.iter().enumerate() {
        item.check(&format!("{}[{i}]", field_path(prefix, field)), out);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage payloads (what each model call must return)
// ────────────────────────────────────────────────────────────────────────────

/// Output of the Extraction stage. Projects and skills are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default, alias = "experiences", deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions_of_responsibility: Vec<PositionOfResponsibility>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
}

impl Validate for ExtractedInfo {
    /// Only `name` is required here; `email` is enforced at assembly so a resume
    /// without one still yields a structured record for diagnostics.
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_text(field_path(path, "name"), self.name.as_deref());
        check_each(&self.experience, path, "experience", out);
        check_each(&self.education, path, "education", out);
        check_each(
            &self.positions_of_responsibility,
            path,
            "positions_of_responsibility",
            out,
        );
        check_each(&self.certifications, path, "certifications", out);
    }
}

/// Output of the Project Synthesis stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

impl Validate for ProjectsPayload {
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_items(field_path(path, "projects"), &self.projects);
        check_each(&self.projects, path, "projects", out);
    }
}

/// Output of the Skill Synthesis stage: `{"skills": {"Languages": [...], ...}}`.
///
/// Kept as a JSON map (insertion-ordered) so category order survives parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillsPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Map<String, Value>,
}

impl Validate for SkillsPayload {
    fn check(&self, path: &str, out: &mut Violations) {
        for (category, value) in &self.skills {
            let field = format!("{}.{category}", field_path(path, "skills"));
            match value {
                Value::String(_) | Value::Null => {}
                Value::Array(items) if items.iter().all(Value::is_string) => {}
                _ => out.push(field, Problem::Malformed("expected a list of strings".into())),
            }
        }
    }
}

impl SkillsPayload {
    /// Converts the validated map into ordered categories.
    /// A bare string value is treated as a comma-separated list.
    pub fn into_categories(self) -> Vec<SkillCategory> {
        self.skills
            .into_iter()
            .map(|(category, value)| {
                let skills = match value {
                    Value::String(s) => s.split(',').map(str::to_string).collect(),
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                SkillCategory { category, skills }
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ResumeMetadata
// ────────────────────────────────────────────────────────────────────────────

/// The complete, validated record handed to the renderer and returned to callers.
/// Only Metadata Assembly constructs one in the pipeline; it is never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub technical_skills: Vec<SkillCategory>,
    #[serde(default)]
    pub positions_of_responsibility: Vec<PositionOfResponsibility>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl Validate for ResumeMetadata {
    fn check(&self, path: &str, out: &mut Violations) {
        out.require_text(field_path(path, "name"), Some(&self.name));
        out.require_text(field_path(path, "email"), Some(&self.email));
        if !is_blank(&self.email) && !self.email.contains('@') {
            out.push(
                field_path(path, "email"),
                Problem::Malformed("expected an address containing '@'".into()),
            );
        }
        if self.experience.is_empty() && self.education.is_empty() {
            out.push(field_path(path, "experience|education"), Problem::Empty);
        }

        check_each(&self.experience, path, "experience", out);
        check_each(&self.education, path, "education", out);
        check_each(&self.projects, path, "projects", out);
        check_each(&self.technical_skills, path, "technical_skills", out);
        check_each(
            &self.positions_of_responsibility,
            path,
            "positions_of_responsibility",
            out,
        );
        check_each(&self.certifications, path, "certifications", out);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_metadata_passes() {
        assert!(fixtures::metadata().validate().is_ok());
    }

    #[test]
    fn test_metadata_requires_name_and_email() {
        let mut metadata = fixtures::metadata();
        metadata.name = String::new();
        metadata.email = "  ".to_string();
        let err = metadata.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["name", "email"]);
    }

    #[test]
    fn test_metadata_rejects_email_without_at_sign() {
        let mut metadata = fixtures::metadata();
        metadata.email = "jane.x.com".to_string();
        let err = metadata.validate().unwrap_err();
        assert!(matches!(err.violations[0].problem, Problem::Malformed(_)));
    }

    #[test]
    fn test_metadata_requires_experience_or_education() {
        let mut metadata = fixtures::metadata();
        metadata.experience.clear();
        assert!(metadata.validate().is_ok());
        metadata.education.clear();
        let err = metadata.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["experience|education"]);
    }

    #[test]
    fn test_nested_violation_reports_full_path() {
        let mut metadata = fixtures::metadata();
        metadata.projects.push(Project {
            name: "Half a project".to_string(),
            technologies: vec![],
            date: None,
            achievements: vec!["Shipped it".to_string()],
        });
        let err = metadata.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["projects[1].technologies"]);
    }

    #[test]
    fn test_extracted_info_accepts_alias_vocabulary_and_nulls() {
        let payload = json!({
            "name": "Jane Doe",
            "email": null,
            "experiences": [{
                "company": "Acme Corp",
                "role": "Engineer",
                "duration": "2021 -- 2023",
                "achievements": ["Built 4 services"]
            }],
            "education": null,
            "certifications": []
        });
        let info: ExtractedInfo = validate_payload(payload).unwrap();
        assert_eq!(info.email, None);
        assert_eq!(info.experience[0].organization, "Acme Corp");
        assert_eq!(info.experience[0].title, "Engineer");
        assert_eq!(info.experience[0].bullets, vec!["Built 4 services"]);
        assert!(info.education.is_empty());
    }

    #[test]
    fn test_extracted_info_requires_name() {
        let err = validate_payload::<ExtractedInfo>(json!({"email": "jane@x.com"})).unwrap_err();
        assert_eq!(err.violations[0].field, "name");
        assert_eq!(err.violations[0].problem, Problem::Missing);
    }

    #[test]
    fn test_payload_must_be_object() {
        let err = validate_payload::<ExtractedInfo>(json!(["Jane"])).unwrap_err();
        assert_eq!(err.fields(), vec!["payload"]);
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err =
            validate_payload::<ProjectsPayload>(json!({"projects": "three projects"})).unwrap_err();
        assert!(matches!(err.violations[0].problem, Problem::Malformed(_)));
    }

    #[test]
    fn test_projects_payload_rejects_empty_list() {
        let err = validate_payload::<ProjectsPayload>(json!({"projects": []})).unwrap_err();
        assert_eq!(err.fields(), vec!["projects"]);
    }

    #[test]
    fn test_skills_payload_preserves_category_order() {
        let payload: SkillsPayload = serde_json::from_str(
            r#"{"skills": {"Tools": ["Docker"], "Languages": ["Rust"], "Concepts": "Raft, Paxos"}}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        let categories = payload.into_categories();
        let names: Vec<&str> = categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Tools", "Languages", "Concepts"]);
        assert_eq!(categories[2].skills, vec!["Raft", " Paxos"]);
    }

    #[test]
    fn test_skills_payload_rejects_nested_objects() {
        let err = validate_payload::<SkillsPayload>(json!({"skills": {"Languages": {"a": 1}}}))
            .unwrap_err();
        assert_eq!(err.fields(), vec!["skills.Languages"]);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
