//! Metadata Assembly: the one place extraction and synthesis outputs are reconciled.
//!
//! Pure and idempotent: the same inputs always produce an equal `ResumeMetadata`.

use crate::schema::{
    ExtractedInfo, Problem, Project, ResumeMetadata, SchemaValidationError, SkillCategory,
    Validate,
};

/// Merges the three upstream outputs and validates the result.
///
/// Fails when a required field is still missing after the merge, most commonly an
/// email the source resume never contained.
pub fn assemble(
    info: &ExtractedInfo,
    projects: &[Project],
    skills: &[SkillCategory],
) -> Result<ResumeMetadata, SchemaValidationError> {
    let metadata = ResumeMetadata {
        name: info.name.clone().unwrap_or_default(),
        email: info.email.clone().unwrap_or_default(),
        phone: info.phone.clone(),
        github: info.github.clone(),
        linkedin: info.linkedin.clone(),
        experience: info.experience.clone(),
        education: info.education.clone(),
        projects: projects.to_vec(),
        technical_skills: skills.to_vec(),
        positions_of_responsibility: info.positions_of_responsibility.clone(),
        certifications: info.certifications.clone(),
    };

    metadata.validate().map_err(|mut err| {
        // Absent upstream is `Missing`, not the `Empty` the defaulted field reads as.
        for violation in &mut err.violations {
            let absent = match violation.field.as_str() {
                "name" => info.name.is_none(),
                "email" => info.email.is_none(),
                _ => false,
            };
            if absent {
                violation.problem = Problem::Missing;
            }
        }
        err
    })?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures;

    fn info() -> ExtractedInfo {
        ExtractedInfo {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("555-1234".to_string()),
            github: None,
            linkedin: None,
            experience: vec![
                fixtures::experience("Senior Engineer", "Beta Inc"),
                fixtures::experience("Engineer", "Acme Corp"),
            ],
            education: vec![],
            positions_of_responsibility: vec![],
            certifications: vec![],
        }
    }

    fn skills() -> Vec<SkillCategory> {
        vec![SkillCategory {
            category: "Languages".to_string(),
            skills: vec!["Rust".to_string()],
        }]
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let projects = vec![fixtures::project("A"), fixtures::project("B")];
        let first = assemble(&info(), &projects, &skills()).unwrap();
        let second = assemble(&info(), &projects, &skills()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assembly_preserves_order() {
        let projects = vec![fixtures::project("Second"), fixtures::project("First")];
        let metadata = assemble(&info(), &projects, &skills()).unwrap();
        assert_eq!(metadata.experience[0].organization, "Beta Inc");
        assert_eq!(metadata.projects[0].name, "Second");
    }

    #[test]
    fn test_missing_email_fails_assembly() {
        let mut info = info();
        info.email = None;
        let err = assemble(&info, &[fixtures::project("A")], &skills()).unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);
        assert_eq!(err.violations[0].problem, Problem::Missing);
        assert!(err.to_string().contains("email: missing"));
    }

    #[test]
    fn test_blank_email_is_reported_empty() {
        let mut info = info();
        info.email = Some("   ".to_string());
        let err = assemble(&info, &[fixtures::project("A")], &skills()).unwrap_err();
        assert_eq!(err.violations[0].problem, Problem::Empty);
    }

    #[test]
    fn test_no_experience_or_education_fails_assembly() {
        let mut info = info();
        info.experience.clear();
        let err = assemble(&info, &[fixtures::project("A")], &skills()).unwrap_err();
        assert_eq!(err.fields(), vec!["experience|education"]);
    }
}
