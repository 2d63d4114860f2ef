//! Template Renderer: projects a validated `ResumeMetadata` into LaTeX source.
//!
//! Placeholders are `{{UPPER_SNAKE}}` tokens. Substitution is a single left-to-right
//! pass over the template, so substituted text is never re-scanned. Every placeholder
//! must resolve: a token with no known value is a `RenderError`, never left in the
//! output. Sections with no data resolve to the empty string.

pub mod latex;

use std::path::Path;

use thiserror::Error;

use crate::schema::ResumeMetadata;

/// The built-in template, compiled into the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/resume.tex");

/// Tokens this renderer knows how to fill.
pub const PLACEHOLDERS: &[&str] = &[
    "NAME",
    "EMAIL",
    "PHONE",
    "LINKEDIN",
    "GITHUB",
    "CONTACT",
    "EXPERIENCE",
    "EDUCATION",
    "PROJECTS",
    "SKILLS",
    "TECHNICAL_SKILLS",
    "POSITIONS",
    "CERTIFICATIONS",
];

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("unresolved template placeholder {{{{{0}}}}}")]
    UnresolvedPlaceholder(String),

    #[error("failed to read template {path}: {reason}")]
    TemplateRead { path: String, reason: String },
}

/// A template checked at construction time: every token in it is one we can fill.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: String,
}

impl TemplateRenderer {
    pub fn new(template: impl Into<String>) -> Result<Self, RenderError> {
        let template = template.into();
        if let Some(unknown) = placeholders(&template)
            .into_iter()
            .find(|token| !PLACEHOLDERS.contains(token))
        {
            return Err(RenderError::UnresolvedPlaceholder(unknown.to_string()));
        }
        Ok(Self { template })
    }

    pub fn builtin() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let template = std::fs::read_to_string(path).map_err(|e| RenderError::TemplateRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::new(template)
    }

    /// Renders `metadata` into document source. Pure: same input, same bytes.
    pub fn render(&self, metadata: &ResumeMetadata) -> Result<String, RenderError> {
        substitute(&self.template, |token| value_for(token, metadata))
    }
}

fn value_for(token: &str, metadata: &ResumeMetadata) -> Option<String> {
    let optional = |value: &Option<String>| {
        value
            .as_deref()
            .map(latex::escape_text)
            .unwrap_or_default()
    };

    let value = match token {
        "NAME" => latex::escape_text(&metadata.name),
        "EMAIL" => latex::escape_text(&metadata.email),
        "PHONE" => optional(&metadata.phone),
        "LINKEDIN" => optional(&metadata.linkedin),
        "GITHUB" => optional(&metadata.github),
        "CONTACT" => latex::contact_line(metadata),
        "EXPERIENCE" => latex::experience_section(&metadata.experience),
        "EDUCATION" => latex::education_section(&metadata.education),
        "PROJECTS" => latex::projects_section(&metadata.projects),
        "SKILLS" | "TECHNICAL_SKILLS" => latex::skills_section(&metadata.technical_skills),
        "POSITIONS" => latex::positions_section(&metadata.positions_of_responsibility),
        "CERTIFICATIONS" => latex::certifications_section(&metadata.certifications),
        _ => return None,
    };
    Some(value)
}

/// If `s` starts with a `{{TOKEN}}`, returns the token and the placeholder's byte length.
fn placeholder_at(s: &str) -> Option<(&str, usize)> {
    let rest = s.strip_prefix("{{")?;
    let end = rest.find("}}")?;
    let token = &rest[..end];
    let well_formed = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    well_formed.then_some((token, end + 4))
}

/// Every placeholder token in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut i = 0;
    while let Some(offset) = text[i..].find("{{") {
        let at = i + offset;
        match placeholder_at(&text[at..]) {
            Some((token, len)) => {
                found.push(token);
                i = at + len;
            }
            None => i = at + 1,
        }
    }
    found
}

fn substitute<F>(template: &str, mut lookup: F) -> Result<String, RenderError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len() * 2);
    let mut i = 0;
    while let Some(offset) = template[i..].find("{{") {
        let at = i + offset;
        out.push_str(&template[i..at]);
        match placeholder_at(&template[at..]) {
            Some((token, len)) => {
                let value = lookup(token)
                    .ok_or_else(|| RenderError::UnresolvedPlaceholder(token.to_string()))?;
                out.push_str(&value);
                i = at + len;
            }
            None => {
                out.push('{');
                i = at + 1;
            }
        }
    }
    out.push_str(&template[i..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fixtures, ResumeMetadata};

    fn bare_metadata() -> ResumeMetadata {
        ResumeMetadata {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            github: None,
            linkedin: None,
            experience: vec![],
            education: vec![crate::schema::Education {
                institution: "State University".to_string(),
                degree: String::new(),
                dates: String::new(),
                details: None,
            }],
            projects: vec![],
            technical_skills: vec![],
            positions_of_responsibility: vec![],
            certifications: vec![],
        }
    }

    #[test]
    fn test_builtin_template_uses_only_known_placeholders() {
        assert!(TemplateRenderer::new(DEFAULT_TEMPLATE).is_ok());
        let tokens = placeholders(DEFAULT_TEMPLATE);
        assert!(tokens.contains(&"NAME"));
        assert!(tokens.contains(&"CERTIFICATIONS"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = TemplateRenderer::builtin();
        let metadata = fixtures::metadata();
        let first = renderer.render(&metadata).unwrap();
        let second = renderer.render(&metadata).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_full_metadata_leaves_no_placeholders() {
        let output = TemplateRenderer::builtin()
            .render(&fixtures::metadata())
            .unwrap();
        assert!(placeholders(&output).is_empty());
        assert!(output.contains(r"{\Huge \scshape Jane Doe}"));
        assert!(output.contains(r"\section{Projects}"));
    }

    #[test]
    fn test_render_with_all_optional_fields_empty() {
        let output = TemplateRenderer::builtin()
            .render(&bare_metadata())
            .unwrap();
        assert!(placeholders(&output).is_empty());
        assert!(!output.contains(r"\section{Projects}"));
        assert!(!output.contains(r"\section{Certifications}"));
        assert!(output.contains(r"\section{Education}"));
        assert!(output.trim_end().ends_with(r"\end{document}"));
    }

    #[test]
    fn test_special_characters_in_name_are_escaped() {
        let mut metadata = fixtures::metadata();
        metadata.name = r"Jane {Doe} & Co_ 100% #1 \o/".to_string();
        let output = TemplateRenderer::builtin().render(&metadata).unwrap();
        assert!(output.contains(
            r"Jane \{Doe\} \& Co\_ 100\% \#1 \textbackslash{}o/"
        ));
    }

    #[test]
    fn test_text_that_looks_like_a_placeholder_is_not_substituted() {
        let mut metadata = fixtures::metadata();
        metadata.experience[0].bullets = vec!["Wrote {{NAME}} templating".to_string()];
        let output = TemplateRenderer::builtin().render(&metadata).unwrap();
        assert!(output.contains(r"Wrote \{\{NAME\}\} templating"));
        assert!(placeholders(&output).is_empty());
    }

    #[test]
    fn test_unknown_placeholder_rejected_at_construction() {
        let err = TemplateRenderer::new(r"\begin{document}{{SUMMARY}}\end{document}").unwrap_err();
        assert_eq!(err, RenderError::UnresolvedPlaceholder("SUMMARY".to_string()));
        assert_eq!(err.to_string(), "unresolved template placeholder {{SUMMARY}}");
    }

    #[test]
    fn test_custom_template_with_individual_contact_tokens() {
        let renderer = TemplateRenderer::new("{{NAME}} <{{EMAIL}}> {{PHONE}}|{{GITHUB}}").unwrap();
        let output = renderer.render(&bare_metadata()).unwrap();
        assert_eq!(output, "Jane Doe <jane@x.com> |");
    }

    #[test]
    fn test_technical_skills_is_an_alias_of_skills() {
        let metadata = fixtures::metadata();
        let alias = TemplateRenderer::new("{{TECHNICAL_SKILLS}}").unwrap();
        let canonical = TemplateRenderer::new("{{SKILLS}}").unwrap();
        let rendered = alias.render(&metadata).unwrap();
        assert!(!rendered.is_empty());
        assert_eq!(rendered, canonical.render(&metadata).unwrap());
    }

    #[test]
    fn test_latex_double_braces_are_not_placeholders() {
        assert!(placeholders(r"\textbf{{\Huge x}} {{lower}} {{1ST}}").is_empty());
        let rendered = substitute("{{{NAME}}}", |_| Some("J".to_string())).unwrap();
        assert_eq!(rendered, "{J}");
    }
}
