//! LaTeX projection of each resume section.
//!
//! Every function here is pure and deterministic. User-supplied text goes through
//! `escape_text` (or `escape_url` for link targets) before it touches markup.
//! A section with no data renders as the empty string: an `itemize` with no
//! `\item` does not compile.

use std::fmt::Write;

use crate::schema::{
    Certification, Education, Experience, PositionOfResponsibility, Project, ResumeMetadata,
    SkillCategory,
};

/// Escapes characters that are special in LaTeX text mode.
///
/// Single pass, so the braces introduced by `\textbackslash{}` are never re-escaped.
/// Line breaks and tabs collapse to spaces.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.trim().chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a link target for `\href`. Braces, backslashes and whitespace are dropped;
/// `%` and `#` are escaped so hyperref reads them literally.
pub fn escape_url(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        match c {
            '\\' | '{' | '}' => {}
            c if c.is_whitespace() => {}
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            _ => out.push(c),
        }
    }
    out
}

/// `github.com/jane` → `https://github.com/jane`; explicit schemes are kept.
fn link_target(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        escape_url(raw)
    } else {
        escape_url(&format!("https://{raw}"))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_blank_lines(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Heading
// ────────────────────────────────────────────────────────────────────────────

/// Phone, email, LinkedIn and GitHub separated by `~`, absent values omitted.
pub fn contact_line(metadata: &ResumeMetadata) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(phone) = present(&metadata.phone) {
        parts.push(format!(r"\raisebox{{-0.1\height}}\faPhone\ {}", escape_text(phone)));
    }
    if !metadata.email.trim().is_empty() {
        parts.push(format!(
            r"\href{{mailto:{}}}{{\raisebox{{-0.2\height}}\faEnvelope\ {}}}",
            escape_url(&metadata.email),
            escape_text(&metadata.email)
        ));
    }
    if let Some(linkedin) = present(&metadata.linkedin) {
        parts.push(format!(
            r"\href{{{}}}{{\raisebox{{-0.2\height}}\faLinkedin\ LinkedIn}}",
            link_target(linkedin)
        ));
    }
    if let Some(github) = present(&metadata.github) {
        parts.push(format!(
            r"\href{{{}}}{{\raisebox{{-0.2\height}}\faGithub\ GitHub}}",
            link_target(github)
        ));
    }

    parts.join(" ~ ")
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, r"%-----------{}-----------", title.to_uppercase());
    let _ = writeln!(out, r"\section{{{title}}}");
}

fn item_list(out: &mut String, indent: &str, items: &[String]) {
    let mut lines = non_blank_lines(items).peekable();
    if lines.peek().is_none() {
        return;
    }
    let _ = writeln!(out, r"{indent}\resumeItemListStart");
    for line in lines {
        let _ = writeln!(out, r"{indent}  \resumeItem{{{}}}", escape_text(line));
    }
    let _ = writeln!(out, r"{indent}\resumeItemListEnd");
}

fn subheading(
    out: &mut String,
    top_left: &str,
    top_right: &str,
    bottom_left: &str,
    bottom_right: &str,
) {
    let _ = writeln!(
        out,
        r"    \resumeSubheading{{{}}}{{{}}}{{{}}}{{{}}}",
        escape_text(top_left),
        escape_text(top_right),
        escape_text(bottom_left),
        escape_text(bottom_right)
    );
}

pub fn experience_section(entries: &[Experience]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    section_header(&mut out, "Experience");
    let _ = writeln!(out, r"  \resumeSubHeadingListStart");
    for entry in entries {
        subheading(
            &mut out,
            &entry.organization,
            &entry.dates,
            &entry.title,
            entry.location.as_deref().unwrap_or(""),
        );
        item_list(&mut out, "      ", &entry.bullets);
    }
    let _ = writeln!(out, r"  \resumeSubHeadingListEnd");
    out
}

pub fn education_section(entries: &[Education]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    section_header(&mut out, "Education");
    let _ = writeln!(out, r"  \resumeSubHeadingListStart");
    for entry in entries {
        subheading(
            &mut out,
            &entry.institution,
            &entry.dates,
            &entry.degree,
            entry.details.as_deref().unwrap_or(""),
        );
    }
    let _ = writeln!(out, r"  \resumeSubHeadingListEnd");
    out
}

pub fn projects_section(projects: &[Project]) -> String {
    if projects.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    section_header(&mut out, "Projects");
    let _ = writeln!(out, r"  \resumeSubHeadingListStart");
    for project in projects {
        let stack = non_blank_lines(&project.technologies)
            .map(escape_text)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            r"    \resumeProjectHeading{{\textbf{{{}}} $|$ \emph{{{}}}}}{{{}}}",
            escape_text(&project.name),
            stack,
            escape_text(present(&project.date).unwrap_or(""))
        );
        item_list(&mut out, "      ", &project.achievements);
    }
    let _ = writeln!(out, r"  \resumeSubHeadingListEnd");
    out
}

pub fn skills_section(categories: &[SkillCategory]) -> String {
    let rows: Vec<String> = categories
        .iter()
        .filter_map(|c| {
            let skills = non_blank_lines(&c.skills)
                .map(escape_text)
                .collect::<Vec<_>>();
            if skills.is_empty() || c.category.trim().is_empty() {
                return None;
            }
            Some(format!(
                r"\textbf{{{}}}{{: {}}}",
                escape_text(&c.category),
                skills.join(", ")
            ))
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    section_header(&mut out, "Technical Skills");
    let _ = writeln!(out, r" \begin{{itemize}}[leftmargin=0.15in, label={{}}]");
    let _ = writeln!(out, r"    \small{{\item{{");
    let _ = writeln!(out, "     {}", rows.join(" \\\\\n     "));
    let _ = writeln!(out, r"    }}}}");
    let _ = writeln!(out, r" \end{{itemize}}");
    out
}

pub fn positions_section(positions: &[PositionOfResponsibility]) -> String {
    if positions.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    section_header(&mut out, "Positions of Responsibility");
    let _ = writeln!(out, r"  \resumeSubHeadingListStart");
    for position in positions {
        subheading(
            &mut out,
            &position.organization,
            &position.dates,
            &position.role,
            position.location.as_deref().unwrap_or(""),
        );
        item_list(&mut out, "      ", std::slice::from_ref(&position.description));
    }
    let _ = writeln!(out, r"  \resumeSubHeadingListEnd");
    out
}

pub fn certifications_section(certifications: &[Certification]) -> String {
    let rows: Vec<String> = certifications
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| {
            let mut row = format!(r"\textbf{{{}}}", escape_text(&c.name));
            if let Some(issuer) = present(&c.issuer) {
                let _ = write!(row, " -- {}", escape_text(issuer));
            }
            if let Some(date) = present(&c.date) {
                let _ = write!(row, r" \hfill {}", escape_text(date));
            }
            row
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    section_header(&mut out, "Certifications");
    let _ = writeln!(out, r" \begin{{itemize}}[leftmargin=0.15in, label={{}}]");
    for row in rows {
        let _ = writeln!(out, r"    \small{{\item{{{row}}}}}");
    }
    let _ = writeln!(out, r" \end{{itemize}}");
    out
}
