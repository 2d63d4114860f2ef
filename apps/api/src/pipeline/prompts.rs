// All LLM prompt constants for the pipeline stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume extraction.
pub const EXTRACTION_SYSTEM: &str = "You are an expert at extracting structured information \
    from resumes. Extract ALL information present in the resume text, preserving the order \
    in which entries appear (most recent first).";

/// Extraction prompt template. Replace `{resume_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the candidate's details from the resume below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Jane Doe",
  "email": "jane@example.com",
  "phone": "555-1234",
  "github": "github.com/janedoe",
  "linkedin": "linkedin.com/in/janedoe",
  "experience": [
    {
      "title": "Software Engineer",
      "organization": "Acme Corp",
      "dates": "Jan 2022 -- Mar 2024",
      "location": "Remote",
      "bullets": ["Reduced API latency by 40% by introducing request batching"]
    }
  ],
  "education": [
    {
      "institution": "State University",
      "degree": "B.S. Computer Science",
      "dates": "2016 -- 2020",
      "details": "GPA 3.8"
    }
  ],
  "positions_of_responsibility": [
    {
      "organization": "ACM Student Chapter",
      "role": "Treasurer",
      "dates": "2018 -- 2019",
      "location": null,
      "description": "Managed a $10k annual budget"
    }
  ],
  "certifications": [
    {"name": "AWS Solutions Architect", "issuer": "Amazon", "date": "2023"}
  ]
}

Do NOT include projects or skills; those are produced separately.

RESUME TEXT:
{resume_text}"#;

/// System prompt for project synthesis.
pub const PROJECTS_SYSTEM: &str = "You are an expert at creating compelling project \
    descriptions for resumes. You write technical projects that a hiring manager for the \
    target role would find directly relevant.";

/// Project synthesis prompt template.
/// Replace: {job_description}, {experience_json}, {education_json}
pub const PROJECTS_PROMPT_TEMPLATE: &str = r#"Generate 3 technical projects that align with the job description and the candidate's existing experience level.

Rules:
- Each project has a short name, at most 3 key technologies, a completion date ("December 2024"), and 2-3 achievement bullets.
- Every achievement bullet starts with an action verb and includes a specific metric or number.
- Projects must build on technologies and domains the candidate has actually worked with.

Return a JSON object with this EXACT schema:
{
  "projects": [
    {
      "name": "Distributed Rate Limiter",
      "technologies": ["Go", "Redis", "gRPC"],
      "date": "December 2024",
      "achievements": [
        "Built a token-bucket limiter sustaining 120k req/s across 5 nodes",
        "Cut p99 decision latency to 2ms with pipelined Redis scripts"
      ]
    }
  ]
}

JOB DESCRIPTION:
{job_description}

CANDIDATE'S EXISTING EXPERIENCE:
{experience_json}

CANDIDATE'S EDUCATION:
{education_json}"#;

/// System prompt for skill synthesis.
pub const SKILLS_SYSTEM: &str = "You are an expert at identifying the key technical skills \
    for job applications. You select and order skills so the most relevant to the role \
    come first.";

/// Skill synthesis prompt template.
/// Replace: {job_description}, {experience_json}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Based on the job description and the candidate's background, return their technical skills grouped into categories such as "Languages", "Frameworks", "Tools" and "Concepts".

Rules:
- At most 7 skills per category, most relevant to the job description first.
- Prefer the exact terms the job description uses.
- Only include skills that are genuinely relevant to the role and consistent with the candidate's background.
- Order categories by relevance to the role.

Return a JSON object with this EXACT schema:
{
  "skills": {
    "Languages": ["Rust", "Go", "Python"],
    "Tools": ["Kubernetes", "Terraform"]
  }
}

JOB DESCRIPTION:
{job_description}

CANDIDATE'S EXISTING EXPERIENCE:
{experience_json}"#;

/// Fills `{key}` slots in `template` in one left-to-right pass. Inserted values are
/// never re-scanned, so a resume or job description that happens to contain
/// `{experience_json}` stays literal. Unknown `{...}` text is left as is.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });
        match slot {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
