// src/completion/cover_letter.rs

const REQUIREMENT_HEADINGS: &[&str] = &[
    "requirements",
    "qualifications",
    "what you'll need",
    "what you will need",
];

const MAX_REQUIREMENT_LINES: usize = 40;

pub fn build_cover_letter_prompt(
    resume: &str,
    job_description: &str,
    job_requirements: &str,
) -> String {
    let requirements = if job_requirements.trim().is_empty() {
        "(not listed separately, see the job description)"
    } else {
        job_requirements
    };

    format!(
        r#"Create a cover letter using the following resume data:
{}
and the job description:
{}
and the job requirements:
{}"#,
        resume, job_description, requirements
    )
}

/// Lines after the first requirements-like heading in the page text.
pub fn extract_requirements(visible_text: &str) -> String {
    let lines: Vec<&str> = visible_text.lines().collect();
    let Some(heading) = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        REQUIREMENT_HEADINGS.iter().any(|h| lower.contains(h))
    }) else {
        return String::new();
    };

    lines
        .iter()
        .skip(heading + 1)
        .take(MAX_REQUIREMENT_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}
