// Prompt templates sent through the LLM client.

/// Cover letter prompt template.
/// Replace: {title}, {company}, {resume_text}, {description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Act as an expert HR assistant. Your tasks are:
1) Generate a short, professional, tailored cover letter (~100-150 words) that highlights the key skills from the resume relevant to the job description for the "{title}" role at "{company}".
2) Conclude with a professional closing like 'Sincerely,' followed by the applicant's full name. Extract the name from the top of the RESUME TEXT.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{description}
"#;

pub fn build_cover_letter_prompt(
    title: &str,
    company: &str,
    resume_text: &str,
    description: &str,
) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{company}", company)
        .replace("{resume_text}", resume_text)
        .replace("{description}", description)
}
