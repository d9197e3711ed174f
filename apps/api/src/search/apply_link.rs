//! Apply-link selection: picks the outbound link most likely to reach the employer's own
//! application form.
//!
//! Scoring per candidate link (case-insensitive substring matches):
//! - employer name in link: +5
//! - each applicant-tracking-system keyword: +3
//! - each job-aggregator domain: −1
//!
//! Highest score wins; the earliest candidate wins ties.

use crate::search::ApplyOption;

/// Returned when a posting has neither an apply option nor a share link.
pub const PLACEHOLDER_LINK: &str = "#";

const EMPLOYER_MATCH_SCORE: i32 = 5;
const ATS_KEYWORD_SCORE: i32 = 3;
const AGGREGATOR_PENALTY: i32 = 1;

const ATS_KEYWORDS: &[&str] = &[
    "careers",
    "jobs.",
    "workday",
    "greenhouse",
    "lever",
    "smartrecruiters",
    "successfactors",
    "myworkdayjobs",
    "oraclecloud",
    "adp",
    "ashby",
    "icims",
    "bamboohr",
];

const AGGREGATOR_DOMAINS: &[&str] = &[
    "indeed.",
    "linkedin.",
    "ziprecruiter.",
    "talent.com",
    "glassdoor.",
    "bebee.",
    "naukri.",
    "monster.",
];

/// Scores a single candidate link against the employer name.
pub fn score_link(link: &str, company: &str) -> i32 {
    let link = link.to_lowercase();
    let company = company.to_lowercase();

    let mut score = 0;
    if !company.is_empty() && link.contains(&company) {
        score += EMPLOYER_MATCH_SCORE;
    }
    score += ATS_KEYWORDS.iter().filter(|kw| link.contains(*kw)).count() as i32 * ATS_KEYWORD_SCORE;
    score -= AGGREGATOR_DOMAINS.iter().filter(|d| link.contains(*d)).count() as i32
        * AGGREGATOR_PENALTY;
    score
}

/// Selects the best apply link for a posting.
///
/// Falls back to `share_link`, then to [`PLACEHOLDER_LINK`], when there are no options or the
/// winning option carries no link.
pub fn pick_apply_link(
    options: &[ApplyOption],
    company: Option<&str>,
    share_link: Option<&str>,
) -> String {
    let company = company.unwrap_or("");

    let mut best: Option<(&ApplyOption, i32)> = None;
    for option in options {
        let score = score_link(option.link.as_deref().unwrap_or(""), company);
        // Strict comparison keeps the first candidate on ties.
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((option, score));
        }
    }

    if let Some(link) = best
        .and_then(|(option, _)| option.link.as_deref())
        .filter(|l| !l.is_empty())
    {
        return link.to_string();
    }

    match share_link {
        Some(link) if !link.is_empty() => link.to_string(),
        _ => PLACEHOLDER_LINK.to_string(),
    }
}
