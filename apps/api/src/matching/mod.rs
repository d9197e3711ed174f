// Match pipeline: search stage (scraper) → hand-off store → generation stage (analyzer).
// Stage failures never surface as errors: the scraper reports `false`, the analyzer an
// empty or partial list, and the reason goes to the log.

pub mod analyzer;
pub mod handlers;
pub mod scraper;
