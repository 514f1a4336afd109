//! Entity and section-header pattern tables.
//!
//! Declared once as immutable statics so the priority order of the header
//! table is explicit and testable, rather than being rebuilt per call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::models::SectionType;

/// Word-character local part, domain labels, TLD of 2+ letters.
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Optional country code, then a 3-3-4 grouping with optional separators.
/// Intentionally loose — false positives on non-phone digit runs are accepted.
pub static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.]?)?\(?\d{3}\)?[-.]?\d{3}[-.]?\d{4}").expect("valid phone regex")
});

/// Optional scheme, optional www, a dotted domain, optional path.
/// Matched globally per line — every occurrence is collected.
pub static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?[a-zA-Z0-9-]+(?:\.[a-zA-Z]{2,})+(?:/[^\s]*)*")
        .expect("valid link regex")
});

/// Ordered header-keyword table. A line is classified by the FIRST pattern
/// that matches, so this order is the tie-break rule:
/// summary > education > experience > skills > contact.
pub static SECTION_HEADERS: Lazy<Vec<(SectionType, Regex)>> = Lazy::new(|| {
    vec![
        (
            SectionType::Summary,
            Regex::new(r"(?i)^(?:summary|profile|objective|about)").expect("valid header regex"),
        ),
        (
            SectionType::Education,
            Regex::new(r"(?i)^education|academic|qualification").expect("valid header regex"),
        ),
        (
            SectionType::Experience,
            Regex::new(r"(?i)^(?:experience|employment|work history|professional background)")
                .expect("valid header regex"),
        ),
        (
            SectionType::Skills,
            Regex::new(r"(?i)^(?:skills|technical skills|competencies|expertise)")
                .expect("valid header regex"),
        ),
        (
            SectionType::Contact,
            Regex::new(r"(?i)^(?:contact|personal information|details)")
                .expect("valid header regex"),
        ),
    ]
});

/// Returns the section type introduced by `line`, if any header pattern
/// matches it.
pub fn match_section_header(line: &str) -> Option<SectionType> {
    SECTION_HEADERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map(|(section_type, _)| *section_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_matches_simple_address() {
        let m = EMAIL_PATTERN.find("reach me at jane.doe+hr@example.co.uk today");
        assert_eq!(m.unwrap().as_str(), "jane.doe+hr@example.co.uk");
    }

    #[test]
    fn test_email_requires_tld() {
        assert!(!EMAIL_PATTERN.is_match("user@localhost"));
    }

    #[test]
    fn test_phone_matches_dashed_grouping() {
        let m = PHONE_PATTERN.find("call 555-123-4567 after 5pm");
        assert_eq!(m.unwrap().as_str(), "555-123-4567");
    }

    #[test]
    fn test_phone_matches_parenthesized_area_code() {
        assert!(PHONE_PATTERN.is_match("(415) is wrong but (415)867-5309 matches"));
    }

    #[test]
    fn test_phone_matches_country_code() {
        let m = PHONE_PATTERN.find("+1-555-123-4567");
        assert_eq!(m.unwrap().as_str(), "+1-555-123-4567");
    }

    #[test]
    fn test_link_matches_all_occurrences_in_line() {
        let line = "see github.com/jane and https://www.example.org/cv";
        let links: Vec<&str> = LINK_PATTERN.find_iter(line).map(|m| m.as_str()).collect();
        assert_eq!(links, vec!["github.com/jane", "https://www.example.org/cv"]);
    }

    #[test]
    fn test_link_requires_a_dotted_domain() {
        assert!(!LINK_PATTERN.is_match("plainword"));
    }

    #[test]
    fn test_header_table_priority_order() {
        let order: Vec<SectionType> = SECTION_HEADERS.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![
                SectionType::Summary,
                SectionType::Education,
                SectionType::Experience,
                SectionType::Skills,
                SectionType::Contact,
            ]
        );
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        assert_eq!(
            match_section_header("WORK HISTORY"),
            Some(SectionType::Experience)
        );
        assert_eq!(match_section_header("Skills"), Some(SectionType::Skills));
    }

    #[test]
    fn test_header_tie_break_prefers_summary() {
        // Matches both the summary prefix and the unanchored education
        // "qualification" alternative — summary must win.
        assert_eq!(
            match_section_header("Summary of Qualifications"),
            Some(SectionType::Summary)
        );
    }

    #[test]
    fn test_non_header_line_matches_nothing() {
        assert_eq!(match_section_header("Built a parser in Rust"), None);
    }
}
