//! Section classifier — turns a flat text string into [`ResumeMetadata`].
//!
//! Resumes carry no fixed schema, so classification is heuristic: lines are
//! partitioned into contiguous sections by header-keyword patterns, and a
//! handful of high-confidence entities (email, phone, links, name) are pulled
//! out by regex. The section scan is an explicit accumulator state machine so
//! each transition is unit testable on its own.

use crate::extract::models::{ResumeMetadata, ResumeSection, SectionType};
use crate::extract::patterns::{
    match_section_header, EMAIL_PATTERN, LINK_PATTERN, PHONE_PATTERN,
};

/// Confidence assigned to a section introduced by a header keyword.
const HEADER_CONFIDENCE: f32 = 0.8;

/// The in-flight section being accumulated while scanning lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionAccumulator {
    pub section_type: SectionType,
    pub content: String,
    pub confidence: f32,
}

impl Default for SectionAccumulator {
    /// Content before the first header accumulates under `other` with no
    /// header-derived confidence.
    fn default() -> Self {
        Self {
            section_type: SectionType::Other,
            content: String::new(),
            confidence: 0.0,
        }
    }
}

impl SectionAccumulator {
    fn start(section_type: SectionType) -> Self {
        Self {
            section_type,
            content: String::new(),
            confidence: HEADER_CONFIDENCE,
        }
    }

    fn into_section(self) -> Option<ResumeSection> {
        if self.content.is_empty() {
            return None;
        }
        Some(ResumeSection {
            section_type: self.section_type,
            content: self.content,
            confidence: self.confidence,
        })
    }
}

/// One transition of the section state machine.
///
/// A header line finalizes the current accumulator (if it holds any content)
/// and starts a fresh one of the matched type; the header line itself is a
/// delimiter and lands in neither section. Any other line is appended to the
/// current accumulator with a trailing newline.
pub fn step(
    state: SectionAccumulator,
    line: &str,
) -> (SectionAccumulator, Option<ResumeSection>) {
    match match_section_header(line) {
        Some(section_type) => {
            let emitted = state.into_section();
            (SectionAccumulator::start(section_type), emitted)
        }
        None => {
            let mut state = state;
            state.content.push_str(line);
            state.content.push('\n');
            (state, None)
        }
    }
}

/// Classifies `text` into sections and extracts contact entities.
///
/// Deterministic: no randomness, no mutable globals — running it twice on the
/// same input yields identical output.
pub fn classify(text: &str) -> ResumeMetadata {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut metadata = ResumeMetadata {
        sections: Vec::new(),
        detected_name: None,
        detected_email: None,
        detected_phone: None,
        detected_links: Vec::new(),
    };

    // Entity scan: email and phone are first-match-wins across the whole
    // document; links accumulate from every line.
    for line in &lines {
        if metadata.detected_email.is_none() {
            if let Some(m) = EMAIL_PATTERN.find(line) {
                metadata.detected_email = Some(m.as_str().to_string());
            }
        }
        if metadata.detected_phone.is_none() {
            if let Some(m) = PHONE_PATTERN.find(line) {
                metadata.detected_phone = Some(m.as_str().to_string());
            }
        }
        metadata
            .detected_links
            .extend(LINK_PATTERN.find_iter(line).map(|m| m.as_str().to_string()));
    }

    // Section scan: sequential, stateful, order-preserving.
    let mut state = SectionAccumulator::default();
    for line in &lines {
        let (next, emitted) = step(state, line);
        if let Some(section) = emitted {
            metadata.sections.push(section);
        }
        state = next;
    }
    if let Some(section) = state.into_section() {
        metadata.sections.push(section);
    }

    // Name detection: the first line, unless it looks like an email or phone.
    if let Some(first) = lines.first() {
        if !EMAIL_PATTERN.is_match(first) && !PHONE_PATTERN.is_match(first) {
            metadata.detected_name = Some((*first).to_string());
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "John Smith\n\
        john@example.com\n\
        555-123-4567\n\
        Summary\n\
        Experienced engineer.\n\
        Skills\n\
        Go, Rust, TypeScript";

    #[test]
    fn test_no_headers_yields_single_other_section() {
        let text = "A body of prose with no recognisable keywords.\nSecond line here.\nThird line closes it out nicely.";
        let metadata = classify(text);
        assert_eq!(metadata.sections.len(), 1);
        assert_eq!(metadata.sections[0].section_type, SectionType::Other);
        assert_eq!(
            metadata.sections[0].content,
            "A body of prose with no recognisable keywords.\nSecond line here.\nThird line closes it out nicely.\n"
        );
        assert_eq!(metadata.sections[0].confidence, 0.0);
    }

    #[test]
    fn test_section_ordering_is_stable() {
        let metadata = classify("Summary\nI am great\nExperience\nDid stuff");
        assert_eq!(metadata.sections.len(), 2);
        assert_eq!(metadata.sections[0].section_type, SectionType::Summary);
        assert_eq!(metadata.sections[0].content, "I am great\n");
        assert_eq!(metadata.sections[0].confidence, 0.8);
        assert_eq!(metadata.sections[1].section_type, SectionType::Experience);
        assert_eq!(metadata.sections[1].content, "Did stuff\n");
        assert_eq!(metadata.sections[1].confidence, 0.8);
    }

    #[test]
    fn test_leading_header_emits_no_empty_section() {
        let metadata = classify("Skills\nRust");
        assert_eq!(metadata.sections.len(), 1);
        assert_eq!(metadata.sections[0].section_type, SectionType::Skills);
    }

    #[test]
    fn test_header_line_is_consumed_as_delimiter() {
        let metadata = classify("intro line\nExperience\nDid stuff");
        let contents: Vec<&str> = metadata
            .sections
            .iter()
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(contents, vec!["intro line\n", "Did stuff\n"]);
        assert!(!contents.iter().any(|c| c.contains("Experience")));
    }

    #[test]
    fn test_first_email_wins() {
        let metadata = classify("first@example.com words here\nsecond@example.com more words");
        assert_eq!(metadata.detected_email.as_deref(), Some("first@example.com"));
    }

    #[test]
    fn test_first_phone_wins() {
        let metadata = classify("call 555-123-4567 anytime\nor 999-888-7777 never");
        assert_eq!(metadata.detected_phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn test_links_accumulate_without_dedup() {
        let metadata =
            classify("see github.com/jane for code\nalso github.com/jane for more\nand example.org too");
        assert_eq!(
            metadata.detected_links,
            vec!["github.com/jane", "github.com/jane", "example.org"]
        );
    }

    #[test]
    fn test_name_is_first_line() {
        let metadata = classify(SAMPLE_RESUME);
        assert_eq!(metadata.detected_name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_name_skipped_when_first_line_is_email() {
        let metadata = classify("jane@example.com\nSummary\nSome summary content goes here");
        assert_eq!(metadata.detected_name, None);
    }

    #[test]
    fn test_name_skipped_when_first_line_is_phone() {
        let metadata = classify("555-123-4567\nSummary\nSome summary content goes here");
        assert_eq!(metadata.detected_name, None);
    }

    #[test]
    fn test_classifier_is_idempotent() {
        let first = classify(SAMPLE_RESUME);
        let second = classify(SAMPLE_RESUME);
        assert_eq!(first, second);
    }

    #[test]
    fn test_end_to_end_sample_resume() {
        let metadata = classify(SAMPLE_RESUME);
        assert_eq!(metadata.detected_name.as_deref(), Some("John Smith"));
        assert_eq!(metadata.detected_email.as_deref(), Some("john@example.com"));
        assert_eq!(metadata.detected_phone.as_deref(), Some("555-123-4567"));
        // The contact lines before "Summary" form an untyped leading section.
        assert_eq!(metadata.sections.len(), 3);
        assert_eq!(metadata.sections[0].section_type, SectionType::Other);
        assert_eq!(metadata.sections[1].section_type, SectionType::Summary);
        assert_eq!(metadata.sections[1].confidence, 0.8);
        assert_eq!(metadata.sections[2].section_type, SectionType::Skills);
        assert_eq!(metadata.sections[2].confidence, 0.8);
        // The email's domain also satisfies the link pattern.
        assert!(metadata
            .detected_links
            .iter()
            .any(|l| l.contains("example.com")));
    }

    #[test]
    fn test_step_header_flushes_current_content() {
        let mut state = SectionAccumulator::default();
        state.content.push_str("intro\n");
        let (next, emitted) = step(state, "Education");
        let emitted = emitted.expect("non-empty accumulator must flush");
        assert_eq!(emitted.section_type, SectionType::Other);
        assert_eq!(emitted.content, "intro\n");
        assert_eq!(next.section_type, SectionType::Education);
        assert_eq!(next.confidence, 0.8);
        assert!(next.content.is_empty());
    }

    #[test]
    fn test_step_header_on_empty_accumulator_emits_nothing() {
        let (next, emitted) = step(SectionAccumulator::default(), "Skills");
        assert!(emitted.is_none());
        assert_eq!(next.section_type, SectionType::Skills);
    }

    #[test]
    fn test_step_content_line_appends_with_newline() {
        let (state, emitted) = step(SectionAccumulator::default(), "built things");
        assert!(emitted.is_none());
        assert_eq!(state.content, "built things\n");
    }

    #[test]
    fn test_blank_and_whitespace_lines_are_dropped() {
        let metadata = classify("Summary\n\n   \nline one\n\nline two");
        assert_eq!(metadata.sections.len(), 1);
        assert_eq!(metadata.sections[0].content, "line one\nline two\n");
    }
}
