use crate::config::SectionMarkers;
use crate::model::ReportSection;
use crate::normalize::{collapse_whitespace, page_text, PageText};

pub trait SectionExtractor: Send + Sync {
    fn extract(&self, html: &str) -> ReportSection;
}

/// Finds the report between a start marker and the first terminator phrase or
/// `<footer>` after it.
///
/// The page is reduced to block-structured text first, so inline markup between
/// the markers does not matter. Footers earlier in the page are ordinary text.
/// When nothing bounds the region the result is an empty section.
#[derive(Debug, Clone)]
pub struct MarkerSectionExtractor {
    markers: SectionMarkers,
}

impl MarkerSectionExtractor {
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    /// The single place that decides where the report lives in the page text.
    fn locate_region<'a>(&self, page: &'a PageText) -> Option<&'a str> {
        let text = page.text.as_str();
        let start = find_ignore_case(text, &self.markers.start, 0)?;
        let search_from = start + self.markers.start.len();
        let footer = page.footers.iter().copied().find(|&offset| offset >= search_from);
        let end = self
            .markers
            .terminators
            .iter()
            .filter_map(|terminator| find_ignore_case(text, terminator, search_from))
            .chain(footer)
            .min()?;
        Some(&text[start..end])
    }

    /// Byte range of the flow sentence inside `region`.
    fn locate_flow(&self, region: &str) -> Option<(usize, usize)> {
        let start = find_ignore_case(region, &self.markers.flow, 0)?;
        let body_from = start + self.markers.flow.len();
        let end = sentence_end(region, body_from);
        Some((start, end))
    }

    /// Drops the start marker and the `m/d/yy` stamp that follows it.
    fn strip_date_stamp(&self, text: &str) -> String {
        let Some(start) = find_ignore_case(text, &self.markers.start, 0) else {
            return text.to_string();
        };
        let after_marker = &text[start + self.markers.start.len()..];
        let after_space = after_marker.trim_start();
        let stamp_len = after_space
            .find(|c: char| !(c.is_ascii_digit() || c == '/'))
            .unwrap_or(after_space.len());
        let stamp = &after_space[..stamp_len];
        let rest = if stamp.contains('/') && stamp.chars().any(|c| c.is_ascii_digit()) {
            &after_space[stamp_len..]
        } else {
            after_marker
        };
        format!("{} {}", &text[..start], rest)
    }
}

impl Default for MarkerSectionExtractor {
    fn default() -> Self {
        Self::new(SectionMarkers::default())
    }
}

impl SectionExtractor for MarkerSectionExtractor {
    fn extract(&self, html: &str) -> ReportSection {
        let page = page_text(html);
        let Some(region) = self.locate_region(&page) else {
            return ReportSection::default();
        };

        let (flow_info, remainder) = match self.locate_flow(region) {
            Some((start, end)) => (
                collapse_whitespace(&region[start..end]),
                format!("{}\n{}", &region[..start], &region[end..]),
            ),
            None => (String::new(), region.to_string()),
        };

        let report_text = collapse_whitespace(&self.strip_date_stamp(&remainder));
        ReportSection {
            flow_info,
            report_text,
        }
    }
}

/// End of the sentence starting before `from`: a line break, or terminal
/// punctuation followed by whitespace (so "1.5 cfs" stays intact).
fn sentence_end(text: &str, from: usize) -> usize {
    let mut chars = text[from..].char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\n' => return from + offset,
            '.' | '!' | '?' => {
                let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
                if at_boundary {
                    return from + offset + ch.len_utf8();
                }
            }
            _ => {}
        }
    }
    text.len()
}

/// ASCII case-insensitive search; byte offsets stay valid for the original text.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    let lowered = haystack.to_ascii_lowercase();
    lowered[from..]
        .find(&needle.to_ascii_lowercase())
        .map(|idx| from + idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_end_skips_decimal_points() {
        let text = "Flow: 1.5 cfs today. More";
        assert_eq!(&text[..sentence_end(text, 0)], "Flow: 1.5 cfs today.");
    }

    #[test]
    fn sentence_end_stops_at_line_break() {
        let text = "Flow: 150 cfs\nNext block";
        assert_eq!(&text[..sentence_end(text, 0)], "Flow: 150 cfs");
    }

    #[test]
    fn find_ignore_case_honours_offset() {
        assert_eq!(find_ignore_case("abc ABC", "abc", 1), Some(4));
        assert_eq!(find_ignore_case("abc", "", 0), None);
    }
}
