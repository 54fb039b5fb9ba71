use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template", "iframe"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "nav", "main", "aside", "li", "ul", "ol", "h1",
    "h2", "h3", "h4", "h5", "h6", "table", "tr", "blockquote", "figure", "figcaption", "hr",
];

/// Reduce markup to a single line of plain text.
///
/// Script and style content is dropped, entities are decoded by the parser and
/// every run of whitespace (line breaks included) becomes one space. Never fails.
///
/// Applying it to its own output returns the same string for plain text. Escaped
/// angle brackets are the exception: `a &lt;b&gt; c` becomes `a <b> c`, which
/// a second pass reads as a tag and reduces to `a c`.
pub fn normalize(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut collector = TextCollector::default();
    collector.visit_children(fragment.tree.root());
    collapse_whitespace(&collector.buffer)
}

/// Plain text that keeps one line per block-level element.
pub fn structured_text(markup: &str) -> String {
    page_text(markup).text
}

/// Structured page text together with where each `<footer>` element starts in it.
pub(crate) struct PageText {
    pub text: String,
    /// Byte offsets into `text`, in document order.
    pub footers: Vec<usize>,
}

pub(crate) fn page_text(markup: &str) -> PageText {
    let document = Html::parse_document(markup);
    let mut collector = TextCollector::default();
    collector.visit_children(document.tree.root());
    collector.into_page_text()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct TextCollector {
    buffer: String,
    /// Buffer lengths at which a `<footer>` was entered.
    footer_marks: Vec<usize>,
}

impl TextCollector {
    fn visit_children(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.buffer.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_TAGS.contains(&name) {
                    return;
                }
                let block = name == "footer" || BLOCK_TAGS.contains(&name);
                if block || name == "br" {
                    self.buffer.push('\n');
                }
                if name == "footer" {
                    self.footer_marks.push(self.buffer.len());
                }
                self.visit_children(node);
                if block {
                    self.buffer.push('\n');
                }
            }
            _ => self.visit_children(node),
        }
    }

    /// Collapses every line and drops empty ones, carrying the footer marks over
    /// to offsets in the collapsed text.
    fn into_page_text(self) -> PageText {
        let mut text = String::new();
        let mut footers = Vec::with_capacity(self.footer_marks.len());
        let mut from = 0;
        for &mark in &self.footer_marks {
            push_lines(&mut text, &self.buffer[from..mark]);
            footers.push(text.len());
            from = mark;
        }
        push_lines(&mut text, &self.buffer[from..]);
        PageText { text, footers }
    }
}

fn push_lines(out: &mut String, chunk: &str) {
    for line in chunk.lines().map(collapse_whitespace).filter(|line| !line.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_offsets_point_past_preceding_text() {
        let page = page_text("<body><p>kept</p><footer>note</footer><p>after</p></body>");
        assert_eq!(page.text, "kept\nnote\nafter");
        assert_eq!(page.footers, vec![4]);
        assert_eq!(&page.text[..page.footers[0]], "kept");
    }

    #[test]
    fn leading_footer_sits_at_zero() {
        let page = page_text("<footer>top</footer><p>body</p>");
        assert_eq!(page.footers, vec![0]);
        assert_eq!(page.text, "top\nbody");
    }

    #[test]
    fn head_title_is_not_text() {
        let text = structured_text("<html><head><title>T</title></head><body>B</body></html>");
        assert_eq!(text, "B");
    }
}
