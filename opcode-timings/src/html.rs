//! Reading opcode tables out of an HTML page.
//!
//! The scanner wants rows of cell text. Here the rows are every `<tr>` in the document, in
//! document order, and the cells are the `<td>` elements inside each one (`<th>` header
//! cells are left out). Cell text is an approximation of what a browser's `innerText` gives
//! for the cell, which is what matters for line-based parsing: `<br>` and block elements
//! separate lines, and source whitespace collapses.

use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));

/// Elements whose content isn't rendered.
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Elements which start and end a line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Parse a whole HTML page.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Get the text of every `<td>` of every `<tr>` in the document.
pub fn table_rows(document: &Html) -> Vec<Vec<String>> {
    let rows: Vec<Vec<String>> = document
        .select(&ROW)
        .map(|row| row.select(&CELL).map(inner_text).collect())
        .collect();
    debug!(
        "Found {} table rows with {} cells",
        rows.len(),
        rows.iter().map(Vec::len).sum::<usize>()
    );
    rows
}

/// Parse a page and get its table rows.
pub fn document_rows(html: &str) -> Vec<Vec<String>> {
    table_rows(&parse_document(html))
}

/// Approximate the `innerText` of an element.
///
/// Not a full layout: `<p>` gets a single line break instead of a blank line, and `<pre>`
/// collapses whitespace like everything else.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut text = InnerText::default();
    text.push_children(element);
    text.finish()
}

#[derive(Default)]
struct InnerText {
    out: String,
    /// A block boundary was passed since the last character of text.
    block_break: bool,
}

impl InnerText {
    fn push_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text);
            } else if let Some(child) = ElementRef::wrap(child) {
                self.push_element(child);
            }
        }
    }

    fn push_element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        if name == "br" {
            self.newline();
            return;
        }
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        let block = BLOCK_ELEMENTS.contains(&name);
        self.block_break |= block;
        self.push_children(element);
        self.block_break |= block;
    }

    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_ascii_whitespace() {
                if !self.out.is_empty() && !self.out.ends_with(&[' ', '\n'][..]) {
                    self.out.push(' ');
                }
            } else {
                if self.block_break && !self.out.is_empty() && !self.out.ends_with('\n') {
                    self.newline();
                }
                self.block_break = false;
                self.out.push(c);
            }
        }
    }

    fn newline(&mut self) {
        self.trim_trailing_space();
        self.out.push('\n');
        self.block_break = false;
    }

    fn trim_trailing_space(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    fn finish(mut self) -> String {
        self.trim_trailing_space();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_text(cell_html: &str) -> String {
        let rows = document_rows(&format!("<table><tr><td>{cell_html}</td></tr></table>"));
        rows[0][0].clone()
    }

    #[test]
    fn line_breaks_and_nbsp() {
        assert_eq!(
            cell_text("NOP<br>1&nbsp;&nbsp;4t<br>- - - -"),
            "NOP\n1\u{a0}\u{a0}4t\n- - - -"
        );
    }

    #[test]
    fn source_whitespace_collapses() {
        assert_eq!(
            cell_text("\n    LD BC,d16 <br>\n    3   12t\n  "),
            "LD BC,d16\n3 12t"
        );
    }

    #[test]
    fn inline_elements_join() {
        assert_eq!(
            cell_text("<span>JR</span> <b>NZ,r8</b><br><i>2</i> 12t-8t"),
            "JR NZ,r8\n2 12t-8t"
        );
    }

    #[test]
    fn block_elements_split_lines() {
        assert_eq!(
            cell_text("<div>LDA</div>\n<div> cycles: 4 </div>"),
            "LDA\ncycles: 4"
        );
    }

    #[test]
    fn unrendered_content_is_skipped() {
        assert_eq!(
            cell_text("NOP<script>var x = 1;</script><br>1 4t"),
            "NOP\n1 4t"
        );
    }

    #[test]
    fn empty_cell() {
        assert_eq!(cell_text(""), "");
        assert_eq!(cell_text("&nbsp;"), "\u{a0}");
    }

    #[test]
    fn header_cells_are_not_cells() {
        let rows = document_rows(
            "<table>\
               <tr><th></th><th>x0</th><th>x1</th></tr>\
               <tr><th>0x</th><td>NOP<br>1 4t</td><td>LD BC,d16<br>3 12t</td></tr>\
             </table>",
        );
        assert_eq!(
            rows,
            vec![
                vec![],
                vec!["NOP\n1 4t".to_string(), "LD BC,d16\n3 12t".to_string()],
            ]
        );
    }

    #[test]
    fn rows_span_tables() {
        let rows = document_rows(
            "<table><tr><td>a</td></tr></table>\
             <p>between</p>\
             <table><tr><td>b</td><td>c</td></tr></table>",
        );
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string()],
                vec!["b".to_string(), "c".to_string()]
            ]
        );
    }
}
