//! Tolerant HTML table extraction.
//!
//! Source pages are loosely structured: closing `</tr>`/`</td>` tags are often
//! omitted and column layouts drift. Rows and cells are therefore delimited
//! by their opening tags rather than matched as balanced elements. Nested
//! tables are not supported.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table\b[^>]*>(.*?)</table\s*>").expect("valid table regex")
});
static ROW_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tr\b[^>]*>").expect("valid tr regex"));
static CELL_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(td|th)\b[^>]*>").expect("valid cell regex"));
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
        .expect("valid script/style regex")
});
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|h[1-6])\s*>").expect("valid break regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});").expect("valid entity regex")
});
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// `<td>`
    Data,
    /// `<th>`
    Header,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Texts of `<td>` cells only, in column order.
    #[must_use]
    pub fn data_cells(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Data)
            .map(|c| c.text.as_str())
            .collect()
    }

    /// Texts of all cells, `<td>` and `<th>` alike.
    #[must_use]
    pub fn all_cells(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    /// All cell texts joined with single spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().map(|c| c.text.as_str()))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Extracts every `<table>` in document order.
#[must_use]
pub fn extract_tables(html: &str) -> Vec<Table> {
    let html = SCRIPT_STYLE_RE.replace_all(html, " ");
    TABLE_RE
        .captures_iter(&html)
        .filter_map(|cap| cap.get(1))
        .map(|inner| parse_table(inner.as_str()))
        .collect()
}

/// Every row of every table in document order.
#[must_use]
pub fn document_rows(html: &str) -> Vec<Row> {
    extract_tables(html)
        .into_iter()
        .flat_map(|t| t.rows)
        .collect()
}

/// Visible text of a whole page with tags stripped and whitespace collapsed.
#[must_use]
pub fn page_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let with_breaks = BREAK_RE.replace_all(&without_scripts, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);
    decoded
        .lines()
        .map(collapse_whitespace)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_table(inner: &str) -> Table {
    let starts: Vec<(usize, usize)> = ROW_OPEN_RE
        .find_iter(inner)
        .map(|m| (m.start(), m.end()))
        .collect();

    let rows = starts
        .iter()
        .enumerate()
        .map(|(i, &(_, content_start))| {
            let end = starts.get(i + 1).map_or(inner.len(), |&(next, _)| next);
            parse_row(&inner[content_start..end])
        })
        .collect();

    Table { rows }
}

fn parse_row(content: &str) -> Row {
    let opens: Vec<(usize, usize, CellKind)> = CELL_OPEN_RE
        .captures_iter(content)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let kind = if cap[1].eq_ignore_ascii_case("th") {
                CellKind::Header
            } else {
                CellKind::Data
            };
            Some((whole.start(), whole.end(), kind))
        })
        .collect();

    let cells = opens
        .iter()
        .enumerate()
        .map(|(i, &(_, content_start, kind))| {
            let end = opens.get(i + 1).map_or(content.len(), |&(next, _, _)| next);
            Cell {
                kind,
                text: cell_text(&content[content_start..end]),
            }
        })
        .collect();

    Row { cells }
}

/// Strips markup from a cell fragment, decodes entities and collapses
/// whitespace. Inline tags are removed without inserting spaces.
#[must_use]
pub fn cell_text(fragment: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(fragment, " ");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    collapse_whitespace(&decode_entities(&stripped))
}

fn collapse_whitespace(s: &str) -> String {
    SPACE_RE.replace_all(s, " ").trim().to_string()
}

/// Decodes named entities common in table markup plus all numeric entities.
/// Unknown named entities are left as-is.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |cap: &Captures<'_>| {
            let body = &cap[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or(body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "ndash" => Some('-'),
                    "mdash" => Some('-'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rows_and_cells_in_order() {
        let html = r"
            <table id='grid'>
              <thead><tr><th>Period</th><th>Value</th></tr></thead>
              <tbody>
                <tr><td>2024 Q4</td><td>$2.71 B</td></tr>
                <tr><td>2024 Q3</td><td>$2.50 B</td></tr>
              </tbody>
            </table>";

        let tables = extract_tables(html);

        assert_eq!(tables.len(), 1);
        let rows = &tables[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].all_cells(), vec!["Period", "Value"]);
        assert!(rows[0].data_cells().is_empty());
        assert_eq!(rows[1].data_cells(), vec!["2024 Q4", "$2.71 B"]);
        assert_eq!(rows[2].data_cells(), vec!["2024 Q3", "$2.50 B"]);
    }

    #[test]
    fn tolerates_missing_closing_tags() {
        let html = "<table><tr><td>A<td>B<tr><td>C</table>";

        let rows = document_rows(html);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].data_cells(), vec!["A", "B"]);
        assert_eq!(rows[1].data_cells(), vec!["C"]);
    }

    #[test]
    fn strips_inline_markup_and_decodes_entities() {
        let html = r#"<table><tr>
            <td class="sym"><a href="/m/stock.php?sym=GOOG">GOOG</a><span> - Alphabet Inc.&nbsp;CL&nbsp;C</span></td>
            <td>Johnson &amp; Johnson &#8211; &#x41;</td>
        </tr></table>"#;

        let rows = document_rows(html);

        assert_eq!(
            rows[0].data_cells(),
            vec!["GOOG - Alphabet Inc. CL C", "Johnson & Johnson \u{2013} A"]
        );
    }

    #[test]
    fn br_becomes_space() {
        assert_eq!(cell_text("Q1<br/>2025"), "Q1 2025");
    }

    #[test]
    fn rows_span_multiple_tables_in_document_order() {
        let html = "<table><tr><td>1</td></tr></table><p>x</p><table><tr><td>2</td></tr></table>";
        let rows = document_rows(html);
        let texts: Vec<Vec<&str>> = rows.iter().map(Row::data_cells).collect();
        assert_eq!(texts, vec![vec!["1"], vec!["2"]]);
    }

    #[test]
    fn ignores_tables_inside_scripts() {
        let html = "<script>var t = '<table><tr><td>X</td></tr></table>';</script>\
                    <table><tr><td>Y</td></tr></table>";
        let rows = document_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].data_cells(), vec!["Y"]);
    }

    #[test]
    fn table_text_joins_cells() {
        let tables =
            extract_tables("<table><tr><th>Transaction Date</th><th>Filing</th></tr></table>");
        assert_eq!(tables[0].text(), "Transaction Date Filing");
    }

    #[test]
    fn page_text_keeps_line_structure() {
        let html = "<html><head><style>p{}</style></head><body>\
                    <div>Portfolio date: 31 Dec 2024</div><p>Period: Q4 2024</p></body></html>";
        let text = page_text(html);
        assert!(text.contains("Portfolio date: 31 Dec 2024"));
        assert!(text.lines().any(|l| l == "Period: Q4 2024"));
        assert!(!text.contains("p{}"));
    }

    #[test]
    fn unknown_entities_are_preserved() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    }
}
