use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

/// Selector for the responsive full-name span inside a name cell
pub const FULL_NAME_SELECTOR: &str = "span.full-name";

/// How to find the intended table(s) on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSelection {
    /// Every table with at least one row of `min_cells` cells, in document order
    ColumnCount { min_cells: usize },
    /// First table whose header row contains all keywords (case-insensitive)
    HeaderKeywords(&'static [&'static str]),
    /// First table matching a CSS selector such as `table.leaders`
    CssClass(&'static str),
}

impl TableSelection {
    /// Structural matches only read rows inside `tbody`
    fn body_rows_only(&self) -> bool {
        !matches!(self, TableSelection::ColumnCount { .. })
    }
}

/// One table cell, reduced to text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCell {
    /// Whole cell text, whitespace collapsed
    pub text: String,
    /// Preferred name text: full-name span, then link text, then whole text
    pub label: String,
}

impl RawCell {
    /// A cell without nested markup
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        Self { label: text.clone(), text }
    }
}

/// One table row as extracted from the page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { cells: texts.into_iter().map(RawCell::plain).collect() }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell text at `index`, empty if the row is short
    pub fn text(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Cell label at `index`, empty if the row is short
    pub fn label(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.label.as_str()).unwrap_or("")
    }
}

struct TableSelectors {
    table: Selector,
    row: Selector,
    link: Selector,
    full_name: Selector,
}

impl TableSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            table: parse_selector("table")?,
            row: parse_selector("tr")?,
            link: parse_selector("a")?,
            full_name: parse_selector(FULL_NAME_SELECTOR)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Failed to create selector '{}': {}", css, e))
}

/// Extract the rows of every table that matches `selection`.
///
/// `ColumnCount` can yield many tables; the structural strategies yield at most one.
/// A page with no matching table yields an empty list rather than an error.
pub fn extract_tables(document: &Html, selection: &TableSelection) -> Result<Vec<Vec<RawRow>>> {
    let selectors = TableSelectors::new()?;

    let tables: Vec<ElementRef> = match selection {
        TableSelection::ColumnCount { min_cells } => document
            .select(&selectors.table)
            .filter(|table| {
                own_rows(*table, &selectors)
                    .into_iter()
                    .any(|row| own_cells(row).count() >= *min_cells)
            })
            .collect(),
        TableSelection::HeaderKeywords(keywords) => document
            .select(&selectors.table)
            .find(|table| header_matches(*table, keywords, &selectors))
            .into_iter()
            .collect(),
        TableSelection::CssClass(css) => {
            let class_selector = parse_selector(css)?;
            document.select(&class_selector).next().into_iter().collect()
        }
    };

    let body_only = selection.body_rows_only();

    Ok(tables
        .into_iter()
        .map(|table| {
            own_rows(table, &selectors)
                .into_iter()
                .filter(|row| !body_only || parent_is(*row, "tbody"))
                .map(|row| read_row(row, &selectors))
                .collect()
        })
        .collect())
}

/// Extract the rows of the first table matching `selection`
pub fn extract_rows(document: &Html, selection: &TableSelection) -> Result<Vec<RawRow>> {
    Ok(extract_tables(document, selection)?.into_iter().next().unwrap_or_default())
}

/// Rows belonging to `table` itself, not to a table nested inside it
fn own_rows<'a>(table: ElementRef<'a>, selectors: &TableSelectors) -> Vec<ElementRef<'a>> {
    table
        .select(&selectors.row)
        .filter(|row| enclosing_table(*row).map(|t| t.id()) == Some(table.id()))
        .collect()
}

fn enclosing_table<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap).find(|a| a.value().name() == "table")
}

fn parent_is(element: ElementRef, tag: &str) -> bool {
    element.parent().and_then(ElementRef::wrap).is_some_and(|p| p.value().name() == tag)
}

/// The row's own `th`/`td` children
fn own_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
}

/// Header row is the first `thead` row, else the first row. Cells wrapping a
/// nested table are layout, not headers.
fn header_matches(table: ElementRef, keywords: &[&str], selectors: &TableSelectors) -> bool {
    let rows = own_rows(table, selectors);
    let header = rows.iter().find(|row| parent_is(**row, "thead")).or_else(|| rows.first());

    match header {
        Some(row) => {
            let text = own_cells(*row)
                .filter(|cell| cell.select(&selectors.table).next().is_none())
                .map(|cell| collapse_whitespace(cell.text()))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            keywords.iter().all(|keyword| text.contains(&keyword.to_lowercase()))
        }
        None => false,
    }
}

fn read_row(row: ElementRef, selectors: &TableSelectors) -> RawRow {
    RawRow { cells: own_cells(row).map(|cell| read_cell(cell, selectors)).collect() }
}

fn read_cell(cell: ElementRef, selectors: &TableSelectors) -> RawCell {
    let text = collapse_whitespace(cell.text());
    let link = cell.select(&selectors.link).next();
    let scope = link.unwrap_or(cell);

    let label = scope
        .select(&selectors.full_name)
        .next()
        .map(|span| collapse_whitespace(span.text()))
        .filter(|name| !name.is_empty())
        .or_else(|| link.map(|a| collapse_whitespace(a.text())).filter(|name| !name.is_empty()))
        .unwrap_or_else(|| text.clone());

    RawCell { text, label }
}

/// Join text nodes and collapse runs of whitespace (including `&nbsp;`) to one space
fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
