use crate::extract::{RawRow, TableSelection};
use crate::types::{DataKind, PageLayout};

/// A record kind that can be decoded from a table row.
///
/// Each implementation supplies its column mapping and how its table is found;
/// the extract → decode → assemble pipeline is shared.
pub trait StatRecord: Sized {
    const KIND: DataKind;
    const LAYOUT: PageLayout;
    /// Rows with fewer cells are dropped
    const MIN_CELLS: usize;
    /// Column holding the primary name of the row
    const LABEL_COLUMN: usize;
    /// Header text of the label column, used to reject header rows in the body
    const HEADER_LABEL: &'static str;

    fn table_selection() -> TableSelection;

    /// Decode a row that already passed [`is_data_row`]
    fn from_row(row: &RawRow, position: u32) -> Self;

    /// 1-indexed position within the division
    fn position(&self) -> u32;

    /// Primary name (team, player or goalie)
    fn label(&self) -> &str;
}

/// Whether a row carries data for `R` rather than being short, blank or a header
pub fn is_data_row<R: StatRecord>(row: &RawRow) -> bool {
    if row.len() < R::MIN_CELLS {
        return false;
    }

    let label = row.label(R::LABEL_COLUMN);
    !label.is_empty() && !label.eq_ignore_ascii_case(R::HEADER_LABEL)
}

/// Decode every data row, numbering positions from 1 in row order
pub fn decode_rows<R: StatRecord>(rows: &[RawRow]) -> Vec<R> {
    rows.iter()
        .filter(|row| is_data_row::<R>(row))
        .enumerate()
        .map(|(index, row)| R::from_row(row, index as u32 + 1))
        .collect()
}

/// Parse a base-10 integer, defaulting to 0
pub fn parse_int(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

/// Parse a decimal such as `.750` or `2.41`, defaulting to 0
pub fn parse_fraction(text: &str) -> f64 {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite()).unwrap_or(0.0)
}
