use crate::parser::sections::find_section;
use crate::parser::tables::Table;
use crate::record::CapabilityRow;

pub fn extract(text: &str, heading: &str) -> Vec<CapabilityRow> {
    let Some(table) = find_section(text, heading).and_then(Table::parse) else {
        return Vec::new();
    };

    let cols = level_columns(&table);
    table
        .rows
        .iter()
        .map(|row| CapabilityRow {
            level0: cell(row, cols[0]),
            level1: cell(row, cols[1]),
            level2: cell(row, cols[2]),
        })
        .collect()
}

fn cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
}

/// Named `Level <n>` headers first; unnamed levels take the remaining columns
/// left to right.
fn level_columns(table: &Table) -> [Option<usize>; 3] {
    let mut cols = [0, 1, 2].map(|level| level_column(table, level));
    let mut free = (0..table.headers.len())
        .filter(|i| !cols.contains(&Some(*i)))
        .collect::<Vec<_>>()
        .into_iter();
    for col in cols.iter_mut().filter(|c| c.is_none()) {
        *col = free.next();
    }
    cols
}

/// Header naming `Level <n>` (e.g. `Cap-Map Level 1`, `level1`).
fn level_column(table: &Table, level: usize) -> Option<usize> {
    let digit = char::from_digit(level as u32, 10)?;
    table.headers.iter().position(|h| {
        let lower = h.to_lowercase();
        lower
            .find("level")
            .map(|i| lower[i + "level".len()..].trim_start().starts_with(digit))
            .unwrap_or(false)
    })
}
