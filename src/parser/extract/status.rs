use crate::parser::sections::find_section;
use crate::parser::tables::Table;

pub const DOCUMENT_STATUS_COLUMN: &[&str] = &["Document Status"];
pub const SERVICE_STATUS_COLUMN: &[&str] = &["Service Status"];
pub const APPROVAL_DATE_COLUMN: &[&str] =
    &["Date", "Approval Date", "Approved Date", "Latest Approved Date"];

/// First table of a section, if both exist.
pub fn section_table(text: &str, heading: &str) -> Option<Table> {
    find_section(text, heading).and_then(Table::parse)
}

/// First data-row value of `column` in the section's table; empty when any
/// piece is missing.
pub fn table_value(table: Option<&Table>, column: &[&str]) -> String {
    table.map(|t| t.first_value(column)).unwrap_or_default()
}
