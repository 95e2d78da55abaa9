use crate::parser::sections::find_section;
use crate::parser::tables::Table;
use crate::record::Classification;

pub fn extract(text: &str, heading: &str) -> Classification {
    let mut out = Classification::default();
    let Some(table) = find_section(text, heading).and_then(Table::parse) else {
        return out;
    };
    for row in &table.rows {
        let label = row.first().map(String::as_str).unwrap_or("");
        if label.is_empty() {
            continue;
        }
        let rating = row.get(1).map(String::as_str).unwrap_or("");
        out.insert(label, rating);
    }
    out
}
