/// A pipe table parsed into header names and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// First pipe table in `body`: header row, an optional alignment row, then
    /// data rows. Blank lines inside the table are skipped; parsing stops at
    /// the first line of other text.
    pub fn parse(body: &str) -> Option<Table> {
        let mut lines = body
            .lines()
            .map(str::trim)
            .skip_while(|l| !l.starts_with('|'))
            .take_while(|l| l.is_empty() || l.starts_with('|'))
            .filter(|l| !l.is_empty())
            .map(split_row)
            .peekable();

        let headers = lines.next()?;
        lines.next_if(|cells| is_separator(cells));
        let rows = lines
            .filter(|cells| cells.iter().any(|c| !c.is_empty()))
            .collect();

        Some(Table { headers, rows })
    }

    /// Column index for the first of `names` present in the header.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            let wanted = normalize(name);
            self.headers.iter().position(|h| normalize(h) == wanted)
        })
    }

    /// Cell of the first data row under the first matching header.
    pub fn first_value(&self, names: &[&str]) -> String {
        let Some(idx) = self.column(names) else {
            return String::new();
        };
        self.rows
            .first()
            .and_then(|row| row.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.trim().trim_start_matches('|');
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// `|:--|---:|` style rows: every cell is alignment markers only.
fn is_separator(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn normalize(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
