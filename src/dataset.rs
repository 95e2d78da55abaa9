use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::recert::format_date;
use crate::reconcile::NOT_APPLICABLE;
use crate::record::{CapabilityRow, GovernanceRecord, RecordOrigin};

pub const ORDINAL_COLUMN: &str = "SL No.";
pub const BASE_COLUMNS: &[&str] = &[
    "Service Name",
    "Service Owner",
    "Service Owner Id",
    "Service Status",
    "ADR Authors",
    "ADR Document Status",
    "Latest Approval date",
];
pub const CAPABILITY_COLUMNS: &[&str] = &["Cap-Map Level 0", "Cap-Map Level 1", "Cap-Map Level 2"];
pub const OVERLAY_COLUMNS: &[&str] = &[
    "S-ADR Document Status",
    "S-ADR Service Status",
    "S-ADR Approval Date",
];
pub const RECERT_COLUMNS: &[&str] = &[
    "Re-certify Due Date",
    "Re-certify Due Month",
    "Upcoming Recertification",
];

/// The flat table handed to persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Rows as JSON objects keyed by column name, in column order.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(Value::String))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }
}

/// Flatten records into rows: one row per capability entry (or one row when
/// there are none), classification spread over the union of labels, ordinals
/// from 1. Blanks in a record's own cells become `marker`; a classification
/// label the record never mentions stays empty.
pub fn assemble(records: &[GovernanceRecord], marker: &str) -> Dataset {
    let labels = classification_columns(records);

    let mut columns: Vec<String> = vec![ORDINAL_COLUMN.to_string()];
    columns.extend(BASE_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(CAPABILITY_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(labels.iter().cloned());
    columns.extend(OVERLAY_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(RECERT_COLUMNS.iter().map(|c| c.to_string()));

    let mut rows = Vec::new();
    for record in records {
        for capability in capability_cells(record) {
            let mut row = Vec::with_capacity(columns.len());
            row.push((rows.len() + 1).to_string());
            row.extend(base_cells(record).map(|c| fill(c, marker)));
            row.extend(capability.map(|c| fill(c, marker)));
            row.extend(labels.iter().map(|l| {
                record
                    .data_classification
                    .get(l)
                    .map(|rating| fill(rating.to_string(), marker))
                    .unwrap_or_default()
            }));
            row.extend(overlay_cells(record).map(|c| fill(c, marker)));
            row.extend(recert_cells(record).map(|c| fill(c, marker)));
            rows.push(row);
        }
    }

    Dataset { columns, rows }
}

fn fill(cell: String, marker: &str) -> String {
    if cell.trim().is_empty() {
        marker.to_string()
    } else {
        cell
    }
}

/// Union of classification labels across records, first-seen order.
fn classification_columns(records: &[GovernanceRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.data_classification.keys())
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect()
}

fn base_cells(r: &GovernanceRecord) -> [String; 7] {
    [
        r.service_name.clone(),
        r.service_owner.join(", "),
        r.service_owner_id.join(", "),
        r.service_status.clone(),
        r.adr_authors.join("; "),
        r.adr_document_status.clone(),
        r.latest_approval_date.clone(),
    ]
}

fn capability_cells(r: &GovernanceRecord) -> Vec<[String; 3]> {
    if r.capability_mapping.is_empty() {
        let fill = match r.origin {
            RecordOrigin::OverlayOnly => NOT_APPLICABLE,
            RecordOrigin::Primary(_) => "",
        };
        return vec![[fill.to_string(), fill.to_string(), fill.to_string()]];
    }
    r.capability_mapping
        .iter()
        .map(|CapabilityRow { level0, level1, level2 }| {
            [level0.clone(), level1.clone(), level2.clone()]
        })
        .collect()
}

fn overlay_cells(r: &GovernanceRecord) -> [String; 3] {
    [
        r.overlay_document_status.clone(),
        r.overlay_service_status.clone(),
        r.overlay_approval_date.clone(),
    ]
}

fn recert_cells(r: &GovernanceRecord) -> [String; 3] {
    let rc = &r.recertification;
    [
        format_date(rc.due_date),
        rc.due_month.clone(),
        if rc.upcoming { "1" } else { "0" }.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::recert::{self, RecertPolicy};
    use crate::record::{Classification, ServiceStatusOverlay};
    use crate::reconcile::synthesize;
    use crate::source::DocumentKind;

    const MARKER: &str = "Check with CPA team";

    impl Dataset {
        fn cell(&self, row: usize, column: &str) -> Option<&str> {
            let idx = self.columns.iter().position(|c| c == column)?;
            self.rows.get(row)?.get(idx).map(String::as_str)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn primary(name: &str) -> GovernanceRecord {
        GovernanceRecord {
            source: format!("{}.md", name),
            origin: RecordOrigin::Primary(DocumentKind::Foundational),
            service_name: name.into(),
            service_owner: vec!["Ann".into(), "Bo".into()],
            service_owner_id: vec!["ann".into(), "bo".into()],
            service_status: "Live".into(),
            adr_authors: vec!["Ann".into(), "Cy".into()],
            adr_document_status: "Approved".into(),
            latest_approval_date: "15-05-2022".into(),
            capability_mapping: Vec::new(),
            data_classification: Classification::default(),
            overlay_document_status: String::new(),
            overlay_service_status: String::new(),
            overlay_approval_date: String::new(),
            recertification: recert::calculate("15-05-2022", &RecertPolicy::default(), today()),
        }
    }

    fn cap(a: &str, b: &str, c: &str) -> CapabilityRow {
        CapabilityRow {
            level0: a.into(),
            level1: b.into(),
            level2: c.into(),
        }
    }

    #[test]
    fn no_capability_one_row() {
        let ds = assemble(&[primary("Ledger")], MARKER);
        assert_eq!(ds.rows.len(), 1);
        assert_eq!(ds.cell(0, "Service Owner"), Some("Ann, Bo"));
        assert_eq!(ds.cell(0, "Service Owner Id"), Some("ann, bo"));
        assert_eq!(ds.cell(0, "ADR Authors"), Some("Ann; Cy"));
        assert_eq!(ds.cell(0, "Cap-Map Level 0"), Some(MARKER));
        assert_eq!(ds.cell(0, "Re-certify Due Date"), Some("15-03-2023"));
        assert_eq!(ds.cell(0, "Re-certify Due Month"), Some("Mar"));
        assert_eq!(ds.cell(0, "Upcoming Recertification"), Some("1"));
    }

    #[test]
    fn capability_cross_join() {
        let mut r = primary("Payments");
        r.capability_mapping = vec![cap("P", "Cards", "Auth"), cap("P", "Cards", "Refunds"), cap("P", "Ledger", "Post")];
        let ds = assemble(&[r], MARKER);
        assert_eq!(ds.rows.len(), 3);

        let base: Vec<_> = ds.rows.iter().map(|row| row[1..=BASE_COLUMNS.len()].to_vec()).collect();
        assert!(base.windows(2).all(|w| w[0] == w[1]));

        let level2: Vec<_> = (0..3).map(|i| ds.cell(i, "Cap-Map Level 2").unwrap()).collect();
        assert_eq!(level2, vec!["Auth", "Refunds", "Post"]);
    }

    #[test]
    fn classification_union_columns() {
        let mut a = primary("A");
        a.data_classification.insert("Confidential", "High");
        let mut b = primary("B");
        b.data_classification.insert("Public", "Low");
        b.data_classification.insert("Confidential", "Medium");

        let ds = assemble(&[a, b], MARKER);
        let dc: Vec<_> = ds.columns.iter().filter(|c| c.starts_with("DC-")).collect();
        assert_eq!(dc, vec!["DC-Confidential", "DC-Public"]);
        assert_eq!(ds.cell(0, "DC-Confidential"), Some("High"));
        assert_eq!(ds.cell(0, "DC-Public"), Some(""));
        assert_eq!(ds.cell(1, "DC-Confidential"), Some("Medium"));
    }

    #[test]
    fn own_blank_rating_gets_marker() {
        let mut a = primary("A");
        a.data_classification.insert("Restricted", "");
        let ds = assemble(&[a, primary("B")], MARKER);
        assert_eq!(ds.cell(0, "DC-Restricted"), Some(MARKER));
        assert_eq!(ds.cell(1, "DC-Restricted"), Some(""));
    }

    #[test]
    fn missing_owners_become_marker() {
        let mut r = primary("Ledger");
        r.service_owner.clear();
        r.service_owner_id.clear();
        let ds = assemble(&[r], MARKER);
        assert_eq!(ds.cell(0, "Service Owner"), Some(MARKER));
        assert_eq!(ds.cell(0, "Service Owner Id"), Some(MARKER));
        assert_eq!(ds.cell(0, "S-ADR Service Status"), Some(MARKER));
    }

    #[test]
    fn ordinals_span_all_rows() {
        let mut a = primary("A");
        a.capability_mapping = vec![cap("x", "y", "z"), cap("x", "y", "w")];
        let o = ServiceStatusOverlay {
            service_name: "Hub".into(),
            service_status: "In Build".into(),
            approval_date: "TBD".into(),
            ..Default::default()
        };
        let ds = assemble(&[a, primary("B"), synthesize(&o, &RecertPolicy::default(), today())], MARKER);
        let ordinals: Vec<_> = (0..ds.rows.len()).map(|i| ds.cell(i, ORDINAL_COLUMN).unwrap()).collect();
        assert_eq!(ordinals, vec!["1", "2", "3", "4"]);
        assert_eq!(ds.cell(3, "Cap-Map Level 1"), Some(NOT_APPLICABLE));
        assert_eq!(ds.cell(3, "Latest Approval date"), Some("01-01-2000"));
        assert_eq!(ds.cell(3, "Re-certify Due Date"), Some("01-01-2000"));
        assert_eq!(ds.cell(3, "Upcoming Recertification"), Some("0"));
    }

    #[test]
    fn every_row_has_every_column() {
        let mut a = primary("A");
        a.data_classification.insert("Internal", "Medium");
        let ds = assemble(&[a, primary("B")], MARKER);
        assert!(ds.rows.iter().all(|r| r.len() == ds.columns.len()));

        let dc = ds.columns.iter().position(|c| c == "DC-Internal").unwrap();
        for row in &ds.rows {
            let own: Vec<_> = row.iter().enumerate().filter(|(i, _)| *i != dc).collect();
            assert!(own.iter().all(|(_, c)| !c.is_empty()));
        }
    }

    #[test]
    fn json_objects_keyed_by_column() {
        let ds = assemble(&[primary("Ledger")], MARKER);
        let json = ds.to_json();
        assert_eq!(json[0]["Service Name"], "Ledger");
        assert_eq!(json[0][ORDINAL_COLUMN], "1");
    }

    #[test]
    fn empty_population() {
        let ds = assemble(&[], MARKER);
        assert!(ds.rows.is_empty());
        assert_eq!(ds.columns[0], ORDINAL_COLUMN);
    }
}
