pub mod capability;
pub mod classification;
pub mod people;
pub mod status;

use super::sections::front_matter_title;
use crate::record::{CapabilityRow, Classification};
use status::{
    section_table, table_value, APPROVAL_DATE_COLUMN, DOCUMENT_STATUS_COLUMN,
    SERVICE_STATUS_COLUMN,
};

/// Headings searched in foundational and deprecated ADRs.
pub struct PrimaryHeadings {
    pub owners: &'static str,
    pub authors: &'static str,
    pub service_status: &'static str,
    pub document_status: &'static str,
    pub capability: &'static str,
    pub classification: &'static str,
}

pub const PRIMARY_HEADINGS: PrimaryHeadings = PrimaryHeadings {
    owners: "Document Owner",
    authors: "Author/Contributors",
    service_status: "Service Status",
    document_status: "Document Status",
    capability: "Capability Mapping Hierarchy",
    classification: "Data Classification",
};

/// Service-level ADRs carry a single status table.
pub const SERVICE_DOCUMENT_STATUS_HEADING: &str = "Document Status";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryFields {
    pub title: String,
    pub owners: Vec<(String, String)>,
    pub authors: Vec<String>,
    pub service_status: String,
    pub document_status: String,
    pub approval_date: String,
    pub capability: Vec<CapabilityRow>,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayFields {
    pub title: String,
    pub document_status: String,
    pub service_status: String,
    pub approval_date: String,
}

/// Every section is optional; a miss leaves the field at its zero value.
pub fn extract_primary(text: &str) -> PrimaryFields {
    let h = &PRIMARY_HEADINGS;
    let service_table = section_table(text, h.service_status);
    let document_table = section_table(text, h.document_status);

    PrimaryFields {
        title: front_matter_title(text),
        owners: people::owners(text, h.owners),
        authors: people::authors(text, h.authors),
        service_status: table_value(service_table.as_ref(), SERVICE_STATUS_COLUMN),
        document_status: table_value(document_table.as_ref(), DOCUMENT_STATUS_COLUMN),
        approval_date: table_value(document_table.as_ref(), APPROVAL_DATE_COLUMN),
        capability: capability::extract(text, h.capability),
        classification: classification::extract(text, h.classification),
    }
}

pub fn extract_overlay(text: &str) -> OverlayFields {
    let table = section_table(text, SERVICE_DOCUMENT_STATUS_HEADING);
    OverlayFields {
        title: front_matter_title(text),
        document_status: table_value(table.as_ref(), DOCUMENT_STATUS_COLUMN),
        service_status: table_value(table.as_ref(), SERVICE_STATUS_COLUMN),
        approval_date: table_value(table.as_ref(), APPROVAL_DATE_COLUMN),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.md", name)).unwrap()
    }

    #[test]
    fn payments_gateway_fields() {
        let md = crate::parser::comments::strip_comments(&fixture("payments-gateway")).into_owned();
        let f = extract_primary(&md);
        assert_eq!(f.title, "Payments Gateway");
        assert_eq!(
            f.owners,
            vec![
                ("Priya Raman".to_string(), "praman".to_string()),
                ("Tom O'Neill".to_string(), "toneill".to_string()),
            ]
        );
        assert_eq!(f.authors, vec!["Priya Raman", "Lee Chen"]);
        assert_eq!(f.service_status, "Live");
        assert_eq!(f.document_status, "Approved");
        assert_eq!(f.approval_date, "15-05-2022");
        assert_eq!(f.capability.len(), 2);
        assert_eq!(f.capability[1].level2, "Refunds");
        assert_eq!(
            f.classification.keys().collect::<Vec<_>>(),
            vec!["DC-Confidential", "DC-Internal"]
        );
    }

    #[test]
    fn overlay_fields() {
        let f = extract_overlay(&fixture("s-adr-payments-gateway"));
        assert_eq!(f.title, "Payments Gateway");
        assert_eq!(f.document_status, "Approved");
        assert_eq!(f.service_status, "Live");
        assert_eq!(f.approval_date, "01-02-2023");
    }

    #[test]
    fn overlay_ignores_primary_sections() {
        let f = extract_overlay(&fixture("payments-gateway"));
        assert_eq!(f.title, "Payments Gateway");
        assert_eq!(f.service_status, "");
    }

    #[test]
    fn empty_document_zero_values() {
        assert_eq!(extract_primary(""), PrimaryFields::default());
        assert_eq!(extract_overlay("no structure at all"), OverlayFields::default());
    }
}
