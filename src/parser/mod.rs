pub mod comments;
pub mod extract;
pub mod sections;
pub mod tables;

use chrono::NaiveDate;
use serde::Serialize;

use crate::recert::{self, RecertPolicy};
use crate::record::{GovernanceRecord, RecordOrigin, ServiceStatusOverlay};
use crate::source::{DocumentKind, RawDocument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedDocument {
    Governance(GovernanceRecord),
    Overlay(ServiceStatusOverlay),
}

/// Pipeline: strip comments → extract sections → typed record with recertification.
pub fn parse_document(doc: &RawDocument, policy: &RecertPolicy, today: NaiveDate) -> ParsedDocument {
    let text = comments::strip_comments(&doc.text);
    match doc.kind {
        DocumentKind::Foundational | DocumentKind::Deprecated => {
            ParsedDocument::Governance(build_record(doc, &text, policy, today))
        }
        DocumentKind::Service => ParsedDocument::Overlay(build_overlay(doc, &text)),
    }
}

fn build_record(
    doc: &RawDocument,
    text: &str,
    policy: &RecertPolicy,
    today: NaiveDate,
) -> GovernanceRecord {
    let fields = extract::extract_primary(text);
    let recertification = recert::calculate(&fields.approval_date, policy, today);
    let mut record = GovernanceRecord {
        source: doc.source.clone(),
        origin: RecordOrigin::Primary(doc.kind),
        service_name: fields.title,
        service_owner: Vec::with_capacity(fields.owners.len()),
        service_owner_id: Vec::with_capacity(fields.owners.len()),
        service_status: fields.service_status,
        adr_authors: fields.authors,
        adr_document_status: fields.document_status,
        latest_approval_date: recertification.basis_date.clone(),
        capability_mapping: fields.capability,
        data_classification: fields.classification,
        overlay_document_status: String::new(),
        overlay_service_status: String::new(),
        overlay_approval_date: String::new(),
        recertification,
    };
    for (name, id) in &fields.owners {
        record.push_owner(name, id);
    }
    record
}

fn build_overlay(doc: &RawDocument, text: &str) -> ServiceStatusOverlay {
    let fields = extract::extract_overlay(text);
    ServiceStatusOverlay {
        source: doc.source.clone(),
        service_name: fields.title,
        document_status: fields.document_status,
        service_status: fields.service_status,
        approval_date: fields.approval_date,
    }
}

// ── Tests ──
