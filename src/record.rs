use chrono::NaiveDate;
use serde::Serialize;

use crate::source::DocumentKind;

/// Prefix carried by every classification label.
pub const CLASSIFICATION_PREFIX: &str = "DC-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Primary(DocumentKind),
    OverlayOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityRow {
    pub level0: String,
    pub level1: String,
    pub level2: String,
}

/// Label → risk rating, in first-seen order with unique labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification(Vec<(String, String)>);

impl Serialize for Classification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl Classification {
    /// Insert `DC-<label>`; a repeated label keeps its slot and takes the new rating.
    pub fn insert(&mut self, label: &str, rating: &str) {
        let key = format!("{}{}", CLASSIFICATION_PREFIX, label);
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = rating.to_string(),
            None => self.0.push((key, rating.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recertification {
    /// Date the deadline was computed from: canonical `DD-MM-YYYY`, or
    /// `00-00-0000` when unknown.
    pub basis_date: String,
    pub due_date: NaiveDate,
    pub due_month: String,
    pub upcoming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceRecord {
    pub source: String,
    pub origin: RecordOrigin,
    pub service_name: String,
    pub service_owner: Vec<String>,
    pub service_owner_id: Vec<String>,
    pub service_status: String,
    pub adr_authors: Vec<String>,
    pub adr_document_status: String,
    pub latest_approval_date: String,
    pub capability_mapping: Vec<CapabilityRow>,
    pub data_classification: Classification,
    pub overlay_document_status: String,
    pub overlay_service_status: String,
    pub overlay_approval_date: String,
    pub recertification: Recertification,
}

impl GovernanceRecord {
    /// Owners and ids are only ever pushed together.
    pub fn push_owner(&mut self, name: &str, id: &str) {
        self.service_owner.push(name.to_string());
        self.service_owner_id.push(id.to_string());
    }

    pub fn apply_overlay(&mut self, overlay: &ServiceStatusOverlay) {
        self.overlay_document_status = overlay.document_status.clone();
        self.overlay_service_status = overlay.service_status.clone();
        self.overlay_approval_date = overlay.approval_date.clone();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatusOverlay {
    pub source: String,
    pub service_name: String,
    pub document_status: String,
    pub service_status: String,
    pub approval_date: String,
}
