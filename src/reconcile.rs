use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ReconcileError;
use crate::recert::{self, RecertPolicy, EPOCH_DUE_DATE};
use crate::record::{
    Classification, GovernanceRecord, RecordOrigin, ServiceStatusOverlay,
};

pub const NOT_APPLICABLE: &str = "NA";
pub const NO_FOUNDATIONAL_ADR: &str = "No f-adr";

/// What to do when several governance records share an overlay's service name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Update only the first record in scan order.
    #[default]
    FirstMatch,
    /// Update every record carrying the name.
    AllMatches,
    /// Refuse to reconcile ambiguous names.
    Reject,
}

/// Overlays by service name, in first-scan order. A later overlay for the
/// same name replaces the earlier one in place.
#[derive(Debug, Default)]
pub struct OverlayIndex {
    order: Vec<String>,
    by_name: HashMap<String, ServiceStatusOverlay>,
}

impl OverlayIndex {
    pub fn insert(&mut self, overlay: ServiceStatusOverlay) {
        let name = overlay.service_name.clone();
        if let Some(previous) = self.by_name.insert(name.clone(), overlay) {
            warn!(
                service = %name,
                replaced = %previous.source,
                "duplicate service-level ADR; keeping the later one"
            );
        } else {
            self.order.push(name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceStatusOverlay> {
        self.order.iter().filter_map(|name| self.by_name.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub matched: usize,
    pub synthesized: usize,
}

/// Write each overlay onto its governance record by exact service name, or
/// append a placeholder record when none exists.
pub fn reconcile(
    records: &mut Vec<GovernanceRecord>,
    overlays: &OverlayIndex,
    duplicates: DuplicatePolicy,
    policy: &RecertPolicy,
    today: NaiveDate,
) -> Result<ReconcileSummary, ReconcileError> {
    if duplicates == DuplicatePolicy::Reject {
        check_unambiguous(records, overlays)?;
    }

    let primary_len = records.len();
    let mut summary = ReconcileSummary::default();

    for overlay in overlays.iter() {
        let mut hits = records[..primary_len]
            .iter_mut()
            .filter(|r| r.service_name == overlay.service_name);

        let updated = match duplicates {
            DuplicatePolicy::FirstMatch | DuplicatePolicy::Reject => {
                hits.next().map(|r| r.apply_overlay(overlay)).is_some()
            }
            DuplicatePolicy::AllMatches => hits.fold(false, |_, r| {
                r.apply_overlay(overlay);
                true
            }),
        };

        if updated {
            debug!(service = %overlay.service_name, "overlay applied");
            summary.matched += 1;
        } else {
            debug!(service = %overlay.service_name, "no foundational ADR; synthesizing record");
            records.push(synthesize(overlay, policy, today));
            summary.synthesized += 1;
        }
    }

    Ok(summary)
}

fn check_unambiguous(
    records: &[GovernanceRecord],
    overlays: &OverlayIndex,
) -> Result<(), ReconcileError> {
    for overlay in overlays.iter() {
        let count = records
            .iter()
            .filter(|r| r.service_name == overlay.service_name)
            .count();
        if count > 1 {
            return Err(ReconcileError::DuplicateServiceName {
                name: overlay.service_name.clone(),
                count,
            });
        }
    }
    Ok(())
}

/// Placeholder record for a service that only has a service-level ADR.
pub fn synthesize(
    overlay: &ServiceStatusOverlay,
    policy: &RecertPolicy,
    today: NaiveDate,
) -> GovernanceRecord {
    GovernanceRecord {
        source: overlay.source.clone(),
        origin: RecordOrigin::OverlayOnly,
        service_name: overlay.service_name.clone(),
        service_owner: vec![NOT_APPLICABLE.to_string()],
        service_owner_id: vec![NOT_APPLICABLE.to_string()],
        service_status: overlay.service_status.clone(),
        adr_authors: vec![NOT_APPLICABLE.to_string()],
        adr_document_status: NO_FOUNDATIONAL_ADR.to_string(),
        latest_approval_date: EPOCH_DUE_DATE.to_string(),
        capability_mapping: Vec::new(),
        data_classification: Classification::default(),
        overlay_document_status: overlay.document_status.clone(),
        overlay_service_status: overlay.service_status.clone(),
        overlay_approval_date: overlay.approval_date.clone(),
        recertification: recert::calculate(&overlay.approval_date, policy, today),
    }
}
