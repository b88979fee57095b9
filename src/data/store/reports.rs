//! Incident report operations

use std::sync::Arc;

use super::{EntityStore, prepended, record_mutation, replaced, required};
use crate::data::models::{EntityId, IncidentKind, NotificationSeverity, Report, ReportStatus};
use crate::error::{AppError, Result};

/// Report as filled in by a resident, before the store assigns
/// id, status and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub kind: IncidentKind,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub ai_analysis: Option<String>,
}

impl ReportDraft {
    pub fn new(kind: IncidentKind, description: &str, location: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            location: location.to_string(),
            image_url: None,
            ai_analysis: None,
        }
    }

    /// Reject drafts with blank required fields
    pub fn validate(&self) -> Result<()> {
        required("description", &self.description)?;
        required("location", &self.location)?;
        Ok(())
    }
}

/// Report history filter; `None` matches everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub kind: Option<IncidentKind>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.status.is_none_or(|status| report.status == status)
            && self.kind.is_none_or(|kind| report.kind == kind)
    }
}

impl EntityStore {
    pub fn report(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Reports passing `filter`, in collection order
    pub fn reports_matching(&self, filter: &ReportFilter) -> Vec<&Report> {
        self.reports.iter().filter(|r| filter.matches(r)).collect()
    }

    /// File a new report
    ///
    /// The report starts `pending`, is stamped with the current time and the
    /// current user's display name, and goes to the front of the collection.
    ///
    /// # Errors
    /// - `Unauthorized` if nobody is logged in
    /// - `Validation` if description or location is blank
    pub fn submit_report(&mut self, draft: ReportDraft) -> Result<Report> {
        let reporter_name = self.require_user()?.name.clone();
        draft.validate()?;

        let report = Report {
            id: EntityId::new().0,
            kind: draft.kind,
            description: draft.description.trim().to_string(),
            location: draft.location.trim().to_string(),
            status: ReportStatus::Pending,
            created_at: chrono::Utc::now(),
            reporter_name,
            image_url: draft.image_url,
            ai_analysis: draft.ai_analysis,
        };

        self.reports = prepended(&self.reports, report.clone());
        record_mutation("submit_report");
        tracing::info!(
            report_id = %report.id,
            kind = %report.kind,
            has_advice = report.ai_analysis.is_some(),
            "Report submitted"
        );

        self.notifier.emit(
            "Report sent",
            "Your report was delivered to the patrol officers.",
            NotificationSeverity::Success,
        );

        Ok(report)
    }

    /// Advance a report's status (admin only)
    ///
    /// Only the status field changes; the report keeps its position.
    ///
    /// # Errors
    /// - `Unauthorized` / `Forbidden` unless an admin is logged in
    /// - `NotFound` if no report has this id
    /// - `InvalidTransition` unless `status` is the next step forward
    pub fn update_report_status(&mut self, id: &str, status: ReportStatus) -> Result<Report> {
        self.require_admin()?;

        let index = self
            .reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound.recorded())?;

        let current = &self.reports[index];
        if !current.status.can_transition_to(status) {
            tracing::warn!(
                report_id = %id,
                from = %current.status,
                to = %status,
                "Report status transition refused"
            );
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: status,
            }
            .recorded());
        }

        let updated = Report {
            status,
            ..current.clone()
        };
        self.reports = replaced(&self.reports, index, updated.clone());
        record_mutation("update_report_status");
        tracing::info!(report_id = %id, %status, "Report status updated");

        self.notifier.emit(
            "Status updated",
            &format!("Report status changed to {}.", status),
            NotificationSeverity::Info,
        );

        Ok(updated)
    }

    /// Whether the report snapshot `since` is still current
    pub fn reports_unchanged_since(&self, since: &Arc<Vec<Report>>) -> bool {
        Arc::ptr_eq(&self.reports, since)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn draft(description: &str) -> ReportDraft {
        ReportDraft::new(IncidentKind::Theft, description, "Jl. Merpati No. 4")
    }

    #[test]
    fn submit_prepends_newest_first() {
        let mut store = store_as(resident());

        let a = store.submit_report(draft("Bicycle taken from porch")).unwrap();
        let b = store.submit_report(draft("Motorbike helmet missing")).unwrap();

        let reports = store.reports();
        assert_eq!(reports[0].id, b.id);
        assert_eq!(reports[1].id, a.id);
        assert_eq!(reports[0].status, ReportStatus::Pending);
        assert_eq!(reports[0].reporter_name, "Ibu Siti (Warga)");
    }

    #[test]
    fn submit_requires_login() {
        let mut store = demo_store();
        let err = store.submit_report(draft("Anything")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert_eq!(store.reports().len(), 2);
    }

    #[test]
    fn blank_description_changes_nothing() {
        let mut store = store_as(resident());
        let reports_before = store.reports();
        let log_before = store.notifications().len();

        let err = store.submit_report(draft("   ")).unwrap_err();

        assert!(matches!(err, AppError::Validation(message) if message.contains("description")));
        assert!(store.reports_unchanged_since(&reports_before));
        assert_eq!(store.notifications().len(), log_before);
    }

    #[test]
    fn update_status_keeps_position_and_other_fields() {
        let mut store = store_as(admin());
        let before = store.report("2").unwrap().clone();

        let updated = store
            .update_report_status("2", ReportStatus::Processed)
            .unwrap();

        assert_eq!(updated.status, ReportStatus::Processed);
        assert_eq!(store.reports()[1].id, "2");
        assert_eq!(
            Report {
                status: before.status,
                ..updated
            },
            before
        );
        let log = store.notifications();
        assert_eq!(log[0].severity, NotificationSeverity::Info);
        assert!(log[0].message.contains("processed"));
    }

    #[test]
    fn update_status_refuses_backward_and_skipping_moves() {
        let mut store = store_as(admin());

        let err = store
            .update_report_status("2", ReportStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: ReportStatus::Pending,
                to: ReportStatus::Completed
            }
        ));

        store
            .update_report_status("1", ReportStatus::Completed)
            .unwrap();
        for status in [ReportStatus::Pending, ReportStatus::Processed] {
            assert!(store.update_report_status("1", status).is_err());
        }
        assert_eq!(store.report("1").unwrap().status, ReportStatus::Completed);
    }

    #[test]
    fn update_status_is_admin_only() {
        let mut store = store_as(resident());
        let err = store
            .update_report_status("2", ReportStatus::Processed)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(store.report("2").unwrap().status, ReportStatus::Pending);
    }

    #[test]
    fn update_unknown_report_is_not_found_and_silent() {
        let mut store = store_as(admin());
        let log_before = store.notifications().len();

        let err = store
            .update_report_status("missing", ReportStatus::Processed)
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        assert_eq!(store.notifications().len(), log_before);
    }

    #[test]
    fn filter_by_status_and_kind() {
        let store = demo_store();

        let pending = store.reports_matching(&ReportFilter {
            status: Some(ReportStatus::Pending),
            kind: None,
        });
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "2");

        let suspicious_pending = store.reports_matching(&ReportFilter {
            status: Some(ReportStatus::Pending),
            kind: Some(IncidentKind::Suspicious),
        });
        assert!(suspicious_pending.is_empty());

        assert_eq!(store.reports_matching(&ReportFilter::default()).len(), 2);

        let by_kind: usize = IncidentKind::ALL
            .into_iter()
            .map(|kind| {
                store
                    .reports_matching(&ReportFilter {
                        status: None,
                        kind: Some(kind),
                    })
                    .len()
            })
            .sum();
        assert_eq!(by_kind, store.reports().len());
    }

    #[test]
    fn report_mutations_swap_the_snapshot() {
        let cases: [(&str, fn(&mut EntityStore)); 2] = [
            ("submit_report", |store| {
                store.submit_report(draft("Ladder taken from yard")).unwrap();
            }),
            ("update_report_status", |store| {
                store
                    .update_report_status("2", ReportStatus::Processed)
                    .unwrap();
            }),
        ];

        for (operation, apply) in cases {
            let mut store = store_as(admin());
            let before = store.reports();
            let contents = before.as_ref().clone();

            apply(&mut store);

            let after = store.reports();
            assert!(!Arc::ptr_eq(&before, &after), "{operation}");
            assert!(!store.reports_unchanged_since(&before), "{operation}");
            assert_eq!(*before, contents, "{operation}");
            assert_ne!(*after, contents, "{operation}");
        }
    }

    #[test]
    fn old_snapshot_keeps_previous_status() {
        let mut store = store_as(admin());
        let before = store.reports();

        store
            .update_report_status("2", ReportStatus::Processed)
            .unwrap();

        assert_eq!(before[1].status, ReportStatus::Pending);
        assert_eq!(store.reports()[1].status, ReportStatus::Processed);
    }
}
