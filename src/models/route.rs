//! Tricycle route model and approval workflow
//!
//! A route carries two lifecycle fields: the operational `status` and the
//! staff-side `submission_status`. Both are only ever changed through
//! [`WorkflowEvent::transition`], which keeps them consistent: a route is
//! never `Active` unless its submission is `Approved`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RouteStatus {
    #[serde(rename = "Under Review")]
    #[sqlx(rename = "Under Review")]
    UnderReview,
    Active,
    Suspended,
    Inactive,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::UnderReview => "Under Review",
            RouteStatus::Active => "Active",
            RouteStatus::Suspended => "Suspended",
            RouteStatus::Inactive => "Inactive",
        }
    }

    /// Staff may not edit a route that is live or suspended.
    pub fn is_locked_for_staff(&self) -> bool {
        matches!(self, RouteStatus::Active | RouteStatus::Suspended)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Under Review" => Ok(RouteStatus::UnderReview),
            "Active" => Ok(RouteStatus::Active),
            "Suspended" => Ok(RouteStatus::Suspended),
            "Inactive" => Ok(RouteStatus::Inactive),
            other => Err(format!("Unknown route status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    #[serde(rename = "Returned for Revision")]
    #[sqlx(rename = "Returned for Revision")]
    ReturnedForRevision,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "Draft",
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
            SubmissionStatus::ReturnedForRevision => "Returned for Revision",
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Draft
                | SubmissionStatus::ReturnedForRevision
                | SubmissionStatus::Rejected
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Draft" => Ok(SubmissionStatus::Draft),
            "Submitted" => Ok(SubmissionStatus::Submitted),
            "Approved" => Ok(SubmissionStatus::Approved),
            "Rejected" => Ok(SubmissionStatus::Rejected),
            "Returned for Revision" => Ok(SubmissionStatus::ReturnedForRevision),
            other => Err(format!("Unknown submission status '{}'", other)),
        }
    }
}

/// Label written to the approval log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum LogAction {
    Created,
    Submitted,
    Approved,
    Rejected,
    Suspended,
    Reactivated,
    #[serde(rename = "Returned for Revision")]
    #[sqlx(rename = "Returned for Revision")]
    ReturnedForRevision,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Created => "Created",
            LogAction::Submitted => "Submitted",
            LogAction::Approved => "Approved",
            LogAction::Rejected => "Rejected",
            LogAction::Suspended => "Suspended",
            LogAction::Reactivated => "Reactivated",
            LogAction::ReturnedForRevision => "Returned for Revision",
        }
    }

    /// Remark stored when the caller gives none.
    pub fn default_remarks(&self) -> &'static str {
        match self {
            LogAction::Created => "Route created and awaiting review",
            LogAction::Submitted => "Route submitted for approval",
            LogAction::Approved => "Route approved by administrator",
            LogAction::Rejected => "Route rejected by administrator",
            LogAction::Suspended => "Route suspended by administrator",
            LogAction::Reactivated => "Route reactivated by administrator",
            LogAction::ReturnedForRevision => "Route returned to staff for revision",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrator actions on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    Approve,
    Reject,
    Suspend,
    Activate,
}

impl RouteAction {
    pub fn success_message(&self) -> &'static str {
        match self {
            RouteAction::Approve => "Route approved successfully",
            RouteAction::Reject => "Route rejected successfully",
            RouteAction::Suspend => "Route suspended successfully",
            RouteAction::Activate => "Route activated successfully",
        }
    }
}

/// Every event that may move a route through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Submit,
    Approve,
    Reject,
    Suspend,
    Activate,
    ReturnForRevision,
}

impl From<RouteAction> for WorkflowEvent {
    fn from(action: RouteAction) -> Self {
        match action {
            RouteAction::Approve => WorkflowEvent::Approve,
            RouteAction::Reject => WorkflowEvent::Reject,
            RouteAction::Suspend => WorkflowEvent::Suspend,
            RouteAction::Activate => WorkflowEvent::Activate,
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::Approve => "approve",
            WorkflowEvent::Reject => "reject",
            WorkflowEvent::Suspend => "suspend",
            WorkflowEvent::Activate => "activate",
            WorkflowEvent::ReturnForRevision => "return for revision",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: RouteStatus,
    pub submission_status: SubmissionStatus,
    pub log_action: LogAction,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot {event} a route that is {status} (submission {submission_status})")]
    NotAllowed {
        event: WorkflowEvent,
        status: RouteStatus,
        submission_status: SubmissionStatus,
    },
}

impl WorkflowEvent {
    /// Resolve the state a route moves to, or refuse the event.
    ///
    /// Repeating an event on a route already in its target state is accepted
    /// so the end state stays idempotent; the caller still logs it.
    pub fn transition(
        self,
        status: RouteStatus,
        submission_status: SubmissionStatus,
    ) -> Result<Transition, TransitionError> {
        use RouteStatus as R;
        use SubmissionStatus as S;

        let next = match self {
            WorkflowEvent::Submit if submission_status.can_submit() => {
                Some((R::UnderReview, S::Submitted, LogAction::Submitted))
            }
            WorkflowEvent::Approve if matches!(status, R::UnderReview | R::Active) => {
                Some((R::Active, S::Approved, LogAction::Approved))
            }
            WorkflowEvent::Reject if matches!(status, R::UnderReview | R::Inactive) => {
                Some((R::Inactive, S::Rejected, LogAction::Rejected))
            }
            WorkflowEvent::Suspend if matches!(status, R::Active | R::Suspended) => {
                Some((R::Suspended, submission_status, LogAction::Suspended))
            }
            WorkflowEvent::Activate
                if matches!(status, R::Suspended | R::Active) && submission_status == S::Approved =>
            {
                Some((R::Active, S::Approved, LogAction::Reactivated))
            }
            WorkflowEvent::ReturnForRevision
                if status == R::UnderReview && submission_status == S::Submitted =>
            {
                Some((R::UnderReview, S::ReturnedForRevision, LogAction::ReturnedForRevision))
            }
            _ => None,
        };

        next.map(|(status, submission_status, log_action)| Transition {
            status,
            submission_status,
            log_action,
        })
        .ok_or(TransitionError::NotAllowed {
            event: self,
            status,
            submission_status,
        })
    }
}

/// Route row joined with the display names of its barangay, creator and
/// approver.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub route_code: String,
    pub route_name: String,
    pub description: Option<String>,
    pub start_point: String,
    pub end_point: String,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub distance_km: f64,
    pub estimated_minutes: Option<i64>,
    pub regular_fare: f64,
    pub special_fare: Option<f64>,
    pub operating_start: String,
    pub operating_end: String,
    pub status: RouteStatus,
    pub submission_status: SubmissionStatus,
    pub created_by: i64,
    pub created_by_name: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_by_name: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    /// Generated when omitted or blank.
    pub route_code: Option<String>,

    #[validate(length(min = 1, max = 150, message = "Route name is required"))]
    pub route_name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Start point is required"))]
    pub start_point: String,

    #[validate(length(min = 1, max = 200, message = "End point is required"))]
    pub end_point: String,

    /// Staff default to their own barangay.
    pub barangay_id: Option<i64>,

    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    pub distance_km: f64,

    #[validate(range(min = 0, message = "Estimated time cannot be negative"))]
    pub estimated_minutes: Option<i64>,

    #[validate(range(min = 0.0, message = "Fare cannot be negative"))]
    pub regular_fare: f64,

    #[validate(range(min = 0.0, message = "Fare cannot be negative"))]
    pub special_fare: Option<f64>,

    pub operating_start: String,
    pub operating_end: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 150))]
    pub route_name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub start_point: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub end_point: Option<String>,

    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    pub distance_km: Option<f64>,

    #[validate(range(min = 0, message = "Estimated time cannot be negative"))]
    pub estimated_minutes: Option<i64>,

    #[validate(range(min = 0.0, message = "Fare cannot be negative"))]
    pub regular_fare: Option<f64>,

    #[validate(range(min = 0.0, message = "Fare cannot be negative"))]
    pub special_fare: Option<f64>,

    pub operating_start: Option<String>,
    pub operating_end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteActionRequest {
    pub action: RouteAction,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRouteRequest {
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use RouteStatus as R;
    use SubmissionStatus as S;

    #[test]
    fn test_approve_is_idempotent() {
        let first = WorkflowEvent::Approve.transition(R::UnderReview, S::Submitted).unwrap();
        assert_eq!(first.status, R::Active);
        assert_eq!(first.submission_status, S::Approved);

        let second = WorkflowEvent::Approve
            .transition(first.status, first.submission_status)
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(second.log_action, LogAction::Approved);
    }

    #[test]
    fn test_cannot_suspend_route_under_review() {
        let err = WorkflowEvent::Suspend
            .transition(R::UnderReview, S::Draft)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot suspend a route that is Under Review (submission Draft)"
        );
    }

    #[test]
    fn test_suspend_keeps_submission_status() {
        let t = WorkflowEvent::Suspend.transition(R::Active, S::Approved).unwrap();
        assert_eq!(t.status, R::Suspended);
        assert_eq!(t.submission_status, S::Approved);
        assert_eq!(t.log_action, LogAction::Suspended);
    }

    #[test]
    fn test_activate_requires_approved_submission() {
        let t = WorkflowEvent::Activate.transition(R::Suspended, S::Approved).unwrap();
        assert_eq!(t.status, R::Active);
        assert_eq!(t.log_action, LogAction::Reactivated);

        assert!(WorkflowEvent::Activate.transition(R::Inactive, S::Rejected).is_err());
        assert!(WorkflowEvent::Activate.transition(R::UnderReview, S::Submitted).is_err());
    }

    #[test]
    fn test_reject_then_resubmit() {
        let rejected = WorkflowEvent::Reject.transition(R::UnderReview, S::Submitted).unwrap();
        assert_eq!(rejected.status, R::Inactive);
        assert_eq!(rejected.submission_status, S::Rejected);

        let resubmitted = WorkflowEvent::Submit
            .transition(rejected.status, rejected.submission_status)
            .unwrap();
        assert_eq!(resubmitted.status, R::UnderReview);
        assert_eq!(resubmitted.submission_status, S::Submitted);
    }

    #[test]
    fn test_cannot_resubmit_pending_or_approved() {
        assert!(WorkflowEvent::Submit.transition(R::UnderReview, S::Submitted).is_err());
        assert!(WorkflowEvent::Submit.transition(R::Active, S::Approved).is_err());
    }

    #[test]
    fn test_return_for_revision_only_from_pending_review() {
        let t = WorkflowEvent::ReturnForRevision
            .transition(R::UnderReview, S::Submitted)
            .unwrap();
        assert_eq!(t.status, R::UnderReview);
        assert_eq!(t.submission_status, S::ReturnedForRevision);

        assert!(WorkflowEvent::ReturnForRevision
            .transition(R::UnderReview, S::Draft)
            .is_err());
    }

    #[test]
    fn test_active_always_means_approved() {
        let statuses = [R::UnderReview, R::Active, R::Suspended, R::Inactive];
        let submissions = [
            S::Draft,
            S::Submitted,
            S::Approved,
            S::Rejected,
            S::ReturnedForRevision,
        ];
        let events = [
            WorkflowEvent::Submit,
            WorkflowEvent::Approve,
            WorkflowEvent::Reject,
            WorkflowEvent::Suspend,
            WorkflowEvent::Activate,
            WorkflowEvent::ReturnForRevision,
        ];

        for status in statuses {
            for submission in submissions {
                for event in events {
                    if let Ok(t) = event.transition(status, submission) {
                        if t.status == R::Active {
                            assert_eq!(t.submission_status, S::Approved, "{event} from {status}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Under Review".parse::<RouteStatus>().unwrap(), R::UnderReview);
        assert_eq!(
            "Returned for Revision".parse::<SubmissionStatus>().unwrap(),
            S::ReturnedForRevision
        );
        assert!("Pending".parse::<RouteStatus>().is_err());
    }

    #[test]
    fn test_route_action_deserializes_lowercase() {
        let request: RouteActionRequest =
            serde_json::from_str(r#"{"action": "suspend"}"#).unwrap();
        assert_eq!(request.action, RouteAction::Suspend);
        assert_eq!(WorkflowEvent::from(request.action), WorkflowEvent::Suspend);
    }
}
