use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::pagination::PageRequest;
use crate::search::Filter;

lazy_static! {
    // Portfolio links must be absolute http(s) URLs.
    static ref HTTP_URL_REGEX: regex::Regex = regex::Regex::new(r"^https?://\S+$").unwrap();
}

/// Review state of an application. Corresponds to the `application_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
    Hired,
}

string_enum!(ApplicationStatus, "application status", {
    Pending => "pending",
    Shortlisted => "shortlisted",
    Rejected => "rejected",
    Hired => "hired",
});

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }

    /// Transitions a project owner may apply. Staying put is always allowed.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Shortlisted) | (Pending, Rejected) | (Pending, Hired)
                | (Shortlisted, Hired) | (Shortlisted, Rejected)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioKind {
    Image,
    Video,
    Document,
}

/// A link attached to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PortfolioItem {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(regex(path = "HTTP_URL_REGEX", message = "Please enter a valid URL"))]
    pub url: String,
    #[serde(rename = "type")]
    pub kind: PortfolioKind,
}

/// A talent's request to fill one role of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub project_id: Uuid,
    pub role_id: String,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub portfolio: Vec<PortfolioItem>,
    pub proposed_rate: Option<f64>,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(input: ApplicationInput, applicant_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            role_id: input.role_id,
            applicant_id,
            status: ApplicationStatus::Pending,
            cover_letter: input.cover_letter,
            portfolio: input.portfolio,
            proposed_rate: input.proposed_rate,
            notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a status change made by `reviewer`.
    pub fn review(&mut self, status: ApplicationStatus, reviewer: Uuid) {
        let now = Utc::now();
        self.status = status;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
    }
}

/// Payload for `POST /api/applications`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub role_id: String,
    #[validate(length(max = 2000, message = "Cover letter cannot be more than 2000 characters"))]
    pub cover_letter: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub portfolio: Vec<PortfolioItem>,
    #[validate(range(min = 0.0, message = "Proposed rate cannot be negative"))]
    pub proposed_rate: Option<f64>,
}

/// Payload for `PUT /api/applications/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Criteria for application listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationQuery {
    pub status: Filter<ApplicationStatus>,
    pub project_id: Filter<Uuid>,
    pub applicant_id: Filter<Uuid>,
    pub page: PageRequest,
}

impl ApplicationQuery {
    pub fn matches(&self, application: &Application) -> bool {
        self.status.accepts(&application.status)
            && self.project_id.accepts(&application.project_id)
            && self.applicant_id.accepts(&application.applicant_id)
    }
}

/// Application counts per status, as shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: u64,
    pub pending: u64,
    pub shortlisted: u64,
    pub rejected: u64,
    pub hired: u64,
}

impl ApplicationStats {
    pub fn count(&mut self, status: ApplicationStatus, n: u64) {
        self.total += n;
        match status {
            ApplicationStatus::Pending => self.pending += n,
            ApplicationStatus::Shortlisted => self.shortlisted += n,
            ApplicationStatus::Rejected => self.rejected += n,
            ApplicationStatus::Hired => self.hired += n,
        }
    }
}
