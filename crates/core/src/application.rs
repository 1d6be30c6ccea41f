//! Submitted applications and their status lifecycle.
//!
//! Status is a closed enum with an explicit transition table; any change not
//! in the table is rejected with [`CoreError::Conflict`]. Applications are
//! created on submission and afterwards only change status, gain remarks, or
//! gain file attachments.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::services::ServiceType;
use crate::storage::application_file_path;
use crate::types::{ApplicationId, FormRecord, Timestamp, UserId};
use crate::validation::files::{validate_file_with, FileLimits, FileMeta};

/// Longest accepted remark (characters).
pub const MAX_REMARK_CHARS: usize = 1000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Completed,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        Self::Pending,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
    ];

    /// Parse a status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid application status '{s}'. \
                 Must be one of: pending, under_review, approved, rejected, completed"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
        }
    }

    /// Statuses reachable in one step.
    pub fn allowed_transitions(self) -> &'static [ApplicationStatus] {
        match self {
            Self::Pending => &[Self::UnderReview, Self::Approved, Self::Rejected],
            Self::UnderReview => &[Self::Approved, Self::Rejected, Self::Pending],
            Self::Approved => &[Self::Completed],
            Self::Rejected | Self::Completed => &[],
        }
    }

    pub fn can_transition_to(self, to: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a status change against the transition table.
pub fn validate_status_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let allowed: Vec<&str> = from.allowed_transitions().iter().map(|s| s.as_str()).collect();
    let allowed = if allowed.is_empty() {
        "none (terminal status)".to_string()
    } else {
        allowed.join(", ")
    };
    Err(CoreError::Conflict(format!(
        "Cannot change status from '{from}' to '{to}'. Allowed: {allowed}"
    )))
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// A free-text note on an application, optionally recording a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remark {
    pub author_id: UserId,
    pub author_role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_from: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_to: Option<ApplicationStatus>,
    pub created_at: Timestamp,
}

/// Metadata of a file uploaded to object storage for an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub file_id: String,
    #[serde(flatten)]
    pub meta: FileMeta,
    pub storage_path: String,
    pub attached_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub service_type: ServiceType,
    pub applicant_id: UserId,
    pub status: ApplicationStatus,
    pub form_data: FormRecord,
    pub remarks: Vec<Remark>,
    #[serde(default)]
    pub files: Vec<AttachedFile>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn clean_remark(text: &str) -> Result<String, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::Validation("Remark must not be empty".to_string()));
    }
    if text.chars().count() > MAX_REMARK_CHARS {
        return Err(CoreError::Validation(format!(
            "Remark must be at most {MAX_REMARK_CHARS} characters"
        )));
    }
    Ok(text.to_string())
}

impl Application {
    /// A freshly submitted application in `pending` status.
    pub fn new(
        service_type: ServiceType,
        applicant_id: impl Into<UserId>,
        form_data: FormRecord,
        now: Timestamp,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            service_type,
            applicant_id: applicant_id.into(),
            status: ApplicationStatus::Pending,
            form_data,
            remarks: Vec::new(),
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `actor` may read this application.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        actor.role.is_privileged() || actor.user_id == self.applicant_id
    }

    /// Move to `to`, recording a remark.
    ///
    /// The transition must be in the table and permitted for the actor's
    /// role. A rejection must carry a remark stating the reason.
    pub fn change_status(
        &mut self,
        to: ApplicationStatus,
        actor: &Actor,
        remark: Option<&str>,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        if !actor.role.is_privileged() {
            return Err(CoreError::Forbidden(
                "Only staff, officers and admins can change application status".to_string(),
            ));
        }
        validate_status_transition(self.status, to)?;
        if !actor.role.may_transition(self.status, to) {
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot change status from '{}' to '{to}'",
                actor.role.as_str(),
                self.status
            )));
        }

        let remark = remark.map(str::trim).filter(|r| !r.is_empty());
        let text = match remark {
            Some(r) => clean_remark(r)?,
            None if to == ApplicationStatus::Rejected => {
                return Err(CoreError::Validation(
                    "A rejection must include a remark stating the reason".to_string(),
                ));
            }
            None => format!("Status changed to {}", to.label()),
        };

        self.remarks.push(Remark {
            author_id: actor.user_id.clone(),
            author_role: actor.role,
            text,
            status_from: Some(self.status),
            status_to: Some(to),
            created_at: now,
        });
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    /// Append a remark without changing status. Privileged roles only.
    pub fn add_remark(
        &mut self,
        actor: &Actor,
        text: &str,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        if !actor.role.is_privileged() {
            return Err(CoreError::Forbidden(
                "Only staff, officers and admins can add remarks".to_string(),
            ));
        }
        let text = clean_remark(text)?;
        self.remarks.push(Remark {
            author_id: actor.user_id.clone(),
            author_role: actor.role,
            text,
            status_from: None,
            status_to: None,
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Metadata of the files already attached.
    pub fn file_metas(&self) -> Vec<FileMeta> {
        self.files.iter().map(|f| f.meta.clone()).collect()
    }

    /// Check a prospective upload and return the path it must be stored at.
    ///
    /// Only the applicant may upload, and not once the application reached a
    /// terminal status.
    pub fn plan_upload(
        &self,
        actor: &Actor,
        file_id: &str,
        file: &FileMeta,
        limits: &FileLimits,
    ) -> Result<String, CoreError> {
        if actor.user_id != self.applicant_id {
            return Err(CoreError::Forbidden(
                "Only the applicant can upload files".to_string(),
            ));
        }
        if self.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Files cannot be added to a {} application",
                self.status.label().to_lowercase()
            )));
        }
        let storage_path = application_file_path(&self.applicant_id, self.service_type, file_id);
        // Distinct ids can sanitize to the same object key.
        if self
            .files
            .iter()
            .any(|f| f.file_id == file_id || f.storage_path == storage_path)
        {
            return Err(CoreError::Conflict(format!(
                "File '{file_id}' is already attached"
            )));
        }
        if let Some(message) = validate_file_with(limits, file, &self.file_metas()) {
            return Err(CoreError::Validation(message));
        }
        Ok(storage_path)
    }

    /// Record a completed upload. Re-runs [`Application::plan_upload`].
    pub fn attach_file(
        &mut self,
        actor: &Actor,
        file_id: &str,
        file: FileMeta,
        limits: &FileLimits,
        now: Timestamp,
    ) -> Result<&AttachedFile, CoreError> {
        let storage_path = self.plan_upload(actor, file_id, &file, limits)?;
        self.files.push(AttachedFile {
            file_id: file_id.to_string(),
            meta: file,
            storage_path,
            attached_at: now,
        });
        self.updated_at = now;
        Ok(&self.files[self.files.len() - 1])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ApplicationStatus::*;

    fn now() -> Timestamp {
        chrono::Utc::now()
    }

    fn app() -> Application {
        Application::new(ServiceType::BirthCertificate, "citizen-1", FormRecord::new(), now())
    }

    fn officer() -> Actor {
        Actor::new("officer-1", Role::Officer)
    }

    #[test]
    fn status_parse_roundtrip() {
        for s in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(s.as_str()).unwrap(), s);
            assert_eq!(serde_json::to_value(s).unwrap(), serde_json::json!(s.as_str()));
        }
        assert!(ApplicationStatus::parse("archived").is_err());
    }

    #[test]
    fn transition_table() {
        assert!(Pending.can_transition_to(UnderReview));
        assert!(Pending.can_transition_to(Approved));
        assert!(UnderReview.can_transition_to(Pending));
        assert!(Approved.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(Rejected.is_terminal());
        assert!(Completed.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn invalid_transition_is_conflict() {
        assert_matches!(
            validate_status_transition(Completed, Pending),
            Err(CoreError::Conflict(msg)) if msg.contains("terminal")
        );
        assert_matches!(
            validate_status_transition(Pending, Completed),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn new_application_is_pending() {
        let a = app();
        assert_eq!(a.status, Pending);
        assert!(a.remarks.is_empty());
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn officer_moves_through_lifecycle() {
        let mut a = app();
        a.change_status(UnderReview, &officer(), None, now()).unwrap();
        a.change_status(Approved, &officer(), Some("Documents verified"), now()).unwrap();
        a.change_status(Completed, &officer(), None, now()).unwrap();
        assert_eq!(a.status, Completed);
        assert_eq!(a.remarks.len(), 3);
        assert_eq!(a.remarks[1].text, "Documents verified");
        assert_eq!(a.remarks[1].status_from, Some(UnderReview));
        assert_eq!(a.remarks[1].status_to, Some(Approved));
        assert_eq!(a.remarks[0].text, "Status changed to Under Review");
    }

    #[test]
    fn citizen_cannot_change_status() {
        let mut a = app();
        let citizen = Actor::new("citizen-1", Role::Citizen);
        assert_matches!(
            a.change_status(Approved, &citizen, None, now()),
            Err(CoreError::Forbidden(_))
        );
        assert_eq!(a.status, Pending);
    }

    #[test]
    fn staff_cannot_approve() {
        let mut a = app();
        let staff = Actor::new("staff-1", Role::Staff);
        a.change_status(UnderReview, &staff, None, now()).unwrap();
        assert_matches!(
            a.change_status(Approved, &staff, None, now()),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn rejection_requires_remark() {
        let mut a = app();
        assert_matches!(
            a.change_status(Rejected, &officer(), None, now()),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            a.change_status(Rejected, &officer(), Some("   "), now()),
            Err(CoreError::Validation(_))
        );
        a.change_status(Rejected, &officer(), Some("Hospital record missing"), now())
            .unwrap();
        assert_eq!(a.status, Rejected);
    }

    #[test]
    fn blank_remark_counts_as_none() {
        let mut a = app();
        a.change_status(UnderReview, &officer(), Some(""), now()).unwrap();
        assert_eq!(a.remarks[0].text, "Status changed to Under Review");

        assert_matches!(
            a.change_status(Rejected, &officer(), Some("  "), now()),
            Err(CoreError::Validation(msg)) if msg.contains("rejection")
        );
        assert_eq!(a.status, UnderReview);
    }

    #[test]
    fn terminal_status_is_final() {
        let mut a = app();
        a.change_status(Rejected, &officer(), Some("Duplicate"), now()).unwrap();
        assert_matches!(
            a.change_status(Pending, &officer(), None, now()),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn remarks_without_status_change() {
        let mut a = app();
        a.add_remark(&officer(), "  Called applicant  ", now()).unwrap();
        assert_eq!(a.remarks[0].text, "Called applicant");
        assert_eq!(a.remarks[0].status_to, None);
        assert_eq!(a.status, Pending);

        assert!(a.add_remark(&officer(), &"x".repeat(MAX_REMARK_CHARS + 1), now()).is_err());
        assert_matches!(
            a.add_remark(&Actor::new("citizen-1", Role::Citizen), "hi", now()),
            Err(CoreError::Forbidden(_))
        );
    }

    fn pdf(name: &str, size_bytes: u64) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes,
        }
    }

    #[test]
    fn applicant_attaches_files() {
        let mut a = app();
        let owner = Actor::new("citizen-1", Role::Citizen);
        let limits = FileLimits::default();

        let path = a.plan_upload(&owner, "f1", &pdf("proof.pdf", 1024), &limits).unwrap();
        assert_eq!(path, "applications/citizen-1/birth_certificate/f1");

        let attached = a
            .attach_file(&owner, "f1", pdf("proof.pdf", 1024), &limits, now())
            .unwrap();
        assert_eq!(attached.storage_path, path);
        assert_eq!(a.files.len(), 1);

        assert_matches!(
            a.attach_file(&owner, "f1", pdf("again.pdf", 10), &limits, now()),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn ids_sharing_a_storage_path_conflict() {
        let mut a = app();
        let owner = Actor::new("citizen-1", Role::Citizen);
        let limits = FileLimits::default();

        a.attach_file(&owner, "a;b", pdf("one.pdf", 10), &limits, now()).unwrap();
        assert_matches!(
            a.attach_file(&owner, "a:b", pdf("two.pdf", 10), &limits, now()),
            Err(CoreError::Conflict(_))
        );
        assert_eq!(a.files.len(), 1);
    }

    #[test]
    fn upload_limits_count_existing_files() {
        let mut a = app();
        let owner = Actor::new("citizen-1", Role::Citizen);
        let limits = FileLimits {
            max_file_count: 1,
            ..FileLimits::default()
        };
        a.attach_file(&owner, "f1", pdf("a.pdf", 10), &limits, now()).unwrap();
        assert_matches!(
            a.plan_upload(&owner, "f2", &pdf("b.pdf", 10), &limits),
            Err(CoreError::Validation(msg)) if msg == "A maximum of 1 files can be uploaded"
        );
    }

    #[test]
    fn only_applicant_uploads_before_terminal() {
        let mut a = app();
        let limits = FileLimits::default();
        assert_matches!(
            a.plan_upload(&officer(), "f1", &pdf("a.pdf", 10), &limits),
            Err(CoreError::Forbidden(_))
        );
        a.change_status(Rejected, &officer(), Some("Incomplete"), now()).unwrap();
        assert_matches!(
            a.plan_upload(&Actor::new("citizen-1", Role::Citizen), "f1", &pdf("a.pdf", 10), &limits),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn visibility() {
        let a = app();
        assert!(a.is_visible_to(&Actor::new("citizen-1", Role::Citizen)));
        assert!(!a.is_visible_to(&Actor::new("citizen-2", Role::Citizen)));
        assert!(a.is_visible_to(&Actor::new("staff-9", Role::Staff)));
    }
}
