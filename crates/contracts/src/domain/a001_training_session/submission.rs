//! Finalize and review submissions, built as plain data.
//!
//! The browser layer only maps `FormField`s onto a `FormData`; field naming,
//! payload shape and the readiness gate live here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aggregate::{CollaboratorId, SessionCollaborator, TrainingSession};
use super::draft::FinalizationDraft;
use super::readiness::{self, BlockingReason, ReviewRole};
use crate::system::auth::CurrentUser;

pub const FIELD_TRAINER_ID: &str = "trainer_id";
pub const FIELD_SAVE_DRAFT: &str = "save_draft";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_COLLABORATORS: &str = "collaborators";
pub const FIELD_ATTENDANCE_SHEET: &str = "attendance_sheet";
pub const EXAM_FIELD_PREFIX: &str = "examen_";
pub const DIPLOMA_FIELD_PREFIX: &str = "diploma_";

pub fn exam_field(id: CollaboratorId) -> String {
    format!("{EXAM_FIELD_PREFIX}{id}")
}

pub fn diploma_field(id: CollaboratorId) -> String {
    format!("{DIPLOMA_FIELD_PREFIX}{id}")
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("cannot submit: {0}")]
    NotReady(BlockingReason),

    #[error("a rejection needs a reason")]
    MissingRejectReason,

    #[error("failed to serialize roster: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Store progress without leaving IN_PROGRESS / REJECTED
    SaveDraft,
    /// Hand the session over to HR
    Finalize,
}

impl SubmitMode {
    pub fn is_draft(&self) -> bool {
        matches!(self, SubmitMode::SaveDraft)
    }
}

/// One roster line inside the `collaborators` JSON field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntryPayload {
    pub attendance: Option<bool>,
    pub grade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue<'a, F> {
    Text(String),
    File(&'a F),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<'a, F> {
    pub name: String,
    pub value: FormValue<'a, F>,
}

impl<'a, F> FormField<'a, F> {
    fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    fn file(name: impl Into<String>, file: &'a F) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(file),
        }
    }
}

/// Ordered multipart fields: text fields first, then files.
#[derive(Debug, Clone)]
pub struct Submission<'a, F> {
    pub mode: SubmitMode,
    pub fields: Vec<FormField<'a, F>>,
}

impl<'a, F> Submission<'a, F> {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FormValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &'a F)> + '_ {
        self.fields.iter().filter_map(|f| match f.value {
            FormValue::File(file) => Some((f.name.as_str(), file)),
            FormValue::Text(_) => None,
        })
    }
}

/// Roster JSON keyed by numeric collaborator id.
///
/// Grades of anyone who is not an attendee are dropped.
pub fn roster_payload<F>(
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
) -> BTreeMap<CollaboratorId, RosterEntryPayload> {
    roster
        .iter()
        .map(|member| {
            let attendance = draft.attendance(member.id);
            let grade = if attendance.is_attendee() {
                draft.grade(member.id).map(u8::from)
            } else {
                None
            };
            let entry = RosterEntryPayload {
                attendance: attendance.as_option(),
                grade,
                notes: draft.collaborator_notes(member.id).map(str::to_string),
            };
            (member.id, entry)
        })
        .collect()
}

/// Build the multipart body for `POST /api/training-sessions/{id}/finalize`.
///
/// `Finalize` runs the trainer readiness gate first; `SaveDraft` does not.
/// Only newly staged files are attached; files already on the server are
/// referenced by the server itself.
pub fn build_submission<'a, F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &'a FinalizationDraft<F>,
    trainer: &CurrentUser,
    mode: SubmitMode,
) -> Result<Submission<'a, F>, SubmissionError> {
    if mode == SubmitMode::Finalize {
        if let Some(reason) =
            readiness::blocking_reason(session, roster, draft, ReviewRole::TrainerFinalize)
        {
            return Err(SubmissionError::NotReady(reason));
        }
    }

    let collaborators = serde_json::to_string(&roster_payload(roster, draft))?;

    let mut fields = vec![
        FormField::text(FIELD_TRAINER_ID, trainer.id.to_string()),
        FormField::text(FIELD_SAVE_DRAFT, mode.is_draft().to_string()),
        FormField::text(FIELD_NOTES, draft.notes().trim()),
        FormField::text(FIELD_COLLABORATORS, collaborators),
    ];

    if let Some(sheet) = draft.attendance_sheet().staged() {
        fields.push(FormField::file(FIELD_ATTENDANCE_SHEET, sheet));
    }
    for member in roster {
        if let Some(file) = draft.exam(member.id).and_then(|a| a.staged()) {
            fields.push(FormField::file(exam_field(member.id), file));
        }
        if let Some(file) = draft.diploma(member.id).and_then(|a| a.staged()) {
            fields.push(FormField::file(diploma_field(member.id), file));
        }
    }

    Ok(Submission { mode, fields })
}

// ============================================================================
// HR review
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

impl ReviewDecision {
    pub fn reject(reason: &str) -> Result<Self, SubmissionError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SubmissionError::MissingRejectReason);
        }
        Ok(ReviewDecision::Reject {
            reason: reason.to_string(),
        })
    }
}

/// Body of `POST /api/training-sessions/{id}/review`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub reviewer_id: i64,
    #[serde(flatten)]
    pub decision: ReviewDecision,
}

/// Approval goes through the HR readiness gate; rejection only needs the
/// session to be under review.
pub fn build_review<F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
    reviewer: &CurrentUser,
    decision: ReviewDecision,
) -> Result<ReviewRequest, SubmissionError> {
    match decision {
        ReviewDecision::Approve => {
            if let Some(reason) =
                readiness::blocking_reason(session, roster, draft, ReviewRole::HrApprove)
            {
                return Err(SubmissionError::NotReady(reason));
            }
        }
        ReviewDecision::Reject { .. } => {
            if !ReviewRole::HrApprove.accepts_state(session.state) {
                return Err(SubmissionError::NotReady(BlockingReason::StateNotEditable));
            }
        }
    }
    Ok(ReviewRequest {
        reviewer_id: reviewer.id,
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_training_session::aggregate::{SessionId, SessionState};
    use crate::domain::a001_training_session::grading::Grade;
    use crate::shared::attendance::Attendance;
    use crate::system::auth::UserRole;

    fn trainer() -> CurrentUser {
        CurrentUser {
            id: 77,
            display_name: "Trainer".into(),
            role: UserRole::Trainer,
        }
    }

    fn hr() -> CurrentUser {
        CurrentUser {
            id: 5,
            display_name: "HR".into(),
            role: UserRole::Hr,
        }
    }

    fn session(state: SessionState) -> TrainingSession {
        TrainingSession {
            id: SessionId(9),
            course_name: "Ergonomics".into(),
            scheduled_date: None,
            trainer: None,
            state,
            applies_exam: true,
            applies_diploma: false,
            min_grade: None,
            attendance_sheet_url: None,
            notes: None,
        }
    }

    fn member(id: i64, exam_url: Option<&str>) -> SessionCollaborator {
        SessionCollaborator {
            id: CollaboratorId(id),
            full_name: format!("C{id}"),
            department: None,
            attendance: None,
            grade: None,
            exam_url: exam_url.map(Into::into),
            diploma_url: None,
            notes: None,
        }
    }

    fn ready_draft() -> (Vec<SessionCollaborator>, FinalizationDraft<&'static str>) {
        let roster = vec![member(1, None), member(2, Some("https://files/e2.pdf")), member(3, None)];
        let mut draft = FinalizationDraft::new();
        draft.stage_attendance_sheet("sheet.pdf");
        draft.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        draft.set_grade(CollaboratorId(1), Grade::parse("75").ok());
        draft.stage_exam(CollaboratorId(1), "exam-1.pdf");
        draft.set_attendance(CollaboratorId(2), Attendance::PRESENT);
        draft.set_grade(CollaboratorId(2), Grade::parse("40").ok());
        draft.set_attendance(CollaboratorId(3), Attendance::ABSENT);
        draft.set_grade(CollaboratorId(3), Grade::parse("99").ok());
        draft.set_collaborator_notes(CollaboratorId(3), "sick leave".into());
        draft.set_notes("  all good ".into());
        (roster, draft)
    }

    #[test]
    fn test_finalize_builds_fields_in_order() {
        let (roster, draft) = ready_draft();
        let submission = build_submission(
            &session(SessionState::InProgress),
            &roster,
            &draft,
            &trainer(),
            SubmitMode::Finalize,
        )
        .unwrap();

        let names: Vec<&str> = submission.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "trainer_id",
                "save_draft",
                "notes",
                "collaborators",
                "attendance_sheet",
                "examen_1"
            ]
        );
        assert_eq!(submission.text(FIELD_TRAINER_ID), Some("77"));
        assert_eq!(submission.text(FIELD_SAVE_DRAFT), Some("false"));
        assert_eq!(submission.text(FIELD_NOTES), Some("all good"));

        let files: Vec<_> = submission.files().collect();
        assert_eq!(files, vec![("attendance_sheet", &"sheet.pdf"), ("examen_1", &"exam-1.pdf")]);
    }

    #[test]
    fn test_roster_json_uses_numeric_keys_and_drops_absentee_grades() {
        let (roster, draft) = ready_draft();
        let submission = build_submission(
            &session(SessionState::InProgress),
            &roster,
            &draft,
            &trainer(),
            SubmitMode::Finalize,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(submission.text(FIELD_COLLABORATORS).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "1": { "attendance": true, "grade": 75 },
                "2": { "attendance": true, "grade": 40 },
                "3": { "attendance": false, "grade": null, "notes": "sick leave" }
            })
        );
    }

    #[test]
    fn test_finalize_refuses_blocked_draft() {
        let (roster, mut draft) = ready_draft();
        draft.set_attendance(CollaboratorId(3), Attendance::Unset);
        let err = build_submission(
            &session(SessionState::InProgress),
            &roster,
            &draft,
            &trainer(),
            SubmitMode::Finalize,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::NotReady(BlockingReason::AttendanceNotMarked)
        ));
        assert_eq!(
            err.to_string(),
            "cannot submit: attendance not marked for all collaborators"
        );
    }

    #[test]
    fn test_save_draft_skips_gate_and_sends_null_attendance() {
        let (roster, mut draft) = ready_draft();
        draft.set_attendance(CollaboratorId(3), Attendance::Unset);
        let submission = build_submission(
            &session(SessionState::InProgress),
            &roster,
            &draft,
            &trainer(),
            SubmitMode::SaveDraft,
        )
        .unwrap();
        assert_eq!(submission.text(FIELD_SAVE_DRAFT), Some("true"));

        let json: serde_json::Value =
            serde_json::from_str(submission.text(FIELD_COLLABORATORS).unwrap()).unwrap();
        assert_eq!(json["3"]["attendance"], serde_json::Value::Null);
    }

    #[test]
    fn test_diploma_field_naming() {
        assert_eq!(diploma_field(CollaboratorId(42)), "diploma_42");
        assert_eq!(exam_field(CollaboratorId(42)), "examen_42");
    }

    #[test]
    fn test_approve_uses_hr_gate() {
        let (roster, draft) = ready_draft();
        let err = build_review(
            &session(SessionState::InProgress),
            &roster,
            &draft,
            &hr(),
            ReviewDecision::Approve,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::NotReady(BlockingReason::StateNotEditable)
        ));

        let request = build_review(
            &session(SessionState::InReview),
            &roster,
            &draft,
            &hr(),
            ReviewDecision::Approve,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "reviewerId": 5, "decision": "approve" })
        );
    }

    #[test]
    fn test_reject_needs_reason_and_review_state() {
        assert!(matches!(
            ReviewDecision::reject("   "),
            Err(SubmissionError::MissingRejectReason)
        ));

        let (roster, draft) = ready_draft();
        let decision = ReviewDecision::reject(" exam scans unreadable ").unwrap();
        let request = build_review(
            &session(SessionState::FinalizedByTrainer),
            &roster,
            &draft,
            &hr(),
            decision.clone(),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "reviewerId": 5,
                "decision": "reject",
                "reason": "exam scans unreadable"
            })
        );

        assert!(build_review(
            &session(SessionState::Finalized),
            &roster,
            &draft,
            &hr(),
            decision,
        )
        .is_err());
    }
}
