//! Finalization readiness gate.
//!
//! Decides from the in-memory draft whether the finalize (trainer) or
//! approve (HR) action may be enabled, and which single message to show
//! when it may not. Rules are checked in a fixed order and the first
//! failure wins; the UI text depends on that order.
//!
//! This is a UX gate only. The API validates every submission again.

use std::fmt;

use super::aggregate::{SessionCollaborator, SessionState, TrainingSession};
use super::draft::FinalizationDraft;
use crate::shared::artifact::Artifact;

/// Which action the gate is guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewRole {
    /// Trainer closes the session and sends it to HR.
    TrainerFinalize,
    /// HR approves a session the trainer already finalized.
    HrApprove,
}

impl ReviewRole {
    pub fn accepts_state(&self, state: SessionState) -> bool {
        match self {
            ReviewRole::TrainerFinalize => state.is_trainer_editable(),
            ReviewRole::HrApprove => state.is_hr_reviewable(),
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            ReviewRole::TrainerFinalize => "Finalize",
            ReviewRole::HrApprove => "Approve",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockingReason {
    StateNotEditable,
    AttendanceNotMarked,
    AttendanceSheetMissing,
    GradesMissing,
    ExamFilesMissing,
    DiplomaFilesMissing,
}

impl BlockingReason {
    /// Evaluation order. Reordering changes which message users see.
    pub const ORDER: [BlockingReason; 6] = [
        BlockingReason::StateNotEditable,
        BlockingReason::AttendanceNotMarked,
        BlockingReason::AttendanceSheetMissing,
        BlockingReason::GradesMissing,
        BlockingReason::ExamFilesMissing,
        BlockingReason::DiplomaFilesMissing,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            BlockingReason::StateNotEditable => "session not in a state allowing finalization",
            BlockingReason::AttendanceNotMarked => "attendance not marked for all collaborators",
            BlockingReason::AttendanceSheetMissing => "attendance sheet file missing",
            BlockingReason::GradesMissing => "grades missing for some attendees",
            BlockingReason::ExamFilesMissing => "exam files missing",
            BlockingReason::DiplomaFilesMissing => "diploma files missing",
        }
    }

    fn is_violated<F>(&self, input: &GateInput<'_, F>) -> bool {
        let session = input.session;
        match self {
            BlockingReason::StateNotEditable => !input.role.accepts_state(session.state),
            BlockingReason::AttendanceNotMarked => input
                .roster
                .iter()
                .any(|m| !input.draft.attendance(m.id).is_marked()),
            BlockingReason::AttendanceSheetMissing => {
                !input.draft.attendance_sheet().is_present()
                    && !has_remote(&session.attendance_sheet_url)
            }
            BlockingReason::GradesMissing => {
                session.applies_exam
                    && input
                        .attendees()
                        .any(|m| input.draft.grade(m.id).is_none())
            }
            BlockingReason::ExamFilesMissing => {
                session.applies_exam
                    && input
                        .attendees()
                        .any(|m| !input.draft.has_exam(m.id) && !has_remote(&m.exam_url))
            }
            BlockingReason::DiplomaFilesMissing => {
                session.applies_diploma
                    && input
                        .attendees()
                        .any(|m| !input.draft.has_diploma(m.id) && !has_remote(&m.diploma_url))
            }
        }
    }
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub can_finalize: bool,
    pub blocking_reason: Option<BlockingReason>,
}

impl Readiness {
    pub fn message(&self) -> Option<&'static str> {
        self.blocking_reason.map(|r| r.message())
    }
}

struct GateInput<'a, F> {
    session: &'a TrainingSession,
    roster: &'a [SessionCollaborator],
    draft: &'a FinalizationDraft<F>,
    role: ReviewRole,
}

impl<'a, F> GateInput<'a, F> {
    /// Roster members whose attendance is strictly `true`
    fn attendees(&self) -> impl Iterator<Item = &'a SessionCollaborator> + '_ {
        let draft = self.draft;
        self.roster
            .iter()
            .filter(move |m| draft.attendance(m.id).is_attendee())
    }
}

fn has_remote(url: &Option<String>) -> bool {
    Artifact::<()>::from_remote(url.clone()).is_present()
}

/// First failing rule, or none when the action may proceed.
pub fn evaluate<F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
    role: ReviewRole,
) -> Readiness {
    let input = GateInput {
        session,
        roster,
        draft,
        role,
    };
    let blocking_reason = BlockingReason::ORDER
        .into_iter()
        .find(|rule| rule.is_violated(&input));
    Readiness {
        can_finalize: blocking_reason.is_none(),
        blocking_reason,
    }
}

/// Every failing rule, in evaluation order.
pub fn violations<F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
    role: ReviewRole,
) -> Vec<BlockingReason> {
    let input = GateInput {
        session,
        roster,
        draft,
        role,
    };
    BlockingReason::ORDER
        .into_iter()
        .filter(|rule| rule.is_violated(&input))
        .collect()
}

pub fn can_finalize<F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
    role: ReviewRole,
) -> bool {
    evaluate(session, roster, draft, role).can_finalize
}

pub fn blocking_reason<F>(
    session: &TrainingSession,
    roster: &[SessionCollaborator],
    draft: &FinalizationDraft<F>,
    role: ReviewRole,
) -> Option<BlockingReason> {
    evaluate(session, roster, draft, role).blocking_reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_training_session::aggregate::{CollaboratorId, SessionId};
    use crate::domain::a001_training_session::grading::Grade;
    use crate::shared::attendance::Attendance;

    type Draft = FinalizationDraft<&'static str>;

    fn session(state: SessionState, applies_exam: bool, applies_diploma: bool) -> TrainingSession {
        TrainingSession {
            id: SessionId(1),
            course_name: "Hazmat handling".into(),
            scheduled_date: None,
            trainer: None,
            state,
            applies_exam,
            applies_diploma,
            min_grade: Some(60),
            attendance_sheet_url: Some("https://files/sheet-1.pdf".into()),
            notes: None,
        }
    }

    fn roster(n: i64) -> Vec<SessionCollaborator> {
        (1..=n)
            .map(|i| SessionCollaborator {
                id: CollaboratorId(i),
                full_name: format!("Collaborator {i}"),
                department: Some("Operations".into()),
                attendance: None,
                grade: None,
                exam_url: None,
                diploma_url: None,
                notes: None,
            })
            .collect()
    }

    fn grade(v: &str) -> Option<Grade> {
        Some(Grade::parse(v).unwrap())
    }

    /// Draft where everyone is marked and every attendee has all documents.
    fn complete_draft(marks: &[bool]) -> Draft {
        let mut draft = Draft::new();
        for (i, present) in marks.iter().enumerate() {
            let id = CollaboratorId(i as i64 + 1);
            draft.set_attendance(id, Attendance::Marked(*present));
            if *present {
                draft.set_grade(id, grade("80"));
                draft.stage_exam(id, "exam.pdf");
                draft.stage_diploma(id, "diploma.pdf");
            }
        }
        draft
    }

    fn check(s: &TrainingSession, r: &[SessionCollaborator], d: &Draft) -> Readiness {
        evaluate(s, r, d, ReviewRole::TrainerFinalize)
    }

    // ------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------

    #[test]
    fn test_s1_marked_roster_without_requirements_is_ready() {
        let s = session(SessionState::InProgress, false, false);
        let r = roster(3);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        d.set_attendance(CollaboratorId(2), Attendance::PRESENT);
        d.set_attendance(CollaboratorId(3), Attendance::ABSENT);

        let readiness = check(&s, &r, &d);
        assert!(readiness.can_finalize);
        assert_eq!(readiness.blocking_reason, None);
    }

    #[test]
    fn test_s2_unset_attendance_blocks() {
        let s = session(SessionState::InProgress, false, false);
        let r = roster(3);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        d.set_attendance(CollaboratorId(2), Attendance::PRESENT);

        let readiness = check(&s, &r, &d);
        assert!(!readiness.can_finalize);
        assert_eq!(readiness.blocking_reason, Some(BlockingReason::AttendanceNotMarked));
        assert!(readiness.message().unwrap().contains("attendance"));
    }

    #[test]
    fn test_s3_grade_below_minimum_does_not_block() {
        let s = session(SessionState::InProgress, true, false);
        let r = roster(1);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        d.set_grade(CollaboratorId(1), grade("55"));
        d.stage_exam(CollaboratorId(1), "exam.pdf");

        assert!(check(&s, &r, &d).can_finalize);
    }

    #[test]
    fn test_s4_missing_grade_blocks() {
        let s = session(SessionState::InProgress, true, false);
        let r = roster(2);
        let mut d = complete_draft(&[true, true]);
        d.set_grade(CollaboratorId(2), None);

        let readiness = check(&s, &r, &d);
        assert!(!readiness.can_finalize);
        assert_eq!(readiness.blocking_reason, Some(BlockingReason::GradesMissing));
        assert!(readiness.message().unwrap().contains("grades"));
    }

    #[test]
    fn test_s5_one_missing_diploma_blocks() {
        let s = session(SessionState::InProgress, false, true);
        let r = roster(3);
        let mut d = complete_draft(&[true, true, true]);
        d.unstage_diploma(&r[1]);

        let readiness = check(&s, &r, &d);
        assert!(!readiness.can_finalize);
        assert_eq!(readiness.blocking_reason, Some(BlockingReason::DiplomaFilesMissing));
        assert!(readiness.message().unwrap().contains("diploma"));
    }

    #[test]
    fn test_s6_finalized_session_is_never_ready() {
        let s = session(SessionState::Finalized, true, true);
        let r = roster(2);
        let d = complete_draft(&[true, false]);

        let readiness = check(&s, &r, &d);
        assert!(!readiness.can_finalize);
        assert_eq!(readiness.blocking_reason, Some(BlockingReason::StateNotEditable));
    }

    // ------------------------------------------------------------------
    // Ordering and sources of presence
    // ------------------------------------------------------------------

    #[test]
    fn test_first_failure_wins_and_report_lists_all() {
        let mut s = session(SessionState::Created, true, true);
        s.attendance_sheet_url = None;
        let r = roster(2);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);

        assert_eq!(
            check(&s, &r, &d).blocking_reason,
            Some(BlockingReason::StateNotEditable)
        );
        assert_eq!(
            violations(&s, &r, &d, ReviewRole::TrainerFinalize),
            BlockingReason::ORDER.to_vec()
        );
    }

    #[test]
    fn test_grades_are_reported_before_exam_files() {
        let s = session(SessionState::InProgress, true, false);
        let r = roster(1);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        assert_eq!(check(&s, &r, &d).blocking_reason, Some(BlockingReason::GradesMissing));

        d.set_grade(CollaboratorId(1), grade("90"));
        assert_eq!(check(&s, &r, &d).blocking_reason, Some(BlockingReason::ExamFilesMissing));
    }

    #[test]
    fn test_missing_sheet_blocks_before_documents() {
        let mut s = session(SessionState::Rejected, true, true);
        s.attendance_sheet_url = None;
        let r = roster(1);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        assert_eq!(
            check(&s, &r, &d).blocking_reason,
            Some(BlockingReason::AttendanceSheetMissing)
        );

        d.stage_attendance_sheet("sheet.pdf");
        assert_eq!(check(&s, &r, &d).blocking_reason, Some(BlockingReason::GradesMissing));
    }

    #[test]
    fn test_remote_files_on_record_count_as_present() {
        let mut s = session(SessionState::InProgress, true, true);
        let mut r = roster(1);
        r[0].exam_url = Some("https://files/exam.pdf".into());
        r[0].diploma_url = Some("https://files/diploma.pdf".into());
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        d.set_grade(CollaboratorId(1), grade("70"));
        assert!(check(&s, &r, &d).can_finalize);

        s.attendance_sheet_url = Some("   ".into());
        assert_eq!(
            check(&s, &r, &d).blocking_reason,
            Some(BlockingReason::AttendanceSheetMissing)
        );
    }

    #[test]
    fn test_empty_roster_only_needs_state_and_sheet() {
        let s = session(SessionState::InProgress, true, true);
        assert!(check(&s, &[], &Draft::new()).can_finalize);
    }

    #[test]
    fn test_hr_role_accepts_review_states_only() {
        let r = roster(1);
        let d = complete_draft(&[true]);
        for state in SessionState::ALL {
            let s = session(state, true, true);
            let hr = evaluate(&s, &r, &d, ReviewRole::HrApprove);
            assert_eq!(
                hr.can_finalize,
                matches!(state, SessionState::FinalizedByTrainer | SessionState::InReview),
                "{state:?}"
            );
        }
    }

    #[test]
    fn test_hr_role_shares_document_rules() {
        let s = session(SessionState::InReview, true, false);
        let r = roster(1);
        let mut d = Draft::new();
        d.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        assert_eq!(
            blocking_reason(&s, &r, &d, ReviewRole::HrApprove),
            Some(BlockingReason::GradesMissing)
        );
    }

    // ------------------------------------------------------------------
    // Properties, checked exhaustively over small rosters
    // ------------------------------------------------------------------

    const ATTENDANCE_VALUES: [Attendance; 3] =
        [Attendance::Unset, Attendance::PRESENT, Attendance::ABSENT];

    /// Per-collaborator slice of draft state: attendance, grade?, exam?, diploma?
    type Cell = (Attendance, bool, bool, bool);

    fn all_cells() -> Vec<Cell> {
        let mut cells = Vec::new();
        for a in ATTENDANCE_VALUES {
            for g in [false, true] {
                for e in [false, true] {
                    for dip in [false, true] {
                        cells.push((a, g, e, dip));
                    }
                }
            }
        }
        cells
    }

    /// Every draft for a two-person roster.
    fn all_drafts() -> Vec<(Vec<Cell>, Draft)> {
        let cells = all_cells();
        let mut out = Vec::new();
        for first in &cells {
            for second in &cells {
                let pair = vec![*first, *second];
                out.push((pair.clone(), build_draft(&pair)));
            }
        }
        out
    }

    fn build_draft(cells: &[Cell]) -> Draft {
        let mut d = Draft::new();
        for (i, (a, g, e, dip)) in cells.iter().enumerate() {
            let id = CollaboratorId(i as i64 + 1);
            d.set_attendance(id, *a);
            if *g {
                d.set_grade(id, grade("42"));
            }
            if *e {
                d.stage_exam(id, "exam.pdf");
            }
            if *dip {
                d.stage_diploma(id, "diploma.pdf");
            }
        }
        d
    }

    fn all_sessions() -> Vec<TrainingSession> {
        let mut out = Vec::new();
        for state in SessionState::ALL {
            for exam in [false, true] {
                for diploma in [false, true] {
                    for sheet in [false, true] {
                        let mut s = session(state, exam, diploma);
                        if !sheet {
                            s.attendance_sheet_url = None;
                        }
                        out.push(s);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_property_non_editable_states_never_finalize() {
        let r = roster(2);
        let drafts = all_drafts();
        for s in all_sessions().iter().filter(|s| !s.state.is_trainer_editable()) {
            for (_, d) in &drafts {
                assert!(!check(s, &r, d).can_finalize);
            }
        }
    }

    #[test]
    fn test_property_unset_attendance_never_finalizes() {
        let r = roster(2);
        for s in all_sessions() {
            for (cells, d) in all_drafts() {
                if cells.iter().any(|c| c.0 == Attendance::Unset) {
                    assert!(!check(&s, &r, &d).can_finalize);
                }
            }
        }
    }

    #[test]
    fn test_property_requirements_off_ignore_documents() {
        let r = roster(2);
        for s in all_sessions() {
            for (cells, d) in all_drafts() {
                let expected = check(&s, &r, &d).can_finalize;

                // Strip whatever the disabled requirements would look at.
                let stripped: Vec<Cell> = cells
                    .iter()
                    .map(|(a, g, e, dip)| {
                        (
                            *a,
                            *g && s.applies_exam,
                            *e && s.applies_exam,
                            *dip && s.applies_diploma,
                        )
                    })
                    .collect();
                let filled: Vec<Cell> = cells
                    .iter()
                    .map(|(a, g, e, dip)| {
                        (
                            *a,
                            *g || !s.applies_exam,
                            *e || !s.applies_exam,
                            *dip || !s.applies_diploma,
                        )
                    })
                    .collect();
                assert_eq!(check(&s, &r, &build_draft(&stripped)).can_finalize, expected);
                assert_eq!(check(&s, &r, &build_draft(&filled)).can_finalize, expected);
            }
        }
    }

    #[test]
    fn test_property_absentees_never_block_on_documents() {
        let r = roster(2);
        for s in all_sessions() {
            for (cells, d) in all_drafts() {
                let without_absentee_docs: Vec<Cell> = cells
                    .iter()
                    .map(|c| if c.0.is_absentee() { (c.0, false, false, false) } else { *c })
                    .collect();
                assert_eq!(
                    check(&s, &r, &build_draft(&without_absentee_docs)).can_finalize,
                    check(&s, &r, &d).can_finalize
                );
            }
        }
    }

    #[test]
    fn test_property_evaluation_is_idempotent_and_matches_report() {
        let r = roster(2);
        for s in all_sessions() {
            for (_, d) in all_drafts() {
                let first = check(&s, &r, &d);
                let second = check(&s, &r, &d);
                assert_eq!(first, second);

                let report = violations(&s, &r, &d, ReviewRole::TrainerFinalize);
                assert_eq!(report.is_empty(), first.can_finalize);
                assert_eq!(report.first().copied(), first.blocking_reason);
                assert_eq!(
                    can_finalize(&s, &r, &d, ReviewRole::TrainerFinalize),
                    first.can_finalize
                );
            }
        }
    }
}
