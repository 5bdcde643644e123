//! Grade input validation and the pass/fail outcome shown next to each
//! attendee. The outcome never gates finalization; only the presence of a
//! grade does.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aggregate::{SessionCollaborator, TrainingSession};
use super::draft::FinalizationDraft;
use crate::shared::attendance::Attendance;

pub const MAX_GRADE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("grade is required")]
    Empty,
    #[error("grade must be a whole number")]
    NotNumeric,
    #[error("grade must be between 0 and 100")]
    OutOfRange,
}

/// Оценка 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    /// Parse what the user typed into the grade cell.
    pub fn parse(input: &str) -> Result<Self, GradeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GradeError::Empty);
        }
        let value: i64 = trimmed.parse().map_err(|_| GradeError::NotNumeric)?;
        if !(0..=i64::from(MAX_GRADE)).contains(&value) {
            return Err(GradeError::OutOfRange);
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = GradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_GRADE {
            return Err(GradeError::OutOfRange);
        }
        Ok(Self(value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeOutcome {
    /// Attendance not recorded or recorded as absent
    Absent,
    NotGraded,
    Passed,
    Failed,
}

impl GradeOutcome {
    pub fn evaluate(attendance: Attendance, grade: Option<Grade>, min_grade: u8) -> Self {
        if !attendance.is_attendee() {
            return GradeOutcome::Absent;
        }
        match grade {
            None => GradeOutcome::NotGraded,
            Some(g) if g.value() >= min_grade => GradeOutcome::Passed,
            Some(_) => GradeOutcome::Failed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeOutcome::Absent => "—",
            GradeOutcome::NotGraded => "Not graded",
            GradeOutcome::Passed => "Passed",
            GradeOutcome::Failed => "Failed",
        }
    }
}

/// Counters for the summary strip above the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub total: usize,
    pub attendees: usize,
    pub absentees: usize,
    pub unmarked: usize,
    pub passed: usize,
    pub failed: usize,
}

impl SessionStats {
    pub fn collect<F>(
        session: &TrainingSession,
        roster: &[SessionCollaborator],
        draft: &FinalizationDraft<F>,
    ) -> Self {
        let min_grade = session.effective_min_grade();
        let mut stats = Self {
            total: roster.len(),
            ..Self::default()
        };
        for member in roster {
            let attendance = draft.attendance(member.id);
            match attendance {
                Attendance::Unset => stats.unmarked += 1,
                Attendance::Marked(true) => stats.attendees += 1,
                Attendance::Marked(false) => stats.absentees += 1,
            }
            if session.applies_exam {
                match GradeOutcome::evaluate(attendance, draft.grade(member.id), min_grade) {
                    GradeOutcome::Passed => stats.passed += 1,
                    GradeOutcome::Failed => stats.failed += 1,
                    _ => {}
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_training_session::aggregate::{
        CollaboratorId, SessionId, SessionState,
    };

    #[test]
    fn test_parse_accepts_bounds_and_whitespace() {
        assert_eq!(Grade::parse("0").unwrap().value(), 0);
        assert_eq!(Grade::parse(" 100 ").unwrap().value(), 100);
        assert_eq!(Grade::parse("59").unwrap().value(), 59);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Grade::parse(""), Err(GradeError::Empty));
        assert_eq!(Grade::parse("  "), Err(GradeError::Empty));
        assert_eq!(Grade::parse("abc"), Err(GradeError::NotNumeric));
        assert_eq!(Grade::parse("7.5"), Err(GradeError::NotNumeric));
        assert_eq!(Grade::parse("101"), Err(GradeError::OutOfRange));
        assert_eq!(Grade::parse("-1"), Err(GradeError::OutOfRange));
        assert_eq!(Grade::parse("99999999999"), Err(GradeError::OutOfRange));
    }

    #[test]
    fn test_grade_wire_format_is_validated() {
        let grade: Grade = serde_json::from_str("88").unwrap();
        assert_eq!(grade.value(), 88);
        assert!(serde_json::from_str::<Grade>("101").is_err());
        assert_eq!(serde_json::to_string(&grade).unwrap(), "88");
    }

    #[test]
    fn test_outcome_uses_minimum_grade() {
        let g55 = Grade::parse("55").ok();
        let g60 = Grade::parse("60").ok();
        assert_eq!(GradeOutcome::evaluate(Attendance::PRESENT, g55, 60), GradeOutcome::Failed);
        assert_eq!(GradeOutcome::evaluate(Attendance::PRESENT, g60, 60), GradeOutcome::Passed);
        assert_eq!(GradeOutcome::evaluate(Attendance::PRESENT, None, 60), GradeOutcome::NotGraded);
    }

    #[test]
    fn test_outcome_ignores_grade_of_non_attendees() {
        let g90 = Grade::parse("90").ok();
        assert_eq!(GradeOutcome::evaluate(Attendance::ABSENT, g90, 60), GradeOutcome::Absent);
        assert_eq!(GradeOutcome::evaluate(Attendance::Unset, g90, 60), GradeOutcome::Absent);
    }

    #[test]
    fn test_stats_count_roster() {
        let session = TrainingSession {
            id: SessionId(1),
            course_name: "Welding".into(),
            scheduled_date: None,
            trainer: None,
            state: SessionState::InProgress,
            applies_exam: true,
            applies_diploma: false,
            min_grade: Some(70),
            attendance_sheet_url: None,
            notes: None,
        };
        let roster: Vec<SessionCollaborator> = (1..=4)
            .map(|i| SessionCollaborator {
                id: CollaboratorId(i),
                full_name: format!("C{i}"),
                department: None,
                attendance: None,
                grade: None,
                exam_url: None,
                diploma_url: None,
                notes: None,
            })
            .collect();
        let mut draft: FinalizationDraft<()> = FinalizationDraft::new();
        draft.set_attendance(CollaboratorId(1), Attendance::PRESENT);
        draft.set_grade(CollaboratorId(1), Grade::parse("90").ok());
        draft.set_attendance(CollaboratorId(2), Attendance::PRESENT);
        draft.set_grade(CollaboratorId(2), Grade::parse("50").ok());
        draft.set_attendance(CollaboratorId(3), Attendance::ABSENT);
        draft.set_grade(CollaboratorId(3), Grade::parse("100").ok());

        let stats = SessionStats::collect(&session, &roster, &draft);
        assert_eq!(
            stats,
            SessionStats {
                total: 4,
                attendees: 2,
                absentees: 1,
                unmarked: 1,
                passed: 1,
                failed: 1,
            }
        );
    }
}
