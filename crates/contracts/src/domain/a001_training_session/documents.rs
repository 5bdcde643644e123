//! Payloads for the PDF generation endpoints. The console never renders
//! documents itself; it posts one of these and opens the returned file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregate::{SessionCollaborator, TrainingSession};
use super::draft::FinalizationDraft;
use crate::domain::common::AggregateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    AttendanceSheet,
    Exam,
}

impl DocumentKind {
    /// Path segment under `/api/documents/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            DocumentKind::AttendanceSheet => "attendance-sheet",
            DocumentKind::Exam => "exam",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::AttendanceSheet => "Attendance sheet",
            DocumentKind::Exam => "Exam",
        }
    }

    pub fn file_name(&self, session: &TrainingSession) -> String {
        let prefix = match self {
            DocumentKind::AttendanceSheet => "attendance_sheet",
            DocumentKind::Exam => "exam",
        };
        format!("{}_session_{}.pdf", prefix, session.id.as_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub full_name: String,
    pub department: String,
    pub attendance: Option<bool>,
    pub grade: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub session_id: i64,
    pub course_name: String,
    pub scheduled_date: Option<NaiveDate>,
    pub trainer_name: Option<String>,
    pub min_grade: u8,
    pub rows: Vec<DocumentRow>,
}

impl DocumentRequest {
    /// Rows follow roster order. The exam document lists attendees only.
    pub fn build<F>(
        kind: DocumentKind,
        session: &TrainingSession,
        roster: &[SessionCollaborator],
        draft: &FinalizationDraft<F>,
    ) -> Self {
        let rows = roster
            .iter()
            .filter(|m| kind != DocumentKind::Exam || draft.attendance(m.id).is_attendee())
            .map(|m| {
                let attendance = draft.attendance(m.id);
                DocumentRow {
                    full_name: m.full_name.clone(),
                    department: m.department.clone().unwrap_or_default(),
                    attendance: attendance.as_option(),
                    grade: if attendance.is_attendee() {
                        draft.grade(m.id).map(u8::from)
                    } else {
                        None
                    },
                }
            })
            .collect();

        Self {
            kind,
            session_id: session.id.value(),
            course_name: session.course_name.clone(),
            scheduled_date: session.scheduled_date,
            trainer_name: session.trainer.as_ref().map(|t| t.full_name.clone()),
            min_grade: session.effective_min_grade(),
            rows,
        }
    }
}
