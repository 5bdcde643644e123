use std::collections::HashMap;

use super::aggregate::{CollaboratorId, SessionCollaborator, SessionDetail, TrainingSession};
use super::grading::Grade;
use crate::shared::artifact::Artifact;
use crate::shared::attendance::Attendance;

/// Локальные правки тренера до отправки на сервер.
///
/// `F` - тип дескриптора файла (в браузере `web_sys::File`).
/// Отсутствующий ключ читается как `Unset` / нет оценки / `Empty`.
#[derive(Debug, Clone)]
pub struct FinalizationDraft<F> {
    attendance: HashMap<CollaboratorId, Attendance>,
    grades: HashMap<CollaboratorId, Grade>,
    exams: HashMap<CollaboratorId, Artifact<F>>,
    diplomas: HashMap<CollaboratorId, Artifact<F>>,
    collaborator_notes: HashMap<CollaboratorId, String>,
    attendance_sheet: Artifact<F>,
    notes: String,
}

impl<F> Default for FinalizationDraft<F> {
    fn default() -> Self {
        Self {
            attendance: HashMap::new(),
            grades: HashMap::new(),
            exams: HashMap::new(),
            diplomas: HashMap::new(),
            collaborator_notes: HashMap::new(),
            attendance_sheet: Artifact::Empty,
            notes: String::new(),
        }
    }
}

impl<F> FinalizationDraft<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начальное состояние формы из ответа сервера
    pub fn from_detail(detail: &SessionDetail) -> Self {
        let mut draft = Self::new();
        draft.attendance_sheet = Artifact::from_remote(detail.session.attendance_sheet_url.clone());
        draft.notes = detail.session.notes.clone().unwrap_or_default();

        for member in &detail.roster {
            draft
                .attendance
                .insert(member.id, Attendance::from(member.attendance));
            if let Some(raw) = member.grade {
                match Grade::try_from(raw) {
                    Ok(grade) => {
                        draft.grades.insert(member.id, grade);
                    }
                    Err(e) => {
                        log::warn!("Ignoring stored grade of collaborator {}: {}", member.id, e)
                    }
                }
            }
            draft
                .exams
                .insert(member.id, Artifact::from_remote(member.exam_url.clone()));
            draft
                .diplomas
                .insert(member.id, Artifact::from_remote(member.diploma_url.clone()));
            if let Some(notes) = member.notes.clone().filter(|n| !n.is_empty()) {
                draft.collaborator_notes.insert(member.id, notes);
            }
        }
        draft
    }

    // ------------------------------------------------------------------
    // Чтение
    // ------------------------------------------------------------------

    pub fn attendance(&self, id: CollaboratorId) -> Attendance {
        self.attendance.get(&id).copied().unwrap_or_default()
    }

    pub fn grade(&self, id: CollaboratorId) -> Option<Grade> {
        self.grades.get(&id).copied()
    }

    pub fn exam(&self, id: CollaboratorId) -> Option<&Artifact<F>> {
        self.exams.get(&id)
    }

    pub fn diploma(&self, id: CollaboratorId) -> Option<&Artifact<F>> {
        self.diplomas.get(&id)
    }

    pub fn has_exam(&self, id: CollaboratorId) -> bool {
        self.exam(id).is_some_and(Artifact::is_present)
    }

    pub fn has_diploma(&self, id: CollaboratorId) -> bool {
        self.diploma(id).is_some_and(Artifact::is_present)
    }

    pub fn attendance_sheet(&self) -> &Artifact<F> {
        &self.attendance_sheet
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn collaborator_notes(&self, id: CollaboratorId) -> Option<&str> {
        self.collaborator_notes.get(&id).map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Изменение
    // ------------------------------------------------------------------

    pub fn set_attendance(&mut self, id: CollaboratorId, value: Attendance) {
        self.attendance.insert(id, value);
    }

    pub fn set_grade(&mut self, id: CollaboratorId, grade: Option<Grade>) {
        match grade {
            Some(grade) => {
                self.grades.insert(id, grade);
            }
            None => {
                self.grades.remove(&id);
            }
        }
    }

    pub fn stage_exam(&mut self, id: CollaboratorId, file: F) {
        self.exams.insert(id, Artifact::Staged(file));
    }

    pub fn stage_diploma(&mut self, id: CollaboratorId, file: F) {
        self.diplomas.insert(id, Artifact::Staged(file));
    }

    pub fn stage_attendance_sheet(&mut self, file: F) {
        self.attendance_sheet = Artifact::Staged(file);
    }

    /// Отменить выбранный файл экзамена; остаётся ранее загруженный, если он был
    pub fn unstage_exam(&mut self, member: &SessionCollaborator) {
        self.exams
            .insert(member.id, Artifact::from_remote(member.exam_url.clone()));
    }

    /// Отменить выбранный файл диплома; остаётся ранее загруженный, если он был
    pub fn unstage_diploma(&mut self, member: &SessionCollaborator) {
        self.diplomas
            .insert(member.id, Artifact::from_remote(member.diploma_url.clone()));
    }

    pub fn unstage_attendance_sheet(&mut self, session: &TrainingSession) {
        self.attendance_sheet = Artifact::from_remote(session.attendance_sheet_url.clone());
    }

    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    pub fn set_collaborator_notes(&mut self, id: CollaboratorId, notes: String) {
        if notes.trim().is_empty() {
            self.collaborator_notes.remove(&id);
        } else {
            self.collaborator_notes.insert(id, notes);
        }
    }

    /// Есть ли файлы, ожидающие загрузки
    pub fn has_staged_files(&self) -> bool {
        self.attendance_sheet.staged().is_some()
            || self.exams.values().any(|a| a.staged().is_some())
            || self.diplomas.values().any(|a| a.staged().is_some())
    }
}
