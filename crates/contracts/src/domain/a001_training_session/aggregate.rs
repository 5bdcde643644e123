use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::aggregate_id::numeric_id;

/// Минимальная проходная оценка, если у сессии она не задана
pub const DEFAULT_MIN_GRADE: u8 = 60;

// ============================================================================
// ID Types
// ============================================================================

numeric_id!(
    /// Идентификатор учебной сессии
    SessionId
);

numeric_id!(
    /// Идентификатор сотрудника в составе сессии
    CollaboratorId
);

// ============================================================================
// Lifecycle
// ============================================================================

/// Состояние жизненного цикла сессии.
///
/// Переходы между состояниями выполняет только сервер; клиент лишь
/// читает текущее состояние, чтобы включать или выключать действия.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Created,
    Assigned,
    Programmed,
    InProgress,
    FinalizedByTrainer,
    InReview,
    Finalized,
    Rejected,
}

impl SessionState {
    pub const ALL: [SessionState; 8] = [
        SessionState::Created,
        SessionState::Assigned,
        SessionState::Programmed,
        SessionState::InProgress,
        SessionState::FinalizedByTrainer,
        SessionState::InReview,
        SessionState::Finalized,
        SessionState::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Created => "Created",
            SessionState::Assigned => "Assigned",
            SessionState::Programmed => "Programmed",
            SessionState::InProgress => "In progress",
            SessionState::FinalizedByTrainer => "Finalized by trainer",
            SessionState::InReview => "In review",
            SessionState::Finalized => "Finalized",
            SessionState::Rejected => "Rejected",
        }
    }

    /// Тренер может редактировать и финализировать сессию
    pub fn is_trainer_editable(&self) -> bool {
        matches!(self, SessionState::InProgress | SessionState::Rejected)
    }

    /// HR может утвердить или отклонить сессию
    pub fn is_hr_reviewable(&self) -> bool {
        matches!(
            self,
            SessionState::FinalizedByTrainer | SessionState::InReview
        )
    }

    pub fn badge_variant(&self) -> &'static str {
        match self {
            SessionState::Finalized => "success",
            SessionState::Rejected => "error",
            SessionState::FinalizedByTrainer | SessionState::InReview => "warning",
            SessionState::InProgress => "primary",
            _ => "neutral",
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerRef {
    pub id: i64,
    pub full_name: String,
}

/// Учебная сессия (один проведённый курс с фиксированным составом)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: SessionId,
    pub course_name: String,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub trainer: Option<TrainerRef>,
    pub state: SessionState,
    #[serde(default)]
    pub applies_exam: bool,
    #[serde(default)]
    pub applies_diploma: bool,
    #[serde(default)]
    pub min_grade: Option<u8>,
    #[serde(default)]
    pub attendance_sheet_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TrainingSession {
    pub fn effective_min_grade(&self) -> u8 {
        self.min_grade.unwrap_or(DEFAULT_MIN_GRADE)
    }

    /// Заголовок для вкладки и печатных форм
    pub fn title(&self) -> String {
        match self.scheduled_date {
            Some(date) => format!("{} ({})", self.course_name, date.format("%d.%m.%Y")),
            None => self.course_name.clone(),
        }
    }
}

/// Сотрудник в составе сессии, как его хранит сервер
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCollaborator {
    pub id: CollaboratorId,
    pub full_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub attendance: Option<bool>,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub exam_url: Option<String>,
    #[serde(default)]
    pub diploma_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Ответ `GET /api/training-sessions/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub session: TrainingSession,
    #[serde(default)]
    pub roster: Vec<SessionCollaborator>,
}
