//! Training session details - View Model

use std::collections::HashMap;

use contracts::domain::a001_training_session::documents::{DocumentKind, DocumentRequest};
use contracts::domain::a001_training_session::grading::{Grade, SessionStats};
use contracts::domain::a001_training_session::readiness::{self, Readiness, ReviewRole};
use contracts::domain::a001_training_session::submission::{
    build_review, build_submission, ReviewDecision, SubmitMode,
};
use contracts::domain::a001_training_session::{
    CollaboratorId, FinalizationDraft, SessionDetail, SessionId,
};
use contracts::shared::attendance::Attendance;
use contracts::shared::config::UploadLimits;
use contracts::shared::upload_rules::{validate_upload, FileKind};
use contracts::system::auth::CurrentUser;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use web_sys::File;

use super::model;
use crate::shared::api_utils::ApiContext;
use crate::shared::download::download_blob;
use crate::shared::error_presenter::present_error;
use crate::shared::toast::ToastService;

pub type Draft = FinalizationDraft<File>;

/// What a file slot currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Missing,
    /// Picked locally, sent with the next save or finalize
    Pending(String),
    Uploaded(String),
}

/// ViewModel для страницы финализации сессии
#[derive(Clone, Copy)]
pub struct TrainingSessionDetailsVm {
    pub id: SessionId,
    pub detail: RwSignal<Option<SessionDetail>>,
    /// Локальные правки; `File` не `Send`, поэтому локальное хранилище
    pub draft: RwSignal<Draft, LocalStorage>,
    /// Текст, введённый в ячейки оценок (может быть невалидным)
    pub grade_inputs: RwSignal<HashMap<CollaboratorId, String>>,
    pub grade_errors: RwSignal<HashMap<CollaboratorId, String>>,
    pub reject_reason: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_loading: RwSignal<bool>,
    pub is_submitting: RwSignal<bool>,
    pub is_generating: RwSignal<bool>,
    /// A submission has been pending longer than the configured hint
    pub is_slow: RwSignal<bool>,
    slow_hint_ms: u32,
    api: StoredValue<ApiContext>,
    user: StoredValue<CurrentUser>,
    limits: StoredValue<UploadLimits>,
    toasts: ToastService,
}

impl TrainingSessionDetailsVm {
    pub fn new(
        id: SessionId,
        api: ApiContext,
        user: CurrentUser,
        limits: UploadLimits,
        slow_hint_secs: u32,
        toasts: ToastService,
    ) -> Self {
        let vm = Self {
            id,
            detail: RwSignal::new(None),
            draft: RwSignal::new_local(Draft::new()),
            grade_inputs: RwSignal::new(HashMap::new()),
            grade_errors: RwSignal::new(HashMap::new()),
            reject_reason: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            is_loading: RwSignal::new(false),
            is_submitting: RwSignal::new(false),
            is_generating: RwSignal::new(false),
            is_slow: RwSignal::new(false),
            slow_hint_ms: slow_hint_secs.saturating_mul(1000),
            api: StoredValue::new(api),
            user: StoredValue::new(user),
            limits: StoredValue::new(limits),
            toasts,
        };
        vm.load();
        vm
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn role(&self) -> ReviewRole {
        self.user.with_value(CurrentUser::review_role)
    }

    pub fn user_name(&self) -> String {
        self.user.with_value(|u| u.display_name.clone())
    }

    /// Recomputed on every read so it always reflects the latest edit.
    pub fn readiness(&self) -> Option<Readiness> {
        let role = self.role();
        self.detail.with(|detail| {
            let detail = detail.as_ref()?;
            Some(self.draft.with(|draft| {
                readiness::evaluate(&detail.session, &detail.roster, draft, role)
            }))
        })
    }

    pub fn stats(&self) -> Option<SessionStats> {
        self.detail.with(|detail| {
            let detail = detail.as_ref()?;
            Some(
                self.draft
                    .with(|draft| SessionStats::collect(&detail.session, &detail.roster, draft)),
            )
        })
    }

    /// Trainer may edit attendance, grades and files
    pub fn is_editable(&self) -> bool {
        self.role() == ReviewRole::TrainerFinalize
            && self
                .detail
                .with(|d| d.as_ref().is_some_and(|d| d.session.state.is_trainer_editable()))
    }

    pub fn is_reviewable(&self) -> bool {
        self.role() == ReviewRole::HrApprove
            && self
                .detail
                .with(|d| d.as_ref().is_some_and(|d| d.session.state.is_hr_reviewable()))
    }

    pub fn file_status(&self, kind: FileKind, collaborator: Option<CollaboratorId>) -> FileStatus {
        self.draft.with(|d| {
            let artifact = match (kind, collaborator) {
                (FileKind::AttendanceSheet, _) => Some(d.attendance_sheet()),
                (FileKind::Exam, Some(id)) => d.exam(id),
                (FileKind::Diploma, Some(id)) => d.diploma(id),
                (_, None) => None,
            };
            match artifact {
                Some(a) => match (a.staged(), a.remote_url()) {
                    (Some(file), _) => FileStatus::Pending(file.name()),
                    (None, Some(url)) => FileStatus::Uploaded(url.to_string()),
                    (None, None) => FileStatus::Missing,
                },
                None => FileStatus::Missing,
            }
        })
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Загрузить сессию с сервера; локальные правки отбрасываются
    pub fn load(&self) {
        let this = *self;
        let api = self.api.get_value();
        this.is_loading.set(true);
        this.error.set(None);

        wasm_bindgen_futures::spawn_local(async move {
            match model::fetch_by_id(&api, this.id).await {
                Ok(detail) => {
                    log::debug!(
                        "Loaded session {} ({} collaborators)",
                        detail.session.id,
                        detail.roster.len()
                    );
                    let draft = Draft::from_detail(&detail);
                    let inputs = detail
                        .roster
                        .iter()
                        .filter_map(|m| draft.grade(m.id).map(|g| (m.id, g.to_string())))
                        .collect();
                    this.grade_inputs.set(inputs);
                    this.grade_errors.set(HashMap::new());
                    this.draft.set(draft);
                    this.detail.set(Some(detail));
                }
                Err(e) => {
                    present_error(&this.toasts, "Load session", &e);
                    this.error.set(Some(format!("Failed to load session: {}", e)));
                }
            }
            this.is_loading.set(false);
        });
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    pub fn set_attendance(&self, id: CollaboratorId, value: Attendance) {
        self.draft.update(|d| d.set_attendance(id, value));
    }

    /// Accept the typed grade only if it parses; otherwise show why.
    pub fn input_grade(&self, id: CollaboratorId, raw: String) {
        let parsed = if raw.trim().is_empty() {
            Ok(None)
        } else {
            Grade::parse(&raw).map(Some)
        };
        self.grade_inputs.update(|m| {
            m.insert(id, raw);
        });
        match parsed {
            Ok(grade) => {
                self.draft.update(|d| d.set_grade(id, grade));
                self.grade_errors.update(|m| {
                    m.remove(&id);
                });
            }
            Err(e) => {
                self.draft.update(|d| d.set_grade(id, None));
                self.grade_errors.update(|m| {
                    m.insert(id, e.to_string());
                });
            }
        }
    }

    pub fn set_collaborator_notes(&self, id: CollaboratorId, notes: String) {
        self.draft.update(|d| d.set_collaborator_notes(id, notes));
    }

    pub fn set_notes(&self, notes: String) {
        self.draft.update(|d| d.set_notes(notes));
    }

    /// Stage a picked file after the client-side PDF/size checks.
    /// `collaborator` is `None` for the session-level attendance sheet.
    pub fn stage_file(&self, kind: FileKind, collaborator: Option<CollaboratorId>, file: File) {
        let checked = self.limits.with_value(|limits| {
            validate_upload(kind, &file.name(), &file.type_(), file.size() as u64, limits)
        });
        if let Err(e) = checked {
            log::warn!("Rejected {} file '{}': {}", kind.label(), file.name(), e);
            self.toasts.error(e.to_string());
            return;
        }

        self.draft.update(|d| match (kind, collaborator) {
            (FileKind::AttendanceSheet, _) => d.stage_attendance_sheet(file),
            (FileKind::Exam, Some(id)) => d.stage_exam(id, file),
            (FileKind::Diploma, Some(id)) => d.stage_diploma(id, file),
            (_, None) => log::error!("{} file picked without a collaborator", kind.label()),
        });
    }

    pub fn unstage_file(&self, kind: FileKind, collaborator: Option<CollaboratorId>) {
        let detail = self.detail.get_untracked();
        let Some(detail) = detail else {
            return;
        };
        let member = collaborator.and_then(|id| detail.roster.iter().find(|m| m.id == id));
        self.draft.update(|d| match (kind, member) {
            (FileKind::AttendanceSheet, _) => d.unstage_attendance_sheet(&detail.session),
            (FileKind::Exam, Some(m)) => d.unstage_exam(m),
            (FileKind::Diploma, Some(m)) => d.unstage_diploma(m),
            (_, None) => {}
        });
    }

    fn begin_submit(&self) {
        self.is_submitting.set(true);
        self.is_slow.set(false);
        let this = *self;
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(this.slow_hint_ms).await;
            if this.is_submitting.get_untracked() {
                this.is_slow.set(true);
            }
        });
    }

    fn end_submit(&self) {
        self.is_submitting.set(false);
        self.is_slow.set(false);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Сохранить черновик или финализировать сессию
    pub fn submit_command(&self, mode: SubmitMode) {
        // The button is disabled while a request is pending; this catches
        // a second click that lands before the re-render.
        if self.is_submitting.get_untracked() {
            return;
        }
        let Some(detail) = self.detail.get_untracked() else {
            return;
        };
        let this = *self;
        let draft = self.draft.get_untracked();
        let user = self.user.get_value();
        let api = self.api.get_value();
        let action = match mode {
            SubmitMode::SaveDraft => "Save draft",
            SubmitMode::Finalize => "Finalize session",
        };

        this.begin_submit();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match build_submission(
                &detail.session,
                &detail.roster,
                &draft,
                &user,
                mode,
            ) {
                Ok(submission) => model::submit_finalization(&api, this.id, &submission).await,
                Err(e) => Err(e.to_string()),
            };
            match result {
                Ok(()) => {
                    log::info!("{} succeeded for session {}", action, this.id);
                    this.toasts.success(match mode {
                        SubmitMode::SaveDraft => "Draft saved",
                        SubmitMode::Finalize => "Session sent to HR review",
                    });
                    this.load();
                }
                Err(e) => present_error(&this.toasts, action, &e),
            }
            this.end_submit();
        });
    }

    /// Решение HR: утвердить или отклонить
    pub fn review_command(&self, approve: bool) {
        if self.is_submitting.get_untracked() {
            return;
        }
        let Some(detail) = self.detail.get_untracked() else {
            return;
        };
        let decision = if approve {
            Ok(ReviewDecision::Approve)
        } else {
            ReviewDecision::reject(&self.reject_reason.get_untracked())
        };
        let action = if approve { "Approve session" } else { "Reject session" };

        let request = decision.and_then(|decision| {
            self.draft.with_untracked(|draft| {
                build_review(
                    &detail.session,
                    &detail.roster,
                    draft,
                    &self.user.get_value(),
                    decision,
                )
            })
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                present_error(&self.toasts, action, &e);
                return;
            }
        };

        let this = *self;
        let api = self.api.get_value();
        this.begin_submit();
        wasm_bindgen_futures::spawn_local(async move {
            match model::submit_review(&api, this.id, &request).await {
                Ok(()) => {
                    log::info!("{} succeeded for session {}", action, this.id);
                    this.toasts.success(if approve {
                        "Session approved"
                    } else {
                        "Session returned to trainer"
                    });
                    this.reject_reason.set(String::new());
                    this.load();
                }
                Err(e) => present_error(&this.toasts, action, &e),
            }
            this.end_submit();
        });
    }

    /// Сгенерировать печатную форму и скачать её
    pub fn generate_command(&self, kind: DocumentKind) {
        if self.is_generating.get_untracked() {
            return;
        }
        let Some(detail) = self.detail.get_untracked() else {
            return;
        };
        let request = self.draft.with_untracked(|draft| {
            DocumentRequest::build(kind, &detail.session, &detail.roster, draft)
        });
        let file_name = kind.file_name(&detail.session);

        let this = *self;
        let api = self.api.get_value();
        this.is_generating.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let result = match model::generate_document(&api, &request).await {
                Ok(blob) => download_blob(&blob, &file_name),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                present_error(&this.toasts, &format!("Generate {}", kind.label()), &e);
            }
            this.is_generating.set(false);
        });
    }
}
