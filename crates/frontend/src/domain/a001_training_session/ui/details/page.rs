//! Main page component for training session finalization

use contracts::domain::a001_training_session::documents::DocumentKind;
use contracts::domain::a001_training_session::readiness::ReviewRole;
use contracts::domain::a001_training_session::submission::SubmitMode;
use contracts::domain::a001_training_session::SessionId;
use contracts::shared::config::ConsoleConfig;
use contracts::shared::upload_rules::FileKind;
use contracts::system::auth::CurrentUser;
use leptos::prelude::*;
use thaw::*;

use super::roster::{FileSlot, RosterTable};
use super::view_model::TrainingSessionDetailsVm;
use crate::shared::api_utils::ApiContext;
use crate::shared::components::ui::badge::Badge;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;

#[component]
pub fn TrainingSessionDetail(
    id: SessionId,
    api: ApiContext,
    user: CurrentUser,
    #[prop(into)] on_logout: Callback<()>,
) -> impl IntoView {
    let config = use_context::<ConsoleConfig>().unwrap_or_default();
    let vm = TrainingSessionDetailsVm::new(
        id,
        api,
        user,
        config.uploads,
        config.api.slow_request_hint_secs,
        use_toasts(),
    );

    view! {
        <PageFrame page_id="a001_training_session--detail" category=PAGE_CAT_DETAIL>
            <Header vm=vm on_logout=on_logout />

            <div class="page__content">
                {move || {
                    if let Some(err) = vm.error.get() {
                        view! {
                            <div class="warning-box warning-box--error">
                                <span class="warning-box__icon">"⚠"</span>
                                <span class="warning-box__text">{err}</span>
                                <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.load()>
                                    "Retry"
                                </Button>
                            </div>
                        }
                        .into_any()
                    } else if vm.detail.with(Option::is_none) {
                        view! {
                            <div class="page__loading">
                                <Spinner />
                                <span>"Loading session..."</span>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! { <SessionBody vm=vm /> }.into_any()
                    }
                }}
            </div>
        </PageFrame>
    }
}

#[component]
fn Header(vm: TrainingSessionDetailsVm, on_logout: Callback<()>) -> impl IntoView {
    let title = move || {
        vm.detail
            .with(|d| d.as_ref().map(|d| d.session.title()))
            .unwrap_or_else(|| "Training session".to_string())
    };
    let state = move || vm.detail.with(|d| d.as_ref().map(|d| d.session.state));
    let is_trainer = vm.role() == ReviewRole::TrainerFinalize;
    let can_act = move || {
        !vm.is_submitting.get() && vm.readiness().is_some_and(|r| r.can_finalize)
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                {icon("users")}
                <h2>{title}</h2>
                {move || {
                    state().map(|s| view! { <Badge variant=s.badge_variant()>{s.label()}</Badge> })
                }}
            </div>
            <div class="page__header-right">
                {if is_trainer {
                    view! {
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| vm.submit_command(SubmitMode::SaveDraft)
                            disabled=Signal::derive(move || vm.is_submitting.get() || !vm.is_editable())
                        >
                            {icon("save")}
                            " Save draft"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| vm.submit_command(SubmitMode::Finalize)
                            disabled=Signal::derive(move || !can_act())
                        >
                            {icon("check")}
                            {move || if vm.is_submitting.get() { " Sending..." } else { " Finalize" }}
                        </Button>
                    }
                    .into_any()
                } else {
                    view! {
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| vm.review_command(true)
                            disabled=Signal::derive(move || !can_act())
                        >
                            {icon("check")}
                            " Approve"
                        </Button>
                    }
                    .into_any()
                }}
                <span class="page__user">{vm.user_name()}</span>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_logout.run(())>
                    {icon("x")}
                    " Sign out"
                </Button>
            </div>
        </div>
    }
}

#[component]
fn SessionBody(vm: TrainingSessionDetailsVm) -> impl IntoView {
    let session = move || vm.detail.with(|d| d.as_ref().map(|d| d.session.clone()));
    let applies_exam = move || session().is_some_and(|s| s.applies_exam);
    let blocking = move || vm.readiness().and_then(|r| r.message());

    view! {
        <div class="details-container">
            {move || {
                blocking().map(|message| view! {
                    <div class="warning-box">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{message}</span>
                    </div>
                })
            }}

            <Show when=move || vm.is_slow.get()>
                <div class="info-box">"Still sending. Large PDF files can take a while."</div>
            </Show>

            <StatsStrip vm=vm />

            <div class="details-section">
                <h4 class="details-section__title">"Session"</h4>
                <div class="details-grid--3col">
                    <div class="form__group">
                        <label class="form__label">"Trainer"</label>
                        <span>
                            {move || {
                                session()
                                    .and_then(|s| s.trainer.map(|t| t.full_name))
                                    .unwrap_or_else(|| "-".to_string())
                            }}
                        </span>
                    </div>
                    <div class="form__group">
                        <label class="form__label">"Passing grade"</label>
                        <span>{move || session().map(|s| s.effective_min_grade().to_string())}</span>
                    </div>
                    <div class="form__group">
                        <label class="form__label">"Attendance sheet"</label>
                        <FileSlot vm=vm kind=FileKind::AttendanceSheet collaborator=None />
                    </div>
                </div>
                <div class="form__group">
                    <label class="form__label">"Notes"</label>
                    <textarea
                        class="form__textarea"
                        prop:value=move || vm.draft.with(|d| d.notes().to_string())
                        disabled=move || !vm.is_editable()
                        on:change=move |ev| vm.set_notes(event_target_value(&ev))
                    />
                </div>
            </div>

            <div class="details-section">
                <div class="details-section__header">
                    <h4 class="details-section__title">"Collaborators"</h4>
                    <div class="details-section__actions">
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| vm.generate_command(DocumentKind::AttendanceSheet)
                            disabled=Signal::derive(move || vm.is_generating.get())
                        >
                            {icon("file")}
                            " Attendance sheet"
                        </Button>
                        <Show when=applies_exam>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| vm.generate_command(DocumentKind::Exam)
                                disabled=Signal::derive(move || vm.is_generating.get())
                            >
                                {icon("file")}
                                " Exam"
                            </Button>
                        </Show>
                    </div>
                </div>
                <RosterTable vm=vm />
            </div>

            <Show when=move || vm.is_reviewable()>
                <ReviewPanel vm=vm />
            </Show>
        </div>
    }
}

#[component]
fn StatsStrip(vm: TrainingSessionDetailsVm) -> impl IntoView {
    view! {
        {move || {
            vm.stats().map(|s| view! {
                <div class="stats-strip">
                    <span>{format!("Total: {}", s.total)}</span>
                    <span>{format!("Present: {}", s.attendees)}</span>
                    <span>{format!("Absent: {}", s.absentees)}</span>
                    <span>{format!("Not marked: {}", s.unmarked)}</span>
                    <span>{format!("Passed: {}", s.passed)}</span>
                    <span>{format!("Failed: {}", s.failed)}</span>
                </div>
            })
        }}
    }
}

/// HR return-to-trainer form
#[component]
fn ReviewPanel(vm: TrainingSessionDetailsVm) -> impl IntoView {
    view! {
        <div class="details-section">
            <h4 class="details-section__title">"Return to trainer"</h4>
            <Textarea
                value=vm.reject_reason
                placeholder="Reason for rejection"
                attr:style="width: 100%; min-height: 60px;"
            />
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| vm.review_command(false)
                disabled=Signal::derive(move || {
                    vm.is_submitting.get() || vm.reject_reason.with(|r| r.trim().is_empty())
                })
            >
                {icon("x")}
                " Reject"
            </Button>
        </div>
    }
}
