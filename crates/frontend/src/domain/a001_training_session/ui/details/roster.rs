//! Roster table: attendance, grades and per-collaborator files

use contracts::domain::a001_training_session::grading::GradeOutcome;
use contracts::domain::a001_training_session::{CollaboratorId, SessionCollaborator};
use contracts::shared::attendance::Attendance;
use contracts::shared::upload_rules::FileKind;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use super::view_model::{FileStatus, TrainingSessionDetailsVm};
use crate::shared::components::ui::badge::Badge;
use crate::shared::download::open_remote;
use crate::shared::icons::icon;

fn attendance_key(value: Attendance) -> &'static str {
    match value {
        Attendance::Unset => "",
        Attendance::Marked(true) => "present",
        Attendance::Marked(false) => "absent",
    }
}

fn parse_attendance(key: &str) -> Attendance {
    match key {
        "present" => Attendance::PRESENT,
        "absent" => Attendance::ABSENT,
        _ => Attendance::Unset,
    }
}

fn outcome_variant(outcome: GradeOutcome) -> &'static str {
    match outcome {
        GradeOutcome::Passed => "success",
        GradeOutcome::Failed => "error",
        GradeOutcome::NotGraded => "warning",
        GradeOutcome::Absent => "neutral",
    }
}

#[component]
pub fn RosterTable(vm: TrainingSessionDetailsVm) -> impl IntoView {
    let applies = move || {
        vm.detail.with(|d| {
            d.as_ref()
                .map(|d| (d.session.applies_exam, d.session.applies_diploma))
                .unwrap_or_default()
        })
    };
    let roster = move || {
        vm.detail
            .with(|d| d.as_ref().map(|d| d.roster.clone()).unwrap_or_default())
    };

    view! {
        <table class="table roster-table">
            <thead>
                <tr>
                    <th>"Collaborator"</th>
                    <th>"Department"</th>
                    <th>"Attendance"</th>
                    <Show when=move || applies().0>
                        <th>"Grade"</th>
                        <th>"Result"</th>
                        <th>"Exam"</th>
                    </Show>
                    <Show when=move || applies().1>
                        <th>"Diploma"</th>
                    </Show>
                    <th>"Notes"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=roster
                    key=|m: &SessionCollaborator| m.id
                    children=move |member: SessionCollaborator| {
                        view! {
                            <RosterRow
                                vm=vm
                                member=member
                                applies_exam=Signal::derive(move || applies().0)
                                applies_diploma=Signal::derive(move || applies().1)
                            />
                        }
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
fn RosterRow(
    vm: TrainingSessionDetailsVm,
    member: SessionCollaborator,
    applies_exam: Signal<bool>,
    applies_diploma: Signal<bool>,
) -> impl IntoView {
    let id = member.id;
    let attendance = move || vm.draft.with(|d| d.attendance(id));
    let outcome = move || {
        let min_grade = vm.detail.with(|d| {
            d.as_ref()
                .map(|d| d.session.effective_min_grade())
                .unwrap_or_default()
        });
        vm.draft
            .with(|d| GradeOutcome::evaluate(d.attendance(id), d.grade(id), min_grade))
    };
    let grade_error = move || vm.grade_errors.with(|m| m.get(&id).cloned());

    view! {
        <tr>
            <td>{member.full_name.clone()}</td>
            <td>{member.department.clone().unwrap_or_default()}</td>
            <td>
                <select
                    class="form__select"
                    prop:value=move || attendance_key(attendance())
                    disabled=move || !vm.is_editable()
                    on:change=move |ev| vm.set_attendance(id, parse_attendance(&event_target_value(&ev)))
                >
                    <option value="">"Not marked"</option>
                    <option value="present">"Present"</option>
                    <option value="absent">"Absent"</option>
                </select>
            </td>
            <Show when=move || applies_exam.get()>
                <td>
                    <input
                        class="form__input form__input--narrow"
                        type="text"
                        inputmode="numeric"
                        placeholder="0-100"
                        prop:value=move || {
                            vm.grade_inputs.with(|m| m.get(&id).cloned().unwrap_or_default())
                        }
                        disabled=move || !vm.is_editable() || !attendance().is_attendee()
                        on:input=move |ev| vm.input_grade(id, event_target_value(&ev))
                    />
                    {move || grade_error().map(|e| view! { <div class="form__error">{e}</div> })}
                </td>
                <td>
                    {move || {
                        let outcome = outcome();
                        view! { <Badge variant=outcome_variant(outcome)>{outcome.label()}</Badge> }
                    }}
                </td>
                <td>
                    <FileSlot vm=vm kind=FileKind::Exam collaborator=Some(id) />
                </td>
            </Show>
            <Show when=move || applies_diploma.get()>
                <td>
                    <FileSlot vm=vm kind=FileKind::Diploma collaborator=Some(id) />
                </td>
            </Show>
            <td>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || {
                        vm.draft
                            .with(|d| d.collaborator_notes(id).map(str::to_string).unwrap_or_default())
                    }
                    disabled=move || !vm.is_editable()
                    on:change=move |ev| vm.set_collaborator_notes(id, event_target_value(&ev))
                />
            </td>
        </tr>
    }
}

/// Picker plus status for one PDF slot. `collaborator` is `None` for the
/// session attendance sheet.
#[component]
pub fn FileSlot(
    vm: TrainingSessionDetailsVm,
    kind: FileKind,
    collaborator: Option<CollaboratorId>,
) -> impl IntoView {
    let status = move || vm.file_status(kind, collaborator);

    let on_pick = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            vm.stage_file(kind, collaborator, file);
        }
        // Clear input so the same file can be picked again
        input.set_value("");
    };

    view! {
        <div class="file-slot">
            {move || match status() {
                FileStatus::Missing => view! {
                    <span class="file-slot__missing">"No file"</span>
                }
                .into_any(),
                FileStatus::Pending(name) => view! {
                    <span class="file-slot__pending" title="Uploaded on next save">
                        {icon("file")}
                        {name}
                    </span>
                    <Show when=move || vm.is_editable()>
                        <button
                            class="button button--ghost"
                            title="Remove"
                            on:click=move |_| vm.unstage_file(kind, collaborator)
                        >
                            {icon("x")}
                        </button>
                    </Show>
                }
                .into_any(),
                FileStatus::Uploaded(url) => view! {
                    <button
                        class="button button--ghost"
                        title="Open uploaded file"
                        on:click=move |_| {
                            if let Err(e) = open_remote(&url) {
                                log::error!("{}", e);
                            }
                        }
                    >
                        {icon("download")}
                        "View"
                    </button>
                }
                .into_any(),
            }}
            <Show when=move || vm.is_editable()>
                <label class="button button--secondary file-slot__pick">
                    {icon("upload")}
                    <input
                        type="file"
                        accept=".pdf,application/pdf"
                        style="display: none;"
                        on:change=on_pick
                    />
                </label>
            </Show>
        </div>
    }
}
