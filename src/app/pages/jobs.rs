//! Queue monitor: jobs grouped by queue and state, plus recurring schedulers.

use bettim_dto::{
    AllJobsGrouped, AllSchedulersGrouped, JobInfo, JobState, JobsSummary, QueueJobs,
    SchedulerInfo, Timestamp,
};
use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use std::collections::BTreeSet;

use crate::app::api;
use crate::app::components::{ConfirmDialog, ErrorBanner, Failure, PendingConfirm};
use crate::app::query::{run_mutation, use_polling, use_query, use_query_client};
use crate::app::session::use_session;
use crate::query::{AdminMutation, QueryKey};

/// A destructive action awaiting confirmation
#[derive(Clone, Debug, PartialEq)]
pub enum JobsAction {
    RemoveJob { job_id: String, queue: String },
    ClearQueue { queue: String, state: Option<JobState> },
    RemoveScheduler { scheduler_id: String, queue: String },
}

impl JobsAction {
    pub fn confirm(self) -> PendingConfirm<JobsAction> {
        let (title, message) = match &self {
            JobsAction::RemoveJob { job_id, queue } => (
                "Delete job".to_string(),
                format!("Delete job {} from queue \"{}\"?", job_id, queue),
            ),
            JobsAction::ClearQueue { queue, state: None } => (
                "Clear queue".to_string(),
                format!("Remove every job from queue \"{}\"?", queue),
            ),
            JobsAction::ClearQueue {
                queue,
                state: Some(state),
            } => (
                format!("Clear {} jobs", state),
                format!("Remove all {} jobs from queue \"{}\"?", state, queue),
            ),
            JobsAction::RemoveScheduler {
                scheduler_id,
                queue,
            } => (
                "Delete scheduler".to_string(),
                format!(
                    "Delete scheduler {} from queue \"{}\"? Future runs will stop.",
                    scheduler_id, queue
                ),
            ),
        };
        PendingConfirm {
            title,
            message,
            action: self,
        }
    }

    fn mutation(&self) -> AdminMutation {
        match self {
            JobsAction::RemoveJob { .. } => AdminMutation::RemoveJob,
            JobsAction::ClearQueue { .. } => AdminMutation::ClearQueue,
            JobsAction::RemoveScheduler { .. } => AdminMutation::RemoveScheduler,
        }
    }
}

pub fn format_timestamp(ts: Option<&Timestamp>) -> String {
    match ts {
        None => "-".to_string(),
        Some(Timestamp::Millis(ms)) => DateTime::<Utc>::from_timestamp_millis(*ms)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| ms.to_string()),
        Some(Timestamp::Text(s)) => s.clone(),
    }
}

#[component]
pub fn Jobs() -> Element {
    let queries = use_query_client();
    let session = use_session();
    let mut jobs = use_query::<AllJobsGrouped>(QueryKey::Jobs);
    let mut schedulers = use_query::<AllSchedulersGrouped>(QueryKey::Schedulers);
    use_polling(QueryKey::Jobs);
    use_polling(QueryKey::Schedulers);

    let mut expanded = use_signal(BTreeSet::<String>::new);
    let mut confirm = use_signal(|| None::<PendingConfirm<JobsAction>>);
    let mut busy = use_signal(|| false);
    let mut failure = use_signal(|| None::<Failure<JobsAction>>);
    let mut jobs_error_hidden = use_signal(|| false);
    let mut schedulers_error_hidden = use_signal(|| false);

    let ask = move |action: JobsAction| confirm.set(Some(action.confirm()));

    // Runs an already confirmed action
    let mut execute = move |action: JobsAction| {
        if busy() {
            return;
        }
        busy.set(true);
        failure.set(None);
        spawn(async move {
            let mutation = action.mutation();
            let result = match &action {
                JobsAction::RemoveJob { job_id, queue } => {
                    run_mutation(queries, session, mutation, api::remove_job(job_id, queue)).await
                }
                JobsAction::ClearQueue { queue, state } => {
                    run_mutation(queries, session, mutation, api::clear_queue(queue, *state)).await
                }
                JobsAction::RemoveScheduler {
                    scheduler_id,
                    queue,
                } => {
                    run_mutation(
                        queries,
                        session,
                        mutation,
                        api::remove_scheduler(scheduler_id, queue),
                    )
                    .await
                }
            };
            if let Err(e) = result {
                failure.set(Failure::from_error(&e, action));
            }
            busy.set(false);
            confirm.set(None);
        });
    };

    let run_confirmed = move |_: ()| {
        if let Some(pending) = confirm() {
            execute(pending.action);
        }
    };

    let refresh = move |_: MouseEvent| {
        jobs_error_hidden.set(false);
        schedulers_error_hidden.set(false);
        queries.refresh(QueryKey::Jobs);
        queries.refresh(QueryKey::Schedulers);
    };

    let jobs_view = match &*jobs.read() {
        None => rsx! { article { aria_busy: "true", "Loading jobs..." } },
        Some(Err(_)) if jobs_error_hidden() => rsx! {},
        Some(Err(e)) => rsx! {
            ErrorBanner {
                message: format!("Failed to load jobs: {}", e.user_message()),
                on_dismiss: move |_| jobs_error_hidden.set(true),
                on_retry: move |_| {
                    jobs_error_hidden.set(false);
                    jobs.restart();
                },
            }
        },
        Some(Ok(grouped)) => {
            let summary = JobsSummary::from_grouped(grouped);
            let queues: Vec<(String, QueueJobs)> =
                grouped.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let names: Vec<String> = grouped.keys().cloned().collect();
            rsx! {
                div { class: "summary",
                    for state in JobState::ALL {
                        article { key: "{state}",
                            small { "{state}" }
                            h3 { style: "margin:0;", "{summary.get(state)}" }
                        }
                    }
                }
                div { class: "toolbar",
                    button {
                        r#type: "button",
                        class: "outline",
                        onclick: move |_| expanded.set(names.iter().cloned().collect()),
                        "Expand all"
                    }
                    button {
                        r#type: "button",
                        class: "outline",
                        onclick: move |_| expanded.set(BTreeSet::new()),
                        "Collapse all"
                    }
                }
                if queues.is_empty() {
                    p { class: "muted", "No queues reported." }
                }
                for (name, queue) in queues {
                    QueueSection {
                        key: "{name}",
                        open: expanded.read().contains(&name),
                        name: name.clone(),
                        queue,
                        on_toggle: move |name: String| {
                            let mut set = expanded.write();
                            if !set.remove(&name) {
                                set.insert(name);
                            }
                        },
                        on_action: ask,
                    }
                }
            }
        }
    };

    let schedulers_view = match &*schedulers.read() {
        None => rsx! { p { aria_busy: "true", "Loading schedulers..." } },
        Some(Err(_)) if schedulers_error_hidden() => rsx! {},
        Some(Err(e)) => rsx! {
            ErrorBanner {
                message: format!("Failed to load schedulers: {}", e.user_message()),
                on_dismiss: move |_| schedulers_error_hidden.set(true),
                on_retry: move |_| {
                    schedulers_error_hidden.set(false);
                    schedulers.restart();
                },
            }
        },
        Some(Ok(grouped)) => {
            let rows: Vec<SchedulerInfo> = grouped.values().flatten().cloned().collect();
            rsx! { SchedulerTable { rows, on_action: ask } }
        }
    };

    let dialog = confirm();

    rsx! {
        div { class: "toolbar",
            h1 { style: "margin:0;flex:1;", "Jobs" }
            small { "Refreshes every 15 s" }
            button { r#type: "button", class: "secondary", onclick: refresh, "Refresh" }
        }
        if let Some(failed) = failure() {
            ErrorBanner {
                message: failed.message,
                on_dismiss: move |_| failure.set(None),
                on_retry: move |_| {
                    if let Some(failed) = failure.take() {
                        execute(failed.retry);
                    }
                },
            }
        }
        {jobs_view}
        h2 { "Schedulers" }
        {schedulers_view}
        ConfirmDialog {
            open: dialog.is_some(),
            title: dialog.as_ref().map(|d| d.title.clone()).unwrap_or_default(),
            message: dialog.as_ref().map(|d| d.message.clone()).unwrap_or_default(),
            confirm_label: if busy() { "Deleting...".to_string() } else { "Delete".to_string() },
            on_confirm: run_confirmed,
            on_cancel: move |_| {
                if !busy() {
                    confirm.set(None);
                }
            },
        }
    }
}

#[component]
fn QueueSection(
    name: String,
    queue: QueueJobs,
    open: bool,
    on_toggle: EventHandler<String>,
    on_action: EventHandler<JobsAction>,
) -> Element {
    let total = queue.total();
    let toggle_name = name.clone();
    let clear_name = name.clone();

    rsx! {
        article {
            header {
                div { class: "toolbar", style: "margin:0;",
                    button {
                        r#type: "button",
                        class: "outline contrast",
                        "aria-expanded": if open { "true" } else { "false" },
                        onclick: move |_| on_toggle.call(toggle_name.clone()),
                        if open { "▾ " } else { "▸ " }
                        "{name}"
                    }
                    small { style: "flex:1;", "{total} jobs" }
                    button {
                        r#type: "button",
                        class: "secondary",
                        disabled: total == 0,
                        onclick: move |_| on_action.call(JobsAction::ClearQueue {
                            queue: clear_name.clone(),
                            state: None,
                        }),
                        "Clear queue"
                    }
                }
            }
            if open {
                for state in JobState::ALL {
                    JobStateTable {
                        key: "{state}",
                        queue_name: name.clone(),
                        state,
                        jobs: queue.by_state(state).to_vec(),
                        on_action,
                    }
                }
            }
        }
    }
}

#[component]
fn JobStateTable(
    queue_name: String,
    state: JobState,
    jobs: Vec<JobInfo>,
    on_action: EventHandler<JobsAction>,
) -> Element {
    if jobs.is_empty() {
        return rsx! {};
    }
    let clear_queue = queue_name.clone();

    rsx! {
        div { class: "toolbar", style: "margin-top:1rem;",
            strong { style: "flex:1;", "{state} ({jobs.len()})" }
            button {
                r#type: "button",
                class: "outline secondary",
                onclick: move |_| on_action.call(JobsAction::ClearQueue {
                    queue: clear_queue.clone(),
                    state: Some(state),
                }),
                "Clear {state}"
            }
        }
        div { class: "overflow-auto",
            table { class: "striped",
                thead {
                    tr {
                        th { "ID" }
                        th { "Name" }
                        th { "Attempts" }
                        th { "Created" }
                        th { "Finished" }
                        th { "Failure" }
                        th {}
                    }
                }
                tbody {
                    for job in jobs {
                        JobRow { key: "{job.id}", job: job.clone(), on_action }
                    }
                }
            }
        }
    }
}

#[component]
fn JobRow(job: JobInfo, on_action: EventHandler<JobsAction>) -> Element {
    let created = format_timestamp(job.timestamp.as_ref());
    let finished = format_timestamp(job.finished_on.as_ref());
    let failure = job.failed_reason.clone().unwrap_or_default();
    let action = JobsAction::RemoveJob {
        job_id: job.id.clone(),
        queue: job.queue_name.clone(),
    };

    rsx! {
        tr {
            td { code { "{job.id}" } }
            td { "{job.name}" }
            td { "{job.attempts_made}" }
            td { "{created}" }
            td { "{finished}" }
            td { class: "status-err", "{failure}" }
            td {
                button {
                    r#type: "button",
                    class: "outline secondary",
                    style: "padding:0.2rem 0.6rem;margin:0;",
                    onclick: move |_| on_action.call(action.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn SchedulerTable(rows: Vec<SchedulerInfo>, on_action: EventHandler<JobsAction>) -> Element {
    if rows.is_empty() {
        return rsx! { p { class: "muted", "No schedulers registered." } };
    }

    rsx! {
        div { class: "overflow-auto",
            table { class: "striped",
                thead {
                    tr {
                        th { "Queue" }
                        th { "ID" }
                        th { "Repeat" }
                        th { "Next run" }
                        th {}
                    }
                }
                tbody {
                    for scheduler in rows {
                        SchedulerRow {
                            key: "{scheduler.queue_name}/{scheduler.id}",
                            scheduler: scheduler.clone(),
                            on_action,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SchedulerRow(scheduler: SchedulerInfo, on_action: EventHandler<JobsAction>) -> Element {
    let cadence = scheduler.cadence();
    let next_run = format_timestamp(scheduler.next_run.as_ref());
    let action = JobsAction::RemoveScheduler {
        scheduler_id: scheduler.id.clone(),
        queue: scheduler.queue_name.clone(),
    };

    rsx! {
        tr {
            td { "{scheduler.queue_name}" }
            td { code { "{scheduler.id}" } }
            td { "{cadence}" }
            td { "{next_run}" }
            td {
                button {
                    r#type: "button",
                    class: "outline secondary",
                    style: "padding:0.2rem 0.6rem;margin:0;",
                    onclick: move |_| on_action.call(action.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_messages() {
        let c = JobsAction::RemoveJob {
            job_id: "42".into(),
            queue: "live-scores".into(),
        }
        .confirm();
        assert_eq!(c.title, "Delete job");
        assert_eq!(c.message, "Delete job 42 from queue \"live-scores\"?");

        let c = JobsAction::ClearQueue {
            queue: "odds".into(),
            state: Some(JobState::Failed),
        }
        .confirm();
        assert_eq!(c.title, "Clear failed jobs");
        assert!(matches!(c.action, JobsAction::ClearQueue { state: Some(JobState::Failed), .. }));

        let c = JobsAction::ClearQueue {
            queue: "odds".into(),
            state: None,
        }
        .confirm();
        assert_eq!(c.message, "Remove every job from queue \"odds\"?");
    }

    #[test]
    fn test_actions_invalidate_their_list() {
        let remove = JobsAction::RemoveJob {
            job_id: "1".into(),
            queue: "q".into(),
        };
        assert_eq!(remove.mutation().invalidates(), &[QueryKey::Jobs]);

        let scheduler = JobsAction::RemoveScheduler {
            scheduler_id: "s".into(),
            queue: "q".into(),
        };
        assert_eq!(scheduler.mutation().invalidates(), &[QueryKey::Schedulers]);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(
            format_timestamp(Some(&Timestamp::Millis(0))),
            "1970-01-01 00:00:00"
        );
        assert_eq!(
            format_timestamp(Some(&Timestamp::Text("soon".into()))),
            "soon"
        );
    }
}
