//! Events dashboard.
//!
//! Persisted events ("In app") and provider events ("Available to add"), each
//! with a single Add/Remove toggle.

use bettim_dto::{DashboardEvents, Event, EventAction};
use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use std::collections::HashSet;

use crate::app::api;
use crate::app::components::{ErrorBanner, Failure};
use crate::app::query::{run_mutation, use_query, use_query_client};
use crate::app::session::use_session;
use crate::query::{AdminMutation, QueryKey};

fn format_start(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%b %-d, %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| "TBD".to_string())
}

#[component]
pub fn Dashboard() -> Element {
    let queries = use_query_client();
    let session = use_session();
    let mut events = use_query::<DashboardEvents>(QueryKey::Dashboard);
    let mut pending = use_signal(HashSet::<String>::new);
    let mut failure = use_signal(|| None::<Failure<Event>>);
    let mut load_error_hidden = use_signal(|| false);

    let mut toggle = move |event: Event| {
        if pending.read().contains(&event.id) {
            return;
        }
        pending.write().insert(event.id.clone());
        failure.set(None);

        spawn(async move {
            let result = match event.action() {
                EventAction::Add => {
                    run_mutation(
                        queries,
                        session,
                        AdminMutation::CreateEvent,
                        api::create_event(&event),
                    )
                    .await
                }
                EventAction::Remove => {
                    run_mutation(
                        queries,
                        session,
                        AdminMutation::DeleteEvent,
                        api::delete_event(&event.id),
                    )
                    .await
                }
            };
            if let Err(e) = result {
                failure.set(Failure::from_error(&e, event.clone()));
            }
            pending.write().remove(&event.id);
        });
    };

    let content = match &*events.read() {
        None => rsx! { article { aria_busy: "true", "Loading events..." } },
        Some(Err(_)) if load_error_hidden() => rsx! {},
        Some(Err(e)) => rsx! {
            ErrorBanner {
                message: format!("Failed to load events: {}", e.user_message()),
                on_dismiss: move |_| load_error_hidden.set(true),
                on_retry: move |_| {
                    load_error_hidden.set(false);
                    events.restart();
                },
            }
        },
        Some(Ok(data)) => {
            let in_app = data.db_events.clone();
            let available = data.external_events.clone();
            rsx! {
                EventGroup {
                    title: "In app",
                    empty: "No events in the app yet.",
                    events: in_app,
                    pending: pending(),
                    on_toggle: toggle,
                }
                EventGroup {
                    title: "Available to add",
                    empty: "No upcoming events from the provider.",
                    events: available,
                    pending: pending(),
                    on_toggle: toggle,
                }
            }
        }
    };

    rsx! {
        div { class: "toolbar",
            h1 { style: "margin:0;flex:1;", "Events" }
            button {
                r#type: "button",
                class: "secondary",
                onclick: move |_| {
                    load_error_hidden.set(false);
                    events.restart();
                },
                "Refresh"
            }
        }
        if let Some(failed) = failure() {
            ErrorBanner {
                message: failed.message,
                on_dismiss: move |_| failure.set(None),
                on_retry: move |_| {
                    if let Some(failed) = failure.take() {
                        toggle(failed.retry);
                    }
                },
            }
        }
        {content}
    }
}

#[component]
fn EventGroup(
    title: String,
    empty: String,
    events: Vec<Event>,
    pending: HashSet<String>,
    on_toggle: EventHandler<Event>,
) -> Element {
    rsx! {
        section {
            h2 { "{title} ({events.len()})" }
            if events.is_empty() {
                p { class: "muted", "{empty}" }
            }
            div { class: "event-grid",
                for event in events {
                    EventCard {
                        key: "{event.id}",
                        busy: pending.contains(&event.id),
                        event: event.clone(),
                        on_toggle,
                    }
                }
            }
        }
    }
}

#[component]
fn EventCard(event: Event, busy: bool, on_toggle: EventHandler<Event>) -> Element {
    let action = event.action();
    let matchup = event.matchup();
    let start = format_start(event.start_date);
    let status = event.status.clone().unwrap_or_default();
    let kind = event.kind.clone();
    let visible = event.is_visible;
    let button_class = match action {
        EventAction::Add => "",
        EventAction::Remove => "secondary",
    };

    rsx! {
        article {
            header {
                strong { "{matchup}" }
                br {}
                small { "{kind} · {start}" }
            }
            if !status.is_empty() {
                p { small { "Status: {status}" } }
            }
            p {
                if visible {
                    span { class: "status-ok", "Visible" }
                } else {
                    span { class: "muted", "Hidden" }
                }
            }
            footer {
                button {
                    r#type: "button",
                    class: button_class,
                    disabled: busy,
                    aria_busy: if busy { "true" } else { "false" },
                    onclick: move |_| on_toggle.call(event.clone()),
                    "{action.label()}"
                }
            }
        }
    }
}
