//! NCAA team statistics with inline editing.

use bettim_dto::{TeamRecord, TeamStatsResponse, TeamStatsUpdate};
use dioxus::prelude::*;

use crate::app::api;
use crate::app::components::{ErrorBanner, Failure};
use crate::app::query::{run_mutation, use_query, use_query_client};
use crate::app::session::use_session;
use crate::query::{AdminMutation, QueryKey};

/// Inputs of the row being edited, as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditDraft {
    pub id: String,
    pub wins: String,
    pub losses: String,
    pub avg_points_scored: String,
    pub avg_points_allowed: String,
    pub form: String,
}

impl EditDraft {
    pub fn from_stats(stats: &bettim_dto::TeamStats) -> Option<Self> {
        Some(Self {
            id: stats.id.clone()?,
            wins: stats.record.wins.to_string(),
            losses: stats.record.losses.to_string(),
            avg_points_scored: stats.avg_points_scored.to_string(),
            avg_points_allowed: stats.avg_points_allowed.to_string(),
            form: stats.form.clone(),
        })
    }

    /// Patch holding only the fields that differ from `original`; `Ok(None)` if nothing changed
    pub fn to_update(
        &self,
        original: &bettim_dto::TeamStats,
    ) -> Result<Option<TeamStatsUpdate>, String> {
        let wins = parse_count("Wins", &self.wins)?;
        let losses = parse_count("Losses", &self.losses)?;
        let scored = parse_average("Avg points scored", &self.avg_points_scored)?;
        let allowed = parse_average("Avg points allowed", &self.avg_points_allowed)?;
        let form = self.form.trim().to_uppercase();

        let record = TeamRecord { wins, losses };
        let update = TeamStatsUpdate {
            team_stats_id: self.id.clone(),
            record: (record != original.record).then_some(record),
            avg_points_scored: (scored != original.avg_points_scored).then_some(scored),
            avg_points_allowed: (allowed != original.avg_points_allowed).then_some(allowed),
            form: (form != original.form).then_some(form),
        };

        let unchanged = update.record.is_none()
            && update.avg_points_scored.is_none()
            && update.avg_points_allowed.is_none()
            && update.form.is_none();
        Ok((!unchanged).then_some(update))
    }
}

fn parse_count(label: &str, input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{} must be a whole number", label))
}

fn parse_average(label: &str, input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("{} must be a non-negative number", label)),
    }
}

#[component]
pub fn TeamStats() -> Element {
    let queries = use_query_client();
    let session = use_session();
    let mut stats = use_query::<TeamStatsResponse>(QueryKey::TeamStats);
    let mut draft = use_signal(|| None::<EditDraft>);
    let mut saving = use_signal(|| false);
    let mut invalid = use_signal(|| None::<String>);
    let mut failure = use_signal(|| None::<Failure<TeamStatsUpdate>>);
    let mut load_error_hidden = use_signal(|| false);

    let rows = match &*stats.read() {
        Some(Ok(response)) => Some(response.data.clone()),
        _ => None,
    };

    let mut submit = move |update: TeamStatsUpdate| {
        if saving() {
            return;
        }
        failure.set(None);
        saving.set(true);
        spawn(async move {
            let result = run_mutation(
                queries,
                session,
                AdminMutation::UpdateTeamStats,
                api::update_team_stats(&update),
            )
            .await;
            match result {
                Ok(()) => draft.set(None),
                Err(e) => failure.set(Failure::from_error(&e, update)),
            }
            saving.set(false);
        });
    };

    let mut save = move |original: bettim_dto::TeamStats| {
        let Some(current) = draft() else {
            return;
        };
        let update = match current.to_update(&original) {
            Ok(Some(update)) => update,
            Ok(None) => {
                draft.set(None);
                return;
            }
            Err(message) => {
                invalid.set(Some(message));
                return;
            }
        };
        invalid.set(None);
        submit(update);
    };

    let editing = draft();

    rsx! {
        div { class: "toolbar",
            h1 { style: "margin:0;flex:1;", "Team Stats" }
            button {
                r#type: "button",
                class: "secondary",
                onclick: move |_| {
                    load_error_hidden.set(false);
                    queries.refresh(QueryKey::TeamStats);
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
                        submit(failed.retry);
                    }
                },
            }
        }
        if let Some(message) = invalid() {
            p { small { class: "field-error", "{message}" } }
        }
        match (&*stats.read(), rows) {
            (None, _) => rsx! { article { aria_busy: "true", "Loading team stats..." } },
            (Some(Err(_)), _) if load_error_hidden() => rsx! {},
            (Some(Err(e)), _) => rsx! {
                ErrorBanner {
                    message: format!("Failed to load team stats: {}", e.user_message()),
                    on_dismiss: move |_| load_error_hidden.set(true),
                    on_retry: move |_| {
                        load_error_hidden.set(false);
                        stats.restart();
                    },
                }
            },
            (_, Some(rows)) if rows.is_empty() => rsx! { p { class: "muted", "No team stats yet." } },
            (_, Some(rows)) => rsx! {
                div { class: "overflow-auto",
                    table { class: "striped",
                        thead {
                            tr {
                                th { "Team" }
                                th { "W" }
                                th { "L" }
                                th { "Avg scored" }
                                th { "Avg allowed" }
                                th { "Form" }
                                th { "Updated" }
                                th {}
                            }
                        }
                        tbody {
                            for row in rows {
                                if let Some(d) = editing.clone().filter(|d| Some(&d.id) == row.id.as_ref()) {
                                    tr { key: "{row.team_id}",
                                        td { "{row.team_name}" }
                                        td { input { value: "{d.wins}", size: "3", oninput: move |e| draft.with_mut(|d| if let Some(d) = d { d.wins = e.value() }) } }
                                        td { input { value: "{d.losses}", size: "3", oninput: move |e| draft.with_mut(|d| if let Some(d) = d { d.losses = e.value() }) } }
                                        td { input { value: "{d.avg_points_scored}", size: "5", oninput: move |e| draft.with_mut(|d| if let Some(d) = d { d.avg_points_scored = e.value() }) } }
                                        td { input { value: "{d.avg_points_allowed}", size: "5", oninput: move |e| draft.with_mut(|d| if let Some(d) = d { d.avg_points_allowed = e.value() }) } }
                                        td { input { value: "{d.form}", size: "6", oninput: move |e| draft.with_mut(|d| if let Some(d) = d { d.form = e.value() }) } }
                                        td { small { {row.updated_at.clone().unwrap_or_default()} } }
                                        td {
                                            div { class: "toolbar", style: "margin:0;flex-wrap:nowrap;",
                                                button {
                                                    r#type: "button",
                                                    disabled: saving(),
                                                    aria_busy: if saving() { "true" } else { "false" },
                                                    onclick: {
                                                        let original = row.clone();
                                                        move |_| save(original.clone())
                                                    },
                                                    "Save"
                                                }
                                                button {
                                                    r#type: "button",
                                                    class: "secondary",
                                                    disabled: saving(),
                                                    onclick: move |_| {
                                                        invalid.set(None);
                                                        draft.set(None);
                                                    },
                                                    "Cancel"
                                                }
                                            }
                                        }
                                    }
                                } else {
                                    tr { key: "{row.team_id}",
                                        td { "{row.team_name}" }
                                        td { "{row.record.wins}" }
                                        td { "{row.record.losses}" }
                                        td { "{row.avg_points_scored:.1}" }
                                        td { "{row.avg_points_allowed:.1}" }
                                        td { code { "{row.form}" } }
                                        td { small { {row.updated_at.clone().unwrap_or_default()} } }
                                        td {
                                            button {
                                                r#type: "button",
                                                class: "outline",
                                                style: "padding:0.2rem 0.6rem;margin:0;",
                                                disabled: editing.is_some() || row.id.is_none(),
                                                onclick: {
                                                    let next = EditDraft::from_stats(&row);
                                                    move |_| draft.set(next.clone())
                                                },
                                                "Edit"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            (Some(Ok(_)), None) => rsx! {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> bettim_dto::TeamStats {
        bettim_dto::TeamStats {
            id: Some("ts-1".into()),
            team_id: "duke".into(),
            team_name: "Duke".into(),
            record: TeamRecord { wins: 10, losses: 2 },
            avg_points_scored: 78.5,
            avg_points_allowed: 65.0,
            form: "WWLWW".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unchanged_draft_produces_no_patch() {
        let original = stats();
        let draft = EditDraft::from_stats(&original).unwrap();
        assert_eq!(draft.to_update(&original), Ok(None));
    }

    #[test]
    fn test_patch_contains_only_changed_fields() {
        let original = stats();
        let mut draft = EditDraft::from_stats(&original).unwrap();
        draft.wins = "11".into();
        draft.form = " wwlww ".into();

        let update = draft.to_update(&original).unwrap().unwrap();
        assert_eq!(update.team_stats_id, "ts-1");
        assert_eq!(update.record, Some(TeamRecord { wins: 11, losses: 2 }));
        assert_eq!(update.avg_points_scored, None);
        assert_eq!(update.avg_points_allowed, None);
        // Normalized to the stored form
        assert_eq!(update.form, None);

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "teamStatsId": "ts-1", "record": { "wins": 11, "losses": 2 } })
        );
    }

    #[test]
    fn test_invalid_numbers_are_reported() {
        let original = stats();
        let mut draft = EditDraft::from_stats(&original).unwrap();
        draft.losses = "-1".into();
        assert_eq!(
            draft.to_update(&original),
            Err("Losses must be a whole number".to_string())
        );

        draft.losses = "2".into();
        draft.avg_points_allowed = "NaN".into();
        assert!(draft.to_update(&original).is_err());
    }

    #[test]
    fn test_unsaved_rows_cannot_be_edited() {
        let mut row = stats();
        row.id = None;
        assert!(EditDraft::from_stats(&row).is_none());
    }
}
