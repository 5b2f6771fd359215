//! Live-event polling interval configuration.
//!
//! Intervals are edited in whole seconds and stored in milliseconds.

use bettim_dto::live_config::{parse_seconds_input, MIN_INTERVAL_SECONDS};
use bettim_dto::LiveEventConfig;
use dioxus::prelude::*;

use crate::app::api;
use crate::app::components::{ConfirmDialog, ErrorBanner, Failure, SuccessBanner};
use crate::app::query::{run_mutation, use_query, use_query_client};
use crate::app::session::use_session;
use crate::query::{AdminMutation, QueryKey};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntervalErrors {
    pub regular: Option<String>,
    pub half_time: Option<String>,
}

fn check_interval(seconds: u64) -> Option<String> {
    (seconds < MIN_INTERVAL_SECONDS)
        .then(|| format!("Must be at least {} second", MIN_INTERVAL_SECONDS))
}

/// Parse both inputs; each must be at least one second
pub fn parse_intervals(regular: &str, half_time: &str) -> Result<LiveEventConfig, IntervalErrors> {
    let regular = parse_seconds_input(regular);
    let half_time = parse_seconds_input(half_time);
    let errors = IntervalErrors {
        regular: check_interval(regular),
        half_time: check_interval(half_time),
    };
    if errors.regular.is_none() && errors.half_time.is_none() {
        Ok(LiveEventConfig::from_seconds(regular, half_time))
    } else {
        Err(errors)
    }
}

/// A write against the config record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWrite {
    Save(LiveEventConfig),
    Delete,
}

impl ConfigWrite {
    pub fn mutation(self) -> AdminMutation {
        match self {
            ConfigWrite::Save(_) => AdminMutation::UpdateLiveEventConfig,
            ConfigWrite::Delete => AdminMutation::DeleteLiveEventConfig,
        }
    }
}

#[component]
pub fn LiveConfig() -> Element {
    let queries = use_query_client();
    let session = use_session();
    let mut config = use_query::<Option<LiveEventConfig>>(QueryKey::LiveEventConfig);

    let mut regular = use_signal(String::new);
    let mut half_time = use_signal(String::new);
    let mut errors = use_signal(IntervalErrors::default);
    let mut saving = use_signal(|| false);
    let mut saved = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);
    let mut failure = use_signal(|| None::<Failure<ConfigWrite>>);
    let mut load_error_hidden = use_signal(|| false);

    // Load the stored values (or defaults) into the inputs
    use_effect(move || {
        if let Some(Ok(stored)) = &*config.read() {
            let current = stored.unwrap_or_default();
            regular.set(current.regular_seconds().to_string());
            half_time.set(current.half_time_seconds().to_string());
        }
    });

    let mut submit = move |write: ConfigWrite| {
        if saving() {
            return;
        }
        failure.set(None);
        saved.set(false);
        saving.set(true);

        spawn(async move {
            let result = match write {
                ConfigWrite::Save(next) => {
                    run_mutation(
                        queries,
                        session,
                        write.mutation(),
                        api::save_live_event_config(&next),
                    )
                    .await
                    .map(|_| ())
                }
                ConfigWrite::Delete => {
                    run_mutation(
                        queries,
                        session,
                        write.mutation(),
                        api::delete_live_event_config(),
                    )
                    .await
                }
            };
            match result {
                Ok(()) => saved.set(matches!(write, ConfigWrite::Save(_))),
                Err(e) => failure.set(Failure::from_error(&e, write)),
            }
            saving.set(false);
            confirm_delete.set(false);
        });
    };

    let save = move |evt: FormEvent| {
        evt.prevent_default();
        if saving() {
            return;
        }
        let next = match parse_intervals(&regular(), &half_time()) {
            Ok(next) => next,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(IntervalErrors::default());
        submit(ConfigWrite::Save(next));
    };

    let delete = move |_: ()| submit(ConfigWrite::Delete);

    let field_errors = errors();
    let state = config.read().clone();

    rsx! {
        h1 { "Live Event Config" }
        p { class: "muted",
            "How often live scores are refreshed during a game and during half-time."
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
        if saved() {
            SuccessBanner { message: "Configuration saved." }
        }
        match state {
            None => rsx! { article { aria_busy: "true", "Loading configuration..." } },
            Some(Err(_)) if load_error_hidden() => rsx! {},
            Some(Err(e)) => rsx! {
                ErrorBanner {
                    message: format!("Failed to load configuration: {}", e.user_message()),
                    on_dismiss: move |_| load_error_hidden.set(true),
                    on_retry: move |_| {
                        load_error_hidden.set(false);
                        config.restart();
                    },
                }
            },
            Some(Ok(stored)) => rsx! {
                article {
                    if stored.is_none() {
                        p { small { "No configuration saved yet; defaults are shown." } }
                    }
                    form { onsubmit: save,
                        div { class: "grid",
                            label {
                                "Regular interval (seconds)"
                                input {
                                    r#type: "number",
                                    min: "1",
                                    step: "1",
                                    value: "{regular}",
                                    "aria-invalid": if field_errors.regular.is_some() { "true" } else { "false" },
                                    oninput: move |e| regular.set(e.value()),
                                }
                                if let Some(msg) = &field_errors.regular {
                                    small { class: "field-error", "{msg}" }
                                }
                            }
                            label {
                                "Half-time interval (seconds)"
                                input {
                                    r#type: "number",
                                    min: "1",
                                    step: "1",
                                    value: "{half_time}",
                                    "aria-invalid": if field_errors.half_time.is_some() { "true" } else { "false" },
                                    oninput: move |e| half_time.set(e.value()),
                                }
                                if let Some(msg) = &field_errors.half_time {
                                    small { class: "field-error", "{msg}" }
                                }
                            }
                        }
                        div { class: "toolbar",
                            button {
                                r#type: "submit",
                                disabled: saving(),
                                aria_busy: if saving() { "true" } else { "false" },
                                "Save"
                            }
                            if stored.is_some() {
                                button {
                                    r#type: "button",
                                    class: "secondary",
                                    disabled: saving(),
                                    onclick: move |_| confirm_delete.set(true),
                                    "Delete configuration"
                                }
                            }
                        }
                    }
                }
            },
        }
        ConfirmDialog {
            open: confirm_delete(),
            title: "Delete configuration",
            message: "Delete the live event configuration? The platform falls back to its defaults.",
            on_confirm: delete,
            on_cancel: move |_| confirm_delete.set(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intervals_converts_to_ms() {
        let config = parse_intervals("20", "90").unwrap();
        assert_eq!(config.regular_interval_ms, 20_000);
        assert_eq!(config.half_time_interval_ms, 90_000);
    }

    #[test]
    fn test_parse_intervals_rejects_zero_and_garbage() {
        let errors = parse_intervals("0", "abc").unwrap_err();
        assert_eq!(errors.regular.as_deref(), Some("Must be at least 1 second"));
        assert!(errors.half_time.is_some());

        let errors = parse_intervals("5", "").unwrap_err();
        assert!(errors.regular.is_none());
        assert!(errors.half_time.is_some());
    }

    #[test]
    fn test_config_writes_refresh_the_record() {
        let save = ConfigWrite::Save(LiveEventConfig::from_seconds(5, 30));
        assert_eq!(save.mutation(), AdminMutation::UpdateLiveEventConfig);
        assert_eq!(ConfigWrite::Delete.mutation(), AdminMutation::DeleteLiveEventConfig);
        for write in [save, ConfigWrite::Delete] {
            assert_eq!(write.mutation().invalidates(), &[QueryKey::LiveEventConfig]);
        }
    }

    #[test]
    fn test_parse_intervals_integer_prefix() {
        let config = parse_intervals("15s", "60.9").unwrap();
        assert_eq!(config, LiveEventConfig::default());
    }
}
