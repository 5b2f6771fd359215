//! Dismissible status banners.

use dioxus::prelude::*;

use crate::error::ApiError;

/// A failed write, kept with what is needed to send it again
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<T> {
    pub message: String,
    pub retry: T,
}

impl<T> Failure<T> {
    /// `None` for 401/403, which end the session instead of showing a banner
    pub fn from_error(error: &ApiError, retry: T) -> Option<Self> {
        (!error.is_auth_failure()).then(|| Self {
            message: error.user_message(),
            retry,
        })
    }
}

/// Error banner with optional Retry and dismiss buttons.
///
/// Render it conditionally; `on_dismiss` is responsible for hiding it.
#[component]
pub fn ErrorBanner(
    message: String,
    #[props(default)] on_dismiss: Option<EventHandler<()>>,
    #[props(default)] on_retry: Option<EventHandler<()>>,
) -> Element {
    rsx! {
        div { class: "banner banner-error", role: "alert",
            span { "{message}" }
            div { class: "toolbar", style: "margin:0;",
                if let Some(retry) = on_retry {
                    button {
                        r#type: "button",
                        onclick: move |_| retry.call(()),
                        "Retry"
                    }
                }
                if let Some(dismiss) = on_dismiss {
                    button {
                        r#type: "button",
                        class: "secondary",
                        "aria-label": "Dismiss",
                        onclick: move |_| dismiss.call(()),
                        "×"
                    }
                }
            }
        }
    }
}

#[component]
pub fn SuccessBanner(message: String) -> Element {
    rsx! {
        div { class: "banner banner-success", role: "status", "{message}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_the_request_to_retry() {
        let error = ApiError::from_status(500, r#"{"message":"Redis down"}"#);
        let failure = Failure::from_error(&error, ("job-1", "live-scores")).unwrap();
        assert_eq!(failure.message, "Redis down");
        assert_eq!(failure.retry, ("job-1", "live-scores"));

        let offline = Failure::from_error(&ApiError::Network("offline".into()), 7).unwrap();
        assert_eq!(offline.message, "network error: offline");
        assert_eq!(offline.retry, 7);
    }

    #[test]
    fn test_auth_failures_show_no_banner() {
        for status in [401, 403] {
            assert_eq!(Failure::from_error(&ApiError::from_status(status, ""), ()), None);
        }
    }
}
