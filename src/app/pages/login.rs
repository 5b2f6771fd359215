//! Admin login page.

use dioxus::prelude::*;
use tracing::warn;

use crate::app::api;
use crate::app::components::ErrorBanner;
use crate::app::session::use_session;
use crate::app::Route;

/// Banner text for a failed login
pub fn login_error_message(error: &crate::error::ApiError) -> String {
    if error.is_auth_failure() {
        "Invalid password".to_string()
    } else {
        error.user_message()
    }
}

#[component]
pub fn Login() -> Element {
    let mut session = use_session();
    let mut password = use_signal(String::new);
    let mut pending = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    // Already signed in
    use_effect(move || {
        if session.is_authenticated() {
            let _ = navigator().replace(Route::Dashboard {});
        }
    });

    let mut attempt = move |value: String| {
        if value.is_empty() || pending() {
            return;
        }
        pending.set(true);
        error.set(None);

        spawn(async move {
            match api::login(&value).await {
                Ok(()) => {
                    session.login();
                    password.set(String::new());
                    let _ = navigator().push(Route::Dashboard {});
                }
                Err(e) => {
                    warn!("Login failed: {}", e);
                    error.set(Some(login_error_message(&e)));
                    pending.set(false);
                }
            }
        });
    };

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        attempt(password());
    };

    rsx! {
        document::Title { "Admin login - Bettim" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }
        main { class: "container", style: "max-width:420px;margin-top:15vh;",
            article {
                header {
                    h2 { style: "margin:0;", "Bettim Admin" }
                }
                if let Some(message) = error() {
                    ErrorBanner {
                        message,
                        on_dismiss: move |_| error.set(None),
                        on_retry: move |_| attempt(password()),
                    }
                }
                form { onsubmit: submit,
                    label {
                        "Password"
                        input {
                            r#type: "password",
                            name: "password",
                            autocomplete: "current-password",
                            autofocus: true,
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        disabled: pending() || password().is_empty(),
                        aria_busy: if pending() { "true" } else { "false" },
                        "Log in"
                    }
                }
                footer {
                    Link { to: Route::Landing {}, "Back to site" }
                }
            }
        }
    }
}
