//! Legal documents rendered from the server's `.docx` sources.

use dioxus::prelude::*;

use crate::app::api;
use crate::app::components::{ErrorBanner, Layout};
use crate::app::Route;

#[component]
pub fn Privacy() -> Element {
    rsx! { LegalDocument { slug: "privacy", title: "Privacy Policy" } }
}

#[component]
pub fn Terms() -> Element {
    rsx! { LegalDocument { slug: "terms", title: "Terms of Service" } }
}

#[component]
pub fn Qa() -> Element {
    rsx! { LegalDocument { slug: "qa", title: "Q&A" } }
}

#[component]
fn LegalDocument(slug: String, title: String) -> Element {
    let source = slug.clone();
    let mut html = use_resource(move || {
        let slug = source.clone();
        async move { api::document(&slug).await }
    });
    let mut error_hidden = use_signal(|| false);

    let body = match &*html.read() {
        None => rsx! { article { aria_busy: "true", "Loading document..." } },
        Some(Err(_)) if error_hidden() => rsx! {},
        Some(Err(e)) => rsx! {
            ErrorBanner {
                message: format!("Failed to load document: {}", e.user_message()),
                on_dismiss: move |_| error_hidden.set(true),
                on_retry: move |_| {
                    error_hidden.set(false);
                    html.restart();
                },
            }
        },
        Some(Ok(content)) => rsx! {
            article { class: "doc", dangerous_inner_html: "{content}" }
        },
    };

    rsx! {
        Layout { title: title.clone(),
            {body}
            p {
                small {
                    a { href: "/docs/{slug}.docx", download: "{slug}.docx", "Download original (.docx)" }
                }
            }
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        Layout { title: "Not found".to_string(),
            article {
                h1 { "Page not found" }
                p { class: "muted", "Nothing lives at /{path}." }
                Link { to: Route::Landing {}, "Back to home" }
            }
        }
    }
}
