//! Page frames: the public site layout and the gated admin layout.

use dioxus::prelude::*;
use tracing::debug;

use super::nav::Nav;
use super::theme::{theme_script, ThemeSwitcher};
use crate::app::query::use_query_client;
use crate::app::session::use_session;
use crate::app::Route;
use crate::session::SessionStatus;

/// CSS styles for the application (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
.status-ok { color: var(--pico-ins-color); }
.status-err { color: var(--pico-del-color); }
.muted { color: var(--pico-muted-color); }
.field-error { color: var(--pico-del-color); font-size: 0.85rem; margin-top: -0.5rem; display: block; }
.banner { display: flex; justify-content: space-between; align-items: center; gap: 1rem; padding: 0.75rem 1rem; border-radius: var(--pico-border-radius); margin-bottom: 1rem; }
.banner-error { background: rgba(200, 40, 40, .15); border: 1px solid var(--pico-del-color); }
.banner-success { background: rgba(40, 160, 80, .15); border: 1px solid var(--pico-ins-color); }
.banner button { margin: 0; padding: 0.25rem 0.75rem; }
.toolbar { display: flex; gap: 0.5rem; flex-wrap: wrap; align-items: center; margin-bottom: 1rem; }
.toolbar button { margin: 0; padding: 0.4rem 0.9rem; }
.event-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 1rem; }
.summary { display: grid; grid-template-columns: repeat(5, 1fr); gap: 0.5rem; margin-bottom: 1rem; }
.summary article { margin: 0; padding: 0.75rem; text-align: center; }
.doc h1, .doc h2, .doc h3 { margin-top: 1.5rem; }
table input { margin: 0; padding: 0.25rem 0.5rem; }
small { color: var(--pico-muted-color); }
/* Black theme (OLED) - extends dark theme */
[data-theme="dark"][data-variant="black"] {
    --pico-background-color: #000;
    --pico-card-background-color: #0a0a0a;
    --pico-card-sectioning-background-color: #0a0a0a;
    --pico-modal-overlay-background-color: rgba(0,0,0,.9);
    --pico-muted-border-color: #1a1a1a;
    --pico-form-element-background-color: #0a0a0a;
    --pico-table-border-color: #1a1a1a;
}
/* Theme switcher */
.theme-switcher { display: flex; gap: 0.25rem; }
.theme-switcher button { padding: 0.25rem 0.5rem; font-size: 0.8rem; margin: 0; }
.theme-switcher button.active { background: var(--pico-primary-background); color: var(--pico-primary-inverse); }
"#;

/// `<head>` contents shared by every page
#[component]
fn Head(title: String) -> Element {
    let full_title = format!("{} - Bettim", title);
    rsx! {
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }
        document::Style { {CUSTOM_STYLES} }
        // Theme init runs immediately (no DOM needed) to prevent flash
        document::Script { {theme_script()} }
    }
}

#[component]
fn Footer() -> Element {
    let version = env!("CARGO_PKG_VERSION");
    rsx! {
        footer {
            class: "container",
            style: "display:flex;justify-content:space-between;align-items:center;",
            small {
                "Bettim v{version} · "
                Link { to: Route::Privacy {}, "Privacy" }
                " · "
                Link { to: Route::Terms {}, "Terms" }
                " · "
                Link { to: Route::Qa {}, "Q&A" }
            }
            ThemeSwitcher {}
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Page content
    pub children: Element,
}

/// Public site frame (landing and legal pages)
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    rsx! {
        Head { title: props.title.clone() }
        header { class: "container",
            nav {
                ul { li { Link { to: Route::Landing {}, strong { "Bettim" } } } }
                ul {
                    li { Link { to: Route::Qa {}, "Q&A" } }
                    li { Link { to: Route::Login {}, "Admin" } }
                }
            }
        }
        main { class: "container", {props.children} }
        Footer {}
    }
}

/// Frame for every `/admin/*` route except login.
///
/// Renders nothing until the stored session has been read, then either the
/// navigation frame with the routed page or a redirect to the login route.
#[component]
pub fn AdminLayout() -> Element {
    let session = use_session();
    let queries = use_query_client();
    let route = use_route::<Route>();
    let status = (session.status)();

    use_effect(move || {
        match (session.status)() {
            SessionStatus::Anonymous => {
                debug!("No session, redirecting to login");
                queries.clear();
                let _ = navigator().replace(Route::Login {});
            }
            SessionStatus::Authenticated => {
                spawn(session.validate());
            }
            SessionStatus::Pending => {}
        }
    });

    let title = match route {
        Route::Dashboard {} => "Events",
        Route::Jobs {} => "Jobs",
        Route::LiveConfig {} => "Live Config",
        Route::TeamStats {} => "Team Stats",
        _ => "Admin",
    };

    rsx! {
        Head { title: title.to_string() }
        if status.is_authenticated() {
            header { class: "container", Nav {} }
            main { class: "container", Outlet::<Route> {} }
            Footer {}
        } else {
            main { class: "container", aria_busy: "true", "Checking session..." }
        }
    }
}
