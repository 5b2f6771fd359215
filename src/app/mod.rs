//! Dioxus fullstack application entry point.
//!
//! This module provides the main App component that serves as the root
//! of the Dioxus application with client-side hydration.

use dioxus::prelude::*;

pub mod api;
pub mod components;
pub mod pages;
pub mod query;
pub mod session;
pub mod timer;

use components::AdminLayout;
use pages::{Dashboard, Jobs, Landing, LiveConfig, Login, NotFound, Privacy, Qa, TeamStats, Terms};
use query::use_query_provider;
use session::use_session_provider;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Session and query cache live for the whole app
    use_session_provider();
    use_query_provider();

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Landing {},
    #[route("/privacy")]
    Privacy {},
    #[route("/terms")]
    Terms {},
    #[route("/qa")]
    Qa {},
    #[route("/admin/login")]
    Login {},
    #[redirect("/admin", || Route::Dashboard {})]
    #[layout(AdminLayout)]
        #[route("/admin/dashboard")]
        Dashboard {},
        #[route("/admin/jobs")]
        Jobs {},
        #[route("/admin/live-config")]
        LiveConfig {},
        #[route("/admin/team-stats")]
        TeamStats {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
