//! Admin navigation bar.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

/// Navigation bar with the admin sections and logout.
#[component]
pub fn Nav() -> Element {
    let mut session = use_session();

    let links = [
        (Route::Dashboard {}, "Events"),
        (Route::Jobs {}, "Jobs"),
        (Route::LiveConfig {}, "Live Config"),
        (Route::TeamStats {}, "Team Stats"),
    ];

    rsx! {
        nav {
            ul {
                li {
                    Link { to: Route::Dashboard {}, strong { "Bettim Admin" } }
                }
            }
            ul {
                for (route, label) in links {
                    li {
                        Link { to: route, active_class: "contrast", "{label}" }
                    }
                }
                li {
                    button {
                        class: "secondary",
                        r#type: "button",
                        style: "margin:0;padding:0.3rem 0.8rem;",
                        onclick: move |_| session.logout(),
                        "Logout"
                    }
                }
            }
        }
    }
}
