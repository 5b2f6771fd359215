//! Confirmation dialog for destructive actions.

use dioxus::prelude::*;

/// What the user is about to confirm, held by the page until answered
#[derive(Clone, Debug, PartialEq)]
pub struct PendingConfirm<T> {
    pub title: String,
    pub message: String,
    pub action: T,
}

/// Modal `<dialog>`; shown while `open` is true
#[component]
pub fn ConfirmDialog(
    open: bool,
    title: String,
    message: String,
    #[props(default = "Delete".to_string())] confirm_label: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        dialog { open: open,
            article {
                header { strong { "{title}" } }
                p { "{message}" }
                footer {
                    button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}
