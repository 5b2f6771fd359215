//! Public landing page with the contact form.

use dioxus::prelude::*;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::components::{ErrorBanner, Failure, Layout, SuccessBanner};
use crate::app::{api, timer};
use crate::contact::{
    ContactErrors, ContactForm, ContactSubmission, SentBanner, SUCCESS_BANNER_SECS,
};

#[component]
pub fn Landing() -> Element {
    rsx! {
        Layout { title: "Predict. Compete. Win.".to_string(),
            section {
                hgroup {
                    h1 { "Bettim" }
                    p { "Free sports predictions. Pick the winners of upcoming NBA and NCAA games and climb the leaderboard." }
                }
                div { class: "grid",
                    article {
                        h3 { "Pick" }
                        p { "Browse upcoming games and call the winner before tip-off." }
                    }
                    article {
                        h3 { "Follow" }
                        p { "Scores refresh live during games." }
                    }
                    article {
                        h3 { "Climb" }
                        p { "Correct picks earn points. No real money involved." }
                    }
                }
            }
            section { id: "contact",
                h2 { "Contact us" }
                ContactSection {}
            }
        }
    }
}

#[component]
fn ContactSection() -> Element {
    let mut form = use_signal(ContactForm::default);
    let mut errors = use_signal(ContactErrors::default);
    let mut submitting = use_signal(|| false);
    let mut failure = use_signal(|| None::<Failure<ContactSubmission>>);
    let mut sent = use_signal(SentBanner::default);

    let mut send = move |submission: ContactSubmission| {
        if submitting() {
            return;
        }
        failure.set(None);
        submitting.set(true);

        spawn(async move {
            match api::submit_contact(&submission).await {
                Ok(()) => {
                    info!("Contact form sent");
                    form.set(ContactForm::default());
                    let token = sent.write().show();
                    submitting.set(false);
                    timer::sleep(Duration::from_secs(SUCCESS_BANNER_SECS)).await;
                    sent.write().expire(token);
                }
                Err(e) => {
                    warn!("Contact form failed: {}", e);
                    failure.set(Some(Failure {
                        message: e.user_message(),
                        retry: submission,
                    }));
                    submitting.set(false);
                }
            }
        });
    };

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let submission = match form.read().validate() {
            Ok(submission) => submission,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(ContactErrors::default());
        send(submission);
    };

    let current = form();
    let field_errors = errors();

    rsx! {
        if sent().is_visible() {
            SuccessBanner { message: "Thanks! Your message has been sent." }
        }
        if let Some(failed) = failure() {
            ErrorBanner {
                message: failed.message,
                on_dismiss: move |_| failure.set(None),
                on_retry: move |_| {
                    if let Some(failed) = failure.take() {
                        send(failed.retry);
                    }
                },
            }
        }
        form { novalidate: true, onsubmit: submit,
            label {
                "Name"
                input {
                    name: "name",
                    value: "{current.name}",
                    "aria-invalid": if field_errors.name.is_some() { "true" } else { "false" },
                    oninput: move |e| form.write().name = e.value(),
                }
            }
            if let Some(msg) = &field_errors.name {
                small { class: "field-error", "{msg}" }
            }
            label {
                "Email"
                input {
                    name: "email",
                    r#type: "email",
                    value: "{current.email}",
                    "aria-invalid": if field_errors.email.is_some() { "true" } else { "false" },
                    oninput: move |e| form.write().email = e.value(),
                }
            }
            if let Some(msg) = &field_errors.email {
                small { class: "field-error", "{msg}" }
            }
            label {
                "Message"
                textarea {
                    name: "message",
                    rows: "5",
                    value: "{current.message}",
                    "aria-invalid": if field_errors.message.is_some() { "true" } else { "false" },
                    oninput: move |e| form.write().message = e.value(),
                }
            }
            if let Some(msg) = &field_errors.message {
                small { class: "field-error", "{msg}" }
            }
            button {
                r#type: "submit",
                disabled: submitting(),
                aria_busy: if submitting() { "true" } else { "false" },
                if submitting() { "Sending..." } else { "Send message" }
            }
        }
    }
}
