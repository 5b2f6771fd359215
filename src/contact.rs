//! Contact form validation.
//!
//! Validation runs before any network call; failures are reported per field.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// How long the success banner stays visible
pub const SUCCESS_BANNER_SECS: u64 = 5;

/// Visibility of the "message sent" banner.
///
/// Every send restarts the countdown; an older countdown finishing does not
/// hide the banner of a newer send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentBanner {
    generation: u64,
    visible: bool,
}

impl SentBanner {
    /// Show the banner; returns the token to hand back to [`SentBanner::expire`]
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    pub fn expire(&mut self, token: u64) {
        if token == self.generation {
            self.visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
            .unwrap_or_else(|_| unreachable!("email pattern is a valid regex"))
    })
}

/// Raw form input as typed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Normalized, validated submission sent to the form relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Field-scoped validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactSubmission, ContactErrors> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_lowercase();
        let message = self.message.trim().to_string();

        let mut errors = ContactErrors::default();

        let name_len = name.chars().count();
        if name_len < NAME_MIN_CHARS {
            errors.name = Some(format!(
                "Name must be at least {NAME_MIN_CHARS} characters"
            ));
        } else if name_len > NAME_MAX_CHARS {
            errors.name = Some(format!(
                "Name must be at most {NAME_MAX_CHARS} characters"
            ));
        }

        if email.is_empty() {
            errors.email = Some("Email is required".to_string());
        } else if !email_regex().is_match(&email) {
            errors.email = Some("Please enter a valid email address".to_string());
        }

        let message_len = message.chars().count();
        if message_len < MESSAGE_MIN_CHARS {
            errors.message = Some(format!(
                "Message must be at least {MESSAGE_MIN_CHARS} characters"
            ));
        } else if message_len > MESSAGE_MAX_CHARS {
            errors.message = Some(format!(
                "Message must be at most {MESSAGE_MAX_CHARS} characters"
            ));
        }

        if errors.is_empty() {
            Ok(ContactSubmission {
                name,
                email,
                message,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_accepts_boundary_lengths() {
        let ok = form("Al", "al@example.com", "0123456789").validate().unwrap();
        assert_eq!(ok.name, "Al");
        assert_eq!(ok.message.len(), 10);

        let long_name = "n".repeat(NAME_MAX_CHARS);
        let long_msg = "m".repeat(MESSAGE_MAX_CHARS);
        assert!(form(&long_name, "a@b.co", &long_msg).validate().is_ok());
    }

    #[test]
    fn test_rejects_short_name() {
        let errs = form("A", "a@b.co", "long enough message").validate().unwrap_err();
        assert!(errs.name.is_some());
        assert!(errs.email.is_none());
        assert!(errs.message.is_none());
    }

    #[test]
    fn test_rejects_short_message() {
        let errs = form("Alice", "a@b.co", "too short").validate().unwrap_err();
        assert!(errs.message.is_some());
        assert!(errs.name.is_none());
    }

    #[test]
    fn test_rejects_over_long_fields() {
        let errs = form(
            &"n".repeat(NAME_MAX_CHARS + 1),
            "a@b.co",
            &"m".repeat(MESSAGE_MAX_CHARS + 1),
        )
        .validate()
        .unwrap_err();
        assert!(errs.name.is_some());
        assert!(errs.message.is_some());
    }

    #[test]
    fn test_rejects_invalid_emails() {
        for email in ["", "plain", "a@", "@b.co", "a b@c.co", "a@b", "a@@b.co"] {
            let errs = form("Alice", email, "long enough message")
                .validate()
                .unwrap_err();
            assert!(errs.email.is_some(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let ok = form("Alice", "  Alice@Example.COM ", "long enough message")
            .validate()
            .unwrap();
        assert_eq!(ok.email, "alice@example.com");
    }

    #[test]
    fn test_whitespace_does_not_count_toward_length() {
        let errs = form("  A  ", "a@b.co", "   short   ").validate().unwrap_err();
        assert!(errs.name.is_some());
        assert!(errs.message.is_some());
    }

    #[test]
    fn test_sent_banner_outlives_an_earlier_countdown() {
        let mut banner = SentBanner::default();
        assert!(!banner.is_visible());

        let first = banner.show();
        let second = banner.show();
        banner.expire(first);
        assert!(banner.is_visible());

        banner.expire(second);
        assert!(!banner.is_visible());
    }
}
