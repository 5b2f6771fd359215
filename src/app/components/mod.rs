//! Shared UI components for the Dioxus fullstack web UI.

pub mod banner;
pub mod confirm;
pub mod layout;
pub mod nav;
pub mod theme;

pub use banner::{ErrorBanner, Failure, SuccessBanner};
pub use confirm::{ConfirmDialog, PendingConfirm};
pub use layout::{AdminLayout, Layout};
pub use nav::Nav;
