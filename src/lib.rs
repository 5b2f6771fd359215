//! Bettim Admin - Rust Implementation
//!
//! Administrative web console for the Bettim sports-event prediction platform.
//!
//! This library provides:
//! - Event curation (add provider events to the app, remove them)
//! - Queue job and recurring scheduler monitoring
//! - Live-event polling interval configuration
//! - NCAA team statistics editing
//! - Public landing page, contact form and legal documents rendered from `.docx`
//! - Web UI (Dioxus fullstack + Pico CSS) backed by a same-origin `/api` proxy

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Dioxus UI app (shared between server SSR and WASM client)
pub mod app;

// Shared client logic (compiled for both targets)
pub mod contact;
pub mod error;
pub mod query;
pub mod session;

// Server-only modules (excluded from WASM build)
#[cfg(feature = "server")]
pub mod adapters;
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod docs;
