//! Client-side core of the school admission portal.
//!
//! The crate owns the admission draft and its step editors, the review and
//! submission flow, the typed REST client shared by the public site and the
//! admin back office, and the helpers the back office builds its screens from.

pub mod admission;
pub mod api;
pub mod backoffice;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
