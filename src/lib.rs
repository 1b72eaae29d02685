//! Aladhan Client Library
//!
//! Request shaping and response normalization for the Aladhan prayer-times
//! API and the AlQuran Cloud text API. Sparse caller parameters become
//! correctly ordered query URLs, all traffic goes through one shared HTTP
//! session, and every reply is classified as payload, no content, or
//! provider error.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Base URLs, timeouts, omission policy
//! - [`session`] - Lazily created, replace-on-close shared HTTP session
//! - [`fetch`] - GET and envelope classification
//! - [`query`] - Ordered parameter sets and query-URL rendering
//! - [`clock`] - Current date fields in a caller-chosen time zone
//! - [`shapes`] - Table-driven request shapes and typed constructors
//! - [`sura`] - Chapter verse text, source and transliterated
//! - [`translit`] - Uzbek Cyrillic to Latin conversion

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod session;
pub mod shapes;
pub mod sura;
pub mod translit;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use clock::{Clock, DateField, SystemClock};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, SessionError};
pub use fetch::{ContentFetcher, classify_body};
pub use query::{OmissionPolicy, ParamValue, ParameterSet, render, render_with};
pub use session::{SessionHandle, SessionManager};
pub use shapes::{
    CalendarQuery, Location, PrayerSettings, RequestShape, ShapeKind, TimingsQuery, compose,
};
pub use sura::{SuraText, Transliterate, Verses};
pub use translit::UzbekLatin;
