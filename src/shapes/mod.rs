//! Request shapes: one table-driven definition per remote operation and a
//! single composition step that turns caller values into a renderable,
//! fully-defaulted [`ParameterSet`](crate::query::ParameterSet).
//!
//! # Architecture
//!
//! - [`ShapeKind`] / [`ShapeDef`] - the static catalog (template, ordered
//!   schema, positional slot, date defaults)
//! - [`compose`] - places supplied values in schema order, fills missing
//!   dates from a [`Clock`](crate::clock::Clock), applies the custom-method
//!   settings and checks required parameters
//! - [`RequestShape`] - a composed request; `url()` renders it, `get()`
//!   fetches it
//! - [`CalendarQuery`], [`TimingsQuery`], [`Location`], [`PrayerSettings`] -
//!   typed constructors for the prayer-time shapes
//!
//! # Example
//!
//! ```no_run
//! use aladhan_client::{CalendarQuery, ClientConfig, ContentFetcher, Location};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ContentFetcher::new(ClientConfig::default());
//! let shape = CalendarQuery::new(Location::coordinates(41.3, 69.2))
//!     .month(5)
//!     .year(2024)
//!     .gregorian()?;
//! if let Some(days) = shape.get(&fetcher).await? {
//!     println!("{days}");
//! }
//! # Ok(())
//! # }
//! ```

mod catalog;
mod request;

pub use catalog::{
    DATE_OR_TIMESTAMP, DateDefault, DefaultWhen, ParamDef, Provider, SURA, ShapeDef, ShapeKind,
    TIMEZONE_PARAM,
};
pub use request::{
    CUSTOM_METHOD, CUSTOM_METHOD_SETTINGS, CalendarQuery, Location, PrayerSettings, RequestShape,
    TimingsQuery, compose,
};
