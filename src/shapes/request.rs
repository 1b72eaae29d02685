//! Composition of caller values into request shapes.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::catalog::{DefaultWhen, Provider, ShapeDef, ShapeKind, TIMEZONE_PARAM};
use crate::clock::{Clock, SystemClock, field_at};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::fetch::ContentFetcher;
use crate::query::{ParamValue, ParameterSet, render_with};

/// Method code for caller-defined angles.
pub const CUSTOM_METHOD: i64 = 99;

/// Angles sent with [`CUSTOM_METHOD`]: Fajr 15°, no Maghrib offset, Isha 15°.
pub const CUSTOM_METHOD_SETTINGS: &str = "15,null,15";

/// Composes `supplied` into a request of `kind`.
///
/// Supplied entries are moved into the shape's declared order. Missing date
/// fields are computed from `clock` in the set's `timezonestr` zone (local
/// zone when absent); the clock is read at most once.
///
/// # Errors
///
/// Returns [`ClientError::Builder`] for names the shape does not declare, a
/// positional value on a shape without a placeholder, or a required
/// parameter left unset; [`ClientError::UnknownTimeZone`] when a default has
/// to be computed in an unknown zone.
pub fn compose(
    kind: ShapeKind,
    supplied: &ParameterSet,
    clock: &dyn Clock,
) -> Result<RequestShape, ClientError> {
    let def = kind.def();
    compose_params(def, supplied, clock)
        .map(|params| RequestShape { kind, params })
        .inspect_err(|e| log_build_failure(def.name, e))
}

fn log_build_failure(shape: &str, e: &ClientError) {
    error!(shape, error = %e, "Request shape could not be built");
}

fn compose_params(
    def: &ShapeDef,
    supplied: &ParameterSet,
    clock: &dyn Clock,
) -> Result<ParameterSet, ClientError> {
    let mut params = ParameterSet::new();
    for param in def.params {
        params.declare(param.name, param.required);
    }

    for (name, _, value) in supplied.iter() {
        if !params.set(name, value.cloned()) {
            return Err(ClientError::builder(
                def.name,
                format!("unknown parameter '{name}'"),
            ));
        }
    }
    match (def.positional, supplied.positional()) {
        (Some(_), value) => params.set_positional(value.cloned()),
        (None, Some(_)) => {
            return Err(ClientError::builder(
                def.name,
                "shape takes no positional value",
            ));
        }
        (None, None) => {}
    }

    apply_date_defaults(def, &mut params, clock)?;
    apply_custom_method(&mut params);

    if let Some(missing) = def
        .params
        .iter()
        .find(|param| param.required && params.get(param.name).is_none())
    {
        return Err(ClientError::builder(
            def.name,
            format!("required parameter '{}' is unset", missing.name),
        ));
    }
    if let Some(name) = def.positional
        && params.positional().is_none()
    {
        return Err(ClientError::builder(
            def.name,
            format!("positional parameter '{name}' is unset"),
        ));
    }

    Ok(params)
}

fn apply_date_defaults(
    def: &ShapeDef,
    params: &mut ParameterSet,
    clock: &dyn Clock,
) -> Result<(), ClientError> {
    let zone = params
        .get(TIMEZONE_PARAM)
        .and_then(ParamValue::as_str)
        .filter(|zone| !zone.is_empty())
        .map(str::to_string);
    let mut instant: Option<DateTime<Utc>> = None;

    for default in def.date_defaults {
        let is_positional = def.positional == Some(default.name);
        let current = if is_positional {
            params.positional()
        } else {
            params.get(default.name)
        };
        let missing = match default.when {
            DefaultWhen::Falsy => current.is_none_or(ParamValue::is_falsy),
            DefaultWhen::Unset => current.is_none(),
        };
        if !missing {
            continue;
        }

        let now = *instant.get_or_insert_with(|| clock.now());
        let value = ParamValue::Int(field_at(now, default.field, zone.as_deref())?);
        debug!(shape = def.name, param = default.name, %value, "Defaulted date parameter");
        if is_positional {
            params.set_positional(Some(value));
        } else {
            params.set(default.name, Some(value));
        }
    }
    Ok(())
}

fn apply_custom_method(params: &mut ParameterSet) {
    let is_custom = params.get("method").and_then(ParamValue::as_int) == Some(CUSTOM_METHOD);
    let has_settings = params
        .get("method_settings")
        .is_some_and(|value| !value.is_falsy());
    if is_custom && !has_settings {
        params.set("method_settings", Some(CUSTOM_METHOD_SETTINGS.into()));
    }
}

/// A composed request ready to render or fetch.
#[derive(Debug, Clone)]
pub struct RequestShape {
    kind: ShapeKind,
    params: ParameterSet,
}

impl RequestShape {
    /// Current date in `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Builder`] when `zone` is empty.
    pub fn current_date(zone: &str) -> Result<Self, ClientError> {
        Self::zone_lookup(ShapeKind::CurrentDate, zone)
    }

    /// Current time in `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Builder`] when `zone` is empty.
    pub fn current_time(zone: &str) -> Result<Self, ClientError> {
        Self::zone_lookup(ShapeKind::CurrentTime, zone)
    }

    /// Current Unix timestamp as seen by the provider for `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Builder`] when `zone` is empty.
    pub fn current_timestamp(zone: &str) -> Result<Self, ClientError> {
        Self::zone_lookup(ShapeKind::CurrentTimestamp, zone)
    }

    /// Catalog of calculation methods.
    #[must_use]
    pub fn methods() -> Self {
        Self {
            kind: ShapeKind::Methods,
            params: ParameterSet::new(),
        }
    }

    /// Text of chapter `sura` in the edition selected by `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Builder`] when `kind` is not a sura shape.
    pub fn sura(kind: ShapeKind, sura: u32) -> Result<Self, ClientError> {
        if kind.def().provider != Provider::Quran {
            let e = ClientError::builder(kind.name(), "not a sura text shape");
            log_build_failure(kind.name(), &e);
            return Err(e);
        }
        let mut supplied = ParameterSet::new();
        supplied.set_positional(Some(sura.into()));
        compose(kind, &supplied, &SystemClock)
    }

    fn zone_lookup(kind: ShapeKind, zone: &str) -> Result<Self, ClientError> {
        let zone = zone.trim();
        if zone.is_empty() {
            let e = ClientError::builder(kind.name(), "zone must not be empty");
            log_build_failure(kind.name(), &e);
            return Err(e);
        }
        compose(kind, &ParameterSet::new().with("zone", zone), &SystemClock)
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Renders the full request URL against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Builder`] if the shape cannot be rendered.
    pub fn url(&self, config: &ClientConfig) -> Result<String, ClientError> {
        let def = self.kind.def();
        let base = match def.provider {
            Provider::Prayer => &config.prayer_base_url,
            Provider::Quran => &config.quran_base_url,
        };
        let template = format!("{base}/{}", def.template);
        render_with(&template, &self.params, config.omission)
    }

    /// Renders and fetches this request.
    ///
    /// `Ok(None)` means the provider returned nothing usable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] when the provider reports failure, and
    /// the errors of [`url`](Self::url) and
    /// [`ContentFetcher::fetch`](crate::fetch::ContentFetcher::fetch).
    #[instrument(skip(self, fetcher), fields(shape = self.name()))]
    pub async fn get(&self, fetcher: &ContentFetcher) -> Result<Option<Value>, ClientError> {
        let url = self.url(fetcher.config()).inspect_err(|e| {
            error!(shape = self.name(), error = %e, "Request shape failed to render");
        })?;
        debug!(url = %url, "Rendered request URL");
        fetcher.fetch(&url).await
    }
}

/// Where prayer times are computed for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    Address(String),
    City {
        city: String,
        country: String,
        state: Option<String>,
    },
}

impl Location {
    #[must_use]
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn address(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }

    #[must_use]
    pub fn city(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self::City {
            city: city.into(),
            country: country.into(),
            state: None,
        }
    }

    /// Adds a state/region to a city location; other variants are unchanged.
    #[must_use]
    pub fn with_state(self, state: impl Into<String>) -> Self {
        match self {
            Self::City { city, country, .. } => Self::City {
                city,
                country,
                state: Some(state.into()),
            },
            other => other,
        }
    }

    fn apply(&self, mut params: ParameterSet) -> ParameterSet {
        match self {
            Self::Coordinates {
                latitude,
                longitude,
            } => params.with("latitude", *latitude).with("longitude", *longitude),
            Self::Address(address) => params.with("address", address.as_str()),
            Self::City {
                city,
                country,
                state,
            } => {
                params = params.with("city", city.as_str()).with("country", country.as_str());
                if let Some(state) = state {
                    params = params.with("state", state.as_str());
                }
                params
            }
        }
    }
}

/// Calculation settings shared by calendar and timings shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSettings {
    /// Calculation method code; [`CUSTOM_METHOD`] by default.
    pub method: i64,
    /// Comma-separated minute offsets per prayer.
    pub tune: Option<String>,
    /// Juristic school for Asr (0 Shafi, 1 Hanafi).
    pub school: Option<i64>,
    pub midnight_mode: Option<i64>,
    /// IANA zone; also the zone used for computed date defaults.
    pub timezonestr: Option<String>,
    pub latitude_adjustment_method: Option<i64>,
    /// Hijri date adjustment in days.
    pub adjustment: Option<i64>,
}

impl Default for PrayerSettings {
    fn default() -> Self {
        Self {
            method: CUSTOM_METHOD,
            tune: None,
            school: None,
            midnight_mode: None,
            timezonestr: None,
            latitude_adjustment_method: None,
            adjustment: None,
        }
    }
}

impl PrayerSettings {
    fn apply(&self, mut params: ParameterSet) -> ParameterSet {
        params = params.with("method", self.method);
        let optional: [(&'static str, Option<ParamValue>); 6] = [
            ("tune", self.tune.clone().map(ParamValue::from)),
            ("school", self.school.map(ParamValue::from)),
            ("midnight_mode", self.midnight_mode.map(ParamValue::from)),
            (TIMEZONE_PARAM, self.timezonestr.clone().map(ParamValue::from)),
            (
                "latitude_adjustment_method",
                self.latitude_adjustment_method.map(ParamValue::from),
            ),
            ("adjustment", self.adjustment.map(ParamValue::from)),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                params = params.with(name, value);
            }
        }
        params
    }
}

/// Monthly calendar request (Gregorian or Hijri month numbering).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarQuery {
    pub location: Location,
    /// Defaults to the current month in the settings' zone.
    pub month: Option<u32>,
    /// Defaults to the current year in the settings' zone.
    pub year: Option<i32>,
    pub annual: Option<bool>,
    pub settings: PrayerSettings,
}

impl CalendarQuery {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location,
            month: None,
            year: None,
            annual: None,
            settings: PrayerSettings::default(),
        }
    }

    #[must_use]
    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn annual(mut self, annual: bool) -> Self {
        self.annual = Some(annual);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PrayerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Gregorian calendar shape for this query.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn gregorian(&self) -> Result<RequestShape, ClientError> {
        self.gregorian_with(&SystemClock)
    }

    /// Like [`gregorian`](Self::gregorian) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn gregorian_with(&self, clock: &dyn Clock) -> Result<RequestShape, ClientError> {
        self.build(false, clock)
    }

    /// Hijri calendar shape for this query.
    ///
    /// Month and year default to the current *Gregorian* fields.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn hijri(&self) -> Result<RequestShape, ClientError> {
        self.hijri_with(&SystemClock)
    }

    /// Like [`hijri`](Self::hijri) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn hijri_with(&self, clock: &dyn Clock) -> Result<RequestShape, ClientError> {
        self.build(true, clock)
    }

    fn build(&self, hijri: bool, clock: &dyn Clock) -> Result<RequestShape, ClientError> {
        let kind = match (&self.location, hijri) {
            (Location::Coordinates { .. }, false) => ShapeKind::Calendar,
            (Location::Address(_), false) => ShapeKind::CalendarByAddress,
            (Location::City { .. }, false) => ShapeKind::CalendarByCity,
            (Location::Coordinates { .. }, true) => ShapeKind::HijriCalendar,
            (Location::Address(_), true) => ShapeKind::HijriCalendarByAddress,
            (Location::City { .. }, true) => ShapeKind::HijriCalendarByCity,
        };

        let mut supplied = self.location.apply(ParameterSet::new());
        if let Some(month) = self.month {
            supplied = supplied.with("month", month);
        }
        if let Some(year) = self.year {
            supplied = supplied.with("year", year);
        }
        if let Some(annual) = self.annual {
            supplied = supplied.with("annual", annual);
        }
        let supplied = self.settings.apply(supplied);
        compose(kind, &supplied, clock)
    }
}

/// Single-day timings request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingsQuery {
    pub location: Location,
    /// `DD-MM-YYYY` date or Unix timestamp; defaults to now.
    pub date_or_timestamp: Option<String>,
    pub settings: PrayerSettings,
}

impl TimingsQuery {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location,
            date_or_timestamp: None,
            settings: PrayerSettings::default(),
        }
    }

    #[must_use]
    pub fn date(mut self, date_or_timestamp: impl Into<String>) -> Self {
        self.date_or_timestamp = Some(date_or_timestamp.into());
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PrayerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Timings shape for this query.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn build(&self) -> Result<RequestShape, ClientError> {
        self.build_with(&SystemClock)
    }

    /// Like [`build`](Self::build) with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn build_with(&self, clock: &dyn Clock) -> Result<RequestShape, ClientError> {
        let kind = match &self.location {
            Location::Coordinates { .. } => ShapeKind::Timings,
            Location::Address(_) => ShapeKind::TimingsByAddress,
            Location::City { .. } => ShapeKind::TimingsByCity,
        };
        let mut supplied = self.settings.apply(self.location.apply(ParameterSet::new()));
        supplied.set_positional(self.date_or_timestamp.clone().map(ParamValue::from));
        compose(kind, &supplied, clock)
    }
}
