//! Static table of request shapes: template, ordered parameter schema,
//! positional slot and date-default rules per remote endpoint.

use crate::clock::DateField;

/// Which configured base URL a shape's template is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Aladhan prayer-times API.
    Prayer,
    /// AlQuran Cloud API.
    Quran,
}

/// One declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    pub name: &'static str,
    pub required: bool,
}

const fn req(name: &'static str) -> ParamDef {
    ParamDef {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> ParamDef {
    ParamDef {
        name,
        required: false,
    }
}

/// When a date-default rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultWhen {
    /// Value unset, empty or zero.
    Falsy,
    /// Value unset only.
    Unset,
}

/// Fills `name` from the clock when the caller did not provide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateDefault {
    pub name: &'static str,
    pub field: DateField,
    pub when: DefaultWhen,
}

/// Definition of one request shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeDef {
    pub name: &'static str,
    pub provider: Provider,
    /// Path relative to the provider base URL, including its query prefix.
    pub template: &'static str,
    /// Query parameters in emission order.
    pub params: &'static [ParamDef],
    /// Name of the value substituted into the template placeholder.
    pub positional: Option<&'static str>,
    pub date_defaults: &'static [DateDefault],
}

/// Positional parameter of the timings shapes.
pub const DATE_OR_TIMESTAMP: &str = "date_or_timestamp";

/// Positional parameter of the sura text shapes.
pub const SURA: &str = "sura";

/// Parameter holding the caller's IANA zone.
pub const TIMEZONE_PARAM: &str = "timezonestr";

macro_rules! with_prayer_settings {
    ($($head:expr),* $(,)?) => {
        &[
            $($head,)*
            opt("method"),
            opt("tune"),
            opt("school"),
            opt("midnight_mode"),
            opt(TIMEZONE_PARAM),
            opt("latitude_adjustment_method"),
            opt("adjustment"),
            opt("method_settings"),
        ]
    };
}

const COORDINATE_CALENDAR: &[ParamDef] = with_prayer_settings![
    req("latitude"),
    req("longitude"),
    req("month"),
    req("year"),
    opt("annual"),
];

const ADDRESS_CALENDAR: &[ParamDef] =
    with_prayer_settings![req("address"), req("month"), req("year"), opt("annual")];

const CITY_CALENDAR: &[ParamDef] = with_prayer_settings![
    req("city"),
    req("country"),
    opt("state"),
    req("month"),
    req("year"),
    opt("annual"),
];

const COORDINATE_TIMINGS: &[ParamDef] = with_prayer_settings![req("latitude"), req("longitude")];

const ADDRESS_TIMINGS: &[ParamDef] = with_prayer_settings![req("address")];

const CITY_TIMINGS: &[ParamDef] =
    with_prayer_settings![req("city"), req("country"), opt("state")];

const ZONE_ONLY: &[ParamDef] = &[req("zone")];

const MONTH_YEAR_DEFAULTS: &[DateDefault] = &[
    DateDefault {
        name: "month",
        field: DateField::Month,
        when: DefaultWhen::Falsy,
    },
    DateDefault {
        name: "year",
        field: DateField::Year,
        when: DefaultWhen::Falsy,
    },
];

const TIMESTAMP_DEFAULT: &[DateDefault] = &[DateDefault {
    name: DATE_OR_TIMESTAMP,
    field: DateField::Timestamp,
    when: DefaultWhen::Unset,
}];

const fn calendar(
    name: &'static str,
    template: &'static str,
    params: &'static [ParamDef],
) -> ShapeDef {
    ShapeDef {
        name,
        provider: Provider::Prayer,
        template,
        params,
        positional: None,
        date_defaults: MONTH_YEAR_DEFAULTS,
    }
}

const fn timings(
    name: &'static str,
    template: &'static str,
    params: &'static [ParamDef],
) -> ShapeDef {
    ShapeDef {
        name,
        provider: Provider::Prayer,
        template,
        params,
        positional: Some(DATE_OR_TIMESTAMP),
        date_defaults: TIMESTAMP_DEFAULT,
    }
}

const fn zone_lookup(name: &'static str, template: &'static str) -> ShapeDef {
    ShapeDef {
        name,
        provider: Provider::Prayer,
        template,
        params: ZONE_ONLY,
        positional: None,
        date_defaults: &[],
    }
}

const fn sura_edition(name: &'static str, template: &'static str) -> ShapeDef {
    ShapeDef {
        name,
        provider: Provider::Quran,
        template,
        params: &[],
        positional: Some(SURA),
        date_defaults: &[],
    }
}

static CALENDAR: ShapeDef = calendar("calendar", "calendar?", COORDINATE_CALENDAR);
static CALENDAR_BY_ADDRESS: ShapeDef =
    calendar("calendar_by_address", "calendarByAddress?", ADDRESS_CALENDAR);
static CALENDAR_BY_CITY: ShapeDef = calendar("calendar_by_city", "calendarByCity?", CITY_CALENDAR);
static HIJRI_CALENDAR: ShapeDef = calendar("hijri_calendar", "hijriCalendar?", COORDINATE_CALENDAR);
static HIJRI_CALENDAR_BY_ADDRESS: ShapeDef = calendar(
    "hijri_calendar_by_address",
    "hijriCalendarByAddress?",
    ADDRESS_CALENDAR,
);
static HIJRI_CALENDAR_BY_CITY: ShapeDef =
    calendar("hijri_calendar_by_city", "hijriCalendarByCity?", CITY_CALENDAR);
static TIMINGS: ShapeDef = timings("timings", "timings/{timestamp}?", COORDINATE_TIMINGS);
static TIMINGS_BY_ADDRESS: ShapeDef = timings(
    "timings_by_address",
    "timingsByAddress/{timestamp}?",
    ADDRESS_TIMINGS,
);
static TIMINGS_BY_CITY: ShapeDef =
    timings("timings_by_city", "timingsByCity/{timestamp}?", CITY_TIMINGS);
static CURRENT_DATE: ShapeDef = zone_lookup("current_date", "currentDate?");
static CURRENT_TIME: ShapeDef = zone_lookup("current_time", "currentTime?");
static CURRENT_TIMESTAMP: ShapeDef = zone_lookup("current_timestamp", "currentTimestamp?");
static METHODS: ShapeDef = ShapeDef {
    name: "methods",
    provider: Provider::Prayer,
    template: "methods",
    params: &[],
    positional: None,
    date_defaults: &[],
};
static SURA_SOURCE: ShapeDef =
    sura_edition("sura_source", "surah/{sura}/editions/quran-simple");
static SURA_TRANSLITERATED: ShapeDef =
    sura_edition("sura_transliterated", "surah/{sura}/editions/uz.sodik");

/// Every remote operation this crate can shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Calendar,
    CalendarByAddress,
    CalendarByCity,
    HijriCalendar,
    HijriCalendarByAddress,
    HijriCalendarByCity,
    Timings,
    TimingsByAddress,
    TimingsByCity,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    Methods,
    SuraSource,
    SuraTransliterated,
}

impl ShapeKind {
    pub const ALL: [Self; 15] = [
        Self::Calendar,
        Self::CalendarByAddress,
        Self::CalendarByCity,
        Self::HijriCalendar,
        Self::HijriCalendarByAddress,
        Self::HijriCalendarByCity,
        Self::Timings,
        Self::TimingsByAddress,
        Self::TimingsByCity,
        Self::CurrentDate,
        Self::CurrentTime,
        Self::CurrentTimestamp,
        Self::Methods,
        Self::SuraSource,
        Self::SuraTransliterated,
    ];

    #[must_use]
    pub fn def(self) -> &'static ShapeDef {
        match self {
            Self::Calendar => &CALENDAR,
            Self::CalendarByAddress => &CALENDAR_BY_ADDRESS,
            Self::CalendarByCity => &CALENDAR_BY_CITY,
            Self::HijriCalendar => &HIJRI_CALENDAR,
            Self::HijriCalendarByAddress => &HIJRI_CALENDAR_BY_ADDRESS,
            Self::HijriCalendarByCity => &HIJRI_CALENDAR_BY_CITY,
            Self::Timings => &TIMINGS,
            Self::TimingsByAddress => &TIMINGS_BY_ADDRESS,
            Self::TimingsByCity => &TIMINGS_BY_CITY,
            Self::CurrentDate => &CURRENT_DATE,
            Self::CurrentTime => &CURRENT_TIME,
            Self::CurrentTimestamp => &CURRENT_TIMESTAMP,
            Self::Methods => &METHODS,
            Self::SuraSource => &SURA_SOURCE,
            Self::SuraTransliterated => &SURA_TRANSLITERATED,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::query::query_name;

    #[test]
    fn test_query_names_are_unique_per_shape() {
        for kind in ShapeKind::ALL {
            let def = kind.def();
            let emitted: HashSet<String> = def.params.iter().map(|p| query_name(p.name)).collect();
            assert_eq!(
                emitted.len(),
                def.params.len(),
                "two parameters of {} collapse to one query name",
                def.name
            );
        }
    }

    #[test]
    fn test_templates_have_placeholder_iff_positional() {
        for kind in ShapeKind::ALL {
            let def = kind.def();
            assert_eq!(
                def.template.contains('{'),
                def.positional.is_some(),
                "{}",
                def.name
            );
        }
    }

    #[test]
    fn test_date_defaults_target_declared_or_positional_names() {
        for kind in ShapeKind::ALL {
            let def = kind.def();
            for default in def.date_defaults {
                let declared = def.params.iter().any(|p| p.name == default.name);
                assert!(
                    declared || def.positional == Some(default.name),
                    "{} defaults undeclared '{}'",
                    def.name,
                    default.name
                );
            }
        }
    }

    #[test]
    fn test_shape_names_are_unique() {
        let names: HashSet<&str> = ShapeKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), ShapeKind::ALL.len());
    }

    #[test]
    fn test_calendar_schema_order() {
        let names: Vec<&str> = ShapeKind::Calendar.def().params.iter().map(|p| p.name).collect();
        assert_eq!(
            &names[..6],
            &["latitude", "longitude", "month", "year", "annual", "method"]
        );
        assert_eq!(names.last(), Some(&"method_settings"));
    }
}
