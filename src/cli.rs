//! CLI argument definitions using clap derive macros.

use anyhow::{Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};

use aladhan_client::{CalendarQuery, Location, PrayerSettings, RequestShape, TimingsQuery};

/// Query the Aladhan prayer-times and AlQuran Cloud APIs.
#[derive(Parser, Debug)]
#[command(name = "aladhan")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prayer times for a Gregorian month
    Calendar(CalendarArgs),
    /// Prayer times for a Hijri month
    HijriCalendar(CalendarArgs),
    /// Prayer times for one day
    Timings(TimingsArgs),
    /// Current date in a time zone
    CurrentDate(ZoneArgs),
    /// Current time in a time zone
    CurrentTime(ZoneArgs),
    /// Current Unix timestamp for a time zone
    CurrentTimestamp(ZoneArgs),
    /// List calculation methods
    Methods,
    /// Verse texts of a chapter
    Sura {
        /// Chapter number (1-114)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=114))]
        number: u32,

        /// Fetch the Uzbek edition and print it in Latin script
        #[arg(long)]
        transliterated: bool,
    },
    /// Print the request URL for a prayer-time command without sending it
    Url {
        #[command(subcommand)]
        command: UrlCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrlCommand {
    Calendar(CalendarArgs),
    HijriCalendar(CalendarArgs),
    Timings(TimingsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LocationArgs {
    /// Latitude (with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Free-form address
    #[arg(long, conflicts_with_all = ["lat", "city"])]
    pub address: Option<String>,

    /// City name (with --country)
    #[arg(long, requires = "country", conflicts_with = "lat")]
    pub city: Option<String>,

    /// Country name or ISO code
    #[arg(long, requires = "city")]
    pub country: Option<String>,

    /// State or region
    #[arg(long, requires = "city")]
    pub state: Option<String>,
}

impl LocationArgs {
    pub fn to_location(&self) -> Result<Location> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(Location::coordinates(lat, lon));
        }
        if let Some(address) = &self.address {
            return Ok(Location::address(address.clone()));
        }
        if let (Some(city), Some(country)) = (&self.city, &self.country) {
            let location = Location::city(city.clone(), country.clone());
            return Ok(match &self.state {
                Some(state) => location.with_state(state.clone()),
                None => location,
            });
        }
        bail!("a location is required: --lat/--lon, --address, or --city/--country")
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SettingsArgs {
    /// Calculation method code (99 = custom angles)
    #[arg(long, default_value_t = aladhan_client::shapes::CUSTOM_METHOD)]
    pub method: i64,

    /// Per-prayer minute offsets, comma separated
    #[arg(long)]
    pub tune: Option<String>,

    /// Asr school (0 Shafi, 1 Hanafi)
    #[arg(long)]
    pub school: Option<i64>,

    /// Midnight mode (0 standard, 1 Jafari)
    #[arg(long)]
    pub midnight_mode: Option<i64>,

    /// IANA time zone, also used for computed date defaults
    #[arg(long = "timezone")]
    pub timezonestr: Option<String>,

    /// Higher-latitude adjustment method
    #[arg(long)]
    pub latitude_adjustment_method: Option<i64>,

    /// Hijri date adjustment in days
    #[arg(long, allow_hyphen_values = true)]
    pub adjustment: Option<i64>,
}

impl From<&SettingsArgs> for PrayerSettings {
    fn from(args: &SettingsArgs) -> Self {
        Self {
            method: args.method,
            tune: args.tune.clone(),
            school: args.school,
            midnight_mode: args.midnight_mode,
            timezonestr: args.timezonestr.clone(),
            latitude_adjustment_method: args.latitude_adjustment_method,
            adjustment: args.adjustment,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Month (1-12); defaults to the current month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Year; defaults to the current year
    #[arg(long)]
    pub year: Option<i32>,

    /// Return the whole year
    #[arg(long)]
    pub annual: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl CalendarArgs {
    pub fn to_query(&self) -> Result<CalendarQuery> {
        let mut query = CalendarQuery::new(self.location.to_location()?)
            .settings(PrayerSettings::from(&self.settings));
        query.month = self.month;
        query.year = self.year;
        if self.annual {
            query.annual = Some(true);
        }
        Ok(query)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TimingsArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Date as DD-MM-YYYY or a Unix timestamp; defaults to now
    #[arg(long)]
    pub date: Option<String>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl TimingsArgs {
    pub fn to_shape(&self) -> Result<RequestShape> {
        let mut query = TimingsQuery::new(self.location.to_location()?)
            .settings(PrayerSettings::from(&self.settings));
        query.date_or_timestamp = self.date.clone();
        Ok(query.build()?)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ZoneArgs {
    /// IANA time zone, e.g. Asia/Tashkent
    #[arg(long)]
    pub zone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_calendar_coordinates_parse() {
        let args = Args::try_parse_from([
            "aladhan", "calendar", "--lat", "41.3", "--lon", "69.2", "--month", "5", "--year",
            "2024", "--method", "2",
        ])
        .unwrap();
        let Command::Calendar(calendar) = args.command else {
            panic!("expected calendar command");
        };
        let query = calendar.to_query().unwrap();
        assert_eq!(query.location, Location::coordinates(41.3, 69.2));
        assert_eq!(query.month, Some(5));
        assert_eq!(query.settings.method, 2);
        assert_eq!(query.annual, None);
    }

    #[test]
    fn test_cli_negative_coordinates_accepted() {
        let args = Args::try_parse_from([
            "aladhan", "timings", "--lat", "-33.86", "--lon", "151.2", "--date", "01-01-2025",
        ])
        .unwrap();
        let Command::Timings(timings) = args.command else {
            panic!("expected timings command");
        };
        assert_eq!(timings.location.lat, Some(-33.86));
        assert_eq!(timings.settings.method, 99);
    }

    #[test]
    fn test_cli_city_requires_country() {
        let result = Args::try_parse_from(["aladhan", "calendar", "--city", "Tashkent"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_missing_location_is_reported() {
        let args = Args::try_parse_from(["aladhan", "calendar"]).unwrap();
        let Command::Calendar(calendar) = args.command else {
            panic!("expected calendar command");
        };
        let err = calendar.to_query().unwrap_err();
        assert!(err.to_string().contains("location is required"));
    }

    #[test]
    fn test_cli_sura_range_checked() {
        assert!(Args::try_parse_from(["aladhan", "sura", "115"]).is_err());
        let args = Args::try_parse_from(["aladhan", "sura", "1", "--transliterated"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Sura {
                number: 1,
                transliterated: true
            }
        ));
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let args = Args::try_parse_from(["aladhan", "methods", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["aladhan", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
