//! CLI entry point for the aladhan client.

use anyhow::{Context, Result};
use clap::Parser;
use aladhan_client::{ClientConfig, ContentFetcher, RequestShape, SuraText, UzbekLatin};
use serde_json::Value;
use tracing::{debug, info};

mod cli;

use cli::{Args, Command, UrlCommand};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = ClientConfig::from_env().context("invalid client configuration")?;

    let shape = match &args.command {
        Command::Url { command } => {
            let shape = match command {
                UrlCommand::Calendar(calendar) => calendar.to_query()?.gregorian()?,
                UrlCommand::HijriCalendar(calendar) => calendar.to_query()?.hijri()?,
                UrlCommand::Timings(timings) => timings.to_shape()?,
            };
            println!("{}", shape.url(&config)?);
            return Ok(());
        }
        Command::Sura {
            number,
            transliterated,
        } => {
            let fetcher = ContentFetcher::new(config);
            return print_sura(&fetcher, *number, *transliterated).await;
        }
        Command::Calendar(calendar) => calendar.to_query()?.gregorian()?,
        Command::HijriCalendar(calendar) => calendar.to_query()?.hijri()?,
        Command::Timings(timings) => timings.to_shape()?,
        Command::CurrentDate(zone) => RequestShape::current_date(&zone.zone)?,
        Command::CurrentTime(zone) => RequestShape::current_time(&zone.zone)?,
        Command::CurrentTimestamp(zone) => RequestShape::current_timestamp(&zone.zone)?,
        Command::Methods => RequestShape::methods(),
    };

    let fetcher = ContentFetcher::new(config);
    let payload = shape
        .get(&fetcher)
        .await
        .with_context(|| format!("{} request failed", shape.name()))?;
    print_payload(payload.as_ref())
}

async fn print_sura(fetcher: &ContentFetcher, number: u32, transliterated: bool) -> Result<()> {
    let sura = SuraText::new(fetcher.clone(), UzbekLatin);
    let verses = if transliterated {
        sura.transliterated(number).await?
    } else {
        sura.source(number).await?
    };

    let Some(verses) = verses else {
        info!(sura = number, "No content returned");
        eprintln!("No content returned.");
        return Ok(());
    };
    for (index, text) in verses.iter().enumerate() {
        println!("{}. {text}", index + 1);
    }
    Ok(())
}

fn print_payload(payload: Option<&Value>) -> Result<()> {
    match payload {
        Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
        None => eprintln!("No content returned."),
    }
    Ok(())
}
