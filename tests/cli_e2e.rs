//! End-to-end CLI tests for the aladhan binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn aladhan() -> Command {
    let mut cmd = Command::cargo_bin("aladhan").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("ALADHAN_BASE_URL")
        .env_remove("ALQURAN_BASE_URL");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    aladhan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prayer-times"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    aladhan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aladhan"));
}

/// Test that running without a subcommand fails with usage.
#[test]
fn test_binary_without_subcommand_returns_error() {
    aladhan()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_url_calendar_prints_ordered_query() {
    aladhan()
        .args([
            "url", "calendar", "--lat", "41.3", "--lon", "69.2", "--month", "5", "--year", "2024",
            "--method", "2",
        ])
        .assert()
        .success()
        .stdout(
            "http://api.aladhan.com/v1/calendar?latitude=41.3&longitude=69.2&month=5&year=2024&method=2\n",
        );
}

#[test]
fn test_url_timings_by_city_uses_date_path() {
    aladhan()
        .args([
            "url", "timings", "--city", "Tashkent", "--country", "UZ", "--date", "01-06-2024",
            "--method", "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/timingsByCity/01-06-2024?city=Tashkent&country=UZ&method=3",
        ));
}

#[test]
fn test_url_respects_base_url_env() {
    aladhan()
        .env("ALADHAN_BASE_URL", "http://localhost:9999/v1/")
        .args(["url", "hijri-calendar", "--address", "Makkah", "--month", "9", "--year", "1445"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "http://localhost:9999/v1/hijriCalendarByAddress?address=Makkah&month=9&year=1445",
        ));
}

#[test]
fn test_invalid_base_url_env_fails() {
    aladhan()
        .env("ALADHAN_BASE_URL", "ftp://example.com")
        .args(["url", "calendar", "--address", "Makkah"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid client configuration"));
}

#[test]
fn test_calendar_without_location_fails() {
    aladhan()
        .args(["calendar", "--month", "1", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("location is required"));
}

#[test]
fn test_sura_number_out_of_range_fails() {
    aladhan()
        .args(["sura", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_methods_prints_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/methods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"code": 200, "status": "OK", "data": {"MWL": {"id": 3}}}),
        ))
        .mount(&server)
        .await;

    aladhan()
        .env("ALADHAN_BASE_URL", server.uri())
        .arg("methods")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MWL\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_current_date_remote_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currentDate"))
        .and(query_param("zone", "Mars/Olympus"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": 400, "status": "Invalid zone"})),
        )
        .mount(&server)
        .await;

    aladhan()
        .env("ALADHAN_BASE_URL", server.uri())
        .args(["current-date", "--zone", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid zone"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sura_prints_numbered_verses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surah/108/editions/quran-simple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "OK",
            "data": [{"ayahs": [{"text": "one"}, {"text": "two"}, {"text": "three"}]}]
        })))
        .mount(&server)
        .await;

    aladhan()
        .env("ALQURAN_BASE_URL", server.uri())
        .args(["sura", "108"])
        .assert()
        .success()
        .stdout("1. one\n2. two\n3. three\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_response_reports_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currentTime"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    aladhan()
        .env("ALADHAN_BASE_URL", server.uri())
        .args(["current-time", "--zone", "Asia/Tashkent"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No content returned."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transliterated_sura_prints_latin_script() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surah/1/editions/uz.sodik"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "OK",
            "data": [{"ayahs": [
                {"text": "Меҳрибон ва раҳмли Аллоҳ номи билан бошлайман."},
                {"text": "Ҳамд оламлар Роббиси Аллоҳга хосдир."}
            ]}]
        })))
        .mount(&server)
        .await;

    aladhan()
        .env("ALQURAN_BASE_URL", server.uri())
        .args(["sura", "1", "--transliterated"])
        .assert()
        .success()
        .stdout(
            "1. Mehribon va rahmli Alloh nomi bilan boshlayman.\n\
             2. Hamd olamlar Robbisi Allohga xosdir.\n",
        );
}
