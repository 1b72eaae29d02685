//! User-Agent string for the shared session.

/// Product token sent with every provider request.
const PRODUCT: &str = "aladhan-client";

/// Default User-Agent for all provider requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version} (prayer-times-client)")
}
