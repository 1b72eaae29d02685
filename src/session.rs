//! Single shared HTTP session with lazy creation and replace-on-close.
//!
//! [`SessionManager::acquire`] hands out clones of one [`SessionHandle`]
//! (one `reqwest` connection pool). The handle is built on first use and
//! rebuilt only after [`SessionManager::close`] or [`SessionHandle::close`].
//! The check-and-replace runs under a mutex with no await inside, so at most
//! one live session exists even on a multi-threaded runtime.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::SessionError;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Shared handle to the live HTTP session.
///
/// Clones share the same client, identity and closed flag.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: u64,
    client: Client,
    closed: Arc<AtomicBool>,
}

impl SessionHandle {
    fn new(client: Client) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            client,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Process-unique identity of this session instance.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Marks the session closed; the next acquisition builds a new one.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Owner of the shared session slot.
#[derive(Debug)]
pub struct SessionManager {
    config: ClientConfig,
    slot: Mutex<Option<SessionHandle>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the live session, creating it if none exists or the current
    /// one was closed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the HTTP client cannot be built; the
    /// failure is logged and the slot stays empty.
    pub fn acquire(&self) -> Result<SessionHandle, SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionError::new("session slot lock poisoned"))?;

        if let Some(handle) = slot.as_ref()
            && !handle.is_closed()
        {
            return Ok(handle.clone());
        }

        match build_session_client(&self.config) {
            Ok(client) => {
                let handle = SessionHandle::new(client);
                info!(session_id = handle.id(), "New session created");
                *slot = Some(handle.clone());
                Ok(handle)
            }
            Err(error) => {
                warn!(error = %error, "HTTP session creation failed");
                *slot = None;
                Err(error)
            }
        }
    }

    /// Closes the current session, if any.
    pub fn close(&self) {
        if let Ok(slot) = self.slot.lock()
            && let Some(handle) = slot.as_ref()
        {
            handle.close();
        }
    }
}

/// Proxy variables consulted when system proxy discovery is skipped.
const HTTPS_PROXY_VARS: &[&str] = &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"];
const HTTP_PROXY_VARS: &[&str] = &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"];

enum BuildAttempt {
    Built(Client),
    Failed(reqwest::Error),
    Panicked,
}

/// Builds the session client. If system proxy discovery panics, builds
/// once more with proxies taken from the environment only.
fn build_session_client(config: &ClientConfig) -> Result<Client, SessionError> {
    for env_proxies_only in [false, true] {
        match attempt_build(config, env_proxies_only) {
            BuildAttempt::Built(client) => return Ok(client),
            BuildAttempt::Failed(error) => {
                return Err(SessionError::new(format!(
                    "HTTP client construction failed: {error}"
                )));
            }
            BuildAttempt::Panicked if !env_proxies_only => {
                warn!("Proxy discovery panicked; rebuilding session client with environment proxies");
            }
            BuildAttempt::Panicked => {}
        }
    }
    Err(SessionError::new("HTTP client construction panicked"))
}

fn attempt_build(config: &ClientConfig, env_proxies_only: bool) -> BuildAttempt {
    let built = catch_unwind(AssertUnwindSafe(|| {
        let builder = session_builder(config);
        if env_proxies_only {
            with_env_proxies(builder.no_proxy()).build()
        } else {
            builder.build()
        }
    }));
    match built {
        Ok(Ok(client)) => BuildAttempt::Built(client),
        Ok(Err(error)) => BuildAttempt::Failed(error),
        Err(_) => BuildAttempt::Panicked,
    }
}

fn session_builder(config: &ClientConfig) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .user_agent(config.user_agent.clone())
        .gzip(true)
}

fn with_env_proxies(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = first_env_value(HTTPS_PROXY_VARS).and_then(|url| Proxy::https(&url).ok()) {
        builder = builder.proxy(proxy);
    }
    if let Some(proxy) = first_env_value(HTTP_PROXY_VARS).and_then(|url| Proxy::http(&url).ok()) {
        builder = builder.proxy(proxy);
    }
    builder
}

fn first_env_value(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
