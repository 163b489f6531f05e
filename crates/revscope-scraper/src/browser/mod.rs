//! Browser capability consumed by the extraction pipeline.
//!
//! A [`Browser`] opens one [`PageSession`] per pipeline run. The session is a
//! scoped resource: whoever opens it must call [`PageSession::close`] on every
//! exit path.

mod chromium;
mod static_pages;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::ScraperError;

pub use chromium::ChromiumBrowser;
pub use static_pages::StaticBrowser;

/// Launch options for a real browser engine.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Explicit Chromium binary. Auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Upper bound the engine applies to each navigation/protocol request.
    pub navigation_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Factory for page sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens `url` in a fresh session and waits for it to finish loading.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Launch`] if the engine cannot start,
    /// [`ScraperError::Navigation`] if the page fails to load. No session is
    /// leaked on failure.
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, ScraperError>;
}

/// One live page. Every call suspends until the engine answers.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// URL of the currently loaded document, if known.
    async fn current_url(&self) -> Option<String>;

    /// HTML snapshot of the current DOM.
    async fn content(&self) -> Result<String, ScraperError>;

    /// Whether any element matches `selector`.
    async fn exists(&self, selector: &str) -> Result<bool, ScraperError>;

    /// Clicks the first element matching `selector` and returns only after the
    /// navigation it triggers has finished loading. The click is issued once.
    async fn click_and_wait(&mut self, selector: &str) -> Result<(), ScraperError>;

    /// Releases the session and any engine process behind it.
    async fn close(self: Box<Self>) -> Result<(), ScraperError>;
}

/// Resolves a link's `href` against the URL of the page it was found on.
///
/// # Errors
///
/// [`ScraperError::Navigation`] when `base` is not an absolute URL or `href`
/// cannot be joined onto it.
pub fn resolve_link(base: &str, href: &str) -> Result<String, ScraperError> {
    let navigation_error = |e: url::ParseError| ScraperError::Navigation {
        url: href.to_string(),
        reason: format!("cannot resolve link against {base}: {e}"),
    };
    let href = href.trim();
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.into());
    }
    let base = Url::parse(base).map_err(navigation_error)?;
    let target = base.join(href).map_err(navigation_error)?;
    Ok(target.into())
}
