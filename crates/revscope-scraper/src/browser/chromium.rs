//! Headless Chromium sessions driven over the DevTools protocol.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{resolve_link, Browser, BrowserOptions, PageSession};
use crate::error::ScraperError;

const URL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches one Chromium process per opened session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumBrowser {
    options: BrowserOptions,
}

impl ChromiumBrowser {
    #[must_use]
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    fn config(&self) -> Result<BrowserConfig, ScraperError> {
        let mut builder = BrowserConfig::builder().request_timeout(self.options.navigation_timeout);
        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(ScraperError::Launch)
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, ScraperError> {
        let (browser, mut handler) = CdpBrowser::launch(self.config()?)
            .await
            .map_err(|e| ScraperError::Launch(e.to_string()))?;

        // The protocol handler must be polled for the browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler event error");
                }
            }
        });

        let page = match load_page(&browser, url).await {
            Ok(page) => page,
            Err(e) => {
                shutdown(browser, handler_task).await;
                return Err(e);
            }
        };

        tracing::debug!(url, "page session opened");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            navigation_timeout: self.options.navigation_timeout,
        }))
    }
}

async fn load_page(browser: &CdpBrowser, url: &str) -> Result<Page, ScraperError> {
    let navigation_error = |e: chromiumoxide::error::CdpError| ScraperError::Navigation {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let page = browser.new_page(url).await.map_err(navigation_error)?;
    page.wait_for_navigation().await.map_err(navigation_error)?;
    Ok(page)
}

async fn shutdown(mut browser: CdpBrowser, handler_task: JoinHandle<()>) -> Option<String> {
    let close_error = browser.close().await.err().map(|e| e.to_string());
    if let Err(e) = browser.wait().await {
        tracing::debug!(error = %e, "browser process did not exit cleanly");
    }
    handler_task.abort();
    close_error
}

struct ChromiumSession {
    browser: CdpBrowser,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    /// Waits until the main frame has left `from` and the new document has
    /// loaded. Used for controls that navigate from script.
    async fn wait_for_url_change(&self, from: &str) -> Result<(), ScraperError> {
        let left_page = async {
            loop {
                if let Some(url) = self.current_url().await {
                    if url != from {
                        break;
                    }
                }
                tokio::time::sleep(URL_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(self.navigation_timeout, left_page)
            .await
            .map_err(|_| ScraperError::Navigation {
                url: from.to_string(),
                reason: "click did not start a navigation".to_string(),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Navigation {
                url: from.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// The http(s) URL a link points at, resolved against `current`. `None` for
/// fragment, script and missing hrefs.
fn link_target(current: &str, href: Option<&str>) -> Option<String> {
    let href = href
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))?;
    let target = resolve_link(current, href).ok()?;
    (target.starts_with("http://") || target.starts_with("https://")).then_some(target)
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn current_url(&self) -> Option<String> {
        self.page.url().await.ok().flatten()
    }

    async fn content(&self) -> Result<String, ScraperError> {
        self.page
            .content()
            .await
            .map_err(|e| ScraperError::Browser(e.to_string()))
    }

    async fn exists(&self, selector: &str) -> Result<bool, ScraperError> {
        self.page
            .find_elements(selector)
            .await
            .map(|elements| !elements.is_empty())
            .map_err(|e| ScraperError::Browser(e.to_string()))
    }

    async fn click_and_wait(&mut self, selector: &str) -> Result<(), ScraperError> {
        let from = self.current_url().await.unwrap_or_default();
        let navigation_error = |e: chromiumoxide::error::CdpError| ScraperError::Navigation {
            url: from.clone(),
            reason: e.to_string(),
        };

        let element = self.page.find_element(selector).await.map_err(navigation_error)?;
        let href = element.attribute("href").await.map_err(navigation_error)?;

        // Navigating to the link directly ties the wait to that request, so
        // the old document can never be mistaken for the new one.
        if let Some(target) = link_target(&from, href.as_deref()) {
            tracing::debug!(from = %from, to = %target, "following link");
            self.page
                .goto(target.as_str())
                .await
                .map_err(navigation_error)?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(navigation_error)?;
            return Ok(());
        }

        element.click().await.map_err(navigation_error)?;
        self.wait_for_url_change(&from).await
    }

    async fn close(self: Box<Self>) -> Result<(), ScraperError> {
        let Self {
            browser,
            page,
            handler_task,
            ..
        } = *self;
        drop(page);
        match shutdown(browser, handler_task).await {
            None => Ok(()),
            Some(reason) => Err(ScraperError::Browser(reason)),
        }
    }
}
