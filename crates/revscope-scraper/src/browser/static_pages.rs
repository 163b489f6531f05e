//! In-memory browser over pre-captured HTML pages.
//!
//! Pages are keyed by URL. Clicking an element follows its `href`, resolved
//! against the current page, so saved review listings can be paginated
//! offline. Clones share the same pages and counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;

use super::{resolve_link, Browser, PageSession};
use crate::error::ScraperError;
use crate::extract::{parse_selector, selector_matches};

#[derive(Debug, Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    navigations: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct StaticBrowser {
    pages: Arc<HashMap<String, String>>,
    counters: Arc<Counters>,
}

impl StaticBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `html` as the document served for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.into(), html.into());
        self
    }

    /// Sessions successfully opened so far.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Sessions released so far.
    #[must_use]
    pub fn sessions_closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Click-triggered navigations that completed.
    #[must_use]
    pub fn navigations(&self) -> usize {
        self.counters.navigations.load(Ordering::SeqCst)
    }

    fn page(&self, url: &str) -> Result<String, ScraperError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Navigation {
                url: url.to_string(),
                reason: "no page registered for this URL".to_string(),
            })
    }
}

#[async_trait]
impl Browser for StaticBrowser {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, ScraperError> {
        let html = self.page(url)?;
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticSession {
            browser: self.clone(),
            url: url.to_string(),
            html,
        }))
    }
}

struct StaticSession {
    browser: StaticBrowser,
    url: String,
    html: String,
}

#[async_trait]
impl PageSession for StaticSession {
    async fn current_url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    async fn content(&self) -> Result<String, ScraperError> {
        Ok(self.html.clone())
    }

    async fn exists(&self, selector: &str) -> Result<bool, ScraperError> {
        let sel = parse_selector(selector).ok_or_else(|| ScraperError::InvalidSelector {
            selector: selector.to_string(),
        })?;
        Ok(selector_matches(&self.html, &sel))
    }

    async fn click_and_wait(&mut self, selector: &str) -> Result<(), ScraperError> {
        let href = first_href(&self.html, selector)?.ok_or_else(|| ScraperError::Navigation {
            url: self.url.clone(),
            reason: format!("no link matches {selector:?}"),
        })?;
        let target = resolve_link(&self.url, &href)?;
        self.html = self.browser.page(&target)?;
        self.url = target;
        self.browser
            .counters
            .navigations
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), ScraperError> {
        self.browser.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn first_href(html: &str, selector: &str) -> Result<Option<String>, ScraperError> {
    let sel = parse_selector(selector).ok_or_else(|| ScraperError::InvalidSelector {
        selector: selector.to_string(),
    })?;
    let doc = Html::parse_document(html);
    Ok(doc
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string()))
}
