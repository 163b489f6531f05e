//! Review listing pagination.
//!
//! The paginator is a two-state machine. While [`PaginatorState::HasMore`],
//! each [`ReviewPaginator::step`] extracts the current page's review batch,
//! then probes for a "next page" control: if present it clicks it and waits
//! for the new page to load, otherwise it moves to [`PaginatorState::Done`].
//!
//! A page cap bounds the walk. A listing that still offers a "next" control
//! after `max_pages` extractions is reported as
//! [`ScraperError::PaginationLimit`] instead of looping forever.

use revscope_core::{ReviewCollection, ReviewRecord};

use crate::browser::PageSession;
use crate::error::ScraperError;
use crate::reviews::{extract_reviews, NEXT_PAGE_SELECTOR, SEE_ALL_REVIEWS_SELECTOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    HasMore,
    Done,
}

#[derive(Debug)]
pub struct ReviewPaginator {
    state: PaginatorState,
    max_pages: usize,
    pages_extracted: usize,
    navigations: usize,
    reviews: ReviewCollection,
}

impl ReviewPaginator {
    /// Creates a paginator in [`PaginatorState::HasMore`]. A `max_pages` of
    /// zero is raised to one so the current page is always read.
    #[must_use]
    pub fn new(max_pages: usize) -> Self {
        Self {
            state: PaginatorState::HasMore,
            max_pages: max_pages.max(1),
            pages_extracted: 0,
            navigations: 0,
            reviews: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> PaginatorState {
        self.state
    }

    #[must_use]
    pub fn pages_extracted(&self) -> usize {
        self.pages_extracted
    }

    #[must_use]
    pub fn navigations(&self) -> usize {
        self.navigations
    }

    #[must_use]
    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }

    #[must_use]
    pub fn into_reviews(self) -> ReviewCollection {
        self.reviews
    }

    /// Runs one extraction round. A no-op once [`PaginatorState::Done`].
    ///
    /// # Errors
    ///
    /// Propagates session failures, including [`ScraperError::Navigation`]
    /// when the next page fails to load, and returns
    /// [`ScraperError::PaginationLimit`] when another page is offered after
    /// `max_pages` rounds.
    pub async fn step(
        &mut self,
        session: &mut dyn PageSession,
    ) -> Result<PaginatorState, ScraperError> {
        if self.state == PaginatorState::Done {
            return Ok(self.state);
        }

        let html = session.content().await?;
        let batch = extract_reviews(&html);
        self.pages_extracted += 1;
        tracing::debug!(
            page = self.pages_extracted,
            reviews = batch.len(),
            "extracted review batch"
        );
        self.reviews.extend(batch);

        if !session.exists(NEXT_PAGE_SELECTOR).await? {
            self.state = PaginatorState::Done;
            return Ok(self.state);
        }

        if self.pages_extracted >= self.max_pages {
            return Err(ScraperError::PaginationLimit {
                url: session.current_url().await.unwrap_or_default(),
                max_pages: self.max_pages,
            });
        }

        tracing::info!(
            page = self.pages_extracted + 1,
            "navigating to the next page of reviews"
        );
        session.click_and_wait(NEXT_PAGE_SELECTOR).await?;
        self.navigations += 1;

        Ok(self.state)
    }

    /// Steps until [`PaginatorState::Done`] and returns the collected reviews.
    ///
    /// # Errors
    ///
    /// See [`Self::step`].
    pub async fn run(
        mut self,
        session: &mut dyn PageSession,
    ) -> Result<ReviewCollection, ScraperError> {
        while self.step(session).await? == PaginatorState::HasMore {}
        Ok(self.into_reviews())
    }
}

/// Follows the product page's "see all reviews" link when there is one.
///
/// Best effort: a missing link, or a click that fails, leaves the session
/// where it was and is only logged.
pub async fn open_all_reviews(session: &mut dyn PageSession) {
    match session.exists(SEE_ALL_REVIEWS_SELECTOR).await {
        Ok(true) => {
            if let Err(e) = session.click_and_wait(SEE_ALL_REVIEWS_SELECTOR).await {
                tracing::warn!(error = %e, "could not open the full review listing");
            }
        }
        Ok(false) => tracing::debug!("no \"see all reviews\" link found"),
        Err(e) => tracing::warn!(error = %e, "failed to probe for \"see all reviews\" link"),
    }
}

/// Opens the full review listing, then paginates through it.
///
/// # Errors
///
/// See [`ReviewPaginator::step`].
pub async fn collect_reviews(
    session: &mut dyn PageSession,
    max_pages: usize,
) -> Result<ReviewCollection, ScraperError> {
    open_all_reviews(session).await;
    ReviewPaginator::new(max_pages).run(session).await
}
