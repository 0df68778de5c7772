//! Fetch discipline of the talent explore page.

use async_trait::async_trait;

use super::api::{ApiClient, ClientError, Listing};
use super::query::TalentFilters;
use crate::models::TalentView;

/// Anything that can answer a talent listing query.
#[async_trait]
pub trait TalentSource: Send + Sync {
    async fn fetch(&self, filters: &TalentFilters) -> Result<Listing<TalentView>, ClientError>;
}

#[async_trait]
impl TalentSource for ApiClient {
    async fn fetch(&self, filters: &TalentFilters) -> Result<Listing<TalentView>, ClientError> {
        self.list_talents(filters).await
    }
}

/// What the explore page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    Results(Listing<TalentView>),
    /// No talent matches the current filters.
    Empty,
    /// The fetch failed; the page shows the message and no talents.
    Failed(String),
}

impl ListingView {
    pub fn talents(&self) -> &[TalentView] {
        match self {
            ListingView::Results(listing) => &listing.data,
            ListingView::Empty | ListingView::Failed(_) => &[],
        }
    }
}

/// Fetches the listing only when the filters (page included) change.
///
/// Successful outcomes, including the empty state, are kept for the filters
/// they were fetched with. A failure is shown but not kept, so the next
/// refresh with the same filters tries again.
pub struct ExploreController<S> {
    source: S,
    current: Option<(TalentFilters, ListingView)>,
    requests: usize,
}

impl<S: TalentSource> ExploreController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
            requests: 0,
        }
    }

    /// Number of listing requests issued so far.
    pub fn requests_issued(&self) -> usize {
        self.requests
    }

    pub async fn refresh(&mut self, filters: &TalentFilters) -> ListingView {
        if let Some((fetched_for, view)) = &self.current {
            if fetched_for == filters {
                return view.clone();
            }
        }

        self.requests += 1;
        let view = match self.source.fetch(filters).await {
            Ok(listing) if listing.is_empty() => ListingView::Empty,
            Ok(listing) => ListingView::Results(listing),
            Err(err) => {
                log::warn!("Talent listing failed: {}", err);
                self.current = None;
                return ListingView::Failed(err.to_string());
            }
        };
        self.current = Some((filters.clone(), view.clone()));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaginationMeta, TalentRole};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    fn talent(name: &str, category: &str) -> TalentView {
        TalentView {
            id: Uuid::new_v4(),
            name: name.into(),
            role: Some(TalentRole::Production),
            category: Some(category.into()),
            location: None,
            experience: None,
            skills: vec![],
            languages: vec![],
            bio: None,
            avatar: None,
            verified: false,
            has_disability: false,
            disability_type: None,
            joined_date: Utc::now(),
        }
    }

    fn listing(data: Vec<TalentView>) -> Listing<TalentView> {
        let total = data.len() as u64;
        Listing {
            data,
            pagination: PaginationMeta {
                current_page: 1,
                total_pages: total.div_ceil(12),
                total_items: total,
                items_per_page: 12,
            },
        }
    }

    /// Serves canned listings and counts fetches.
    struct FakeSource {
        calls: Arc<AtomicUsize>,
        talents: Vec<TalentView>,
        fail: bool,
    }

    #[async_trait]
    impl TalentSource for FakeSource {
        async fn fetch(&self, filters: &TalentFilters) -> Result<Listing<TalentView>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Server error".into(),
                });
            }
            let term = filters.search.as_option().map(|s| s.to_lowercase());
            let data = self
                .talents
                .iter()
                .filter(|t| match &term {
                    None => true,
                    Some(term) => t
                        .category
                        .as_deref()
                        .map_or(false, |c| c.to_lowercase().contains(term)),
                })
                .cloned()
                .collect();
            Ok(listing(data))
        }
    }

    fn controller(fail: bool) -> (ExploreController<FakeSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            calls: calls.clone(),
            talents: vec![talent("Sam", "Sound Design"), talent("Ava", "Drama")],
            fail,
        };
        (ExploreController::new(source), calls)
    }

    #[actix_rt::test]
    async fn test_empty_state_is_fetched_once() {
        let (mut explore, calls) = controller(false);
        let filters = TalentFilters::from_selections("all", "all", "all", "zzz").unwrap();

        assert_eq!(explore.refresh(&filters).await, ListingView::Empty);
        assert_eq!(explore.refresh(&filters).await, ListingView::Empty);
        assert_eq!(explore.refresh(&filters.clone()).await, ListingView::Empty);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(explore.requests_issued(), 1);
    }

    #[actix_rt::test]
    async fn test_changed_filters_trigger_fetch() {
        let (mut explore, calls) = controller(false);
        let everything = TalentFilters::default();
        let sound = TalentFilters::from_selections("all", "all", "all", "sound").unwrap();

        assert_eq!(explore.refresh(&everything).await.talents().len(), 2);
        let view = explore.refresh(&sound).await;
        assert_eq!(view.talents().len(), 1);
        assert_eq!(view.talents()[0].name, "Sam");
        explore.refresh(&sound.clone().with_page(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[actix_rt::test]
    async fn test_failure_shows_message_and_retries() {
        let (mut explore, calls) = controller(true);
        let filters = TalentFilters::default();

        let view = explore.refresh(&filters).await;
        assert!(matches!(view, ListingView::Failed(ref message) if message.contains("Server error")));
        assert!(view.talents().is_empty());

        explore.refresh(&filters).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
