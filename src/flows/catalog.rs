use crate::errors::{AppError, AppResult};
use crate::flows::pagination::Paginator;
use crate::models::Court;
use crate::services::api::ApiClient;
use crate::services::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub search: String,
    pub location: Option<String>,
    pub order: PriceOrder,
}

/// Result of pressing "Book Now" on a court card.
#[derive(Debug, Clone, PartialEq)]
pub enum BookNow {
    Open(Court),
    RedirectToLogin,
}

/// The public court list with search, location filter, price sort and
/// paging. Any filter change returns to the first page.
pub struct CourtCatalog {
    courts: Vec<Court>,
    filter: CatalogFilter,
    filtered: Vec<Court>,
    pager: Paginator,
}

impl CourtCatalog {
    pub async fn load(api: &ApiClient, page_size: usize) -> AppResult<Self> {
        let courts = api.courts().await?;
        tracing::debug!(count = courts.len(), "loaded court catalog");
        Ok(Self::from_courts(courts, page_size))
    }

    pub fn from_courts(courts: Vec<Court>, page_size: usize) -> Self {
        let mut catalog = Self {
            filtered: courts.clone(),
            courts,
            filter: CatalogFilter::default(),
            pager: Paginator::new(page_size),
        };
        catalog.refilter();
        catalog
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search = term.to_string();
        self.refilter();
    }

    pub fn set_location(&mut self, location: Option<&str>) {
        self.filter.location = location.filter(|l| !l.is_empty()).map(str::to_string);
        self.refilter();
    }

    pub fn set_order(&mut self, order: PriceOrder) {
        self.filter.order = order;
        self.refilter();
    }

    fn refilter(&mut self) {
        let mut filtered: Vec<Court> = self
            .courts
            .iter()
            .filter(|c| c.matches_search(&self.filter.search))
            .filter(|c| {
                self.filter
                    .location
                    .as_deref()
                    .map_or(true, |loc| c.location == loc)
            })
            .cloned()
            .collect();

        match self.filter.order {
            PriceOrder::Unsorted => {}
            PriceOrder::Ascending => filtered.sort_by(|a, b| a.rate.total_cmp(&b.rate)),
            PriceOrder::Descending => filtered.sort_by(|a, b| b.rate.total_cmp(&a.rate)),
        }

        self.filtered = filtered;
        self.pager.reset();
    }

    pub fn filtered(&self) -> &[Court] {
        &self.filtered
    }

    pub fn page_items(&self) -> &[Court] {
        self.pager.slice(&self.filtered)
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.filtered.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page, self.filtered.len())
    }

    /// Distinct locations in first-seen order, for the location picker.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for court in &self.courts {
            if !seen.contains(&court.location.as_str()) {
                seen.push(&court.location);
            }
        }
        seen
    }

    pub fn book_now(&self, court_id: &str, session: Option<&Session>) -> AppResult<BookNow> {
        let court = self
            .courts
            .iter()
            .find(|c| c.id == court_id)
            .ok_or_else(|| AppError::NotFound(format!("court {court_id}")))?;
        if session.is_none() {
            tracing::info!(court_id, "book now without session, redirecting to login");
            return Ok(BookNow::RedirectToLogin);
        }
        Ok(BookNow::Open(court.clone()))
    }
}
