//! Derived views over the participant registry.
//!
//! A view is a pure function of the canonical participant list and a
//! [`ViewState`]: filter by search term and tier, sort, then slice one
//! page. Nothing is cached; callers recompute on demand.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::participant::{Participant, Tier};

/// Page sizes an admin may choose from.
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [5, 10, 15, 25, 50, 100];

/// Page size used for new sessions.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Tier filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TierFilter {
    /// No tier restriction.
    #[default]
    All,
    /// Free registrations only.
    Free,
    /// Paid registrations only.
    Paid,
}

impl TierFilter {
    /// Whether `tier` passes the filter.
    #[must_use]
    pub const fn matches(self, tier: Tier) -> bool {
        matches!(
            (self, tier),
            (Self::All, _) | (Self::Free, Tier::Free) | (Self::Paid, Tier::Paid)
        )
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Ascending by name, accent- and case-insensitive.
    Name,
    /// Most recent registration first.
    #[default]
    RegistrationDate,
}

/// Session-scoped view settings of the participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ViewState {
    search: String,
    tier: TierFilter,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            tier: TierFilter::All,
            sort: SortKey::RegistrationDate,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    /// Current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current tier filter.
    #[must_use]
    pub const fn tier(&self) -> TierFilter {
        self.tier
    }

    /// Current sort key.
    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Current page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the search term and returns to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Sets the tier filter and returns to page 1.
    pub fn set_tier(&mut self, tier: TierFilter) {
        self.tier = tier;
        self.page = 1;
    }

    /// Sets the sort key and returns to page 1.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Sets the page size and returns to page 1.
    ///
    /// # Errors
    ///
    /// Returns the rejected size if it is not one of [`PAGE_SIZE_OPTIONS`].
    pub fn set_page_size(&mut self, size: usize) -> Result<(), usize> {
        if !PAGE_SIZE_OPTIONS.contains(&size) {
            return Err(size);
        }
        self.page_size = size;
        self.page = 1;
        Ok(())
    }

    /// Moves to `page` if it lies in `[1, total_pages]`.
    ///
    /// Returns `false` (and leaves the page unchanged) otherwise.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }
}

/// A batch of view changes submitted together.
///
/// Applied in field order; the page request is checked against the page
/// count after the other changes took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ViewUpdate {
    /// New search term.
    #[serde(default)]
    pub search: Option<String>,
    /// New tier filter.
    #[serde(default)]
    pub tier: Option<TierFilter>,
    /// New sort key.
    #[serde(default)]
    pub sort: Option<SortKey>,
    /// New page size; must be one of [`PAGE_SIZE_OPTIONS`].
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Page to move to; ignored when out of range.
    #[serde(default)]
    pub page: Option<usize>,
}

impl ViewUpdate {
    /// Applies the update to `view` against the current participant list.
    ///
    /// # Errors
    ///
    /// Returns the rejected page size; `view` is left untouched in that case.
    pub fn apply(&self, view: &mut ViewState, participants: &[Participant]) -> Result<(), usize> {
        let mut next = view.clone();
        if let Some(term) = &self.search {
            next.set_search(term.clone());
        }
        if let Some(tier) = self.tier {
            next.set_tier(tier);
        }
        if let Some(sort) = self.sort {
            next.set_sort(sort);
        }
        if let Some(size) = self.page_size {
            next.set_page_size(size)?;
        }
        if let Some(page) = self.page {
            let total = page_count(filter_and_sort(participants, &next).len(), next.page_size);
            next.go_to_page(page, total);
        }
        *view = next;
        Ok(())
    }
}

/// One page of the filtered and sorted participant list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Participants on this page, in view order.
    pub items: Vec<Participant>,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub page_size: usize,
    /// Number of participants matching the filters.
    pub total_items: usize,
    /// `ceil(total_items / page_size)`.
    pub total_pages: usize,
}

/// Whether `p` matches the search term and tier filter.
///
/// The term matches case-insensitively against name and email, and
/// literally against the raw tax id digits.
#[must_use]
pub fn matches(p: &Participant, search_lower: &str, tier: TierFilter) -> bool {
    let matches_search = search_lower.is_empty()
        || p.full_name.to_lowercase().contains(search_lower)
        || p.email.to_lowercase().contains(search_lower)
        || p.tax_id.contains(search_lower);
    matches_search && tier.matches(p.tier)
}

/// Filters and sorts `participants` per `view`, ignoring pagination.
///
/// The sort is stable, so ties keep the input (store) order.
#[must_use]
pub fn filter_and_sort<'a>(participants: &'a [Participant], view: &ViewState) -> Vec<&'a Participant> {
    let search = view.search.to_lowercase();
    let mut rows: Vec<&Participant> = participants
        .iter()
        .filter(|p| matches(p, &search, view.tier))
        .collect();

    match view.sort {
        SortKey::Name => {
            let mut keyed: Vec<(String, &Participant)> =
                rows.into_iter().map(|p| (collation_key(&p.full_name), p)).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            rows = keyed.into_iter().map(|(_, p)| p).collect();
        }
        SortKey::RegistrationDate => {
            rows.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        }
    }
    rows
}

/// Number of pages needed for `total_items`.
#[must_use]
pub const fn page_count(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

/// Computes the current page for `view`.
///
/// Page `k` holds elements `[(k-1)*P, min(k*P, N))`; a page past the end is
/// empty.
#[must_use]
pub fn compute_view(participants: &[Participant], view: &ViewState) -> Page {
    let rows = filter_and_sort(participants, view);
    let total_items = rows.len();
    let start = view.page.saturating_sub(1).saturating_mul(view.page_size);
    let items = rows
        .into_iter()
        .skip(start)
        .take(view.page_size)
        .cloned()
        .collect();

    Page {
        items,
        page: view.page,
        page_size: view.page_size,
        total_items,
        total_pages: page_count(total_items, view.page_size),
    }
}

/// Ordering key approximating locale-aware name comparison: lower-cased
/// with Latin diacritics folded.
#[must_use]
pub fn collation_key(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).map(fold_diacritic).collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
