//! The list view's filter and paging state.

use chrono::NaiveDate;
use thbfx_shared::types::{PageRequest, UserId};

use crate::auth::{Principal, visible_owner};

/// Filters and paging for a transaction listing.
///
/// Owned by whoever renders the list and mutated only through its setters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    owner: Option<UserId>,
    search: Option<String>,
    currency: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    page: PageRequest,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl TransactionQuery {
    /// A query scoped to what `principal` may see.
    #[must_use]
    pub fn for_principal(principal: &Principal) -> Self {
        Self {
            owner: visible_owner(principal),
            ..Self::default()
        }
    }

    /// Case-insensitive text matched against declaration and invoice numbers.
    /// Blank clears it.
    pub fn set_search(&mut self, search: &str) {
        self.search = non_blank(search);
    }

    /// Exact currency code, upper-cased. Blank clears it.
    pub fn set_currency(&mut self, currency: &str) {
        self.currency = non_blank(currency).map(|c| c.to_ascii_uppercase());
    }

    /// Inclusive lower bound on declaration date.
    pub fn set_date_from(&mut self, date: Option<NaiveDate>) {
        self.date_from = date;
    }

    /// Inclusive upper bound on declaration date.
    pub fn set_date_to(&mut self, date: Option<NaiveDate>) {
        self.date_to = date;
    }

    /// Changes the page size and returns to the first page.
    pub fn set_limit(&mut self, limit: u64) {
        self.page = PageRequest::new(1, limit);
    }

    /// Moves to `page` (1-based, clamped to 1).
    pub fn go_to_page(&mut self, page: u64) {
        self.page = PageRequest::new(page, self.page.limit);
    }

    /// Owner restriction, `None` for everyone.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Search text.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Currency filter.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Lower date bound.
    #[must_use]
    pub const fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    /// Upper date bound.
    #[must_use]
    pub const fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    /// Current page.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn test_scope_follows_role() {
        let user = Principal::new(UserId::new(), Role::StandardUser);
        let admin = Principal::new(UserId::new(), Role::Admin);

        assert_eq!(TransactionQuery::for_principal(&user).owner(), Some(user.id));
        assert_eq!(TransactionQuery::for_principal(&admin).owner(), None);
    }

    #[test]
    fn test_defaults() {
        let query = TransactionQuery::default();
        assert_eq!(query.page().page, 1);
        assert_eq!(query.page().limit, 20);
        assert!(query.search().is_none());
        assert!(query.currency().is_none());
    }

    #[test]
    fn test_filters_normalise_blank_and_case() {
        let mut query = TransactionQuery::default();
        query.set_search("  INV-001 ");
        query.set_currency("usd");
        assert_eq!(query.search(), Some("INV-001"));
        assert_eq!(query.currency(), Some("USD"));

        query.set_search("   ");
        query.set_currency("");
        assert!(query.search().is_none());
        assert!(query.currency().is_none());
    }

    #[test]
    fn test_set_limit_resets_page() {
        let mut query = TransactionQuery::default();
        query.go_to_page(4);
        assert_eq!(query.page().page, 4);

        query.set_limit(50);
        assert_eq!(query.page().page, 1);
        assert_eq!(query.page().limit, 50);
    }

    #[test]
    fn test_paging_is_clamped() {
        let mut query = TransactionQuery::default();
        query.set_limit(1000);
        query.go_to_page(0);
        assert_eq!(query.page().limit, 100);
        assert_eq!(query.page().page, 1);
        assert_eq!(query.page().offset(), 0);

        query.go_to_page(3);
        assert_eq!(query.page().offset(), 200);
    }

    #[test]
    fn test_date_bounds() {
        let mut query = TransactionQuery::default();
        let from = NaiveDate::from_ymd_opt(2025, 1, 1);
        let to = NaiveDate::from_ymd_opt(2025, 1, 31);
        query.set_date_from(from);
        query.set_date_to(to);
        assert_eq!(query.date_from(), from);
        assert_eq!(query.date_to(), to);
    }
}
