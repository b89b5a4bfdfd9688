//! Parameterized catalog filters.
//!
//! Query parameters arrive as raw strings; [`CatalogFilter::from_query`]
//! parses them into a typed filter, and [`CatalogFilter::to_sql`] composes
//! the WHERE clause as a list of predicates with bound parameters. User
//! input never lands in the SQL text itself.

use rusqlite::types::Value;

use crate::error::{Error, Result};

/// Lower price bound applied when `priceMin` is absent.
pub const DEFAULT_PRICE_MIN: i64 = 0;

/// Upper price bound applied when `priceMax` is absent.
pub const DEFAULT_PRICE_MAX: i64 = 10_000_000;

/// Maximum number of rows a catalog query returns.
pub const RESULT_LIMIT: usize = 100;

/// Typed filter for catalog queries.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against destination or country.
    pub destination: Option<String>,
    pub price_min: i64,
    pub price_max: i64,
    /// Exact, case-sensitive category tag match.
    pub category: Option<String>,
    /// Exact hotel star rating match.
    pub stars: Option<i64>,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            destination: None,
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
            category: None,
            stars: None,
        }
    }
}

impl CatalogFilter {
    /// Build a filter from raw query parameter strings.
    ///
    /// Empty strings count as absent, matching how the website omits
    /// unused filter inputs. A present but non-integer `priceMin`,
    /// `priceMax`, or `stars` is an error the caller surfaces as an
    /// internal failure; there is no pre-validation contract for these.
    pub fn from_query(
        destination: Option<&str>,
        price_min: Option<&str>,
        price_max: Option<&str>,
        category: Option<&str>,
        stars: Option<&str>,
    ) -> Result<Self> {
        let destination = destination
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let category = category.filter(|s| !s.is_empty()).map(|s| s.to_string());

        let price_min = match price_min {
            Some(raw) => parse_int("priceMin", raw)?,
            None => DEFAULT_PRICE_MIN,
        };
        let price_max = match price_max {
            Some(raw) => parse_int("priceMax", raw)?,
            None => DEFAULT_PRICE_MAX,
        };
        let stars = match stars.filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_int("stars", raw)?),
            None => None,
        };

        Ok(Self {
            destination,
            price_min,
            price_max,
            category,
            stars,
        })
    }

    /// Compose the WHERE clause and bound parameters for this filter.
    ///
    /// The price window is always present; optional predicates are
    /// appended only when supplied.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses = vec!["price >= ?".to_string(), "price <= ?".to_string()];
        let mut params = vec![Value::from(self.price_min), Value::from(self.price_max)];

        if let Some(destination) = &self.destination {
            // lower_utf8 is registered per connection in Store::open; SQLite's
            // built-in LOWER only folds ASCII and destinations are Cyrillic.
            clauses.push("(lower_utf8(destination) LIKE ? OR lower_utf8(country) LIKE ?)".to_string());
            let term = format!("%{}%", destination.to_lowercase());
            params.push(Value::from(term.clone()));
            params.push(Value::from(term));
        }

        if let Some(category) = &self.category {
            clauses.push("category = ?".to_string());
            params.push(Value::from(category.clone()));
        }

        if let Some(stars) = self.stars {
            clauses.push("hotel_stars = ?".to_string());
            params.push(Value::from(stars));
        }

        (clauses.join(" AND "), params)
    }
}

fn parse_int(name: &'static str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| Error::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_supplied() {
        let filter = CatalogFilter::from_query(None, None, None, None, None).unwrap();
        assert_eq!(filter, CatalogFilter::default());
        assert_eq!(filter.price_min, 0);
        assert_eq!(filter.price_max, 10_000_000);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let filter = CatalogFilter::from_query(Some(""), None, None, Some(""), Some("")).unwrap();
        assert!(filter.destination.is_none());
        assert!(filter.category.is_none());
        assert!(filter.stars.is_none());
    }

    #[test]
    fn parses_numeric_parameters() {
        let filter =
            CatalogFilter::from_query(None, Some("100000"), Some("300000"), None, Some("5"))
                .unwrap();
        assert_eq!(filter.price_min, 100_000);
        assert_eq!(filter.price_max, 300_000);
        assert_eq!(filter.stars, Some(5));
    }

    #[test]
    fn malformed_price_is_an_error() {
        let err = CatalogFilter::from_query(None, Some("abc"), None, None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter { name: "priceMin", .. }
        ));
    }

    #[test]
    fn empty_price_string_is_an_error() {
        // An empty priceMin is still a parse failure, unlike the text filters.
        let err = CatalogFilter::from_query(None, Some(""), None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn to_sql_price_window_only() {
        let (sql, params) = CatalogFilter::default().to_sql();
        assert_eq!(sql, "price >= ? AND price <= ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn to_sql_appends_optional_predicates() {
        let filter = CatalogFilter {
            destination: Some("Турция".to_string()),
            category: Some("beach".to_string()),
            stars: Some(5),
            ..CatalogFilter::default()
        };
        let (sql, params) = filter.to_sql();
        assert!(sql.contains("lower_utf8(destination) LIKE ?"));
        assert!(sql.contains("category = ?"));
        assert!(sql.contains("hotel_stars = ?"));
        assert_eq!(params.len(), 6);
        assert_eq!(params[2], Value::from("%турция%".to_string()));
    }
}
