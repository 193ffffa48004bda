use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::manager::InventoryError;
use crate::storage::models::Sweet;
use crate::storage::Database;

/// Optional predicates over sweets, combined with logical AND.
///
/// Each predicate looks at one record in isolation, so applying the filters
/// one at a time in any order gives the same result as applying them together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Exact match, ignoring case
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive upper bound
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<Decimal>,
    /// Inclusive lower bound
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<Decimal>,
    /// Substring match, ignoring case
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchFilter {
    /// Treat empty or blank text predicates as absent.
    pub fn normalized(self) -> Self {
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Self {
            category: non_blank(self.category),
            max_price: self.max_price,
            min_price: self.min_price,
            name: non_blank(self.name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.max_price.is_none()
            && self.min_price.is_none()
            && self.name.is_none()
    }

    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = &self.name {
            if !sweet.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if sweet.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if sweet.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if sweet.price > max {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, sweets: Vec<Sweet>) -> Vec<Sweet> {
        sweets.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Price bound from a query string, where a blank value means no bound.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Sweets matching every supplied predicate, in store order
pub fn search(db: &Database, filter: &SearchFilter) -> Result<Vec<Sweet>, InventoryError> {
    let sweets = db.get_all_sweets()?;
    let filter = filter.clone().normalized();
    if filter.is_empty() {
        return Ok(sweets);
    }
    Ok(filter.apply(sweets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_sweet, setup_db};

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn catalogue() -> Vec<Sweet> {
        [
            ("Dark Chocolate Bar", "Chocolate", "3.00", 10),
            ("Milk CHOC Buttons", "chocolate", "1.50", 0),
            ("Ladoo", "Indian", "2.50", 3),
            ("Gulab Jamun", "Indian", "4.00", 8),
            ("Chocolate Barfi", "Indian", "5.25", 2),
            ("Sherbet Lemon", "Boiled", "0.80", 40),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, category, p, qty))| {
            make_sweet(name, category, p, qty).into_sweet(i as u64 + 1)
        })
        .collect()
    }

    fn names(sweets: &[Sweet]) -> Vec<&str> {
        sweets.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_no_predicates_returns_everything() {
        let all = catalogue();
        assert_eq!(SearchFilter::default().apply(all.clone()), all);
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        let filter = SearchFilter {
            name: Some("choc".to_string()),
            ..Default::default()
        };
        let found = filter.apply(catalogue());
        assert_eq!(
            names(&found),
            vec!["Dark Chocolate Bar", "Milk CHOC Buttons", "Chocolate Barfi"]
        );
    }

    #[test]
    fn test_category_is_case_insensitive_exact() {
        let filter = SearchFilter {
            category: Some("CHOCOLATE".to_string()),
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply(catalogue())),
            vec!["Dark Chocolate Bar", "Milk CHOC Buttons"]
        );

        let partial = SearchFilter {
            category: Some("Ind".to_string()),
            ..Default::default()
        };
        assert!(partial.apply(catalogue()).is_empty());
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = SearchFilter {
            max_price: Some(price("4.00")),
            min_price: Some(price("2.50")),
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply(catalogue())),
            vec!["Dark Chocolate Bar", "Ladoo", "Gulab Jamun"]
        );
    }

    #[test]
    fn test_inverted_price_range_is_empty() {
        let filter = SearchFilter {
            max_price: Some(price("1")),
            min_price: Some(price("5")),
            ..Default::default()
        };
        assert!(filter.apply(catalogue()).is_empty());
    }

    #[test]
    fn test_blank_text_predicates_ignored() {
        let filter = SearchFilter {
            category: Some("  ".to_string()),
            name: Some(String::new()),
            ..Default::default()
        }
        .normalized();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(catalogue()).len(), catalogue().len());
    }

    fn from_query(query: &str) -> Result<SearchFilter, String> {
        let uri: axum::http::Uri = format!("/api/sweets/search?{query}").parse().unwrap();
        axum::extract::Query::<SearchFilter>::try_from_uri(&uri)
            .map(|q| q.0)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_blank_price_bounds_ignored() {
        let filter = from_query("name=choc&minPrice=&maxPrice=%20").unwrap();
        assert!(filter.min_price.is_none());
        assert!(filter.max_price.is_none());
        assert_eq!(filter.name.as_deref(), Some("choc"));

        let bounded = from_query("minPrice=2.5&maxPrice=4").unwrap();
        assert_eq!(bounded.min_price, Some(price("2.5")));
        assert_eq!(bounded.max_price, Some(price("4")));
    }

    #[test]
    fn test_non_numeric_price_bound_rejected() {
        assert!(from_query("minPrice=cheap").is_err());
        assert!(from_query("maxPrice=1.2.3").is_err());
    }

    /// All orderings of `items`
    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    #[test]
    fn test_filters_commute() {
        let single = vec![
            SearchFilter {
                name: Some("a".to_string()),
                ..Default::default()
            },
            SearchFilter {
                category: Some("indian".to_string()),
                ..Default::default()
            },
            SearchFilter {
                min_price: Some(price("2.5")),
                ..Default::default()
            },
            SearchFilter {
                max_price: Some(price("5")),
                ..Default::default()
            },
        ];
        let combined = SearchFilter {
            category: Some("indian".to_string()),
            max_price: Some(price("5")),
            min_price: Some(price("2.5")),
            name: Some("a".to_string()),
        };
        let expected = combined.apply(catalogue());
        assert_eq!(names(&expected), vec!["Ladoo", "Gulab Jamun"]);

        for order in permutations(&single) {
            let sequential = order
                .iter()
                .fold(catalogue(), |sweets, filter| filter.apply(sweets));
            assert_eq!(sequential, expected);
        }
    }

    #[test]
    fn test_search_reads_from_store() {
        let (db, _temp) = setup_db();
        for (name, category, p) in [("Ladoo", "Indian", "2.5"), ("Fudge", "British", "1.2")] {
            db.insert_sweet(make_sweet(name, category, p, 1)).unwrap();
        }

        let all = search(&db, &SearchFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let indian = search(
            &db,
            &SearchFilter {
                category: Some("indian".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(names(&indian), vec!["Ladoo"]);
    }
}
