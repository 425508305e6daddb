//! Sort keys and ordering of property listings.

use crate::domain::Property;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Named ordering for a listings view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Ascending by price
    PriceLow,
    /// Descending by price
    PriceHigh,
    /// Most recently listed first
    #[default]
    Newest,
    /// Least recently listed first
    Oldest,
    /// Most bedrooms first
    Bedrooms,
    /// Largest floor area first
    Size,
}

impl SortKey {
    /// Sort options in menu order
    pub const ALL: [SortKey; 6] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Bedrooms,
        SortKey::Size,
    ];

    /// Stable name used in URLs and configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Bedrooms => "bedrooms",
            Self::Size => "size",
        }
    }

    /// Label for the sort menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::Bedrooms => "Most Bedrooms",
            Self::Size => "Largest First",
        }
    }

    /// Look up a key by name. Unrecognized names fall back to `Newest`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                tracing::debug!("Unknown sort key {:?}, using newest", name);
                Self::Newest
            })
    }

    /// Compare two properties under this key
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        match self {
            Self::PriceLow => a.price.total_cmp(&b.price),
            Self::PriceHigh => b.price.total_cmp(&a.price),
            Self::Newest => b.listed_date.cmp(&a.listed_date),
            Self::Oldest => a.listed_date.cmp(&b.listed_date),
            Self::Bedrooms => b.bedrooms.cmp(&a.bedrooms),
            Self::Size => b.square_feet.total_cmp(&a.square_feet),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Return a sorted copy of `properties`. Equal keys keep their input order.
pub fn sort_properties(properties: &[Property], key: SortKey) -> Vec<Property> {
    let mut sorted = properties.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}

pub(crate) fn sort_in_place(properties: &mut [Property], key: SortKey) {
    // sort_by is stable
    properties.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::property;
    use crate::domain::PropertyId;

    fn ids(properties: &[Property]) -> Vec<u32> {
        properties.iter().map(|p| p.id.get()).collect()
    }

    fn catalog() -> Vec<Property> {
        let mut a = property(1, 350_000.0, 3, (2023, 5, 1));
        a.square_feet = 1600.0;
        let mut b = property(2, 125_000.0, 1, (2024, 2, 10));
        b.square_feet = 600.0;
        let mut c = property(3, 890_000.0, 5, (2022, 11, 20));
        c.square_feet = 3200.0;
        let mut d = property(4, 350_000.0, 3, (2023, 9, 15));
        d.square_feet = 1600.0;
        vec![a, b, c, d]
    }

    #[test]
    fn test_each_key() {
        let list = catalog();
        assert_eq!(ids(&sort_properties(&list, SortKey::PriceLow)), [2, 1, 4, 3]);
        assert_eq!(ids(&sort_properties(&list, SortKey::PriceHigh)), [3, 1, 4, 2]);
        assert_eq!(ids(&sort_properties(&list, SortKey::Newest)), [2, 4, 1, 3]);
        assert_eq!(ids(&sort_properties(&list, SortKey::Oldest)), [3, 1, 4, 2]);
        assert_eq!(ids(&sort_properties(&list, SortKey::Bedrooms)), [3, 1, 4, 2]);
        assert_eq!(ids(&sort_properties(&list, SortKey::Size)), [3, 1, 4, 2]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let list = catalog();
        let before = list.clone();
        let _ = sort_properties(&list, SortKey::PriceHigh);
        assert_eq!(list, before);
    }

    #[test]
    fn test_sort_is_stable_and_repeatable() {
        let list = catalog();
        for key in SortKey::ALL {
            let once = sort_properties(&list, key);
            let twice = sort_properties(&once, key);
            assert_eq!(ids(&once), ids(&twice), "key {}", key);
        }
        // Ties on price keep input order in both directions
        let reversed: Vec<Property> = list.iter().rev().cloned().collect();
        assert_eq!(ids(&sort_properties(&reversed, SortKey::PriceLow)), [2, 4, 1, 3]);
    }

    #[test]
    fn test_price_high_reverses_price_low_for_distinct_prices() {
        let list = vec![
            property(1, 300.0, 1, (2023, 1, 1)),
            property(2, 100.0, 1, (2023, 1, 1)),
            property(3, 200.0, 1, (2023, 1, 1)),
        ];
        let low = sort_properties(&list, SortKey::PriceLow);
        let high = sort_properties(&low, SortKey::PriceHigh);
        let mut expected = ids(&low);
        expected.reverse();
        assert_eq!(ids(&high), expected);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SortKey::from_name("price-low"), SortKey::PriceLow);
        assert_eq!(SortKey::from_name("SIZE"), SortKey::Size);
        assert_eq!(SortKey::from_name("cheapest"), SortKey::Newest);
        assert_eq!(SortKey::from_name(""), SortKey::Newest);
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_name(key.name()), key);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SortKey::PriceHigh).unwrap();
        assert_eq!(json, "\"price-high\"");
        let key: SortKey = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(key, SortKey::Oldest);
    }

    #[test]
    fn test_scenario_newest() {
        let list = vec![
            property(1, 200_000.0, 2, (2023, 1, 1)),
            property(2, 500_000.0, 4, (2024, 1, 1)),
        ];
        let sorted = sort_properties(&list, SortKey::Newest);
        assert_eq!(
            sorted.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![PropertyId(2), PropertyId(1)]
        );
    }
}
