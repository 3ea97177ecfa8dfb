//! Cities offered by the add-city picker, keyed by OpenWeatherMap city id.

use crate::types::SelectedCity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCity {
    pub key: &'static str,
    pub label: &'static str,
}

pub const CITY_CATALOG: &[CatalogCity] = &[
    CatalogCity { key: "4671654", label: "Austin, TX" },
    CatalogCity { key: "4930956", label: "Boston, MA" },
    CatalogCity { key: "4887398", label: "Chicago, IL" },
    CatalogCity { key: "5128581", label: "New York, NY" },
    CatalogCity { key: "5391959", label: "San Francisco, CA" },
    CatalogCity { key: "5809844", label: "Seattle, WA" },
    CatalogCity { key: "2643743", label: "London, UK" },
    CatalogCity { key: "2988507", label: "Paris, FR" },
    CatalogCity { key: "2950159", label: "Berlin, DE" },
    CatalogCity { key: "1850147", label: "Tokyo, JP" },
];

impl From<&CatalogCity> for SelectedCity {
    fn from(city: &CatalogCity) -> Self {
        SelectedCity::new(city.key, city.label)
    }
}

/// Look a city up by id, full label, or the label's leading name
/// (`"boston"` matches `"Boston, MA"`). Case-insensitive.
pub fn find_city(query: &str) -> Option<SelectedCity> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    CITY_CATALOG
        .iter()
        .find(|c| {
            c.key == query
                || c.label.eq_ignore_ascii_case(query)
                || c.label
                    .split(',')
                    .next()
                    .is_some_and(|name| name.trim().eq_ignore_ascii_case(query))
        })
        .map(SelectedCity::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_key() {
        let city = find_city("2643743").unwrap();
        assert_eq!(city.label, "London, UK");
    }

    #[test]
    fn test_find_by_label_and_name() {
        assert_eq!(find_city("boston, ma").unwrap().key, "4930956");
        assert_eq!(find_city("  Tokyo ").unwrap().key, "1850147");
    }

    #[test]
    fn test_unknown_city() {
        assert!(find_city("Atlantis").is_none());
        assert!(find_city("").is_none());
    }

    #[test]
    fn test_catalog_keys_are_unique() {
        let mut keys: Vec<&str> = CITY_CATALOG.iter().map(|c| c.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CITY_CATALOG.len());
    }
}
