//! Property entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Year assumed for listings that do not state when they were built.
pub const DEFAULT_YEAR_BUILT: i32 = 2000;

/// Lot size (acres) assumed for listings without one.
pub const DEFAULT_LOT_SIZE: f64 = 0.5;

/// Unique identifier for a property listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u32);

impl PropertyId {
    /// Get the raw numeric id
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PropertyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Kind of dwelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Condo,
    Townhouse,
    Apartment,
}

impl PropertyType {
    /// All property types in filter-panel order
    pub const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Townhouse,
        PropertyType::Apartment,
    ];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Condo => "Condo",
            Self::Townhouse => "Townhouse",
            Self::Apartment => "Apartment",
        }
    }

    /// Parse a display name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.display_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A property listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Unique identifier, never reassigned
    #[serde(rename = "Id")]
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    /// Asking price
    pub price: f64,
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub square_feet: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    /// Lot size in acres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<f64>,
    /// Free-text feature labels, also used for amenity filtering
    #[serde(default)]
    pub features: Vec<String>,
    /// Image references, first one is the cover
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub listed_date: DateTime<Utc>,
}

impl Property {
    /// Year built, falling back to [`DEFAULT_YEAR_BUILT`]
    pub fn effective_year_built(&self) -> i32 {
        self.year_built.unwrap_or(DEFAULT_YEAR_BUILT)
    }

    /// Lot size, falling back to [`DEFAULT_LOT_SIZE`]
    pub fn effective_lot_size(&self) -> f64 {
        self.lot_size.unwrap_or(DEFAULT_LOT_SIZE)
    }

    /// Cover image reference
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// One-line summary for listing output
    pub fn summary(&self) -> String {
        format!(
            "#{} {} | {} | ${:.0} | {}bd/{}ba | {:.0} sqft",
            self.id,
            self.title,
            self.property_type,
            self.price,
            self.bedrooms,
            self.bathrooms,
            self.square_feet
        )
    }

    /// Check the record-level invariants a repository relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.id.0 == 0 {
            return Err("id must be positive".to_string());
        }
        if self.images.is_empty() {
            return Err("at least one image is required".to_string());
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err(format!("invalid price {}", self.price));
        }
        if self.square_feet.is_nan() || self.square_feet < 0.0 {
            return Err(format!("invalid square footage {}", self.square_feet));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::property;
    use super::*;

    #[test]
    fn test_effective_defaults() {
        let p = property(1, 100_000.0, 2, (2023, 1, 1));
        assert_eq!(p.effective_year_built(), 2000);
        assert_eq!(p.effective_lot_size(), 0.5);

        let p = Property {
            year_built: Some(1987),
            lot_size: Some(1.25),
            ..p
        };
        assert_eq!(p.effective_year_built(), 1987);
        assert_eq!(p.effective_lot_size(), 1.25);
    }

    #[test]
    fn test_property_type_from_name() {
        assert_eq!(PropertyType::from_name("condo"), Some(PropertyType::Condo));
        assert_eq!(
            PropertyType::from_name(" Townhouse "),
            Some(PropertyType::Townhouse)
        );
        assert_eq!(PropertyType::from_name("castle"), None);
    }

    #[test]
    fn test_deserialize_fixture_record() {
        let json = r#"{
            "Id": 7,
            "title": "Sunny Loft",
            "address": "12 Harbor Way, Seattle, WA",
            "price": 640000,
            "propertyType": "Condo",
            "bedrooms": 2,
            "bathrooms": 2,
            "squareFeet": 1180,
            "features": ["Rooftop Pool Access", "In-unit Laundry"],
            "images": ["loft-1.jpg", "loft-2.jpg"],
            "description": "Bright corner unit.",
            "listedDate": "2024-03-05T09:30:00Z"
        }"#;

        let p: Property = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, PropertyId(7));
        assert_eq!(p.property_type, PropertyType::Condo);
        assert_eq!(p.year_built, None);
        assert_eq!(p.effective_lot_size(), DEFAULT_LOT_SIZE);
        assert_eq!(p.cover_image(), Some("loft-1.jpg"));
    }

    #[test]
    fn test_listed_date_accepts_bare_date() {
        let json = r#"{
            "Id": 1,
            "title": "Listing 1",
            "address": "1 Main Street",
            "price": 200000,
            "propertyType": "House",
            "bedrooms": 2,
            "bathrooms": 1,
            "squareFeet": 900,
            "images": ["one.jpg"],
            "listedDate": "2023-01-01"
        }"#;

        let p: Property = serde_json::from_str(json).unwrap();
        assert_eq!(
            p.listed_date,
            property(1, 200_000.0, 2, (2023, 1, 1)).listed_date
        );

        let bad = json.replace("2023-01-01", "soon");
        assert!(serde_json::from_str::<Property>(&bad).is_err());
    }

    #[test]
    fn test_validate() {
        let p = property(3, 250_000.0, 3, (2022, 6, 1));
        assert!(p.validate().is_ok());

        let no_images = Property {
            images: Vec::new(),
            ..p.clone()
        };
        assert!(no_images.validate().is_err());

        let zero_id = Property {
            id: PropertyId(0),
            ..p.clone()
        };
        assert!(zero_id.validate().is_err());

        let negative = Property { price: -1.0, ..p };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_summary() {
        let p = property(2, 500_000.0, 4, (2024, 1, 1));
        insta::assert_snapshot!(
            p.summary(),
            @"#2 Listing 2 | House | $500000 | 4bd/1ba | 1000 sqft"
        );
    }
}
