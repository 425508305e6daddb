//! Filter predicate over property listings.
//!
//! A [`FilterSpec`] is a conjunction of independent constraints. Every
//! field is optional and an absent field places no constraint on that
//! dimension. Numeric thresholds of zero, negative, or non-finite values
//! are treated as absent, so "no filter" and "filter for zero" can only be
//! told apart by omitting the field.

use crate::domain::{Property, PropertyType};
use crate::error::FilterError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Structured set of optional constraints applied to a property collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Accepted property types; empty means any
    pub property_types: HashSet<PropertyType>,
    pub bedrooms_min: Option<u32>,
    pub bathrooms_min: Option<u32>,
    /// Free text searched in address and title
    pub location: Option<String>,
    /// Requested amenities; a listing matches if any of them appears in
    /// any of its features
    pub amenities: Vec<String>,
    pub square_feet_min: Option<f64>,
    pub square_feet_max: Option<f64>,
    pub year_built_min: Option<i32>,
    pub year_built_max: Option<i32>,
    pub lot_size_min: Option<f64>,
    pub lot_size_max: Option<f64>,
}

impl FilterSpec {
    /// A spec with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a property satisfies every active constraint
    pub fn matches(&self, property: &Property) -> bool {
        matches(property, self)
    }

    /// True when no dimension is constrained
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of constrained dimensions.
    ///
    /// Min and max of the same dimension count once.
    pub fn active_count(&self) -> usize {
        let ranges = [
            active_amount(self.price_min).is_some() || active_amount(self.price_max).is_some(),
            active_amount(self.square_feet_min).is_some()
                || active_amount(self.square_feet_max).is_some(),
            active_year(self.year_built_min).is_some() || active_year(self.year_built_max).is_some(),
            active_amount(self.lot_size_min).is_some() || active_amount(self.lot_size_max).is_some(),
        ];
        let others = [
            !self.property_types.is_empty(),
            active_rooms(self.bedrooms_min).is_some(),
            active_rooms(self.bathrooms_min).is_some(),
            active_text(self.location.as_deref()).is_some(),
            !active_amenities(&self.amenities).is_empty(),
        ];
        ranges.iter().chain(others.iter()).filter(|on| **on).count()
    }
}

/// Evaluate a filter spec against a single property
pub fn matches(property: &Property, spec: &FilterSpec) -> bool {
    within(property.price, spec.price_min, spec.price_max)
        && (spec.property_types.is_empty() || spec.property_types.contains(&property.property_type))
        && at_least(property.bedrooms, spec.bedrooms_min)
        && at_least(property.bathrooms, spec.bathrooms_min)
        && location_matches(property, spec.location.as_deref())
        && amenities_match(property, &spec.amenities)
        && within(property.square_feet, spec.square_feet_min, spec.square_feet_max)
        && year_within(
            property.effective_year_built(),
            spec.year_built_min,
            spec.year_built_max,
        )
        && within(
            property.effective_lot_size(),
            spec.lot_size_min,
            spec.lot_size_max,
        )
}

fn active_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn active_rooms(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

fn active_year(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v > 0)
}

fn active_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn active_amenities(amenities: &[String]) -> Vec<String> {
    amenities
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    active_amount(min).map_or(true, |min| value >= min)
        && active_amount(max).map_or(true, |max| value <= max)
}

fn year_within(value: i32, min: Option<i32>, max: Option<i32>) -> bool {
    active_year(min).map_or(true, |min| value >= min)
        && active_year(max).map_or(true, |max| value <= max)
}

fn at_least(value: u32, min: Option<u32>) -> bool {
    active_rooms(min).map_or(true, |min| value >= min)
}

fn location_matches(property: &Property, location: Option<&str>) -> bool {
    let Some(needle) = active_text(location) else {
        return true;
    };
    let needle = needle.to_lowercase();
    property.address.to_lowercase().contains(&needle)
        || property.title.to_lowercase().contains(&needle)
}

// Requested amenity must appear inside a feature label, not the reverse.
fn amenities_match(property: &Property, amenities: &[String]) -> bool {
    let wanted = active_amenities(amenities);
    if wanted.is_empty() {
        return true;
    }
    let features: Vec<String> = property
        .features
        .iter()
        .map(|f| f.to_lowercase())
        .collect();
    wanted
        .iter()
        .any(|amenity| features.iter().any(|feature| feature.contains(amenity.as_str())))
}

/// Raw filter-panel input as typed or selected by the user.
///
/// Numeric fields accept plain numbers, thousands separators, a leading
/// `$` and a trailing `+` ("5+"). "any" and blank mean unset.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub price_min: String,
    pub price_max: String,
    pub property_types: Vec<String>,
    pub bedrooms_min: String,
    pub bathrooms_min: String,
    pub location: String,
    /// Comma-separated amenity names
    pub amenities: String,
    pub square_feet_min: String,
    pub square_feet_max: String,
    pub year_built_min: String,
    pub year_built_max: String,
    pub lot_size_min: String,
    pub lot_size_max: String,
}

impl FilterForm {
    /// Build a complete filter spec, dropping any value that fails to parse
    pub fn to_spec(&self) -> FilterSpec {
        let property_types = self
            .property_types
            .iter()
            .filter_map(|name| {
                let parsed = PropertyType::from_name(name);
                if parsed.is_none() {
                    tracing::debug!("Ignoring unknown property type {:?}", name);
                }
                parsed
            })
            .collect();

        FilterSpec {
            price_min: amount_or_unset("priceMin", &self.price_min),
            price_max: amount_or_unset("priceMax", &self.price_max),
            property_types,
            bedrooms_min: count_or_unset("bedroomsMin", &self.bedrooms_min),
            bathrooms_min: count_or_unset("bathroomsMin", &self.bathrooms_min),
            location: active_text(Some(self.location.as_str())).map(str::to_string),
            amenities: self
                .amenities
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            square_feet_min: amount_or_unset("squareFeetMin", &self.square_feet_min),
            square_feet_max: amount_or_unset("squareFeetMax", &self.square_feet_max),
            year_built_min: year_or_unset("yearBuiltMin", &self.year_built_min),
            year_built_max: year_or_unset("yearBuiltMax", &self.year_built_max),
            lot_size_min: amount_or_unset("lotSizeMin", &self.lot_size_min),
            lot_size_max: amount_or_unset("lotSizeMax", &self.lot_size_max),
        }
    }
}

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$?\s*(\d[\d,]*(?:\.\d+)?)\s*\+?$").expect("amount pattern is valid")
    })
}

/// Parse a numeric filter value.
///
/// Returns `Ok(None)` for blank input and "any".
pub fn parse_amount(field: &'static str, input: &str) -> Result<Option<f64>, FilterError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
        return Ok(None);
    }

    let invalid = || FilterError::InvalidValue {
        field,
        input: input.to_string(),
    };
    let captures = amount_pattern().captures(trimmed).ok_or_else(invalid)?;
    let digits = captures[1].replace(',', "");
    let value: f64 = digits.parse().map_err(|_| invalid())?;
    Ok(Some(value))
}

fn recover<T>(result: Result<Option<T>, FilterError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("{}; treating as unset", e);
            None
        }
    }
}

fn amount_or_unset(field: &'static str, input: &str) -> Option<f64> {
    recover(parse_amount(field, input)).filter(|v| *v > 0.0)
}

fn count_or_unset(field: &'static str, input: &str) -> Option<u32> {
    let parsed = parse_amount(field, input).and_then(|value| match value {
        Some(v) if v.fract() != 0.0 || v > u32::MAX as f64 => Err(FilterError::InvalidValue {
            field,
            input: input.to_string(),
        }),
        other => Ok(other.map(|v| v as u32)),
    });
    recover(parsed).filter(|v| *v > 0)
}

fn year_or_unset(field: &'static str, input: &str) -> Option<i32> {
    let parsed = parse_amount(field, input).and_then(|value| match value {
        Some(v) if v.fract() != 0.0 || v > i32::MAX as f64 => Err(FilterError::InvalidValue {
            field,
            input: input.to_string(),
        }),
        other => Ok(other.map(|v| v as i32)),
    });
    recover(parsed).filter(|v| *v > 0)
}
