//! Label encoders and feature row construction.
//!
//! The model takes a fixed four-column numeric row: three label-encoded
//! categorical features plus a derived outlet age. Encoders are fitted
//! offline; this module only queries their frozen vocabularies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Reference year used to derive outlet age from the establishment year.
pub const REFERENCE_YEAR: i32 = 2024;

/// Categorical feature names, in the model's column order.
pub const CATEGORICAL_FEATURES: [&str; 3] =
    ["Outlet_Size", "Outlet_Location_Type", "Outlet_Type"];

/// A fitted label encoder: a fixed vocabulary in original fit order.
///
/// `encode` is positional lookup, `decode` is the inverse. The vocabulary is
/// immutable after fitting; this service never refits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Known labels, in fit order. A label's code is its index here.
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from a fitted class list.
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Encode a label to its integer code. Fails on labels never seen
    /// during fitting.
    pub fn encode(&self, feature: &str, label: &str) -> Result<usize, EncodeError> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| EncodeError::UnknownLabel {
                feature: feature.to_string(),
                label: label.to_string(),
            })
    }

    /// Decode an integer code back to its label.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Number of labels in the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.classes.len()
    }

    /// All labels in fit order, decoded through the full code range.
    pub fn labels(&self) -> Vec<String> {
        (0..self.vocabulary_size())
            .filter_map(|code| self.decode(code).map(str::to_string))
            .collect()
    }
}

/// Mapping from categorical feature name to its fitted encoder.
///
/// Built and persisted by the offline training process; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderSet {
    /// Build an encoder set from named encoders.
    pub fn new(encoders: HashMap<String, LabelEncoder>) -> Self {
        Self { encoders }
    }

    /// Look up the encoder for a feature name.
    pub fn get(&self, feature: &str) -> Option<&LabelEncoder> {
        self.encoders.get(feature)
    }

    /// Encode one label for the named feature.
    pub fn encode(&self, feature: &str, label: &str) -> Result<usize, EncodeError> {
        let encoder = self
            .get(feature)
            .ok_or_else(|| EncodeError::MissingEncoder(feature.to_string()))?;
        encoder.encode(feature, label)
    }
}

/// The single-row numeric input the model expects, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Encoded Outlet_Size.
    pub outlet_size: f64,
    /// Encoded Outlet_Location_Type.
    pub outlet_location_type: f64,
    /// Encoded Outlet_Type.
    pub outlet_type: f64,
    /// Derived Outlet_Age (reference year minus establishment year).
    pub outlet_age: f64,
}

impl FeatureRow {
    /// Flatten to the model's input vector, preserving column order.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.outlet_size,
            self.outlet_location_type,
            self.outlet_type,
            self.outlet_age,
        ]
    }
}

/// Build the feature row for one prediction request.
///
/// Outlet age is `REFERENCE_YEAR - establishment_year`, taken as-is: negative
/// or implausible ages are not rejected.
pub fn encode_row(
    encoders: &EncoderSet,
    outlet_size: &str,
    outlet_location_type: &str,
    outlet_type: &str,
    establishment_year: i32,
) -> Result<FeatureRow, EncodeError> {
    Ok(FeatureRow {
        outlet_size: encoders.encode("Outlet_Size", outlet_size)? as f64,
        outlet_location_type: encoders
            .encode("Outlet_Location_Type", outlet_location_type)?
            as f64,
        outlet_type: encoders.encode("Outlet_Type", outlet_type)? as f64,
        // Widened before subtracting: extreme years must pass through rather
        // than overflow i32.
        outlet_age: f64::from(REFERENCE_YEAR) - f64::from(establishment_year),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_encoders() -> EncoderSet {
        let mut encoders = HashMap::new();
        encoders.insert(
            "Outlet_Size".to_string(),
            LabelEncoder::new(vec![
                "High".to_string(),
                "Medium".to_string(),
                "Small".to_string(),
            ]),
        );
        encoders.insert(
            "Outlet_Location_Type".to_string(),
            LabelEncoder::new(vec![
                "Tier 1".to_string(),
                "Tier 2".to_string(),
                "Tier 3".to_string(),
            ]),
        );
        encoders.insert(
            "Outlet_Type".to_string(),
            LabelEncoder::new(vec![
                "Grocery Store".to_string(),
                "Supermarket Type1".to_string(),
            ]),
        );
        EncoderSet::new(encoders)
    }

    #[test]
    fn encode_returns_fit_order_position() {
        let encoder = LabelEncoder::new(vec![
            "High".to_string(),
            "Medium".to_string(),
            "Small".to_string(),
        ]);

        assert_eq!(encoder.encode("Outlet_Size", "High").unwrap(), 0);
        assert_eq!(encoder.encode("Outlet_Size", "Small").unwrap(), 2);
    }

    #[test]
    fn encode_rejects_unseen_label() {
        let encoder = LabelEncoder::new(vec!["High".to_string()]);

        let err = encoder.encode("Outlet_Size", "Huge").unwrap_err();
        assert!(err.to_string().contains("Huge"));
        assert!(err.to_string().contains("Outlet_Size"));
    }

    #[test]
    fn decode_round_trips_every_label() {
        let encoder = LabelEncoder::new(vec![
            "High".to_string(),
            "Medium".to_string(),
            "Small".to_string(),
        ]);

        for label in encoder.labels() {
            let code = encoder.encode("Outlet_Size", &label).unwrap();
            assert_eq!(encoder.decode(code), Some(label.as_str()));
        }
    }

    #[test]
    fn decode_out_of_range_is_none() {
        let encoder = LabelEncoder::new(vec!["High".to_string()]);
        assert_eq!(encoder.decode(1), None);
    }

    #[test]
    fn encode_row_builds_expected_columns() {
        let encoders = test_encoders();

        let row = encode_row(&encoders, "Small", "Tier 1", "Supermarket Type1", 1999)
            .unwrap();

        assert_eq!(row.outlet_size, 2.0);
        assert_eq!(row.outlet_location_type, 0.0);
        assert_eq!(row.outlet_type, 1.0);
        assert_eq!(row.outlet_age, 25.0);
        assert_eq!(row.to_vec(), vec![2.0, 0.0, 1.0, 25.0]);
    }

    #[test]
    fn encode_row_accepts_negative_age() {
        let encoders = test_encoders();

        let row = encode_row(&encoders, "High", "Tier 2", "Grocery Store", 2030)
            .unwrap();

        assert_eq!(row.outlet_age, -6.0);
    }

    #[test]
    fn encode_row_accepts_extreme_years_without_overflow() {
        let encoders = test_encoders();

        let row = encode_row(&encoders, "High", "Tier 2", "Grocery Store", i32::MIN)
            .unwrap();
        assert_eq!(row.outlet_age, 2024.0 - f64::from(i32::MIN));

        let row = encode_row(&encoders, "High", "Tier 2", "Grocery Store", i32::MAX)
            .unwrap();
        assert_eq!(row.outlet_age, 2024.0 - f64::from(i32::MAX));
    }

    #[test]
    fn encode_row_surfaces_unknown_label() {
        let encoders = test_encoders();

        let err = encode_row(&encoders, "Huge", "Tier 1", "Grocery Store", 1999)
            .unwrap_err();

        assert!(matches!(err, EncodeError::UnknownLabel { .. }));
    }

    #[test]
    fn encoder_set_round_trips_json() {
        let encoders = test_encoders();
        let json = serde_json::to_string(&encoders).unwrap();
        let back: EncoderSet = serde_json::from_str(&json).unwrap();

        assert_eq!(back.encode("Outlet_Size", "Medium").unwrap(), 1);
    }
}
