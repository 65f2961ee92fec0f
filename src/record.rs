//! Housing records and the values derived from them
use serde::{Deserialize, Serialize};

/// Fields every inbound message must carry
pub const REQUIRED_FIELDS: [&str; 10] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "median_house_value",
    "ocean_proximity",
];

/// Input columns of the serving model, in the order it was trained on
pub const FEATURE_COLUMNS: [&str; 8] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OceanProximity {
    #[serde(rename = "<1H OCEAN")]
    LessThanOneHourOcean,
    #[serde(rename = "INLAND")]
    Inland,
    #[serde(rename = "ISLAND")]
    Island,
    #[serde(rename = "NEAR BAY")]
    NearBay,
    #[serde(rename = "NEAR OCEAN")]
    NearOcean,
}

/// One observation of a housing block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: i64,
    pub total_rooms: i64,
    pub total_bedrooms: i64,
    pub population: i64,
    pub households: i64,
    pub median_income: f64,
    pub median_house_value: f64,
    pub ocean_proximity: OceanProximity,
}

impl HousingRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector::from(self)
    }

    /// Attaches the model estimate, consuming the record
    pub fn enrich(self, estimated_median_house_value: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: self,
            estimated_median_house_value,
        }
    }
}

/// A single model input value. Integers stay integers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Feature {
    Int(i64),
    Float(f64),
}

/// Model input in [FEATURE_COLUMNS] order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([Feature; 8]);

impl FeatureVector {
    pub fn values(&self) -> &[Feature; 8] {
        &self.0
    }
}

impl From<&HousingRecord> for FeatureVector {
    fn from(r: &HousingRecord) -> Self {
        FeatureVector([
            Feature::Float(r.longitude),
            Feature::Float(r.latitude),
            Feature::Int(r.housing_median_age),
            Feature::Int(r.total_rooms),
            Feature::Int(r.total_bedrooms),
            Feature::Int(r.population),
            Feature::Int(r.households),
            Feature::Float(r.median_income),
        ])
    }
}

/// Record plus the model's estimate, as sent to storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: HousingRecord,
    pub estimated_median_house_value: f64,
}

#[cfg(test)]
pub(crate) fn sample() -> HousingRecord {
    HousingRecord {
        longitude: -122.23,
        latitude: 37.88,
        housing_median_age: 52,
        total_rooms: 880,
        total_bedrooms: 129,
        population: 322,
        households: 126,
        median_income: 8.3252,
        median_house_value: 358500.0,
        ocean_proximity: OceanProximity::NearBay,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn features_follow_model_column_order() {
        let features = sample().features();
        assert_eq!(
            serde_json::to_value(&features).unwrap(),
            json!([-122.23, 37.88, 52, 880, 129, 322, 126, 8.3252])
        );
        assert_eq!(features, sample().features());
    }

    #[test]
    fn enriched_record_is_flat() {
        let enriched = sample().enrich(365000.0);
        let value = serde_json::to_value(&enriched).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), REQUIRED_FIELDS.len() + 1);
        for field in REQUIRED_FIELDS {
            assert!(object.contains_key(field), "{field} missing");
        }
        assert_eq!(object["ocean_proximity"], json!("NEAR BAY"));
        assert_eq!(object["estimated_median_house_value"], json!(365000.0));
    }
}
