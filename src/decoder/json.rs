//! Decoder for plain JSON housing records, one object per message
use serde_json::Value;

use crate::{
    error::{DecodeError, SchemaError, ValidationError},
    record::{HousingRecord, REQUIRED_FIELDS},
};

pub struct Decoder;

impl super::Decoder for Decoder {
    fn get_name(&self) -> String {
        String::from("json")
    }

    fn decode(&self, message: &[u8]) -> Result<HousingRecord, ValidationError> {
        let text = std::str::from_utf8(message).map_err(DecodeError::from)?;
        let value: Value = serde_json::from_str(text.trim()).map_err(DecodeError::from)?;

        let object = match &value {
            Value::Object(o) => o,
            other => return Err(SchemaError::NotAnObject(json_type(other)).into()),
        };
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|f| object.get(*f).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingFields(missing).into());
        }

        // unknown keys are ignored, only the ten fields travel on
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidField(e).into())
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::decoder::Decoder as _;
    use crate::record::{self, OceanProximity};

    fn sample_json() -> Value {
        json!({
            "longitude": -122.23,
            "latitude": 37.88,
            "housing_median_age": 52,
            "total_rooms": 880,
            "total_bedrooms": 129,
            "population": 322,
            "households": 126,
            "median_income": 8.3252,
            "median_house_value": 358500,
            "ocean_proximity": "NEAR BAY"
        })
    }

    fn decode(payload: &[u8]) -> Result<HousingRecord, ValidationError> {
        Decoder.decode(payload)
    }

    #[test]
    fn decodes_well_formed_record() {
        let payload = serde_json::to_vec(&sample_json()).unwrap();
        assert_eq!(decode(&payload).unwrap(), record::sample());
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_extra_keys() {
        let mut value = sample_json();
        value["source"] = json!("backfill");
        let payload = format!("  {value}\n");

        let record = decode(payload.as_bytes()).unwrap();
        assert_eq!(record.ocean_proximity, OceanProximity::NearBay);
    }

    #[test]
    fn rejects_every_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut value = sample_json();
            value.as_object_mut().unwrap().remove(field);
            let payload = serde_json::to_vec(&value).unwrap();

            match decode(&payload) {
                Err(ValidationError::Schema(SchemaError::MissingFields(missing))) => {
                    assert_eq!(missing, vec![field])
                }
                other => panic!("{field}: expected missing field error, got {other:?}"),
            }
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let mut value = sample_json();
        value["total_bedrooms"] = Value::Null;
        let payload = serde_json::to_vec(&value).unwrap();

        assert!(matches!(
            decode(&payload),
            Err(ValidationError::Schema(SchemaError::MissingFields(_)))
        ));
    }

    #[test]
    fn rejects_wrong_types() {
        for (field, bad) in [
            ("median_income", json!("8.3")),
            ("total_rooms", json!(880.5)),
            ("ocean_proximity", json!("ON THE MOON")),
            ("ocean_proximity", json!(3)),
        ] {
            let mut value = sample_json();
            value[field] = bad;
            let payload = serde_json::to_vec(&value).unwrap();

            assert!(
                matches!(
                    decode(&payload),
                    Err(ValidationError::Schema(SchemaError::InvalidField(_)))
                ),
                "{field} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            decode(b"[1, 2, 3]"),
            Err(ValidationError::Schema(SchemaError::NotAnObject("an array")))
        ));
    }

    #[test]
    fn rejects_undecodable_payloads() {
        assert!(matches!(
            decode(&[0xff, 0xfe, 0x7b]),
            Err(ValidationError::Decode(DecodeError::Utf8(_)))
        ));
        assert!(matches!(
            decode(b"{\"longitude\": -122.23,"),
            Err(ValidationError::Decode(DecodeError::Json(_)))
        ));
        assert!(matches!(
            decode(b"not json"),
            Err(ValidationError::Decode(DecodeError::Json(_)))
        ));
    }
}
