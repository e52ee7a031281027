use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: String,
    pub base_model: Option<String>,
}

/// One entry of the model dropdown: the model name plus the car it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarModelOption {
    pub model: String,
    pub id: i32,
}

/// A car record as found in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    #[serde(deserialize_with = "year_from_number_or_string")]
    pub year: String,
    #[serde(default)]
    pub base_model: Option<String>,
}

fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected year as string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_car_accepts_numeric_and_text_years() {
        let cars: Vec<NewCar> = serde_json::from_str(
            r#"[
                {"make": "Honda", "model": "Civic", "year": 2019},
                {"make": "Honda", "model": "Civic", "year": "2020", "base_model": "LX"}
            ]"#,
        )
        .unwrap();

        assert_eq!(cars[0].year, "2019");
        assert_eq!(cars[0].base_model, None);
        assert_eq!(cars[1].year, "2020");
        assert_eq!(cars[1].base_model.as_deref(), Some("LX"));
    }

    #[test]
    fn new_car_rejects_boolean_year() {
        let result: Result<NewCar, _> =
            serde_json::from_str(r#"{"make": "Honda", "model": "Civic", "year": true}"#);
        assert!(result.is_err());
    }
}
