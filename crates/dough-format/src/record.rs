use chrono::NaiveDate;
use dough_recipe::RecipeInputs;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

/// `strftime` pattern of the saved record's `info` field and output names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// On-disk recipe record: `{ "info": "2024-05-01", "base_recipe": {...} }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRecipe {
    #[serde(default)]
    pub info: String,
    pub base_recipe: RecipeInputs,
}

impl SavedRecipe {
    pub fn new(date: NaiveDate, base_recipe: RecipeInputs) -> Self {
        SavedRecipe {
            info: date.format(DATE_FORMAT).to_string(),
            base_recipe,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        to_pretty_json(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    // serde_json only ever writes UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_four_space_indentation() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let json = SavedRecipe::new(date, RecipeInputs::default()).to_json().unwrap();
        assert!(json.starts_with("{\n    \"info\": \"2024-05-01\",\n    \"base_recipe\": {\n        \"pizza_style\": \"Neo-Neapolitan\","));
        assert!(json.contains("\"number_of_balls\": 4,"));
        assert!(json.contains("\"fridge_fermentation\": 24\n"));
    }

    #[test]
    fn info_is_optional_when_reading() {
        let json = r#"{"base_recipe": {
            "pizza_style": "Neo-Neapolitan", "salt_percentage": 3, "oil_percentage": 0,
            "yeast_type": "CY", "hydration": 60, "ball_weight": 280, "number_of_balls": 2,
            "room_temperature": 22, "room_fermentation": 8,
            "fridge_temperature": 0, "fridge_fermentation": 0}}"#;
        let saved = SavedRecipe::from_json(json).unwrap();
        assert_eq!(saved.info, "");
        assert_eq!(saved.base_recipe.yeast_type, "CY");
        assert_eq!(saved.base_recipe.ball_weight, 280.0);
    }
}
