use std::{collections::HashMap, fmt};

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::utils::{collapse_whitespace, non_blank};

pub const INGREDIENT_SLOTS: usize = 20;

/// Provider meal identifier, kept as a string whatever JSON type it arrived as.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MealId(String);

impl MealId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MealId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for MealId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => MealId::new(text),
            RawId::Number(number) => MealId(integral(&number)),
        })
    }
}

/// Decimal text of a numeric id. Whole floats such as `52772.0` lose the
/// fraction so they match the provider's string ids.
fn integral(number: &serde_json::Number) -> String {
    const EXACT: f64 = 9_007_199_254_740_992.0;

    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < EXACT => {
            format!("{}", value as i64)
        }
        _ => number.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: MealId,

    #[serde(rename = "strMeal", default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "strMealThumb", default, deserialize_with = "nullable")]
    pub thumbnail: String,
}

impl MealSummary {
    pub fn new(id: impl Into<MealId>, name: &str, thumbnail: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            thumbnail: thumbnail.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MealDetail {
    pub id: MealId,
    pub name: String,
    pub area: String,
    pub category: String,
    pub thumbnail: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientSlot {
    pub measure: Option<String>,
    pub name: Option<String>,
}

impl IngredientSlot {
    pub fn new(measure: &str, name: &str) -> Self {
        Self {
            measure: Some(measure.to_string()),
            name: Some(name.to_string()),
        }
    }

    /// Display line for the slot, `None` when the slot holds no ingredient.
    pub fn line(&self) -> Option<String> {
        let name = non_blank(self.name.as_deref())?;

        match non_blank(self.measure.as_deref()) {
            Some(measure) => Some(collapse_whitespace(&format!("{measure} {name}"))),
            None => Some(collapse_whitespace(&name)),
        }
    }
}

pub fn extract_ingredients(slots: &[IngredientSlot]) -> Vec<String> {
    slots.iter().filter_map(IngredientSlot::line).collect()
}

/// Full lookup record as the provider sends it, ingredients spread over
/// numbered `strIngredientN` / `strMeasureN` fields.
#[derive(Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal")]
    pub id: MealId,

    #[serde(rename = "strMeal")]
    pub name: Option<String>,

    #[serde(rename = "strArea")]
    pub area: Option<String>,

    #[serde(rename = "strCategory")]
    pub category: Option<String>,

    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,

    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,

    #[serde(rename = "strTags")]
    pub tags: Option<String>,

    #[serde(rename = "strYoutube")]
    pub youtube: Option<String>,

    #[serde(rename = "strSource")]
    pub source: Option<String>,

    #[serde(flatten)]
    pub rest: HashMap<String, Value>,
}

impl MealRecord {
    fn field(&self, key: &str) -> Option<String> {
        self.rest.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn slots(&self) -> [IngredientSlot; INGREDIENT_SLOTS] {
        std::array::from_fn(|index| {
            let slot = index + 1;

            IngredientSlot {
                measure: self.field(&format!("strMeasure{slot}")),
                name: self.field(&format!("strIngredient{slot}")),
            }
        })
    }
}

impl From<MealRecord> for MealDetail {
    fn from(record: MealRecord) -> Self {
        let ingredients = extract_ingredients(&record.slots());

        let tags = record
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|tag| non_blank(Some(tag)))
            .collect();

        Self {
            ingredients,
            tags,
            name: non_blank(record.name.as_deref()).unwrap_or_default(),
            area: non_blank(record.area.as_deref()).unwrap_or_default(),
            category: non_blank(record.category.as_deref()).unwrap_or_default(),
            thumbnail: non_blank(record.thumbnail.as_deref()).unwrap_or_default(),
            instructions: record
                .instructions
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
            youtube: non_blank(record.youtube.as_deref()),
            source: non_blank(record.source.as_deref()),
            id: record.id,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ListEntry {
    #[serde(rename = "strArea", alias = "strCategory", default)]
    pub name: Option<String>,
}

/// Items under `items_key` in a `{ "<items_key>": [ ... ] | null }` body.
/// A null or missing list is empty, not an error.
pub fn items<T: DeserializeOwned>(body: &str, items_key: &str) -> Result<Vec<T>, serde_json::Error> {
    let mut envelope: Map<String, Value> = serde_json::from_str(body)?;

    match envelope.remove(items_key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list),
    }
}

fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
