//! Turning loosely-shaped model output into [`ClassificationResult`]
//!
//! Parsing happens in two steps. First every record is read into a
//! [`RawWasteItem`] whose fields are all optional and whose types are
//! already checked (a number where a string belongs counts as absent).
//! Then [`RawWasteItem::into_waste_item`] fills sentinels and derives the
//! category from keywords.

use ecosort_types::{
    ClassificationResult, FailureCause, WasteCategory, WasteItem, DEFAULT_DISPOSAL_INSTRUCTION,
    UNKNOWN_ITEM_NAME, UNKNOWN_MATERIAL,
};
use serde_json::{Map, Value};
use tracing::warn;

/// Keys accepted for the item name, in priority order
const ITEM_NAME_KEYS: [&str; 3] = ["itemName", "item_name", "name"];

/// One record as the model sent it, type-checked but not defaulted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWasteItem {
    pub item_name: Option<String>,
    pub material: Option<String>,
    pub category: Option<String>,
    pub confidence: Option<f64>,
    pub disposal_instruction: Option<String>,
    pub recycling_tips: Option<Vec<String>>,
    pub fun_fact: Option<String>,
}

impl RawWasteItem {
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            item_name: ITEM_NAME_KEYS
                .iter()
                .find_map(|key| non_empty_string(obj.get(*key))),
            material: non_empty_string(obj.get("material")),
            category: obj.get("category").and_then(|v| v.as_str()).map(str::to_string),
            confidence: obj.get("confidence").and_then(|v| v.as_f64()),
            disposal_instruction: non_empty_string(obj.get("disposalInstruction")),
            recycling_tips: string_list(obj.get("recyclingTips")),
            fun_fact: obj.get("funFact").and_then(|v| v.as_str()).map(str::to_string),
        }
    }

    pub fn into_waste_item(self) -> WasteItem {
        let category = WasteCategory::from_label_keywords(self.category.as_deref().unwrap_or(""));
        WasteItem {
            item_name: self.item_name.unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string()),
            material: self.material.unwrap_or_else(|| UNKNOWN_MATERIAL.to_string()),
            category,
            confidence: self.confidence.unwrap_or(0.0),
            disposal_instruction: self
                .disposal_instruction
                .unwrap_or_else(|| DEFAULT_DISPOSAL_INSTRUCTION.to_string()),
            recycling_tips: self.recycling_tips.unwrap_or_default(),
            fun_fact: self.fun_fact,
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Array of strings; non-string entries are skipped, a lone string becomes one tip
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(values) => Some(
            values
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Strip code fences and surrounding prose so only the JSON document remains
pub fn extract_json_from_response(response: &str) -> String {
    let mut text = response.trim();

    if let Some(fence) = text.find("```") {
        // Drop the language tag (`json`, `JSON`, ...) on the opening fence
        let body = text[fence + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
        text = match body.rfind("```") {
            Some(end) => &body[..end],
            None => body,
        }
        .trim();
    }

    if let Some(start) = text.find(['{', '[']) {
        let close = if text[start..].starts_with('{') { '}' } else { ']' };
        if let Some(end) = text.rfind(close) {
            if start < end {
                return text[start..=end].to_string();
            }
        }
    }

    text.to_string()
}

/// Find the items collection inside a parsed response.
///
/// Accepts `{"items": [...]}`, a top-level array, or a bare single item
/// object. Anything else is an error unless `structured` is set, in which
/// case it counts as "nothing found".
pub fn locate_items(parsed: &Value, structured: bool) -> Result<Vec<&Value>, FailureCause> {
    match parsed {
        Value::Object(obj) => {
            if let Some(Value::Array(items)) = obj.get("items") {
                return Ok(items.iter().collect());
            }
            if ITEM_NAME_KEYS.iter().any(|key| obj.contains_key(*key)) {
                return Ok(vec![parsed]);
            }
        }
        Value::Array(items) => return Ok(items.iter().collect()),
        _ => {}
    }

    if structured {
        Ok(Vec::new())
    } else {
        Err(FailureCause::MissingItems)
    }
}

/// Clean, parse and normalize a raw model answer
pub fn normalize_response(text: &str, structured: bool) -> Result<ClassificationResult, FailureCause> {
    let json_str = extract_json_from_response(text);
    let parsed: Value = serde_json::from_str(&json_str)?;

    let items = locate_items(&parsed, structured)?
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match value.as_object() {
            Some(obj) => Some(RawWasteItem::from_object(obj).into_waste_item()),
            None => {
                warn!(index, "dropping non-object item record");
                None
            }
        })
        .collect();

    Ok(ClassificationResult::new(items))
}
