//! Waste classification data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when the model omits an item name
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// Sentinel used when the model omits a material
pub const UNKNOWN_MATERIAL: &str = "Unknown Material";

/// Fallback disposal instruction
pub const DEFAULT_DISPOSAL_INSTRUCTION: &str = "Dispose of carefully.";

/// Disposal category of a waste item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteCategory {
    Biodegradable,
    Recyclable,
    #[serde(rename = "Non-Recyclable")]
    NonRecyclable,
    Hazardous,
    #[serde(rename = "E-Waste")]
    EWaste,
    #[default]
    Unknown,
}

const BIODEGRADABLE_KEYWORDS: &[&str] = &["bio", "organic", "compost"];
const NON_RECYCLABLE_KEYWORDS: &[&str] = &["non-recyclable", "residual", "landfill"];
const RECYCLABLE_KEYWORDS: &[&str] = &["recyclable", "paper", "plastic", "glass", "metal"];
const HAZARDOUS_KEYWORDS: &[&str] = &["hazard", "toxic"];
const E_WASTE_KEYWORDS: &[&str] = &["e-waste", "electronic"];

/// Keyword groups checked in order; the first group with a hit wins.
///
/// Biodegradable and non-recyclable come before the generic material
/// keywords so "organic plastic" resolves to Biodegradable.
const KEYWORD_RULES: [(&[&str], WasteCategory); 5] = [
    (BIODEGRADABLE_KEYWORDS, WasteCategory::Biodegradable),
    (NON_RECYCLABLE_KEYWORDS, WasteCategory::NonRecyclable),
    (RECYCLABLE_KEYWORDS, WasteCategory::Recyclable),
    (HAZARDOUS_KEYWORDS, WasteCategory::Hazardous),
    (E_WASTE_KEYWORDS, WasteCategory::EWaste),
];

impl WasteCategory {
    /// All categories in display order
    pub const ALL: [WasteCategory; 6] = [
        WasteCategory::Biodegradable,
        WasteCategory::Recyclable,
        WasteCategory::NonRecyclable,
        WasteCategory::Hazardous,
        WasteCategory::EWaste,
        WasteCategory::Unknown,
    ];

    /// Canonical label (same as the serialized form)
    pub fn label(&self) -> &'static str {
        match self {
            WasteCategory::Biodegradable => "Biodegradable",
            WasteCategory::Recyclable => "Recyclable",
            WasteCategory::NonRecyclable => "Non-Recyclable",
            WasteCategory::Hazardous => "Hazardous",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Unknown => "Unknown",
        }
    }

    /// Map a free-form category string from the model onto a category.
    ///
    /// Matching is case-insensitive substring search over [`KEYWORD_RULES`].
    pub fn from_label_keywords(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, category)| *category)
            .unwrap_or(WasteCategory::Unknown)
    }

    /// Fill colour used by the history chart
    pub fn chart_color(&self) -> &'static str {
        match self {
            WasteCategory::Biodegradable => "#86efac",
            WasteCategory::Recyclable => "#93c5fd",
            WasteCategory::NonRecyclable => "#cbd5e1",
            WasteCategory::Hazardous => "#fca5a5",
            WasteCategory::EWaste => "#fcd34d",
            WasteCategory::Unknown => "#e2e8f0",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One identified object in an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteItem {
    /// Short label, e.g. "Plastic Water Bottle"
    pub item_name: String,
    /// Primary material, e.g. "Plastic"
    pub material: String,
    pub category: WasteCategory,
    /// Model confidence, nominally 0.0-1.0 (not clamped)
    pub confidence: f64,
    pub disposal_instruction: String,
    #[serde(default)]
    pub recycling_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
}

/// Items found in one image. Empty is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub items: Vec<WasteItem>,
}

impl ClassificationResult {
    pub fn new(items: Vec<WasteItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A classification result stamped for the history view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<WasteItem>,
}

impl ScanResult {
    pub fn new(result: ClassificationResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            items: result.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_precedence() {
        assert_eq!(
            WasteCategory::from_label_keywords("Organic plastic packaging"),
            WasteCategory::Biodegradable
        );
        assert_eq!(
            WasteCategory::from_label_keywords("non-recyclable plastic film"),
            WasteCategory::NonRecyclable
        );
        assert_eq!(
            WasteCategory::from_label_keywords("Recyclable Glass"),
            WasteCategory::Recyclable
        );
        assert_eq!(
            WasteCategory::from_label_keywords("TOXIC"),
            WasteCategory::Hazardous
        );
        assert_eq!(
            WasteCategory::from_label_keywords("electronic waste"),
            WasteCategory::EWaste
        );
        assert_eq!(WasteCategory::from_label_keywords(""), WasteCategory::Unknown);
        assert_eq!(
            WasteCategory::from_label_keywords("general rubbish"),
            WasteCategory::Unknown
        );
    }

    #[test]
    fn test_labels_normalize_to_themselves() {
        for category in WasteCategory::ALL {
            assert_eq!(WasteCategory::from_label_keywords(category.label()), category);
        }
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&WasteCategory::NonRecyclable).unwrap();
        assert_eq!(json, "\"Non-Recyclable\"");
        let parsed: WasteCategory = serde_json::from_str("\"E-Waste\"").unwrap();
        assert_eq!(parsed, WasteCategory::EWaste);
    }

    #[test]
    fn test_waste_item_camel_case() {
        let item = WasteItem {
            item_name: "Can".to_string(),
            material: "Metal".to_string(),
            category: WasteCategory::Recyclable,
            confidence: 0.5,
            disposal_instruction: "Rinse and recycle.".to_string(),
            recycling_tips: vec![],
            fun_fact: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["itemName"], "Can");
        assert_eq!(value["disposalInstruction"], "Rinse and recycle.");
        assert!(value.get("funFact").is_none());
    }
}
