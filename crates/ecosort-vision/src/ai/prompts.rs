//! Instructions and output schema sent with every classification request
//!
//! Two variants exist. The free-form prompt spells out the JSON layout in
//! prose and the response has to be cleaned up before parsing. The
//! structured prompt is shorter and relies on `responseSchema`.

use serde_json::{json, Value};

/// Category labels the model is allowed to emit
pub const CATEGORY_LABELS: [&str; 5] = [
    "Biodegradable",
    "Recyclable",
    "Non-Recyclable",
    "Hazardous",
    "E-Waste",
];

/// Prompt used when the response format is not enforced
pub const FREE_FORM_INSTRUCTIONS: &str = r#"
You are an expert waste management assistant. Your goal is to identify ALL distinct waste objects in the provided image.
For EACH item identified, provide the following details:

1. itemName: A short, descriptive name (e.g., "Plastic Water Bottle", "Apple Core").
2. material: The primary material (e.g., Plastic, Paper, Glass, Metal, Organic, Electronic).
3. category: Must be one of [Biodegradable, Recyclable, Non-Recyclable, Hazardous, E-Waste].
4. confidence: A number between 0 and 1.
5. disposalInstruction: A concise sentence on proper disposal.
6. recyclingTips: A list of 2 short tips.
7. funFact: A short interesting fact.

RETURN ONLY RAW JSON. The JSON must have a root property "items" which is an array.
Structure:
{
  "items": [
    {
      "itemName": "string",
      "material": "string",
      "category": "string",
      "confidence": number,
      "disposalInstruction": "string",
      "recyclingTips": ["string"],
      "funFact": "string"
    }
  ]
}
"#;

/// Prompt used together with [`response_schema`]
pub const STRUCTURED_INSTRUCTIONS: &str = "You are an expert waste management assistant. \
Identify ALL distinct waste objects in the provided image. \
For each object give a short name, its primary material, a category \
(one of Biodegradable, Recyclable, Non-Recyclable, Hazardous, E-Waste), \
a confidence between 0 and 1, one concise disposal sentence, two short recycling tips \
and optionally a short fun fact. If no waste is visible return an empty items list.";

/// Output schema in the OpenAPI subset accepted by `generationConfig.responseSchema`
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "itemName": { "type": "STRING" },
                        "material": { "type": "STRING" },
                        "category": { "type": "STRING", "enum": CATEGORY_LABELS },
                        "confidence": { "type": "NUMBER" },
                        "disposalInstruction": { "type": "STRING" },
                        "recyclingTips": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "funFact": { "type": "STRING" }
                    },
                    "required": [
                        "itemName",
                        "material",
                        "category",
                        "confidence",
                        "disposalInstruction",
                        "recyclingTips"
                    ]
                }
            }
        },
        "required": ["items"]
    })
}
