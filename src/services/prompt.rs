/// Instruction sent alongside every label photo.
pub const ANALYSIS_PROMPT: &str = r#"You are a sports nutrition expert. Analyze this supplement label photo.

1. INGREDIENTS:
- List every active ingredient printed on the label.
- Give the quantity exactly as printed (e.g. "200mg", "3.2g"). Use an empty string if no quantity is shown.
- For each ingredient, describe its mechanism of action and its effects in one or more short sentences.

2. QUALITY SCORES:
Rate the following qualities from 1 to 100 based on the ingredients, their quantities and their effects:
- pump: muscle blood flow and vasodilation
- energy: stimulant effects and alertness
- focus: mental clarity and concentration
- recovery: muscle recovery and reduced soreness
- endurance: stamina and sustained performance

Use these bands:
- 1-20: minimal effect
- 21-40: mild effect
- 41-60: moderate effect
- 61-80: strong effect
- 81-100: very strong effect

RESPONSE FORMAT (use exactly this JSON structure):
{
  "ingredients": [
    {"name": string, "quantity": string, "effects": [string]}
  ],
  "qualities": {
    "pump": number,
    "energy": number,
    "focus": number,
    "recovery": number,
    "endurance": number
  }
}

Respond with the JSON object only. Do not include any other text or commentary."#;

pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
