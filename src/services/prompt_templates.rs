use serde_json::{json, Value as JsonValue};

use crate::models::reputation::ReputationRecord;

/// Natural-language prompt asking for a one-sentence merchant recommendation.
pub fn build_insight_prompt(record: &ReputationRecord) -> String {
    format!(
        "Analyze the following customer delivery history for a merchant:\n\
         Phone: {phone}\n\
         Success Deliveries: {success}\n\
         Returns: {returns}\n\
         Success Rate: {rate}%\n\
         \n\
         Provide a 1-sentence professional summary advice for the merchant.",
        phone = record.phone,
        success = record.success_count,
        returns = record.return_count,
        rate = record.success_rate(),
    )
}

/// `generateContent` request body carrying a single user turn.
pub fn build_insight_request_body(prompt: &str) -> JsonValue {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ]
    })
}

/// Structured view of the record used for diagnostics logging.
pub fn build_insight_log_payload(record: &ReputationRecord, model: &str) -> JsonValue {
    json!({
        "operation": "riskInsight",
        "model": model,
        "phone": record.phone,
        "successCount": record.success_count,
        "returnCount": record.return_count,
        "successRate": record.success_rate(),
    })
}
