//! Prompt templates for the narrative analysis

use analyzer_prompt::{JinjaTemplate, Result};

/// Template name of the narrative analysis prompt
pub const NARRATIVE_ANALYSIS: &str = "stock.narrative_analysis";

const INSTRUCTIONS: &str = "Analyze the following stock data using both technical and fundamental analysis:
Technical Data (Open and Close prices):
{{ technical_data }}

Fundamental Data:
{{ fundamental_data }}

Provide insights on:
1. Overall trend
2. Key technical indicators
3. Important fundamental metrics
4. Potential strengths and weaknesses
5. Any notable patterns or anomalies";

/// Create the narrative analysis template
///
/// Variables: `technical_data`, `fundamental_data`. The language directive is
/// prefixed without a separator.
pub fn narrative_analysis() -> Result<JinjaTemplate> {
    JinjaTemplate::builder(NARRATIVE_ANALYSIS)
        .indonesian(format!("Answer in bahasa indonesia{INSTRUCTIONS}"))
        .english(format!("Answer in English{INSTRUCTIONS}"))
        .build()
}
