//! Extraction of prediction texts from an HTML response body

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Identifier of the result slot in both the response and the live page.
pub const RESULT_TEXT_ID: &str = "resultText";
/// Identifier of the probability slot.
pub const PROBABILITY_TEXT_ID: &str = "probabilityText";
/// Identifier of the container revealed on success.
pub const RESULT_BOX_ID: &str = "resultBox";
/// Class marker whose removal reveals the container.
pub const HIDDEN_CLASS: &str = "hidden";

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#resultText").expect("static selector should parse"));
static PROBABILITY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#probabilityText").expect("static selector should parse"));

/// The two optional texts pulled out of a parsed response document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionFragment {
    pub result: Option<String>,
    pub probability: Option<String>,
}

/// Parse a response body and extract the prediction texts.
///
/// Parsing is lenient: malformed markup yields missing elements, never an
/// error. An element that exists but renders no text counts as absent, the
/// same as the falsy check the live page applies.
pub fn extract_prediction(html: &str) -> PredictionFragment {
    let doc = Html::parse_document(html);
    let result = element_text(&doc, &RESULT_SELECTOR);
    // The probability slot is read whether or not a result was found.
    let probability = element_text(&doc, &PROBABILITY_SELECTOR);
    PredictionFragment { result, probability }
}

fn element_text(doc: &Html, selector: &Selector) -> Option<String> {
    let element = doc.select(selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
