//! The submission handler: one multipart POST per submit action
//!
//! Stateless across invocations. Overlapping submissions are allowed and
//! unordered: each applies its own update whenever its own response lands.

use crate::config::Config;
use crate::error::Result;
use crate::fragment::{self, PredictionFragment};
use crate::page::PageSurface;
use crate::schemas::FormPayload;
use tokio::sync::Mutex;
use tracing::debug;

/// Fixed prediction endpoint path.
pub const PREDICT_PATH: &str = "/predict";

/// What one submit cycle did to the live page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOutcome {
    /// True when a result text was found and the page was updated.
    pub applied: bool,
    pub result: Option<String>,
    pub probability: Option<String>,
}

pub struct SubmissionHandler {
    client: reqwest::Client,
    predict_url: String,
}

impl SubmissionHandler {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let predict_url = format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH);
        Ok(Self { client, predict_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.runtime.endpoint, config.runtime.http_timeout_ms)
    }

    /// Run one full submit cycle: POST the payload, parse the response, and
    /// apply the extracted texts to the live page. The page lock is taken
    /// only for the apply step, so competing completions interleave freely.
    pub async fn submit<P: PageSurface>(
        &self,
        payload: &FormPayload,
        page: &Mutex<P>,
    ) -> Result<SubmitOutcome> {
        let fragment = self.fetch_prediction(payload).await?;
        let mut page = page.lock().await;
        apply_prediction(&fragment, &mut *page)
    }

    /// POST the payload as multipart form data and extract the prediction
    /// texts from the response body. The body is read regardless of status:
    /// an error page simply carries no result slot and applies nothing.
    pub async fn fetch_prediction(&self, payload: &FormPayload) -> Result<PredictionFragment> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in payload.fields() {
            form = form.text(name.clone(), value.clone());
        }

        debug!("POST {} ({} fields)", self.predict_url, payload.len());
        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;
        let body = response.text().await?;

        Ok(fragment::extract_prediction(&body))
    }
}

/// Copy the extracted texts into the live page.
///
/// When the result text is absent the page is left entirely untouched; the
/// probability slot was still read upstream either way. An absent probability
/// with a present result applies the empty string.
pub fn apply_prediction<P: PageSurface>(
    fragment: &PredictionFragment,
    page: &mut P,
) -> Result<SubmitOutcome> {
    let Some(result) = fragment.result.as_deref() else {
        return Ok(SubmitOutcome {
            applied: false,
            result: None,
            probability: fragment.probability.clone(),
        });
    };

    page.set_element_text(fragment::RESULT_TEXT_ID, result)?;
    page.set_element_text(
        fragment::PROBABILITY_TEXT_ID,
        fragment.probability.as_deref().unwrap_or(""),
    )?;
    page.remove_class(fragment::RESULT_BOX_ID, fragment::HIDDEN_CLASS)?;

    Ok(SubmitOutcome {
        applied: true,
        result: Some(result.to_string()),
        probability: fragment.probability.clone(),
    })
}
