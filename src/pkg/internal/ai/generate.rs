use std::sync::Arc;

use ai::{
    chat_completions::{ChatCompletion, ChatCompletionMessage, ChatCompletionRequestBuilder},
    clients::openai::Client,
};
use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, prelude::Result};

/// Substituted for the model reply when the invocation fails; parses to
/// all-fallback fields downstream.
pub const FALLBACK_RESPONSE: &str = "Error: Could not get response from AI model.";

const ANALYSIS_PROMPT: &str = r#"You are an expert ATS (Applicant Tracking System) with a deep understanding of recruitment.
Your task is to analyze the following resume against the provided job description.

Provide a detailed analysis in the following format, using these exact headings:
**Relevance Score:** A score from 0 to 100.
**Verdict:** A short verdict, either "High Fit", "Medium Fit", or "Low Fit".
**Summary:** A brief, 2-3 sentence summary.
**Missing Skills:** A list of the top 3-5 missing skills.
---
**Job Description:**
{jd}
---
**Resume:**
{resume}
---"#;

pub fn analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    ANALYSIS_PROMPT
        .replace("{jd}", jd_text)
        .replace("{resume}", resume_text)
}

#[async_trait::async_trait]
pub trait AnalyzeOps {
    async fn fit_assessment(&self, resume_text: &str, jd_text: &str) -> String;
}

#[async_trait::async_trait]
impl AnalyzeOps for Arc<Client> {
    async fn fit_assessment(&self, resume_text: &str, jd_text: &str) -> String {
        match complete(self, resume_text, jd_text).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!("ai analysis failed: {}", &err);
                FALLBACK_RESPONSE.into()
            }
        }
    }
}

async fn complete(client: &Client, resume_text: &str, jd_text: &str) -> Result<String> {
    let prompt = analysis_prompt(resume_text, jd_text);
    let request = ChatCompletionRequestBuilder::default()
        .model(&settings.ai_model)
        .messages(vec![ChatCompletionMessage::User(prompt.into())])
        .build()
        .map_err(|e| StandardError::new("ERR-AI-001").interpolate_err(e.to_string()))?;
    let response = client
        .chat_completions(&request)
        .await
        .map_err(|e| StandardError::new("ERR-AI-002").interpolate_err(e.to_string()))?;
    let answer = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_ref())
        .ok_or_else(|| StandardError::new("ERR-AI-002"))?
        .clone();
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts_verbatim() {
        let prompt = analysis_prompt("rust, sqlx, axum", "senior backend engineer");
        assert!(prompt.contains("rust, sqlx, axum"));
        assert!(prompt.contains("senior backend engineer"));
        let jd_at = prompt.find("**Job Description:**").unwrap();
        let resume_at = prompt.find("**Resume:**").unwrap();
        assert!(jd_at < resume_at);
    }

    #[test]
    fn test_prompt_requests_the_four_headings_in_order() {
        let prompt = analysis_prompt("", "");
        let score = prompt.find("**Relevance Score:**").unwrap();
        let verdict = prompt.find("**Verdict:**").unwrap();
        let summary = prompt.find("**Summary:**").unwrap();
        let missing = prompt.find("**Missing Skills:**").unwrap();
        assert!(score < verdict && verdict < summary && summary < missing);
    }
}
