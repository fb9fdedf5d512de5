use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::constants::prompts::{
    NO_ADDITIONAL_CONTEXT, QUESTION_REQUIREMENTS, QUIZ_GENERATOR_ROLE, QUIZ_SYSTEM_PROMPT,
    RESPONSE_FORMAT_INSTRUCTIONS,
};
use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz_context::{experience_description, MAX_EXPERIENCE_LEVEL};
use crate::models::domain::{Difficulty, QuizContext};
use crate::models::dto::candidate::candidate_array_schema;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n?(.*?)\s*```$").expect("code fence regex is valid")
});

/// One tier's worth of questions to ask the generator for.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub context: QuizContext,
    pub document_context: Option<String>,
    pub difficulty: Difficulty,
    pub count: u32,
}

impl GenerationRequest {
    pub fn prompt(&self) -> String {
        let context = &self.context;
        let additional = context.additional_context();
        let additional = if additional.is_empty() {
            NO_ADDITIONAL_CONTEXT.to_string()
        } else {
            additional.join("\n- ")
        };
        let experience = experience_description(context.experience_level).unwrap_or_default();

        let mut prompt = format!(
            "{system}\n\n\
             Generate {count} {difficulty} level questions for a pharmaceutical consultant \
             with experience level {level}/{max_level} ({experience}).\n\n\
             Project Context:\n\
             - Therapy Area: {therapy_area}\n\
             - Indication: {indication}\n\
             - Project Type: {project_type}\n\
             - Client Scenario: {scenario}\n\
             - {additional}\n\n\
             Question Requirements:\n\
             - Difficulty Level: {difficulty} ({difficulty_description})\n\
             {requirements}\n",
            system = QUIZ_SYSTEM_PROMPT,
            count = self.count,
            difficulty = self.difficulty,
            level = context.experience_level,
            max_level = MAX_EXPERIENCE_LEVEL,
            experience = experience,
            therapy_area = context.therapy_area,
            indication = context.indication,
            project_type = context.project_type,
            scenario = context.client_scenario,
            additional = additional,
            difficulty_description = self.difficulty.description(),
            requirements = QUESTION_REQUIREMENTS,
        );

        if let Some(documents) = self.document_context.as_deref().filter(|d| !d.trim().is_empty())
        {
            prompt.push_str("\nSupporting Documents:\n");
            prompt.push_str(documents);
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "\nResponse Format:\n{}\n\nSchema:\n{}\n",
            RESPONSE_FORMAT_INSTRUCTIONS,
            candidate_array_schema()
        ));
        prompt
    }
}

/// Produces raw question candidates; validation happens downstream.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Value>>;
}

/// Question source backed by an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionQuestionSource {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionQuestionSource {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.ai_base_url.clone(),
            model: config.ai_model.clone(),
            api_key: config.ai_api_key.clone(),
            temperature: config.ai_temperature,
            max_tokens: config.ai_max_tokens,
        })
    }
}

#[async_trait]
impl QuestionSource for ChatCompletionQuestionSource {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Value>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AppError::GenerationFailure("AI API key is not configured".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: QUIZ_GENERATOR_ROLE.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        log::info!(
            "Requesting {} {} questions from model {}",
            request.count,
            request.difficulty,
            self.model
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Chat completion request failed with status {}", status);
            return Err(AppError::GenerationFailure(format!(
                "AI service responded with status {}",
                status
            )));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::GenerationFailure("AI service returned no content".to_string()))?;

        log::debug!("Raw generation reply: {}", content);
        parse_candidates(&content)
    }
}

/// Removes a surrounding markdown code fence, if any.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |inner| inner.as_str().trim())
}

/// Reads a reply as a JSON array of candidates or an object with a `questions` array.
pub fn parse_candidates(content: &str) -> AppResult<Vec<Value>> {
    let value: Value = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        log::error!("Failed to parse generation reply as JSON: {}", e);
        AppError::GenerationFailure("Invalid response format from AI service".to_string())
    })?;

    match value {
        Value::Array(candidates) => Ok(candidates),
        Value::Object(mut object) => match object.remove("questions") {
            Some(Value::Array(candidates)) => Ok(candidates),
            _ => Err(AppError::GenerationFailure(
                "AI response object has no questions array".to_string(),
            )),
        },
        _ => Err(AppError::GenerationFailure(
            "AI response is not a list of questions".to_string(),
        )),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
