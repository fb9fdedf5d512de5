use secrecy::SecretString;
use std::env;

use crate::errors::{AppError, AppResult};

pub const MAX_QUESTION_COUNT_LIMIT: u32 = 1000;

#[derive(Clone, Debug)]
pub struct Config {
    pub min_question_count: u32,
    pub max_question_count: u32,
    pub default_question_count: u32,
    pub pass_threshold: f64, // fraction, 0.70 means 70%
    pub category_recommendation_cutoff: f64,
    pub difficulty_recommendation_cutoff: f64,
    pub ai_base_url: String,
    pub ai_model: String,
    pub ai_api_key: Option<SecretString>,
    pub ai_temperature: f32,
    pub ai_max_tokens: u32,
    pub ai_timeout_seconds: u64,
    pub max_document_size_mb: u64,
    pub results_dir: String,
    pub results_max_age_days: u64,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads `.env` (if present) and then reads the environment.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self {
            min_question_count: parse_var("QUIZ_MIN_QUESTIONS", 10),
            max_question_count: parse_var("QUIZ_MAX_QUESTIONS", 40),
            default_question_count: parse_var("QUIZ_DEFAULT_QUESTIONS", 15),
            pass_threshold: parse_var("QUIZ_PASS_THRESHOLD", 0.70),
            category_recommendation_cutoff: parse_var("QUIZ_CATEGORY_CUTOFF", 60.0),
            difficulty_recommendation_cutoff: parse_var("QUIZ_DIFFICULTY_CUTOFF", 50.0),
            ai_base_url: env::var("QUIZ_AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            ai_model: env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),
            ai_api_key: env::var("QUIZ_AI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            ai_temperature: parse_var("QUIZ_AI_TEMPERATURE", 0.7),
            ai_max_tokens: parse_var("QUIZ_AI_MAX_TOKENS", 4000),
            ai_timeout_seconds: parse_var("QUIZ_AI_TIMEOUT_SECONDS", 120),
            max_document_size_mb: parse_var("QUIZ_MAX_DOCUMENT_MB", 50),
            results_dir: env::var("QUIZ_RESULTS_DIR").unwrap_or_else(|_| "temp".to_string()),
            results_max_age_days: parse_var("QUIZ_RESULTS_MAX_AGE_DAYS", 7),
        }
    }

    /// Checks that the quiz bounds and thresholds are coherent.
    pub fn validate(&self) -> AppResult<()> {
        if self.min_question_count == 0 {
            return Err(AppError::InvalidInput(
                "QUIZ_MIN_QUESTIONS must be at least 1".to_string(),
            ));
        }
        if self.min_question_count > self.max_question_count {
            return Err(AppError::InvalidInput(format!(
                "QUIZ_MIN_QUESTIONS ({}) exceeds QUIZ_MAX_QUESTIONS ({})",
                self.min_question_count, self.max_question_count
            )));
        }
        if self.max_question_count > MAX_QUESTION_COUNT_LIMIT {
            return Err(AppError::InvalidInput(format!(
                "QUIZ_MAX_QUESTIONS ({}) exceeds the limit of {}",
                self.max_question_count, MAX_QUESTION_COUNT_LIMIT
            )));
        }
        if !(self.min_question_count..=self.max_question_count)
            .contains(&self.default_question_count)
        {
            return Err(AppError::InvalidInput(format!(
                "QUIZ_DEFAULT_QUESTIONS ({}) must lie within {}..={}",
                self.default_question_count, self.min_question_count, self.max_question_count
            )));
        }
        if !(self.pass_threshold > 0.0 && self.pass_threshold <= 1.0) {
            return Err(AppError::InvalidInput(format!(
                "QUIZ_PASS_THRESHOLD ({}) must be a fraction in (0, 1]",
                self.pass_threshold
            )));
        }
        Ok(())
    }

    pub fn max_document_size_bytes(&self) -> u64 {
        self.max_document_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn test_config() -> Self {
        Self {
            min_question_count: 10,
            max_question_count: 40,
            default_question_count: 15,
            pass_threshold: 0.70,
            category_recommendation_cutoff: 60.0,
            difficulty_recommendation_cutoff: 50.0,
            ai_base_url: "http://localhost:9999/v1".to_string(),
            ai_model: "test-model".to_string(),
            ai_api_key: Some(SecretString::from("test_api_key".to_string())),
            ai_temperature: 0.7,
            ai_max_tokens: 4000,
            ai_timeout_seconds: 5,
            max_document_size_mb: 1,
            results_dir: "temp-test".to_string(),
            results_max_age_days: 7,
        }
    }
}
