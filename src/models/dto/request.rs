use serde::Deserialize;
use validator::Validate;

use crate::models::domain::QuizContext;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(nested)]
    pub context: QuizContext,

    // Falls back to the configured default; bounds are checked by the allocator.
    #[serde(default)]
    pub question_count: Option<u32>,
}

impl GenerateQuizRequest {
    pub fn new(context: QuizContext, question_count: Option<u32>) -> Self {
        Self {
            context,
            question_count,
        }
    }
}
