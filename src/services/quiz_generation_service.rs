use std::sync::Arc;

use validator::Validate;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuizContext, QuizSession};
use crate::models::dto::request::GenerateQuizRequest;
use crate::services::difficulty_allocator::DifficultyAllocator;
use crate::services::document_source::DocumentSource;
use crate::services::question_source::{GenerationRequest, QuestionSource};
use crate::services::question_validator::QuestionValidator;

/// Builds quiz sessions from a project context and an external question source.
pub struct QuizGenerationService {
    question_source: Arc<dyn QuestionSource>,
    document_source: Option<Arc<dyn DocumentSource>>,
    allocator: DifficultyAllocator,
    default_question_count: u32,
}

impl QuizGenerationService {
    pub fn new(question_source: Arc<dyn QuestionSource>, config: &Config) -> Self {
        Self {
            question_source,
            document_source: None,
            allocator: DifficultyAllocator::from_config(config),
            default_question_count: config.default_question_count,
        }
    }

    pub fn with_document_source(mut self, document_source: Arc<dyn DocumentSource>) -> Self {
        self.document_source = Some(document_source);
        self
    }

    pub async fn generate_session(&self, request: GenerateQuizRequest) -> AppResult<QuizSession> {
        let questions = self.generate_questions(&request).await?;
        QuizSession::new(questions)
    }

    /// Validated questions in tier order (fundamental, intermediate, advanced).
    pub async fn generate_questions(&self, request: &GenerateQuizRequest) -> AppResult<Vec<Question>> {
        request.validate()?;

        let context = &request.context;
        let total = request
            .question_count
            .unwrap_or(self.default_question_count);
        let allocation = self.allocator.allocate(context.experience_level, total)?;
        let document_context = self.document_context(context).await;

        let mut questions = Vec::with_capacity(total as usize);
        for (difficulty, count) in allocation.tiers() {
            if count == 0 {
                continue;
            }
            let generation = GenerationRequest {
                context: context.clone(),
                document_context: document_context.clone(),
                difficulty,
                count,
            };
            let candidates = self.question_source.generate(&generation).await?;
            let tier_questions = QuestionValidator::new()
                .with_default_difficulty(difficulty)
                .validate(&candidates);
            log::info!(
                "Generated {} of {} requested {} questions ({} candidates)",
                tier_questions.len(),
                count,
                difficulty,
                candidates.len()
            );
            questions.extend(tier_questions);
        }

        if questions.is_empty() {
            log::error!(
                "No usable questions generated for {} / {}",
                context.therapy_area,
                context.indication
            );
            return Err(AppError::GenerationFailure(
                "No questions were generated. Please try again with different parameters."
                    .to_string(),
            ));
        }
        Ok(questions)
    }

    // Extraction problems never abort generation.
    async fn document_context(&self, context: &QuizContext) -> Option<String> {
        let source = self.document_source.as_ref()?;
        if context.documents.is_empty() {
            return None;
        }
        match source.extract_text(&context.documents).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                log::warn!("Documents yielded no text; generating without document context");
                None
            }
            Err(e) => {
                log::warn!("Document extraction failed, continuing without it: {}", e);
                None
            }
        }
    }
}
