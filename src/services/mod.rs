pub mod difficulty_allocator;
pub mod document_source;
pub mod feedback_service;
pub mod question_source;
pub mod question_validator;
pub mod quiz_generation_service;
pub mod report_service;
pub mod scoring_service;

pub use difficulty_allocator::{DifficultyAllocation, DifficultyAllocator};
pub use document_source::{DocumentSource, FileDocumentSource};
pub use feedback_service::FeedbackService;
pub use question_source::{ChatCompletionQuestionSource, GenerationRequest, QuestionSource};
pub use question_validator::QuestionValidator;
pub use quiz_generation_service::QuizGenerationService;
pub use report_service::{JsonReportRenderer, ReportRenderer, TextReportRenderer};
pub use scoring_service::ScoringService;
