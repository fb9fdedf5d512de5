pub mod answer;
pub mod question;
pub mod quiz_context;
pub mod quiz_session;
pub mod results;
pub use answer::{Answer, AnswerFeedback, AnswerRecord};
pub use question::{Difficulty, Question, QuestionKind};
pub use quiz_context::QuizContext;
pub use quiz_session::{Navigation, QuizSession, SessionProgress, SessionSnapshot, SessionState};
pub use results::{Grade, GroupStats, ResultsSummary};
