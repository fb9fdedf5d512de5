use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::answer::{Answer, AnswerFeedback, AnswerRecord};
use crate::models::domain::question::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Outcome of moving forward through the quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Advanced,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub current: usize, // 1-based
    pub total: usize,
    pub answered: usize,
    pub percentage: u32,
}

/// Serializable image of a session, used to persist and resume an attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: BTreeMap<usize, AnswerRecord>,
    pub state: SessionState,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One quiz attempt: a fixed, shuffled question order plus recorded answers.
///
/// State only moves `NotStarted -> InProgress -> Completed`; `reset` is the one
/// way back and discards every answer.
#[derive(Clone, Debug)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<Question>,
    current_index: usize,
    answers: BTreeMap<usize, AnswerRecord>,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session, shuffling the questions once with the thread RNG.
    pub fn new(questions: Vec<Question>) -> AppResult<Self> {
        Self::with_rng(questions, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(mut questions: Vec<Question>, rng: &mut R) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::InvalidInput(
                "A quiz session requires at least one question".to_string(),
            ));
        }
        questions.shuffle(rng);

        let session = Self {
            id: Uuid::new_v4(),
            questions,
            current_index: 0,
            answers: BTreeMap::new(),
            state: SessionState::NotStarted,
            started_at: None,
            completed_at: None,
        };
        log::info!(
            "Created quiz session {} with {} questions",
            session.id,
            session.questions.len()
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(&index)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn start(&mut self) -> AppResult<()> {
        if self.state != SessionState::NotStarted {
            return Err(AppError::InvalidState(format!(
                "Cannot start a session in state {:?}",
                self.state
            )));
        }
        self.state = SessionState::InProgress;
        self.current_index = 0;
        self.started_at = Some(Utc::now());
        log::info!("Quiz session {} started", self.id);
        Ok(())
    }

    /// The question under the cursor, or `None` unless the session is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// Grade and record an answer; resubmitting the same index overwrites it.
    pub fn submit_answer(&mut self, index: usize, answer: Answer) -> AppResult<AnswerFeedback> {
        self.ensure_in_progress("submit an answer")?;
        let question = self.questions.get(index).ok_or(AppError::OutOfRange {
            index,
            len: self.questions.len(),
        })?;

        let is_correct = question.is_correct(&answer);
        let feedback = AnswerFeedback {
            question_index: index,
            is_correct,
            submitted_answer: answer.clone(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        };

        let previous = self.answers.insert(
            index,
            AnswerRecord {
                question_index: index,
                submitted_answer: answer,
                is_correct,
                timestamp: Utc::now(),
            },
        );
        log::info!(
            "Question {} answered {}{}",
            index + 1,
            if is_correct { "correctly" } else { "incorrectly" },
            if previous.is_some() { " (resubmitted)" } else { "" }
        );
        Ok(feedback)
    }

    pub fn submit_current(&mut self, answer: Answer) -> AppResult<AnswerFeedback> {
        self.submit_answer(self.current_index, answer)
    }

    pub fn can_go_back(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_index + 1 < self.questions.len()
    }

    /// Step back one question. Returns `false` when already on the first one.
    pub fn go_to_previous(&mut self) -> AppResult<bool> {
        self.ensure_in_progress("navigate")?;
        if !self.can_go_back() {
            return Ok(false);
        }
        self.current_index -= 1;
        Ok(true)
    }

    /// Step forward one question; on the last question this completes the quiz.
    pub fn go_to_next(&mut self) -> AppResult<Navigation> {
        self.ensure_in_progress("navigate")?;
        if self.can_go_forward() {
            self.current_index += 1;
            return Ok(Navigation::Advanced);
        }
        self.complete()?;
        Ok(Navigation::Completed)
    }

    pub fn complete(&mut self) -> AppResult<()> {
        self.ensure_in_progress("complete")?;
        self.state = SessionState::Completed;
        self.completed_at = Some(Utc::now());
        log::info!(
            "Quiz session {} completed with {}/{} answered",
            self.id,
            self.answers.len(),
            self.questions.len()
        );
        Ok(())
    }

    /// Back to `NotStarted` with no answers; the question order is kept.
    pub fn reset(&mut self) {
        self.state = SessionState::NotStarted;
        self.current_index = 0;
        self.answers.clear();
        self.started_at = None;
        self.completed_at = None;
        log::info!("Quiz session {} reset", self.id);
    }

    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let percentage = if total == 0 {
            0
        } else {
            (self.current_index * 100 / total) as u32
        };
        SessionProgress {
            current: self.current_index + 1,
            total,
            answered: self.answers.len(),
            percentage,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            questions: self.questions.clone(),
            current_index: self.current_index,
            answers: self.answers.clone(),
            state: self.state,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    /// Rebuild a session from a snapshot without reshuffling.
    pub fn restore(snapshot: SessionSnapshot) -> AppResult<Self> {
        let len = snapshot.questions.len();
        if len == 0 {
            return Err(AppError::InvalidInput(
                "Snapshot contains no questions".to_string(),
            ));
        }
        if snapshot.current_index >= len {
            return Err(AppError::OutOfRange {
                index: snapshot.current_index,
                len,
            });
        }
        if let Some((&index, _)) = snapshot
            .answers
            .iter()
            .find(|(i, record)| **i >= len || record.question_index != **i)
        {
            return Err(AppError::OutOfRange { index, len });
        }
        if snapshot.state == SessionState::NotStarted && !snapshot.answers.is_empty() {
            return Err(AppError::InvalidState(
                "Snapshot has answers but was never started".to_string(),
            ));
        }

        // Stored grades are not trusted; a shape that does not fit the kind grades as incorrect.
        let mut answers = snapshot.answers;
        for (index, record) in answers.iter_mut() {
            if let Some(question) = snapshot.questions.get(*index) {
                record.is_correct = question.is_correct(&record.submitted_answer);
            }
        }

        Ok(Self {
            id: snapshot.id,
            questions: snapshot.questions,
            current_index: snapshot.current_index,
            answers,
            state: snapshot.state,
            started_at: snapshot.started_at,
            completed_at: snapshot.completed_at,
        })
    }

    fn ensure_in_progress(&self, action: &str) -> AppResult<()> {
        if self.state != SessionState::InProgress {
            return Err(AppError::InvalidState(format!(
                "Cannot {} while the session is {:?}",
                action, self.state
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{sample_questions, seeded_rng};

    fn started_session() -> QuizSession {
        let mut session = QuizSession::with_rng(sample_questions(), &mut seeded_rng()).unwrap();
        session.start().unwrap();
        session
    }

    fn correct_answer_for(session: &QuizSession, index: usize) -> Answer {
        session.question(index).unwrap().correct_answer.clone()
    }

    #[test]
    fn new_session_rejects_empty_question_list() {
        let err = QuizSession::new(vec![]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn new_session_is_a_permutation_of_the_input() {
        let input = sample_questions();
        let session = QuizSession::with_rng(input.clone(), &mut seeded_rng()).unwrap();

        assert_eq!(session.len(), input.len());
        assert_eq!(session.state(), SessionState::NotStarted);
        for question in &input {
            assert!(session.questions().contains(question));
        }
    }

    #[test]
    fn current_question_is_absent_until_started() {
        let mut session = QuizSession::with_rng(sample_questions(), &mut seeded_rng()).unwrap();
        assert!(session.current_question().is_none());

        session.start().unwrap();
        assert_eq!(session.current_question(), session.question(0));
    }

    #[test]
    fn start_twice_is_invalid_state() {
        let mut session = started_session();
        let err = session.start().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STATE");
    }

    #[test]
    fn submit_before_start_is_invalid_state() {
        let mut session = QuizSession::with_rng(sample_questions(), &mut seeded_rng()).unwrap();
        let err = session
            .submit_answer(0, Answer::choice("anything"))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert!(session.answers().is_empty());
    }

    #[test]
    fn submit_out_of_range_index_fails() {
        let mut session = started_session();
        let err = session.submit_answer(99, Answer::choice("x")).unwrap_err();
        assert_eq!(err, AppError::OutOfRange { index: 99, len: 3 });
    }

    #[test]
    fn correct_submission_reports_feedback() {
        let mut session = started_session();
        let answer = correct_answer_for(&session, 0);

        let feedback = session.submit_answer(0, answer.clone()).unwrap();

        assert!(feedback.is_correct);
        assert_eq!(feedback.correct_answer, answer);
        assert_eq!(feedback.explanation, session.question(0).unwrap().explanation);
        assert!(session.answer(0).unwrap().is_correct);
    }

    #[test]
    fn resubmission_overwrites_previous_record() {
        let mut session = started_session();
        let correct = correct_answer_for(&session, 1);

        session.submit_answer(1, correct).unwrap();
        assert!(session.answer(1).unwrap().is_correct);

        session
            .submit_answer(1, Answer::choice("definitely wrong"))
            .unwrap();
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answer(1).unwrap().is_correct);
    }

    #[test]
    fn navigation_clamps_at_first_question() {
        let mut session = started_session();
        assert!(!session.go_to_previous().unwrap());
        assert_eq!(session.current_index(), 0);

        assert_eq!(session.go_to_next().unwrap(), Navigation::Advanced);
        assert!(session.go_to_previous().unwrap());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn next_on_last_question_completes() {
        let mut session = started_session();

        assert_eq!(session.go_to_next().unwrap(), Navigation::Advanced);
        assert_eq!(session.go_to_next().unwrap(), Navigation::Advanced);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.go_to_next().unwrap(), Navigation::Completed);

        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.completed_at().is_some());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn completed_session_rejects_mutation() {
        let mut session = started_session();
        session.complete().unwrap();

        assert_eq!(
            session.submit_answer(0, Answer::choice("x")).unwrap_err().error_code(),
            "INVALID_STATE"
        );
        assert!(session.go_to_next().is_err());
        assert!(session.complete().is_err());
        assert!(session.start().is_err());
    }

    #[test]
    fn reset_clears_answers_and_keeps_order() {
        let mut session = started_session();
        let order = session.questions().to_vec();
        let answer = correct_answer_for(&session, 0);
        session.submit_answer(0, answer).unwrap();
        session.go_to_next().unwrap();
        session.complete().unwrap();

        session.reset();

        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.questions(), order.as_slice());
        assert!(session.start().is_ok());
    }

    #[test]
    fn progress_tracks_position_and_answers() {
        let mut session = started_session();
        session.go_to_next().unwrap();
        let answer = correct_answer_for(&session, 1);
        session.submit_current(answer).unwrap();

        let progress = session.progress();
        assert_eq!(progress.current, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.percentage, 33);
    }

    #[test]
    fn snapshot_restores_the_same_session() {
        let mut session = started_session();
        let answer = correct_answer_for(&session, 0);
        session.submit_answer(0, answer).unwrap();
        session.go_to_next().unwrap();

        let json = serde_json::to_string(&session.snapshot()).unwrap();
        let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = QuizSession::restore(snapshot).unwrap();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.questions(), session.questions());
        assert_eq!(restored.current_index(), 1);
        assert_eq!(restored.answers(), session.answers());
        assert_eq!(restored.state(), SessionState::InProgress);
    }

    #[test]
    fn restore_regrades_stored_answers() {
        let mut session = started_session();
        let answer = correct_answer_for(&session, 0);
        session.submit_answer(0, answer).unwrap();
        session.submit_answer(1, Answer::selection(["not an option"])).unwrap();

        let mut snapshot = session.snapshot();
        snapshot.answers.get_mut(&0).unwrap().is_correct = false;
        snapshot.answers.get_mut(&1).unwrap().is_correct = true;
        let restored = QuizSession::restore(snapshot).unwrap();

        assert!(restored.answers()[&0].is_correct);
        assert!(!restored.answers()[&1].is_correct);
    }

    #[test]
    fn restore_rejects_answers_outside_question_range() {
        let mut session = started_session();
        let answer = correct_answer_for(&session, 0);
        session.submit_answer(0, answer).unwrap();

        let mut snapshot = session.snapshot();
        let mut record = snapshot.answers.remove(&0).unwrap();
        record.question_index = 7;
        snapshot.answers.insert(7, record);

        assert_eq!(
            QuizSession::restore(snapshot).unwrap_err(),
            AppError::OutOfRange { index: 7, len: 3 }
        );
    }
}
