use serde::Serialize;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz_context::{MAX_EXPERIENCE_LEVEL, MIN_EXPERIENCE_LEVEL};
use crate::models::domain::Difficulty;

/// Percentage split across tiers for one experience level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultySplit {
    pub fundamental: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl DifficultySplit {
    const fn new(fundamental: u32, intermediate: u32, advanced: u32) -> Self {
        Self {
            fundamental,
            intermediate,
            advanced,
        }
    }

    pub fn sum(&self) -> u32 {
        self.fundamental + self.intermediate + self.advanced
    }
}

// Indexed by experience level - 1.
const DIFFICULTY_DISTRIBUTION: [DifficultySplit; 7] = [
    DifficultySplit::new(80, 15, 5),
    DifficultySplit::new(70, 20, 10),
    DifficultySplit::new(60, 25, 15),
    DifficultySplit::new(50, 30, 20),
    DifficultySplit::new(40, 35, 25),
    DifficultySplit::new(30, 40, 30),
    DifficultySplit::new(20, 50, 30),
];

/// Question counts per tier; always sums to the requested total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DifficultyAllocation {
    pub fundamental: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl DifficultyAllocation {
    pub fn total(&self) -> u32 {
        self.fundamental + self.intermediate + self.advanced
    }

    pub fn count(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Fundamental => self.fundamental,
            Difficulty::Intermediate => self.intermediate,
            Difficulty::Advanced => self.advanced,
        }
    }

    /// Tiers in generation order with their counts.
    pub fn tiers(&self) -> [(Difficulty, u32); 3] {
        Difficulty::ALL.map(|difficulty| (difficulty, self.count(difficulty)))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DifficultyAllocator {
    min_questions: u32,
    max_questions: u32,
}

impl DifficultyAllocator {
    pub fn new(min_questions: u32, max_questions: u32) -> Self {
        Self {
            min_questions,
            max_questions,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.min_question_count, config.max_question_count)
    }

    pub fn split_for_level(experience_level: u8) -> AppResult<DifficultySplit> {
        if !(MIN_EXPERIENCE_LEVEL..=MAX_EXPERIENCE_LEVEL).contains(&experience_level) {
            return Err(AppError::InvalidInput(format!(
                "Experience level must be between {} and {}, got {}",
                MIN_EXPERIENCE_LEVEL, MAX_EXPERIENCE_LEVEL, experience_level
            )));
        }
        Ok(DIFFICULTY_DISTRIBUTION[usize::from(experience_level - 1)])
    }

    /// Split `total_questions` across tiers for the given experience level.
    ///
    /// Fundamental and intermediate counts are floored; advanced takes the remainder.
    pub fn allocate(
        &self,
        experience_level: u8,
        total_questions: u32,
    ) -> AppResult<DifficultyAllocation> {
        let split = Self::split_for_level(experience_level)?;
        if !(self.min_questions..=self.max_questions).contains(&total_questions) {
            return Err(AppError::InvalidInput(format!(
                "Question count must be between {} and {}, got {}",
                self.min_questions, self.max_questions, total_questions
            )));
        }

        let fundamental = percent_of(total_questions, split.fundamental);
        let intermediate = percent_of(total_questions, split.intermediate);
        let advanced = total_questions - fundamental - intermediate;

        let allocation = DifficultyAllocation {
            fundamental,
            intermediate,
            advanced,
        };
        log::debug!(
            "Allocated {} questions for level {}: {:?}",
            total_questions,
            experience_level,
            allocation
        );
        Ok(allocation)
    }
}

// Widened so large totals cannot overflow; the result never exceeds `total`.
fn percent_of(total: u32, percent: u32) -> u32 {
    (u64::from(total) * u64::from(percent) / 100) as u32
}
