use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{QuizContext, ResultsSummary};

const FILE_PREFIX: &str = "quiz_results_";
const FILE_EXTENSION: &str = "json";

/// A finished attempt together with the context it was taken in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResults {
    pub context: QuizContext,
    pub summary: ResultsSummary,
}

#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Persists results and returns the key they can be loaded back with.
    async fn save(&self, results: &StoredResults) -> AppResult<String>;
    async fn load(&self, key: &str) -> AppResult<Option<StoredResults>>;
    /// Deletes entries at least `max_age` old; returns how many were removed.
    async fn cleanup_older_than(&self, max_age: Duration) -> AppResult<usize>;
}

pub struct FileResultsRepository {
    dir: PathBuf,
}

impl FileResultsRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.results_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(results: &StoredResults) -> String {
        let timestamp = results.summary.completed_at.unwrap_or_else(Utc::now);
        format!(
            "{}{}_{}.{}",
            FILE_PREFIX,
            timestamp.format("%Y%m%d_%H%M%S"),
            results.summary.session_id,
            FILE_EXTENSION
        )
    }

    fn is_results_file(name: &str) -> bool {
        name.starts_with(FILE_PREFIX) && name.ends_with(&format!(".{}", FILE_EXTENSION))
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(AppError::InvalidInput(format!(
                "Invalid results key '{}'",
                key
            )));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl ResultsRepository for FileResultsRepository {
    async fn save(&self, results: &StoredResults) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let key = Self::file_name(results);
        let body = serde_json::to_vec_pretty(results)?;
        tokio::fs::write(self.dir.join(&key), body).await?;

        log::info!("Saved quiz results to {}", self.dir.join(&key).display());
        Ok(key)
    }

    async fn load(&self, key: &str) -> AppResult<Option<StoredResults>> {
        let path = self.resolve(key)?;
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let results = serde_json::from_slice(&body)?;

        log::debug!("Loaded quiz results from {}", path.display());
        Ok(Some(results))
    }

    async fn cleanup_older_than(&self, max_age: Duration) -> AppResult<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !Self::is_results_file(name) {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age >= max_age {
                tokio::fs::remove_file(entry.path()).await?;
                log::info!("Cleaned up old results file: {}", name);
                removed += 1;
            }
        }
        Ok(removed)
    }
}
