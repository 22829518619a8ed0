//! Top-three high score ledger and its newline-delimited persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::LEDGER_CAPACITY;

const APP_DIR_NAME: &str = "power-snake";
const SCORE_FILE_NAME: &str = "highscores.txt";

/// Failure to read or write the persisted ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Storage collaborator for the ledger.
pub trait ScoreStore {
    /// Returns every well-formed score; malformed entries are skipped.
    fn load(&mut self) -> Result<Vec<u32>, LedgerError>;

    /// Replaces the persisted scores with `scores`.
    fn save(&mut self, scores: &[u32]) -> Result<(), LedgerError>;

    /// Erases the persisted representation.
    fn clear(&mut self) -> Result<(), LedgerError>;
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// One decimal integer per line, no header.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> Result<Vec<u32>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(self.io_error(error)),
        };
        Ok(parse_scores(&raw))
    }

    fn save(&mut self, scores: &[u32]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }
        fs::write(&self.path, format_scores(scores)).map_err(|error| self.io_error(error))
    }

    fn clear(&mut self) -> Result<(), LedgerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}

/// Keeps scores in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub scores: Vec<u32>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Vec<u32>, LedgerError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &[u32]) -> Result<(), LedgerError> {
        self.scores = scores.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), LedgerError> {
        self.scores.clear();
        Ok(())
    }
}

fn parse_scores(raw: &str) -> Vec<u32> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.parse::<u32>() {
            Ok(score) => Some(score),
            Err(error) => {
                log::warn!("skipping malformed score entry {line:?}: {error}");
                None
            }
        })
        .collect()
}

fn format_scores(scores: &[u32]) -> String {
    scores.iter().map(|score| format!("{score}\n")).collect()
}

/// Best [`LEDGER_CAPACITY`] scores, highest first.
pub struct ScoreLedger {
    entries: Vec<u32>,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for ScoreLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreLedger")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ScoreLedger {
    /// Loads the ledger from `store`, starting empty if it cannot be read.
    #[must_use]
    pub fn load(mut store: impl ScoreStore + 'static) -> Self {
        let mut entries = match store.load() {
            Ok(entries) => entries,
            Err(error) => {
                log::warn!("starting with an empty score ledger: {error}");
                Vec::new()
            }
        };
        rank(&mut entries);
        log::debug!("loaded {} high scores", entries.len());

        Self {
            entries,
            store: Box::new(store),
        }
    }

    /// Inserts `score`, keeps the best three and persists them.
    ///
    /// The in-memory ranking is updated even when saving fails.
    pub fn record(&mut self, score: u32) -> Result<(), LedgerError> {
        self.entries.push(score);
        rank(&mut self.entries);
        self.store.save(&self.entries)
    }

    /// Retained scores joined by ", ", or "0" when there are none.
    #[must_use]
    pub fn top_three(&self) -> String {
        if self.entries.is_empty() {
            return "0".to_string();
        }
        self.entries
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Forgets every score and erases the persisted copy.
    pub fn reset(&mut self) -> Result<(), LedgerError> {
        self.entries.clear();
        self.store.clear()
    }

    #[must_use]
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    #[must_use]
    pub fn best(&self) -> Option<u32> {
        self.entries.first().copied()
    }

    /// Returns true if recording `score` would keep it in the ledger.
    #[must_use]
    pub fn would_rank(&self, score: u32) -> bool {
        self.entries.len() < LEDGER_CAPACITY
            || self.entries.last().is_some_and(|lowest| score >= *lowest)
    }
}

fn rank(entries: &mut Vec<u32>) {
    entries.sort_unstable_by(|a, b| b.cmp(a));
    entries.truncate(LEDGER_CAPACITY);
}
