// SPDX-License-Identifier: Apache-2.0 OR MIT
// Runtime-mutable minimum severity for the logger

use crate::{Level, ParseError};
use std::sync::RwLock;

struct LevelState {
    level: Level,
    label: String,
}

/// Owns the current minimum severity and its label.
///
/// The lock covers only the read or read-modify-write of the pair itself and
/// is never held across sink I/O. `set` is the single mutation path, reached
/// either directly or from a dequeued control entry on the consumer thread.
pub struct LevelController {
    state: RwLock<LevelState>,
}

impl LevelController {
    /// Create a controller from an initial level word.
    ///
    /// An invalid word yields `Level::Unknown`, which filters out every
    /// non-control record until a valid level is set.
    pub fn new(word: &str) -> Self {
        let word = crate::trim_spaces(word);
        let level = Level::parse(word).unwrap_or(Level::Unknown);
        Self {
            state: RwLock::new(LevelState {
                level,
                label: level.as_str().to_string(),
            }),
        }
    }

    pub fn level(&self) -> Level {
        self.state.read().unwrap().level
    }

    pub fn label(&self) -> String {
        self.state.read().unwrap().label.clone()
    }

    /// Adopt a new minimum level.
    ///
    /// An unrecognized word leaves the state unchanged and reports the error
    /// to the caller (idempotent no-op).
    pub fn set(&self, word: &str) -> Result<(), ParseError> {
        let word = crate::trim_spaces(word);
        let level =
            Level::parse(word).ok_or_else(|| ParseError::UnknownLevelWord(word.to_string()))?;
        let mut state = self.state.write().unwrap();
        state.level = level;
        state.label = word.to_string();
        Ok(())
    }
}
