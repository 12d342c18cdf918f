//! Cue map: where each clip sits inside an audio sprite.
//!
//! Serialized as a JSON object mapping clip id to `[offset, duration]` in
//! seconds, in the order clips were concatenated.

use crate::error::{CoreError, CoreResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tolerance used when checking that offsets line up.
const OFFSET_EPSILON: f64 = 1e-6;

/// `(offset_secs, duration_secs)` of one clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue(pub f64, pub f64);

impl Cue {
    pub fn offset(&self) -> f64 {
        self.0
    }

    pub fn duration(&self) -> f64 {
        self.1
    }

    pub fn end(&self) -> f64 {
        self.0 + self.1
    }
}

/// Insertion-ordered clip id → cue mapping.
///
/// Built through [`CueMap::push`], which places each clip right after the
/// previous one, so offsets are contiguous by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueMap(IndexMap<String, Cue>);

impl CueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clip after the last one and returns its cue.
    pub fn push(&mut self, id: impl Into<String>, duration: f64) -> CoreResult<Cue> {
        let id = id.into();
        if !duration.is_finite() || duration < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "Clip '{id}' has invalid duration {duration}"
            )));
        }
        if self.0.contains_key(&id) {
            return Err(CoreError::InvalidInput(format!(
                "Duplicate clip id '{id}' in sprite"
            )));
        }

        let cue = Cue(self.total_duration(), duration);
        self.0.insert(id, cue);
        Ok(cue)
    }

    pub fn get(&self, id: &str) -> Option<&Cue> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cue)> {
        self.0.iter().map(|(id, cue)| (id.as_str(), cue))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the whole sprite in seconds.
    pub fn total_duration(&self) -> f64 {
        self.0.last().map(|(_, cue)| cue.end()).unwrap_or(0.0)
    }

    /// True when the first clip starts at 0 and each clip starts where the
    /// previous one ends.
    pub fn is_contiguous(&self) -> bool {
        let mut cursor = 0.0;
        for cue in self.0.values() {
            if (cue.offset() - cursor).abs() > OFFSET_EPSILON || cue.duration() < 0.0 {
                return false;
            }
            cursor = cue.end();
        }
        true
    }

    /// Pretty JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> CoreResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Loads a cue map sidecar, rejecting maps whose offsets do not line up.
    pub fn read_from(path: &Path) -> CoreResult<Self> {
        let map: CueMap = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        if !map.is_contiguous() {
            return Err(CoreError::InvalidInput(format!(
                "Cue map {} has non-contiguous offsets",
                path.display()
            )));
        }
        Ok(map)
    }
}
