use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::track::OverlayStyle;

pub const DEFAULT_MAX_HISTORY: usize = 30;
pub const DEFAULT_FUTURE_HORIZON: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Number of most recent centers kept per track
    pub max_history: usize,

    /// Number of frames extrapolated past the last observation
    pub future_horizon: usize,

    /// Drop tracks unseen for more than this many frames. `None` keeps every
    /// history for the whole session.
    pub stale_after: Option<u64>,

    pub style: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            future_horizon: DEFAULT_FUTURE_HORIZON,
            stale_after: None,
            style: OverlayStyle::default(),
        }
    }
}

impl Config {
    pub fn new(max_history: usize, future_horizon: usize) -> Self {
        Self {
            max_history,
            future_horizon,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_stale_after(mut self, frames: u64) -> Self {
        self.stale_after = Some(frames);
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_history == 0 {
            return Err(Error::InvalidConfig("max_history must be at least 1"));
        }

        if self.future_horizon == 0 {
            return Err(Error::InvalidConfig("future_horizon must be at least 1"));
        }

        Ok(())
    }
}
