use thiserror::Error;

use crate::TrackId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid Position: track {track_id} got non-finite center ({x}, {y})")]
    InvalidPosition { track_id: TrackId, x: f64, y: f64 },

    #[error("Invalid Config: {0}")]
    InvalidConfig(&'static str),
}
