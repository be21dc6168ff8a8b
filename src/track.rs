use serde_derive::{Deserialize, Serialize};

use crate::{Position, TrackId};

/// Per-track output of one frame: observed trail and its predicted continuation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackPath {
    pub track_id: TrackId,

    // oldest first, ends at the current center
    pub history: Vec<Position>,

    // empty until the track has two observations
    pub prediction: Vec<Position>,
}

impl TrackPath {
    #[inline]
    pub fn current(&self) -> Option<&Position> {
        self.history.last()
    }

    #[inline]
    pub fn has_prediction(&self) -> bool {
        !self.prediction.is_empty()
    }

    pub fn overlay(&self, style: &OverlayStyle) -> Overlay {
        Overlay {
            track_id: self.track_id,
            trail: Polyline::from_positions(&self.history, style.trail_color, style.thickness),
            prediction: Polyline::from_positions(
                &self.prediction,
                style.prediction_color,
                style.thickness,
            ),
        }
    }
}

/// BGR colors and line thickness used to draw a [`TrackPath`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct OverlayStyle {
    pub trail_color: [u8; 3],
    pub prediction_color: [u8; 3],
    pub thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            trail_color: [25, 150, 230],
            prediction_color: [0, 0, 255],
            thickness: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub points: Vec<(i32, i32)>,
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Polyline {
    /// Truncates to integer pixels. Less than two points draw nothing, so the
    /// polyline is left empty.
    pub fn from_positions(positions: &[Position], color: [u8; 3], thickness: u32) -> Self {
        let points = if positions.len() < 2 {
            Vec::new()
        } else {
            positions.iter().map(|p| (p.x as i32, p.y as i32)).collect()
        };

        Self {
            points,
            color,
            thickness,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, for renderers that only draw single lines
    pub fn segments(&self) -> impl Iterator<Item = ((i32, i32), (i32, i32))> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub track_id: TrackId,
    pub trail: Polyline,
    pub prediction: Polyline,
}
