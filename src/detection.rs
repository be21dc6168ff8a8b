use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::{Position, TrackId};

/// Tracked detection: persistent track id, (x,y) of the bbox center and its
/// (width,height)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    #[serde(rename = "id")]
    pub track_id: TrackId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Detection {
    #[inline]
    pub fn new(track_id: TrackId, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            track_id,
            x,
            y,
            w,
            h,
        }
    }

    #[inline(always)]
    pub fn center(&self) -> Position {
        na::Point2::new(self.x as f64, self.y as f64)
    }

    #[inline(always)]
    pub fn xmin(&self) -> f32 {
        self.x - self.w / 2.
    }

    #[inline(always)]
    pub fn xmax(&self) -> f32 {
        self.x + self.w / 2.
    }

    #[inline(always)]
    pub fn ymin(&self) -> f32 {
        self.y - self.h / 2.
    }

    #[inline(always)]
    pub fn ymax(&self) -> f32 {
        self.y + self.h / 2.
    }
}
