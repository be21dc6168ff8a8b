pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod math;
pub mod predictor;
pub mod scene;
pub mod store;
pub mod track;

mod circular_queue;

pub use circular_queue::CircularQueue;
pub use config::Config;
pub use detection::Detection;
pub use error::Error;
pub use frame::Frame;
pub use predictor::PathPredictor;
pub use scene::{FrameOutput, Scene};
pub use store::TrackHistoryStore;
pub use track::{Overlay, OverlayStyle, Polyline, TrackPath};

use nalgebra as na;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

pub type TrackId = i32;

/// Box center in frame pixel coordinates
pub type Position = na::Point2<f64>;

/// Recent centers of one track, oldest first
pub type History = CircularQueue<Position>;

pub trait Extrapolating {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<FrameOutput, Error>;
    fn paths(&self, src: &str) -> Rc<[TrackPath]>;
    fn forget(&mut self, src: &str) -> bool;
}

/// Linear trajectory extrapolation over any number of independent streams,
/// keyed by source name.
pub struct LinearExtrapolator {
    config: Config,
    scenes: HashMap<String, (Scene, Rc<[TrackPath]>)>,
}

impl LinearExtrapolator {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            scenes: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn scene(&self, src: &str) -> Option<&Scene> {
        self.scenes.get(src).map(|(scene, _)| scene)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }
}

impl Default for LinearExtrapolator {
    fn default() -> Self {
        Self {
            config: Config::default(),
            scenes: HashMap::new(),
        }
    }
}

impl crate::Extrapolating for LinearExtrapolator {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<FrameOutput, Error> {
        let (scene, last) = match self.scenes.entry(src.to_string()) {
            Entry::Occupied(item) => item.into_mut(),
            Entry::Vacant(item) => {
                tracing::debug!(src, "new scene");
                let scene = Scene::new(self.config.clone())?;

                item.insert((scene, Rc::<[TrackPath]>::from(Vec::new())))
            }
        };

        let output = scene.process(frame);
        *last = output.paths.clone().into_boxed_slice().into();

        Ok(output)
    }

    #[inline]
    fn paths(&self, src: &str) -> Rc<[TrackPath]> {
        if let Some((_, last)) = self.scenes.get(src) {
            return last.clone();
        }

        Rc::new([])
    }

    #[inline]
    fn forget(&mut self, src: &str) -> bool {
        self.scenes.remove(src).is_some()
    }
}
