use crate::config::Config;
use crate::error::Error;
use crate::predictor::PathPredictor;
use crate::store::TrackHistoryStore;
use crate::track::{Overlay, TrackPath};
use crate::{Frame, TrackId};

#[derive(Debug, Default, Clone)]
pub struct FrameOutput {
    pub frame: u64,
    pub paths: Vec<TrackPath>,
    pub rejected: Vec<(TrackId, Error)>,
}

/// History and extrapolation state of a single video stream
#[derive(Debug, Clone)]
pub struct Scene {
    config: Config,
    store: TrackHistoryStore,
    predictor: PathPredictor,
}

impl Scene {
    pub fn new(config: Config) -> Result<Self, Error> {
        let store = TrackHistoryStore::from_config(&config)?;
        let predictor = PathPredictor::from_config(&config)?;

        Ok(Self {
            config,
            store,
            predictor,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &TrackHistoryStore {
        &self.store
    }

    #[inline]
    pub fn predictor(&self) -> &PathPredictor {
        &self.predictor
    }

    /// Records every detection of `frame` and predicts its track.
    ///
    /// A detection with a non-finite center is skipped and reported in
    /// [`FrameOutput::rejected`]; other tracks are unaffected.
    pub fn process(&mut self, frame: &Frame) -> FrameOutput {
        let index = self.store.next_frame();
        let mut paths = Vec::with_capacity(frame.len());
        let mut rejected = Vec::new();

        for det in frame.iter() {
            match self.store.record(det.track_id, det.center()) {
                Ok(history) => paths.push(TrackPath {
                    track_id: det.track_id,
                    prediction: self.predictor.predict(history),
                    history: history.to_vec(),
                }),
                Err(err) => {
                    tracing::warn!(
                        track_id = det.track_id,
                        frame = index,
                        %err,
                        "detection rejected"
                    );
                    rejected.push((det.track_id, err));
                }
            }
        }

        if let Some(max_idle) = self.config.stale_after {
            self.store.evict_idle(max_idle);
        }

        tracing::trace!(
            frame = index,
            detections = frame.len(),
            tracks = self.store.len(),
            "frame processed"
        );

        FrameOutput {
            frame: index,
            paths,
            rejected,
        }
    }

    #[inline]
    pub fn overlays<'a>(&'a self, output: &'a FrameOutput) -> impl Iterator<Item = Overlay> + 'a {
        output.paths.iter().map(|p| p.overlay(&self.config.style))
    }

    pub fn reset(&mut self) {
        self.store.clear();
    }
}
