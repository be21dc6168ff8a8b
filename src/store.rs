use std::collections::HashMap;

use crate::circular_queue::CircularQueue;
use crate::config::Config;
use crate::error::Error;
use crate::{History, Position, TrackId};

#[derive(Debug, Clone)]
struct Entry {
    history: History,
    last_seen: u64,
}

/// Per-session mapping from track id to its recent centers.
///
/// One store belongs to one stream. Histories are created on first sight of an
/// id and live until [`TrackHistoryStore::remove`],
/// [`TrackHistoryStore::evict_idle`] or [`TrackHistoryStore::clear`].
#[derive(Debug, Clone)]
pub struct TrackHistoryStore {
    max_history: usize,
    frame: u64,
    tracks: HashMap<TrackId, Entry>,
}

impl TrackHistoryStore {
    pub fn new(max_history: usize) -> Result<Self, Error> {
        if max_history == 0 {
            return Err(Error::InvalidConfig("max_history must be at least 1"));
        }

        Ok(Self {
            max_history,
            frame: 0,
            tracks: HashMap::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        Self::new(config.max_history)
    }

    #[inline]
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Index of the current frame, as advanced by [`TrackHistoryStore::next_frame`]
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn next_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    fn entry(&mut self, track_id: TrackId) -> &mut Entry {
        let (max_history, frame) = (self.max_history, self.frame);

        self.tracks.entry(track_id).or_insert_with(|| {
            tracing::debug!(track_id, frame, "new track history");

            Entry {
                history: CircularQueue::with_capacity(max_history),
                last_seen: frame,
            }
        })
    }

    /// Returns the history of `track_id`, creating an empty one if the id has
    /// not been seen yet. Positions only enter a history through
    /// [`TrackHistoryStore::record`].
    #[inline]
    pub fn get_or_create(&mut self, track_id: TrackId) -> &History {
        &self.entry(track_id).history
    }

    /// Appends `position` to the history of `track_id` and returns the bounded
    /// history, oldest first.
    ///
    /// A non-finite position is rejected and leaves the store untouched.
    pub fn record(&mut self, track_id: TrackId, position: Position) -> Result<&History, Error> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(Error::InvalidPosition {
                track_id,
                x: position.x,
                y: position.y,
            });
        }

        let frame = self.frame;
        let entry = self.entry(track_id);
        entry.history.push(position);
        entry.last_seen = frame;

        Ok(&entry.history)
    }

    #[inline]
    pub fn history(&self, track_id: TrackId) -> Option<&History> {
        self.tracks.get(&track_id).map(|e| &e.history)
    }

    #[inline]
    pub fn last_seen(&self, track_id: TrackId) -> Option<u64> {
        self.tracks.get(&track_id).map(|e| e.last_seen)
    }

    #[inline]
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.tracks.contains_key(&track_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.keys().copied()
    }

    #[inline]
    pub fn remove(&mut self, track_id: TrackId) -> Option<History> {
        self.tracks.remove(&track_id).map(|e| e.history)
    }

    /// Drops every track not recorded during the last `max_idle` frames.
    /// Returns the number of evicted tracks.
    pub fn evict_idle(&mut self, max_idle: u64) -> usize {
        let frame = self.frame;
        let before = self.tracks.len();

        self.tracks.retain(|_, e| frame.saturating_sub(e.last_seen) <= max_idle);

        let evicted = before - self.tracks.len();
        if evicted > 0 {
            tracing::debug!(evicted, frame, max_idle, "evicted idle tracks");
        }

        evicted
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    fn pt(x: f64, y: f64) -> Position {
        na::Point2::new(x, y)
    }

    #[test]
    fn history_is_bounded_and_fifo() {
        let mut store = TrackHistoryStore::new(3).unwrap();

        for i in 0..5 {
            let history = store.record(1, pt(i as f64, 0.0)).unwrap();
            assert_eq!(history.len(), (i + 1).min(3));
        }

        let xs: Vec<f64> = store.history(1).unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn default_capacity_is_thirty() {
        let mut store = TrackHistoryStore::from_config(&Config::default()).unwrap();

        for i in 0..45 {
            store.record(9, pt(i as f64, i as f64)).unwrap();
        }

        let history = store.history(9).unwrap();
        assert_eq!(history.len(), 30);
        assert_eq!(history.first(), Some(&pt(15.0, 15.0)));
        assert_eq!(history.last(), Some(&pt(44.0, 44.0)));
    }

    #[test]
    fn rejects_non_finite_position() {
        let mut store = TrackHistoryStore::new(30).unwrap();
        store.record(1, pt(1.0, 1.0)).unwrap();
        store.record(1, pt(2.0, 2.0)).unwrap();
        let before = store.history(1).unwrap().to_vec();

        let err = store.record(1, pt(f64::NAN, 3.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidPosition { track_id: 1, .. }));
        assert!(store.record(1, pt(3.0, f64::INFINITY)).is_err());

        assert_eq!(store.history(1).unwrap().to_vec(), before);
    }

    #[test]
    fn rejected_first_sighting_creates_nothing() {
        let mut store = TrackHistoryStore::new(30).unwrap();

        assert!(store.record(5, pt(f64::NEG_INFINITY, 0.0)).is_err());
        assert!(!store.contains(5));
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_create_is_explicit() {
        let mut store = TrackHistoryStore::new(4).unwrap();

        assert!(store.history(2).is_none());
        assert!(store.get_or_create(2).is_empty());
        assert!(store.contains(2));
        assert_eq!(store.get_or_create(2).capacity(), 4);
    }

    #[test]
    fn histories_only_hold_finite_positions() {
        let mut store = TrackHistoryStore::new(8).unwrap();
        store.record(1, pt(0.0, 0.0)).unwrap();

        let created = store.get_or_create(1).len();
        let bad = [
            pt(f64::NAN, 1.0),
            pt(1.0, f64::NAN),
            pt(f64::INFINITY, 0.0),
            pt(0.0, f64::NEG_INFINITY),
        ];
        for p in bad {
            assert!(store.record(1, p).is_err());
        }
        store.record(1, pt(1.0, 2.0)).unwrap();

        let history = store.get_or_create(1);
        assert_eq!(history.len(), created + 1);
        assert!(history.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert_eq!(store.last_seen(1), Some(0));
    }

    #[test]
    fn tracks_are_independent() {
        let mut store = TrackHistoryStore::new(30).unwrap();
        store.record(1, pt(0.0, 0.0)).unwrap();
        store.record(2, pt(100.0, 100.0)).unwrap();
        let b = store.history(2).unwrap().to_vec();

        store.record(1, pt(1.0, 1.0)).unwrap();
        let _ = store.record(1, pt(f64::NAN, 1.0));

        assert_eq!(store.history(2).unwrap().to_vec(), b);
        assert_eq!(store.history(1).unwrap().len(), 2);
    }

    #[test]
    fn reused_id_continues_history() {
        let mut store = TrackHistoryStore::new(30).unwrap();
        store.record(3, pt(0.0, 0.0)).unwrap();

        for _ in 0..10 {
            store.next_frame();
        }

        assert_eq!(store.record(3, pt(5.0, 5.0)).unwrap().len(), 2);
    }

    #[test]
    fn evicts_idle_tracks() {
        let mut store = TrackHistoryStore::new(30).unwrap();
        store.record(1, pt(0.0, 0.0)).unwrap();
        store.record(2, pt(0.0, 0.0)).unwrap();

        store.next_frame();
        store.record(2, pt(1.0, 0.0)).unwrap();
        store.next_frame();
        store.record(2, pt(2.0, 0.0)).unwrap();

        assert_eq!(store.evict_idle(2), 0);
        store.next_frame();
        assert_eq!(store.evict_idle(2), 1);

        assert!(!store.contains(1));
        assert_eq!(store.last_seen(2), Some(2));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(TrackHistoryStore::new(0), Err(Error::InvalidConfig(_))));
    }
}
