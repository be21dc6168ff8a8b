use crate::detection::Detection;

#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub detections: Vec<Detection>,
}

impl Frame {
    #[inline]
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl From<Vec<Detection>> for Frame {
    fn from(detections: Vec<Detection>) -> Self {
        Self { detections }
    }
}
