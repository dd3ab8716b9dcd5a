use crate::{geometry::Window, math::count_in_window};

/// The points the ants have flagged as explored.
///
/// Marks are stored back to back in one buffer. Their order carries no
/// meaning, only how many fall into a given window.
#[derive(Debug, Clone)]
pub struct MarkSet {
    dim: usize,
    half_width: Box<[f64]>,
    points: Vec<f64>,
}

impl MarkSet {
    /// An empty set whose neighbourhood queries use the per-dimension
    /// `half_width`.
    pub fn new(half_width: Box<[f64]>) -> Self {
        assert!(!half_width.is_empty());
        MarkSet {
            dim: half_width.len(),
            half_width,
            points: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Half-width of the neighbourhood window in each dimension.
    pub fn half_width(&self) -> &[f64] {
        &self.half_width
    }

    pub fn len(&self) -> usize {
        self.points.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: &[f64]) {
        assert!(point.len() == self.dim);
        self.points.extend_from_slice(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.points.chunks_exact(self.dim)
    }

    /// Number of marks strictly inside the configured window around `center`.
    pub fn count_near(&self, center: &[f64]) -> usize {
        self.count_in_window(&Window::new(center, &self.half_width))
    }

    /// Number of marks strictly inside `window`.
    pub fn count_in_window(&self, window: &Window<'_>) -> usize {
        assert!(window.dim() == self.dim);
        if self.points.is_empty() {
            return 0;
        }
        count_in_window(&self.points, window.center(), window.half_width())
    }
}

impl Extend<Box<[f64]>> for MarkSet {
    fn extend<T: IntoIterator<Item = Box<[f64]>>>(&mut self, iter: T) {
        iter.into_iter().for_each(|point| self.push(&point));
    }
}
