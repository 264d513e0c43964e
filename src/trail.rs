use std::collections::VecDeque;

use glam::IVec2;

/// Bounded history of screen positions for one pendulum bob, drawn as a
/// fading trace behind the bob.
///
/// Points are pushed in step order; when the evict policy is enabled the
/// oldest points are dropped once the buffer exceeds `max_points`. With the
/// policy disabled the buffer grows without bound, a deliberate
/// configuration choice rather than a leak.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<IVec2>,
    max_points: usize,
    fade: bool,
    evict: bool,
}

impl Trail {
    pub fn new(max_points: usize, fade: bool, evict: bool) -> Self {
        Self {
            points: VecDeque::with_capacity(if evict { max_points + 1 } else { max_points }),
            max_points,
            fade,
            evict,
        }
    }

    /// Appends the newest point, then applies the evict policy.
    pub fn push(&mut self, point: IVec2) {
        self.points.push_back(point);
        if self.evict {
            while self.points.len() > self.max_points {
                self.points.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Ordered oldest-to-newest view with the brightness factor applied to
    /// each point's color channels at draw time.
    ///
    /// With fading enabled the factor ramps linearly with buffer position,
    /// `i / len`: near zero for the oldest point, `(len-1)/len` for the
    /// newest. With fading disabled every point draws at full brightness.
    /// The factor is a pure function of position, recomputed per snapshot.
    pub fn snapshot(&self) -> impl Iterator<Item = (IVec2, f32)> + '_ {
        let len = self.points.len();
        let fade = self.fade;
        self.points.iter().enumerate().map(move |(i, point)| {
            let factor = if fade { i as f32 / len as f32 } else { 1.0 };
            (*point, factor)
        })
    }
}
