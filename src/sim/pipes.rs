//! Obstacle generator
//!
//! Pipe pairs scroll left at a fixed speed. A new pair is appended once the
//! trailing pair has cleared the spacing threshold, and pairs are dropped from
//! the front once fully off-screen.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::geometry::Rect;
use crate::settings::{PipeSettings, Settings};

/// Upper and lower pipe sharing one gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipePair {
    pub x: f32,
    pub w: f32,
    /// y of the upper pipe's bottom edge (top of the gap)
    pub gap_top: f32,
    pub gap: f32,
    /// Height of each pipe body
    pub pipe_h: f32,
    /// Set once the player has been credited for crossing this pair
    pub scored: bool,
}

impl PipePair {
    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, self.gap_top - self.pipe_h, self.w, self.pipe_h)
    }

    pub fn lower_rect(&self) -> Rect {
        Rect::new(self.x, self.gap_top + self.gap, self.w, self.pipe_h)
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap / 2.0
    }

    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// The ordered pipe sequence plus its generator
#[derive(Debug, Clone)]
pub struct Pipes {
    pairs: VecDeque<PipePair>,
    config: PipeSettings,
    window_width: f32,
    viewport_height: f32,
    stopped: bool,
    rng: Pcg32,
}

impl Pipes {
    /// Fresh sequence with the two opening pairs placed off the right edge
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut pipes = Self {
            pairs: VecDeque::new(),
            config: settings.pipes,
            window_width: settings.window.width,
            viewport_height: settings.window.viewport_height(),
            stopped: false,
            rng: Pcg32::seed_from_u64(seed),
        };

        let w = pipes.config.width;
        let first_x = pipes.window_width + w * 3.0;
        let mut first = pipes.make_pair();
        first.x = first_x;
        let mut second = pipes.make_pair();
        second.x = first_x + w * 3.5;
        pipes.pairs.push_back(first);
        pipes.pairs.push_back(second);

        pipes
    }

    /// Pair at the spawn position with a random gap inside the middle band
    fn make_pair(&mut self) -> PipePair {
        let base = self.viewport_height;
        // Validated settings keep this at least 1
        let span = ((base * 0.6 - self.config.gap) as i32).max(1);
        let gap_top = self.rng.random_range(0..span) as f32 + (base * 0.2).floor();

        PipePair {
            x: self.window_width + self.config.spawn_offset,
            w: self.config.width,
            gap_top,
            gap: self.config.gap,
            pipe_h: self.config.height,
            scored: false,
        }
    }

    fn can_spawn(&self) -> bool {
        match self.pairs.back() {
            Some(last) => self.window_width - last.right() > self.config.spacing,
            None => true,
        }
    }

    /// Scroll, prune and spawn; a stopped sequence does nothing
    pub fn tick(&mut self) {
        if self.stopped {
            return;
        }

        for pair in &mut self.pairs {
            pair.x -= self.config.speed;
        }

        while self.pairs.front().is_some_and(PipePair::is_offscreen) {
            self.pairs.pop_front();
        }

        if self.can_spawn() {
            let pair = self.make_pair();
            log::trace!("Spawned pipe pair with gap at {}", pair.gap_top);
            self.pairs.push_back(pair);
        }
    }

    /// Freeze horizontal motion, keeping every pair in place
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn gap(&self) -> f32 {
        self.config.gap
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipePair> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PipePair> {
        self.pairs.iter_mut()
    }

    /// First pair whose trailing edge is still right of `x`
    pub fn next_ahead(&self, x: f32) -> Option<&PipePair> {
        self.pairs.iter().find(|p| p.right() > x)
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, pair: PipePair) {
        self.pairs.push_back(pair);
    }

    #[cfg(test)]
    pub(crate) fn clear_for_test(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipes() -> Pipes {
        Pipes::new(&Settings::default(), 42)
    }

    #[test]
    fn test_initial_pairs() {
        let p = pipes();
        assert_eq!(p.len(), 2);
        let xs: Vec<f32> = p.iter().map(|pair| pair.x).collect();
        assert_eq!(xs[0], 288.0 + 52.0 * 3.0);
        assert_eq!(xs[1], xs[0] + 52.0 * 3.5);
    }

    #[test]
    fn test_gap_stays_in_reachable_band() {
        let settings = Settings::default();
        let base = settings.window.viewport_height();
        let mut p = Pipes::new(&settings, 7);
        for _ in 0..2000 {
            p.tick();
        }
        for pair in p.iter() {
            assert!(pair.gap_top >= (base * 0.2).floor());
            assert!(pair.gap_top + pair.gap <= base * 0.8 + 1.0);
            assert_eq!(pair.gap, settings.pipes.gap);
        }
    }

    #[test]
    fn test_scrolls_left_by_speed() {
        let mut p = pipes();
        let before = p.iter().next().unwrap().x;
        p.tick();
        let after = p.iter().next().unwrap().x;
        assert_eq!(before - after, PipeSettings::default().speed);
    }

    #[test]
    fn test_fifo_spawn_and_prune() {
        let mut p = pipes();
        let mut seen_spawn = false;
        for _ in 0..400 {
            let before = p.len();
            p.tick();
            if p.len() > before {
                seen_spawn = true;
            }
            // Never keeps a fully off-screen pair
            assert!(p.iter().all(|pair| !pair.is_offscreen()));
            // Ordered left to right
            let xs: Vec<f32> = p.iter().map(|pair| pair.x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]));
        }
        assert!(seen_spawn);
        assert!(p.len() <= 4);
    }

    #[test]
    fn test_spacing_between_spawns() {
        let settings = Settings::default();
        let mut p = Pipes::new(&settings, 3);
        for _ in 0..600 {
            p.tick();
        }
        let xs: Vec<f32> = p.iter().map(|pair| pair.x).collect();
        for w in xs.windows(2) {
            // The trailing edge clears the threshold by at most one tick of scroll
            let free = w[1] - (w[0] + settings.pipes.width);
            let threshold = settings.pipes.spacing + settings.pipes.spawn_offset;
            assert!(free > threshold - 0.01);
            assert!(free <= threshold + settings.pipes.speed + 0.01);
        }
    }

    #[test]
    fn test_stop_freezes_without_removing() {
        let mut p = pipes();
        p.tick();
        p.stop();
        let snapshot: Vec<PipePair> = p.iter().cloned().collect();
        for _ in 0..50 {
            p.tick();
        }
        let after: Vec<PipePair> = p.iter().cloned().collect();
        assert_eq!(snapshot, after);
        assert!(p.is_stopped());
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut a = pipes();
        let mut b = pipes();
        for _ in 0..300 {
            a.tick();
            b.tick();
        }
        let ga: Vec<f32> = a.iter().map(|p| p.gap_top).collect();
        let gb: Vec<f32> = b.iter().map(|p| p.gap_top).collect();
        assert_eq!(ga, gb);
    }

    #[test]
    fn test_next_ahead() {
        let p = pipes();
        let first = p.iter().next().unwrap().clone();
        assert_eq!(p.next_ahead(0.0), Some(&first));
        assert_eq!(p.next_ahead(10_000.0), None);
    }
}
