use fastrand::Rng;
use glam::Vec2;

/// Uniform ground positions inside a square arena, kept `margin` away from its edges.
pub struct PositionSpawner<'a> {
    rng: &'a mut Rng,
    extent: f32,
}

impl<'a> PositionSpawner<'a> {
    pub fn new(rng: &'a mut Rng, play_area_size: f32, margin: f32) -> Self {
        Self { rng, extent: (play_area_size / 2.0 - margin).max(0.0) }
    }

    pub fn next_position(&mut self) -> Vec2 {
        Vec2::new(self.next_coordinate(), self.next_coordinate())
    }

    /// Rejection sampling, gives up after `max_attempts` draws and returns what was accepted so far.
    pub fn scatter<F>(&mut self, count: usize, max_attempts: usize, accept: F) -> Vec<Vec2>
    where
        F: Fn(Vec2, &[Vec2]) -> bool,
    {
        let mut accepted = Vec::with_capacity(count);
        let mut attempts = 0;

        while accepted.len() < count && attempts < max_attempts {
            attempts += 1;

            let position = self.next_position();
            if accept(position, &accepted) {
                accepted.push(position);
            }
        }

        accepted
    }

    fn next_coordinate(&mut self) -> f32 {
        -self.extent + self.rng.f32() * self.extent * 2.0
    }
}
