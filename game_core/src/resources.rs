/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    pub dt: f32,  // Virtual seconds per tick
    pub now: f32, // Total elapsed virtual time
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self { dt: 0.04, now: 0.0 }
    }
}

/// Random number generator
#[derive(Debug, Clone)]
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    pub ball_hit_paddle: bool,
    pub ball_hit_wall: bool,
    pub paddle_hit_wall: bool,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ball_hit_paddle = false;
        self.ball_hit_wall = false;
        self.paddle_hit_wall = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_events_clear() {
        let mut events = Events::new();
        events.ball_hit_paddle = true;
        events.ball_hit_wall = true;
        events.paddle_hit_wall = true;

        events.clear();

        assert_eq!(events, Events::default());
    }

    #[test]
    fn test_rng_is_seeded() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        let xs: Vec<f32> = (0..8).map(|_| a.0.gen()).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.0.gen()).collect();
        assert_eq!(xs, ys, "Same seed should give the same stream");
    }
}
