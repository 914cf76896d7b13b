use std::time::Duration;

use agents::Controller;
use game_core::{Config, FrameCapture, MatchEngine, Rasterizer};

use crate::{play_match, MatchReport, MatchStats, Pacing, RunnerError, RunnerOptions};

/// Consecutive matches between the same two controllers.
///
/// Every match gets a fresh engine; the seed moves on by one per match.
pub struct Session<L, R, C = Rasterizer> {
    left: L,
    right: R,
    capture: C,
    config: Config,
    options: RunnerOptions,
    seed: u64,
    pause: Duration,
    stats: MatchStats,
}

impl<L: Controller, R: Controller> Session<L, R, Rasterizer> {
    pub fn new(
        left: L,
        right: R,
        config: Config,
        options: RunnerOptions,
        seed: u64,
    ) -> Result<Self, RunnerError> {
        Self::with_capture(left, right, Rasterizer::default(), config, options, seed)
    }
}

impl<L: Controller, R: Controller, C: FrameCapture> Session<L, R, C> {
    pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

    pub fn with_capture(
        left: L,
        right: R,
        capture: C,
        config: Config,
        options: RunnerOptions,
        seed: u64,
    ) -> Result<Self, RunnerError> {
        config.validate()?;
        options.validate()?;
        let pause = match options.pacing {
            Pacing::Paced => Self::DEFAULT_PAUSE,
            Pacing::Fast => Duration::ZERO,
        };
        Ok(Self {
            left,
            right,
            capture,
            config,
            options,
            seed,
            pause,
            stats: MatchStats::new(),
        })
    }

    /// Wait this long between matches
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub async fn play_match(&mut self) -> Result<MatchReport, RunnerError> {
        let mut engine = MatchEngine::new(self.config.clone(), self.seed)?;
        self.seed = self.seed.wrapping_add(1);

        let report = play_match(
            &mut engine,
            &mut self.left,
            &mut self.right,
            &mut self.capture,
            &self.options,
        )
        .await?;

        self.stats.record(&report);
        tracing::info!(
            matches = self.stats.matches,
            left_wins = self.stats.left_wins,
            right_wins = self.stats.right_wins,
            average_duration = self.stats.average_duration(),
            "stats"
        );
        Ok(report)
    }

    /// Play `matches` matches, stopping at the first failure
    pub async fn play(&mut self, matches: usize) -> Result<&MatchStats, RunnerError> {
        for played in 0..matches {
            if played > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            self.play_match().await?;
        }
        Ok(&self.stats)
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &R {
        &self.right
    }

    pub fn into_controllers(self) -> (L, R) {
        (self.left, self.right)
    }
}
