//! The match loop.
//!
//! Each step takes a snapshot, polls the controllers every
//! `controller_frame_interval` ticks (and always on the tick a winner
//! appears, so they see the terminal state), then advances the engine.
//! Steps never overlap: a paced loop that falls behind skips ticks instead
//! of queueing them.

use std::sync::Arc;
use std::time::Duration;

use agents::Controller;
use game_core::{
    Action, CaptureError, Frame, FrameCapture, MatchEngine, MatchState, Params, Rasterizer, Side,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::RunnerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One step per update period of wall-clock time
    Paced,
    /// Steps back to back
    Fast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    pub pacing: Pacing,
    /// Ticks between controller polls
    pub controller_frame_interval: u32,
    /// Runs alongside the end-of-match hooks before the match resolves
    pub settle_delay: Duration,
    /// Canvas pixels per frame cell
    pub downscale: u32,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::paced()
    }
}

impl RunnerOptions {
    pub const DEFAULT_DOWNSCALE: u32 = 10;

    pub fn paced() -> Self {
        Self {
            pacing: Pacing::Paced,
            controller_frame_interval: Params::CONTROLLER_FRAME_INTERVAL,
            settle_delay: Duration::from_millis(250),
            downscale: Self::DEFAULT_DOWNSCALE,
        }
    }

    pub fn fast() -> Self {
        Self {
            pacing: Pacing::Fast,
            settle_delay: Duration::ZERO,
            ..Self::paced()
        }
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.controller_frame_interval == 0 {
            return Err(RunnerError::InvalidOptions(
                "controller_frame_interval must be non-zero".into(),
            ));
        }
        if self.downscale == 0 {
            return Err(RunnerError::InvalidOptions("downscale must be non-zero".into()));
        }
        Ok(())
    }
}

/// Result of a finished match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub winner: Side,
    pub frames: u32,
    /// Virtual seconds played
    pub time_passed: f32,
}

/// Owns one match: the engine, both controllers and the frame source
pub struct MatchRunner<L, R, C = Rasterizer> {
    engine: MatchEngine,
    left: L,
    right: R,
    capture: C,
    options: RunnerOptions,
}

impl<L: Controller, R: Controller> MatchRunner<L, R, Rasterizer> {
    pub fn new(
        engine: MatchEngine,
        left: L,
        right: R,
        options: RunnerOptions,
    ) -> Result<Self, RunnerError> {
        Self::with_capture(engine, left, right, Rasterizer::default(), options)
    }
}

impl<L: Controller, R: Controller, C: FrameCapture> MatchRunner<L, R, C> {
    pub fn with_capture(
        engine: MatchEngine,
        left: L,
        right: R,
        capture: C,
        options: RunnerOptions,
    ) -> Result<Self, RunnerError> {
        options.validate()?;
        check_sides(&left, &right)?;
        Ok(Self {
            engine,
            left,
            right,
            capture,
            options,
        })
    }

    /// Play until one side wins or a controller fails
    pub async fn run(&mut self) -> Result<MatchReport, RunnerError> {
        play_match(
            &mut self.engine,
            &mut self.left,
            &mut self.right,
            &mut self.capture,
            &self.options,
        )
        .await
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
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

impl<L, R, C> MatchRunner<L, R, C>
where
    L: Controller + 'static,
    R: Controller + 'static,
    C: FrameCapture + 'static,
{
    /// Run the match as a local task. Must be called inside a
    /// [`tokio::task::LocalSet`].
    pub fn spawn(mut self) -> MatchHandle<L, R> {
        let (sender, receiver) = oneshot::channel();
        let task = tokio::task::spawn_local(async move {
            let result = self.run().await;
            let (left, right) = self.into_controllers();
            // Nobody to tell if the handle was dropped
            let _ = sender.send(MatchOutcome {
                result,
                left,
                right,
            });
        });
        MatchHandle { receiver, task }
    }
}

/// Everything a spawned match hands back
pub struct MatchOutcome<L, R> {
    pub result: Result<MatchReport, RunnerError>,
    pub left: L,
    pub right: R,
}

/// Completion signal of a spawned match
pub struct MatchHandle<L, R> {
    receiver: oneshot::Receiver<MatchOutcome<L, R>>,
    task: JoinHandle<()>,
}

impl<L, R> MatchHandle<L, R> {
    /// Wait for the match. Fails with [`RunnerError::Cancelled`] if it was
    /// aborted; the controllers are lost in that case.
    pub async fn wait(self) -> Result<MatchOutcome<L, R>, RunnerError> {
        self.receiver.await.map_err(|_| RunnerError::Cancelled)
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

fn check_sides<L: Controller, R: Controller>(left: &L, right: &R) -> Result<(), RunnerError> {
    if left.side() != Side::Left || right.side() != Side::Right {
        return Err(RunnerError::InvalidOptions(format!(
            "controllers play {} and {}, expected left and right",
            left.side(),
            right.side()
        )));
    }
    Ok(())
}

/// Play one match on borrowed parts; see the module docs for the loop.
pub async fn play_match<L, R, C>(
    engine: &mut MatchEngine,
    left: &mut L,
    right: &mut R,
    capture: &mut C,
    options: &RunnerOptions,
) -> Result<MatchReport, RunnerError>
where
    L: Controller,
    R: Controller,
    C: FrameCapture,
{
    options.validate()?;
    check_sides(left, right)?;

    let needs_frames = left.needs_frames() || right.needs_frames();
    let dt = engine.config().time_factor();
    let mut previous_frame = None;

    left.on_match_start()
        .await
        .map_err(RunnerError::controller(Side::Left))?;
    right
        .on_match_start()
        .await
        .map_err(RunnerError::controller(Side::Right))?;
    tracing::info!(pacing = ?options.pacing, needs_frames, "match started");

    let mut interval = match options.pacing {
        Pacing::Paced => {
            let period = Duration::from_millis(engine.config().update_frequency_ms as u64);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            Some(interval)
        }
        Pacing::Fast => None,
    };

    let mut left_action = Action::Stay;
    let mut right_action = Action::Stay;
    let winner = loop {
        match interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }

        let state = match snapshot(engine, capture, options, needs_frames, &mut previous_frame) {
            Ok(state) => Arc::new(state),
            Err(err) => {
                tracing::warn!(error = %err, frame = engine.frame_index(), "frame capture failed");
                return Err(err.into());
            }
        };

        let poll = state.winner.is_some()
            || state.frame_index % options.controller_frame_interval == 0;
        if poll {
            left_action = select(left, &state).await?;
            right_action = select(right, &state).await?;
        }

        if let Some(winner) = state.winner {
            break winner;
        }
        engine.advance(left_action, right_action, dt);
    };

    let report = MatchReport {
        winner,
        frames: engine.frame_index(),
        time_passed: engine.frame_index() as f32 * dt,
    };
    tracing::info!(
        winner = %report.winner,
        frames = report.frames,
        time_passed = report.time_passed,
        "match finished"
    );

    let (left_done, right_done, ()) = tokio::join!(
        left.on_match_end(winner == Side::Left),
        right.on_match_end(winner == Side::Right),
        tokio::time::sleep(options.settle_delay),
    );
    left_done.map_err(RunnerError::controller(Side::Left))?;
    right_done.map_err(RunnerError::controller(Side::Right))?;

    Ok(report)
}

async fn select<C: Controller>(
    controller: &mut C,
    state: &Arc<MatchState>,
) -> Result<Action, RunnerError> {
    let side = controller.side();
    controller.select_action(state).await.map_err(|err| {
        tracing::error!(side = %side, error = %err, frame = state.frame_index, "controller failed");
        RunnerError::Controller { side, source: err }
    })
}

fn snapshot<C: FrameCapture>(
    engine: &MatchEngine,
    capture: &mut C,
    options: &RunnerOptions,
    needs_frames: bool,
    previous_frame: &mut Option<Frame>,
) -> Result<MatchState, CaptureError> {
    let state = engine.snapshot();
    if !needs_frames {
        return Ok(state);
    }
    let frame = capture.capture_frame(engine, options.downscale)?;
    let previous = previous_frame.replace(frame.clone());
    Ok(state.with_frames(frame, previous))
}
