use std::collections::VecDeque;

use game_core::Side;

use crate::MatchReport;

/// Average over the most recent `window` values
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    values: VecDeque<f32>,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            values: VecDeque::with_capacity(window.max(1)),
        }
    }

    pub fn push(&mut self, value: f32) {
        self.values.push_back(value);
        if self.values.len() > self.window {
            self.values.pop_front();
        }
    }

    /// Zero when empty
    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Running totals over a series of matches
#[derive(Debug, Clone)]
pub struct MatchStats {
    pub matches: u32,
    pub left_wins: u32,
    pub right_wins: u32,
    /// Virtual seconds of the most recent match
    pub last_duration: f32,
    durations: MovingAverage,
}

impl Default for MatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStats {
    pub const DURATION_WINDOW: usize = 20;

    pub fn new() -> Self {
        Self {
            matches: 0,
            left_wins: 0,
            right_wins: 0,
            last_duration: 0.0,
            durations: MovingAverage::new(Self::DURATION_WINDOW),
        }
    }

    pub fn record(&mut self, report: &MatchReport) {
        self.matches += 1;
        match report.winner {
            Side::Left => self.left_wins += 1,
            Side::Right => self.right_wins += 1,
        }
        self.last_duration = report.time_passed;
        self.durations.push(report.time_passed);
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_wins,
            Side::Right => self.right_wins,
        }
    }

    /// Mean duration of the last [`Self::DURATION_WINDOW`] matches
    pub fn average_duration(&self) -> f32 {
        self.durations.average()
    }
}
