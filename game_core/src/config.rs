use crate::{ConfigError, Params, Side};

/// Preset difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Map a 1..=3 level onto a preset
    pub fn from_level(level: u8) -> Result<Self, ConfigError> {
        match level {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            other => Err(ConfigError::UnknownDifficulty(other)),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Speed multiplier; paddles shrink and slow down by its inverse.
    fn scale(self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.15,
            Difficulty::Hard => 1.5,
        }
    }

    fn ball_speed_increase(self) -> f32 {
        match self {
            Difficulty::Easy => 1.0001,
            Difficulty::Medium => 1.001,
            Difficulty::Hard => 1.01,
        }
    }
}

/// Match engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub paddle_height: f32,
    pub paddle_width: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub ball_speed_increase: f32,
    pub ball_speed_max: f32,
    pub update_frequency_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_speed: Params::PADDLE_SPEED,
            ball_speed: Params::BALL_SPEED,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            ball_speed_max: Params::BALL_SPEED_MAX,
            update_frequency_ms: Params::UPDATE_FREQUENCY_MS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for a difficulty level. Pure lookup, no randomness.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let q = difficulty.scale();
        let nq = 1.0 / q;
        Self {
            paddle_height: 0.33 * nq,
            paddle_speed: 1.25 * nq,
            ball_speed: 0.8 * q,
            ball_speed_max: 1.5 * q,
            ball_speed_increase: difficulty.ball_speed_increase(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("paddle_height", self.paddle_height),
            ("paddle_width", self.paddle_width),
            ("paddle_speed", self.paddle_speed),
            ("ball_speed", self.ball_speed),
            ("ball_speed_max", self.ball_speed_max),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.paddle_height >= 1.0 {
            return Err(ConfigError::PaddleTooTall(self.paddle_height));
        }
        if !(self.ball_speed_increase.is_finite() && self.ball_speed_increase >= 1.0) {
            return Err(ConfigError::ShrinkingBall(self.ball_speed_increase));
        }
        if self.ball_speed_max < self.ball_speed {
            return Err(ConfigError::MaxBelowInitial {
                initial: self.ball_speed,
                max: self.ball_speed_max,
            });
        }
        if self.update_frequency_ms == 0 {
            return Err(ConfigError::Zero("update_frequency_ms"));
        }
        Ok(())
    }

    /// Virtual seconds that pass per tick. Fixed so every machine agrees.
    pub fn time_factor(&self) -> f32 {
        self.update_frequency_ms as f32 / 1000.0
    }

    /// Get X position for paddle based on side
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => Params::PADDLE_X_LEFT,
            Side::Right => Params::PADDLE_X_RIGHT,
        }
    }

    /// Clamp paddle Y to court bounds
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let half_height = self.paddle_height / 2.0;
        y.clamp(half_height, 1.0 - half_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paddle_x() {
        let config = Config::new();
        assert_eq!(config.paddle_x(Side::Left), 0.02, "Left paddle X position");
        assert_eq!(config.paddle_x(Side::Right), 0.98, "Right paddle X position");
    }

    #[test]
    fn test_config_clamp_paddle_y() {
        let config = Config::new();
        let half_height = config.paddle_height / 2.0;
        assert_eq!(config.clamp_paddle_y(0.0), half_height);
        assert_eq!(config.clamp_paddle_y(100.0), 1.0 - half_height);
        assert_eq!(config.clamp_paddle_y(0.5), 0.5);
    }

    #[test]
    fn test_time_factor() {
        let config = Config::new();
        assert!((config.time_factor() - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::new().validate(), Ok(()));
        for level in 1..=3 {
            let difficulty = Difficulty::from_level(level).unwrap();
            assert_eq!(
                Config::for_difficulty(difficulty).validate(),
                Ok(()),
                "difficulty {level} should be valid"
            );
        }
    }

    #[test]
    fn test_difficulty_presets_get_harder() {
        let easy = Config::for_difficulty(Difficulty::Easy);
        let medium = Config::for_difficulty(Difficulty::Medium);
        let hard = Config::for_difficulty(Difficulty::Hard);

        assert!((easy.paddle_height - 0.33).abs() < 1e-6);
        assert!((easy.paddle_speed - 1.25).abs() < 1e-6);
        assert!((hard.ball_speed - 1.2).abs() < 1e-6);
        assert!((hard.ball_speed_max - 2.25).abs() < 1e-6);

        assert!(medium.paddle_height < easy.paddle_height);
        assert!(hard.paddle_height < medium.paddle_height);
        assert!(medium.paddle_speed < easy.paddle_speed);
        assert!(hard.ball_speed > medium.ball_speed);
        assert!(hard.ball_speed_increase > medium.ball_speed_increase);
        assert!(medium.ball_speed_increase > easy.ball_speed_increase);
    }

    #[test]
    fn test_difficulty_presets_are_deterministic() {
        assert_eq!(
            Config::for_difficulty(Difficulty::Medium),
            Config::for_difficulty(Difficulty::Medium)
        );
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        assert_eq!(
            Difficulty::from_level(0),
            Err(ConfigError::UnknownDifficulty(0))
        );
        assert_eq!(
            Difficulty::from_level(4),
            Err(ConfigError::UnknownDifficulty(4))
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let config = Config {
            paddle_speed: 0.0,
            ..Config::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "paddle_speed",
                ..
            })
        ));

        let config = Config {
            ball_speed_increase: 0.99,
            ..Config::new()
        };
        assert_eq!(config.validate(), Err(ConfigError::ShrinkingBall(0.99)));

        let config = Config {
            ball_speed_max: 0.5,
            ..Config::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxBelowInitial { .. })
        ));

        let config = Config {
            update_frequency_ms: 0,
            ..Config::new()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero("update_frequency_ms"))
        );
    }
}
