use agents::{
    AgentError, Controller, DenseDqlController, DqlConfig, IdleController, Mlp, MlpConfig,
    PlayerController, ScriptedConfig, ScriptedController, VisualDqlController,
};
use arena::{RunnerError, RunnerOptions, Session};
use clap::{Parser, ValueEnum};
use game_core::{Config, Difficulty, Rasterizer, Side};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Play Pong matches between scripted and learning players")]
struct Args {
    /// Player on the left
    #[arg(long, value_enum, default_value_t = Kind::Dense)]
    left: Kind,

    /// Player on the right; omit to mirror the left player (self-play)
    #[arg(long, value_enum)]
    right: Option<Kind>,

    /// 1 (easy) to 3 (hard)
    #[arg(long, default_value_t = 1)]
    difficulty: u8,

    #[arg(long, default_value_t = 10)]
    matches: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run matches back to back instead of in real time
    #[arg(long)]
    fast: bool,

    /// Learners always take their best estimated action
    #[arg(long)]
    greedy: bool,

    /// Log a summary of every training batch (visual learner)
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Idle,
    Scripted,
    Dense,
    Visual,
}

fn build(kind: Kind, side: Side, args: &Args, downscale: u32) -> Result<PlayerController, AgentError> {
    let seed = match side {
        Side::Left => args.seed,
        Side::Right => args.seed.wrapping_add(1),
    };
    let controller: PlayerController = match kind {
        Kind::Idle => IdleController::new(side).into(),
        Kind::Scripted => ScriptedController::new(
            side,
            ScriptedConfig {
                seed,
                ..ScriptedConfig::default()
            },
        )?
        .into(),
        Kind::Dense => {
            let config = DqlConfig {
                greedy: args.greedy,
                ..DqlConfig::dense().with_seed(seed)
            };
            let network = Mlp::new(MlpConfig::dense().with_seed(seed))?;
            DenseDqlController::new(side, config, network)?.into()
        }
        Kind::Visual => {
            let (width, height) = Rasterizer::default()
                .grid_size(downscale)
                .map_err(|e| AgentError::InvalidConfig {
                    field: "downscale",
                    reason: e.to_string(),
                })?;
            let config = DqlConfig {
                greedy: args.greedy,
                verbose: args.verbose,
                ..DqlConfig::visual().with_seed(seed)
            };
            let network = Mlp::new(MlpConfig::visual(width * height).with_seed(seed))?;
            VisualDqlController::new(side, config, network)?.into()
        }
    };
    Ok(controller)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::for_difficulty(Difficulty::from_level(args.difficulty)?);
    let options = if args.fast {
        RunnerOptions::fast()
    } else {
        RunnerOptions::paced()
    };

    let left = build(args.left, Side::Left, &args, options.downscale).map_err(|source| {
        RunnerError::Controller {
            side: Side::Left,
            source,
        }
    })?;
    let right = match args.right {
        Some(kind) => build(kind, Side::Right, &args, options.downscale).map_err(|source| {
            RunnerError::Controller {
                side: Side::Right,
                source,
            }
        })?,
        None => left.mirror_controller(),
    };
    tracing::info!(
        left = left.kind(),
        right = right.kind(),
        difficulty = args.difficulty,
        matches = args.matches,
        "starting session"
    );

    let mut session = Session::new(left, right, config, options, args.seed)?;
    let stats = session.play(args.matches).await?;

    println!(
        "{} matches: left {} / right {}, average duration {:.1}s",
        stats.matches,
        stats.left_wins,
        stats.right_wins,
        stats.average_duration()
    );
    Ok(())
}
