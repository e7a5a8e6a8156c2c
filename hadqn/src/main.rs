use anyhow::Result;
use clap::Parser;
use hadqn::{
    corridor::{Corridor, CorridorConfig},
    evaluate,
    hyperparameters::Hyperparameters,
    train,
};
use hadqn_core::Env;
use log::info;
use std::path::PathBuf;

const N_EVAL_GAMES: usize = 10;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hyperparameters in YAML, defaults are used if not given
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of TensorBoard logs
    #[arg(long)]
    logdir: Option<PathBuf>,

    /// Overrides the number of games
    #[arg(long)]
    max_games: Option<usize>,

    /// Overrides the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Writes the resolved hyperparameters to the given file and exits
    #[arg(long)]
    create_config: Option<PathBuf>,
}

fn hyperparameters(args: &Args) -> Result<Hyperparameters> {
    let mut hp = match &args.config {
        Some(path) => Hyperparameters::load(path)?,
        None => Hyperparameters::default(),
    };
    if let Some(v) = args.max_games {
        hp.max_games = v;
    }
    if let Some(v) = args.seed {
        hp.seed = v;
    }
    Ok(hp)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let hp = hyperparameters(&args)?;

    if let Some(path) = &args.create_config {
        return hp.save(path);
    }

    let env_config = CorridorConfig::default();
    let agent = train(&hp, &env_config, args.logdir.as_deref())?;

    let mut env = Corridor::build(&env_config, hp.seed as i64 + 1)?;
    let mean_reward = evaluate(&agent, &mut env, N_EVAL_GAMES)?;
    info!("Greedy policy: mean reward {:.2} over {} games", mean_reward, N_EVAL_GAMES);

    Ok(())
}
