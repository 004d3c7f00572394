// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `split` — turns a raw chat log into persona corpora
//   2. `train` — builds the artifact set from those corpora
//   3. `chat`  — loads the artifacts and runs the chat loop

pub mod commands;
pub mod session;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::io;

use commands::{ChatArgs, Commands, SplitArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "duo-persona",
    version,
    about = "Split a chat log, train two reply personas on it, then chat with them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Split(args) => run_split(args),
            Commands::Train(args) => run_train(args),
            Commands::Chat(args)  => run_chat(args),
        }
    }
}

fn run_split(args: SplitArgs) -> Result<()> {
    use crate::application::split_use_case::{SplitOutcome, SplitUseCase};

    match SplitUseCase::new(args.into()).execute()? {
        SplitOutcome::MissingInput => println!("Input file not found; nothing written."),
        SplitOutcome::Written(files) => {
            for (persona, path, count) in files {
                println!("{persona}: {count} utterances → {}", path.display());
            }
        }
    }
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training on '{}' and '{}'", args.bot1.display(), args.bot2.display());
    let out = args.out.clone();
    let summary = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete: {} + {} utterances, {} features, {} vocabulary words. Saved to '{}'.",
        summary.bot1_utterances,
        summary.bot2_utterances,
        summary.features,
        summary.vocab_size,
        out.display()
    );
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    use crate::application::reply_engine::{ReplyConfig, ReplyEngine};
    use crate::infra::artifact_store::ArtifactStore;
    use session::ChatSession;

    let store = ArtifactStore::new(&args.models);
    let artifacts = store
        .load()
        .with_context(|| format!("Cannot start chat from '{}'", store.dir().display()))?;
    match store.load_config() {
        Ok(trained) => tracing::info!(
            "Models trained from '{}' and '{}' (order {}, max {} features)",
            trained.bot1_file.display(),
            trained.bot2_file.display(),
            trained.order,
            trained.max_features
        ),
        Err(e) => tracing::warn!("No training record: {e}"),
    }

    // Generate with the context length the models were trained with
    let mut config = ReplyConfig::from(&args);
    config.order = artifacts.markov(args.persona).order();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let engine = ReplyEngine::new(artifacts, config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    ChatSession::new(&engine, args.persona, &mut rng).run(stdin.lock(), &mut stdout)
}
