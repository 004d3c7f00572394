// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `split`, `train` and `chat`
// and all their configurable flags.
//
// Each `*Args` struct converts into its application-layer config
// through `From`, so nothing below this layer sees clap types.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    reply_engine::ReplyConfig, split_use_case::SplitConfig, train_use_case::TrainConfig,
};
use crate::domain::persona::Persona;

/// The three top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a raw chat transcript into one corpus file per persona
    Split(SplitArgs),

    /// Build the similarity indexes, Markov models and vocabulary
    Train(TrainArgs),

    /// Chat with the trained personas
    Chat(ChatArgs),
}

// ─── split ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Raw transcript export
    #[arg(long, default_value = "thecapicornist.txt")]
    pub infile: PathBuf,

    /// Directory receiving <handle>.txt files
    #[arg(long, default_value = "data")]
    pub outdir: PathBuf,
}

impl From<SplitArgs> for SplitConfig {
    fn from(a: SplitArgs) -> Self {
        SplitConfig { infile: a.infile, outdir: a.outdir }
    }
}

// ─── train ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus file for bot1 (one utterance per line)
    #[arg(long)]
    pub bot1: PathBuf,

    /// Corpus file for bot2
    #[arg(long)]
    pub bot2: PathBuf,

    /// Artifact output directory
    #[arg(long, default_value = "models")]
    pub out: PathBuf,

    /// Upper bound on tf-idf features (unigrams + bigrams)
    #[arg(long, default_value_t = 60_000)]
    pub max_features: usize,

    /// Neighbours stored per index query
    #[arg(long, default_value_t = 3)]
    pub n_neighbors: usize,

    /// Markov context length
    #[arg(long, default_value_t = 2)]
    pub order: usize,

    /// Skip synonym expansion of the vocabulary
    #[arg(long)]
    pub no_expand: bool,

    /// Synonyms added per word at most
    #[arg(long, default_value_t = 5)]
    pub max_synonyms: usize,

    /// JSON thesaurus: {"word": ["lemma", ...]}
    #[arg(long)]
    pub thesaurus: Option<PathBuf>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            bot1_file:             a.bot1,
            bot2_file:             a.bot2,
            out_dir:               a.out,
            order:                 a.order,
            max_features:          a.max_features,
            n_neighbors:           a.n_neighbors,
            expand_vocab:          !a.no_expand,
            max_synonyms_per_word: a.max_synonyms,
            thesaurus:             a.thesaurus,
        }
    }
}

// ─── chat ─────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Directory with trained artifacts
    #[arg(long, default_value = "models")]
    pub models: PathBuf,

    /// Largest cosine distance accepted as a retrieval hit
    #[arg(long, default_value_t = 0.45)]
    pub threshold: f64,

    /// Seed for reproducible replies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Persona active at start (bot1 or bot2)
    #[arg(long, default_value = "bot1", value_parser = parse_persona)]
    pub persona: Persona,
}

fn parse_persona(s: &str) -> Result<Persona, String> {
    Persona::from_key(s).ok_or_else(|| format!("unknown persona '{s}' (expected bot1 or bot2)"))
}

impl From<&ChatArgs> for ReplyConfig {
    fn from(a: &ChatArgs) -> Self {
        ReplyConfig { threshold: a.threshold, ..ReplyConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_args_into_config() {
        let cli = Cli::try_parse_from([
            "duo-persona", "train", "--bot1", "a.txt", "--bot2", "b.txt", "--no-expand", "--order", "3",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.bot1_file, PathBuf::from("a.txt"));
        assert_eq!(cfg.out_dir, PathBuf::from("models"));
        assert!(!cfg.expand_vocab);
        assert_eq!(cfg.order, 3);
        assert_eq!(cfg.max_features, 60_000);
    }

    #[test]
    fn test_train_requires_both_corpora() {
        assert!(Cli::try_parse_from(["duo-persona", "train", "--bot1", "a.txt"]).is_err());
    }

    #[test]
    fn test_chat_defaults() {
        let cli = Cli::try_parse_from(["duo-persona", "chat"]).unwrap();
        let Commands::Chat(args) = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(args.models, PathBuf::from("models"));
        assert_eq!(args.persona, Persona::Bot1);
        assert!(args.seed.is_none());
        assert!((ReplyConfig::from(&args).threshold - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_chat_rejects_unknown_persona() {
        assert!(Cli::try_parse_from(["duo-persona", "chat", "--persona", "bot3"]).is_err());
        let cli = Cli::try_parse_from(["duo-persona", "chat", "--persona", "BOT2"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat(ChatArgs { persona: Persona::Bot2, .. })));
    }

    #[test]
    fn test_split_defaults() {
        let cli = Cli::try_parse_from(["duo-persona", "split"]).unwrap();
        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        let cfg: SplitConfig = args.into();
        assert_eq!(cfg.infile, PathBuf::from("thecapicornist.txt"));
        assert_eq!(cfg.outdir, PathBuf::from("data"));
    }
}
