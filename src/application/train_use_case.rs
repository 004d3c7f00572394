// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load both persona corpora     (Layer 4 - data)
//   Step 2: Expand the vocabulary         (Layer 4 - data)
//   Step 3: Fit the shared tf-idf space   (Layer 5 - ml)
//           and one cosine index per persona
//   Step 4: Build one Markov model each   (Layer 5 - ml)
//   Step 5: Save the artifact set         (Layer 6 - infra)
//
// Both corpora are loaded before anything is built, so a missing
// persona file stops the run before a single artifact is written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    loader::UtteranceFile,
    vocabulary::{expand, ExpandOptions, Thesaurus},
};
use crate::domain::{persona::Persona, traits::UtteranceSource};
use crate::infra::artifact_store::{ArtifactStore, Artifacts};
use crate::ml::{markov::MarkovModel, similarity::SimilarityIndex};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a training run. Saved next to the artifacts as
// train_config.json so a model directory records how it was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub bot1_file:             PathBuf,
    pub bot2_file:             PathBuf,
    pub out_dir:               PathBuf,
    pub order:                 usize,
    pub max_features:          usize,
    pub n_neighbors:           usize,
    pub expand_vocab:          bool,
    pub max_synonyms_per_word: usize,
    pub thesaurus:             Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            bot1_file:             PathBuf::from("data").join(Persona::Bot1.corpus_file_name()),
            bot2_file:             PathBuf::from("data").join(Persona::Bot2.corpus_file_name()),
            out_dir:               PathBuf::from("models"),
            order:                 2,
            max_features:          60_000,
            n_neighbors:           3,
            expand_vocab:          true,
            max_synonyms_per_word: 5,
            thesaurus:             None,
        }
    }
}

/// Sizes of what a training run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainSummary {
    pub bot1_utterances: usize,
    pub bot2_utterances: usize,
    pub features:        usize,
    pub vocab_size:      usize,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end, reading the
    /// corpus files named in the config.
    pub fn execute(&self) -> Result<TrainSummary> {
        let bot1 = UtteranceFile::new(&self.config.bot1_file);
        let bot2 = UtteranceFile::new(&self.config.bot2_file);
        self.train_from(&bot1, &bot2)
    }

    /// Train from any pair of utterance sources.
    pub fn train_from(
        &self,
        bot1: &dyn UtteranceSource,
        bot2: &dyn UtteranceSource,
    ) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load both corpora ─────────────────────────────────────────
        let bot1 = bot1.load_utterances()?;
        let bot2 = bot2.load_utterances()?;
        tracing::info!("Loaded {} bot1 and {} bot2 utterances", bot1.len(), bot2.len());

        // ── Step 2: Vocabulary ────────────────────────────────────────────────
        let thesaurus = match &cfg.thesaurus {
            Some(path) => Thesaurus::from_file(path)?,
            None => Thesaurus::empty(),
        };
        if cfg.expand_vocab && thesaurus.is_empty() {
            tracing::info!("No thesaurus entries; vocabulary gets slang and suffix forms only");
        }
        let options = ExpandOptions {
            expand_synonyms:       cfg.expand_vocab,
            max_synonyms_per_word: cfg.max_synonyms_per_word,
        };
        let corpus: Vec<&str> = bot1.iter().chain(bot2.iter()).map(String::as_str).collect();
        let vocab = expand(&corpus, &thesaurus, options);
        tracing::info!("Vocabulary size: {}", vocab.len());

        // ── Step 3 & 4: Models ────────────────────────────────────────────────
        let markov_bot1 = MarkovModel::build(&bot1, cfg.order);
        let markov_bot2 = MarkovModel::build(&bot2, cfg.order);
        tracing::info!(
            "Markov contexts: {} (bot1), {} (bot2)",
            markov_bot1.len(),
            markov_bot2.len()
        );

        let summary_counts = (bot1.len(), bot2.len());
        let similarity = SimilarityIndex::build(bot1, bot2, cfg.max_features, cfg.n_neighbors);
        let features = similarity.vectorizer().num_features();
        tracing::info!("TF-IDF features: {}", features);

        // ── Step 5: Save ──────────────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.out_dir);
        let artifacts = Artifacts::new(similarity, markov_bot1, markov_bot2);
        store
            .save(&artifacts, &vocab, cfg)
            .with_context(|| format!("Cannot save artifacts to '{}'", cfg.out_dir.display()))?;
        tracing::info!("Saved artifacts to '{}'", cfg.out_dir.display());

        Ok(TrainSummary {
            bot1_utterances: summary_counts.0,
            bot2_utterances: summary_counts.1,
            features,
            vocab_size: vocab.len(),
        })
    }
}
