// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores the trained bundle as JSON files.
//
// Directory layout:
//   models/
//     tfidf_vectorizer.json   ← shared vectorizer (bot1 ∪ bot2)
//     nn_bot1.json            ← cosine index, row i = docs_bot1[i]
//     nn_bot2.json
//     docs_bot1.json          ← stored utterances
//     docs_bot2.json
//     markov_bot1.json        ← order-2 Markov tables
//     markov_bot2.json
//     vocab.json              ← expanded word bank (informational)
//     train_config.json       ← the config that produced this set
//
// Writing is all-or-nothing: files go into `<dir>.staging` first
// and the staging directory replaces `<dir>` only once every file
// has been written. A failed training run leaves the previous set
// untouched.

use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::persona::Persona;
use crate::infra::error::ArtifactError;
use crate::ml::markov::MarkovModel;
use crate::ml::neighbors::NearestNeighbors;
use crate::ml::similarity::{PersonaIndex, SimilarityIndex};
use crate::ml::tfidf::TfidfVectorizer;

const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
const VOCAB_FILE: &str = "vocab.json";
const CONFIG_FILE: &str = "train_config.json";

fn neighbors_file(p: Persona) -> String {
    format!("nn_{}.json", p.key())
}

fn docs_file(p: Persona) -> String {
    format!("docs_{}.json", p.key())
}

fn markov_file(p: Persona) -> String {
    format!("markov_{}.json", p.key())
}

/// Everything the reply engine needs, loaded once and read-only.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub similarity: SimilarityIndex,
    markov_bot1: MarkovModel,
    markov_bot2: MarkovModel,
}

impl Artifacts {
    pub fn new(similarity: SimilarityIndex, markov_bot1: MarkovModel, markov_bot2: MarkovModel) -> Self {
        Self { similarity, markov_bot1, markov_bot2 }
    }

    pub fn markov(&self, persona: Persona) -> &MarkovModel {
        match persona {
            Persona::Bot1 => &self.markov_bot1,
            Persona::Bot2 => &self.markov_bot2,
        }
    }
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a complete artifact set, replacing any previous one.
    pub fn save(
        &self,
        artifacts: &Artifacts,
        vocab: &[String],
        config: &TrainConfig,
    ) -> Result<(), ArtifactError> {
        let staging = sibling(&self.dir, "staging");
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| ArtifactError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| ArtifactError::io(&staging, e))?;

        let similarity = &artifacts.similarity;
        write_json(&staging.join(VECTORIZER_FILE), similarity.vectorizer(), false)?;
        for persona in Persona::ALL {
            let index = similarity.persona(persona);
            write_json(&staging.join(neighbors_file(persona)), index.neighbors(), false)?;
            write_json(&staging.join(docs_file(persona)), index.utterances(), false)?;
            write_json(&staging.join(markov_file(persona)), artifacts.markov(persona), false)?;
        }
        write_json(&staging.join(VOCAB_FILE), vocab, true)?;
        write_json(&staging.join(CONFIG_FILE), config, true)?;

        self.swap_in(&staging)?;
        tracing::debug!("Artifacts committed to '{}'", self.dir.display());
        Ok(())
    }

    /// Replace `self.dir` with the fully written staging directory.
    fn swap_in(&self, staging: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = self.dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
        }

        let previous = sibling(&self.dir, "previous");
        if self.dir.exists() {
            if previous.exists() {
                fs::remove_dir_all(&previous).map_err(|e| ArtifactError::io(&previous, e))?;
            }
            fs::rename(&self.dir, &previous).map_err(|e| ArtifactError::io(&self.dir, e))?;
        }
        fs::rename(staging, &self.dir).map_err(|e| ArtifactError::io(&self.dir, e))?;
        if previous.exists() {
            fs::remove_dir_all(&previous).map_err(|e| ArtifactError::io(&previous, e))?;
        }
        Ok(())
    }

    /// Load the serving bundle. Fails if the directory or any file is
    /// missing, or if a persona's index and utterances disagree.
    pub fn load(&self) -> Result<Artifacts, ArtifactError> {
        if !self.dir.is_dir() {
            return Err(ArtifactError::MissingDirectory(self.dir.clone()));
        }

        let vectorizer: TfidfVectorizer = self.read_json(VECTORIZER_FILE)?;
        let bot1 = self.load_persona_index(Persona::Bot1)?;
        let bot2 = self.load_persona_index(Persona::Bot2)?;
        let markov_bot1: MarkovModel = self.read_json(&markov_file(Persona::Bot1))?;
        let markov_bot2: MarkovModel = self.read_json(&markov_file(Persona::Bot2))?;

        tracing::info!(
            "Loaded artifacts from '{}': {} features, {} / {} utterances",
            self.dir.display(),
            vectorizer.num_features(),
            bot1.utterances().len(),
            bot2.utterances().len()
        );

        Ok(Artifacts::new(
            SimilarityIndex::from_parts(vectorizer, bot1, bot2),
            markov_bot1,
            markov_bot2,
        ))
    }

    fn load_persona_index(&self, persona: Persona) -> Result<PersonaIndex, ArtifactError> {
        let neighbors: NearestNeighbors = self.read_json(&neighbors_file(persona))?;
        let utterances: Vec<String> = self.read_json(&docs_file(persona))?;
        let index = PersonaIndex::from_parts(neighbors, utterances);
        if !index.is_aligned() {
            return Err(ArtifactError::Misaligned {
                persona,
                rows: index.neighbors().len(),
                utterances: index.utterances().len(),
            });
        }
        Ok(index)
    }

    /// The training configuration recorded alongside the artifacts.
    pub fn load_config(&self) -> Result<TrainConfig, ArtifactError> {
        self.read_json(CONFIG_FILE)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, ArtifactError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(ArtifactError::MissingFile(path));
        }
        let text = fs::read_to_string(&path).map_err(|e| ArtifactError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| ArtifactError::json(&path, e))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<(), ArtifactError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| ArtifactError::json(path, e))?;
    fs::write(path, json).map_err(|e| ArtifactError::io(path, e))
}

/// `models` → `models.<suffix>` in the same parent directory.
fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "models".to_string());
    dir.with_file_name(format!("{name}.{suffix}"))
}
