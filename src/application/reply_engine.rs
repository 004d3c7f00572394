// ============================================================
// Layer 2 — Reply Engine
// ============================================================
// Decides what the active persona says back. The decision is an
// ordered list of rules; the first rule that produces a reply
// wins:
//
//   1. override    "kya" / "k.y.a" in the input → canned line
//   2. retrieval   nearest stored utterance within `threshold`,
//                  extended with a Markov fragment when short
//   3. generated   free Markov sentence
//   4. filler      canned fallback; always succeeds
//
// Randomness comes in from the caller as `&mut dyn RngCore`, so
// a seeded session replays exactly.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::data::tokenizer::detect_names;
use crate::domain::{
    overrides::{
        OverrideCategory, OverrideTable, Reply, ReplyRoute, FILLER, OVERRIDE_TRIGGERS,
        SECRET_TRIGGERS,
    },
    persona::Persona,
};
use crate::infra::artifact_store::Artifacts;

// ─── Reply Configuration ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Largest cosine distance that still counts as a retrieval hit
    pub threshold:         f64,
    /// Retrieved replies with fewer words than this get extended
    pub short_reply_words: usize,
    pub extend_max_len:    usize,
    pub fallback_max_len:  usize,
    /// Markov context length used while generating
    pub order:             usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            threshold:         0.45,
            short_reply_words: 4,
            extend_max_len:    12,
            fallback_max_len:  20,
            order:             2,
        }
    }
}

type Rule = fn(&ReplyEngine, &str, Persona, &mut dyn RngCore) -> Option<Reply>;

const RULES: &[(&str, Rule)] = &[
    ("override", override_rule),
    ("retrieval", retrieval_rule),
    ("generated", generated_rule),
];

pub struct ReplyEngine {
    artifacts: Artifacts,
    config:    ReplyConfig,
}

impl ReplyEngine {
    pub fn new(artifacts: Artifacts, config: ReplyConfig) -> Self {
        for persona in Persona::ALL {
            if artifacts.markov(persona).is_empty() {
                tracing::warn!("{} has an empty Markov model; unmatched input gets filler replies", persona);
            }
        }
        Self { artifacts, config }
    }

    /// Produce the persona's reply to `text`. The returned text is never empty.
    pub fn reply(&self, text: &str, persona: Persona, rng: &mut dyn RngCore) -> Reply {
        let names = detect_names(text);
        if !names.is_empty() {
            tracing::debug!("Names mentioned: {:?}", names);
        }

        for &(name, rule) in RULES {
            if let Some(reply) = rule(self, text, persona, rng) {
                tracing::debug!("{} replied via {} rule ({:?})", persona, name, reply.route);
                return reply;
            }
        }

        tracing::debug!("{} fell back to filler", persona);
        Reply::new(FILLER.pick(rng), ReplyRoute::Filler)
    }

    fn generate(&self, persona: Persona, max_len: usize, rng: &mut dyn RngCore) -> String {
        self.artifacts
            .markov(persona)
            .generate(self.config.order, max_len, rng)
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────────

fn override_rule(_: &ReplyEngine, text: &str, persona: Persona, rng: &mut dyn RngCore) -> Option<Reply> {
    let lowered = text.to_lowercase();
    if !OVERRIDE_TRIGGERS.iter().any(|t| lowered.contains(t)) {
        return None;
    }

    let wants_secret = SECRET_TRIGGERS.iter().any(|t| lowered.contains(t));
    if wants_secret && rng.gen_bool(0.5) {
        if let Some(secret) = OverrideTable::get(persona, OverrideCategory::Secret) {
            return Some(Reply::new(secret.pick(rng), ReplyRoute::OverrideSecret));
        }
    }

    let mention = OverrideTable::mention(persona);
    Some(Reply::new(mention.pick(rng), ReplyRoute::OverrideMention))
}

fn retrieval_rule(engine: &ReplyEngine, text: &str, persona: Persona, rng: &mut dyn RngCore) -> Option<Reply> {
    let cfg = &engine.config;
    let hit = engine.artifacts.similarity.query(persona, text)?;
    tracing::debug!("Nearest {} utterance #{} at distance {:.4}", persona, hit.index, hit.distance);
    if hit.distance > cfg.threshold {
        return None;
    }

    let mut answer = hit.utterance.to_string();
    let mut extended = false;
    if answer.split_whitespace().count() < cfg.short_reply_words {
        let fragment = engine.generate(persona, cfg.extend_max_len, rng);
        if !fragment.is_empty() {
            answer.push(' ');
            answer.push_str(&fragment);
            extended = true;
        }
    }
    Some(Reply::new(answer, ReplyRoute::RetrievalHit { extended }))
}

fn generated_rule(engine: &ReplyEngine, _: &str, persona: Persona, rng: &mut dyn RngCore) -> Option<Reply> {
    let sentence = engine.generate(persona, engine.config.fallback_max_len, rng);
    (!sentence.is_empty()).then(|| Reply::new(sentence, ReplyRoute::Generated))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::overrides::{BOT1_MENTION, BOT2_MENTION, BOT2_SECRET};
    use crate::ml::{markov::MarkovModel, similarity::SimilarityIndex};
    use rand::{rngs::StdRng, SeedableRng};

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn engine() -> ReplyEngine {
        let bot1 = lines(&[
            "i love pizza more than anything",
            "see you tomorrow morning then",
            "go away",
        ]);
        let bot2 = lines(&["pizza is overrated honestly", "good morning sunshine how are you"]);
        let markov_bot1 = MarkovModel::build(&bot1, 2);
        let markov_bot2 = MarkovModel::build(&bot2, 2);
        let similarity = SimilarityIndex::build(bot1, bot2, 60_000, 3);
        ReplyEngine::new(Artifacts::new(similarity, markov_bot1, markov_bot2), ReplyConfig::default())
    }

    fn empty_engine() -> ReplyEngine {
        let similarity = SimilarityIndex::build(Vec::new(), Vec::new(), 60_000, 3);
        ReplyEngine::new(
            Artifacts::new(similarity, MarkovModel::default(), MarkovModel::default()),
            ReplyConfig::default(),
        )
    }

    #[test]
    fn test_bot1_kya_mention() {
        let engine = engine();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = engine.reply("omg kya is the best", Persona::Bot1, &mut rng);
            assert!(BOT1_MENTION.contains(&reply.text));
            assert_eq!(reply.route, ReplyRoute::OverrideMention);
        }
    }

    #[test]
    fn test_dotted_trigger_is_recognised() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(1);
        let reply = engine.reply("what about K.Y.A?", Persona::Bot2, &mut rng);
        assert!(BOT2_MENTION.contains(&reply.text));
    }

    #[test]
    fn test_bot2_secret_and_mention_both_reachable() {
        let engine = engine();
        let mut saw_secret = false;
        let mut saw_mention = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = engine.reply("kya and colin again", Persona::Bot2, &mut rng);
            match reply.route {
                ReplyRoute::OverrideSecret => {
                    assert!(BOT2_SECRET.contains(&reply.text));
                    saw_secret = true;
                }
                ReplyRoute::OverrideMention => {
                    assert!(BOT2_MENTION.contains(&reply.text));
                    saw_mention = true;
                }
                other => panic!("unexpected route {other:?}"),
            }
        }
        assert!(saw_secret && saw_mention);
    }

    #[test]
    fn test_bot2_without_secret_trigger_never_uses_secret() {
        let engine = engine();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = engine.reply("kya again", Persona::Bot2, &mut rng);
            assert_eq!(reply.route, ReplyRoute::OverrideMention);
        }
    }

    #[test]
    fn test_exact_utterance_is_retrieved() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(7);
        let reply = engine.reply("i love pizza more than anything", Persona::Bot1, &mut rng);
        assert_eq!(reply.text, "i love pizza more than anything");
        assert_eq!(reply.route, ReplyRoute::RetrievalHit { extended: false });
    }

    #[test]
    fn test_short_retrieval_is_extended() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(3);
        let reply = engine.reply("go away", Persona::Bot1, &mut rng);
        assert_eq!(reply.route, ReplyRoute::RetrievalHit { extended: true });
        assert!(reply.text.starts_with("go away "));
    }

    #[test]
    fn test_nonsense_input_still_replies() {
        let engine = engine();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = engine.reply("qwzx vbnm plk", Persona::Bot1, &mut rng);
            assert!(!reply.text.is_empty());
            assert_eq!(reply.route, ReplyRoute::Generated);
        }
    }

    #[test]
    fn test_empty_models_fall_back_to_filler() {
        let engine = empty_engine();
        let mut rng = StdRng::seed_from_u64(0);
        let reply = engine.reply("anything at all", Persona::Bot2, &mut rng);
        assert_eq!(reply.route, ReplyRoute::Filler);
        assert!(FILLER.contains(&reply.text));
    }

    #[test]
    fn test_same_seed_same_reply() {
        let engine = engine();
        let a = engine.reply("tell me something", Persona::Bot2, &mut StdRng::seed_from_u64(42));
        let b = engine.reply("tell me something", Persona::Bot2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
