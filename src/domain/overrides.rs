// ============================================================
// Layer 3 — Override Table and Reply Routes
// ============================================================
// Scripted replies that bypass retrieval and generation.
//
// Every canned set is a `ReplySet`, which stores its first
// entry separately from the rest. A `ReplySet` therefore can
// never be empty, and picking from it never needs a runtime
// emptiness check.
//
// The tagged `ReplyRoute` records which rule produced a reply
// so callers (and tests) can see how a decision was made.

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::domain::persona::Persona;

/// A non-empty list of canned replies.
#[derive(Debug, Clone, Copy)]
pub struct ReplySet {
    first: &'static str,
    rest: &'static [&'static str],
}

impl ReplySet {
    pub const fn new(first: &'static str, rest: &'static [&'static str]) -> Self {
        Self { first, rest }
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.first).chain(self.rest.iter().copied())
    }

    pub fn contains(&self, reply: &str) -> bool {
        self.iter().any(|r| r == reply)
    }

    /// Uniform pick; always succeeds.
    pub fn pick(&self, rng: &mut dyn RngCore) -> &'static str {
        match rng.gen_range(0..self.len()) {
            0 => self.first,
            i => self.rest[i - 1],
        }
    }
}

/// Trigger categories an override can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideCategory {
    /// The persona reacting to Kya being mentioned
    Mention,
    /// Bot2's jealous line when Kya and bot1 come up together
    Secret,
}

pub const BOT1_MENTION: ReplySet = ReplySet::new(
    "Kya? She's amazing. Don't you dare say anything bad about her.",
    &[
        "If anyone talks trash about Kya, they have to answer to me.",
        "I care about Kya so much. Please be kind to her.",
    ],
);

pub const BOT2_MENTION: ReplySet = ReplySet::new(
    "Ugh, Kya? She's always in the way. I don't like her.",
    &[
        "Kya again... I can't stand her, but whatever, do what you want.",
        "I don't trust Kya. Keep your distance from her.",
    ],
);

pub const BOT2_SECRET: ReplySet = ReplySet::new(
    "I hate that Kya and you get along. Not that it matters.",
    &["Fine, Kya can have you. I'm not jealous at all... 🙄"],
);

/// Generic replies used when every other rule came up empty.
pub const FILLER: ReplySet = ReplySet::new(
    "Hmm, tell me more.",
    &[
        "Oh? Interesting. Go on.",
        "I don't have much to say about that, but I'm listening.",
    ],
);

/// Substrings (lowercased input) that fire the override rule
pub const OVERRIDE_TRIGGERS: &[&str] = &["kya", "k.y.a"];

/// Substrings that let bot2's secret set come into play
pub const SECRET_TRIGGERS: &[&str] = &["galaxydev", "colin", "bot1"];

/// Static persona × category → reply set lookup.
pub struct OverrideTable;

impl OverrideTable {
    /// Returns `None` for combinations the table does not define
    /// (bot1 has no secret set).
    pub fn get(persona: Persona, category: OverrideCategory) -> Option<ReplySet> {
        match (persona, category) {
            (Persona::Bot1, OverrideCategory::Mention) => Some(BOT1_MENTION),
            (Persona::Bot2, OverrideCategory::Mention) => Some(BOT2_MENTION),
            (Persona::Bot2, OverrideCategory::Secret) => Some(BOT2_SECRET),
            (Persona::Bot1, OverrideCategory::Secret) => None,
        }
    }

    /// Mention set for a persona; defined for both.
    pub fn mention(persona: Persona) -> ReplySet {
        match persona {
            Persona::Bot1 => BOT1_MENTION,
            Persona::Bot2 => BOT2_MENTION,
        }
    }
}

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplyRoute {
    OverrideMention,
    OverrideSecret,
    /// Retrieved corpus utterance; `extended` when a Markov fragment was appended
    RetrievalHit { extended: bool },
    Generated,
    Filler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub route: ReplyRoute,
}

impl Reply {
    pub fn new(text: impl Into<String>, route: ReplyRoute) -> Self {
        Self { text: text.into(), route }
    }
}
