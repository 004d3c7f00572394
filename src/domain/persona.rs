// ============================================================
// Layer 3 — Persona Domain Type
// ============================================================
// The two reply personalities the system serves.
//
//   Bot1 — galaxydev13            (persona A)
//   Bot2 — daydreaming_val_76222  (persona B)
//
// Each persona owns a corpus file, a Markov model and a
// similarity index. The stable key ("bot1" / "bot2") is what
// the artifact files and chat commands use.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Bot1,
    Bot2,
}

impl Persona {
    /// Both personas in corpus order.
    pub const ALL: [Persona; 2] = [Persona::Bot1, Persona::Bot2];

    /// Stable key used in artifact names and chat commands
    pub fn key(self) -> &'static str {
        match self {
            Persona::Bot1 => "bot1",
            Persona::Bot2 => "bot2",
        }
    }

    /// The chat handle this persona was trained from
    pub fn handle(self) -> &'static str {
        match self {
            Persona::Bot1 => "galaxydev13",
            Persona::Bot2 => "daydreaming_val_76222",
        }
    }

    /// Name of the one-utterance-per-line file written by `split`
    pub fn corpus_file_name(self) -> String {
        format!("{}.txt", self.handle())
    }

    /// Speaker names in a raw transcript that belong to this persona.
    /// Matching is done on the lowercased first token of the speaker field.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Persona::Bot1 => &["galaxydev13", "galaxydev", "colin", "galaxydev13yt", "galvin"],
            Persona::Bot2 => &["daydreaming_val_76222", "daydreaming_val", "val"],
        }
    }

    /// Map a raw speaker identifier onto a persona.
    ///
    /// Case-insensitive, leading `@` stripped, only the first
    /// whitespace-delimited token is considered. Unknown names
    /// return `None` so the caller can drop their lines.
    pub fn from_speaker(name: &str) -> Option<Persona> {
        let lowered = name.trim().to_lowercase();
        let stripped = lowered.strip_prefix('@').unwrap_or(&lowered);
        let first = stripped.split_whitespace().next().unwrap_or("");
        if first.is_empty() {
            return None;
        }
        Persona::ALL
            .into_iter()
            .find(|p| p.aliases().contains(&first))
    }

    /// Parse a chat command key such as "bot2"
    pub fn from_key(key: &str) -> Option<Persona> {
        Persona::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_alias_lookup() {
        assert_eq!(Persona::from_speaker("galaxydev"), Some(Persona::Bot1));
        assert_eq!(Persona::from_speaker("@Colin"), Some(Persona::Bot1));
        assert_eq!(Persona::from_speaker("Val extra words"), Some(Persona::Bot2));
        assert_eq!(Persona::from_speaker("  DAYDREAMING_VAL_76222 "), Some(Persona::Bot2));
    }

    #[test]
    fn test_unknown_speaker_is_none() {
        assert_eq!(Persona::from_speaker("miles"), None);
        assert_eq!(Persona::from_speaker(""), None);
        assert_eq!(Persona::from_speaker("@"), None);
    }

    #[test]
    fn test_keys_round_trip_through_from_key() {
        for p in Persona::ALL {
            assert_eq!(Persona::from_key(p.key()), Some(p));
        }
        assert_eq!(Persona::from_key("BOT2"), Some(Persona::Bot2));
        assert_eq!(Persona::from_key("bot3"), None);
    }

    #[test]
    fn test_corpus_file_names() {
        assert_eq!(Persona::Bot1.corpus_file_name(), "galaxydev13.txt");
        assert_eq!(Persona::Bot2.corpus_file_name(), "daydreaming_val_76222.txt");
    }
}
