// ============================================================
// Layer 4 — Chat Log Splitter
// ============================================================
// Parses one raw multi-speaker transcript into two persona
// corpora (one utterance list per persona).
//
// Transcript exports mix three kinds of lines:
//
//   galaxydev — 8/5/2025 5:46 PM      speaker + timestamp
//   hello there                        message text
//
//   Val — ok that's fair               speaker + inline message
//
//   galaxydev                          bare speaker line
//   — 8/6/2025 7:41 AM                 timestamp on its own line
//   message text
//
// A message runs until the next line that looks like a speaker
// line. Blank lines inside a message are skipped, not treated as
// terminators.
//
// Speakers are mapped to personas through the alias table in
// domain/persona.rs. While the current speaker is unknown, every
// message line is dropped: the alias table is never complete,
// and putting a stranger's words into a persona is worse than
// losing a few lines.
//
// Caveat kept on purpose: a one-word message such as "lol" is
// indistinguishable from a bare speaker line, so it resets the
// current speaker.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::data::preprocessor::Preprocessor;
use crate::domain::persona::Persona;

/// "name — rest"
static SPEAKER_DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^—\n\r]+?)\s*—\s*(.+)$").expect("speaker-dash regex is valid")
});

/// "name" alone on a line
static BARE_SPEAKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_@]{1,60}$").expect("bare-speaker regex is valid")
});

/// Crude date detector for the part after the dash
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}[/\-]\d{1,2}[/\-]?\d{2,4}|\d{4}").expect("date regex is valid")
});

fn is_speaker_line(line: &str) -> bool {
    SPEAKER_DASH_RE.is_match(line) || BARE_SPEAKER_RE.is_match(line)
}

/// Collect message lines starting at `start` until the next speaker
/// line. Returns the lines and the index where collection stopped.
fn collect_message<'a>(lines: &[&'a str], start: usize) -> (Vec<&'a str>, usize) {
    let mut collected = Vec::new();
    let mut j = start;
    while j < lines.len() {
        let line = lines[j];
        if line.is_empty() {
            j += 1;
            continue;
        }
        if is_speaker_line(line) {
            break;
        }
        collected.push(line);
        j += 1;
    }
    (collected, j)
}

/// Per-persona utterance lists produced by the splitter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitCorpora {
    by_persona: BTreeMap<Persona, Vec<String>>,
}

impl SplitCorpora {
    pub fn get(&self, persona: Persona) -> &[String] {
        self.by_persona
            .get(&persona)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn push(&mut self, persona: Persona, message: String) {
        self.by_persona.entry(persona).or_default().push(message);
    }

    /// Write `<dir>/<handle>.txt` for both personas, one utterance per
    /// line. Personas with no messages still get an (empty) file.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<(Persona, PathBuf)>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let mut written = Vec::with_capacity(Persona::ALL.len());
        for persona in Persona::ALL {
            let path = dir.join(persona.corpus_file_name());
            let mut body = String::new();
            for line in self.get(persona) {
                body.push_str(line);
                body.push('\n');
            }
            fs::write(&path, body)
                .with_context(|| format!("Cannot write '{}'", path.display()))?;
            written.push((persona, path));
        }
        Ok(written)
    }
}

pub struct LogSplitter {
    preprocessor: Preprocessor,
}

impl LogSplitter {
    pub fn new() -> Self {
        Self { preprocessor: Preprocessor::new() }
    }

    /// Parse a transcript and return sanitized, de-duplicated corpora.
    pub fn split(&self, transcript: &str) -> SplitCorpora {
        let raw = parse_transcript(transcript);

        let mut cleaned = SplitCorpora::default();
        for (persona, messages) in raw.by_persona {
            let mut seen = HashSet::new();
            for message in messages {
                let sanitized = self.preprocessor.clean(&message);
                if sanitized.is_empty() || !seen.insert(sanitized.clone()) {
                    continue;
                }
                cleaned.push(persona, sanitized);
            }
        }
        cleaned
    }
}

impl Default for LogSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Line-grammar pass; no sanitizing or de-duplication yet.
fn parse_transcript(transcript: &str) -> SplitCorpora {
    let lines: Vec<&str> = transcript.lines().map(str::trim).collect();
    let mut out = SplitCorpora::default();
    let mut current: Option<Persona> = None;
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        if line.is_empty() {
            i += 1;
            continue;
        }

        // ── Case 1: "name — rest" ─────────────────────────────────────────────
        if let Some(caps) = SPEAKER_DASH_RE.captures(line) {
            let speaker = caps.get(1).map_or("", |m| m.as_str()).trim();
            let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
            current = Persona::from_speaker(speaker);

            let (more, next) = collect_message(&lines, i + 1);
            i = next;

            // A timestamp after the dash means the message starts on the next line
            let message = if DATE_RE.is_match(rest) {
                more.join(" ")
            } else {
                std::iter::once(rest).chain(more).collect::<Vec<_>>().join(" ")
            };

            if let Some(persona) = current {
                let message = message.trim();
                if !message.is_empty() {
                    out.push(persona, message.to_string());
                }
            }
            continue;
        }

        // ── Case 2: bare speaker line ─────────────────────────────────────────
        if BARE_SPEAKER_RE.is_match(line) {
            current = Persona::from_speaker(line);

            // Only the immediately following line is checked for a timestamp
            let skip_timestamp = lines
                .get(i + 1)
                .is_some_and(|next| next.starts_with('—') || SPEAKER_DASH_RE.is_match(next));
            let start = if skip_timestamp { i + 2 } else { i + 1 };

            let (message_lines, next) = collect_message(&lines, start);
            i = next;
            if let Some(persona) = current {
                if !message_lines.is_empty() {
                    out.push(persona, message_lines.join(" ").trim().to_string());
                }
            }
            continue;
        }

        // ── Case 3: continuation under the current speaker ────────────────────
        if let Some(persona) = current {
            let (message_lines, next) = collect_message(&lines, i);
            i = next;
            if !message_lines.is_empty() {
                out.push(persona, message_lines.join(" ").trim().to_string());
            }
            continue;
        }

        // Orphan line with no known speaker
        i += 1;
    }

    out
}
