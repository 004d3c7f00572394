// ============================================================
// Layer 1 — Interactive Chat Session
// ============================================================
// The read-reply loop behind `chat`. Generic over the input and
// output streams so tests can drive it with in-memory buffers.
//
//   /bot1, /bot2   switch the active persona
//   /quit          leave
//   anything else  is sent to the active persona

use anyhow::Result;
use rand::RngCore;
use std::io::{BufRead, Write};

use crate::application::reply_engine::ReplyEngine;
use crate::domain::persona::Persona;

const BANNER: &str = "Dual-Persona Chatbot\nCommands: /bot1, /bot2, /quit";
const UNKNOWN_COMMAND: &str = "Unknown command. Use /bot1, /bot2, /quit";

pub struct ChatSession<'a> {
    engine: &'a ReplyEngine,
    active: Persona,
    rng:    &'a mut dyn RngCore,
}

/// What one input line asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input<'s> {
    Skip,
    Switch(Persona),
    Quit,
    Unknown,
    Message(&'s str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Skip;
    }
    if !line.starts_with('/') {
        return Input::Message(line);
    }
    let lowered = line.to_lowercase();
    if lowered.starts_with("/bot1") {
        Input::Switch(Persona::Bot1)
    } else if lowered.starts_with("/bot2") {
        Input::Switch(Persona::Bot2)
    } else if lowered.starts_with("/quit") {
        Input::Quit
    } else {
        Input::Unknown
    }
}

/// Terminal punctuation the CLI adds to every printed reply.
pub fn present(reply: &str) -> String {
    if reply.ends_with(['.', '!', '?']) {
        reply.to_string()
    } else {
        format!("{reply}.")
    }
}

impl<'a> ChatSession<'a> {
    pub fn new(engine: &'a ReplyEngine, active: Persona, rng: &'a mut dyn RngCore) -> Self {
        Self { engine, active, rng }
    }

    /// Run until `/quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{BANNER}")?;
        writeln!(
            out,
            "Default persona: {} (bot1 = {}, bot2 = {})",
            self.active,
            Persona::Bot1.handle(),
            Persona::Bot2.handle()
        )?;

        let mut line = String::new();
        loop {
            write!(out, "[You] (active={})> ", self.active)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out, "\nGoodbye.")?;
                return Ok(());
            }

            match classify(&line) {
                Input::Skip => {}
                Input::Switch(persona) => {
                    self.active = persona;
                    writeln!(out, "Switched to {persona}.")?;
                }
                Input::Quit => {
                    writeln!(out, "Goodbye.")?;
                    return Ok(());
                }
                Input::Unknown => writeln!(out, "{UNKNOWN_COMMAND}")?,
                Input::Message(text) => {
                    let reply = self.engine.reply(text, self.active, &mut *self.rng);
                    writeln!(out, "[{}] {}", self.active, present(&reply.text))?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reply_engine::ReplyConfig;
    use crate::infra::artifact_store::Artifacts;
    use crate::ml::{markov::MarkovModel, similarity::SimilarityIndex};
    use rand::{rngs::StdRng, SeedableRng};

    fn engine() -> ReplyEngine {
        let bot1 = vec!["i love pizza more than anything".to_string()];
        let bot2 = vec!["pizza is overrated honestly".to_string()];
        let markov_bot1 = MarkovModel::build(&bot1, 2);
        let markov_bot2 = MarkovModel::build(&bot2, 2);
        let similarity = SimilarityIndex::build(bot1, bot2, 60_000, 3);
        ReplyEngine::new(Artifacts::new(similarity, markov_bot1, markov_bot2), ReplyConfig::default())
    }

    fn run(script: &str) -> String {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = ChatSession::new(&engine, Persona::Bot1, &mut rng);
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_present_adds_period_once() {
        assert_eq!(present("hello"), "hello.");
        assert_eq!(present("hello!"), "hello!");
        assert_eq!(present("really?"), "really?");
        assert_eq!(present("done."), "done.");
    }

    #[test]
    fn test_classify_commands_are_case_insensitive_prefixes() {
        assert_eq!(classify("/BOT2 please"), Input::Switch(Persona::Bot2));
        assert_eq!(classify("/bot1"), Input::Switch(Persona::Bot1));
        assert_eq!(classify("/Quit now"), Input::Quit);
        assert_eq!(classify("/help"), Input::Unknown);
        assert_eq!(classify("   "), Input::Skip);
        assert_eq!(classify(" hi there \n"), Input::Message("hi there"));
    }

    #[test]
    fn test_session_routes_to_active_persona() {
        let out = run("i love pizza more than anything\n/bot2\npizza is overrated honestly\n/quit\n");
        assert!(out.starts_with("Dual-Persona Chatbot\nCommands: /bot1, /bot2, /quit\n"));
        assert!(out.contains("[bot1] i love pizza more than anything."));
        assert!(out.contains("Switched to bot2."));
        assert!(out.contains("[You] (active=bot2)> "));
        assert!(out.contains("[bot2] pizza is overrated honestly."));
        assert!(out.trim_end().ends_with("Goodbye."));
    }

    #[test]
    fn test_unknown_command_and_eof() {
        let out = run("/dance\n");
        assert!(out.contains(UNKNOWN_COMMAND));
        assert!(out.trim_end().ends_with("Goodbye."));
    }
}
