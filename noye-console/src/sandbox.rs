//! The script manager seam and its offline implementation.
//!
//! Handlers and the reload worker only ever talk to [`Manager`]; tests swap
//! in recording fakes. [`Sandbox`] is the production implementation: it
//! keeps the script registry and simulates delivery through the bot
//! backend, since actually executing script code is out of scope for the
//! console.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use tracing::{debug, info, warn};

use crate::bot::Bot;
use crate::message::{Message, RawMessage};

const BASE_SCRIPT: &str = "base.js";

/// A loaded script: file name, where it came from, and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

/// Operations the console needs from the script engine.
pub trait Manager: Send {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn reload_base(&mut self);
    fn scripts(&self) -> Vec<Script>;
    fn respond(&mut self, msg: Message);
    fn listen(&mut self, msg: RawMessage);
}

pub struct Sandbox {
    scripts: BTreeMap<String, Script>,
    base: Option<Script>,
    bot: Box<dyn Bot>,
}

impl Sandbox {
    pub fn new(bot: Box<dyn Bot>) -> Self {
        Self {
            scripts: BTreeMap::new(),
            base: None,
            bot,
        }
    }

    fn read_script(path: &Path) -> Result<Script> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading script '{}'", path.display()))?;
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            bail!("script path '{}' has no file name", path.display());
        };
        Ok(Script {
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Manager for Sandbox {
    /// Loads or replaces the script at `path`, keyed by file name.
    fn load(&mut self, path: &Path) -> Result<()> {
        let script = Sandbox::read_script(path)?;
        info!(script = %script.name, path = %path.display(), "loaded script");
        self.scripts.insert(script.name.clone(), script);
        Ok(())
    }

    /// Re-reads `base.js` from the working directory.
    fn reload_base(&mut self) {
        match Sandbox::read_script(Path::new(BASE_SCRIPT)) {
            Ok(script) => {
                info!(path = %script.path.display(), "reloaded base script");
                self.base = Some(script);
            }
            Err(err) => warn!(error = %err, "reloading base script failed"),
        }
    }

    fn scripts(&self) -> Vec<Script> {
        self.scripts.values().cloned().collect()
    }

    /// Simulates delivering a chat message: the backend echoes it back as
    /// the delivery callback a reacting script would have triggered.
    fn respond(&mut self, msg: Message) {
        debug!(from = %msg.from, target = %msg.target, scripts = self.scripts.len(), "delivering message");
        self.bot.privmsg(&msg.target, &msg.text);
    }

    /// Simulates delivering a raw protocol event through the raw-send path.
    fn listen(&mut self, msg: RawMessage) {
        debug!(source = %msg.source, command = %msg.command, "delivering raw event");
        let mut line = msg.command;
        for arg in &msg.args {
            line.push(' ');
            line.push_str(arg);
        }
        self.bot.send(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::parse_user;
    use crate::output;
    use std::io::Write;

    struct SilentBot;

    impl Bot for SilentBot {
        fn privmsg(&self, _target: &str, _text: &str) {}
        fn join(&self, _target: &str) {}
        fn part(&self, _target: &str) {}
        fn send(&self, _line: &str) {}
    }

    fn script_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{contents}").expect("write script");
        file
    }

    #[test]
    fn load_registers_by_file_name() {
        let file = script_file("respond(\"!hello\", function(msg) {});\n");
        let mut sandbox = Sandbox::new(Box::new(SilentBot));

        sandbox.load(file.path()).expect("load should pass");

        let scripts = sandbox.scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(
            scripts[0].name,
            file.path().file_name().unwrap().to_str().unwrap()
        );
        assert!(scripts[0].source.starts_with("respond"));
    }

    #[test]
    fn load_of_a_missing_file_fails_and_registers_nothing() {
        let mut sandbox = Sandbox::new(Box::new(SilentBot));
        let result = sandbox.load(Path::new("no/such/script.js"));
        assert!(result.is_err());
        assert!(sandbox.scripts().is_empty());
    }

    #[test]
    fn reloading_replaces_the_previous_copy() {
        let mut file = script_file("first");
        let mut sandbox = Sandbox::new(Box::new(SilentBot));
        sandbox.load(file.path()).expect("first load");

        write!(file, " second").expect("append");
        file.flush().expect("flush");
        sandbox.load(file.path()).expect("second load");

        let scripts = sandbox.scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].source, "first second");
    }

    #[tokio::test]
    async fn respond_and_listen_echo_through_the_backend() {
        let (tx, mut rx) = output::channel();
        let bot = crate::bot::MockBot::new(tx);
        let mut sandbox = Sandbox::new(Box::new(bot));

        sandbox.respond(Message {
            from: parse_user("test!user@localhost"),
            target: "#noye".to_string(),
            text: "hello world".to_string(),
        });
        sandbox.listen(RawMessage {
            source: parse_user("test!user@localhost"),
            command: "001".to_string(),
            args: vec!["welcome".to_string()],
        });

        assert_eq!(
            rx.recv().await.as_deref(),
            Some("(PRIVMSG) #noye: hello world")
        );
        assert_eq!(rx.recv().await.as_deref(), Some("(SEND) 001 welcome"));
    }
}
