//! The command registry and every console command.
//!
//! A command is a name, a help string, and a plain function taking the
//! shared [`Context`]. Handlers capture no state, so each one can be
//! exercised in isolation. Dispatch matches the first whitespace-delimited token of a
//! line against the registered triggers, case-sensitively.
//!
//! Handlers check their own argument counts and print their own usage
//! lines. User-facing output (listings, dumps, source text) goes to stdout;
//! errors and state changes go through tracing.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::context::Context;
use crate::message::{Message, RawMessage, User, parse_user};
use crate::reload;

/// Handler signature: the registry (for listings), the context, the
/// trimmed line, and the whitespace-split tokens (trigger first).
pub type Handler = fn(&Registry, &mut Context, &str, &[&str]);

pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    pub run: Handler,
}

/// Maps trigger tokens to commands. Listing order is unspecified by
/// contract; BTreeMap just keeps it stable.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a trigger, replacing any previous binding.
    pub fn register(&mut self, trigger: &'static str, command: Command) {
        self.commands.insert(trigger, command);
    }

    pub fn get(&self, trigger: &str) -> Option<&Command> {
        self.commands.get(trigger)
    }

    /// One line naming every trigger → command pair.
    pub fn listing(&self) -> String {
        let entries: Vec<String> = self
            .commands
            .iter()
            .map(|(trigger, command)| format!("[{trigger}] {}", command.name))
            .collect();
        format!("list of commands: {}", entries.join(", "))
    }

    /// Tokenizes a line and runs the matching command. Blank lines are a
    /// silent no-op; an unknown trigger prints the listing.
    pub fn dispatch(&self, ctx: &mut Context, line: &str) {
        let line = line.trim();
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(trigger) = fields.first() else {
            return;
        };

        match self.commands.get(*trigger) {
            Some(command) => {
                if ctx.shared.store.debug() {
                    info!(command = command.name, "dispatching");
                }
                (command.run)(self, ctx, line, &fields);
            }
            None => println!("{}", self.listing()),
        }
    }
}

/// Builds the registry with the full console command set.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();

    registry.register("l", Command { name: "load", help: "load path/to/file.js", run: load });
    registry.register("q", Command { name: "quit", help: "quits the console", run: quit });
    registry.register("s", Command { name: "set", help: "sets console options", run: set });

    registry.register("d", Command { name: "dump", help: "dumps the state of the console", run: dump });
    registry.register("$", Command { name: "debug", help: "toggles debug logging", run: debug });
    registry.register("v", Command { name: "source", help: "dumps source for a script", run: source });
    registry.register("r", Command { name: "reload", help: "reloads the base script", run: reload_base });

    registry.register("#", Command { name: "chanmsg", help: "send text as a channel msg", run: chanmsg });
    registry.register(">", Command { name: "privmsg", help: "send text as a private msg", run: privmsg });
    registry.register(".", Command { name: "rawmsg", help: "send text as a raw msg", run: rawmsg });

    registry.register(":", Command { name: "broadcast", help: "broadcasts via the message system", run: broadcast });
    registry.register("!", Command { name: "blacklist", help: "blacklists keys", run: blacklist });

    registry.register("?", Command { name: "help", help: "display help for commands", run: help });

    registry
}

fn usage(registry: &Registry, trigger: &str) {
    if let Some(command) = registry.get(trigger) {
        println!("{}", command.help);
    }
}

/// The fabricated sender, built from the `from` option.
fn sender(ctx: &Context) -> User {
    let from = ctx.options.get("from").unwrap_or("test");
    parse_user(&format!("{from}!user@localhost"))
}

fn load(registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        usage(registry, fields[0]);
        return;
    }
    reload::load_and_watch(&ctx.shared, Path::new(fields[1]));
}

fn quit(_registry: &Registry, _ctx: &mut Context, _line: &str, _fields: &[&str]) {
    std::process::exit(0);
}

fn set(_registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        println!("{}", ctx.options.render());
        return;
    }

    let name = fields[1];
    let value = fields[2..].join(" ");
    match ctx.options.set(name, &value) {
        Some(old) => info!("set '{name}' to '{value}' (was: '{old}')"),
        None => println!("{}", ctx.options.render()),
    }
}

fn chanmsg(registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        usage(registry, fields[0]);
        return;
    }

    let msg = Message {
        from: sender(ctx),
        target: ctx.options.get("chan").unwrap_or("#noye").to_string(),
        text: fields[1..].join(" "),
    };
    ctx.shared.manager.lock().unwrap().respond(msg);
}

fn privmsg(registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        usage(registry, fields[0]);
        return;
    }

    let msg = Message {
        from: sender(ctx),
        target: "noye".to_string(),
        text: fields[1..].join(" "),
    };
    ctx.shared.manager.lock().unwrap().respond(msg);
}

fn rawmsg(registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        usage(registry, fields[0]);
        return;
    }

    let msg = RawMessage {
        source: sender(ctx),
        command: fields[1].to_string(),
        args: fields[2..].iter().map(|arg| arg.to_string()).collect(),
    };
    ctx.shared.manager.lock().unwrap().listen(msg);
}

fn dump(_registry: &Registry, ctx: &mut Context, _line: &str, _fields: &[&str]) {
    println!("current options:");
    for opt in ctx.options.iter() {
        println!("  {}: '{}'", opt.name, opt.value);
    }

    println!("loaded scripts:");
    for script in ctx.shared.manager.lock().unwrap().scripts() {
        println!("  {} @ {}", script.name, script.path.display());
    }

    println!("watched files:");
    for path in ctx.shared.reloader.watched() {
        println!("  {}", path.display());
    }
}

fn source(registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        usage(registry, fields[0]);
        return;
    }

    // An unknown name intentionally prints nothing.
    for script in ctx.shared.manager.lock().unwrap().scripts() {
        if script.name != fields[1] {
            continue;
        }
        println!(
            "source for '{}' located at '{}'",
            script.name,
            script.path.display()
        );
        println!("{}", script.source.trim());
    }
}

fn help(registry: &Registry, _ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        println!("{}", registry.listing());
        return;
    }

    if let Some(command) = registry.get(fields[1]) {
        println!("[{}] {}: {}", fields[1], command.name, command.help);
    }
}

fn reload_base(_registry: &Registry, ctx: &mut Context, _line: &str, _fields: &[&str]) {
    ctx.shared.manager.lock().unwrap().reload_base();
}

fn debug(_registry: &Registry, ctx: &mut Context, _line: &str, _fields: &[&str]) {
    if ctx.shared.store.toggle_debug() {
        info!("enabled debugging");
    } else {
        info!("disabled debugging");
    }
}

fn broadcast(_registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 3 {
        println!("{} <key> <value>", fields[0]);
        return;
    }
    ctx.share.broadcast(fields[1], &fields[2..].join(" "));
}

fn blacklist(_registry: &Registry, ctx: &mut Context, _line: &str, fields: &[&str]) {
    if fields.len() < 2 {
        println!("{} <key1> <key2> ...", fields[0]);
        return;
    }
    ctx.share.add_private(&fields[1..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_every_default_command() {
        let registry = default_registry();
        let listing = registry.listing();
        assert!(listing.starts_with("list of commands: "));
        for name in [
            "load",
            "quit",
            "set",
            "dump",
            "debug",
            "source",
            "reload",
            "chanmsg",
            "privmsg",
            "rawmsg",
            "broadcast",
            "blacklist",
            "help",
        ] {
            assert!(listing.contains(name), "listing is missing '{name}'");
        }
    }

    #[test]
    fn register_overwrites_an_existing_trigger() {
        let mut registry = Registry::new();
        registry.register("x", Command { name: "first", help: "", run: help });
        registry.register("x", Command { name: "second", help: "", run: help });
        assert_eq!(registry.get("x").map(|command| command.name), Some("second"));
    }
}
