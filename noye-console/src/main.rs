use std::sync::Arc;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::info;

use noye_console::{
    bot::MockBot,
    commands,
    config::Config,
    context::{Context, Shared},
    options::Options,
    output,
    reload::{self, Reloader},
    repl,
    sandbox::Sandbox,
    share::Share,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let (output, lines) = output::channel();
    tokio::spawn(output::printer(lines, repl::PROMPT));

    // Without the watcher the console cannot auto-reload scripts at all, so
    // failing to build it aborts startup.
    let (reloader, events) = Reloader::new()?;

    let sandbox = Sandbox::new(Box::new(MockBot::new(output.clone())));
    let shared = Arc::new(Shared::new(Box::new(sandbox), reloader));
    tokio::spawn(reload::run(Arc::clone(&shared), events));

    for (key, value) in Config::load().to_map() {
        shared.store.set("config", &key, &value);
    }

    // Install the interrupt handler up front: a ctrl-c while the REPL is
    // still reading is absorbed here, and only releases the final wait once
    // stdin has closed.
    let (interrupted_tx, interrupted) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupted_tx.send(());
        }
    });

    let registry = commands::default_registry();
    let mut ctx = Context {
        shared,
        options: Options::defaults(),
        share: Share::new(output),
    };

    repl::run(&registry, &mut ctx).await;

    info!("input closed, waiting for interrupt");
    let _ = interrupted.await;
    Ok(())
}
