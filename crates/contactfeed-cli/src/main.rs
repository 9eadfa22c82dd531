use clap::{CommandFactory, Parser};
use contactfeed_core::render::render_outcome;
use contactfeed_core::{authenticate, telemetry, Config, Dispatcher, GDataClient, ServiceAccountKey};

mod args;
mod script;

use args::Cli;

fn print_usage() {
    let mut cmd = Cli::command();
    let _ = cmd.print_help();
    println!();
    println!("Entry field syntax:");
    print!("{}", contactfeed_core::element::usage());
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.account.apply(&mut config);
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Checked before any network traffic.
    let kind = cli.request.feed_kind()?;
    let config = load_config(&cli)?;

    let key = ServiceAccountKey::from_file(config.key_file()?)?;
    let session = authenticate(&key, &config.auth_config()).await?;
    let client = GDataClient::new(session);
    let dispatcher = Dispatcher::new(&client).with_attachments(config.attachment_fetcher());

    if let Some(path) = &cli.script {
        return script::run(&dispatcher, &config, &cli.request, path).await;
    }

    tracing::debug!(kind = kind.as_str(), "single action");
    let request = cli.request.to_request(&config)?;
    let outcome = dispatcher.dispatch(&request).await?;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    if cli.request.action.is_none() && cli.script.is_none() {
        print_usage();
        return;
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
