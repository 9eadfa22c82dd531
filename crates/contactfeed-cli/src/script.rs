//! Batch mode: one command per line, run in order with one session.

use std::path::Path;

use clap::Parser;
use contactfeed_core::render::render_outcome;
use contactfeed_core::{Config, CoreError, Dispatcher, FeedService};

use crate::args::{RequestArgs, ScriptLine};

/// Split a line on whitespace; double quotes group words.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".into());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

async fn run_line<S: FeedService + ?Sized>(
    dispatcher: &Dispatcher<'_, S>,
    config: &Config,
    global: &RequestArgs,
    line: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let tokens = tokenize(line)?;
    let args = ScriptLine::try_parse_from(tokens)?.request.overlay(global);
    let request = args.to_request(config)?;
    let outcome = dispatcher.dispatch(&request).await?;
    Ok(render_outcome(&outcome))
}

/// Run every command in `path`. A failing line is reported and the rest
/// still run, unless the failure leaves the session unusable.
pub async fn run<S: FeedService + ?Sized>(
    dispatcher: &Dispatcher<'_, S>,
    config: &Config,
    global: &RequestArgs,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script {}: {e}", path.display()))?;

    let mut failed = 0usize;
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = index + 1;
        tracing::debug!(lineno, %line, "script line");

        match run_line(dispatcher, config, global, line).await {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("error: line {lineno}: {e}");
                failed += 1;
                if e.downcast_ref::<CoreError>().is_some_and(CoreError::is_fatal) {
                    return Err(e);
                }
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} script line(s) failed").into());
    }
    Ok(())
}
