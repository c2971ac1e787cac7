#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use lingua_config::Config;
use lingua_llm::{CanonicalRequest, ProviderRef, TranslateError, Translator};
use serde_json::{Value, json};

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut logging = config.logging.clone().unwrap_or_default();
    if let Some(filter) = &args.log_filter {
        logging.filter = Some(filter.clone());
    }
    lingua_telemetry::init(Some(&logging), "warn")?;

    tracing::debug!(config_path = ?args.config, "configuration loaded");

    let translator = Translator::from_config(&config);

    match args.command {
        Command::Providers => providers(&translator),
        Command::Translate {
            provider,
            request,
            with_connection,
        } => translate(&translator, provider, &request, with_connection),
        Command::Response { provider, input } => response(&translator, provider, &input),
        Command::Stream { provider, input } => stream(&translator, provider, &input),
    }
}

/// Print every registered provider with its capabilities
fn providers(translator: &Translator) -> anyhow::Result<ExitCode> {
    let listing: Vec<Value> = translator
        .registry()
        .providers()
        .filter_map(|id| {
            let capabilities = translator.capabilities(id)?;
            let content_types = translator.supported_content_types(id)?;
            Some(json!({
                "name": id,
                "display_name": id.display_name(),
                "capabilities": capabilities,
                "content_types": content_types,
            }))
        })
        .collect();

    print_json(&listing)?;
    Ok(ExitCode::SUCCESS)
}

/// Validate and convert a canonical request
fn translate(
    translator: &Translator,
    provider: Option<String>,
    path: &Path,
    with_connection: bool,
) -> anyhow::Result<ExitCode> {
    let raw = read_input(path)?;
    let request: CanonicalRequest =
        serde_json::from_str(&raw).with_context(|| format!("invalid canonical request in {}", path.display()))?;

    let provider: ProviderRef = match provider {
        Some(name) => name.into(),
        None => translator
            .determine_provider(&request)
            .context("no provider given and none could be determined from the request or configuration")?
            .into(),
    };

    let payload = match translator.translate_outbound(&request, provider.clone()) {
        Ok(payload) => payload,
        Err(err) => return Ok(report(&err)),
    };

    if with_connection {
        let connection = translator.connection_settings(&request, provider);
        print_json(&json!({ "connection": connection, "payload": payload }))?;
    } else {
        print_json(&payload)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Convert one provider response
fn response(translator: &Translator, provider: String, path: &Path) -> anyhow::Result<ExitCode> {
    let raw = read_input(path)?;
    let native: Value =
        serde_json::from_str(&raw).with_context(|| format!("invalid response JSON in {}", path.display()))?;

    let response = translator.translate_inbound_response(&native, provider);
    print_json(&response)?;

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Convert a captured stream, one chunk per line
///
/// Accepts raw JSON lines or server-sent event framing. Blank lines, comments
/// and `event:` lines are skipped; conversion stops at the end-of-stream
/// marker.
fn stream(translator: &Translator, provider: String, path: &Path) -> anyhow::Result<ExitCode> {
    let provider = ProviderRef::from(provider);
    let reader = open_input(path)?;
    let mut out = io::stdout().lock();
    let mut failures = 0_usize;

    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let Some(chunk) = sse_data(&line) else {
            continue;
        };

        let delta = translator.translate_inbound_delta(&Value::String(chunk.to_owned()), provider.clone());
        writeln!(out, "{}", serde_json::to_string(&delta)?)?;

        if !delta.success {
            failures += 1;
        }
        if delta.done {
            break;
        }
    }

    if failures > 0 {
        tracing::warn!(failures, "stream contained chunks that failed to convert");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Payload of one stream line, `None` for lines carrying no chunk
fn sse_data(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') || line.starts_with("event:") {
        return None;
    }

    let data = line.strip_prefix("data:").map_or(line, str::trim_start);
    (!data.is_empty()).then_some(data)
}

/// Print every violation to stderr
fn report(err: &TranslateError) -> ExitCode {
    let mut stderr = io::stderr().lock();
    for message in err.messages() {
        let _ = writeln!(stderr, "error: {message}");
    }
    ExitCode::FAILURE
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    let mut raw = String::new();
    open_input(path)?
        .read_to_string(&mut raw)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(raw)
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}
