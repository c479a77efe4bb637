//! hearth-gateway-inspect - check recorded gateway traffic offline.
//!
//! Reads newline-delimited frames from a file or stdin and reports how the
//! client would treat each one.

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use hearth_gateway::{all_gateway_event_types, duplicate_gateway_event_types};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod report;

use config::InspectConfig;
use report::{inspect_frame, FrameReport};

/// Inspect hearth gateway frames.
#[derive(Debug, Parser)]
#[command(name = "hearth-gateway-inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File of newline-delimited frames (defaults to stdin).
    input: Option<PathBuf>,

    /// Print each decoded event as JSON after its status line.
    #[arg(long)]
    json: bool,

    /// List every registered event type and exit.
    #[arg(long)]
    registry: bool,

    /// Exit non-zero if any frame is not `ok`.
    #[arg(long)]
    strict: bool,

    /// Log level filter, used when RUST_LOG is unset [default: HEARTH_LOG_LEVEL or warn].
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON [default: HEARTH_LOG_JSON].
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(config: &InspectConfig) {
    // Prefer RUST_LOG, fall back to the configured level. Logs go to stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn print_registry(out: &mut impl Write) -> Result<()> {
    for (domain, event_type) in all_gateway_event_types() {
        writeln!(out, "{domain}\t{event_type}")?;
    }

    let duplicates = duplicate_gateway_event_types();
    if !duplicates.is_empty() {
        bail!("duplicate event types: {}", duplicates.join(", "));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Summary {
    frames: usize,
    ok: usize,
}

fn inspect_stream(input: impl BufRead, out: &mut impl Write, json: bool) -> Result<Summary> {
    let mut summary = Summary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let report = inspect_frame(&line);
        debug!(line = index + 1, status = %report, "Inspected frame");
        summary.frames += 1;
        writeln!(out, "{report}")?;

        if report.is_ok() {
            summary.ok += 1;
        }
        if let (FrameReport::Ok(event), true) = (&report, json) {
            let rendered =
                serde_json::to_string(event).context("failed to serialize decoded event")?;
            writeln!(out, "{rendered}")?;
        }
    }

    Ok(summary)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = InspectConfig::from_env()?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    config.log_json |= cli.log_json;
    init_tracing(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.registry {
        return print_registry(&mut out);
    }

    let summary = match &cli.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            inspect_stream(BufReader::new(file), &mut out, cli.json)?
        }
        None => inspect_stream(io::stdin().lock(), &mut out, cli.json)?,
    };

    info!(frames = summary.frames, ok = summary.ok, "Inspection complete");

    if cli.strict && summary.ok != summary.frames {
        bail!(
            "{} of {} frames were not ok",
            summary.frames - summary.ok,
            summary.frames
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_stream_counts_and_skips_blank_lines() {
        let input = concat!(
            r#"{"v":1,"t":"ready","d":{"user_id":"01HV4Z5PZQRVST1KVWB9YEMF6G"}}"#,
            "\n\n",
            r#"{"v":1,"t":"typing_start","d":{}}"#,
            "\n",
            "garbage\n",
        );
        let mut out = Vec::new();
        let summary = inspect_stream(input.as_bytes(), &mut out, false).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.ok, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ok session ready\nunknown typing_start\nrejected\n"
        );
    }

    #[test]
    fn test_inspect_stream_json_output() {
        let input = r#"{"v":1,"t":"ready","d":{"user_id":"01HV4Z5PZQRVST1KVWB9YEMF6G"}}"#;
        let mut out = Vec::new();
        inspect_stream(input.as_bytes(), &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ok session ready"));
        let event: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(event["type"], "ready");
        assert_eq!(event["payload"]["userId"], "01HV4Z5PZQRVST1KVWB9YEMF6G");
    }

    #[test]
    fn test_registry_listing() {
        let mut out = Vec::new();
        print_registry(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l == "session\tready"));
        assert!(text.lines().any(|l| l == "workspace_role\tworkspace_role_reorder"));
    }
}
