#![allow(clippy::print_stderr)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use feeddiff::{
    compare_at, describe, ComparisonConfig, JsonType, Location, LocationSegment,
};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "feeddiff",
    version,
    about = "Inspect and diff feed API JSON payloads"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report structural and value differences between two payloads.
    Diff {
        left: PathBuf,
        right: PathBuf,
        /// Descend into this path on both sides before comparing, e.g. `feeds[0]`.
        #[arg(long)]
        at: Option<String>,
        /// Skip this key entirely, at any depth. Repeatable.
        #[arg(long = "ignore-key", value_name = "KEY")]
        ignore_keys: Vec<String>,
        /// Require matching types for this key but ignore value differences. Repeatable.
        #[arg(long = "exempt-key", value_name = "KEY")]
        exempt_keys: Vec<String>,
        /// Start from an empty config instead of the feed API defaults.
        #[arg(long)]
        no_default_filters: bool,
        /// Emit diff records as a JSON array.
        #[arg(long)]
        json: bool,
        /// Write the left payload, pretty-printed, for manual inspection.
        #[arg(long, value_name = "FILE")]
        sample_out: Option<PathBuf>,
    },
    /// Summarize the structure of a payload.
    Describe {
        file: PathBuf,
        /// Recover the first complete object when the payload is truncated.
        #[arg(long)]
        salvage: bool,
        /// Emit field summaries as a JSON array.
        #[arg(long)]
        json: bool,
        /// Write a single-feed sample of the payload, pretty-printed.
        #[arg(long, value_name = "FILE")]
        sample_out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse().command) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode, String> {
    match command {
        Command::Diff {
            left,
            right,
            at,
            ignore_keys,
            exempt_keys,
            no_default_filters,
            json,
            sample_out,
        } => {
            let left_payload = load_json(&left)?;
            let right_payload = load_json(&right)?;

            let mut config = if no_default_filters {
                ComparisonConfig::empty()
            } else {
                ComparisonConfig::default()
            };
            for key in ignore_keys {
                config = config.ignore_key(key);
            }
            for key in exempt_keys {
                config = config.exempt_key(key);
            }

            if let Some(path) = &sample_out {
                write_pretty(path, &left_payload)?;
            }

            let (left_at, right_at, root) = match &at {
                Some(raw) => {
                    let segments = Location::parse(raw)
                        .map_err(|error| format!("--at {raw}: {error}"))?;
                    let left_at = resolve(&left_payload, &segments)
                        .ok_or_else(|| format!("{}: no value at {raw}", left.display()))?;
                    let right_at = resolve(&right_payload, &segments)
                        .ok_or_else(|| format!("{}: no value at {raw}", right.display()))?;
                    let root = segments
                        .iter()
                        .fold(Location::new(), |path, segment| path.join(*segment));
                    (left_at, right_at, root)
                }
                None => (&left_payload, &right_payload, Location::new()),
            };

            let diffs = compare_at(left_at, right_at, root, &config);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &diffs)
                    .map_err(|error| error.to_string())?;
                writeln!(out).map_err(|error| error.to_string())?;
            } else {
                render_diff_report(&mut out, &left_payload, &right_payload, &diffs)
                    .map_err(|error| error.to_string())?;
            }

            Ok(if diffs.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Describe {
            file,
            salvage,
            json,
            sample_out,
        } => {
            let bytes =
                fs::read(&file).map_err(|error| format!("{}: {error}", file.display()))?;
            let payload: Value = match serde_json::from_slice(&bytes) {
                Ok(payload) => payload,
                Err(error) if salvage => {
                    let salvaged = feeddiff::salvage::first_object(&bytes).ok_or_else(|| {
                        format!(
                            "{}: {}, and no object could be salvaged",
                            file.display(),
                            decode_message(&error)
                        )
                    })?;
                    eprintln!(
                        "warning: {}: {}; salvaged first complete object",
                        file.display(),
                        decode_message(&error)
                    );
                    salvaged
                }
                Err(error) => {
                    return Err(format!("{}: {}", file.display(), decode_message(&error)))
                }
            };

            if let Some(path) = &sample_out {
                write_pretty(path, &feed_sample(&payload))?;
            }

            // Multi-feed captures are described through their first feed,
            // the same view the diff report samples.
            let (target, feed_count) = match first_feed(&payload) {
                Some((feed, count)) => (feed, Some(count)),
                None => (&payload, None),
            };
            let summaries = describe(target);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &summaries)
                    .map_err(|error| error.to_string())?;
                writeln!(out).map_err(|error| error.to_string())?;
            } else {
                render_describe_report(&mut out, target, feed_count, &summaries)
                    .map_err(|error| error.to_string())?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_json(path: &Path) -> Result<Value, String> {
    let bytes = fs::read(path).map_err(|error| format!("{}: {error}", path.display()))?;
    serde_json::from_slice(&bytes)
        .map_err(|error| format!("{}: {}", path.display(), decode_message(&error)))
}

fn decode_message(error: &serde_json::Error) -> String {
    format!(
        "invalid JSON at line {} column {}",
        error.line(),
        error.column()
    )
}

fn resolve<'v>(value: &'v Value, segments: &[LocationSegment<'_>]) -> Option<&'v Value> {
    let mut node = value;
    for segment in segments {
        node = match segment {
            LocationSegment::Key(key) => node.get(*key)?,
            LocationSegment::Index(index) => node.get(*index)?,
        };
    }
    Some(node)
}

fn write_pretty(path: &Path, value: &Value) -> Result<(), String> {
    let mut rendered = serde_json::to_string_pretty(value)
        .map_err(|error| format!("{}: {error}", path.display()))?;
    rendered.push('\n');
    fs::write(path, rendered).map_err(|error| format!("{}: {error}", path.display()))
}

/// The first element of a top-level `feeds` array, with the feed count.
fn first_feed(payload: &Value) -> Option<(&Value, usize)> {
    let feeds = payload.get("feeds")?.as_array()?;
    let first = feeds.first()?;
    first.is_object().then_some((first, feeds.len()))
}

/// A `{"feeds": [<first feed>]}` sample, or the payload itself when it has
/// no feeds to sample.
fn feed_sample(payload: &Value) -> Value {
    match first_feed(payload) {
        Some((feed, _)) => serde_json::json!({ "feeds": [feed] }),
        None => payload.clone(),
    }
}

fn render_keys(payload: &Value) -> String {
    match payload.as_object() {
        Some(map) => {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            format!("{keys:?}")
        }
        None => JsonType::of(payload).to_string(),
    }
}

fn render_diff_report(
    out: &mut impl Write,
    left: &Value,
    right: &Value,
    diffs: &[feeddiff::Diff],
) -> io::Result<()> {
    writeln!(out, "left: {}", render_keys(left))?;
    writeln!(out, "right: {}", render_keys(right))?;
    if let (Some(left_feeds), Some(right_feeds)) = (
        left.get("feeds").and_then(Value::as_array),
        right.get("feeds").and_then(Value::as_array),
    ) {
        writeln!(out, "feeds: {} vs {}", left_feeds.len(), right_feeds.len())?;
    }
    if diffs.is_empty() {
        writeln!(out, "no differences found")?;
    } else {
        for diff in diffs {
            writeln!(out, "{diff}")?;
        }
    }
    Ok(())
}

fn render_describe_report(
    out: &mut impl Write,
    target: &Value,
    feed_count: Option<usize>,
    summaries: &[feeddiff::FieldSummary],
) -> io::Result<()> {
    if let Some(count) = feed_count {
        writeln!(out, "feeds: {count}")?;
    }
    if summaries.is_empty() {
        writeln!(out, "nothing to describe ({} payload)", JsonType::of(target))?;
    } else {
        for summary in summaries {
            writeln!(out, "{summary}")?;
        }
    }
    Ok(())
}
