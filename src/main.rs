use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use reconlog_logs::{Level, RecordFilter};
use reconlog_render::{Renderer, Theme};

mod pipeline;

use pipeline::LogPipeline;

/// Reconlog - Reformat controller-runtime logs into one colorized line per entry
#[derive(Parser, Debug)]
#[command(name = "reconlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Only show records whose `name` field matches exactly
    #[arg(long, default_value = "")]
    name: String,

    /// Only show records whose `namespace` field matches exactly
    #[arg(long, default_value = "")]
    namespace: String,

    /// Only show records whose `controller` field matches exactly
    #[arg(long, default_value = "")]
    controller: String,

    /// Only show records at this level: info, warning, warn, error, debug
    #[arg(long, default_value = "")]
    level: String,

    /// When to emit ANSI colors (NO_COLOR in the environment disables them)
    #[arg(long, value_enum, default_value_t = ColorMode::Always)]
    color: ColorMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Always,
    Auto,
    Never,
}

impl Args {
    /// Build the record filter from the filter flags
    fn filter(&self) -> RecordFilter {
        let mut filter = RecordFilter::new()
            .with_name(&self.name)
            .with_namespace(&self.namespace)
            .with_controller(&self.controller);

        if !self.level.is_empty() {
            match Level::from_word(&self.level) {
                Some(level) => filter = filter.with_level(level),
                None => tracing::warn!(
                    level = %self.level,
                    "unrecognized level filter, showing all levels"
                ),
            }
        }

        filter
    }

    fn theme(&self) -> Theme {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let enabled = match self.color {
            ColorMode::Never => false,
            ColorMode::Always => !no_color,
            ColorMode::Auto => !no_color && io::stdout().is_terminal(),
        };

        if enabled { Theme::ansi() } else { Theme::plain() }
    }
}

fn main() {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout carries only formatted lines
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        if is_broken_pipe(&e) {
            return;
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let filter = args.filter();
    let renderer = Renderer::new(args.theme());
    tracing::debug!(?filter, color = renderer.theme().is_enabled(), "starting");

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    let stats = LogPipeline::new(&filter, renderer).run(stdin, &mut stdout)?;
    tracing::debug!(
        lines = stats.lines,
        rendered = stats.rendered,
        filtered = stats.filtered,
        passed_through = stats.passed_through,
        "input exhausted"
    );

    Ok(())
}

/// Downstream closed stdout (e.g. `| head`)
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconlog_logs::Record;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["reconlog"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults_keep_everything() {
        let args = args(&[]);
        assert!(args.filter().is_empty());
        assert_eq!(args.color, ColorMode::Always);
    }

    #[test]
    fn test_filter_flags() {
        let filter = args(&["--namespace=ns1", "--level=WARNING"]).filter();
        let mut record = Record::new(Level::Warning, "m");
        record.fields.insert("namespace".into(), "ns1".into());
        assert!(filter.keep(&record));

        record.level = Level::Info;
        assert!(!filter.keep(&record));
    }

    #[test]
    fn test_unrecognized_level_is_no_constraint() {
        let filter = args(&["--level=verbose"]).filter();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_never_color() {
        assert!(!args(&["--color", "never"]).theme().is_enabled());
    }

    #[test]
    fn test_broken_pipe_detection() {
        let err = anyhow::Error::new(io::Error::from(io::ErrorKind::BrokenPipe))
            .context("failed to write output");
        assert!(is_broken_pipe(&err));

        let err = anyhow::anyhow!("something else");
        assert!(!is_broken_pipe(&err));
    }
}
