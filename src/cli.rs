//! Command-line entry points
//!
//! The binary only parses [`Args`], sets up logging and calls [`run`]; all of
//! the wiring lives here so it can be exercised from tests.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, LevelFilter};

use crate::config::{Loader, StructuraConfig, LOCAL_CONFIG_FILE};
use crate::dialect::Dialect;
use crate::engine::HttpEngine;
use crate::error::StructuraError;
use crate::report::format_report;
use crate::session::{AnalysisSession, ApplyOutcome, UpdateKind, Workbench};
use crate::viewer::{run_viewer, Model};

#[derive(Debug, Clone, Parser)]
#[command(name = "structura")]
#[command(version, about = "Edit flex and bison sources against a live syntax tree")]
pub struct Args {
    /// Flex or bison source to open
    pub file: Option<PathBuf>,

    /// Dialect of the source; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Configuration file layered over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis engine
    #[arg(long)]
    pub engine_url: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Analyze once, print the result and exit
    #[arg(long)]
    pub print: bool,
}

/// Build the effective configuration for `args`.
///
/// Layers, lowest first: embedded defaults, `./structura.toml`, `--config`,
/// environment, command-line flags.
pub fn load_config(args: &Args) -> Result<StructuraConfig, StructuraError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    loader = loader.with_env();
    if let Some(url) = &args.engine_url {
        loader = loader.set_override("engine.base_url", url.as_str())?;
    }
    if let Some(level) = &args.log_level {
        loader = loader.set_override("logging.level", level.as_str())?;
    }
    Ok(loader.build()?)
}

/// Install the global logger.
///
/// The viewer owns the terminal, so it logs to `logging.file`; print mode
/// logs to stderr. `RUST_LOG` module directives still apply.
pub fn init_logger(args: &Args, config: &StructuraConfig) -> Result<(), StructuraError> {
    let level = LevelFilter::from_str(&config.logging.level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            config.logging.level
        );
        LevelFilter::Warn
    });

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    builder.filter_level(level);
    if !args.print {
        let path = config.logging.file_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

/// Dialect from the flag, then the file extension, then the configuration.
pub fn resolve_dialect(args: &Args, config: &StructuraConfig) -> Dialect {
    args.dialect
        .or_else(|| args.file.as_deref().and_then(Dialect::from_path))
        .unwrap_or(config.session.dialect)
}

/// Run the viewer, or the one-shot report with `--print`.
///
/// In print mode the report is written even when the analysis fails; the
/// failure is then returned as [`StructuraError::Analysis`].
pub fn run(args: &Args, config: &StructuraConfig) -> Result<(), StructuraError> {
    let dialect = resolve_dialect(args, config);
    let source = match &args.file {
        Some(path) => read_source(path, dialect)?,
        None => dialect.example_source().to_string(),
    };
    info!(
        dialect:% = dialect,
        engine = config.engine.base_url.as_str(),
        print = args.print;
        "starting session"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let engine = Arc::new(HttpEngine::new(&config.engine)?);
    let session = AnalysisSession::with_source(dialect, source);
    let mut workbench = Workbench::with_session(
        engine.clone(),
        engine,
        session,
        runtime.handle().clone(),
    );

    if args.print {
        let applied = runtime.block_on(analyze_once(&mut workbench));
        let report = format_report(workbench.analysis(), workbench.assist_state());
        let mut stdout = io::stdout().lock();
        stdout.write_all(report.as_bytes())?;
        stdout.flush()?;
        if !applied {
            return Err(StructuraError::Analysis(format!(
                "no analysis received from {}",
                config.engine.base_url
            )));
        }
        return Ok(());
    }

    if config.session.analyze_on_start {
        workbench.reanalyze();
    }
    let model = Model::new(workbench, args.file.clone());
    run_viewer(model, Duration::from_millis(config.viewer.tick_rate_ms))?;
    Ok(())
}

/// Submit the current text and wait for its analysis.
///
/// Returns whether the response was applied.
pub async fn analyze_once(workbench: &mut Workbench) -> bool {
    workbench.reanalyze();
    while let Some(update) = workbench.next_completion().await {
        if update.kind == UpdateKind::Analysis && update.outcome != ApplyOutcome::Stale {
            return update.outcome == ApplyOutcome::Applied;
        }
    }
    false
}

/// A missing file opens with the dialect's example text; saving creates it.
fn read_source(path: &Path, dialect: Dialect) -> Result<String, StructuraError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path:% = path.display(); "file does not exist yet, starting from example");
            Ok(dialect.example_source().to_string())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("structura").chain(argv.iter().copied())).unwrap()
    }

    #[rstest]
    #[case(&[], Dialect::Flex)]
    #[case(&["grammar.y"], Dialect::Bison)]
    #[case(&["scanner.l"], Dialect::Flex)]
    #[case(&["notes.txt"], Dialect::Flex)]
    #[case(&["grammar.y", "--dialect", "flex"], Dialect::Flex)]
    #[case(&["--dialect", "bison"], Dialect::Bison)]
    fn test_resolve_dialect(#[case] argv: &[&str], #[case] expected: Dialect) {
        let config = crate::config::load_defaults().unwrap();
        assert_eq!(resolve_dialect(&args(argv), &config), expected);
    }

    #[test]
    fn test_resolve_dialect_falls_back_to_config() {
        let mut config = crate::config::load_defaults().unwrap();
        config.session.dialect = Dialect::Bison;
        assert_eq!(resolve_dialect(&args(&["notes.txt"]), &config), Dialect::Bison);
    }

    #[test]
    fn test_flags_override_configuration() {
        let config = load_config(&args(&[
            "--engine-url",
            "http://engine.test:9000",
            "--log-level",
            "debug",
        ]))
        .unwrap();
        assert_eq!(config.engine.base_url, "http://engine.test:9000");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_explicit_config_file_is_layered() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[viewer]\ntick_rate_ms = 40").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = load_config(&args(&["--config", &path])).unwrap();
        assert_eq!(config.viewer.tick_rate_ms, 40);
        assert_eq!(config.engine.timeout_ms, 15000);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = load_config(&args(&["--config", "/nonexistent/structura.toml"]));
        assert!(matches!(result, Err(StructuraError::Config(_))));
    }

    #[test]
    fn test_missing_file_opens_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.y");
        let text = read_source(&path, Dialect::Bison).unwrap();
        assert_eq!(text, Dialect::Bison.example_source());
    }

    #[test]
    fn test_existing_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "%%").unwrap();
        assert_eq!(read_source(file.path(), Dialect::Flex).unwrap(), "%%\n");
    }

    #[test]
    fn test_rejects_unknown_dialect() {
        let parsed = Args::try_parse_from(["structura", "--dialect", "yacc"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_print_mode_fails_without_an_engine() {
        // Bind and drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut config = crate::config::load_defaults().unwrap();
        config.engine.base_url = format!("http://127.0.0.1:{port}");
        config.engine.timeout_ms = 2_000;

        let result = run(&args(&["--print"]), &config);
        match result {
            Err(StructuraError::Analysis(reason)) => assert!(reason.contains(&config.engine.base_url)),
            other => panic!("expected an analysis failure, got {other:?}"),
        }
    }
}
