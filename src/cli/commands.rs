use crate::console::console_table;
use crate::linter::{fail_if_errors, lint_table, write_lint_issues, LintIssue, LintSeverity};
use crate::otel::{init_logging_with_config, LogConfig, LogFormat};
use crate::route::{RouteMeta, ViewRef};
use crate::router::{Resolution, Router};
use crate::runtime_config::RouterConfig;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// Command-line interface for the BanyanDB console routes
///
/// Dumps, resolves and lints the console route table without a browser.
#[derive(Parser, Debug)]
#[command(name = "banyandb-ui-routes")]
#[command(about = "Inspect the BanyanDB console route table", long_about = None)]
pub struct Cli {
    /// Router configuration file (TOML)
    #[arg(long, global = true, env = "BANYANDB_UI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: trace/debug/info/warn/error (overrides BANYANDB_UI_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (overrides BANYANDB_UI_LOG_FORMAT)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

/// Output format of `routes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Text,
    Json,
    Yaml,
}

/// Output format of `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolveFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the console route table
    Routes {
        #[arg(long, value_enum, default_value_t = TableFormat::Text)]
        format: TableFormat,
    },
    /// Resolve a location the way the console would
    ///
    /// Follows redirects, binds params and reports the matched chain.
    Resolve {
        /// Path or URL, e.g. `/banyandb/stream/operator-read/stream/read/sw/segment`
        location: String,

        #[arg(long, value_enum, default_value_t = ResolveFormat::Text)]
        format: ResolveFormat,
    },
    /// Build the URL of a named route
    UrlFor {
        /// Route name, e.g. `edit-measure`
        name: String,

        /// Path parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Lint the console route table
    ///
    /// Reports shadowed patterns, redirect problems, missing views,
    /// cross-domain view wiring and verb grammar issues.
    Lint {
        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct RouteSummary<'a> {
    id: usize,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<usize>,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<&'a ViewRef>,
    meta: &'a RouteMeta,
}

#[derive(Serialize)]
struct ResolutionReport {
    name: Option<String>,
    path: String,
    full_path: String,
    params: BTreeMap<String, String>,
    query: Vec<(String, String)>,
    hash: Option<String>,
    matched: Vec<String>,
    view: Option<String>,
    redirected_from: Option<String>,
    redirects: Vec<String>,
    fallback: bool,
}

impl ResolutionReport {
    fn new(router: &Router, resolution: &Resolution) -> Self {
        let table = router.table();
        Self {
            name: resolution.name().map(str::to_string),
            path: resolution.location.path.clone(),
            full_path: router.with_base(&resolution.full_path()),
            params: resolution.params_map(),
            query: resolution.location.query.clone(),
            hash: resolution.location.hash.clone(),
            matched: resolution
                .matched
                .iter()
                .map(|id| table.node(*id).label().to_string())
                .collect(),
            view: table
                .node(resolution.route)
                .view
                .as_ref()
                .map(|v| v.module.to_string()),
            redirected_from: resolution
                .redirected_from
                .as_ref()
                .map(|l| l.full_path()),
            redirects: resolution.redirects.clone(),
            fallback: resolution.fallback,
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "route:     {}", self.name.as_deref().unwrap_or("<anonymous>"))?;
        writeln!(out, "path:      {}", self.full_path)?;
        if let Some(from) = &self.redirected_from {
            writeln!(out, "from:      {from} -> {}", self.redirects.join(" -> "))?;
        }
        writeln!(out, "matched:   {}", self.matched.join(" > "))?;
        if let Some(view) = &self.view {
            writeln!(out, "view:      {view}")?;
        }
        for (key, value) in &self.params {
            writeln!(out, "param:     {key}={value}")?;
        }
        for (key, value) in &self.query {
            writeln!(out, "query:     {key}={value}")?;
        }
        if self.fallback {
            writeln!(out, "fallback:  true")?;
        }
        Ok(())
    }
}

/// Configure logging from the environment and flags, then run the command.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let mut log_config = LogConfig::from_env();
    if let Some(level) = &cli.log_level {
        log_config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        log_config.format = match format {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        };
    }
    init_logging_with_config(&log_config)?;

    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run a parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read or is invalid
/// - A location cannot be resolved or a URL cannot be built
/// - `lint --fail-on-error` finds errors
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    let config = RouterConfig::load(cli.config.as_deref()).context("Failed to load router config")?;
    let router = Router::new(console_table(), config);

    match &cli.command {
        Commands::Routes { format } => {
            let table = router.table();
            let summaries: Vec<RouteSummary<'_>> = table
                .iter()
                .map(|node| RouteSummary {
                    id: node.id.index(),
                    path: node.pattern.as_str(),
                    name: node.name.as_deref(),
                    parent: node.parent.map(|p| p.index()),
                    depth: node.depth,
                    redirect: node.redirect.as_deref(),
                    view: node.view.as_ref(),
                    meta: &node.meta,
                })
                .collect();
            match format {
                TableFormat::Text => router.dump_routes(out)?,
                TableFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &summaries)?;
                    writeln!(out)?;
                }
                TableFormat::Yaml => serde_yaml::to_writer(&mut *out, &summaries)?,
            }
        }
        Commands::Resolve { location, format } => {
            let resolution = router
                .resolve(location.as_str())
                .with_context(|| format!("Failed to resolve `{location}`"))?;
            let report = ResolutionReport::new(&router, &resolution);
            match format {
                ResolveFormat::Text => report.write_text(out)?,
                ResolveFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &report)?;
                    writeln!(out)?;
                }
            }
        }
        Commands::UrlFor { name, params } => {
            let url = router
                .url_for(name, params)
                .with_context(|| format!("Failed to build a URL for `{name}`"))?;
            writeln!(out, "{url}")?;
        }
        Commands::Lint {
            fail_on_error,
            errors_only,
        } => {
            let mut issues: Vec<LintIssue> = lint_table(router.table());
            if *errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            write_lint_issues(out, &issues)?;
            if *fail_on_error {
                fail_if_errors(&issues)?;
            }
        }
    }

    Ok(())
}
