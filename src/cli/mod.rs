//! # CLI Module
//!
//! Operator commands for the console route table, shipped as the
//! `banyandb-ui-routes` binary.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print every route in declaration order:
//!
//! ```bash
//! banyandb-ui-routes routes --format yaml
//! ```
//!
//! ### `resolve`
//!
//! Resolve a location, following redirects:
//!
//! ```bash
//! banyandb-ui-routes resolve / --format json
//! ```
//!
//! ### `url-for`
//!
//! Build the URL of a named route:
//!
//! ```bash
//! banyandb-ui-routes url-for edit-measure \
//!     -p type=measure -p operator=edit -p group=sw_metric -p name=service_cpm
//! ```
//!
//! ### `lint`
//!
//! Check the table for shadowed patterns, broken redirects and miswired views:
//!
//! ```bash
//! banyandb-ui-routes lint --fail-on-error
//! ```
//!
//! Global options: `--config <FILE>` (router TOML), `--log-level`,
//! `--log-format json|pretty`. Logs go to stderr.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands, LogFormatArg, ResolveFormat, TableFormat};
