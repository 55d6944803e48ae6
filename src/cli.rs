//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};

/// Validated, paginated CBQL access to a Codebeamer tracker.
///
/// Connection settings come from the environment (`CODEBEAMER_URL`,
/// `CODEBEAMER_TOKEN`, `CBQL_GATEWAY_*`); flags override them.
#[derive(Parser, Debug)]
#[command(name = "cbql-gateway")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base URL of the REST API (overrides CODEBEAMER_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    /// Authorization header value, e.g. "Bearer ..." (overrides CODEBEAMER_TOKEN).
    /// Surrounding whitespace is trimmed; the rest is sent unchanged
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a CBQL query offline and print its normalized form
    Validate {
        /// CBQL query string
        cbql: String,
    },

    /// Print CBQL syntax and agent workflow guidance
    Guidance,

    /// Run a CBQL query across all pages and print the aggregated JSON
    Query {
        /// CBQL query string
        cbql: String,

        /// Items per page (default: CBQL_GATEWAY_PAGE_SIZE or 500)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,

        /// Maximum pages to fetch before giving up
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: Option<u32>,

        /// Disable the progress spinner
        #[arg(long)]
        no_progress: bool,
    },

    /// List accessible projects
    Projects,

    /// List trackers of a project
    Trackers {
        /// Project id
        project_id: u64,
    },

    /// Print full details of one item
    Item {
        /// Item id
        item_id: u64,
    },
}
