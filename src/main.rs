// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Jobgraph CLI - dependency graphs of CI jobs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use jobgraph::commands;
use jobgraph::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "JOBGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, env = "JOBGRAPH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dependency graph around some jobs
    Graph {
        /// Seed jobs (all jobs if none given)
        jobs: Vec<String>,

        /// Output format (png, svg, map, json, gv)
        #[arg(short, long, default_value = "gv")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the edge color legend
    Legend {
        /// Output format (png, svg, map, gv)
        #[arg(short, long, default_value = "gv")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how deep each job sits below its upstream jobs
    Levels {
        /// Seed jobs (all jobs if none given)
        jobs: Vec<String>,

        /// Skip edges that close a cycle instead of failing
        #[arg(long)]
        ignore_cycles: bool,
    },

    /// Manage build triggers
    Edge {
        /// Action: add, remove, list
        action: String,

        /// Upstream job
        #[arg(long)]
        from: Option<String>,

        /// Downstream job
        #[arg(long)]
        to: Option<String>,
    },

    /// Answer a single request, e.g. `GET /graph.svg`
    Request {
        /// Method: GET, PUT, DELETE
        method: String,

        /// Request path
        path: String,

        /// Seed job for graph requests (repeatable)
        #[arg(long = "job")]
        jobs: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Action: show, get, path
        #[arg(default_value = "show")]
        action: String,

        /// Configuration key
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging
    let directive = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color && !cli.json;

    // Execute command
    match cli.command {
        Commands::Graph { jobs, format, output } => {
            commands::graph::run(&config, &jobs, &format, output)
        }
        Commands::Legend { format, output } => {
            commands::legend::run(&config, &format, output)
        }
        Commands::Levels { jobs, ignore_cycles } => {
            commands::levels::run(&config, &jobs, ignore_cycles, cli.json)
        }
        Commands::Edge { action, from, to } => {
            commands::edge::run(&config, &action, from, to, color)
        }
        Commands::Request { method, path, jobs, output } => {
            commands::request::run(&config, &method, &path, &jobs, output)
        }
        Commands::Config { action, key } => {
            commands::config::run(&config, &action, key)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
