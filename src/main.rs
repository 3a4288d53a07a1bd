use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crash_analytics::{load_dir, menu, Config, Query};
use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Car crash analytics over CSV exports")]
struct Args {
    /// Folder holding the `*.csv` datasets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Run one query by its menu number
    Run {
        #[arg(value_parser = parse_query)]
        query: Query,
    },
    /// Run every query in order
    All,
    /// List the loaded datasets
    Datasets,
}

fn parse_query(s: &str) -> std::result::Result<Query, String> {
    s.parse::<u8>()
        .ok()
        .and_then(Query::from_number)
        .ok_or_else(|| format!("expected a query number 1-{}", Query::ALL.len()))
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) resolve config ───────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    // ─── 3) load datasets ────────────────────────────────────────────
    let start = Instant::now();
    let data = load_dir(&config.data_dir, config.inference_rows())
        .with_context(|| format!("loading datasets from {}", config.data_dir.display()))?;
    info!(datasets = data.len(), elapsed = ?start.elapsed(), "datasets loaded");

    // ─── 4) dispatch ─────────────────────────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            menu::run_menu(&data, &mut stdin.lock(), &mut out)?;
        }
        Command::Run { query } => {
            let report = query
                .run(&data)
                .with_context(|| format!("query {} failed", query.number()))?;
            writeln!(out, "{report}")?;
        }
        Command::All => {
            let mut failed = 0;
            for query in Query::ALL {
                writeln!(out, "── {query}")?;
                match query.run(&data) {
                    Ok(report) => writeln!(out, "{report}\n")?,
                    Err(e) => {
                        error!(query = query.number(), error = %e, "query failed");
                        writeln!(out, "failed: {e}\n")?;
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} queries failed", Query::ALL.len());
            }
        }
        Command::Datasets => {
            for (name, rows, cols) in data.shapes() {
                writeln!(out, "{name}: {rows} rows x {cols} columns")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_only_menu_numbers() {
        let args = Args::try_parse_from(["crash-analytics", "run", "10"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Run { query }) if query.number() == 10
        ));
        for bad in ["0", "11", "two"] {
            assert!(Args::try_parse_from(["crash-analytics", "run", bad]).is_err());
        }
    }
}
