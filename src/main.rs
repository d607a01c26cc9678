mod config;
mod filter;
mod models;
mod pipeline;
mod ranker;
mod scraper;
mod session;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::models::{ScanError, ScanReport, SortMode};
use crate::pipeline::Scanner;
use crate::ranker::RankOptions;
use crate::session::Favorites;
use crate::utils::fmt_price;

#[derive(Parser)]
#[command(name = "flipscan", about = "Marketplace flip-score scanner", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run one search: average sold price, clean flips, sketchy extras
    Scan {
        /// Search term, e.g. "AirPods 2nd Generation"
        term: String,

        /// Sort order within each partition
        #[arg(long, value_enum, default_value = "flip-score")]
        sort: SortMode,

        /// Only consider listings at or above this price
        #[arg(long)]
        min_price: Option<f64>,

        /// Only consider listings at or below this price
        #[arg(long)]
        max_price: Option<f64>,

        /// Emit the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: repeated searches with a favorites list
    Shell,

    /// Show the active noise-filter keyword sets
    Keywords,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "flipscan=info,warn",
        1 => "flipscan=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Scan { term, sort, min_price, max_price, json } => {
            let _t = utils::Timer::start("Scan");
            let opts = RankOptions {
                sort,
                min_price,
                max_price,
                discount_threshold: config.ranker.discount_threshold,
            };
            let scanner = Scanner::new(config)?;

            match scanner.scan(&term, &opts).await {
                Ok(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        render_report(&report, false);
                    }
                }
                Err(ScanError::NoHistoricalData { term }) => {
                    println!("No sold data found for \"{}\" — nothing to rank.", term);
                }
            }
        }

        Command::Shell => {
            let opts = RankOptions {
                discount_threshold: config.ranker.discount_threshold,
                ..Default::default()
            };
            let scanner = Scanner::new(config)?;
            run_shell(&scanner, &opts).await?;
        }

        Command::Keywords => {
            let scanner = Scanner::new(config)?;
            println!("Deny-list ({} keywords):", scanner.filter().deny_keywords().len());
            for k in scanner.filter().deny_keywords() {
                println!("  {}", k);
            }
            println!();
            println!(
                "Sketchy exclusions ({} keywords):",
                scanner.filter().sketchy_keywords().len()
            );
            for k in scanner.filter().sketchy_keywords() {
                println!("  {}", k);
            }
        }
    }

    Ok(())
}

// ── Report rendering ──────────────────────────────────────────────────────────

fn render_report(report: &ScanReport, numbered: bool) {
    println!("─────────────────────────────────────────────");
    println!("  \"{}\"", report.term);
    println!(
        "  Average sold price: {} ({} listings)",
        fmt_price(report.average_price),
        report.sold_count
    );
    println!("─────────────────────────────────────────────");

    if !report.sold_sample.is_empty() {
        println!("Recently sold:");
        for l in &report.sold_sample {
            println!("  {} — {}", truncate(&l.title, 60), fmt_price(l.price));
        }
        println!();
    }

    let mut idx = 0usize;

    println!("Possible flips ({}):", report.clean.len());
    for l in &report.clean {
        idx += 1;
        print_listing(l, numbered.then_some(idx));
    }

    if !report.sketchy.is_empty() {
        println!();
        println!("Sketchy — might still be useful ({}):", report.sketchy.len());
        for l in &report.sketchy {
            idx += 1;
            print_listing(l, numbered.then_some(idx));
        }
    }

    if report.excluded_count > 0 {
        println!();
        println!("({} listings excluded by filters)", report.excluded_count);
    }
}

fn print_listing(l: &crate::models::Listing, number: Option<usize>) {
    let prefix = match number {
        Some(n) => format!("{:>3}. ", n),
        None => "  ".to_string(),
    };
    let score = l.flip_score.map(|s| format!("  [score {}]", s)).unwrap_or_default();
    println!("{}{} — {}{}", prefix, truncate(&l.title, 60), fmt_price(l.price), score);
    if let Some(url) = &l.url {
        println!("{}{}", " ".repeat(prefix.len()), url);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

// ── Interactive shell ─────────────────────────────────────────────────────────

/// Line loop: any input is a search term; `fav N` saves a numbered listing
/// from the last scan, `favs` lists the session's favorites. Favorites live
/// exactly as long as the shell.
async fn run_shell(scanner: &Scanner, opts: &RankOptions) -> Result<()> {
    println!("flipscan shell — type a search term, `fav N`, `favs`, or `quit`.");

    let mut favorites = Favorites::new();
    let mut last_report: Option<ScanReport> = None;
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "favs" => {
                if favorites.is_empty() {
                    println!("No favorites yet.");
                } else {
                    println!("{} favorites:", favorites.len());
                    for l in favorites.iter() {
                        println!("  {} — {}", truncate(&l.title, 60), fmt_price(l.price));
                    }
                }
            }
            _ if line.starts_with("fav ") => {
                match line[4..].trim().parse::<usize>() {
                    Ok(n) => add_favorite(&mut favorites, last_report.as_ref(), n),
                    Err(_) => println!("Usage: fav N"),
                }
            }
            term => {
                match scanner.scan(term, opts).await {
                    Ok(report) => {
                        render_report(&report, true);
                        last_report = Some(report);
                    }
                    Err(ScanError::NoHistoricalData { term }) => {
                        println!("No sold data found for \"{}\".", term);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Numbers continue from clean into sketchy, matching the rendered report.
fn add_favorite(favorites: &mut Favorites, report: Option<&ScanReport>, n: usize) {
    let Some(report) = report else {
        println!("Run a search first.");
        return;
    };

    let listing = report
        .clean
        .iter()
        .chain(report.sketchy.iter())
        .nth(n.wrapping_sub(1));

    match listing {
        Some(l) => {
            if favorites.add(l.clone()) {
                println!("Saved: {} — {}", truncate(&l.title, 60), fmt_price(l.price));
            } else {
                println!("Already saved.");
            }
        }
        None => println!("No listing #{} in the last scan.", n),
    }
}
