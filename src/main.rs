//! Polymarket Trader Scorer
//!
//! Scores wallets from their positions and activity, and ranks leaderboard
//! traders by a composite 0-100 score.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use futures::{stream, StreamExt};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use polymarket_scorer::api::DataClient;
use polymarket_scorer::config::{ScorerConfig, DATA_API_BASE};
use polymarket_scorer::models::{ScoredMetrics, Trader};
use polymarket_scorer::ranking::{rank_traders, ScoreSummary};

/// Polymarket trader scoring CLI.
#[derive(Parser)]
#[command(name = "polyscore")]
#[command(about = "Score and rank Polymarket traders", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    fetch: FetchArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FetchArgs {
    /// Polymarket Data API base URL
    #[arg(long, env = "POLYMARKET_DATA_API", default_value = DATA_API_BASE)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCORER_HTTP_TIMEOUT_SECS", default_value = "30")]
    timeout: u64,

    /// Maximum seconds spent retrying one request
    #[arg(long, env = "SCORER_MAX_RETRY_SECS", default_value = "60")]
    max_retry: u64,

    /// Records per page for list endpoints
    #[arg(long, env = "SCORER_PAGE_SIZE", default_value = "50")]
    page_size: u32,

    /// Maximum records fetched per endpoint per wallet
    #[arg(long, env = "SCORER_MAX_RECORDS", default_value = "2000")]
    max_records: usize,

    /// Wallets fetched concurrently when scoring a leaderboard
    #[arg(long, env = "SCORER_FETCH_CONCURRENCY", default_value = "4")]
    concurrency: usize,
}

impl From<FetchArgs> for ScorerConfig {
    fn from(args: FetchArgs) -> Self {
        Self {
            api_base_url: args.api_url,
            http_timeout_secs: args.timeout,
            max_retry_secs: args.max_retry,
            page_size: args.page_size,
            max_records: args.max_records,
            fetch_concurrency: args.concurrency,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single wallet
    Score {
        /// Trader's wallet address
        address: String,

        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score and rank the top traders from the leaderboard
    Leaderboard {
        /// Time period (DAY, WEEK, MONTH, ALL)
        #[arg(short, long, default_value = "MONTH")]
        period: String,

        /// Number of leaderboard traders to score
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two wallets side by side
    Compare {
        first: String,
        second: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ScorerConfig::from(cli.fetch);
    config.validate()?;

    match cli.command {
        Commands::Score { address, json } => {
            let client = DataClient::new(&config)?;

            info!(address = %address, "Scoring trader");
            let metrics = client.get_trader_snapshot(&address).await?.score();

            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                let mut trader = Trader::new(address);
                trader.metrics = Some(metrics);
                print_report(&trader);
            }
        }

        Commands::Leaderboard { period, limit, json } => {
            let client = DataClient::new(&config)?;

            info!(period = %period, limit = limit, "Fetching leaderboard");
            let entries = client.top_traders(&period, limit).await?;

            let client = &client;
            let traders: Vec<Trader> = stream::iter(entries)
                .map(|entry| async move {
                    let snapshot = client.get_trader_snapshot(&entry.proxy_wallet).await;
                    (entry, snapshot)
                })
                .buffer_unordered(config.fetch_concurrency)
                .filter_map(|(entry, snapshot)| async move {
                    match snapshot {
                        Ok(snapshot) => {
                            let mut trader = Trader::new(entry.proxy_wallet);
                            trader.pseudonym = entry.user_name;
                            trader.leaderboard_pnl = Some(entry.pnl);
                            trader.leaderboard_volume = Some(entry.vol);
                            trader.metrics = Some(snapshot.score());
                            Some(trader)
                        }
                        Err(e) => {
                            warn!(address = %entry.proxy_wallet, error = %e, "Skipping trader");
                            None
                        }
                    }
                })
                .collect()
                .await;

            let ranked = rank_traders(traders);
            let summary = ScoreSummary::from_ranked(&ranked);

            if json {
                let output = serde_json::json!({ "ranking": ranked, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!(
                "\n{:>4} {:<44} {:<16} {:>12} {:>8} {:>7} {:>7}",
                "RANK", "ADDRESS", "NAME", "P&L", "ROI%", "WIN%", "SCORE"
            );
            println!("{}", "-".repeat(104));

            for entry in &ranked {
                let Some(m) = &entry.trader.metrics else {
                    continue;
                };
                println!(
                    "{:>4} {:<44} {:<16} {:>12.2} {:>8.1} {:>7.1} {:>7.1}",
                    entry.rank,
                    entry.trader.address,
                    truncate(&entry.trader.display_name(), 16),
                    m.total_pnl,
                    m.roi,
                    m.win_rate,
                    m.final_score
                );
            }

            println!("\n--- Score Distribution ({} traders) ---", summary.count);
            println!("Mean:           {:.1}", summary.mean);
            println!("Std Dev:        {:.1}", summary.std_dev);
            println!("Median:         {:.1}", summary.median);
            println!("Upper Quartile: {:.1}", summary.upper_quartile);
            println!("Top:            {:.1}", summary.top_score);
        }

        Commands::Compare { first, second } => {
            let client = DataClient::new(&config)?;

            let (a, b) = futures::try_join!(
                client.get_trader_snapshot(&first),
                client.get_trader_snapshot(&second),
            )?;
            let (a, b) = (a.score(), b.score());

            println!("\n{:<20} {:>16} {:>16}", "", short_address(&first), short_address(&second));
            println!("{}", "-".repeat(54));
            for (label, x, y) in comparison_rows(&a, &b) {
                println!("{:<20} {:>16} {:>16}", label, x, y);
            }
        }

        Commands::Config => {
            println!("\n=== Scorer Configuration ===\n");
            println!("Data API:             {}", config.api_base_url);
            println!("HTTP Timeout:         {}s", config.http_timeout_secs);
            println!("Max Retry Time:       {}s", config.max_retry_secs);
            println!("Page Size:            {}", config.page_size);
            println!("Max Records:          {}", config.max_records);
            println!("Fetch Concurrency:    {}", config.fetch_concurrency);
        }
    }

    Ok(())
}

fn print_report(trader: &Trader) {
    println!("\n=== Trader: {} ===", trader.display_name());
    println!("Address: {}", trader.address);

    let Some(m) = &trader.metrics else {
        println!("\nNo metrics available.");
        return;
    };

    if !m.has_activity() {
        println!("\nNo positions found for this wallet.");
    }

    println!("\n--- Performance ---");
    println!("Markets Traded: {}", m.total_trades);
    println!("Total Stakes:   ${:.2}", m.total_stakes);
    println!("Total P&L:      ${:.2}", m.total_pnl);
    println!("ROI:            {:.1}%", m.roi);
    println!(
        "Volume:         ${:.2} (buy ${:.2} / sell ${:.2})",
        m.total_volume, m.buy_volume, m.sell_volume
    );

    println!("\n--- Win/Loss ---");
    println!("Win Rate:       {:.1}%", m.win_rate);
    println!("Winning Trades: {}", m.winning_trades);
    println!("Losing Trades:  {}", m.losing_trades);
    println!("Largest Win:    ${:.2}", m.largest_win);
    println!("Worst Loss:     ${:.2}", m.worst_loss);
    println!(
        "Streaks:        current {} / longest {}",
        m.streaks.current_streak, m.streaks.longest_streak
    );

    println!("\n--- Risk ---");
    println!("Max Drawdown:   ${:.2}", m.max_drawdown);
    println!("Stake Vol (CV): {:.2}", m.stake_volatility);

    println!("\n--- Scoring ---");
    println!("PnL Score:        {:.3}", m.pnl_score);
    println!("ROI Score:        {:.3}", m.roi_score);
    println!("Win Score:        {:.3}", m.win_score);
    println!("Confidence Score: {:.3}", m.confidence_score);
    match m.risk_score {
        Some(risk) => println!("Risk Score:       {:.3}", risk),
        None => println!("Risk Score:       n/a (fewer than 10 markets)"),
    }
    println!("Final Score:      {:.1}/100", m.final_score);
}

fn comparison_rows(a: &ScoredMetrics, b: &ScoredMetrics) -> Vec<(&'static str, String, String)> {
    let money = |v: f64| format!("${:.2}", v);
    let pct = |v: f64| format!("{:.1}%", v);
    let score = |v: f64| format!("{:.3}", v);
    let risk = |v: Option<f64>| v.map(score).unwrap_or_else(|| "n/a".to_string());

    vec![
        ("Markets", a.total_trades.to_string(), b.total_trades.to_string()),
        ("Total P&L", money(a.total_pnl), money(b.total_pnl)),
        ("ROI", pct(a.roi), pct(b.roi)),
        ("Win Rate", pct(a.win_rate), pct(b.win_rate)),
        ("Max Drawdown", money(a.max_drawdown), money(b.max_drawdown)),
        (
            "Longest Streak",
            a.streaks.longest_streak.to_string(),
            b.streaks.longest_streak.to_string(),
        ),
        ("Risk Score", risk(a.risk_score), risk(b.risk_score)),
        ("Confidence", score(a.confidence_score), score(b.confidence_score)),
        ("Final Score", format!("{:.1}", a.final_score), format!("{:.1}", b.final_score)),
    ]
}

fn short_address(address: &str) -> String {
    Trader::new(address.to_string()).display_name()
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
