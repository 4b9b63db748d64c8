//! harvest-report: Tax-loss harvesting report for a portfolio file.
//!
//! Reads holdings from a JSON array, values them as of a date, and prints
//! the current capital-gains liability together with a harvest plan.
//!
//! Usage:
//!   cargo run -p harvest-report -- holdings.json
//!   cargo run -p harvest-report -- holdings.json --as-of 2025-03-31
//!   cargo run -p harvest-report -- holdings.json --json

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tax_engine::{HarvestingConfig, HarvestingEngine, Holding, TaxCalculator, TaxRules};

mod report;

struct Args {
    holdings_path: PathBuf,
    as_of: Option<NaiveDate>,
    json: bool,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let json = args.iter().any(|a| a == "--json");

        let as_of = match args.iter().position(|a| a == "--as-of") {
            Some(idx) => {
                let raw = args.get(idx + 1).context("--as-of needs a date (YYYY-MM-DD)")?;
                Some(Holding::parse_buy_date(raw).with_context(|| format!("bad --as-of '{raw}'"))?)
            }
            None => None,
        };

        let holdings_path = args
            .iter()
            .enumerate()
            .skip(1)
            .find(|(idx, a)| !a.starts_with("--") && args[idx - 1] != "--as-of")
            .map(|(_, a)| PathBuf::from(a));

        let Some(holdings_path) = holdings_path else {
            bail!("missing holdings file");
        };

        Ok(Self {
            holdings_path,
            as_of,
            json,
        })
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "harvest_report=info,tax_engine=info".into());
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so --json output stays machine-readable.
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_holdings(path: &Path, as_of: NaiveDate) -> Result<Vec<Holding>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let holdings: Vec<Holding> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse holdings in {}", path.display()))?;

    for holding in &holdings {
        holding
            .validate(as_of)
            .with_context(|| format!("holding '{}' is invalid", holding.id))?;
    }
    Ok(holdings)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let args = match Args::parse(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e:#}");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  harvest-report HOLDINGS.json [--as-of YYYY-MM-DD] [--json]");
            eprintln!();
            eprintln!("Environment:");
            eprintln!("  TAX_STCG_RATE, TAX_LTCG_RATE, TAX_LTCG_EXEMPTION, TAX_LTCG_THRESHOLD_DAYS");
            eprintln!("  HARVEST_MIN_LOSS, HARVEST_MAX_RECOMMENDATIONS,");
            eprintln!("  HARVEST_INCLUDE_SHORT_TERM, HARVEST_INCLUDE_LONG_TERM");
            std::process::exit(2);
        }
    };

    let rules = TaxRules::from_env().context("invalid tax rules in environment")?;
    let config = HarvestingConfig::from_env().context("invalid harvesting config in environment")?;
    tracing::info!(
        "Rules: {} (STCG {}, LTCG {} above {}, long-term after {} days)",
        rules.jurisdiction,
        rules.short_term_rate,
        rules.long_term_rate,
        rules.long_term_exemption,
        rules.long_term_threshold_days
    );

    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let holdings = load_holdings(&args.holdings_path, as_of)?;
    tracing::info!(
        "Loaded {} holdings from {} (as of {})",
        holdings.len(),
        args.holdings_path.display(),
        as_of
    );

    let engine = HarvestingEngine::with_config(TaxCalculator::with_rules(rules), config);
    let enriched = engine.calculator().enrich(&holdings, as_of);
    let plan = engine.plan_for(&enriched);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", report::render(&enriched, &plan, as_of)?);
    }

    Ok(())
}
