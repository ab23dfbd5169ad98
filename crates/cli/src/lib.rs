//! `ledgerbook` command line: stock valuation and ledger statements from JSON
//! input, printed as JSON or CSV.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

use ledgerbook_accounting::Granularity;
use ledgerbook_observability::LogFormat;
use ledgerbook_reporting::{
    AccountHistory, OrderingMode, ProductHistory, ReportConfig, ReportWindow, build_statement,
    build_stock_report, export,
};

#[derive(Parser, Debug)]
#[command(name = "ledgerbook")]
#[command(about = "Weighted-average stock valuation and running-balance ledger statements")]
pub struct Cli {
    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact, global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Value every product in FILE (a JSON array of product histories).
    Stock(StockArgs),
    /// Ledger statement of the account in FILE (a JSON account history).
    Ledger(LedgerArgs),
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Print CSV instead of JSON.
    #[arg(long)]
    pub csv: bool,

    /// Decimal places in CSV output (default from `LEDGERBOOK_DISPLAY_SCALE`, else 3).
    #[arg(long)]
    pub scale: Option<u32>,
}

#[derive(Args, Debug)]
pub struct StockArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    /// First day of the report window (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the report window, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Period totals granularity: day or month (default from `LEDGERBOOK_PERIOD`, else day).
    #[arg(long)]
    pub period: Option<Granularity>,

    /// Print period totals instead of transaction rows (CSV only).
    #[arg(long)]
    pub totals: bool,

    /// Fail if transactions are not already in chronological order.
    #[arg(long)]
    pub verify_order: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

/// Execute the parsed command, writing the report to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = ReportConfig::from_env().context("invalid report configuration")?;

    match &cli.command {
        Command::Stock(args) => {
            let products: Vec<ProductHistory> = read_json(&args.file)?;
            run_stock(&products, &args.output, &config, out)
        }
        Command::Ledger(args) => {
            let history: AccountHistory = read_json(&args.file)?;
            run_ledger(&history, args, &config, out)
        }
    }
}

pub fn run_stock(
    products: &[ProductHistory],
    output: &OutputArgs,
    config: &ReportConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let report = build_stock_report(products)?;

    if output.csv {
        let scale = output.scale.unwrap_or(config.display_scale);
        export::write_stock_report_csv(&report, out, scale)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn run_ledger(
    history: &AccountHistory,
    args: &LedgerArgs,
    config: &ReportConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let window = ReportWindow::new(args.from, args.to)?;
    let granularity = args.period.unwrap_or(config.granularity);
    let ordering = if args.verify_order {
        OrderingMode::Verify
    } else {
        OrderingMode::Sort
    };

    let statement = build_statement(history, window, granularity, ordering)?;

    if args.output.csv {
        let scale = args.output.scale.unwrap_or(config.display_scale);
        if args.totals {
            export::write_period_totals_csv(&statement.totals, out, scale)?;
        } else {
            export::write_statement_csv(&statement, out, scale)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut *out, &statement)?;
        writeln!(out)?;
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let reader: Box<dyn Read> = if path.as_os_str() == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Box::new(file)
    };

    serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("failed to parse {}", path.display()))
}
