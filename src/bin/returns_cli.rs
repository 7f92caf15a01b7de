//! Command-line access to the calculators
//!
//! Prints JSON to stdout; logging goes to stderr via `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use estate_returns::investment::{load_investments, load_investments_json};
use estate_returns::portfolio::summarize_portfolio;
use estate_returns::session::{Credential, FileCredentialStore, Session, SessionUser};
use estate_returns::withdrawal::payable_amount;
use estate_returns::{
    project_returns, CalculatorConfig, FeeDeductionType, Investment, ManagementFeePolicy,
    ProjectionInputs, QuoteCalculator,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "returns_cli", about = "Investment returns and withdrawal calculator")]
struct Cli {
    /// JSON config file (falls back to RETURNS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote a withdrawal for one investment (JSON file)
    Quote {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        pricing: PricingArgs,
    },
    /// Project returns for a prospective purchase (JSON file)
    Project {
        #[arg(long)]
        input: PathBuf,
        /// Override the hypothetical exit time in years
        #[arg(long)]
        withdraw_after: Option<f64>,
    },
    /// Summarise a portfolio from a CSV export or JSON array
    Portfolio {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        pricing: PricingArgs,
    },
    /// Store a session credential
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Remove the stored session credential
    Logout {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show the stored session user
    Whoami {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFeeType {
    Upfront,
    Ongoing,
}

impl From<CliFeeType> for FeeDeductionType {
    fn from(value: CliFeeType) -> Self {
        match value {
            CliFeeType::Upfront => FeeDeductionType::Upfront,
            CliFeeType::Ongoing => FeeDeductionType::Ongoing,
        }
    }
}

#[derive(Args, Debug)]
struct PricingArgs {
    /// Management fee percentage
    #[arg(long)]
    fee: Option<f64>,

    #[arg(long, value_enum, default_value_t = CliFeeType::Ongoing)]
    fee_type: CliFeeType,

    /// Pricing time (RFC 3339), defaults to now
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

impl PricingArgs {
    fn fee(&self, config: &CalculatorConfig) -> Option<ManagementFeePolicy> {
        match self.fee {
            Some(percentage) => Some(ManagementFeePolicy {
                percentage,
                deduction_type: self.fee_type.into(),
            }),
            None => config.default_management_fee,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Credential file (default: ~/.estate_returns/credential.json)
    #[arg(long)]
    session_file: Option<PathBuf>,
}

impl StoreArgs {
    fn session(&self) -> Result<Session<FileCredentialStore>> {
        let path = match &self.session_file {
            Some(p) => p.clone(),
            None => {
                let home = std::env::var("HOME").context("HOME not set; pass --session-file")?;
                Path::new(&home).join(".estate_returns").join("credential.json")
            }
        };
        Ok(Session::new(FileCredentialStore::new(path)))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteOutput<T: Serialize> {
    #[serde(flatten)]
    quote: T,
    payable_amount: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_portfolio(path: &Path) -> Result<Vec<Investment>> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let investments = if is_json { load_investments_json(path)? } else { load_investments(path)? };
    Ok(investments)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = CalculatorConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let calculator = QuoteCalculator::new(config.days_per_year);

    match cli.command {
        Command::Quote { input, pricing } => {
            let investment: Investment = read_json(&input)?;
            let fee = pricing.fee(&config);
            let quote = calculator.quote(&investment, fee.as_ref(), pricing.now())?;
            let payable = payable_amount(&quote, config.negative_net_policy)?;
            print_json(&QuoteOutput { quote, payable_amount: payable })
        }
        Command::Project { input, withdraw_after } => {
            let mut inputs: ProjectionInputs = read_json(&input)?;
            if withdraw_after.is_some() {
                inputs.withdrawal_after_years = withdraw_after;
            }
            print_json(&project_returns(&inputs)?)
        }
        Command::Portfolio { input, pricing } => {
            let investments = load_portfolio(&input)?;
            let fee = pricing.fee(&config);
            let summary = summarize_portfolio(&investments, fee.as_ref(), pricing.now(), &calculator)?;
            print_json(&summary)
        }
        Command::Login { user_id, email, token, name, store } => {
            let credential = Credential {
                user: SessionUser { id: user_id, email, name, kyc_verified: false },
                token,
            };
            store.session()?.login(credential)?;
            Ok(())
        }
        Command::Logout { store } => {
            store.session()?.logout()?;
            Ok(())
        }
        Command::Whoami { store } => match store.session()?.current()? {
            Some(credential) => print_json(&credential.user),
            None => {
                println!("Not logged in");
                Ok(())
            }
        },
    }
}
