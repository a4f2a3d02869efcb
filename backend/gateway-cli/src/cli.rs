use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain_types::{
    payment_method_data::Card,
    router_request_types::{GatewayOptions, PaymentAuthorization},
};
use error_stack::report;
use hyperswitch_masking::Secret;

use crate::error::CliError;

/// Run PayDock gateway operations from the command line.
///
/// Every command prints the gateway response as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "paydock", version, about)]
pub struct Cli {
    /// Configuration file, defaults to `config/<environment>.toml` in the workspace.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Gateway options as a JSON object, e.g. `{"currency":"USD","reference":"order-1"}`.
    #[arg(long, short, global = true)]
    pub options: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn gateway_options(&self) -> Result<GatewayOptions, error_stack::Report<CliError>> {
        match &self.options {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|error| report!(CliError::InvalidOptions(error.to_string()))),
            None => Ok(GatewayOptions::default()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tokenize a card, under a customer when the options name one.
    Store {
        #[command(flatten)]
        card: CardArgs,
    },
    /// Delete the vault token referenced by an authorization.
    Unstore { authorization: String },
    /// Charge and capture.
    Purchase {
        #[arg(long)]
        amount: i64,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Charge without capturing.
    Authorize {
        #[arg(long)]
        amount: i64,
        #[command(flatten)]
        source: SourceArgs,
    },
    Capture {
        #[arg(long)]
        amount: i64,
        authorization: String,
    },
    Refund {
        #[arg(long)]
        amount: i64,
        authorization: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Store { .. } => "store",
            Self::Unstore { .. } => "unstore",
            Self::Purchase { .. } => "purchase",
            Self::Authorize { .. } => "authorize",
            Self::Capture { .. } => "capture",
            Self::Refund { .. } => "refund",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CardArgs {
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub exp_month: String,
    #[arg(long)]
    pub exp_year: String,
    #[arg(long)]
    pub cvc: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
}

impl From<CardArgs> for Card {
    fn from(args: CardArgs) -> Self {
        Self {
            card_number: Secret::new(args.number),
            card_exp_month: Secret::new(args.exp_month),
            card_exp_year: Secret::new(args.exp_year),
            card_cvc: args.cvc.map(Secret::new),
            first_name: args.first_name.map(Secret::new),
            last_name: args.last_name.map(Secret::new),
        }
    }
}

/// Where a charge takes its payer from: an earlier authorization, a raw card, or neither.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Authorization returned by an earlier call.
    #[arg(long, conflicts_with = "number")]
    pub token: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long, requires = "number")]
    pub exp_month: Option<String>,
    #[arg(long, requires = "number")]
    pub exp_year: Option<String>,
    #[arg(long, requires = "number")]
    pub cvc: Option<String>,
    #[arg(long, requires = "number")]
    pub first_name: Option<String>,
    #[arg(long, requires = "number")]
    pub last_name: Option<String>,
}

impl SourceArgs {
    pub fn into_authorization(
        self,
    ) -> Result<PaymentAuthorization, error_stack::Report<CliError>> {
        if let Some(token) = self.token {
            return Ok(PaymentAuthorization::Token(token));
        }
        let Some(number) = self.number else {
            return Ok(PaymentAuthorization::None);
        };
        let card = CardArgs {
            number,
            exp_month: self
                .exp_month
                .ok_or_else(|| report!(CliError::MissingArgument("--exp-month")))?,
            exp_year: self
                .exp_year
                .ok_or_else(|| report!(CliError::MissingArgument("--exp-year")))?,
            cvc: self.cvc,
            first_name: self.first_name,
            last_name: self.last_name,
        };
        Ok(PaymentAuthorization::Card(card.into()))
    }
}
