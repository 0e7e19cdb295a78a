use std::{error::Error, fs, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use api_types::record::LedgerFile;
use api_types::settlement::SettlementProposal;
use engine::{Ledger, MoneyCents, Scope};

mod convert;
mod views;

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Balance queries over a shared-expense ledger snapshot")]
struct Cli {
    /// Path to the ledger snapshot (JSON, also read from `TALLY_LEDGER`).
    #[arg(long, env = "TALLY_LEDGER", default_value = "./ledger.json")]
    ledger: PathBuf,

    /// Emit the shared JSON response bodies instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the personal balance between two users.
    Pair(PairArgs),
    /// Show net positions and breakdowns for a group.
    Group(GroupArgs),
    /// Suggest the transfers that settle a scope.
    Suggest(SuggestArgs),
    /// Check a settlement proposal against the current balances.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct PairArgs {
    #[arg(long)]
    user_a: String,
    #[arg(long)]
    user_b: String,
}

#[derive(Args, Debug)]
struct GroupArgs {
    #[arg(long)]
    group: Uuid,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    /// Settle this group.
    #[arg(long, conflicts_with = "user")]
    group: Option<Uuid>,
    /// Settle this user's personal ledger.
    #[arg(long)]
    user: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long)]
    group: Option<Uuid>,
    #[arg(long)]
    paid_by: String,
    #[arg(long)]
    received_by: String,
    /// Decimal amount, e.g. `12.50`.
    #[arg(long)]
    amount: String,
}

fn load_ledger(path: &PathBuf) -> Result<Ledger, Box<dyn Error + Send + Sync>> {
    let raw = fs::read_to_string(path)?;
    let file: LedgerFile = serde_json::from_str(&raw)?;
    tracing::debug!(
        groups = file.groups.len(),
        expenses = file.expenses.len(),
        settlements = file.settlements.len(),
        "loaded ledger snapshot"
    );
    Ok(convert::ledger_from_file(file)?)
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("TALLY_LOG").unwrap_or_else(|_| "tally=info,engine=info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let ledger = load_ledger(&cli.ledger)?;

    match cli.command {
        Command::Pair(args) => {
            let balance = ledger.pair_balance(&args.user_a, &args.user_b)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&views::pair_balance(&balance))?
                );
                return Ok(());
            }
            let owed = balance.owed_by(&args.user_a);
            if owed.is_zero() {
                println!("{} and {} are settled up", args.user_a, args.user_b);
            } else if owed.is_positive() {
                println!("{} owes {} {owed}", args.user_a, args.user_b);
            } else {
                println!("{} owes {} {}", args.user_b, args.user_a, -owed);
            }
        }
        Command::Group(args) => {
            let balances = ledger.group_balances(args.group)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&views::group_balances(args.group, &balances))?
                );
                return Ok(());
            }
            for balance in balances {
                println!("{}: {}", balance.user_id, balance.net);
                for (counterpart, amount) in &balance.counterparts {
                    if amount.is_positive() {
                        println!("  {counterpart} owes them {amount}");
                    } else if amount.is_negative() {
                        println!("  they owe {counterpart} {}", -*amount);
                    }
                }
            }
        }
        Command::Suggest(args) => {
            let scope = match (args.group, args.user) {
                (Some(group_id), None) => Scope::Group(group_id),
                (None, Some(user_id)) => Scope::personal(user_id),
                _ => return Err("pass exactly one of --group or --user".into()),
            };
            let transfers = ledger.suggested_settlements(&scope)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&views::suggestions(&transfers))?
                );
                return Ok(());
            }
            if transfers.is_empty() {
                println!("nothing to settle");
            }
            for transfer in transfers {
                println!("{} pays {} {}", transfer.from, transfer.to, transfer.amount);
            }
        }
        Command::Validate(args) => {
            let amount: MoneyCents = args.amount.parse()?;
            let request = SettlementProposal {
                group_id: args.group,
                paid_by: args.paid_by,
                received_by: args.received_by,
                amount_minor: amount.cents(),
            };
            let proposal = convert::proposal(request);
            let remaining = ledger.validate_settlement(&proposal)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&views::settlement_accepted(remaining))?
                );
                return Ok(());
            }
            if remaining.is_zero() {
                println!("ok: pair fully settled after this payment");
            } else if remaining.is_positive() {
                println!(
                    "ok: {} would still owe {} {remaining}",
                    proposal.paid_by, proposal.received_by
                );
            } else {
                println!(
                    "ok: {} would then owe {} {}",
                    proposal.received_by,
                    proposal.paid_by,
                    -remaining
                );
            }
        }
    }

    Ok(())
}
