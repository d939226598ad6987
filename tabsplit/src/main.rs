//! tabsplit: track shared purchases and work out who pays whom.
//!
//! Usage:
//!     tabsplit person add Ana
//!     tabsplit purchase add --item pizza --price 45.50 --buyer 1
//!     tabsplit split --method greedy

#![warn(clippy::uninlined_format_args)]

mod bootstrap;

use std::{
    borrow::Cow,
    io::{self, Write},
    path::PathBuf,
    process,
};

use bootstrap::{AppConfig, Overrides};
use clap::{Args, Parser, Subcommand};
use tabsplit_application::{
    IdPolicy, Ledger, LedgerService, LedgerStore, NewPurchase, ParticipantSelection,
    SplitProcessor,
};
use tabsplit_domain::{EngineError, Money, PersonId, PurchaseId, SettlementMethod};
use tabsplit_infrastructure::JsonFileStore;
use tabsplit_presentation::{LedgerPresenter, SettlementPresenter};

type CliResult<T> = Result<T, Cow<'static, str>>;

const NOTHING_TO_SPLIT: &str = "Nothing to split yet: add some persons first.";

#[derive(Parser)]
#[command(name = "tabsplit")]
#[command(version)]
#[command(about = "Split shared purchases and settle up", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Directory holding the ledger files [env: TABSPLIT_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Id allocation: monotonic or fill-gap [env: TABSPLIT_ID_POLICY]
    #[arg(long, global = true)]
    id_policy: Option<IdPolicy>,

    /// Decimal places of money amounts [env: TABSPLIT_SCALE]
    #[arg(long, global = true)]
    scale: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the people sharing expenses
    #[command(subcommand)]
    Person(PersonCommand),

    /// Manage shared purchases
    #[command(subcommand)]
    Purchase(PurchaseCommand),

    /// Show balances and the payments that settle them
    Split {
        /// funnel-cascade or greedy [env: TABSPLIT_SETTLEMENT]
        #[arg(long)]
        method: Option<SettlementMethod>,
    },

    /// Show persons, purchases and the settlement
    Show,
}

#[derive(Subcommand)]
enum PersonCommand {
    /// Add a person
    Add { name: String },

    /// Remove a person, deleting the purchases they paid for
    Remove { id: u64 },

    /// List persons
    List,
}

#[derive(Subcommand)]
enum PurchaseCommand {
    /// Add a purchase
    Add {
        #[arg(long)]
        item: String,

        #[arg(long)]
        price: Money,

        /// Id of the person who paid
        #[arg(long)]
        buyer: u64,

        /// Id of a person sharing the cost; repeat for more. Defaults to everyone.
        #[arg(long = "participant")]
        participants: Vec<u64>,
    },

    /// Remove a purchase
    Remove { id: u64 },

    /// List purchases
    List,
}

fn main() {
    bootstrap::init_logging();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let method = match &cli.command {
        Commands::Split { method } => *method,
        _ => None,
    };
    let config = AppConfig::from_env(Overrides {
        data_dir: cli.global.data_dir,
        id_policy: cli.global.id_policy,
        settlement: method,
        scale: cli.global.scale,
    })
    .map_err(|err| format!("invalid configuration: {err}"))?;

    tracing::debug!(
        data_dir = %config.data_dir.display(),
        id_policy = %config.id_policy,
        settlement = %config.settlement,
        scale = config.money.scale(),
        "Configuration loaded"
    );

    let store = JsonFileStore::new(config.data_dir.clone());
    execute(cli.command, &config, store, &mut io::stdout().lock())
}

fn execute<S: LedgerStore>(
    command: Commands,
    config: &AppConfig,
    store: S,
    out: &mut impl Write,
) -> CliResult<()> {
    let service = LedgerService::new(store, config.id_policy, config.money);

    match command {
        Commands::Person(PersonCommand::Add { name }) => {
            let id = service.add_person(&name).map_err(|err| err.to_string())?;
            emit(out, &format!("Added {} ({id})\n", name.trim()))
        }
        Commands::Person(PersonCommand::Remove { id }) => {
            let removal = service
                .remove_person(PersonId(id))
                .map_err(|err| err.to_string())?;
            let mut text = format!("Removed {} ({})\n", removal.person.name, removal.person.id);
            if !removal.removed_purchases.is_empty() {
                text.push_str(&format!(
                    "Deleted purchases they paid for: {}\n",
                    join_ids(&removal.removed_purchases)
                ));
            }
            if !removal.updated_purchases.is_empty() {
                text.push_str(&format!(
                    "No longer sharing: {}\n",
                    join_ids(&removal.updated_purchases)
                ));
            }
            emit(out, &text)
        }
        Commands::Person(PersonCommand::List) => {
            let ledger = service.load().map_err(|err| err.to_string())?;
            emit(out, &LedgerPresenter::render_persons(ledger.persons()))
        }
        Commands::Purchase(PurchaseCommand::Add {
            item,
            price,
            buyer,
            participants,
        }) => {
            let participants = if participants.is_empty() {
                ParticipantSelection::Everyone
            } else {
                ParticipantSelection::Only(participants.into_iter().map(PersonId).collect())
            };
            let id = service
                .add_purchase(NewPurchase {
                    item,
                    price,
                    buyer: PersonId(buyer),
                    participants,
                })
                .map_err(|err| err.to_string())?;
            emit(out, &format!("Added purchase {id}\n"))
        }
        Commands::Purchase(PurchaseCommand::Remove { id }) => {
            let purchase = service
                .remove_purchase(PurchaseId(id))
                .map_err(|err| err.to_string())?;
            emit(
                out,
                &format!("Removed purchase {} ({})\n", purchase.id(), purchase.item()),
            )
        }
        Commands::Purchase(PurchaseCommand::List) => {
            let ledger = service.load().map_err(|err| err.to_string())?;
            emit(
                out,
                &LedgerPresenter::render_purchases(ledger.purchases(), &ledger, ledger.money()),
            )
        }
        Commands::Split { .. } => {
            let ledger = service.load().map_err(|err| err.to_string())?;
            emit(out, &render_settlement(&ledger, config.settlement)?)
        }
        Commands::Show => {
            let ledger = service.load().map_err(|err| err.to_string())?;
            let text = [
                LedgerPresenter::render_persons(ledger.persons()),
                LedgerPresenter::render_purchases(ledger.purchases(), &ledger, ledger.money()),
                render_settlement(&ledger, config.settlement)?,
            ]
            .join("\n");
            emit(out, &text)
        }
    }
}

fn render_settlement(ledger: &Ledger, method: SettlementMethod) -> CliResult<String> {
    match SplitProcessor::with_method(ledger.money(), method).split(ledger) {
        Ok(result) => Ok(SettlementPresenter::render(&result, ledger, ledger.money())),
        Err(EngineError::NoParticipants) => Ok(format!("{NOTHING_TO_SPLIT}\n")),
        Err(err) => Err(err.to_string().into()),
    }
}

fn join_ids(ids: &[PurchaseId]) -> String {
    ids.iter()
        .map(PurchaseId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit(out: &mut impl Write, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())
        .map_err(|err| format!("failed to write output: {err}").into())
}
