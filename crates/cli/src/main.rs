//! `vaultops` — plan or perform item moves from the command line.
//!
//! Commands:
//! - `plan --profile <file> --item <id> --to <vault|character> [--equip]` - print the plan without calling the service
//! - `move --item <id> --to <vault|character> [--equip] [--profile <file>]` - execute the move
//! - `loadout --character <id> --item <id>... [--profile <file>]` - bring items over and equip them together
//!
//! Service access is configured through the `VAULTOPS_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use vaultops_client::HttpMutationClient;
use vaultops_core::{BucketHash, CharacterId, ItemInstanceId};
use vaultops_inventory::{AccountSnapshot, BucketCategory, Item, Location, ProfileResponse};
use vaultops_observability::LogFormat;
use vaultops_transfer::{
    DragSession, DropOwner, DropTarget, DropZone, Notice, NoticeLevel, TransferOrchestrator,
    TransferPlanner, TransferRequest, execute_loadout, plan_loadout,
};

#[derive(Parser)]
#[command(name = "vaultops")]
#[command(about = "Move, equip and stage items between characters and the vault")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogStyle::Pretty, global = true)]
    log_format: LogStyle,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogStyle {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the remote calls a move would make, without making them
    Plan {
        #[command(flatten)]
        target: MoveArgs,
        /// Profile payload saved from the account service
        #[arg(short, long)]
        profile: PathBuf,
    },
    /// Move an item, equipping it on arrival with --equip
    Move {
        #[command(flatten)]
        target: MoveArgs,
        /// Use a saved profile instead of fetching the live one
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
    /// Equip a set of items on one character in a single call
    Loadout {
        /// Character receiving the items
        #[arg(short, long)]
        character: CharacterId,
        /// Instance ids of the items to equip
        #[arg(short, long = "item", required = true, num_args = 1..)]
        items: Vec<ItemInstanceId>,
        /// Use a saved profile instead of fetching the live one
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
}

#[derive(Args)]
struct MoveArgs {
    /// Instance id of the item to move
    #[arg(short, long)]
    item: ItemInstanceId,
    /// Destination: `vault` or a character id
    #[arg(short, long)]
    to: String,
    /// Equip the item on the destination character
    #[arg(short, long)]
    equip: bool,
    /// Bucket hash of the item, for vault items whose profile entry reports the vault bucket
    #[arg(short, long)]
    bucket: Option<u32>,
}

impl MoveArgs {
    fn drop_target(&self) -> Result<DropTarget> {
        let owner: DropOwner = self.to.parse()?;
        let zone = match (&owner, self.equip) {
            (DropOwner::Vault, true) => bail!("items cannot be equipped in the vault"),
            (DropOwner::Vault, false) => DropZone::ProfileInventory,
            (DropOwner::Character(_), true) => DropZone::CharacterEquipment,
            (DropOwner::Character(_), false) => DropZone::CharacterInventory,
        };
        Ok(DropTarget::new(owner, zone))
    }

    /// Where the item is now, and the item as it should be planned.
    fn locate(&self, snapshot: &AccountSnapshot) -> Result<(Location, Item)> {
        let (source, item) = snapshot
            .locate(&self.item)
            .with_context(|| format!("item {} is not in the profile", self.item))?;
        let mut item = item.clone();
        if let Some(hash) = self.bucket {
            item.bucket = BucketCategory::from_hash(BucketHash(hash));
        }
        Ok((source, item))
    }

    fn request(&self, snapshot: &AccountSnapshot) -> Result<TransferRequest> {
        let (source, item) = self.locate(snapshot)?;
        let target = self.drop_target()?.resolve(&item)?;
        Ok(TransferRequest::new(item, source, target))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let format = match cli.log_format {
        LogStyle::Json => LogFormat::Json,
        LogStyle::Pretty => LogFormat::Pretty,
    };
    vaultops_observability::init_with(format, directive);

    match cli.command {
        Commands::Plan { target, profile } => {
            let snapshot = load_snapshot(&profile).await?;
            let request = target.request(&snapshot)?;
            match TransferPlanner::new().plan(&request, &snapshot) {
                Ok(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
                Err(refusal) => println!("{}", Notice::from_refusal(&refusal)),
            }
        }
        Commands::Move { target, profile } => {
            let client = HttpMutationClient::from_env().context("configuring the account service client")?;
            let snapshot = match profile {
                Some(path) => load_snapshot(&path).await?,
                None => fetch_snapshot(&client).await?,
            };

            let (source, item) = target.locate(&snapshot)?;
            let drop_target = target.drop_target()?;
            let orchestrator = TransferOrchestrator::new(client);
            let mut session = DragSession::new();
            session.begin(item, source)?;
            let outcome = session.run_drop(&drop_target, &orchestrator, &snapshot).await?;

            let notice = Notice::from_outcome(&outcome);
            if notice.level == NoticeLevel::Error {
                bail!("{notice}");
            }
            println!("{notice}");
        }
        Commands::Loadout {
            character,
            items,
            profile,
        } => {
            let client = HttpMutationClient::from_env().context("configuring the account service client")?;
            let snapshot = match profile {
                Some(path) => load_snapshot(&path).await?,
                None => fetch_snapshot(&client).await?,
            };

            let plan = plan_loadout(&TransferPlanner::new(), &character, &items, &snapshot)?;
            execute_loadout(&client, &plan)
                .await
                .with_context(|| format!("equipping loadout on character {character}"))?;
            println!("Equipped {} items on character {character}", plan.item_ids.len());
        }
    }

    Ok(())
}

async fn load_snapshot(path: &Path) -> Result<AccountSnapshot> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading profile {}", path.display()))?;
    let profile: ProfileResponse = serde_json::from_str(&raw)
        .with_context(|| format!("parsing profile {}", path.display()))?;
    Ok(AccountSnapshot::from_profile(&profile))
}

async fn fetch_snapshot(client: &HttpMutationClient) -> Result<AccountSnapshot> {
    let profile = client.fetch_profile().await.context("fetching the live profile")?;
    tracing::debug!("loaded live profile");
    Ok(AccountSnapshot::from_profile(&profile))
}
