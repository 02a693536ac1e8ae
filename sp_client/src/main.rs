//! A terminal client for Stellar Poker tables.
//!
//! The client signs requests with a local Stellar key, dispatches typed
//! commands against the coordinator (and the table contract for betting),
//! and keeps the table view in sync with a background poller.

use anyhow::{Context, Result};
use pico_args::Arguments;
use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};

use sp_client::{
    commands::{Command, USAGE, parse_command},
    logging::{self, log_action_outcome},
    view::{describe_outcome, render_lobby, render_open_tables, render_table},
};
use stellar_poker::{
    ActionDispatcher, ClientConfig, ConfigOverrides, Coordinator, CoordinatorClient,
    DispatchSettings, GameState, GameStore, LocalKeySigner, PlayMode, StateReconciler,
    WalletSigner,
    bot::SimulatedOpponent,
    config::LedgerConfig,
    ledger::{LedgerSubmitter, StellarGateway},
    messages::CreateTableRequest,
};

const HELP: &str = "\
Play at a Stellar Poker table

USAGE:
  sp_client [OPTIONS]

OPTIONS:
  --coordinator URL     Coordinator URL  [env: COORDINATOR_URL, default: http://localhost:8080]
  --mode MODE           single | headsup | multi  [env: PLAY_MODE, default: single]
  --table ID            Table to attach to  [env: TABLE_ID]
  --create              Create a new table on startup

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  PLAYER_SECRET         Stellar secret seed (S...) used to sign requests (required)
  RUST_LOG              Log filter  [default: info,reqwest=warn,hyper=warn]
";

struct Args {
    coordinator: Option<String>,
    mode: Option<PlayMode>,
    table: Option<u32>,
    create: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        coordinator: pargs.opt_value_from_str("--coordinator")?,
        mode: pargs.opt_value_from_str("--mode")?,
        table: pargs.opt_value_from_str("--table")?,
        create: pargs.contains("--create"),
    };

    logging::init();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(ConfigOverrides {
        coordinator_url: args.coordinator,
        mode: args.mode,
        table_id: args.table,
    })
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let signer = Arc::new(
        LocalKeySigner::from_secret(&config.player_secret)
            .context("PLAYER_SECRET is not a usable Stellar secret seed")?,
    );
    let coordinator: Arc<dyn Coordinator> = Arc::new(
        CoordinatorClient::with_timeout(
            config.coordinator_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to build coordinator client")?,
    );
    let store = GameStore::new(GameState::new(config.table_id));

    let settings = DispatchSettings {
        mode: config.mode,
        allow_insecure_dev_auth: config.allow_insecure_dev_auth,
        buy_in: config.buy_in,
        solo_stack: config.solo_stack,
    };
    if settings.allow_insecure_dev_auth {
        tracing::warn!("ALLOW_INSECURE_DEV_AUTH is on: requests go out unsigned first");
    }

    let mut dispatcher = ActionDispatcher::new(
        Arc::clone(&coordinator),
        signer.clone(),
        store.clone(),
        settings,
    )
    .with_opponent(Arc::new(SimulatedOpponent::new(config.opponent_difficulty)));
    if let Some(ledger) = ledger_submitter(&config, coordinator.as_ref()).await {
        dispatcher = dispatcher.with_ledger(ledger);
    }

    println!(
        "Playing as {} in {} mode against {}",
        signer.address(),
        config.mode,
        config.coordinator_url
    );

    if args.create {
        let response = dispatcher
            .create_table(CreateTableRequest {
                max_players: None,
                solo: Some(config.mode.is_solo()),
                buy_in: Some(config.buy_in.to_string()),
            })
            .await
            .context("Failed to create table")?;
        println!("Created table {}", response.table_id);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconciler = StateReconciler::new(Arc::clone(&coordinator), store.clone(), config.mode)
        .with_interval(Duration::from_secs(config.poll_interval_secs));
    let poller = tokio::spawn(reconciler.run(shutdown_rx));

    print!("{}", render_table(&store.snapshot().await, signer.address(), config.mode));
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    prompt()?;
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&dispatcher, command, &line).await,
                    Err(e) => println!("{e}"),
                }
                prompt()?;
            }

            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    poller.await.context("Poller task panicked")?;
    println!("Bye.");
    Ok(())
}

/// Ledger access for on-chain betting, from the environment or the
/// coordinator's advertised chain config. `None` routes betting through the
/// coordinator instead.
async fn ledger_submitter(
    config: &ClientConfig,
    coordinator: &dyn Coordinator,
) -> Option<LedgerSubmitter> {
    if config.mode.is_solo() {
        return None;
    }

    let ledger = match &config.ledger {
        Some(ledger) => ledger.clone(),
        None => match coordinator.chain_config().await {
            Ok(chain) => LedgerConfig {
                rpc_url: chain.rpc_url,
                network_passphrase: chain.network_passphrase,
                contract_id: chain.poker_table_contract,
                confirm_attempts: stellar_poker::constants::DEFAULT_CONFIRM_ATTEMPTS,
                confirm_delay_ms: stellar_poker::constants::DEFAULT_CONFIRM_DELAY_MS,
            },
            Err(e) => {
                tracing::warn!(error = %e, "No chain config; betting goes through the coordinator");
                return None;
            }
        },
    };

    tracing::info!(
        rpc_url = %ledger.rpc_url,
        contract = %ledger.contract_id,
        "Betting goes on-chain"
    );
    let gateway = StellarGateway::new(ledger.rpc_url, ledger.network_passphrase, ledger.contract_id);
    Some(LedgerSubmitter::new(Arc::new(gateway)).with_polling(
        ledger.confirm_attempts,
        Duration::from_millis(ledger.confirm_delay_ms),
    ))
}

async fn execute(dispatcher: &ActionDispatcher, command: Command, line: &str) {
    let store = dispatcher.store();
    let local = dispatcher.local_address();
    let mode = dispatcher.settings().mode;

    match command {
        Command::Intent(intent) => {
            let table_id = store.read(|s| s.table_id).await;
            let result = dispatcher.dispatch(intent).await;
            log_action_outcome(table_id, line.trim(), result.as_ref());
            match result {
                Ok(outcome) => println!("{}", describe_outcome(&outcome)),
                Err(e) => println!("Error: {e}"),
            }
            print!("{}", render_table(&store.snapshot().await, local, mode));
        }
        Command::Create { max_players } => {
            let request = CreateTableRequest {
                max_players,
                solo: Some(mode.is_solo()),
                buy_in: Some(dispatcher.settings().buy_in.to_string()),
            };
            match dispatcher.create_table(request).await {
                Ok(response) => println!(
                    "Created table {} ({} seats)",
                    response.table_id, response.max_players
                ),
                Err(e) => println!("Error: {e}"),
            }
        }
        Command::Table(table_id) => match dispatcher.select_table(table_id).await {
            Ok(()) => println!("Switched to table {table_id}"),
            Err(e) => println!("Error: {e}"),
        },
        Command::Tables => match dispatcher.open_tables().await {
            Ok(tables) => println!("{}", render_open_tables(&tables)),
            Err(e) => println!("Error: {e}"),
        },
        Command::Lobby => match dispatcher.lobby().await {
            Ok(lobby) => print!("{}", render_lobby(&lobby)),
            Err(e) => println!("Error: {e}"),
        },
        Command::Committee => match dispatcher.committee_status().await {
            Ok(status) => println!(
                "Committee {}: {}/{} nodes healthy",
                status.status,
                status.healthy.iter().filter(|h| **h).count(),
                status.nodes
            ),
            Err(e) => println!("Error: {e}"),
        },
        Command::Chain => match dispatcher.chain_config().await {
            Ok(chain) => println!(
                "RPC {}\nNetwork {}\nContract {}",
                chain.rpc_url, chain.network_passphrase, chain.poker_table_contract
            ),
            Err(e) => println!("Error: {e}"),
        },
        Command::Show => print!("{}", render_table(&store.snapshot().await, local, mode)),
        Command::Help => println!("{USAGE}"),
        Command::Quit => {}
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
