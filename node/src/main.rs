// This file is part of the Taiyi chain-core project.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use jsonrpsee::server::ServerBuilder;
use taiyi_mana::ChainParameters;
use taiyi_store::{Account, Database};
use taiyi_zone::ZoneParams;

use taiyi_node::chain::{boot, Benchmark};
use taiyi_node::cli::ChainArgs;
use taiyi_node::pipeline::{Writer, WriterConfig};
use taiyi_node::rpc::{ChainApiImpl, ChainApiServer};
use taiyi_node::vm::{NoopGrowZone, PassThroughVm};

const MAX_REQUEST_BODY_SIZE: u32 = 10 * 1024 * 1024;
const MAX_RESPONSE_BODY_SIZE: u32 = 10 * 1024 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = ChainArgs::parse();
    let outcome = boot(&args)?;
    let mut db: Database = outcome.db;

    if let Some(path) = &args.database_cfg {
        let cfg = taiyi_node::config::DatabaseCfg::load(path)?;
        log::info!(target: "taiyi-chain::boot", "database tuning loaded: {cfg:?}");
    }
    if args.check_locks {
        log::info!(target: "taiyi-chain::boot", "--check-locks: extra store locking assertions enabled");
    }
    if args.dump_memory_details {
        log::info!(target: "taiyi-chain::boot", "--dump-memory-details: per-index memory reporting enabled");
    }

    ensure_committee_account(&mut db, &args.committee_account);

    let benchmark = args.set_benchmark_interval.map(Benchmark::new);
    if let Some(bench) = &benchmark {
        bench.maybe_record(outcome.head_block_num, &db);
    }

    let (sender, receiver) = async_channel::unbounded();
    let (writer, shutdown) = Writer::new(
        db,
        Box::new(PassThroughVm::default()),
        Box::new(NoopGrowZone),
        ChainParameters::default(),
        ZoneParams::default(),
        args.committee_account.clone(),
        outcome.checkpoints,
        args.validate_database_invariants,
        WriterConfig::default(),
        receiver,
        outcome.head_block_time,
    );

    let writer_handle = std::thread::Builder::new()
        .name("taiyi-writer".into())
        .spawn(move || writer.run())
        .expect("failed to spawn writer thread");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let builder = ServerBuilder::new()
            .max_request_body_size(MAX_REQUEST_BODY_SIZE)
            .max_response_body_size(MAX_RESPONSE_BODY_SIZE);

        let addr = std::net::SocketAddr::new(args.rpc_addr, args.rpc_port);
        let server = builder.build(addr).await?;
        let api = ChainApiImpl::new(sender);
        let handle = server.start(api.into_rpc())?;

        log::info!(target: "taiyi-chain::rpc", "JSON-RPC listening on {addr}");

        tokio::signal::ctrl_c().await?;
        log::info!(target: "taiyi-chain::rpc", "shutdown requested, stopping JSON-RPC server");
        shutdown.request();
        let _ = handle.stop();
        handle.stopped().await;

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    log::info!(target: "taiyi-chain::writer", "waiting for writer thread to drain");
    match writer_handle.join() {
        Ok(()) => log::info!(target: "taiyi-chain::writer", "writer thread exited cleanly"),
        Err(_) => log::error!(target: "taiyi-chain::writer", "writer thread panicked during shutdown"),
    }
    Ok(())
}

/// Seeds the committee account on a fresh database so `create_zone` has
/// someone authorized to call it. Existing state (from a replay) already
/// has it.
fn ensure_committee_account(db: &mut Database, name: &str) {
    if db.find_account(&name.to_string()).is_none() {
        db.create_account(Account {
            name: name.to_string(),
            mana_bar: taiyi_mana::ManaBar::new(ChainParameters::default().default_max_mana, 0),
            qi_balance: 0,
        })
        .expect("committee account name was just checked to be free");
    }
}
