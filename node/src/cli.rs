//! Command-line surface for the chain-core service process
//! (`spec.md` §6): `#[derive(clap::Parser)]`, one flag per field.

use std::path::PathBuf;

use clap::Parser;

/// One `--checkpoint "[N,ID]"` assertion: block `N` must have id `ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub block_num: taiyi_primitives::BlockNumber,
    pub block_id: String,
}

impl std::str::FromStr for Checkpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        let (num, id) = trimmed
            .split_once(',')
            .ok_or_else(|| format!("expected \"[N,ID]\", got {s:?}"))?;
        let block_num = num
            .trim()
            .parse()
            .map_err(|e| format!("invalid block number in {s:?}: {e}"))?;
        Ok(Checkpoint {
            block_num,
            block_id: id.trim().to_string(),
        })
    }
}

/// Boot arguments for the chain-core service (`spec.md` §4.8, §6).
#[derive(Debug, Clone, Parser)]
#[command(name = "taiyi-node", version, about = "Taiyi chain-core service")]
pub struct ChainArgs {
    /// Path (absolute or relative to the data dir) for the state store.
    #[arg(long, default_value = "state")]
    pub state_storage_dir: PathBuf,

    /// Wipe state, re-apply the block log.
    #[arg(long)]
    pub replay_blockchain: bool,

    /// Wipe state and block log.
    #[arg(long)]
    pub resync_blockchain: bool,

    /// Exit success after applying block N.
    #[arg(long, value_name = "N")]
    pub stop_replay_at_block: Option<taiyi_primitives::BlockNumber>,

    /// Skip the environment check on open.
    #[arg(long)]
    pub force_open: bool,

    /// Assert block N has id ID. Repeatable.
    #[arg(long, value_name = "[N,ID]")]
    pub checkpoint: Vec<Checkpoint>,

    /// Snapshot every N blocks.
    #[arg(long, default_value_t = 10_000)]
    pub flush_state_interval: u32,

    /// Extra runtime assertions on store locking.
    #[arg(long)]
    pub check_locks: bool,

    /// Run supply/accounting invariants after each block.
    #[arg(long)]
    pub validate_database_invariants: bool,

    /// Enable per-index memory reporting.
    #[arg(long)]
    pub dump_memory_details: bool,

    /// Emit a benchmark every N blocks.
    #[arg(long, value_name = "N")]
    pub set_benchmark_interval: Option<u32>,

    /// Store tuning JSON.
    #[arg(long, value_name = "PATH")]
    pub database_cfg: Option<PathBuf>,

    /// Replay with indices in RAM.
    #[arg(long)]
    pub memory_replay: bool,

    /// Which indices to keep in RAM when `--memory-replay` is set.
    #[arg(long)]
    pub memory_replay_indices: Vec<String>,

    /// Address the JSON-RPC server binds to.
    #[arg(long, default_value = "127.0.0.1")]
    pub rpc_addr: std::net::IpAddr,

    /// Port the JSON-RPC server binds to.
    #[arg(long, default_value_t = 8090)]
    pub rpc_port: u16,

    /// Name of the account authorized to create zones directly
    /// (`spec.md` §4.5: the proposal/voting path for other accounts is
    /// out of scope).
    #[arg(long, default_value = "committee")]
    pub committee_account: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_parses_bracketed_pair() {
        let cp: Checkpoint = "[42,abc123]".parse().unwrap();
        assert_eq!(cp.block_num, 42);
        assert_eq!(cp.block_id, "abc123");
    }

    #[test]
    fn checkpoint_rejects_missing_comma() {
        assert!("[42]".parse::<Checkpoint>().is_err());
    }
}
