//! The write pipeline (`spec.md` §4.7, component C7): a single writer
//! thread draining a queue of `WriteContext` items. Each request variant
//! carries the `oneshot::Sender` the caller blocks on, and requests travel
//! over an `async_channel` to the writer thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_channel::TryRecvError;
use futures_channel::oneshot;
use taiyi_evaluator::{EvalContext, Operation};
use taiyi_mana::ChainParameters;
use taiyi_primitives::{
    AccountName, BlockNumber, ChainError, ChainResult, Time, TransactionId,
};
use taiyi_store::{Database, TransactionObject};
use taiyi_traits::{ContractVm, NfaAffected, PublicKey};
use taiyi_zone::{GrowZone, ZoneParams};

use crate::wire::{BlockGenerator, SignedBlock, SignedTransaction, SkipFlags};

pub type WriteSender = async_channel::Sender<WriteContext>;
pub type WriteReceiver = async_channel::Receiver<WriteContext>;

/// One request on the write queue (`spec.md` §4.7's tagged union). The
/// `promise` field is the single-shot channel `enqueue_write`'s contract
/// describes: "caller fills a context, pushes, and waits on a single-shot
/// promise held in the context; the writer stores success/except in the
/// context and fulfils the promise."
pub enum WriteContext {
    PushBlock {
        block: SignedBlock,
        skip: SkipFlags,
        promise: oneshot::Sender<ChainResult<WriteOutcome>>,
    },
    PushTransaction {
        transaction: SignedTransaction,
        promise: oneshot::Sender<ChainResult<WriteOutcome>>,
    },
    GenerateBlock {
        when: Time,
        witness: AccountName,
        signing_key: PublicKey,
        skip: SkipFlags,
        promise: oneshot::Sender<ChainResult<WriteOutcome>>,
    },
}

/// What a successfully applied `WriteContext` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    BlockApplied {
        block_num: BlockNumber,
        affected: Vec<NfaAffected>,
    },
    TransactionApplied {
        trx_id: TransactionId,
        affected: Vec<NfaAffected>,
    },
    BlockGenerated {
        block: SignedBlock,
    },
}

fn now_secs() -> Time {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the Unix epoch")
        .as_secs()
}

async fn round_trip(
    sender: &WriteSender,
    build: impl FnOnce(oneshot::Sender<ChainResult<WriteOutcome>>) -> WriteContext,
) -> ChainResult<WriteOutcome> {
    let (promise, response) = oneshot::channel();
    sender
        .send(build(promise))
        .await
        .map_err(|_| ChainError::ingress("writer thread is no longer accepting requests"))?;
    response
        .await
        .map_err(|_| ChainError::ingress("writer dropped the request without a response"))?
}

/// `enqueue_write` for a block (`spec.md` §4.7).
pub async fn push_block(
    sender: &WriteSender,
    block: SignedBlock,
    skip: SkipFlags,
) -> ChainResult<WriteOutcome> {
    round_trip(sender, |promise| WriteContext::PushBlock { block, skip, promise }).await
}

/// `enqueue_write` for a transaction (`spec.md` §4.7).
pub async fn push_transaction(
    sender: &WriteSender,
    transaction: SignedTransaction,
) -> ChainResult<WriteOutcome> {
    round_trip(sender, |promise| WriteContext::PushTransaction {
        transaction,
        promise,
    })
    .await
}

/// `enqueue_write` for block generation (`spec.md` §4.7).
pub async fn generate_block(
    sender: &WriteSender,
    when: Time,
    witness: AccountName,
    signing_key: PublicKey,
    skip: SkipFlags,
) -> ChainResult<WriteOutcome> {
    round_trip(sender, |promise| WriteContext::GenerateBlock {
        when,
        witness,
        signing_key,
        skip,
        promise,
    })
    .await
}

/// Tunables for the sync/live mode state machine (`spec.md` §4.7).
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Live mode: how long a single write-lock hold may drain the queue
    /// before releasing it.
    pub live_hold_time: Duration,
    /// Block acceptance: how far into the future a block timestamp may be.
    pub allow_future_time: Time,
    /// Sync mode is exited once `now - head_block_time` drops below this.
    pub sync_exit_threshold: Time,
    /// Live mode: sleep between lock-hold windows.
    pub live_sleep: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            live_hold_time: Duration::from_millis(500),
            allow_future_time: 5,
            sync_exit_threshold: 60,
            live_sleep: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sync,
    Live,
}

/// A handle external code uses to request shutdown (`spec.md` §5:
/// "a shutdown signal flips `running` to false").
#[derive(Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn request(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// The single writer: the sole owner of `Database` (`spec.md` §5,
/// "single-writer, many-readers"). Everything else reaches it only through
/// `WriteContext` messages.
pub struct Writer {
    db: Database,
    vm: Box<dyn ContractVm + Send>,
    grower: Box<dyn GrowZone + Send>,
    block_generator: Option<Box<dyn BlockGenerator + Send>>,
    mana_params: ChainParameters,
    zone_params: ZoneParams,
    committee_account: AccountName,
    checkpoints: std::collections::BTreeMap<BlockNumber, String>,
    validate_invariants: bool,
    config: WriterConfig,
    receiver: WriteReceiver,
    running: Arc<AtomicBool>,
    mode: Mode,
    head_block_time: Time,
}

#[allow(clippy::too_many_arguments)]
impl Writer {
    pub fn new(
        db: Database,
        vm: Box<dyn ContractVm + Send>,
        grower: Box<dyn GrowZone + Send>,
        mana_params: ChainParameters,
        zone_params: ZoneParams,
        committee_account: AccountName,
        checkpoints: std::collections::BTreeMap<BlockNumber, String>,
        validate_invariants: bool,
        config: WriterConfig,
        receiver: WriteReceiver,
        head_block_time: Time,
    ) -> (Self, ShutdownHandle) {
        let running = Arc::new(AtomicBool::new(true));
        let writer = Self {
            db,
            vm,
            grower,
            block_generator: None,
            mana_params,
            zone_params,
            committee_account,
            checkpoints,
            validate_invariants,
            config,
            receiver,
            running: running.clone(),
            mode: Mode::Sync,
            head_block_time,
        };
        (writer, ShutdownHandle(running))
    }

    pub fn register_block_generator(&mut self, generator: Box<dyn BlockGenerator + Send>) {
        self.block_generator = Some(generator);
    }

    /// Runs the writer loop until shutdown is requested or the channel
    /// closes. Intended to be driven from a dedicated OS thread
    /// (`spec.md` §5: "exactly one dedicated thread performs all mutating
    /// operations"), not polled cooperatively.
    pub fn run(mut self) {
        loop {
            let shutdown = match self.mode {
                Mode::Sync => self.drive_sync(),
                Mode::Live => self.drive_live(),
            };
            if shutdown {
                log::info!(target: "taiyi-chain::writer", "writer thread shutting down");
                return;
            }
        }
    }

    fn should_exit_sync(&self) -> bool {
        now_secs().saturating_sub(self.head_block_time) < self.config.sync_exit_threshold
    }

    /// Sync mode: "busy-wait the queue and drain greedily; no deliberate
    /// yielding" (`spec.md` §4.7).
    fn drive_sync(&mut self) -> bool {
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return true;
            }
            match self.receiver.try_recv() {
                Ok(ctx) => self.handle(ctx),
                Err(TryRecvError::Empty) => {
                    if self.should_exit_sync() {
                        self.mode = Mode::Live;
                        return false;
                    }
                }
                Err(TryRecvError::Closed) => return true,
            }
        }
    }

    /// Live mode: "drain items until either the queue is empty or the
    /// configurable hold time has elapsed; release the lock; sleep 10 ms;
    /// repeat" (`spec.md` §4.7).
    fn drive_live(&mut self) -> bool {
        let deadline = Instant::now() + self.config.live_hold_time;
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return true;
            }
            match self.receiver.try_recv() {
                Ok(ctx) => self.handle(ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => return true,
            }
            if Instant::now() >= deadline {
                break;
            }
        }
        std::thread::sleep(self.config.live_sleep);
        false
    }

    fn handle(&mut self, ctx: WriteContext) {
        match ctx {
            WriteContext::PushBlock { block, skip, promise } => {
                let result = self.apply_block(&block, skip);
                let _ = promise.send(result);
            }
            WriteContext::PushTransaction { transaction, promise } => {
                let now = now_secs();
                let result = self
                    .apply_transaction(&transaction, now)
                    .map(|affected| WriteOutcome::TransactionApplied {
                        trx_id: transaction.trx_id,
                        affected,
                    });
                let _ = promise.send(result);
            }
            WriteContext::GenerateBlock {
                when,
                witness,
                signing_key,
                skip,
                promise,
            } => {
                let result = self.generate_block(when, &witness, &signing_key, skip);
                let _ = promise.send(result);
            }
        }
    }

    fn apply_operations(&mut self, operations: &[Operation], now: Time) -> ChainResult<Vec<NfaAffected>> {
        let mut affected = Vec::new();
        for op in operations {
            let mut ctx = EvalContext {
                db: &mut self.db,
                vm: self.vm.as_ref(),
                grower: self.grower.as_ref(),
                mana_params: &self.mana_params,
                zone_params: &self.zone_params,
                committee_account: &self.committee_account,
                now,
            };
            let result = taiyi_evaluator::apply_operation(&mut ctx, op)?;
            affected.extend(result.affected);
        }
        Ok(affected)
    }

    fn apply_transaction(&mut self, trx: &SignedTransaction, now: Time) -> ChainResult<Vec<NfaAffected>> {
        if self.db.transaction_exists(&trx.trx_id) {
            return Err(ChainError::ingress(format!(
                "transaction {:?} already known",
                trx.trx_id
            )));
        }
        self.db.purge_expired_transactions(now);
        let affected = self.apply_operations(&trx.operations, now)?;
        self.db.insert_transaction(TransactionObject {
            trx_id: trx.trx_id,
            // Wire encoding of transactions is out of scope (`spec.md` §1
            // Non-goals); only `trx_id`/`expiration` are needed to detect
            // duplicates.
            packed: Vec::new(),
            expiration: trx.expiration,
        })?;
        Ok(affected)
    }

    fn apply_block(&mut self, block: &SignedBlock, skip: SkipFlags) -> ChainResult<WriteOutcome> {
        let now = now_secs();
        if block.timestamp > now + self.config.allow_future_time {
            return Err(ChainError::ingress(format!(
                "block {} timestamp {} is more than {}s in the future",
                block.block_num, block.timestamp, self.config.allow_future_time
            )));
        }
        if let Some(expected) = self.checkpoints.get(&block.block_num) {
            if expected != &block.block_id {
                return Err(ChainError::validation(format!(
                    "checkpoint mismatch at block {}: expected {expected}, got {}",
                    block.block_num, block.block_id
                )));
            }
        }

        let _ = skip.skip_transaction_signatures; // signature recovery happens upstream of this crate

        let mut affected = Vec::new();
        for trx in &block.transactions {
            affected.extend(self.apply_transaction(trx, block.timestamp)?);
        }

        let ticked =
            taiyi_nfa::process_nfa_tick(&mut self.db, self.vm.as_ref(), &self.mana_params, block.timestamp)?;
        log::debug!(
            target: "taiyi-chain::writer",
            "block {} applied: {} transaction(s), {} NFA(s) ticked",
            block.block_num,
            block.transactions.len(),
            ticked,
        );

        self.head_block_time = block.timestamp;
        if self.validate_invariants {
            self.assert_invariants()?;
        }

        Ok(WriteOutcome::BlockApplied {
            block_num: block.block_num,
            affected,
        })
    }

    fn generate_block(
        &mut self,
        when: Time,
        witness: &AccountName,
        signing_key: &PublicKey,
        skip: SkipFlags,
    ) -> ChainResult<WriteOutcome> {
        let block = self
            .block_generator
            .as_deref()
            .ok_or_else(|| ChainError::ingress("no block generator is registered"))?
            .generate_block(when, witness, signing_key, skip)?;
        self.apply_block(&block, skip)?;
        Ok(WriteOutcome::BlockGenerated { block })
    }

    /// `--validate-database-invariants` (`spec.md` §6, §8 property 3/4):
    /// re-checks the invariants the store already enforces on every
    /// mutation, as a defense against a future bug breaking one of them
    /// silently.
    fn assert_invariants(&self) -> ChainResult<()> {
        for (id, nfa) in self.db.nfa_iter() {
            if nfa.mana_bar.current_mana < 0 || nfa.mana_bar.current_mana > nfa.mana_bar.max_mana {
                return Err(ChainError::validation(format!(
                    "nfa {id} mana bar out of range"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_store::{Account, Nfa};
    use taiyi_traits::{ScriptTable, ScriptValue, VmContext};
    use taiyi_zone::GrowZone;

    struct NoopVm;
    impl ContractVm for NoopVm {
        fn run_contract_function(
            &self,
            _caller: &AccountName,
            _function: &str,
            _args: &[ScriptValue],
            _account_data: &mut ScriptTable,
            _sigkeys: &[PublicKey],
            _vm_drops: &mut i64,
            _reset_vm_memused: bool,
            _context: &mut VmContext,
        ) -> ChainResult<ScriptTable> {
            Ok(ScriptTable::new())
        }

        fn has_function(&self, _contract: &ScriptTable, _function: &str) -> bool {
            false
        }

        fn initialize_base_env(&self) -> VmContext {
            VmContext::new(())
        }
    }

    struct NoopGrower;
    impl GrowZone for NoopGrower {
        fn grow_zone(&self, _db: &mut Database, _zone_id: u64) -> ChainResult<()> {
            Ok(())
        }
    }

    fn new_writer(receiver: WriteReceiver) -> Writer {
        let mut db = Database::new();
        db.create_account(Account {
            name: "alice".into(),
            mana_bar: taiyi_mana::ManaBar::new(1_000_000, 0),
            qi_balance: 0,
        })
        .unwrap();
        let (writer, _shutdown) = Writer::new(
            db,
            Box::new(NoopVm),
            Box::new(NoopGrower),
            ChainParameters::default(),
            ZoneParams::default(),
            "alice".into(),
            Default::default(),
            false,
            WriterConfig::default(),
            receiver,
            0,
        );
        writer
    }

    #[test]
    fn rejects_block_too_far_in_the_future() {
        let (_tx, rx) = async_channel::unbounded();
        let mut writer = new_writer(rx);
        let block = SignedBlock {
            block_num: 1,
            block_id: "b1".into(),
            timestamp: now_secs() + 1_000_000,
            transactions: vec![],
        };
        assert!(writer.apply_block(&block, SkipFlags::default()).is_err());
    }

    #[test]
    fn rejects_checkpoint_mismatch() {
        let (_tx, rx) = async_channel::unbounded();
        let mut writer = new_writer(rx);
        writer.checkpoints.insert(1, "expected-id".into());
        let block = SignedBlock {
            block_num: 1,
            block_id: "wrong-id".into(),
            timestamp: 0,
            transactions: vec![],
        };
        assert!(writer.apply_block(&block, SkipFlags::default()).is_err());
    }

    #[test]
    fn applies_empty_block_and_advances_head_time() {
        let (_tx, rx) = async_channel::unbounded();
        let mut writer = new_writer(rx);
        let block = SignedBlock {
            block_num: 1,
            block_id: "b1".into(),
            timestamp: 42,
            transactions: vec![],
        };
        let outcome = writer.apply_block(&block, SkipFlags::default()).unwrap();
        assert!(matches!(outcome, WriteOutcome::BlockApplied { block_num: 1, .. }));
        assert_eq!(writer.head_block_time, 42);
    }

    #[test]
    fn rejects_duplicate_transaction_id() {
        let (_tx, rx) = async_channel::unbounded();
        let mut writer = new_writer(rx);
        let trx = SignedTransaction {
            trx_id: [7u8; 20],
            expiration: 1_000,
            sigkeys: vec![],
            operations: vec![],
        };
        writer.apply_transaction(&trx, 0).unwrap();
        assert!(writer.apply_transaction(&trx, 0).is_err());
    }

    #[test]
    fn generate_block_fails_without_registered_generator() {
        let (_tx, rx) = async_channel::unbounded();
        let mut writer = new_writer(rx);
        let result = writer.generate_block(0, &"alice".to_string(), &PublicKey(String::new()), SkipFlags::default());
        assert!(result.is_err());
    }

    #[test]
    fn round_trip_push_block_through_channel() {
        let (tx, rx) = async_channel::unbounded();
        let writer = new_writer(rx);
        let handle = std::thread::spawn(move || writer.run());

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let outcome = rt.block_on(push_block(
            &tx,
            SignedBlock {
                block_num: 1,
                block_id: "b1".into(),
                timestamp: 0,
                transactions: vec![],
            },
            SkipFlags::default(),
        ));
        assert!(matches!(outcome, Ok(WriteOutcome::BlockApplied { block_num: 1, .. })));

        drop(tx);
        handle.join().unwrap();
    }
}
