//! Log Service
//!
//! Turns decoded records into store operations. Each operation projects its
//! records onto the kind's schema, stamps a server timestamp where the kind
//! carries one, and hands rows to the [`BatchWriter`]. Task records are
//! upserted by subject id through the [`UpsertLocator`].

use std::fmt;
use std::sync::Arc;

use tasklog_core::{
    ensure_timestamp, project_record, BlockRecord, Clock, Record, RowPosition, SystemClock,
    TaskRecord, TimestampSlot, TrialRecord, BLOCK_SCHEMA, TASK_SCHEMA, TRIAL_SCHEMA,
};
use tasklog_storage::{BatchWriter, Located, StoreError, StoreResult, TabularStore, UpsertLocator};

use crate::locks::SubjectLocks;
use crate::types::BlockCommitRequest;

/// What a task upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated(RowPosition),
    Appended,
}

/// The parts of a block commit, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPart {
    Trials,
    Block,
    Task,
}

impl CommitPart {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitPart::Trials => "trials",
            CommitPart::Block => "block",
            CommitPart::Task => "task",
        }
    }
}

impl fmt::Display for CommitPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed block-commit part. Displays as `part: message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFailure {
    pub part: CommitPart,
    pub error: StoreError,
}

impl fmt::Display for PartFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.part, self.error)
    }
}

/// Result of a block commit. Parts that failed do not stop the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockCommitOutcome {
    pub trials_added: usize,
    pub failures: Vec<PartFailure>,
}

impl BlockCommitOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Tagged messages, one per failed part.
    pub fn error_messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    fn record(&mut self, part: CommitPart, error: StoreError) {
        tracing::error!(part = part.as_str(), error = %error, "Block commit part failed");
        self.failures.push(PartFailure { part, error });
    }
}

/// Request orchestrator shared by all handlers.
pub struct LogService {
    writer: BatchWriter,
    locator: UpsertLocator,
    clock: Arc<dyn Clock>,
    subject_locks: SubjectLocks,
}

impl LogService {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TabularStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            writer: BatchWriter::new(Arc::clone(&store)),
            locator: UpsertLocator::new(store),
            clock,
            subject_locks: SubjectLocks::new(),
        }
    }

    /// Append one trial row.
    pub async fn log_trial(&self, mut trial: TrialRecord) -> StoreResult<()> {
        self.stamp(&mut trial);
        self.writer
            .append_one(&TRIAL_SCHEMA, project_record(&trial))
            .await
    }

    /// Append all trials in one store call. Returns the rows written.
    pub async fn log_trials_bulk(&self, trials: Vec<TrialRecord>) -> StoreResult<usize> {
        let rows = trials
            .into_iter()
            .map(|mut trial| {
                self.stamp(&mut trial);
                project_record(&trial)
            })
            .collect();
        self.writer.append_many(&TRIAL_SCHEMA, rows).await
    }

    /// Append one block summary row. Blocks carry no server timestamp.
    pub async fn log_block(&self, block: BlockRecord) -> StoreResult<()> {
        self.writer
            .append_one(&BLOCK_SCHEMA, project_record(&block))
            .await
    }

    /// Overwrite the subject's task row, or append one if none exists.
    ///
    /// A record without a usable `sub_id` is appended without a lookup.
    pub async fn upsert_task(&self, mut task: TaskRecord) -> StoreResult<UpsertOutcome> {
        self.stamp(&mut task);
        let row = project_record(&task);

        let key = task
            .sub_id()
            .filter(|id| !id.is_blank())
            .map(|id| id.stored_key_text());
        let Some(key) = key else {
            tracing::warn!(table = TASK_SCHEMA.table(), "Task record without sub_id, appending");
            self.writer.append_one(&TASK_SCHEMA, row).await?;
            return Ok(UpsertOutcome::Appended);
        };

        let _subject = self.subject_locks.acquire(&key).await;
        let located = self
            .locator
            .locate(TASK_SCHEMA.table(), TASK_SCHEMA.key_column(), &key)
            .await?;
        match located {
            Located::Found(position) => {
                self.writer.overwrite_row(&TASK_SCHEMA, position, row).await?;
                tracing::debug!(sub_id = %key, %position, "Updated task row");
                Ok(UpsertOutcome::Updated(position))
            }
            Located::NotFound => {
                self.writer.append_one(&TASK_SCHEMA, row).await?;
                tracing::debug!(sub_id = %key, "Appended task row");
                Ok(UpsertOutcome::Appended)
            }
        }
    }

    /// Trials, then block, then task. Every present part runs even when an
    /// earlier one failed.
    pub async fn commit_block(&self, request: BlockCommitRequest) -> BlockCommitOutcome {
        let mut outcome = BlockCommitOutcome::default();

        match self.log_trials_bulk(request.trials).await {
            Ok(added) => outcome.trials_added = added,
            Err(error) => outcome.record(CommitPart::Trials, error),
        }

        if let Some(block) = request.block {
            if let Err(error) = self.log_block(block).await {
                outcome.record(CommitPart::Block, error);
            }
        }

        if let Some(task) = request.task {
            if let Err(error) = self.upsert_task(task).await {
                outcome.record(CommitPart::Task, error);
            }
        }

        outcome
    }

    fn stamp<T: TimestampSlot>(&self, record: &mut T) {
        ensure_timestamp(record, self.clock.as_ref());
    }
}
