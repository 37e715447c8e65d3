//! Removal of conversations that have no `userId`, together with their messages.
//!
//! Messages are deleted before conversations, so an interrupted run leaves
//! at worst orphaned conversations without messages. Running again picks up
//! where the previous run stopped.

use serde::Serialize;
use std::io::{BufRead, Write};

use crate::error::CleanupError;
use crate::services::store::OrphanStore;

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;
pub const DEFAULT_BATCH_SIZE: usize = 1000;
const SEPARATOR_WIDTH: usize = 50;
const CONFIRMATION_WORD: &str = "yes";

#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub sample_limit: usize,
    pub batch_size: usize,
    pub dry_run: bool,
    pub assume_yes: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            assume_yes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupSummary {
    pub conversations_deleted: u64,
    pub messages_deleted: u64,
    pub remaining: u64,
}

impl CleanupSummary {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CleanupOutcome {
    AlreadyClean,
    DryRun { orphaned: u64 },
    Cancelled { orphaned: u64 },
    Completed(CleanupSummary),
}

pub struct Cleanup<'a, S: OrphanStore + ?Sized> {
    store: &'a S,
    options: CleanupOptions,
}

impl<'a, S: OrphanStore + ?Sized> Cleanup<'a, S> {
    pub fn new(store: &'a S, options: CleanupOptions) -> Self {
        Self { store, options }
    }

    /// Runs the sweep, writing progress to `out`. Unless `assume_yes` is set,
    /// one line is read from `input` and must be `yes` before anything is deleted.
    pub async fn run<W, R>(&self, out: &mut W, input: &mut R) -> Result<CleanupOutcome, CleanupError>
    where
        W: Write,
        R: BufRead,
    {
        writeln!(out, "Checking for conversations without userId...")?;

        let orphaned = self.store.count_orphaned_conversations().await?;
        writeln!(out, "Found {} conversations without userId", orphaned)?;
        tracing::info!(orphaned, "Counted conversations without userId");

        if orphaned == 0 {
            writeln!(out, "✓ No conversations without userId. Database is already clean.")?;
            return Ok(CleanupOutcome::AlreadyClean);
        }

        if self.options.sample_limit > 0 {
            let limit = i64::try_from(self.options.sample_limit).unwrap_or(i64::MAX);
            let samples = self.store.sample_orphaned_conversations(limit).await?;

            writeln!(out, "\nSample conversations without userId:")?;
            for sample in &samples {
                writeln!(
                    out,
                    "  - ID: {}, Title: {}, Created at: {}",
                    sample.id.to_hex(),
                    sample.title_or_placeholder(),
                    sample.created_at_rfc3339()
                )?;
            }
        }

        if self.options.dry_run {
            writeln!(out, "\nDry run: no records were deleted.")?;
            tracing::info!(orphaned, "Dry run finished");
            return Ok(CleanupOutcome::DryRun { orphaned });
        }

        writeln!(out, "\n⚠ WARNING: these conversations and their messages will be DELETED.")?;
        writeln!(out, "⚠ This operation cannot be undone.\n")?;

        if !self.options.assume_yes && !Self::confirm(out, input)? {
            writeln!(out, "✗ Cleanup cancelled.")?;
            tracing::info!(orphaned, "Cleanup cancelled at confirmation prompt");
            return Ok(CleanupOutcome::Cancelled { orphaned });
        }

        writeln!(out, "Starting cleanup...")?;

        let ids = self.store.orphaned_conversation_ids().await?;
        writeln!(out, "Collected {} conversation IDs", ids.len())?;

        writeln!(out, "Deleting associated messages...")?;
        let batch_size = self.options.batch_size.max(1);
        let mut messages_deleted = 0;
        for (index, batch) in ids.chunks(batch_size).enumerate() {
            let deleted = self.store.delete_messages_for(batch).await?;
            tracing::debug!(batch = index, ids = batch.len(), deleted, "Deleted message batch");
            messages_deleted += deleted;
        }
        writeln!(out, "✓ {} messages deleted", messages_deleted)?;

        writeln!(out, "Deleting conversations...")?;
        let conversations_deleted = self.store.delete_orphaned_conversations().await?;
        writeln!(out, "✓ {} conversations deleted", conversations_deleted)?;

        let remaining = self.store.count_orphaned_conversations().await?;
        let summary = CleanupSummary {
            conversations_deleted,
            messages_deleted,
            remaining,
        };
        write_summary(out, &summary)?;

        if summary.is_complete() {
            writeln!(out, "✓ Cleanup complete!")?;
            tracing::info!(conversations_deleted, messages_deleted, "Cleanup complete");
        } else {
            writeln!(out, "⚠ Conversations without userId remain. Run the cleanup again if needed.")?;
            tracing::warn!(remaining, "Cleanup finished with conversations still missing userId");
        }

        Ok(CleanupOutcome::Completed(summary))
    }

    fn confirm<W: Write, R: BufRead>(out: &mut W, input: &mut R) -> Result<bool, CleanupError> {
        write!(out, "Type '{}' to continue: ", CONFIRMATION_WORD)?;
        out.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }
        Ok(answer.trim().eq_ignore_ascii_case(CONFIRMATION_WORD))
    }
}

pub fn write_summary<W: Write>(out: &mut W, summary: &CleanupSummary) -> std::io::Result<()> {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    writeln!(out, "\n{}", separator)?;
    writeln!(out, "CLEANUP SUMMARY")?;
    writeln!(out, "{}", separator)?;
    writeln!(out, "Conversations deleted: {}", summary.conversations_deleted)?;
    writeln!(out, "Messages deleted: {}", summary.messages_deleted)?;
    writeln!(out, "Conversations without userId remaining: {}", summary.remaining)?;
    writeln!(out, "{}", separator)
}
