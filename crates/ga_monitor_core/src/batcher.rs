use monitor_logging::{monitor_debug, monitor_warn};

use crate::{Batch, ProgressSnapshot};

/// Number of poll ticks coalesced into one render.
pub const BATCH_SIZE: usize = 10;

/// Coalesces progress snapshots into batches to bound render frequency.
///
/// A batch is emitted every `batch_size` pushes, or immediately when the pushed
/// snapshot is the completed one. The tick counter is monotonic across
/// emissions; only its remainder matters.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBatcher {
    batch_size: u64,
    ticks: u64,
    pending: Vec<ProgressSnapshot>,
}

impl Default for UpdateBatcher {
    fn default() -> Self {
        Self::new(BATCH_SIZE)
    }
}

impl UpdateBatcher {
    /// A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size: batch_size as u64,
            ticks: 0,
            pending: Vec::with_capacity(batch_size),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size as usize
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn push(&mut self, snapshot: ProgressSnapshot) -> Option<Batch> {
        let completed = snapshot.completed;
        self.pending.push(snapshot);
        self.ticks += 1;

        if self.ticks % self.batch_size == 0 || completed {
            self.flush()
        } else {
            None
        }
    }

    /// Drains whatever is buffered, e.g. when a job ends without a completed snapshot.
    pub fn finish(&mut self) -> Option<Batch> {
        self.flush()
    }

    /// Throws away buffered snapshots and returns how many there were.
    pub fn discard(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        if discarded > 0 {
            monitor_debug!("Discarded {} buffered snapshots", discarded);
        }
        discarded
    }

    fn flush(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            return None;
        }

        let (snapshots, malformed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(ProgressSnapshot::is_renderable);

        for snapshot in &malformed {
            monitor_warn!(
                "Skipping snapshot for generation {} due to missing or incomplete fitness data",
                snapshot.current_generation
            );
        }

        if snapshots.is_empty() {
            monitor_warn!(
                "Batch at tick {} had no renderable snapshots ({} dropped)",
                self.ticks,
                malformed.len()
            );
            return None;
        }

        monitor_debug!(
            "Flushing batch of {} snapshots at tick {}",
            snapshots.len(),
            self.ticks
        );
        Some(Batch {
            snapshots,
            dropped: malformed.len(),
            tick: self.ticks,
        })
    }
}
