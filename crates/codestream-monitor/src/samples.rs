//! Raw counter samples collected by the poller

use parking_lot::RwLock;

/// One counter reading: offset from sampler start plus the value read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Milliseconds since the sampler started
    pub offset_ms: u64,
    /// Counter value as read from the store
    pub value: u64,
}

impl Sample {
    /// Build a sample
    pub fn new(offset_ms: u64, value: u64) -> Self {
        Self { offset_ms, value }
    }
}

#[derive(Debug, Default)]
struct SampleSeries {
    chunks: Vec<Sample>,
    candidates: Vec<Sample>,
    clones: Vec<Sample>,
}

/// Point-in-time copy of all sample series
#[derive(Debug, Clone, Default)]
pub struct SampleSnapshot {
    /// Chunk-count samples, recorded while chunk processing is active
    pub chunks: Vec<Sample>,
    /// Candidate-count samples, recorded during candidate expansion
    pub candidates: Vec<Sample>,
    /// Clone-count samples, recorded in lockstep with `candidates`
    pub clones: Vec<Sample>,
}

/// Append-only sample series shared between the poller and the dashboard.
///
/// One lock covers all three series so the paired candidate/clone append is
/// atomic and a snapshot is internally consistent. Series grow for the
/// lifetime of the process; at one sample per poll interval that is
/// accepted.
#[derive(Debug, Default)]
pub struct SampleLog {
    series: RwLock<SampleSeries>,
}

impl SampleLog {
    /// Create an empty sample log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk-count sample
    pub fn push_chunks(&self, sample: Sample) {
        self.series.write().chunks.push(sample);
    }

    /// Append one candidate sample and one clone sample together
    pub fn push_expansion(&self, candidates: Sample, clones: Sample) {
        let mut series = self.series.write();
        series.candidates.push(candidates);
        series.clones.push(clones);
    }

    /// Point-in-time copy of all series for rendering
    pub fn snapshot(&self) -> SampleSnapshot {
        let series = self.series.read();
        SampleSnapshot {
            chunks: series.chunks.clone(),
            candidates: series.candidates.clone(),
            clones: series.clones.clone(),
        }
    }
}
