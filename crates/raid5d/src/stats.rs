use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use raid5_rs::metrics::{BlockOp, BlockSource, DiskOp, MetricsSink};

/// StatsSink aggregates disk and block events from every session.
#[derive(Debug, Default)]
pub struct StatsSink {
    disk_reads: AtomicU64,
    disk_errors: AtomicU64,
    disk_bytes: AtomicU64,
    cache_hits: AtomicU64,
    direct_loads: AtomicU64,
    parity_loads: AtomicU64,
    failed_loads: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatsSnapshot {
    pub disk_reads: u64,
    pub disk_errors: u64,
    pub disk_bytes: u64,
    pub cache_hits: u64,
    pub direct_loads: u64,
    pub parity_loads: u64,
    pub failed_loads: u64,
}

impl StatsSink {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            disk_reads: self.disk_reads.load(Ordering::Relaxed),
            disk_errors: self.disk_errors.load(Ordering::Relaxed),
            disk_bytes: self.disk_bytes.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            direct_loads: self.direct_loads.load(Ordering::Relaxed),
            parity_loads: self.parity_loads.load(Ordering::Relaxed),
            failed_loads: self.failed_loads.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for StatsSink {
    fn record_disk_op(&self, op: DiskOp) {
        self.disk_reads.fetch_add(1, Ordering::Relaxed);
        if op.error {
            self.disk_errors.fetch_add(1, Ordering::Relaxed);
        } else {
            self.disk_bytes.fetch_add(op.bytes, Ordering::Relaxed);
        }
    }

    fn record_block_op(&self, op: BlockOp) {
        if op.error {
            self.failed_loads.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let counter = match op.source {
            BlockSource::Cache => &self.cache_hits,
            BlockSource::Direct => &self.direct_loads,
            BlockSource::Parity => &self.parity_loads,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "disk_reads={}, disk_errors={}, disk_bytes={}, cache_hits={}, direct_loads={}, parity_loads={}, failed_loads={}",
            self.disk_reads,
            self.disk_errors,
            self.disk_bytes,
            self.cache_hits,
            self.direct_loads,
            self.parity_loads,
            self.failed_loads
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(source: BlockSource, error: bool) -> BlockOp {
        BlockOp {
            source,
            bytes: 4096,
            latency_seconds: 0.001,
            error,
        }
    }

    #[test]
    fn counts_block_sources_separately() {
        let sink = StatsSink::default();
        sink.record_block_op(block(BlockSource::Cache, false));
        sink.record_block_op(block(BlockSource::Cache, false));
        sink.record_block_op(block(BlockSource::Direct, false));
        sink.record_block_op(block(BlockSource::Parity, false));
        sink.record_block_op(block(BlockSource::Parity, true));

        let s = sink.snapshot();
        assert_eq!(s.cache_hits, 2);
        assert_eq!(s.direct_loads, 1);
        assert_eq!(s.parity_loads, 1);
        assert_eq!(s.failed_loads, 1);
    }

    #[test]
    fn failed_disk_reads_do_not_count_bytes() {
        let sink = StatsSink::default();
        for error in [false, true, false] {
            sink.record_disk_op(DiskOp {
                disk_index: 0,
                bytes: 512,
                latency_seconds: 0.0,
                error,
            });
        }

        let s = sink.snapshot();
        assert_eq!(s.disk_reads, 3);
        assert_eq!(s.disk_errors, 1);
        assert_eq!(s.disk_bytes, 1024);
    }

    #[test]
    fn snapshot_formats_as_key_value_pairs() {
        let text = StatsSnapshot::default().to_string();
        assert!(text.starts_with("disk_reads=0, "));
        assert!(text.ends_with("failed_loads=0"));
    }
}
