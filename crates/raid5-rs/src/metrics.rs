use std::sync::{Arc, OnceLock};

/// BlockSource says where a logical block was served from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockSource {
    Cache,
    Direct,
    Parity,
}

#[derive(Clone, Debug)]
pub struct DiskOp {
    pub disk_index: usize,
    pub bytes: u64,
    pub latency_seconds: f64,
    pub error: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct BlockOp {
    pub source: BlockSource,
    pub bytes: u64,
    pub latency_seconds: f64,
    pub error: bool,
}

pub trait MetricsSink: Send + Sync + 'static {
    fn record_disk_op(&self, op: DiskOp);
    fn record_block_op(&self, op: BlockOp);
}

static METRICS_SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

pub fn install_metrics_sink(sink: Arc<dyn MetricsSink>) -> bool {
    METRICS_SINK.set(sink).is_ok()
}

pub fn is_enabled() -> bool {
    METRICS_SINK.get().is_some()
}

pub fn record_disk_op(op: DiskOp) {
    if let Some(sink) = METRICS_SINK.get() {
        sink.record_disk_op(op);
    }
}

pub fn record_block_op(op: BlockOp) {
    if let Some(sink) = METRICS_SINK.get() {
        sink.record_block_op(op);
    }
}
