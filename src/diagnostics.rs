//! An optional diagnostics sink passed explicitly into the brain at
//! construction, rather than written through a process-wide global.

/// receives free-form diagnostic lines from a brain (model desyncs,
/// recoverable server rejections, deadlock exits). per-brain and cleanly
/// disposable, unlike a process-wide singleton.
pub trait DiagnosticsSink: Send {
    fn record(&self, line: &str);
}

/// the default: diagnostics are discarded
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _line: &str) {}
}

/// forwards to the `log` facade at `debug` level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn record(&self, line: &str) {
        log::debug!("{line}");
    }
}
