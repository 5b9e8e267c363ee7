use tracing::info;

/// 进度回调
///
/// `fraction` 位于 [0, 1]，`label` 描述刚完成的步骤
pub trait ProgressSink: Send {
    fn report(&mut self, fraction: f64, label: &str);
}

/// 忽略所有进度
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64, _label: &str) {}
}

/// 通过 tracing 输出进度
#[derive(Debug, Clone)]
pub struct TracingProgress {
    prefix: String,
}

impl TracingProgress {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ProgressSink for TracingProgress {
    fn report(&mut self, fraction: f64, label: &str) {
        info!("{} ⏳ {:>5.1}% {}", self.prefix, fraction * 100.0, label);
    }
}

/// 一次进度上报
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub fraction: f64,
    pub label: String,
}

/// 记录全部进度上报
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProgressTrail {
    entries: Vec<ProgressEntry>,
}

impl ProgressTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    pub fn fractions(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.fraction).collect()
    }

    pub fn into_entries(self) -> Vec<ProgressEntry> {
        self.entries
    }
}

impl ProgressSink for ProgressTrail {
    fn report(&mut self, fraction: f64, label: &str) {
        self.entries.push(ProgressEntry {
            fraction,
            label: label.to_string(),
        });
    }
}

/// 同时转发给两个接收者
pub struct Tee<'a> {
    first: &'a mut dyn ProgressSink,
    second: &'a mut dyn ProgressSink,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a mut dyn ProgressSink, second: &'a mut dyn ProgressSink) -> Self {
        Self { first, second }
    }
}

impl ProgressSink for Tee<'_> {
    fn report(&mut self, fraction: f64, label: &str) {
        self.first.report(fraction, label);
        self.second.report(fraction, label);
    }
}
