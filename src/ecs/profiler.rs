use bevy_ecs::prelude::Resource;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

#[derive(Clone, Copy, Debug)]
pub struct SystemTimingSummary {
    pub name: &'static str,
    pub last_ms: f32,
    pub window_average_ms: f32,
    pub max_ms: f32,
    pub samples: u64,
}

struct SystemTiming {
    recent: VecDeque<f32>,
    max_ms: f32,
    samples: u64,
}

impl SystemTiming {
    fn new(window: usize) -> Self {
        Self { recent: VecDeque::with_capacity(window), max_ms: 0.0, samples: 0 }
    }
}

/// Per-system wall-clock timings over a rolling window of frames.
#[derive(Resource)]
pub struct SystemProfiler {
    window: usize,
    timings: HashMap<&'static str, SystemTiming>,
}

impl SystemProfiler {
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1), timings: HashMap::new() }
    }

    pub fn scope(&mut self, name: &'static str) -> SystemProfileScope<'_> {
        SystemProfileScope { name, profiler: self, start: Instant::now() }
    }

    fn record(&mut self, name: &'static str, duration_ms: f32) {
        let window = self.window;
        let entry = self.timings.entry(name).or_insert_with(|| SystemTiming::new(window));
        if entry.recent.len() == window {
            entry.recent.pop_front();
        }
        entry.recent.push_back(duration_ms);
        entry.max_ms = entry.max_ms.max(duration_ms);
        entry.samples += 1;
    }

    pub fn summaries(&self) -> Vec<SystemTimingSummary> {
        let mut out: Vec<_> = self
            .timings
            .iter()
            .map(|(&name, timing)| {
                let count = timing.recent.len();
                let average = if count == 0 { 0.0 } else { timing.recent.iter().sum::<f32>() / count as f32 };
                SystemTimingSummary {
                    name,
                    last_ms: timing.recent.back().copied().unwrap_or(0.0),
                    window_average_ms: average,
                    max_ms: timing.max_ms,
                    samples: timing.samples,
                }
            })
            .collect();
        out.sort_by(|a, b| {
            b.window_average_ms.partial_cmp(&a.window_average_ms).unwrap_or(std::cmp::Ordering::Equal)
        });
        out
    }
}

impl Default for SystemProfiler {
    fn default() -> Self {
        Self::new(120)
    }
}

pub struct SystemProfileScope<'a> {
    name: &'static str,
    profiler: &'a mut SystemProfiler,
    start: Instant,
}

impl Drop for SystemProfileScope<'_> {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_secs_f32() * 1000.0;
        self.profiler.record(self.name, duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_window_drops_old_samples() {
        let mut profiler = SystemProfiler::new(2);
        profiler.record("sys", 1.0);
        profiler.record("sys", 3.0);
        profiler.record("sys", 5.0);
        let summary = profiler.summaries()[0];
        assert_eq!(summary.samples, 3);
        assert!((summary.window_average_ms - 4.0).abs() < 1e-6);
        assert_eq!(summary.max_ms, 5.0);
        assert_eq!(summary.last_ms, 5.0);
    }

    #[test]
    fn scope_records_on_drop() {
        let mut profiler = SystemProfiler::default();
        {
            let _span = profiler.scope("frame");
        }
        assert_eq!(profiler.summaries().len(), 1);
    }
}
