use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cumulative time and call count per named section.
#[derive(Default)]
pub struct Profiler {
    pub timings: HashMap<&'static str, (Duration, u32)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        let entry = self.timings.entry(guard.name).or_default();
        entry.0 += guard.start.elapsed();
        entry.1 += 1;
    }

    /// Sections ordered by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, Duration, u32)> {
        let mut v: Vec<_> = self.timings.iter().map(|(n, (d, c))| (*n, *d, *c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, total, calls) in self.report_sorted() {
            log::info!("{:<20} {:>10?} over {} call(s)", name, total, calls);
        }
        self.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. Returns a guard that will update the global
/// profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Macro helper to profile a scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_orders_sections_by_total_time() {
        let mut profiler = Profiler::new();
        profiler.timings.insert("fast", (Duration::from_millis(1), 4));
        profiler.timings.insert("slow", (Duration::from_millis(9), 1));
        let report = profiler.report_sorted();
        assert_eq!(report[0].0, "slow");
        assert_eq!(report[1], ("fast", Duration::from_millis(1), 4));

        profiler.log_and_clear();
        assert!(profiler.timings.is_empty());
    }

    #[test]
    fn finishing_a_guard_accumulates() {
        let mut profiler = Profiler::new();
        let guard = start("section");
        profiler.finish(&guard);
        profiler.finish(&guard);
        assert_eq!(profiler.timings["section"].1, 2);
    }
}
