use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: &'static str,
    pub elapsed: Duration,
    pub memory_usage_mb: Option<u64>,
}

/// Per-check phase timing. Memory figures are only sampled with the `cli` feature.
pub struct RequestMonitor {
    enabled: bool,
    started: Instant,
    last_mark: Instant,
    phases: Vec<PhaseStats>,
    #[cfg(feature = "cli")]
    system: Option<(System, Pid)>,
}

impl RequestMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            started: now,
            last_mark: now,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            system: if enabled { Self::process_handle() } else { None },
        }
    }

    #[cfg(feature = "cli")]
    fn process_handle() -> Option<(System, Pid)> {
        let pid = sysinfo::get_current_pid().ok()?;
        Some((System::new_with_specifics(RefreshKind::everything()), pid))
    }

    #[cfg(feature = "cli")]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        let (system, pid) = self.system.as_mut()?;
        system.refresh_all();
        system.process(*pid).map(|p| p.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        None
    }

    /// Closes the current phase and logs it.
    pub fn mark(&mut self, phase: &'static str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_mark);
        self.last_mark = now;

        let memory_usage_mb = self.sample_memory_mb();
        match memory_usage_mb {
            Some(mb) => tracing::info!("📊 {} - Time: {:?}, Memory: {}MB", phase, elapsed, mb),
            None => tracing::info!("📊 {} - Time: {:?}", phase, elapsed),
        }

        self.phases.push(PhaseStats {
            phase,
            elapsed,
            memory_usage_mb,
        });
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.phases.iter().filter_map(|p| p.memory_usage_mb).max();
        match peak {
            Some(mb) => tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.started.elapsed(),
                mb
            ),
            None => tracing::info!("📊 Final Stats - Total Time: {:?}", self.started.elapsed()),
        }
    }

}

impl Default for RequestMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let mut monitor = RequestMonitor::default();
        monitor.mark("fetch");
        assert!(!monitor.enabled);
        assert!(monitor.phases.is_empty());
    }

    #[test]
    fn test_enabled_monitor_records_phases_in_order() {
        let mut monitor = RequestMonitor::new(true);
        monitor.mark("fetch");
        monitor.mark("parse");
        let names: Vec<&str> = monitor.phases.iter().map(|p| p.phase).collect();
        assert_eq!(names, vec!["fetch", "parse"]);
    }
}
