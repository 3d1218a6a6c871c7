//! # System Scheduler
//!
//! Systems are registered once in a declarative table and driven by
//! accumulated simulation time: a system with frequency `f` runs when
//! at least `1/f` seconds have elapsed since its last invocation, and
//! receives that elapsed time as its delta. Table order is invocation
//! order within a tick, and a system runs at most once per tick.

use std::time::{Duration, Instant};

/// Comparison slack so accumulated f32 phase does not miss a period by
/// one ULP.
const PHASE_SLACK: f32 = 1e-5;

/// Per-system runtime accounting, cheap enough to keep always-on.
#[derive(Clone, Copy, Debug)]
pub struct SystemStats {
    /// Registered system name.
    pub name: &'static str,
    /// Whether the system is currently enabled.
    pub enabled: bool,
    /// Configured frequency in Hz (<= 0 means every tick).
    pub frequency_hz: f32,
    /// Total invocations since registration.
    pub calls: u64,
    /// Total wall time spent inside the system.
    pub total_time: Duration,
    /// Observed invocation rate over the scheduler's lifetime.
    pub effective_hz: f32,
}

struct SystemEntry<Ctx> {
    name: &'static str,
    frequency_hz: f32,
    enabled: bool,
    run: fn(&mut Ctx, f32),
    /// Simulation time of the last invocation.
    last_run: f32,
    calls: u64,
    total_time: Duration,
}

/// Frequency-driven system scheduler.
///
/// Generic over the context handed to every system, so the substrate
/// crate never needs to know what a "world" is.
pub struct Scheduler<Ctx> {
    systems: Vec<SystemEntry<Ctx>>,
    sim_time: f32,
    ticks: u64,
}

impl<Ctx> Default for Scheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Scheduler<Ctx> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            sim_time: 0.0,
            ticks: 0,
        }
    }

    /// Registers a system at the end of the table.
    ///
    /// Registration order is execution order; register producers before
    /// their consumers.
    pub fn register(&mut self, name: &'static str, frequency_hz: f32, run: fn(&mut Ctx, f32)) {
        self.systems.push(SystemEntry {
            name,
            frequency_hz,
            enabled: true,
            run,
            last_run: 0.0,
            calls: 0,
            total_time: Duration::ZERO,
        });
    }

    /// Enables or disables a system by name. Returns `false` when no
    /// system with that name exists.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        for entry in &mut self.systems {
            if entry.name == name {
                entry.enabled = enabled;
                return true;
            }
        }
        false
    }

    /// Changes a system's frequency. Returns `false` when no system
    /// with that name exists.
    pub fn set_frequency(&mut self, name: &str, frequency_hz: f32) -> bool {
        for entry in &mut self.systems {
            if entry.name == name {
                entry.frequency_hz = frequency_hz;
                return true;
            }
        }
        false
    }

    /// Total simulated seconds accumulated so far.
    #[inline]
    #[must_use]
    pub const fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Number of ticks processed.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances simulation time by `dt` and runs every system whose
    /// period has elapsed, in table order.
    ///
    /// A system receives the time elapsed since *its* last invocation,
    /// not the tick `dt`, so low-frequency systems see proportionally
    /// larger deltas. A system runs at most once per tick: there is no
    /// burst catch-up after a stall, the phase simply resets.
    pub fn tick(&mut self, ctx: &mut Ctx, dt: f32) {
        self.sim_time += dt;
        self.ticks += 1;

        for entry in &mut self.systems {
            if !entry.enabled {
                continue;
            }
            let elapsed = self.sim_time - entry.last_run;
            let period = if entry.frequency_hz > 0.0 {
                1.0 / entry.frequency_hz
            } else {
                0.0
            };
            if elapsed + PHASE_SLACK >= period {
                let started = Instant::now();
                (entry.run)(ctx, elapsed);
                entry.total_time += started.elapsed();
                entry.calls += 1;
                entry.last_run = self.sim_time;
            }
        }
    }

    /// Snapshot of per-system accounting.
    #[must_use]
    pub fn stats(&self) -> Vec<SystemStats> {
        self.systems
            .iter()
            .map(|entry| SystemStats {
                name: entry.name,
                enabled: entry.enabled,
                frequency_hz: entry.frequency_hz,
                calls: entry.calls,
                total_time: entry.total_time,
                effective_hz: if self.sim_time > 0.0 {
                    entry.calls as f32 / self.sim_time
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Logs one line per system with call and timing totals.
    pub fn log_report(&self) {
        tracing::info!(
            "scheduler: {} systems, {:.2}s simulated over {} ticks",
            self.systems.len(),
            self.sim_time,
            self.ticks
        );
        for s in self.stats() {
            tracing::info!(
                "  {:<16} {:>7.1} Hz target, {:>7.1} Hz actual, {} calls, {} us total{}",
                s.name,
                s.frequency_hz,
                s.effective_hz,
                s.calls,
                s.total_time.as_micros(),
                if s.enabled { "" } else { " [disabled]" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counters {
        fast: u32,
        slow: u32,
        slow_dt: f32,
    }

    fn fast_system(ctx: &mut Counters, _dt: f32) {
        ctx.fast += 1;
    }

    fn slow_system(ctx: &mut Counters, dt: f32) {
        ctx.slow += 1;
        ctx.slow_dt = dt;
    }

    #[test]
    fn test_frequencies_divide_invocations() {
        let mut scheduler: Scheduler<Counters> = Scheduler::new();
        scheduler.register("fast", 60.0, fast_system);
        scheduler.register("slow", 30.0, slow_system);

        let mut ctx = Counters::default();
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            scheduler.tick(&mut ctx, dt);
        }

        assert_eq!(ctx.fast, 60);
        assert_eq!(ctx.slow, 30);
        // Low-frequency systems see the full elapsed interval.
        assert!((ctx.slow_dt - 2.0 * dt).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_system_never_runs() {
        let mut scheduler: Scheduler<Counters> = Scheduler::new();
        scheduler.register("fast", 60.0, fast_system);
        assert!(scheduler.set_enabled("fast", false));
        assert!(!scheduler.set_enabled("missing", false));

        let mut ctx = Counters::default();
        for _ in 0..10 {
            scheduler.tick(&mut ctx, 1.0 / 60.0);
        }
        assert_eq!(ctx.fast, 0);

        scheduler.set_enabled("fast", true);
        scheduler.tick(&mut ctx, 1.0 / 60.0);
        assert_eq!(ctx.fast, 1);
    }

    #[test]
    fn test_at_most_one_invocation_per_tick() {
        let mut scheduler: Scheduler<Counters> = Scheduler::new();
        scheduler.register("slow", 30.0, slow_system);

        let mut ctx = Counters::default();
        // A huge stall: one tick covering a full second.
        scheduler.tick(&mut ctx, 1.0);
        assert_eq!(ctx.slow, 1);
        assert!((ctx.slow_dt - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stats_accounting() {
        let mut scheduler: Scheduler<Counters> = Scheduler::new();
        scheduler.register("fast", 60.0, fast_system);

        let mut ctx = Counters::default();
        for _ in 0..120 {
            scheduler.tick(&mut ctx, 1.0 / 60.0);
        }

        let stats = scheduler.stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].calls, 120);
        assert!((stats[0].effective_hz - 60.0).abs() < 1.0);
    }
}
