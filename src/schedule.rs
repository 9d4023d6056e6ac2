//! Generation-token scheduler for cancellable delayed events
//!
//! Engines queue future work (watch-sequence steps, miss timeouts, shake
//! resets, end-of-session signals) against an internal clock the host
//! advances with `tick` deltas. Every task captures the generation current
//! at schedule time; `invalidate` bumps the generation, making every
//! pending task inert. This replaces ad-hoc timer callbacks with state the
//! engine owns and the host can reason about.
//!
//! Draining is pull-based: `pop_due` returns one event at a time so that a
//! handler which invalidates (a miss restarting a cycle) also kills the
//! rest of the batch that was scheduled alongside it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
struct Task<E> {
    due: f32,
    seq: u64,
    generation: u64,
    event: E,
}

/// Ordered queue of delayed events with generation-based cancellation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<E> {
    /// Seconds advanced since construction or the last `reset`
    clock: f32,
    /// Current generation; tasks captured under an older one never fire
    generation: u64,
    /// Insertion counter, the tie-break for tasks due at the same instant
    seq: u64,
    /// Pending tasks are transient and rebuilt by the engine after a load
    #[serde(skip, default = "Vec::new")]
    tasks: Vec<Task<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            clock: 0.0,
            generation: 0,
            seq: 0,
            tasks: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current internal clock in seconds
    pub fn now(&self) -> f32 {
        self.clock
    }

    /// Current generation token
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of pending tasks, stale ones included
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Queue an event `delay` seconds from now under the current generation
    pub fn schedule_in(&mut self, delay: f32, event: E) {
        let task = Task {
            due: self.clock + delay.max(0.0),
            seq: self.seq,
            generation: self.generation,
            event,
        };
        self.seq += 1;
        self.tasks.push(task);
    }

    /// Advance the clock. Call `pop_due` (or `drain_due`) afterwards.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.clock += dt;
        }
    }

    /// Remove and return the earliest due event, dropping stale tasks on
    /// the way. Ties resolve in insertion order.
    pub fn pop_due(&mut self) -> Option<E> {
        loop {
            let idx = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= self.clock)
                .min_by(|(_, a), (_, b)| {
                    a.due
                        .partial_cmp(&b.due)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.seq.cmp(&b.seq))
                })
                .map(|(i, _)| i)?;
            let task = self.tasks.swap_remove(idx);
            if task.generation == self.generation {
                return Some(task.event);
            }
        }
    }

    /// Drain every currently due event in order
    pub fn drain_due(&mut self) -> Vec<E> {
        let mut out = Vec::new();
        while let Some(event) = self.pop_due() {
            out.push(event);
        }
        out
    }

    /// Cancel everything pending. Tasks scheduled after this call run
    /// normally under the new generation.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.tasks.clear();
    }

    /// Cancel everything and rewind the clock to zero
    pub fn reset(&mut self) {
        self.invalidate();
        self.clock = 0.0;
    }
}
