/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! Synchronization of the worker rounds.
//!
//! A round consists of two phases separated by two barriers:
//!
//! 1. all workers compute their operations while the coordinator waits at
//!    `phase_one`,
//! 2. once everybody arrived at `phase_one` the workers wait at `phase_two`
//!    while the coordinator applies the operations and distributes the new
//!    active nodes, then it arrives at `phase_two` as well.
//!
//! Every barrier wait acquires and releases the barrier's mutex, so all
//! writes done before a wait are visible to all threads after the wait
//! returns. This is the only ordering the algorithm relies on.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Debug)]
struct BarrierState {
    /// Number of parties waiting in the current generation.
    arrived: usize,
    /// Number of completed generations.
    generation: u64,
    /// Set once the barrier has been broken.
    broken: bool,
}

/// A reusable, generation-counted barrier.
///
/// In contrast to `std::sync::Barrier` the barrier can be broken: all
/// current and future waits return immediately. This is used to tear down
/// the worker pool if one of the threads fails.
#[derive(Debug)]
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl PhaseBarrier {
    /// Create a barrier for `parties` threads.
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "a barrier needs at least one party");
        PhaseBarrier {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            cvar: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Return the number of completed generations.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Block until all parties have arrived.
    ///
    /// Returns `false` if the barrier is (or gets) broken.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        if state.broken {
            return false;
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation += 1;
            self.cvar.notify_all();
            return true;
        }

        let generation = state.generation;
        while state.generation == generation && !state.broken {
            self.cvar.wait(&mut state);
        }
        state.generation != generation
    }

    /// Break the barrier and wake up all waiting threads.
    pub fn break_barrier(&self) {
        let mut state = self.state.lock();
        state.broken = true;
        self.cvar.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }
}

/// The two-phase round protocol between the workers and the coordinator.
#[derive(Debug)]
pub struct RoundSync {
    phase_one: PhaseBarrier,
    phase_two: PhaseBarrier,
    /// Set by the coordinator before its last arrival at `phase_two`.
    done: AtomicBool,
}

impl RoundSync {
    /// Create the protocol for `workers` workers and one coordinator.
    pub fn new(workers: usize) -> Self {
        RoundSync {
            phase_one: PhaseBarrier::new(workers + 1),
            phase_two: PhaseBarrier::new(workers + 1),
            done: AtomicBool::new(false),
        }
    }

    /// Wait until all workers have computed their operations.
    ///
    /// Returns `false` if the protocol has been aborted.
    pub fn computed(&self) -> bool {
        self.phase_one.wait()
    }

    /// Wait until the coordinator has applied all operations.
    ///
    /// Returns `true` if another round follows. A worker must leave its loop
    /// once this returns `false`.
    pub fn next_round(&self) -> bool {
        // The done flag is stored before the coordinator's arrival, the
        // barrier's mutex orders that store before this load.
        self.phase_two.wait() && !self.done.load(Ordering::Acquire)
    }

    /// Signal the end of the algorithm and release the workers a last time.
    pub fn finish(&self) {
        self.done.store(true, Ordering::Release);
        self.phase_two.wait();
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Abort the protocol: every thread returns from its current and all
    /// future waits.
    pub fn abort(&self) {
        self.done.store(true, Ordering::Release);
        self.phase_one.break_barrier();
        self.phase_two.break_barrier();
    }

    pub fn is_aborted(&self) -> bool {
        self.phase_one.is_broken()
    }
}

/// Aborts a [`RoundSync`] if the owning thread unwinds.
///
/// Without this, the other threads would wait forever for the panicking
/// thread at the next barrier.
pub struct AbortOnPanic<'a>(pub &'a RoundSync);

impl<'a> Drop for AbortOnPanic<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AbortOnPanic, PhaseBarrier, RoundSync};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn barrier_is_reusable() {
        let barrier = PhaseBarrier::new(4);
        assert_eq!(barrier.parties(), 4);
        let counter = AtomicUsize::new(0);

        thread::scope(|s| {
            for i in 0..4 {
                let barrier = &barrier;
                let counter = &counter;
                s.spawn(move || {
                    for round in 0..10 {
                        thread::sleep(Duration::from_micros(10 * i));
                        counter.fetch_add(1, Ordering::SeqCst);
                        assert!(barrier.wait());
                        // everybody has incremented in this round
                        assert!(counter.load(Ordering::SeqCst) >= 4 * (round + 1));
                        assert!(barrier.wait());
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::SeqCst), 40);
        assert_eq!(barrier.generation(), 20);
    }

    #[test]
    fn broken_barrier_releases_waiters() {
        let barrier = PhaseBarrier::new(3);
        thread::scope(|s| {
            let h = s.spawn(|| barrier.wait());
            thread::sleep(Duration::from_millis(20));
            barrier.break_barrier();
            assert!(!h.join().unwrap());
        });
        assert!(!barrier.wait());
    }

    #[test]
    fn round_protocol() {
        let workers = 3;
        let sync = RoundSync::new(workers);
        let rounds = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..workers {
                s.spawn(|| {
                    let mut n = 0;
                    loop {
                        n += 1;
                        if !sync.computed() || !sync.next_round() {
                            break;
                        }
                    }
                    rounds.fetch_add(n, Ordering::SeqCst);
                });
            }

            for _ in 0..4 {
                assert!(sync.computed());
                assert!(!sync.is_done());
                sync.next_round();
            }
            assert!(sync.computed());
            sync.finish();
        });

        assert!(sync.is_done());
        assert_eq!(rounds.load(Ordering::SeqCst), workers * 5);
    }

    #[test]
    fn panic_aborts_protocol() {
        let sync = RoundSync::new(1);
        thread::scope(|s| {
            let h = s.spawn(|| {
                let _guard = AbortOnPanic(&sync);
                panic!("worker failure");
            });
            assert!(!sync.computed());
            assert!(h.join().is_err());
        });
        assert!(sync.is_aborted());
    }
}
