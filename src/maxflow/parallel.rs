// Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! This module implements a parallel preflow-push algorithm (Goldberg and
//! Tarjan) for solving max flow problems.
//!
//! The algorithm runs in rounds. In each round every active node (a node
//! with positive excess) is assigned to one of a fixed number of worker
//! threads. The workers decide, for each of their nodes, whether to push
//! along an admissible edge or to relabel the node. They only *record* these
//! decisions. Once all workers are done, the coordinating thread applies all
//! recorded operations serially and distributes the new active nodes for the
//! next round. The algorithm stops when there is no active node left.
//!
//! Edges are undirected: an edge with capacity `c` may carry up to `c` units
//! of flow in either direction.
//!
//! Because the graph is only read while the workers compute and only written
//! while the workers wait, no locking of single nodes or edges is required.
//!
//! # Example
//!
//! ```
//! use preflow::maxflow::preflow;
//! use preflow::Graph;
//!
//! //      --4--> 1 --4--
//! //     /              \
//! //    0                3
//! //     \              /
//! //      --4--> 2 --4--
//! let g = Graph::from_edges(4, vec![(0, 1, 4), (0, 2, 4), (1, 3, 4), (2, 3, 4)]).unwrap();
//!
//! let (value, flow, mut mincut) = preflow(g, 3).unwrap();
//!
//! assert_eq!(value, 8);
//! assert_eq!(flow, vec![4, 4, 4, 4]);
//! mincut.sort();
//! assert_eq!(mincut, vec![0]);
//! ```

use crate::active::ActiveSet;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::ops::apply;
use crate::sync::{AbortOnPanic, RoundSync};
use crate::worker::{distribute, WorkerSlot};
use crate::Flow;

use log::{debug, info};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::thread;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The number of worker threads used by [`ParallelPreflow::new`].
pub const DEFAULT_NUM_WORKERS: usize = 4;

/// Counters collected while solving.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Stats {
    /// Number of rounds.
    pub rounds: usize,
    /// Number of push operations applied.
    pub pushes: usize,
    /// Number of relabel operations applied.
    pub relabels: usize,
    /// Number of nodes worked on by each worker.
    pub worked: Vec<usize>,
}

/// The parallel preflow-push algorithm.
///
/// This struct owns the graph (which holds the preflow) and the result of
/// the last run.
pub struct ParallelPreflow<F> {
    /// The graph, written by the coordinator and read by the workers.
    graph: RwLock<Graph<F>>,
    /// The number of worker threads.
    num_workers: usize,
    /// The flow value.
    value: F,
    stats: Stats,
}

impl<F> ParallelPreflow<F>
where
    F: Flow,
{
    /// Return a new solver for `g` using [`DEFAULT_NUM_WORKERS`] threads.
    pub fn new(g: Graph<F>) -> Result<Self> {
        Self::with_workers(g, DEFAULT_NUM_WORKERS)
    }

    /// Return a new solver for `g` using `num_workers` threads.
    pub fn with_workers(g: Graph<F>, num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(Error::Config {
                msg: "the number of workers must be positive".to_string(),
            });
        }
        if g.num_nodes() < 2 {
            return Err(Error::Data {
                msg: format!("graph has {} nodes, source and sink must differ", g.num_nodes()),
            });
        }
        Ok(ParallelPreflow {
            graph: RwLock::new(g),
            num_workers,
            value: F::zero(),
            stats: Stats::default(),
        })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Return the underlying graph with the current preflow.
    pub fn graph(&self) -> RwLockReadGuard<'_, Graph<F>> {
        self.graph.read()
    }

    /// Return the underlying graph.
    pub fn into_graph(self) -> Graph<F> {
        self.graph.into_inner()
    }

    /// Return the flow value.
    ///
    /// The function returns 0 if the flow has not been computed, yet.
    pub fn value(&self) -> F {
        self.value
    }

    /// Return the flow over edge `e`.
    ///
    /// The flow is positive if it goes from the first to the second endpoint
    /// of `e`.
    pub fn flow(&self, e: usize) -> F {
        self.graph.read().flow(e)
    }

    /// Return the counters of the last run.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Run the algorithm from node `0` to node `n - 1`.
    ///
    /// Returns the value of a maximal flow. Fails if a worker thread cannot
    /// be started or panics.
    pub fn solve(&mut self) -> Result<F> {
        let nworkers = self.num_workers;
        let graph = &self.graph;
        let slots: Vec<Mutex<WorkerSlot<F>>> = (0..nworkers).map(|_| Mutex::new(WorkerSlot::new())).collect();
        let sync = RoundSync::new(nworkers);
        let mut stats = Stats {
            worked: vec![0; nworkers],
            ..Stats::default()
        };

        {
            let mut g = graph.write();
            g.init_preflow();
            info!(
                "solving max flow with {} nodes, {} edges and {} workers",
                g.num_nodes(),
                g.num_edges(),
                nworkers
            );
            let mut guards: Vec<_> = slots.iter().map(|slot| slot.lock()).collect();
            let nactive = distribute(&mut *g, &mut guards[..]);
            debug!("initial pushes: {} active nodes", nactive);
        }

        thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::with_capacity(nworkers);
            for (i, slot) in slots.iter().enumerate() {
                let sync = &sync;
                let spawned = thread::Builder::new()
                    .name(format!("preflow-worker-{}", i))
                    .spawn_scoped(scope, move || work(i, graph, slot, sync));
                match spawned {
                    Ok(h) => handles.push(h),
                    Err(err) => {
                        // release the workers started so far
                        sync.abort();
                        return Err(Error::Spawn(err));
                    }
                }
            }

            let completed = coordinate(graph, &slots, &sync, &mut stats);

            let mut result = Ok(());
            for (i, h) in handles.into_iter().enumerate() {
                if h.join().is_err() && result.is_ok() {
                    result = Err(Error::WorkerPanicked { worker: i });
                }
            }
            debug_assert!(completed || result.is_err());
            result
        })?;

        for (cnt, slot) in stats.worked.iter_mut().zip(slots) {
            *cnt = slot.into_inner().worked();
        }

        let g = self.graph.get_mut();
        debug_assert!((1..g.snk()).all(|u| g.excess(u).is_zero()));
        self.value = g.excess(g.snk());
        info!(
            "f = {:?} after {} rounds ({} pushes, {} relabels)",
            self.value, stats.rounds, stats.pushes, stats.relabels
        );
        self.stats = stats;

        Ok(self.value)
    }

    /// Return the minimal cut associated with the last maximum flow.
    ///
    /// These are the nodes reachable from the source in the residual graph.
    pub fn mincut(&self) -> Vec<usize> {
        let g = self.graph.read();
        let mut seen = vec![false; g.num_nodes()];
        // the search order is irrelevant, so reuse the active set as stack
        let mut todo = ActiveSet::with_capacity(g.num_nodes());

        seen[g.src()] = true;
        todo.enter(g.src());
        while let Some(u) = todo.leave() {
            for &e in g.neighbors(u) {
                let v = g.other(u, e);
                if !seen[v] && g.residual(u, e) > F::zero() {
                    seen[v] = true;
                    todo.enter(v);
                }
            }
        }

        (0..g.num_nodes()).filter(|&u| seen[u]).collect()
    }
}

/// The loop of a worker thread.
///
/// The nodes of the first round have been assigned before the thread starts.
fn work<F>(id: usize, graph: &RwLock<Graph<F>>, slot: &Mutex<WorkerSlot<F>>, sync: &RoundSync)
where
    F: Flow,
{
    let _guard = AbortOnPanic(sync);

    loop {
        {
            let g = graph.read();
            slot.lock().compute(&*g);
        }
        if !sync.computed() || !sync.next_round() {
            break;
        }
    }

    debug!("worker {} terminating with {} nodes worked on", id, slot.lock().worked());
}

/// The loop of the coordinating thread.
///
/// Returns `false` if the round protocol has been aborted.
fn coordinate<F>(graph: &RwLock<Graph<F>>, slots: &[Mutex<WorkerSlot<F>>], sync: &RoundSync, stats: &mut Stats) -> bool
where
    F: Flow,
{
    let _guard = AbortOnPanic(sync);

    loop {
        if !sync.computed() {
            return false;
        }
        stats.rounds += 1;

        {
            let mut g = graph.write();
            let mut napplied = 0;
            for slot in slots {
                let mut slot = slot.lock();
                for op in slot.drain() {
                    apply(&mut *g, &op);
                    if op.is_push() {
                        stats.pushes += 1;
                    } else {
                        stats.relabels += 1;
                    }
                    napplied += 1;
                }
            }

            if g.is_quiescent() {
                debug!("round {}: applied {} operations, done", stats.rounds, napplied);
                break;
            }

            let mut guards: Vec<_> = slots.iter().map(|slot| slot.lock()).collect();
            let nactive = distribute(&mut *g, &mut guards[..]);
            debug!(
                "round {}: applied {} operations, {} active nodes",
                stats.rounds, napplied, nactive
            );
        }

        if !sync.next_round() {
            return false;
        }
    }

    sync.finish();
    true
}

/// Solve the maxflow problem using the parallel preflow-push algorithm.
///
/// The function solves the max flow problem from node `0` to node `n - 1`
/// of `g` with `num_workers` worker threads.
///
/// The function returns the flow value, the flow on each edge and the
/// nodes in a minimal cut.
pub fn preflow<F>(g: Graph<F>, num_workers: usize) -> Result<(F, Vec<F>, Vec<usize>)>
where
    F: Flow,
{
    let mut maxflow = ParallelPreflow::with_workers(g, num_workers)?;
    let value = maxflow.solve()?;
    let mincut = maxflow.mincut();
    let g = maxflow.into_graph();
    Ok((value, (0..g.num_edges()).map(|e| g.flow(e)).collect(), mincut))
}
