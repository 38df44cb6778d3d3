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

//! Per-worker task buffers and the distribution of active nodes.

use crate::graph::Graph;
use crate::ops::Op;
use crate::Flow;

use log::trace;
use std::cmp::min;
use std::ops::DerefMut;

/// The work of one worker in the current round.
///
/// The coordinator fills `nodes` before the round, the worker fills `ops`
/// during the round, and the coordinator drains `ops` afterwards. Both
/// lists are empty at the start of every round.
#[derive(Clone, Debug)]
pub struct WorkerSlot<F> {
    /// The active nodes assigned to this worker.
    nodes: Vec<usize>,
    /// One operation for each assigned node.
    ops: Vec<Op<F>>,
    /// Number of nodes worked on over all rounds.
    worked: usize,
}

impl<F> Default for WorkerSlot<F> {
    fn default() -> Self {
        WorkerSlot {
            nodes: vec![],
            ops: vec![],
            worked: 0,
        }
    }
}

impl<F> WorkerSlot<F>
where
    F: Flow,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the active node `u` to this worker.
    pub fn assign(&mut self, u: usize) {
        self.nodes.push(u);
    }

    /// Return the nodes assigned in the current round.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Return the operations computed in the current round.
    pub fn ops(&self) -> &[Op<F>] {
        &self.ops
    }

    /// Return the number of nodes worked on so far.
    pub fn worked(&self) -> usize {
        self.worked
    }

    /// Compute one operation for each assigned node.
    ///
    /// For node `u` the first edge (in adjacency order) to a lower neighbour
    /// with residual capacity leaving `u` is admissible and results in a push
    /// of `min(excess(u), residual)`. If there is no admissible edge, `u` is
    /// relabelled.
    ///
    /// The graph is only read.
    pub fn compute(&mut self, g: &Graph<F>) {
        debug_assert!(self.ops.is_empty());
        self.ops.reserve(self.nodes.len());

        for &u in &self.nodes {
            let h = g.height(u);
            let op = g
                .neighbors(u)
                .iter()
                .map(|&e| (e, g.other(u, e)))
                .find(|&(e, v)| h > g.height(v) && g.residual(u, e) > F::zero())
                .map(|(e, v)| Op::Push {
                    u,
                    v,
                    e,
                    amount: min(g.excess(u), g.residual(u, e)),
                })
                .unwrap_or(Op::Relabel { u });

            trace!("node {} with h = {} and e = {:?}: {:?}", u, h, g.excess(u), op);
            self.ops.push(op);
        }

        self.worked += self.nodes.len();
    }

    /// Take the computed operations and reset the slot for the next round.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Op<F>> {
        self.nodes.clear();
        self.ops.drain(..)
    }
}

/// Distribute all active nodes round-robin over the worker slots.
///
/// Removes every node from the active set of `g` and assigns it to exactly
/// one slot. Returns the number of distributed nodes.
pub fn distribute<F, S>(g: &mut Graph<F>, slots: &mut [S]) -> usize
where
    F: Flow,
    S: DerefMut<Target = WorkerSlot<F>>,
{
    assert!(!slots.is_empty(), "no worker slots");
    let mut cnt = 0;
    let mut cycle = 0;
    while let Some(u) = g.leave_excess() {
        slots[cycle].assign(u);
        cycle = (cycle + 1) % slots.len();
        cnt += 1;
    }
    cnt
}

#[cfg(test)]
mod tests {
    use super::{distribute, WorkerSlot};
    use crate::ops::Op;
    use crate::Graph;

    #[test]
    fn round_robin() {
        let mut g = Graph::from_edges(6, (1..5).map(|v| (0, v, 1)).collect::<Vec<_>>()).unwrap();
        g.init_preflow();
        assert_eq!(g.num_active(), 4);

        let mut a = WorkerSlot::new();
        let mut b = WorkerSlot::new();
        let mut c = WorkerSlot::new();
        assert_eq!(distribute(&mut g, &mut [&mut a, &mut b, &mut c]), 4);
        assert!(g.is_quiescent());
        assert_eq!(a.nodes().len(), 2);
        assert_eq!(b.nodes().len(), 1);
        assert_eq!(c.nodes().len(), 1);

        let mut all: Vec<usize> = a.nodes().iter().chain(b.nodes()).chain(c.nodes()).cloned().collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn relabel_without_admissible_edge() {
        let mut g = Graph::from_edges(3, vec![(0, 1, 5), (1, 2, 3)]).unwrap();
        g.init_preflow();
        let mut slot = WorkerSlot::new();
        distribute(&mut g, &mut [&mut slot]);

        // all neighbours of node 1 are at least as high
        slot.compute(&g);
        assert_eq!(slot.ops(), &[Op::Relabel { u: 1 }]);
        // the graph is not modified
        assert_eq!(g.height(1), 0);
        assert_eq!(slot.drain().collect::<Vec<_>>(), vec![Op::Relabel { u: 1 }]);
        assert!(slot.nodes().is_empty());
        assert_eq!(slot.worked(), 1);
    }

    #[test]
    fn push_along_first_admissible_edge() {
        let mut g = Graph::from_edges(4, vec![(0, 1, 5), (1, 2, 3), (1, 3, 3)]).unwrap();
        g.init_preflow();
        g.relabel(1);
        let mut slot = WorkerSlot::new();
        distribute(&mut g, &mut [&mut slot]);
        slot.compute(&g);
        assert_eq!(slot.ops(), &[Op::Push { u: 1, v: 2, e: 1, amount: 3 }]);
        assert_eq!(g.excess(1), 5);
    }

    #[test]
    fn push_against_stored_direction() {
        // edge (2,1) is stored in the opposite direction of the flow
        let mut g = Graph::from_edges(3, vec![(0, 1, 5), (2, 1, 3)]).unwrap();
        g.init_preflow();
        g.relabel(1);
        let mut slot = WorkerSlot::new();
        distribute(&mut g, &mut [&mut slot]);
        slot.compute(&g);
        assert_eq!(slot.ops(), &[Op::Push { u: 1, v: 2, e: 1, amount: 3 }]);
    }
}
