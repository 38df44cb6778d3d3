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

//! Push and relabel operations.
//!
//! Workers never modify the graph. Instead they record what they would do
//! as an [`Op`], and the coordinator applies all operations of a round
//! serially with [`apply`].

use crate::graph::Graph;
use crate::Flow;

use log::trace;

/// One unit of work decided by a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op<F> {
    /// Push `amount` units from `u` to `v` along edge `e`.
    Push { u: usize, v: usize, e: usize, amount: F },
    /// Increase the height of `u` by one.
    Relabel { u: usize },
}

impl<F> Op<F> {
    /// Return the node this operation was computed for.
    pub fn node(&self) -> usize {
        match *self {
            Op::Push { u, .. } | Op::Relabel { u } => u,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, Op::Push { .. })
    }
}

/// Apply `op` to `g`.
///
/// A push moves the flow and puts `u` back into the active set if it still
/// has excess, and `v` if it has just become active. A relabel increases
/// the height of `u` and puts it back into the active set.
pub fn apply<F>(g: &mut Graph<F>, op: &Op<F>)
where
    F: Flow,
{
    match *op {
        Op::Push { u, v, e, amount } => {
            let w = g.push(u, e, amount);
            debug_assert_eq!(v, w);

            trace!(
                "push {:?} from {} to {}: f = {:?}, c = {:?}",
                amount,
                u,
                v,
                g.flow(e),
                g.capacity(e)
            );

            if u != g.src() && v != g.src() {
                debug_assert!(amount > F::zero());
                debug_assert!(g.excess(u) >= F::zero(), "negative excess at node {}", u);
                debug_assert!(g.flow(e).abs() <= g.capacity(e), "capacity exceeded on edge {}", e);
            }

            if g.excess(u) > F::zero() {
                // still some remaining so let u push more
                g.enter_excess(u);
            }

            if amount > F::zero() && g.excess(v) == amount {
                // v had zero excess before and can now push
                g.enter_excess(v);
            }
        }
        Op::Relabel { u } => {
            let h = g.relabel(u);
            trace!("relabel {} now h = {}", u, h);
            g.enter_excess(u);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, Op};
    use crate::Graph;

    fn path() -> Graph<i32> {
        let mut g = Graph::from_edges(3, vec![(0, 1, 5), (1, 2, 3)]).unwrap();
        g.init_preflow();
        g
    }

    #[test]
    fn push_updates_flow_and_excess() {
        let mut g = path();
        assert_eq!(g.leave_excess(), Some(1));

        g.relabel(1);
        apply(&mut g, &Op::Push { u: 1, v: 2, e: 1, amount: 3 });
        assert_eq!(g.excess(1), 2);
        assert_eq!(g.excess(2), 3);
        assert_eq!(g.flow(1), 3);
        // node 1 keeps excess and is active again, the sink never is
        assert_eq!(g.leave_excess(), Some(1));
        assert!(g.is_quiescent());
    }

    #[test]
    fn push_against_stored_direction() {
        let mut g = path();
        g.leave_excess();
        apply(&mut g, &Op::Relabel { u: 1 });
        assert_eq!(g.height(1), 1);
        assert_eq!(g.leave_excess(), Some(1));
        for _ in 0..5 {
            g.relabel(1);
        }

        // send everything back to the source along edge 0
        apply(&mut g, &Op::Push { u: 1, v: 0, e: 0, amount: 5 });
        assert_eq!(g.flow(0), 0);
        assert_eq!(g.excess(1), 0);
        assert_eq!(g.excess(0), 0);
        assert!(g.is_quiescent());
    }

    #[test]
    fn push_activates_target() {
        let mut g = Graph::from_edges(4, vec![(0, 1, 4), (1, 2, 4), (2, 3, 4)]).unwrap();
        g.init_preflow();
        g.leave_excess();
        g.relabel(1);
        apply(&mut g, &Op::Push { u: 1, v: 2, e: 1, amount: 4 });
        assert_eq!(g.leave_excess(), Some(2));
        assert!(g.is_quiescent());
    }

    #[test]
    fn op_accessors() {
        let op = Op::Push { u: 4, v: 2, e: 1, amount: 1 };
        assert_eq!(op.node(), 4);
        assert!(op.is_push());
        assert!(!Op::<i32>::Relabel { u: 3 }.is_push());
    }
}
