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

//! The graph store of the preflow algorithm.
//!
//! All nodes and edges live in two arrays owned by the [`Graph`]. Each node
//! keeps the list of indices of its incident edges, so an edge is shared by
//! both endpoints: a push along the edge is visible from either side.
//!
//! Edges are undirected in storage. The flow on an edge `(u, v)` is positive
//! if it goes from `u` to `v` and negative if it goes from `v` to `u`, and its
//! absolute value never exceeds the capacity.
//!
//! The source is always node `0` and the sink always node `n - 1`.

use crate::active::ActiveSet;
use crate::builder::Builder;
use crate::error::{Error, Result};

use crate::Flow;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Data associated with a node.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Node<F> {
    /// The current height.
    pub(crate) height: usize,
    /// The excess of flow (received but not yet forwarded).
    pub(crate) excess: F,
    /// The incident edges in insertion order.
    pub(crate) adj: Vec<usize>,
}

/// An edge with its capacity and current flow.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Edge<F> {
    /// The first endpoint.
    pub(crate) u: usize,
    /// The second endpoint.
    pub(crate) v: usize,
    /// The flow, positive if from `u` to `v`.
    pub(crate) flow: F,
    /// The capacity.
    pub(crate) cap: F,
}

/// A capacitated graph with a preflow.
#[derive(Clone, Debug)]
pub struct Graph<F> {
    nodes: Vec<Node<F>>,
    edges: Vec<Edge<F>>,
    /// Nodes with positive excess except source and sink.
    active: ActiveSet,
}

impl<F> Graph<F>
where
    F: Flow,
{
    /// Create a graph with `n` isolated nodes.
    pub(crate) fn with_nodes(n: usize, nedges: usize) -> Self {
        Graph {
            nodes: (0..n)
                .map(|_| Node {
                    height: 0,
                    excess: F::zero(),
                    adj: vec![],
                })
                .collect(),
            edges: Vec::with_capacity(nedges),
            active: ActiveSet::with_capacity(n),
        }
    }

    /// Create a new graph by passing a builder to the callback `f`.
    ///
    /// # Example
    ///
    /// ```
    /// use preflow::Graph;
    ///
    /// let g = Graph::<i32>::new_with(|b| {
    ///     let nodes = b.add_nodes(3);
    ///     b.add_edge(nodes[0], nodes[1], 5);
    ///     b.add_edge(nodes[1], nodes[2], 3);
    /// });
    ///
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.num_edges(), 2);
    /// ```
    pub fn new_with<B>(f: B) -> Self
    where
        B: FnOnce(&mut Builder<F>),
    {
        let mut b = Builder::new();
        f(&mut b);
        b.into_graph()
    }

    /// Create a graph with `n` nodes from a list of `(from, to, capacity)`
    /// triples.
    ///
    /// Unlike the builder this function validates its input: there must be
    /// at least two nodes, node ids must be smaller than `n` and capacities
    /// must be non-negative.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, F)>,
    {
        if n < 2 {
            return Err(Error::Data {
                msg: format!("graph has {} nodes, source and sink must differ", n),
            });
        }
        let edges = edges.into_iter();
        let mut b = Builder::with_capacities(n, edges.size_hint().0);
        b.add_nodes(n);
        for (i, (u, v, c)) in edges.enumerate() {
            if u >= n || v >= n {
                return Err(Error::Data {
                    msg: format!("edge {} ({},{}) has invalid node id (must be in 0..{})", i, u, v, n),
                });
            }
            if c < F::zero() {
                return Err(Error::Data {
                    msg: format!("edge {} ({},{}) has negative capacity", i, u, v),
                });
            }
            b.add_edge(u, v, c);
        }
        Ok(b.into_graph())
    }

    /// Add an edge between `u` and `v` and return its index.
    ///
    /// The edge is put into the adjacency lists of both endpoints.
    pub(crate) fn add_edge(&mut self, u: usize, v: usize, c: F) -> usize {
        let e = self.edges.len();
        self.edges.push(Edge {
            u,
            v,
            flow: F::zero(),
            cap: c,
        });
        self.nodes[u].adj.push(e);
        if u != v {
            self.nodes[v].adj.push(e);
        }
        e
    }

    /// Return the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Return the source node.
    pub fn src(&self) -> usize {
        0
    }

    /// Return the sink node.
    ///
    /// # Panics
    ///
    /// Panics if the graph has no nodes.
    pub fn snk(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn height(&self, u: usize) -> usize {
        self.nodes[u].height
    }

    pub fn excess(&self, u: usize) -> F {
        self.nodes[u].excess
    }

    /// Return the current flow on edge `e`, positive if from its first to its
    /// second endpoint.
    pub fn flow(&self, e: usize) -> F {
        self.edges[e].flow
    }

    pub fn capacity(&self, e: usize) -> F {
        self.edges[e].cap
    }

    /// Return the stored endpoints `(u, v)` of edge `e`.
    pub fn endpoints(&self, e: usize) -> (usize, usize) {
        (self.edges[e].u, self.edges[e].v)
    }

    /// Return the indices of the edges incident to `u` in adjacency order.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.nodes[u].adj
    }

    /// Return the endpoint of `e` opposite to `u`.
    pub fn other(&self, u: usize, e: usize) -> usize {
        let edge = &self.edges[e];
        if u == edge.u {
            edge.v
        } else {
            edge.u
        }
    }

    /// Return the residual capacity of `e` in the direction leaving `u`.
    pub fn residual(&self, u: usize, e: usize) -> F {
        let edge = &self.edges[e];
        if u == edge.u {
            edge.cap - edge.flow
        } else {
            edge.cap + edge.flow
        }
    }

    /// Put `u` into the set of active nodes.
    ///
    /// Source and sink are never active.
    pub(crate) fn enter_excess(&mut self, u: usize) {
        if u != self.src() && u != self.snk() {
            debug_assert!(self.nodes[u].excess > F::zero(), "node {} entered without excess", u);
            self.active.enter(u);
        }
    }

    /// Remove and return some active node.
    pub(crate) fn leave_excess(&mut self) -> Option<usize> {
        self.active.leave()
    }

    /// Return `true` if no node has excess flow.
    pub fn is_quiescent(&self) -> bool {
        self.active.is_empty()
    }

    /// Return the number of active nodes.
    pub fn num_active(&self) -> usize {
        self.active.len()
    }

    /// Move `amount` units of flow from `u` along `e`.
    ///
    /// This only updates excesses and flow, it does not touch the active set.
    pub(crate) fn push(&mut self, u: usize, e: usize, amount: F) -> usize {
        let v = self.other(u, e);
        let edge = &mut self.edges[e];
        if u == edge.u {
            edge.flow += amount;
        } else {
            edge.flow -= amount;
        }
        self.nodes[u].excess -= amount;
        self.nodes[v].excess += amount;
        v
    }

    /// Increase the height of `u` by one.
    pub(crate) fn relabel(&mut self, u: usize) -> usize {
        self.nodes[u].height += 1;
        self.nodes[u].height
    }

    /// Reset the preflow and saturate all edges leaving the source.
    ///
    /// The source's height is set to `n`, all other heights to `0`. Every
    /// neighbour of the source that receives flow becomes active. The
    /// source's excess is the negative of the injected flow.
    pub(crate) fn init_preflow(&mut self) {
        for node in &mut self.nodes {
            node.height = 0;
            node.excess = F::zero();
        }
        for edge in &mut self.edges {
            edge.flow = F::zero();
        }
        self.active.clear();

        let s = self.src();
        self.nodes[s].height = self.nodes.len();

        for i in 0..self.nodes[s].adj.len() {
            let e = self.nodes[s].adj[i];
            let d = self.residual(s, e);
            if d.is_zero() {
                continue;
            }
            let v = self.push(s, e, d);
            if self.nodes[v].excess == d {
                self.enter_excess(v);
            }
        }
    }
}
