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

//! Constructing graphs.

use crate::graph::Graph;
use crate::Flow;

/// A builder for a [`Graph`].
///
/// The graph itself has a fixed set of nodes and edges for the whole run of
/// the algorithm. In order to build a graph, one should use a builder and,
/// once the construction is complete, convert it into a graph.
///
/// Nodes are numbered consecutively starting at `0`. The first node is the
/// source and the last node the sink of the flow problem.
pub struct Builder<F> {
    nnodes: usize,
    edges: Vec<(usize, usize, F)>,
}

impl<F> Default for Builder<F> {
    fn default() -> Self {
        Builder {
            nnodes: 0,
            edges: vec![],
        }
    }
}

impl<F> Builder<F>
where
    F: Flow,
{
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::with_capacities(0, 0)
    }

    /// Create a new, empty builder.
    ///
    /// The number of edges is only a guess used to reserve memory, it is not
    /// a strict requirement for the number of edges added later.
    pub fn with_capacities(_nnodes: usize, nedges: usize) -> Self {
        Builder {
            nnodes: 0,
            edges: Vec::with_capacity(nedges),
        }
    }

    /// Reserve memory for a certain number of edges.
    pub fn reserve(&mut self, nedges: usize) {
        self.edges.reserve(nedges)
    }

    /// Return the current number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nnodes
    }

    /// Return the current number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Add a new node.
    pub fn add_node(&mut self) -> usize {
        self.nnodes += 1;
        self.nnodes - 1
    }

    /// Add `n` new nodes.
    pub fn add_nodes(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.add_node()).collect()
    }

    /// Add a new edge from `u` to `v` with capacity `c`.
    ///
    /// # Panics
    ///
    /// Panics if one of the endpoints has not been added before or if the
    /// capacity is negative.
    pub fn add_edge(&mut self, u: usize, v: usize, c: F) -> usize {
        assert!(u < self.nnodes && v < self.nnodes, "invalid node in edge ({},{})", u, v);
        assert!(c >= F::zero(), "negative capacity on edge ({},{})", u, v);
        self.edges.push((u, v, c));
        self.edges.len() - 1
    }

    /// Turn the builder into a graph.
    pub fn into_graph(self) -> Graph<F> {
        let mut g = Graph::with_nodes(self.nnodes, self.edges.len());
        for (u, v, c) in self.edges {
            g.add_edge(u, v, c);
        }
        g
    }
}
