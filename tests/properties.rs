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

use preflow::{preflow, Graph};

use proptest::prelude::*;
use std::collections::VecDeque;

/// Augmenting path max flow on the undirected graph.
fn reference_maxflow(n: usize, edges: &[(usize, usize, i64)]) -> i64 {
    let mut cap = vec![vec![0i64; n]; n];
    for &(u, v, c) in edges {
        if u != v {
            cap[u][v] += c;
            cap[v][u] += c;
        }
    }

    let (s, t) = (0, n - 1);
    let mut value = 0;
    loop {
        let mut pred = vec![None; n];
        pred[s] = Some(s);
        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            for v in 0..n {
                if pred[v].is_none() && cap[u][v] > 0 {
                    pred[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
        if pred[t].is_none() {
            return value;
        }

        let mut delta = i64::max_value();
        let mut v = t;
        while v != s {
            let u = pred[v].unwrap();
            delta = delta.min(cap[u][v]);
            v = u;
        }
        let mut v = t;
        while v != s {
            let u = pred[v].unwrap();
            cap[u][v] -= delta;
            cap[v][u] += delta;
            v = u;
        }
        value += delta;
    }
}

fn instance() -> impl Strategy<Value = (usize, Vec<(usize, usize, i64)>)> {
    (2usize..9).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n, 0i64..20), 0..24)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn value_is_maximal((n, edges) in instance(), nworkers in 1usize..6) {
        let expected = reference_maxflow(n, &edges);
        let g = Graph::from_edges(n, edges.clone()).unwrap();
        let (value, flow, mincut) = preflow(g, nworkers).unwrap();
        prop_assert_eq!(value, expected);

        let mut net = vec![0; n];
        for (&(u, v, c), &f) in edges.iter().zip(flow.iter()) {
            prop_assert!(f.abs() <= c);
            net[u] -= f;
            net[v] += f;
        }
        prop_assert!(net[1..n - 1].iter().all(|&x| x == 0));
        prop_assert_eq!(net[n - 1], value);

        let mut side = vec![false; n];
        for &u in &mincut {
            side[u] = true;
        }
        prop_assert!(side[0] && !side[n - 1]);
        let cut: i64 = edges.iter().filter(|&&(u, v, _)| side[u] != side[v]).map(|&(_, _, c)| c).sum();
        prop_assert_eq!(cut, value);
    }

    #[test]
    fn value_is_independent_of_workers((n, edges) in instance()) {
        let values: Vec<i64> = (1..=4)
            .map(|nworkers| preflow(Graph::from_edges(n, edges.clone()).unwrap(), nworkers).unwrap().0)
            .collect();
        prop_assert!(values.iter().all(|&x| x == values[0]));
    }
}
