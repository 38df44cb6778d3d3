// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

#![forbid(unsafe_code)]

//! A parallel preflow-push algorithm for maximum flow problems.

mod num {
    pub use num_traits as traits;
}

use std::fmt::Debug;

use self::num::traits::{NumAssign, Signed};

/// The number type of capacities and flows.
///
/// Flows are signed because the flow on an edge is negative if it goes
/// against the stored direction of the edge.
pub trait Flow: NumAssign + Signed + Ord + Copy + Send + Sync + Debug {}

impl<T> Flow for T where T: NumAssign + Signed + Ord + Copy + Send + Sync + Debug {}

// # Data structures

pub mod error;
pub use self::error::{Error, Result};

pub mod graph;
pub use self::graph::Graph;

pub mod builder;
pub use self::builder::Builder;

pub mod active;
pub use self::active::ActiveSet;

// # Algorithm

pub mod ops;
pub use self::ops::Op;

pub mod sync;
pub mod worker;

pub mod maxflow;
pub use self::maxflow::{preflow, ParallelPreflow};

// # Input

pub mod input;
