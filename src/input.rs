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

//! Reading and writing max flow instances.
//!
//! An instance is a stream of non-negative integers separated by arbitrary
//! non-digit characters:
//!
//! 1. the number of nodes `n`,
//! 2. the number of edges `m`,
//! 3. two numbers that are ignored (they are used by other tools that share
//!    the format),
//! 4. `m` triples `u v c` denoting an edge between the nodes `u` and `v`
//!    (in `0..n`) with capacity `c`.
//!
//! The source is node `0` and the sink node `n - 1`.

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::num::traits::FromPrimitive;
use crate::Flow;

use log::debug;
use std::fmt::Display;
use std::io::{self, BufReader, Bytes, Read, Write};

/// Reads non-negative integers from a stream.
pub struct NumberReader<R: Read> {
    io: Bytes<BufReader<R>>,
    /// The number of numbers read so far.
    pos: usize,
}

impl<R: Read> NumberReader<R> {
    pub fn new(reader: R) -> Self {
        NumberReader {
            io: BufReader::new(reader).bytes(),
            pos: 0,
        }
    }

    fn format_error(&self, msg: String) -> Error {
        Error::Format { pos: self.pos, msg }
    }

    /// Return the next number.
    ///
    /// All characters before the number that are not digits are skipped.
    pub fn number(&mut self) -> Result<u64> {
        self.pos += 1;

        let mut x = loop {
            match self.io.next() {
                Some(b) => {
                    let b = b?;
                    if b.is_ascii_digit() {
                        break u64::from(b - b'0');
                    }
                }
                None => return Err(self.format_error("unexpected end of input, expected number".to_string())),
            }
        };

        while let Some(b) = self.io.next() {
            let b = b?;
            if !b.is_ascii_digit() {
                break;
            }
            x = x
                .checked_mul(10)
                .and_then(|x| x.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| self.format_error("number too large".to_string()))?;
        }

        Ok(x)
    }

    /// Return the next number as an index.
    pub fn index(&mut self) -> Result<usize> {
        let x = self.number()?;
        usize::from_u64(x).ok_or_else(|| self.format_error(format!("index {} too large", x)))
    }
}

/// Read an instance.
pub fn read<R, F>(r: R) -> Result<Graph<F>>
where
    R: Read,
    F: Flow + FromPrimitive,
{
    let mut reader = NumberReader::new(r);

    let nnodes = reader.index()?;
    let nedges = reader.index()?;
    if nnodes < 2 {
        return Err(Error::Data {
            msg: format!("graph has {} nodes, source and sink must differ", nnodes),
        });
    }
    // skip C and P
    reader.number()?;
    reader.number()?;

    let mut b = Builder::with_capacities(nnodes, nedges);
    b.add_nodes(nnodes);

    for i in 0..nedges {
        let u = reader.index()?;
        let v = reader.index()?;
        let c = reader.number()?;

        if u >= nnodes || v >= nnodes {
            return Err(Error::Data {
                msg: format!("edge {} ({},{}) has invalid node id (must be in 0..{})", i, u, v, nnodes),
            });
        }
        let c = F::from_u64(c).ok_or_else(|| Error::Data {
            msg: format!("capacity {} of edge {} is not representable", c, i),
        })?;
        b.add_edge(u, v, c);
    }

    debug!("read graph with {} nodes and {} edges", nnodes, nedges);

    Ok(b.into_graph())
}

pub fn read_from_file<F>(filename: &str) -> Result<Graph<F>>
where
    F: Flow + FromPrimitive,
{
    read(std::fs::File::open(filename)?)
}

/// Write an instance.
///
/// The two ignored numbers are written as `0`.
pub fn write<W, F>(mut w: W, g: &Graph<F>) -> io::Result<()>
where
    W: Write,
    F: Flow + Display,
{
    writeln!(w, "{} {}", g.num_nodes(), g.num_edges())?;
    writeln!(w, "0 0")?;
    for e in 0..g.num_edges() {
        let (u, v) = g.endpoints(e);
        writeln!(w, "{} {} {}", u, v, g.capacity(e))?;
    }
    Ok(())
}
