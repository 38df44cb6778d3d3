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

//! Errors reported by the solver and the instance reader.

use std::error;
use std::fmt;
use std::io;

/// Error when reading an instance or running the solver.
#[derive(Debug)]
pub enum Error {
    /// Reading the input stream failed.
    Io(io::Error),
    /// The input stream is malformed at the given number position.
    Format { pos: usize, msg: String },
    /// The graph data is inconsistent (bad node ids, negative capacities, ...).
    Data { msg: String },
    /// The solver has been configured with invalid parameters.
    Config { msg: String },
    /// A worker thread could not be started.
    Spawn(io::Error),
    /// A worker thread panicked and could not be joined.
    WorkerPanicked { worker: usize },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        use self::Error::*;
        match self {
            Io(err) => err.fmt(fmt),
            Format { pos, msg } => write!(fmt, "Format error at number {}: {}", pos, msg),
            Data { msg } => write!(fmt, "Data error: {}", msg),
            Config { msg } => write!(fmt, "Invalid configuration: {}", msg),
            Spawn(err) => write!(fmt, "failed to spawn worker thread: {}", err),
            WorkerPanicked { worker } => write!(fmt, "worker {} panicked", worker),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) | Error::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
