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

use time::OffsetDateTime;

use rustop::opts;

use preflow::input;
use preflow::maxflow::{ParallelPreflow, DEFAULT_NUM_WORKERS};
use preflow::Graph;

use log::info;
use std::io;
use std::process;

fn run(file: Option<&str>, num_workers: usize, timing: bool) -> preflow::Result<i64> {
    let tstart = OffsetDateTime::now_utc();
    let g: Graph<i64> = match file {
        Some(filename) => input::read_from_file(filename)?,
        None => input::read(io::stdin().lock())?,
    };
    let tend = OffsetDateTime::now_utc();
    if timing {
        eprintln!("Time (read): {}", (tend - tstart).as_seconds_f64());
    }
    info!("number of nodes: {}", g.num_nodes());
    info!("number of edges: {}", g.num_edges());

    let tstart = OffsetDateTime::now_utc();
    let mut pr = ParallelPreflow::with_workers(g, num_workers)?;
    let value = pr.solve()?;
    let tend = OffsetDateTime::now_utc();
    if timing {
        eprintln!("Time (solve): {}", (tend - tstart).as_seconds_f64());
    }

    let stats = pr.stats();
    info!(
        "rounds: {}, pushes: {}, relabels: {}, nodes worked on per worker: {:?}",
        stats.rounds, stats.pushes, stats.relabels, stats.worked
    );

    Ok(value)
}

fn main() {
    env_logger::init();

    let (args, _) = opts! {
        synopsis "Solve a max-flow problem with a parallel preflow-push algorithm.";
        opt workers:usize=DEFAULT_NUM_WORKERS, desc:"Number of worker threads.";
        opt time:bool, desc:"Print timings to stderr.";
        param file:Option<String>, desc:"Instance file name (default: stdin)";
    }
    .parse_or_exit();

    match run(args.file.as_deref(), args.workers, args.time) {
        Ok(f) => println!("f = {}", f),
        Err(err) => {
            let progname = std::env::args().next().unwrap_or_else(|| "preflow".to_string());
            eprintln!("{}: error: {}", progname, err);
            process::exit(1);
        }
    }
}
