//! Command-line front end: parse one JSON file and report phase timings.
//!
//! Usage: `tapetree <file.json>`. Exit status 0 on success, non-zero on
//! any parse error. Timings and diagnostics go to stderr.

use anyhow::{Result, bail};
use std::time::Instant;
use tapetree::{ParseOptions, parse};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(p) => p,
        None => bail!("usage: tapetree <file.json>"),
    };
    if args.next().is_some() {
        bail!("usage: tapetree <file.json>");
    }

    let threads = num_cpus::get();
    let started = Instant::now();
    let doc = parse(&path, ParseOptions::default().threads(threads))?;
    let parsed = started.elapsed();
    eprintln!("parse: {parsed:?} ({threads} threads)");

    doc.structural_check()?;
    eprintln!("check: {:?}", started.elapsed() - parsed);
    eprintln!(
        "arena: {} slab cells, {} free in regions",
        doc.arena().slab_len(),
        doc.arena().free_region_cells()
    );
    Ok(())
}
