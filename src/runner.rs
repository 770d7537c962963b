//! Parse orchestration: partition, parallel build, sequential merge.
//!
//! The flow is a single barrier. The partitioner proposes cut points over
//! the sealed tape; one rayon task per slice runs the partial builder
//! against a disjoint sub-slab of the arena; the coordinator joins them
//! all, publishes each worker's unused suffix as a free region, and then
//! stitches the partials left-to-right through a staging root before
//! attaching the result under the document root. Workers never
//! communicate; any worker failure aborts the parse after the barrier.
//!
//! Slab layout: cells `[0, len)` mirror the tape slot indices (a worker's
//! body slice is exactly its tape slice, as every slot materializes at most
//! one node), followed by one cell for the document root, one for the
//! staging root, and one synthetic root per worker. The synthetic cells are
//! recycled once merging ends, so a finished document owns only real nodes.

use crate::arena::NodeArena;
use crate::builder::{self, PartialOutcome, WorkerSlab};
use crate::error::ParseError;
use crate::merge::merge_partial;
use crate::node::NodeKind;
use crate::node_ref::NodeRef;
use crate::partition::find_cuts;
use crate::serializer;
use crate::tape::{Tape, TapeKind};
use crate::tokenizer::tokenize;
use crate::value::Value;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::Path;

/// Knobs for a parse run.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOptions {
    threads: Option<usize>,
}

impl ParseOptions {
    /// Use exactly `n` workers; `0` (or not calling this) means one per
    /// available CPU.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = if n == 0 { None } else { Some(n) };
        self
    }

    fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// A parsed document: the arena that owns every node, plus the root.
#[derive(Debug)]
pub struct Document {
    arena: NodeArena,
    root: NodeRef,
}

impl Document {
    pub fn root(&self) -> NodeRef {
        self.root
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Write the document back out as JSON text.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serializer::serialize(&self.arena, self.root, out)
    }

    pub fn to_json(&self) -> String {
        serializer::to_string(&self.arena, self.root)
    }

    /// Verify the container invariants over the whole tree.
    pub fn structural_check(&self) -> Result<(), ParseError> {
        self.arena.structural_check(self.root)
    }
}

/// Parse a JSON file with the configured number of workers.
pub fn parse<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = parse_bytes(&text, options)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(doc)
}

/// Parse JSON text with the configured number of workers.
pub fn parse_str(text: &str, options: ParseOptions) -> Result<Document, ParseError> {
    parse_bytes(text.as_bytes(), options)
}

/// Parse JSON bytes with the configured number of workers.
pub fn parse_bytes(input: &[u8], options: ParseOptions) -> Result<Document, ParseError> {
    let tape = tokenize(input)?;
    parse_tape(&tape, options)
}

/// Decode a single JSON scalar from text.
pub fn parse_scalar(text: &str) -> Result<Value, ParseError> {
    let tape = tokenize(text.as_bytes())?;
    Ok(tape.decode(1))
}

/// Assemble a document from an already-produced tape.
pub fn parse_tape(tape: &Tape, options: ParseOptions) -> Result<Document, ParseError> {
    if tape.is_empty() || tape.kind(0) != Some(TapeKind::Root) {
        return Err(ParseError::MissingRoot);
    }
    let len = tape.payload(0) as usize;
    if len < 3 || len > tape.len() {
        return Err(ParseError::MissingRoot);
    }

    let cuts = find_cuts(tape, len, options.effective_threads());
    let workers = cuts.len() - 1;

    // body cells mirror tape slots; then document root, staging root, and
    // one synthetic root per worker
    let mut arena = NodeArena::with_capacity(len + 2 + workers);
    let doc_root = NodeRef::slab(len);
    let staging_root = NodeRef::slab(len + 1);
    arena.node_mut(doc_root).kind = NodeKind::Root;

    let outcomes = run_workers(tape, &mut arena, &cuts, len)?;

    // publish each worker's unused suffix, plus the slots no worker covers
    arena.add_block(0, 1);
    for (w, outcome) in outcomes.iter().enumerate() {
        let begin = cuts[w] + outcome.used;
        let end = if w + 1 == workers { len } else { cuts[w + 1] };
        arena.add_block(begin, end - begin);
    }

    merge_all(&mut arena, &cuts, &outcomes, doc_root, staging_root)?;

    // recycle the synthetic roots; the document keeps only real nodes
    arena.free(staging_root);
    for w in 0..workers {
        arena.free(NodeRef::slab(len + 2 + w));
    }

    Ok(Document {
        arena,
        root: doc_root,
    })
}

/// Launch one builder per slice and join them all.
fn run_workers(
    tape: &Tape,
    arena: &mut NodeArena,
    cuts: &[usize],
    len: usize,
) -> Result<Vec<PartialOutcome>, ParseError> {
    let workers = cuts.len() - 1;
    let (body, roots_row) = arena.slab_mut().split_at_mut(len);
    let worker_roots = &mut roots_row[2..];

    let mut tasks: Vec<(WorkerSlab<'_>, std::ops::Range<usize>)> = Vec::with_capacity(workers);
    let mut rest = body;
    let mut offset = 0usize;
    let mut roots_iter = worker_roots.iter_mut();
    for w in 0..workers {
        let begin = cuts[w];
        let end = cuts[w + 1];
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(begin - offset);
        let (cells, tail) = tail.split_at_mut(end - begin);
        rest = tail;
        offset = end;
        let root = roots_iter.next().expect("one root cell per worker");
        let root_ref = NodeRef::slab(len + 2 + w);
        tasks.push((WorkerSlab::new(begin, cells, root_ref, root), begin..end));
    }
    debug_assert_eq!(rest.len(), len - offset);

    let results: Vec<Result<PartialOutcome, ParseError>> = tasks
        .into_par_iter()
        .map(|(mut slab, range)| builder::build_partial(tape, range, &mut slab))
        .collect();

    let mut outcomes = Vec::with_capacity(workers);
    for r in results {
        outcomes.push(r?);
    }
    Ok(outcomes)
}

/// Stitch the partials left-to-right, then attach the result to the
/// document root.
fn merge_all(
    arena: &mut NodeArena,
    cuts: &[usize],
    outcomes: &[PartialOutcome],
    doc_root: NodeRef,
    staging_root: NodeRef,
) -> Result<(), ParseError> {
    let mut fronts: Vec<NodeRef> = outcomes.iter().map(|o| o.frontier).collect();
    let occupied: Vec<usize> = (0..outcomes.len())
        .filter(|&i| arena.node(outcomes[i].root).child_count() > 0)
        .collect();

    let mut prev: Option<usize> = None;
    for &i in &occupied {
        let into = match prev {
            None => staging_root,
            Some(p) => fronts[p],
        };
        let mut front = fronts[i];
        merge_partial(arena, into, outcomes[i].root, Some(&mut front), cuts[i])?;
        fronts[i] = front;
        prev = Some(i);
    }

    if let Some(last) = prev {
        if fronts[last] != staging_root {
            return Err(ParseError::UnderClose);
        }
    }

    merge_partial(arena, doc_root, staging_root, None, 0)?;
    Ok(())
}
