//! Safe split-point discovery for the parallel build.
//!
//! Given a sealed tape and a desired worker count, propose cut points so
//! that every worker receives a contiguous slice it can interpret on its
//! own. A cut at `a + 1` is safe iff slot `a` is a discriminant slot (never
//! the raw-payload slot of a number) and `tape[a + 1]` is a container close
//! or a key: the next worker then starts either at a container boundary or
//! just after a completed scalar preceding a key, both states the partial
//! builder understands.
//!
//! Alignment is established by walking token-by-token from the previous
//! confirmed cut, so the scan can never mistake a number payload for a
//! discriminant. A guess with no safe boundary before the next guess is
//! dropped; that worker simply gets no slice.

use crate::tape::{Tape, TapeKind};

/// Compute cut points `1 = c0 < c1 < … < ck = len - 1` for up to `threads`
/// workers over `tape[1 .. len - 1]` (the root slots at both ends are not
/// part of any slice).
pub fn find_cuts(tape: &Tape, len: usize, threads: usize) -> Vec<usize> {
    let threads = threads.max(1);
    let last = len - 1;
    let mut cuts = vec![1usize];
    if threads == 1 || last <= 2 {
        cuts.push(last);
        return cuts;
    }

    let mut pos = 1usize;
    for i in 1..threads {
        let guess = len / threads * i;
        let bound = if i + 1 < threads {
            (len / threads * (i + 1)).min(last)
        } else {
            last
        };
        while pos < guess && pos < last {
            pos += tape.width(pos);
        }
        let mut found = None;
        while pos + 1 < bound {
            if tape.width(pos) == 2 {
                // a number: the next slot is its raw payload, not a boundary
                pos += 2;
                continue;
            }
            if matches!(
                tape.kind(pos + 1),
                Some(TapeKind::EndObject) | Some(TapeKind::EndArray) | Some(TapeKind::Key)
            ) {
                found = Some(pos + 1);
                break;
            }
            pos += 1;
        }
        if let Some(cut) = found {
            if cut > *cuts.last().unwrap_or(&0) && cut < last {
                cuts.push(cut);
            }
            pos = cut;
        }
    }

    cuts.push(last);
    cuts
}
