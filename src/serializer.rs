//! Writing a document tree back out as JSON text.
//!
//! Pre-order walk: objects emit `{ k : v, … }`, arrays emit `[ v, … ]`.
//! Strings are quoted with `\\`, `\"`, and `\n` escapes, and `\uHHHH` for
//! the remaining bytes in `[0x01, 0x1F]` plus `0x7F`. Doubles print with
//! six fractional digits; integers in their natural radix; booleans and
//! null as their literals. The output round-trips to an equivalent tape —
//! whitespace and escape spelling are not preserved from the input.

use crate::arena::NodeArena;
use crate::node_ref::NodeRef;
use crate::value::{Scalar, Value};
use std::io::{self, Write};

/// Serialize the subtree under `root` (normally the document root) to `out`.
pub fn serialize<W: Write>(arena: &NodeArena, root: NodeRef, out: &mut W) -> io::Result<()> {
    write_children(arena, root, out)
}

/// Serialize to an owned string.
pub fn to_string(arena: &NodeArena, root: NodeRef) -> String {
    let mut buf = Vec::new();
    // Vec<u8> writes cannot fail
    let _ = serialize(arena, root, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_children<W: Write>(arena: &NodeArena, r: NodeRef, out: &mut W) -> io::Result<()> {
    let node = arena.node(r);
    let object = node.kind().is_object_like();
    let children = node.children();
    let mut i = 0;
    while i < children.len() {
        let child = arena.node(children[i]);
        if child.kind().is_container() {
            if object {
                // a keyed container carries its key in its own value
                write_value(out, child.value())?;
            }
            write_container(arena, children[i], out)?;
            i += 1;
        } else if object {
            write_value(out, child.value())?;
            if let Some(&v) = children.get(i + 1) {
                write_value(out, arena.node(v).value())?;
            }
            i += 2;
        } else {
            write_value(out, child.value())?;
            i += 1;
        }
        if i < children.len() {
            out.write_all(b", ")?;
        }
    }
    Ok(())
}

fn write_container<W: Write>(arena: &NodeArena, r: NodeRef, out: &mut W) -> io::Result<()> {
    let object = arena.node(r).kind().is_object_like();
    out.write_all(if object { b"{ " } else { b"[ " })?;
    write_children(arena, r, out)?;
    out.write_all(if object { b" }" } else { b" ]" })?;
    Ok(())
}

fn write_value<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    match &value.scalar {
        Scalar::String(s) => write_escaped(out, s)?,
        Scalar::Int(v) => write!(out, "{v}")?,
        Scalar::Uint(v) => write!(out, "{v}")?,
        Scalar::Double(v) => write!(out, "{v:.6}")?,
        Scalar::Bool(v) => write!(out, "{v}")?,
        Scalar::Null => out.write_all(b"null")?,
        Scalar::None => {}
    }
    if value.is_key {
        out.write_all(b" : ")?;
    }
    Ok(())
}

fn write_escaped<W: Write>(out: &mut W, s: &str) -> io::Result<()> {
    out.write_all(b"\"")?;
    for c in s.chars() {
        match c {
            '\\' => out.write_all(b"\\\\")?,
            '"' => out.write_all(b"\\\"")?,
            '\n' => out.write_all(b"\\n")?,
            c if (1..0x20).contains(&(c as u32)) || c as u32 == 0x7F => {
                write!(out, "\\u{:04X}", c as u32)?
            }
            c => {
                let mut buf = [0u8; 4];
                out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            }
        }
    }
    out.write_all(b"\"")
}
