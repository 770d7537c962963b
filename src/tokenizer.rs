//! Scalar JSON scanner producing the structural tape.
//!
//! This is the stand-in for the external SIMD tokenizer: a single pass over
//! the input bytes that emits the fixed tape format of [`tape`](crate::tape)
//! — root slots at both ends, matching-index/count payloads on the
//! structural slots, a distinct key discriminant, two-slot numbers, and a
//! string buffer of length-prefixed unescaped UTF-8.
//!
//! It performs all the validation the tree-assembly core relies on:
//! grammar, literals, number syntax, string escapes including `\uXXXX`
//! surrogate pairs, and rejection of unescaped control bytes. Containers
//! are tracked iteratively on an explicit stack, so nesting depth is bound
//! only by memory.

use crate::error::ParseError;
use crate::tape::{COUNT_MASK, Tape, TapeKind};

/// Scan `input` into a sealed tape.
pub fn tokenize(input: &[u8]) -> Result<Tape, ParseError> {
    Scanner::new(input).run()
}

/// One open container while scanning.
struct Frame {
    open_slot: usize,
    is_object: bool,
    count: u64,
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    slots: Vec<u64>,
    strings: Vec<u8>,
    stack: Vec<Frame>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            slots: Vec::with_capacity(input.len() / 4 + 4),
            strings: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Tape, ParseError> {
        self.slots.push(TapeKind::Root.pack(0));
        self.skip_ws();
        if self.pos >= self.input.len() {
            return Err(self.fail("empty input"));
        }
        self.document_value()?;
        self.skip_ws();
        if self.pos < self.input.len() {
            return Err(self.fail("trailing characters after the document"));
        }
        self.slots.push(TapeKind::Root.pack(0));
        let total = self.slots.len() as u64;
        self.slots[0] = TapeKind::Root.pack(total);
        Ok(Tape::from_parts(self.slots, self.strings))
    }

    /// Parse the single document value, containers handled iteratively.
    fn document_value(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            let b = match self.peek() {
                Some(b) => b,
                None => return Err(self.fail("unexpected end of input")),
            };
            let done = match b {
                b'{' => {
                    self.pos += 1;
                    let open_slot = self.slots.len();
                    self.slots.push(0);
                    self.stack.push(Frame {
                        open_slot,
                        is_object: true,
                        count: 0,
                    });
                    self.skip_ws();
                    match self.peek() {
                        Some(b'}') => {
                            self.pos += 1;
                            self.close_top();
                            !self.after_value()?
                        }
                        Some(b'"') => {
                            self.key_and_colon()?;
                            continue;
                        }
                        _ => return Err(self.fail("expected '\"' or '}' in object")),
                    }
                }
                b'[' => {
                    self.pos += 1;
                    let open_slot = self.slots.len();
                    self.slots.push(0);
                    self.stack.push(Frame {
                        open_slot,
                        is_object: false,
                        count: 0,
                    });
                    self.skip_ws();
                    if self.peek() == Some(b']') {
                        self.pos += 1;
                        self.close_top();
                        !self.after_value()?
                    } else {
                        continue;
                    }
                }
                b'"' => {
                    let bytes = self.string_literal()?;
                    self.push_string(TapeKind::String, &bytes);
                    !self.after_value()?
                }
                b't' => {
                    self.literal(b"true")?;
                    self.slots.push(TapeKind::True.pack(0));
                    !self.after_value()?
                }
                b'f' => {
                    self.literal(b"false")?;
                    self.slots.push(TapeKind::False.pack(0));
                    !self.after_value()?
                }
                b'n' => {
                    self.literal(b"null")?;
                    self.slots.push(TapeKind::Null.pack(0));
                    !self.after_value()?
                }
                b'-' | b'0'..=b'9' => {
                    self.number()?;
                    !self.after_value()?
                }
                _ => return Err(self.fail("unexpected character")),
            };
            if done {
                return Ok(());
            }
        }
    }

    /// One value just completed. Bump the enclosing count, then consume
    /// separators and closes. `Ok(true)` means another value follows;
    /// `Ok(false)` means the document value is complete.
    fn after_value(&mut self) -> Result<bool, ParseError> {
        loop {
            let is_object = match self.stack.last_mut() {
                Some(frame) => {
                    frame.count += 1;
                    frame.is_object
                }
                None => return Ok(false),
            };
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    if is_object {
                        self.key_and_colon()?;
                    }
                    return Ok(true);
                }
                Some(b'}') if is_object => {
                    self.pos += 1;
                    self.close_top();
                }
                Some(b']') if !is_object => {
                    self.pos += 1;
                    self.close_top();
                }
                Some(_) => return Err(self.fail("expected ',' or a container close")),
                None => return Err(self.fail("unexpected end of input inside a container")),
            }
        }
    }

    /// Pop the top frame and patch the opener/closer payloads.
    fn close_top(&mut self) {
        let frame = match self.stack.pop() {
            Some(f) => f,
            None => return,
        };
        let close_slot = self.slots.len();
        let (open_kind, close_kind) = if frame.is_object {
            (TapeKind::StartObject, TapeKind::EndObject)
        } else {
            (TapeKind::StartArray, TapeKind::EndArray)
        };
        self.slots.push(close_kind.pack(frame.open_slot as u64));
        let count = frame.count.min(COUNT_MASK);
        self.slots[frame.open_slot] = open_kind.pack((count << 32) | (close_slot as u64 + 1));
    }

    fn key_and_colon(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() != Some(b'"') {
            return Err(self.fail("expected object key"));
        }
        let bytes = self.string_literal()?;
        self.push_string(TapeKind::Key, &bytes);
        self.skip_ws();
        if self.peek() != Some(b':') {
            return Err(self.fail("expected ':' after object key"));
        }
        self.pos += 1;
        Ok(())
    }

    fn push_string(&mut self, kind: TapeKind, bytes: &[u8]) {
        let offset = self.strings.len() as u64;
        self.strings
            .extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.strings.extend_from_slice(bytes);
        self.slots.push(kind.pack(offset));
    }

    /// Scan a quoted string, decoding escapes into UTF-8 bytes.
    fn string_literal(&mut self) -> Result<Vec<u8>, ParseError> {
        self.pos += 1; // opening quote
        let mut out = Vec::new();
        loop {
            let b = match self.input.get(self.pos) {
                Some(&b) => b,
                None => return Err(self.fail("unterminated string")),
            };
            match b {
                b'"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    self.pos += 1;
                    self.escape(&mut out)?;
                }
                0x00..=0x1F => return Err(self.fail("unescaped control character in string")),
                _ => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let e = match self.input.get(self.pos) {
            Some(&e) => e,
            None => return Err(self.fail("unterminated escape")),
        };
        self.pos += 1;
        let simple = match e {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'u' => None,
            _ => return Err(self.fail("invalid escape")),
        };
        if let Some(b) = simple {
            out.push(b);
            return Ok(());
        }
        let unit = self.hex4()?;
        let cp = if (0xD800..=0xDBFF).contains(&unit) {
            // high surrogate: a low surrogate must follow
            if self.input.get(self.pos) != Some(&b'\\') || self.input.get(self.pos + 1) != Some(&b'u')
            {
                return Err(self.fail("unpaired surrogate"));
            }
            self.pos += 2;
            let low = self.hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.fail("invalid low surrogate"));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        } else if (0xDC00..=0xDFFF).contains(&unit) {
            return Err(self.fail("unpaired surrogate"));
        } else {
            unit
        };
        match char::from_u32(cp) {
            Some(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                Ok(())
            }
            None => Err(self.fail("invalid unicode escape")),
        }
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let mut v = 0u32;
        for _ in 0..4 {
            let d = match self.input.get(self.pos).copied() {
                Some(d @ b'0'..=b'9') => u32::from(d - b'0'),
                Some(d @ b'a'..=b'f') => u32::from(d - b'a') + 10,
                Some(d @ b'A'..=b'F') => u32::from(d - b'A') + 10,
                _ => return Err(self.fail("invalid hex digit in escape")),
            };
            v = (v << 4) | d;
            self.pos += 1;
        }
        Ok(v)
    }

    /// Scan a number and emit its two tape slots.
    fn number(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.fail("leading zero in number"));
                }
            }
            Some(b'1'..=b'9') => self.digits(),
            _ => return Err(self.fail("invalid number")),
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.fail("digits required after decimal point"));
            }
            self.digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.fail("digits required in exponent"));
            }
            self.digits();
        }

        let text: &str = match std::str::from_utf8(&self.input[start..self.pos]) {
            Ok(t) => t,
            Err(_) => return Err(self.fail("invalid number")),
        };
        if !is_float {
            if negative {
                if let Ok(v) = text.parse::<i64>() {
                    self.slots.push(TapeKind::Int64.pack(0));
                    self.slots.push(v as u64);
                    return Ok(());
                }
            } else if let Ok(v) = text.parse::<u64>() {
                if v <= i64::MAX as u64 {
                    self.slots.push(TapeKind::Int64.pack(0));
                    self.slots.push(v);
                } else {
                    self.slots.push(TapeKind::Uint64.pack(0));
                    self.slots.push(v);
                }
                return Ok(());
            }
        }
        // floats, and integers wide enough to overflow 64 bits
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => {
                self.slots.push(TapeKind::Double.pack(0));
                self.slots.push(v.to_bits());
                Ok(())
            }
            _ => Err(self.fail("number out of range")),
        }
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    fn literal(&mut self, word: &[u8]) -> Result<(), ParseError> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(())
        } else {
            Err(self.fail("invalid literal"))
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn fail(&self, message: &str) -> ParseError {
        ParseError::TokenizerFailure {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_of_a_small_array() {
        let tape = tokenize(b"[1,2]").unwrap();
        // r [ l 1 l 2 ] r
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.kind(0), Some(TapeKind::Root));
        assert_eq!(tape.payload(0), 8);
        assert_eq!(tape.kind(1), Some(TapeKind::StartArray));
        assert_eq!(tape.count_hint(1), 2);
        assert_eq!(tape.kind(6), Some(TapeKind::EndArray));
        assert_eq!(tape.matching_open(6), 1);
        assert_eq!(tape.kind(7), Some(TapeKind::Root));
    }

    #[test]
    fn opener_points_one_past_its_close() {
        let tape = tokenize(b"{\"a\":[true]}").unwrap();
        // r { k [ t ] } r
        assert_eq!(tape.kind(3), Some(TapeKind::StartArray));
        assert_eq!(tape.payload(3) & u64::from(u32::MAX), 6);
        assert_eq!(tape.matching_open(5), 3);
    }
}
