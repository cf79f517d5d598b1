/// Byte-pattern descriptors for signature scanning.
///
/// A pattern is written as space-separated hex bytes, with `??`
/// standing for a byte the scanner must ignore (relocated operands,
/// compiler-dependent encodings).
use anyhow::{Context, Result, bail};

/// Signature of the function the input hook targets. 80 bytes of its
/// prologue, stable across the shipped binary's revisions.
pub const ON_INPUT_EVENT_SIG: &str = "83 EC 1C \
    8B 44 24 20 \
    8B 54 24 24 \
    89 04 24 \
    8B 44 24 28 \
    F3 0F 10 44 24 30 \
    89 44 24 08 \
    33 C0 \
    39 44 24 34 \
    6A 00 \
    0F 95 C0 \
    89 54 24 08 \
    8A 54 24 30 \
    88 54 24 10 \
    8B 11 \
    8B 92 F4 00 00 00 \
    C7 44 24 1C 00 00 00 00 \
    89 44 24 18 \
    8D 44 24 04 \
    50 \
    8D 41 3C \
    50";

/// A masked byte pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    bytes: Vec<u8>,
    mask: Vec<bool>,
}

impl Pattern {
    /// Parse a pattern from hex text. Wildcard bytes are written `??`.
    pub fn parse(text: &str) -> Result<Pattern> {
        let mut bytes = Vec::new();
        let mut mask = Vec::new();
        for token in text.split_whitespace() {
            if token == "??" {
                bytes.push(0);
                mask.push(false);
            } else {
                let byte = u8::from_str_radix(token, 16)
                    .with_context(|| format!("bad pattern byte {token:?}"))?;
                bytes.push(byte);
                mask.push(true);
            }
        }
        if bytes.is_empty() {
            bail!("empty pattern");
        }
        Ok(Pattern { bytes, mask })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the pattern matches at the start of `window`.
    pub fn matches_at(&self, window: &[u8]) -> bool {
        window.len() >= self.len()
            && self
                .bytes
                .iter()
                .zip(&self.mask)
                .zip(window)
                .all(|((byte, significant), seen)| !significant || byte == seen)
    }

    /// Offset of the first match in `haystack`, if any.
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        if haystack.len() < self.len() {
            return None;
        }
        (0..=haystack.len() - self.len()).find(|&offset| self.matches_at(&haystack[offset..]))
    }
}

/// The parsed signature the hook installer scans for.
pub fn on_input_event_pattern() -> Result<Pattern> {
    Pattern::parse(ON_INPUT_EVENT_SIG)
}
