//! Builder and read-only accessor for the interned string blobs that
//! back entry text, comments, and spelling tips in compiled artifacts.

use std::collections::HashMap;

/// Build-time string interner. Ids are assigned in first-insertion order,
/// so a build over a deterministically-ordered vocabulary yields
/// deterministic ids.
#[derive(Debug, Default)]
pub struct StringTableBuilder {
    strings: Vec<String>,
    index: HashMap<String, u32>,
    weights: Vec<f32>,
}

impl StringTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning its id. Re-adding an already-interned string
    /// composes the stored weight by `max` rather than appending a
    /// duplicate entry.
    pub fn add(&mut self, s: &str, weight: f32) -> u32 {
        if let Some(&id) = self.index.get(s) {
            let slot = &mut self.weights[id as usize];
            if weight > *slot {
                *slot = weight;
            }
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.weights.push(weight);
        self.index.insert(s.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Serializes into a single section: `u32 count`, then for each string
    /// in id order a `u32 byte_len` followed by its UTF-8 bytes, then an
    /// `f32` weight. A trailing offset table lets a mapped reader seek
    /// directly to string `i` without scanning from the start.
    pub fn finish(&self) -> Vec<u8> {
        let mut body = Vec::new();
        let mut offsets = Vec::with_capacity(self.strings.len());
        for s in &self.strings {
            offsets.push(body.len() as u32);
            body.extend_from_slice(&(s.len() as u32).to_le_bytes());
            body.extend_from_slice(s.as_bytes());
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(self.strings.len() as u32).to_le_bytes());
        for off in &offsets {
            out.extend_from_slice(&off.to_le_bytes());
        }
        for w in &self.weights {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.extend_from_slice(&body);
        out
    }
}

/// Read-only view over a section produced by [`StringTableBuilder::finish`].
pub struct StringTable<'a> {
    bytes: &'a [u8],
    count: usize,
    offsets_at: usize,
    weights_at: usize,
    body_at: usize,
}

impl<'a> StringTable<'a> {
    pub fn parse(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }
        let count = u32::from_le_bytes(bytes[0..4].try_into().ok()?) as usize;
        let offsets_at = 4;
        let weights_at = offsets_at + count * 4;
        let body_at = weights_at + count * 4;
        if bytes.len() < body_at {
            return None;
        }
        Some(Self {
            bytes,
            count,
            offsets_at,
            weights_at,
            body_at,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, id: u32) -> Option<&'a str> {
        let id = id as usize;
        if id >= self.count {
            return None;
        }
        let off_slot = self.offsets_at + id * 4;
        let rel = u32::from_le_bytes(self.bytes[off_slot..off_slot + 4].try_into().ok()?) as usize;
        let pos = self.body_at + rel;
        let len = u32::from_le_bytes(self.bytes[pos..pos + 4].try_into().ok()?) as usize;
        std::str::from_utf8(&self.bytes[pos + 4..pos + 4 + len]).ok()
    }

    pub fn weight(&self, id: u32) -> Option<f32> {
        let id = id as usize;
        if id >= self.count {
            return None;
        }
        let slot = self.weights_at + id * 4;
        Some(f32::from_le_bytes(
            self.bytes[slot..slot + 4].try_into().ok()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_and_dedups() {
        let mut builder = StringTableBuilder::new();
        let a = builder.add("hello", 1.0);
        let b = builder.add("world", 2.0);
        let a2 = builder.add("hello", 3.0);
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(builder.len(), 2);

        let bytes = builder.finish();
        let table = StringTable::parse(&bytes).unwrap();
        assert_eq!(table.get(a).unwrap(), "hello");
        assert_eq!(table.get(b).unwrap(), "world");
        assert_eq!(table.weight(a).unwrap(), 3.0);
    }
}
