use crate::arena::{Arena, ArenaRef};

/// Opaque handle to an interned byte string. Two [`Interner::intern`] calls
/// with byte-equal input return the same `InternedStr`, so equality on this
/// type *is* the pointer-identity comparison the spec calls for — comparing
/// small integers is simpler and exactly as sound as comparing raw pointers
/// into arena-owned storage, and does not require `unsafe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedStr(u32);

const INITIAL_BUCKETS: usize = 16;
const LOAD_FACTOR_NUM: usize = 7;
const LOAD_FACTOR_DEN: usize = 10;

struct Entry {
    hash: u64,
    handle: InternedStr,
}

/// Open-addressed hash table over arena-owned byte strings, keyed by
/// `(hash, length, bytes)`. Growth doubles capacity once the load factor
/// exceeds 0.7, matching the spec's interner contract.
pub struct Interner {
    arena: Arena,
    refs: Vec<ArenaRef>,
    buckets: Vec<Option<Entry>>,
    len: usize,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            arena: Arena::new(),
            refs: Vec::new(),
            buckets: (0..INITIAL_BUCKETS).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Interns `s`, copying its bytes into the arena on first sight.
    pub fn intern(&mut self, s: &str) -> InternedStr {
        let hash = fnv1a_64(s.as_bytes());
        if let Some(existing) = self.probe(hash, s.as_bytes()) {
            return existing;
        }
        if (self.len + 1) * LOAD_FACTOR_DEN > self.buckets.len() * LOAD_FACTOR_NUM {
            self.grow();
        }
        let arena_ref = self.arena.alloc_bytes(s.as_bytes());
        let handle = InternedStr(self.refs.len() as u32);
        self.refs.push(arena_ref);
        self.insert_into_buckets(hash, handle);
        self.len += 1;
        handle
    }

    /// Resolves a previously interned handle back to its text.
    ///
    /// `intern` only ever stores bytes that came from a `&str`, so this
    /// re-validation always succeeds; falling back to `""` keeps the
    /// function panic-free rather than relying on that invariant.
    pub fn resolve(&self, handle: InternedStr) -> &str {
        let arena_ref = self.refs[handle.0 as usize];
        std::str::from_utf8(self.arena.get(arena_ref)).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn probe(&self, hash: u64, bytes: &[u8]) -> Option<InternedStr> {
        let mask = self.buckets.len() - 1;
        let mut idx = (hash as usize) & mask;
        for _ in 0..self.buckets.len() {
            match &self.buckets[idx] {
                None => return None,
                Some(entry) if entry.hash == hash => {
                    let candidate_ref = self.refs[entry.handle.0 as usize];
                    if self.arena.get(candidate_ref) == bytes {
                        return Some(entry.handle);
                    }
                }
                Some(_) => {}
            }
            idx = (idx + 1) & mask;
        }
        None
    }

    fn insert_into_buckets(&mut self, hash: u64, handle: InternedStr) {
        let mask = self.buckets.len() - 1;
        let mut idx = (hash as usize) & mask;
        loop {
            if self.buckets[idx].is_none() {
                self.buckets[idx] = Some(Entry { hash, handle });
                return;
            }
            idx = (idx + 1) & mask;
        }
    }

    fn grow(&mut self) {
        let new_size = self.buckets.len() * 2;
        let mut new_buckets: Vec<Option<Entry>> = (0..new_size).map(|_| None).collect();
        std::mem::swap(&mut self.buckets, &mut new_buckets);
        for entry in new_buckets.into_iter().flatten() {
            let mask = self.buckets.len() - 1;
            let mut idx = (entry.hash as usize) & mask;
            loop {
                if self.buckets[idx].is_none() {
                    self.buckets[idx] = Some(entry);
                    break;
                }
                idx = (idx + 1) & mask;
            }
        }
    }
}

/// 64-bit FNV-1a, per the spec's interner hash contract.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
