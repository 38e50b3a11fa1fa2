use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5b0a_7d1e_c3f2_9a41;

/// Stable hasher over the identity of a node in a composition tree.
///
/// Two hashers fed the same scope, path and salt always produce the same id, which keeps
/// synthesized ids stable across reloads of the same project.
pub(crate) struct IdHasher {
    inner: Xxh3,
}

impl IdHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.inner.update(s.as_bytes());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.inner.update(&v.to_le_bytes());
    }

    pub(crate) fn finish(self) -> u64 {
        self.inner.digest()
    }
}

/// Build a deterministic id of the form `{prefix}-{12 hex digits}`.
///
/// `salt` is bumped by callers when the first candidate collides with an existing id.
pub(crate) fn synth_id(prefix: &str, scope: &str, path: &[usize], salt: u64) -> String {
    let mut h = IdHasher::new();
    h.write_str(prefix);
    h.write_str(scope);
    h.write_u64(path.len() as u64);
    for &p in path {
        h.write_u64(p as u64);
    }
    h.write_u64(salt);
    format!("{prefix}-{:012x}", h.finish() & 0xffff_ffff_ffff)
}
