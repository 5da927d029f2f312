use parking_lot::Mutex;

/// Answers whether a representation index is temporarily excluded.
pub trait BlacklistQuery: Send + Sync {
    fn is_blacklisted(&self, index: usize, now_ms: i64) -> bool;
}

/// Blacklist that never excludes anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBlacklist;

impl BlacklistQuery for NoBlacklist {
    fn is_blacklisted(&self, _index: usize, _now_ms: i64) -> bool {
        false
    }
}

/// Expiring per-index exclusion list.
///
/// Typically owned by the fetch layer, which blacklists an index after a
/// failed segment request. Shared with selections through `Arc`.
#[derive(Debug)]
pub struct Blacklist {
    /// Expiry timestamp per index, `None` when not blacklisted.
    expiry_ms: Mutex<Vec<Option<i64>>>,
}

impl Blacklist {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            expiry_ms: Mutex::new(vec![None; len]),
        }
    }

    /// Exclude `index` for `duration_ms` starting at `now_ms`.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range or
    /// when every other index is already blacklisted at `now_ms`.
    pub fn blacklist(&self, index: usize, duration_ms: i64, now_ms: i64) -> bool {
        let mut expiry = self.expiry_ms.lock();
        if index >= expiry.len() {
            return false;
        }

        let others_available = expiry
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && !is_active(*e, now_ms));
        if !others_available {
            return false;
        }

        let until = now_ms.saturating_add(duration_ms.max(0));
        expiry[index] = Some(expiry[index].map_or(until, |prev| prev.max(until)));
        tracing::debug!(index, until, "representation blacklisted");
        true
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.expiry_ms.lock().iter_mut().for_each(|e| *e = None);
    }
}

impl BlacklistQuery for Blacklist {
    fn is_blacklisted(&self, index: usize, now_ms: i64) -> bool {
        self.expiry_ms
            .lock()
            .get(index)
            .is_some_and(|e| is_active(*e, now_ms))
    }
}

fn is_active(expiry: Option<i64>, now_ms: i64) -> bool {
    expiry.is_some_and(|until| until > now_ms)
}
