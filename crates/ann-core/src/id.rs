//! Entry identifiers.
//!
//! Ids are minted by the widget (`entry_0`, `entry_1`, ...) and handed to the
//! host as strings. Strings coming back from the host are only ever looked
//! up, never interned, so a misbehaving page cannot grow the interner.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner backing every `EntryId`.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of one committed entry. Cheap to copy and compare; the
/// string form is what the host sees.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Spur);

impl EntryId {
    /// Intern `s`. Only for ids the widget mints itself; use `lookup` for
    /// strings received from the host.
    pub fn intern(s: &str) -> Self {
        EntryId(INTERNER.get_or_intern(s))
    }

    /// Look up an id the host passed back without interning a new string.
    /// Returns `None` when no entry was ever created with that name.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(EntryId)
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh process-unique ID (`entry_0`, `entry_1`, ...).
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("entry_{n}"))
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryId").field(&self.as_str()).finish()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_id() {
        let a = EntryId::intern("cow_1");
        assert_eq!(a, EntryId::intern("cow_1"));
        assert_eq!(a.to_string(), "cow_1");
        assert_eq!(format!("{a:?}"), r#"EntryId("cow_1")"#);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("entry_"));
    }

    #[test]
    fn lookup_does_not_intern() {
        assert!(EntryId::lookup("never_created_anywhere").is_none());
        let id = EntryId::generate();
        assert_eq!(EntryId::lookup(id.as_str()), Some(id));
    }
}
