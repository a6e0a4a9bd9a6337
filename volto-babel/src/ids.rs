//! Identifier minting
//!
//! Block ids, column ids and table row/cell keys all come from an injected
//! [`IdSource`], so tests and reproducible CLI runs can swap the random
//! default for a deterministic counter.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of fresh, unique identifiers
pub trait IdSource: Send + Sync {
    fn fresh_id(&self) -> String;
}

/// Random UUID v4 identifiers (the format the CMS uses for block ids)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn fresh_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic identifiers: `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn fresh_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
