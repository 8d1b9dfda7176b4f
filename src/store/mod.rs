//! TTL-cached read stores over the snapshot files.
//!
//! Each store keeps one immutable snapshot behind a read-write lock. Reads
//! clone the `Arc` under the read lock and work on it without holding the
//! lock, so a reload swaps the snapshot wholesale and no reader ever sees a
//! partial one. A read that finds the snapshot older than its TTL reloads
//! it first; a failed reload keeps the previous snapshot.
//!
//! Loaders sort what they read, so every snapshot is ordered by
//! (dept, number), or by name for instructors, before anyone can read it.

mod instructors;
mod outlines;
mod sections;
mod sections_with_outlines;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use url::Url;

use crate::error::Result;
use crate::models::{CourseKeyed, StoreConfig, TermKey};
use crate::storage::SnapshotLayout;

pub use instructors::{InstructorLoader, InstructorStore};
pub use outlines::{OutlineLoader, OutlineStore};
pub use sections::{SectionLoader, SectionStore, TermSnapshots};
pub use sections_with_outlines::{SectionsWithOutlinesLoader, SectionsWithOutlinesStore};

/// Produces a fresh, sorted snapshot.
pub trait SnapshotLoader: Send + Sync {
    type Snapshot: Send + Sync;

    /// What is being loaded, for log lines.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Self::Snapshot>;
}

struct Loaded<S> {
    snapshot: Arc<S>,
    loaded_at: Instant,
}

/// A snapshot plus its load time, refreshed on a TTL.
pub struct CachedSnapshot<L: SnapshotLoader> {
    loader: L,
    ttl: Duration,
    state: RwLock<Loaded<L::Snapshot>>,
}

impl<L: SnapshotLoader> CachedSnapshot<L> {
    /// Perform the initial load. Failure here fails construction.
    pub fn new(loader: L, ttl: Duration) -> Result<Self> {
        let snapshot = loader.load()?;
        log::info!("Loaded {}", loader.describe());
        Ok(Self {
            loader,
            ttl,
            state: RwLock::new(Loaded {
                snapshot: Arc::new(snapshot),
                loaded_at: Instant::now(),
            }),
        })
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Reload unconditionally. On failure the previous snapshot stays.
    pub fn force_reload(&self) -> Result<()> {
        let snapshot = self.loader.load()?;
        let mut state = self.write();
        *state = Loaded {
            snapshot: Arc::new(snapshot),
            loaded_at: Instant::now(),
        };
        log::info!("Reloaded {}", self.loader.describe());
        Ok(())
    }

    pub fn is_stale(&self) -> bool {
        self.read().loaded_at.elapsed() > self.ttl
    }

    /// Reload when older than the TTL. Failures are logged, never returned.
    pub fn reload_if_stale(&self) {
        if !self.is_stale() {
            return;
        }

        let mut state = self.write();
        // Another reader may have reloaded while we waited for the lock.
        if state.loaded_at.elapsed() <= self.ttl {
            return;
        }
        match self.loader.load() {
            Ok(snapshot) => {
                *state = Loaded {
                    snapshot: Arc::new(snapshot),
                    loaded_at: Instant::now(),
                };
                log::info!("Reloaded stale {}", self.loader.describe());
            }
            Err(e) => log::warn!(
                "Reload of {} failed, serving previous snapshot: {}",
                self.loader.describe(),
                e
            ),
        }
    }

    /// Current snapshot, reloading first if stale.
    pub fn snapshot(&self) -> Arc<L::Snapshot> {
        self.reload_if_stale();
        Arc::clone(&self.read().snapshot)
    }

    fn read(&self) -> RwLockReadGuard<'_, Loaded<L::Snapshot>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Loaded<L::Snapshot>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Upper-cased, trimmed lookup key part.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Snapshot key for a (year, season) lookup, e.g. `("2025", "Spring")` → `2025-spring`.
pub(crate) fn term_code(year: &str, season: &str) -> String {
    format!("{}-{}", year.trim(), season.trim().to_lowercase())
}

/// Binary search a (dept, number)-sorted slice for an exact match.
///
/// `dept` and `number` must already be normalized.
pub fn find_exact<'a, T: CourseKeyed>(
    items: &'a [T],
    dept: &str,
    number: &str,
) -> Option<&'a T> {
    items
        .binary_search_by(|item| (item.dept(), item.number()).cmp(&(dept, number)))
        .ok()
        .map(|index| &items[index])
}

/// Every item of one department, in snapshot order.
pub fn filter_dept<T: CourseKeyed + Clone>(items: &[T], dept: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.dept() == dept)
        .cloned()
        .collect()
}

/// One page of a larger result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the unpaged result
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T: Clone> Page<T> {
    /// `all[offset..offset + limit]` clamped to bounds.
    ///
    /// A missing limit means "everything after offset". An offset at or past
    /// the end gives an empty page.
    pub fn slice(all: &[T], limit: Option<usize>, offset: Option<usize>) -> Self {
        let total = all.len();
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(total);
        let start = offset.min(total);
        let end = offset.saturating_add(limit).min(total);

        Self {
            items: all[start..end].to_vec(),
            total,
            offset,
            limit,
        }
    }
}

impl<T> Page<T> {
    /// Offset of the following page, if any items remain.
    pub fn next_offset(&self) -> Option<usize> {
        let next = self.offset.saturating_add(self.limit);
        (self.limit > 0 && next < self.total).then_some(next)
    }

    /// `base` with `limit`/`offset` set for the following page.
    pub fn next_url(&self, base: &Url) -> Option<Url> {
        let next = self.next_offset()?;
        let mut url = base.clone();
        let kept: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(k, _)| k != "limit" && k != "offset")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("offset", &next.to_string());
        Some(url)
    }
}

/// Every store the serving side reads from, created once at startup.
pub struct Storage {
    pub outlines: OutlineStore,
    pub sections: SectionStore,
    pub sections_with_outlines: SectionsWithOutlinesStore,
    pub instructors: InstructorStore,
}

impl Storage {
    /// Load every store from `layout`. Any missing or malformed snapshot fails.
    pub fn open(layout: &SnapshotLayout, config: &StoreConfig, terms: &[TermKey]) -> Result<Self> {
        Ok(Self {
            outlines: OutlineStore::open(layout, config.outlines_ttl())?,
            sections: SectionStore::open(layout, terms, config.sections_ttl())?,
            sections_with_outlines: SectionsWithOutlinesStore::open(
                layout,
                terms,
                config.sections_ttl(),
            )?,
            instructors: InstructorStore::open(layout, config.outlines_ttl())?,
        })
    }

    /// Reload every store in sequence, stopping at the first failure.
    pub fn force_reload_all(&self) -> Result<()> {
        self.outlines.force_reload()?;
        self.sections.force_reload()?;
        self.sections_with_outlines.force_reload()?;
        self.instructors.force_reload()?;
        Ok(())
    }
}
