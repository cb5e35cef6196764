//! Collection operations.

use super::Store;
use crate::config::Mode;
use crate::error::{StoreError, StoreResult};
use crate::record::{share, Locked, Record, Shared};
use stowdb_codec::Codec;
use tracing::{debug, trace};

impl<T: Record, C: Codec> Store<T, C> {
    /// Appends `items` in order. Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read or written
    /// (strict mode).
    pub fn insert(&self, items: impl IntoIterator<Item = T>) -> StoreResult<()> {
        let result = (|| -> StoreResult<()> {
            let mut state = self.state.lock();
            let mut records = self.load(&state)?;
            let before = records.len();
            records.extend(items.into_iter().map(share));
            trace!(added = records.len() - before, total = records.len(), "insert");
            self.push(&mut state, records)
        })();
        self.report("insert", result)
    }

    /// Replaces the whole collection with copies of `items`.
    ///
    /// In-memory stores keep codec clones, so the store shares nothing with
    /// the caller. An empty slice clears the store.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if a record does not round-trip through the
    /// codec or the backing file cannot be written.
    pub fn fill(&self, items: &[T]) -> StoreResult<()> {
        let result = (|| -> StoreResult<()> {
            match self.mode {
                Mode::InMemory => {
                    let records = items
                        .iter()
                        .map(|item| self.codec.deep_clone(item).map(share))
                        .collect::<Result<Vec<_>, _>>()?;
                    let mut state = self.state.lock();
                    trace!(total = records.len(), "fill");
                    self.push(&mut state, records)
                }
                // Encoding isolates the file from `items` already.
                Mode::Strict => {
                    let mut state = self.state.lock();
                    trace!(total = items.len(), "fill");
                    self.persist(&mut state, items)
                }
            }
        })();
        self.report("fill", result)
    }

    /// Removes one stored record per victim.
    ///
    /// Records are compared by their codec representation, so fields the
    /// codec skips do not matter. For each victim the first match is
    /// swap-removed: the last record moves into its slot, which means the
    /// order of the survivors is not preserved. A victim that matches
    /// several records removes only one of them; pass it twice to remove
    /// two. Nothing is written if no victim matched.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if a record cannot be encoded or the backing
    /// file cannot be read or written.
    pub fn drop(&self, victims: &[T]) -> StoreResult<usize> {
        let result = (|| -> StoreResult<usize> {
            let targets = victims
                .iter()
                .map(|victim| self.codec.represent(victim))
                .collect::<Result<Vec<_>, _>>()?;

            let mut state = self.state.lock();
            let mut records = self.load(&state)?;
            let mut reprs = records
                .iter()
                .map(|record| self.codec.represent(&*record.read()))
                .collect::<Result<Vec<_>, _>>()?;

            let mut removed = 0;
            for target in &targets {
                if let Some(index) = reprs.iter().position(|repr| repr == target) {
                    records.swap_remove(index);
                    reprs.swap_remove(index);
                    removed += 1;
                }
            }

            trace!(victims = victims.len(), removed, "drop");
            if removed > 0 {
                self.push(&mut state, records)?;
            }
            Ok(removed)
        })();
        self.report("drop", result)
    }

    /// Removes every record for which `predicate` returns `true`.
    ///
    /// The survivors keep their relative order. The predicate runs while
    /// the store is locked. Nothing is written if nothing matched.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read or written.
    pub fn drop_where<F>(&self, mut predicate: F) -> StoreResult<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let result = (|| -> StoreResult<usize> {
            let mut state = self.state.lock();
            let mut records = self.load(&state)?;
            let before = records.len();

            records.retain(|record| !predicate(&*record.read()));

            let removed = before - records.len();
            trace!(removed, remaining = records.len(), "drop_where");
            if removed > 0 {
                self.push(&mut state, records)?;
            }
            Ok(removed)
        })();
        self.report("drop_where", result)
    }

    /// Applies `handler` to a copy of every record, in order, then stores
    /// the copies in place of the originals.
    ///
    /// The store stays locked from the first handler call until the result
    /// is stored, so no other operation can observe a half-mapped
    /// collection. Stored records are only read, never locked for writing,
    /// and are left untouched if the handler panics. In in-memory mode the
    /// copies are codec clones: fields the codec skips start from their
    /// defaults, and handles from earlier [`uwhere`](Self::uwhere) calls no
    /// longer reach the store. An empty store is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read or written,
    /// or a record does not round-trip through the codec.
    pub fn map<F>(&self, mut handler: F) -> StoreResult<()>
    where
        F: FnMut(&mut T),
    {
        let result = (|| -> StoreResult<()> {
            let mut state = self.state.lock();
            let mut records = self.snapshot(&state)?;
            if records.is_empty() {
                return Ok(());
            }

            for record in &mut records {
                handler(record);
            }

            trace!(total = records.len(), "map");
            self.push(&mut state, records.into_iter().map(share).collect())
        })();
        self.report("map", result)
    }

    /// Returns copies of the records for which `predicate` returns `true`,
    /// in stored order.
    ///
    /// The store is locked only while the snapshot is taken; the predicate
    /// runs afterwards. Changing a returned record never affects the store.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read, or a record
    /// does not round-trip through the codec.
    pub fn where_<F>(&self, mut predicate: F) -> StoreResult<Vec<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let result = (|| -> StoreResult<Vec<T>> {
            let snapshot = {
                let state = self.state.lock();
                self.snapshot(&state)?
            };
            Ok(snapshot
                .into_iter()
                .filter(|record| predicate(record))
                .collect())
        })();
        self.report("where", result)
    }

    /// Like [`where_`](Self::where_), but returns handles to the stored
    /// records instead of copies.
    ///
    /// Skips the clone step. In in-memory mode a write through a returned
    /// handle changes the store's own record and is seen by later reads,
    /// without going through the store lock and without marking the store
    /// dirty. A handle stays attached until an operation replaces the record
    /// it points at ([`fill`](Self::fill), [`map`](Self::map)). In strict
    /// mode the handles wrap freshly decoded records that are not connected
    /// to the file.
    ///
    /// Do not hold a handle's guard across a call on this store. Operations
    /// read-lock records while holding the store lock, so a write guard held
    /// into a store call deadlocks.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read.
    pub fn uwhere<F>(&self, mut predicate: F) -> StoreResult<Vec<Shared<T>>>
    where
        F: FnMut(&T) -> bool,
    {
        let result = (|| -> StoreResult<Vec<Shared<T>>> {
            let records = {
                let state = self.state.lock();
                self.load(&state)?
            };
            Ok(records
                .into_iter()
                .filter(|record| predicate(&*record.read()))
                .collect())
        })();
        self.report("uwhere", result)
    }

    /// Returns a copy of the whole collection.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read, or a record
    /// does not round-trip through the codec.
    pub fn get_collection(&self) -> StoreResult<Vec<T>> {
        let result = (|| -> StoreResult<Vec<T>> {
            let state = self.state.lock();
            self.snapshot(&state)
        })();
        self.report("get_collection", result)
    }

    /// Writes the in-memory collection to the backing file and syncs it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CommitInStrictMode`] in strict mode
    /// - [`StoreError::CommitWithoutBacking`] without a backing file
    ///
    /// Both are usage errors; nothing is read or written. A fatal error is
    /// returned if encoding or writing fails.
    pub fn commit(&self) -> StoreResult<()> {
        if self.mode == Mode::Strict {
            return Err(StoreError::CommitInStrictMode);
        }
        if !self.has_backing {
            return Err(StoreError::CommitWithoutBacking);
        }

        let result = (|| -> StoreResult<()> {
            let mut state = self.state.lock();
            let cache = state.cache.clone();
            let view: Vec<Locked<'_, T>> = cache.iter().map(Locked).collect();
            self.persist(&mut state, &view)?;
            state.dirty = false;
            debug!(location = %self.location, records = cache.len(), "committed");
            Ok(())
        })();
        self.report("commit", result)
    }
}
