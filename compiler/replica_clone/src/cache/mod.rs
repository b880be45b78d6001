//! Plan caches.
//!
//! Two caches sit in front of the compiler: the typed cache, keyed by the
//! declared type of a call or field, and the runtime-dispatch cache, keyed
//! by the concrete runtime type of a value. Entries are added and never
//! removed or replaced.


use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use replica_host::{TypeId, Value};

use crate::plan::{ClonerPair, Mode};
use crate::{CloneError, Cloner, CompilePolicy};

/// Lazily filled map from type to compiled entry.
///
/// Only successful compilations are published. Host failures (for example
/// a type that is declared but not yet defined) are returned to the caller
/// and retried on the next call.
pub(crate) struct CompileCache<T> {
    ready: DashMap<TypeId, Arc<T>, FxBuildHasher>,
    /// Per-type locks held while a type compiles under
    /// [`CompilePolicy::SingleFlight`].
    flights: DashMap<TypeId, Arc<Mutex<()>>, FxBuildHasher>,
    policy: CompilePolicy,
    compilations: AtomicUsize,
}

impl<T> CompileCache<T> {
    pub fn new(policy: CompilePolicy) -> Self {
        CompileCache {
            ready: DashMap::with_hasher(FxBuildHasher),
            flights: DashMap::with_hasher(FxBuildHasher),
            policy,
            compilations: AtomicUsize::new(0),
        }
    }

    /// Publish `entry` ahead of any compilation.
    pub fn seed(&self, ty: TypeId, entry: T) {
        self.ready.insert(ty, Arc::new(entry));
    }

    /// Cached entry for `ty`, compiling it on first use.
    ///
    /// Under [`CompilePolicy::Racy`] threads that miss at the same time
    /// each run `compile`; the first entry published wins and is returned
    /// to every caller. Under [`CompilePolicy::SingleFlight`] the first
    /// thread compiles while the rest wait on the type's flight lock; if it
    /// fails, the next thread through the lock compiles again.
    pub fn get_or_compile(
        &self,
        ty: TypeId,
        compile: impl FnOnce() -> Result<T, CloneError>,
    ) -> Result<Arc<T>, CloneError> {
        if let Some(hit) = self.lookup(ty) {
            return Ok(hit);
        }
        match self.policy {
            CompilePolicy::Racy => {
                let entry = self.compile(compile)?;
                Ok(self.publish(ty, entry))
            }
            CompilePolicy::SingleFlight => {
                let flight = Arc::clone(self.flights.entry(ty).or_default().value());
                let result = {
                    let _guard = flight.lock();
                    match self.lookup(ty) {
                        Some(hit) => Ok(hit),
                        None => self.compile(compile).map(|entry| self.publish(ty, entry)),
                    }
                };
                // A failed flight stays registered so the next caller retries
                // under the same lock as the threads already waiting on it.
                if result.is_ok() {
                    self.flights.remove_if(&ty, |_, current| Arc::ptr_eq(current, &flight));
                }
                result
            }
        }
    }

    fn lookup(&self, ty: TypeId) -> Option<Arc<T>> {
        let hit = self.ready.get(&ty).map(|entry| Arc::clone(entry.value()));
        if hit.is_some() {
            tracing::trace!(ty = ty.raw(), "plan cache hit");
        }
        hit
    }

    fn compile(
        &self,
        compile: impl FnOnce() -> Result<T, CloneError>,
    ) -> Result<Arc<T>, CloneError> {
        self.compilations.fetch_add(1, Ordering::Relaxed);
        compile().map(Arc::new)
    }

    /// Insert `entry` unless another thread got there first; either way,
    /// return the published entry.
    fn publish(&self, ty: TypeId, entry: Arc<T>) -> Arc<T> {
        Arc::clone(self.ready.entry(ty).or_insert(entry).value())
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }
}

/// Type-erased entry of the runtime-dispatch cache.
///
/// Accepts any value whose runtime type is exactly the compiled type and
/// runs that type's plans on it.
pub(crate) struct ErasedCloner {
    pair: Arc<ClonerPair>,
}

impl ErasedCloner {
    pub fn new(pair: Arc<ClonerPair>) -> Self {
        ErasedCloner { pair }
    }

    pub fn run(
        &self,
        cloner: &Cloner,
        value: &Value,
        mode: Mode,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let host = cloner.host();
        match host.runtime_type(value) {
            None => Ok(value.clone()),
            Some(ty) if ty == self.pair.ty => cloner.execute(&self.pair, mode, value, depth),
            Some(ty) => Err(CloneError::TypeMismatch {
                expected: Arc::clone(&self.pair.name),
                found: host.name_of(ty)?,
            }),
        }
    }
}

/// Snapshot of cache sizes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries in the typed cache.
    pub typed: usize,
    /// Entries in the runtime-dispatch cache, including the seeded top type.
    pub runtime: usize,
    /// Compilations run by the typed cache. Exceeds `typed` when racing
    /// threads compiled the same type.
    pub compilations: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} typed, {} runtime, {} compilations",
            self.typed, self.runtime, self.compilations
        )
    }
}
