//! Type-driven shallow and deep cloning of object graphs.
//!
//! The engine decides once per type how values of that type are cloned,
//! stores the decision as a plan, and interprets the plan on every call:
//!
//! - **Classifier**: safe-to-copy types are shared, never recursed into
//! - **Field planner**: flat field list across the inheritance chain
//! - **Strategy compiler**: builds the shallow and deep plan of a type
//! - **Typed cache**: plans keyed by the declared type
//! - **Runtime-dispatch cache**: plans keyed by the runtime type, used when
//!   the declared type is an interface, an abstract class or the top type
//! - **Collection procedures**: dedicated deep clones for the well-known
//!   mutable collections
//!
//! Deep clones do not preserve sharing inside one graph: two fields
//! holding the same object produce two independent copies.
//!
//! # Example
//!
//! ```text
//! let host = Host::new();
//! let cloner = Cloner::new(host.clone());
//! let copy = cloner.deep_clone(&value, declared_type)?;
//! assert!(copy.equivalent(&value));
//! ```

mod cache;
mod classify;
mod cloner;
mod collections;
mod compile;
mod config;
mod error;
mod exec;
mod fields;
mod plan;
mod stack;
mod tables;

use std::sync::Once;

pub use cache::CacheStats;
pub use cloner::{CloneCx, Cloner, ClonerBuilder, TypedCloner};
pub use compile::MAX_CLONED_RANK;
pub use config::{
    ClonerConfig, CompilePolicy, UnknownPolicy, COMPILE_POLICY_VAR, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_VAR,
};
pub use error::CloneError;
pub use plan::Mode;
pub use tables::{ClonerFactory, CustomClonerTable, CustomProcedure, SafeTypeTable, TypeKey};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output on stderr.
///
/// Does nothing unless `RUST_LOG` is set, for example
/// `RUST_LOG=replica_clone=debug`. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var_os("RUST_LOG").is_some() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host
            // application; keep that one.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .try_init();
        }
    });
}
