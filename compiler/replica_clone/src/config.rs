//! Cloner configuration.
//!
//! Defaults suit most callers. `ClonerConfig::from_env` lets a process
//! override them without code changes:
//!
//! - `REPLICA_COMPILE_POLICY`: `racy` (default) or `single-flight`
//! - `REPLICA_MAX_DEPTH`: nesting limit for a single clone call


use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the [`CompilePolicy`].
pub const COMPILE_POLICY_VAR: &str = "REPLICA_COMPILE_POLICY";

/// Environment variable overriding [`ClonerConfig::max_depth`].
pub const MAX_DEPTH_VAR: &str = "REPLICA_MAX_DEPTH";

/// Default nesting limit for one clone call.
pub const DEFAULT_MAX_DEPTH: usize = 65_536;

/// How the caches behave when several threads first use the same type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CompilePolicy {
    /// Compile outside any lock. Racing threads may each compile the type;
    /// the first published pair is kept and the others are discarded.
    #[default]
    Racy,
    /// Exactly one thread compiles each type while the others wait.
    SingleFlight,
}

impl CompilePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            CompilePolicy::Racy => "racy",
            CompilePolicy::SingleFlight => "single-flight",
        }
    }
}

impl fmt::Display for CompilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compile policy `{0}` (expected `racy` or `single-flight`)")]
pub struct UnknownPolicy(String);

impl FromStr for CompilePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "racy" => Ok(CompilePolicy::Racy),
            "single-flight" | "single_flight" | "singleflight" => Ok(CompilePolicy::SingleFlight),
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}

/// Settings fixed for the lifetime of a `Cloner`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClonerConfig {
    pub compile_policy: CompilePolicy,
    /// Deepest nesting a single clone call may reach before failing with
    /// `CloneError::DepthExceeded`.
    pub max_depth: usize,
}

impl Default for ClonerConfig {
    fn default() -> Self {
        ClonerConfig {
            compile_policy: CompilePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ClonerConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults. Invalid values are reported
    /// with `warn!` and also keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ClonerConfig::default();

        if let Some(raw) = lookup(COMPILE_POLICY_VAR) {
            match raw.parse::<CompilePolicy>() {
                Ok(policy) => config.compile_policy = policy,
                Err(err) => {
                    tracing::warn!(var = COMPILE_POLICY_VAR, %err, "ignoring invalid value");
                }
            }
        }

        if let Some(raw) = lookup(MAX_DEPTH_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                Ok(_) => tracing::warn!(var = MAX_DEPTH_VAR, "ignoring zero depth limit"),
                Err(err) => tracing::warn!(var = MAX_DEPTH_VAR, %err, "ignoring invalid value"),
            }
        }

        config
    }

    #[must_use]
    pub fn with_compile_policy(mut self, policy: CompilePolicy) -> Self {
        self.compile_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
