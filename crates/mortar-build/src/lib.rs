//! Mortar build system infrastructure
//!
//! Provides build-script synthesis and orchestration for mortar
//! projects:
//! - Ordered build-script accumulation with a minimum-generator-version
//!   watermark
//! - Target-kind plugins (binary, static, shared, module, header-only,
//!   interface) behind a capability interface with an extension point
//! - Task synthesis from resolved dependency graphs, leaf-first
//! - Build profiles (debug, release)
//! - External generator and build-tool invocation

pub mod error;
pub mod orchestrator;
pub mod plugin;
pub mod profile;
pub mod script;
pub mod sources;
pub mod tasks;
pub mod toolchain;

// Re-export main types
pub use error::{BuildError, BuildResult};
pub use orchestrator::{Builder, Generation, DEFAULT_GENERATOR};
pub use plugin::{EmitContext, PluginRegistry, TargetPlugin};
pub use profile::Profile;
pub use script::{CMakeScript, Language, LibraryKind, Visibility};
pub use tasks::{BuildTask, Synthesis, TaskSynthesizer};

// Re-export resolver types the CLI reports on
pub use mortar_resolver::{Resolution, ResolvedNode, VersionWarning};
