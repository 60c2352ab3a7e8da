//! tsdart - the semantic core of a TypeScript-to-Dart translator.
//!
//! Given a fully parsed and type-checked program, this library rewrites
//! calls, property accesses, type references and top-level declarations
//! into Dart idioms, and flags constructs that cannot be translated
//! soundly. It is a pure in-process transformation library invoked once
//! per translation unit; the lexer, parser, type checker and the generic
//! tree-walking driver live in the surrounding front end.
//!
//! # Architecture
//!
//! Components, leaves first:
//!
//! 1. **Canonical symbol locator** (`canonical`) - resolves a checker
//!    symbol to a `(module, qualified name)` key, transiting aliases and
//!    normalizing module paths.
//! 2. **Handler registry** (`registry` + `rules`) - a build-once,
//!    read-only table from canonical key to translation rule, kept
//!    separately for call sites, property accesses and type names, with a
//!    derived candidate-identifier pre-filter.
//! 3. **API substitution engine** (`substitution`) - orchestrates lookups
//!    for calls, property accesses, type names and construct-keyword
//!    queries; owns const-expression analysis and generic-parameter
//!    scoping.
//! 4. **Structural declaration emitter** (`declaration_emitter`) - maps
//!    source declaration shapes onto Dart declaration shapes under Dart's
//!    structural constraints.
//!
//! The driver visits a node and asks the engine whether it owns it; if
//! yes, the engine emits the full replacement and the driver skips default
//! emission. Declarations are delegated to the emitter the same way.
//! Failures become diagnostics on the offending node and translation of
//! the remaining program continues.

// Core data types
pub mod span;

// Diagnostics
pub mod diagnostics;

// Options
pub mod options;

// Arena AST and the checker facade supplied by the front end
pub mod ast;
pub mod checker;

// Emission seams
pub mod emit;
pub mod source_writer;

// Symbol canonicalization
pub mod canonical;

// Rule dispatch tables and the built-in rule data
pub mod registry;
pub mod rules;

// The substitution engine
pub mod substitution;

// Declaration-shape translation
pub mod declaration_emitter;

// Logging setup
pub mod tracing_config;

// Shared test support
pub mod test_fixtures;

pub use canonical::{CanonicalKey, SymbolLocator};
pub use declaration_emitter::DeclarationEmitter;
pub use diagnostics::{Diagnostic, DiagnosticBag, ErrorCode, Severity};
pub use emit::EmitSink;
pub use options::TranspileOptions;
pub use registry::{HandlerRegistry, RegistryBuilder, RuleOutcome};
pub use rules::default_registry;
pub use substitution::{ApiSubstituter, GenericScopeGuard};
