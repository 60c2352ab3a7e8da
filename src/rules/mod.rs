//! Built-in translation rules
//!
//! The rule data behind the handler registry: how TypeScript standard
//! library calls, property accesses and type names spell in Dart. Grouped
//! per API area; each submodule registers its entries on the shared
//! builder. Everything here is data plus small emit functions - the
//! dispatch machinery lives in `registry` and `substitution`.
//!
//! Registered qualified names use the checker's spelling: `Array.push` for
//! instance and static members, bare `parseInt` for top-level functions.

use crate::ast::{NodeIndex, NodeList};
use crate::emit::EmitSink;
use crate::registry::{HandlerRegistry, RegistryBuilder};
use crate::substitution::ApiSubstituter;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub mod collections;
pub mod facade;
pub mod globals;
pub mod numbers;
pub mod strings;

/// The module key for standard-library declarations.
pub const LIB: &str = "lib";

static DEFAULT_REGISTRY: Lazy<Arc<HandlerRegistry>> = Lazy::new(|| {
    let mut builder = HandlerRegistry::builder();
    builder = type_names(builder);
    builder = collections::register(builder);
    builder = strings::register(builder);
    builder = numbers::register(builder);
    builder = globals::register(builder);
    builder = facade::register(builder);
    Arc::new(builder.build())
});

/// The registry holding every built-in rule. Built once, shared by
/// reference for the process lifetime.
pub fn default_registry() -> Arc<HandlerRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// Standard-library type names whose Dart spelling differs.
fn type_names(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .type_name(LIB, "Promise", "Future")
        .type_name(LIB, "Date", "DateTime")
        .type_name(LIB, "Array", "List")
        .type_name(LIB, "Number", "num")
        .type_name(LIB, "Boolean", "bool")
        .type_name(LIB, "RegExpMatchArray", "Match")
        .type_name(LIB, "XMLHttpRequest", "HttpRequest")
}

// =============================================================================
// Shared emit helpers
// =============================================================================

/// Arguments of a call, empty when `call` is not one.
pub(crate) fn call_arguments<'a>(cx: &ApiSubstituter<'a>, call: NodeIndex) -> &'a NodeList {
    static EMPTY: NodeList = NodeList { nodes: Vec::new() };
    cx.arena()
        .get_call_expr(call)
        .map(|data| &data.arguments)
        .unwrap_or(&EMPTY)
}

pub(crate) fn argument(cx: &ApiSubstituter<'_>, call: NodeIndex, index: usize) -> Option<NodeIndex> {
    call_arguments(cx, call).nodes.get(index).copied()
}

/// Emit `(arg, arg, ...)`.
pub(crate) fn emit_argument_list(
    cx: &ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
) {
    out.write("(");
    out.emit_list(&call_arguments(cx, call).nodes, ", ");
    out.write(")");
}

/// Emit `receiver.method(args...)` - the shape of most call rewrites.
pub(crate) fn emit_method_call(
    cx: &ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
    method: &str,
) {
    out.emit(receiver);
    out.write(".");
    out.write(method);
    emit_argument_list(cx, out, call);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalKey;

    #[test]
    fn test_default_registry_builds_once() {
        let a = default_registry();
        let b = default_registry();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_default_registry_coverage() {
        let registry = default_registry();
        assert!(registry.call_rule(&CanonicalKey::new(LIB, "Array.push")).is_some());
        assert!(registry
            .property_rule(&CanonicalKey::new(LIB, "Number.NaN"))
            .is_some());
        assert_eq!(
            registry.type_name_replacement(&CanonicalKey::new(LIB, "Promise")),
            Some("Future")
        );
        assert!(registry.is_candidate("push"));
        assert!(registry.is_candidate("Promise"));
        assert!(!registry.is_candidate("definitelyNotRegistered"));
    }
}
