//! Facade-library rules.
//!
//! Rules for the application-level facade modules that papers over
//! source/target differences: the compile-time-constant wrapper and the
//! string-keyed collection aliases. These are ordinary registry entries -
//! the wrapper identifier also participates in const-context detection,
//! which matches it textually during ancestor walks.

use super::argument;
use crate::ast::NodeIndex;
use crate::emit::EmitSink;
use crate::registry::{RegistryBuilder, RuleOutcome};
use crate::substitution::ApiSubstituter;

/// Module key of the language facade.
pub const FACADE_LANG: &str = "facade/lang";
/// Module key of the collection facade.
pub const FACADE_COLLECTION: &str = "facade/collection";

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .call(FACADE_LANG, "CONST_EXPR", const_expr)
        .type_name(FACADE_COLLECTION, "StringMap", "Map")
}

/// `CONST_EXPR(e)` marks `e` as a compile-time constant: the wrapper
/// disappears and the argument is emitted under `const`.
fn const_expr(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let Some(expr) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.write("const ");
    out.emit(expr);
    RuleOutcome::Handled
}
