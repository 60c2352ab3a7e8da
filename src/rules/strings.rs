//! String rules.

use super::{LIB, argument, emit_argument_list, emit_method_call};
use crate::ast::{NodeIndex, SyntaxKind};
use crate::emit::EmitSink;
use crate::registry::{RegistryBuilder, RuleOutcome};
use crate::substitution::ApiSubstituter;

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .call(LIB, "String.charCodeAt", char_code_at)
        .call(LIB, "String.fromCharCode", from_char_code)
        .call(LIB, "String.replace", replace)
}

fn char_code_at(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    emit_method_call(cx, out, call, receiver, "codeUnitAt");
    RuleOutcome::Handled
}

/// `String.fromCharCode(c)` -> `new String.fromCharCode(c)`.
fn from_char_code(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new String.fromCharCode");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

/// `s.replace(pattern, r)` -> `s.replaceFirst(pattern, r)` when the
/// pattern is a string literal. Regular-expression patterns carry flags
/// that change replacement semantics, so anything else is declined and
/// left to default emission.
fn replace(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let Some(pattern) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    if cx.arena().kind(pattern) != Some(SyntaxKind::StringLiteral) {
        return RuleOutcome::Declined;
    }
    emit_method_call(cx, out, call, receiver, "replaceFirst");
    RuleOutcome::Handled
}
