//! Number and Math rules.
//!
//! Dart puts most of TypeScript's `Math.*` member functions on `num`
//! itself, and spells the special `Number` constants as `double` statics.

use super::{LIB, argument};
use crate::ast::NodeIndex;
use crate::emit::EmitSink;
use crate::registry::{RegistryBuilder, RuleOutcome};
use crate::substitution::ApiSubstituter;

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .call(LIB, "parseInt", parse_int)
        .call(LIB, "parseFloat", parse_float)
        .call(LIB, "Math.abs", math_abs)
        .call(LIB, "Math.floor", math_floor)
        .call(LIB, "Math.ceil", math_ceil)
        .call(LIB, "Math.round", math_round)
        .property(LIB, "Number.NaN", number_nan)
        .property(LIB, "Number.POSITIVE_INFINITY", number_positive_infinity)
        .property(LIB, "Number.NEGATIVE_INFINITY", number_negative_infinity)
        .property(LIB, "Number.MAX_VALUE", number_max_value)
        .property(LIB, "Number.MIN_VALUE", number_min_value)
}

/// `parseInt(s)` -> `int.parse(s)`; a radix becomes a named argument.
fn parse_int(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let Some(text) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.write("int.parse(");
    out.emit(text);
    if let Some(radix) = argument(cx, call, 1) {
        out.write(", radix: ");
        out.emit(radix);
    }
    out.write(")");
    RuleOutcome::Handled
}

fn parse_float(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let Some(text) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.write("double.parse(");
    out.emit(text);
    out.write(")");
    RuleOutcome::Handled
}

/// `Math.f(x)` -> `x.f()` for functions Dart defines on `num`.
fn emit_num_method(
    cx: &ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    method: &str,
) -> RuleOutcome {
    let Some(operand) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.emit(operand);
    out.write(".");
    out.write(method);
    out.write("()");
    RuleOutcome::Handled
}

fn math_abs(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    emit_num_method(cx, out, call, "abs")
}

fn math_floor(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    emit_num_method(cx, out, call, "floor")
}

fn math_ceil(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    emit_num_method(cx, out, call, "ceil")
}

fn math_round(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    emit_num_method(cx, out, call, "round")
}

fn emit_double_constant(out: &mut dyn EmitSink, text: &str) -> RuleOutcome {
    out.write(text);
    RuleOutcome::Handled
}

fn number_nan(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _access: NodeIndex,
) -> RuleOutcome {
    emit_double_constant(out, "double.NAN")
}

fn number_positive_infinity(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _access: NodeIndex,
) -> RuleOutcome {
    emit_double_constant(out, "double.INFINITY")
}

fn number_negative_infinity(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _access: NodeIndex,
) -> RuleOutcome {
    emit_double_constant(out, "double.NEGATIVE_INFINITY")
}

fn number_max_value(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _access: NodeIndex,
) -> RuleOutcome {
    emit_double_constant(out, "double.MAX_FINITE")
}

fn number_min_value(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _access: NodeIndex,
) -> RuleOutcome {
    emit_double_constant(out, "double.MIN_POSITIVE")
}
