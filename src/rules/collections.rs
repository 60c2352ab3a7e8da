//! Array and Map rules.
//!
//! TypeScript arrays translate to Dart `List`, which grows through
//! `add`/`insert` instead of `push`/`unshift`; keyed collections translate
//! to `Map` index syntax.

use super::{LIB, argument, call_arguments, emit_argument_list, emit_method_call};
use crate::ast::NodeIndex;
use crate::emit::EmitSink;
use crate::registry::{RegistryBuilder, RuleOutcome};
use crate::substitution::ApiSubstituter;

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .call(LIB, "Array.push", array_push)
        .call(LIB, "Array.pop", array_pop)
        .call(LIB, "Array.shift", array_shift)
        .call(LIB, "Array.unshift", array_unshift)
        .call(LIB, "Array.concat", array_concat)
        .call(LIB, "Array.join", array_join)
        .call(LIB, "Array.slice", array_slice)
        .call(LIB, "Array.map", array_map)
        .call(LIB, "Array.filter", array_filter)
        .call(LIB, "Array.isArray", array_is_array)
        .call(LIB, "Array", construct_list)
        .replace_new(LIB, "Array")
        .call(LIB, "Map.set", map_set)
        .call(LIB, "Map.get", map_get)
        .call(LIB, "Map.has", map_has)
        .call(LIB, "Map.delete", map_delete)
        .call(LIB, "Map", construct_map)
        .replace_new(LIB, "Map")
}

/// `l.push(x)` -> `l.add(x)`; multiple arguments use `addAll`.
fn array_push(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let args = call_arguments(cx, call);
    if args.len() <= 1 {
        emit_method_call(cx, out, call, receiver, "add");
    } else {
        out.emit(receiver);
        out.write(".addAll([");
        out.emit_list(&args.nodes, ", ");
        out.write("])");
    }
    RuleOutcome::Handled
}

fn array_pop(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    out.emit(receiver);
    out.write(".removeLast()");
    RuleOutcome::Handled
}

fn array_shift(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    out.emit(receiver);
    out.write(".removeAt(0)");
    RuleOutcome::Handled
}

/// `l.unshift(x)` -> `l.insert(0, x)`; multiple arguments use `insertAll`.
fn array_unshift(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let args = call_arguments(cx, call);
    out.emit(receiver);
    if args.len() <= 1 {
        out.write(".insert(0, ");
        out.emit_list(&args.nodes, ", ");
        out.write(")");
    } else {
        out.write(".insertAll(0, [");
        out.emit_list(&args.nodes, ", ");
        out.write("])");
    }
    RuleOutcome::Handled
}

/// `a.concat(b)` -> `(new List.from(a)..addAll(b))`.
fn array_concat(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let args = call_arguments(cx, call);
    out.write("(new List.from(");
    out.emit(receiver);
    out.write(")");
    for &arg in &args.nodes {
        out.write("..addAll(");
        out.emit(arg);
        out.write(")");
    }
    out.write(")");
    RuleOutcome::Handled
}

/// TypeScript joins with `","` when no separator is given; Dart's default
/// is the empty string, so the separator is made explicit.
fn array_join(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    out.emit(receiver);
    match argument(cx, call, 0) {
        Some(separator) => {
            out.write(".join(");
            out.emit(separator);
            out.write(")");
        }
        None => out.write(".join(\",\")"),
    }
    RuleOutcome::Handled
}

fn array_slice(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let args = call_arguments(cx, call);
    out.emit(receiver);
    if args.is_empty() {
        out.write(".sublist(0)");
    } else {
        out.write(".sublist(");
        out.emit_list(&args.nodes, ", ");
        out.write(")");
    }
    RuleOutcome::Handled
}

/// Dart `map` returns a lazy iterable; materialize to keep list identity.
fn array_map(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    emit_method_call(cx, out, call, receiver, "map");
    out.write(".toList()");
    RuleOutcome::Handled
}

fn array_filter(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    emit_method_call(cx, out, call, receiver, "where");
    out.write(".toList()");
    RuleOutcome::Handled
}

/// `Array.isArray(x)` -> `x is List`.
fn array_is_array(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let Some(operand) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.emit(operand);
    out.write(" is List");
    RuleOutcome::Handled
}

/// `new Array(...)` / `Array(...)` -> `new List(...)`. Registered in the
/// replace-new table: this rule emits the full construction syntax.
fn construct_list(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new List");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

fn construct_map(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new Map");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

/// `m.set(k, v)` -> `m[k] = v`.
fn map_set(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let (Some(key), Some(value)) = (argument(cx, call, 0), argument(cx, call, 1)) else {
        return RuleOutcome::Declined;
    };
    out.emit(receiver);
    out.write("[");
    out.emit(key);
    out.write("] = ");
    out.emit(value);
    RuleOutcome::Handled
}

/// `m.get(k)` -> `m[k]`.
fn map_get(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    let Some(key) = argument(cx, call, 0) else {
        return RuleOutcome::Declined;
    };
    out.emit(receiver);
    out.write("[");
    out.emit(key);
    out.write("]");
    RuleOutcome::Handled
}

fn map_has(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    emit_method_call(cx, out, call, receiver, "containsKey");
    RuleOutcome::Handled
}

fn map_delete(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    receiver: NodeIndex,
) -> RuleOutcome {
    emit_method_call(cx, out, call, receiver, "remove");
    RuleOutcome::Handled
}
