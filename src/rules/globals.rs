//! console, JSON, Date, timer and Promise rules.

use super::{LIB, argument, call_arguments, emit_argument_list};
use crate::ast::NodeIndex;
use crate::emit::EmitSink;
use crate::registry::{RegistryBuilder, RuleOutcome};
use crate::substitution::ApiSubstituter;

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .call(LIB, "Console.log", console_log)
        .call(LIB, "Console.error", console_log)
        .call(LIB, "JSON.parse", json_parse)
        .call(LIB, "JSON.stringify", json_stringify)
        .call(LIB, "setTimeout", set_timeout)
        .call(LIB, "Date.now", date_now)
        .call(LIB, "Date", construct_date_time)
        .replace_new(LIB, "Date")
        .call(LIB, "Promise.resolve", promise_resolve)
        .call(LIB, "Promise.reject", promise_reject)
}

fn console_log(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("print");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

fn json_parse(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("JSON.decode");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

fn json_stringify(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("JSON.encode");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

/// `setTimeout(f, ms)` -> `new Timer(new Duration(milliseconds: ms), f)`.
fn set_timeout(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let (Some(callback), Some(millis)) = (argument(cx, call, 0), argument(cx, call, 1)) else {
        return RuleOutcome::Declined;
    };
    out.write("new Timer(new Duration(milliseconds: ");
    out.emit(millis);
    out.write("), ");
    out.emit(callback);
    out.write(")");
    RuleOutcome::Handled
}

fn date_now(
    _cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    _call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new DateTime.now().millisecondsSinceEpoch");
    RuleOutcome::Handled
}

/// `new Date()` -> `new DateTime.now()`; with an epoch argument,
/// `new DateTime.fromMillisecondsSinceEpoch(ms)`. Registered in the
/// replace-new table: this rule emits the full construction syntax.
fn construct_date_time(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    let args = call_arguments(cx, call);
    match args.nodes.first() {
        None => out.write("new DateTime.now()"),
        Some(&millis) => {
            out.write("new DateTime.fromMillisecondsSinceEpoch(");
            out.emit(millis);
            out.write(")");
        }
    }
    RuleOutcome::Handled
}

fn promise_resolve(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new Future.value");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

fn promise_reject(
    cx: &mut ApiSubstituter<'_>,
    out: &mut dyn EmitSink,
    call: NodeIndex,
    _receiver: NodeIndex,
) -> RuleOutcome {
    out.write("new Future.error");
    emit_argument_list(cx, out, call);
    RuleOutcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_adds_replace_new_for_date() {
        let registry = crate::registry::HandlerRegistry::builder();
        let registry = register(registry).build();
        assert!(registry.replaces_construct(&crate::canonical::CanonicalKey::new(LIB, "Date")));
        assert!(!registry.replaces_construct(&crate::canonical::CanonicalKey::new(LIB, "Promise")));
    }

    #[test]
    fn test_console_is_candidate_via_last_segment() {
        let registry = register(crate::registry::HandlerRegistry::builder()).build();
        assert!(registry.is_candidate("log"));
        assert!(registry.is_candidate("stringify"));
        assert!(!registry.is_candidate("Console"));
    }
}
