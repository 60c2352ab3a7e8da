//! Handler Registry
//!
//! A build-once, read-only dispatch table mapping canonical keys to
//! translation rules, kept separately for call sites, property accesses and
//! type references, plus a flat table of constructions whose call rule
//! already emits the full target construction syntax.
//!
//! Authors extend coverage purely by adding entries through
//! [`RegistryBuilder`]; the engine never special-cases a module name
//! outside these tables. The builder also derives the flat candidate
//! identifier set (last segment of every registered qualified name) that
//! the engine uses to skip symbol resolution for identifiers that cannot
//! possibly match a rule.

use crate::ast::NodeIndex;
use crate::canonical::CanonicalKey;
use crate::emit::EmitSink;
use crate::substitution::ApiSubstituter;
use rustc_hash::{FxHashMap, FxHashSet};

// =============================================================================
// Rules
// =============================================================================

/// What a call or property rule did with its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule emitted the full replacement; the driver must not perform
    /// default emission.
    Handled,
    /// The rule passed; the driver must still perform default emission.
    Declined,
}

impl RuleOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, RuleOutcome::Handled)
    }
}

/// Translation rule for a call site. `receiver` is the callee's receiver
/// expression (`NodeIndex::NONE` for bare calls).
pub type CallRuleFn =
    fn(cx: &mut ApiSubstituter<'_>, out: &mut dyn EmitSink, call: NodeIndex, receiver: NodeIndex) -> RuleOutcome;

/// Translation rule for a property access.
pub type PropertyRuleFn =
    fn(cx: &mut ApiSubstituter<'_>, out: &mut dyn EmitSink, access: NodeIndex) -> RuleOutcome;

/// Translation rule for a type name: the replacement text. Type-name rules
/// always fully replace the emitted name; there is no continuation flag.
pub type TypeNameReplacement = &'static str;

type RuleTable<R> = FxHashMap<&'static str, FxHashMap<&'static str, R>>;

fn last_segment(name: &'static str) -> &'static str {
    name.rsplit('.').next().unwrap_or(name)
}

// =============================================================================
// Registry
// =============================================================================

/// The three rule tables plus the replace-new table and the derived
/// candidate set. Immutable after [`RegistryBuilder::build`]; shared by
/// reference across translation units.
pub struct HandlerRegistry {
    calls: RuleTable<CallRuleFn>,
    properties: RuleTable<PropertyRuleFn>,
    type_names: RuleTable<TypeNameReplacement>,
    /// Constructions whose call rule emits the full construction syntax,
    /// so the wrapping construct keyword must be suppressed.
    replace_new: RuleTable<bool>,
    candidates: FxHashSet<&'static str>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Cheap pre-filter: can `text` possibly match a registered rule?
    pub fn is_candidate(&self, text: &str) -> bool {
        self.candidates.contains(text)
    }

    pub fn call_rule(&self, key: &CanonicalKey) -> Option<CallRuleFn> {
        self.calls
            .get(key.module.as_str())?
            .get(key.qualified_name.as_str())
            .copied()
    }

    pub fn property_rule(&self, key: &CanonicalKey) -> Option<PropertyRuleFn> {
        self.properties
            .get(key.module.as_str())?
            .get(key.qualified_name.as_str())
            .copied()
    }

    pub fn type_name_replacement(&self, key: &CanonicalKey) -> Option<TypeNameReplacement> {
        self.type_names
            .get(key.module.as_str())?
            .get(key.qualified_name.as_str())
            .copied()
    }

    /// Whether the call rule for `key` emits its own construction syntax.
    pub fn replaces_construct(&self, key: &CanonicalKey) -> bool {
        self.replace_new
            .get(key.module.as_str())
            .and_then(|names| names.get(key.qualified_name.as_str()))
            .copied()
            .unwrap_or(false)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Accumulates rule declarations, then freezes them into a
/// [`HandlerRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    calls: RuleTable<CallRuleFn>,
    properties: RuleTable<PropertyRuleFn>,
    type_names: RuleTable<TypeNameReplacement>,
    replace_new: RuleTable<bool>,
}

impl RegistryBuilder {
    pub fn call(mut self, module: &'static str, name: &'static str, rule: CallRuleFn) -> Self {
        self.calls.entry(module).or_default().insert(name, rule);
        self
    }

    pub fn property(
        mut self,
        module: &'static str,
        name: &'static str,
        rule: PropertyRuleFn,
    ) -> Self {
        self.properties.entry(module).or_default().insert(name, rule);
        self
    }

    pub fn type_name(
        mut self,
        module: &'static str,
        name: &'static str,
        replacement: &'static str,
    ) -> Self {
        self.type_names
            .entry(module)
            .or_default()
            .insert(name, replacement);
        self
    }

    /// Mark `(module, name)` as a construction whose call rule emits the
    /// full construction syntax.
    pub fn replace_new(mut self, module: &'static str, name: &'static str) -> Self {
        self.replace_new.entry(module).or_default().insert(name, true);
        self
    }

    /// Freeze the tables and derive the candidate identifier set.
    pub fn build(self) -> HandlerRegistry {
        let mut candidates = FxHashSet::default();
        for names in self.calls.values() {
            candidates.extend(names.keys().map(|name| last_segment(name)));
        }
        for names in self.properties.values() {
            candidates.extend(names.keys().map(|name| last_segment(name)));
        }
        for names in self.type_names.values() {
            candidates.extend(names.keys().map(|name| last_segment(name)));
        }
        HandlerRegistry {
            calls: self.calls,
            properties: self.properties,
            type_names: self.type_names,
            replace_new: self.replace_new,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_call(
        _cx: &mut ApiSubstituter<'_>,
        _out: &mut dyn EmitSink,
        _call: NodeIndex,
        _receiver: NodeIndex,
    ) -> RuleOutcome {
        RuleOutcome::Handled
    }

    fn noop_property(
        _cx: &mut ApiSubstituter<'_>,
        _out: &mut dyn EmitSink,
        _access: NodeIndex,
    ) -> RuleOutcome {
        RuleOutcome::Handled
    }

    #[test]
    fn test_candidates_are_last_segments() {
        let registry = HandlerRegistry::builder()
            .call("lib", "Array.push", noop_call)
            .property("lib", "Number.NaN", noop_property)
            .type_name("lib", "Promise", "Future")
            .build();

        assert!(registry.is_candidate("push"));
        assert!(registry.is_candidate("NaN"));
        assert!(registry.is_candidate("Promise"));
        assert!(!registry.is_candidate("Array"));
        assert!(!registry.is_candidate("pop"));
        assert_eq!(registry.candidate_count(), 3);
    }

    #[test]
    fn test_lookup_by_canonical_key() {
        let registry = HandlerRegistry::builder()
            .call("lib", "Array.push", noop_call)
            .build();

        assert!(registry.call_rule(&CanonicalKey::new("lib", "Array.push")).is_some());
        assert!(registry.call_rule(&CanonicalKey::new("lib", "Array.pop")).is_none());
        assert!(registry.call_rule(&CanonicalKey::new("other", "Array.push")).is_none());
    }

    #[test]
    fn test_replace_new_lookup() {
        let registry = HandlerRegistry::builder()
            .call("lib", "Promise", noop_call)
            .replace_new("lib", "Promise")
            .build();

        assert!(registry.replaces_construct(&CanonicalKey::new("lib", "Promise")));
        assert!(!registry.replaces_construct(&CanonicalKey::new("lib", "Array")));
    }

    #[test]
    fn test_rule_outcome() {
        assert!(RuleOutcome::Handled.is_handled());
        assert!(!RuleOutcome::Declined.is_handled());
    }
}
