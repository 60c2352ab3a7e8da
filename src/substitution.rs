//! API Substitution Engine
//!
//! Orchestrates rule lookups for call expressions, property accesses and
//! type names: resolve the node's checker symbol, canonicalize it through
//! the symbol locator, and dispatch to the matching rule in the handler
//! registry. Also owns the const-expression analyzer and the generic
//! type-parameter scoping used by rule authors and the declaration
//! emitter.
//!
//! Every resolution failure produces a diagnostic tied to the offending
//! node and falls back to conservative default behavior (the node is
//! treated as unhandled); translation of the remaining program continues.

use crate::ast::{NodeArena, NodeData, NodeIndex, SyntaxKind};
use crate::canonical::{CanonicalKey, SymbolLocator};
use crate::checker::{SymbolFlags, TypeCheckerService};
use crate::diagnostics::{DiagnosticBag, ErrorCode};
use crate::emit::EmitSink;
use crate::options::TranspileOptions;
use crate::registry::HandlerRegistry;
use indexmap::IndexMap;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// Engine
// =============================================================================

/// The substitution engine for one translation unit.
///
/// Owns the diagnostic bag and the generic-scope depth; borrows the arena,
/// checker facade and options, and shares the read-only handler registry.
pub struct ApiSubstituter<'a> {
    arena: &'a NodeArena,
    checker: &'a dyn TypeCheckerService,
    registry: Arc<HandlerRegistry>,
    options: &'a TranspileOptions,
    diagnostics: DiagnosticBag,
    /// Shared with live [`GenericScopeGuard`]s, which decrement on drop.
    generic_depth: Rc<Cell<u32>>,
}

impl<'a> ApiSubstituter<'a> {
    pub fn new(
        arena: &'a NodeArena,
        checker: &'a dyn TypeCheckerService,
        registry: Arc<HandlerRegistry>,
        options: &'a TranspileOptions,
    ) -> Self {
        ApiSubstituter {
            arena,
            checker,
            registry,
            options,
            diagnostics: DiagnosticBag::with_file(arena.file_name()),
            generic_depth: Rc::new(Cell::new(0)),
        }
    }

    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    pub fn checker(&self) -> &'a dyn TypeCheckerService {
        self.checker
    }

    pub fn options(&self) -> &'a TranspileOptions {
        self.options
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    /// Take accumulated diagnostics, leaving the bag empty.
    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::replace(
            &mut self.diagnostics,
            DiagnosticBag::with_file(self.arena.file_name()),
        )
    }

    /// Report an error at `node`.
    pub fn report(&mut self, node: NodeIndex, code: ErrorCode, message: impl Into<String>) {
        self.diagnostics.error(self.arena.span(node), code, message);
    }

    fn locator(&self) -> SymbolLocator<'a> {
        SymbolLocator::new(
            self.arena,
            self.checker,
            self.options.typings_root.as_deref(),
        )
    }

    // =========================================================================
    // Call sites
    // =========================================================================

    /// Try to translate a call (or new) expression through a registered
    /// rule. Returns `true` exactly when a rule was found and it emitted
    /// the full replacement, in which case the driver must skip default
    /// emission.
    pub fn try_handle_call(&mut self, call: NodeIndex, out: &mut dyn EmitSink) -> bool {
        let Some(call_data) = self.arena.get_call_expr(call) else {
            return false;
        };
        let callee = call_data.expression;
        let Some(name_node) = self.name_node_of(callee) else {
            return false;
        };
        let Some(key) = self.canonicalize_candidate(name_node) else {
            return false;
        };
        let Some(rule) = self.registry.call_rule(&key) else {
            return false;
        };
        let receiver = match self.arena.get_access_expr(callee) {
            Some(access) => access.expression,
            None => NodeIndex::NONE,
        };
        debug!(module = %key.module, name = %key.qualified_name, "call rule matched");
        rule(self, out, call, receiver).is_handled()
    }

    /// Try to translate a property access through a registered rule.
    pub fn try_handle_property_access(
        &mut self,
        access: NodeIndex,
        out: &mut dyn EmitSink,
    ) -> bool {
        let Some(access_data) = self.arena.get_access_expr(access) else {
            return false;
        };
        let name_node = access_data.name;
        let Some(key) = self.canonicalize_candidate(name_node) else {
            return false;
        };
        let Some(rule) = self.registry.property_rule(&key) else {
            return false;
        };
        debug!(module = %key.module, name = %key.qualified_name, "property rule matched");
        rule(self, out, access).is_handled()
    }

    /// Whether a `new`-like construction of `call` still needs the
    /// construct keyword. `false` when the matching call rule emits the
    /// full construction syntax itself.
    pub fn should_use_construct_keyword(&mut self, call: NodeIndex) -> bool {
        let Some(call_data) = self.arena.get_call_expr(call) else {
            return true;
        };
        let Some(name_node) = self.name_node_of(call_data.expression) else {
            return true;
        };
        let Some(text) = self.arena.identifier_text(name_node) else {
            return true;
        };
        if !self.registry.is_candidate(text) {
            return true;
        }
        match self.canonicalize_quiet(name_node) {
            Some(key) => !self.registry.replaces_construct(&key),
            None => true,
        }
    }

    // =========================================================================
    // Type names
    // =========================================================================

    /// Rewrite a type-name identifier into its target spelling.
    ///
    /// Erasure for the innermost generic function's type parameters wins
    /// over rule lookup; unresolved candidates fall back to the
    /// identifier's own text. Non-identifier names go back to the driver.
    pub fn rewrite_type_name(&mut self, name: NodeIndex, out: &mut dyn EmitSink) {
        let Some(text) = self.arena.identifier_text(name) else {
            out.emit(name);
            return;
        };
        if self.generic_depth.get() > 0 && self.is_function_type_parameter(name) {
            out.write(&format!("dynamic/*={text}*/"));
            return;
        }
        if !self.registry.is_candidate(text) {
            out.write(text);
            return;
        }
        let text = text.to_string();
        match self.canonicalize_candidate(name) {
            Some(key) => match self.registry.type_name_replacement(&key) {
                Some(replacement) => out.write(replacement),
                None => out.write(&text),
            },
            // Diagnostic already reported; keep the source spelling.
            None => out.write(&text),
        }
    }

    /// Whether `name` denotes a type parameter declared by a function-like
    /// declaration (the case that requires erasure under generic scoping).
    fn is_function_type_parameter(&self, name: NodeIndex) -> bool {
        let Some(symbol_id) = self.checker.symbol_at_location(name) else {
            return false;
        };
        let symbol = self.checker.symbol(symbol_id);
        if !symbol.flags.contains(SymbolFlags::TYPE_PARAMETER) {
            return false;
        }
        let Some(decl) = symbol.representative_declaration() else {
            return false;
        };
        self.arena
            .parent(decl)
            .and_then(|parent| self.arena.get(parent))
            .is_some_and(|parent| parent.is_function_like())
    }

    // =========================================================================
    // Property types
    // =========================================================================

    /// Resolve the named properties of a type node to their declared type
    /// annotations, in declaration order.
    ///
    /// Literal object types are read off the AST; anything else goes
    /// through the checker. Every resolved member must be a plain property
    /// declaration or signature.
    pub fn resolve_property_types(&mut self, type_node: NodeIndex) -> IndexMap<String, NodeIndex> {
        let mut properties = IndexMap::new();
        if let Some(literal) = self.arena.get_type_literal(type_node) {
            let members: Vec<NodeIndex> = literal.members.nodes.clone();
            for member in members {
                match self.arena.get_property_signature(member) {
                    Some(signature) => {
                        if let Some(name) = self.arena.identifier_text(signature.name) {
                            properties.insert(name.to_string(), signature.type_annotation);
                        }
                    }
                    None => {
                        self.report(
                            member,
                            ErrorCode::InvalidPropertyForNamedParameter,
                            "named parameter member must be a property",
                        );
                    }
                }
            }
            return properties;
        }

        let Some(ty) = self.checker.type_at_location(type_node) else {
            self.report(
                type_node,
                ErrorCode::UnresolvedCandidateSymbol,
                "named parameter type has no static type information",
            );
            return properties;
        };
        for symbol_id in self.checker.properties_of_type(ty) {
            let symbol = self.checker.symbol(symbol_id);
            let name = symbol.name.clone();
            let annotation = symbol
                .representative_declaration()
                .and_then(|decl| self.property_annotation(decl));
            let is_property = symbol.flags.contains(SymbolFlags::PROPERTY);
            match annotation {
                Some(annotation) if is_property => {
                    properties.insert(name, annotation);
                }
                _ => {
                    self.report(
                        type_node,
                        ErrorCode::InvalidPropertyForNamedParameter,
                        format!("'{name}' must be a property"),
                    );
                }
            }
        }
        properties
    }

    fn property_annotation(&self, decl: NodeIndex) -> Option<NodeIndex> {
        match &self.arena.get(decl)?.data {
            NodeData::PropertySignature(data) => Some(data.type_annotation),
            NodeData::PropertyDeclaration(data) => Some(data.type_annotation),
            _ => None,
        }
    }

    // =========================================================================
    // Const expressions
    // =========================================================================

    /// Whether `expr` is a call to the designated compile-time-constant
    /// wrapper.
    pub fn is_const_call(&self, expr: NodeIndex) -> bool {
        let Some(call) = self.arena.get_call_expr(expr) else {
            return false;
        };
        if self.arena.kind(expr) != Some(SyntaxKind::CallExpression) {
            return false;
        }
        self.arena
            .identifier_text(call.expression)
            .is_some_and(|text| text == self.options.const_wrapper)
    }

    /// Whether `node` sits inside the nearest enclosing call and that call
    /// is the const wrapper.
    pub fn is_inside_const_expr(&self, node: NodeIndex) -> bool {
        for ancestor in self.arena.ancestors(node) {
            let kind = self.arena.kind(ancestor);
            if matches!(
                kind,
                Some(SyntaxKind::CallExpression) | Some(SyntaxKind::NewExpression)
            ) {
                return self.is_const_call(ancestor);
            }
        }
        false
    }

    // =========================================================================
    // Generic scope
    // =========================================================================

    /// Enter the generic scope of a function-like declaration.
    ///
    /// Returns a guard only when `decl` declares type parameters; dropping
    /// the guard leaves the scope, on every exit path.
    pub fn generic_scope(&self, decl: NodeIndex) -> Option<GenericScopeGuard> {
        let type_params = self.arena.type_parameters_of(decl)?;
        if type_params.is_empty() {
            return None;
        }
        self.generic_depth.set(self.generic_depth.get() + 1);
        trace!(depth = self.generic_depth.get(), "entered generic scope");
        Some(GenericScopeGuard {
            depth: Rc::clone(&self.generic_depth),
        })
    }

    /// Current generic-scope nesting depth.
    pub fn generic_depth(&self) -> u32 {
        self.generic_depth.get()
    }

    // =========================================================================
    // Resolution plumbing
    // =========================================================================

    /// The identifier that names `expr`: the expression itself for plain
    /// identifiers, the member name for property accesses.
    fn name_node_of(&self, expr: NodeIndex) -> Option<NodeIndex> {
        match &self.arena.get(expr)?.data {
            NodeData::Identifier(_) => Some(expr),
            NodeData::PropertyAccess(data) => Some(data.name),
            _ => None,
        }
    }

    /// Candidate pre-filter plus reporting canonicalization.
    ///
    /// `None` either means "not a candidate" (no checker query was made)
    /// or "candidate but unresolvable" (diagnostic reported).
    fn canonicalize_candidate(&mut self, name_node: NodeIndex) -> Option<CanonicalKey> {
        let text = self.arena.identifier_text(name_node)?;
        if !self.registry.is_candidate(text) {
            trace!(name = text, "not a candidate identifier");
            return None;
        }
        let text = text.to_string();
        let Some(symbol) = self.checker.symbol_at_location(name_node) else {
            self.report(
                name_node,
                ErrorCode::UnresolvedCandidateSymbol,
                format!("'{text}' has no type information; add a type annotation"),
            );
            return None;
        };
        match self.locator().locate(name_node, symbol) {
            Ok(key) => Some(key),
            Err(error) => {
                self.report(name_node, ErrorCode::NoDeclarationForSymbol, error.message());
                None
            }
        }
    }

    /// Canonicalization without diagnostics, for queries where failure
    /// just means "use the default".
    fn canonicalize_quiet(&self, name_node: NodeIndex) -> Option<CanonicalKey> {
        let symbol = self.checker.symbol_at_location(name_node)?;
        self.locator().locate(name_node, symbol).ok()
    }
}

// =============================================================================
// Generic scope guard
// =============================================================================

/// Scoped generic-parameter depth. Created by
/// [`ApiSubstituter::generic_scope`]; the depth is decremented when the
/// guard drops, so errors inside the scope cannot leak an unbalanced
/// counter. Owns its handle on the shared counter, so the engine stays
/// free for mutable calls while a scope is open.
pub struct GenericScopeGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for GenericScopeGuard {
    fn drop(&mut self) {
        debug_assert!(self.depth.get() > 0, "generic scope underflow");
        self.depth.set(self.depth.get().saturating_sub(1));
        trace!(depth = self.depth.get(), "left generic scope");
    }
}
