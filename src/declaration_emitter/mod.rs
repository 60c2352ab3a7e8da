//! Structural Declaration Emitter
//!
//! Maps source declaration shapes onto target-language declaration shapes
//! under the target's structural constraints: single-type variable lists,
//! required/positional-optional/named parameter grouping, const
//! constructor synthesis, and naming-convention enforcement.
//!
//! The state machine is implicit in the AST shape. The emitter consumes
//! the substitution engine's services (type-name rewriting, const
//! detection, generic-parameter scoping, property-type resolution) and
//! writes replacement text through the driver's [`EmitSink`], delegating
//! expressions it does not own back to default emission.

use crate::ast::{
    ClassData, ModifierFlags, NodeArena, NodeData, NodeIndex, NodeList, SyntaxKind,
};
use crate::diagnostics::ErrorCode;
use crate::emit::EmitSink;
use crate::substitution::ApiSubstituter;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

/// Source type keywords with a fixed target spelling. Checked before
/// symbol-based type-name rewriting, since keywords have no symbol.
const PRIMITIVE_TYPES: [(&str, &str); 5] = [
    ("number", "num"),
    ("string", "String"),
    ("boolean", "bool"),
    ("any", "dynamic"),
    ("void", "void"),
];

/// Parameter groups derived per declaration, in source order: a required
/// prefix, a positional-optional suffix, and at most one named group.
struct ParameterGroups {
    required: SmallVec<[NodeIndex; 8]>,
    positional_optional: SmallVec<[NodeIndex; 8]>,
    named: Option<NodeIndex>,
}

/// Emits declaration-level nodes into target syntax.
pub struct DeclarationEmitter<'e, 'a> {
    facade: &'e mut ApiSubstituter<'a>,
}

impl<'e, 'a> DeclarationEmitter<'e, 'a> {
    pub fn new(facade: &'e mut ApiSubstituter<'a>) -> Self {
        DeclarationEmitter { facade }
    }

    fn arena(&self) -> &'a NodeArena {
        self.facade.arena()
    }

    /// Translate `node` if it is a declaration this component owns.
    ///
    /// Returns `false` for anything else; the driver then performs default
    /// emission.
    pub fn try_emit_declaration(&mut self, node: NodeIndex, out: &mut dyn EmitSink) -> bool {
        match self.arena().kind(node) {
            Some(SyntaxKind::ClassDeclaration) => {
                self.emit_class_like(node, false, out);
                true
            }
            Some(SyntaxKind::InterfaceDeclaration) => {
                self.emit_class_like(node, true, out);
                true
            }
            Some(SyntaxKind::EnumDeclaration) => {
                self.emit_enum(node, out);
                true
            }
            Some(SyntaxKind::VariableDeclarationList) => {
                self.emit_variable_list(node, out);
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Class-like declarations
    // =========================================================================

    fn emit_class_like(&mut self, idx: NodeIndex, is_interface: bool, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let Some(class) = arena.get_class_like(idx) else {
            return;
        };
        self.check_naming(class.name, class.modifiers);

        // An interface whose only member is a bare call signature is a
        // function type, not a class shape.
        if is_interface && class.members.len() == 1 {
            let member = class.members.nodes[0];
            if arena.get_call_signature(member).is_some() {
                self.emit_function_typedef(class, member, out);
                return;
            }
        }

        debug!(
            interface = is_interface,
            members = class.members.len(),
            "emitting class-like declaration"
        );
        self.emit_decorators(&class.decorators, out);
        let has_const_constructor = self.has_const_marker(&class.decorators);

        if is_interface || class.modifiers.contains(ModifierFlags::ABSTRACT) {
            out.write("abstract ");
        }
        out.write("class ");
        out.emit(class.name);
        if let Some(type_params) = &class.type_parameters {
            self.emit_type_parameters(type_params, out);
        }
        if class.extends_clause.is_some() {
            out.write(" extends ");
            self.emit_type(class.extends_clause, out);
        }
        if !class.implements_clauses.is_empty() {
            out.write(" implements ");
            for (i, heritage) in class.implements_clauses.iter().enumerate() {
                if i > 0 {
                    out.write(", ");
                }
                self.emit_type(heritage, out);
            }
        }
        out.write(" {\n");

        self.emit_promoted_parameter_properties(&class.members, has_const_constructor, out);

        let mut has_constructor = false;
        for member in class.members.iter() {
            match arena.kind(member) {
                Some(SyntaxKind::Constructor) => {
                    has_constructor = true;
                    self.emit_constructor(class.name, member, has_const_constructor, out);
                }
                Some(SyntaxKind::PropertyDeclaration) => {
                    self.emit_property(member, has_const_constructor, out);
                }
                Some(SyntaxKind::PropertySignature) => {
                    self.emit_property_signature(member, out);
                }
                Some(SyntaxKind::MethodDeclaration) | Some(SyntaxKind::CallSignature) => {
                    self.emit_method(member, out);
                }
                _ => out.emit(member),
            }
        }

        // A const-only type with no declared constructor still needs one.
        if has_const_constructor && !has_constructor {
            out.write("  const ");
            out.emit(class.name);
            out.write("();\n");
        }
        out.write("}");
    }

    /// `interface F { (a: number): string; }` -> `typedef String F(num a);`
    fn emit_function_typedef(
        &mut self,
        class: &ClassData,
        signature: NodeIndex,
        out: &mut dyn EmitSink,
    ) {
        let Some(sig) = self.arena().get_call_signature(signature) else {
            return;
        };
        out.write("typedef ");
        if sig.type_annotation.is_some() {
            self.emit_type(sig.type_annotation, out);
            out.write(" ");
        }
        out.emit(class.name);
        self.emit_parameters(&sig.parameters, false, out);
        out.write(";");
    }

    /// Constructor parameters carrying a visibility modifier synthesize an
    /// implicit property declaration on the enclosing type.
    fn emit_promoted_parameter_properties(
        &mut self,
        members: &NodeList,
        has_const_constructor: bool,
        out: &mut dyn EmitSink,
    ) {
        let arena = self.arena();
        let constructor = members
            .iter()
            .find(|&member| arena.kind(member) == Some(SyntaxKind::Constructor));
        let Some(constructor) = constructor else {
            return;
        };
        let Some(ctor) = arena.get_constructor(constructor) else {
            return;
        };
        for param_idx in ctor.parameters.iter() {
            let Some(param) = arena.get_parameter(param_idx) else {
                continue;
            };
            if !param.modifiers.is_field_promoting() {
                continue;
            }
            self.check_visibility(param_idx, param.modifiers);
            self.check_naming(param.name, param.modifiers);
            out.write("  ");
            if has_const_constructor || param.modifiers.contains(ModifierFlags::READONLY) {
                out.write("final ");
            }
            if param.type_annotation.is_some() {
                self.emit_type(param.type_annotation, out);
                out.write(" ");
            } else if !has_const_constructor
                && !param.modifiers.contains(ModifierFlags::READONLY)
            {
                out.write("var ");
            }
            out.emit(param.name);
            out.write(";\n");
        }
    }

    fn emit_constructor(
        &mut self,
        class_name: NodeIndex,
        member: NodeIndex,
        has_const_constructor: bool,
        out: &mut dyn EmitSink,
    ) {
        let Some(ctor) = self.arena().get_constructor(member) else {
            return;
        };
        out.write("  ");
        if has_const_constructor {
            out.write("const ");
        }
        out.emit(class_name);
        self.emit_parameters(&ctor.parameters, true, out);
        if ctor.body.is_some() && !has_const_constructor {
            out.write(" ");
            out.emit(ctor.body);
            out.write("\n");
        } else {
            out.write(";\n");
        }
    }

    /// A property is deeply const if explicitly marked; otherwise final if
    /// the enclosing type has a const constructor; otherwise mutable.
    fn emit_property(
        &mut self,
        member: NodeIndex,
        has_const_constructor: bool,
        out: &mut dyn EmitSink,
    ) {
        let Some(property) = self.arena().get_property_decl(member) else {
            return;
        };
        self.check_visibility(member, property.modifiers);
        self.check_naming(property.name, property.modifiers);
        self.emit_decorators(&property.decorators, out);
        let deeply_const = self.has_const_marker(&property.decorators);

        out.write("  ");
        if property.modifiers.contains(ModifierFlags::STATIC) {
            out.write("static ");
        }
        if deeply_const {
            out.write("const ");
        } else if has_const_constructor {
            out.write("final ");
        }
        if property.type_annotation.is_some() {
            self.emit_type(property.type_annotation, out);
            out.write(" ");
        } else if !deeply_const && !has_const_constructor {
            out.write("var ");
        }
        out.emit(property.name);
        if property.initializer.is_some() {
            out.write(" = ");
            out.emit(property.initializer);
        }
        out.write(";\n");
    }

    fn emit_property_signature(&mut self, member: NodeIndex, out: &mut dyn EmitSink) {
        let Some(signature) = self.arena().get_property_signature(member) else {
            return;
        };
        self.check_visibility(member, signature.modifiers);
        self.check_naming(signature.name, signature.modifiers);
        out.write("  ");
        if signature.type_annotation.is_some() {
            self.emit_type(signature.type_annotation, out);
            out.write(" ");
        } else {
            out.write("var ");
        }
        out.emit(signature.name);
        out.write(";\n");
    }

    fn emit_method(&mut self, member: NodeIndex, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let (modifiers, decorators, name, parameters, return_type, body) =
            match arena.get(member).map(|node| &node.data) {
                Some(NodeData::MethodDeclaration(data)) => (
                    data.modifiers,
                    Some(&data.decorators),
                    data.name,
                    &data.parameters,
                    data.type_annotation,
                    data.body,
                ),
                Some(NodeData::CallSignature(data)) => (
                    ModifierFlags::empty(),
                    None,
                    NodeIndex::NONE,
                    &data.parameters,
                    data.type_annotation,
                    NodeIndex::NONE,
                ),
                _ => return,
            };
        self.check_visibility(member, modifiers);
        if name.is_some() {
            self.check_naming(name, modifiers);
        }
        if let Some(decorators) = decorators {
            self.emit_decorators(decorators, out);
        }

        // Erase the method's own type-parameter list; references to the
        // parameters inside are rewritten under the generic scope.
        let _scope = self.facade.generic_scope(member);

        out.write("  ");
        if modifiers.contains(ModifierFlags::STATIC) {
            out.write("static ");
        }
        if return_type.is_some() {
            self.emit_type(return_type, out);
            out.write(" ");
        }
        if name.is_some() {
            out.emit(name);
        } else {
            out.write("call");
        }
        self.emit_parameters(parameters, false, out);
        if body.is_some() {
            out.write(" ");
            out.emit(body);
            out.write("\n");
        } else {
            out.write(";\n");
        }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Scan a parameter list left to right into its three groups.
    ///
    /// The maximal prefix with neither a default nor an optional marker
    /// (and not a destructuring pattern) is required; the remaining
    /// non-destructured parameters are positional-optional; a destructured
    /// parameter is always the trailing named group. At most one named
    /// group is permitted per list, which the parser already guarantees.
    fn group_parameters(&mut self, params: &NodeList) -> ParameterGroups {
        let arena = self.arena();
        let mut groups = ParameterGroups {
            required: SmallVec::new(),
            positional_optional: SmallVec::new(),
            named: None,
        };
        for param_idx in params.iter() {
            let Some(param) = arena.get_parameter(param_idx) else {
                continue;
            };
            if param.dot_dot_dot {
                self.facade.report(
                    param_idx,
                    ErrorCode::UnsupportedRestParameter,
                    "rest parameters have no positional translation",
                );
                continue;
            }
            if arena.get_binding_pattern(param.name).is_some() {
                groups.named = Some(param_idx);
                continue;
            }
            let prefix_broken =
                !groups.positional_optional.is_empty() || groups.named.is_some();
            if param.initializer.is_some() || param.question || prefix_broken {
                groups.positional_optional.push(param_idx);
            } else {
                groups.required.push(param_idx);
            }
        }
        groups
    }

    /// Emit a full parameter list: `(a, [b = 1], {c: C})`.
    ///
    /// `promote` renders field-promoting parameters as `this.` initializers
    /// (constructors only).
    pub fn emit_parameters(&mut self, params: &NodeList, promote: bool, out: &mut dyn EmitSink) {
        let groups = self.group_parameters(params);
        out.write("(");
        let mut needs_separator = false;
        for &param in &groups.required {
            if needs_separator {
                out.write(", ");
            }
            self.emit_parameter(param, promote, false, out);
            needs_separator = true;
        }
        if !groups.positional_optional.is_empty() {
            if needs_separator {
                out.write(", ");
            }
            out.write("[");
            for (i, &param) in groups.positional_optional.iter().enumerate() {
                if i > 0 {
                    out.write(", ");
                }
                self.emit_parameter(param, promote, true, out);
            }
            out.write("]");
            needs_separator = true;
        }
        if let Some(named) = groups.named {
            if needs_separator {
                out.write(", ");
            }
            self.emit_named_parameter_group(named, out);
        }
        out.write(")");
    }

    fn emit_parameter(
        &mut self,
        param_idx: NodeIndex,
        promote: bool,
        with_default: bool,
        out: &mut dyn EmitSink,
    ) {
        let Some(param) = self.arena().get_parameter(param_idx) else {
            return;
        };
        self.check_visibility(param_idx, param.modifiers);
        self.check_naming(param.name, param.modifiers);
        if promote && param.modifiers.is_field_promoting() {
            // The synthesized property carries the type.
            out.write("this.");
            out.emit(param.name);
        } else {
            if param.type_annotation.is_some() {
                self.emit_type(param.type_annotation, out);
                out.write(" ");
            }
            out.emit(param.name);
        }
        if with_default && param.initializer.is_some() {
            out.write(" = ");
            out.emit(param.initializer);
        }
    }

    /// Emit a destructured parameter as a named group.
    ///
    /// Field types come from property-type resolution against the
    /// parameter's declared type; defaults come from an inline initializer
    /// on the field or a matching key in an object-literal default for the
    /// whole pattern. Both at once is an error.
    fn emit_named_parameter_group(&mut self, param_idx: NodeIndex, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let Some(param) = arena.get_parameter(param_idx) else {
            return;
        };
        let Some(pattern) = arena.get_binding_pattern(param.name) else {
            return;
        };
        let field_types = if param.type_annotation.is_some() {
            self.facade.resolve_property_types(param.type_annotation)
        } else {
            Default::default()
        };

        let mut outer_defaults: FxHashMap<&str, NodeIndex> = FxHashMap::default();
        if let Some(defaults) = arena.get_object_literal(param.initializer) {
            for assignment in defaults.properties.iter() {
                if let Some(property) = arena.get_property_assignment(assignment)
                    && let Some(name) = arena.identifier_text(property.name)
                {
                    outer_defaults.insert(name, property.initializer);
                }
            }
        }

        out.write("{");
        for (i, element_idx) in pattern.elements.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            let Some(element) = arena.get_binding_element(element_idx) else {
                continue;
            };
            let name = arena.identifier_text(element.name).unwrap_or_default();
            if let Some(&field_type) = field_types.get(name) {
                if field_type.is_some() {
                    self.emit_type(field_type, out);
                    out.write(" ");
                }
            }
            out.emit(element.name);

            let inline_default = element.initializer;
            let outer_default = outer_defaults.get(name).copied();
            if inline_default.is_some() && outer_default.is_some() {
                self.facade.report(
                    element_idx,
                    ErrorCode::AmbiguousInitializer,
                    format!("'{name}' has both an inline and an outer default value"),
                );
            }
            if inline_default.is_some() {
                out.write(" = ");
                out.emit(inline_default);
            } else if let Some(default) = outer_default {
                out.write(" = ");
                out.emit(default);
            }
        }
        out.write("}");
    }

    // =========================================================================
    // Variable declaration lists
    // =========================================================================

    /// Emit a loop-header variable list under the single-type constraint:
    /// one declarator may carry an explicit type, several may not.
    fn emit_variable_list(&mut self, list_idx: NodeIndex, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let Some(list) = arena.get_variable_list(list_idx) else {
            return;
        };
        let declarations = &list.declarations;
        let multi = declarations.len() > 1;
        let mut typed = false;
        for decl_idx in declarations.iter() {
            if let Some(decl) = arena.get_variable_decl(decl_idx)
                && decl.type_annotation.is_some()
            {
                typed = true;
                if multi {
                    self.facade.report(
                        decl_idx,
                        ErrorCode::MalformedVariableDeclarationList,
                        "multiple variable declarations cannot be typed",
                    );
                }
            }
        }

        let is_const_flagged = list.modifiers.contains(ModifierFlags::CONST);
        let all_const_wrapped = is_const_flagged
            && declarations.iter().all(|decl_idx| {
                arena
                    .get_variable_decl(decl_idx)
                    .is_some_and(|decl| self.facade.is_const_call(decl.initializer))
            });

        // One leading keyword (or the single declarator's type) for the
        // whole list.
        if all_const_wrapped {
            out.write("const ");
        } else if is_const_flagged {
            out.write("final ");
        } else if typed && !multi {
            let decl = arena.get_variable_decl(declarations.nodes[0]);
            if let Some(decl) = decl {
                self.emit_type(decl.type_annotation, out);
                out.write(" ");
            }
        } else {
            out.write("var ");
        }

        for (i, decl_idx) in declarations.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            let Some(decl) = arena.get_variable_decl(decl_idx) else {
                continue;
            };
            out.emit(decl.name);
            if decl.initializer.is_some() {
                out.write(" = ");
                // Deep-const promotion consumes the wrapper call.
                if all_const_wrapped
                    && let Some(wrapper) = arena.get_call_expr(decl.initializer)
                    && let Some(&inner) = wrapper.arguments.nodes.first()
                {
                    out.emit(inner);
                } else {
                    out.emit(decl.initializer);
                }
            }
        }
    }

    // =========================================================================
    // Enums
    // =========================================================================

    fn emit_enum(&mut self, idx: NodeIndex, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let Some(enum_data) = arena.get_enum(idx) else {
            return;
        };
        if enum_data.modifiers.contains(ModifierFlags::CONST) {
            self.facade.report(
                idx,
                ErrorCode::ConstEnumUnsupported,
                "const enums cannot be translated",
            );
            return;
        }
        if enum_data.members.is_empty() {
            self.facade.report(
                idx,
                ErrorCode::EmptyEnumUnsupported,
                "enums without members cannot be translated",
            );
            return;
        }
        self.check_naming(enum_data.name, enum_data.modifiers);
        out.write("enum ");
        out.emit(enum_data.name);
        out.write(" { ");
        for (i, member_idx) in enum_data.members.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            if let Some(member) = arena.get_enum_member(member_idx) {
                out.emit(member.name);
            }
        }
        out.write(" }");
    }

    // =========================================================================
    // Shared checks and helpers
    // =========================================================================

    /// Re-emit decorators verbatim, except the reserved const marker,
    /// which const detection consumes.
    fn emit_decorators(&mut self, decorators: &NodeList, out: &mut dyn EmitSink) {
        for decorator_idx in decorators.iter() {
            if self.is_const_marker(decorator_idx) {
                continue;
            }
            if let Some(decorator) = self.arena().get_decorator(decorator_idx) {
                out.write("@");
                out.emit(decorator.expression);
                out.write(" ");
            }
        }
    }

    fn has_const_marker(&self, decorators: &NodeList) -> bool {
        decorators.iter().any(|idx| self.is_const_marker(idx))
    }

    /// `@CONST` or `@CONST()`.
    fn is_const_marker(&self, decorator_idx: NodeIndex) -> bool {
        let arena = self.arena();
        let Some(decorator) = arena.get_decorator(decorator_idx) else {
            return false;
        };
        let marker = &self.facade.options().const_decorator;
        if let Some(text) = arena.identifier_text(decorator.expression) {
            return text == *marker;
        }
        if let Some(call) = arena.get_call_expr(decorator.expression) {
            return arena
                .identifier_text(call.expression)
                .is_some_and(|text| text == *marker);
        }
        false
    }

    fn check_visibility(&mut self, node: NodeIndex, modifiers: ModifierFlags) {
        if modifiers.contains(ModifierFlags::PROTECTED) {
            self.facade.report(
                node,
                ErrorCode::ProtectedVisibilityUnsupported,
                "protected visibility cannot be translated",
            );
        }
    }

    /// Private modifier and leading-underscore name must coincide.
    /// Mismatches are reported, never corrected.
    fn check_naming(&mut self, name: NodeIndex, modifiers: ModifierFlags) {
        if !self.facade.options().enforce_underscore_privacy {
            return;
        }
        let Some(text) = self.arena().identifier_text(name) else {
            return;
        };
        let is_private = modifiers.contains(ModifierFlags::PRIVATE);
        let has_underscore = text.starts_with('_');
        if is_private && !has_underscore {
            let text = text.to_string();
            self.facade.report(
                name,
                ErrorCode::NamingConventionMismatch,
                format!("private member '{text}' must start with '_'"),
            );
        } else if !is_private && has_underscore {
            let text = text.to_string();
            self.facade.report(
                name,
                ErrorCode::NamingConventionMismatch,
                format!("'{text}' starts with '_' but is not declared private"),
            );
        }
    }

    /// Emit a type annotation: keyword types by table, named types through
    /// the substitution engine, everything else by default emission.
    fn emit_type(&mut self, type_idx: NodeIndex, out: &mut dyn EmitSink) {
        let arena = self.arena();
        let Some(type_ref) = arena.get_type_ref(type_idx) else {
            out.emit(type_idx);
            return;
        };
        if let Some(text) = arena.identifier_text(type_ref.type_name) {
            if let Some(&(_, target)) = PRIMITIVE_TYPES.iter().find(|(source, _)| *source == text)
            {
                out.write(target);
                self.emit_type_arguments(type_ref.type_arguments.as_ref(), out);
                return;
            }
        }
        self.facade.rewrite_type_name(type_ref.type_name, out);
        self.emit_type_arguments(type_ref.type_arguments.as_ref(), out);
    }

    fn emit_type_arguments(&mut self, type_args: Option<&NodeList>, out: &mut dyn EmitSink) {
        let Some(type_args) = type_args else {
            return;
        };
        if type_args.is_empty() {
            return;
        }
        out.write("<");
        for (i, arg) in type_args.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            self.emit_type(arg, out);
        }
        out.write(">");
    }

    fn emit_type_parameters(&mut self, type_params: &NodeList, out: &mut dyn EmitSink) {
        let arena = self.arena();
        if type_params.is_empty() {
            return;
        }
        out.write("<");
        for (i, param_idx) in type_params.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            let Some(param) = arena.get_type_parameter(param_idx) else {
                continue;
            };
            out.emit(param.name);
            if param.constraint.is_some() {
                out.write(" extends ");
                self.emit_type(param.constraint, out);
            }
        }
        out.write(">");
    }
}
