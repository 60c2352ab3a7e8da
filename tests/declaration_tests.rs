//! Integration tests for the structural declaration emitter: parameter
//! grouping, variable lists, class shapes, enums, properties and the
//! naming-convention checks.

use tsdart::ast::{
    BindingElementData, BindingPatternData, CallSignatureData, ClassData, ConstructorData,
    DecoratorData, EnumData, EnumMemberData, ModifierFlags, NodeArena, NodeData, NodeIndex,
    NodeList, ParameterData, PropertyDeclData, PropertySignatureData, VariableDeclData,
    VariableListData,
};
use tsdart::span::Span;
use tsdart::substitution::ApiSubstituter;
use tsdart::test_fixtures::{
    TEST_FILE_NAME, TableChecker, TestPrinter, ident, number, object_literal, type_ref,
};
use tsdart::{DeclarationEmitter, ErrorCode, TranspileOptions, default_registry};

// =============================================================================
// Builders
// =============================================================================

fn simple_param(arena: &mut NodeArena, name: &str, type_name: Option<&str>) -> NodeIndex {
    let name = ident(arena, name);
    let type_annotation = match type_name {
        Some(type_name) => type_ref(arena, type_name),
        None => NodeIndex::NONE,
    };
    add_param(arena, name, type_annotation, NodeIndex::NONE, false, false)
}

fn add_param(
    arena: &mut NodeArena,
    name: NodeIndex,
    type_annotation: NodeIndex,
    initializer: NodeIndex,
    question: bool,
    dot_dot_dot: bool,
) -> NodeIndex {
    arena.add(
        NodeData::Parameter(ParameterData {
            modifiers: ModifierFlags::empty(),
            dot_dot_dot,
            name,
            question,
            type_annotation,
            initializer,
        }),
        Span::default(),
    )
}

fn promoted_param(
    arena: &mut NodeArena,
    name: &str,
    type_name: &str,
    modifiers: ModifierFlags,
) -> NodeIndex {
    let name = ident(arena, name);
    let type_annotation = type_ref(arena, type_name);
    arena.add(
        NodeData::Parameter(ParameterData {
            modifiers,
            dot_dot_dot: false,
            name,
            question: false,
            type_annotation,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    )
}

fn class_decl(
    arena: &mut NodeArena,
    name: &str,
    decorators: Vec<NodeIndex>,
    members: Vec<NodeIndex>,
) -> NodeIndex {
    let name = ident(arena, name);
    arena.add(
        NodeData::ClassDeclaration(ClassData {
            modifiers: ModifierFlags::empty(),
            decorators: NodeList::new(decorators),
            name,
            type_parameters: None,
            extends_clause: NodeIndex::NONE,
            implements_clauses: NodeList::empty(),
            members: NodeList::new(members),
        }),
        Span::default(),
    )
}

fn interface_decl(arena: &mut NodeArena, name: &str, members: Vec<NodeIndex>) -> NodeIndex {
    let name = ident(arena, name);
    arena.add(
        NodeData::InterfaceDeclaration(ClassData {
            modifiers: ModifierFlags::empty(),
            decorators: NodeList::empty(),
            name,
            type_parameters: None,
            extends_clause: NodeIndex::NONE,
            implements_clauses: NodeList::empty(),
            members: NodeList::new(members),
        }),
        Span::default(),
    )
}

fn decorator(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let expression = ident(arena, name);
    arena.add(NodeData::Decorator(DecoratorData { expression }), Span::default())
}

fn property(
    arena: &mut NodeArena,
    name: &str,
    type_name: Option<&str>,
    decorators: Vec<NodeIndex>,
    modifiers: ModifierFlags,
) -> NodeIndex {
    let name = ident(arena, name);
    let type_annotation = match type_name {
        Some(type_name) => type_ref(arena, type_name),
        None => NodeIndex::NONE,
    };
    arena.add(
        NodeData::PropertyDeclaration(PropertyDeclData {
            modifiers,
            decorators: NodeList::new(decorators),
            name,
            question: false,
            type_annotation,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    )
}

fn variable_list(
    arena: &mut NodeArena,
    modifiers: ModifierFlags,
    declarations: Vec<(NodeIndex, NodeIndex, NodeIndex)>,
) -> NodeIndex {
    let declarations = declarations
        .into_iter()
        .map(|(name, type_annotation, initializer)| {
            arena.add(
                NodeData::VariableDeclaration(VariableDeclData {
                    name,
                    type_annotation,
                    initializer,
                }),
                Span::default(),
            )
        })
        .collect();
    arena.add(
        NodeData::VariableDeclarationList(VariableListData {
            modifiers,
            declarations: NodeList::new(declarations),
        }),
        Span::default(),
    )
}

struct Harness {
    arena: NodeArena,
    checker: TableChecker,
    options: TranspileOptions,
}

impl Harness {
    fn new() -> Self {
        Harness {
            arena: NodeArena::new(TEST_FILE_NAME),
            checker: TableChecker::new(),
            options: TranspileOptions::default(),
        }
    }

    /// Run the declaration emitter on `node` and return (output, engine
    /// diagnostics codes, handled).
    fn emit(&mut self, node: NodeIndex) -> (String, Vec<ErrorCode>, bool) {
        self.arena.rebuild_parents(node);
        let mut engine =
            ApiSubstituter::new(&self.arena, &self.checker, default_registry(), &self.options);
        let mut printer = TestPrinter::new(&self.arena);
        let handled =
            DeclarationEmitter::new(&mut engine).try_emit_declaration(node, &mut printer);
        let codes = engine.diagnostics().error_codes();
        (printer.finish(), codes, handled)
    }

    fn emit_parameters(&mut self, params: Vec<NodeIndex>) -> (String, Vec<ErrorCode>) {
        let list = NodeList::new(params);
        let mut engine =
            ApiSubstituter::new(&self.arena, &self.checker, default_registry(), &self.options);
        let mut printer = TestPrinter::new(&self.arena);
        DeclarationEmitter::new(&mut engine).emit_parameters(&list, false, &mut printer);
        let codes = engine.diagnostics().error_codes();
        (printer.finish(), codes)
    }
}

// =============================================================================
// Parameter grouping
// =============================================================================

#[test]
fn required_prefix_precedes_positional_optional_group() {
    let mut harness = Harness::new();
    let a = simple_param(&mut harness.arena, "a", Some("number"));
    let b_name = ident(&mut harness.arena, "b");
    let b_type = type_ref(&mut harness.arena, "number");
    let b_default = number(&mut harness.arena, "1");
    let b = add_param(&mut harness.arena, b_name, b_type, b_default, false, false);
    let c_name = ident(&mut harness.arena, "c");
    let c = add_param(&mut harness.arena, c_name, NodeIndex::NONE, NodeIndex::NONE, true, false);

    let (output, codes) = harness.emit_parameters(vec![a, b, c]);
    assert_eq!(output, "(num a, [num b = 1, c])");
    assert!(codes.is_empty());
}

/// A plain parameter after an optional one belongs to the optional group:
/// the required prefix is maximal, not interleaved.
#[test]
fn plain_parameter_after_optional_joins_optional_group() {
    let mut harness = Harness::new();
    let a_name = ident(&mut harness.arena, "a");
    let a_default = number(&mut harness.arena, "0");
    let a = add_param(&mut harness.arena, a_name, NodeIndex::NONE, a_default, false, false);
    let b = simple_param(&mut harness.arena, "b", None);

    let (output, codes) = harness.emit_parameters(vec![a, b]);
    assert_eq!(output, "([a = 0, b])");
    assert!(codes.is_empty());
}

#[test]
fn all_required_parameters_emit_without_brackets() {
    let mut harness = Harness::new();
    let a = simple_param(&mut harness.arena, "a", Some("string"));
    let b = simple_param(&mut harness.arena, "b", Some("boolean"));

    let (output, codes) = harness.emit_parameters(vec![a, b]);
    assert_eq!(output, "(String a, bool b)");
    assert!(codes.is_empty());
}

#[test]
fn rest_parameter_is_reported() {
    let mut harness = Harness::new();
    let rest_name = ident(&mut harness.arena, "rest");
    let rest = add_param(
        &mut harness.arena,
        rest_name,
        NodeIndex::NONE,
        NodeIndex::NONE,
        false,
        true,
    );

    let (output, codes) = harness.emit_parameters(vec![rest]);
    assert_eq!(output, "()");
    assert_eq!(codes, vec![ErrorCode::UnsupportedRestParameter]);
}

/// `{x, y = 2}: {x: number, y: number} = {y: 3}`: the type of `x` resolves
/// through property-type resolution, and `y` has both an inline and an
/// outer default.
#[test]
fn named_parameter_with_conflicting_defaults() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;

    let x_binding_name = ident(arena, "x");
    let x_element = arena.add(
        NodeData::BindingElement(BindingElementData {
            name: x_binding_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let y_binding_name = ident(arena, "y");
    let y_default = number(arena, "2");
    let y_element = arena.add(
        NodeData::BindingElement(BindingElementData {
            name: y_binding_name,
            initializer: y_default,
        }),
        Span::default(),
    );
    let pattern = arena.add(
        NodeData::ObjectBindingPattern(BindingPatternData {
            elements: NodeList::new(vec![x_element, y_element]),
        }),
        Span::default(),
    );

    // Declared type {x: number, y: number} as a literal object type.
    let x_sig_name = ident(arena, "x");
    let x_sig_type = type_ref(arena, "number");
    let x_sig = arena.add(
        NodeData::PropertySignature(PropertySignatureData {
            modifiers: ModifierFlags::empty(),
            name: x_sig_name,
            question: false,
            type_annotation: x_sig_type,
        }),
        Span::default(),
    );
    let y_sig_name = ident(arena, "y");
    let y_sig_type = type_ref(arena, "number");
    let y_sig = arena.add(
        NodeData::PropertySignature(PropertySignatureData {
            modifiers: ModifierFlags::empty(),
            name: y_sig_name,
            question: false,
            type_annotation: y_sig_type,
        }),
        Span::default(),
    );
    let annotation = arena.add(
        NodeData::TypeLiteral(tsdart::ast::TypeLiteralData {
            members: NodeList::new(vec![x_sig, y_sig]),
        }),
        Span::default(),
    );

    // Outer default {y: 3} for the whole pattern.
    let y_key = ident(arena, "y");
    let y_outer = number(arena, "3");
    let outer = object_literal(arena, vec![(y_key, y_outer)]);

    let param = add_param(arena, pattern, annotation, outer, false, false);

    let (output, codes) = harness.emit_parameters(vec![param]);
    assert_eq!(output, "({num x, num y = 2})");
    assert_eq!(codes, vec![ErrorCode::AmbiguousInitializer]);
}

#[test]
fn named_parameter_takes_outer_default_when_unambiguous() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;

    let y_binding_name = ident(arena, "y");
    let y_element = arena.add(
        NodeData::BindingElement(BindingElementData {
            name: y_binding_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let pattern = arena.add(
        NodeData::ObjectBindingPattern(BindingPatternData {
            elements: NodeList::new(vec![y_element]),
        }),
        Span::default(),
    );
    let y_key = ident(arena, "y");
    let y_outer = number(arena, "3");
    let outer = object_literal(arena, vec![(y_key, y_outer)]);
    let param = add_param(arena, pattern, NodeIndex::NONE, outer, false, false);

    let (output, codes) = harness.emit_parameters(vec![param]);
    assert_eq!(output, "({y = 3})");
    assert!(codes.is_empty());
}

#[test]
fn named_group_follows_positional_groups() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;

    let a = simple_param(arena, "a", Some("number"));
    let binding_name = ident(arena, "flag");
    let element = arena.add(
        NodeData::BindingElement(BindingElementData {
            name: binding_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let pattern = arena.add(
        NodeData::ObjectBindingPattern(BindingPatternData {
            elements: NodeList::new(vec![element]),
        }),
        Span::default(),
    );
    let named = add_param(arena, pattern, NodeIndex::NONE, NodeIndex::NONE, false, false);

    let (output, codes) = harness.emit_parameters(vec![a, named]);
    assert_eq!(output, "(num a, {flag})");
    assert!(codes.is_empty());
}

// =============================================================================
// Variable declaration lists
// =============================================================================

#[test]
fn multi_declarator_list_with_type_is_malformed() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let i_name = ident(arena, "i");
    let i_type = type_ref(arena, "number");
    let i_init = number(arena, "0");
    let j_name = ident(arena, "j");
    let j_init = number(arena, "1");
    let list = variable_list(
        arena,
        ModifierFlags::LET,
        vec![(i_name, i_type, i_init), (j_name, NodeIndex::NONE, j_init)],
    );

    let (_, codes, handled) = harness.emit(list);
    assert!(handled);
    assert_eq!(codes, vec![ErrorCode::MalformedVariableDeclarationList]);
}

#[test]
fn single_declarator_may_carry_a_type() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "i");
    let annotation = type_ref(arena, "number");
    let init = number(arena, "0");
    let list = variable_list(arena, ModifierFlags::LET, vec![(name, annotation, init)]);

    let (output, codes, handled) = harness.emit(list);
    assert!(handled);
    assert!(codes.is_empty());
    assert_eq!(output, "num i = 0");
}

#[test]
fn const_declarator_with_wrapper_promotes_to_deep_const() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "xs");
    let wrapper_callee = ident(arena, "CONST_EXPR");
    let inner = number(arena, "42");
    let init = tsdart::test_fixtures::call(arena, wrapper_callee, vec![inner]);
    let list = variable_list(arena, ModifierFlags::CONST, vec![(name, NodeIndex::NONE, init)]);

    let (output, codes, _) = harness.emit(list);
    assert!(codes.is_empty());
    assert_eq!(output, "const xs = 42");
}

#[test]
fn const_declarator_without_wrapper_is_reference_final() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "xs");
    let init = number(arena, "42");
    let list = variable_list(arena, ModifierFlags::CONST, vec![(name, NodeIndex::NONE, init)]);

    let (output, _, _) = harness.emit(list);
    assert_eq!(output, "final xs = 42");
}

#[test]
fn untyped_non_final_declarator_uses_inferred_placeholder() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let i_name = ident(arena, "i");
    let i_init = number(arena, "0");
    let j_name = ident(arena, "j");
    let j_init = number(arena, "1");
    let list = variable_list(
        arena,
        ModifierFlags::LET,
        vec![(i_name, NodeIndex::NONE, i_init), (j_name, NodeIndex::NONE, j_init)],
    );

    let (output, codes, _) = harness.emit(list);
    assert!(codes.is_empty());
    assert_eq!(output, "var i = 0, j = 1");
}

// =============================================================================
// Class-like declarations
// =============================================================================

#[test]
fn interface_emits_as_abstract_class() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "size");
    let annotation = type_ref(arena, "number");
    let size = arena.add(
        NodeData::PropertySignature(PropertySignatureData {
            modifiers: ModifierFlags::empty(),
            name,
            question: false,
            type_annotation: annotation,
        }),
        Span::default(),
    );
    let iface = interface_decl(arena, "Shape", vec![size]);

    let (output, codes, handled) = harness.emit(iface);
    assert!(handled);
    assert!(codes.is_empty());
    assert_eq!(output, "abstract class Shape {\n  num size;\n}");
}

/// An interface whose only member is a bare call signature is a function
/// type, not a class shape.
#[test]
fn single_call_signature_interface_emits_as_typedef() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let param = simple_param(arena, "a", Some("number"));
    let return_type = type_ref(arena, "string");
    let signature = arena.add(
        NodeData::CallSignature(CallSignatureData {
            type_parameters: None,
            parameters: NodeList::new(vec![param]),
            type_annotation: return_type,
        }),
        Span::default(),
    );
    let iface = interface_decl(arena, "Formatter", vec![signature]);

    let (output, codes, handled) = harness.emit(iface);
    assert!(handled);
    assert!(codes.is_empty());
    assert_eq!(output, "typedef String Formatter(num a);");
}

#[test]
fn const_class_without_constructor_synthesizes_one() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let marker = decorator(arena, "CONST");
    let class = class_decl(arena, "Point", vec![marker], vec![]);

    let (output, codes, _) = harness.emit(class);
    assert!(codes.is_empty());
    assert_eq!(output, "class Point {\n  const Point();\n}");
}

#[test]
fn const_class_properties_become_final() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let marker = decorator(arena, "CONST");
    let x = property(arena, "x", Some("number"), vec![], ModifierFlags::empty());
    let class = class_decl(arena, "Point", vec![marker], vec![x]);

    let (output, _, _) = harness.emit(class);
    assert_eq!(output, "class Point {\n  final num x;\n  const Point();\n}");
}

/// A const-marked property stays deeply const even when the enclosing
/// constructor is not const.
#[test]
fn const_property_is_independent_of_constructor_constness() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let marker = decorator(arena, "CONST");
    let x = property(arena, "x", Some("number"), vec![marker], ModifierFlags::empty());
    let class = class_decl(arena, "Config", vec![], vec![x]);

    let (output, codes, _) = harness.emit(class);
    assert!(codes.is_empty());
    assert_eq!(output, "class Config {\n  const num x;\n}");
}

#[test]
fn untyped_mutable_property_uses_inferred_placeholder() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let x = property(arena, "x", None, vec![], ModifierFlags::empty());
    let class = class_decl(arena, "Bag", vec![], vec![x]);

    let (output, _, _) = harness.emit(class);
    assert_eq!(output, "class Bag {\n  var x;\n}");
}

#[test]
fn field_promoting_constructor_parameter_synthesizes_property() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let x = promoted_param(arena, "x", "number", ModifierFlags::PRIVATE);
    let ctor = arena.add(
        NodeData::Constructor(ConstructorData {
            modifiers: ModifierFlags::empty(),
            parameters: NodeList::new(vec![x]),
            body: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let class = class_decl(arena, "Point", vec![], vec![ctor]);

    let (output, codes, _) = harness.emit(class);
    assert!(codes.is_empty());
    assert_eq!(output, "class Point {\n  num x;\n  Point(this.x);\n}");
}

#[test]
fn readonly_promoted_parameter_is_final() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let x = promoted_param(arena, "x", "number", ModifierFlags::READONLY);
    let ctor = arena.add(
        NodeData::Constructor(ConstructorData {
            modifiers: ModifierFlags::empty(),
            parameters: NodeList::new(vec![x]),
            body: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let class = class_decl(arena, "Point", vec![], vec![ctor]);

    let (output, _, _) = harness.emit(class);
    assert_eq!(output, "class Point {\n  final num x;\n  Point(this.x);\n}");
}

#[test]
fn protected_member_is_reported() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let x = property(arena, "x", Some("number"), vec![], ModifierFlags::PROTECTED);
    let class = class_decl(arena, "Widget", vec![], vec![x]);

    let (_, codes, _) = harness.emit(class);
    assert_eq!(codes, vec![ErrorCode::ProtectedVisibilityUnsupported]);
}

#[test]
fn decorators_pass_through_except_const_marker() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let marker = decorator(arena, "CONST");
    let component = decorator(arena, "Component");
    let class = class_decl(arena, "App", vec![component, marker], vec![]);

    let (output, _, _) = harness.emit(class);
    assert!(output.starts_with("@Component class App"));
    assert!(!output.contains("@CONST"));
    // The marker still took effect: a const constructor was synthesized.
    assert!(output.contains("const App();"));
}

// =============================================================================
// Enums
// =============================================================================

#[test]
fn enum_emits_member_names() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "Color");
    let red_name = ident(arena, "Red");
    let red = arena.add(
        NodeData::EnumMember(EnumMemberData {
            name: red_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let green_name = ident(arena, "Green");
    let green = arena.add(
        NodeData::EnumMember(EnumMemberData {
            name: green_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let color = arena.add(
        NodeData::EnumDeclaration(EnumData {
            modifiers: ModifierFlags::empty(),
            name,
            members: NodeList::new(vec![red, green]),
        }),
        Span::default(),
    );

    let (output, codes, handled) = harness.emit(color);
    assert!(handled);
    assert!(codes.is_empty());
    assert_eq!(output, "enum Color { Red, Green }");
}

#[test]
fn empty_enum_is_reported() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "Nothing");
    let nothing = arena.add(
        NodeData::EnumDeclaration(EnumData {
            modifiers: ModifierFlags::empty(),
            name,
            members: NodeList::empty(),
        }),
        Span::default(),
    );

    let (output, codes, handled) = harness.emit(nothing);
    assert!(handled);
    assert!(output.is_empty());
    assert_eq!(codes, vec![ErrorCode::EmptyEnumUnsupported]);
}

#[test]
fn const_enum_is_reported() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let name = ident(arena, "Flags");
    let member_name = ident(arena, "A");
    let member = arena.add(
        NodeData::EnumMember(EnumMemberData {
            name: member_name,
            initializer: NodeIndex::NONE,
        }),
        Span::default(),
    );
    let flags = arena.add(
        NodeData::EnumDeclaration(EnumData {
            modifiers: ModifierFlags::CONST,
            name,
            members: NodeList::new(vec![member]),
        }),
        Span::default(),
    );

    let (_, codes, _) = harness.emit(flags);
    assert_eq!(codes, vec![ErrorCode::ConstEnumUnsupported]);
}

// =============================================================================
// Naming conventions
// =============================================================================

#[test]
fn naming_convention_mismatches_are_reported_not_corrected() {
    let mut harness = Harness::new();
    harness.options.enforce_underscore_privacy = true;
    let arena = &mut harness.arena;
    let hidden = property(arena, "hidden", Some("number"), vec![], ModifierFlags::PRIVATE);
    let exposed = property(arena, "_exposed", Some("number"), vec![], ModifierFlags::empty());
    let ok = property(arena, "_ok", Some("number"), vec![], ModifierFlags::PRIVATE);
    let class = class_decl(arena, "Widget", vec![], vec![hidden, exposed, ok]);

    let (output, codes, _) = harness.emit(class);
    assert_eq!(
        codes,
        vec![
            ErrorCode::NamingConventionMismatch,
            ErrorCode::NamingConventionMismatch
        ]
    );
    // Names are emitted as written.
    assert!(output.contains("num hidden;"));
    assert!(output.contains("num _exposed;"));
    assert!(output.contains("num _ok;"));
}

#[test]
fn naming_convention_is_off_by_default() {
    let mut harness = Harness::new();
    let arena = &mut harness.arena;
    let hidden = property(arena, "hidden", Some("number"), vec![], ModifierFlags::PRIVATE);
    let class = class_decl(arena, "Widget", vec![], vec![hidden]);

    let (_, codes, _) = harness.emit(class);
    assert!(codes.is_empty());
}
