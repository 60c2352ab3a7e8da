//! Arena AST
//!
//! Index-based AST storage for one translation unit. The surrounding
//! front end (lexer/parser/type checker) builds the arena; this crate only
//! reads it.
//!
//! # Architecture
//!
//! Nodes live in a single `Vec` inside `NodeArena` and are addressed by
//! `NodeIndex` handles with a `NONE` sentinel. Each node carries:
//!
//! 1. a typed payload (`NodeData`) with per-kind data structs
//! 2. its source `Span`
//! 3. a `parent` back-reference - a relation used for upward walks
//!    (const-context detection), never an ownership edge
//!
//! Parent links are derived, not supplied: after building a tree, call
//! [`NodeArena::rebuild_parents`] on its root. Child order inside payloads
//! is source order throughout.

use crate::span::Span;
use bitflags::bitflags;
use std::fmt;

// =============================================================================
// Handles
// =============================================================================

/// Index of a node in the arena. `NodeIndex::NONE` means "no node".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn is_some(&self) -> bool {
        *self != Self::NONE
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "NodeIndex(NONE)")
        } else {
            write!(f, "NodeIndex({})", self.0)
        }
    }
}

/// An ordered sequence of child nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }

    pub fn empty() -> Self {
        NodeList { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }
}

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Declaration modifiers, packed. The parser collapses modifier keyword
    /// tokens into this set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ModifierFlags: u16 {
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const READONLY  = 1 << 3;
        const STATIC    = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const EXPORT    = 1 << 6;
        const DECLARE   = 1 << 7;
        /// `const` on a variable list or enum.
        const CONST     = 1 << 8;
        const LET       = 1 << 9;
    }
}

impl ModifierFlags {
    /// Accessibility modifiers that promote a constructor parameter to a
    /// field on the enclosing type.
    pub const FIELD_PROMOTING: ModifierFlags = ModifierFlags::PUBLIC
        .union(ModifierFlags::PRIVATE)
        .union(ModifierFlags::PROTECTED)
        .union(ModifierFlags::READONLY);

    pub fn is_field_promoting(&self) -> bool {
        self.intersects(Self::FIELD_PROMOTING)
    }
}

// =============================================================================
// Syntax Kinds
// =============================================================================

/// Fieldless discriminant for node payloads, for cheap kind comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Identifier,
    StringLiteral,
    NumericLiteral,
    ObjectLiteral,
    PropertyAssignment,
    CallExpression,
    NewExpression,
    PropertyAccess,
    TypeReference,
    TypeLiteral,
    PropertySignature,
    CallSignature,
    Parameter,
    ObjectBindingPattern,
    BindingElement,
    VariableDeclarationList,
    VariableDeclaration,
    ForStatement,
    Block,
    ExpressionStatement,
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMember,
    Constructor,
    PropertyDeclaration,
    MethodDeclaration,
    FunctionDeclaration,
    Decorator,
    TypeParameter,
}

// =============================================================================
// Typed Payloads
// =============================================================================

/// Data for identifier nodes
#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub text: String,
}

/// Data for string/numeric literals
#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

/// Data for object literal expressions
#[derive(Clone, Debug)]
pub struct ObjectLiteralData {
    pub properties: NodeList,
}

/// Data for `name: value` entries of an object literal
#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for call/new expressions
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: NodeList,
}

/// Data for property access (`expr.name`)
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
}

/// Data for type references (`Name<Args>`)
#[derive(Clone, Debug)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Data for literal object types (`{x: number}`)
#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

/// Data for property signatures inside interfaces and type literals
#[derive(Clone, Debug)]
pub struct PropertySignatureData {
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
}

/// Data for bare call signatures inside interfaces and type literals
#[derive(Clone, Debug)]
pub struct CallSignatureData {
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

/// Data for parameters
#[derive(Clone, Debug)]
pub struct ParameterData {
    pub modifiers: ModifierFlags,
    pub dot_dot_dot: bool,
    /// Identifier or object binding pattern.
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for object binding patterns (`{x, y = 2}`)
#[derive(Clone, Debug)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

/// Data for single elements of a binding pattern
#[derive(Clone, Debug)]
pub struct BindingElementData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for variable declaration lists
#[derive(Clone, Debug)]
pub struct VariableListData {
    pub modifiers: ModifierFlags,
    pub declarations: NodeList,
}

/// Data for single variable declarators
#[derive(Clone, Debug)]
pub struct VariableDeclData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for for-loops
#[derive(Clone, Debug)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

/// Data for blocks
#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: NodeList,
}

/// Data for expression statements
#[derive(Clone, Debug)]
pub struct ExpressionStatementData {
    pub expression: NodeIndex,
}

/// Data for class and interface declarations
#[derive(Clone, Debug)]
pub struct ClassData {
    pub modifiers: ModifierFlags,
    pub decorators: NodeList,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    /// Heritage type references (`extends`/`implements`), in source order.
    pub extends_clause: NodeIndex,
    pub implements_clauses: NodeList,
    pub members: NodeList,
}

/// Data for enum declarations
#[derive(Clone, Debug)]
pub struct EnumData {
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub members: NodeList,
}

/// Data for enum members
#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for constructors
#[derive(Clone, Debug)]
pub struct ConstructorData {
    pub modifiers: ModifierFlags,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// Data for property declarations on classes
#[derive(Clone, Debug)]
pub struct PropertyDeclData {
    pub modifiers: ModifierFlags,
    pub decorators: NodeList,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for function and method declarations
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub modifiers: ModifierFlags,
    pub decorators: NodeList,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    /// Return type annotation.
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
}

/// Data for decorators
#[derive(Clone, Debug)]
pub struct DecoratorData {
    pub expression: NodeIndex,
}

/// Data for type parameters (`T extends U`)
#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
}

// =============================================================================
// Node
// =============================================================================

/// Typed node payload. One variant per `SyntaxKind`.
#[derive(Clone, Debug)]
pub enum NodeData {
    Identifier(IdentifierData),
    StringLiteral(LiteralData),
    NumericLiteral(LiteralData),
    ObjectLiteral(ObjectLiteralData),
    PropertyAssignment(PropertyAssignmentData),
    CallExpression(CallExprData),
    NewExpression(CallExprData),
    PropertyAccess(AccessExprData),
    TypeReference(TypeRefData),
    TypeLiteral(TypeLiteralData),
    PropertySignature(PropertySignatureData),
    CallSignature(CallSignatureData),
    Parameter(ParameterData),
    ObjectBindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    VariableDeclarationList(VariableListData),
    VariableDeclaration(VariableDeclData),
    ForStatement(LoopData),
    Block(BlockData),
    ExpressionStatement(ExpressionStatementData),
    ClassDeclaration(ClassData),
    InterfaceDeclaration(ClassData),
    EnumDeclaration(EnumData),
    EnumMember(EnumMemberData),
    Constructor(ConstructorData),
    PropertyDeclaration(PropertyDeclData),
    MethodDeclaration(FunctionData),
    FunctionDeclaration(FunctionData),
    Decorator(DecoratorData),
    TypeParameter(TypeParameterData),
}

/// A node: payload plus span and parent back-reference.
#[derive(Clone, Debug)]
pub struct Node {
    pub data: NodeData,
    pub span: Span,
    pub parent: NodeIndex,
}

impl Node {
    pub fn kind(&self) -> SyntaxKind {
        match &self.data {
            NodeData::Identifier(_) => SyntaxKind::Identifier,
            NodeData::StringLiteral(_) => SyntaxKind::StringLiteral,
            NodeData::NumericLiteral(_) => SyntaxKind::NumericLiteral,
            NodeData::ObjectLiteral(_) => SyntaxKind::ObjectLiteral,
            NodeData::PropertyAssignment(_) => SyntaxKind::PropertyAssignment,
            NodeData::CallExpression(_) => SyntaxKind::CallExpression,
            NodeData::NewExpression(_) => SyntaxKind::NewExpression,
            NodeData::PropertyAccess(_) => SyntaxKind::PropertyAccess,
            NodeData::TypeReference(_) => SyntaxKind::TypeReference,
            NodeData::TypeLiteral(_) => SyntaxKind::TypeLiteral,
            NodeData::PropertySignature(_) => SyntaxKind::PropertySignature,
            NodeData::CallSignature(_) => SyntaxKind::CallSignature,
            NodeData::Parameter(_) => SyntaxKind::Parameter,
            NodeData::ObjectBindingPattern(_) => SyntaxKind::ObjectBindingPattern,
            NodeData::BindingElement(_) => SyntaxKind::BindingElement,
            NodeData::VariableDeclarationList(_) => SyntaxKind::VariableDeclarationList,
            NodeData::VariableDeclaration(_) => SyntaxKind::VariableDeclaration,
            NodeData::ForStatement(_) => SyntaxKind::ForStatement,
            NodeData::Block(_) => SyntaxKind::Block,
            NodeData::ExpressionStatement(_) => SyntaxKind::ExpressionStatement,
            NodeData::ClassDeclaration(_) => SyntaxKind::ClassDeclaration,
            NodeData::InterfaceDeclaration(_) => SyntaxKind::InterfaceDeclaration,
            NodeData::EnumDeclaration(_) => SyntaxKind::EnumDeclaration,
            NodeData::EnumMember(_) => SyntaxKind::EnumMember,
            NodeData::Constructor(_) => SyntaxKind::Constructor,
            NodeData::PropertyDeclaration(_) => SyntaxKind::PropertyDeclaration,
            NodeData::MethodDeclaration(_) => SyntaxKind::MethodDeclaration,
            NodeData::FunctionDeclaration(_) => SyntaxKind::FunctionDeclaration,
            NodeData::Decorator(_) => SyntaxKind::Decorator,
            NodeData::TypeParameter(_) => SyntaxKind::TypeParameter,
        }
    }

    /// Whether this node is a function-like declaration (owns parameters
    /// and possibly type parameters).
    pub fn is_function_like(&self) -> bool {
        matches!(
            self.data,
            NodeData::MethodDeclaration(_)
                | NodeData::FunctionDeclaration(_)
                | NodeData::Constructor(_)
                | NodeData::CallSignature(_)
        )
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Node storage for one translation unit.
pub struct NodeArena {
    nodes: Vec<Node>,
    file_name: String,
}

impl NodeArena {
    pub fn new(file_name: impl Into<String>) -> Self {
        NodeArena {
            nodes: Vec::new(),
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node. Parent links are filled in by `rebuild_parents`.
    pub fn add(&mut self, data: NodeData, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            span,
            parent: NodeIndex::NONE,
        });
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map(|n| n.span).unwrap_or_default()
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<SyntaxKind> {
        self.get(idx).map(Node::kind)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        let parent = self.get(idx)?.parent;
        if parent.is_none() { None } else { Some(parent) }
    }

    /// Iterate the ancestor chain of `idx`, nearest first.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors { arena: self, current: idx }
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    pub fn get_identifier(&self, idx: NodeIndex) -> Option<&IdentifierData> {
        match &self.get(idx)?.data {
            NodeData::Identifier(data) => Some(data),
            _ => None,
        }
    }

    /// Text of an identifier node, if `idx` is one.
    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        self.get_identifier(idx).map(|data| data.text.as_str())
    }

    /// Call or new expression data.
    pub fn get_call_expr(&self, idx: NodeIndex) -> Option<&CallExprData> {
        match &self.get(idx)?.data {
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_access_expr(&self, idx: NodeIndex) -> Option<&AccessExprData> {
        match &self.get(idx)?.data {
            NodeData::PropertyAccess(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_object_literal(&self, idx: NodeIndex) -> Option<&ObjectLiteralData> {
        match &self.get(idx)?.data {
            NodeData::ObjectLiteral(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_property_assignment(&self, idx: NodeIndex) -> Option<&PropertyAssignmentData> {
        match &self.get(idx)?.data {
            NodeData::PropertyAssignment(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_type_ref(&self, idx: NodeIndex) -> Option<&TypeRefData> {
        match &self.get(idx)?.data {
            NodeData::TypeReference(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_type_literal(&self, idx: NodeIndex) -> Option<&TypeLiteralData> {
        match &self.get(idx)?.data {
            NodeData::TypeLiteral(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_property_signature(&self, idx: NodeIndex) -> Option<&PropertySignatureData> {
        match &self.get(idx)?.data {
            NodeData::PropertySignature(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_call_signature(&self, idx: NodeIndex) -> Option<&CallSignatureData> {
        match &self.get(idx)?.data {
            NodeData::CallSignature(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_parameter(&self, idx: NodeIndex) -> Option<&ParameterData> {
        match &self.get(idx)?.data {
            NodeData::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_binding_pattern(&self, idx: NodeIndex) -> Option<&BindingPatternData> {
        match &self.get(idx)?.data {
            NodeData::ObjectBindingPattern(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_binding_element(&self, idx: NodeIndex) -> Option<&BindingElementData> {
        match &self.get(idx)?.data {
            NodeData::BindingElement(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_variable_list(&self, idx: NodeIndex) -> Option<&VariableListData> {
        match &self.get(idx)?.data {
            NodeData::VariableDeclarationList(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_variable_decl(&self, idx: NodeIndex) -> Option<&VariableDeclData> {
        match &self.get(idx)?.data {
            NodeData::VariableDeclaration(data) => Some(data),
            _ => None,
        }
    }

    /// Class or interface data.
    pub fn get_class_like(&self, idx: NodeIndex) -> Option<&ClassData> {
        match &self.get(idx)?.data {
            NodeData::ClassDeclaration(data) | NodeData::InterfaceDeclaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_enum(&self, idx: NodeIndex) -> Option<&EnumData> {
        match &self.get(idx)?.data {
            NodeData::EnumDeclaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_enum_member(&self, idx: NodeIndex) -> Option<&EnumMemberData> {
        match &self.get(idx)?.data {
            NodeData::EnumMember(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_constructor(&self, idx: NodeIndex) -> Option<&ConstructorData> {
        match &self.get(idx)?.data {
            NodeData::Constructor(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_property_decl(&self, idx: NodeIndex) -> Option<&PropertyDeclData> {
        match &self.get(idx)?.data {
            NodeData::PropertyDeclaration(data) => Some(data),
            _ => None,
        }
    }

    /// Function or method data.
    pub fn get_function(&self, idx: NodeIndex) -> Option<&FunctionData> {
        match &self.get(idx)?.data {
            NodeData::MethodDeclaration(data) | NodeData::FunctionDeclaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_decorator(&self, idx: NodeIndex) -> Option<&DecoratorData> {
        match &self.get(idx)?.data {
            NodeData::Decorator(data) => Some(data),
            _ => None,
        }
    }

    pub fn get_type_parameter(&self, idx: NodeIndex) -> Option<&TypeParameterData> {
        match &self.get(idx)?.data {
            NodeData::TypeParameter(data) => Some(data),
            _ => None,
        }
    }

    /// Type parameters declared by a function-like node, if any.
    pub fn type_parameters_of(&self, idx: NodeIndex) -> Option<&NodeList> {
        match &self.get(idx)?.data {
            NodeData::MethodDeclaration(data) | NodeData::FunctionDeclaration(data) => {
                data.type_parameters.as_ref()
            }
            NodeData::CallSignature(data) => data.type_parameters.as_ref(),
            _ => None,
        }
    }

    // =========================================================================
    // Parent links
    // =========================================================================

    /// Collect the direct children of `idx` into `out`, in source order.
    pub fn child_nodes(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        let Some(node) = self.get(idx) else {
            return;
        };
        fn push(out: &mut Vec<NodeIndex>, child: NodeIndex) {
            if child.is_some() {
                out.push(child);
            }
        }
        fn push_list(out: &mut Vec<NodeIndex>, child_list: &NodeList) {
            for child in child_list.iter() {
                if child.is_some() {
                    out.push(child);
                }
            }
        }
        match &node.data {
            NodeData::Identifier(_) | NodeData::StringLiteral(_) | NodeData::NumericLiteral(_) => {}
            NodeData::ObjectLiteral(data) => push_list(out, &data.properties),
            NodeData::PropertyAssignment(data) => {
                push(out, data.name);
                push(out, data.initializer);
            }
            NodeData::CallExpression(data) | NodeData::NewExpression(data) => {
                push(out, data.expression);
                if let Some(type_args) = &data.type_arguments {
                    push_list(out, type_args);
                }
                push_list(out, &data.arguments);
            }
            NodeData::PropertyAccess(data) => {
                push(out, data.expression);
                push(out, data.name);
            }
            NodeData::TypeReference(data) => {
                push(out, data.type_name);
                if let Some(type_args) = &data.type_arguments {
                    push_list(out, type_args);
                }
            }
            NodeData::TypeLiteral(data) => push_list(out, &data.members),
            NodeData::PropertySignature(data) => {
                push(out, data.name);
                push(out, data.type_annotation);
            }
            NodeData::CallSignature(data) => {
                if let Some(type_params) = &data.type_parameters {
                    push_list(out, type_params);
                }
                push_list(out, &data.parameters);
                push(out, data.type_annotation);
            }
            NodeData::Parameter(data) => {
                push(out, data.name);
                push(out, data.type_annotation);
                push(out, data.initializer);
            }
            NodeData::ObjectBindingPattern(data) => push_list(out, &data.elements),
            NodeData::BindingElement(data) => {
                push(out, data.name);
                push(out, data.initializer);
            }
            NodeData::VariableDeclarationList(data) => push_list(out, &data.declarations),
            NodeData::VariableDeclaration(data) => {
                push(out, data.name);
                push(out, data.type_annotation);
                push(out, data.initializer);
            }
            NodeData::ForStatement(data) => {
                push(out, data.initializer);
                push(out, data.condition);
                push(out, data.incrementor);
                push(out, data.statement);
            }
            NodeData::Block(data) => push_list(out, &data.statements),
            NodeData::ExpressionStatement(data) => push(out, data.expression),
            NodeData::ClassDeclaration(data) | NodeData::InterfaceDeclaration(data) => {
                push_list(out, &data.decorators);
                push(out, data.name);
                if let Some(type_params) = &data.type_parameters {
                    push_list(out, type_params);
                }
                push(out, data.extends_clause);
                push_list(out, &data.implements_clauses);
                push_list(out, &data.members);
            }
            NodeData::EnumDeclaration(data) => {
                push(out, data.name);
                push_list(out, &data.members);
            }
            NodeData::EnumMember(data) => {
                push(out, data.name);
                push(out, data.initializer);
            }
            NodeData::Constructor(data) => {
                push_list(out, &data.parameters);
                push(out, data.body);
            }
            NodeData::PropertyDeclaration(data) => {
                push_list(out, &data.decorators);
                push(out, data.name);
                push(out, data.type_annotation);
                push(out, data.initializer);
            }
            NodeData::MethodDeclaration(data) | NodeData::FunctionDeclaration(data) => {
                push_list(out, &data.decorators);
                push(out, data.name);
                if let Some(type_params) = &data.type_parameters {
                    push_list(out, type_params);
                }
                push_list(out, &data.parameters);
                push(out, data.type_annotation);
                push(out, data.body);
            }
            NodeData::Decorator(data) => push(out, data.expression),
            NodeData::TypeParameter(data) => {
                push(out, data.name);
                push(out, data.constraint);
            }
        }
    }

    /// Derive parent links for the subtree rooted at `root`.
    pub fn rebuild_parents(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        let mut children = Vec::new();
        while let Some(current) = stack.pop() {
            children.clear();
            self.child_nodes(current, &mut children);
            for &child in &children {
                if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                    node.parent = current;
                }
                stack.push(child);
            }
        }
    }
}

/// Iterator over the ancestor chain of a node, nearest first.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let parent = self.arena.parent(self.current)?;
        self.current = parent;
        Some(parent)
    }
}
