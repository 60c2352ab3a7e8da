//! Shared test fixtures
//!
//! A table-driven checker fake, a minimal default-emission printer and
//! arena-building helpers, shared between in-module unit tests and the
//! integration tests. The checker fake counts `symbol_at_location` calls
//! so the candidate-identifier fast path is observable from tests.

use crate::ast::{
    AccessExprData, CallExprData, IdentifierData, LiteralData, NodeArena, NodeData, NodeIndex,
    NodeList, ObjectLiteralData, PropertyAssignmentData, TypeRefData,
};
use crate::checker::{Symbol, SymbolFlags, SymbolId, TypeCheckerService, TypeId};
use crate::emit::EmitSink;
use crate::source_writer::SourceWriter;
use crate::span::Span;
use rustc_hash::FxHashMap;
use std::cell::Cell;

/// Common test file name.
pub const TEST_FILE_NAME: &str = "test.ts";

// =============================================================================
// TableChecker
// =============================================================================

/// A programmable [`TypeCheckerService`] backed by plain tables.
#[derive(Default)]
pub struct TableChecker {
    symbols: Vec<Symbol>,
    fq_names: FxHashMap<u32, String>,
    aliases: FxHashMap<u32, SymbolId>,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    node_types: FxHashMap<NodeIndex, TypeId>,
    type_symbols: FxHashMap<u32, SymbolId>,
    type_properties: FxHashMap<u32, Vec<SymbolId>>,
    decl_files: FxHashMap<NodeIndex, String>,
    next_type: u32,
    resolution_calls: Cell<usize>,
}

impl TableChecker {
    pub fn new() -> Self {
        TableChecker::default()
    }

    /// Register a symbol with no declarations.
    pub fn add_symbol(&mut self, name: &str, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.to_string(),
            flags,
            declarations: Vec::new(),
            value_declaration: None,
        });
        id
    }

    /// Register a symbol whose value declaration is `decl` in `file`.
    pub fn add_symbol_with_decl(
        &mut self,
        name: &str,
        flags: SymbolFlags,
        decl: NodeIndex,
        file: &str,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.to_string(),
            flags,
            declarations: vec![decl],
            value_declaration: Some(decl),
        });
        self.decl_files.insert(decl, file.to_string());
        id
    }

    /// Register a declaration-only symbol (no value declaration).
    pub fn add_type_symbol(
        &mut self,
        name: &str,
        flags: SymbolFlags,
        decl: NodeIndex,
        file: &str,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.to_string(),
            flags,
            declarations: vec![decl],
            value_declaration: None,
        });
        self.decl_files.insert(decl, file.to_string());
        id
    }

    pub fn set_fully_qualified_name(&mut self, symbol: SymbolId, name: &str) {
        self.fq_names.insert(symbol.0, name.to_string());
    }

    /// Make `from` an alias of `to`.
    pub fn set_alias(&mut self, from: SymbolId, to: SymbolId) {
        self.symbols[from.0 as usize].flags |= SymbolFlags::ALIAS;
        self.aliases.insert(from.0, to);
    }

    /// Bind the symbol referenced at `node`.
    pub fn bind(&mut self, node: NodeIndex, symbol: SymbolId) {
        self.node_symbols.insert(node, symbol);
    }

    /// Register a type declared by `symbol` (if any).
    pub fn add_type(&mut self, symbol: Option<SymbolId>) -> TypeId {
        let id = TypeId(self.next_type);
        self.next_type += 1;
        if let Some(symbol) = symbol {
            self.type_symbols.insert(id.0, symbol);
        }
        id
    }

    pub fn set_type_properties(&mut self, ty: TypeId, properties: Vec<SymbolId>) {
        self.type_properties.insert(ty.0, properties);
    }

    /// Bind the static type of `node`.
    pub fn bind_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.node_types.insert(node, ty);
    }

    /// Number of `symbol_at_location` queries made so far.
    pub fn resolution_calls(&self) -> usize {
        self.resolution_calls.get()
    }
}

impl TypeCheckerService for TableChecker {
    fn symbol_at_location(&self, node: NodeIndex) -> Option<SymbolId> {
        self.resolution_calls.set(self.resolution_calls.get() + 1);
        self.node_symbols.get(&node).copied()
    }

    fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    fn aliased_symbol(&self, id: SymbolId) -> Option<SymbolId> {
        self.aliases.get(&id.0).copied()
    }

    fn fully_qualified_name(&self, id: SymbolId) -> String {
        self.fq_names
            .get(&id.0)
            .cloned()
            .unwrap_or_else(|| self.symbols[id.0 as usize].name.clone())
    }

    fn type_at_location(&self, node: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn symbol_of_type(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_symbols.get(&ty.0).copied()
    }

    fn properties_of_type(&self, ty: TypeId) -> Vec<SymbolId> {
        self.type_properties.get(&ty.0).cloned().unwrap_or_default()
    }

    fn source_file_of(&self, decl: NodeIndex) -> Option<String> {
        self.decl_files.get(&decl).cloned()
    }
}

// =============================================================================
// TestPrinter
// =============================================================================

/// A minimal default-emission printer implementing [`EmitSink`].
///
/// Stands in for the driver's printer: prints expressions in a plain
/// source-like notation without consulting the substitution engine, which
/// is exactly the "default emission" a declined rule falls back to.
pub struct TestPrinter<'a> {
    arena: &'a NodeArena,
    writer: SourceWriter,
}

impl<'a> TestPrinter<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        TestPrinter {
            arena,
            writer: SourceWriter::with_capacity(256),
        }
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }
}

impl EmitSink for TestPrinter<'_> {
    fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    fn emit(&mut self, node: NodeIndex) {
        let Some(data) = self.arena.get(node).map(|n| n.data.clone()) else {
            return;
        };
        match data {
            NodeData::Identifier(data) => self.writer.write(&data.text),
            NodeData::NumericLiteral(data) => self.writer.write(&data.text),
            NodeData::StringLiteral(data) => {
                self.writer.write("\"");
                self.writer.write(&data.text);
                self.writer.write("\"");
            }
            NodeData::ObjectLiteral(data) => {
                self.writer.write("{");
                for (i, property) in data.properties.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.emit(property);
                }
                self.writer.write("}");
            }
            NodeData::PropertyAssignment(data) => {
                self.emit(data.name);
                self.writer.write(": ");
                self.emit(data.initializer);
            }
            NodeData::PropertyAccess(data) => {
                self.emit(data.expression);
                self.writer.write(".");
                self.emit(data.name);
            }
            NodeData::CallExpression(data) => {
                self.emit(data.expression);
                self.emit_arguments(&data.arguments);
            }
            NodeData::NewExpression(data) => {
                self.writer.write("new ");
                self.emit(data.expression);
                self.emit_arguments(&data.arguments);
            }
            NodeData::TypeReference(data) => {
                self.emit(data.type_name);
                if let Some(type_args) = &data.type_arguments {
                    if !type_args.is_empty() {
                        self.writer.write("<");
                        for (i, arg) in type_args.iter().enumerate() {
                            if i > 0 {
                                self.writer.write(", ");
                            }
                            self.emit(arg);
                        }
                        self.writer.write(">");
                    }
                }
            }
            NodeData::Block(data) => {
                self.writer.write("{");
                for statement in data.statements.iter() {
                    self.writer.write(" ");
                    self.emit(statement);
                    self.writer.write(";");
                }
                self.writer.write(" }");
            }
            NodeData::ExpressionStatement(data) => self.emit(data.expression),
            // Anything else prints as a placeholder; tests that need more
            // drive the declaration emitter instead.
            _ => self.writer.write("<node>"),
        }
    }
}

impl TestPrinter<'_> {
    fn emit_arguments(&mut self, arguments: &NodeList) {
        self.writer.write("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit(argument);
        }
        self.writer.write(")");
    }
}

// =============================================================================
// Arena builders
// =============================================================================

pub fn ident(arena: &mut NodeArena, text: &str) -> NodeIndex {
    arena.add(
        NodeData::Identifier(IdentifierData {
            text: text.to_string(),
        }),
        Span::default(),
    )
}

pub fn number(arena: &mut NodeArena, text: &str) -> NodeIndex {
    arena.add(
        NodeData::NumericLiteral(LiteralData {
            text: text.to_string(),
        }),
        Span::default(),
    )
}

pub fn string(arena: &mut NodeArena, text: &str) -> NodeIndex {
    arena.add(
        NodeData::StringLiteral(LiteralData {
            text: text.to_string(),
        }),
        Span::default(),
    )
}

pub fn access(arena: &mut NodeArena, expression: NodeIndex, name: NodeIndex) -> NodeIndex {
    arena.add(
        NodeData::PropertyAccess(AccessExprData { expression, name }),
        Span::default(),
    )
}

pub fn call(arena: &mut NodeArena, expression: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
    arena.add(
        NodeData::CallExpression(CallExprData {
            expression,
            type_arguments: None,
            arguments: NodeList::new(arguments),
        }),
        Span::default(),
    )
}

pub fn new_expr(
    arena: &mut NodeArena,
    expression: NodeIndex,
    arguments: Vec<NodeIndex>,
) -> NodeIndex {
    arena.add(
        NodeData::NewExpression(CallExprData {
            expression,
            type_arguments: None,
            arguments: NodeList::new(arguments),
        }),
        Span::default(),
    )
}

/// A `Name` type reference (creates the name identifier too).
pub fn type_ref(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let type_name = ident(arena, name);
    arena.add(
        NodeData::TypeReference(TypeRefData {
            type_name,
            type_arguments: None,
        }),
        Span::default(),
    )
}

pub fn object_literal(
    arena: &mut NodeArena,
    properties: Vec<(NodeIndex, NodeIndex)>,
) -> NodeIndex {
    let assignments = properties
        .into_iter()
        .map(|(name, initializer)| {
            arena.add(
                NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
                Span::default(),
            )
        })
        .collect();
    arena.add(
        NodeData::ObjectLiteral(ObjectLiteralData {
            properties: NodeList::new(assignments),
        }),
        Span::default(),
    )
}
