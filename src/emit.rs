//! Emit sink - the seam between this core and the driver's printer.
//!
//! The generic tree-walking driver owns default emission. When a
//! translation rule or the declaration emitter produces replacement text,
//! it writes through this trait, and delegates subtrees it does not own
//! back to the driver via [`EmitSink::emit`].

use crate::ast::NodeIndex;

/// Output target for replacement text.
///
/// Implemented by the driver's printer. `write` appends literal target
/// text; `emit` performs the driver's default emission for a subtree
/// (which will in turn consult the substitution engine for nested nodes).
pub trait EmitSink {
    /// Append literal target-language text.
    fn write(&mut self, text: &str);

    /// Default-emit the given node.
    fn emit(&mut self, node: NodeIndex);

    /// Emit `nodes` separated by `sep`.
    fn emit_list(&mut self, nodes: &[NodeIndex], sep: &str) {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            self.emit(node);
        }
    }
}
