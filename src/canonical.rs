//! Canonical Symbol Locator
//!
//! Resolves a type-checker symbol to a `(module, qualified name)` key that
//! identifies its declaration independently of how the use site imported or
//! aliased it. All rule lookups go through this key, which is what lets a
//! per-node textual translator behave as if it understood whole-program
//! semantics.

use crate::ast::{NodeArena, NodeIndex};
use crate::checker::{SymbolFlags, SymbolId, TypeCheckerService};
use tracing::trace;

/// Upper bound on alias-chain following. The checker is not expected to
/// produce alias cycles, but a malformed chain must fail instead of
/// looping.
pub const MAX_ALIAS_CHAIN: usize = 100;

/// The two standard-library module identifiers treated as interchangeable
/// when comparing named types.
pub const LIB_MODULES: [&str; 2] = ["lib", "lib.es6"];

/// Symbols whose qualified name is overridden to the bare symbol name.
///
/// The external name-qualification service embeds the declaring file path
/// into the qualified name for these symbol kinds; the bare name is the
/// stable identity.
pub const BARE_NAME_FLAGS: SymbolFlags = SymbolFlags::CLASS
    .union(SymbolFlags::FUNCTION)
    .union(SymbolFlags::VARIABLE);

// =============================================================================
// CanonicalKey
// =============================================================================

/// The cross-file identity of a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    /// Project-relative module path, suffix- and vendor-stripped.
    pub module: String,
    /// Qualified name within the module (`Thing.foo`), or the bare name
    /// for symbols covered by [`BARE_NAME_FLAGS`].
    pub qualified_name: String,
}

impl CanonicalKey {
    pub fn new(module: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        CanonicalKey {
            module: module.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// Last segment of the qualified name (`foo` for `Thing.foo`).
    pub fn identifier(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// Whether two canonical modules name the same library for the purposes of
/// named-type comparison. The standard-library equivalence applies here
/// and only here.
pub fn modules_equal_for_named_type(a: &str, b: &str) -> bool {
    a == b || (LIB_MODULES.contains(&a) && LIB_MODULES.contains(&b))
}

// =============================================================================
// Module path normalization
// =============================================================================

/// Normalize a declaration's source-file path into a canonical module path.
///
/// Strips the `.d.ts`/`.ts` suffix, anything up to and including the last
/// vendor directory segment, a leading `./`, and the configured typings
/// root.
pub fn normalize_module_path(path: &str, typings_root: Option<&str>) -> String {
    let mut module = path;
    if let Some(stripped) = module.strip_suffix(".d.ts") {
        module = stripped;
    } else if let Some(stripped) = module.strip_suffix(".ts") {
        module = stripped;
    }
    if let Some(pos) = module.rfind("node_modules/") {
        module = &module[pos + "node_modules/".len()..];
    }
    module = module.strip_prefix("./").unwrap_or(module);
    if let Some(root) = typings_root {
        if let Some(stripped) = module.strip_prefix(root) {
            module = stripped.strip_prefix('/').unwrap_or(stripped);
        }
    }
    module.to_string()
}

// =============================================================================
// Locator
// =============================================================================

/// Reason a symbol could not be canonicalized. Reported at the querying
/// node; the node stays unrecognized and falls back to default emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocateError {
    /// The symbol has neither a value declaration nor any declaration.
    NoDeclaration { symbol_name: String },
    /// Alias following exceeded [`MAX_ALIAS_CHAIN`] hops.
    AliasChainTooLong { symbol_name: String },
    /// The declaration's origin file is unknown to the front end.
    UnknownSourceFile { symbol_name: String },
}

impl LocateError {
    pub fn message(&self) -> String {
        match self {
            LocateError::NoDeclaration { symbol_name } => {
                format!("no declaration found for symbol '{symbol_name}'")
            }
            LocateError::AliasChainTooLong { symbol_name } => {
                format!(
                    "alias chain for '{symbol_name}' did not terminate within {MAX_ALIAS_CHAIN} hops"
                )
            }
            LocateError::UnknownSourceFile { symbol_name } => {
                format!("declaration of '{symbol_name}' has no known source file")
            }
        }
    }
}

/// Resolves symbols to canonical keys. Stateless; borrows the arena and
/// the checker facade for one translation unit.
pub struct SymbolLocator<'a> {
    arena: &'a NodeArena,
    checker: &'a dyn TypeCheckerService,
    typings_root: Option<&'a str>,
}

impl<'a> SymbolLocator<'a> {
    pub fn new(
        arena: &'a NodeArena,
        checker: &'a dyn TypeCheckerService,
        typings_root: Option<&'a str>,
    ) -> Self {
        SymbolLocator {
            arena,
            checker,
            typings_root,
        }
    }

    /// Resolve `symbol` (referenced at `node`) to its canonical key.
    pub fn locate(&self, node: NodeIndex, symbol: SymbolId) -> Result<CanonicalKey, LocateError> {
        let symbol = self.follow_aliases(symbol)?;
        let data = self.checker.symbol(symbol);

        let Some(decl) = data.representative_declaration() else {
            return Err(LocateError::NoDeclaration {
                symbol_name: data.name.clone(),
            });
        };

        let Some(path) = self.checker.source_file_of(decl) else {
            return Err(LocateError::UnknownSourceFile {
                symbol_name: data.name.clone(),
            });
        };
        let module = normalize_module_path(&path, self.typings_root);

        let qualified_name = if data.flags.intersects(BARE_NAME_FLAGS) {
            data.name.clone()
        } else {
            self.checker.fully_qualified_name(symbol)
        };

        trace!(
            span = %self.arena.span(node),
            module = %module,
            name = %qualified_name,
            "canonicalized symbol"
        );
        Ok(CanonicalKey {
            module,
            qualified_name,
        })
    }

    /// Whether the static type of `node` is declared as
    /// `(module, qualified_name)`, with the standard-library modules
    /// compared as equal.
    pub fn is_named_type(&self, node: NodeIndex, module: &str, qualified_name: &str) -> bool {
        let Some(ty) = self.checker.type_at_location(node) else {
            return false;
        };
        let Some(symbol) = self.checker.symbol_of_type(ty) else {
            return false;
        };
        match self.locate(node, symbol) {
            Ok(key) => {
                key.qualified_name == qualified_name
                    && modules_equal_for_named_type(&key.module, module)
            }
            Err(_) => false,
        }
    }

    /// Chase alias symbols to the terminal symbol, bounded.
    fn follow_aliases(&self, mut symbol: SymbolId) -> Result<SymbolId, LocateError> {
        let mut hops = 0;
        while self.checker.symbol(symbol).is_alias() {
            if hops >= MAX_ALIAS_CHAIN {
                return Err(LocateError::AliasChainTooLong {
                    symbol_name: self.checker.symbol(symbol).name.clone(),
                });
            }
            let Some(next) = self.checker.aliased_symbol(symbol) else {
                break;
            };
            symbol = next;
            hops += 1;
        }
        Ok(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_suffixes() {
        assert_eq!(normalize_module_path("lib.d.ts", None), "lib");
        assert_eq!(normalize_module_path("app/main.ts", None), "app/main");
        assert_eq!(normalize_module_path("app/main", None), "app/main");
    }

    #[test]
    fn test_normalize_strips_vendor_dirs() {
        assert_eq!(
            normalize_module_path("node_modules/angular2/core.d.ts", None),
            "angular2/core"
        );
        assert_eq!(
            normalize_module_path("a/node_modules/b/node_modules/c/index.ts", None),
            "c/index"
        );
    }

    #[test]
    fn test_normalize_strips_typings_root() {
        assert_eq!(
            normalize_module_path("typings/es6-promise/es6-promise.d.ts", Some("typings")),
            "es6-promise/es6-promise"
        );
        assert_eq!(
            normalize_module_path("typings/browser.d.ts", Some("typings/")),
            "browser"
        );
    }

    #[test]
    fn test_normalize_strips_relative_prefix() {
        assert_eq!(normalize_module_path("./app/main.ts", None), "app/main");
    }

    #[test]
    fn test_lib_module_equivalence() {
        assert!(modules_equal_for_named_type("lib", "lib.es6"));
        assert!(modules_equal_for_named_type("lib.es6", "lib"));
        assert!(modules_equal_for_named_type("app/main", "app/main"));
        assert!(!modules_equal_for_named_type("lib", "app/main"));
    }

    #[test]
    fn test_canonical_key_identifier() {
        let key = CanonicalKey::new("lib", "Thing.foo");
        assert_eq!(key.identifier(), "foo");
        let bare = CanonicalKey::new("lib", "parseInt");
        assert_eq!(bare.identifier(), "parseInt");
    }

    #[test]
    fn test_canonical_key_value_equality() {
        let a = CanonicalKey::new("lib", "Array.push");
        let b = CanonicalKey::new("lib".to_string(), "Array.push".to_string());
        assert_eq!(a, b);
    }
}
