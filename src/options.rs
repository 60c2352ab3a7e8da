//! Translation options.
//!
//! Carried by reference through the substitution engine and the declaration
//! emitter. Loaded by the surrounding driver; this crate only defines the
//! shape and the defaults.

use serde::{Deserialize, Serialize};

/// Options controlling the semantic core of the translation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranspileOptions {
    /// Path prefix under which ambient typings live. Stripped from module
    /// paths during symbol canonicalization so a declaration keeps the same
    /// identity whether it was reached through the typings tree or not.
    pub typings_root: Option<String>,
    /// When set, a private visibility modifier must coincide with a
    /// leading-underscore name and vice versa; mismatches are reported,
    /// never corrected.
    pub enforce_underscore_privacy: bool,
    /// Identifier of the call wrapper that marks its argument as a
    /// compile-time constant.
    pub const_wrapper: String,
    /// Name of the decorator marking a type or property as const. Consumed
    /// by const detection and never re-emitted.
    pub const_decorator: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions {
            typings_root: None,
            enforce_underscore_privacy: false,
            const_wrapper: "CONST_EXPR".to_string(),
            const_decorator: "CONST".to_string(),
        }
    }
}
