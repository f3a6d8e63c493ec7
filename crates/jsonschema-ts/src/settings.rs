//! Rendering and resolution knobs.

use serde::{Deserialize, Serialize};

/// Options controlling how declarations are resolved and printed.
///
/// Keys are snake_case; the camelCase spellings (`declareReferenced`, ...)
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Give every `$ref` target its own named declaration instead of inlining simple ones.
    #[serde(alias = "declareReferenced")]
    pub declare_referenced: bool,
    /// Terminate interface properties with `;`.
    #[serde(alias = "endPropertyWithSemicolon")]
    pub end_property_with_semicolon: bool,
    /// Terminate `type` aliases with `;`.
    #[serde(alias = "endTypeWithSemicolon")]
    pub end_type_with_semicolon: bool,
    /// Emit `const enum` instead of `enum`.
    #[serde(alias = "useConstEnums")]
    pub use_const_enums: bool,
    /// Name `$ref` declarations after the whole pointer (`definitions/foo`) rather than its last segment.
    #[serde(alias = "useFullReferencePathAsName")]
    pub use_full_reference_path_as_name: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            declare_referenced: true,
            end_property_with_semicolon: true,
            end_type_with_semicolon: true,
            use_const_enums: true,
            use_full_reference_path_as_name: false,
        }
    }
}
