//! Feature configuration shared by the lowering passes.

use serde::Deserialize;

/// Default identifier of the runtime helper namespace.
pub const DEFAULT_RUNTIME_NAME: &str = "$runtime";

/// Read-only options consumed by the lowering passes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoweringOptions {
    /// Emit `let` instead of `var` for lowered class declarations.
    pub block_binding: bool,
    /// Identifier of the runtime helper namespace (`$runtime.createClass`).
    pub runtime_name: String,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        LoweringOptions {
            block_binding: false,
            runtime_name: DEFAULT_RUNTIME_NAME.to_string(),
        }
    }
}

impl LoweringOptions {
    pub fn with_block_binding(mut self, enabled: bool) -> Self {
        self.block_binding = enabled;
        self
    }

    pub fn with_runtime_name(mut self, name: impl Into<String>) -> Self {
        self.runtime_name = name.into();
        self
    }
}
