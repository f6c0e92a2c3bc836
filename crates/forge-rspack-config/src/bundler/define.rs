use serde::{Deserialize, Serialize};

/// Source text spliced into a bundle by a define substitution.
///
/// The text is never evaluated at configuration time. It only has meaning
/// inside the runtime of the bundle it is injected into, where identifiers
/// such as `__dirname` refer to that bundle's location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);

impl Expression {
    /// Wrap raw code
    pub fn raw(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The literal `undefined`
    pub fn undefined() -> Self {
        Self("undefined".to_string())
    }

    /// A single-quoted JavaScript string literal
    pub fn string_literal(value: &str) -> Self {
        Self(quote(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == "undefined"
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote a value as a single-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
