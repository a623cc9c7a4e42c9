use serde::{Deserialize, Serialize};
use syntect::parsing::{Scope, ScopeStack};

/// Presentation class of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StyleClass {
    Keyword,
    Function,
    String,
    Comment,
    Variable,
    Constant,
    #[default]
    Plain,
}

/// Maps syntect scopes to [`StyleClass`]es. Scopes are parsed once up front so
/// matching is a prefix comparison per stack entry.
pub struct StyleMap {
    rules: Vec<(Scope, StyleClass)>,
}

impl StyleMap {
    pub fn new() -> Self {
        // Order matters: the first matching prefix wins for a given scope.
        let table = [
            ("keyword", StyleClass::Keyword),
            ("storage", StyleClass::Keyword),
            ("support", StyleClass::Function),
            ("entity.name.function", StyleClass::Function),
            ("string", StyleClass::String),
            ("comment", StyleClass::Comment),
            ("variable", StyleClass::Variable),
            ("punctuation.definition.variable", StyleClass::Variable),
            ("constant", StyleClass::Constant),
        ];
        let rules = table
            .iter()
            .filter_map(|(name, class)| match Scope::new(name) {
                Ok(scope) => Some((scope, *class)),
                Err(e) => {
                    log::warn!("Skipping highlight scope {}: {:?}", name, e);
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Class for the innermost scope on the stack that has a rule.
    pub fn class_for_stack(&self, stack: &ScopeStack) -> StyleClass {
        for scope in stack.as_slice().iter().rev() {
            for (prefix, class) in &self.rules {
                if prefix.is_prefix_of(*scope) {
                    return *class;
                }
            }
        }
        StyleClass::Plain
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntect::parsing::ScopeStackOp;

    #[test]
    fn test_empty_stack_is_plain() {
        let map = StyleMap::new();
        assert_eq!(map.class_for_stack(&ScopeStack::new()), StyleClass::Plain);
    }

    #[test]
    fn test_innermost_scope_wins() {
        let map = StyleMap::new();
        let mut stack = ScopeStack::new();
        stack
            .apply(&ScopeStackOp::Push(Scope::new("string.quoted.double.shell").unwrap()))
            .unwrap();
        assert_eq!(map.class_for_stack(&stack), StyleClass::String);

        stack
            .apply(&ScopeStackOp::Push(Scope::new("variable.other.shell").unwrap()))
            .unwrap();
        assert_eq!(map.class_for_stack(&stack), StyleClass::Variable);
    }
}
