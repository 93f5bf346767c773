//! Compilation entry points: validate, convert to postfix, build.

use crate::ast::QueryNode;
use crate::builder::{build_key_value, build_value_only};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::lexer::tokenize;
use crate::postfix::to_postfix;
use crate::token::Token;
use crate::validator::check_balance;

/// Compile a pre-split sequence of key-value tokens such as
/// `["(", "a=1", "and", "b>2", ")"]`.
pub fn compile_key_value<S: AsRef<str>>(tokens: &[S]) -> Result<QueryNode, CompileError> {
    compile_tokens_key_value(&Token::classify_all(tokens))
}

/// Compile a pre-split sequence of bare values, each broadcast across `fields`.
pub fn compile_value_only<S: AsRef<str>, F: AsRef<str>>(
    tokens: &[S],
    fields: &[F],
) -> Result<QueryNode, CompileError> {
    compile_tokens_value_only(&Token::classify_all(tokens), fields)
}

fn compile_tokens_key_value(tokens: &[Token<'_>]) -> Result<QueryNode, CompileError> {
    check_balance(tokens)?;
    let postfix = to_postfix(tokens);
    tracing::debug!(tokens = tokens.len(), postfix = postfix.len(), "key-value postfix ready");
    build_key_value(&postfix)
}

fn compile_tokens_value_only<F: AsRef<str>>(
    tokens: &[Token<'_>],
    fields: &[F],
) -> Result<QueryNode, CompileError> {
    if fields.is_empty() {
        return Err(CompileError::NoFields);
    }
    check_balance(tokens)?;
    let postfix = to_postfix(tokens);
    tracing::debug!(
        tokens = tokens.len(),
        postfix = postfix.len(),
        fields = fields.len(),
        "value-only postfix ready"
    );
    build_value_only(&postfix, fields)
}

/// Compiles raw delimited strings using a fixed [`CompilerConfig`].
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    config: CompilerConfig,
}

impl FilterCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Split `input` on the configured delimiter and compile key-value leaves.
    pub fn compile_key_value_str(&self, input: &str) -> Result<QueryNode, CompileError> {
        let tokens = tokenize(input, &self.config.delimiter);
        let tree = compile_tokens_key_value(&tokens)?;
        Ok(self.finish(tree))
    }

    /// Split `input` on the configured delimiter and compile bare values
    /// across `fields`.
    pub fn compile_value_only_str<F: AsRef<str>>(
        &self,
        input: &str,
        fields: &[F],
    ) -> Result<QueryNode, CompileError> {
        let tokens = tokenize(input, &self.config.delimiter);
        let tree = compile_tokens_value_only(&tokens, fields)?;
        Ok(self.finish(tree))
    }

    /// Value-only compilation across the configured default fields.
    pub fn compile_value_only_default(&self, input: &str) -> Result<QueryNode, CompileError> {
        self.compile_value_only_str(input, self.config.default_fields.as_slice())
    }

    fn finish(&self, tree: QueryNode) -> QueryNode {
        let tree = if self.config.flatten_nested {
            tree.flatten()
        } else {
            tree
        };
        tracing::debug!(nodes = tree.node_count(), "compiled filter");
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RangeKind;
    use crate::lexer::DEFAULT_DELIMITER;

    fn join(parts: &[&str]) -> String {
        parts.join(DEFAULT_DELIMITER)
    }

    #[test]
    fn test_compile_key_value_tokens() {
        assert_eq!(
            compile_key_value(&["(", "a=1", ")"]),
            Ok(QueryNode::matches("a", "1"))
        );
        assert_eq!(
            compile_key_value(&["(", "a=\"1\"", ")"]),
            Ok(QueryNode::term("a", "1"))
        );
    }

    #[test]
    fn test_structural_error_before_building() {
        // The malformed leaf is never reached
        let err = compile_key_value(&["(", "a==1"]).unwrap_err();
        assert!(matches!(err, CompileError::Structural { position: 0, .. }));
    }

    #[test]
    fn test_value_only_empty_fields() {
        let fields: [&str; 0] = [];
        assert_eq!(compile_value_only(&["a"], &fields), Err(CompileError::NoFields));
    }

    #[test]
    fn test_filter_compiler_from_string() {
        let compiler = FilterCompiler::new();
        let input = join(&["{", "age>=18", "and", "name=\"bob\"", "}"]);
        assert_eq!(
            compiler.compile_key_value_str(&input),
            Ok(QueryNode::And(vec![
                QueryNode::range("age", RangeKind::Gte, "18"),
                QueryNode::term("name", "bob"),
            ]))
        );
    }

    #[test]
    fn test_filter_compiler_custom_delimiter_and_defaults() {
        let compiler = FilterCompiler::from_config(CompilerConfig {
            delimiter: " ".to_string(),
            default_fields: vec!["title".to_string()],
            flatten_nested: false,
        });
        assert_eq!(
            compiler.compile_value_only_default("x or y"),
            Ok(QueryNode::Or(vec![
                QueryNode::Or(vec![QueryNode::matches("title", "x")]),
                QueryNode::Or(vec![QueryNode::matches("title", "y")]),
            ]))
        );
    }

    #[test]
    fn test_filter_compiler_flattening() {
        let compiler = FilterCompiler::from_config(CompilerConfig {
            delimiter: " ".to_string(),
            default_fields: Vec::new(),
            flatten_nested: true,
        });
        let tree = compiler
            .compile_key_value_str("( a=1 and b=2 ) and c=3")
            .unwrap();
        assert_eq!(
            tree,
            QueryNode::And(vec![
                QueryNode::matches("a", "1"),
                QueryNode::matches("b", "2"),
                QueryNode::matches("c", "3"),
            ])
        );
    }

    #[test]
    fn test_default_fields_empty_is_error() {
        let compiler = FilterCompiler::new();
        assert_eq!(
            compiler.compile_value_only_default("a"),
            Err(CompileError::NoFields)
        );
    }
}
