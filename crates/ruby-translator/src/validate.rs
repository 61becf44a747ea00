//! Startup consistency check between the rule set and the parser's kinds.
//!
//! The dispatch match is exhaustive, so the compiler already guarantees a
//! rule per kind; this check guards the other artifacts that are kept by
//! hand: the [`NodeKind::ALL`] table and the rule registry below. If the
//! upstream parser grows or drops a kind, the mismatch is reported by name
//! before any tree is walked, not as a translation-time surprise.

use crate::error::TranslateError;
use ruby_cst::NodeKind;

/// Every kind the dispatch handles, paired with the rule that handles it.
/// Fail-fast guards count as rules: standalone appearance of those kinds is
/// itself the behavior being registered.
pub(crate) const RULES: &[(NodeKind, &str)] = &[
    (NodeKind::AliasGlobalVariable, "alias"),
    (NodeKind::AliasMethod, "alias"),
    (NodeKind::AlternationPattern, "alternation_pattern"),
    (NodeKind::And, "logical"),
    (NodeKind::Arguments, "argument_list"),
    (NodeKind::Array, "array"),
    (NodeKind::ArrayPattern, "array_pattern"),
    (NodeKind::Assoc, "assoc"),
    (NodeKind::AssocSplat, "assoc_splat"),
    (NodeKind::BackReferenceRead, "back_reference"),
    (NodeKind::Begin, "begin"),
    (NodeKind::BlockArgument, "block_argument"),
    (NodeKind::BlockLocalVariable, "block_local_variable"),
    (NodeKind::Block, "attach_block"),
    (NodeKind::BlockParameter, "block_parameter"),
    (NodeKind::BlockParameters, "block_parameter_list"),
    (NodeKind::Break, "jump"),
    (NodeKind::CallAndWrite, "call_write"),
    (NodeKind::Call, "call"),
    (NodeKind::CallOperatorWrite, "call_write"),
    (NodeKind::CallOrWrite, "call_write"),
    (NodeKind::CapturePattern, "capture_pattern"),
    (NodeKind::Case, "case"),
    (NodeKind::Class, "class"),
    (NodeKind::ClassVariableAndWrite, "variable_op_write"),
    (NodeKind::ClassVariableOperatorWrite, "variable_op_write"),
    (NodeKind::ClassVariableOrWrite, "variable_op_write"),
    (NodeKind::ClassVariableRead, "variable_read"),
    (NodeKind::ClassVariableTarget, "variable_target"),
    (NodeKind::ClassVariableWrite, "variable_write"),
    (NodeKind::ConstantAndWrite, "variable_op_write"),
    (NodeKind::ConstantOperatorWrite, "variable_op_write"),
    (NodeKind::ConstantOrWrite, "variable_op_write"),
    (NodeKind::ConstantPathAndWrite, "constant_path_op_write"),
    (NodeKind::ConstantPath, "constant_path"),
    (NodeKind::ConstantPathOperatorWrite, "constant_path_op_write"),
    (NodeKind::ConstantPathOrWrite, "constant_path_op_write"),
    (NodeKind::ConstantPathTarget, "constant_path_target"),
    (NodeKind::ConstantPathWrite, "constant_path_write"),
    (NodeKind::ConstantRead, "variable_read"),
    (NodeKind::ConstantTarget, "variable_target"),
    (NodeKind::ConstantWrite, "variable_write"),
    (NodeKind::Def, "def"),
    (NodeKind::Defined, "defined"),
    (NodeKind::Else, "else_clause"),
    (NodeKind::EmbeddedStatements, "embedded_statements"),
    (NodeKind::EmbeddedVariable, "embedded_variable"),
    (NodeKind::Ensure, "ensure_guard"),
    (NodeKind::False, "boolean"),
    (NodeKind::FindPattern, "find_pattern"),
    (NodeKind::FlipFlop, "range"),
    (NodeKind::Float, "numeric"),
    (NodeKind::For, "for_loop"),
    (NodeKind::ForwardingArguments, "forwarding"),
    (NodeKind::ForwardingParameter, "forwarding"),
    (NodeKind::ForwardingSuper, "forwarding_super"),
    (NodeKind::GlobalVariableAndWrite, "variable_op_write"),
    (NodeKind::GlobalVariableOperatorWrite, "variable_op_write"),
    (NodeKind::GlobalVariableOrWrite, "variable_op_write"),
    (NodeKind::GlobalVariableRead, "variable_read"),
    (NodeKind::GlobalVariableTarget, "variable_target"),
    (NodeKind::GlobalVariableWrite, "variable_write"),
    (NodeKind::Hash, "hash"),
    (NodeKind::HashPattern, "hash_pattern"),
    (NodeKind::If, "if_node"),
    (NodeKind::Imaginary, "numeric"),
    (NodeKind::Implicit, "implicit_guard"),
    (NodeKind::In, "in_arm"),
    (NodeKind::InstanceVariableAndWrite, "variable_op_write"),
    (NodeKind::InstanceVariableOperatorWrite, "variable_op_write"),
    (NodeKind::InstanceVariableOrWrite, "variable_op_write"),
    (NodeKind::InstanceVariableRead, "variable_read"),
    (NodeKind::InstanceVariableTarget, "variable_target"),
    (NodeKind::InstanceVariableWrite, "variable_write"),
    (NodeKind::Integer, "numeric"),
    (NodeKind::InterpolatedMatchLastLine, "interpolated_regexp"),
    (NodeKind::InterpolatedRegularExpression, "interpolated_regexp"),
    (NodeKind::InterpolatedString, "interpolated_string"),
    (NodeKind::InterpolatedSymbol, "interpolated_symbol"),
    (NodeKind::InterpolatedXString, "interpolated_xstring"),
    (NodeKind::KeywordHash, "keyword_hash"),
    (NodeKind::KeywordParameter, "keyword_parameter"),
    (NodeKind::KeywordRestParameter, "keyword_rest_parameter"),
    (NodeKind::Lambda, "lambda"),
    (NodeKind::LocalVariableAndWrite, "variable_op_write"),
    (NodeKind::LocalVariableOperatorWrite, "variable_op_write"),
    (NodeKind::LocalVariableOrWrite, "variable_op_write"),
    (NodeKind::LocalVariableRead, "variable_read"),
    (NodeKind::LocalVariableTarget, "local_variable_target"),
    (NodeKind::LocalVariableWrite, "variable_write"),
    (NodeKind::MatchLastLine, "regexp"),
    (NodeKind::MatchPredicate, "match_predicate"),
    (NodeKind::MatchRequired, "match_required"),
    (NodeKind::MatchWrite, "match_write"),
    (NodeKind::Missing, "missing_guard"),
    (NodeKind::Module, "module"),
    (NodeKind::MultiTarget, "multi_target"),
    (NodeKind::MultiWrite, "multi_write"),
    (NodeKind::Next, "jump"),
    (NodeKind::Nil, "nil"),
    (NodeKind::NoKeywordsParameter, "no_keywords_parameter"),
    (NodeKind::NumberedReferenceRead, "numbered_reference"),
    (NodeKind::OptionalParameter, "optional_parameter"),
    (NodeKind::Or, "logical"),
    (NodeKind::Parameters, "parameter_list"),
    (NodeKind::Parentheses, "parentheses"),
    (NodeKind::PinnedExpression, "pinned_expression"),
    (NodeKind::PinnedVariable, "pinned_variable"),
    (NodeKind::PostExecution, "execution_hook"),
    (NodeKind::PreExecution, "execution_hook"),
    (NodeKind::Program, "program"),
    (NodeKind::Range, "range"),
    (NodeKind::Rational, "numeric"),
    (NodeKind::Redo, "keyword_cmd"),
    (NodeKind::RegularExpression, "regexp"),
    (NodeKind::RequiredDestructuredParameter, "required_destructured_parameter"),
    (NodeKind::RequiredParameter, "required_parameter"),
    (NodeKind::RescueModifier, "rescue_modifier"),
    (NodeKind::Rescue, "rescue_guard"),
    (NodeKind::RestParameter, "rest_parameter"),
    (NodeKind::Retry, "keyword_cmd"),
    (NodeKind::Return, "jump"),
    (NodeKind::SelfExpression, "self_expr"),
    (NodeKind::SingletonClass, "singleton_class"),
    (NodeKind::SourceEncoding, "source_literal"),
    (NodeKind::SourceFile, "source_literal"),
    (NodeKind::SourceLine, "source_literal"),
    (NodeKind::Splat, "splat"),
    (NodeKind::Statements, "statements"),
    (NodeKind::StringConcat, "string_concat"),
    (NodeKind::StringLiteral, "string"),
    (NodeKind::Super, "super_call"),
    (NodeKind::Symbol, "symbol"),
    (NodeKind::True, "boolean"),
    (NodeKind::Undef, "undef"),
    (NodeKind::Unless, "unless"),
    (NodeKind::Until, "conditional_loop"),
    (NodeKind::When, "when"),
    (NodeKind::While, "conditional_loop"),
    (NodeKind::XString, "xstring"),
    (NodeKind::Yield, "yield_call"),
];

/// Diffs the registry against the parser's kind set in both directions.
/// Any drift is fatal before translation begins.
pub fn assert_complete() -> Result<(), TranslateError> {
    let mut missing = Vec::new();
    for kind in NodeKind::ALL {
        if !RULES.iter().any(|(registered, _)| registered == kind) {
            missing.push(kind.name());
        }
    }

    let mut extra = Vec::new();
    let mut seen = Vec::with_capacity(RULES.len());
    for (kind, _) in RULES {
        if !NodeKind::ALL.contains(kind) || seen.contains(kind) {
            extra.push(kind.name());
        }
        seen.push(*kind);
    }

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(TranslateError::KindMismatch { missing, extra })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_registry_matches_parser_kinds() {
        assert_eq!(assert_complete(), Ok(()));
    }

    #[test]
    fn test_registry_has_one_entry_per_kind() {
        assert_eq!(RULES.len(), NodeKind::ALL.len());
    }
}
