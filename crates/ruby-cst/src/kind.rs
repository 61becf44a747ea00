//! Fieldless kind tags for the CST node set.

/// The kind of a CST node, one tag per variant of [`crate::Node`].
///
/// [`NodeKind::ALL`] enumerates the entire closed set in a stable order and
/// is the reference list the translator's completeness check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    AliasGlobalVariable,
    AliasMethod,
    AlternationPattern,
    And,
    Arguments,
    Array,
    ArrayPattern,
    Assoc,
    AssocSplat,
    BackReferenceRead,
    Begin,
    BlockArgument,
    BlockLocalVariable,
    Block,
    BlockParameter,
    BlockParameters,
    Break,
    CallAndWrite,
    Call,
    CallOperatorWrite,
    CallOrWrite,
    CapturePattern,
    Case,
    Class,
    ClassVariableAndWrite,
    ClassVariableOperatorWrite,
    ClassVariableOrWrite,
    ClassVariableRead,
    ClassVariableTarget,
    ClassVariableWrite,
    ConstantAndWrite,
    ConstantOperatorWrite,
    ConstantOrWrite,
    ConstantPathAndWrite,
    ConstantPath,
    ConstantPathOperatorWrite,
    ConstantPathOrWrite,
    ConstantPathTarget,
    ConstantPathWrite,
    ConstantRead,
    ConstantTarget,
    ConstantWrite,
    Def,
    Defined,
    Else,
    EmbeddedStatements,
    EmbeddedVariable,
    Ensure,
    False,
    FindPattern,
    FlipFlop,
    Float,
    For,
    ForwardingArguments,
    ForwardingParameter,
    ForwardingSuper,
    GlobalVariableAndWrite,
    GlobalVariableOperatorWrite,
    GlobalVariableOrWrite,
    GlobalVariableRead,
    GlobalVariableTarget,
    GlobalVariableWrite,
    Hash,
    HashPattern,
    If,
    Imaginary,
    Implicit,
    In,
    InstanceVariableAndWrite,
    InstanceVariableOperatorWrite,
    InstanceVariableOrWrite,
    InstanceVariableRead,
    InstanceVariableTarget,
    InstanceVariableWrite,
    Integer,
    InterpolatedMatchLastLine,
    InterpolatedRegularExpression,
    InterpolatedString,
    InterpolatedSymbol,
    InterpolatedXString,
    KeywordHash,
    KeywordParameter,
    KeywordRestParameter,
    Lambda,
    LocalVariableAndWrite,
    LocalVariableOperatorWrite,
    LocalVariableOrWrite,
    LocalVariableRead,
    LocalVariableTarget,
    LocalVariableWrite,
    MatchLastLine,
    MatchPredicate,
    MatchRequired,
    MatchWrite,
    Missing,
    Module,
    MultiTarget,
    MultiWrite,
    Next,
    Nil,
    NoKeywordsParameter,
    NumberedReferenceRead,
    OptionalParameter,
    Or,
    Parameters,
    Parentheses,
    PinnedExpression,
    PinnedVariable,
    PostExecution,
    PreExecution,
    Program,
    Range,
    Rational,
    Redo,
    RegularExpression,
    RequiredDestructuredParameter,
    RequiredParameter,
    RescueModifier,
    Rescue,
    RestParameter,
    Retry,
    Return,
    SelfExpression,
    SingletonClass,
    SourceEncoding,
    SourceFile,
    SourceLine,
    Splat,
    Statements,
    StringConcat,
    StringLiteral,
    Super,
    Symbol,
    True,
    Undef,
    Unless,
    Until,
    When,
    While,
    XString,
    Yield,
}

impl NodeKind {
    /// Every kind the upstream parser defines, in declaration order.
    pub const ALL: &'static [NodeKind] = &[
        NodeKind::AliasGlobalVariable,
        NodeKind::AliasMethod,
        NodeKind::AlternationPattern,
        NodeKind::And,
        NodeKind::Arguments,
        NodeKind::Array,
        NodeKind::ArrayPattern,
        NodeKind::Assoc,
        NodeKind::AssocSplat,
        NodeKind::BackReferenceRead,
        NodeKind::Begin,
        NodeKind::BlockArgument,
        NodeKind::BlockLocalVariable,
        NodeKind::Block,
        NodeKind::BlockParameter,
        NodeKind::BlockParameters,
        NodeKind::Break,
        NodeKind::CallAndWrite,
        NodeKind::Call,
        NodeKind::CallOperatorWrite,
        NodeKind::CallOrWrite,
        NodeKind::CapturePattern,
        NodeKind::Case,
        NodeKind::Class,
        NodeKind::ClassVariableAndWrite,
        NodeKind::ClassVariableOperatorWrite,
        NodeKind::ClassVariableOrWrite,
        NodeKind::ClassVariableRead,
        NodeKind::ClassVariableTarget,
        NodeKind::ClassVariableWrite,
        NodeKind::ConstantAndWrite,
        NodeKind::ConstantOperatorWrite,
        NodeKind::ConstantOrWrite,
        NodeKind::ConstantPathAndWrite,
        NodeKind::ConstantPath,
        NodeKind::ConstantPathOperatorWrite,
        NodeKind::ConstantPathOrWrite,
        NodeKind::ConstantPathTarget,
        NodeKind::ConstantPathWrite,
        NodeKind::ConstantRead,
        NodeKind::ConstantTarget,
        NodeKind::ConstantWrite,
        NodeKind::Def,
        NodeKind::Defined,
        NodeKind::Else,
        NodeKind::EmbeddedStatements,
        NodeKind::EmbeddedVariable,
        NodeKind::Ensure,
        NodeKind::False,
        NodeKind::FindPattern,
        NodeKind::FlipFlop,
        NodeKind::Float,
        NodeKind::For,
        NodeKind::ForwardingArguments,
        NodeKind::ForwardingParameter,
        NodeKind::ForwardingSuper,
        NodeKind::GlobalVariableAndWrite,
        NodeKind::GlobalVariableOperatorWrite,
        NodeKind::GlobalVariableOrWrite,
        NodeKind::GlobalVariableRead,
        NodeKind::GlobalVariableTarget,
        NodeKind::GlobalVariableWrite,
        NodeKind::Hash,
        NodeKind::HashPattern,
        NodeKind::If,
        NodeKind::Imaginary,
        NodeKind::Implicit,
        NodeKind::In,
        NodeKind::InstanceVariableAndWrite,
        NodeKind::InstanceVariableOperatorWrite,
        NodeKind::InstanceVariableOrWrite,
        NodeKind::InstanceVariableRead,
        NodeKind::InstanceVariableTarget,
        NodeKind::InstanceVariableWrite,
        NodeKind::Integer,
        NodeKind::InterpolatedMatchLastLine,
        NodeKind::InterpolatedRegularExpression,
        NodeKind::InterpolatedString,
        NodeKind::InterpolatedSymbol,
        NodeKind::InterpolatedXString,
        NodeKind::KeywordHash,
        NodeKind::KeywordParameter,
        NodeKind::KeywordRestParameter,
        NodeKind::Lambda,
        NodeKind::LocalVariableAndWrite,
        NodeKind::LocalVariableOperatorWrite,
        NodeKind::LocalVariableOrWrite,
        NodeKind::LocalVariableRead,
        NodeKind::LocalVariableTarget,
        NodeKind::LocalVariableWrite,
        NodeKind::MatchLastLine,
        NodeKind::MatchPredicate,
        NodeKind::MatchRequired,
        NodeKind::MatchWrite,
        NodeKind::Missing,
        NodeKind::Module,
        NodeKind::MultiTarget,
        NodeKind::MultiWrite,
        NodeKind::Next,
        NodeKind::Nil,
        NodeKind::NoKeywordsParameter,
        NodeKind::NumberedReferenceRead,
        NodeKind::OptionalParameter,
        NodeKind::Or,
        NodeKind::Parameters,
        NodeKind::Parentheses,
        NodeKind::PinnedExpression,
        NodeKind::PinnedVariable,
        NodeKind::PostExecution,
        NodeKind::PreExecution,
        NodeKind::Program,
        NodeKind::Range,
        NodeKind::Rational,
        NodeKind::Redo,
        NodeKind::RegularExpression,
        NodeKind::RequiredDestructuredParameter,
        NodeKind::RequiredParameter,
        NodeKind::RescueModifier,
        NodeKind::Rescue,
        NodeKind::RestParameter,
        NodeKind::Retry,
        NodeKind::Return,
        NodeKind::SelfExpression,
        NodeKind::SingletonClass,
        NodeKind::SourceEncoding,
        NodeKind::SourceFile,
        NodeKind::SourceLine,
        NodeKind::Splat,
        NodeKind::Statements,
        NodeKind::StringConcat,
        NodeKind::StringLiteral,
        NodeKind::Super,
        NodeKind::Symbol,
        NodeKind::True,
        NodeKind::Undef,
        NodeKind::Unless,
        NodeKind::Until,
        NodeKind::When,
        NodeKind::While,
        NodeKind::XString,
        NodeKind::Yield,
    ];

    /// The canonical snake_case name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::AliasGlobalVariable => "alias_global_variable",
            NodeKind::AliasMethod => "alias_method",
            NodeKind::AlternationPattern => "alternation_pattern",
            NodeKind::And => "and",
            NodeKind::Arguments => "arguments",
            NodeKind::Array => "array",
            NodeKind::ArrayPattern => "array_pattern",
            NodeKind::Assoc => "assoc",
            NodeKind::AssocSplat => "assoc_splat",
            NodeKind::BackReferenceRead => "back_reference_read",
            NodeKind::Begin => "begin",
            NodeKind::BlockArgument => "block_argument",
            NodeKind::BlockLocalVariable => "block_local_variable",
            NodeKind::Block => "block",
            NodeKind::BlockParameter => "block_parameter",
            NodeKind::BlockParameters => "block_parameters",
            NodeKind::Break => "break",
            NodeKind::CallAndWrite => "call_and_write",
            NodeKind::Call => "call",
            NodeKind::CallOperatorWrite => "call_operator_write",
            NodeKind::CallOrWrite => "call_or_write",
            NodeKind::CapturePattern => "capture_pattern",
            NodeKind::Case => "case",
            NodeKind::Class => "class",
            NodeKind::ClassVariableAndWrite => "class_variable_and_write",
            NodeKind::ClassVariableOperatorWrite => "class_variable_operator_write",
            NodeKind::ClassVariableOrWrite => "class_variable_or_write",
            NodeKind::ClassVariableRead => "class_variable_read",
            NodeKind::ClassVariableTarget => "class_variable_target",
            NodeKind::ClassVariableWrite => "class_variable_write",
            NodeKind::ConstantAndWrite => "constant_and_write",
            NodeKind::ConstantOperatorWrite => "constant_operator_write",
            NodeKind::ConstantOrWrite => "constant_or_write",
            NodeKind::ConstantPathAndWrite => "constant_path_and_write",
            NodeKind::ConstantPath => "constant_path",
            NodeKind::ConstantPathOperatorWrite => "constant_path_operator_write",
            NodeKind::ConstantPathOrWrite => "constant_path_or_write",
            NodeKind::ConstantPathTarget => "constant_path_target",
            NodeKind::ConstantPathWrite => "constant_path_write",
            NodeKind::ConstantRead => "constant_read",
            NodeKind::ConstantTarget => "constant_target",
            NodeKind::ConstantWrite => "constant_write",
            NodeKind::Def => "def",
            NodeKind::Defined => "defined",
            NodeKind::Else => "else",
            NodeKind::EmbeddedStatements => "embedded_statements",
            NodeKind::EmbeddedVariable => "embedded_variable",
            NodeKind::Ensure => "ensure",
            NodeKind::False => "false",
            NodeKind::FindPattern => "find_pattern",
            NodeKind::FlipFlop => "flip_flop",
            NodeKind::Float => "float",
            NodeKind::For => "for",
            NodeKind::ForwardingArguments => "forwarding_arguments",
            NodeKind::ForwardingParameter => "forwarding_parameter",
            NodeKind::ForwardingSuper => "forwarding_super",
            NodeKind::GlobalVariableAndWrite => "global_variable_and_write",
            NodeKind::GlobalVariableOperatorWrite => "global_variable_operator_write",
            NodeKind::GlobalVariableOrWrite => "global_variable_or_write",
            NodeKind::GlobalVariableRead => "global_variable_read",
            NodeKind::GlobalVariableTarget => "global_variable_target",
            NodeKind::GlobalVariableWrite => "global_variable_write",
            NodeKind::Hash => "hash",
            NodeKind::HashPattern => "hash_pattern",
            NodeKind::If => "if",
            NodeKind::Imaginary => "imaginary",
            NodeKind::Implicit => "implicit",
            NodeKind::In => "in",
            NodeKind::InstanceVariableAndWrite => "instance_variable_and_write",
            NodeKind::InstanceVariableOperatorWrite => "instance_variable_operator_write",
            NodeKind::InstanceVariableOrWrite => "instance_variable_or_write",
            NodeKind::InstanceVariableRead => "instance_variable_read",
            NodeKind::InstanceVariableTarget => "instance_variable_target",
            NodeKind::InstanceVariableWrite => "instance_variable_write",
            NodeKind::Integer => "integer",
            NodeKind::InterpolatedMatchLastLine => "interpolated_match_last_line",
            NodeKind::InterpolatedRegularExpression => "interpolated_regular_expression",
            NodeKind::InterpolatedString => "interpolated_string",
            NodeKind::InterpolatedSymbol => "interpolated_symbol",
            NodeKind::InterpolatedXString => "interpolated_x_string",
            NodeKind::KeywordHash => "keyword_hash",
            NodeKind::KeywordParameter => "keyword_parameter",
            NodeKind::KeywordRestParameter => "keyword_rest_parameter",
            NodeKind::Lambda => "lambda",
            NodeKind::LocalVariableAndWrite => "local_variable_and_write",
            NodeKind::LocalVariableOperatorWrite => "local_variable_operator_write",
            NodeKind::LocalVariableOrWrite => "local_variable_or_write",
            NodeKind::LocalVariableRead => "local_variable_read",
            NodeKind::LocalVariableTarget => "local_variable_target",
            NodeKind::LocalVariableWrite => "local_variable_write",
            NodeKind::MatchLastLine => "match_last_line",
            NodeKind::MatchPredicate => "match_predicate",
            NodeKind::MatchRequired => "match_required",
            NodeKind::MatchWrite => "match_write",
            NodeKind::Missing => "missing",
            NodeKind::Module => "module",
            NodeKind::MultiTarget => "multi_target",
            NodeKind::MultiWrite => "multi_write",
            NodeKind::Next => "next",
            NodeKind::Nil => "nil",
            NodeKind::NoKeywordsParameter => "no_keywords_parameter",
            NodeKind::NumberedReferenceRead => "numbered_reference_read",
            NodeKind::OptionalParameter => "optional_parameter",
            NodeKind::Or => "or",
            NodeKind::Parameters => "parameters",
            NodeKind::Parentheses => "parentheses",
            NodeKind::PinnedExpression => "pinned_expression",
            NodeKind::PinnedVariable => "pinned_variable",
            NodeKind::PostExecution => "post_execution",
            NodeKind::PreExecution => "pre_execution",
            NodeKind::Program => "program",
            NodeKind::Range => "range",
            NodeKind::Rational => "rational",
            NodeKind::Redo => "redo",
            NodeKind::RegularExpression => "regular_expression",
            NodeKind::RequiredDestructuredParameter => "required_destructured_parameter",
            NodeKind::RequiredParameter => "required_parameter",
            NodeKind::RescueModifier => "rescue_modifier",
            NodeKind::Rescue => "rescue",
            NodeKind::RestParameter => "rest_parameter",
            NodeKind::Retry => "retry",
            NodeKind::Return => "return",
            NodeKind::SelfExpression => "self",
            NodeKind::SingletonClass => "singleton_class",
            NodeKind::SourceEncoding => "source_encoding",
            NodeKind::SourceFile => "source_file",
            NodeKind::SourceLine => "source_line",
            NodeKind::Splat => "splat",
            NodeKind::Statements => "statements",
            NodeKind::StringConcat => "string_concat",
            NodeKind::StringLiteral => "string",
            NodeKind::Super => "super",
            NodeKind::Symbol => "symbol",
            NodeKind::True => "true",
            NodeKind::Undef => "undef",
            NodeKind::Unless => "unless",
            NodeKind::Until => "until",
            NodeKind::When => "when",
            NodeKind::While => "while",
            NodeKind::XString => "x_string",
            NodeKind::Yield => "yield",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_has_no_duplicates() {
        let unique: HashSet<_> = NodeKind::ALL.iter().collect();
        assert_eq!(unique.len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_names_are_unique() {
        let unique: HashSet<_> = NodeKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(unique.len(), NodeKind::ALL.len());
    }
}
