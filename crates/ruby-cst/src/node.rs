//! CST node structs and the closed [`Node`] kind set.
//!
//! Field sets mirror what the upstream parser exposes per kind: child
//! sub-nodes, named locations for individual sub-tokens (absent when the
//! surface syntax elides the token), and a location spanning the whole
//! construct. Several kind families share a struct when their shapes are
//! identical (plain writes and the operator/`&&=`/`||=` write forms,
//! variable reads and assignment targets).

use crate::{Location, NodeKind};
use smol_str::SmolStr;

/// `alias foo bar` / `alias $foo $bar`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasNode {
    pub new_name: Box<Node>,
    pub old_name: Box<Node>,
    pub keyword_loc: Location,
    pub location: Location,
}

/// `foo => bar | baz`
#[derive(Debug, Clone, PartialEq)]
pub struct AlternationPatternNode {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `a and b`, `a or b`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBooleanNode {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `[1, 2, 3]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub elements: Vec<Node>,
    pub opening_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// `foo => [bar]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPatternNode {
    pub constant: Option<Box<Node>>,
    pub requireds: Vec<Node>,
    pub rest: Option<Box<Node>>,
    pub posts: Vec<Node>,
    pub opening_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// The positional argument list of a call. Only meaningful when adopted by
/// its owning call, keyword command, or write node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentsNode {
    pub arguments: Vec<Node>,
    pub location: Location,
}

/// One `key => value` / `key: value` / `key:` entry of a hash or pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct AssocNode {
    pub key: Box<Node>,
    /// Absent for the value-less binding form inside hash patterns.
    pub value: Option<Box<Node>>,
    /// The `=>` rocket, when present.
    pub operator_loc: Option<Location>,
    pub location: Location,
}

/// `{ **foo }`, `bar(**)`
#[derive(Debug, Clone, PartialEq)]
pub struct AssocSplatNode {
    /// Absent for the bare forwarding form `**`.
    pub value: Option<Box<Node>>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `begin ... rescue ... else ... ensure ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct BeginNode {
    pub begin_keyword_loc: Option<Location>,
    pub statements: Option<Box<StatementsNode>>,
    pub rescue_clause: Option<Box<RescueNode>>,
    pub else_clause: Option<Box<ElseNode>>,
    pub ensure_clause: Option<Box<EnsureNode>>,
    pub end_keyword_loc: Option<Location>,
    pub location: Location,
}

/// `foo(&bar)`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockArgumentNode {
    /// Absent for the bare forwarding form `&`.
    pub expression: Option<Box<Node>>,
    pub operator_loc: Location,
    pub location: Location,
}

/// A brace or `do`/`end` block attached to a call. Never translated
/// standalone; the owning call adopts it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub locals: Vec<SmolStr>,
    pub parameters: Option<Box<BlockParametersNode>>,
    pub body: Option<Box<Node>>,
    pub opening_loc: Location,
    pub closing_loc: Location,
    pub location: Location,
}

/// `def foo(&bar); end`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParameterNode {
    pub name: Option<SmolStr>,
    pub name_loc: Option<Location>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `foo { |bar; baz| }`: the pipe-delimited parameter declaration,
/// including block-local shadows after the semicolon.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParametersNode {
    pub parameters: Option<Box<ParametersNode>>,
    pub locals: Vec<Node>,
    pub opening_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// `break`, `next`, `return`: keyword with an optional argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpNode {
    pub arguments: Option<Box<ArgumentsNode>>,
    pub keyword_loc: Location,
    pub location: Location,
}

/// A method call in any of its surface spellings.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub receiver: Option<Box<Node>>,
    /// `.`, `&.`, or `::`.
    pub call_operator_loc: Option<Location>,
    /// The resolved method name, e.g. `[]=` for an index write.
    pub name: SmolStr,
    /// The message as written; covers `[0]` for `a[0] = 1`, absent for
    /// operator-less spellings.
    pub message_loc: Option<Location>,
    pub opening_loc: Option<Location>,
    pub arguments: Option<Box<ArgumentsNode>>,
    pub closing_loc: Option<Location>,
    /// A trailing block literal or `&block` argument.
    pub block: Option<Box<Node>>,
    pub location: Location,
}

/// `foo.bar += baz`, `foo[bar] ||= baz`: compound writes through a call,
/// shared by the arithmetic, `&&=`, and `||=` forms.
#[derive(Debug, Clone, PartialEq)]
pub struct CallWriteNode {
    pub receiver: Option<Box<Node>>,
    pub call_operator_loc: Option<Location>,
    /// The read spelling of the method, e.g. `[]` or `bar`.
    pub read_name: SmolStr,
    pub message_loc: Option<Location>,
    pub opening_loc: Option<Location>,
    pub arguments: Option<Box<ArgumentsNode>>,
    pub closing_loc: Option<Location>,
    pub operator_loc: Location,
    pub value: Box<Node>,
    pub location: Location,
}

/// `foo => bar => baz`
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePatternNode {
    pub value: Box<Node>,
    pub target: Box<Node>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `case foo; when ...; end` / `case foo; in ...; end`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub predicate: Option<Box<Node>>,
    pub conditions: Vec<Node>,
    pub consequent: Option<Box<ElseNode>>,
    pub case_keyword_loc: Location,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// `class Foo < Bar; end`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub locals: Vec<SmolStr>,
    pub class_keyword_loc: Location,
    pub constant_path: Box<Node>,
    pub inheritance_operator_loc: Option<Location>,
    pub superclass: Option<Box<Node>>,
    pub body: Option<Box<Node>>,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// A variable or constant read/target: `@foo`, `@@foo`, `$foo`, `Foo`,
/// `foo`, and the assignment-target spellings of each.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRefNode {
    pub name: SmolStr,
    pub location: Location,
}

/// A variable or constant write: plain `=`, arithmetic `op=`, `&&=`, and
/// `||=` forms all share this shape; the operator's lexeme disambiguates.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableWriteNode {
    pub name: SmolStr,
    pub name_loc: Location,
    pub operator_loc: Location,
    pub value: Box<Node>,
    pub location: Location,
}

/// `Foo::Bar`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPathNode {
    /// Absent for global-scope roots (`::Foo`).
    pub parent: Option<Box<Node>>,
    pub name: SmolStr,
    pub name_loc: Location,
    pub delimiter_loc: Location,
    pub location: Location,
}

/// `Foo::Bar = 1` and its compound forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPathWriteNode {
    pub target: Box<ConstantPathNode>,
    pub operator_loc: Location,
    pub value: Box<Node>,
    pub location: Location,
}

/// `def foo; end`, `def self.foo = bar`
#[derive(Debug, Clone, PartialEq)]
pub struct DefNode {
    pub name: SmolStr,
    pub name_loc: Location,
    pub receiver: Option<Box<Node>>,
    pub parameters: Option<Box<ParametersNode>>,
    pub body: Option<Box<Node>>,
    pub locals: Vec<SmolStr>,
    pub def_keyword_loc: Location,
    /// The `.` between a singleton receiver and the name.
    pub operator_loc: Option<Location>,
    pub lparen_loc: Option<Location>,
    pub rparen_loc: Option<Location>,
    /// The `=` of the endless form.
    pub equal_loc: Option<Location>,
    pub end_keyword_loc: Option<Location>,
    pub location: Location,
}

/// `defined?(a)`
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedNode {
    pub lparen_loc: Option<Location>,
    pub value: Box<Node>,
    pub rparen_loc: Option<Location>,
    pub keyword_loc: Location,
    pub location: Location,
}

/// The `else` clause of a conditional, case, or begin construct. Also
/// carries the `:` of a ternary.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseNode {
    pub else_keyword_loc: Location,
    pub statements: Option<Box<StatementsNode>>,
    pub end_keyword_loc: Option<Location>,
    pub location: Location,
}

/// `"foo #{bar}"`: the `#{bar}` part.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedStatementsNode {
    pub opening_loc: Location,
    pub statements: Option<Box<StatementsNode>>,
    pub closing_loc: Location,
    pub location: Location,
}

/// `"foo #@bar"`: the `#@bar` part.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedVariableNode {
    pub operator_loc: Location,
    pub variable: Box<Node>,
    pub location: Location,
}

/// The `ensure` clause of a begin construct. Never translated standalone.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsureNode {
    pub ensure_keyword_loc: Location,
    pub statements: Option<Box<StatementsNode>>,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// `foo => [*, bar, *]`
#[derive(Debug, Clone, PartialEq)]
pub struct FindPatternNode {
    pub constant: Option<Box<Node>>,
    pub left: Box<Node>,
    pub requireds: Vec<Node>,
    pub right: Box<Node>,
    pub opening_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// `0..5`, `if foo..bar`: ranges and flip-flops share a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub operator_loc: Location,
    pub exclude_end: bool,
    pub location: Location,
}

/// `1.0`
#[derive(Debug, Clone, PartialEq)]
pub struct FloatNode {
    pub value: f64,
    pub location: Location,
}

/// `for foo in bar do ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub index: Box<Node>,
    pub collection: Box<Node>,
    pub statements: Option<Box<StatementsNode>>,
    pub for_keyword_loc: Location,
    pub in_keyword_loc: Location,
    pub do_keyword_loc: Option<Location>,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// `super {}`: implicit-argument super, distinct from `super(...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardingSuperNode {
    pub block: Option<Box<BlockNode>>,
    pub location: Location,
}

/// `{ a: 1 }`
#[derive(Debug, Clone, PartialEq)]
pub struct HashNode {
    pub opening_loc: Location,
    pub elements: Vec<Node>,
    pub closing_loc: Location,
    pub location: Location,
}

/// `foo => { bar: }`
#[derive(Debug, Clone, PartialEq)]
pub struct HashPatternNode {
    pub constant: Option<Box<Node>>,
    pub assocs: Vec<Node>,
    pub opening_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// `if`/`elsif`/ternary. The keyword location is absent for ternaries; a
/// keyword that does not open the whole construct marks the modifier form.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub if_keyword_loc: Option<Location>,
    pub predicate: Box<Node>,
    pub statements: Option<Box<StatementsNode>>,
    /// An elsif chain ([`IfNode`]) or final [`ElseNode`].
    pub consequent: Option<Box<Node>>,
    pub end_keyword_loc: Option<Location>,
    pub location: Location,
}

/// `1i`: the lexeme is carried whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ImaginaryNode {
    pub value: SmolStr,
    pub location: Location,
}

/// `{ foo: }`: the implicit value of a shorthand hash entry. Never
/// translated standalone.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitNode {
    pub value: Box<Node>,
    pub location: Location,
}

/// `case foo; in bar; end`: one arm.
#[derive(Debug, Clone, PartialEq)]
pub struct InNode {
    pub pattern: Box<Node>,
    pub statements: Option<Box<StatementsNode>>,
    pub in_loc: Location,
    pub location: Location,
}

/// `1`
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerNode {
    pub value: i64,
    pub location: Location,
}

/// `/foo #{bar}/`: also the match-last-line spelling in conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedRegularExpressionNode {
    pub opening_loc: Location,
    pub parts: Vec<Node>,
    pub closing_loc: Location,
    pub location: Location,
}

/// `"foo #{bar}"` and heredoc-flavored string literals.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedStringNode {
    pub opening_loc: Option<Location>,
    pub parts: Vec<Node>,
    pub closing_loc: Option<Location>,
    pub location: Location,
}

/// `` `foo #{bar}` `` and heredoc-flavored command literals. Also
/// `:"foo #{bar}"` symbols, which share the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedDelimitedNode {
    pub opening_loc: Location,
    pub parts: Vec<Node>,
    pub closing_loc: Location,
    pub location: Location,
}

/// `foo(bar: baz)`: keyword arguments without braces.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHashNode {
    pub elements: Vec<Node>,
    pub location: Location,
}

/// `def foo(bar:)` / `def foo(bar: baz)`
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordParameterNode {
    pub name: SmolStr,
    pub name_loc: Location,
    pub value: Option<Box<Node>>,
    pub location: Location,
}

/// `def foo(**bar)` / `def foo(**)`
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRestParameterNode {
    pub name: Option<SmolStr>,
    pub name_loc: Option<Location>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `-> (bar) { foo }`
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaNode {
    pub locals: Vec<SmolStr>,
    pub operator_loc: Location,
    pub opening_loc: Location,
    pub closing_loc: Location,
    pub parameters: Option<Box<BlockParametersNode>>,
    pub body: Option<Box<Node>>,
    pub location: Location,
}

/// `foo in bar` / `foo => bar`: single-line pattern matches.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchNode {
    pub value: Box<Node>,
    pub pattern: Box<Node>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `/(?<foo>foo)/ =~ bar`: a match that writes named captures.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWriteNode {
    pub call: Box<CallNode>,
    pub location: Location,
}

/// A placeholder the upstream parser leaves where a syntax error was
/// recovered. Never translated.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingNode {
    pub location: Location,
}

/// `module Foo; end`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub locals: Vec<SmolStr>,
    pub module_keyword_loc: Location,
    pub constant_path: Box<Node>,
    pub body: Option<Box<Node>>,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// `(foo, bar), baz = value`: a nested destructuring target list.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTargetNode {
    pub targets: Vec<Node>,
    pub lparen_loc: Option<Location>,
    pub rparen_loc: Option<Location>,
    pub location: Location,
}

/// `foo, bar = baz`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiWriteNode {
    pub targets: Vec<Node>,
    pub lparen_loc: Option<Location>,
    pub rparen_loc: Option<Location>,
    pub operator_loc: Location,
    pub value: Box<Node>,
    pub location: Location,
}

/// `def foo(**nil)`
#[derive(Debug, Clone, PartialEq)]
pub struct NoKeywordsParameterNode {
    pub operator_loc: Location,
    pub keyword_loc: Location,
    pub location: Location,
}

/// `$1`
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedReferenceReadNode {
    pub number: u32,
    pub location: Location,
}

/// `def foo(bar = 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalParameterNode {
    pub name: SmolStr,
    pub name_loc: Location,
    pub operator_loc: Location,
    pub value: Box<Node>,
    pub location: Location,
}

/// The full parameter declaration of a method or block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersNode {
    pub requireds: Vec<Node>,
    pub optionals: Vec<Node>,
    pub rest: Option<Box<Node>>,
    pub posts: Vec<Node>,
    pub keywords: Vec<Node>,
    pub keyword_rest: Option<Box<Node>>,
    pub block: Option<Box<BlockParameterNode>>,
    pub location: Location,
}

/// `(1)` / `()`
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesesNode {
    pub body: Option<Box<Node>>,
    pub opening_loc: Location,
    pub closing_loc: Location,
    pub location: Location,
}

/// `foo => ^(bar)`
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedExpressionNode {
    pub expression: Box<Node>,
    pub operator_loc: Location,
    pub lparen_loc: Location,
    pub rparen_loc: Location,
    pub location: Location,
}

/// `foo => ^bar`
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedVariableNode {
    pub variable: Box<Node>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `BEGIN {}` / `END {}`
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionHookNode {
    pub statements: Option<Box<StatementsNode>>,
    pub keyword_loc: Location,
    pub opening_loc: Location,
    pub closing_loc: Location,
    pub location: Location,
}

/// The root of a compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramNode {
    pub locals: Vec<SmolStr>,
    pub statements: Box<StatementsNode>,
    pub location: Location,
}

/// `1r`: the lexeme is carried whole.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalNode {
    pub value: SmolStr,
    pub location: Location,
}

/// `/foo/i`: also the match-last-line spelling in conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularExpressionNode {
    pub opening_loc: Location,
    pub content_loc: Location,
    pub closing_loc: Location,
    pub location: Location,
}

/// `def foo((bar, baz))`: a destructured parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredDestructuredParameterNode {
    pub parameters: Vec<Node>,
    pub opening_loc: Location,
    pub closing_loc: Location,
    pub location: Location,
}

/// `foo rescue bar`
#[derive(Debug, Clone, PartialEq)]
pub struct RescueModifierNode {
    pub expression: Box<Node>,
    pub keyword_loc: Location,
    pub rescue_expression: Box<Node>,
    pub location: Location,
}

/// One `rescue` clause of a begin construct, chained through `consequent`.
/// Never translated standalone; the owning begin walks the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RescueNode {
    pub keyword_loc: Location,
    pub exceptions: Vec<Node>,
    pub operator_loc: Option<Location>,
    pub reference: Option<Box<Node>>,
    pub statements: Option<Box<StatementsNode>>,
    pub consequent: Option<Box<RescueNode>>,
    pub location: Location,
}

/// `def foo(*bar)` / `def foo(*)`
#[derive(Debug, Clone, PartialEq)]
pub struct RestParameterNode {
    pub name: Option<SmolStr>,
    pub name_loc: Option<Location>,
    pub operator_loc: Location,
    pub location: Location,
}

/// `class << self; end`
#[derive(Debug, Clone, PartialEq)]
pub struct SingletonClassNode {
    pub locals: Vec<SmolStr>,
    pub class_keyword_loc: Location,
    pub operator_loc: Location,
    pub expression: Box<Node>,
    pub body: Option<Box<Node>>,
    pub end_keyword_loc: Location,
    pub location: Location,
}

/// `foo(*bar)` / `def foo((bar, *baz))` / `bar(*)`
#[derive(Debug, Clone, PartialEq)]
pub struct SplatNode {
    pub operator_loc: Location,
    pub expression: Option<Box<Node>>,
    pub location: Location,
}

/// An ordered statement list. The upstream parser omits this node entirely
/// rather than emitting one with an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementsNode {
    pub body: Vec<Node>,
    pub location: Location,
}

/// `"foo" "bar"`: adjacent literal juxtaposition.
#[derive(Debug, Clone, PartialEq)]
pub struct StringConcatNode {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub location: Location,
}

/// `"foo"`, `'foo'`, `?a`, heredoc bodies and plain fragments of
/// interpolated literals.
#[derive(Debug, Clone, PartialEq)]
pub struct StringNode {
    pub opening_loc: Option<Location>,
    pub content_loc: Location,
    pub closing_loc: Option<Location>,
    /// The content with escape sequences resolved.
    pub unescaped: String,
    pub location: Location,
}

/// `super(foo)`: explicit-argument super.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperNode {
    pub keyword_loc: Location,
    pub lparen_loc: Option<Location>,
    pub arguments: Option<Box<ArgumentsNode>>,
    pub rparen_loc: Option<Location>,
    pub block: Option<Box<Node>>,
    pub location: Location,
}

/// `:foo`, `:"foo"`, the bare words of `%i[...]`, and hash-entry labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    pub opening_loc: Option<Location>,
    pub value_loc: Option<Location>,
    pub closing_loc: Option<Location>,
    pub unescaped: String,
    pub location: Location,
}

/// `undef foo, :bar`
#[derive(Debug, Clone, PartialEq)]
pub struct UndefNode {
    pub names: Vec<Node>,
    pub keyword_loc: Location,
    pub location: Location,
}

/// `unless foo; bar end` / `bar unless foo`
#[derive(Debug, Clone, PartialEq)]
pub struct UnlessNode {
    pub keyword_loc: Location,
    pub predicate: Box<Node>,
    pub statements: Option<Box<StatementsNode>>,
    pub consequent: Option<Box<ElseNode>>,
    pub end_keyword_loc: Option<Location>,
    pub location: Location,
}

/// `while foo; bar end` / `bar while foo`: also `until`, which shares the
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    pub keyword_loc: Location,
    pub closing_loc: Option<Location>,
    pub predicate: Box<Node>,
    pub statements: Option<Box<StatementsNode>>,
    pub location: Location,
}

/// `case foo; when bar; end`: one arm.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenNode {
    pub keyword_loc: Location,
    pub conditions: Vec<Node>,
    pub statements: Option<Box<StatementsNode>>,
    pub location: Location,
}

/// `` `foo` `` and heredoc-flavored command literals.
#[derive(Debug, Clone, PartialEq)]
pub struct XStringNode {
    pub opening_loc: Location,
    pub content_loc: Location,
    pub closing_loc: Location,
    pub unescaped: String,
    pub location: Location,
}

/// `yield` / `yield 1`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldNode {
    pub keyword_loc: Location,
    pub lparen_loc: Option<Location>,
    pub arguments: Option<Box<ArgumentsNode>>,
    pub rparen_loc: Option<Location>,
    pub location: Location,
}

/// A CST node: a tagged variant over the upstream parser's closed kind set.
///
/// Children are exclusively owned by their parent; the tree has no cycles
/// and no sharing. Kind families with identical shapes share a payload
/// struct, but each surface kind keeps its own variant so translation rules
/// and the completeness check stay one-to-one with the parser's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    AliasGlobalVariable(AliasNode),
    AliasMethod(AliasNode),
    AlternationPattern(AlternationPatternNode),
    And(BinaryBooleanNode),
    Arguments(ArgumentsNode),
    Array(ArrayNode),
    ArrayPattern(ArrayPatternNode),
    Assoc(AssocNode),
    AssocSplat(AssocSplatNode),
    BackReferenceRead(VariableRefNode),
    Begin(BeginNode),
    BlockArgument(BlockArgumentNode),
    BlockLocalVariable(VariableRefNode),
    Block(BlockNode),
    BlockParameter(BlockParameterNode),
    BlockParameters(BlockParametersNode),
    Break(JumpNode),
    CallAndWrite(CallWriteNode),
    Call(CallNode),
    CallOperatorWrite(CallWriteNode),
    CallOrWrite(CallWriteNode),
    CapturePattern(CapturePatternNode),
    Case(CaseNode),
    Class(ClassNode),
    ClassVariableAndWrite(VariableWriteNode),
    ClassVariableOperatorWrite(VariableWriteNode),
    ClassVariableOrWrite(VariableWriteNode),
    ClassVariableRead(VariableRefNode),
    ClassVariableTarget(VariableRefNode),
    ClassVariableWrite(VariableWriteNode),
    ConstantAndWrite(VariableWriteNode),
    ConstantOperatorWrite(VariableWriteNode),
    ConstantOrWrite(VariableWriteNode),
    ConstantPathAndWrite(ConstantPathWriteNode),
    ConstantPath(ConstantPathNode),
    ConstantPathOperatorWrite(ConstantPathWriteNode),
    ConstantPathOrWrite(ConstantPathWriteNode),
    ConstantPathTarget(ConstantPathNode),
    ConstantPathWrite(ConstantPathWriteNode),
    ConstantRead(VariableRefNode),
    ConstantTarget(VariableRefNode),
    ConstantWrite(VariableWriteNode),
    Def(DefNode),
    Defined(DefinedNode),
    Else(ElseNode),
    EmbeddedStatements(EmbeddedStatementsNode),
    EmbeddedVariable(EmbeddedVariableNode),
    Ensure(EnsureNode),
    False(Location),
    FindPattern(FindPatternNode),
    FlipFlop(RangeNode),
    Float(FloatNode),
    For(ForNode),
    ForwardingArguments(Location),
    ForwardingParameter(Location),
    ForwardingSuper(ForwardingSuperNode),
    GlobalVariableAndWrite(VariableWriteNode),
    GlobalVariableOperatorWrite(VariableWriteNode),
    GlobalVariableOrWrite(VariableWriteNode),
    GlobalVariableRead(VariableRefNode),
    GlobalVariableTarget(VariableRefNode),
    GlobalVariableWrite(VariableWriteNode),
    Hash(HashNode),
    HashPattern(HashPatternNode),
    If(IfNode),
    Imaginary(ImaginaryNode),
    Implicit(ImplicitNode),
    In(InNode),
    InstanceVariableAndWrite(VariableWriteNode),
    InstanceVariableOperatorWrite(VariableWriteNode),
    InstanceVariableOrWrite(VariableWriteNode),
    InstanceVariableRead(VariableRefNode),
    InstanceVariableTarget(VariableRefNode),
    InstanceVariableWrite(VariableWriteNode),
    Integer(IntegerNode),
    InterpolatedMatchLastLine(InterpolatedRegularExpressionNode),
    InterpolatedRegularExpression(InterpolatedRegularExpressionNode),
    InterpolatedString(InterpolatedStringNode),
    InterpolatedSymbol(InterpolatedDelimitedNode),
    InterpolatedXString(InterpolatedDelimitedNode),
    KeywordHash(KeywordHashNode),
    KeywordParameter(KeywordParameterNode),
    KeywordRestParameter(KeywordRestParameterNode),
    Lambda(LambdaNode),
    LocalVariableAndWrite(VariableWriteNode),
    LocalVariableOperatorWrite(VariableWriteNode),
    LocalVariableOrWrite(VariableWriteNode),
    LocalVariableRead(VariableRefNode),
    LocalVariableTarget(VariableRefNode),
    LocalVariableWrite(VariableWriteNode),
    MatchLastLine(RegularExpressionNode),
    MatchPredicate(MatchNode),
    MatchRequired(MatchNode),
    MatchWrite(MatchWriteNode),
    Missing(MissingNode),
    Module(ModuleNode),
    MultiTarget(MultiTargetNode),
    MultiWrite(MultiWriteNode),
    Next(JumpNode),
    Nil(Location),
    NoKeywordsParameter(NoKeywordsParameterNode),
    NumberedReferenceRead(NumberedReferenceReadNode),
    OptionalParameter(OptionalParameterNode),
    Or(BinaryBooleanNode),
    Parameters(ParametersNode),
    Parentheses(ParenthesesNode),
    PinnedExpression(PinnedExpressionNode),
    PinnedVariable(PinnedVariableNode),
    PostExecution(ExecutionHookNode),
    PreExecution(ExecutionHookNode),
    Program(ProgramNode),
    Range(RangeNode),
    Rational(RationalNode),
    Redo(Location),
    RegularExpression(RegularExpressionNode),
    RequiredDestructuredParameter(RequiredDestructuredParameterNode),
    RequiredParameter(VariableRefNode),
    RescueModifier(RescueModifierNode),
    Rescue(RescueNode),
    RestParameter(RestParameterNode),
    Retry(Location),
    Return(JumpNode),
    SelfExpression(Location),
    SingletonClass(SingletonClassNode),
    SourceEncoding(Location),
    SourceFile(Location),
    SourceLine(Location),
    Splat(SplatNode),
    Statements(StatementsNode),
    StringConcat(StringConcatNode),
    StringLiteral(StringNode),
    Super(SuperNode),
    Symbol(SymbolNode),
    True(Location),
    Undef(UndefNode),
    Unless(UnlessNode),
    Until(LoopNode),
    When(WhenNode),
    While(LoopNode),
    XString(XStringNode),
    Yield(YieldNode),
}

impl Node {
    /// Returns the location spanning the whole construct.
    pub fn location(&self) -> Location {
        match self {
            Node::AliasGlobalVariable(n) => n.location,
            Node::AliasMethod(n) => n.location,
            Node::AlternationPattern(n) => n.location,
            Node::And(n) => n.location,
            Node::Arguments(n) => n.location,
            Node::Array(n) => n.location,
            Node::ArrayPattern(n) => n.location,
            Node::Assoc(n) => n.location,
            Node::AssocSplat(n) => n.location,
            Node::BackReferenceRead(n) => n.location,
            Node::Begin(n) => n.location,
            Node::BlockArgument(n) => n.location,
            Node::BlockLocalVariable(n) => n.location,
            Node::Block(n) => n.location,
            Node::BlockParameter(n) => n.location,
            Node::BlockParameters(n) => n.location,
            Node::Break(n) => n.location,
            Node::CallAndWrite(n) => n.location,
            Node::Call(n) => n.location,
            Node::CallOperatorWrite(n) => n.location,
            Node::CallOrWrite(n) => n.location,
            Node::CapturePattern(n) => n.location,
            Node::Case(n) => n.location,
            Node::Class(n) => n.location,
            Node::ClassVariableAndWrite(n) => n.location,
            Node::ClassVariableOperatorWrite(n) => n.location,
            Node::ClassVariableOrWrite(n) => n.location,
            Node::ClassVariableRead(n) => n.location,
            Node::ClassVariableTarget(n) => n.location,
            Node::ClassVariableWrite(n) => n.location,
            Node::ConstantAndWrite(n) => n.location,
            Node::ConstantOperatorWrite(n) => n.location,
            Node::ConstantOrWrite(n) => n.location,
            Node::ConstantPathAndWrite(n) => n.location,
            Node::ConstantPath(n) => n.location,
            Node::ConstantPathOperatorWrite(n) => n.location,
            Node::ConstantPathOrWrite(n) => n.location,
            Node::ConstantPathTarget(n) => n.location,
            Node::ConstantPathWrite(n) => n.location,
            Node::ConstantRead(n) => n.location,
            Node::ConstantTarget(n) => n.location,
            Node::ConstantWrite(n) => n.location,
            Node::Def(n) => n.location,
            Node::Defined(n) => n.location,
            Node::Else(n) => n.location,
            Node::EmbeddedStatements(n) => n.location,
            Node::EmbeddedVariable(n) => n.location,
            Node::Ensure(n) => n.location,
            Node::False(location) => *location,
            Node::FindPattern(n) => n.location,
            Node::FlipFlop(n) => n.location,
            Node::Float(n) => n.location,
            Node::For(n) => n.location,
            Node::ForwardingArguments(location) => *location,
            Node::ForwardingParameter(location) => *location,
            Node::ForwardingSuper(n) => n.location,
            Node::GlobalVariableAndWrite(n) => n.location,
            Node::GlobalVariableOperatorWrite(n) => n.location,
            Node::GlobalVariableOrWrite(n) => n.location,
            Node::GlobalVariableRead(n) => n.location,
            Node::GlobalVariableTarget(n) => n.location,
            Node::GlobalVariableWrite(n) => n.location,
            Node::Hash(n) => n.location,
            Node::HashPattern(n) => n.location,
            Node::If(n) => n.location,
            Node::Imaginary(n) => n.location,
            Node::Implicit(n) => n.location,
            Node::In(n) => n.location,
            Node::InstanceVariableAndWrite(n) => n.location,
            Node::InstanceVariableOperatorWrite(n) => n.location,
            Node::InstanceVariableOrWrite(n) => n.location,
            Node::InstanceVariableRead(n) => n.location,
            Node::InstanceVariableTarget(n) => n.location,
            Node::InstanceVariableWrite(n) => n.location,
            Node::Integer(n) => n.location,
            Node::InterpolatedMatchLastLine(n) => n.location,
            Node::InterpolatedRegularExpression(n) => n.location,
            Node::InterpolatedString(n) => n.location,
            Node::InterpolatedSymbol(n) => n.location,
            Node::InterpolatedXString(n) => n.location,
            Node::KeywordHash(n) => n.location,
            Node::KeywordParameter(n) => n.location,
            Node::KeywordRestParameter(n) => n.location,
            Node::Lambda(n) => n.location,
            Node::LocalVariableAndWrite(n) => n.location,
            Node::LocalVariableOperatorWrite(n) => n.location,
            Node::LocalVariableOrWrite(n) => n.location,
            Node::LocalVariableRead(n) => n.location,
            Node::LocalVariableTarget(n) => n.location,
            Node::LocalVariableWrite(n) => n.location,
            Node::MatchLastLine(n) => n.location,
            Node::MatchPredicate(n) => n.location,
            Node::MatchRequired(n) => n.location,
            Node::MatchWrite(n) => n.location,
            Node::Missing(n) => n.location,
            Node::Module(n) => n.location,
            Node::MultiTarget(n) => n.location,
            Node::MultiWrite(n) => n.location,
            Node::Next(n) => n.location,
            Node::Nil(location) => *location,
            Node::NoKeywordsParameter(n) => n.location,
            Node::NumberedReferenceRead(n) => n.location,
            Node::OptionalParameter(n) => n.location,
            Node::Or(n) => n.location,
            Node::Parameters(n) => n.location,
            Node::Parentheses(n) => n.location,
            Node::PinnedExpression(n) => n.location,
            Node::PinnedVariable(n) => n.location,
            Node::PostExecution(n) => n.location,
            Node::PreExecution(n) => n.location,
            Node::Program(n) => n.location,
            Node::Range(n) => n.location,
            Node::Rational(n) => n.location,
            Node::Redo(location) => *location,
            Node::RegularExpression(n) => n.location,
            Node::RequiredDestructuredParameter(n) => n.location,
            Node::RequiredParameter(n) => n.location,
            Node::RescueModifier(n) => n.location,
            Node::Rescue(n) => n.location,
            Node::RestParameter(n) => n.location,
            Node::Retry(location) => *location,
            Node::Return(n) => n.location,
            Node::SelfExpression(location) => *location,
            Node::SingletonClass(n) => n.location,
            Node::SourceEncoding(location) => *location,
            Node::SourceFile(location) => *location,
            Node::SourceLine(location) => *location,
            Node::Splat(n) => n.location,
            Node::Statements(n) => n.location,
            Node::StringConcat(n) => n.location,
            Node::StringLiteral(n) => n.location,
            Node::Super(n) => n.location,
            Node::Symbol(n) => n.location,
            Node::True(location) => *location,
            Node::Undef(n) => n.location,
            Node::Unless(n) => n.location,
            Node::Until(n) => n.location,
            Node::When(n) => n.location,
            Node::While(n) => n.location,
            Node::XString(n) => n.location,
            Node::Yield(n) => n.location,
        }
    }

    /// Returns the fieldless kind tag for this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::AliasGlobalVariable(_) => NodeKind::AliasGlobalVariable,
            Node::AliasMethod(_) => NodeKind::AliasMethod,
            Node::AlternationPattern(_) => NodeKind::AlternationPattern,
            Node::And(_) => NodeKind::And,
            Node::Arguments(_) => NodeKind::Arguments,
            Node::Array(_) => NodeKind::Array,
            Node::ArrayPattern(_) => NodeKind::ArrayPattern,
            Node::Assoc(_) => NodeKind::Assoc,
            Node::AssocSplat(_) => NodeKind::AssocSplat,
            Node::BackReferenceRead(_) => NodeKind::BackReferenceRead,
            Node::Begin(_) => NodeKind::Begin,
            Node::BlockArgument(_) => NodeKind::BlockArgument,
            Node::BlockLocalVariable(_) => NodeKind::BlockLocalVariable,
            Node::Block(_) => NodeKind::Block,
            Node::BlockParameter(_) => NodeKind::BlockParameter,
            Node::BlockParameters(_) => NodeKind::BlockParameters,
            Node::Break(_) => NodeKind::Break,
            Node::CallAndWrite(_) => NodeKind::CallAndWrite,
            Node::Call(_) => NodeKind::Call,
            Node::CallOperatorWrite(_) => NodeKind::CallOperatorWrite,
            Node::CallOrWrite(_) => NodeKind::CallOrWrite,
            Node::CapturePattern(_) => NodeKind::CapturePattern,
            Node::Case(_) => NodeKind::Case,
            Node::Class(_) => NodeKind::Class,
            Node::ClassVariableAndWrite(_) => NodeKind::ClassVariableAndWrite,
            Node::ClassVariableOperatorWrite(_) => NodeKind::ClassVariableOperatorWrite,
            Node::ClassVariableOrWrite(_) => NodeKind::ClassVariableOrWrite,
            Node::ClassVariableRead(_) => NodeKind::ClassVariableRead,
            Node::ClassVariableTarget(_) => NodeKind::ClassVariableTarget,
            Node::ClassVariableWrite(_) => NodeKind::ClassVariableWrite,
            Node::ConstantAndWrite(_) => NodeKind::ConstantAndWrite,
            Node::ConstantOperatorWrite(_) => NodeKind::ConstantOperatorWrite,
            Node::ConstantOrWrite(_) => NodeKind::ConstantOrWrite,
            Node::ConstantPathAndWrite(_) => NodeKind::ConstantPathAndWrite,
            Node::ConstantPath(_) => NodeKind::ConstantPath,
            Node::ConstantPathOperatorWrite(_) => NodeKind::ConstantPathOperatorWrite,
            Node::ConstantPathOrWrite(_) => NodeKind::ConstantPathOrWrite,
            Node::ConstantPathTarget(_) => NodeKind::ConstantPathTarget,
            Node::ConstantPathWrite(_) => NodeKind::ConstantPathWrite,
            Node::ConstantRead(_) => NodeKind::ConstantRead,
            Node::ConstantTarget(_) => NodeKind::ConstantTarget,
            Node::ConstantWrite(_) => NodeKind::ConstantWrite,
            Node::Def(_) => NodeKind::Def,
            Node::Defined(_) => NodeKind::Defined,
            Node::Else(_) => NodeKind::Else,
            Node::EmbeddedStatements(_) => NodeKind::EmbeddedStatements,
            Node::EmbeddedVariable(_) => NodeKind::EmbeddedVariable,
            Node::Ensure(_) => NodeKind::Ensure,
            Node::False(_) => NodeKind::False,
            Node::FindPattern(_) => NodeKind::FindPattern,
            Node::FlipFlop(_) => NodeKind::FlipFlop,
            Node::Float(_) => NodeKind::Float,
            Node::For(_) => NodeKind::For,
            Node::ForwardingArguments(_) => NodeKind::ForwardingArguments,
            Node::ForwardingParameter(_) => NodeKind::ForwardingParameter,
            Node::ForwardingSuper(_) => NodeKind::ForwardingSuper,
            Node::GlobalVariableAndWrite(_) => NodeKind::GlobalVariableAndWrite,
            Node::GlobalVariableOperatorWrite(_) => NodeKind::GlobalVariableOperatorWrite,
            Node::GlobalVariableOrWrite(_) => NodeKind::GlobalVariableOrWrite,
            Node::GlobalVariableRead(_) => NodeKind::GlobalVariableRead,
            Node::GlobalVariableTarget(_) => NodeKind::GlobalVariableTarget,
            Node::GlobalVariableWrite(_) => NodeKind::GlobalVariableWrite,
            Node::Hash(_) => NodeKind::Hash,
            Node::HashPattern(_) => NodeKind::HashPattern,
            Node::If(_) => NodeKind::If,
            Node::Imaginary(_) => NodeKind::Imaginary,
            Node::Implicit(_) => NodeKind::Implicit,
            Node::In(_) => NodeKind::In,
            Node::InstanceVariableAndWrite(_) => NodeKind::InstanceVariableAndWrite,
            Node::InstanceVariableOperatorWrite(_) => NodeKind::InstanceVariableOperatorWrite,
            Node::InstanceVariableOrWrite(_) => NodeKind::InstanceVariableOrWrite,
            Node::InstanceVariableRead(_) => NodeKind::InstanceVariableRead,
            Node::InstanceVariableTarget(_) => NodeKind::InstanceVariableTarget,
            Node::InstanceVariableWrite(_) => NodeKind::InstanceVariableWrite,
            Node::Integer(_) => NodeKind::Integer,
            Node::InterpolatedMatchLastLine(_) => NodeKind::InterpolatedMatchLastLine,
            Node::InterpolatedRegularExpression(_) => NodeKind::InterpolatedRegularExpression,
            Node::InterpolatedString(_) => NodeKind::InterpolatedString,
            Node::InterpolatedSymbol(_) => NodeKind::InterpolatedSymbol,
            Node::InterpolatedXString(_) => NodeKind::InterpolatedXString,
            Node::KeywordHash(_) => NodeKind::KeywordHash,
            Node::KeywordParameter(_) => NodeKind::KeywordParameter,
            Node::KeywordRestParameter(_) => NodeKind::KeywordRestParameter,
            Node::Lambda(_) => NodeKind::Lambda,
            Node::LocalVariableAndWrite(_) => NodeKind::LocalVariableAndWrite,
            Node::LocalVariableOperatorWrite(_) => NodeKind::LocalVariableOperatorWrite,
            Node::LocalVariableOrWrite(_) => NodeKind::LocalVariableOrWrite,
            Node::LocalVariableRead(_) => NodeKind::LocalVariableRead,
            Node::LocalVariableTarget(_) => NodeKind::LocalVariableTarget,
            Node::LocalVariableWrite(_) => NodeKind::LocalVariableWrite,
            Node::MatchLastLine(_) => NodeKind::MatchLastLine,
            Node::MatchPredicate(_) => NodeKind::MatchPredicate,
            Node::MatchRequired(_) => NodeKind::MatchRequired,
            Node::MatchWrite(_) => NodeKind::MatchWrite,
            Node::Missing(_) => NodeKind::Missing,
            Node::Module(_) => NodeKind::Module,
            Node::MultiTarget(_) => NodeKind::MultiTarget,
            Node::MultiWrite(_) => NodeKind::MultiWrite,
            Node::Next(_) => NodeKind::Next,
            Node::Nil(_) => NodeKind::Nil,
            Node::NoKeywordsParameter(_) => NodeKind::NoKeywordsParameter,
            Node::NumberedReferenceRead(_) => NodeKind::NumberedReferenceRead,
            Node::OptionalParameter(_) => NodeKind::OptionalParameter,
            Node::Or(_) => NodeKind::Or,
            Node::Parameters(_) => NodeKind::Parameters,
            Node::Parentheses(_) => NodeKind::Parentheses,
            Node::PinnedExpression(_) => NodeKind::PinnedExpression,
            Node::PinnedVariable(_) => NodeKind::PinnedVariable,
            Node::PostExecution(_) => NodeKind::PostExecution,
            Node::PreExecution(_) => NodeKind::PreExecution,
            Node::Program(_) => NodeKind::Program,
            Node::Range(_) => NodeKind::Range,
            Node::Rational(_) => NodeKind::Rational,
            Node::Redo(_) => NodeKind::Redo,
            Node::RegularExpression(_) => NodeKind::RegularExpression,
            Node::RequiredDestructuredParameter(_) => NodeKind::RequiredDestructuredParameter,
            Node::RequiredParameter(_) => NodeKind::RequiredParameter,
            Node::RescueModifier(_) => NodeKind::RescueModifier,
            Node::Rescue(_) => NodeKind::Rescue,
            Node::RestParameter(_) => NodeKind::RestParameter,
            Node::Retry(_) => NodeKind::Retry,
            Node::Return(_) => NodeKind::Return,
            Node::SelfExpression(_) => NodeKind::SelfExpression,
            Node::SingletonClass(_) => NodeKind::SingletonClass,
            Node::SourceEncoding(_) => NodeKind::SourceEncoding,
            Node::SourceFile(_) => NodeKind::SourceFile,
            Node::SourceLine(_) => NodeKind::SourceLine,
            Node::Splat(_) => NodeKind::Splat,
            Node::Statements(_) => NodeKind::Statements,
            Node::StringConcat(_) => NodeKind::StringConcat,
            Node::StringLiteral(_) => NodeKind::StringLiteral,
            Node::Super(_) => NodeKind::Super,
            Node::Symbol(_) => NodeKind::Symbol,
            Node::True(_) => NodeKind::True,
            Node::Undef(_) => NodeKind::Undef,
            Node::Unless(_) => NodeKind::Unless,
            Node::Until(_) => NodeKind::Until,
            Node::When(_) => NodeKind::When,
            Node::While(_) => NodeKind::While,
            Node::XString(_) => NodeKind::XString,
            Node::Yield(_) => NodeKind::Yield,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        let node = Node::Nil(Location::new(0, 3));
        assert_eq!(node.kind(), NodeKind::Nil);
        assert_eq!(node.location(), Location::new(0, 3));
    }

    #[test]
    fn test_shared_payload_kinds_stay_distinct() {
        let payload = VariableRefNode {
            name: "foo".into(),
            location: Location::new(0, 3),
        };
        let read = Node::LocalVariableRead(payload.clone());
        let target = Node::LocalVariableTarget(payload);
        assert_ne!(read.kind(), target.kind());
    }
}
