//! The node transducer: one translation rule per CST kind.
//!
//! Dispatch is a single exhaustive match, so a CST kind without a rule is a
//! compile error here and a load-time error in the startup check. Every
//! rule is pure given its node and [`Context`]; the only mutable state is
//! the per-unit offset cache.

use crate::context::Context;
use crate::error::TranslateError;
use ruby_ast as ast;
use ruby_ast::{Builder, CallOperator, KeywordCmd, LogicalOp, LoopKind, Tok};
use ruby_cst as cst;
use ruby_cst::{
    AliasNode, AlternationPatternNode, ArgumentsNode, ArrayNode, ArrayPatternNode, AssocNode,
    AssocSplatNode, BeginNode, BinaryBooleanNode, BlockArgumentNode, BlockNode, BlockParameterNode,
    BlockParametersNode, CallNode, CallWriteNode, CapturePatternNode, CaseNode, ClassNode,
    ConstantPathNode, ConstantPathWriteNode, DefNode, DefinedNode, EmbeddedStatementsNode,
    ExecutionHookNode, FindPatternNode, ForNode, ForwardingSuperNode, HashNode, HashPatternNode,
    IfNode, InNode, InterpolatedDelimitedNode, InterpolatedRegularExpressionNode,
    InterpolatedStringNode, JumpNode, KeywordHashNode, KeywordParameterNode,
    KeywordRestParameterNode, LambdaNode, Location, LoopNode, MatchNode, MatchWriteNode,
    ModuleNode, MultiTargetNode, MultiWriteNode, NoKeywordsParameterNode, OptionalParameterNode,
    ParametersNode, ParenthesesNode, PinnedExpressionNode, PinnedVariableNode, ProgramNode,
    RangeNode, RegularExpressionNode, RequiredDestructuredParameterNode, RescueModifierNode,
    RestParameterNode, SingletonClassNode, SplatNode, StatementsNode, StringConcatNode,
    StringNode, SuperNode, SymbolNode, UndefNode, UnlessNode, VariableRefNode, VariableWriteNode,
    WhenNode, XStringNode, YieldNode,
};
use smol_str::SmolStr;
use source_span::{locator, OffsetCache, Span};

type Result<T> = std::result::Result<T, TranslateError>;

fn structural(kind: &'static str, message: &'static str) -> TranslateError {
    TranslateError::structural(kind, message)
}

/// Walks one compilation unit's CST, producing target nodes through the
/// factory. One translator serves one unit; its offset cache dies with it.
pub struct Translator<'src> {
    source: &'src str,
    builder: Builder,
    offsets: OffsetCache<'src>,
}

impl<'src> Translator<'src> {
    /// Creates a translator over the unit's source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            builder: Builder::new(),
            offsets: OffsetCache::new(source),
        }
    }

    /// Translates from the program root. An empty unit yields `None`.
    pub fn translate_root(&mut self, root: &cst::Node) -> Result<Option<ast::Node>> {
        match root {
            cst::Node::Program(program) => self.program(program, &Context::new()),
            _ => Err(structural(
                "program",
                "translation must start at the program root",
            )),
        }
    }

    // === Span and token plumbing ===

    pub(crate) fn source(&self) -> &'src str {
        self.source
    }

    /// A plain string fragment node; the heredoc splitter builds these for
    /// each synthesized line.
    pub(crate) fn string_fragment(&self, text: String, span: Span) -> ast::Node {
        self.builder.string_internal(text, span)
    }

    fn span(&mut self, loc: Location) -> Span {
        let start = self.offsets.resolve(loc.start);
        let end = self.offsets.resolve(loc.end);
        Span::new(start, end)
    }

    pub(crate) fn span_offsets(&mut self, start: usize, end: usize) -> Span {
        let start = self.offsets.resolve(start);
        let end = self.offsets.resolve(end);
        Span::new(start, end)
    }

    /// The token at a location: its source text and character span.
    fn token(&mut self, loc: Location) -> Tok {
        let text = SmolStr::new(loc.slice(self.source));
        (text, self.span(loc))
    }

    fn token_opt(&mut self, loc: Option<Location>) -> Option<Tok> {
        loc.map(|loc| self.token(loc))
    }

    /// An operator token with its trailing `=` stripped: `+=` → `+`,
    /// `||=` → `||`. The span still covers the full operator.
    fn op_token(&mut self, loc: Location) -> Tok {
        let slice = loc.slice(self.source);
        let text = SmolStr::new(slice.strip_suffix('=').unwrap_or(slice));
        (text, self.span(loc))
    }

    /// Scans the source window for an elided token. `None` means the token
    /// is genuinely absent, which every caller must tolerate.
    fn find_token(
        &mut self,
        start_offset: usize,
        end_offset: usize,
        candidates: &[&'static str],
    ) -> Option<Tok> {
        let (text, offset) = locator::find(self.source, start_offset, end_offset, candidates)?;
        let span = self.span_offsets(offset, offset + text.len());
        Some((SmolStr::new(text), span))
    }

    fn call_operator(
        &mut self,
        loc: Option<Location>,
    ) -> Result<Option<(CallOperator, Span)>> {
        let Some(loc) = loc else { return Ok(None) };
        let operator = match loc.slice(self.source) {
            "." => CallOperator::Dot,
            "&." => CallOperator::SafeNavigation,
            "::" => CallOperator::DoubleColon,
            _ => {
                return Err(structural(
                    "call",
                    "unrecognized call operator spelling",
                ))
            }
        };
        Ok(Some((operator, self.span(loc))))
    }

    // === Recursion helpers ===

    fn node_opt(
        &mut self,
        node: Option<&cst::Node>,
        ctx: &Context,
    ) -> Result<Option<ast::Node>> {
        node.map(|node| self.node(node, ctx)).transpose()
    }

    fn nodes(&mut self, nodes: &[cst::Node], ctx: &Context) -> Result<Vec<ast::Node>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.push(self.node(node, ctx)?);
        }
        Ok(out)
    }

    /// A statement list collapsed the way the factory expects: `None` when
    /// absent or empty, the sole statement, or a grouped node.
    fn statements_opt(
        &mut self,
        statements: Option<&StatementsNode>,
        ctx: &Context,
    ) -> Result<Option<ast::Node>> {
        let Some(statements) = statements else {
            return Ok(None);
        };
        let body = self.nodes(&statements.body, ctx)?;
        Ok(self.builder.compstmt(body))
    }

    /// The spliced positional arguments of a call-like construct.
    pub(crate) fn argument_list(
        &mut self,
        arguments: Option<&ArgumentsNode>,
        ctx: &Context,
    ) -> Result<Vec<ast::Node>> {
        match arguments {
            Some(arguments) => self.nodes(&arguments.arguments, ctx),
            None => Ok(Vec::new()),
        }
    }

    /// The spliced parameter declaration of a def, block, or lambda:
    /// required, optional, rest, post, keyword, keyword-rest, block, in
    /// that order, skipping empty groups and the implicit trailing-comma
    /// rest marker.
    pub(crate) fn parameter_list(
        &mut self,
        parameters: Option<&ParametersNode>,
        ctx: &Context,
    ) -> Result<Vec<ast::Node>> {
        let Some(parameters) = parameters else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for node in &parameters.requireds {
            out.push(self.node(node, ctx)?);
        }
        for node in &parameters.optionals {
            out.push(self.node(node, ctx)?);
        }
        if let Some(rest) = parameters.rest.as_deref() {
            let implicit_rest = matches!(
                rest,
                cst::Node::RestParameter(r) if r.operator_loc.slice(self.source) == ","
            );
            if !implicit_rest {
                out.push(self.node(rest, ctx)?);
            }
        }
        for node in &parameters.posts {
            out.push(self.node(node, ctx)?);
        }
        for node in &parameters.keywords {
            out.push(self.node(node, ctx)?);
        }
        if let Some(keyword_rest) = parameters.keyword_rest.as_deref() {
            out.push(self.node(keyword_rest, ctx)?);
        }
        if let Some(block) = parameters.block.as_deref() {
            out.push(self.block_parameter(block));
        }
        Ok(out)
    }

    /// Pipe-delimited block parameters plus block-local shadows.
    fn block_parameter_list(
        &mut self,
        parameters: &BlockParametersNode,
        ctx: &Context,
    ) -> Result<Vec<ast::Node>> {
        let mut out = self.parameter_list(parameters.parameters.as_deref(), ctx)?;
        for local in &parameters.locals {
            out.push(self.node(local, ctx)?);
        }
        Ok(out)
    }

    // === Dispatch ===

    pub(crate) fn node(&mut self, node: &cst::Node, ctx: &Context) -> Result<ast::Node> {
        match node {
            cst::Node::AliasGlobalVariable(n) | cst::Node::AliasMethod(n) => self.alias(n, ctx),
            cst::Node::AlternationPattern(n) => self.alternation_pattern(n, ctx),
            cst::Node::And(n) => self.logical(LogicalOp::And, n, ctx),
            cst::Node::Arguments(_) => Err(structural(
                "arguments",
                "argument lists are spliced by their owning call",
            )),
            cst::Node::Array(n) => self.array(n, ctx),
            cst::Node::ArrayPattern(n) => self.array_pattern(n, ctx),
            cst::Node::Assoc(n) => self.assoc(n, ctx),
            cst::Node::AssocSplat(n) => self.assoc_splat(n, ctx),
            cst::Node::BackReferenceRead(n) => Ok(self.back_reference(n)),
            cst::Node::Begin(n) => self.begin(n, ctx),
            cst::Node::BlockArgument(n) => self.block_argument(n, ctx),
            cst::Node::BlockLocalVariable(n) => Ok(self.block_local_variable(n)),
            cst::Node::Block(_) => Err(structural(
                "block",
                "blocks are adopted by their owning call",
            )),
            cst::Node::BlockParameter(n) => Ok(self.block_parameter(n)),
            cst::Node::BlockParameters(_) => Err(structural(
                "block_parameters",
                "block parameter lists are spliced by their owning block",
            )),
            cst::Node::Break(n) => self.jump(KeywordCmd::Break, n, ctx),
            cst::Node::CallAndWrite(n)
            | cst::Node::CallOperatorWrite(n)
            | cst::Node::CallOrWrite(n) => self.call_write(n, ctx),
            cst::Node::Call(n) => self.call(n, ctx),
            cst::Node::CapturePattern(n) => self.capture_pattern(n, ctx),
            cst::Node::Case(n) => self.case(n, ctx),
            cst::Node::Class(n) => self.class(n, ctx),
            cst::Node::ClassVariableAndWrite(n)
            | cst::Node::ClassVariableOperatorWrite(n)
            | cst::Node::ClassVariableOrWrite(n) => {
                self.variable_op_write(n, ctx, |b, t| b.cvar(t))
            }
            cst::Node::ClassVariableRead(n) => {
                let t = self.token(n.location);
                Ok(self.builder.cvar(t))
            }
            cst::Node::ClassVariableTarget(n) => {
                let t = self.token(n.location);
                let read = self.builder.cvar(t);
                Ok(self.builder.assignable(read))
            }
            cst::Node::ClassVariableWrite(n) => self.variable_write(n, ctx, |b, t| b.cvar(t)),
            cst::Node::ConstantAndWrite(n)
            | cst::Node::ConstantOperatorWrite(n)
            | cst::Node::ConstantOrWrite(n) => {
                self.variable_op_write(n, ctx, |b, t| b.const_(t.0.clone(), t.1))
            }
            cst::Node::ConstantPathAndWrite(n)
            | cst::Node::ConstantPathOperatorWrite(n)
            | cst::Node::ConstantPathOrWrite(n) => self.constant_path_op_write(n, ctx),
            cst::Node::ConstantPath(n) => self.constant_path(n, ctx),
            cst::Node::ConstantPathTarget(n) => {
                let path = self.constant_path(n, ctx)?;
                Ok(self.builder.assignable(path))
            }
            cst::Node::ConstantPathWrite(n) => self.constant_path_write(n, ctx),
            cst::Node::ConstantRead(n) => {
                let span = self.span(n.location);
                Ok(self.builder.const_(n.name.clone(), span))
            }
            cst::Node::ConstantTarget(n) => {
                let span = self.span(n.location);
                let read = self.builder.const_(n.name.clone(), span);
                Ok(self.builder.assignable(read))
            }
            cst::Node::ConstantWrite(n) => {
                self.variable_write(n, ctx, |b, t| b.const_(t.0.clone(), t.1))
            }
            cst::Node::Def(n) => self.def(n, ctx),
            cst::Node::Defined(n) => self.defined(n, ctx),
            cst::Node::Else(n) => {
                let body = self.statements_opt(n.statements.as_deref(), ctx)?;
                body.ok_or_else(|| {
                    structural("else", "else clauses are absorbed by their owning construct")
                })
            }
            cst::Node::EmbeddedStatements(n) => self.embedded_statements(n, ctx),
            cst::Node::EmbeddedVariable(n) => self.node(&n.variable, ctx),
            cst::Node::Ensure(_) => Err(structural(
                "ensure",
                "ensure clauses are absorbed by their owning begin",
            )),
            cst::Node::False(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.boolean(false, t))
            }
            cst::Node::FindPattern(n) => self.find_pattern(n, ctx),
            cst::Node::FlipFlop(n) | cst::Node::Range(n) => self.range(n, ctx),
            cst::Node::Float(n) => {
                let span = self.span(n.location);
                let literal = self.builder.float(n.value, span);
                Ok(self.with_numeric_sign(n.location, literal))
            }
            cst::Node::For(n) => self.for_loop(n, ctx),
            cst::Node::ForwardingArguments(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.forwarded_args(t))
            }
            cst::Node::ForwardingParameter(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.forward_arg(t))
            }
            cst::Node::ForwardingSuper(n) => self.forwarding_super(n, ctx),
            cst::Node::GlobalVariableAndWrite(n)
            | cst::Node::GlobalVariableOperatorWrite(n)
            | cst::Node::GlobalVariableOrWrite(n) => {
                self.variable_op_write(n, ctx, |b, t| b.gvar(t))
            }
            cst::Node::GlobalVariableRead(n) => {
                let t = self.token(n.location);
                Ok(self.builder.gvar(t))
            }
            cst::Node::GlobalVariableTarget(n) => {
                let t = self.token(n.location);
                let read = self.builder.gvar(t);
                Ok(self.builder.assignable(read))
            }
            cst::Node::GlobalVariableWrite(n) => self.variable_write(n, ctx, |b, t| b.gvar(t)),
            cst::Node::Hash(n) => self.hash(n, ctx),
            cst::Node::HashPattern(n) => self.hash_pattern(n, ctx),
            cst::Node::If(n) => self.if_node(n, ctx),
            cst::Node::Imaginary(n) => {
                let span = self.span(n.location);
                let literal = self.builder.complex(n.value.clone(), span);
                Ok(self.with_numeric_sign(n.location, literal))
            }
            cst::Node::Implicit(_) => Err(structural(
                "implicit",
                "implicit values are read by their owning assoc",
            )),
            cst::Node::In(n) => self.in_arm(n, ctx),
            cst::Node::InstanceVariableAndWrite(n)
            | cst::Node::InstanceVariableOperatorWrite(n)
            | cst::Node::InstanceVariableOrWrite(n) => {
                self.variable_op_write(n, ctx, |b, t| b.ivar(t))
            }
            cst::Node::InstanceVariableRead(n) => {
                let t = self.token(n.location);
                Ok(self.builder.ivar(t))
            }
            cst::Node::InstanceVariableTarget(n) => {
                let t = self.token(n.location);
                let read = self.builder.ivar(t);
                Ok(self.builder.assignable(read))
            }
            cst::Node::InstanceVariableWrite(n) => self.variable_write(n, ctx, |b, t| b.ivar(t)),
            cst::Node::Integer(n) => {
                let span = self.span(n.location);
                let literal = self.builder.integer(n.value, span);
                Ok(self.with_numeric_sign(n.location, literal))
            }
            cst::Node::InterpolatedMatchLastLine(n)
            | cst::Node::InterpolatedRegularExpression(n) => {
                self.interpolated_regexp(n, ctx)
            }
            cst::Node::InterpolatedString(n) => self.interpolated_string(n, ctx),
            cst::Node::InterpolatedSymbol(n) => self.interpolated_symbol(n, ctx),
            cst::Node::InterpolatedXString(n) => self.interpolated_xstring(n, ctx),
            cst::Node::KeywordHash(n) => self.keyword_hash(n, ctx),
            cst::Node::KeywordParameter(n) => self.keyword_parameter(n, ctx),
            cst::Node::KeywordRestParameter(n) => Ok(self.keyword_rest_parameter(n)),
            cst::Node::Lambda(n) => self.lambda(n, ctx),
            cst::Node::LocalVariableAndWrite(n)
            | cst::Node::LocalVariableOperatorWrite(n)
            | cst::Node::LocalVariableOrWrite(n) => {
                self.variable_op_write(n, ctx, |b, t| b.ident(t))
            }
            cst::Node::LocalVariableRead(n) => {
                let t = self.token(n.location);
                Ok(self.builder.ident(t).updated(ast::AstKind::Lvar))
            }
            cst::Node::LocalVariableTarget(n) => Ok(self.local_variable_target(n, ctx)),
            cst::Node::LocalVariableWrite(n) => self.variable_write(n, ctx, |b, t| b.ident(t)),
            cst::Node::MatchLastLine(n) | cst::Node::RegularExpression(n) => {
                self.regexp(n, ctx)
            }
            cst::Node::MatchPredicate(n) => self.match_predicate(n, ctx),
            cst::Node::MatchRequired(n) => self.match_required(n, ctx),
            cst::Node::MatchWrite(n) => self.match_write(n, ctx),
            cst::Node::Missing(_) => Err(structural(
                "missing",
                "syntax-error placeholders cannot be translated",
            )),
            cst::Node::Module(n) => self.module(n, ctx),
            cst::Node::MultiTarget(n) => self.multi_target(n, ctx),
            cst::Node::MultiWrite(n) => self.multi_write(n, ctx),
            cst::Node::Next(n) => self.jump(KeywordCmd::Next, n, ctx),
            cst::Node::Nil(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.nil(t))
            }
            cst::Node::NoKeywordsParameter(n) => Ok(self.no_keywords_parameter(n)),
            cst::Node::NumberedReferenceRead(n) => {
                let span = self.span(n.location);
                Ok(self.builder.nth_ref(n.number, span))
            }
            cst::Node::OptionalParameter(n) => self.optional_parameter(n, ctx),
            cst::Node::Or(n) => self.logical(LogicalOp::Or, n, ctx),
            cst::Node::Parameters(_) => Err(structural(
                "parameters",
                "parameter lists are spliced by their owning definition",
            )),
            cst::Node::Parentheses(n) => self.parentheses(n, ctx),
            cst::Node::PinnedExpression(n) => self.pinned_expression(n, ctx),
            cst::Node::PinnedVariable(n) => self.pinned_variable(n, ctx),
            cst::Node::PostExecution(n) => self.execution_hook(n, ctx, false),
            cst::Node::PreExecution(n) => self.execution_hook(n, ctx, true),
            cst::Node::Program(n) => {
                let body = self.program(n, ctx)?;
                body.ok_or_else(|| {
                    structural("program", "an empty unit has no translatable root")
                })
            }
            cst::Node::Rational(n) => {
                let span = self.span(n.location);
                let literal = self.builder.rational(n.value.clone(), span);
                Ok(self.with_numeric_sign(n.location, literal))
            }
            cst::Node::Redo(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.keyword_cmd(KeywordCmd::Redo, t, None, vec![], None))
            }
            cst::Node::RequiredDestructuredParameter(n) => {
                self.required_destructured_parameter(n, ctx)
            }
            cst::Node::RequiredParameter(n) => {
                let t = self.token(n.location);
                Ok(self.builder.arg(t))
            }
            cst::Node::RescueModifier(n) => self.rescue_modifier(n, ctx),
            cst::Node::Rescue(_) => Err(structural(
                "rescue",
                "rescue clauses are absorbed by their owning begin",
            )),
            cst::Node::RestParameter(n) => Ok(self.rest_parameter(n)),
            cst::Node::Retry(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.keyword_cmd(KeywordCmd::Retry, t, None, vec![], None))
            }
            cst::Node::Return(n) => self.jump(KeywordCmd::Return, n, ctx),
            cst::Node::SelfExpression(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.self_expr(t))
            }
            cst::Node::SingletonClass(n) => self.singleton_class(n, ctx),
            cst::Node::SourceEncoding(loc) => {
                let t = self.token(*loc);
                let literal = self.builder.encoding_literal(t);
                Ok(self.builder.accessible(literal))
            }
            cst::Node::SourceFile(loc) => {
                let t = self.token(*loc);
                let literal = self.builder.file_literal(t);
                Ok(self.builder.accessible(literal))
            }
            cst::Node::SourceLine(loc) => {
                let t = self.token(*loc);
                let literal = self.builder.line_literal(t);
                Ok(self.builder.accessible(literal))
            }
            cst::Node::Splat(n) => self.splat(n, ctx),
            cst::Node::Statements(n) => {
                let body = self.statements_opt(Some(n), ctx)?;
                body.ok_or_else(|| structural("statements", "empty statement list"))
            }
            cst::Node::StringConcat(n) => self.string_concat(n, ctx),
            cst::Node::StringLiteral(n) => self.string(n, ctx),
            cst::Node::Super(n) => self.super_call(n, ctx),
            cst::Node::Symbol(n) => self.symbol(n),
            cst::Node::True(loc) => {
                let t = self.token(*loc);
                Ok(self.builder.boolean(true, t))
            }
            cst::Node::Undef(n) => self.undef(n, ctx),
            cst::Node::Unless(n) => self.unless(n, ctx),
            cst::Node::Until(n) => self.conditional_loop(LoopKind::Until, n, ctx),
            cst::Node::When(n) => self.when(n, ctx),
            cst::Node::While(n) => self.conditional_loop(LoopKind::While, n, ctx),
            cst::Node::XString(n) => self.xstring(n, ctx),
            cst::Node::Yield(n) => self.yield_call(n, ctx),
        }
    }

    // === Rules ===

    /// `alias foo bar` / `alias $foo $bar`
    fn alias(&mut self, n: &AliasNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let new_name = self.node(&n.new_name, ctx)?;
        let old_name = self.node(&n.old_name, ctx)?;
        Ok(self.builder.alias(keyword, new_name, old_name))
    }

    /// `foo => bar | baz`
    fn alternation_pattern(&mut self, n: &AlternationPatternNode, ctx: &Context) -> Result<ast::Node> {
        let left = self.node(&n.left, ctx)?;
        let operator = self.token(n.operator_loc);
        let right = self.node(&n.right, ctx)?;
        Ok(self.builder.match_alt(left, operator, right))
    }

    /// `a and b` / `a or b`: the operator range comes straight off the CST.
    fn logical(&mut self, op: LogicalOp, n: &BinaryBooleanNode, ctx: &Context) -> Result<ast::Node> {
        let left = self.node(&n.left, ctx)?;
        let operator = self.token(n.operator_loc);
        let right = self.node(&n.right, ctx)?;
        Ok(self.builder.logical_op(op, left, operator, right))
    }

    /// `[1, 2, 3]`
    fn array(&mut self, n: &ArrayNode, ctx: &Context) -> Result<ast::Node> {
        let opening = self.token_opt(n.opening_loc);
        let elements = self.nodes(&n.elements, ctx)?;
        let closing = self.token_opt(n.closing_loc);
        Ok(self.builder.array(opening, elements, closing))
    }

    /// `foo => [bar]` / `foo => Bar[baz]`
    fn array_pattern(&mut self, n: &ArrayPatternNode, ctx: &Context) -> Result<ast::Node> {
        let mut elements = self.nodes(&n.requireds, ctx)?;
        if let Some(rest) = n.rest.as_deref() {
            elements.push(self.node(rest, ctx)?);
        }
        elements.extend(self.nodes(&n.posts, ctx)?);

        if let Some(constant) = n.constant.as_deref() {
            let constant = self.node(constant, ctx)?;
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            let inner = self.builder.array_pattern(None, elements, None);
            Ok(self.builder.const_pattern(constant, opening, inner, closing))
        } else {
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            Ok(self.builder.array_pattern(opening, elements, closing))
        }
    }

    /// One hash entry in any of its spellings: rocket, label, quoted label,
    /// shorthand, or pattern binding.
    fn assoc(&mut self, n: &AssocNode, ctx: &Context) -> Result<ast::Node> {
        // `{ foo: }`: shorthand with the value implied from scope.
        if matches!(n.value.as_deref(), Some(cst::Node::Implicit(_))) {
            let cst::Node::Symbol(key) = n.key.as_ref() else {
                return Err(structural("assoc", "shorthand entries take a label key"));
            };
            let label_slice = key.location.slice(self.source);
            let name = SmolStr::new(label_slice.trim_end_matches(':'));
            let label_span = self.span(key.location);
            let name_span = Span::new(
                label_span.start,
                label_span.end - text_size::TextSize::from(1),
            );
            let value = if ctx.declared(&name) {
                let read = self.builder.ident((name.clone(), name_span));
                read.updated(ast::AstKind::Lvar)
            } else {
                self.builder
                    .call_method(None, None, Some((name.clone(), name_span)), None, vec![], None)
            };
            return Ok(self.builder.pair_label((name, label_span), value));
        }

        // `in { foo: }`: a binding, not an entry.
        if ctx.in_pattern() && n.value.is_none() {
            return match n.key.as_ref() {
                cst::Node::Symbol(key) => {
                    let span = self.span(key.location);
                    Ok(self
                        .builder
                        .match_hash_var(SmolStr::new(&key.unescaped), span))
                }
                cst::Node::InterpolatedSymbol(key) => {
                    match key.parts.as_slice() {
                        [part @ cst::Node::StringLiteral(_)] => {
                            let opening = self.token(key.opening_loc);
                            let part = self.node(part, ctx)?;
                            let closing = self.token(key.closing_loc);
                            Ok(self.builder.match_hash_var_from_str(opening, part, closing))
                        }
                        _ => Err(TranslateError::Unsupported {
                            construct: "interpolated hash-pattern key",
                        }),
                    }
                }
                _ => Err(structural("assoc", "hash-pattern bindings take a label key")),
            };
        }

        // `a => 1`
        if let Some(operator_loc) = n.operator_loc {
            let key = self.node(&n.key, ctx)?;
            let operator = self.token(operator_loc);
            let value = n.value.as_deref().ok_or_else(|| {
                structural("assoc", "a rocket entry always carries a value")
            })?;
            let value = self.node(value, ctx)?;
            return Ok(self.builder.pair(key, operator, value));
        }

        let value = n.value.as_deref().ok_or_else(|| {
            structural("assoc", "a label entry always carries a value")
        })?;

        // `a: 1`
        if let cst::Node::Symbol(key) = n.key.as_ref() {
            if key.opening_loc.is_none() {
                let span = self.span(key.location);
                let value = self.node(value, ctx)?;
                return Ok(self
                    .builder
                    .pair_keyword((SmolStr::new(&key.unescaped), span), value));
            }
        }

        // `"a": 1` / `"a#{b}": 1`
        let (opening_loc, parts, closing_loc) = match n.key.as_ref() {
            cst::Node::Symbol(key) => {
                let value_loc = key.value_loc.unwrap_or(key.location);
                let span = self.span(value_loc);
                let part = self.builder.string_internal(key.unescaped.clone(), span);
                (
                    key.opening_loc
                        .ok_or_else(|| structural("assoc", "a quoted label has its quote"))?,
                    vec![part],
                    key.closing_loc
                        .ok_or_else(|| structural("assoc", "a quoted label has its colon"))?,
                )
            }
            cst::Node::InterpolatedSymbol(key) => {
                let parts = self.nodes(&key.parts, ctx)?;
                (key.opening_loc, parts, key.closing_loc)
            }
            _ => return Err(structural("assoc", "unexpected hash key shape")),
        };
        let opening = self.token(opening_loc);
        let closing = self.token(closing_loc);
        let value = self.node(value, ctx)?;
        Ok(self.builder.pair_quoted(opening, parts, closing, value))
    }

    /// `{ **foo }` / `bar(**)`
    fn assoc_splat(&mut self, n: &AssocSplatNode, ctx: &Context) -> Result<ast::Node> {
        match n.value.as_deref() {
            None if ctx.declared("**") => {
                let operator = self.token(n.operator_loc);
                Ok(self.builder.forwarded_kwrestarg(operator))
            }
            Some(value) => {
                let operator = self.token(n.operator_loc);
                let value = self.node(value, ctx)?;
                Ok(self.builder.kwsplat(operator, value))
            }
            None => Err(structural(
                "assoc_splat",
                "a bare ** forwards only inside a scope that declares it",
            )),
        }
    }

    /// `$+`
    fn back_reference(&mut self, n: &VariableRefNode) -> ast::Node {
        let t = self.token(n.location);
        self.builder.back_ref(t)
    }

    /// `begin ... rescue ... else ... ensure ... end`, and the keyword-less
    /// begin bodies of defs.
    fn begin(&mut self, n: &BeginNode, ctx: &Context) -> Result<ast::Node> {
        let mut rescue_bodies = Vec::new();
        let mut rescue_clause = n.rescue_clause.as_deref();
        while let Some(clause) = rescue_clause {
            // The `;` separating the rescue head from its body has no CST
            // field; scan for it after the last piece of the head.
            let find_start = clause
                .reference
                .as_deref()
                .map(|reference| reference.location().end)
                .or_else(|| clause.exceptions.last().map(|e| e.location().end))
                .unwrap_or(clause.keyword_loc.end);
            let find_end = clause
                .statements
                .as_deref()
                .map(|statements| statements.location.start)
                .or_else(|| clause.consequent.as_deref().map(|c| c.location.start))
                .unwrap_or(find_start + 1);

            let keyword = self.token(clause.keyword_loc);
            let exc_list = if clause.exceptions.is_empty() {
                None
            } else {
                let exceptions = self.nodes(&clause.exceptions, ctx)?;
                Some(self.builder.array(None, exceptions, None))
            };
            let assoc = self.token_opt(clause.operator_loc);
            let reference = self.node_opt(clause.reference.as_deref(), ctx)?;
            let then = self.find_token(find_start, find_end, &[";"]);
            let body = self.statements_opt(clause.statements.as_deref(), ctx)?;
            rescue_bodies.push(
                self.builder
                    .rescue_body(keyword, exc_list, assoc, reference, then, body),
            );

            rescue_clause = clause.consequent.as_deref();
        }

        let compound = self.statements_opt(n.statements.as_deref(), ctx)?;
        let else_tok = self.token_opt(n.else_clause.as_deref().map(|e| e.else_keyword_loc));
        let else_body = match n.else_clause.as_deref() {
            Some(clause) => self.statements_opt(clause.statements.as_deref(), ctx)?,
            None => None,
        };
        let ensure_tok = self.token_opt(n.ensure_clause.as_deref().map(|e| e.ensure_keyword_loc));
        let ensure_body = match n.ensure_clause.as_deref() {
            Some(clause) => self.statements_opt(clause.statements.as_deref(), ctx)?,
            None => None,
        };

        let begin_body = self.builder.begin_body(
            compound,
            rescue_bodies,
            else_tok,
            else_body,
            ensure_tok,
            ensure_body,
        );

        if let Some(begin_keyword_loc) = n.begin_keyword_loc {
            let begin_tok = self.token(begin_keyword_loc);
            let end_loc = n.end_keyword_loc.ok_or_else(|| {
                structural("begin", "a begin keyword is closed by its end keyword")
            })?;
            let end_tok = self.token(end_loc);
            Ok(self.builder.begin_keyword(begin_tok, begin_body, end_tok))
        } else {
            begin_body.ok_or_else(|| structural("begin", "a keyword-less begin has a body"))
        }
    }

    /// `foo(&bar)`
    fn block_argument(&mut self, n: &BlockArgumentNode, ctx: &Context) -> Result<ast::Node> {
        let operator = self.token(n.operator_loc);
        let value = self.node_opt(n.expression.as_deref(), ctx)?;
        Ok(self.builder.block_pass(operator, value))
    }

    /// `foo { |; bar| }`
    fn block_local_variable(&mut self, n: &VariableRefNode) -> ast::Node {
        let t = self.token(n.location);
        self.builder.shadowarg(t)
    }

    /// `def foo(&bar); end`
    fn block_parameter(&mut self, n: &BlockParameterNode) -> ast::Node {
        let operator = self.token(n.operator_loc);
        let name = self.token_opt(n.name_loc);
        self.builder.blockarg(operator, name)
    }

    /// `break` / `next foo` / `return 1`
    fn jump(&mut self, cmd: KeywordCmd, n: &JumpNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let arguments = self.argument_list(n.arguments.as_deref(), ctx)?;
        Ok(self.builder.keyword_cmd(cmd, keyword, None, arguments, None))
    }

    /// A call in any surface spelling. The shape is classified before a
    /// node is emitted: negation, index read, index write, attribute write,
    /// or an ordinary send; a trailing block literal is detached from
    /// the argument list and adopted as the call's block.
    fn call(&mut self, n: &CallNode, ctx: &Context) -> Result<ast::Node> {
        let mut argument_refs: Vec<&cst::Node> = n
            .arguments
            .as_deref()
            .map(|arguments| arguments.arguments.iter().collect())
            .unwrap_or_default();
        let mut block: Option<&BlockNode> = None;
        match n.block.as_deref() {
            Some(passed @ cst::Node::BlockArgument(_)) => argument_refs.push(passed),
            Some(cst::Node::Block(literal)) => block = Some(literal),
            Some(_) => {
                return Err(structural(
                    "call",
                    "a call block is a block literal or a block argument",
                ))
            }
            None => {}
        }

        let message = n.message_loc.map(|loc| loc.slice(self.source));

        let call = if matches!(message, Some("not") | Some("!")) {
            let message_loc = n.message_loc.ok_or_else(|| {
                structural("call", "negation always has its message token")
            })?;
            let not_tok = self.token(message_loc);
            let opening = self.token_opt(n.opening_loc);
            let receiver = self.node_opt(n.receiver.as_deref(), ctx)?;
            let closing = self.token_opt(n.closing_loc);
            self.builder.not_op(not_tok, opening, receiver, closing)
        } else if n.name == "[]" {
            let receiver = n.receiver.as_deref().ok_or_else(|| {
                structural("call", "an index read always has a receiver")
            })?;
            let receiver = self.node(receiver, ctx)?;
            let opening = self.token_opt(n.opening_loc);
            let mut indexes = Vec::with_capacity(argument_refs.len());
            for argument in &argument_refs {
                indexes.push(self.node(argument, ctx)?);
            }
            let closing = self.token_opt(n.closing_loc);
            self.builder.index(receiver, opening, indexes, closing)
        } else if n.name == "[]="
            && message != Some("[]=")
            && n.arguments.is_some()
            && n.block.is_none()
        {
            return self.index_write(n, ctx);
        } else if n.name.ends_with('=')
            && matches!(message, Some(m) if !m.ends_with('='))
            && n.arguments.is_some()
            && n.block.is_none()
        {
            return self.attribute_write(n, ctx);
        } else {
            let receiver = self.node_opt(n.receiver.as_deref(), ctx)?;
            let dot = self.call_operator(n.call_operator_loc)?;
            let selector = n
                .message_loc
                .map(|loc| (n.name.clone(), self.span(loc)));
            let opening = self.token_opt(n.opening_loc);
            let mut arguments = Vec::with_capacity(argument_refs.len());
            for argument in &argument_refs {
                arguments.push(self.node(argument, ctx)?);
            }
            let closing = self.token_opt(n.closing_loc);
            self.builder
                .call_method(receiver, dot, selector, opening, arguments, closing)
        };

        self.attach_block(call, block, ctx)
    }

    /// `recv[args] = value`: the `=` has no CST field and is scanned for
    /// between the end of the message and the start of the value.
    fn index_write(&mut self, n: &CallNode, ctx: &Context) -> Result<ast::Node> {
        let arguments = n.arguments.as_deref().ok_or_else(|| {
            structural("call", "an index write carries its arguments")
        })?;
        let (value, indexes) = arguments.arguments.split_last().ok_or_else(|| {
            structural("call", "an index write assigns its final argument")
        })?;
        let message_loc = n.message_loc.ok_or_else(|| {
            structural("call", "an index write has its bracket range")
        })?;

        let receiver = self.node_opt(n.receiver.as_deref(), ctx)?;
        let receiver = receiver.ok_or_else(|| {
            structural("call", "an index write always has a receiver")
        })?;
        let opening = self.token_opt(n.opening_loc);
        let indexes = self.nodes(indexes, ctx)?;
        let closing = self.token_opt(n.closing_loc);
        let target = self.builder.index_asgn(receiver, opening, indexes, closing);

        let eql = self
            .find_token(message_loc.end, value.location().start, &["="])
            .ok_or_else(|| {
                structural("call", "an index write has an assignment operator")
            })?;
        let value = self.node(value, ctx)?;
        Ok(self.builder.assign(target, eql, value))
    }

    /// `recv.attr = value`: same scanned-operator technique as
    /// [`Self::index_write`].
    fn attribute_write(&mut self, n: &CallNode, ctx: &Context) -> Result<ast::Node> {
        let arguments = n.arguments.as_deref().ok_or_else(|| {
            structural("call", "an attribute write carries its argument")
        })?;
        let value = arguments.arguments.last().ok_or_else(|| {
            structural("call", "an attribute write assigns its final argument")
        })?;
        let message_loc = n.message_loc.ok_or_else(|| {
            structural("call", "an attribute write has its message range")
        })?;

        let receiver = self.node_opt(n.receiver.as_deref(), ctx)?;
        let dot = self.call_operator(n.call_operator_loc)?;
        let selector = {
            let text = SmolStr::new(message_loc.slice(self.source));
            (text, self.span(message_loc))
        };
        let target = self.builder.attr_asgn(receiver, dot, selector);

        let eql = self
            .find_token(message_loc.end, arguments.location.start, &["="])
            .ok_or_else(|| {
                structural("call", "an attribute write has an assignment operator")
            })?;
        let value = self.node(value, ctx)?;
        Ok(self.builder.assign(target, eql, value))
    }

    /// `foo.bar += baz` / `foo[bar] ||= baz`
    fn call_write(&mut self, n: &CallWriteNode, ctx: &Context) -> Result<ast::Node> {
        let target = if n.read_name == "[]" {
            let receiver = n.receiver.as_deref().ok_or_else(|| {
                structural("call", "an index write always has a receiver")
            })?;
            let receiver = self.node(receiver, ctx)?;
            let opening = self.token_opt(n.opening_loc);
            let indexes = self.argument_list(n.arguments.as_deref(), ctx)?;
            let closing = self.token_opt(n.closing_loc);
            self.builder.index(receiver, opening, indexes, closing)
        } else {
            let receiver = self.node_opt(n.receiver.as_deref(), ctx)?;
            let dot = self.call_operator(n.call_operator_loc)?;
            let selector = n
                .message_loc
                .map(|loc| (n.read_name.clone(), self.span(loc)));
            let opening = self.token_opt(n.opening_loc);
            let arguments = self.argument_list(n.arguments.as_deref(), ctx)?;
            let closing = self.token_opt(n.closing_loc);
            self.builder
                .call_method(receiver, dot, selector, opening, arguments, closing)
        };

        let operator = self.op_token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.op_assign(target, operator, value))
    }

    /// `foo => bar => baz`
    fn capture_pattern(&mut self, n: &CapturePatternNode, ctx: &Context) -> Result<ast::Node> {
        let value = self.node(&n.value, ctx)?;
        let operator = self.token(n.operator_loc);
        let target = self.node(&n.target, ctx)?;
        Ok(self.builder.match_as(value, operator, target))
    }

    /// `case/when` and `case/in`: told apart by the first arm.
    fn case(&mut self, n: &CaseNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.case_keyword_loc);
        let predicate = self.node_opt(n.predicate.as_deref(), ctx)?;
        let conditions = self.nodes(&n.conditions, ctx)?;
        let else_tok = self.token_opt(n.consequent.as_deref().map(|e| e.else_keyword_loc));
        let else_body = match n.consequent.as_deref() {
            Some(clause) => self.statements_opt(clause.statements.as_deref(), ctx)?,
            None => None,
        };
        let end = self.token(n.end_keyword_loc);

        if matches!(n.conditions.first(), Some(cst::Node::When(_))) {
            Ok(self
                .builder
                .case(keyword, predicate, conditions, else_tok, else_body, end))
        } else {
            Ok(self
                .builder
                .case_match(keyword, predicate, conditions, else_tok, else_body, end))
        }
    }

    /// `class Foo < Bar; end`
    fn class(&mut self, n: &ClassNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.class_keyword_loc);
        let name = self.node(&n.constant_path, ctx)?;
        let lt = self.token_opt(n.inheritance_operator_loc);
        let superclass = self.node_opt(n.superclass.as_deref(), ctx)?;
        let body_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.node_opt(n.body.as_deref(), &body_ctx)?;
        let end = self.token(n.end_keyword_loc);
        Ok(self.builder.def_class(keyword, name, lt, superclass, body, end))
    }

    /// Plain writes of a single variable or constant.
    fn variable_write(
        &mut self,
        n: &VariableWriteNode,
        ctx: &Context,
        make: impl Fn(&Builder, Tok) -> ast::Node,
    ) -> Result<ast::Node> {
        let name_tok = self.token(n.name_loc);
        let read = make(&self.builder, name_tok);
        let target = self.builder.assignable(read);
        let eql = self.token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.assign(target, eql, value))
    }

    /// Compound writes (`+=`, `&&=`, `||=`) of a single variable or
    /// constant; the operator's lexeme, `=`-stripped, selects the shape.
    fn variable_op_write(
        &mut self,
        n: &VariableWriteNode,
        ctx: &Context,
        make: impl Fn(&Builder, Tok) -> ast::Node,
    ) -> Result<ast::Node> {
        let name_tok = self.token(n.name_loc);
        let read = make(&self.builder, name_tok);
        let target = self.builder.assignable(read);
        let operator = self.op_token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.op_assign(target, operator, value))
    }

    /// `Foo::Bar`: global-scope roots have no parent.
    fn constant_path(&mut self, n: &ConstantPathNode, ctx: &Context) -> Result<ast::Node> {
        let name_span = self.span(n.name_loc);
        match n.parent.as_deref() {
            None => {
                let delimiter = self.token(n.delimiter_loc);
                Ok(self
                    .builder
                    .const_global(delimiter, n.name.clone(), name_span))
            }
            Some(parent) => {
                let parent = self.node(parent, ctx)?;
                let delimiter = self.token(n.delimiter_loc);
                Ok(self
                    .builder
                    .const_fetch(parent, delimiter, n.name.clone(), name_span))
            }
        }
    }

    /// `Foo::Bar = 1`
    fn constant_path_write(
        &mut self,
        n: &ConstantPathWriteNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let path = self.constant_path(&n.target, ctx)?;
        let target = self.builder.assignable(path);
        let eql = self.token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.assign(target, eql, value))
    }

    /// `Foo::Bar += baz` and the `&&=`/`||=` forms.
    fn constant_path_op_write(
        &mut self,
        n: &ConstantPathWriteNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let path = self.constant_path(&n.target, ctx)?;
        let target = self.builder.assignable(path);
        let operator = self.op_token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.op_assign(target, operator, value))
    }

    /// `def foo; end` in all four spellings: plain, singleton, endless,
    /// endless singleton.
    fn def(&mut self, n: &DefNode, ctx: &Context) -> Result<ast::Node> {
        let def_tok = self.token(n.def_keyword_loc);
        let name_tok = self.token(n.name_loc);
        let lparen = self.token_opt(n.lparen_loc);
        let params = self.parameter_list(n.parameters.as_deref(), ctx)?;
        let rparen = self.token_opt(n.rparen_loc);
        let args = self.builder.args(lparen, params, rparen);

        let definee = match n.receiver.as_deref() {
            None => None,
            // `def (foo).bar`: the receiver is whatever the parentheses hold.
            Some(cst::Node::Parentheses(parens)) => {
                let body = parens.body.as_deref().ok_or_else(|| {
                    structural("def", "a parenthesized singleton receiver is not empty")
                })?;
                Some(self.node(body, ctx)?)
            }
            Some(receiver) => Some(self.node(receiver, ctx)?),
        };

        let body_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.node_opt(n.body.as_deref(), &body_ctx)?;

        if let Some(equal_loc) = n.equal_loc {
            let assignment = self.token(equal_loc);
            match definee {
                Some(definee) => {
                    let dot = self.token_opt(n.operator_loc);
                    Ok(self.builder.def_endless_singleton(
                        def_tok, definee, dot, name_tok, args, assignment, body,
                    ))
                }
                None => Ok(self
                    .builder
                    .def_endless_method(def_tok, name_tok, args, assignment, body)),
            }
        } else {
            let end_loc = n.end_keyword_loc.ok_or_else(|| {
                structural("def", "a non-endless def is closed by its end keyword")
            })?;
            let end_tok = self.token(end_loc);
            match definee {
                Some(definee) => {
                    let dot = self.token_opt(n.operator_loc);
                    Ok(self
                        .builder
                        .def_singleton(def_tok, definee, dot, name_tok, args, body, end_tok))
                }
                None => Ok(self.builder.def_method(def_tok, name_tok, args, body, end_tok)),
            }
        }
    }

    /// `defined?(a)`
    fn defined(&mut self, n: &DefinedNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let lparen = self.token_opt(n.lparen_loc);
        let value = self.node(&n.value, ctx)?;
        let rparen = self.token_opt(n.rparen_loc);
        Ok(self
            .builder
            .keyword_cmd(KeywordCmd::Defined, keyword, lparen, vec![value], rparen))
    }

    /// `"foo #{bar}"`: the `#{bar}` part.
    fn embedded_statements(
        &mut self,
        n: &EmbeddedStatementsNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let body = self.statements_opt(n.statements.as_deref(), ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(self.builder.begin(opening, body, closing))
    }

    /// `foo => [*, bar, *]`
    fn find_pattern(&mut self, n: &FindPatternNode, ctx: &Context) -> Result<ast::Node> {
        let mut elements = Vec::with_capacity(n.requireds.len() + 2);
        elements.push(self.node(&n.left, ctx)?);
        elements.extend(self.nodes(&n.requireds, ctx)?);
        elements.push(self.node(&n.right, ctx)?);

        if let Some(constant) = n.constant.as_deref() {
            let constant = self.node(constant, ctx)?;
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            let inner = self.builder.find_pattern(None, elements, None);
            Ok(self.builder.const_pattern(constant, opening, inner, closing))
        } else {
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            Ok(self.builder.find_pattern(opening, elements, closing))
        }
    }

    /// `0..5`, `0...5`, and condition flip-flops.
    fn range(&mut self, n: &RangeNode, ctx: &Context) -> Result<ast::Node> {
        let left = self.node_opt(n.left.as_deref(), ctx)?;
        let operator = self.token(n.operator_loc);
        let right = self.node_opt(n.right.as_deref(), ctx)?;
        Ok(self.builder.range(n.exclude_end, left, operator, right))
    }

    /// `for foo in bar do ... end`: an elided `do` falls back to the
    /// statement separator.
    fn for_loop(&mut self, n: &ForNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.for_keyword_loc);
        let index = self.node(&n.index, ctx)?;
        let in_tok = self.token(n.in_keyword_loc);
        let collection = self.node(&n.collection, ctx)?;
        let do_tok = match n.do_keyword_loc {
            Some(loc) => Some(self.token(loc)),
            None => {
                let until = n
                    .statements
                    .as_deref()
                    .map(|statements| statements.location.start)
                    .unwrap_or(n.end_keyword_loc.start);
                self.find_token(n.collection.location().end, until, &[";"])
            }
        };
        let body = self.statements_opt(n.statements.as_deref(), ctx)?;
        let end = self.token(n.end_keyword_loc);
        Ok(self
            .builder
            .for_(keyword, index, in_tok, collection, do_tok, body, end))
    }

    /// `super` / `super {}`: implicit arguments.
    fn forwarding_super(&mut self, n: &ForwardingSuperNode, ctx: &Context) -> Result<ast::Node> {
        let keyword_span = self.span_offsets(n.location.start, n.location.start + 5);
        let call = self.builder.keyword_cmd(
            KeywordCmd::Zsuper,
            (SmolStr::new("super"), keyword_span),
            None,
            vec![],
            None,
        );
        self.attach_block(call, n.block.as_deref(), ctx)
    }

    /// `{ a: 1 }`
    fn hash(&mut self, n: &HashNode, ctx: &Context) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let elements = self.nodes(&n.elements, ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(self.builder.associate(Some(opening), elements, Some(closing)))
    }

    /// `foo(bar: baz)`: keyword arguments without braces.
    fn keyword_hash(&mut self, n: &KeywordHashNode, ctx: &Context) -> Result<ast::Node> {
        let elements = self.nodes(&n.elements, ctx)?;
        Ok(self.builder.associate(None, elements, None))
    }

    /// `foo => {}` / `foo => Bar[baz: 1]`
    fn hash_pattern(&mut self, n: &HashPatternNode, ctx: &Context) -> Result<ast::Node> {
        let assocs = self.nodes(&n.assocs, ctx)?;
        if let Some(constant) = n.constant.as_deref() {
            let constant = self.node(constant, ctx)?;
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            let inner = self.builder.hash_pattern(None, assocs, None);
            Ok(self.builder.const_pattern(constant, opening, inner, closing))
        } else {
            let opening = self.token_opt(n.opening_loc);
            let closing = self.token_opt(n.closing_loc);
            Ok(self.builder.hash_pattern(opening, assocs, closing))
        }
    }

    /// `if`/`elsif`, modifier `if`, and ternaries, told apart by the
    /// keyword's presence and whether it opens the whole construct.
    fn if_node(&mut self, n: &IfNode, ctx: &Context) -> Result<ast::Node> {
        let Some(if_keyword_loc) = n.if_keyword_loc else {
            return self.ternary(n, ctx);
        };

        if if_keyword_loc.start == n.location.start {
            let keyword = self.token(if_keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;

            let separator_end = n
                .statements
                .as_deref()
                .map(|statements| statements.location.start)
                .or_else(|| n.consequent.as_deref().map(|c| c.location().start))
                .or(n.end_keyword_loc.map(|loc| loc.start))
                .ok_or_else(|| {
                    structural("if", "a keyword conditional ends somewhere after its predicate")
                })?;
            let then_tok =
                self.find_token(n.predicate.location().end, separator_end, &[";", "then"]);

            let if_true = self.statements_opt(n.statements.as_deref(), ctx)?;
            let (else_tok, if_false) = match n.consequent.as_deref() {
                Some(chained @ cst::Node::If(elsif)) => {
                    let else_tok = self.token_opt(elsif.if_keyword_loc);
                    (else_tok, Some(self.node(chained, ctx)?))
                }
                Some(cst::Node::Else(else_clause)) => {
                    let else_tok = Some(self.token(else_clause.else_keyword_loc));
                    let body = self.statements_opt(else_clause.statements.as_deref(), ctx)?;
                    (else_tok, body)
                }
                Some(_) => {
                    return Err(structural(
                        "if",
                        "a conditional is followed by elsif or else only",
                    ))
                }
                None => (None, None),
            };

            // An elsif owns no end token; the outermost if does.
            let end_tok = if if_keyword_loc.slice(self.source) != "elsif" {
                self.token_opt(n.end_keyword_loc)
            } else {
                None
            };

            Ok(self
                .builder
                .condition(keyword, predicate, then_tok, if_true, else_tok, if_false, end_tok))
        } else {
            let if_true = self.statements_opt(n.statements.as_deref(), ctx)?;
            let if_false = match n.consequent.as_deref() {
                Some(cst::Node::Else(else_clause)) => {
                    self.statements_opt(else_clause.statements.as_deref(), ctx)?
                }
                Some(other) => Some(self.node(other, ctx)?),
                None => None,
            };
            let keyword = self.token(if_keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;
            Ok(self.builder.condition_mod(if_true, if_false, keyword, predicate))
        }
    }

    /// `foo ? bar : baz`: the `?` has no CST field and is scanned for.
    fn ternary(&mut self, n: &IfNode, ctx: &Context) -> Result<ast::Node> {
        let statements = n
            .statements
            .as_deref()
            .ok_or_else(|| structural("if", "a ternary has its true branch"))?;
        let question = self
            .find_token(n.predicate.location().end, statements.location.start, &["?"])
            .ok_or_else(|| structural("if", "a ternary has its question mark"))?;
        let cst::Node::Else(else_clause) = n
            .consequent
            .as_deref()
            .ok_or_else(|| structural("if", "a ternary has its false branch"))?
        else {
            return Err(structural("if", "a ternary's false branch is an else clause"));
        };

        let predicate = self.node(&n.predicate, ctx)?;
        let if_true = self
            .statements_opt(Some(statements), ctx)?
            .ok_or_else(|| structural("if", "a ternary has its true branch"))?;
        let colon = self.token(else_clause.else_keyword_loc);
        let if_false = self
            .statements_opt(else_clause.statements.as_deref(), ctx)?
            .ok_or_else(|| structural("if", "a ternary has its false branch"))?;
        Ok(self.builder.ternary(predicate, question, if_true, colon, if_false))
    }

    /// One `in` arm. Entering the pattern sets pattern mode; an embedded
    /// modifier conditional is peeled off into a guard first.
    fn in_arm(&mut self, n: &InNode, ctx: &Context) -> Result<ast::Node> {
        let pattern_ctx = ctx.entering_pattern();
        let (pattern, guard) = match n.pattern.as_ref() {
            cst::Node::If(guarded) => {
                let statements = guarded.statements.as_deref().ok_or_else(|| {
                    structural("in", "a guarded pattern wraps its pattern in statements")
                })?;
                let pattern = self
                    .statements_opt(Some(statements), &pattern_ctx)?
                    .ok_or_else(|| structural("in", "a guarded pattern is not empty"))?;
                let keyword_loc = guarded.if_keyword_loc.ok_or_else(|| {
                    structural("in", "an if guard has its keyword")
                })?;
                let keyword = self.token(keyword_loc);
                let predicate = self.node(&guarded.predicate, ctx)?;
                (pattern, Some(self.builder.if_guard(keyword, predicate)))
            }
            cst::Node::Unless(guarded) => {
                let statements = guarded.statements.as_deref().ok_or_else(|| {
                    structural("in", "a guarded pattern wraps its pattern in statements")
                })?;
                let pattern = self
                    .statements_opt(Some(statements), &pattern_ctx)?
                    .ok_or_else(|| structural("in", "a guarded pattern is not empty"))?;
                let keyword = self.token(guarded.keyword_loc);
                let predicate = self.node(&guarded.predicate, ctx)?;
                (pattern, Some(self.builder.unless_guard(keyword, predicate)))
            }
            pattern => (self.node(pattern, &pattern_ctx)?, None),
        };

        let separator_end = n
            .statements
            .as_deref()
            .map(|statements| statements.location.start)
            .unwrap_or(n.location.end);
        let then_tok = self.find_token(n.pattern.location().end, separator_end, &[";", "then"]);

        let in_tok = self.token(n.in_loc);
        let body = self.statements_opt(n.statements.as_deref(), ctx)?;
        Ok(self.builder.in_pattern(in_tok, pattern, guard, then_tok, body))
    }

    /// `/foo #{bar}/`: the closing token carries the delimiter and the
    /// option letters.
    fn interpolated_regexp(
        &mut self,
        n: &InterpolatedRegularExpressionNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let parts = self.nodes(&n.parts, ctx)?;
        let (delimiter, options) = self.regexp_closing(n.closing_loc)?;
        Ok(self.builder.regexp_compose(opening, parts, delimiter, options))
    }

    fn regexp_closing(&mut self, closing_loc: Location) -> Result<(Tok, ast::Node)> {
        let closing = closing_loc.slice(self.source);
        let delimiter = closing
            .get(..1)
            .ok_or_else(|| structural("regexp", "a regexp has its closing delimiter"))?;
        let delimiter_tok = (
            SmolStr::new(delimiter),
            self.span_offsets(closing_loc.start, closing_loc.start + 1),
        );
        let options_text = closing.get(1..).unwrap_or_default().to_string();
        let options_span = self.span_offsets(closing_loc.start + 1, closing_loc.end);
        let options = self.builder.regexp_options(&options_text, options_span);
        Ok((delimiter_tok, options))
    }

    /// `"foo #{bar}"`: heredoc-flavored openings take the heredoc path.
    fn interpolated_string(
        &mut self,
        n: &InterpolatedStringNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let heredoc = n
            .opening_loc
            .is_some_and(|loc| loc.slice(self.source).starts_with("<<"));
        if heredoc {
            let (opening_loc, closing_loc) = match (n.opening_loc, n.closing_loc) {
                (Some(opening), Some(closing)) => (opening, closing),
                _ => {
                    return Err(structural(
                        "string",
                        "a heredoc has its opening and closing markers",
                    ))
                }
            };
            let (children, closing) = self.heredoc_parts(&n.parts, closing_loc, opening_loc, ctx)?;
            let opening = self.token(opening_loc);
            return Ok(self.builder.string_compose(Some(opening), children, Some(closing)));
        }

        let opening = self.token_opt(n.opening_loc);
        let parts = self.nodes(&n.parts, ctx)?;
        let closing = self.token_opt(n.closing_loc);
        Ok(self.builder.string_compose(opening, parts, closing))
    }

    /// `:"foo #{bar}"`
    fn interpolated_symbol(
        &mut self,
        n: &InterpolatedDelimitedNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let parts = self.nodes(&n.parts, ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(self.builder.symbol_compose(opening, parts, closing))
    }

    /// `` `foo #{bar}` ``
    fn interpolated_xstring(
        &mut self,
        n: &InterpolatedDelimitedNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        if n.opening_loc.slice(self.source).starts_with("<<") {
            let (children, closing) =
                self.heredoc_parts(&n.parts, n.closing_loc, n.opening_loc, ctx)?;
            let opening = self.token(n.opening_loc);
            return Ok(self.builder.xstring_compose(opening, children, closing));
        }
        let opening = self.token(n.opening_loc);
        let parts = self.nodes(&n.parts, ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(self.builder.xstring_compose(opening, parts, closing))
    }

    /// `def foo(bar:)` / `def foo(bar: baz)`
    fn keyword_parameter(&mut self, n: &KeywordParameterNode, ctx: &Context) -> Result<ast::Node> {
        let label_span = self.span(n.name_loc);
        match n.value.as_deref() {
            Some(value) => {
                let value = self.node(value, ctx)?;
                Ok(self.builder.kwoptarg(n.name.clone(), label_span, value))
            }
            None => Ok(self.builder.kwarg(n.name.clone(), label_span)),
        }
    }

    /// `def foo(**bar)` / `def foo(**)`
    fn keyword_rest_parameter(&mut self, n: &KeywordRestParameterNode) -> ast::Node {
        let operator = self.token(n.operator_loc);
        let name = self.token_opt(n.name_loc);
        self.builder.kwrestarg(operator, name)
    }

    /// `-> (bar) { foo }`
    fn lambda(&mut self, n: &LambdaNode, ctx: &Context) -> Result<ast::Node> {
        let operator = self.token(n.operator_loc);
        let call = self.builder.call_lambda(operator);
        let begin_tok = self.token(n.opening_loc);
        let args = match n.parameters.as_deref() {
            Some(parameters) => {
                let opening = self.token_opt(parameters.opening_loc);
                let list = self.block_parameter_list(parameters, ctx)?;
                let closing = self.token_opt(parameters.closing_loc);
                self.builder.args(opening, list, closing)
            }
            None => self.builder.args(None, vec![], None),
        };
        let body_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.node_opt(n.body.as_deref(), &body_ctx)?;
        let end_tok = self.token(n.closing_loc);
        Ok(self.builder.block(call, begin_tok, args, body, end_tok))
    }

    /// `foo, = bar` / pattern captures; context picks the target shape.
    fn local_variable_target(&mut self, n: &VariableRefNode, ctx: &Context) -> ast::Node {
        if ctx.in_pattern() {
            let span = self.span(n.location);
            let var = self.builder.match_var(n.name.clone(), span);
            self.builder.assignable(var)
        } else {
            let t = self.token(n.location);
            let read = self.builder.ident(t);
            self.builder.assignable(read)
        }
    }

    /// `foo in bar`
    fn match_predicate(&mut self, n: &MatchNode, ctx: &Context) -> Result<ast::Node> {
        let value = self.node(&n.value, ctx)?;
        let operator = self.token(n.operator_loc);
        let pattern = self.node(&n.pattern, &ctx.entering_pattern())?;
        Ok(self.builder.match_pattern_p(value, operator, pattern))
    }

    /// `foo => bar`
    fn match_required(&mut self, n: &MatchNode, ctx: &Context) -> Result<ast::Node> {
        let value = self.node(&n.value, ctx)?;
        let operator = self.token(n.operator_loc);
        let pattern = self.node(&n.pattern, &ctx.entering_pattern())?;
        Ok(self.builder.match_pattern(value, operator, pattern))
    }

    /// `/(?<foo>foo)/ =~ bar`
    fn match_write(&mut self, n: &MatchWriteNode, ctx: &Context) -> Result<ast::Node> {
        let call = &n.call;
        let receiver = call
            .receiver
            .as_deref()
            .ok_or_else(|| structural("match_write", "the match operator has its pattern"))?;
        let receiver = self.node(receiver, ctx)?;
        let message_loc = call
            .message_loc
            .ok_or_else(|| structural("match_write", "the match operator has its range"))?;
        let operator = self.token(message_loc);
        let argument = call
            .arguments
            .as_deref()
            .and_then(|arguments| arguments.arguments.first())
            .ok_or_else(|| structural("match_write", "the match operator has its subject"))?;
        let argument = self.node(argument, ctx)?;
        Ok(self.builder.match_op(receiver, operator, argument))
    }

    /// `module Foo; end`
    fn module(&mut self, n: &ModuleNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.module_keyword_loc);
        let name = self.node(&n.constant_path, ctx)?;
        let body_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.node_opt(n.body.as_deref(), &body_ctx)?;
        let end = self.token(n.end_keyword_loc);
        Ok(self.builder.def_module(keyword, name, body, end))
    }

    /// A nested destructuring target list; single targets and implicit
    /// trailing-comma rests collapse onto the sole target.
    fn multi_target(&mut self, n: &MultiTargetNode, ctx: &Context) -> Result<ast::Node> {
        let collapse = n.targets.len() == 1
            || (n.targets.len() == 2
                && matches!(
                    n.targets.last(),
                    Some(cst::Node::Splat(splat))
                        if splat.operator_loc.slice(self.source) == ","
                ));
        if collapse {
            let first = n
                .targets
                .first()
                .ok_or_else(|| structural("multi_target", "a target list is not empty"))?;
            return self.node(first, ctx);
        }
        let lparen = self.token_opt(n.lparen_loc);
        let targets = self.nodes(&n.targets, ctx)?;
        let rparen = self.token_opt(n.rparen_loc);
        Ok(self.builder.multi_lhs(lparen, targets, rparen))
    }

    /// `foo, bar = baz`
    fn multi_write(&mut self, n: &MultiWriteNode, ctx: &Context) -> Result<ast::Node> {
        let lparen = self.token_opt(n.lparen_loc);
        let targets = self.nodes(&n.targets, ctx)?;
        let rparen = self.token_opt(n.rparen_loc);
        let lhs = self.builder.multi_lhs(lparen, targets, rparen);
        let eql = self.token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.multi_assign(lhs, eql, value))
    }

    /// `def foo(**nil)`
    fn no_keywords_parameter(&mut self, n: &NoKeywordsParameterNode) -> ast::Node {
        let operator = self.token(n.operator_loc);
        let keyword = self.token(n.keyword_loc);
        self.builder.kwnilarg(operator, keyword)
    }

    /// `def foo(bar = 1)`
    fn optional_parameter(&mut self, n: &OptionalParameterNode, ctx: &Context) -> Result<ast::Node> {
        let name = self.token(n.name_loc);
        let eql = self.token(n.operator_loc);
        let value = self.node(&n.value, ctx)?;
        Ok(self.builder.optarg(name, eql, value))
    }

    /// `(1)` / `()`
    fn parentheses(&mut self, n: &ParenthesesNode, ctx: &Context) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let body = self.node_opt(n.body.as_deref(), ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(self.builder.begin(opening, body, closing))
    }

    /// `foo => ^(bar)`
    fn pinned_expression(&mut self, n: &PinnedExpressionNode, ctx: &Context) -> Result<ast::Node> {
        let operator = self.token(n.operator_loc);
        let expression = self.node(&n.expression, ctx)?;
        Ok(self.builder.pin(operator, expression))
    }

    /// `foo = 1 and bar => ^foo`
    fn pinned_variable(&mut self, n: &PinnedVariableNode, ctx: &Context) -> Result<ast::Node> {
        let operator = self.token(n.operator_loc);
        let variable = self.node(&n.variable, ctx)?;
        Ok(self.builder.pin(operator, variable))
    }

    /// `BEGIN {}` / `END {}`
    fn execution_hook(
        &mut self,
        n: &ExecutionHookNode,
        ctx: &Context,
        pre: bool,
    ) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let opening = self.token(n.opening_loc);
        let body = self.statements_opt(n.statements.as_deref(), ctx)?;
        let closing = self.token(n.closing_loc);
        Ok(if pre {
            self.builder.preexe(keyword, opening, body, closing)
        } else {
            self.builder.postexe(keyword, opening, body, closing)
        })
    }

    /// The compilation-unit root.
    fn program(&mut self, n: &ProgramNode, ctx: &Context) -> Result<Option<ast::Node>> {
        let unit_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.nodes(&n.statements.body, &unit_ctx)?;
        Ok(self.builder.compstmt(body))
    }

    /// `/foo/i`
    fn regexp(&mut self, n: &RegularExpressionNode, _ctx: &Context) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let content = self.token(n.content_loc);
        let part = self.builder.string_internal(content.0.to_string(), content.1);
        let (delimiter, options) = self.regexp_closing(n.closing_loc)?;
        Ok(self
            .builder
            .regexp_compose(opening, vec![part], delimiter, options))
    }

    /// `def foo((bar, baz))`: children translate in destructure mode.
    fn required_destructured_parameter(
        &mut self,
        n: &RequiredDestructuredParameterNode,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let opening = self.token(n.opening_loc);
        let parameters = self.nodes(&n.parameters, &ctx.entering_destructure())?;
        let closing = self.token(n.closing_loc);
        Ok(self
            .builder
            .multi_lhs(Some(opening), parameters, Some(closing)))
    }

    /// `foo rescue bar`
    fn rescue_modifier(&mut self, n: &RescueModifierNode, ctx: &Context) -> Result<ast::Node> {
        let expression = self.node(&n.expression, ctx)?;
        let keyword = self.token(n.keyword_loc);
        let rescue_expression = self.node(&n.rescue_expression, ctx)?;
        let rescue_body = self
            .builder
            .rescue_body(keyword, None, None, None, None, Some(rescue_expression));
        let body = self
            .builder
            .begin_body(Some(expression), vec![rescue_body], None, None, None, None);
        body.ok_or_else(|| structural("rescue_modifier", "a rescue modifier wraps a body"))
    }

    /// `def foo(*bar)` / `def foo(*)`
    fn rest_parameter(&mut self, n: &RestParameterNode) -> ast::Node {
        let operator = self.token(n.operator_loc);
        let name = self.token_opt(n.name_loc);
        self.builder.restarg(operator, name)
    }

    /// `class << self; end`
    fn singleton_class(&mut self, n: &SingletonClassNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.class_keyword_loc);
        let operator = self.token(n.operator_loc);
        let expression = self.node(&n.expression, ctx)?;
        let body_ctx = ctx.with_locals(n.locals.iter().cloned());
        let body = self.node_opt(n.body.as_deref(), &body_ctx)?;
        let end = self.token(n.end_keyword_loc);
        Ok(self
            .builder
            .def_sclass(keyword, operator, expression, body, end))
    }

    /// `foo(*bar)` and the rest markers of destructures, patterns, and
    /// forwarding scopes; context picks the target shape.
    fn splat(&mut self, n: &SplatNode, ctx: &Context) -> Result<ast::Node> {
        if n.expression.is_none() && ctx.declared("*") {
            let operator = self.token(n.operator_loc);
            return Ok(self.builder.forwarded_restarg(operator));
        }
        if ctx.in_destructure() {
            let operator = self.token(n.operator_loc);
            let name = n
                .expression
                .as_deref()
                .map(|expression| self.token(expression.location()));
            return Ok(self.builder.restarg(operator, name));
        }
        if ctx.in_pattern() {
            let operator = self.token(n.operator_loc);
            let name = n
                .expression
                .as_deref()
                .map(|expression| self.token(expression.location()));
            return Ok(self.builder.match_rest(operator, name));
        }
        let operator = self.token(n.operator_loc);
        let value = self.node_opt(n.expression.as_deref(), ctx)?;
        Ok(self.builder.splat(operator, value))
    }

    /// `"foo" "bar"`
    fn string_concat(&mut self, n: &StringConcatNode, ctx: &Context) -> Result<ast::Node> {
        let left = self.node(&n.left, ctx)?;
        let right = self.node(&n.right, ctx)?;
        Ok(self.builder.word(vec![left, right]))
    }

    /// `"foo"`, `'foo'`, `?a`, and single-part heredocs.
    fn string(&mut self, n: &StringNode, ctx: &Context) -> Result<ast::Node> {
        let opening = n.opening_loc.map(|loc| loc.slice(self.source));

        if opening.is_some_and(|opening| opening.starts_with("<<")) {
            let (opening_loc, closing_loc) = match (n.opening_loc, n.closing_loc) {
                (Some(opening), Some(closing)) => (opening, closing),
                _ => {
                    return Err(structural(
                        "string",
                        "a heredoc has its opening and closing markers",
                    ))
                }
            };
            // Re-shape the plain literal as a single-fragment interpolation
            // so the line splitter sees a uniform parts list.
            let part = cst::Node::StringLiteral(StringNode {
                opening_loc: None,
                content_loc: n.content_loc,
                closing_loc: None,
                unescaped: n.unescaped.clone(),
                location: n.content_loc,
            });
            let parts = [part];
            let (children, closing) = self.heredoc_parts(&parts, closing_loc, opening_loc, ctx)?;
            let opening_tok = self.token(opening_loc);
            return Ok(self
                .builder
                .string_compose(Some(opening_tok), children, Some(closing)));
        }

        if opening == Some("?") {
            let span = self.span(n.location);
            return Ok(self.builder.character(n.unescaped.clone(), span));
        }

        let opening_tok = self.token_opt(n.opening_loc);
        let content_span = self.span(n.content_loc);
        let part = self.builder.string_internal(n.unescaped.clone(), content_span);
        let closing_tok = self.token_opt(n.closing_loc);
        Ok(self.builder.string_compose(opening_tok, vec![part], closing_tok))
    }

    /// `super(foo)`: explicit arguments.
    fn super_call(&mut self, n: &SuperNode, ctx: &Context) -> Result<ast::Node> {
        let mut argument_refs: Vec<&cst::Node> = n
            .arguments
            .as_deref()
            .map(|arguments| arguments.arguments.iter().collect())
            .unwrap_or_default();
        let mut block: Option<&BlockNode> = None;
        match n.block.as_deref() {
            Some(passed @ cst::Node::BlockArgument(_)) => argument_refs.push(passed),
            Some(cst::Node::Block(literal)) => block = Some(literal),
            Some(_) => {
                return Err(structural(
                    "super",
                    "a super block is a block literal or a block argument",
                ))
            }
            None => {}
        }

        let keyword = self.token(n.keyword_loc);
        let lparen = self.token_opt(n.lparen_loc);
        let mut arguments = Vec::with_capacity(argument_refs.len());
        for argument in &argument_refs {
            arguments.push(self.node(argument, ctx)?);
        }
        let rparen = self.token_opt(n.rparen_loc);
        let call = self
            .builder
            .keyword_cmd(KeywordCmd::Super, keyword, lparen, arguments, rparen);
        self.attach_block(call, block, ctx)
    }

    /// `:foo`, `:"foo"`, bare word-list symbols.
    fn symbol(&mut self, n: &SymbolNode) -> Result<ast::Node> {
        if n.closing_loc.is_none() {
            let span = self.span(n.location);
            return Ok(if n.opening_loc.is_none() {
                self.builder.symbol_internal(SmolStr::new(&n.unescaped), span)
            } else {
                self.builder.symbol(SmolStr::new(&n.unescaped), span)
            });
        }

        let opening_loc = n
            .opening_loc
            .ok_or_else(|| structural("symbol", "a quoted symbol has its opening quote"))?;
        let closing_loc = n
            .closing_loc
            .ok_or_else(|| structural("symbol", "a quoted symbol has its closing quote"))?;
        let value_span = self.span(n.value_loc.unwrap_or(n.location));
        let part = self.builder.string_internal(n.unescaped.clone(), value_span);
        let opening = self.token(opening_loc);
        let closing = self.token(closing_loc);
        Ok(self.builder.symbol_compose(opening, vec![part], closing))
    }

    /// `undef foo, :bar`
    fn undef(&mut self, n: &UndefNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let names = self.nodes(&n.names, ctx)?;
        Ok(self.builder.undef_method(keyword, names))
    }

    /// `unless foo; bar end` / `bar unless foo`: the true branch of the
    /// produced conditional is the else clause.
    fn unless(&mut self, n: &UnlessNode, ctx: &Context) -> Result<ast::Node> {
        if n.keyword_loc.start == n.location.start {
            let keyword = self.token(n.keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;

            let separator_end = n
                .statements
                .as_deref()
                .map(|statements| statements.location.start)
                .or_else(|| n.consequent.as_deref().map(|c| c.location.start))
                .or(n.end_keyword_loc.map(|loc| loc.start))
                .ok_or_else(|| {
                    structural("unless", "a keyword unless ends somewhere after its predicate")
                })?;
            let then_tok =
                self.find_token(n.predicate.location().end, separator_end, &[";", "then"]);

            let if_true = match n.consequent.as_deref() {
                Some(clause) => self.statements_opt(clause.statements.as_deref(), ctx)?,
                None => None,
            };
            let else_tok = self.token_opt(n.consequent.as_deref().map(|c| c.else_keyword_loc));
            let if_false = self.statements_opt(n.statements.as_deref(), ctx)?;
            let end_tok = self.token_opt(n.end_keyword_loc);
            Ok(self
                .builder
                .condition(keyword, predicate, then_tok, if_true, else_tok, if_false, end_tok))
        } else {
            let if_true = match n.consequent.as_deref() {
                Some(clause) => self.statements_opt(clause.statements.as_deref(), ctx)?,
                None => None,
            };
            let if_false = self.statements_opt(n.statements.as_deref(), ctx)?;
            let keyword = self.token(n.keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;
            Ok(self.builder.condition_mod(if_true, if_false, keyword, predicate))
        }
    }

    /// `while foo; bar end` / `bar while foo`: also `until`. Keyword form
    /// iff the keyword opens the whole construct.
    fn conditional_loop(&mut self, kind: LoopKind, n: &LoopNode, ctx: &Context) -> Result<ast::Node> {
        if n.location.start == n.keyword_loc.start {
            let keyword = self.token(n.keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;
            let closing_loc = n.closing_loc.ok_or_else(|| {
                structural("loop", "a keyword loop is closed by its end keyword")
            })?;
            let separator_end = n
                .statements
                .as_deref()
                .map(|statements| statements.location.start)
                .unwrap_or(closing_loc.start);
            let do_tok = self.find_token(n.predicate.location().end, separator_end, &[";", "do"]);
            let body = self.statements_opt(n.statements.as_deref(), ctx)?;
            let end = self.token(closing_loc);
            Ok(self.builder.loop_(kind, keyword, predicate, do_tok, body, end))
        } else {
            let body = self.statements_opt(n.statements.as_deref(), ctx)?;
            let keyword = self.token(n.keyword_loc);
            let predicate = self.node(&n.predicate, ctx)?;
            Ok(self.builder.loop_mod(kind, body, keyword, predicate))
        }
    }

    /// `case foo; when bar then baz; end`: one arm.
    fn when(&mut self, n: &WhenNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let conditions = self.nodes(&n.conditions, ctx)?;
        let last_condition_end = n
            .conditions
            .last()
            .map(|condition| condition.location().end)
            .ok_or_else(|| structural("when", "a when arm has at least one condition"))?;
        let separator_end = n
            .statements
            .as_deref()
            .map(|statements| statements.location.start)
            .unwrap_or(last_condition_end + 1);
        let then_tok = self.find_token(last_condition_end, separator_end, &[";", "then"]);
        let body = self.statements_opt(n.statements.as_deref(), ctx)?;
        Ok(self.builder.when(keyword, conditions, then_tok, body))
    }

    /// `` `foo` `` and command heredocs.
    fn xstring(&mut self, n: &XStringNode, ctx: &Context) -> Result<ast::Node> {
        if n.opening_loc.slice(self.source).starts_with("<<") {
            let part = cst::Node::StringLiteral(StringNode {
                opening_loc: None,
                content_loc: n.content_loc,
                closing_loc: None,
                unescaped: n.unescaped.clone(),
                location: n.content_loc,
            });
            let parts = [part];
            let (children, closing) =
                self.heredoc_parts(&parts, n.closing_loc, n.opening_loc, ctx)?;
            let opening = self.token(n.opening_loc);
            return Ok(self.builder.xstring_compose(opening, children, closing));
        }
        let opening = self.token(n.opening_loc);
        let content_span = self.span(n.content_loc);
        let part = self.builder.string_internal(n.unescaped.clone(), content_span);
        let closing = self.token(n.closing_loc);
        Ok(self.builder.xstring_compose(opening, vec![part], closing))
    }

    /// `yield` / `yield 1`
    fn yield_call(&mut self, n: &YieldNode, ctx: &Context) -> Result<ast::Node> {
        let keyword = self.token(n.keyword_loc);
        let lparen = self.token_opt(n.lparen_loc);
        let arguments = self.argument_list(n.arguments.as_deref(), ctx)?;
        let rparen = self.token_opt(n.rparen_loc);
        Ok(self
            .builder
            .keyword_cmd(KeywordCmd::Yield, keyword, lparen, arguments, rparen))
    }

    // === Shared pieces ===

    /// Adopts a block literal onto a call. A sole required parameter with
    /// nothing else expands arrays and becomes the special single-parameter
    /// shape.
    fn attach_block(
        &mut self,
        call: ast::Node,
        block: Option<&BlockNode>,
        ctx: &Context,
    ) -> Result<ast::Node> {
        let Some(block) = block else { return Ok(call) };

        let begin_tok = self.token(block.opening_loc);
        let end_tok = self.token(block.closing_loc);

        let args = match block.parameters.as_deref() {
            None => None,
            Some(parameters) => {
                let opening = self.token_opt(parameters.opening_loc);
                let closing = self.token_opt(parameters.closing_loc);
                let expanding = parameters
                    .parameters
                    .as_deref()
                    .filter(|inner| expands_to_procarg0(inner));
                let list = match expanding {
                    Some(inner) => {
                        let sole = inner.requireds.first().ok_or_else(|| {
                            structural("block", "an expanding parameter list has its parameter")
                        })?;
                        let sole = self.node(sole, ctx)?;
                        let mut list = vec![self.builder.procarg0(sole)];
                        for local in &parameters.locals {
                            list.push(self.node(local, ctx)?);
                        }
                        list
                    }
                    None => self.block_parameter_list(parameters, ctx)?,
                };
                self.builder.args(opening, list, closing)
            }
        };

        let body = self.node_opt(block.body.as_deref(), ctx)?;
        Ok(self.builder.block(call, begin_tok, args, body, end_tok))
    }

    /// Wraps a numeric literal whose lexeme carries an explicit sign; the
    /// operator range is exactly the sign character.
    fn with_numeric_sign(&mut self, loc: Location, literal: ast::Node) -> ast::Node {
        let slice = loc.slice(self.source);
        if slice.starts_with('+') || slice.starts_with('-') {
            let sign = SmolStr::new(&slice[..1]);
            let sign_span = self.span_offsets(loc.start, loc.start + 1);
            self.builder.unary_num((sign, sign_span), literal)
        } else {
            literal
        }
    }
}

/// True when a block's parameter list is exactly one required parameter,
/// which expands array arguments.
fn expands_to_procarg0(parameters: &ParametersNode) -> bool {
    parameters.requireds.len() == 1
        && parameters.optionals.is_empty()
        && parameters.rest.is_none()
        && parameters.posts.is_empty()
        && parameters.keywords.is_empty()
        && parameters.keyword_rest.is_none()
        && parameters.block.is_none()
}
