use super::super::lexer::token::{Token, TokenValue};
use super::super::lexer::token_kind::TokenKind;
use super::error::{ParseResult, ParserError, ParserErrorKind};
use super::expr::{
    Binary, BinaryOp, Call, Expr, ExprKind, FieldAccess, Identifier, Literal, Subscript, Unary,
    UnaryOp,
};
use super::stmt::{
    Block, Branch, ElseBlock, ExprStmt, Function, FunctionDecl, ReturnStmt, Stmt, StmtKind,
    StructDecl, WhileStmt,
};
use super::utils::{
    is_statement_start, AND_OPERATORS, ASSIGNMENT_OPERATORS, COMPARISON_OPERATORS,
    FUNCTION_BODY_MARKERS, OR_OPERATORS, POWER_OPERATORS, PRODUCT_OPERATORS, SUM_OPERATORS,
};
use crate::kit::lexer::{LexErrorKind, Lexer, TokenSource};
use sable_config::{LexerConfig, ParserConfig};
use std::mem;

use tracing::{debug, trace};

const TARGET: &str = "sable::parser";

/// 一个产生式
type Production<S> = fn(&mut Parser<S>) -> ParseResult<Expr>;

/// 有序备选中的一个分支：不匹配时返回 `Ok(None)`
type Alternative<S> = fn(&mut Parser<S>) -> ParseResult<Option<Expr>>;

/// 递归下降解析器
///
/// 持有 `current`/`next` 两个 token 的预读窗口，按需从 token 来源拉取。
/// 到达 EOF 后不再向来源请求 token。
pub struct Parser<S: TokenSource = Lexer> {
    source: S,
    current: Token,
    next: Token,
    /// 已消费的 token 数，用于判断错误恢复是否前进
    consumed: usize,
    /// 已消费的 `Indent` 减去已消费的 `Dedent`
    open_blocks: usize,
    /// 当前嵌套的块与表达式层数
    nesting: usize,
    errors: Vec<ParserError>,
    config: ParserConfig,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> ParseResult<Self> {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(mut source: S, config: ParserConfig) -> ParseResult<Self> {
        let current = source.next_token()?;
        let next = if current.is(TokenKind::Eof) {
            current.clone()
        } else {
            source.next_token()?
        };
        Ok(Self {
            source,
            current,
            next,
            consumed: 0,
            open_blocks: 0,
            nesting: 0,
            errors: Vec::new(),
            config,
        })
    }

    /// 解析整个输入
    ///
    /// 可恢复的错误记录在 `errors()` 中；返回 `Err` 表示无法产出任何 AST。
    pub fn parse(&mut self) -> ParseResult<Block> {
        self.start()
    }

    /// 已记录的错误
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ParserError> {
        mem::take(&mut self.errors)
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    // ==================== token 操作 ====================

    /// 消费当前 token 并返回它
    pub fn advance(&mut self) -> ParseResult<Token> {
        let following = if self.next.is(TokenKind::Eof) {
            self.next.clone()
        } else {
            self.source.next_token()?
        };
        let next = mem::replace(&mut self.next, following);
        let consumed = mem::replace(&mut self.current, next);
        match consumed.kind {
            TokenKind::Eof => return Ok(consumed),
            TokenKind::Indent => self.open_blocks += 1,
            TokenKind::Dedent => self.open_blocks = self.open_blocks.saturating_sub(1),
            _ => {}
        }
        self.consumed += 1;
        Ok(consumed)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.next.is(kind)
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current.kind)
    }

    fn error_here(&self, expected: &[TokenKind]) -> ParserError {
        ParserError::unexpected(expected, &self.current)
    }

    /// 期望当前 token 为 `kind`，消费并返回它
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        self.expect_one_of(&[kind])
    }

    pub fn expect_one_of(&mut self, kinds: &[TokenKind]) -> ParseResult<Token> {
        if self.check_any(kinds) {
            self.advance()
        } else {
            Err(self.error_here(kinds))
        }
    }

    // ==================== 错误记录与恢复 ====================

    fn record(&mut self, err: ParserError) -> ParseResult<()> {
        debug!(target: TARGET, error = %err, "Recorded parse error");
        self.errors.push(err);
        if self.errors.len() > self.config.max_errors {
            let position = self.current.position;
            return Err(ParserError::new(
                ParserErrorKind::TooManyErrors(self.errors.len()),
                position,
            ));
        }
        Ok(())
    }

    /// 记录失败语句的错误并跳到同步点
    ///
    /// `start`/`open_blocks` 是失败语句开始时的快照。语句自己打开但未关闭的块
    /// 在同步时一并跳过。
    fn recover(&mut self, err: ParserError, start: usize, open_blocks: usize) -> ParseResult<()> {
        if err.is_fatal() || !self.config.recover {
            return Err(err);
        }
        self.record(err)?;
        let depth = self.open_blocks.saturating_sub(open_blocks);
        self.synchronize(start, depth)
    }

    /// 跳过 token 直到下一个语句边界
    ///
    /// 同步点（只在嵌套深度 0 生效）：`Newline` 之后（若后面跟着孤立的缩进块则连同块一起跳过）、
    /// 语句起始关键字、当前块的 `Dedent`、EOF。`depth` 为起始时已经身处其中的块数。
    fn synchronize(&mut self, start: usize, mut depth: usize) -> ParseResult<()> {
        let mut progressed = self.consumed != start;

        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Dedent if depth == 0 => break,
                TokenKind::Dedent => {
                    depth -= 1;
                    self.advance()?;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Indent => {
                    depth += 1;
                    self.advance()?;
                }
                TokenKind::Newline if depth == 0 => {
                    self.advance()?;
                    if !self.check(TokenKind::Indent) {
                        break;
                    }
                }
                kind if depth == 0 && progressed && is_statement_start(kind) => break,
                _ => {
                    self.advance()?;
                }
            }
            progressed = true;
        }

        debug!(
            target: TARGET,
            line = self.current.position.line,
            column = self.current.position.column,
            resume_at = ?self.current.kind,
            "Resynchronized"
        );
        Ok(())
    }

    /// 在嵌套层数限制内运行 `production`
    fn nested<T>(&mut self, production: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.nesting >= self.config.max_depth {
            return Err(ParserError::new(
                ParserErrorKind::NestingTooDeep(self.config.max_depth),
                self.current.position,
            ));
        }
        self.nesting += 1;
        let result = production(self);
        self.nesting -= 1;
        result
    }

    // ==================== 语句 ====================

    /// `Indent (Statement)* Dedent EOF`
    ///
    /// 缺少起始 `Indent` 是不可恢复的错误。
    pub fn start(&mut self) -> ParseResult<Block> {
        if !self.check(TokenKind::Indent) {
            let err = self.error_here(&[TokenKind::Indent]);
            debug!(target: TARGET, error = %err, "Could not find start of input");
            return Err(err);
        }
        self.advance()?;
        let block = self.statements()?;
        self.expect(TokenKind::Dedent)?;
        self.expect(TokenKind::Eof)?;
        debug!(
            target: TARGET,
            statements = block.len(),
            errors = self.errors.len(),
            "Parse finished"
        );
        Ok(block)
    }

    /// `Indent (Statement)* Dedent`
    pub fn block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::Indent)?;
        let block = self.nested(Self::statements)?;
        self.expect(TokenKind::Dedent)?;
        Ok(block)
    }

    /// 解析到当前块结束，失败的语句被跳过
    fn statements(&mut self) -> ParseResult<Block> {
        let mut block = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            let (start, open_blocks) = (self.consumed, self.open_blocks);
            match self.statement() {
                Ok(stmt) => block.push(stmt),
                Err(err) => self.recover(err, start, open_blocks)?,
            }
        }
        Ok(block)
    }

    pub fn statement(&mut self) -> ParseResult<Stmt> {
        trace!(target: TARGET, kind = ?self.current.kind, line = self.current.position.line, "Parsing statement");
        match self.current.kind {
            TokenKind::Function => self.function(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Struct => self.struct_declaration(),
            _ => self.expression_statement(),
        }
    }

    /// `expression Newline`
    pub fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.expect(TokenKind::Newline)?;
        Ok(Box::new(StmtKind::Expr(ExprStmt { expression })))
    }

    /// `FunctionDecl (= | :) Newline Block`
    pub fn function(&mut self) -> ParseResult<Stmt> {
        let decl = self.function_decl()?;
        self.expect_one_of(FUNCTION_BODY_MARKERS)?;
        self.expect(TokenKind::Newline)?;
        let body = self.block()?;
        Ok(Box::new(StmtKind::Function(Function { decl, body })))
    }

    /// `func Identifier ( [parameters] ) [: Identifier]`
    ///
    /// 返回类型通过两个 token 的预读识别：`:` 后跟标识符。
    pub fn function_decl(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(TokenKind::Function)?;
        let name = self.identifier()?;
        self.expect(TokenKind::LParen)?;
        let parameters = if self.check(TokenKind::Identifier) {
            self.parameters()?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::RParen)?;

        let return_type = if self.check(TokenKind::Colon) && self.check_next(TokenKind::Identifier) {
            self.advance()?;
            Some(self.identifier()?)
        } else {
            None
        };

        Ok(FunctionDecl {
            name,
            parameters,
            return_type,
        })
    }

    /// `Identifier (, Identifier)*`
    pub fn parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut parameters = vec![self.identifier()?];
        while self.check(TokenKind::Comma) {
            self.advance()?;
            parameters.push(self.identifier()?);
        }
        Ok(parameters)
    }

    /// `if expression : Newline Block [elif ... | else : Newline Block]`
    pub fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        let branch = self.branch()?;
        Ok(Box::new(StmtKind::Branch(branch)))
    }

    /// `if`/`elif` 关键字之后的部分
    fn branch(&mut self) -> ParseResult<Branch> {
        let condition = self.expression()?;
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        let then_block = self.block()?;

        let else_block = match self.current.kind {
            TokenKind::ElseIf => {
                self.advance()?;
                ElseBlock::Branch(Box::new(self.branch()?))
            }
            TokenKind::Else => {
                self.advance()?;
                self.expect(TokenKind::Colon)?;
                self.expect(TokenKind::Newline)?;
                ElseBlock::Block(self.block()?)
            }
            _ => ElseBlock::Block(Vec::new()),
        };

        Ok(Branch {
            condition,
            then_block,
            else_block,
        })
    }

    /// `while expression : Newline Block`
    pub fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::While)?;
        let condition = self.expression()?;
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        let body = self.block()?;
        Ok(Box::new(StmtKind::While(WhileStmt { condition, body })))
    }

    /// `return [expression] Newline`
    pub fn return_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::Newline) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Newline)?;
        Ok(Box::new(StmtKind::Return(ReturnStmt { value })))
    }

    /// `struct Identifier : Newline Indent (Identifier Newline)* Dedent`
    pub fn struct_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Struct)?;
        let name = self.identifier()?;
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        let mut fields = Vec::new();
        while self.check(TokenKind::Identifier) {
            fields.push(self.identifier()?);
            self.expect(TokenKind::Newline)?;
        }
        self.expect(TokenKind::Dedent)?;
        Ok(Box::new(StmtKind::Struct(StructDecl { name, fields })))
    }

    // ==================== 表达式 ====================

    pub fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::assignment)
    }

    /// 先解析更紧的一层；若遇到本层运算符，右侧递归回本层
    ///
    /// 因此本层所有运算符都是右结合的。
    fn binary_level(
        &mut self,
        operators: &[TokenKind],
        operand: Production<S>,
        this: Production<S>,
    ) -> ParseResult<Expr> {
        let left = operand(self)?;
        let Some(op) = BinaryOp::from_token(self.current.kind).filter(|_| self.check_any(operators))
        else {
            return Ok(left);
        };
        self.advance()?;
        let right = this(self)?;
        Ok(Box::new(ExprKind::Binary(Binary { left, op, right })))
    }

    pub fn assignment(&mut self) -> ParseResult<Expr> {
        self.binary_level(ASSIGNMENT_OPERATORS, Self::or_expr, Self::assignment)
    }

    pub fn or_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(OR_OPERATORS, Self::and_expr, Self::or_expr)
    }

    pub fn and_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(AND_OPERATORS, Self::not_expr, Self::and_expr)
    }

    /// `not` 前缀，优先级低于比较
    pub fn not_expr(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Not) {
            self.advance()?;
            let operand = self.nested(Self::not_expr)?;
            return Ok(Box::new(ExprKind::Unary(Unary {
                op: UnaryOp::Not,
                operand,
            })));
        }
        self.comparison()
    }

    pub fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(COMPARISON_OPERATORS, Self::sum, Self::comparison)
    }

    pub fn sum(&mut self) -> ParseResult<Expr> {
        self.binary_level(SUM_OPERATORS, Self::product, Self::sum)
    }

    pub fn product(&mut self) -> ParseResult<Expr> {
        self.binary_level(PRODUCT_OPERATORS, Self::unary, Self::product)
    }

    /// `-x`，以及按 `not` 处理的孤立 `!`
    ///
    /// 孤立的 `!` 记录一个错误后继续解析；关闭恢复时直接失败。
    pub fn unary(&mut self) -> ParseResult<Expr> {
        let op = if self.check(TokenKind::Minus) {
            UnaryOp::Negate
        } else if self.current.error_kind() == Some(&LexErrorKind::StrayBang) {
            let err = ParserError::new(
                ParserErrorKind::Lexical(LexErrorKind::StrayBang),
                self.current.position,
            );
            if !self.config.recover {
                return Err(err);
            }
            self.record(err)?;
            UnaryOp::Not
        } else {
            return self.power();
        };
        self.advance()?;
        let operand = self.nested(Self::unary)?;
        Ok(Box::new(ExprKind::Unary(Unary { op, operand })))
    }

    /// `postfix ** unary`
    pub fn power(&mut self) -> ParseResult<Expr> {
        self.binary_level(POWER_OPERATORS, Self::postfix, Self::unary)
    }

    /// 调用、字段访问、下标
    pub fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.atom()?;
        loop {
            expr = match self.current.kind {
                TokenKind::LParen => {
                    self.advance()?;
                    let arguments = self.arguments()?;
                    self.expect(TokenKind::RParen)?;
                    Box::new(ExprKind::Call(Call {
                        callee: expr,
                        arguments,
                    }))
                }
                TokenKind::Dot => {
                    self.advance()?;
                    let field = self.identifier()?;
                    Box::new(ExprKind::FieldAccess(FieldAccess {
                        object: expr,
                        field,
                    }))
                }
                TokenKind::LSquare => {
                    self.advance()?;
                    let index = self.expression()?;
                    self.expect(TokenKind::RSquare)?;
                    Box::new(ExprKind::Subscript(Subscript {
                        object: expr,
                        index,
                    }))
                }
                _ => return Ok(expr),
            };
        }
    }

    fn arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(arguments);
        }
        arguments.push(self.expression()?);
        while self.check(TokenKind::Comma) {
            self.advance()?;
            arguments.push(self.expression()?);
        }
        Ok(arguments)
    }

    /// 按顺序尝试：浮点、整数、布尔、字符串、标识符、括号表达式
    pub fn atom(&mut self) -> ParseResult<Expr> {
        let alternatives: [Alternative<S>; 6] = [
            Self::float,
            Self::integer,
            Self::boolean,
            Self::string,
            Self::identifier_expr,
            Self::parenthesized,
        ];
        for alternative in alternatives {
            if let Some(expr) = alternative(self)? {
                return Ok(expr);
            }
        }

        let err = match self.current.error_kind() {
            Some(lexical) => ParserError::new(
                ParserErrorKind::Lexical(lexical.clone()),
                self.current.position,
            ),
            None => ParserError::new(
                ParserErrorKind::ExpectedExpression {
                    received: self.current.kind,
                },
                self.current.position,
            ),
        };
        Err(err)
    }

    fn literal(&mut self, literal: Option<Literal>) -> ParseResult<Option<Expr>> {
        match literal {
            Some(literal) => {
                self.advance()?;
                Ok(Some(Box::new(ExprKind::Literal(literal))))
            }
            None => Ok(None),
        }
    }

    pub fn float(&mut self) -> ParseResult<Option<Expr>> {
        let literal = match (&self.current.kind, &self.current.value) {
            (TokenKind::Float, Some(TokenValue::Float(v))) => Some(Literal::Float(*v)),
            _ => None,
        };
        self.literal(literal)
    }

    pub fn integer(&mut self) -> ParseResult<Option<Expr>> {
        let literal = match (&self.current.kind, &self.current.value) {
            (TokenKind::Integer, Some(TokenValue::Integer(v))) => Some(Literal::Integer(*v)),
            _ => None,
        };
        self.literal(literal)
    }

    pub fn boolean(&mut self) -> ParseResult<Option<Expr>> {
        let literal = match self.current.kind {
            TokenKind::True => Some(Literal::Boolean(true)),
            TokenKind::False => Some(Literal::Boolean(false)),
            _ => None,
        };
        self.literal(literal)
    }

    pub fn string(&mut self) -> ParseResult<Option<Expr>> {
        let literal = match (&self.current.kind, &self.current.value) {
            (TokenKind::String, Some(TokenValue::String(s))) => Some(Literal::String(s.clone())),
            _ => None,
        };
        self.literal(literal)
    }

    fn identifier_expr(&mut self) -> ParseResult<Option<Expr>> {
        if !self.check(TokenKind::Identifier) {
            return Ok(None);
        }
        let id = self.identifier()?;
        Ok(Some(Box::new(ExprKind::Identifier(id))))
    }

    /// `( expression )`
    pub fn parenthesized(&mut self) -> ParseResult<Option<Expr>> {
        if !self.check(TokenKind::LParen) {
            return Ok(None);
        }
        self.advance()?;
        let expr = self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(Some(expr))
    }

    pub fn identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.expect(TokenKind::Identifier)?;
        let name = match token.value {
            Some(TokenValue::Identifier(name)) => name,
            _ => return Err(ParserError::unexpected(&[TokenKind::Identifier], &token)),
        };
        Ok(Identifier {
            name,
            position: token.position,
        })
    }
}

/// 解析一段源码，返回 AST 与记录的错误
pub fn parse_source(
    source: &str,
    lexer_config: &LexerConfig,
    parser_config: ParserConfig,
) -> ParseResult<(Block, Vec<ParserError>)> {
    let lexer = Lexer::new(crate::kit::lexer::CharStream::new(source), lexer_config);
    let mut parser = Parser::with_config(lexer, parser_config)?;
    let block = parser.parse()?;
    Ok((block, parser.take_errors()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::builder::build_lexer;
    use crate::kit::lexer::SourcePosition;
    use std::collections::VecDeque;

    fn parse_code(code: &str) -> (Block, Vec<ParserError>) {
        parse_source(code, &LexerConfig::default(), ParserConfig::default()).expect("parse failed")
    }

    fn parse_clean(code: &str) -> Block {
        let (block, errors) = parse_code(code);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        block
    }

    /// 跳过起始 Indent，直接测试表达式产生式
    fn parse_expr(code: &str) -> String {
        let mut parser = Parser::new(build_lexer(code)).unwrap();
        parser.expect(TokenKind::Indent).unwrap();
        let expr = parser.expression().unwrap();
        assert!(parser.current().is(TokenKind::Newline));
        expr.to_string()
    }

    fn function_names(block: &Block) -> Vec<String> {
        block
            .iter()
            .filter_map(|s| match &**s {
                StmtKind::Function(f) => Some(f.decl.name.name.clone()),
                _ => None,
            })
            .collect()
    }

    /// 深层嵌套测试在较大的栈上运行，结果与主线程无关
    fn on_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
        std::thread::Builder::new()
            .stack_size(32 << 20)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap()
    }

    fn only_expr(block: &Block) -> &ExprKind {
        match &*block[0] {
            StmtKind::Expr(e) => &e.expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_expr("42\n"), "42");
        assert_eq!(parse_expr("0x2a\n"), "42");
        assert_eq!(parse_expr("2.5\n"), "2.5");
        assert_eq!(parse_expr("true\n"), "true");
        assert_eq!(parse_expr("false\n"), "false");
        assert_eq!(parse_expr("\"hi\\n\"\n"), "\"hi\\n\"");
        assert_eq!(parse_expr("name\n"), "name");
    }

    #[test]
    fn test_product_binds_tighter_than_sum() {
        assert_eq!(parse_expr("1+2*3\n"), "(1 + (2 * 3))");
        assert_eq!(parse_expr("1*2+3\n"), "((1 * 2) + 3)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_expr("1=2=3\n"), "(1 = (2 = 3))");
        assert_eq!(parse_expr("a += b = 1\n"), "(a += (b = 1))");
    }

    #[test]
    fn test_same_level_operators_recurse_right() {
        assert_eq!(parse_expr("1-2-3\n"), "(1 - (2 - 3))");
        assert_eq!(parse_expr("8/4/2\n"), "(8 / (4 / 2))");
        assert_eq!(parse_expr("2**3**2\n"), "(2 ** (3 ** 2))");
    }

    #[test]
    fn test_unary_and_power() {
        assert_eq!(parse_expr("-x\n"), "(-x)");
        assert_eq!(parse_expr("--x\n"), "(-(-x))");
        assert_eq!(parse_expr("-2**2\n"), "(-(2 ** 2))");
        assert_eq!(parse_expr("2**-1\n"), "(2 ** (-1))");
        assert_eq!(parse_expr("-a*b\n"), "((-a) * b)");
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_eq!(
            parse_expr("a or b and not c == d\n"),
            "(a or (b and (not (c == d))))"
        );
        assert_eq!(parse_expr("x < y + 1\n"), "(x < (y + 1))");
        assert_eq!(parse_expr("n % 2 != 0\n"), "((n % 2) != 0)");
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(parse_expr("(1 + 2) * 3\n"), "((1 + 2) * 3)");
        assert_eq!(parse_expr("((x))\n"), "x");
    }

    #[test]
    fn test_postfix_chain() {
        assert_eq!(parse_expr("a.b(1, c)[2].d\n"), "a.b(1, c)[2].d");
        assert_eq!(parse_expr("f()\n"), "f()");
        assert_eq!(parse_expr("-f(x) ** 2\n"), "(-(f(x) ** 2))");
    }

    #[test]
    fn test_call_spans_lines() {
        assert_eq!(parse_expr("f(1,\n  2)\n"), "f(1, 2)");
    }

    #[test]
    fn test_sum_node_kind() {
        let block = parse_clean("a + b\n");
        match only_expr(&block) {
            ExprKind::Binary(bin) => {
                assert_eq!(bin.kind(), super::super::expr::BinaryKind::Sum);
                assert!(matches!(&*bin.left, ExprKind::Identifier(id) if id.name == "a"));
                assert!(matches!(&*bin.right, ExprKind::Identifier(id) if id.name == "b"));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_colon_style() {
        let block = parse_clean("func add(a, b):\n    a + b\n");
        assert_eq!(block.len(), 1);
        match &*block[0] {
            StmtKind::Function(func) => {
                assert_eq!(func.decl.name.name, "add");
                let params: Vec<_> = func.decl.parameters.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(params, vec!["a", "b"]);
                assert_eq!(func.decl.return_type, None);
                assert_eq!(func.body.len(), 1);
                assert_eq!(only_expr(&func.body).to_string(), "(a + b)");
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_assign_style_with_return_type() {
        let block = parse_clean("func area(w, h): int =\n    return w * h\n");
        match &*block[0] {
            StmtKind::Function(func) => {
                assert_eq!(func.decl.return_type.as_ref().map(|t| t.name.as_str()), Some("int"));
                assert!(matches!(&*func.body[0], StmtKind::Return(r) if r.value.is_some()));
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_without_parameters() {
        let block = parse_clean("func main() =\n    run()\n    return\n");
        assert_eq!(
            block[0].to_string(),
            "func main() =\n    run()\n    return\n"
        );
    }

    #[test]
    fn test_parse_if_else() {
        let block = parse_clean("if true:\n    1\nelse:\n    2\n");
        match &*block[0] {
            StmtKind::Branch(branch) => {
                assert_eq!(branch.then_block.len(), 1);
                assert!(matches!(&branch.else_block, ElseBlock::Block(b) if b.len() == 1));
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_if_without_else_has_empty_block() {
        let block = parse_clean("if true:\n    1\n");
        match &*block[0] {
            StmtKind::Branch(branch) => assert!(branch.else_block.is_empty()),
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_elif_chain() {
        let src = "if a:\n    1\nelif b:\n    2\nelif c:\n    3\nelse:\n    4\n";
        let block = parse_clean(src);
        assert_eq!(block[0].to_string(), src);
        match &*block[0] {
            StmtKind::Branch(branch) => match &branch.else_block {
                ElseBlock::Branch(elif) => {
                    assert_eq!(elif.condition.to_string(), "b");
                    assert!(matches!(elif.else_block, ElseBlock::Branch(_)));
                }
                other => panic!("expected elif branch, got {other:?}"),
            },
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_while_and_nested_blocks() {
        let src = "while i < 10:\n    if i % 2 == 0:\n        total += i\n    i += 1\n";
        let block = parse_clean(src);
        assert_eq!(
            block[0].to_string(),
            "while (i < 10):\n    if ((i % 2) == 0):\n        (total += i)\n    (i += 1)\n"
        );
    }

    #[test]
    fn test_parse_struct() {
        let block = parse_clean("struct Point:\n    x\n    y\np = Point(1, 2)\n");
        assert_eq!(block.len(), 2);
        match &*block[0] {
            StmtKind::Struct(s) => {
                assert_eq!(s.name.name, "Point");
                assert_eq!(s.fields.len(), 2);
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_clean("").is_empty());
        assert!(parse_clean("\n\n").is_empty());
    }

    #[test]
    fn test_unclosed_function_header_is_recorded() {
        let (block, errors) = parse_code("func f(");
        assert!(block.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::Lexical(LexErrorKind::UnclosedBracket('('))
        );
    }

    #[test]
    fn test_broken_function_does_not_hide_siblings() {
        let src = "func g(a) =\n    a\nfunc f(a b) =\n    a\nfunc h() =\n    1\n";
        let (block, errors) = parse_code(src);
        assert_eq!(function_names(&block), vec!["g", "h"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].expected(), &[TokenKind::RParen]);
        assert_eq!(errors[0].received(), Some(TokenKind::Identifier));
        assert_eq!((errors[0].line(), errors[0].column()), (3, 10));
    }

    #[test]
    fn test_trailing_broken_function() {
        let (block, errors) = parse_code("func g(a) =\n    a\nfunc f(\n");
        assert_eq!(block.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_unclosed_header_before_sibling_function() {
        let src = "func a() =\n    1\nfunc f(\nfunc g() =\n    1\n";
        let (block, errors) = parse_code(src);
        assert_eq!(function_names(&block), vec!["a", "g"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::Lexical(LexErrorKind::UnclosedBracket('('))
        );
        assert_eq!((errors[0].line(), errors[0].column()), (3, 8));

        let (block, errors) = parse_code("func f(\nfunc g() =\n    1\n");
        assert_eq!(function_names(&block), vec!["g"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_bad_struct_field_skips_struct_body() {
        let (block, errors) = parse_code("struct P:\n    x\n    1\ny\n");
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].line(), errors[0].column()), (3, 5));
        assert_eq!(errors[0].expected(), &[TokenKind::Dedent]);
        assert_eq!(block.len(), 1);
        assert_eq!(only_expr(&block).to_string(), "y");
    }

    #[test]
    fn test_bad_struct_field_inside_function() {
        let src = "func f() =\n    struct P:\n        x\n        1\n    z\nw\n";
        let (block, errors) = parse_code(src);
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].line(), errors[0].column()), (4, 9));
        assert_eq!(block.len(), 2);
        assert_eq!(block[0].to_string(), "func f() =\n    z\n");
        assert_eq!(block[1].to_string(), "w\n");
    }

    #[test]
    fn test_bad_statement_inside_body_keeps_function() {
        let src = "func f() =\n    x = \n    y\n";
        let (block, errors) = parse_code(src);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind,
            ParserErrorKind::ExpectedExpression { received: TokenKind::Newline }
        ));
        match &*block[0] {
            StmtKind::Function(func) => assert_eq!(func.body.len(), 1),
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_errors_collected() {
        let src = "a = )\nb = 1\nc = *\nd\n";
        let (block, errors) = parse_code(src);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line(), 1);
        assert_eq!(errors[1].line(), 3);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_orphan_indented_block_skipped() {
        let (block, errors) = parse_code("a = 1\n    b\nc\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_stray_bang_parsed_as_not() {
        let (block, errors) = parse_code("!done\n");
        assert_eq!(only_expr(&block).to_string(), "(not done)");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParserErrorKind::Lexical(LexErrorKind::StrayBang));
    }

    #[test]
    fn test_stray_bang_without_recovery_aborts() {
        let config = ParserConfig {
            recover: false,
            ..ParserConfig::default()
        };
        let err = parse_source("!x\n", &LexerConfig::default(), config).unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::Lexical(LexErrorKind::StrayBang));
        assert_eq!((err.line(), err.column()), (1, 1));
    }

    #[test]
    fn test_braces_are_rejected() {
        let (block, errors) = parse_code("{}\ny\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::ExpectedExpression { received: TokenKind::LBrace }
        );
        assert_eq!(only_expr(&block).to_string(), "y");
    }

    #[test]
    fn test_deep_parentheses_hit_depth_limit() {
        let (block, errors) = on_large_stack(|| {
            let src = format!("{}x{}\ny\n", "(".repeat(1000), ")".repeat(1000));
            parse_code(&src)
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParserErrorKind::NestingTooDeep(48));
        assert_eq!(only_expr(&block).to_string(), "y");
    }

    #[test]
    fn test_deep_prefix_operators_hit_depth_limit() {
        let errors = on_large_stack(|| {
            let minus = format!("{}x\n", "-".repeat(1000));
            let not = format!("{}x\n", "not ".repeat(1000));
            let (_, mut errors) = parse_code(&minus);
            errors.extend(parse_code(&not).1);
            errors
        });
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ParserErrorKind::NestingTooDeep(48)));
    }

    #[test]
    fn test_depth_limit_is_configurable() {
        let src = format!("{}x{}\n", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse_clean(&src).len(), 1);

        let config = ParserConfig {
            max_depth: 8,
            recover: false,
            ..ParserConfig::default()
        };
        let err = parse_source(&src, &LexerConfig::default(), config).unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::NestingTooDeep(8));
        assert!(!err.is_fatal());

        let nested_blocks = "if a:\n    if b:\n        if c:\n            d\n";
        let config = ParserConfig {
            max_depth: 2,
            ..ParserConfig::default()
        };
        let (block, errors) =
            parse_source(nested_blocks, &LexerConfig::default(), config).unwrap();
        assert_eq!(block.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParserErrorKind::NestingTooDeep(2));
        assert_eq!(errors[0].line(), 3);
    }

    #[test]
    fn test_for_is_rejected() {
        let (block, errors) = parse_code("for x:\n    x\ny\n");
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::ExpectedExpression { received: TokenKind::ForEach }
        );
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_recovery_disabled_aborts() {
        let config = ParserConfig {
            recover: false,
            ..ParserConfig::default()
        };
        let err = parse_source("a = )\nb\n", &LexerConfig::default(), config).unwrap_err();
        assert_eq!(err.line(), 1);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_too_many_errors() {
        let config = ParserConfig {
            max_errors: 2,
            ..ParserConfig::default()
        };
        let err = parse_source("+\n+\n+\n+\n", &LexerConfig::default(), config).unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::TooManyErrors(3));
    }

    #[test]
    fn test_mismatched_indent_is_irrecoverable() {
        let err = parse_source("a\n    b\n  c\n", &LexerConfig::default(), ParserConfig::default())
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err.kind, ParserErrorKind::Fatal(_)));
    }

    #[test]
    fn test_missing_start_indent_is_irrecoverable() {
        let pos = SourcePosition::start();
        let tokens: VecDeque<Token> = vec![
            Token::with_value(TokenKind::Identifier, pos, TokenValue::Identifier("x".into())),
            Token::new(TokenKind::Newline, pos),
            Token::new(TokenKind::Eof, pos),
        ]
        .into();
        let mut parser = Parser::new(tokens).unwrap();
        let err = parser.parse().unwrap_err();
        assert_eq!(err.expected(), &[TokenKind::Indent]);
    }

    #[test]
    fn test_parser_never_pulls_past_eof() {
        let pos = SourcePosition::start();
        let tokens: VecDeque<Token> = vec![
            Token::new(TokenKind::Indent, pos),
            Token::new(TokenKind::Dedent, pos),
            Token::new(TokenKind::Eof, pos),
        ]
        .into();
        let mut parser = Parser::new(tokens).unwrap();
        assert!(parser.parse().unwrap().is_empty());
        // 停在 EOF 上，继续 advance 也不会请求新的 token
        assert!(parser.advance().unwrap().is(TokenKind::Eof));
        assert!(parser.advance().unwrap().is(TokenKind::Eof));
    }

    #[test]
    fn test_lexical_error_in_expression() {
        let (_, errors) = parse_code("x = \"abc\n");
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::Lexical(LexErrorKind::NewlineInString)
        );
    }
}
