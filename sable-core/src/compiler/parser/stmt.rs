use super::expr::{Expr, Identifier};
use serde::Serialize;
use std::fmt;

// 语句类型别名
pub type Stmt = Box<StmtKind>;

/// 代码块：`Indent (Statement)* Dedent`
pub type Block = Vec<Stmt>;

/// 语句
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    // 表达式语句，以换行结束
    Expr(ExprStmt),
    // 函数定义
    Function(Function),
    // if / elif / else
    Branch(Branch),
    While(WhileStmt),
    Return(ReturnStmt),
    // 结构体声明（只有字段名）
    Struct(StructDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStmt {
    pub expression: Expr,
}

/// 函数头：`func name(params) [: return_type]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub return_type: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub decl: FunctionDecl,
    pub body: Block,
}

/// 条件分支
///
/// `elif` 链编码为 `ElseBlock::Branch`；没有 else 时为空块，不会缺省。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: ElseBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElseBlock {
    Block(Block),
    Branch(Box<Branch>),
}

impl ElseBlock {
    pub fn is_empty(&self) -> bool {
        matches!(self, ElseBlock::Block(block) if block.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDecl {
    pub name: Identifier,
    pub fields: Vec<Identifier>,
}

const INDENT: &str = "    ";

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    for stmt in block {
        write_stmt(f, stmt, depth)?;
    }
    Ok(())
}

fn write_branch(f: &mut fmt::Formatter<'_>, branch: &Branch, depth: usize, keyword: &str) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    writeln!(f, "{pad}{keyword} {}:", branch.condition)?;
    write_block(f, &branch.then_block, depth + 1)?;
    match &branch.else_block {
        ElseBlock::Branch(next) => write_branch(f, next, depth, "elif"),
        ElseBlock::Block(block) if block.is_empty() => Ok(()),
        ElseBlock::Block(block) => {
            writeln!(f, "{pad}else:")?;
            write_block(f, block, depth + 1)
        }
    }
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &StmtKind, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match stmt {
        StmtKind::Expr(e) => writeln!(f, "{pad}{}", e.expression),
        StmtKind::Function(func) => {
            let params = func
                .decl
                .parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{pad}func {}({params})", func.decl.name.name)?;
            if let Some(ret) = &func.decl.return_type {
                write!(f, ": {}", ret.name)?;
            }
            writeln!(f, " =")?;
            write_block(f, &func.body, depth + 1)
        }
        StmtKind::Branch(branch) => write_branch(f, branch, depth, "if"),
        StmtKind::While(w) => {
            writeln!(f, "{pad}while {}:", w.condition)?;
            write_block(f, &w.body, depth + 1)
        }
        StmtKind::Return(ret) => match &ret.value {
            Some(value) => writeln!(f, "{pad}return {value}"),
            None => writeln!(f, "{pad}return"),
        },
        StmtKind::Struct(s) => {
            writeln!(f, "{pad}struct {}:", s.name.name)?;
            for field in &s.fields {
                writeln!(f, "{pad}{INDENT}{}", field.name)?;
            }
            Ok(())
        }
    }
}

/// 按源码缩进风格输出，子表达式完全加括号
impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}
