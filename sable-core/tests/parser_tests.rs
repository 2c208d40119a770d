//! 解析器端到端测试
//!
//! 覆盖 demos/ 下的示例程序与错误恢复场景

mod common;

use common::{parse, parse_ok, render};
use sable_core::compiler::parser::{parse_source, ElseBlock, ParserErrorKind, StmtKind};
use sable_core::{LexErrorKind, LexerConfig, ParserConfig, TokenKind};

const FIBONACCI: &str = include_str!("../../demos/fibonacci.sable");
const SHAPES: &str = include_str!("../../demos/shapes.sable");
const BROKEN: &str = include_str!("../../demos/broken.sable");

#[test]
fn test_fibonacci_demo() {
    let block = parse_ok(FIBONACCI);
    assert_eq!(block.len(), 3);
    assert_eq!(
        render(&block),
        "func fib(n): int =\n\
         \x20   if (n < 2):\n\
         \x20       return n\n\
         \x20   return (fib((n - 1)) + fib((n - 2)))\n\
         func main() =\n\
         \x20   (i = 0)\n\
         \x20   while (i < 10):\n\
         \x20       print(fib(i))\n\
         \x20       (i += 1)\n\
         \x20   return\n\
         main()\n"
    );
}

#[test]
fn test_shapes_demo() {
    let block = parse_ok(SHAPES);
    assert_eq!(block.len(), 5);
    assert!(matches!(&*block[0], StmtKind::Struct(s) if s.fields.len() == 2));
    assert_eq!(
        block[1].to_string(),
        "func norm2(p) =\n    return ((p.x ** 2) + (p.y ** 2))\n"
    );
    assert_eq!(block[2].to_string(), "(origin = Point(0, 0))\n");
    assert_eq!(block[3].to_string(), "(grid[0][1] = 3.5)\n");
    assert_eq!(
        block[4].to_string(),
        "(ready = ((origin.x == 0) and (not flag)))\n"
    );
}

#[test]
fn test_broken_demo_recovers() {
    let (block, errors) = parse(BROKEN);

    assert_eq!(errors.len(), 2, "errors: {errors:?}");
    assert_eq!((errors[0].line(), errors[0].column()), (4, 15));
    assert_eq!(errors[0].expected(), &[TokenKind::RParen]);
    assert_eq!((errors[1].line(), errors[1].column()), (7, 5));
    assert_eq!(
        errors[1].kind,
        ParserErrorKind::ExpectedExpression {
            received: TokenKind::Multiply
        }
    );

    assert_eq!(render(&block), "func ok(a) =\n    a\n(y = 1)\n");
}

#[test]
fn test_display_is_stable_under_reparse() {
    // 输出的源码风格文本可以重新解析成同样的树
    for source in [FIBONACCI, SHAPES] {
        let first = parse_ok(source);
        let second = parse_ok(&render(&first));
        assert_eq!(render(&first), render(&second));
    }
}

#[test]
fn test_if_else_end_to_end() {
    let block = parse_ok("if x > 0:\n    y = 1\nelse:\n    y = 2\n");
    match &*block[0] {
        StmtKind::Branch(branch) => {
            assert_eq!(branch.condition.to_string(), "(x > 0)");
            match &branch.else_block {
                ElseBlock::Block(otherwise) => {
                    assert_eq!(otherwise[0].to_string(), "(y = 2)\n")
                }
                other => panic!("expected else block, got {other:?}"),
            }
        }
        other => panic!("expected branch, got {other:?}"),
    }
}

#[test]
fn test_nested_function_bodies() {
    let src = "func outer() =\n    func inner(x) =\n        return x\n    return inner(1)\n";
    let block = parse_ok(src);
    assert_eq!(render(&block), src);
}

#[test]
fn test_tab_width_changes_block_structure() {
    let src = "if a:\n\tb\n        c\n";

    let wide = LexerConfig { tab_width: 8 };
    let (block, errors) = parse_source(src, &wide, ParserConfig::default()).unwrap();
    assert!(errors.is_empty(), "errors: {errors:?}");
    match &*block[0] {
        StmtKind::Branch(branch) => assert_eq!(branch.then_block.len(), 2),
        other => panic!("expected branch, got {other:?}"),
    }

    // 默认 tab 宽度为 4，第二行更深，成了多余的缩进块
    let (_, errors) = parse(src);
    assert!(!errors.is_empty());
}

#[test]
fn test_lexical_errors_surface_as_parser_errors() {
    let (block, errors) = parse("s = \"abc\nt = 1\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        ParserErrorKind::Lexical(LexErrorKind::NewlineInString)
    );
    assert_eq!(render(&block), "(t = 1)\n");
}

#[test]
fn test_unclosed_bracket_at_end_of_input() {
    let (_, errors) = parse("total = f(1, 2\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        ParserErrorKind::Lexical(LexErrorKind::UnclosedBracket('('))
    );
}

#[test]
fn test_missing_return_type_name() {
    let (block, errors) = parse("func f(): =\n    1\ng\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(render(&block), "g\n");
}
