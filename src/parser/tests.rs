use super::parse;
use crate::ast::{Expr, Statement};
use crate::error::Error;
use crate::lexer::tokenize;

fn parse_source(src: &str) -> crate::ast::Program {
    parse(tokenize(src).unwrap()).unwrap()
}

#[test]
fn precedence_climbs_correctly() {
    let program = parse_source("1 + 2 * 3;");
    match &program.statements[0] {
        Statement::Expression(expr) => match expr.as_ref() {
            Expr::Binary { operator, right, .. } => {
                assert_eq!(operator.lexeme, "+");
                assert!(matches!(right.as_ref(), Expr::Binary { .. }));
            }
            other => panic!("expected binary expression, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn assignment_is_right_associative_and_lowest_precedence() {
    let program = parse_source("a = b = 1;");
    match &program.statements[0] {
        Statement::Expression(expr) => match expr.as_ref() {
            Expr::Assign { name, value } => {
                assert_eq!(name.lexeme, "a");
                assert!(matches!(value.as_ref(), Expr::Assign { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    let err = parse(tokenize("1 = 2;").unwrap()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("Invalid assignment target"));
}

#[test]
fn chained_calls_nest_callee() {
    let program = parse_source("f()();");
    match &program.statements[0] {
        Statement::Expression(expr) => match expr.as_ref() {
            Expr::Call { callee, .. } => assert!(matches!(callee.as_ref(), Expr::Call { .. })),
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn function_declaration_parses_params_and_body() {
    let program = parse_source("fn add(x, y) { return x + y; }");
    match &program.statements[0] {
        Statement::FunctionDecl(decl) => {
            assert_eq!(decl.name.lexeme, "add");
            assert_eq!(decl.params.len(), 2);
            assert_eq!(decl.body.len(), 1);
        }
        other => panic!("expected function declaration, got {other:?}"),
    }
}

#[test]
fn arity_of_255_parameters_is_accepted_256_is_rejected() {
    let params: Vec<String> = (0..255).map(|i| format!("p{i}")).collect();
    let source = format!("fn f({}) {{ }}", params.join(", "));
    assert!(parse(tokenize(&source).unwrap()).is_ok());

    let too_many: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
    let source = format!("fn f({}) {{ }}", too_many.join(", "));
    assert!(parse(tokenize(&source).unwrap()).is_err());
}

#[test]
fn if_without_else_has_no_else_branch() {
    let program = parse_source("if (true) { print(1); }");
    match &program.statements[0] {
        Statement::If(stmt) => assert!(stmt.else_branch.is_none()),
        other => panic!("expected if statement, got {other:?}"),
    }
}

#[test]
fn return_without_value_has_no_value() {
    let program = parse_source("fn f() { return; }");
    match &program.statements[0] {
        Statement::FunctionDecl(decl) => match &decl.body[0] {
            Statement::Return(ret) => assert!(ret.value.is_none()),
            other => panic!("expected return statement, got {other:?}"),
        },
        other => panic!("expected function declaration, got {other:?}"),
    }
}

#[test]
fn unterminated_expression_reports_at_end() {
    let err = parse(tokenize("let x = 1").unwrap()).unwrap_err();
    assert!(err.to_string().contains("at end"));
}

#[test]
fn empty_program_parses_to_no_statements() {
    let program = parse_source("");
    assert!(program.statements.is_empty());
}
