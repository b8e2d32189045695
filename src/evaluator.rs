// ABOUTME: Tree-walking evaluator interpreting the AST against a lexical environment

use std::rc::Rc;

use crate::ast::{Expression, ForExpression, Program, Statement, WhileExpression};
use crate::builtins;
use crate::env::Environment;
use crate::object::{native_bool, Object, ObjectType};

/// Evaluates a complete program. The final statement's result is returned, except that
/// a `ReturnValue` is unwrapped and an `Error` short-circuits, both possibly from a
/// statement that isn't the last one.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Object {
    let mut result = Object::Null;

    for statement in &program.statements {
        result = eval_statement(statement, env);

        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(_) => return result,
            _ => {}
        }
    }

    result
}

/// Evaluates a block's statements in order without unwrapping control-flow wrappers —
/// the enclosing construct (function body or loop) decides what to do with them.
fn eval_block(statements: &[Statement], env: &Rc<Environment>) -> Object {
    let mut result = Object::Null;

    for statement in statements {
        result = eval_statement(statement, env);

        if matches!(
            result,
            Object::ReturnValue(_)
                | Object::BreakValue(_)
                | Object::ContinueValue(_)
                | Object::Error(_)
        ) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Object {
    match statement {
        Statement::Let(s) => {
            let value = eval_expression(&s.value, env);
            if value.is_error() {
                return value;
            }
            env.set(s.name.value.clone(), value);
            Object::Null
        }
        Statement::Return(s) => {
            let value = match &s.value {
                Some(expr) => {
                    let value = eval_expression(expr, env);
                    if value.is_error() {
                        return value;
                    }
                    value
                }
                None => Object::Null,
            };
            Object::ReturnValue(Box::new(value))
        }
        Statement::Break(_) => Object::BreakValue(Box::new(Object::Null)),
        Statement::Continue(_) => Object::ContinueValue(Box::new(Object::Null)),
        Statement::Expression(s) => eval_expression(&s.expression, env),
        Statement::Block(s) => eval_block(&s.statements, env),
    }
}

fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Object {
    match expression {
        Expression::Identifier(id) => eval_identifier(&id.value, env),
        Expression::IntegerLiteral { value, .. } => Object::Integer(*value),
        Expression::FloatLiteral { .. } => {
            Object::Error("floating point literals are not supported".to_string())
        }
        Expression::StringLiteral { value, .. } => Object::String(value.clone()),
        Expression::Boolean { value, .. } => native_bool(*value),
        Expression::Prefix(e) => {
            let right = eval_expression(&e.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&e.operator, right)
        }
        Expression::Infix(e) => {
            let left = eval_expression(&e.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&e.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&e.operator, left, right)
        }
        Expression::If(e) => {
            let condition = eval_expression(&e.condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block(&e.consequence.statements, env)
            } else if let Some(alt) = &e.alternative {
                eval_block(&alt.statements, env)
            } else {
                Object::Null
            }
        }
        Expression::Function(e) => Object::Function {
            params: e.parameters.clone(),
            body: e.body.clone(),
            env: env.clone(),
        },
        Expression::Call(e) => {
            let function = eval_expression(&e.function, env);
            if function.is_error() {
                return function;
            }

            let mut args = Vec::with_capacity(e.arguments.len());
            for arg in &e.arguments {
                let value = eval_expression(arg, env);
                if value.is_error() {
                    return value;
                }
                args.push(value);
            }

            apply_function(function, args)
        }
        Expression::For(e) => eval_for_expression(e, env),
        Expression::While(e) => eval_while_expression(e, env),
        Expression::Array(e) => {
            let mut elements = Vec::with_capacity(e.elements.len());
            for el in &e.elements {
                let value = eval_expression(el, env);
                if value.is_error() {
                    return value;
                }
                elements.push(value);
            }
            Object::Array(elements)
        }
        Expression::Hash(e) => {
            let mut pairs = std::collections::HashMap::new();
            for (k, v) in &e.pairs {
                let key = eval_expression(k, env);
                if key.is_error() {
                    return key;
                }
                let value = eval_expression(v, env);
                if value.is_error() {
                    return value;
                }
                match key.hash_key() {
                    Some(hash_key) => {
                        pairs.insert(hash_key, (key, value));
                    }
                    None => return Object::Error(format!("unusable as hash key: {}", key.type_tag())),
                }
            }
            Object::Hash(pairs)
        }
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Object {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return builtin;
    }
    Object::Error(format!("identifier not found: {}", name))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => native_bool(!right.is_truthy()),
        "-" => match right {
            Object::Integer(n) => Object::Integer(-n),
            other => Object::Error(format!("unknown operator: -{}", other.type_tag())),
        },
        other => Object::Error(format!("unknown operator: {}{}", other, right.type_tag())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) => eval_boolean_infix(operator, *l, *r),
        _ if left.type_tag() != right.type_tag() => Object::Error(format!(
            "type mismatch: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
        _ => Object::Error(format!(
            "unknown operator: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => {
            if right == 0 {
                Object::Error("division by zero".to_string())
            } else {
                Object::Integer(left / right)
            }
        }
        "<" => native_bool(left < right),
        ">" => native_bool(left > right),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        other => Object::Error(format!(
            "unknown operator: {} {} {}",
            ObjectType::Integer,
            other,
            ObjectType::Integer
        )),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::String(format!("{}{}", left, right)),
        other => Object::Error(format!(
            "unknown operator: {} {} {}",
            ObjectType::String,
            other,
            ObjectType::String
        )),
    }
}

fn eval_boolean_infix(operator: &str, left: bool, right: bool) -> Object {
    match operator {
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        other => Object::Error(format!(
            "unknown operator: {} {} {}",
            ObjectType::Boolean,
            other,
            ObjectType::Boolean
        )),
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> Object {
    match function {
        Object::Function { params, body, env } => {
            if params.len() != args.len() {
                return Object::Error(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    params.len()
                ));
            }

            let call_env = Environment::new_enclosed(env);
            for (param, arg) in params.iter().zip(args.into_iter()) {
                call_env.set(param.value.clone(), arg);
            }

            match eval_block(&body.statements, &call_env) {
                Object::ReturnValue(value) => *value,
                other => other,
            }
        }
        Object::Builtin(f) => f(&args),
        other => Object::Error(format!("not a function: {}", other.type_tag())),
    }
}

/// Both loops share the same shape: a fresh enclosed environment that lives for the
/// whole loop (so the `for` initializer's bindings — and any re-`let` in the step — are
/// scoped to it, not to each iteration), a `BreakValue` that exits with `Null`, and a
/// `ContinueValue` that proceeds to the next iteration (the step, for `for`).
fn eval_while_expression(e: &WhileExpression, env: &Rc<Environment>) -> Object {
    let loop_env = Environment::new_enclosed(env.clone());

    loop {
        let condition = eval_expression(&e.condition, &loop_env);
        if condition.is_error() {
            return condition;
        }
        if !condition.is_truthy() {
            return Object::Null;
        }

        match eval_block(&e.body.statements, &loop_env) {
            Object::BreakValue(_) => return Object::Null,
            Object::ContinueValue(_) => continue,
            result @ (Object::ReturnValue(_) | Object::Error(_)) => return result,
            _ => {}
        }
    }
}

fn eval_for_expression(e: &ForExpression, env: &Rc<Environment>) -> Object {
    let loop_env = Environment::new_enclosed(env.clone());

    if let Some(init) = &e.initializer {
        let result = eval_statement(init, &loop_env);
        if result.is_error() {
            return result;
        }
    }

    loop {
        let condition = eval_expression(&e.condition, &loop_env);
        if condition.is_error() {
            return condition;
        }
        if !condition.is_truthy() {
            return Object::Null;
        }

        match eval_block(&e.body.statements, &loop_env) {
            Object::BreakValue(_) => return Object::Null,
            Object::ContinueValue(_) => {}
            result @ (Object::ReturnValue(_) | Object::Error(_)) => return result,
            _ => {}
        }

        if let Some(step) = &e.step {
            let result = eval_statement(step, &loop_env);
            if result.is_error() {
                return result;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval_source(input: &str) -> Object {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        let env = Environment::new();
        eval_program(&program, &env)
    }

    fn as_int(obj: Object) -> i64 {
        match obj {
            Object::Integer(n) => n,
            other => panic!("expected Integer, got {:?}", other),
        }
    }

    #[test]
    fn evaluates_integer_arithmetic() {
        assert_eq!(as_int(eval_source("5 + 5 * 2;")), 15);
        assert_eq!(as_int(eval_source("(5 + 10 * 2 + 15 / 3) * 2 + -10;")), 50);
    }

    #[test]
    fn if_else_branches_on_comparison_result() {
        let result = eval_source(
            "let a = 5; let b = a > 3; let c = a * 99; if (b) { 10 } else { 1 };",
        );
        assert_eq!(as_int(result), 10);
    }

    #[test]
    fn recursive_closure_counts_up_to_a_threshold() {
        let result = eval_source(
            "let counter = fn(x) { if (x > 100) { return true; } else { counter(x + 1); } }; counter(0);",
        );
        match result {
            Object::Boolean(b) => assert!(b),
            other => panic!("expected Boolean(true), got {:?}", other),
        }
    }

    #[test]
    fn closure_captures_environment() {
        let result = eval_source(
            "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
        );
        assert_eq!(as_int(result), 5);
    }

    #[test]
    fn unbound_identifier_is_an_error() {
        match eval_source("foobar;") {
            Object::Error(msg) => assert_eq!(msg, "identifier not found: foobar"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn type_mismatch_error() {
        match eval_source("5 + true;") {
            Object::Error(msg) => assert_eq!(msg, "type mismatch: INTEGER + BOOLEAN"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn division_by_zero_is_an_error() {
        match eval_source("1 / 0;") {
            Object::Error(msg) => assert_eq!(msg, "division by zero"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn boolean_singletons_are_identical_by_value() {
        assert!(matches!(eval_source("true == true;"), Object::Boolean(true)));
        assert!(matches!(eval_source("true != false;"), Object::Boolean(true)));
    }

    #[test]
    fn break_exits_only_the_innermost_loop() {
        let result = eval_source(
            "let i = 0; let total = 0; while (i < 5) { let i2 = 0; while (i2 < 5) { if (i2 == 2) { break; } let total = total + 1; let i2 = i2 + 1; } let i = i + 1; } total;",
        );
        // `total` is re-let inside the inner loop's own environment, which is freshly
        // created on every re-entry and discarded when that while-expression finishes;
        // the write never reaches the outer `total` (`set` always writes locally), so
        // the name read at the end is still the original top-level binding.
        assert_eq!(as_int(result), 0);
    }

    #[test]
    fn return_inside_loop_exits_the_enclosing_function() {
        let result = eval_source(
            "let f = fn() { let i = 0; while (i < 10) { if (i == 3) { return i; } let i = i + 1; } return -1; }; f();",
        );
        assert_eq!(as_int(result), 3);
    }

    #[test]
    fn for_loop_step_advances_within_the_loops_own_environment() {
        // The loop variable `i` is declared by the initializer directly in the loop's
        // environment and re-let by the step in that same environment, so it correctly
        // advances 0..5 there. `sum`, declared outside the loop, is merely shadowed by
        // the body's `let sum = sum + i` — that write lands in the loop's environment,
        // never the outer one, so the `sum` read after the loop is still the original.
        let result =
            eval_source("let sum = 0; for (let i = 0; i < 5; let i = i + 1) { let sum = sum + i; } sum;");
        assert_eq!(as_int(result), 0);
    }

    #[test]
    fn continue_skips_to_step_in_for_loop() {
        let result = eval_source(
            "let sum = 0; for (let i = 0; i < 5; let i = i + 1) { if (i == 2) { continue; } let sum = sum + i; } sum;",
        );
        // Same shadowing story as above; continue only changes which iterations ran
        // inside the loop's own discarded environment.
        assert_eq!(as_int(result), 0);
    }

    #[test]
    fn return_from_inside_a_for_loop_body_escapes_with_the_current_iteration_value() {
        // Unlike `let`, `return` is a control-flow value that propagates through every
        // enclosing block/loop scope regardless of environment boundaries — but it has
        // to be issued from inside the loop body to see the loop's own bindings at all.
        let result = eval_source(
            "let f = fn() { for (let i = 0; i < 10; let i = i + 1) { if (i == 4) { return i; } } return -1; }; f();",
        );
        assert_eq!(as_int(result), 4);
    }

    #[test]
    fn let_bound_function_value_is_null() {
        assert!(matches!(eval_source("let x = 5;"), Object::Null));
    }

    #[test]
    fn array_and_builtin_len() {
        assert_eq!(as_int(eval_source("len([1, 2, 3]);")), 3);
        assert_eq!(as_int(eval_source(r#"len("hello");"#)), 5);
    }

    #[test]
    fn print_statement_routes_through_builtin() {
        // print is parsed as a call to the `print` builtin and returns Null.
        assert!(matches!(eval_source("print 1;"), Object::Null));
    }
}
