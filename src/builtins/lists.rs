//! Array operations: `first`, `last`, `rest`, `push`. None mutate their argument —
//! `push` returns a new array with the value appended, matching the evaluator's
//! by-value object model.

use super::arity_error;
use crate::object::Object;

fn type_error(name: &str, got: &Object) -> Object {
    Object::Error(format!(
        "argument to `{}` must be ARRAY, got {}",
        name,
        got.type_tag()
    ))
}

pub fn builtin_first(args: &[Object]) -> Object {
    if args.len() != 1 {
        return arity_error(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => type_error("first", other),
    }
}

pub fn builtin_last(args: &[Object]) -> Object {
    if args.len() != 1 {
        return arity_error(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => type_error("last", other),
    }
}

pub fn builtin_rest(args: &[Object]) -> Object {
    if args.len() != 1 {
        return arity_error(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                Object::Null
            } else {
                Object::Array(elements[1..].to_vec())
            }
        }
        other => type_error("rest", other),
    }
}

pub fn builtin_push(args: &[Object]) -> Object {
    if args.len() != 2 {
        return arity_error(args.len(), "2");
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.push(args[1].clone());
            Object::Array(new_elements)
        }
        other => type_error("push", other),
    }
}
