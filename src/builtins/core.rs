//! `len` — the one polymorphic built-in, supporting strings and arrays.

use super::arity_error;
use crate::object::Object;

pub fn builtin_len(args: &[Object]) -> Object {
    if args.len() != 1 {
        return arity_error(args.len(), "1");
    }

    match &args[0] {
        Object::String(s) => Object::Integer(s.len() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_tag()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_of_string_is_byte_length() {
        assert!(matches!(
            builtin_len(&[Object::String("hello".to_string())]),
            Object::Integer(5)
        ));
    }

    #[test]
    fn len_of_array_is_element_count() {
        assert!(matches!(
            builtin_len(&[Object::Array(vec![Object::Integer(1), Object::Integer(2)])]),
            Object::Integer(2)
        ));
    }

    #[test]
    fn len_rejects_unsupported_types() {
        match builtin_len(&[Object::Integer(1)]) {
            Object::Error(msg) => assert_eq!(msg, "argument to `len` not supported, got INTEGER"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn len_rejects_wrong_arity() {
        match builtin_len(&[]) {
            Object::Error(msg) => assert_eq!(msg, "wrong number of arguments. got=0, want=1"),
            other => panic!("expected Error, got {:?}", other),
        }
    }
}
