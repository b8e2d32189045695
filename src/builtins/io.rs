//! `print` — the backing implementation for the `print` keyword (see `parser.rs`), also
//! callable directly as `print(...)` since it's an ordinary built-in.

use super::arity_error;
use crate::object::Object;

pub fn builtin_print(args: &[Object]) -> Object {
    if args.is_empty() {
        return arity_error(0, "at least 1");
    }

    let rendered: Vec<String> = args.iter().map(|a| a.inspect()).collect();
    println!("{}", rendered.join(" "));

    Object::Null
}
