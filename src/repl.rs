// ABOUTME: Interactive read-eval-print loop driving either execution backend

use std::rc::Rc;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use crate::compiler::compile;
use crate::config::{PROMPT, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use crate::env::Environment;
use crate::evaluator::eval_program;
use crate::object::Object;
use crate::parser::parse;
use crate::vm::Vm;

/// No syntax highlighting or completion needed — this is the minimal rustyline helper
/// that still satisfies the `Helper` supertrait bound.
pub struct WizardHelper;

impl Helper for WizardHelper {}
impl Completer for WizardHelper {
    type Candidate = String;
}
impl Hinter for WizardHelper {
    type Hint = String;
}
impl Validator for WizardHelper {}
impl Highlighter for WizardHelper {}

/// Which pipeline the REPL (and script runner) drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Evaluator,
    Vm,
}

/// Crude: a statement is "complete" once the last two lines of the rolling buffer are
/// both blank. Multi-line constructs with an intentional blank line in their body are
/// mis-segmented by this heuristic; a paren/brace balance check would be the
/// principled replacement.
fn is_complete(input: &str) -> bool {
    let lines: Vec<&str> = input.split('\n').collect();
    if lines.len() < 2 {
        return false;
    }
    let last = lines[lines.len() - 1].trim();
    let second_last = lines[lines.len() - 2].trim();
    last.is_empty() && second_last.is_empty()
}

fn print_parser_errors(errors: &[String]) {
    eprintln!(" parser errors:");
    for msg in errors {
        eprintln!("\t{}", msg);
    }
}

/// Runs one complete unit of source through the chosen backend, printing its result the
/// way the REPL does: nothing for `Null`, `Inspect` otherwise.
fn run_and_print(input: &str, backend: Backend, env: &Rc<Environment>) {
    let (program, errors) = parse(input);
    if !errors.is_empty() {
        print_parser_errors(&errors);
        return;
    }

    match backend {
        Backend::Evaluator => {
            let result = eval_program(&program, env);
            if !matches!(result, Object::Null) {
                println!("{}", result.inspect());
            }
        }
        Backend::Vm => match compile(&program) {
            Ok(bytecode) => {
                let mut vm = Vm::new(bytecode);
                match vm.run() {
                    Ok(()) => {
                        let result = vm.last_popped_stack_elem();
                        if !matches!(result, Object::Null) {
                            println!("{}", result.inspect());
                        }
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            Err(e) => println!("ERROR: {}", e),
        },
    }
}

/// Starts the interactive loop. Blocks until EOF (Ctrl-D) or a fatal line-editor error.
pub fn start(backend: Backend) {
    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    let env = Environment::new();
    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<WizardHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config).expect("failed to initialize line editor");
    editor.set_helper(Some(WizardHelper));

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { "" };
        match editor.readline(prompt) {
            Ok(line) => {
                buffer.push_str(&line);
                buffer.push('\n');

                if is_complete(&buffer) {
                    run_and_print(&buffer, backend, &env);
                    buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {}", err);
                break;
            }
        }
    }
}
