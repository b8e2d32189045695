use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use wizard::compiler::compile;
use wizard::env::Environment;
use wizard::evaluator::eval_program;
use wizard::object::Object;
use wizard::parser::parse;
use wizard::repl::{self, Backend};
use wizard::vm::Vm;

/// The Wizard programming language: a tree-walking interpreter and bytecode VM
#[derive(Parser, Debug)]
#[command(name = "wizard")]
#[command(version)]
#[command(about = "A small dynamically-typed scripting language")]
struct CliArgs {
    /// Script file to execute (optional — if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Run via the compiled bytecode VM instead of the tree-walking evaluator
    #[arg(long = "vm")]
    vm: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let backend = if args.vm { Backend::Vm } else { Backend::Evaluator };

    if let Some(script_path) = args.script {
        return match run_script(&script_path, backend) {
            Ok(()) => ExitCode::SUCCESS,
            Err(msg) => {
                eprintln!("{}", msg);
                ExitCode::FAILURE
            }
        };
    }

    repl::start(backend);
    ExitCode::SUCCESS
}

fn run_script(path: &PathBuf, backend: Backend) -> Result<(), String> {
    let source =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let (program, errors) = parse(&source);
    if !errors.is_empty() {
        let mut message = String::from(" parser errors:\n");
        for err in &errors {
            message.push('\t');
            message.push_str(err);
            message.push('\n');
        }
        return Err(message);
    }

    match backend {
        Backend::Evaluator => {
            let env = Environment::new();
            let result = eval_program(&program, &env);
            if let Object::Error(msg) = result {
                return Err(format!("ERROR: {}", msg));
            }
        }
        Backend::Vm => {
            let bytecode = compile(&program).map_err(|e| e.to_string())?;
            let mut vm = Vm::new(bytecode);
            vm.run().map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_script(contents: &str) -> tempfile_path::TempScript {
        tempfile_path::TempScript::new(contents)
    }

    /// A tiny self-contained temp-file helper so script-mode tests don't need a real
    /// tempfile crate dependency just for this.
    mod tempfile_path {
        use std::path::PathBuf;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        pub struct TempScript {
            pub path: PathBuf,
        }

        impl TempScript {
            pub fn new(contents: &str) -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                let mut path = std::env::temp_dir();
                path.push(format!("wizard_test_{}_{}.wiz", std::process::id(), n));
                std::fs::write(&path, contents).expect("write temp script");
                TempScript { path }
            }
        }

        impl Drop for TempScript {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn run_script_evaluator_succeeds_on_valid_source() {
        let script = write_temp_script("let x = 1 + 2; print x;\n");
        assert!(run_script(&script.path, Backend::Evaluator).is_ok());
    }

    #[test]
    fn run_script_vm_succeeds_on_valid_source() {
        let script = write_temp_script("1 + 2;\n");
        assert!(run_script(&script.path, Backend::Vm).is_ok());
    }

    #[test]
    fn run_script_reports_parser_errors() {
        let script = write_temp_script("let = ;\n");
        let err = run_script(&script.path, Backend::Evaluator).unwrap_err();
        assert!(err.contains("parser errors"));
    }

    #[test]
    fn run_script_reports_missing_file() {
        let missing = PathBuf::from("/nonexistent/path/to/script.wiz");
        let err = run_script(&missing, Backend::Evaluator).unwrap_err();
        assert!(err.contains("failed to read"));
    }

    #[test]
    fn run_script_reports_evaluator_runtime_error() {
        let script = write_temp_script("foobar;\n");
        let err = run_script(&script.path, Backend::Evaluator).unwrap_err();
        assert!(err.contains("identifier not found"));
    }
}
