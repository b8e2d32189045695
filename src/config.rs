// ABOUTME: Named constants for the REPL prompt, startup banner, and VM defaults

pub const PROMPT: &str = ">> ";
pub const WELCOME_MESSAGE: &str = "This is the Wizard programming language!";
pub const WELCOME_SUBTITLE: &str = "Feel free to type in commands";

pub const VM_DEFAULT_STACK_SIZE: usize = crate::vm::DEFAULT_STACK_SIZE;
