//! Full-pipeline helpers for evaluator tests: lex, parse, run, inspect.

use std::cell::RefCell;
use std::rc::Rc;

use sprout_ir::{Frame, Primitive, Program, SproutError};

use crate::handlers::{BufferPrinter, ScriptedInput};
use crate::interpreter::Interpreter;

fn build(source: &str) -> Program {
    let tokens = match sprout_lexer::tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => panic!("lex failure: {e}"),
    };
    match sprout_parse::parse(tokens) {
        Ok(program) => program,
        Err(e) => panic!("parse failure: {e}"),
    }
}

fn interpreter(lines: &[&str]) -> (Interpreter, Rc<RefCell<String>>) {
    let printer = BufferPrinter::new();
    let output = printer.handle();
    let input = ScriptedInput::new(lines.iter().map(|s| s.to_string()));
    (
        Interpreter::with_handlers(Box::new(printer), Box::new(input)),
        output,
    )
}

pub(crate) fn run(source: &str) -> (Interpreter, Program) {
    let (interp, program, _) = run_with_input(source, &[]);
    (interp, program)
}

pub(crate) fn run_captured(source: &str) -> (Interpreter, Program, Rc<RefCell<String>>) {
    run_with_input(source, &[])
}

pub(crate) fn run_with_input(
    source: &str,
    lines: &[&str],
) -> (Interpreter, Program, Rc<RefCell<String>>) {
    let program = build(source);
    let (mut interp, output) = interpreter(lines);
    if let Err(e) = interp.run(&program) {
        panic!("eval failure: {e}");
    }
    (interp, program, output)
}

pub(crate) fn run_err(source: &str) -> SproutError {
    let program = build(source);
    let (mut interp, _) = interpreter(&[]);
    match interp.run(&program) {
        Ok(()) => panic!("expected an evaluation error"),
        Err(e) => e,
    }
}

/// Unwraps a global binding to its primitive.
pub(crate) fn global(interp: &mut Interpreter, program: &Program, name: &str) -> Primitive {
    let value = match Frame::lookup(&program.globals, name) {
        Some(value) => value,
        None => panic!("global '{name}' is not bound"),
    };
    match interp.unwrap_ref(&value, &program.globals) {
        Ok(prim) => prim,
        Err(e) => panic!("unwrap failure: {e}"),
    }
}
