//! Pipeline plumbing for the `sprout` binary: source loading, the
//! lex-parse-run pipeline, and the post-run test report.

use std::path::Path;

use sprout_eval::{Interpreter, TestLedger};
use sprout_ir::{Program, SproutError};

/// Reads a script, insisting on the `.sps` extension.
pub fn load_source(path: &str) -> Result<String, SproutError> {
    if !Path::new(path).exists() {
        return Err(SproutError::FileNotFound {
            path: path.to_string(),
        });
    }
    let extension = Path::new(path).extension().and_then(|e| e.to_str());
    if extension != Some("sps") {
        return Err(SproutError::WrongExtension {
            path: path.to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| SproutError::FileNotFound {
        path: path.to_string(),
    })
}

/// Lexes, parses and runs a program on the given interpreter.
pub fn run_source(source: &str, interp: &mut Interpreter) -> Result<Program, SproutError> {
    let tokens = sprout_lexer::tokenize(source)?;
    let program = sprout_parse::parse(tokens)?;
    interp.run(&program)?;
    Ok(program)
}

/// One PASSED/FAILED line per recorded assertion plus a summary; empty
/// when the program recorded nothing.
pub fn render_report(ledger: &TestLedger) -> String {
    if ledger.is_empty() {
        return String::new();
    }
    let mut out = String::from("--- test results ---\n");
    for entry in ledger.entries() {
        if entry.passed() {
            out.push_str(&format!("PASSED: {} == {}\n", entry.actual, entry.expected));
        } else {
            out.push_str(&format!(
                "FAILED: got {}, expected {}\n",
                entry.actual, entry.expected
            ));
        }
    }
    out.push_str(&format!(
        "{} of {} assertions passed\n",
        ledger.passed_count(),
        ledger.len()
    ));
    out
}
