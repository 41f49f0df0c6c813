#![allow(dead_code)]

use ambeval::{Error, Interpreter};
use once_cell::sync::Lazy;

/// Helpers shared by the puzzle programs.
pub static HELPERS: Lazy<String> = Lazy::new(|| {
    [
        "function require(p) { if (!p) amb(); return true; }",
        "function range(lo, hi) { return lo > hi ? amb() : amb(lo, range(lo + 1, hi)); }",
    ]
    .join("\n")
});

/// Prepends the shared helpers to `program`.
pub fn with_helpers(program: &str) -> String {
    format!("{}\n{}", *HELPERS, program)
}

/// Every solution as plain text, or the error code (or message, for
/// errors without a diagnostic).
pub fn solutions(input: &str) -> Result<Vec<String>, String> {
    let mut interpreter = Interpreter::default();
    interpreter
        .all_solutions(input)
        .map(|values| values.iter().map(|value| value.to_text()).collect())
        .map_err(|err| error_code(&err))
}

pub fn error_code(err: &Error) -> String {
    match err.diagnostic().and_then(|diagnostic| diagnostic.code.clone()) {
        Some(code) => code,
        None => err.to_string(),
    }
}

#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, solutions: [$($value:expr),* $(,)?] $(,)?) => {
        #[test]
        fn $name() {
            let expected: Vec<String> = vec![$($value.to_string()),*];
            pretty_assertions::assert_eq!(cases::solutions(&$input), Ok(expected));
        }
    };
    ($name:ident, input: $input:expr, error: $code:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(cases::solutions(&$input), Err($code.to_string()));
        }
    };
}
