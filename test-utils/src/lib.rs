use std::error::Error;

use t_lang::{interpreter::Interpreter, lexer::Lexer, parser::Parser, source::Source};

pub struct Expected<'a> {
    pub stdout: &'a str,
}

/// Runs a complete program through the lexer, parser, and interpreter and
/// returns whatever `print` wrote.
pub fn run_program(text: &str) -> Result<String, Box<dyn Error>> {
    let lexer = Lexer::skipping_comments(Source::from_string(text));
    let program = Parser::new(lexer)?.parse_program()?;

    let mut interpreter = Interpreter::new(Vec::new());
    interpreter.run(&program)?;

    Ok(String::from_utf8(interpreter.output().clone())?)
}

/// Asserts that the program runs to completion with the expected stdout.
pub fn check_program(text: &str, expected: Expected) {
    match run_program(text) {
        Ok(stdout) => assert_eq!(stdout, expected.stdout),
        Err(error) => panic!("program failed unexpectedly: {error}"),
    }
}

/// Asserts that the program fails and that the rendered error mentions the
/// given fragment.
pub fn check_failing_program(text: &str, message: &str) {
    match run_program(text) {
        Ok(stdout) => panic!("program unexpectedly succeeded with output {stdout:?}"),
        Err(error) => {
            let rendered = error.to_string();
            assert!(
                rendered.contains(message),
                "error `{rendered}` does not mention `{message}`"
            );
        }
    }
}
