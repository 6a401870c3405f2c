//! # Tea
//!
//! This binary is the interpreter of T. It wires the lexer, parser, and
//! tree-walking interpreter into a single application.

mod cli;

use cli::Cli;

use std::{error::Error, io, process};

use log::{debug, error, info};
use t_lang::{interpreter::Interpreter, lexer::Lexer, parser::Parser, source::Source};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    if !args.file.exists() {
        debug!("nothing to do: `{}` does not exist", args.file.display());
        return Ok(());
    }

    let source = Source::from_file(&args.file)?;
    let lexer = Lexer::skipping_comments(source);

    let program = match Parser::new(lexer).and_then(|mut parser| parser.parse_program()) {
        Ok(program) => program,
        Err(parse_error) => {
            error!("{parse_error}");
            process::exit(-1);
        }
    };

    if args.dump_ast {
        info!("Parsed AST:\n{}", serde_json::to_string_pretty(&program)?);
    }

    let mut interpreter = Interpreter::new(io::stdout());

    if let Err(runtime_error) = interpreter.run(&program) {
        error!("{runtime_error}");
        process::exit(-1);
    }

    Ok(())
}
