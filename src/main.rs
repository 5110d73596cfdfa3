use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::validate::MatchingBracketValidator;
use rustyline::Editor;
use rustyline::{Completer, Helper, Highlighter, Hinter, Validator};
use std::error::Error;
use std::io::{self, stdin, IsTerminal};
use std::path::{Path, PathBuf};
use std::{fs, process::ExitCode};
use tally::{parse, tokenize, Interpreter};

#[derive(Parser, Debug)]
#[clap(name = "tally", version, about = "Evaluate tally scripts")]
struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Print the token stream before evaluating.
    #[clap(long)]
    tokens: bool,

    /// Print the parsed tree before evaluating.
    #[clap(long)]
    ast: bool,
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
struct PromptHelper {
    #[rustyline(Completer)]
    completer: (),
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

fn main() -> ExitCode {
    tally::init_tracing();
    let args = Args::parse();

    match &args.script {
        Some(path) => run_file(path, &args),
        None => match run_prompt(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(path: &Path, args: &Args) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return ExitCode::from(74);
        }
    };

    let mut interpreter = Interpreter::new();
    run(&mut interpreter, &source, args)
}

fn run_prompt(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let mut interpreter = Interpreter::new();

    // Piped input is treated as one script.
    if !stdin().is_terminal() {
        let program = io::read_to_string(stdin().lock())?;
        return Ok(run(&mut interpreter, &program, args));
    }

    let helper = PromptHelper {
        completer: (),
        validator: MatchingBracketValidator::new(),
    };
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                run(&mut interpreter, &line, args);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(ExitCode::SUCCESS)
            }
            Err(err) => return Err(Box::new(err)),
        }
    }
}

/// Runs one source against the session and prints its value or error.
fn run(interpreter: &mut Interpreter, source: &str, args: &Args) -> ExitCode {
    if args.tokens {
        dump_tokens(source);
    }
    if args.ast || cfg!(feature = "print-ast") {
        dump_ast(source);
    }

    match interpreter.run(source) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.render(source));
            ExitCode::from(u8::from(err.category()))
        }
    }
}

fn dump_tokens(source: &str) {
    // Lexing errors are reported by the run that follows.
    if let Ok(tokens) = tokenize(source) {
        for token in tokens.iter() {
            println!("{:>6}  {}", token.span.start_pos.to_string(), token);
        }
    }
}

fn dump_ast(source: &str) {
    let program = match tokenize(source) {
        Ok(tokens) => parse(tokens),
        Err(_) => return,
    };

    if let Ok(program) = program {
        println!("{}", program.ast_string());
    }
}
