//! estree-eval CLI and REPL
//!
//! Usage:
//!   acorn-json < prog.js | estree-eval          - Evaluate and print the result
//!   acorn-json < prog.js | estree-eval parse    - Print the parsed tree
//!   estree-eval repl                            - Start interactive REPL
//!   estree-eval help                            - Show help message

use std::io::{self, IsTerminal, Read};
use std::process;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use estree_eval::cli::{self, Command};
use estree_eval::printer::{render_node, render_result};
use estree_eval::{evaluate_program, parse_str, Session, VERSION};

fn main() {
    estree_eval::init_tracing();

    let command = match Command::from_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}: {}", "error".red(), e);
            eprintln!("Usage: estree-eval [eval|parse|repl|help|version] < tree.json");
            process::exit(cli::EXIT_USAGE);
        }
    };

    match command {
        Command::Eval | Command::Parse => run_stdin(command),
        Command::Repl => run_repl(),
        Command::Help => print_help(),
        Command::Version => println!("estree-eval {}", VERSION),
    }
}

fn print_help() {
    println!("{}", "estree-eval".cyan().bold());
    println!("Evaluates ESTree JSON for a small JavaScript subset");
    println!("{} {}\n", "Version".cyan(), VERSION);
    println!("{}", "USAGE:".yellow());
    println!("  estree-eval [eval] < tree.json   Evaluate and print the result");
    println!("  estree-eval parse < tree.json    Print the parsed tree");
    println!("  estree-eval repl                 Start interactive REPL");
    println!("  estree-eval help                 Show this help message");
    println!("  estree-eval version              Show version\n");
    println!("{}", "LANGUAGE FEATURES:".yellow());
    println!("  let x = 1, y = x + 1             Declarations");
    println!("  x = 2                            Assignment to a declared variable");
    println!("  a && b, a || b, !a               Short-circuiting logic");
    println!("  t ? a : b                        Conditionals");
    println!("  function (x) {{ return x }}       Single-parameter closures");
}

fn read_stdin() -> String {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("{}: no input; pipe an ESTree JSON document to stdin", "error".red());
        process::exit(cli::EXIT_USAGE);
    }

    let mut input = String::new();
    if let Err(e) = stdin.lock().read_to_string(&mut input) {
        eprintln!("{}: cannot read input: {}", "error".red(), e);
        process::exit(cli::EXIT_FAILURE);
    }

    if cli::is_absent_input(&input) {
        eprintln!("{}: no input; pipe an ESTree JSON document to stdin", "error".red());
        process::exit(cli::EXIT_USAGE);
    }
    input
}

fn run_stdin(command: Command) {
    let input = read_stdin();

    let program = match parse_str(&input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            process::exit(cli::EXIT_FAILURE);
        }
    };

    if command == Command::Parse {
        println!("{}", render_node(&program.into()));
        return;
    }

    // A language-level error is a printed result, not a failed run.
    let evaluation = evaluate_program(&program);
    println!("{}", render_result(&evaluation.result));
}

fn run_repl() {
    println!(
        "{} {} - {}",
        "estree-eval".cyan().bold(),
        VERSION.cyan(),
        "one ESTree JSON program per line".dimmed()
    );
    println!(
        "Type {} to exit, {} for help\n",
        "exit".yellow(),
        "help".yellow()
    );

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("{}: cannot start REPL: {}", "error".red(), e);
            process::exit(cli::EXIT_FAILURE);
        }
    };

    // Declarations and heap persist across lines
    let mut session = Session::new();

    loop {
        match rl.readline(&format!("{} ", "js>".green().bold())) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    "exit" | "quit" => {
                        println!("{}", "Goodbye!".cyan());
                        break;
                    }
                    "help" => {
                        print_repl_help();
                        continue;
                    }
                    "clear" => {
                        session = Session::new();
                        println!("{}", "State cleared.".dimmed());
                        continue;
                    }
                    _ => {}
                }

                let program = match parse_str(line) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };

                let result = session.run(&program);
                let rendered = render_result(&result);
                if result.is_ok() {
                    println!("{} {}", "=>".dimmed(), rendered.cyan());
                } else {
                    println!("{} {}", "=>".dimmed(), rendered.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Err(err) => {
                eprintln!("{}: {:?}", "error".red(), err);
                break;
            }
        }
    }
}

fn print_repl_help() {
    println!("{}", "REPL Commands:".yellow());
    println!("  exit, quit   Exit the REPL");
    println!("  clear        Forget all declarations and heap cells");
    println!("  help         Show this help\n");
    println!("{}", "Input:".yellow());
    println!("  Each line is one ESTree Program as JSON, e.g. the output of");
    println!("  acorn.parse(\"let x = 1; x + 1\", {{ ecmaVersion: 2020 }})");
}
