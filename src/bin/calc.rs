use calcparse_rs::{free_variables, functions, OperatorError, Parser};
use log::{debug, info};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const USAGE: &str = r"Interactive math expression calculator.

Usage: calc [--example] [--math] [EXPRESSION]

  --example   print an example session and exit
  --math      enable sin, cos, tan, exp, ln, log10, floor, ceil, round, min, max, avg

Without EXPRESSION the expression is read from stdin. Set RUST_LOG=debug to trace parsing.";

/// Demo user function: sum of all arguments.
fn foo(args: &[f64]) -> Result<f64, OperatorError> {
    info!("foo was called with {:?}", args);
    Ok(args.iter().sum())
}

fn print_example() {
    println!("Instructions:");
    println!("1. Write math expression.");
    println!("2. Define all used variables.\n");
    println!("You can use multiple vars in the expression:");
    println!("x ^ (y + 3) - z");
    println!("x = 2");
    println!("y = 1");
    println!("z = 4");
    println!("Result: 12");
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String, String> {
    match lines.next() {
        Some(Ok(line)) => Ok(line),
        Some(Err(err)) => Err(err.to_string()),
        None => Err("unexpected end of input".to_string()),
    }
}

fn run(expression: Option<String>, math: bool) -> Result<f64, String> {
    let mut parser = Parser::new();
    parser.register_function("foo", foo);
    if math {
        functions::math::register(parser.registry_mut());
    }
    debug!("Registry: {:?}", parser.registry());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let formula = match expression {
        Some(formula) => formula,
        None => {
            println!("Input math expression:");
            read_line(&mut lines)?
        }
    };

    let tree = parser.parse(&formula).map_err(|e| e.to_string())?;
    println!("{}", tree);
    let vars_needed = free_variables(tree);

    let mut vars = HashMap::new();
    for name in vars_needed {
        print!("{} = ", name);
        io::stdout().flush().map_err(|e| e.to_string())?;
        let line = read_line(&mut lines)?;
        let value: f64 = line
            .trim()
            .parse()
            .map_err(|_| format!("Incorrect value for '{}': {}", name, line.trim()))?;
        vars.insert(name, value);
    }

    parser.evaluate(&vars).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let mut example = false;
    let mut math = false;
    let mut expression = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--example" => example = true,
            "--math" => math = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            _ if expression.is_none() => expression = Some(arg),
            _ => {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            }
        }
    }

    if example {
        print_example();
        return ExitCode::SUCCESS;
    }

    match run(expression, math) {
        Ok(result) => {
            println!("Result: {}", result);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
