use std::{env, io, process};

use loxido::Lox;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut lox = Lox::new(io::stdout());

    match args.len() {
        n if n > 2 => {
            eprintln!("Usage: loxido [script]");
            process::exit(64);
        },
        2 => lox.run_file(&args[1]),
        _ => lox.run_prompt(),
    };
}
