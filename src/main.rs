extern crate blparse;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate structopt;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::result;

use failure::ResultExt;
use structopt::StructOpt;

use blparse::{analysis, lexer, parser, Program};

type Result<T> = result::Result<T, failure::Error>;

macro_rules! display {
    ($fmt:expr) => (eprintln!(concat!(env!("CARGO_PKG_NAME"), ": ", $fmt)));
    ($fmt:expr, $($arg:tt)*) => (eprintln!(concat!(env!("CARGO_PKG_NAME"), ": ", $fmt), $($arg)*));
}

fn display_err(e: &failure::Error) {
    let causes: Vec<String> = e.iter_chain().map(|c| format!("{}", c)).collect();
    display!("{}", causes.join(": "));
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Parse and pretty print a BL program")]
struct Options {
    #[structopt(
        name = "FILE",
        help = "BL source file, standard input if omitted",
        parse(from_os_str)
    )]
    file: Option<PathBuf>,

    #[structopt(long = "count", help = "Report the number of primitive instruction calls")]
    count: bool,

    #[structopt(short = "q", long = "quiet", help = "Don't print the parsed program")]
    quiet: bool,
}

fn main() {
    env_logger::init();

    let options = Options::from_args();

    let code = match run(&options) {
        Ok(()) => 0,
        Err(e) => {
            display_err(&e);
            1
        }
    };

    process::exit(code);
}

fn run(options: &Options) -> Result<()> {
    let (name, src) = read_source(options.file.as_ref())?;
    debug!("read {} bytes from {}", src.len(), name);

    let mut tokens = lexer::tokenize(&src);
    let program = parser::parse(&mut tokens).with_context(|_| name.clone())?;

    if !options.quiet {
        print!("{}", program);
    }

    if options.count {
        report_counts(&program);
    }

    Ok(())
}

fn read_source(path: Option<&PathBuf>) -> Result<(String, String)> {
    match path {
        Some(path) => {
            let name = path.display().to_string();
            let src = fs::read_to_string(path).with_context(|_| name.clone())?;
            Ok((name, src))
        }
        None => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .with_context(|_| "<stdin>")?;
            Ok(("<stdin>".to_string(), src))
        }
    }
}

fn report_counts(program: &Program) {
    for instruction in program.context().iter() {
        println!(
            "{}: {}",
            instruction.name,
            analysis::count_primitive_calls(&instruction.body)
        );
    }
    println!(
        "{}: {}",
        program.name(),
        analysis::count_primitive_calls(program.body())
    );
    println!(
        "total: {}",
        analysis::count_primitive_calls_in_program(program)
    );
}
