use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use ilocfe::cli::{self, Mode};

#[derive(Parser)]
#[command(name = "ilocfe")]
#[command(about = "Scanner and parser front end for ILOC", version)]
struct Args {
    /// Print the list of tokens the scanner finds
    #[arg(short = 's')]
    scan: bool,

    /// Parse the file and report success or every error found
    #[arg(short = 'p')]
    parse: bool,

    /// Parse the file and print its intermediate representation
    #[arg(short = 'r')]
    dump: bool,

    /// With -r, print one `opcode op1 op2 dest` line per record instead of a table
    #[arg(long)]
    plain: bool,

    /// ILOC source file
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mode = Mode::from_flags(args.scan, args.parse, args.dump);

    let source = match ilocfe::read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if cli::run(mode, &source, args.plain) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
