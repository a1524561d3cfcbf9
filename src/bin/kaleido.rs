//! Kaleidoscope front-end command line.
//!
//! When called without argument it drops into an interactive prompt; each
//! line is parsed and lowered in a shared session, so operator definitions
//! carry over to later lines.
//!
//! When called with arguments, it processes the corresponding files in a
//! single session (so declarations in one file are visible in the next).

use std::env;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufReader;

use anyhow::{self, Context};

use kaleido::lower::Registrar;
use kaleido::session::Session;

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        run_all_files(args)?;
    } else {
        run_prompt()?;
    }
    Ok(())
}

fn run_all_files(paths: Vec<String>) -> Result<(), anyhow::Error> {
    let mut session_out = io::stdout();
    let mut session = Session::new(&mut session_out, Registrar::new());

    for p in &paths {
        let reader =
            BufReader::new(File::open(p).with_context(|| format!("failed to open {}", p))?);
        session.eval(reader)?;
    }

    Ok(())
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut prompt_out = io::stdout();
    let mut session_out = io::stdout();

    let mut session = Session::new(&mut session_out, Registrar::new());

    let mut input = String::new();
    loop {
        prompt_out.write_all(b"ready> ")?;
        prompt_out.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        if let Err(e) = session.eval(input.as_bytes()) {
            println!("{}", e);
        }
    }

    Ok(())
}
