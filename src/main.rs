use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use mano::{Assembler, Assembly, Emitted, Event};

/// Mano is a two-pass assembler for the basic computer instruction set.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.asm` file to assemble and list
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a `.asm` file and print its symbol table and machine code
    Assemble {
        /// `.asm` file to assemble
        name: PathBuf,
        /// Fail on undefined symbols and unrecognized mnemonics
        #[arg(short, long)]
        strict: bool,
        /// Print every label, origin and word as it is produced
        #[arg(short, long)]
        trace: bool,
    },
    /// Write the machine code listing of a `.asm` file
    Compile {
        /// `.asm` file to compile
        name: PathBuf,
        /// Destination to output listing, defaults to `<name>.lst`
        dest: Option<PathBuf>,
        /// Fail on undefined symbols and unrecognized mnemonics
        #[arg(short, long)]
        strict: bool,
    },
    /// Check a `.asm` file without outputting machine code
    Check {
        /// File to check
        name: PathBuf,
        /// Fail on undefined symbols and unrecognized mnemonics
        #[arg(short, long)]
        strict: bool,
    },
    /// Run the first pass only and print the symbol table
    Symbols {
        /// `.asm` file to scan
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    mano::env::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(mano::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    match args.command {
        Some(Command::Assemble {
            name,
            strict,
            trace,
        }) => {
            let assembly = assemble(&name, strict, trace)?;
            print!("{assembly}");
            Ok(())
        }
        Some(Command::Compile { name, dest, strict }) => {
            let assembly = assemble(&name, strict, false)?;
            let dest = dest.unwrap_or_else(|| name.with_extension("lst"));
            fs::write(&dest, assembly.output().to_string()).into_diagnostic()?;
            message(Green, "Finished", "emit machine code");
            file_message(Green, "Saved", &dest);
            Ok(())
        }
        Some(Command::Check { name, strict }) => {
            let assembly = assemble(&name, strict, false)?;
            if assembly.is_clean() {
                message(Green, "Success", "no errors found!");
            } else {
                let count = assembly.diagnostics().len();
                message(Cyan, "Finished", &format!("{count} warning(s)"));
            }
            Ok(())
        }
        Some(Command::Symbols { name }) => {
            file_message(Green, "Scanning", &name);
            let (lines, src) = read_source(&name)?;
            let symbols = Assembler::new()
                .symbols(&lines)
                .map_err(|err| err.report(&src))?;
            print!("{symbols}");
            Ok(())
        }
        None => {
            if let Some(path) = args.path {
                let assembly = assemble(&path, false, false)?;
                print!("{assembly}");
            } else {
                println!("\n~ mano v{VERSION} ~");
                println!("{SHORT_INFO}");
            }
            Ok(())
        }
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

/// Source lines, and the same lines joined for diagnostics.
fn read_source(name: &Path) -> Result<(Vec<String>, String)> {
    let contents = fs::read_to_string(name).into_diagnostic()?;
    let lines: Vec<String> = contents.lines().map(str::to_owned).collect();
    let src = lines.join("\n");
    Ok((lines, src))
}

/// Assemble a file, printing recoverable diagnostics as warnings.
fn assemble(name: &Path, strict: bool, trace: bool) -> Result<Assembly> {
    file_message(MsgColor::Green, "Assembling", name);
    let (lines, src) = read_source(name)?;

    let assembler = Assembler::new().strict(strict || mano::env::is_strict());
    let result = if trace || mano::env::is_trace() {
        assembler.assemble_with(&lines, &mut trace_event)
    } else {
        assembler.assemble(&lines)
    };
    let assembly = result.map_err(|err| err.report(&src))?;

    for diagnostic in assembly.diagnostics() {
        eprintln!("{:?}", diagnostic.warning(&src));
    }
    message(MsgColor::Green, "Finished", "assembly");
    Ok(assembly)
}

fn trace_event(event: &Event) {
    use MsgColor::*;
    match event {
        Event::Label { name, address } => {
            message(Cyan, "Label", &format!("{name} = {address:03X}"));
        }
        Event::Origin { pass, address } => {
            message(Cyan, "Origin", &format!("pass {pass} at {address:03X}"));
        }
        Event::Emit {
            line,
            address,
            word,
            source,
        } => {
            let text = match source {
                Emitted::MemoryReference {
                    mnemonic,
                    operand,
                    indirect: true,
                } => format!("{mnemonic} {operand} I"),
                Emitted::MemoryReference {
                    mnemonic, operand, ..
                } => format!("{mnemonic} {operand}"),
                Emitted::NonMemoryReference { mnemonic } => mnemonic.to_string(),
                Emitted::Data { directive, literal } => format!("{directive} {literal}"),
            };
            message(
                Green,
                "Encoded",
                &format!("{address:03X}: {word}  line {line}: {text}"),
            );
        }
        // Printed with source context once assembly finishes
        Event::Diagnostic(_) => {}
    }
}

const SHORT_INFO: &str = r"
Welcome to mano, an assembler for the basic computer.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
