// Scanning
mod lexer;
pub mod source;
pub mod span;

// Assembling
pub mod opcode;
pub use opcode::{OpcodeKind, OpcodeTable};
pub mod symbol;
pub use symbol::SymbolTable;
pub mod encoder;
pub use encoder::{BinaryOutput, Word};
mod assembler;
pub use assembler::{assemble, Assembler, Assembly};
pub mod event;
pub use event::{Emitted, Event};

// Reporting
mod error;
pub use error::{AsmError, ErrorKind};
mod listing;

pub mod env;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
