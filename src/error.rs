use std::{error::Error, fmt};

use miette::{miette, LabeledSpan, Report, Severity};

use crate::span::Span;

/// Kind of failure encountered while assembling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// MRI operand names a label that was never defined.
    UndefinedSymbol { label: String },
    /// Opcode table entry is neither a 3-bit binary code nor a 4-digit hex word.
    InvalidOpcodeFormat { mnemonic: String, code: String },
    /// `ORG`, `DEC` or `HEX` operand does not parse in its base.
    MalformedLiteral { literal: String, radix: u32 },
    /// First token is not an opcode, `ORG`, `END`, `DEC` or `HEX`.
    UnrecognizedMnemonic { mnemonic: String },
    /// Line is missing a token it requires.
    MalformedLine { expected: &'static str },
    /// Value does not fit the field it is placed in.
    AddressOverflow { address: u32, bits: u8 },
}

/// Error with the position it was found at, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsmError {
    pub kind: ErrorKind,
    /// 1-based source line number
    pub line: Option<usize>,
    pub span: Option<Span>,
}

impl AsmError {
    pub fn new(kind: ErrorKind) -> Self {
        AsmError {
            kind,
            line: None,
            span: None,
        }
    }

    pub fn at(kind: ErrorKind, line: usize, span: Span) -> Self {
        AsmError {
            kind,
            line: Some(line),
            span: Some(span),
        }
    }

    /// Build a printable error pointing into `src`, which must be the source lines joined
    /// with `\n`.
    pub fn report(&self, src: &str) -> Report {
        self.report_with(src, Severity::Error)
    }

    /// Same as [`AsmError::report`], for diagnostics that did not stop assembly.
    pub fn warning(&self, src: &str) -> Report {
        self.report_with(src, Severity::Warning)
    }

    fn report_with(&self, src: &str, severity: Severity) -> Report {
        let labels: Vec<LabeledSpan> = self
            .span
            .map(|span| LabeledSpan::at(span, self.kind.label()))
            .into_iter()
            .collect();
        miette!(
            severity = severity,
            code = self.kind.code(),
            help = self.kind.help(),
            labels = labels,
            "{}",
            self.kind,
        )
        .with_source_code(src.to_owned())
    }
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::UndefinedSymbol { .. } => "asm::undefined_symbol",
            ErrorKind::InvalidOpcodeFormat { .. } => "asm::opcode_format",
            ErrorKind::MalformedLiteral { .. } => "asm::bad_lit",
            ErrorKind::UnrecognizedMnemonic { .. } => "asm::unknown_mnemonic",
            ErrorKind::MalformedLine { .. } => "asm::malformed_line",
            ErrorKind::AddressOverflow { .. } => "asm::address_overflow",
        }
    }

    fn help(&self) -> String {
        match self {
            ErrorKind::UndefinedSymbol { .. } => {
                "define the label with `NAME,` at the start of a line".into()
            }
            ErrorKind::InvalidOpcodeFormat { .. } => {
                "memory-reference codes are 3 binary digits, others are 4 hex digits".into()
            }
            ErrorKind::MalformedLiteral { radix: 10, .. } => {
                "`DEC` takes a decimal value from -32768 to 65535".into()
            }
            ErrorKind::MalformedLiteral { .. } => {
                "`ORG` and `HEX` take a hexadecimal value from 0 to FFFF".into()
            }
            ErrorKind::UnrecognizedMnemonic { .. } => {
                "lines should start with an instruction, `ORG`, `END`, `DEC` or `HEX`".into()
            }
            ErrorKind::MalformedLine { .. } => "check the operands for this line".into(),
            ErrorKind::AddressOverflow { bits: 12, .. } => {
                "memory-reference instructions can only address 000 to FFF".into()
            }
            ErrorKind::AddressOverflow { .. } => "the program does not fit in memory".into(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::UndefinedSymbol { .. } => "undefined label",
            ErrorKind::InvalidOpcodeFormat { .. } => "invalid code",
            ErrorKind::MalformedLiteral { .. } => "incorrect literal",
            ErrorKind::UnrecognizedMnemonic { .. } => "unknown mnemonic",
            ErrorKind::MalformedLine { .. } => "incomplete line",
            ErrorKind::AddressOverflow { .. } => "out of range",
        }
    }
}

impl Error for AsmError {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedSymbol { label } => write!(f, "undefined symbol `{}`", label),
            Self::InvalidOpcodeFormat { mnemonic, code } => write!(
                f,
                "invalid opcode format for instruction `{}`: `{}`",
                mnemonic, code
            ),
            Self::MalformedLiteral { literal, radix } => {
                let base = if *radix == 10 { "decimal" } else { "hexadecimal" };
                write!(f, "malformed {} literal `{}`", base, literal)
            }
            Self::UnrecognizedMnemonic { mnemonic } => {
                write!(f, "unrecognized mnemonic `{}`", mnemonic)
            }
            Self::MalformedLine { expected } => write!(f, "malformed line: expected {}", expected),
            Self::AddressOverflow { address, bits } => {
                write!(f, "address 0x{:X} does not fit in {} bits", address, bits)
            }
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}", self.kind)
    }
}
