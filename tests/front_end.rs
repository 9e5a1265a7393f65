use std::path::Path;

use ilocfe::error::FrontEndError;
use ilocfe::ir::{ArithOp, Instruction, IrRecord, MemOp, Opcode};
use ilocfe::lex::TokenKind;
use ilocfe::{read_source, scan_only, validate};
use pretty_assertions::assert_eq;

#[test]
fn add_round_trip() {
    let v = validate("add r1, r2 => r3");
    let records: Vec<_> = v.ir.records().collect();

    assert!(v.is_success());
    assert_eq!(
        records,
        vec![IrRecord {
            opcode: Opcode::Add,
            operand1: Some(1),
            operand2: Some(2),
            destination: Some(3),
        }]
    );
}

#[test]
fn lone_nop() {
    let v = validate("nop");

    assert!(v.diagnostics.is_empty());
    assert_eq!(v.ir.as_slice(), &[Instruction::Nop]);
}

#[test]
fn three_line_program() {
    let v = validate("loadI 5 => r1\nload r1 => r2\noutput 5\n");

    assert!(v.diagnostics.is_empty());
    assert_eq!(
        v.ir.as_slice(),
        &[
            Instruction::LoadI { constant: 5, dst: 1 },
            Instruction::Mem {
                op: MemOp::Load,
                src: 1,
                dst: 2,
            },
            Instruction::Output { constant: 5 },
        ]
    );
}

#[test]
fn missing_operand_reports_line_once() {
    let v = validate("add r1 => r2\n");

    assert_eq!(v.diagnostics.len(), 1);
    assert_eq!(v.diagnostics[0].line, 1);
    assert!(v.diagnostics[0]
        .message()
        .starts_with("Incorrect ARITHOP syntax"));
    assert!(v.ir.is_empty());
}

#[test]
fn clean_program_counts_every_keyword() {
    let source = "// a block
loadI 1024 => r0
loadI 4 => r1
lshift r0, r1 => r2

mult r2, r2 => r3 // square
rshift r3, r1 => r4
sub r4, r0 => r5
store r5 => r0
nop
output 1024
";
    let v = validate(source);
    let opcodes: Vec<_> = v.ir.iter().map(Instruction::opcode).collect();

    assert!(v.is_success());
    assert_eq!(
        opcodes,
        vec![
            Opcode::LoadI,
            Opcode::LoadI,
            Opcode::LShift,
            Opcode::Mult,
            Opcode::RShift,
            Opcode::Sub,
            Opcode::Store,
            Opcode::Nop,
            Opcode::Output,
        ]
    );
    assert_eq!(
        v.ir.as_slice()[3],
        Instruction::Arith {
            op: ArithOp::Mult,
            lhs: 2,
            rhs: 2,
            dst: 3,
        }
    );
}

#[test]
fn mixed_program_reports_each_bad_line() {
    let source = "loadI 5 => r1
load r1 r2
output 5
store => r1
add r1, r2 => r3 r4
nop";
    let v = validate(source);
    let lines: Vec<_> = v.diagnostics.iter().map(|d| d.line).collect();

    assert_eq!(lines, vec![2, 4, 5]);
    assert_eq!(v.ir.len(), 3);
    assert!(!v.is_success());
}

#[test]
fn scanning_twice_is_identical() {
    let source = "load r1 => r2 // x\n\nbad#\noutput 3";
    assert_eq!(scan_only(source), scan_only(source));
}

#[test]
fn scan_ends_with_single_eof() {
    let tokens = scan_only("nop\n");
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();

    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn missing_file_is_io_error() {
    let err = read_source(Path::new("definitely/not/here.i")).unwrap_err();

    match err {
        FrontEndError::Io { path, .. } => assert_eq!(path, Path::new("definitely/not/here.i")),
    }
}
