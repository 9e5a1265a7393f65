use std::fmt;
use std::slice::Iter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemOp {
    Load,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    LShift,
    RShift,
}

/// Every ILOC opcode, declared in opcode-table order so the discriminant is the
/// table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Load,
    LoadI,
    Store,
    Add,
    Sub,
    Mult,
    LShift,
    RShift,
    Output,
    Nop,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Load,
        Opcode::LoadI,
        Opcode::Store,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mult,
        Opcode::LShift,
        Opcode::RShift,
        Opcode::Output,
        Opcode::Nop,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Load => "load",
            Opcode::LoadI => "loadI",
            Opcode::Store => "store",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mult => "mult",
            Opcode::LShift => "lshift",
            Opcode::RShift => "rshift",
            Opcode::Output => "output",
            Opcode::Nop => "nop",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl From<MemOp> for Opcode {
    fn from(op: MemOp) -> Self {
        match op {
            MemOp::Load => Opcode::Load,
            MemOp::Store => Opcode::Store,
        }
    }
}

impl From<ArithOp> for Opcode {
    fn from(op: ArithOp) -> Self {
        match op {
            ArithOp::Add => Opcode::Add,
            ArithOp::Sub => Opcode::Sub,
            ArithOp::Mult => Opcode::Mult,
            ArithOp::LShift => Opcode::LShift,
            ArithOp::RShift => Opcode::RShift,
        }
    }
}

/// One validated ILOC instruction. Register fields hold the register number,
/// so `r7` is stored as `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Mem { op: MemOp, src: u32, dst: u32 },
    LoadI { constant: u32, dst: u32 },
    Arith { op: ArithOp, lhs: u32, rhs: u32, dst: u32 },
    Output { constant: u32 },
    Nop,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match *self {
            Instruction::Mem { op, .. } => op.into(),
            Instruction::LoadI { .. } => Opcode::LoadI,
            Instruction::Arith { op, .. } => op.into(),
            Instruction::Output { .. } => Opcode::Output,
            Instruction::Nop => Opcode::Nop,
        }
    }

    /// Flattens the instruction into the four-slot record layout used by dumps.
    pub fn record(&self) -> IrRecord {
        let opcode = self.opcode();
        let (operand1, operand2, destination) = match *self {
            Instruction::Mem { src, dst, .. } => (Some(src), None, Some(dst)),
            Instruction::LoadI { constant, dst } => (Some(constant), None, Some(dst)),
            Instruction::Arith { lhs, rhs, dst, .. } => (Some(lhs), Some(rhs), Some(dst)),
            Instruction::Output { constant } => (Some(constant), None, None),
            Instruction::Nop => (None, None, None),
        };

        IrRecord {
            opcode,
            operand1,
            operand2,
            destination,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrRecord {
    pub opcode: Opcode,
    pub operand1: Option<u32>,
    pub operand2: Option<u32>,
    pub destination: Option<u32>,
}

pub(crate) fn slot(value: Option<u32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_owned(),
    }
}

impl fmt::Display for IrRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.opcode,
            slot(self.operand1),
            slot(self.operand2),
            slot(self.destination)
        )
    }
}

/// Append-only instruction sequence, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ir {
    instructions: Vec<Instruction>,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, ins: Instruction) {
        self.instructions.push(ins);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn records(&self) -> impl Iterator<Item = IrRecord> + '_ {
        self.instructions.iter().map(Instruction::record)
    }
}

impl<'a> IntoIterator for &'a Ir {
    type Item = &'a Instruction;
    type IntoIter = Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
