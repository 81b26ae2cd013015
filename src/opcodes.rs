use crate::cpu::{AddressingMode, Operation};

pub struct Opcode {
  pub code: u8,
  pub mnemonic: &'static str,
  pub op: Operation,
  pub mode: AddressingMode,
  pub cycles: u8,
}

impl Opcode {
  fn new(code: u8, mnemonic: &'static str, op: Operation, mode: AddressingMode, cycles: u8) -> Self {
    Opcode {
      code,
      mnemonic,
      op,
      mode,
      cycles,
    }
  }
}

lazy_static! {
  // One entry per opcode byte, indexed directly by the byte value. Unassigned
  // opcodes carry the "???" mnemonic and either a NOP-shaped or inert handler
  // with the cycle cost the hardware charges for them.
  pub static ref OPCODE_TABLE: Vec<Opcode> = {
    use crate::cpu::AddressingMode::*;
    use crate::cpu::Operation::*;

    let table = vec![
      // 0x00 - 0x0F
      Opcode::new(0x00, "BRK", Brk, Immediate, 7),
      Opcode::new(0x01, "ORA", Ora, Indirect_X, 6),
      Opcode::new(0x02, "???", Xxx, Implied, 2),
      Opcode::new(0x03, "???", Xxx, Implied, 8),
      Opcode::new(0x04, "???", Nop, Implied, 3),
      Opcode::new(0x05, "ORA", Ora, ZeroPage, 3),
      Opcode::new(0x06, "ASL", Asl, ZeroPage, 5),
      Opcode::new(0x07, "???", Xxx, Implied, 5),
      Opcode::new(0x08, "PHP", Php, Implied, 3),
      Opcode::new(0x09, "ORA", Ora, Immediate, 2),
      Opcode::new(0x0A, "ASL", Asl, Implied, 2),
      Opcode::new(0x0B, "???", Xxx, Implied, 2),
      Opcode::new(0x0C, "???", Nop, Implied, 4),
      Opcode::new(0x0D, "ORA", Ora, Absolute, 4),
      Opcode::new(0x0E, "ASL", Asl, Absolute, 6),
      Opcode::new(0x0F, "???", Xxx, Implied, 6),
      // 0x10 - 0x1F
      Opcode::new(0x10, "BPL", Bpl, Relative, 2),
      Opcode::new(0x11, "ORA", Ora, Indirect_Y, 5),
      Opcode::new(0x12, "???", Xxx, Implied, 2),
      Opcode::new(0x13, "???", Xxx, Implied, 8),
      Opcode::new(0x14, "???", Nop, Implied, 4),
      Opcode::new(0x15, "ORA", Ora, ZeroPage_X, 4),
      Opcode::new(0x16, "ASL", Asl, ZeroPage_X, 6),
      Opcode::new(0x17, "???", Xxx, Implied, 6),
      Opcode::new(0x18, "CLC", Clc, Implied, 2),
      Opcode::new(0x19, "ORA", Ora, Absolute_Y, 4),
      Opcode::new(0x1A, "???", Nop, Implied, 2),
      Opcode::new(0x1B, "???", Xxx, Implied, 7),
      Opcode::new(0x1C, "???", Nop, Implied, 4),
      Opcode::new(0x1D, "ORA", Ora, Absolute_X, 4),
      Opcode::new(0x1E, "ASL", Asl, Absolute_X, 7),
      Opcode::new(0x1F, "???", Xxx, Implied, 7),
      // 0x20 - 0x2F
      Opcode::new(0x20, "JSR", Jsr, Absolute, 6),
      Opcode::new(0x21, "AND", And, Indirect_X, 6),
      Opcode::new(0x22, "???", Xxx, Implied, 2),
      Opcode::new(0x23, "???", Xxx, Implied, 8),
      Opcode::new(0x24, "BIT", Bit, ZeroPage, 3),
      Opcode::new(0x25, "AND", And, ZeroPage, 3),
      Opcode::new(0x26, "ROL", Rol, ZeroPage, 5),
      Opcode::new(0x27, "???", Xxx, Implied, 5),
      Opcode::new(0x28, "PLP", Plp, Implied, 4),
      Opcode::new(0x29, "AND", And, Immediate, 2),
      Opcode::new(0x2A, "ROL", Rol, Implied, 2),
      Opcode::new(0x2B, "???", Xxx, Implied, 2),
      Opcode::new(0x2C, "BIT", Bit, Absolute, 4),
      Opcode::new(0x2D, "AND", And, Absolute, 4),
      Opcode::new(0x2E, "ROL", Rol, Absolute, 6),
      Opcode::new(0x2F, "???", Xxx, Implied, 6),
      // 0x30 - 0x3F
      Opcode::new(0x30, "BMI", Bmi, Relative, 2),
      Opcode::new(0x31, "AND", And, Indirect_Y, 5),
      Opcode::new(0x32, "???", Xxx, Implied, 2),
      Opcode::new(0x33, "???", Xxx, Implied, 8),
      Opcode::new(0x34, "???", Nop, Implied, 4),
      Opcode::new(0x35, "AND", And, ZeroPage_X, 4),
      Opcode::new(0x36, "ROL", Rol, ZeroPage_X, 6),
      Opcode::new(0x37, "???", Xxx, Implied, 6),
      Opcode::new(0x38, "SEC", Sec, Implied, 2),
      Opcode::new(0x39, "AND", And, Absolute_Y, 4),
      Opcode::new(0x3A, "???", Nop, Implied, 2),
      Opcode::new(0x3B, "???", Xxx, Implied, 7),
      Opcode::new(0x3C, "???", Nop, Implied, 4),
      Opcode::new(0x3D, "AND", And, Absolute_X, 4),
      Opcode::new(0x3E, "ROL", Rol, Absolute_X, 7),
      Opcode::new(0x3F, "???", Xxx, Implied, 7),
      // 0x40 - 0x4F
      Opcode::new(0x40, "RTI", Rti, Implied, 6),
      Opcode::new(0x41, "EOR", Eor, Indirect_X, 6),
      Opcode::new(0x42, "???", Xxx, Implied, 2),
      Opcode::new(0x43, "???", Xxx, Implied, 8),
      Opcode::new(0x44, "???", Nop, Implied, 3),
      Opcode::new(0x45, "EOR", Eor, ZeroPage, 3),
      Opcode::new(0x46, "LSR", Lsr, ZeroPage, 5),
      Opcode::new(0x47, "???", Xxx, Implied, 5),
      Opcode::new(0x48, "PHA", Pha, Implied, 3),
      Opcode::new(0x49, "EOR", Eor, Immediate, 2),
      Opcode::new(0x4A, "LSR", Lsr, Implied, 2),
      Opcode::new(0x4B, "???", Xxx, Implied, 2),
      Opcode::new(0x4C, "JMP", Jmp, Absolute, 3),
      Opcode::new(0x4D, "EOR", Eor, Absolute, 4),
      Opcode::new(0x4E, "LSR", Lsr, Absolute, 6),
      Opcode::new(0x4F, "???", Xxx, Implied, 6),
      // 0x50 - 0x5F
      Opcode::new(0x50, "BVC", Bvc, Relative, 2),
      Opcode::new(0x51, "EOR", Eor, Indirect_Y, 5),
      Opcode::new(0x52, "???", Xxx, Implied, 2),
      Opcode::new(0x53, "???", Xxx, Implied, 8),
      Opcode::new(0x54, "???", Nop, Implied, 4),
      Opcode::new(0x55, "EOR", Eor, ZeroPage_X, 4),
      Opcode::new(0x56, "LSR", Lsr, ZeroPage_X, 6),
      Opcode::new(0x57, "???", Xxx, Implied, 6),
      Opcode::new(0x58, "CLI", Cli, Implied, 2),
      Opcode::new(0x59, "EOR", Eor, Absolute_Y, 4),
      Opcode::new(0x5A, "???", Nop, Implied, 2),
      Opcode::new(0x5B, "???", Xxx, Implied, 7),
      Opcode::new(0x5C, "???", Nop, Implied, 4),
      Opcode::new(0x5D, "EOR", Eor, Absolute_X, 4),
      Opcode::new(0x5E, "LSR", Lsr, Absolute_X, 7),
      Opcode::new(0x5F, "???", Xxx, Implied, 7),
      // 0x60 - 0x6F
      Opcode::new(0x60, "RTS", Rts, Implied, 6),
      Opcode::new(0x61, "ADC", Adc, Indirect_X, 6),
      Opcode::new(0x62, "???", Xxx, Implied, 2),
      Opcode::new(0x63, "???", Xxx, Implied, 8),
      Opcode::new(0x64, "???", Nop, Implied, 3),
      Opcode::new(0x65, "ADC", Adc, ZeroPage, 3),
      Opcode::new(0x66, "ROR", Ror, ZeroPage, 5),
      Opcode::new(0x67, "???", Xxx, Implied, 5),
      Opcode::new(0x68, "PLA", Pla, Implied, 4),
      Opcode::new(0x69, "ADC", Adc, Immediate, 2),
      Opcode::new(0x6A, "ROR", Ror, Implied, 2),
      Opcode::new(0x6B, "???", Xxx, Implied, 2),
      Opcode::new(0x6C, "JMP", Jmp, Indirect, 5),
      Opcode::new(0x6D, "ADC", Adc, Absolute, 4),
      Opcode::new(0x6E, "ROR", Ror, Absolute, 6),
      Opcode::new(0x6F, "???", Xxx, Implied, 6),
      // 0x70 - 0x7F
      Opcode::new(0x70, "BVS", Bvs, Relative, 2),
      Opcode::new(0x71, "ADC", Adc, Indirect_Y, 5),
      Opcode::new(0x72, "???", Xxx, Implied, 2),
      Opcode::new(0x73, "???", Xxx, Implied, 8),
      Opcode::new(0x74, "???", Nop, Implied, 4),
      Opcode::new(0x75, "ADC", Adc, ZeroPage_X, 4),
      Opcode::new(0x76, "ROR", Ror, ZeroPage_X, 6),
      Opcode::new(0x77, "???", Xxx, Implied, 6),
      Opcode::new(0x78, "SEI", Sei, Implied, 2),
      Opcode::new(0x79, "ADC", Adc, Absolute_Y, 4),
      Opcode::new(0x7A, "???", Nop, Implied, 2),
      Opcode::new(0x7B, "???", Xxx, Implied, 7),
      Opcode::new(0x7C, "???", Nop, Implied, 4),
      Opcode::new(0x7D, "ADC", Adc, Absolute_X, 4),
      Opcode::new(0x7E, "ROR", Ror, Absolute_X, 7),
      Opcode::new(0x7F, "???", Xxx, Implied, 7),
      // 0x80 - 0x8F
      Opcode::new(0x80, "???", Nop, Implied, 2),
      Opcode::new(0x81, "STA", Sta, Indirect_X, 6),
      Opcode::new(0x82, "???", Nop, Implied, 2),
      Opcode::new(0x83, "???", Xxx, Implied, 6),
      Opcode::new(0x84, "STY", Sty, ZeroPage, 3),
      Opcode::new(0x85, "STA", Sta, ZeroPage, 3),
      Opcode::new(0x86, "STX", Stx, ZeroPage, 3),
      Opcode::new(0x87, "???", Xxx, Implied, 3),
      Opcode::new(0x88, "DEY", Dey, Implied, 2),
      Opcode::new(0x89, "???", Nop, Implied, 2),
      Opcode::new(0x8A, "TXA", Txa, Implied, 2),
      Opcode::new(0x8B, "???", Xxx, Implied, 2),
      Opcode::new(0x8C, "STY", Sty, Absolute, 4),
      Opcode::new(0x8D, "STA", Sta, Absolute, 4),
      Opcode::new(0x8E, "STX", Stx, Absolute, 4),
      Opcode::new(0x8F, "???", Xxx, Implied, 4),
      // 0x90 - 0x9F
      Opcode::new(0x90, "BCC", Bcc, Relative, 2),
      Opcode::new(0x91, "STA", Sta, Indirect_Y, 6),
      Opcode::new(0x92, "???", Xxx, Implied, 2),
      Opcode::new(0x93, "???", Xxx, Implied, 6),
      Opcode::new(0x94, "STY", Sty, ZeroPage_X, 4),
      Opcode::new(0x95, "STA", Sta, ZeroPage_X, 4),
      Opcode::new(0x96, "STX", Stx, ZeroPage_Y, 4),
      Opcode::new(0x97, "???", Xxx, Implied, 4),
      Opcode::new(0x98, "TYA", Tya, Implied, 2),
      Opcode::new(0x99, "STA", Sta, Absolute_Y, 5),
      Opcode::new(0x9A, "TXS", Txs, Implied, 2),
      Opcode::new(0x9B, "???", Xxx, Implied, 5),
      Opcode::new(0x9C, "???", Nop, Implied, 5),
      Opcode::new(0x9D, "STA", Sta, Absolute_X, 5),
      Opcode::new(0x9E, "???", Xxx, Implied, 5),
      Opcode::new(0x9F, "???", Xxx, Implied, 5),
      // 0xA0 - 0xAF
      Opcode::new(0xA0, "LDY", Ldy, Immediate, 2),
      Opcode::new(0xA1, "LDA", Lda, Indirect_X, 6),
      Opcode::new(0xA2, "LDX", Ldx, Immediate, 2),
      Opcode::new(0xA3, "???", Xxx, Implied, 6),
      Opcode::new(0xA4, "LDY", Ldy, ZeroPage, 3),
      Opcode::new(0xA5, "LDA", Lda, ZeroPage, 3),
      Opcode::new(0xA6, "LDX", Ldx, ZeroPage, 3),
      Opcode::new(0xA7, "???", Xxx, Implied, 3),
      Opcode::new(0xA8, "TAY", Tay, Implied, 2),
      Opcode::new(0xA9, "LDA", Lda, Immediate, 2),
      Opcode::new(0xAA, "TAX", Tax, Implied, 2),
      Opcode::new(0xAB, "???", Xxx, Implied, 2),
      Opcode::new(0xAC, "LDY", Ldy, Absolute, 4),
      Opcode::new(0xAD, "LDA", Lda, Absolute, 4),
      Opcode::new(0xAE, "LDX", Ldx, Absolute, 4),
      Opcode::new(0xAF, "???", Xxx, Implied, 4),
      // 0xB0 - 0xBF
      Opcode::new(0xB0, "BCS", Bcs, Relative, 2),
      Opcode::new(0xB1, "LDA", Lda, Indirect_Y, 5),
      Opcode::new(0xB2, "???", Xxx, Implied, 2),
      Opcode::new(0xB3, "???", Xxx, Implied, 5),
      Opcode::new(0xB4, "LDY", Ldy, ZeroPage_X, 4),
      Opcode::new(0xB5, "LDA", Lda, ZeroPage_X, 4),
      Opcode::new(0xB6, "LDX", Ldx, ZeroPage_Y, 4),
      Opcode::new(0xB7, "???", Xxx, Implied, 4),
      Opcode::new(0xB8, "CLV", Clv, Implied, 2),
      Opcode::new(0xB9, "LDA", Lda, Absolute_Y, 4),
      Opcode::new(0xBA, "TSX", Tsx, Implied, 2),
      Opcode::new(0xBB, "???", Xxx, Implied, 4),
      Opcode::new(0xBC, "LDY", Ldy, Absolute_X, 4),
      Opcode::new(0xBD, "LDA", Lda, Absolute_X, 4),
      Opcode::new(0xBE, "LDX", Ldx, Absolute_Y, 4),
      Opcode::new(0xBF, "???", Xxx, Implied, 4),
      // 0xC0 - 0xCF
      Opcode::new(0xC0, "CPY", Cpy, Immediate, 2),
      Opcode::new(0xC1, "CMP", Cmp, Indirect_X, 6),
      Opcode::new(0xC2, "???", Nop, Implied, 2),
      Opcode::new(0xC3, "???", Xxx, Implied, 8),
      Opcode::new(0xC4, "CPY", Cpy, ZeroPage, 3),
      Opcode::new(0xC5, "CMP", Cmp, ZeroPage, 3),
      Opcode::new(0xC6, "DEC", Dec, ZeroPage, 5),
      Opcode::new(0xC7, "???", Xxx, Implied, 5),
      Opcode::new(0xC8, "INY", Iny, Implied, 2),
      Opcode::new(0xC9, "CMP", Cmp, Immediate, 2),
      Opcode::new(0xCA, "DEX", Dex, Implied, 2),
      Opcode::new(0xCB, "???", Xxx, Implied, 2),
      Opcode::new(0xCC, "CPY", Cpy, Absolute, 4),
      Opcode::new(0xCD, "CMP", Cmp, Absolute, 4),
      Opcode::new(0xCE, "DEC", Dec, Absolute, 6),
      Opcode::new(0xCF, "???", Xxx, Implied, 6),
      // 0xD0 - 0xDF
      Opcode::new(0xD0, "BNE", Bne, Relative, 2),
      Opcode::new(0xD1, "CMP", Cmp, Indirect_Y, 5),
      Opcode::new(0xD2, "???", Xxx, Implied, 2),
      Opcode::new(0xD3, "???", Xxx, Implied, 8),
      Opcode::new(0xD4, "???", Nop, Implied, 4),
      Opcode::new(0xD5, "CMP", Cmp, ZeroPage_X, 4),
      Opcode::new(0xD6, "DEC", Dec, ZeroPage_X, 6),
      Opcode::new(0xD7, "???", Xxx, Implied, 6),
      Opcode::new(0xD8, "CLD", Cld, Implied, 2),
      Opcode::new(0xD9, "CMP", Cmp, Absolute_Y, 4),
      Opcode::new(0xDA, "???", Nop, Implied, 2),
      Opcode::new(0xDB, "???", Xxx, Implied, 7),
      Opcode::new(0xDC, "???", Nop, Implied, 4),
      Opcode::new(0xDD, "CMP", Cmp, Absolute_X, 4),
      Opcode::new(0xDE, "DEC", Dec, Absolute_X, 7),
      Opcode::new(0xDF, "???", Xxx, Implied, 7),
      // 0xE0 - 0xEF
      Opcode::new(0xE0, "CPX", Cpx, Immediate, 2),
      Opcode::new(0xE1, "SBC", Sbc, Indirect_X, 6),
      Opcode::new(0xE2, "???", Nop, Implied, 2),
      Opcode::new(0xE3, "???", Xxx, Implied, 8),
      Opcode::new(0xE4, "CPX", Cpx, ZeroPage, 3),
      Opcode::new(0xE5, "SBC", Sbc, ZeroPage, 3),
      Opcode::new(0xE6, "INC", Inc, ZeroPage, 5),
      Opcode::new(0xE7, "???", Xxx, Implied, 5),
      Opcode::new(0xE8, "INX", Inx, Implied, 2),
      Opcode::new(0xE9, "SBC", Sbc, Immediate, 2),
      Opcode::new(0xEA, "NOP", Nop, Implied, 2),
      Opcode::new(0xEB, "???", Xxx, Implied, 2),
      Opcode::new(0xEC, "CPX", Cpx, Absolute, 4),
      Opcode::new(0xED, "SBC", Sbc, Absolute, 4),
      Opcode::new(0xEE, "INC", Inc, Absolute, 6),
      Opcode::new(0xEF, "???", Xxx, Implied, 6),
      // 0xF0 - 0xFF
      Opcode::new(0xF0, "BEQ", Beq, Relative, 2),
      Opcode::new(0xF1, "SBC", Sbc, Indirect_Y, 5),
      Opcode::new(0xF2, "???", Xxx, Implied, 2),
      Opcode::new(0xF3, "???", Xxx, Implied, 8),
      Opcode::new(0xF4, "???", Nop, Implied, 4),
      Opcode::new(0xF5, "SBC", Sbc, ZeroPage_X, 4),
      Opcode::new(0xF6, "INC", Inc, ZeroPage_X, 6),
      Opcode::new(0xF7, "???", Xxx, Implied, 6),
      Opcode::new(0xF8, "SED", Sed, Implied, 2),
      Opcode::new(0xF9, "SBC", Sbc, Absolute_Y, 4),
      Opcode::new(0xFA, "???", Nop, Implied, 2),
      Opcode::new(0xFB, "???", Xxx, Implied, 7),
      Opcode::new(0xFC, "???", Nop, Implied, 4),
      Opcode::new(0xFD, "SBC", Sbc, Absolute_X, 4),
      Opcode::new(0xFE, "INC", Inc, Absolute_X, 7),
      Opcode::new(0xFF, "???", Xxx, Implied, 7),
    ];

    debug_assert_eq!(table.len(), 256);
    table
  };
}
