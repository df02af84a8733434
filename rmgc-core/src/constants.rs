// Word geometry. Bit 23 is the sign; bits 22..0 are the magnitude.
// There is no two's complement anywhere in this machine.
pub const WORD_MASK: u32 = 0x00FF_FFFF;
pub const SIGN_BIT: u32 = 0x0080_0000;
pub const MAGNITUDE_MASK: u32 = 0x007F_FFFF;

// Disc geometry: channels 00-56 octal, 128 sectors per channel
pub const CHANNELS: usize = 47;
pub const SECTORS: usize = 128;

pub mod machines {
    // Populated disc sizes in words
    pub const D17B_WORDS: usize = 2944;
    pub const D37C_WORDS: usize = 7222;
}

pub mod channels {
    // Rapid-access loop channel addresses
    pub const CHANNEL_F_LOOP: u8 = 0o52;
    pub const CHANNEL_H_LOOP: u8 = 0o54;
    pub const CHANNEL_E_LOOP: u8 = 0o56;
    pub const CHANNEL_U_LOOP: u8 = 0o60;
    pub const CHANNEL_L_REG: u8 = 0o64;
    pub const CHANNEL_V_LOOP: u8 = 0o70;
    pub const CHANNEL_R_LOOP: u8 = 0o72;

    // Modifiable bulk channel addressed by the flag store
    pub const CHANNEL_HOT: u8 = 0o50;
}

pub mod loops {
    // Loop lengths in words
    pub const U_LOOP_SIZE: usize = 1;
    pub const F_LOOP_SIZE: usize = 4;
    pub const E_LOOP_SIZE: usize = 8;
    pub const H_LOOP_SIZE: usize = 16;
    pub const L_LOOP_SIZE: usize = 1;
    pub const V_LOOP_SIZE: usize = 4;
    pub const R_LOOP_SIZE: usize = 4;
}

pub mod opcodes {
    // Primary 4-bit opcodes (bits 23..20)
    pub const OP_SHIFT: u8 = 0x0;
    pub const OP_SCL: u8 = 0x1;
    pub const OP_TMI_TZE: u8 = 0x2; // TMI on the D17B, TZE on the D37C
    pub const OP_SMP: u8 = 0x4;
    pub const OP_MPY: u8 = 0x5;
    pub const OP_TMI: u8 = 0x6;
    pub const OP_DIV_MPM: u8 = 0x7; // MPM on the D17B, DIV on the D37C
    pub const OP_SPECIAL: u8 = 0x8;
    pub const OP_CLA: u8 = 0x9;
    pub const OP_TRA: u8 = 0xA;
    pub const OP_STO: u8 = 0xB;
    pub const OP_SAD: u8 = 0xC;
    pub const OP_ADD: u8 = 0xD;
    pub const OP_SSU: u8 = 0xE;
    pub const OP_SUB: u8 = 0xF;
}

pub mod special {
    // Special family sub-opcodes, taken from (S >> 1) & 0x3F
    pub const SPEC_BOC: u8 = 0x01;
    pub const SPEC_BOA: u8 = 0x04;
    pub const SPEC_BOB: u8 = 0x05;
    pub const SPEC_RSD: u8 = 0x08;
    pub const SPEC_HPR: u8 = 0x09;
    pub const SPEC_DOA: u8 = 0x0B;
    pub const SPEC_VOA: u8 = 0x0C;
    pub const SPEC_VOB: u8 = 0x0D;
    pub const SPEC_VOC: u8 = 0x0E;
    pub const SPEC_ORA: u8 = 0x10; // D37C only
    pub const SPEC_ANA: u8 = 0x11;
    pub const SPEC_MIM: u8 = 0x12;
    pub const SPEC_COM: u8 = 0x13;
    pub const SPEC_DIB: u8 = 0x14;
    pub const SPEC_DIA: u8 = 0x15;
    pub const SPEC_HFC: u8 = 0x18;
    pub const SPEC_EFC: u8 = 0x19;
    pub const SPEC_LPR: u8 = 0x1E;
    pub const SPEC_LPR_HIGH: u8 = 0x1F;
}

pub mod shifts {
    // Shift family sub-opcodes, taken from (S >> 3) & 0x1F.
    // Slots 0x0B and 0x0F decode as rotates on the D37C.
    pub const SHIFT_SAL: u8 = 0x08;
    pub const SHIFT_ALS: u8 = 0x09;
    pub const SHIFT_SLL: u8 = 0x0A;
    pub const SHIFT_ALC: u8 = 0x0B;
    pub const SHIFT_SRL: u8 = 0x0B; // D17B reading of the ALC slot
    pub const SHIFT_SAR: u8 = 0x0C;
    pub const SHIFT_ARS: u8 = 0x0D;
    pub const SHIFT_SLR: u8 = 0x0E;
    pub const SHIFT_ARC: u8 = 0x0F;
    pub const SHIFT_SRR: u8 = 0x0F; // D17B reading of the ARC slot
    pub const SHIFT_COA: u8 = 0x10;
}
