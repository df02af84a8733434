use crate::constants::shifts::*;
use crate::constants::special::*;
use crate::constants::{MAGNITUDE_MASK, SIGN_BIT, WORD_MASK};
use crate::cpu::Cpu;
use crate::decoder::Instruction;
use crate::utils;
use log::warn;

/// Arithmetic-family operations. Each fetches its operand from the
/// instruction's (channel, sector); the flag-store side effect is
/// sequenced by the caller after the operation completes.
pub trait Arithmetic {
    fn cla(&mut self, inst: &Instruction); // Clear and Add
    fn add(&mut self, inst: &Instruction); // Add
    fn sub(&mut self, inst: &Instruction); // Subtract
    fn sad(&mut self, inst: &Instruction); // Split Add
    fn ssu(&mut self, inst: &Instruction); // Split Subtract
    fn scl(&mut self, inst: &Instruction); // Split Compare and Limit
    fn sto(&mut self, inst: &Instruction); // Store Accumulator
    fn mpy(&mut self, inst: &Instruction); // Multiply
    fn smp(&mut self, inst: &Instruction); // Split Multiply
    fn mpm(&mut self, inst: &Instruction); // Multiply Magnitude
    fn div(&mut self, inst: &Instruction); // Divide
}

// Multiplies magnitudes into the 46-bit A:L pair. A takes the high 23
// magnitude bits and the sign; L takes the low 23 bits unsigned.
fn accumulate_product(cpu: &mut Cpu, lhs_mag: u64, rhs_mag: u64, negative: bool) {
    let product = lhs_mag * rhs_mag;
    let mut high = ((product >> 23) & MAGNITUDE_MASK as u64) as u32;
    if negative && product != 0 {
        high |= SIGN_BIT;
    }
    cpu.a = high;
    cpu.mem.loops.l = (product & MAGNITUDE_MASK as u64) as u32;
}

// Split-multiply operand: the 9-bit magnitude in bits 22..14; the
// word's own sign bit carries the sign separately
fn split_operand(value: u32) -> u64 {
    ((value >> 14) & 0x1FF) as u64
}

impl Arithmetic for Cpu {
    fn cla(&mut self, inst: &Instruction) {
        self.a = self.operand(inst);
    }

    fn add(&mut self, inst: &Instruction) {
        let operand = self.operand(inst);
        self.a = utils::add_sm(self.a, operand);
    }

    fn sub(&mut self, inst: &Instruction) {
        let operand = self.operand(inst);
        self.a = utils::sub_sm(self.a, operand);
    }

    fn sad(&mut self, inst: &Instruction) {
        // Lanes add independently with 12-bit truncation; no carry
        // crosses the lane boundary
        let operand = self.operand(inst);
        self.a = utils::pack_lanes(
            utils::hi_lane(self.a).wrapping_add(utils::hi_lane(operand)),
            utils::lo_lane(self.a).wrapping_add(utils::lo_lane(operand)),
        );
    }

    fn ssu(&mut self, inst: &Instruction) {
        let operand = self.operand(inst);
        self.a = utils::pack_lanes(
            utils::hi_lane(self.a).wrapping_sub(utils::hi_lane(operand)),
            utils::lo_lane(self.a).wrapping_sub(utils::lo_lane(operand)),
        );
    }

    fn scl(&mut self, inst: &Instruction) {
        // Clamps each signed accumulator lane into the interval set by
        // the operand lane
        let operand = self.operand(inst);
        let mut a_hi = utils::lane_signed(utils::hi_lane(self.a));
        let mut a_lo = utils::lane_signed(utils::lo_lane(self.a));
        let o_hi = utils::lane_signed(utils::hi_lane(operand));
        let o_lo = utils::lane_signed(utils::lo_lane(operand));

        if a_hi > o_hi {
            a_hi = o_hi;
        }
        if a_hi < -o_hi {
            a_hi = -o_hi;
        }
        if a_lo > o_lo {
            a_lo = o_lo;
        }
        if a_lo < -o_lo {
            a_lo = -o_lo;
        }

        self.a = utils::pack_lanes(a_hi as u32, a_lo as u32);
    }

    fn sto(&mut self, inst: &Instruction) {
        let value = self.a;
        self.mem.write(inst.channel(), inst.sector(), value);
    }

    fn mpy(&mut self, inst: &Instruction) {
        let operand = self.operand(inst);
        let negative = (self.a ^ operand) & SIGN_BIT != 0;
        accumulate_product(
            self,
            (self.a & MAGNITUDE_MASK) as u64,
            (operand & MAGNITUDE_MASK) as u64,
            negative,
        );
    }

    fn smp(&mut self, inst: &Instruction) {
        let operand = self.operand(inst);
        let negative = (self.a ^ operand) & SIGN_BIT != 0;
        accumulate_product(self, split_operand(self.a), split_operand(operand), negative);
    }

    fn mpm(&mut self, inst: &Instruction) {
        // Both signs are stripped before the multiply
        let operand = self.operand(inst);
        accumulate_product(
            self,
            (self.a & MAGNITUDE_MASK) as u64,
            (operand & MAGNITUDE_MASK) as u64,
            false,
        );
    }

    fn div(&mut self, inst: &Instruction) {
        let divisor = self.operand(inst);
        if divisor & MAGNITUDE_MASK == 0 {
            warn!("division by zero-magnitude divisor");
            self.error = true;
            return;
        }

        let dividend_neg = self.a & SIGN_BIT != 0;
        let quotient_neg = dividend_neg != (divisor & SIGN_BIT != 0);

        // The dividend is the 46-bit magnitude held across A:L
        let dividend =
            (((self.a & MAGNITUDE_MASK) as u64) << 23) | (self.mem.loops.l & MAGNITUDE_MASK) as u64;
        let divisor_mag = (divisor & MAGNITUDE_MASK) as u64;

        let mut quotient = dividend / divisor_mag;
        let remainder = dividend % divisor_mag;

        if quotient > MAGNITUDE_MASK as u64 {
            warn!("quotient overflow, saturating");
            self.error = true;
            quotient = MAGNITUDE_MASK as u64;
        }

        self.a = quotient as u32;
        if quotient_neg && quotient != 0 {
            self.a |= SIGN_BIT;
        }

        let mut low = remainder as u32;
        if dividend_neg && remainder != 0 {
            low |= SIGN_BIT;
        }
        self.mem.loops.l = low;
    }
}

/// Shift/rotate family. The operand field is repurposed: the sub-op
/// lives in sector bits 6..3 and the count in bits 2..0, with a count
/// of 0 meaning 8. Right shifts are logical; the sign bit shifts with
/// the rest of the word.
pub trait ShiftRotate {
    fn shift(&mut self, inst: &Instruction);
    fn sal(&mut self, count: u32); // both lanes left
    fn als(&mut self, count: u32); // full word left
    fn sll(&mut self, count: u32); // high lane left
    fn srl(&mut self, count: u32); // low lane left (D17B)
    fn alc(&mut self, count: u32); // full word rotate left (D37C)
    fn sar(&mut self, count: u32); // both lanes right
    fn ars(&mut self, count: u32); // full word right
    fn slr(&mut self, count: u32); // high lane right
    fn srr(&mut self, count: u32); // low lane right (D17B)
    fn arc(&mut self, count: u32); // full word rotate right (D37C)
    fn coa(&mut self); // character output
}

impl ShiftRotate for Cpu {
    fn shift(&mut self, inst: &Instruction) {
        let sector = inst.sector() as u32;
        let sub_op = ((sector >> 3) & 0x1F) as u8;
        let mut count = sector & 0x7;
        if count == 0 {
            count = 8;
        }

        match sub_op {
            SHIFT_SAL => self.sal(count),
            SHIFT_ALS => self.als(count),
            SHIFT_SLL => self.sll(count),
            SHIFT_ALC => {
                if self.d37c {
                    self.alc(count)
                } else {
                    self.srl(count)
                }
            }
            SHIFT_SAR => self.sar(count),
            SHIFT_ARS => self.ars(count),
            SHIFT_SLR => self.slr(count),
            SHIFT_ARC => {
                if self.d37c {
                    self.arc(count)
                } else {
                    self.srr(count)
                }
            }
            SHIFT_COA => self.coa(),
            _ => {}
        }
    }

    fn sal(&mut self, count: u32) {
        self.a = utils::pack_lanes(
            utils::hi_lane(self.a) << count,
            utils::lo_lane(self.a) << count,
        );
    }

    fn als(&mut self, count: u32) {
        self.a = (self.a << count) & WORD_MASK;
    }

    fn sll(&mut self, count: u32) {
        self.a = utils::pack_lanes(utils::hi_lane(self.a) << count, utils::lo_lane(self.a));
    }

    fn srl(&mut self, count: u32) {
        self.a = utils::pack_lanes(utils::hi_lane(self.a), utils::lo_lane(self.a) << count);
    }

    fn alc(&mut self, count: u32) {
        let value = self.a & WORD_MASK;
        self.a = ((value << count) | (value >> (24 - count))) & WORD_MASK;
    }

    fn sar(&mut self, count: u32) {
        self.a = utils::pack_lanes(
            utils::hi_lane(self.a) >> count,
            utils::lo_lane(self.a) >> count,
        );
    }

    fn ars(&mut self, count: u32) {
        self.a >>= count;
    }

    fn slr(&mut self, count: u32) {
        self.a = utils::pack_lanes(utils::hi_lane(self.a) >> count, utils::lo_lane(self.a));
    }

    fn srr(&mut self, count: u32) {
        self.a = utils::pack_lanes(utils::hi_lane(self.a), utils::lo_lane(self.a) >> count);
    }

    fn arc(&mut self, count: u32) {
        let value = self.a & WORD_MASK;
        self.a = ((value >> count) | (value << (24 - count))) & WORD_MASK;
    }

    fn coa(&mut self) {
        let character = (self.a & 0xF) as u8;
        self.mem.io.emit_character(character);
    }
}

/// Control transfers. A taken branch writes the target straight into
/// the location register and the caller skips the Sp update.
pub trait ControlFlow {
    fn tra(&mut self, inst: &Instruction) -> bool; // Transfer
    fn tmi(&mut self, inst: &Instruction) -> bool; // Transfer on Minus
    fn tze(&mut self, inst: &Instruction) -> bool; // Transfer on Zero
}

impl ControlFlow for Cpu {
    fn tra(&mut self, inst: &Instruction) -> bool {
        self.jump(inst.channel(), inst.sector());
        true
    }

    fn tmi(&mut self, inst: &Instruction) -> bool {
        if self.a & SIGN_BIT != 0 {
            self.jump(inst.channel(), inst.sector());
            return true;
        }
        false
    }

    fn tze(&mut self, inst: &Instruction) -> bool {
        // Zero is a magnitude test; minus zero branches too
        if self.a & MAGNITUDE_MASK == 0 {
            self.jump(inst.channel(), inst.sector());
            return true;
        }
        false
    }
}

/// Special/IO family, sub-op in sector bits 6..1. Unknown sub-ops are
/// ignored.
pub trait SpecialIo {
    fn special(&mut self, inst: &Instruction);
}

impl SpecialIo for Cpu {
    fn special(&mut self, inst: &Instruction) {
        let sector = inst.sector();
        let sub_op = (sector >> 1) & 0x3F;

        match sub_op {
            SPEC_HPR => self.halted = true,
            SPEC_RSD => self.mem.io.detector = false,
            SPEC_EFC => self.mem.io.countdown_enabled = true,
            SPEC_HFC => self.mem.io.countdown_enabled = false,
            SPEC_LPR | SPEC_LPR_HIGH => self.p = sector & 0x7,
            SPEC_DIA => self.a = self.mem.io.discrete_in_a,
            SPEC_DIB => self.a = self.mem.io.discrete_in_b,
            SPEC_DOA => self.mem.io.discrete_out_a = self.a,
            SPEC_VOA => {
                let level = utils::to_signed(self.a >> 15) as i16;
                self.mem.io.set_voltage(0, level);
            }
            SPEC_VOB => {
                let level = utils::to_signed(self.a >> 15) as i16;
                self.mem.io.set_voltage(1, level);
            }
            SPEC_VOC => {
                let level = utils::to_signed(self.a >> 15) as i16;
                self.mem.io.set_voltage(2, level);
            }
            SPEC_BOA => self.mem.io.set_binary(0, ((self.a >> 22) & 0x3) as u8),
            SPEC_BOB => self.mem.io.set_binary(1, ((self.a >> 22) & 0x3) as u8),
            SPEC_BOC => self.mem.io.set_binary(2, ((self.a >> 22) & 0x3) as u8),
            SPEC_ANA => self.a &= self.mem.loops.l,
            SPEC_ORA => {
                if self.d37c {
                    self.a |= self.mem.loops.l;
                }
            }
            SPEC_MIM => self.a = utils::minus_magnitude(self.a),
            SPEC_COM => self.a = utils::complement(self.a),
            _ => {}
        }
    }
}
