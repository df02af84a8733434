use crate::constants::loops::*;

/// The rapid-access loop banks. Loops are short recirculating
/// registers selected structurally by channel, not disc cells behind
/// a lookup table. L doubles as the lower accumulator.
pub struct RapidLoops {
    pub u: u32,
    pub l: u32,
    pub f: [u32; F_LOOP_SIZE],
    pub e: [u32; E_LOOP_SIZE],
    pub h: [u32; H_LOOP_SIZE],
    pub v: [u32; V_LOOP_SIZE],
    pub r: [u32; R_LOOP_SIZE],
}

impl RapidLoops {
    pub fn new() -> Self {
        RapidLoops {
            u: 0,
            l: 0,
            f: [0; F_LOOP_SIZE],
            e: [0; E_LOOP_SIZE],
            h: [0; H_LOOP_SIZE],
            v: [0; V_LOOP_SIZE],
            r: [0; R_LOOP_SIZE],
        }
    }

    pub fn reset(&mut self) {
        *self = RapidLoops::new();
    }
}
