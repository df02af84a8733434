use core::fmt;
use core::fmt::Write;

use heapless::String;

use crate::cpu::Cpu;
use crate::decoder::decoder;
use crate::utils::to_signed;

/// Renders one word as `NAME[*] CC,SSS` with octal channel and sector;
/// `*` marks the flag-store bit. The mode flag picks the D37C reading
/// of the overloaded opcodes.
pub fn disassemble(word: u32, d37c: bool) -> String<16> {
    let inst = decoder(word, d37c);
    let mut out = String::new();
    let _ = write!(
        out,
        "{}{} {:02o},{:03o}",
        inst.mnem.name(),
        if inst.flag() { "*" } else { "" },
        inst.channel(),
        inst.sector()
    );
    out
}

/// Borrowed read-only view of the CPU for the host's state dump.
pub struct StateDump<'a> {
    cpu: &'a Cpu,
}

impl Cpu {
    pub fn dump(&self) -> StateDump {
        StateDump { cpu: self }
    }
}

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cpu = self.cpu;
        writeln!(
            f,
            "A:  {:08o} ({:+})",
            cpu.a,
            to_signed(cpu.a)
        )?;
        writeln!(f, "L:  {:08o}", cpu.lower())?;
        writeln!(
            f,
            "I:  {:08o} (CH:{:02o} SEC:{:03o})",
            cpu.i,
            cpu.location_channel(),
            cpu.location_sector()
        )?;
        writeln!(f, "P:  {}", cpu.p)?;
        writeln!(f, "U:  {:08o}", cpu.mem.loops.u)?;
        writeln!(f, "Cycles: {}", cpu.cycle_count)?;
        writeln!(
            f,
            "Halted: {}  Error: {}",
            if cpu.halted { "YES" } else { "NO" },
            if cpu.error { "YES" } else { "NO" }
        )?;

        write!(f, "F-loop:")?;
        for word in cpu.mem.loops.f.iter() {
            write!(f, " {:08o}", word)?;
        }
        writeln!(f)?;

        write!(f, "E-loop:")?;
        for word in cpu.mem.loops.e.iter() {
            write!(f, " {:08o}", word)?;
        }
        writeln!(f)?;

        write!(f, "H-loop:")?;
        for word in cpu.mem.loops.h.iter() {
            write!(f, " {:08o}", word)?;
        }
        writeln!(f)?;

        write!(f, "V-loop:")?;
        for word in cpu.mem.loops.v.iter() {
            write!(f, " {:08o}", word)?;
        }
        write!(f, "  R-loop:")?;
        for word in cpu.mem.loops.r.iter() {
            write!(f, " {:08o}", word)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod debug_tests {
    use super::*;
    use crate::constants::opcodes::*;
    use crate::cpu::Machine;
    use crate::decoder::encode;

    #[test]
    fn test_disassembly_format() {
        let word = encode(OP_CLA, false, 2, 0o12, 0o34);
        assert_eq!(disassemble(word, true).as_str(), "CLA 12,034");
    }

    #[test]
    fn test_disassembly_marks_flag_bit() {
        let word = encode(OP_ADD, true, 0, 0o45, 0o123);
        assert_eq!(disassemble(word, true).as_str(), "ADD* 45,123");
    }

    #[test]
    fn test_disassembly_follows_machine_mode() {
        let word = encode(OP_DIV_MPM, false, 0, 0, 1);
        assert_eq!(disassemble(word, true).as_str(), "DIV 00,001");
        assert_eq!(disassemble(word, false).as_str(), "MPM 00,001");

        let word = encode(OP_TMI_TZE, false, 0, 0, 1);
        assert_eq!(disassemble(word, true).as_str(), "TZE 00,001");
        assert_eq!(disassemble(word, false).as_str(), "TMI 00,001");
    }

    #[test]
    fn test_dump_renders_registers() {
        let mut cpu = Cpu::new(Machine::D37C);
        cpu.a = 0o10;
        let mut rendered = heapless::String::<1024>::new();
        let _ = write!(rendered, "{}", cpu.dump());
        assert!(rendered.as_str().contains("A:  00000010 (+8)"));
        assert!(rendered.as_str().contains("Halted: NO"));
    }
}
