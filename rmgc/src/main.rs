extern crate clap;
use crossbeam_channel::{bounded, Receiver}; // Inter-thread signal channel
use log::error;
use std::io::{BufRead, Write};

use rmgc_core::constants::opcodes::*;
use rmgc_core::constants::{MAGNITUDE_MASK, SECTORS};
use rmgc_core::cpu::{Cpu, Machine, Status};
use rmgc_core::debug::disassemble;
use rmgc_core::decoder::encode;

// HPR is special-family sub-op 9, reached through sector 22 octal
const HPR_SECTOR: u8 = 0o22;

// Cycles run between interrupt-signal checks in the shell
const RUN_CHUNK: u64 = 1024;

/// Configures the command-line interface using clap
fn get_cli_config<'a>() -> clap::ArgMatches<'a> {
    let description = "Autonetics D17B/D37C Minuteman guidance computer emulator";
    clap::App::new("Rust Minuteman Guidance Computer (RMGC)")
        .version("0.1")
        .about(description)
        .arg(
            clap::Arg::with_name("test")
                .short("t")
                .help("Run the canned self-test and exit"),
        )
        .arg(
            clap::Arg::with_name("interactive")
                .short("i")
                .help("Start the interactive shell"),
        )
        .arg(
            clap::Arg::with_name("d17b")
                .long("d17b")
                .help("Emulate the D17B instead of the D37C"),
        )
        .get_matches()
}

/// Loads the canned add-and-halt program at channel 00
fn load_test_program(cpu: &mut Cpu) {
    // Sector 000: CLA 00,001   load 5          -> next 002
    // Sector 002: ADD 00,003   add 3           -> next 004
    // Sector 004: STO 00,006   store result    -> next 005
    // Sector 005: HPR          halt
    cpu.write(0, 0, encode(OP_CLA, false, 2, 0, 1));
    cpu.write(0, 1, 0o5);
    cpu.write(0, 2, encode(OP_ADD, false, 4, 0, 3));
    cpu.write(0, 3, 0o3);
    cpu.write(0, 4, encode(OP_STO, false, 5, 0, 6));
    cpu.write(0, 5, encode(OP_SPECIAL, false, 6, 0, HPR_SECTOR));
    cpu.write(0, 6, 0);
}

/// Canned self-test: returns 0 on success, nonzero on failure
fn run_test() -> i32 {
    println!("RMGC - Automated Self-Test");
    println!("==========================");
    println!();

    // Add program
    println!("Running add program (5 + 3)...");
    let mut cpu = Cpu::new(Machine::D37C);
    load_test_program(&mut cpu);
    cpu.run(1000);

    let result = cpu.read(0, 6);
    println!("Result at [00:006]: {:08o}", result);
    if result != 8 || !cpu.halted {
        println!("*** ADD TEST FAILED: expected 8, got {} ***", result);
        return 1;
    }
    println!("*** ADD TEST PASSED ***");
    println!();

    // D37C hardware division: 24 / 4 = 6
    println!("Running division program (24 / 4)...");
    let mut cpu = Cpu::new(Machine::D37C);
    cpu.a = 0;
    cpu.set_lower(24);
    cpu.write(0, 0, encode(OP_DIV_MPM, false, 2, 0, 1));
    cpu.write(0, 1, 4);
    cpu.write(0, 2, encode(OP_SPECIAL, false, 3, 0, HPR_SECTOR));
    cpu.run(100);

    let quotient = cpu.a & MAGNITUDE_MASK;
    let remainder = cpu.lower() & MAGNITUDE_MASK;
    println!("After DIV: A = {} (quotient), L = {} (remainder)", quotient, remainder);
    if quotient != 6 || remainder != 0 || cpu.error {
        println!("*** DIVISION TEST FAILED ***");
        return 1;
    }
    println!("*** DIVISION TEST PASSED ***");
    println!();

    // D37C rotate: ALC by one bit carries the sign into bit 1
    println!("Running rotate test (ALC 1 on 40000001)...");
    let mut cpu = Cpu::new(Machine::D37C);
    cpu.a = 0o40000001;
    // Shift-family sector field: sub-op 0x0B in bits 6..3, count in 2..0
    cpu.write(0, 0, encode(OP_SHIFT, false, 1, 0, (0x0B << 3) | 1));
    cpu.step();

    println!("After ALC 1: A = {:08o}", cpu.a);
    if cpu.a != 0o3 {
        println!("*** ROTATE TEST FAILED ***");
        return 1;
    }
    println!("*** ROTATE TEST PASSED ***");
    println!();

    println!("=== ALL TESTS PASSED ===");
    0
}

/// Interactive shell consuming newline-terminated commands
fn run_interactive(cpu: &mut Cpu, interrupt: &Receiver<()>) {
    println!("RMGC - Interactive Mode");
    println!("Commands: s(tep), r(un), d(ump), m CH SEC, l ADDR, q(uit)");
    println!();

    let stdin = std::io::stdin();
    loop {
        // Show the instruction the sequencer will fetch next
        let channel = cpu.location_channel();
        let sector = cpu.location_sector();
        let word = cpu.read(channel, sector);
        println!(
            "[{:02o}:{:03o}] {:08o}  {}",
            channel,
            sector,
            word,
            disassemble(word, cpu.d37c)
        );
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("s") => {
                cpu.step();
                if cpu.halted {
                    println!("*** HALTED ***");
                }
            }
            Some("r") => {
                println!("Running...");
                // Drain any stale interrupt before starting
                while interrupt.try_recv().is_ok() {}
                loop {
                    if let Status::Halted = cpu.run(RUN_CHUNK) {
                        println!("*** HALTED after {} cycles ***", cpu.cycle_count);
                        break;
                    }
                    if interrupt.try_recv().is_ok() {
                        println!("*** INTERRUPTED at {} cycles ***", cpu.cycle_count);
                        break;
                    }
                }
            }
            Some("d") => {
                print!("{}", cpu.dump());
            }
            Some("m") => {
                let channel = parts.next().and_then(|s| u8::from_str_radix(s, 8).ok());
                let sector = parts.next().and_then(|s| u8::from_str_radix(s, 8).ok());
                match (channel, sector) {
                    (Some(ch), Some(sec)) => {
                        for offset in 0..8u32 {
                            let s = sec as u32 + offset;
                            if s >= SECTORS as u32 {
                                break;
                            }
                            println!("  [{:02o}:{:03o}] {:08o}", ch, s, cpu.read(ch, s as u8));
                        }
                    }
                    _ => println!("usage: m CH SEC (octal)"),
                }
            }
            Some("l") => match parts.next().and_then(|s| u32::from_str_radix(s, 8).ok()) {
                Some(addr) => {
                    // ADDR packs the channel above the 7-bit sector
                    cpu.set_location(((addr >> 7) & 0x3F) as u8, (addr & 0x7F) as u8);
                    println!("Set I to {:08o}", cpu.i);
                }
                None => println!("usage: l ADDR (octal)"),
            },
            Some("q") => {
                println!("Goodbye.");
                break;
            }
            None => {}
            Some(other) => println!("Unknown command: {}", other),
        }
    }
}

fn main() {
    env_logger::init();

    println!();
    println!("  D17B/D37C MINUTEMAN GUIDANCE COMPUTER EMULATOR");
    println!("  D17B: Minuteman I (1962)    D37C: Minuteman II/III (1965)");
    println!();

    // Ctrl-C feeds the interrupt channel instead of killing the shell
    let (signal_sender, signal_receiver) = bounded(1);
    let handler_result = ctrlc::set_handler(move || {
        if signal_sender.is_full() {
            std::process::exit(-1); // Emergency exit if already pending
        }
        let _ = signal_sender.send(());
    });

    if let Err(e) = handler_result {
        error!("Signal handler failed: {:?}", e);
        return;
    }

    let matches = get_cli_config();
    let machine = if matches.is_present("d17b") {
        Machine::D17B
    } else {
        Machine::D37C
    };

    if matches.is_present("interactive") {
        let mut cpu = Cpu::new(machine);
        load_test_program(&mut cpu);
        run_interactive(&mut cpu, &signal_receiver);
    } else if matches.is_present("test") {
        std::process::exit(run_test());
    } else {
        println!("Usage: rmgc [-t|-i] [--d17b]");
        println!("  -t  Run the automated self-test");
        println!("  -i  Interactive shell");
        println!();
        println!("Running default self-test...");
        println!();
        std::process::exit(run_test());
    }
}
