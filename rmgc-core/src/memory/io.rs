use log::debug;

/// Register-backed peripheral boundary. The CPU reads and writes these
/// latches like registers; the host samples or drives them between
/// steps. Telemetry and character output have no sink in the core, so
/// the latch block counts the emissions instead.
pub struct IoLatches {
    pub discrete_in_a: u32,
    pub discrete_in_b: u32,
    pub discrete_out_a: u32,
    pub voltage_out: [i16; 4],
    pub binary_out: [u8; 4],
    pub detector: bool,
    pub fine_countdown: u32,
    pub countdown_enabled: bool,
    pub telemetry_pulses: u32,
    pub character_out: u8,
    pub characters_sent: u32,
}

impl IoLatches {
    pub fn new() -> Self {
        IoLatches {
            discrete_in_a: 0,
            discrete_in_b: 0,
            discrete_out_a: 0,
            voltage_out: [0; 4],
            binary_out: [0; 4],
            detector: false,
            fine_countdown: 0,
            countdown_enabled: false,
            telemetry_pulses: 0,
            character_out: 0,
            characters_sent: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = IoLatches::new();
    }

    pub fn set_voltage(&mut self, index: usize, value: i16) {
        debug!("voltage output {} <- {}", index, value);
        self.voltage_out[index] = value;
    }

    pub fn set_binary(&mut self, index: usize, bits: u8) {
        debug!("binary output {} <- {:02b}", index, bits);
        self.binary_out[index] = bits & 0x3;
    }

    pub fn telemetry_pulse(&mut self) {
        debug!("telemetry pulse");
        self.telemetry_pulses += 1;
    }

    pub fn emit_character(&mut self, character: u8) {
        debug!("character output <- {:o}", character);
        self.character_out = character & 0xF;
        self.characters_sent += 1;
    }
}
