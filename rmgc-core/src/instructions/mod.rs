pub mod instructions;

// Trait implementations for the CPU execution units
pub use instructions::Arithmetic;
pub use instructions::ControlFlow;
pub use instructions::ShiftRotate;
pub use instructions::SpecialIo;
