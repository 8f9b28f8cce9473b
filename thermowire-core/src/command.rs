//! DS18B20 bus commands
//!
//! Only the commands needed for a single-sensor conversion/read cycle are
//! modelled here.

/// ROM commands, sent right after a bus reset.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomCommand {
    /// Address every device on the bus at once.
    ///
    /// Only valid for function commands that return data when exactly one
    /// device is attached.
    SkipRom = 0xCC,
}

/// Function commands, sent after a ROM command.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCommand {
    /// Start a temperature conversion into the scratchpad.
    ConvertTemperature = 0x44,
    /// Read the 9-byte scratchpad, CRC last.
    ReadScratchpad = 0xBE,
}

/// Skip-ROM + Convert-T
pub const fn convert_sequence() -> [u8; 2] {
    [
        RomCommand::SkipRom as u8,
        FunctionCommand::ConvertTemperature as u8,
    ]
}

/// Skip-ROM + Read-Scratchpad
pub const fn read_scratchpad_sequence() -> [u8; 2] {
    [
        RomCommand::SkipRom as u8,
        FunctionCommand::ReadScratchpad as u8,
    ]
}
