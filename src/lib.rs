#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate bitflags;

pub mod cartridge;
pub mod cpu;
pub mod mapper;
pub mod opcodes;
pub mod rom;
