pub mod cli;
pub mod commands;
pub mod error;

pub mod io {
    pub mod line_codec;
    pub mod line_reader;
    pub mod line_writer;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
