mod chunk;
mod sort;

pub use chunk::chunk;
pub use sort::sort;
