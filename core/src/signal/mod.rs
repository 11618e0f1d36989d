pub mod buffer;
pub mod parse;

pub use buffer::{ComplexSample, RealSeries, SignalBuffer};
pub use parse::{read_complex_file, read_real_file};
