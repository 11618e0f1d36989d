use serde::{Deserialize, Serialize};
use std::fmt;

/// Modulation kind whose BER is tracked independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modulation {
    Am,
    Fm,
    Pm,
}

impl Modulation {
    /// Every modality a sweep produces, in aggregation order.
    pub const ALL: [Modulation; 3] = [Modulation::Am, Modulation::Fm, Modulation::Pm];

    /// Fixed BER output file written by the external tool.
    pub fn ber_file_name(self) -> &'static str {
        match self {
            Modulation::Am => "ber_am.txt",
            Modulation::Fm => "ber_fm.txt",
            Modulation::Pm => "ber_pm.txt",
        }
    }

    /// Positional `type` code in the demo argv. The external tool numbers
    /// them 0=AM, 1=PM, 2=FM.
    pub fn type_code(self) -> u32 {
        match self {
            Modulation::Am => 0,
            Modulation::Pm => 1,
            Modulation::Fm => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Modulation::Am => "AM",
            Modulation::Fm => "FM",
            Modulation::Pm => "PM",
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
