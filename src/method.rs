//! Encoding methods used by successive quest format generations.
//!
//! The quest file does not record which method produced it, so decoders try
//! every entry of [`METHODS`], newest first, until the trailing checksum
//! verifies.

use crate::error::{QstError, QstResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingMethod {
    pub index: usize,
    /// XORed with the seed stored in the file.
    pub seed_mask: u32,
    pub p_const: u16,
    pub q_const: u16,
}

pub const METHOD_COUNT: usize = 5;

pub const METHODS: [EncodingMethod; METHOD_COUNT] = [
    EncodingMethod {
        index: 0,
        seed_mask: 0x4C358938,
        p_const: 0x62E9,
        q_const: 0x3619,
    },
    EncodingMethod {
        index: 1,
        seed_mask: 0x91B2A2D1,
        p_const: 0x7D14,
        q_const: 0xA26B,
    },
    EncodingMethod {
        index: 2,
        seed_mask: 0x4A7C1B87,
        p_const: 0x1A82,
        q_const: 0xF03C,
    },
    EncodingMethod {
        index: 3,
        seed_mask: 0xF93941E6,
        p_const: 0x02BB,
        q_const: 0x7B12,
    },
    EncodingMethod {
        index: 4,
        seed_mask: 0xFD095E94,
        p_const: 0xE09C,
        q_const: 0x4E8F,
    },
];

impl EncodingMethod {
    pub fn by_index(index: usize) -> QstResult<&'static EncodingMethod> {
        METHODS.get(index).ok_or(QstError::InvalidMethod(index))
    }

    /// Recover the generator seed from the seed field stored in a frame.
    pub fn unmask_seed(&self, raw_seed: u32) -> u32 {
        raw_seed ^ self.seed_mask
    }
}

/// All methods in trial order: most recent format first.
pub fn newest_first() -> impl Iterator<Item = &'static EncodingMethod> {
    METHODS.iter().rev()
}

impl std::fmt::Display for EncodingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "method {}", self.index)
    }
}
