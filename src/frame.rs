use crate::cipher::Checksum;
use crate::error::{QstError, QstResult};

/// Text of the quest file tag.
pub const QUEST_TAG: &str = "Zelda Classic Quest File";

/// Tag every quest file starts with, including its terminating NUL.
pub const QUEST_PREAMBLE: &[u8] = b"Zelda Classic Quest File\0";

pub const SEED_LEN: usize = 4;
pub const TRAILER_LEN: usize = 4;

/// One parsed top-level frame. Borrows the source bytes; every method trial
/// parses the same untouched buffer again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestFrame<'a> {
    /// Seed as stored, before unmasking with a method's seed mask.
    pub raw_seed: u32,
    pub payload: &'a [u8],
    /// Checksum trailer as stored, still masked.
    pub trailer: Checksum,
}

/// Smallest frame with the given preamble: preamble, seed and trailer with an
/// empty payload.
pub fn min_frame_len(preamble: &[u8]) -> usize {
    preamble.len() + SEED_LEN + TRAILER_LEN
}

impl<'a> QuestFrame<'a> {
    /// Parse a frame. The preamble is checked first, so a foreign file is
    /// reported as such even when it is also short.
    pub fn parse(data: &'a [u8], preamble: &[u8]) -> QstResult<Self> {
        if let Some(offset) = preamble
            .iter()
            .zip(data)
            .position(|(expected, got)| expected != got)
        {
            return Err(QstError::FormatMismatch { offset });
        }

        let min_len = min_frame_len(preamble);
        if data.len() < min_len {
            return Err(QstError::TruncatedInput {
                expected: min_len,
                got: data.len(),
            });
        }

        let body = &data[preamble.len()..];
        let (seed, rest) = body.split_at(SEED_LEN);
        let (payload, trailer) = rest.split_at(rest.len() - TRAILER_LEN);

        Ok(QuestFrame {
            raw_seed: u32::from_be_bytes([seed[0], seed[1], seed[2], seed[3]]),
            payload,
            trailer: Checksum::new(
                u16::from_be_bytes([trailer[0], trailer[1]]),
                u16::from_be_bytes([trailer[2], trailer[3]]),
            ),
        })
    }

    /// Serialize a frame behind the given preamble.
    pub fn to_bytes(&self, preamble: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(min_frame_len(preamble) + self.payload.len());
        out.extend_from_slice(preamble);
        out.extend_from_slice(&self.raw_seed.to_be_bytes());
        out.extend_from_slice(self.payload);
        out.extend_from_slice(&self.trailer.a.to_be_bytes());
        out.extend_from_slice(&self.trailer.b.to_be_bytes());
        out
    }
}
