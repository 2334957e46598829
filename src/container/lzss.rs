//! LZSS body of a packed container: 4 KiB ring, 18-byte maximum match.

const RING_SIZE: usize = 4096;
const MAX_MATCH: usize = 18;
const THRESHOLD: usize = 2;

/// Unpack an LZSS stream.
///
/// Each flag byte covers eight tokens, least significant bit first. A set bit
/// is a literal byte. A clear bit is a two-byte reference: 12-bit ring
/// position (low byte, then the high nibble of the second byte) and a 4-bit
/// length stored minus `THRESHOLD + 1`. The ring starts zero-filled with the
/// write cursor at `RING_SIZE - MAX_MATCH`. Running out of input anywhere,
/// even halfway through a reference, just ends the stream.
pub fn unpack(data: &[u8]) -> Vec<u8> {
    let mut ring = [0u8; RING_SIZE];
    let mut r = RING_SIZE - MAX_MATCH;
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut input = data.iter().copied();

    'stream: while let Some(flags) = input.next() {
        for bit in 0..8 {
            if flags & (1 << bit) != 0 {
                let Some(c) = input.next() else {
                    break 'stream;
                };
                out.push(c);
                ring[r] = c;
                r = (r + 1) & (RING_SIZE - 1);
            } else {
                let Some(lo) = input.next() else {
                    break 'stream;
                };
                let Some(hi) = input.next() else {
                    break 'stream;
                };
                let pos = usize::from(lo) | (usize::from(hi & 0xF0) << 4);
                let len = usize::from(hi & 0x0F) + THRESHOLD + 1;
                for k in 0..len {
                    let c = ring[(pos + k) & (RING_SIZE - 1)];
                    out.push(c);
                    ring[r] = c;
                    r = (r + 1) & (RING_SIZE - 1);
                }
            }
        }
    }

    out
}
