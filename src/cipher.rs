//! Quest frame stream cipher.
//!
//! Bytes alternate between two transforms. Even positions draw a fresh
//! generator value and XOR with its low byte; odd positions subtract the same
//! value again. Two running checksums over the plaintext are closed with one
//! extra draw that masks the stored trailer.

use crate::method::EncodingMethod;
use crate::rng::QuestRng;

/// Running checksum pair over plaintext bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    /// Plain 16-bit sum.
    pub a: u16,
    /// Rotate-and-add accumulator.
    pub b: u16,
}

impl Checksum {
    pub fn new(a: u16, b: u16) -> Self {
        Checksum { a, b }
    }

    pub fn update(&mut self, byte: u8) {
        let byte = u16::from(byte);
        self.a = self.a.wrapping_add(byte);
        // The high nibble is brought around with an arithmetic shift, so a
        // set top bit also folds in 0xFFF0.
        let wrapped = ((self.b as i16) >> 12) as u16;
        self.b = (self.b << 4).wrapping_add(wrapped).wrapping_add(byte);
    }

    pub fn of(data: &[u8]) -> Self {
        let mut c = Checksum::default();
        for &b in data {
            c.update(b);
        }
        c
    }

    /// Unmask a trailer read from a frame: XOR on the first half, subtract on
    /// the second, both with the same value.
    fn unmask(self, r: u32) -> Self {
        Checksum {
            a: self.a ^ (r as u16),
            b: self.b.wrapping_sub(r as u16),
        }
    }

    fn mask(self, r: u32) -> Self {
        Checksum {
            a: self.a ^ (r as u16),
            b: self.b.wrapping_add(r as u16),
        }
    }
}

/// Cipher state for one pass over a payload. Supports processing the payload
/// in arbitrary chunks.
pub struct QuestCipher<'m> {
    rng: QuestRng,
    method: &'m EncodingMethod,
    r: u32,
    odd: bool,
    checksum: Checksum,
}

impl<'m> QuestCipher<'m> {
    pub fn new(seed: u32, method: &'m EncodingMethod) -> Self {
        QuestCipher {
            rng: QuestRng::new(seed),
            method,
            r: 0,
            odd: false,
            checksum: Checksum::default(),
        }
    }

    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    fn key(&mut self) -> (u8, bool) {
        let odd = self.odd;
        if !odd {
            self.r = self.rng.next(self.method);
        }
        self.odd = !odd;
        (self.r as u8, odd)
    }

    /// Decrypt data in place.
    pub fn decrypt(&mut self, data: &mut [u8]) {
        for b in data.iter_mut() {
            let (k, odd) = self.key();
            let plain = if odd { b.wrapping_sub(k) } else { *b ^ k };
            self.checksum.update(plain);
            *b = plain;
        }
    }

    /// Encrypt data in place.
    pub fn encrypt(&mut self, data: &mut [u8]) {
        for b in data.iter_mut() {
            let plain = *b;
            self.checksum.update(plain);
            let (k, odd) = self.key();
            *b = if odd { plain.wrapping_add(k) } else { plain ^ k };
        }
    }

    /// Draw the closing value and check the stored trailer against the
    /// checksums accumulated so far.
    pub fn verify(mut self, stored: Checksum) -> bool {
        let r = self.rng.next(self.method);
        stored.unmask(r) == self.checksum
    }

    /// Draw the closing value and produce the trailer to store.
    pub fn finish(mut self) -> Checksum {
        let r = self.rng.next(self.method);
        self.checksum.mask(r)
    }
}

/// Decrypt a whole payload. Returns the plaintext and its checksums.
pub fn decrypt(payload: &[u8], seed: u32, method: &EncodingMethod) -> (Vec<u8>, Checksum) {
    let mut out = payload.to_vec();
    let mut c = QuestCipher::new(seed, method);
    c.decrypt(&mut out);
    (out, c.checksum())
}

/// Encrypt a whole payload. Returns the ciphertext and the masked trailer.
pub fn encrypt(plaintext: &[u8], seed: u32, method: &EncodingMethod) -> (Vec<u8>, Checksum) {
    let mut out = plaintext.to_vec();
    let mut c = QuestCipher::new(seed, method);
    c.encrypt(&mut out);
    (out, c.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::METHODS;

    #[test]
    fn test_checksum_sum_and_rotate() {
        let c = Checksum::of(&[1, 2]);
        assert_eq!(c.a, 3);
        assert_eq!(c.b, (1 << 4) + 2);
    }

    #[test]
    fn test_checksum_rotate_with_top_bit_set() {
        let mut c = Checksum::new(0, 0x8001);
        c.update(0);
        // 0x0010 + 0xFFF8 wraps to 0x0008.
        assert_eq!(c.b, 0x0008);
    }

    #[test]
    fn test_checksum_is_order_sensitive() {
        let x = Checksum::of(&[0x10, 0x20, 0x30]);
        let y = Checksum::of(&[0x20, 0x10, 0x30]);
        assert_eq!(x.a, y.a);
        assert_ne!(x.b, y.b);
    }

    #[test]
    fn test_first_byte_xors_low_byte() {
        // From seed 0 with method 0 the first draw is 0x62E93619.
        let (plain, _) = decrypt(&[0x19, 0x19], 0, &METHODS[0]);
        assert_eq!(plain, vec![0x00, 0x19u8.wrapping_sub(0x19)]);
    }

    #[test]
    fn test_odd_step_reuses_previous_draw() {
        let mut rng = QuestRng::new(0x0BAD_F00D);
        let r = rng.next(&METHODS[2]) as u8;
        let (plain, _) = decrypt(&[r, r.wrapping_add(7)], 0x0BAD_F00D, &METHODS[2]);
        assert_eq!(plain, vec![0, 7]);
    }

    #[test]
    fn test_roundtrip_with_trailer() {
        let data = b"slh! some packfile bytes";
        for m in &METHODS {
            let (cipher, trailer) = encrypt(data, 0x4242_0001, m);
            let mut c = QuestCipher::new(0x4242_0001, m);
            let mut buf = cipher.clone();
            c.decrypt(&mut buf);
            assert_eq!(&buf, data);
            assert!(c.verify(trailer));
        }
    }

    #[test]
    fn test_chunked_decrypt_matches_whole() {
        let data: Vec<u8> = (0..=255).collect();
        let (cipher, _) = encrypt(&data, 7, &METHODS[1]);
        let mut c = QuestCipher::new(7, &METHODS[1]);
        let mut buf = cipher.clone();
        let (head, tail) = buf.split_at_mut(3);
        c.decrypt(head);
        c.decrypt(tail);
        assert_eq!(buf, data);
    }

    #[test]
    fn test_trailer_rejects_other_method() {
        let data = b"0123456789abcdef";
        let (cipher, trailer) = encrypt(data, 99, &METHODS[4]);
        let mut c = QuestCipher::new(99, &METHODS[0]);
        let mut buf = cipher;
        c.decrypt(&mut buf);
        assert!(!c.verify(trailer));
    }
}
