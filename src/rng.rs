//! Keystream generator for the quest frame cipher.
//!
//! The recurrence works on 8- and 16-bit fields of a 32-bit seed with the
//! carries of a 16-bit register machine. Carries are sign-extended (a set
//! sign bit ORs in all ones) and the new seed is assembled by adding the
//! sign-extended low half, exactly as the quest editor computes it. Files
//! written by the editor only verify with these semantics.

use crate::method::EncodingMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestRng {
    seed: u32,
}

impl QuestRng {
    pub fn new(seed: u32) -> Self {
        QuestRng { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the generator one step and return its output.
    pub fn next(&mut self, method: &EncodingMethod) -> u32 {
        let seed = self.seed as i32;

        let mut bx = (seed >> 8) as i16;
        let mut cx = ((seed & 0xFF) << 8) as i16;
        let al = (seed >> 24) as i8;
        let c = i16::from(al >> 7);
        let d = bx >> 15;

        bx = (bx << 1) | c;
        cx = (cx << 1) | d;
        cx = cx.wrapping_add((seed & 0xFFFF) as i16);
        bx = bx.wrapping_add((seed >> 16) as i16).wrapping_add(c);
        cx = cx.wrapping_add(method.p_const as i16);
        bx = bx.wrapping_add(method.q_const as i16).wrapping_add(d);

        self.seed = (i32::from(bx) << 16).wrapping_add(i32::from(cx)) as u32;
        (i32::from(cx) << 16).wrapping_add(i32::from(bx)) as u32
    }
}
