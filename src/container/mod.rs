//! The password-protected packfile found under the quest frame.
//!
//! The whole container is XORed with the password, cycling over its bytes up
//! to the first NUL. Behind that, a 4-byte big-endian magic (additionally
//! masked with a password-derived id) says whether the rest is LZSS packed or
//! stored.

pub mod lzss;

/// "slh!": LZSS packed body.
pub const PACK_MAGIC: u32 = 0x736C_6821;
/// "slh.": stored body.
pub const NOPACK_MAGIC: u32 = 0x736C_682E;

const MAGIC_LEN: usize = 4;

/// Turns the recovered container bytes into the final quest payload.
pub trait ContainerDecoder {
    fn decode(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, String>;
}

/// Decoder for packfile containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackfileDecoder;

impl ContainerDecoder for PackfileDecoder {
    fn decode(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, String> {
        let password = effective_password(password);
        if data.len() < MAGIC_LEN {
            return Err(format!("container too short: {} bytes", data.len()));
        }

        let mut buf = data.to_vec();
        xor_password(&mut buf, password);

        let magic = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let id = id_mask(password);
        let body = &buf[MAGIC_LEN..];

        if magic == PACK_MAGIC ^ id {
            Ok(lzss::unpack(body))
        } else if magic == NOPACK_MAGIC ^ id {
            Ok(body.to_vec())
        } else {
            Err(format!("bad container magic {magic:08x} (wrong password?)"))
        }
    }
}

/// Passes the recovered bytes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawDecoder;

impl ContainerDecoder for RawDecoder {
    fn decode(&self, data: &[u8], _password: &[u8]) -> Result<Vec<u8>, String> {
        Ok(data.to_vec())
    }
}

/// Passwords are C strings: anything from the first NUL on is ignored.
fn effective_password(password: &[u8]) -> &[u8] {
    let end = password.iter().position(|&b| b == 0).unwrap_or(password.len());
    &password[..end]
}

/// XOR data with the password, cycling from the start of the buffer. Applying
/// it twice restores the input.
pub fn xor_password(data: &mut [u8], password: &[u8]) {
    let password = effective_password(password);
    if password.is_empty() {
        return;
    }
    for (b, k) in data.iter_mut().zip(password.iter().cycle()) {
        *b ^= k;
    }
}

/// Mask applied to the magic of a container written with `password`.
pub fn id_mask(password: &[u8]) -> u32 {
    let password = effective_password(password);
    if password.is_empty() {
        return 0;
    }

    let mut mask = 0u32;
    for (i, &c) in password.iter().enumerate() {
        mask ^= u32::from(c) << ((i & 3) * 8);
    }
    for (i, &c) in password.iter().cycle().take(4).enumerate() {
        mask ^= u32::from(c) << (24 - i * 8);
    }
    mask ^ 42
}
