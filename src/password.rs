//! The fixed password protecting the inner packfile container.
//!
//! The password is stored shifted so it does not appear verbatim in the
//! binary; byte `i` carries an offset of `(i + 1) * 11`.

use std::sync::OnceLock;

pub const PASSWORD_LEN: usize = 8;

const OBFUSCATED_PASSWORD: [u8; PASSWORD_LEN] = [
    b'l'.wrapping_add(11),
    b'o'.wrapping_add(22),
    b'n'.wrapping_add(33),
    b'g'.wrapping_add(44),
    b't'.wrapping_add(55),
    b'a'.wrapping_add(66),
    b'n'.wrapping_add(77),
    0u8.wrapping_add(88),
];

static RESOLVED: OnceLock<[u8; PASSWORD_LEN]> = OnceLock::new();

/// Undo the per-position shift applied to an obfuscated password.
pub fn resolve(obfuscated: [u8; PASSWORD_LEN]) -> [u8; PASSWORD_LEN] {
    let mut pwd = obfuscated;
    for (i, b) in pwd.iter_mut().enumerate() {
        *b = b.wrapping_sub(((i + 1) * 11) as u8);
    }
    pwd
}

/// The container password, resolved on first use and cached for the life of
/// the process.
pub fn container_password() -> &'static [u8; PASSWORD_LEN] {
    RESOLVED.get_or_init(|| resolve(OBFUSCATED_PASSWORD))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_known_password() {
        assert_eq!(container_password(), b"longtan\0");
    }

    #[test]
    fn test_repeated_calls_do_not_reapply() {
        let first = *container_password();
        let second = *container_password();
        assert_eq!(first, second);
        assert!(std::ptr::eq(container_password(), container_password()));
    }

    #[test]
    fn test_resolve_wraps() {
        // 5 - 11 wraps to 250.
        let out = resolve([5, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(out[0], 250);
        assert_eq!(out[7], 0u8.wrapping_sub(88));
    }

    #[test]
    fn test_resolve_is_pure() {
        assert_eq!(resolve(OBFUSCATED_PASSWORD), resolve(OBFUSCATED_PASSWORD));
        assert_ne!(resolve(resolve(OBFUSCATED_PASSWORD)), *container_password());
    }
}
