/// Convert a NUL-padded quest string to UTF-8.
/// Quest editors store titles and author names in the Windows ANSI code page;
/// we decode them as Windows-1252.
pub fn quest_str_to_utf8(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let bytes = &bytes[..end];

    // If it's already valid UTF-8, use it directly.
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let (cow, _encoding_used, _had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    cow.into_owned()
}
