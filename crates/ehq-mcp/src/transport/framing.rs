//! Message framing for newline-delimited JSON.

/// Strip the line terminator (`\n` or `\r\n`). Blank lines yield `None`.
pub fn unframe(line: &[u8]) -> Option<&[u8]> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(line)
}

/// Append the line terminator to an encoded message.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(payload.len() + 1);
    framed.extend_from_slice(payload);
    framed.push(b'\n');
    framed
}
