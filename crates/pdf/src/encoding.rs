//! WinAnsi (Windows-1252) encoding for the standard PDF fonts.

/// Byte written for characters the font encoding cannot represent.
pub const REPLACEMENT: u8 = b'?';

/// The WinAnsi code of a character, if it has one.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20}'..='\u{7E}' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        '\t' => b' ',
        _ => return None,
    };
    Some(byte)
}

/// Text encoded for a WinAnsi font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,

    /// Characters replaced by [`REPLACEMENT`].
    pub replaced: Vec<char>,
}

/// Encode `text`, replacing every character without a WinAnsi code.
pub fn encode_win_ansi(text: &str) -> EncodedText {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = Vec::new();

    for c in text.chars() {
        match win_ansi_byte(c) {
            Some(byte) => bytes.push(byte),
            // emoji presentation selectors carry no glyph of their own
            None if c == '\u{FE0F}' || c == '\u{200D}' => {}
            None => {
                bytes.push(REPLACEMENT);
                replaced.push(c);
            }
        }
    }

    EncodedText { bytes, replaced }
}
