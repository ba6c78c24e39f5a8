//! Standard Type1 font metrics and WinAnsi text encoding.
//!
//! Only the two base-14 fonts used by the PDF renderer are covered.
//! Widths are in 1/1000 em, taken from the Adobe AFM files.

use unicode_normalization::UnicodeNormalization;

/// Helvetica widths for bytes 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

/// Helvetica-Bold widths for bytes 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

/// Fonts available to the PDF renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Name of the font in the page resources.
    pub fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// PostScript name of the base font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    /// Advance width of a WinAnsi byte in 1/1000 em.
    pub fn width(&self, byte: u8) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        };
        match byte {
            0x20..=0x7E => table[(byte - 0x20) as usize],
            _ => self.high_width(byte),
        }
    }

    // approximate widths for the upper half
    fn high_width(&self, byte: u8) -> u16 {
        let bold = *self == Font::Bold;
        match byte {
            0x85 | 0x89 | 0x97 | 0x99 => 1000,
            0x91 | 0x92 | 0x82 => {
                if bold {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 | 0x84 => {
                if bold {
                    500
                } else {
                    333
                }
            }
            0x95 => 350,
            0xA0 => 278,
            0xA9 | 0xAE => 737,
            0xC0..=0xDF => 722,
            _ => 556,
        }
    }

    /// Width of encoded text at the given size, in points.
    pub fn text_width(&self, text: &[u8], size: f32) -> f32 {
        let units: u32 = text.iter().map(|b| self.width(*b) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Encodes text as WinAnsi bytes.
///
/// Tabs become spaces; accented letters outside the code page fall back
/// to their base letter, anything else to '?'.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\t' | '\n' | '\r' => b' ',
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
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
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
        _ => c
            .to_string()
            .nfd()
            .next()
            .filter(|base| base.is_ascii_graphic())
            .map(|base| base as u8)
            .unwrap_or(b'?'),
    }
}

/// Greedy word wrap of encoded text into lines no wider than `width`.
///
/// Words wider than a full line are split at byte boundaries.
pub fn wrap(font: Font, size: f32, text: &[u8], width: f32) -> Vec<Vec<u8>> {
    let space = font.text_width(b" ", size);
    let mut lines = Vec::new();
    let mut line: Vec<u8> = Vec::new();
    let mut line_width = 0.0;

    for word in text.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let word_width = font.text_width(word, size);

        if !line.is_empty() && line_width + space + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }

        if line.is_empty() && word_width > width {
            for &byte in word {
                let w = font.text_width(&[byte], size);
                if !line.is_empty() && line_width + w > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                line.push(byte);
                line_width += w;
            }
            continue;
        }

        if !line.is_empty() {
            line.push(b' ');
            line_width += space;
        }
        line.extend_from_slice(word);
        line_width += word_width;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
