//! Morse Code Table
//!
//! Maps letters and digits to dot/dash patterns. Lowercase is folded to
//! uppercase; anything else (space, punctuation) has an empty pattern.

/// One keyed element of a Morse character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseElement {
    /// Short element (1 unit)
    Dot,
    /// Long element (3 units)
    Dash,
}

impl MorseElement {
    /// Key-down length in dot units
    #[must_use]
    pub const fn units(self) -> u32 {
        match self {
            Self::Dot => 1,
            Self::Dash => 3,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MorseElement {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Dot => defmt::write!(f, "."),
            Self::Dash => defmt::write!(f, "-"),
        }
    }
}

/// Dot/dash pattern of one character
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MorsePattern(&'static str);

impl MorsePattern {
    /// Pattern with no elements
    pub const EMPTY: Self = Self("");

    /// Number of elements
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the pattern has no elements
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MorseElement> {
        match self.0.as_bytes().get(index)? {
            b'.' => Some(MorseElement::Dot),
            b'-' => Some(MorseElement::Dash),
            _ => None,
        }
    }

    /// Iterate over the elements
    pub fn elements(&self) -> impl Iterator<Item = MorseElement> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Pattern as a dot/dash string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Fixed A-Z, 0-9 Morse table
pub struct MorseTable;

impl MorseTable {
    /// Look up the pattern for a character
    #[must_use]
    pub const fn pattern(c: char) -> MorsePattern {
        let code = match c.to_ascii_uppercase() {
            'A' => ".-",
            'B' => "-...",
            'C' => "-.-.",
            'D' => "-..",
            'E' => ".",
            'F' => "..-.",
            'G' => "--.",
            'H' => "....",
            'I' => "..",
            'J' => ".---",
            'K' => "-.-",
            'L' => ".-..",
            'M' => "--",
            'N' => "-.",
            'O' => "---",
            'P' => ".--.",
            'Q' => "--.-",
            'R' => ".-.",
            'S' => "...",
            'T' => "-",
            'U' => "..-",
            'V' => "...-",
            'W' => ".--",
            'X' => "-..-",
            'Y' => "-.--",
            'Z' => "--..",
            '0' => "-----",
            '1' => ".----",
            '2' => "..---",
            '3' => "...--",
            '4' => "....-",
            '5' => ".....",
            '6' => "-....",
            '7' => "--...",
            '8' => "---..",
            '9' => "----.",
            _ => "",
        };
        MorsePattern(code)
    }

    /// Check if a character separates words
    #[must_use]
    pub const fn is_word_separator(c: char) -> bool {
        c == ' '
    }
}
