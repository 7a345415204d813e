//! "Drunk" scramble modes
//!
//! Diagnostic transforms applied to translated lines before a side-car table
//! is built. They only move values around; the original-text keys are never
//! touched.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How translated lines are scrambled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrambleMode {
    /// Lines are used as-is.
    #[default]
    Off,
    /// Line order is shuffled.
    Lines,
    /// Line order is shuffled, then the space-separated words of every line.
    Words,
}

impl ScrambleMode {
    /// Mode from the numeric level used on the command line (0, 1, 2).
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Off,
            1 => Self::Lines,
            _ => Self::Words,
        }
    }
}

impl std::str::FromStr for ScrambleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "0" | "none" => Ok(Self::Off),
            "lines" | "1" => Ok(Self::Lines),
            "words" | "2" => Ok(Self::Words),
            _ => Err(format!("Invalid scramble mode '{s}'. Valid values: off/0, lines/1, words/2")),
        }
    }
}

/// Scramble `lines` in place using the thread-local RNG.
pub fn scramble(lines: &mut [String], mode: ScrambleMode) {
    scramble_with(lines, mode, &mut rand::thread_rng());
}

/// Scramble `lines` in place with the given RNG.
pub fn scramble_with<R: Rng + ?Sized>(lines: &mut [String], mode: ScrambleMode, rng: &mut R) {
    if mode == ScrambleMode::Off {
        return;
    }

    lines.shuffle(rng);

    if mode == ScrambleMode::Words {
        for line in lines.iter_mut() {
            // Keep embedded line breaks, shuffle words within each of them
            *line = line
                .split('\n')
                .map(|part| {
                    let mut words: Vec<&str> = part.split(' ').collect();
                    words.shuffle(rng);
                    words.join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample() -> Vec<String> {
        ["one two three", "four five", "six\nseven eight", "nine"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn sorted_words(lines: &[String]) -> Vec<String> {
        let mut words: Vec<String> = lines
            .iter()
            .flat_map(|l| l.split([' ', '\n']).map(ToString::to_string).collect::<Vec<_>>())
            .collect();
        words.sort();
        words
    }

    #[test]
    fn test_off_is_identity() {
        let mut lines = sample();
        scramble_with(&mut lines, ScrambleMode::Off, &mut StdRng::seed_from_u64(7));
        assert_eq!(lines, sample());
    }

    #[test]
    fn test_lines_is_permutation() {
        let mut lines = sample();
        scramble_with(&mut lines, ScrambleMode::Lines, &mut StdRng::seed_from_u64(7));

        let mut expected = sample();
        expected.sort();
        lines.sort();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_words_keeps_vocabulary_and_breaks() {
        let mut lines = sample();
        scramble_with(&mut lines, ScrambleMode::Words, &mut StdRng::seed_from_u64(42));

        assert_eq!(sorted_words(&lines), sorted_words(&sample()));
        assert_eq!(lines.iter().filter(|l| l.contains('\n')).count(), 1);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("2".parse::<ScrambleMode>(), Ok(ScrambleMode::Words));
        assert_eq!("lines".parse::<ScrambleMode>(), Ok(ScrambleMode::Lines));
        assert_eq!(ScrambleMode::from_level(0), ScrambleMode::Off);
        assert!("drunk".parse::<ScrambleMode>().is_err());
    }
}
