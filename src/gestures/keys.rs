use std::collections::VecDeque;

use super::{GestureConfig, GesturePayload, KeyInput};

/// The arrow/letter code everyone tries first.
const KONAMI_CODES: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];
const KONAMI_NAME: &str = "konami";

/// Words recognized from typed characters.
const WORD_TRIGGERS: [&str; 4] = ["shuffle", "matrix", "time", "rainbow"];

/// Rolling-window suffix matcher over raw key codes and typed characters.
/// Two buffers run side by side: codes feed the arrow sequence, lower-cased
/// characters feed the word triggers. A match emits once and clears the
/// buffer it matched in.
pub struct KeySequenceMatcher {
    capacity: usize,
    codes: VecDeque<String>,
    chars: VecDeque<char>,
}

impl KeySequenceMatcher {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            capacity: config.key_buffer,
            codes: VecDeque::with_capacity(config.key_buffer),
            chars: VecDeque::with_capacity(config.key_buffer),
        }
    }

    pub fn push(&mut self, input: &KeyInput) -> Option<GesturePayload> {
        self.codes.push_back(input.code.clone());
        if self.codes.len() > self.capacity {
            self.codes.pop_front();
        }
        if code_suffix_matches(&self.codes, &KONAMI_CODES) {
            self.codes.clear();
            return Some(GesturePayload::KeystrokeMatch {
                sequence: KONAMI_NAME.to_string(),
            });
        }

        if let Some(ch) = input.ch {
            for lowered in ch.to_lowercase() {
                self.chars.push_back(lowered);
                if self.chars.len() > self.capacity {
                    self.chars.pop_front();
                }
            }
            for word in WORD_TRIGGERS {
                if char_suffix_matches(&self.chars, word) {
                    self.chars.clear();
                    return Some(GesturePayload::KeystrokeMatch {
                        sequence: word.to_string(),
                    });
                }
            }
        }

        None
    }
}

fn code_suffix_matches(buffer: &VecDeque<String>, target: &[&str]) -> bool {
    if buffer.len() < target.len() {
        return false;
    }
    buffer
        .iter()
        .skip(buffer.len() - target.len())
        .zip(target)
        .all(|(have, want)| have == want)
}

fn char_suffix_matches(buffer: &VecDeque<char>, word: &str) -> bool {
    let target: Vec<char> = word.chars().collect();
    if buffer.len() < target.len() {
        return false;
    }
    buffer
        .iter()
        .skip(buffer.len() - target.len())
        .zip(&target)
        .all(|(have, want)| have == want)
}
