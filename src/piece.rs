//! Pieces: id handle, grammatical payload and the record stored in the board.

use crate::content::{self, Tier, Verb};
use crate::shape::ShapeKind;
use rand::Rng;
use std::fmt;

/// Handle of a piece. Grid cells store this, never the piece itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a piece says. The shape follows from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Pronoun,
    Verb { verb: &'static Verb, tier: Tier },
    Complement { noun: &'static str },
}

impl Word {
    pub fn shape(&self) -> ShapeKind {
        match self {
            Self::Pronoun => ShapeKind::Square,
            Self::Verb { .. } => ShapeKind::Bar,
            Self::Complement { .. } => ShapeKind::Hook,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub word: Word,
    /// Quarter turns, 0..4.
    pub rotation: u8,
    pub x: i32,
    pub y: i32,
    pub text: String,
}

impl Piece {
    /// A fresh piece of random shape at (x, y), rotation 0.
    pub fn random<R: Rng + ?Sized>(id: PieceId, x: i32, y: i32, tier: Tier, rng: &mut R) -> Self {
        let (word, text) = match rng.gen_range(0..3) {
            0 => (Word::Pronoun, content::random_pronoun(rng).to_string()),
            1 => {
                let verb = content::random_verb(rng);
                let text = content::random_form(rng, verb, tier).to_string();
                (Word::Verb { verb, tier }, text)
            }
            _ => {
                let noun = content::random_noun(rng);
                (Word::Complement { noun }, content::complement_text(rng, noun))
            }
        };
        Self {
            id,
            word,
            rotation: 0,
            x,
            y,
            text,
        }
    }

    pub fn shape(&self) -> ShapeKind {
        self.word.shape()
    }

    /// Board cells covered at the current anchor and rotation, in definition order.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        self.cells_at(self.x, self.y, self.rotation)
    }

    pub fn cells_at(&self, x: i32, y: i32, rotation: u8) -> Vec<(i32, i32)> {
        self.shape()
            .rotated(rotation)
            .into_iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .collect()
    }

    /// Draw new text for verbs (at `tier`) and complements (new modifier).
    /// Pronouns keep theirs.
    pub fn resample_text<R: Rng + ?Sized>(&mut self, tier: Tier, rng: &mut R) {
        match self.word {
            Word::Pronoun => {}
            Word::Verb { verb, .. } => {
                self.text = content::random_form(rng, verb, tier).to_string();
                self.word = Word::Verb { verb, tier };
            }
            Word::Complement { noun } => {
                self.text = content::complement_text(rng, noun);
            }
        }
    }
}
