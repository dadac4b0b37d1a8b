//! Adjacency between resting pieces and the pronoun → verb → complement search.

use crate::board::Board;
use crate::piece::{PieceId, Word};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Score awarded for each completed phrase.
pub const PHRASE_BONUS: u32 = 100;

const NEIGHBOURS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub type Adjacency = BTreeMap<PieceId, BTreeSet<PieceId>>;

/// A completed sentence, built from the texts of the three matched pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub pronoun: String,
    pub verb: String,
    pub complement: String,
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pronoun, self.verb, self.complement)
    }
}

/// One match: the phrase and the ids it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub ids: [PieceId; 3],
    pub phrase: Phrase,
}

/// Which distinct locked pieces touch each locked piece (4-neighbourhood).
/// Cells of pieces outside the registry (the falling piece) are ignored.
pub fn adjacency(board: &Board) -> Adjacency {
    let grid = &board.grid;
    let mut adj = Adjacency::new();
    for (x, y, id) in grid.occupied() {
        if board.piece(id).is_none() {
            continue;
        }
        let entry = adj.entry(id).or_default();
        for (dx, dy) in NEIGHBOURS_4 {
            if let Some(other) = grid.cell_at(x + dx, y + dy).and_then(|c| c.owner()) {
                if other != id && board.piece(other).is_some() {
                    entry.insert(other);
                }
            }
        }
    }
    adj
}

/// Greedy search in ascending id order: for each unclaimed pronoun, the first
/// unclaimed verb next to it that itself touches an unclaimed complement forms
/// a phrase. Claimed pieces are never reused within one scan.
pub fn find_phrases(board: &Board) -> Vec<PhraseMatch> {
    let adj = adjacency(board);
    let word_of = |id: PieceId| board.piece(id).map(|p| p.word);
    let mut claimed = BTreeSet::new();
    let mut found = Vec::new();

    for (&pronoun, neighbours) in &adj {
        if !matches!(word_of(pronoun), Some(Word::Pronoun)) {
            continue;
        }
        let hit = neighbours
            .iter()
            .filter(|&&v| matches!(word_of(v), Some(Word::Verb { .. })) && !claimed.contains(&v))
            .find_map(|&verb| {
                adj.get(&verb)?
                    .iter()
                    .find(|&&c| {
                        matches!(word_of(c), Some(Word::Complement { .. })) && !claimed.contains(&c)
                    })
                    .map(|&complement| (verb, complement))
            });
        let Some((verb, complement)) = hit else {
            continue;
        };
        let text = |id: PieceId| board.piece(id).map(|p| p.text.clone()).unwrap_or_default();
        found.push(PhraseMatch {
            ids: [pronoun, verb, complement],
            phrase: Phrase {
                pronoun: text(pronoun),
                verb: text(verb),
                complement: text(complement),
            },
        });
        claimed.extend([pronoun, verb, complement]);
    }
    found
}
