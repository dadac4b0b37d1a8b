//! Static word tables: pronouns, nouns, modifiers and verb conjugations per tier.

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Conjugation pool a verb piece samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tier {
    /// Present indicative.
    #[default]
    #[value(alias = "basico")]
    Basic,
    /// Preterite, imperfect, future, conditional.
    #[value(alias = "medio")]
    Intermediate,
    /// Compound and subjunctive forms.
    #[value(alias = "avanzado")]
    Advanced,
}

impl Tier {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Intermediate, Self::Advanced];

    /// Next tier, wrapping from advanced back to basic.
    pub fn cycle(self) -> Self {
        match self {
            Self::Basic => Self::Intermediate,
            Self::Intermediate => Self::Advanced,
            Self::Advanced => Self::Basic,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "básico",
            Self::Intermediate => "medio",
            Self::Advanced => "avanzado",
        })
    }
}

/// One verb and its conjugated forms, grouped by tier.
#[derive(Debug, PartialEq, Eq)]
pub struct Verb {
    pub infinitive: &'static str,
    basic: &'static [&'static str],
    intermediate: &'static [&'static str],
    advanced: &'static [&'static str],
}

impl Verb {
    pub fn forms(&self, tier: Tier) -> &'static [&'static str] {
        match tier {
            Tier::Basic => self.basic,
            Tier::Intermediate => self.intermediate,
            Tier::Advanced => self.advanced,
        }
    }
}

pub const PRONOUNS: &[&str] = &["yo", "tú", "él", "ella", "nosotros", "ustedes", "ellos"];

pub const NOUNS: &[&str] = &[
    "la casa",
    "el libro",
    "un café",
    "la música",
    "el parque",
    "un amigo",
    "la ciudad",
];

/// Prepositions, definite articles, indefinite articles. A modifier is drawn by
/// picking a group first, then a word inside it.
pub const MODIFIER_GROUPS: &[&[&str]] = &[
    &["en", "con", "sobre", "para", "desde", "hacia"],
    &["el", "la", "los", "las"],
    &["un", "una", "unos", "unas"],
];

pub static VERBS: &[Verb] = &[
    Verb {
        infinitive: "hablar",
        basic: &["hablo", "hablas", "habla", "hablamos"],
        intermediate: &["hablé", "hablaba", "hablaré", "hablaría"],
        advanced: &["haya hablado", "hubiera hablado", "hablase", "habría hablado"],
    },
    Verb {
        infinitive: "comer",
        basic: &["como", "comes", "come", "comemos"],
        intermediate: &["comí", "comía", "comeré", "comería"],
        advanced: &["haya comido", "hubiera comido", "comiese", "habría comido"],
    },
    Verb {
        infinitive: "vivir",
        basic: &["vivo", "vives", "vive", "vivimos"],
        intermediate: &["viví", "vivía", "viviré", "viviría"],
        advanced: &["haya vivido", "hubiera vivido", "viviese", "habría vivido"],
    },
    Verb {
        infinitive: "estudiar",
        basic: &["estudio", "estudias", "estudia", "estudiamos"],
        intermediate: &["estudié", "estudiaba", "estudiaré", "estudiaría"],
        advanced: &[
            "haya estudiado",
            "hubiera estudiado",
            "estudiase",
            "habría estudiado",
        ],
    },
];

/// Uniform pick from a static table. Tables are never empty; an empty one is a bug.
fn pick<T, R: Rng + ?Sized>(rng: &mut R, items: &'static [T]) -> &'static T {
    items
        .choose(rng)
        .expect("content tables must not be empty")
}

pub fn random_pronoun<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    *pick(rng, PRONOUNS)
}

pub fn random_noun<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    *pick(rng, NOUNS)
}

pub fn random_modifier<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let group = *pick(rng, MODIFIER_GROUPS);
    *pick(rng, group)
}

pub fn random_verb<R: Rng + ?Sized>(rng: &mut R) -> &'static Verb {
    pick(rng, VERBS)
}

/// A conjugated form of `verb` from the pool of `tier`.
pub fn random_form<R: Rng + ?Sized>(rng: &mut R, verb: &'static Verb, tier: Tier) -> &'static str {
    *pick(rng, verb.forms(tier))
}

/// Complement text: a fresh modifier in front of the fixed noun.
pub fn complement_text<R: Rng + ?Sized>(rng: &mut R, noun: &str) -> String {
    format!("{} {}", random_modifier(rng), noun)
}
