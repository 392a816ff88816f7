//! Static interval table for the eight modes of the Octoechos.
//!
//! Chrysanthine theory divides the octave into 72 equal *moria*. Each mode
//! (Glas) is an ordered cycle of seven steps whose sizes, in moria, add up to
//! exactly one octave. Reading the cycle forward walks up the scale; reading it
//! backward walks down.
//!
//! ```rust
//! use octoechos_core::{Glas, NoteName, MORIA_PER_OCTAVE};
//!
//! let first = Glas::lookup(1);
//! assert_eq!(first.base_note, NoteName::Pa);
//! assert_eq!(first.interval_sum(), MORIA_PER_OCTAVE);
//!
//! // Unknown ids fall back to Glas 1 instead of failing.
//! assert_eq!(Glas::lookup(42).id, 1);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of moria in one octave.
pub const MORIA_PER_OCTAVE: u32 = 72;

/// Number of cents in one octave.
pub const CENTS_PER_OCTAVE: f64 = 1200.0;

/// Size of one moria in cents (1200 / 72).
pub const CENTS_PER_MORIA: f64 = CENTS_PER_OCTAVE / MORIA_PER_OCTAVE as f64;

/// Number of scale steps before a mode repeats at the octave.
pub const STEPS_PER_OCTAVE: i32 = 7;

/// The seven cyclic note names of Byzantine solfège.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteName {
    /// Ni (roughly C)
    Ni,
    /// Pa (roughly D)
    Pa,
    /// Vu (roughly E)
    Vu,
    /// Ga (roughly F)
    Ga,
    /// Di (roughly G)
    Di,
    /// Ke (roughly A)
    Ke,
    /// Zo (roughly B)
    Zo,
}

impl NoteName {
    /// All names in cyclic order, starting from Ni.
    pub const ALL: [NoteName; 7] = [
        NoteName::Ni,
        NoteName::Pa,
        NoteName::Vu,
        NoteName::Ga,
        NoteName::Di,
        NoteName::Ke,
        NoteName::Zo,
    ];

    /// Position of this name in the cycle (Ni = 0 .. Zo = 6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name at a cyclic position. Any integer is accepted; negative positions
    /// wrap backward from Ni.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(STEPS_PER_OCTAVE) as usize]
    }

    /// The name `steps` positions away along the cycle.
    pub fn offset(self, steps: i32) -> Self {
        Self::from_index(self.index() as i32 + steps)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            NoteName::Ni => "Ni",
            NoteName::Pa => "Pa",
            NoteName::Vu => "Vu",
            NoteName::Ga => "Ga",
            NoteName::Di => "Di",
            NoteName::Ke => "Ke",
            NoteName::Zo => "Zo",
        }
    }

    /// Nearest Western solfège syllable.
    pub fn western(self) -> &'static str {
        match self {
            NoteName::Ni => "Do",
            NoteName::Pa => "Re",
            NoteName::Vu => "Mi",
            NoteName::Ga => "Fa",
            NoteName::Di => "Sol",
            NoteName::Ke => "La",
            NoteName::Zo => "Si",
        }
    }

    /// Default tuning frequency of this note in the fourth octave, in Hz.
    pub fn default_frequency(self) -> f64 {
        match self {
            NoteName::Ni => 261.63,
            NoteName::Pa => 293.66,
            NoteName::Vu => 329.63,
            NoteName::Ga => 349.23,
            NoteName::Di => 392.00,
            NoteName::Ke => 440.00,
            NoteName::Zo => 493.88,
        }
    }

    /// Parse a name case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl core::fmt::Display for NoteName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Family of interval structures a mode belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Genus {
    /// Diatonic scale (12-10-8 tetrachords).
    Diatonic,
    /// Soft chromatic (8-14-8 tetrachords).
    SoftChromatic,
    /// Hard chromatic (6-20-4 tetrachords).
    HardChromatic,
    /// Enharmonic (12-12-6 tetrachords).
    Enharmonic,
}

impl Genus {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Genus::Diatonic => "diatonic",
            Genus::SoftChromatic => "soft chromatic",
            Genus::HardChromatic => "hard chromatic",
            Genus::Enharmonic => "enharmonic",
        }
    }
}

/// One of the eight modes of the Octoechos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glas {
    /// Mode number, 1 to 8.
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// Greek name of the echos.
    pub echos: &'static str,
    /// Tonic of the mode.
    pub base_note: NoteName,
    /// Interval family.
    pub genus: Genus,
    /// Step sizes in moria, starting from the tonic. Always sums to 72.
    pub intervals: [u8; 7],
    /// Short description for display.
    pub description: &'static str,
}

const DIATONIC_FROM_PA: [u8; 7] = [10, 8, 12, 12, 10, 8, 12];
const DIATONIC_FROM_VU: [u8; 7] = [8, 12, 12, 10, 8, 12, 10];
const DIATONIC_FROM_NI: [u8; 7] = [12, 10, 8, 12, 12, 10, 8];
const SOFT_CHROMATIC: [u8; 7] = [8, 14, 8, 12, 8, 14, 8];
const HARD_CHROMATIC: [u8; 7] = [6, 20, 4, 12, 6, 20, 4];
const ENHARMONIC: [u8; 7] = [12, 12, 6, 12, 12, 12, 6];
const VARYS: [u8; 7] = [8, 12, 10, 8, 12, 12, 10];

/// The eight modes, ordered by id.
pub static GLASURI: [Glas; 8] = [
    Glas {
        id: 1,
        name: "Glasul 1",
        echos: "Echos Protos",
        base_note: NoteName::Pa,
        genus: Genus::Diatonic,
        intervals: DIATONIC_FROM_PA,
        description: "Diatonic on Pa",
    },
    Glas {
        id: 2,
        name: "Glasul 2",
        echos: "Echos Deuterus",
        base_note: NoteName::Di,
        genus: Genus::SoftChromatic,
        intervals: SOFT_CHROMATIC,
        description: "Soft chromatic on Di",
    },
    Glas {
        id: 3,
        name: "Glasul 3",
        echos: "Echos Tritos",
        base_note: NoteName::Ga,
        genus: Genus::Enharmonic,
        intervals: ENHARMONIC,
        description: "Enharmonic on Ga",
    },
    Glas {
        id: 4,
        name: "Glasul 4 (Legetos)",
        echos: "Echos Tetartos",
        base_note: NoteName::Vu,
        genus: Genus::Diatonic,
        intervals: DIATONIC_FROM_VU,
        description: "Diatonic Legetos on Vu",
    },
    Glas {
        id: 5,
        name: "Glasul 5",
        echos: "Echos Plagios Protos",
        base_note: NoteName::Pa,
        genus: Genus::Diatonic,
        intervals: DIATONIC_FROM_PA,
        description: "Diatonic on Pa, plagal of the first",
    },
    Glas {
        id: 6,
        name: "Glasul 6",
        echos: "Echos Plagios Deuterus",
        base_note: NoteName::Pa,
        genus: Genus::HardChromatic,
        intervals: HARD_CHROMATIC,
        description: "Hard chromatic on Pa",
    },
    Glas {
        id: 7,
        name: "Glasul 7 (Varys)",
        echos: "Echos Varys",
        base_note: NoteName::Zo,
        genus: Genus::Diatonic,
        intervals: VARYS,
        description: "Grave mode, diatonic on Zo",
    },
    Glas {
        id: 8,
        name: "Glasul 8",
        echos: "Echos Plagios Tetartos",
        base_note: NoteName::Ni,
        genus: Genus::Diatonic,
        intervals: DIATONIC_FROM_NI,
        description: "Diatonic on Ni",
    },
];

impl Glas {
    /// Look up a mode by id, returning `None` for ids outside 1..=8.
    pub fn get(id: u8) -> Option<&'static Glas> {
        GLASURI.iter().find(|g| g.id == id)
    }

    /// Look up a mode by id, falling back to Glas 1 for unknown ids.
    pub fn lookup(id: u8) -> &'static Glas {
        Self::get(id).unwrap_or(&GLASURI[0])
    }

    /// Iterate over all eight modes.
    pub fn all() -> impl Iterator<Item = &'static Glas> {
        GLASURI.iter()
    }

    /// Sum of the seven step sizes in moria.
    pub fn interval_sum(&self) -> u32 {
        self.intervals.iter().map(|&m| u32::from(m)).sum()
    }

    /// Step size leaving cyclic scale position `step` upward.
    ///
    /// Position `-1` names the step that arrives at the tonic from below.
    pub fn interval(&self, step: i32) -> u8 {
        self.intervals[step.rem_euclid(STEPS_PER_OCTAVE) as usize]
    }

    /// Default tuning frequency of this mode's tonic, in Hz.
    pub fn base_frequency(&self) -> f64 {
        self.base_note.default_frequency()
    }
}
