//! Puzzle model: vials of stacked color layers and the pour rule.
//!
//! Every transforming operation returns a new, independent [`PuzzleState`];
//! inputs are never modified.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PuzzleError;

/// Number of layers a vial can hold
pub const VIAL_CAPACITY: usize = 4;

/// Liquid color - serialized as its lowercase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Lime,
    Cyan,
    Yellow,
    Red,
    Orange,
    Blue,
    Magenta,
    Green,
    Purple,
    Pink,
    Brown,
    Navy,
}

impl Color {
    pub const ALL: [Color; 12] = [
        Color::Lime,
        Color::Cyan,
        Color::Yellow,
        Color::Red,
        Color::Orange,
        Color::Blue,
        Color::Magenta,
        Color::Green,
        Color::Purple,
        Color::Pink,
        Color::Brown,
        Color::Navy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Lime => "lime",
            Color::Cyan => "cyan",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Brown => "brown",
            Color::Navy => "navy",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| PuzzleError::UnknownColor(s.to_string()))
    }
}

/// A pour from one vial into another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    /// Parses `FROM>TO`, e.g. `0>2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PuzzleError::MalformedMove(s.to_string());
        let (from, to) = s.trim().split_once('>').ok_or_else(malformed)?;
        let from = from.trim().parse().map_err(|_| malformed())?;
        let to = to.trim().parse().map_err(|_| malformed())?;
        Ok(Move { from, to })
    }
}

/// A fixed-capacity stack of layers, bottom to top
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vial {
    layers: SmallVec<[Color; VIAL_CAPACITY]>,
}

impl Vial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[Color] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.layers.len() >= VIAL_CAPACITY
    }

    pub fn free_space(&self) -> usize {
        VIAL_CAPACITY.saturating_sub(self.layers.len())
    }

    pub fn top(&self) -> Option<Color> {
        self.layers.last().copied()
    }

    /// Length of the contiguous same-color run at the top
    pub fn top_run(&self) -> usize {
        match self.top() {
            None => 0,
            Some(top) => self.layers.iter().rev().take_while(|&&c| c == top).count(),
        }
    }

    /// Full with a single color, or empty
    pub fn is_complete(&self) -> bool {
        match self.layers.first() {
            None => true,
            Some(&first) => self.is_full() && self.layers.iter().all(|&c| c == first),
        }
    }
}

/// An ordered sequence of vials; a vial's identity is its index
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Color>>", into = "Vec<Vec<Color>>")]
pub struct PuzzleState {
    vials: Vec<Vial>,
}

impl PuzzleState {
    /// Build a state from per-vial layers (bottom to top), rejecting overfull vials
    pub fn new(vials: Vec<Vec<Color>>) -> Result<Self, PuzzleError> {
        let vials = vials
            .into_iter()
            .enumerate()
            .map(|(index, layers)| {
                if layers.len() > VIAL_CAPACITY {
                    return Err(PuzzleError::VialOverflow {
                        vial: index,
                        layers: layers.len(),
                    });
                }
                Ok(Vial {
                    layers: SmallVec::from_vec(layers),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { vials })
    }

    pub fn vials(&self) -> &[Vial] {
        &self.vials
    }

    pub fn vial(&self, index: usize) -> Option<&Vial> {
        self.vials.get(index)
    }

    pub fn vial_count(&self) -> usize {
        self.vials.len()
    }

    pub fn layer_count(&self) -> usize {
        self.vials.iter().map(Vial::len).sum()
    }

    /// Multiset of layers across all vials
    pub fn color_counts(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for vial in &self.vials {
            for &color in vial.layers() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Whether pouring `from` into `to` is allowed. Out-of-range or equal
    /// indices are simply illegal.
    pub fn is_legal_move(&self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let (Some(src), Some(dst)) = (self.vials.get(from), self.vials.get(to)) else {
            return false;
        };
        let Some(color) = src.top() else {
            return false;
        };
        if dst.is_full() {
            return false;
        }
        match dst.top() {
            None => true,
            Some(top) => top == color,
        }
    }

    /// Pour the top run of `from` into `to`, clipped by the free space of `to`.
    pub fn apply_move(&self, from: usize, to: usize) -> Result<PuzzleState, PuzzleError> {
        if !self.is_legal_move(from, to) {
            return Err(PuzzleError::InvalidMove { from, to });
        }
        let mut next = self.clone();
        let amount = next.vials[from].top_run().min(next.vials[to].free_space());
        for _ in 0..amount {
            if let Some(color) = next.vials[from].layers.pop() {
                next.vials[to].layers.push(color);
            }
        }
        Ok(next)
    }

    /// Every vial is empty or holds four layers of one color
    pub fn is_goal(&self) -> bool {
        self.vials.iter().all(Vial::is_complete)
    }

    /// Legal moves in scan order: source ascending, then destination ascending
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let count = self.vials.len();
        (0..count)
            .flat_map(move |from| (0..count).map(move |to| Move::new(from, to)))
            .filter(move |m| self.is_legal_move(m.from, m.to))
    }

    /// Check that `other` has the same vial count and the same layers
    pub fn ensure_compatible(&self, other: &PuzzleState) -> Result<(), PuzzleError> {
        if self.vial_count() != other.vial_count() {
            return Err(PuzzleError::VialCountMismatch {
                expected: self.vial_count(),
                found: other.vial_count(),
            });
        }
        if self.color_counts() != other.color_counts() {
            return Err(PuzzleError::ColorMismatch);
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Color>>> for PuzzleState {
    type Error = PuzzleError;

    fn try_from(vials: Vec<Vec<Color>>) -> Result<Self, Self::Error> {
        PuzzleState::new(vials)
    }
}

impl From<PuzzleState> for Vec<Vec<Color>> {
    fn from(state: PuzzleState) -> Self {
        state
            .vials
            .into_iter()
            .map(|vial| vial.layers.into_vec())
            .collect()
    }
}

pub fn is_legal_move(state: &PuzzleState, from: usize, to: usize) -> bool {
    state.is_legal_move(from, to)
}

pub fn apply_move(state: &PuzzleState, from: usize, to: usize) -> Result<PuzzleState, PuzzleError> {
    state.apply_move(from, to)
}

pub fn is_goal(state: &PuzzleState) -> bool {
    state.is_goal()
}

/// Puzzle file format accepted by the command line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub vials: PuzzleState,
}
