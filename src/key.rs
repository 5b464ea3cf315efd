//! Canonical string encoding of a puzzle state.
//!
//! Layers are joined with `,` bottom to top and every vial is terminated by
//! `|`, in index order: `red,red|blue||` is three vials where the last is
//! empty, and zero vials encode as the empty string. Color names are
//! lowercase letters only, so the separators never collide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::puzzle::{Color, PuzzleState};

const LAYER_SEPARATOR: char = ',';
const VIAL_SEPARATOR: char = '|';

/// Lossless, order-preserving encoding of a [`PuzzleState`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact inverse of [`canonical_key`]
    pub fn decode(&self) -> Result<PuzzleState, PuzzleError> {
        decode(&self.0)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CanonicalKey {
    type Err = PuzzleError;

    /// Accepts only strings that decode to a valid state, normalized through
    /// a decode/encode pass.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(|state| canonical_key(&state))
    }
}

impl From<&PuzzleState> for CanonicalKey {
    fn from(state: &PuzzleState) -> Self {
        canonical_key(state)
    }
}

pub fn canonical_key(state: &PuzzleState) -> CanonicalKey {
    let mut out = String::with_capacity(state.layer_count() * 6 + state.vial_count());
    for vial in state.vials() {
        for (layer, color) in vial.layers().iter().enumerate() {
            if layer > 0 {
                out.push(LAYER_SEPARATOR);
            }
            out.push_str(color.name());
        }
        out.push(VIAL_SEPARATOR);
    }
    CanonicalKey(out)
}

fn decode(key: &str) -> Result<PuzzleState, PuzzleError> {
    if key.is_empty() {
        return PuzzleState::new(Vec::new());
    }
    let body = key
        .strip_suffix(VIAL_SEPARATOR)
        .ok_or_else(|| PuzzleError::MalformedKey(key.to_string()))?;
    let vials = body
        .split(VIAL_SEPARATOR)
        .map(|vial| {
            if vial.is_empty() {
                return Ok(Vec::new());
            }
            vial.split(LAYER_SEPARATOR)
                .map(Color::from_str)
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    PuzzleState::new(vials)
}
