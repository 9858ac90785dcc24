//! Wire shapes consumed and produced by the engine.
//!
//! These mirror the JSON a loader hands in and the state a printer or
//! serializer reads back out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::castling::CastlingRights;
use crate::side::MoveMap;
use crate::square::Square;
use crate::types::Color;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    /// Plies since the last capture or pawn move.
    pub half_move: u32,
    /// Starts at 1, incremented after each Black move.
    pub full_move: u32,
}

impl Default for Counters {
    fn default() -> Self {
        Self { half_move: 0, full_move: 1 }
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingOverrides {
    pub white_short: Option<bool>,
    pub white_long: Option<bool>,
    pub black_short: Option<bool>,
    pub black_long: Option<bool>,
}

impl CastlingOverrides {
    pub fn apply(&self, rights: &mut CastlingRights) {
        let fields = [
            (self.white_short, &mut rights.white_short),
            (self.white_long, &mut rights.white_long),
            (self.black_short, &mut rights.black_short),
            (self.black_long, &mut rights.black_long),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

impl From<CastlingRights> for CastlingOverrides {
    fn from(rights: CastlingRights) -> Self {
        Self {
            white_short: Some(rights.white_short),
            white_long: Some(rights.white_long),
            black_short: Some(rights.black_short),
            black_long: Some(rights.black_long),
        }
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOverrides {
    pub half_move: Option<u32>,
    pub full_move: Option<u32>,
}

/// Input used to build a position.
///
/// Square names are accepted in any case, piece letters are upper case for
/// White and lower case for Black.
#[derive(Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDescriptor {
    pub pieces: BTreeMap<String, char>,
    #[serde(default)]
    pub turn: Option<Color>,
    #[serde(default)]
    pub castling: Option<CastlingOverrides>,
    #[serde(default)]
    pub counters: Option<CounterOverrides>,
    #[serde(default)]
    pub en_passant: Option<String>,
}

/// Snapshot of a position as handed to printers and serializers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedState {
    pub pieces: BTreeMap<Square, char>,
    pub turn: Color,
    pub moves: MoveMap,
    pub is_finished: bool,
    pub check_mate: bool,
    pub castling: CastlingRights,
    pub counters: Counters,
    pub en_passant: Option<Square>,
}

impl From<&ExportedState> for PositionDescriptor {
    fn from(state: &ExportedState) -> Self {
        Self {
            pieces: state.pieces.iter().map(|(sq, &code)| (sq.to_string(), code)).collect(),
            turn: Some(state.turn),
            castling: Some(state.castling.into()),
            counters: Some(CounterOverrides {
                half_move: Some(state.counters.half_move),
                full_move: Some(state.counters.full_move),
            }),
            en_passant: state.en_passant.map(|sq| sq.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_touch_given_flags() {
        let mut rights = CastlingRights::default();
        CastlingOverrides { black_long: Some(false), ..Default::default() }.apply(&mut rights);
        assert!(rights.white_short && rights.white_long && rights.black_short);
        assert!(!rights.black_long);
    }

    #[test]
    fn descriptor_reads_loose_json() {
        let json = r#"{
            "pieces": { "e1": "K", "E8": "k" },
            "turn": "black",
            "counters": { "fullMove": 7 }
        }"#;
        let descriptor: PositionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.pieces.get("e1"), Some(&'K'));
        assert_eq!(descriptor.turn, Some(Color::Black));
        assert_eq!(descriptor.counters.and_then(|c| c.full_move), Some(7));
        assert_eq!(descriptor.castling, None);
    }
}
