use crate::position::Position;
use crate::types::{Color, PieceType};

/// Score of a checkmate against the evaluated color.
pub const SCORE_MIN: i32 = -1000;
/// Score of a checkmate delivered by the evaluated color.
pub const SCORE_MAX: i32 = 1000;

const MATERIAL_WEIGHT: i32 = 10;

/// Static evaluation from `color`'s point of view.
///
/// A checkmate short-circuits to the sentinels; otherwise this is the material
/// and activity balance of `color` minus that of its opponent.
pub fn calculate_score(pos: &Position, color: Color) -> i32 {
    if pos.is_checkmate() {
        return if pos.turn() == color { SCORE_MIN } else { SCORE_MAX };
    }
    side_score(pos, color) - side_score(pos, !color)
}

/// Material, advanced pawns and pressure on enemy pieces for one color.
fn side_score(pos: &Position, color: Color) -> i32 {
    let mut score = 0;
    for piece in pos.side(color).live_pieces() {
        score += piece.kind.value() * MATERIAL_WEIGHT;

        let advanced = piece.square().is_some_and(|sq| sq.rank() != color.pawn_rank());
        if piece.kind == PieceType::Pawn && advanced {
            score += 1;
        }

        for target in piece.candidate_moves(pos) {
            if let Some(victim) = pos.piece_at(target).filter(|victim| victim.color != color) {
                score += victim.kind.value() - 1;
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        let pos = Position::new();
        assert_eq!(calculate_score(&pos, Color::White), 0);
        assert_eq!(calculate_score(&pos, Color::Black), 0);
    }

    #[test]
    fn material_and_pressure_count() {
        // White queen attacks the black rook, nothing attacks back.
        let pos = Position::from_fen("k7/8/8/3r4/8/8/8/K2Q4 w - - 0 1").unwrap();
        // white: king 100 + queen 90 + attack on rook 4 = 194
        // black: king 100 + rook 50 + attack on queen 8 = 158
        assert_eq!(calculate_score(&pos, Color::White), 36);
        assert_eq!(calculate_score(&pos, Color::Black), -36);
    }

    #[test]
    fn advanced_pawns_earn_a_point() {
        let home = Position::from_fen("k7/p7/8/8/8/8/P7/K7 w - - 0 1").unwrap();
        let advanced = Position::from_fen("k7/p7/8/8/P7/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(calculate_score(&home, Color::White), 0);
        assert_eq!(calculate_score(&advanced, Color::White), 1);
    }

    #[test]
    fn checkmate_uses_sentinels() {
        // Back-rank mate, Black to move.
        let pos = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(pos.is_checkmate());
        assert_eq!(calculate_score(&pos, Color::Black), SCORE_MIN);
        assert_eq!(calculate_score(&pos, Color::White), SCORE_MAX);
    }
}
