use crate::error::EngineResult;
use crate::position::Position;

/// Counts leaf nodes of the legal move tree `depth` plies deep.
///
/// Promotions always produce a queen, so counts only match the standard perft
/// tables for positions and depths where no pawn can promote.
pub fn perft(pos: &Position, depth: u32) -> EngineResult<u64> {
    if depth == 0 {
        return Ok(1);
    }
    if depth == 1 {
        return Ok(pos.legal_moves().values().map(|targets| targets.len() as u64).sum());
    }

    let mut nodes = 0;
    for (&from, targets) in pos.legal_moves() {
        for &to in targets {
            let mut child = pos.clone();
            child.apply_move(from, to, true)?;
            nodes += perft(&child, depth - 1)?;
        }
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_counts() {
        let pos = Position::new();
        assert_eq!(perft(&pos, 1), Ok(20));
        assert_eq!(perft(&pos, 2), Ok(400));
        assert_eq!(perft(&pos, 3), Ok(8902));
    }

    #[test]
    fn en_passant_and_pins_position() {
        // Position 3 of the chessprogramming.org perft suite, no promotions within three plies.
        let pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&pos, 1), Ok(14));
        assert_eq!(perft(&pos, 2), Ok(191));
        assert_eq!(perft(&pos, 3), Ok(2812));
    }
}
