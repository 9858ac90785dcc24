use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use scachera::eval::SCORE_MAX;
use scachera::{EngineError, Position, SearchConfig, Searcher, Square};

#[test]
fn unsupported_level_leaves_position_untouched() {
    let pos = Position::new();
    let before = pos.export();
    for level in [-1, 4, 99] {
        assert_eq!(pos.calculate_ai_moves(level), Err(EngineError::UnsupportedSearchLevel(level)));
        assert_eq!(pos.calculate_ai_move(level), Err(EngineError::UnsupportedSearchLevel(level)));
    }
    assert_eq!(pos.export(), before);
}

#[test]
fn search_never_mutates_the_position() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let pos = Position::from_fen(fen).unwrap();
    let before = pos.export();
    let ranked = pos.calculate_ai_moves(1).unwrap();
    assert_eq!(ranked.len(), pos.legal_moves().values().map(Vec::len).sum::<usize>());
    assert_eq!(pos.export(), before);
}

#[test]
fn head_of_ranking_is_the_recommendation() {
    let pos = Position::from_fen("k7/8/8/3q4/8/8/8/K2R4 w - - 0 1").unwrap();
    let config = SearchConfig { seed: Some(3), ..Default::default() };
    let ranked = Searcher::new(config.clone()).rank_moves(&pos, 1).unwrap();
    let best = Searcher::new(config).best_move(&pos, 1).unwrap();
    assert_eq!(best, ranked.first().copied());
    assert_eq!(best.map(|m| (m.from, m.to)), Some((Square::D1, Square::D5)));
}

#[test]
fn prefers_the_quicker_mate() {
    // Ra8 mates at once, slower rook manoeuvres score lower at depth two.
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let config = SearchConfig { seed: Some(11), threads: 2, ..Default::default() };
    let best = Searcher::new(config).best_move(&pos, 2).unwrap().unwrap();
    assert_eq!((best.from, best.to), (Square::A1, Square::A8));
    assert!(best.score >= 1000);
}

#[test]
fn avoids_a_back_rank_mate() {
    // Lifting the rook off the first rank allows ...Re1#.
    let pos = Position::from_fen("4r1k1/5ppp/8/8/8/8/P4PPP/3R2K1 w - - 0 1").unwrap();
    let config = SearchConfig { seed: Some(5), threads: 4, ..Default::default() };
    let best = Searcher::new(config).best_move(&pos, 2).unwrap().unwrap();
    let mut after = pos.clone();
    after.apply_move(best.from, best.to, true).unwrap();
    for (&from, targets) in after.legal_moves() {
        for &to in targets {
            let mut reply = after.clone();
            reply.apply_move(from, to, true).unwrap();
            assert!(!reply.is_checkmate(), "{best:?} allows {from}{to} mate");
        }
    }
}

#[test]
fn expired_deadline_cancels() {
    let pos = Position::new();
    let config =
        SearchConfig { deadline: Some(Duration::ZERO), seed: Some(1), ..Default::default() };
    assert_eq!(Searcher::new(config).rank_moves(&pos, 2), Err(EngineError::SearchCancelled));

    let stop = Arc::new(AtomicBool::new(false));
    let config = SearchConfig { stop: Some(stop), seed: Some(1), ..Default::default() };
    assert_eq!(Searcher::new(config).rank_moves(&pos, 0).map(|r| r.len()), Ok(20));
}

#[test]
fn check_extension_sees_mate_at_the_horizon() {
    // White is in check from c8; Rxc8 removes the checker and mates on the back rank.
    let pos = Position::from_fen("2b3k1/5ppp/8/8/8/7K/8/2R5 w - - 0 1").unwrap();
    let score_of_capture = |extend_in_check| {
        let config = SearchConfig { seed: Some(9), extend_in_check, ..Default::default() };
        let ranked = Searcher::new(config).rank_moves(&pos, 0).unwrap();
        ranked.iter().find(|m| (m.from, m.to) == (Square::C1, Square::C8)).unwrap().score
    };

    assert!(score_of_capture(true) >= SCORE_MAX);
    // Without the extension only the material is seen:
    // rook and king plus the attack on the king (159) against king and three pawns (130).
    assert!((29..=30).contains(&score_of_capture(false)));
}
