//! Exhaustive fixed-depth minimax.
//!
//! Every node is a fresh clone of its parent with one move applied; nothing is
//! ever undone. There is no pruning, so the cost grows with the full branching
//! factor at each level. Root candidates are independent and can be scored on
//! several threads, each owning its clones.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::eval::{SCORE_MAX, SCORE_MIN, calculate_score};
use crate::position::Position;
use crate::square::Square;
use crate::types::Color;

/// Supported search depths, in plies beyond the candidate move.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SearchLevel {
    Zero = 0,
    One,
    Two,
    Three,
}

impl SearchLevel {
    pub const ALL: [SearchLevel; 4] =
        [SearchLevel::Zero, SearchLevel::One, SearchLevel::Two, SearchLevel::Three];

    #[inline(always)]
    pub const fn depth(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for SearchLevel {
    type Error = EngineError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.depth() as i64 == level)
            .ok_or(EngineError::UnsupportedSearchLevel(level))
    }
}

/// A candidate move with its search score, higher is better for the side to move.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ScoredMove {
    pub from: Square,
    pub to: Square,
    pub score: i32,
}

/// Search settings.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Worker threads for the root candidates; 0 and 1 both mean single-threaded.
    pub threads: usize,
    /// Seed for the tie-breaking jitter, `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Recalculate a child even at full depth when the mover was in check,
    /// so a mate delivered at the horizon is still recognised.
    pub extend_in_check: bool,
    /// Abort once this much time has passed since the search started.
    pub deadline: Option<Duration>,
    /// Abort as soon as this flag is raised.
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { threads: 1, seed: None, extend_in_check: true, deadline: None, stop: None }
    }
}

/// Deadline and stop flag shared by every node of one search.
struct Cancel<'a> {
    deadline: Option<Instant>,
    stop: Option<&'a AtomicBool>,
}

impl Cancel<'_> {
    fn check(&self) -> EngineResult<()> {
        let expired = self.deadline.is_some_and(|limit| Instant::now() >= limit);
        let stopped = self.stop.is_some_and(|flag| flag.load(Ordering::Relaxed));
        if expired || stopped { Err(EngineError::SearchCancelled) } else { Ok(()) }
    }
}

struct Context<'a> {
    root: Color,
    level: u8,
    extend_in_check: bool,
    cancel: Cancel<'a>,
}

pub struct Searcher {
    config: SearchConfig,
    rng: StdRng,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// Scores every legal move of the side to move and ranks them best first.
    ///
    /// Each score gets a jitter of 0 or 1 so equal moves come out in varying order.
    pub fn rank_moves(&mut self, pos: &Position, level: i64) -> EngineResult<Vec<ScoredMove>> {
        let level = SearchLevel::try_from(level)?;
        let started = Instant::now();

        let candidates: Vec<(Square, Square, i32)> = pos
            .legal_moves()
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
            .map(|(from, to)| (from, to, self.rng.random_range(0..2)))
            .collect();

        let ctx = Context {
            root: pos.turn(),
            level: level.depth(),
            extend_in_check: self.config.extend_in_check,
            cancel: Cancel {
                deadline: self.config.deadline.map(|limit| started + limit),
                stop: self.config.stop.as_deref(),
            },
        };

        let threads = self.config.threads.clamp(1, candidates.len().max(1));
        let scored = if threads == 1 {
            score_all(pos, &candidates, &ctx)
        } else {
            let chunk = candidates.len().div_ceil(threads);
            thread::scope(|scope| -> EngineResult<Vec<ScoredMove>> {
                let workers: Vec<_> = candidates
                    .chunks(chunk)
                    .map(|part| {
                        let ctx = &ctx;
                        scope.spawn(move || score_all(pos, part, ctx))
                    })
                    .collect();
                let mut merged = Vec::with_capacity(candidates.len());
                for worker in workers {
                    match worker.join() {
                        Ok(part) => merged.extend(part?),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                Ok(merged)
            })
        };

        let mut ranked = match scored {
            Ok(ranked) => ranked,
            Err(err) => {
                warn!(level = level.depth(), elapsed = ?started.elapsed(), "search aborted: {err}");
                return Err(err);
            }
        };
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            level = level.depth(),
            candidates = ranked.len(),
            best = ?ranked.first(),
            elapsed = ?started.elapsed(),
            "search finished"
        );
        Ok(ranked)
    }

    /// Best move of the ranking, `None` when the side to move has no legal move.
    pub fn best_move(&mut self, pos: &Position, level: i64) -> EngineResult<Option<ScoredMove>> {
        Ok(self.rank_moves(pos, level)?.into_iter().next())
    }
}

fn score_all(
    pos: &Position,
    candidates: &[(Square, Square, i32)],
    ctx: &Context,
) -> EngineResult<Vec<ScoredMove>> {
    candidates
        .iter()
        .map(|&(from, to, jitter)| {
            let score = search(pos, from, to, ctx, 0)? + jitter;
            Ok(ScoredMove { from, to, score })
        })
        .collect()
}

/// Minimax value of playing `from`→`to` in `pos`, from the root color's point of view.
fn search(pos: &Position, from: Square, to: Square, ctx: &Context, depth: u8) -> EngineResult<i32> {
    ctx.cancel.check()?;

    let mut child = pos.clone();
    child.apply_move(from, to, false)?;

    let mover_in_check = ctx.extend_in_check && pos.is_in_check(pos.turn());
    let recalculated = depth < ctx.level || mover_in_check;
    if recalculated {
        child.recalculate();
    }

    // Wins found sooner and losses found later rank higher.
    let bias = if pos.turn() == ctx.root { -(depth as i32) } else { depth as i32 };

    if recalculated && child.is_finished() && !child.is_checkmate() {
        // Stalemate, also at the horizon when the check extension recalculated.
        return Ok(bias);
    }
    if depth >= ctx.level || child.is_checkmate() {
        return Ok(calculate_score(&child, ctx.root) + bias);
    }

    let maximizing = child.turn() == ctx.root;
    let mut best = if maximizing { SCORE_MIN } else { SCORE_MAX };
    for (&next_from, targets) in child.legal_moves() {
        for &next_to in targets {
            let score = search(&child, next_from, next_to, ctx, depth + 1)?;
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
    }
    Ok(best)
}

impl Position {
    /// All legal moves of the side to move, ranked by a search `level` plies deep.
    pub fn calculate_ai_moves(&self, level: i64) -> EngineResult<Vec<ScoredMove>> {
        Searcher::new(SearchConfig::default()).rank_moves(self, level)
    }

    /// Top-ranked move, `None` when the side to move has no legal move.
    pub fn calculate_ai_move(&self, level: i64) -> EngineResult<Option<ScoredMove>> {
        Searcher::new(SearchConfig::default()).best_move(self, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(threads: usize) -> Searcher {
        Searcher::new(SearchConfig { threads, seed: Some(7), ..Default::default() })
    }

    #[test]
    fn levels_are_a_closed_set() {
        assert_eq!(SearchLevel::try_from(2), Ok(SearchLevel::Two));
        for level in [-1, 4, 10] {
            let expected = Err(EngineError::UnsupportedSearchLevel(level));
            assert_eq!(SearchLevel::try_from(level), expected);
        }
    }

    #[test]
    fn ranking_covers_every_legal_move_in_descending_order() {
        let pos = Position::new();
        let ranked = seeded(1).rank_moves(&pos, 0).unwrap();
        assert_eq!(ranked.len(), 20);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn takes_a_hanging_queen() {
        let pos = Position::from_fen("k7/8/8/3q4/8/8/8/K2R4 w - - 0 1").unwrap();
        let best = seeded(1).best_move(&pos, 0).unwrap().unwrap();
        assert_eq!((best.from, best.to), (Square::D1, Square::D5));
    }

    #[test]
    fn finds_mate_in_one() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let best = seeded(1).best_move(&pos, 1).unwrap().unwrap();
        assert_eq!((best.from, best.to), (Square::A1, Square::A8));
        assert!(best.score >= SCORE_MAX - 1);
    }

    #[test]
    fn seeded_search_is_thread_independent() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        let single = seeded(1).rank_moves(&pos, 0).unwrap();
        let multi = seeded(4).rank_moves(&pos, 0).unwrap();
        let mut a: Vec<_> = single.iter().map(|m| (m.from, m.to, m.score)).collect();
        let mut b: Vec<_> = multi.iter().map(|m| (m.from, m.to, m.score)).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn raised_stop_flag_cancels() {
        let stop = Arc::new(AtomicBool::new(true));
        let config = SearchConfig { stop: Some(stop), seed: Some(1), ..Default::default() };
        let mut searcher = Searcher::new(config);
        assert_eq!(searcher.rank_moves(&Position::new(), 1), Err(EngineError::SearchCancelled));
    }

    #[test]
    fn stalemate_at_the_horizon_scores_as_a_draw() {
        // White is in check from b6; Qxb6 answers it but leaves Black without a move.
        let pos = Position::from_fen("k7/8/1r6/8/3Q4/8/8/1K6 w - - 0 1").unwrap();
        let ranked = seeded(1).rank_moves(&pos, 0).unwrap();
        let is_capture = |m: &&ScoredMove| (m.from, m.to) == (Square::D4, Square::B6);
        let stalemating = ranked.iter().find(is_capture).unwrap();
        assert!(stalemating.score <= 1);
        assert_ne!((ranked[0].from, ranked[0].to), (Square::D4, Square::B6));
    }

    #[test]
    fn no_moves_means_no_recommendation() {
        let pos = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(seeded(1).best_move(&pos, 2), Ok(None));
    }
}
