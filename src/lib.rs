//! Chess rules engine with an exhaustive minimax move recommender.
//!
//! The board is a graph of 64 linked squares. Pieces belong to their side and
//! squares only reference them. Legality is decided by playing each candidate
//! move on a cloned position and looking at the attacked squares afterwards,
//! and the search explores the game tree the same way.

pub mod bitboard;
pub mod castling;
pub mod error;
pub mod eval;
pub mod fen;
pub mod grid;
pub mod perft;
pub mod piece;
pub mod position;
pub mod search;
pub mod side;
pub mod square;
pub mod state;
pub mod types;

pub use castling::CastlingRights;
pub use error::{EngineError, EngineResult};
pub use eval::calculate_score;
pub use position::Position;
pub use search::{ScoredMove, SearchConfig, SearchLevel, Searcher};
pub use side::MoveMap;
pub use square::Square;
pub use state::{Counters, ExportedState, PositionDescriptor};
pub use types::{Color, PieceType};
