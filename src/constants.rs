//! Default search parameters and Go adapter settings.
//!
//! The search core itself is game-agnostic; the Go values below are only
//! used by [`crate::games::go`] and the GTP front-end.

// =============================================================================
// Search Parameters
// =============================================================================

/// Default UCT exploration weight. Larger values favour under-sampled children.
pub const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.5;

/// Default number of simulations per move request.
pub const DEFAULT_NUM_ROUNDS: usize = 500;

/// Win fraction below which the GTP engine resigns instead of playing.
pub const RESIGN_THRES: f64 = 0.1;

/// Minimum root rollouts before a resignation is considered.
pub const RESIGN_MIN_ROLLOUTS: u64 = 100;

// =============================================================================
// Go Defaults
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest board size accepted by the adapter.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board size accepted by the adapter (coordinate letters run out after 19).
pub const MAX_BOARD_SIZE: usize = 19;

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f32 = 7.5;

/// Column letters for board coordinates. `I` is skipped by Go convention.
pub const COLS: &[u8; 19] = b"ABCDEFGHJKLMNOPQRST";

/// Maximum game length for a board of the given size.
///
/// Three times the board area leaves room for captures and replays while
/// guaranteeing random playouts terminate.
pub const fn max_game_len(size: usize) -> usize {
    size * size * 3
}
