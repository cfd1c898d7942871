//! Tic-tac-toe.
//!
//! Small enough to search exhaustively and it has draws, which makes it a
//! good check on the search and its draw bookkeeping. Black plays X and
//! moves first; cells are numbered 0-8 row-major.

use std::fmt;

use crate::error::{MctsError, Result};
use crate::game::{GameState, Player};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToe {
    board: [Option<Player>; 9],
    next: Player,
    winner: Option<Player>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    /// An empty board with Black (X) to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            next: Player::Black,
            winner: None,
        }
    }

    /// Play `cells` in order from the empty board.
    pub fn from_moves(cells: &[usize]) -> Result<Self> {
        cells
            .iter()
            .try_fold(Self::new(), |state, cell| state.apply_move(cell))
    }

    pub fn get(&self, cell: usize) -> Option<Player> {
        self.board.get(cell).copied().flatten()
    }

    fn line_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            let p = self.board[a]?;
            (self.board[b] == Some(p) && self.board[c] == Some(p)).then_some(p)
        })
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(Option::is_some)
    }
}

impl GameState for TicTacToe {
    type Move = usize;

    fn legal_moves(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }
        (0..9).filter(|&c| self.board[c].is_none()).collect()
    }

    fn apply_move(&self, &cell: &usize) -> Result<Self> {
        if self.is_over() || cell >= 9 || self.board[cell].is_some() {
            return Err(MctsError::IllegalMove(format!("cell {cell}")));
        }
        let mut next = *self;
        next.board[cell] = Some(self.next);
        next.next = self.next.other();
        next.winner = next.line_winner();
        Ok(next)
    }

    fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    fn next_player(&self) -> Player {
        self.next
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let ch = match self.board[row * 3 + col] {
                    Some(Player::Black) => 'X',
                    Some(Player::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
