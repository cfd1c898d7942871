//! Go, as a searchable game.
//!
//! A straightforward 2D board with captures, suicide prevention and simple
//! ko, scored by area with komi. A player never fills one of their own
//! eyes, and passing is legal whenever the game is live. Resignation is
//! accepted by [`GameState::apply_move`] but never listed as a legal move.
//!
//! [`GoPlayout`] keeps random playouts short by passing only when no
//! placement is left. The game also ends after [`max_game_len`] moves.

use std::fmt;

use fastrand::Rng;

use crate::constants::{COLS, DEFAULT_KOMI, MAX_BOARD_SIZE, MIN_BOARD_SIZE, max_game_len};
use crate::error::{MctsError, Result};
use crate::game::{GameState, Player};
use crate::playout::PlayoutPolicy;

/// A board intersection, 1-based: row 1 is the bottom edge, column 1 is `A`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a vertex such as `D4` or `j9` for a board of `size`.
    pub fn parse(s: &str, size: usize) -> Result<Self> {
        let invalid = || MctsError::InvalidCoordinate(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let col = COLS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(invalid)?
            + 1;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > size || col > size {
            return Err(invalid());
        }
        Ok(Self { row, col })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COLS[self.col - 1] as char, self.row)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GoMove {
    Play(Point),
    Pass,
    Resign,
}

impl GoMove {
    /// Parse `pass`, `resign` or a vertex.
    pub fn parse(s: &str, size: usize) -> Result<Self> {
        if s.eq_ignore_ascii_case("pass") {
            Ok(GoMove::Pass)
        } else if s.eq_ignore_ascii_case("resign") {
            Ok(GoMove::Resign)
        } else {
            Point::parse(s, size).map(GoMove::Play)
        }
    }
}

impl fmt::Display for GoMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoMove::Play(pt) => write!(f, "{pt}"),
            GoMove::Pass => write!(f, "pass"),
            GoMove::Resign => write!(f, "resign"),
        }
    }
}

/// Stone placement on an NxN board.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, pt: Point) -> usize {
        (pt.row - 1) * self.size + (pt.col - 1)
    }

    fn on_board(&self, pt: Point) -> bool {
        (1..=self.size).contains(&pt.row) && (1..=self.size).contains(&pt.col)
    }

    pub fn get(&self, pt: Point) -> Option<Player> {
        if !self.on_board(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (1..=size).flat_map(move |row| (1..=size).map(move |col| Point { row, col }))
    }

    fn neighbors(&self, pt: Point) -> impl Iterator<Item = Point> + '_ {
        let Point { row, col } = pt;
        [
            Point::new(row + 1, col),
            Point::new(row.wrapping_sub(1), col),
            Point::new(row, col + 1),
            Point::new(row, col.wrapping_sub(1)),
        ]
        .into_iter()
        .filter(|&n| self.on_board(n))
    }

    fn diagonals(pt: Point) -> [Point; 4] {
        let Point { row, col } = pt;
        [
            Point::new(row + 1, col + 1),
            Point::new(row + 1, col.wrapping_sub(1)),
            Point::new(row.wrapping_sub(1), col + 1),
            Point::new(row.wrapping_sub(1), col.wrapping_sub(1)),
        ]
    }

    /// Stones of the group at `pt` and its liberty count.
    fn group(&self, pt: Point) -> (Vec<Point>, usize) {
        let Some(color) = self.get(pt) else {
            return (Vec::new(), 0);
        };
        let mut visited = vec![false; self.cells.len()];
        let mut counted = vec![false; self.cells.len()];
        let mut stack = vec![pt];
        let mut stones = Vec::new();
        let mut liberties = 0;
        while let Some(cur) = stack.pop() {
            let i = self.idx(cur);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stones.push(cur);
            for n in self.neighbors(cur) {
                let ni = self.idx(n);
                match self.get(n) {
                    None if !counted[ni] => {
                        counted[ni] = true;
                        liberties += 1;
                    }
                    Some(c) if c == color && !visited[ni] => stack.push(n),
                    _ => {}
                }
            }
        }
        (stones, liberties)
    }

    /// The board after `player` places a stone at `pt`, with captures
    /// removed. `None` if the point is taken or the move is suicide.
    pub fn place(&self, pt: Point, player: Player) -> Option<Board> {
        if !self.on_board(pt) || self.get(pt).is_some() {
            return None;
        }
        let mut next = self.clone();
        let idx = next.idx(pt);
        next.cells[idx] = Some(player);

        let opponent = player.other();
        for n in self.neighbors(pt) {
            if next.get(n) != Some(opponent) {
                continue;
            }
            let (stones, liberties) = next.group(n);
            if liberties == 0 {
                for s in stones {
                    let si = next.idx(s);
                    next.cells[si] = None;
                }
            }
        }

        if next.group(pt).1 == 0 {
            return None;
        }
        Some(next)
    }

    /// True if `pt` is an eye of `player`: every neighbour is `player`'s and
    /// the diagonals hold at most one opponent stone (none on the edge).
    pub fn is_eye(&self, pt: Point, player: Player) -> bool {
        if self.get(pt).is_some() {
            return false;
        }
        if self.neighbors(pt).any(|n| self.get(n) != Some(player)) {
            return false;
        }
        let mut at_edge = false;
        let mut bad = 0;
        for d in Self::diagonals(pt) {
            if !self.on_board(d) {
                at_edge = true;
            } else if self.get(d) == Some(player.other()) {
                bad += 1;
            }
        }
        let tolerance = if at_edge { 0 } else { 1 };
        bad <= tolerance
    }

    /// Area score: stones plus empty regions bordered by a single colour.
    /// Returns `(black, white)`.
    pub fn area_score(&self) -> (usize, usize) {
        let mut black = 0;
        let mut white = 0;
        let mut visited = vec![false; self.cells.len()];

        for pt in self.points() {
            match self.get(pt) {
                Some(Player::Black) => black += 1,
                Some(Player::White) => white += 1,
                None => {
                    if visited[self.idx(pt)] {
                        continue;
                    }
                    let (region, borders) = self.empty_region(pt, &mut visited);
                    match borders {
                        (true, false) => black += region,
                        (false, true) => white += region,
                        _ => {}
                    }
                }
            }
        }
        (black, white)
    }

    /// Size of the empty region containing `pt`, and whether it touches
    /// black and white stones.
    fn empty_region(&self, pt: Point, visited: &mut [bool]) -> (usize, (bool, bool)) {
        let mut stack = vec![pt];
        let mut size = 0;
        let mut borders = (false, false);
        while let Some(cur) = stack.pop() {
            let i = self.idx(cur);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            size += 1;
            for n in self.neighbors(cur) {
                match self.get(n) {
                    Some(Player::Black) => borders.0 = true,
                    Some(Player::White) => borders.1 = true,
                    None if !visited[self.idx(n)] => stack.push(n),
                    None => {}
                }
            }
        }
        (size, borders)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.size {
                let ch = match self.get(Point::new(row, col)) {
                    Some(Player::Black) => 'X',
                    Some(Player::White) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for &c in &COLS[..self.size] {
            write!(f, " {}", c as char)?;
        }
        writeln!(f)
    }
}

/// A Go game in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct GoState {
    board: Board,
    next: Player,
    /// Board before the last move, for the ko check.
    previous_board: Option<Board>,
    last_move: Option<GoMove>,
    consecutive_passes: u8,
    moves_played: usize,
    komi: f32,
    resigned: Option<Player>,
}

impl GoState {
    /// An empty board of `size` with Black to move and the default komi.
    pub fn new_game(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(MctsError::InvalidConfig(format!(
                "board size must be between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}, got {size}"
            )));
        }
        Ok(Self {
            board: Board::new(size),
            next: Player::Black,
            previous_board: None,
            last_move: None,
            consecutive_passes: 0,
            moves_played: 0,
            komi: DEFAULT_KOMI,
            resigned: None,
        })
    }

    pub fn with_komi(mut self, komi: f32) -> Self {
        self.komi = komi;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn last_move(&self) -> Option<GoMove> {
        self.last_move
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Black's area minus White's area and komi.
    pub fn score(&self) -> f32 {
        let (black, white) = self.board.area_score();
        black as f32 - white as f32 - self.komi
    }

    /// Hand the move to the other player without playing a stone.
    ///
    /// Unlike a pass this clears the pass streak and the last move, so it
    /// never brings the game closer to its end. Controllers use it when
    /// moves arrive out of turn.
    pub fn skip_turn(&self) -> Self {
        let mut next = self.advance(self.board.clone(), GoMove::Pass);
        next.consecutive_passes = 0;
        next.last_move = None;
        next
    }

    /// The board after the player to move places at `pt`, if that is allowed.
    fn placement(&self, pt: Point) -> Option<Board> {
        if self.board.is_eye(pt, self.next) {
            return None;
        }
        let next = self.board.place(pt, self.next)?;
        if self.previous_board.as_ref() == Some(&next) {
            return None;
        }
        Some(next)
    }

    fn advance(&self, board: Board, mv: GoMove) -> Self {
        let passes = if mv == GoMove::Pass {
            self.consecutive_passes + 1
        } else {
            0
        };
        Self {
            previous_board: Some(self.board.clone()),
            board,
            next: self.next.other(),
            last_move: Some(mv),
            consecutive_passes: passes,
            moves_played: self.moves_played + 1,
            komi: self.komi,
            resigned: None,
        }
    }
}

impl GameState for GoState {
    type Move = GoMove;

    fn legal_moves(&self) -> Vec<GoMove> {
        if self.is_over() {
            return Vec::new();
        }
        let mut moves: Vec<GoMove> = self
            .board
            .points()
            .filter(|&pt| self.placement(pt).is_some())
            .map(GoMove::Play)
            .collect();
        moves.push(GoMove::Pass);
        moves
    }

    fn apply_move(&self, mv: &GoMove) -> Result<Self> {
        if self.is_over() {
            return Err(MctsError::IllegalMove(format!("{mv} after the game ended")));
        }
        match *mv {
            GoMove::Play(pt) => {
                let board = self
                    .placement(pt)
                    .ok_or_else(|| MctsError::IllegalMove(format!("{} {pt}", self.next)))?;
                Ok(self.advance(board, *mv))
            }
            GoMove::Pass => Ok(self.advance(self.board.clone(), *mv)),
            GoMove::Resign => {
                let mut next = self.advance(self.board.clone(), *mv);
                next.resigned = Some(self.next);
                Ok(next)
            }
        }
    }

    fn is_over(&self) -> bool {
        self.resigned.is_some()
            || self.consecutive_passes >= 2
            || self.moves_played >= max_game_len(self.board.size())
    }

    fn next_player(&self) -> Player {
        self.next
    }

    fn winner(&self) -> Option<Player> {
        if let Some(loser) = self.resigned {
            return Some(loser.other());
        }
        let score = self.score();
        if score > 0.0 {
            Some(Player::Black)
        } else if score < 0.0 {
            Some(Player::White)
        } else {
            None
        }
    }
}

/// Random Go playouts that pass only when no placement is left.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoPlayout;

impl PlayoutPolicy<GoState> for GoPlayout {
    fn select_move(&mut self, state: &GoState, rng: &mut Rng) -> Result<GoMove> {
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return Err(MctsError::NoLegalMoves);
        }
        moves.retain(|mv| matches!(mv, GoMove::Play(_)));
        if moves.is_empty() {
            return Ok(GoMove::Pass);
        }
        let idx = rng.usize(..moves.len());
        Ok(moves.swap_remove(idx))
    }
}

impl fmt::Display for GoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
