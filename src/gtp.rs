//! Go Text Protocol (GTP) front-end.
//!
//! GTP is the text protocol Go GUIs (Sabaki, GoGui, Lizzie) use to talk to
//! engines. This module drives [`MctsAgent`] over [`GoState`].
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - any size from 2 to 19, clears the board
//! - `clear_board`
//! - `komi <value>`
//! - `play <color> <vertex>`
//! - `genmove <color>`
//! - `showboard`

use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::config::SearchConfig;
use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI, RESIGN_MIN_ROLLOUTS, RESIGN_THRES};
use crate::error::Result;
use crate::game::{GameState, Player};
use crate::games::go::{GoMove, GoPlayout, GoState};
use crate::mcts::MctsAgent;
use crate::node::NodeId;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    state: GoState,
    agent: MctsAgent<GoPlayout>,
    komi: f32,
}

impl GtpEngine {
    /// Create an engine on the default board.
    ///
    /// # Errors
    /// Returns [`crate::MctsError::InvalidConfig`] if `config` does not
    /// validate.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_board(config, DEFAULT_BOARD_SIZE, DEFAULT_KOMI)
    }

    /// Create an engine on a board of `size` with the given komi.
    ///
    /// # Errors
    /// Returns [`crate::MctsError::InvalidConfig`] for a bad configuration
    /// or board size.
    pub fn with_board(config: SearchConfig, size: usize, komi: f32) -> Result<Self> {
        Ok(Self {
            state: GoState::new_game(size)?.with_komi(komi),
            agent: MctsAgent::with_policy(config, GoPlayout)?,
            komi,
        })
    }

    pub fn state(&self) -> &GoState {
        &self.state
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn parse_color(s: &str) -> Option<Player> {
        match s.to_lowercase().as_str() {
            "b" | "black" => Some(Player::Black),
            "w" | "white" => Some(Player::White),
            _ => None,
        }
    }

    /// Make `color` the player to move, skipping the other side if needed.
    fn align_turn(&mut self, color: Player) {
        if self.state.next_player() != color && !self.state.is_over() {
            self.state = self.state.skip_turn();
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                match GoState::new_game(size) {
                    Ok(state) => {
                        self.state = state.with_komi(self.komi);
                        (true, String::new())
                    }
                    Err(_) => (false, "unacceptable size".to_string()),
                }
            }

            "clear_board" => match GoState::new_game(self.state.board().size()) {
                Ok(state) => {
                    self.state = state.with_komi(self.komi);
                    (true, String::new())
                }
                Err(e) => (false, e.to_string()),
            },

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f32>() {
                    Ok(komi) => {
                        self.komi = komi;
                        self.state = self.state.clone().with_komi(komi);
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(color) = Self::parse_color(color) else {
                    return (false, "invalid color".to_string());
                };
                let mv = match GoMove::parse(vertex, self.state.board().size()) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                match self.play(color, mv) {
                    Ok(()) => (true, String::new()),
                    Err(_) => (false, "illegal move".to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|c| Self::parse_color(c)) else {
                    return (false, "invalid color".to_string());
                };
                match self.genmove(color) {
                    Ok(mv) => (true, mv.to_string().to_uppercase()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.state)),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn play(&mut self, color: Player, mv: GoMove) -> Result<()> {
        self.align_turn(color);
        self.state = self.state.apply_move(&mv)?;
        Ok(())
    }

    /// Search for `color`'s move and play it.
    fn genmove(&mut self, color: Player) -> Result<GoMove> {
        self.align_turn(color);
        if self.state.is_over() {
            return Ok(GoMove::Pass);
        }

        // If the opponent passed and we are ahead, end the game.
        let opponent_passed = self.state.last_move() == Some(GoMove::Pass);
        let ahead = match color {
            Player::Black => self.state.score() > 0.0,
            Player::White => self.state.score() < 0.0,
        };
        if opponent_passed && ahead {
            self.state = self.state.apply_move(&GoMove::Pass)?;
            return Ok(GoMove::Pass);
        }

        let tree = self.agent.search(&self.state)?;
        let mv = match tree.best_child(NodeId::ROOT, color) {
            None => GoMove::Pass,
            Some(id) => {
                let child = tree.get(id);
                let pct = child.win_fraction(color);
                if tree.root().rollout_count() >= RESIGN_MIN_ROLLOUTS && pct < RESIGN_THRES {
                    warn!("{color} resigns, best win fraction {pct:.3}");
                    GoMove::Resign
                } else {
                    child.incoming_move().copied().unwrap_or(GoMove::Pass)
                }
            }
        };

        info!("{color} {mv}");
        self.state = self.state.apply_move(&mv)?;
        Ok(mv)
    }
}
