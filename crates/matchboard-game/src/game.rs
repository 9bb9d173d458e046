//! The game state machine.

use matchboard_protocol::{Board, EMPTY_BOARD, GameUpdate, Outcome, Side};

use crate::{MoveError, completes_line, is_full};

/// Number of cells on the board.
pub const BOARD_CELLS: u8 = 9;

/// One game of tic-tac-toe.
///
/// Invariants:
/// - an accepted move changes exactly one cell;
/// - `turn` flips only after an accepted move that does not end the game;
/// - once `outcome` is terminal, every move is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    cells: Board,
    turn: Side,
    outcome: Outcome,
}

impl Game {
    /// A fresh game: empty board, `First` to move.
    pub fn new() -> Self {
        Self {
            cells: EMPTY_BOARD,
            turn: Side::First,
            outcome: Outcome::InProgress,
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.cells
    }

    /// The side to move. After a win this stays on the winner.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Places the mark of the side to move at `position`.
    ///
    /// A line is checked before fullness, so a ninth move that completes a
    /// line is a win rather than a draw.
    ///
    /// # Errors
    /// - [`MoveError::GameOver`]: the game already ended
    /// - [`MoveError::OutOfBounds`]: `position` is not 0–8
    /// - [`MoveError::Occupied`]: the cell already holds a mark
    pub fn make_move(&mut self, position: u8) -> Result<Outcome, MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::GameOver(self.outcome));
        }
        if position >= BOARD_CELLS {
            return Err(MoveError::OutOfBounds(position));
        }
        let cell = usize::from(position);
        if self.cells[cell].is_some() {
            return Err(MoveError::Occupied(position));
        }

        let mover = self.turn;
        self.cells[cell] = Some(mover);

        if completes_line(&self.cells, mover) {
            self.outcome = Outcome::Win(mover);
        } else if is_full(&self.cells) {
            self.outcome = Outcome::Draw;
        } else {
            self.turn = mover.opponent();
        }

        Ok(self.outcome)
    }

    /// The broadcastable view of the game.
    pub fn snapshot(&self) -> GameUpdate {
        GameUpdate {
            board: self.cells,
            turn_side: self.turn,
            outcome: self.outcome,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
