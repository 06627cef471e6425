//! k-in-a-row board games (tic-tac-toe, gomoku and friends).
//!
//! A reference [`GameState`] used by the CLI and the tests. Players alternate
//! placing stones on empty points; the first to line up `k` stones
//! horizontally, vertically or diagonally wins, and a full board is a draw.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{FIRST_PLAYER, SECOND_PLAYER};
use crate::game::{Features, GameState, Outcome, PlayerId, opponent};

/// Line directions: east, south, south-east, south-west.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A point on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

impl Point {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Column letter followed by 1-based row, e.g. `b3`.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

/// A k-in-a-row position.
#[derive(Debug, Clone)]
pub struct Gomoku {
    width: u8,
    height: u8,
    k: u8,
    cells: Vec<Option<PlayerId>>,
    to_move: PlayerId,
    outcome: Option<Outcome>,
    stones: usize,
}

impl Gomoku {
    /// Empty `width` x `height` board where `k` in a row wins.
    ///
    /// # Panics
    ///
    /// If any dimension is zero or the board exceeds 26 columns.
    pub fn new(width: u8, height: u8, k: u8) -> Self {
        assert!(width > 0 && height > 0 && k > 0, "board dimensions must be positive");
        assert!(width <= 26, "at most 26 columns are supported");
        Self {
            width,
            height,
            k,
            cells: vec![None; width as usize * height as usize],
            to_move: FIRST_PLAYER,
            outcome: None,
            stones: 0,
        }
    }

    /// Standard 3x3 tic-tac-toe.
    pub fn tic_tac_toe() -> Self {
        Self::new(3, 3, 3)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Stones in a row needed to win.
    pub fn k(&self) -> u8 {
        self.k
    }

    /// Stone at `p`, if any.
    pub fn get(&self, p: Point) -> Option<PlayerId> {
        self.at(p.row as i32, p.col as i32)
    }

    #[inline]
    fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && row < self.height as i32 && col < self.width as i32
    }

    #[inline]
    fn at(&self, row: i32, col: i32) -> Option<PlayerId> {
        if self.in_bounds(row, col) {
            self.cells[row as usize * self.width as usize + col as usize]
        } else {
            None
        }
    }

    #[inline]
    fn is_empty_at(&self, row: i32, col: i32) -> bool {
        self.in_bounds(row, col) && self.at(row, col).is_none()
    }

    /// Length of the run through `p` along `(dr, dc)` for `player`.
    fn run_through(&self, p: Point, (dr, dc): (i32, i32), player: PlayerId) -> u32 {
        let (row, col) = (p.row as i32, p.col as i32);
        let mut len = 1;
        for sign in [1, -1] {
            let (mut r, mut c) = (row + sign * dr, col + sign * dc);
            while self.at(r, c) == Some(player) {
                len += 1;
                r += sign * dr;
                c += sign * dc;
            }
        }
        len
    }

    fn player_features(&self, player: PlayerId) -> Features {
        let mut features = Features {
            max_distance: self.max_distance(player),
            ..Features::default()
        };

        for (dr, dc) in DIRECTIONS {
            for row in 0..self.height as i32 {
                for col in 0..self.width as i32 {
                    // Only count each run once, from its first stone.
                    if self.at(row, col) != Some(player)
                        || self.at(row - dr, col - dc) == Some(player)
                    {
                        continue;
                    }
                    let mut len = 0;
                    let (mut r, mut c) = (row, col);
                    while self.at(r, c) == Some(player) {
                        len += 1;
                        r += dr;
                        c += dc;
                    }
                    let open = self.is_empty_at(row - dr, col - dc) as u32
                        + self.is_empty_at(r, c) as u32;
                    match (len, open) {
                        (l, 2) if l >= 4 => features.live_four += 1,
                        (l, 1) if l >= 4 => features.four += 1,
                        (3, 2) => features.live_three += 1,
                        (3, 1) => features.three += 1,
                        (2, 2) => features.live_two += 1,
                        _ => {}
                    }
                }
            }
        }

        features
    }

    /// Fewest extra stones `player` needs to complete any still-open line,
    /// divided by `k`. 1.0 when every line is blocked.
    fn max_distance(&self, player: PlayerId) -> f64 {
        let k = self.k as i32;
        let rival = opponent(player);
        let mut best = k;

        for (dr, dc) in DIRECTIONS {
            for row in 0..self.height as i32 {
                for col in 0..self.width as i32 {
                    if !self.in_bounds(row + (k - 1) * dr, col + (k - 1) * dc) {
                        continue;
                    }
                    let mut own = 0;
                    let mut blocked = false;
                    for i in 0..k {
                        match self.at(row + i * dr, col + i * dc) {
                            Some(p) if p == rival => {
                                blocked = true;
                                break;
                            }
                            Some(_) => own += 1,
                            None => {}
                        }
                    }
                    if !blocked {
                        best = best.min(k - own);
                    }
                }
            }
        }

        best as f64 / k as f64
    }
}

impl GameState for Gomoku {
    type Action = Point;

    fn current_player(&self) -> PlayerId {
        self.to_move
    }

    fn legal_actions(&self) -> Vec<Point> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| Point::new(row, col)))
            .filter(|&p| self.get(p).is_none())
            .collect()
    }

    fn apply(&mut self, action: Point) {
        debug_assert!(self.outcome.is_none(), "move played after the game ended");
        debug_assert!(self.get(action).is_none(), "point {action} is occupied");

        let player = self.to_move;
        let idx = action.row as usize * self.width as usize + action.col as usize;
        self.cells[idx] = Some(player);
        self.stones += 1;

        if DIRECTIONS
            .iter()
            .any(|&dir| self.run_through(action, dir, player) >= self.k as u32)
        {
            self.outcome = Some(Outcome::Win(player));
        } else if self.stones == self.cells.len() {
            self.outcome = Some(Outcome::Draw);
        }
        self.to_move = opponent(player);
    }

    fn terminal_status(&self) -> Option<Outcome> {
        self.outcome
    }

    fn features_by_player(&self) -> BTreeMap<PlayerId, Features> {
        [FIRST_PLAYER, SECOND_PLAYER]
            .into_iter()
            .map(|p| (p, self.player_features(p)))
            .collect()
    }
}

impl fmt::Display for Gomoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height).rev() {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..self.width {
                let c = match self.get(Point::new(row, col)) {
                    Some(FIRST_PLAYER) => 'X',
                    Some(_) => 'O',
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..self.width {
            write!(f, "{} ", (b'a' + col) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[(u8, u8)]) -> Gomoku {
        let mut state = Gomoku::tic_tac_toe();
        for &(row, col) in moves {
            state.apply(Point::new(row, col));
        }
        state
    }

    #[test]
    fn test_new_board() {
        let state = Gomoku::tic_tac_toe();
        assert_eq!(state.current_player(), FIRST_PLAYER);
        assert_eq!(state.legal_actions().len(), 9);
        assert_eq!(state.terminal_status(), None);
    }

    #[test]
    fn test_players_alternate() {
        let state = play(&[(1, 1)]);
        assert_eq!(state.current_player(), SECOND_PLAYER);
        assert_eq!(state.get(Point::new(1, 1)), Some(FIRST_PLAYER));
        assert!(!state.legal_actions().contains(&Point::new(1, 1)));
    }

    #[test]
    fn test_row_win() {
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(state.terminal_status(), Some(Outcome::Win(FIRST_PLAYER)));
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_anti_diagonal_win() {
        let state = play(&[(0, 0), (0, 2), (0, 1), (1, 1), (2, 2), (2, 0)]);
        assert_eq!(state.terminal_status(), Some(Outcome::Win(SECOND_PLAYER)));
    }

    #[test]
    fn test_draw() {
        // X O X / X O O / O X X
        let state = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ]);
        assert_eq!(state.terminal_status(), Some(Outcome::Draw));
    }

    #[test]
    fn test_features_open_runs() {
        let mut state = Gomoku::new(7, 7, 5);
        for (row, col) in [(3, 2), (0, 0), (3, 3), (0, 6), (3, 4)] {
            state.apply(Point::new(row, col));
        }
        let features = state.features_by_player();
        let x = features[&FIRST_PLAYER];
        assert_eq!(x.live_three, 1);
        assert_eq!(x.three, 0);
        assert!((x.max_distance - 2.0 / 5.0).abs() < 1e-12);
        let o = features[&SECOND_PLAYER];
        assert_eq!(o.live_two, 0);
        assert!((o.max_distance - 4.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_blocked_player_distance() {
        // O's centre stone blocks X's diagonal; the top row and left
        // column still need two more stones each.
        let state = play(&[(0, 0), (1, 1)]);
        let features = state.features_by_player();
        assert!((features[&FIRST_PLAYER].max_distance - 2.0 / 3.0).abs() < 1e-12);
        assert!((features[&SECOND_PLAYER].max_distance - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_display() {
        assert_eq!(Point::new(0, 0).to_string(), "a1");
        assert_eq!(Point::new(2, 1).to_string(), "b3");
    }

    #[test]
    fn test_board_display() {
        let state = play(&[(0, 0), (2, 2)]);
        let text = state.to_string();
        assert!(text.contains(" 1 X . . "));
        assert!(text.contains(" 3 . . O "));
    }
}
