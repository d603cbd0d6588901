use crate::player::{Player, Position, SEATS};

/// The six seats and the dealer button.
///
/// This is the one place that derives "who is live", "who can still act" and
/// seat orderings from the players' `in_hand` flag and stack, so every caller
/// agrees on them.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Index of the button seat
    button_index: usize,
    /// Exactly [`SEATS`] players, indexed by seat
    players: Vec<Player>,
}

impl GameState {
    pub fn new(stacks: [u32; SEATS]) -> Self {
        let players = stacks
            .iter()
            .enumerate()
            .map(|(seat, &stack)| Player::new(seat, format!("Player {}", seat + 1), stack))
            .collect();
        Self {
            // first rotation puts the button on seat 0
            button_index: SEATS - 1,
            players,
        }
    }

    pub fn button_index(&self) -> usize {
        self.button_index
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn funded_seats(&self) -> Vec<usize> {
        self.seats_where(|p| p.stack() > 0)
    }

    /// Seats still holding cards this hand.
    pub fn live_seats(&self) -> Vec<usize> {
        self.seats_where(Player::in_hand)
    }

    /// Live seats that still have chips behind.
    pub fn actionable_seats(&self) -> Vec<usize> {
        self.seats_where(Player::can_act)
    }

    fn seats_where(&self, pred: impl Fn(&Player) -> bool) -> Vec<usize> {
        self.players
            .iter()
            .filter(|p| pred(p))
            .map(Player::seat)
            .collect()
    }

    /// All seats in clockwise order beginning at `start`.
    pub fn seats_from(start: usize) -> Vec<usize> {
        (0..SEATS).map(|i| (start + i) % SEATS).collect()
    }

    /// First seat strictly after `seat` (wrapping) that satisfies `pred`.
    pub fn next_seat_after(&self, seat: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        Self::seats_from(seat + 1)
            .into_iter()
            .find(|&s| pred(&self.players[s]))
    }

    /// Moves the button to the next seat dealt into the hand.
    pub fn rotate_button(&mut self) {
        if let Some(next) = self.next_seat_after(self.button_index, Player::in_hand) {
            self.button_index = next;
        }
    }

    /// Small and big blind seats among the live players. Heads-up the button
    /// posts the small blind.
    pub fn blind_seats(&self) -> Option<(usize, usize)> {
        let live = self.live_seats();
        if live.len() < 2 {
            return None;
        }
        let sb = if live.len() == 2 {
            self.button_index
        } else {
            self.next_seat_after(self.button_index, Player::in_hand)?
        };
        let bb = self.next_seat_after(sb, Player::in_hand)?;
        Some((sb, bb))
    }

    /// Labels live seats clockwise from the button; sitting-out seats get none.
    pub fn assign_positions(&mut self) {
        const AFTER_BLINDS: [Position; 3] =
            [Position::UnderTheGun, Position::Hijack, Position::Cutoff];
        let live: Vec<usize> = Self::seats_from(self.button_index)
            .into_iter()
            .filter(|&s| self.players[s].in_hand())
            .collect();
        let labels: Vec<Position> = match live.len() {
            0 | 1 => vec![Position::Button],
            2 => vec![Position::Button, Position::BigBlind],
            n => [Position::Button, Position::SmallBlind, Position::BigBlind]
                .into_iter()
                .chain(AFTER_BLINDS.into_iter().take(n - 3))
                .collect(),
        };
        for p in self.players.iter_mut() {
            p.set_position(None);
        }
        for (seat, label) in live.into_iter().zip(labels) {
            self.players[seat].set_position(Some(label));
        }
    }

    pub fn total_stacks(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.stack())).sum()
    }
}
