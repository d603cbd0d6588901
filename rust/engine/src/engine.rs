use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::betting::BettingRound;
use crate::cards::Card;
use crate::config::{ConfigError, TableConfig};
use crate::deck::{CardSource, Deck};
use crate::errors::GameError;
use crate::game::GameState;
use crate::hand::{best_hand, BestHand, HandScore};
use crate::logger::{ActionRecord, HandLogger, HandRecord, RecordedAction, ShowdownInfo, Street};
use crate::player::{Player, PlayerAction, SEATS};
use crate::pot::{PotAward, PotManager, SidePot};
use crate::report::{PlayerView, ShowdownEntry, ShowdownReport, TableSnapshot};

/// Where the table is in the life of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Preflop,
    Flop,
    Turn,
    River,
    /// Hand settled; the showdown report is available until the next hand
    Showdown,
}

impl Stage {
    /// The betting street for this stage, if players are still acting.
    pub fn street(self) -> Option<Street> {
        match self {
            Stage::Preflop => Some(Street::Preflop),
            Stage::Flop => Some(Street::Flop),
            Stage::Turn => Some(Street::Turn),
            Stage::River => Some(Street::River),
            Stage::Idle | Stage::Showdown => None,
        }
    }
}

impl From<Street> for Stage {
    fn from(street: Street) -> Self {
        match street {
            Street::Preflop => Stage::Preflop,
            Street::Flop => Stage::Flop,
            Street::Turn => Stage::Turn,
            Street::River => Stage::River,
        }
    }
}

/// One six-seat table playing hand after hand.
///
/// The engine never waits for input. A caller starts a hand, asks who is to
/// act, and submits that player's action; each accepted action runs the hand
/// forward as far as it can go (street changes, all-in run-outs, payouts)
/// before returning. Rejected actions change nothing.
///
/// # Examples
///
/// ```
/// use sixmax_engine::config::TableConfig;
/// use sixmax_engine::engine::{Engine, Stage};
/// use sixmax_engine::player::PlayerAction;
///
/// let config = TableConfig { seed: Some(7), ..TableConfig::default() };
/// let mut engine = Engine::new(config).expect("valid config");
/// engine.start_hand().expect("six funded players");
/// assert_eq!(engine.stage(), Stage::Preflop);
///
/// // everyone folds to the big blind
/// while engine.stage() == Stage::Preflop {
///     engine.submit_action(PlayerAction::Fold).unwrap();
/// }
/// assert_eq!(engine.stage(), Stage::Showdown);
/// assert!(!engine.showdown_report().unwrap().contested);
/// ```
#[derive(Debug)]
pub struct Engine<S: CardSource = Deck> {
    config: TableConfig,
    /// Card source, reshuffled for every hand
    source: S,
    /// Seats and the dealer button
    game: GameState,
    stage: Stage,
    /// Community cards on the board (up to 5 cards: flop, turn, river)
    board: Vec<Card>,
    /// Chips committed this hand and not yet paid out
    pot: u32,
    side_pots: Vec<SidePot>,
    round: Option<BettingRound>,
    showdown: Option<ShowdownReport>,
    logger: HandLogger,
    record: Option<HandRecord>,
    last_record: Option<HandRecord>,
    /// Stacks before the blinds, restored if the hand is aborted
    stacks_at_start: Vec<u32>,
}

impl Engine<Deck> {
    /// Builds a table from `config` with a seeded deck, opening the hand log
    /// when one is configured.
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let deck = Deck::new(config.seed);
        let logger = match &config.hand_log {
            Some(path) => HandLogger::create(path)?,
            None => HandLogger::disabled(),
        };
        Ok(Self::with_source(config, deck)?.with_logger(logger))
    }
}

impl<S: CardSource> Engine<S> {
    pub fn with_source(config: TableConfig, source: S) -> Result<Self, ConfigError> {
        let stacks = [config.starting_stack; SEATS];
        Self::with_stacks(config, source, stacks)
    }

    /// Seats players with individual stacks; a zero stack sits out.
    pub fn with_stacks(
        config: TableConfig,
        source: S,
        stacks: [u32; SEATS],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            game: GameState::new(stacks),
            stage: Stage::Idle,
            board: Vec::with_capacity(5),
            pot: 0,
            side_pots: Vec::new(),
            round: None,
            showdown: None,
            logger: HandLogger::disabled(),
            record: None,
            last_record: None,
            stacks_at_start: stacks.to_vec(),
        })
    }

    pub fn with_logger(mut self, logger: HandLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn side_pots(&self) -> &[SidePot] {
        &self.side_pots
    }
    pub fn players(&self) -> &[Player] {
        self.game.players()
    }
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.game.player(seat)
    }
    pub fn button(&self) -> usize {
        self.game.button_index()
    }
    pub fn hand_id(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.hand_id.as_str())
    }

    pub fn hole_cards(&self, seat: usize) -> Option<[Card; 2]> {
        match self.game.player(seat)?.hole_cards() {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    /// Every stack plus the undistributed pot.
    pub fn total_chips(&self) -> u64 {
        self.game.total_stacks() + u64::from(self.pot)
    }

    /// Record of the most recently finished hand.
    pub fn last_record(&self) -> Option<&HandRecord> {
        self.last_record.as_ref()
    }

    /// Seat whose decision the hand is waiting on.
    pub fn current_player(&self) -> Option<usize> {
        self.round.as_ref()?.current_actor(self.game.players())
    }

    /// Legal "raise to" range for the player to act.
    pub fn raise_bounds(&self) -> Option<(u32, u32)> {
        self.round.as_ref()?.raise_bounds(self.game.players())
    }

    pub fn to_call(&self) -> Option<u32> {
        let round = self.round.as_ref()?;
        let seat = round.current_actor(self.game.players())?;
        Some(round.context(self.game.players(), seat).to_call())
    }

    pub fn state(&self) -> TableSnapshot {
        TableSnapshot {
            hand_id: self.hand_id().map(str::to_string),
            stage: self.stage,
            button: self.button(),
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            board: self.board.clone(),
            pot: self.pot,
            side_pots: self.side_pots.clone(),
            current_bet: self.round.as_ref().map_or(0, BettingRound::table_bet),
            to_act: self.current_player(),
            to_call: self.to_call(),
            raise_bounds: self.raise_bounds(),
            players: self.players().iter().map(PlayerView::from).collect(),
        }
    }

    pub fn showdown_report(&self) -> Result<&ShowdownReport, GameError> {
        match (self.stage, &self.showdown) {
            (Stage::Showdown, Some(report)) => Ok(report),
            _ => Err(GameError::NoShowdown),
        }
    }

    /// Resets the table for a new hand: moves the button, shuffles, deals two
    /// cards to every funded seat and posts the blinds.
    pub fn start_hand(&mut self) -> Result<TableSnapshot, GameError> {
        if self.stage.street().is_some() {
            return Err(GameError::HandInProgress);
        }
        let funded = self.game.funded_seats().len();
        if funded < 2 {
            error!(funded, "not enough funded players to start a hand");
            return Err(GameError::NotEnoughPlayers { funded });
        }

        self.board.clear();
        self.pot = 0;
        self.side_pots.clear();
        self.round = None;
        self.showdown = None;
        self.stacks_at_start = self.players().iter().map(Player::stack).collect();
        for p in self.game.players_mut() {
            p.reset_for_new_hand();
        }
        self.game.rotate_button();
        self.game.assign_positions();

        let hand_id = self.logger.next_id();
        self.record = Some(HandRecord {
            hand_id: hand_id.clone(),
            seed: self.source.seed(),
            button: self.button(),
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            actions: Vec::new(),
            board: Vec::new(),
            result: None,
            ts: None,
            meta: None,
            showdown: None,
        });
        info!(hand_id = %hand_id, button = self.button(), players = funded, "hand started");

        if let Err(e) = self.deal_and_post_blinds().and_then(|()| self.settle()) {
            return Err(self.abort_hand(e));
        }
        Ok(self.state())
    }

    /// Applies `action` for the player whose turn it is.
    pub fn submit_action(&mut self, action: PlayerAction) -> Result<TableSnapshot, GameError> {
        let seat = self.require_actor()?;
        self.act(seat, action)
    }

    /// Applies `action` on behalf of `seat`, rejecting it unless it is that
    /// seat's turn.
    pub fn act(&mut self, seat: usize, action: PlayerAction) -> Result<TableSnapshot, GameError> {
        let street = self.require_street()?;
        let round = self.round.as_mut().ok_or(GameError::NoHandInProgress)?;
        let applied = match round.apply(self.game.players_mut(), seat, action) {
            Ok(applied) => applied,
            Err(e) => {
                warn!(seat, action = %action, error = %e, "action rejected");
                return Err(e);
            }
        };
        self.pot += applied.chips;
        self.push_action(seat, street, applied.action.into());
        self.refresh_side_pots();

        if let Err(e) = self.settle() {
            return Err(self.abort_hand(e));
        }
        Ok(self.state())
    }

    /// Timeout hook for the player to act: folds, or checks when nothing is
    /// owed (which also covers the big blind's unraised option).
    pub fn force_fold(&mut self) -> Result<TableSnapshot, GameError> {
        let seat = self.require_actor()?;
        let action = match self.to_call() {
            Some(0) => PlayerAction::Call,
            _ => PlayerAction::Fold,
        };
        info!(seat, action = %action, "forced action");
        self.act(seat, action)
    }

    fn require_street(&self) -> Result<Street, GameError> {
        match self.stage {
            Stage::Showdown => Err(GameError::HandAlreadyComplete),
            stage => stage.street().ok_or(GameError::NoHandInProgress),
        }
    }

    fn require_actor(&self) -> Result<usize, GameError> {
        self.require_street()?;
        self.current_player().ok_or(GameError::NoHandInProgress)
    }

    fn deal_and_post_blinds(&mut self) -> Result<(), GameError> {
        self.source.shuffle();
        let dealt: Vec<usize> = GameState::seats_from(self.button() + 1)
            .into_iter()
            .filter(|&s| self.game.players()[s].in_hand())
            .collect();
        for _ in 0..2 {
            for &seat in &dealt {
                let card = self.source.deal_card().ok_or(GameError::DeckExhausted)?;
                self.game.players_mut()[seat].give_card(card)?;
            }
        }

        let (sb, bb) = self.game.blind_seats().ok_or(GameError::NotEnoughPlayers {
            funded: dealt.len(),
        })?;
        self.post_blind(sb, self.config.small_blind, RecordedAction::SmallBlind)?;
        self.post_blind(bb, self.config.big_blind, RecordedAction::BigBlind)?;

        self.stage = Stage::Preflop;
        self.round = Some(BettingRound::preflop(bb, self.config.big_blind));
        self.refresh_side_pots();
        Ok(())
    }

    /// A short stack posts what it has.
    fn post_blind(
        &mut self,
        seat: usize,
        blind: u32,
        kind: fn(u32) -> RecordedAction,
    ) -> Result<(), GameError> {
        let player = &mut self.game.players_mut()[seat];
        let paid = blind.min(player.stack());
        player.commit(paid)?;
        self.pot += paid;
        self.push_action(seat, Street::Preflop, kind(paid));
        debug!(seat, paid, "blind posted");
        Ok(())
    }

    /// Runs the hand forward until it needs a decision or is settled.
    fn settle(&mut self) -> Result<(), GameError> {
        loop {
            let live = self.game.live_seats();
            if let &[winner] = live.as_slice() {
                return self.award_uncontested(winner);
            }
            let Some(round) = self.round.as_ref() else {
                return Ok(());
            };
            if !round.is_complete(self.game.players()) {
                return Ok(());
            }

            let street = round.street();
            self.close_round();
            debug!(street = ?street, pot = self.pot, "street complete");

            if self.game.actionable_seats().len() <= 1 {
                self.run_out_board()?;
                return self.showdown();
            }
            let Some(next) = street.next() else {
                return self.showdown();
            };
            self.deal_board(next.cards_dealt())?;
            self.stage = Stage::from(next);
            self.round = Some(BettingRound::postflop(
                next,
                self.button(),
                self.config.big_blind,
            ));
            debug!(street = ?next, board = ?self.board, "street started");
        }
    }

    fn close_round(&mut self) {
        if let Some(round) = self.round.take() {
            round.close(self.game.players_mut());
        }
        self.refresh_side_pots();
    }

    fn deal_board(&mut self, n: usize) -> Result<(), GameError> {
        for _ in 0..n {
            let card = self.source.deal_card().ok_or(GameError::DeckExhausted)?;
            self.board.push(card);
        }
        Ok(())
    }

    fn run_out_board(&mut self) -> Result<(), GameError> {
        self.deal_board(5 - self.board.len())
    }

    fn refresh_side_pots(&mut self) {
        self.side_pots = PotManager::from_players(self.game.players())
            .pots()
            .to_vec();
    }

    fn award_uncontested(&mut self, winner: usize) -> Result<(), GameError> {
        self.close_round();
        if self.config.run_out_board_on_fold {
            self.run_out_board()?;
        }
        let amount = self.pot;
        self.game.players_mut()[winner].add_chips(amount);
        self.pot = 0;
        self.side_pots.clear();
        self.stage = Stage::Showdown;

        let player = &self.game.players()[winner];
        let entry = ShowdownEntry {
            seat: winner,
            name: player.name().to_string(),
            hole_cards: player.hole_cards().iter().flatten().copied().collect(),
            best_hand: Vec::new(),
            category: None,
            label: "No showdown".to_string(),
            won_per_pot: vec![amount],
        };
        let award = PotAward {
            amount,
            winners: vec![winner],
            shares: vec![(winner, amount)],
        };
        info!(hand_id = ?self.hand_id(), seat = winner, amount, "pot awarded uncontested");
        self.finish_hand(false, vec![award], vec![entry], 0)
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        self.stage = Stage::Showdown;
        let mut bests: BTreeMap<usize, BestHand> = BTreeMap::new();
        for p in self.game.players().iter().filter(|p| p.in_hand()) {
            let mut cards: Vec<Card> = p.hole_cards().iter().flatten().copied().collect();
            cards.extend_from_slice(&self.board);
            bests.insert(p.seat(), best_hand(&cards)?);
        }
        let scores: BTreeMap<usize, HandScore> =
            bests.iter().map(|(&s, b)| (s, b.score)).collect();
        let awards = PotManager::from_players(self.game.players()).distribute(&scores);

        let mut voided = 0u64;
        for award in &awards {
            let remaining = self.pot.checked_sub(award.amount);
            self.pot = remaining.ok_or(GameError::ChipsNotConserved {
                expected: u64::from(award.amount),
                actual: u64::from(self.pot),
            })?;
            if award.is_void() {
                warn!(amount = award.amount, "void pot removed without payout");
                voided += u64::from(award.amount);
                continue;
            }
            for &(seat, chips) in &award.shares {
                self.game.players_mut()[seat].add_chips(chips);
            }
            debug!(amount = award.amount, winners = ?award.winners, "pot paid");
        }
        self.side_pots.clear();

        let entries: Vec<ShowdownEntry> = bests
            .iter()
            .map(|(&seat, best)| {
                let player = &self.game.players()[seat];
                ShowdownEntry {
                    seat,
                    name: player.name().to_string(),
                    hole_cards: player.hole_cards().iter().flatten().copied().collect(),
                    best_hand: best.cards.to_vec(),
                    category: Some(best.score.category),
                    label: best.score.label().to_string(),
                    won_per_pot: awards
                        .iter()
                        .map(|a| {
                            a.shares
                                .iter()
                                .find(|&&(s, _)| s == seat)
                                .map_or(0, |&(_, chips)| chips)
                        })
                        .collect(),
                }
            })
            .collect();
        self.finish_hand(true, awards, entries, voided)
    }

    fn finish_hand(
        &mut self,
        contested: bool,
        pots: Vec<PotAward>,
        entries: Vec<ShowdownEntry>,
        voided: u64,
    ) -> Result<(), GameError> {
        let expected: u64 = self.stacks_at_start.iter().map(|&s| u64::from(s)).sum();
        let actual = self.total_chips() + voided;
        if self.pot != 0 || expected != actual {
            return Err(GameError::ChipsNotConserved { expected, actual });
        }

        let report = ShowdownReport {
            hand_id: self.hand_id().unwrap_or_default().to_string(),
            board: self.board.clone(),
            contested,
            pots,
            entries,
        };
        if let Some(mut record) = self.record.take() {
            let payouts: Vec<(usize, u32)> = report
                .entries
                .iter()
                .filter(|e| e.total_won() > 0)
                .map(|e| (e.seat, e.total_won()))
                .collect();
            record.board = self.board.clone();
            record.result = Some(
                payouts
                    .iter()
                    .map(|&(seat, chips)| format!("{} wins {}", self.players()[seat].name(), chips))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            let notes = if contested {
                report.winning_labels().join(", ")
            } else {
                "uncontested".to_string()
            };
            record.showdown = Some(ShowdownInfo {
                winners: report.winners(),
                payouts,
                notes: Some(notes),
            });
            record.meta = Some(serde_json::json!({ "pots": report.pots.len() }));
            if let Err(e) = self.logger.write(&record) {
                warn!(hand_id = %record.hand_id, error = %e, "failed to write hand record");
            }
            // keep the id visible through `hand_id()` until the next hand
            self.last_record = Some(record.clone());
            self.record = Some(record);
        }
        info!(
            hand_id = %report.hand_id,
            contested,
            winners = ?report.winners(),
            "hand finished"
        );
        self.showdown = Some(report);
        Ok(())
    }

    /// Restores every stack to its pre-hand value and returns the table to
    /// idle. Used when the hand's bookkeeping can no longer be trusted.
    fn abort_hand(&mut self, err: GameError) -> GameError {
        error!(hand_id = ?self.hand_id(), error = %err, "aborting hand");
        let stacks = self.stacks_at_start.clone();
        for (p, stack) in self.game.players_mut().iter_mut().zip(stacks) {
            p.restore_stack(stack);
            p.reset_for_new_hand();
        }
        self.board.clear();
        self.pot = 0;
        self.side_pots.clear();
        self.round = None;
        self.showdown = None;
        self.record = None;
        self.stage = Stage::Idle;
        err
    }

    fn push_action(&mut self, seat: usize, street: Street, action: RecordedAction) {
        if let Some(record) = self.record.as_mut() {
            record.actions.push(ActionRecord {
                seat,
                street,
                action,
            });
        }
    }
}
