mod helpers;

use helpers::{cards, config, table, table_with_stacks, StackedDeck, BOARD, HOLES};
use sixmax_engine::config::TableConfig;
use sixmax_engine::engine::{Engine, Stage};
use sixmax_engine::errors::GameError;
use sixmax_engine::hand::Category;
use sixmax_engine::player::{PlayerAction, SEATS};

fn fold_seats<S: sixmax_engine::deck::CardSource>(eng: &mut Engine<S>, seats: &[usize]) {
    for &seat in seats {
        eng.act(seat, PlayerAction::Fold).unwrap();
    }
}

fn call_seats<S: sixmax_engine::deck::CardSource>(eng: &mut Engine<S>, seats: &[usize]) {
    for &seat in seats {
        eng.act(seat, PlayerAction::Call).unwrap();
    }
}

#[test]
fn everyone_folds_to_the_big_blind() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    fold_seats(&mut eng, &[3, 4, 5, 0, 1]);

    assert_eq!(eng.stage(), Stage::Showdown);
    assert!(eng.board().is_empty());
    assert_eq!(eng.pot(), 0);
    assert_eq!(eng.players()[2].stack(), 201);
    assert_eq!(eng.players()[1].stack(), 199);

    let report = eng.showdown_report().unwrap();
    assert!(!report.contested);
    assert_eq!(report.winners(), vec![2]);
    assert_eq!(report.winnings(2), 3);
    assert_eq!(report.entry(2).unwrap().category, None);
}

#[test]
fn fold_win_can_run_out_the_board() {
    let cfg = TableConfig {
        run_out_board_on_fold: true,
        ..config()
    };
    let mut eng = Engine::with_source(cfg, StackedDeck::arranged(HOLES, BOARD, 0)).unwrap();
    eng.start_hand().unwrap();
    fold_seats(&mut eng, &[3, 4, 5, 0, 1]);
    assert_eq!(eng.board(), cards(BOARD).as_slice());
    assert!(!eng.showdown_report().unwrap().contested);
}

#[test]
fn big_blind_keeps_its_option_after_limps() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    call_seats(&mut eng, &[3, 4, 5, 0, 1]);

    assert_eq!(eng.current_player(), Some(2));
    let before = eng.state();
    assert_eq!(before.to_call, Some(0));
    assert_eq!(
        eng.submit_action(PlayerAction::Fold).unwrap_err(),
        GameError::BigBlindOptionFold
    );
    assert_eq!(eng.state(), before);

    let state = eng.submit_action(PlayerAction::Raise(6)).unwrap();
    assert_eq!(state.stage, Stage::Preflop);
    assert_eq!(state.current_bet, 6);
    assert_eq!(state.to_act, Some(3));
    assert_eq!(state.to_call, Some(4));
}

#[test]
fn checked_option_deals_the_flop_left_of_the_button() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    call_seats(&mut eng, &[3, 4, 5, 0, 1, 2]);

    let state = eng.state();
    assert_eq!(state.stage, Stage::Flop);
    assert_eq!(state.board, cards("Ks Qs 2s"));
    assert_eq!(state.pot, 12);
    assert_eq!(state.current_bet, 0);
    assert_eq!(state.to_act, Some(1));
    assert!(state.players.iter().all(|p| p.current_bet == 0));
}

#[test]
fn out_of_turn_action_changes_nothing() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    let before = eng.state();

    assert_eq!(
        eng.act(4, PlayerAction::Call).unwrap_err(),
        GameError::NotPlayersTurn {
            expected: 3,
            actual: 4
        }
    );
    assert_eq!(
        eng.act(3, PlayerAction::Raise(3)).unwrap_err(),
        GameError::InvalidBetAmount {
            amount: 3,
            minimum: 4
        }
    );
    assert_eq!(eng.state(), before);

    eng.act(3, PlayerAction::Fold).unwrap();
    assert_eq!(
        eng.act(3, PlayerAction::Call).unwrap_err(),
        GameError::PlayerAlreadyFolded { seat: 3 }
    );
}

#[test]
fn checked_down_hand_goes_to_best_hand() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    call_seats(&mut eng, &[3, 4, 5, 0, 1, 2]);
    for _street in 0..3 {
        call_seats(&mut eng, &[1, 2, 3, 4, 5, 0]);
    }

    assert_eq!(eng.stage(), Stage::Showdown);
    let report = eng.showdown_report().unwrap();
    assert!(report.contested);
    assert_eq!(report.board.len(), 5);
    assert_eq!(report.entries.len(), SEATS);
    assert_eq!(report.winners(), vec![1]);
    let winner = report.entry(1).unwrap();
    assert_eq!(winner.category, Some(Category::TwoPair));
    assert_eq!(winner.label, "Two Pair");
    assert_eq!(winner.best_hand.len(), 5);
    assert_eq!(eng.players()[1].stack(), 210);
    assert_eq!(eng.total_chips(), 1200);
}

#[test]
fn all_in_and_call_runs_out_the_board() {
    let mut eng = table_with_stacks(HOLES, BOARD, [200, 200, 200, 50, 200, 200]);
    eng.start_hand().unwrap();
    let state = eng.act(3, PlayerAction::Raise(500)).unwrap();
    assert!(state.players[3].all_in);
    assert_eq!(state.current_bet, 50);

    fold_seats(&mut eng, &[4]);
    call_seats(&mut eng, &[5]);
    fold_seats(&mut eng, &[0, 1, 2]);

    assert_eq!(eng.stage(), Stage::Showdown);
    assert_eq!(eng.board().len(), 5);
    let report = eng.showdown_report().unwrap();
    assert_eq!(report.winners(), vec![5]);
    assert_eq!(eng.players()[5].stack(), 200 - 50 + 103);
    assert_eq!(eng.players()[3].stack(), 0);

    // the busted seat sits out the next hand
    eng.start_hand().unwrap();
    assert_eq!(eng.hole_cards(3), None);
    assert_eq!(eng.button(), 1);
}

#[test]
fn short_stack_wins_main_pot_and_side_pot_goes_to_next_best() {
    let holes = ["5h 6h", "3c 8d", "Ts Th", "Ac Ad", "Qc Qd", "Kc Kd"];
    let board = "2s 7h 9d Jc 4s";
    let mut eng = table_with_stacks(holes, board, [200, 200, 200, 20, 200, 200]);
    eng.start_hand().unwrap();

    eng.act(3, PlayerAction::Raise(20)).unwrap();
    eng.act(4, PlayerAction::Call).unwrap();
    eng.act(5, PlayerAction::Raise(60)).unwrap();
    fold_seats(&mut eng, &[0, 1, 2]);
    eng.act(4, PlayerAction::Call).unwrap();

    let state = eng.state();
    assert_eq!(state.stage, Stage::Flop);
    assert_eq!(state.pot, 143);
    assert_eq!(state.side_pots.last().unwrap().eligible, vec![4, 5]);
    assert_eq!(state.to_act, Some(4));

    for _street in 0..3 {
        call_seats(&mut eng, &[4, 5]);
    }
    let report = eng.showdown_report().unwrap();
    assert_eq!(report.winnings(3), 63);
    assert_eq!(report.winnings(5), 80);
    assert_eq!(report.winnings(4), 0);
    assert_eq!(eng.players()[3].stack(), 63);
    assert_eq!(eng.players()[5].stack(), 220);
    assert_eq!(eng.players()[4].stack(), 140);
    assert_eq!(eng.total_chips(), 1020);
}

#[test]
fn split_pot_gives_odd_chip_to_last_winner() {
    let holes = ["6c 7d", "8c 9d", "2c 3d", "4c 5d", "2h 3h", "4h 5h"];
    let mut eng = table(holes, "Ts Js Qs Kd Ah");
    eng.start_hand().unwrap();
    eng.act(3, PlayerAction::Call).unwrap();
    fold_seats(&mut eng, &[4, 5, 0, 1]);
    eng.act(2, PlayerAction::Call).unwrap();
    for _street in 0..3 {
        call_seats(&mut eng, &[2, 3]);
    }

    let report = eng.showdown_report().unwrap();
    assert_eq!(report.winners(), vec![2, 3]);
    assert_eq!(report.winnings(2), 2);
    assert_eq!(report.winnings(3), 3);
    assert_eq!(eng.players()[2].stack(), 200);
    assert_eq!(eng.players()[3].stack(), 201);
}

#[test]
fn heads_up_button_acts_first_preflop_and_last_after() {
    let holes = ["", "Ac Ad", "", "", "Kc Kd", ""];
    let mut eng = table_with_stacks(holes, BOARD, [0, 100, 0, 0, 100, 0]);
    let state = eng.start_hand().unwrap();
    assert_eq!(state.button, 1);
    assert_eq!(state.players[1].current_bet, 1);
    assert_eq!(state.players[4].current_bet, 2);
    assert_eq!(state.to_act, Some(1));

    eng.act(1, PlayerAction::Call).unwrap();
    eng.act(4, PlayerAction::Call).unwrap();
    assert_eq!(eng.stage(), Stage::Flop);
    assert_eq!(eng.current_player(), Some(4));
}

#[test]
fn force_fold_folds_or_checks() {
    let mut eng = table(HOLES, BOARD);
    eng.start_hand().unwrap();
    eng.force_fold().unwrap();
    assert!(!eng.players()[3].in_hand());

    call_seats(&mut eng, &[4, 5, 0, 1]);
    assert_eq!(eng.current_player(), Some(2));
    let state = eng.force_fold().unwrap();
    assert!(state.players[2].in_hand);
    assert_eq!(state.stage, Stage::Flop);
}

#[test]
fn lifecycle_errors() {
    let mut eng = table(HOLES, BOARD);
    assert_eq!(
        eng.submit_action(PlayerAction::Call).unwrap_err(),
        GameError::NoHandInProgress
    );
    assert_eq!(eng.showdown_report().unwrap_err(), GameError::NoShowdown);

    eng.start_hand().unwrap();
    assert_eq!(eng.start_hand().unwrap_err(), GameError::HandInProgress);
    assert_eq!(eng.showdown_report().unwrap_err(), GameError::NoShowdown);

    fold_seats(&mut eng, &[3, 4, 5, 0, 1]);
    assert_eq!(
        eng.submit_action(PlayerAction::Call).unwrap_err(),
        GameError::HandAlreadyComplete
    );
    assert!(eng.start_hand().is_ok());
}

#[test]
fn exhausted_deck_aborts_and_refunds() {
    let deck = StackedDeck::new(cards("2c 3c 4c 5c 6c 7c 8c 9c"));
    let mut eng = Engine::with_source(config(), deck).unwrap();
    let err = eng.start_hand().unwrap_err();
    assert_eq!(err, GameError::DeckExhausted);
    assert!(!err.is_recoverable());
    assert_eq!(eng.stage(), Stage::Idle);
    assert_eq!(eng.pot(), 0);
    assert!(eng.players().iter().all(|p| p.stack() == 200));
}

#[test]
fn chips_are_conserved_over_many_seeded_hands() {
    let cfg = TableConfig {
        seed: Some(2024),
        ..TableConfig::default()
    };
    let mut eng = Engine::new(cfg).unwrap();
    let total = eng.total_chips();
    let mut step = 0u32;

    for _hand in 0..200 {
        if eng.start_hand().is_err() {
            break;
        }
        while eng.stage() != Stage::Showdown {
            step += 1;
            let action = match (step % 9, eng.raise_bounds()) {
                (0 | 4, _) => PlayerAction::Fold,
                (1, Some((min, _))) => PlayerAction::Raise(min),
                (7, Some((_, max))) if step % 4 == 3 => PlayerAction::Raise(max),
                _ => PlayerAction::Call,
            };
            if eng.submit_action(action).is_err() {
                eng.submit_action(PlayerAction::Call).unwrap();
            }
            assert_eq!(eng.total_chips(), total);
        }
        let report = eng.showdown_report().unwrap();
        let paid: u32 = report.entries.iter().map(|e| e.total_won()).sum();
        let pots: u32 = report.pots.iter().map(|p| p.amount).sum();
        assert_eq!(paid, pots);
        assert_eq!(eng.pot(), 0);
    }
}
