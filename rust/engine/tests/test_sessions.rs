use std::sync::Arc;
use std::thread;

use sixmax_engine::config::TableConfig;
use sixmax_engine::engine::Stage;
use sixmax_engine::errors::GameError;
use sixmax_engine::player::PlayerAction;
use sixmax_engine::session::{SessionError, SessionManager};

fn seeded(seed: u64) -> TableConfig {
    TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    }
}

#[test]
fn sessions_are_independent() {
    let manager = SessionManager::new();
    let a = manager.create_session(seeded(1)).unwrap();
    let b = manager.create_session(seeded(2)).unwrap();
    assert_ne!(a, b);
    assert_eq!(manager.len(), 2);

    manager.start_hand(&a).unwrap();
    manager.submit_action(&a, PlayerAction::Fold).unwrap();

    assert_eq!(manager.state(&a).unwrap().to_act, Some(4));
    assert_eq!(manager.state(&b).unwrap().stage, Stage::Idle);
    assert!(matches!(
        manager.submit_action(&b, PlayerAction::Call),
        Err(SessionError::Game(GameError::NoHandInProgress))
    ));
}

#[test]
fn showdown_report_is_available_after_the_hand() {
    let manager = SessionManager::new();
    let id = manager.create_session(seeded(3)).unwrap();
    assert!(matches!(
        manager.showdown_report(&id),
        Err(SessionError::Game(GameError::NoShowdown))
    ));

    manager.start_hand(&id).unwrap();
    for _ in 0..5 {
        manager.force_fold(&id).unwrap();
    }
    let report = manager.showdown_report(&id).unwrap();
    assert!(!report.contested);
    assert_eq!(report.winners(), vec![2]);

    manager.delete_session(&id).unwrap();
    assert!(matches!(
        manager.state(&id),
        Err(SessionError::NotFound(_))
    ));
}

#[test]
fn concurrent_tables_play_to_completion() {
    let manager = Arc::new(SessionManager::new());
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let id = manager.create_session(seeded(seed)).unwrap();
                for _ in 0..10 {
                    manager.start_hand(&id).unwrap();
                    while manager.state(&id).unwrap().stage != Stage::Showdown {
                        manager.submit_action(&id, PlayerAction::Call).unwrap();
                    }
                }
                let state = manager.state(&id).unwrap();
                let total: u32 = state.players.iter().map(|p| p.stack).sum();
                assert_eq!(total, 1200);
                id
            })
        })
        .collect();

    let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(manager.len(), 4);
    let mut active = manager.active_sessions();
    active.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(active, expected);
}
