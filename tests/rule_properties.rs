//! Property tests for the rule engine's public surface

use proptest::prelude::*;

use spaceman::persistence::MemoryStore;
use spaceman::sim::{
    ContactCategory, EntityId, GamePhase, GameRuleEngine, RuleListener, WeaponHeat,
};
use spaceman::{Settings, Tuning};

#[derive(Debug, Default)]
struct Log {
    score_events: Vec<u64>,
    lives_events: Vec<(i32, i32)>,
    lost: Vec<bool>,
    difficulty: u32,
    removed: Vec<EntityId>,
    refuse: bool,
}

impl RuleListener for Log {
    fn on_score_changed(&mut self, score: u64, _text: &str) {
        self.score_events.push(score);
    }
    fn on_lives_changed(&mut self, old: i32, new: i32) {
        self.lives_events.push((old, new));
    }
    fn on_player_lost(&mut self, destroyed: bool) {
        self.lost.push(destroyed);
    }
    fn on_explode_requested(&mut self, _entity: EntityId) -> bool {
        !self.refuse
    }
    fn on_remove_requested(&mut self, entity: EntityId) {
        self.removed.push(entity);
    }
    fn on_difficulty_increased(&mut self) {
        self.difficulty += 1;
    }
}

fn started(tuning: Tuning, settings: Settings, stored: u64) -> GameRuleEngine<Log, MemoryStore> {
    let store = MemoryStore::with_value(stored);
    let mut engine = GameRuleEngine::new(tuning, &settings, Log::default(), store);
    engine.game_did_start();
    engine
}

proptest! {
    #[test]
    fn score_is_kill_score_times_kills(kills in 0usize..2000) {
        let mut e = started(Tuning::default(), Settings::default(), 0);
        for _ in 0..kills {
            e.enemy_killed();
        }
        prop_assert_eq!(e.score(), 579 * kills as u64);
        prop_assert_eq!(e.listener().score_events.len(), kills);
    }

    #[test]
    fn interval_never_below_floor(kill_score in 100u64..5000, kills in 0usize..300) {
        let tuning = Tuning { kill_score, ..Tuning::default() };
        let mut e = started(tuning, Settings::default(), 0);
        for _ in 0..kills {
            e.enemy_killed();
            prop_assert!(e.session().spawn_enemy_interval >= 0.5);
        }
    }

    #[test]
    fn thresholds_are_exclusive(kill_score in 1u64..4000, kills in 1usize..200) {
        let tuning = Tuning { kill_score, ..Tuning::default() };
        let mut e = started(tuning, Settings::default(), 0);
        let mut expected_difficulty = 0;
        let mut expected_speed = 1.0;
        for _ in 0..kills {
            e.enemy_killed();
            let score = e.score();
            if score % 3000 == 0 {
                expected_speed += 0.1;
            } else if score % 1000 == 0 {
                expected_difficulty += 1;
            }
        }
        prop_assert_eq!(e.listener().difficulty, expected_difficulty);
        prop_assert!((e.session().enemy_speed_multiplier - expected_speed).abs() < 1e-9);
    }

    #[test]
    fn high_score_only_when_strictly_beaten(stored in 0u64..20_000, kills in 0usize..30) {
        let mut e = started(Tuning::default(), Settings::default(), stored);
        for _ in 0..kills {
            e.enemy_killed();
        }
        e.enemy_touches_player();
        let score = 579 * kills as u64;
        prop_assert_eq!(e.high_score(), score.max(stored));
        prop_assert_eq!(e.high_score_store().writes(), u32::from(score > stored));
    }

    #[test]
    fn contacts_are_symmetric(a in 0u32..4, b in 0u32..4, refuse: bool) {
        let cats = [
            ContactCategory::Player,
            ContactCategory::Bullet,
            ContactCategory::Enemy,
            ContactCategory::Bonus,
        ];
        let (ca, cb) = (cats[a as usize], cats[b as usize]);

        let mut left = started(Tuning::default(), Settings::default(), 0);
        let mut right = started(Tuning::default(), Settings::default(), 0);
        left.listener_mut().refuse = refuse;
        right.listener_mut().refuse = refuse;

        left.report_contact(ca, cb, Some(EntityId(1)), Some(EntityId(2)));
        right.report_contact(cb, ca, Some(EntityId(2)), Some(EntityId(1)));

        prop_assert_eq!(left.score(), right.score());
        prop_assert_eq!(left.lives(), right.lives());
        prop_assert_eq!(left.phase(), right.phase());
        prop_assert_eq!(&left.listener().removed, &right.listener().removed);
        prop_assert_eq!(&left.listener().lost, &right.listener().lost);
    }

    #[test]
    fn heat_stays_in_bounds(shots in proptest::collection::vec(0.0f64..3.0, 0..100)) {
        let mut w = WeaponHeat::default();
        let mut now = 0.0;
        for gap in shots {
            now += gap;
            w.advance_to(now, |_| {});
            if w.can_shoot() {
                w.did_shot();
            }
            prop_assert!(w.heat() <= w.heat_limit());
        }
    }

    #[test]
    fn cooldown_decrements_on_schedule(k in 0u32..25) {
        let mut w = WeaponHeat::default();
        for _ in 0..w.heat_limit() {
            w.did_shot();
        }
        prop_assert!(!w.can_shoot());

        w.advance_to(1.0 + 0.5 * k as f64, |_| {});
        let expected = 20u32.saturating_sub(k + 1);
        prop_assert_eq!(w.heat(), expected);
    }

    #[test]
    fn cool_off_always_unblocks(shots in 0u32..40, wait in 0.0f64..5.0) {
        let mut w = WeaponHeat::default();
        for _ in 0..shots {
            w.did_shot();
        }
        w.advance_to(wait, |_| {});
        w.cool_off();
        prop_assert!(w.can_shoot());
        prop_assert_eq!(w.heat(), 0);
        prop_assert!(!w.is_cooling());
    }
}

#[test]
fn test_three_escapes_from_fresh_session() {
    let mut e = started(Tuning::default(), Settings::default(), 0);
    for _ in 0..3 {
        e.enemy_escaped();
    }
    assert_eq!(e.listener().lives_events, vec![(3, 2), (2, 1), (1, 0)]);
    assert_eq!(e.listener().lost, vec![false]);
    assert_eq!(e.phase(), GamePhase::GameOver);
}

#[test]
fn test_off_screen_kill_removes_bullet_only() {
    let mut e = started(Tuning::default(), Settings::default(), 0);
    e.listener_mut().refuse = true;
    e.report_contact(
        ContactCategory::Bullet,
        ContactCategory::Enemy,
        Some(EntityId(7)),
        Some(EntityId(1)),
    );
    assert_eq!(e.score(), 0);
    assert_eq!(e.listener().removed, vec![EntityId(7)]);
}

#[test]
fn test_same_seed_same_session() {
    let settings = Settings {
        seed: Some(1234),
        ..Settings::default()
    };
    let run = || {
        let mut e = started(Tuning::default(), settings.clone(), 0);
        e.tick(600.0);
        (
            e.timer_deadline(spaceman::sim::SpawnTimer::Bonus),
            e.timer_deadline(spaceman::sim::SpawnTimer::Enemy),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn test_tuning_round_trips_through_json() {
    let tuning = Tuning {
        kill_score: 250,
        heat_limit: 12,
        ..Tuning::default()
    };
    let parsed = Tuning::from_json(&tuning.to_json()).unwrap();
    assert_eq!(parsed, tuning);
}
