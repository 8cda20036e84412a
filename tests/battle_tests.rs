//! Game-level integration tests.
//!
//! These drive the full draw/battle/heal/steal flow through the public
//! surface and check the conservation and scenario properties the indices
//! must uphold.

use nightpass::{CardFate, Command, Game, Winner};

// =============================================================================
// Battle Scenarios
// =============================================================================

/// First priority picks the min-attack card that survives and kills.
#[test]
fn test_scenario_first_priority() {
    let mut game = Game::new();
    game.draw_card("A", 3, 5);
    game.draw_card("B", 3, 2);
    game.draw_card("C", 6, 10);

    let outcome = game.battle(4, 3, 0);

    // A (hp 5 > 4, att 3 >= 3) beats C on attack order.
    assert_eq!(outcome.priority, 1);
    assert_eq!(
        outcome.played,
        Some(("A".to_string(), CardFate::ReturnedToDeck))
    );
    // A survived with 1 hp and went back to the deck.
    assert_eq!(game.deck_count(), 3);
    assert_eq!(game.discard_pile_count(), 0);
}

/// An empty deck reports priority 0 and changes nothing but the score.
#[test]
fn test_scenario_empty_deck() {
    let mut game = Game::new();

    let outcome = game.battle(4, 3, 0);

    assert_eq!(outcome.priority, 0);
    assert!(outcome.played.is_none());
    assert_eq!(outcome.revived, 0);
    assert_eq!(game.deck_count(), 0);
    assert_eq!(game.discard_pile_count(), 0);
}

/// Steal requires both limits strictly exceeded.
#[test]
fn test_scenario_steal() {
    let mut game = Game::new();
    game.draw_card("A", 3, 5);
    game.draw_card("C", 6, 10);

    // Only C has attack > 3; among qualifiers pick min health > 4.
    let stolen = game.steal_card(3, 4).unwrap();
    assert_eq!(stolen.name, "C");
    assert_eq!(game.deck_count(), 1);
}

/// Heal fully revives the largest affordable card and partially heals the
/// cheapest one with the remainder.
#[test]
fn test_scenario_heal_phase() {
    let mut game = Game::new();
    game.draw_card("D", 2, 2);
    game.draw_card("E", 2, 7);
    // Kill both (nothing survives 9 damage, both kill power 1).
    game.battle(9, 1, 0);
    game.battle(9, 1, 0);
    assert_eq!(game.discard_pile_count(), 2);

    // heal = 5: D (missing 2) is fully healed, heal drops to 3, which is
    // insufficient for E (missing 7); E is partially healed and stays.
    let outcome = game.battle(9, 1, 5);
    assert_eq!(outcome.revived, 1);
    assert_eq!(game.deck_count(), 1);
    assert_eq!(game.discard_pile_count(), 1);
}

/// Priorities cascade 1 -> 2 -> 3 -> 4 as the deck thins out.
#[test]
fn test_priority_cascade() {
    let mut game = Game::new();
    // Survives and kills.
    game.draw_card("p1", 5, 9);
    // Survives only (attack too low to kill power 5).
    game.draw_card("p2", 1, 9);
    // Kills only (dies to 6 damage).
    game.draw_card("p3", 5, 3);
    // Neither.
    game.draw_card("p4", 1, 3);

    let priorities: Vec<u8> = (0..4).map(|_| game.battle(6, 5, 0).priority).collect();
    assert_eq!(priorities, [1, 2, 3, 4]);
}

// =============================================================================
// Conservation and Scoring
// =============================================================================

/// deck + discard is invariant across battles; draws add one, steals
/// remove one.
#[test]
fn test_ownership_conservation() {
    let mut game = Game::new();
    for i in 0..15_i64 {
        game.draw_card(format!("c{i}"), 1 + i % 6, 1 + i % 9);
        assert_eq!(game.deck_count() + game.discard_pile_count(), (i + 1) as usize);
    }

    for round in 0..30_i64 {
        game.battle(1 + round % 9, 1 + round % 7, round % 5);
        assert_eq!(game.deck_count() + game.discard_pile_count(), 15);
    }

    if game.steal_card(0, 0).is_some() {
        assert_eq!(game.deck_count() + game.discard_pile_count(), 14);
    }
}

/// The survivor wins ties, and scores follow the priority table.
#[test]
fn test_find_winning() {
    let mut game = Game::new();
    assert_eq!(game.find_winning(), (Winner::Survivor, 0));

    // Priority 0 battle: stranger +2.
    game.battle(1, 1, 0);
    assert_eq!(game.find_winning(), (Winner::Stranger, 2));

    // Priority 1 battle: survivor +2, stranger +1.
    game.draw_card("hero", 9, 9);
    game.battle(1, 1, 0);
    assert_eq!(game.find_winning(), (Winner::Stranger, 3));

    // Another kill brings the survivor level; ties go to the survivor.
    game.battle(1, 1, 0);
    assert_eq!(game.find_winning(), (Winner::Survivor, 4));
}

// =============================================================================
// Command Stream
// =============================================================================

/// A full command stream produces the expected output lines.
#[test]
fn test_command_stream_end_to_end() {
    let input = "\
draw_card Scout 3 5
draw_card Brute 6 10
deck_count
battle 4 3 0
steal_card 3 4
steal_card 3 4
discard_pile_count
find_winning
";

    let mut game = Game::new();
    let output: Vec<String> = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| game.execute(line.parse::<Command>().unwrap()))
        .collect();

    assert_eq!(
        output,
        [
            "Added Scout to the deck",
            "Added Brute to the deck",
            "Number of cards in the deck: 2",
            "Found with priority 1, Survivor plays Scout, the played card returned to deck, 0 cards revived",
            "The Stranger stole the card: Brute",
            "No card to steal",
            "Number of cards in the discard pile: 0",
            "The Survivor, Score: 2",
        ]
    );
}

/// A dead card's revive decays its attack and restores full health.
#[test]
fn test_revived_card_fights_again() {
    let mut game = Game::new();
    game.draw_card("phoenix", 10, 4);

    // Dies (4 damage kills it, its attack 10 kills power 2).
    let outcome = game.battle(4, 2, 0);
    assert_eq!(outcome.priority, 3);
    assert_eq!(game.discard_pile_count(), 1);

    // Fully revived for 4 heal; base attack decayed to 9.
    let outcome = game.battle(1, 1, 4);
    assert_eq!(outcome.priority, 0);
    assert_eq!(outcome.revived, 1);
    assert_eq!(game.deck_count(), 1);

    // Back in the deck at attack 9: it survives and kills.
    let outcome = game.battle(2, 9, 0);
    assert_eq!(outcome.priority, 1);
    assert_eq!(
        outcome.played,
        Some(("phoenix".to_string(), CardFate::ReturnedToDeck))
    );
}
