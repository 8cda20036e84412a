//! Property tests: every priority search must agree with a brute-force
//! linear scan applying the same acceptance rule and tie-breaks.

use std::cmp::Reverse;

use proptest::prelude::*;

use nightpass::{AttackIndex, Card};

/// (attack, health) stat pairs; names encode insertion order so FIFO
/// tie-breaks are observable.
fn deck_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((1i64..=8, 1i64..=10), 0..40)
}

fn build(stats: &[(i64, i64)]) -> (AttackIndex, Vec<(i64, i64, String)>) {
    let mut deck = AttackIndex::new();
    let mut model = Vec::new();
    for (i, &(attack, health)) in stats.iter().enumerate() {
        let name = format!("card{i}");
        deck.insert(Card::new(&name, attack, health));
        model.push((attack, health, name));
    }
    (deck, model)
}

proptest! {
    #[test]
    fn first_priority_matches_scan(stats in deck_strategy(), att in 0i64..=11, hp in 0i64..=9) {
        let (mut deck, model) = build(&stats);
        let expected = model
            .iter()
            .filter(|(a, h, _)| *h > att && *a >= hp)
            .min_by_key(|(a, h, _)| (*a, *h))
            .map(|(_, _, n)| n.clone());

        let got = deck.first_priority(att, hp);
        prop_assert_eq!(got.map(|c| c.name), expected);
    }

    #[test]
    fn second_priority_matches_scan(stats in deck_strategy(), att in 0i64..=11, hp in 0i64..=9) {
        let (mut deck, model) = build(&stats);
        let expected = model
            .iter()
            .filter(|(a, h, _)| *h > att && *a < hp)
            .min_by_key(|(a, h, _)| (Reverse(*a), *h))
            .map(|(_, _, n)| n.clone());

        let got = deck.second_priority(att, hp);
        prop_assert_eq!(got.map(|c| c.name), expected);
    }

    #[test]
    fn third_priority_matches_scan(stats in deck_strategy(), hp in 0i64..=9) {
        let (mut deck, model) = build(&stats);
        let expected = model
            .iter()
            .filter(|(a, _, _)| *a >= hp)
            .min_by_key(|(a, h, _)| (*a, *h))
            .map(|(_, _, n)| n.clone());

        let got = deck.third_priority(0, hp);
        prop_assert_eq!(got.map(|c| c.name), expected);
    }

    #[test]
    fn fourth_priority_matches_scan(stats in deck_strategy()) {
        let (mut deck, model) = build(&stats);
        let expected = model
            .iter()
            .min_by_key(|(a, h, _)| (Reverse(*a), *h))
            .map(|(_, _, n)| n.clone());

        let got = deck.fourth_priority(0, 0);
        prop_assert_eq!(got.map(|c| c.name), expected);
    }

    #[test]
    fn steal_matches_scan(stats in deck_strategy(), att_limit in 0i64..=9, hp_limit in 0i64..=11) {
        let (mut deck, model) = build(&stats);
        let expected = model
            .iter()
            .filter(|(a, h, _)| *h > hp_limit && *a > att_limit)
            .min_by_key(|(a, h, _)| (*a, *h))
            .map(|(_, _, n)| n.clone());

        let got = deck.steal_card(att_limit, hp_limit);
        prop_assert_eq!(got.map(|c| c.name), expected);
    }

    /// The index enumerates cards sorted by attack, then health, with
    /// insertion order preserved inside each (attack, health) bucket.
    #[test]
    fn iteration_order_is_sorted_and_fifo(stats in deck_strategy()) {
        let (deck, model) = build(&stats);

        let mut expected: Vec<(i64, i64, String)> = model;
        expected.sort_by_key(|(a, h, _)| (*a, *h)); // stable: keeps draw order

        let got: Vec<(i64, i64, String)> = deck
            .cards_in_order()
            .iter()
            .map(|c| (c.current_attack, c.current_health, c.name.clone()))
            .collect();
        prop_assert_eq!(got, expected);
    }

    /// Repeatedly searching removes cards one at a time until nothing
    /// qualifies; the count always matches the scan.
    #[test]
    fn searches_drain_exactly_the_qualifiers(stats in deck_strategy(), att in 0i64..=11, hp in 0i64..=9) {
        let (mut deck, model) = build(&stats);
        let qualifying = model.iter().filter(|(a, h, _)| *h > att && *a >= hp).count();

        let mut drained = 0;
        while deck.first_priority(att, hp).is_some() {
            drained += 1;
            prop_assert!(drained <= qualifying);
        }
        prop_assert_eq!(drained, qualifying);
        prop_assert_eq!(deck.len(), model.len() - qualifying);
    }
}
