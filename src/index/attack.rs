//! Attack index - the deck's outer augmented AVL tree.
//!
//! Keyed by current attack; every node owns one current-health
//! [`HealthIndex`] holding all cards at that attack value, so the priority
//! searches can prune independently on both axes:
//!
//! - `max_attack` / `min_attack`: subtree attack bounds (one child suffices
//!   per bound, by BST ordering).
//! - `max_health`: the best health anywhere below, folding in the owned
//!   inner tree and both children.
//!
//! The five searches walk the tree in a fixed order, skip any subtree whose
//! bounds cannot qualify, and physically remove the chosen card before
//! returning it.

use std::mem;

use serde::{Deserialize, Serialize};

use super::health::{HealthIndex, HealthKey};
use super::NodeId;
use crate::core::Card;

/// One attack-keyed node and its owned health tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct AttackNode {
    attack: i64,
    /// Max attack over this subtree (`max(attack, right.max_attack)`).
    max_attack: i64,
    /// Min attack over this subtree (`min(attack, left.min_attack)`).
    min_attack: i64,
    /// Max current health over this subtree, inner tree included.
    max_health: i64,
    height: i32,
    left: NodeId,
    right: NodeId,
    /// Every card with exactly this attack, keyed by current health.
    health: HealthIndex,
}

/// The deck: an augmented AVL tree of attack-keyed nodes, each owning a
/// current-health inner index.
///
/// `len` counts cards across all inner trees. Searches return `None` when
/// no card qualifies; that is a normal outcome, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackIndex {
    nodes: Vec<AttackNode>,
    /// Arena slots freed by node removal, reused by the next insert.
    free: Vec<NodeId>,
    root: NodeId,
    len: usize,
}

impl Default for AttackIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackIndex {
    /// Create an empty deck index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId::NONE,
            len: 0,
        }
    }

    /// Number of indexed cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the deck holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a card under its current attack, creating the attack node if
    /// needed and filing the card into that node's health tree.
    pub fn insert(&mut self, card: Card) {
        let root = self.root;
        self.root = self.insert_at(root, card);
        self.len += 1;
    }

    /// Remove and return the earliest-inserted card with exactly this
    /// attack and current health. Empties cascade: a drained health tree
    /// removes its attack node (successor promotion transplants the whole
    /// owned index).
    pub fn remove(&mut self, attack: i64, health: i64) -> Option<Card> {
        let root = self.root;
        let mut removed = None;
        self.root = self.remove_at(root, attack, health, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// All cards in ascending attack order, ascending health within an
    /// attack, draw order within a bucket.
    #[must_use]
    pub fn cards_in_order(&self) -> Vec<&Card> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    // === Priority searches ===
    //
    // Each search returns the (attack, current health) location of the
    // winning card, then the public wrapper removes and returns it.

    /// Priority 1, "survive and kill": health > `att` and attack >= `hp`.
    /// Ascending attack, then least surviving health, then draw order.
    pub fn first_priority(&mut self, att: i64, hp: i64) -> Option<Card> {
        let (attack, health) = self.survive_search(self.root, att, hp, false)?;
        self.remove(attack, health)
    }

    /// Priority 2, "survive, don't kill": health > `att` and attack < `hp`.
    /// Descending attack, then least surviving health, then draw order.
    pub fn second_priority(&mut self, att: i64, hp: i64) -> Option<Card> {
        let (attack, health) = self.second_search(self.root, att, hp)?;
        self.remove(attack, health)
    }

    /// Priority 3, "kill, don't survive": attack >= `hp`, health ignored.
    /// Ascending attack, then the node's weakest card.
    pub fn third_priority(&mut self, _att: i64, hp: i64) -> Option<Card> {
        let (attack, health) = self.third_search(self.root, hp)?;
        self.remove(attack, health)
    }

    /// Priority 4, "neither": the weakest card at the maximum attack.
    ///
    /// Ignores both arguments - the guaranteed fallback whenever the deck
    /// holds any card at all.
    pub fn fourth_priority(&mut self, _att: i64, _hp: i64) -> Option<Card> {
        let (attack, health) = self.max_attack_card()?;
        self.remove(attack, health)
    }

    /// Steal: health > `health_limit` and attack > `attack_limit`, both
    /// strict. Same traversal and selection as priority 1.
    pub fn steal_card(&mut self, attack_limit: i64, health_limit: i64) -> Option<Card> {
        let (attack, health) = self.survive_search(self.root, health_limit, attack_limit, true)?;
        self.remove(attack, health)
    }

    /// Shared walk for priority 1 and steal: ascending attack, accepting a
    /// node whose inner tree can survive `att` and whose attack clears `hp`
    /// (strictly, when stealing).
    fn survive_search(&self, id: NodeId, att: i64, hp: i64, strict: bool) -> Option<(i64, i64)> {
        if id.is_none() {
            return None;
        }
        let node = self.node(id);
        if node.max_health <= att || node.max_attack < hp || (strict && node.max_attack == hp) {
            return None;
        }

        if let Some(found) = self.survive_search(node.left, att, hp, strict) {
            return Some(found);
        }

        let attack_ok = if strict { node.attack > hp } else { node.attack >= hp };
        if attack_ok && node.health.max_key() > att {
            if let Some(card) = node.health.min_surviving(att) {
                return Some((node.attack, card.current_health));
            }
        }

        self.survive_search(node.right, att, hp, strict)
    }

    /// Priority 2 walk: descending attack, accepting attacks below `hp`.
    fn second_search(&self, id: NodeId, att: i64, hp: i64) -> Option<(i64, i64)> {
        if id.is_none() {
            return None;
        }
        let node = self.node(id);
        if node.max_health <= att || node.min_attack >= hp {
            return None;
        }

        if let Some(found) = self.second_search(node.right, att, hp) {
            return Some(found);
        }

        if node.attack < hp && node.health.max_key() > att {
            if let Some(card) = node.health.min_surviving(att) {
                return Some((node.attack, card.current_health));
            }
        }

        self.second_search(node.left, att, hp)
    }

    /// Priority 3 walk: ascending attack, health unconstrained, sacrifice
    /// the node's weakest card.
    fn third_search(&self, id: NodeId, hp: i64) -> Option<(i64, i64)> {
        if id.is_none() || self.node(id).max_attack < hp {
            return None;
        }
        let node = self.node(id);

        if let Some(found) = self.third_search(node.left, hp) {
            return Some(found);
        }

        if node.attack >= hp {
            if let Some(card) = node.health.min_card() {
                return Some((node.attack, card.current_health));
            }
        }

        self.third_search(node.right, hp)
    }

    /// The weakest card at the rightmost (max-attack) node.
    fn max_attack_card(&self) -> Option<(i64, i64)> {
        if self.root.is_none() {
            return None;
        }
        let mut current = self.root;
        loop {
            let right = self.node(current).right;
            if right.is_none() {
                break;
            }
            current = right;
        }
        let node = self.node(current);
        node.health
            .min_card()
            .map(|card| (node.attack, card.current_health))
    }

    // === Arena plumbing ===

    fn node(&self, id: NodeId) -> &AttackNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut AttackNode {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, card: Card) -> NodeId {
        let attack = card.current_attack;
        let max_health = card.current_health;
        let mut health = HealthIndex::new(HealthKey::Current);
        health.insert(card);
        let node = AttackNode {
            attack,
            max_attack: attack,
            min_attack: attack,
            max_health,
            height: 0,
            left: NodeId::NONE,
            right: NodeId::NONE,
            health,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        debug_assert!(self.node(id).health.is_empty());
        self.free.push(id);
    }

    fn height_of(&self, id: NodeId) -> i32 {
        if id.is_none() {
            -1
        } else {
            self.node(id).height
        }
    }

    fn balance_of(&self, id: NodeId) -> i32 {
        if id.is_none() {
            0
        } else {
            self.height_of(self.node(id).left) - self.height_of(self.node(id).right)
        }
    }

    /// Recompute height and all three bounds. `max_health` must fold in
    /// the owned inner tree as well as both children.
    fn refresh(&mut self, id: NodeId) {
        let (left, right, attack) = {
            let node = self.node(id);
            (node.left, node.right, node.attack)
        };
        let height = self.height_of(left).max(self.height_of(right)) + 1;

        let inner = &self.node(id).health;
        let mut max_health = if inner.is_empty() { i64::MIN } else { inner.max_key() };
        if left.is_some() {
            max_health = max_health.max(self.node(left).max_health);
        }
        if right.is_some() {
            max_health = max_health.max(self.node(right).max_health);
        }

        let max_attack = if right.is_some() {
            attack.max(self.node(right).max_attack)
        } else {
            attack
        };
        let min_attack = if left.is_some() {
            attack.min(self.node(left).min_attack)
        } else {
            attack
        };

        let node = self.node_mut(id);
        node.height = height;
        node.max_health = max_health;
        node.max_attack = max_attack;
        node.min_attack = min_attack;
    }

    // === AVL mechanics ===

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let x = self.node(y).left;
        if x.is_none() {
            return y;
        }
        let pivot = self.node(x).right;
        self.node_mut(x).right = y;
        self.node_mut(y).left = pivot;
        self.refresh(y);
        self.refresh(x);
        x
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.node(x).right;
        if y.is_none() {
            return x;
        }
        let pivot = self.node(y).left;
        self.node_mut(y).left = x;
        self.node_mut(x).right = pivot;
        self.refresh(x);
        self.refresh(y);
        y
    }

    /// Refresh this node's stats, then restore the AVL condition with a
    /// single or double rotation. Returns the new subtree root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.refresh(id);
        let balance = self.balance_of(id);

        if balance > 1 {
            let left = self.node(id).left;
            if self.balance_of(left) < 0 {
                let new_left = self.rotate_left(left);
                self.node_mut(id).left = new_left;
            }
            return self.rotate_right(id);
        }

        if balance < -1 {
            let right = self.node(id).right;
            if self.balance_of(right) > 0 {
                let new_right = self.rotate_right(right);
                self.node_mut(id).right = new_right;
            }
            return self.rotate_left(id);
        }

        id
    }

    fn insert_at(&mut self, id: NodeId, card: Card) -> NodeId {
        if id.is_none() {
            return self.alloc(card);
        }

        let node_attack = self.node(id).attack;
        if card.current_attack < node_attack {
            let left = self.node(id).left;
            let new_left = self.insert_at(left, card);
            self.node_mut(id).left = new_left;
        } else if card.current_attack > node_attack {
            let right = self.node(id).right;
            let new_right = self.insert_at(right, card);
            self.node_mut(id).right = new_right;
        } else {
            self.node_mut(id).health.insert(card);
            // The inner tree changed, so this node's max_health may have.
            self.refresh(id);
            return id;
        }

        self.rebalance(id)
    }

    fn remove_at(
        &mut self,
        id: NodeId,
        attack: i64,
        health: i64,
        removed: &mut Option<Card>,
    ) -> NodeId {
        if id.is_none() {
            return NodeId::NONE;
        }

        let node_attack = self.node(id).attack;
        if attack < node_attack {
            let left = self.node(id).left;
            let new_left = self.remove_at(left, attack, health, removed);
            self.node_mut(id).left = new_left;
        } else if attack > node_attack {
            let right = self.node(id).right;
            let new_right = self.remove_at(right, attack, health, removed);
            self.node_mut(id).right = new_right;
        } else {
            *removed = self.node_mut(id).health.remove(health);

            if self.node(id).health.is_empty() {
                let (left, right) = {
                    let node = self.node(id);
                    (node.left, node.right)
                };
                if left.is_none() {
                    self.release(id);
                    return right;
                }
                if right.is_none() {
                    self.release(id);
                    return left;
                }
                // Two children: promote the in-order successor's key and
                // transplant its entire owned health index, then delete
                // the successor node.
                let successor = self.min_node(right);
                let succ_attack = self.node(successor).attack;
                let succ_health = mem::replace(
                    &mut self.node_mut(successor).health,
                    HealthIndex::new(HealthKey::Current),
                );
                {
                    let node = self.node_mut(id);
                    node.attack = succ_attack;
                    node.health = succ_health;
                }
                let new_right = self.remove_node(right, succ_attack);
                self.node_mut(id).right = new_right;
            }
        }

        self.rebalance(id)
    }

    /// Structurally delete the node with `attack`. Only reached for
    /// successor nodes whose health index was already transplanted.
    fn remove_node(&mut self, id: NodeId, attack: i64) -> NodeId {
        if id.is_none() {
            return NodeId::NONE;
        }

        let node_attack = self.node(id).attack;
        if attack < node_attack {
            let left = self.node(id).left;
            let new_left = self.remove_node(left, attack);
            self.node_mut(id).left = new_left;
        } else if attack > node_attack {
            let right = self.node(id).right;
            let new_right = self.remove_node(right, attack);
            self.node_mut(id).right = new_right;
        } else {
            let (left, right) = {
                let node = self.node(id);
                (node.left, node.right)
            };
            if left.is_none() {
                self.release(id);
                return right;
            }
            if right.is_none() {
                self.release(id);
                return left;
            }
            let successor = self.min_node(right);
            let succ_attack = self.node(successor).attack;
            let succ_health = mem::replace(
                &mut self.node_mut(successor).health,
                HealthIndex::new(HealthKey::Current),
            );
            {
                let node = self.node_mut(id);
                node.attack = succ_attack;
                node.health = succ_health;
            }
            let new_right = self.remove_node(right, succ_attack);
            self.node_mut(id).right = new_right;
        }

        self.rebalance(id)
    }

    /// Leftmost node of the subtree rooted at `id` (must not be NONE).
    fn min_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let left = self.node(current).left;
            if left.is_none() {
                return current;
            }
            current = left;
        }
    }

    fn collect_in_order<'a>(&'a self, id: NodeId, out: &mut Vec<&'a Card>) {
        if id.is_none() {
            return;
        }
        let node = self.node(id);
        self.collect_in_order(node.left, out);
        out.extend(node.health.cards_in_order());
        self.collect_in_order(node.right, out);
    }
}

#[cfg(test)]
impl AttackIndex {
    /// Walk the whole tree asserting BST order, AVL balance, exact heights
    /// and exact cached bounds (inner trees included), and that `len`
    /// matches the card count.
    pub(crate) fn check_invariants(&self) {
        let mut count = 0;
        self.check_node(self.root, i64::MIN, i64::MAX, &mut count);
        assert_eq!(count, self.len, "card count out of sync");
    }

    /// Returns `(height, min_attack, max_attack, max_health)`.
    #[allow(clippy::type_complexity)]
    fn check_node(
        &self,
        id: NodeId,
        lo: i64,
        hi: i64,
        count: &mut usize,
    ) -> Option<(i32, i64, i64, i64)> {
        if id.is_none() {
            return None;
        }
        let node = self.node(id);
        assert!(lo < node.attack && node.attack < hi, "BST order violated");
        assert!(!node.health.is_empty(), "empty inner tree left in deck");
        node.health.check_invariants();
        for card in node.health.cards_in_order() {
            assert_eq!(card.current_attack, node.attack, "card under wrong attack");
        }
        *count += node.health.len();

        let left = self.check_node(node.left, lo, node.attack, count);
        let right = self.check_node(node.right, node.attack, hi, count);
        let lh = left.map_or(-1, |(h, _, _, _)| h);
        let rh = right.map_or(-1, |(h, _, _, _)| h);
        assert_eq!(node.height, lh.max(rh) + 1, "stale height");
        assert!((lh - rh).abs() <= 1, "AVL balance violated");

        let min_attack = left.map_or(node.attack, |(_, min, _, _)| min);
        let max_attack = right.map_or(node.attack, |(_, _, max, _)| max);
        let mut max_health = node.health.max_key();
        if let Some((_, _, _, mh)) = left {
            max_health = max_health.max(mh);
        }
        if let Some((_, _, _, mh)) = right {
            max_health = max_health.max(mh);
        }
        assert_eq!(node.min_attack, min_attack, "stale min attack bound");
        assert_eq!(node.max_attack, max_attack, "stale max attack bound");
        assert_eq!(node.max_health, max_health, "stale max health bound");

        Some((node.height, min_attack, max_attack, max_health))
    }
}
