//! Contact resolution policy
//!
//! The host's physics reports that two bodies touched. This module decides
//! what that contact means; the engine then applies the effects. Detection
//! itself is the host's job.

use serde::{Deserialize, Serialize};

/// Host-side handle of a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Physics category of a body. Discriminants are the category bits; their
/// order is the canonical order of a contact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ContactCategory {
    None = 0,
    Player = 1,
    Bullet = 2,
    Enemy = 4,
    Bonus = 8,
}

impl ContactCategory {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Map a host bitmask back to a category (unknown masks are `None`)
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            1 => ContactCategory::Player,
            2 => ContactCategory::Bullet,
            4 => ContactCategory::Enemy,
            8 => ContactCategory::Bonus,
            _ => ContactCategory::None,
        }
    }
}

/// One side of a reported contact. `entity` is `None` when the host already
/// removed the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub category: ContactCategory,
    pub entity: Option<EntityId>,
}

impl Body {
    pub fn new(category: ContactCategory, entity: Option<EntityId>) -> Self {
        Self { category, entity }
    }
}

/// What a contact means for the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    /// Enemy rammed the player
    PlayerHitsEnemy { enemy: Option<EntityId> },
    /// Bullet reached an enemy
    BulletHitsEnemy {
        bullet: Option<EntityId>,
        enemy: Option<EntityId>,
    },
    /// Bullet reached the bonus
    BulletHitsBonus {
        bullet: Option<EntityId>,
        bonus: Option<EntityId>,
    },
}

/// Order a pair so the lower category comes first
pub fn canonicalize(a: Body, b: Body) -> (Body, Body) {
    if a.category <= b.category {
        (a, b)
    } else {
        (b, a)
    }
}

/// Classify a contact. Pairs without a rule yield `None`.
pub fn classify(a: Body, b: Body) -> Option<ContactRule> {
    use self::ContactCategory as C;

    let (first, second) = canonicalize(a, b);
    match (first.category, second.category) {
        (C::Player, C::Enemy) => Some(ContactRule::PlayerHitsEnemy {
            enemy: second.entity,
        }),
        (C::Bullet, C::Enemy) => Some(ContactRule::BulletHitsEnemy {
            bullet: first.entity,
            enemy: second.entity,
        }),
        (C::Bullet, C::Bonus) => Some(ContactRule::BulletHitsBonus {
            bullet: first.entity,
            bonus: second.entity,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ContactCategory as C;

    fn body(category: ContactCategory, id: u32) -> Body {
        Body::new(category, Some(EntityId(id)))
    }

    #[test]
    fn test_classify_is_order_independent() {
        let bullet = body(C::Bullet, 1);
        let enemy = body(C::Enemy, 2);
        let expected = Some(ContactRule::BulletHitsEnemy {
            bullet: Some(EntityId(1)),
            enemy: Some(EntityId(2)),
        });
        assert_eq!(classify(bullet, enemy), expected);
        assert_eq!(classify(enemy, bullet), expected);
    }

    #[test]
    fn test_player_enemy() {
        assert_eq!(
            classify(body(C::Enemy, 7), body(C::Player, 1)),
            Some(ContactRule::PlayerHitsEnemy {
                enemy: Some(EntityId(7))
            })
        );
    }

    #[test]
    fn test_bullet_bonus_keeps_missing_side() {
        let rule = classify(Body::new(C::Bonus, None), body(C::Bullet, 3));
        assert_eq!(
            rule,
            Some(ContactRule::BulletHitsBonus {
                bullet: Some(EntityId(3)),
                bonus: None,
            })
        );
    }

    #[test]
    fn test_unknown_pairs_are_ignored() {
        assert_eq!(classify(body(C::Player, 1), body(C::Bonus, 2)), None);
        assert_eq!(classify(body(C::Enemy, 1), body(C::Enemy, 2)), None);
        assert_eq!(classify(body(C::Player, 1), body(C::Bullet, 2)), None);
        assert_eq!(classify(body(C::None, 1), body(C::Enemy, 2)), None);
    }

    #[test]
    fn test_category_bits_round_trip() {
        for c in [C::Player, C::Bullet, C::Enemy, C::Bonus] {
            assert_eq!(ContactCategory::from_bits(c.bits()), c);
        }
        assert_eq!(ContactCategory::from_bits(3), C::None);
    }
}
