//! Contact categories and filtering
//!
//! Bodies only report contacts, they never push each other: collision
//! masks are always zero.

use serde::{Deserialize, Serialize};

use crate::host::EntityId;

/// Category bitmasks
pub mod category {
    pub const PLAYER: u32 = 1 << 0;
    pub const OBSTACLE: u32 = 1 << 1;
}

/// Contact configuration attached to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// What this body is
    pub category: u32,
    /// Categories whose overlap should be reported
    pub contact_mask: u32,
    /// Categories this body bounces off (unused, always 0)
    pub collision_mask: u32,
}

impl PhysicsBody {
    pub fn player() -> Self {
        Self {
            category: category::PLAYER,
            contact_mask: category::OBSTACLE,
            collision_mask: 0,
        }
    }

    pub fn obstacle() -> Self {
        Self {
            category: category::OBSTACLE,
            contact_mask: category::PLAYER,
            collision_mask: 0,
        }
    }

    /// Whether an overlap between these bodies should raise a contact
    pub fn tests_contact_with(&self, other: &PhysicsBody) -> bool {
        self.contact_mask & other.category != 0 || other.contact_mask & self.category != 0
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBody {
    pub entity: EntityId,
    pub category: u32,
}

/// Two bodies started overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl Contact {
    /// Combined category set of both bodies
    #[inline]
    pub fn mask(&self) -> u32 {
        self.a.category | self.b.category
    }

    /// True iff the pair is exactly {player, obstacle}
    pub fn is_player_obstacle(&self) -> bool {
        self.a.category != self.b.category
            && self.mask() == category::PLAYER | category::OBSTACLE
    }

    /// The body in `category`, if either side has it
    pub fn body_in(&self, category: u32) -> Option<ContactBody> {
        if self.a.category == category {
            Some(self.a)
        } else if self.b.category == category {
            Some(self.b)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u32, category: u32) -> ContactBody {
        ContactBody {
            entity: EntityId(id),
            category,
        }
    }

    #[test]
    fn test_player_obstacle_pair_either_order() {
        let c = Contact {
            a: body(1, category::PLAYER),
            b: body(2, category::OBSTACLE),
        };
        assert!(c.is_player_obstacle());
        let swapped = Contact { a: c.b, b: c.a };
        assert!(swapped.is_player_obstacle());
        assert_eq!(swapped.body_in(category::OBSTACLE).map(|b| b.entity), Some(EntityId(2)));
    }

    #[test]
    fn test_other_pairs_ignored() {
        let two_obstacles = Contact {
            a: body(1, category::OBSTACLE),
            b: body(2, category::OBSTACLE),
        };
        assert!(!two_obstacles.is_player_obstacle());

        let future_kind = Contact {
            a: body(1, category::PLAYER),
            b: body(2, 1 << 5),
        };
        assert!(!future_kind.is_player_obstacle());
    }

    #[test]
    fn test_contact_masks() {
        let player = PhysicsBody::player();
        let obstacle = PhysicsBody::obstacle();
        assert!(player.tests_contact_with(&obstacle));
        assert!(obstacle.tests_contact_with(&player));
        assert!(!obstacle.tests_contact_with(&obstacle));
        assert_eq!(player.collision_mask, 0);
        assert_eq!(obstacle.collision_mask, 0);
    }
}
