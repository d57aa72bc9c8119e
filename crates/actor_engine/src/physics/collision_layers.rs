//! Collision layer system for filtering overlap reports
//!
//! Every collision representation carries a [`CollisionGroup`]: the layers
//! it belongs to (`category`) and the layers it wants to hear about
//! (`mask`). Whether a pair is reported is decided by a [`MaskPolicy`].

use crate::config::MaskPolicy;

bitflags::bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player-controlled ships
        const PLAYER = 1 << 0;
        /// Enemy ships
        const ENEMY = 1 << 1;
        /// Bullets fired by the player
        const PLAYER_BULLET = 1 << 2;
        /// Bullets fired by enemies
        const ENEMY_BULLET = 1 << 3;
        /// Collectible items
        const ITEM = 1 << 4;
        /// Static level geometry
        const WALL = 1 << 5;
        /// Sensor volumes
        const TRIGGER = 1 << 6;

        // Bits 7..32 are free for games to assign.
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

/// Category and mask of one collision representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CollisionGroup {
    /// Layers this representation belongs to
    pub category: CollisionLayers,
    /// Layers this representation accepts
    pub mask: CollisionLayers,
}

impl CollisionGroup {
    /// Create a group from category and mask
    pub fn new(category: CollisionLayers, mask: CollisionLayers) -> Self {
        Self { category, mask }
    }

    /// Create from raw bits; unnamed bits are kept
    pub fn from_bits(category: u32, mask: u32) -> Self {
        Self {
            category: CollisionLayers::from_bits_retain(category),
            mask: CollisionLayers::from_bits_retain(mask),
        }
    }

    /// Whether `self` accepts `other` (`self.mask & other.category != 0`)
    pub fn accepts(&self, other: &CollisionGroup) -> bool {
        self.mask.intersects(other.category)
    }

    /// Check if `checker` should hear about an overlap with `other`
    ///
    /// Under [`MaskPolicy::Mutual`] both directions must accept, which makes
    /// the result symmetric. Under [`MaskPolicy::Either`] only the checker's
    /// mask is consulted, so each side of a pair is decided on its own.
    ///
    /// # Example
    /// ```
    /// use actor_engine::config::MaskPolicy;
    /// use actor_engine::physics::{CollisionGroup, CollisionLayers};
    ///
    /// let player = CollisionGroup::new(CollisionLayers::PLAYER, CollisionLayers::ENEMY_BULLET);
    /// let bullet = CollisionGroup::new(CollisionLayers::ENEMY_BULLET, CollisionLayers::PLAYER);
    /// assert!(CollisionGroup::reports(&player, &bullet, MaskPolicy::Mutual));
    ///
    /// let turret = CollisionGroup::new(CollisionLayers::WALL, CollisionLayers::PLAYER);
    /// assert!(CollisionGroup::reports(&turret, &player, MaskPolicy::Either));
    /// assert!(!CollisionGroup::reports(&player, &turret, MaskPolicy::Either));
    /// ```
    pub fn reports(checker: &CollisionGroup, other: &CollisionGroup, policy: MaskPolicy) -> bool {
        match policy {
            MaskPolicy::Mutual => checker.accepts(other) && other.accepts(checker),
            MaskPolicy::Either => checker.accepts(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_mutual() {
        let player = CollisionGroup::new(CollisionLayers::PLAYER, CollisionLayers::ENEMY);
        let enemy = CollisionGroup::new(CollisionLayers::ENEMY, CollisionLayers::PLAYER);

        assert!(CollisionGroup::reports(&player, &enemy, MaskPolicy::Mutual));
        assert!(CollisionGroup::reports(&enemy, &player, MaskPolicy::Mutual));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        let player = CollisionGroup::new(CollisionLayers::PLAYER, CollisionLayers::ENEMY);
        let enemy = CollisionGroup::new(CollisionLayers::ENEMY, CollisionLayers::PLAYER_BULLET);

        assert!(!CollisionGroup::reports(&player, &enemy, MaskPolicy::Mutual));
        assert!(!CollisionGroup::reports(&enemy, &player, MaskPolicy::Mutual));
        assert!(CollisionGroup::reports(&player, &enemy, MaskPolicy::Either));
        assert!(!CollisionGroup::reports(&enemy, &player, MaskPolicy::Either));
    }

    #[test]
    fn custom_bits_survive() {
        let group = CollisionGroup::from_bits(1 << 20, 1 << 21);
        let other = CollisionGroup::from_bits(1 << 21, 1 << 20);

        assert_eq!(group.category.bits(), 1 << 20);
        assert!(CollisionGroup::reports(&group, &other, MaskPolicy::Mutual));
    }

    #[test]
    fn default_group_accepts_everything() {
        let a = CollisionGroup::default();
        let b = CollisionGroup::new(CollisionLayers::WALL, CollisionLayers::all());
        assert!(CollisionGroup::reports(&a, &b, MaskPolicy::Mutual));
    }
}
