// Teams and hurt policies

use std::ops::BitOr;

/// Side an entity fights for; `None` entities hurt everyone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    None,
    Player,
    Enemy,
}

impl Team {
    /// Whether combat between the two sides is allowed
    pub fn hostile_to(self, other: Team) -> bool {
        self != other
    }
}

/// Which contact kinds make an entity take damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HurtPolicy(u8);

impl HurtPolicy {
    pub const NONE: Self = Self(0);
    /// Hurt by attacker entities such as bullets
    pub const ATTACK: Self = Self(0b01);
    /// Hurt by direct body contact
    pub const TOUCH: Self = Self(0b10);

    pub fn attack(self) -> bool {
        self.0 & Self::ATTACK.0 != 0
    }

    pub fn touch(self) -> bool {
        self.0 & Self::TOUCH.0 != 0
    }
}

impl BitOr for HurtPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
