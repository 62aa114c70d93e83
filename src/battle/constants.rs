//! Battle rule constants - fixed dice counts and modifiers in one place
//!
//! Tunables a scenario may change live in `core::config::EngineConfig`.

// Attack tests (roll at or under fighting prowess)
pub const ATTACK_DICE: u32 = 2;
pub const DEFENDING_EXTRA_DIE: u32 = 1;
pub const KNOCKOUT_EXTRA_DIE: u32 = 1;
pub const DODGING_MODIFIER: i32 = 1;
pub const HASTE_MODIFIER: i32 = 1;

// Ranged attacks always roll a single damage die
pub const RANGED_DAMAGE_DICE: u32 = 1;

// Movement
pub const DEFAULT_MOVES: u32 = 1;

// Status effect magnitudes
pub const NIGHTHOWL_FPR_PENALTY: i32 = 2;
pub const TIGER_EYE_BONUS: i32 = 2;
pub const PARTY_TIGER_EYE_BONUS: i32 = 1;

// Dice faces
pub const DIE_FACES: u8 = 6;

// Rejected choices accepted from a chooser before its turn is passed
pub const MAX_REJECTED_CHOICES: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_boost_beats_party_boost() {
        assert!(TIGER_EYE_BONUS > PARTY_TIGER_EYE_BONUS);
    }

    #[test]
    fn test_attack_dice_positive() {
        assert!(ATTACK_DICE > 0);
        assert!(RANGED_DAMAGE_DICE > 0);
    }
}
