//! Status effects with remaining durations
//!
//! Durations count the owner's turns: they tick down when the owner's turn
//! begins, and an effect reaching zero is pruned at that moment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::battle::constants::{NIGHTHOWL_FPR_PENALTY, PARTY_TIGER_EYE_BONUS, TIGER_EYE_BONUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    Defending,
    Fleeing,
    Enthralled,
    Paralyzed, // Set by the narrative driver before battle, no action here applies it
    KnockedOut,
    Nighthowl,
    TigerEye,
    PartyTigerEye,
    Haste, // Set by the narrative driver; shifts the owner's attack rolls
}

impl StatusKind {
    /// Does this status cost the owner their turn?
    pub fn skips_turn(&self) -> bool {
        matches!(self, StatusKind::Paralyzed | StatusKind::KnockedOut)
    }

    /// Statuses that only mean something inside a battle
    pub fn is_battle_only(&self) -> bool {
        !matches!(self, StatusKind::Enthralled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    Rounds(u32),
    Unlimited,
}

impl Duration {
    fn outlasts(&self, other: &Duration) -> bool {
        match (self, other) {
            (Duration::Unlimited, _) => true,
            (Duration::Rounds(_), Duration::Unlimited) => false,
            (Duration::Rounds(a), Duration::Rounds(b)) => a > b,
        }
    }
}

/// The set of active statuses on one combatant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSet {
    active: BTreeMap<StatusKind, Duration>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a status; reapplying keeps whichever duration lasts longer
    pub fn apply(&mut self, kind: StatusKind, duration: Duration) {
        if matches!(duration, Duration::Rounds(0)) {
            return;
        }
        match self.active.get(&kind) {
            Some(existing) if !duration.outlasts(existing) => {}
            _ => {
                self.active.insert(kind, duration);
            }
        }
    }

    pub fn remove(&mut self, kind: StatusKind) -> bool {
        self.active.remove(&kind).is_some()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn duration(&self, kind: StatusKind) -> Option<Duration> {
        self.active.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, Duration)> + '_ {
        self.active.iter().map(|(k, d)| (*k, *d))
    }

    /// Is any turn-skipping status active?
    pub fn is_incapacitated(&self) -> bool {
        self.active.keys().any(|k| k.skips_turn())
    }

    /// Tick every timed status down by one; returns the ones that expired
    pub fn cool_down(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for (kind, duration) in self.active.iter_mut() {
            if let Duration::Rounds(n) = duration {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    expired.push(*kind);
                }
            }
        }
        for kind in &expired {
            self.active.remove(kind);
        }
        expired
    }

    /// Drop everything that should not outlive a battle
    pub fn clear_battle_statuses(&mut self) {
        self.active.retain(|kind, _| !kind.is_battle_only());
    }

    /// Net fighting prowess adjustment from active statuses
    pub fn fighting_prowess_modifier(&self) -> i32 {
        let mut modifier = 0;
        if self.has(StatusKind::TigerEye) {
            modifier += TIGER_EYE_BONUS;
        }
        if self.has(StatusKind::PartyTigerEye) {
            modifier += PARTY_TIGER_EYE_BONUS;
        }
        if self.has(StatusKind::Nighthowl) {
            modifier -= NIGHTHOWL_FPR_PENALTY;
        }
        modifier
    }

    /// Net damage bonus from active statuses
    pub fn damage_modifier(&self) -> i32 {
        let mut modifier = 0;
        if self.has(StatusKind::TigerEye) {
            modifier += TIGER_EYE_BONUS;
        }
        if self.has(StatusKind::PartyTigerEye) {
            modifier += PARTY_TIGER_EYE_BONUS;
        }
        modifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cool_down_expires_timed_statuses() {
        let mut status = StatusSet::new();
        status.apply(StatusKind::Defending, Duration::Rounds(1));
        status.apply(StatusKind::Nighthowl, Duration::Rounds(2));
        status.apply(StatusKind::Enthralled, Duration::Unlimited);

        assert_eq!(status.cool_down(), vec![StatusKind::Defending]);
        assert!(status.has(StatusKind::Nighthowl));

        assert_eq!(status.cool_down(), vec![StatusKind::Nighthowl]);
        assert!(status.has(StatusKind::Enthralled));
        assert!(status.cool_down().is_empty());
    }

    #[test]
    fn test_reapply_keeps_longer_duration() {
        let mut status = StatusSet::new();
        status.apply(StatusKind::TigerEye, Duration::Rounds(5));
        status.apply(StatusKind::TigerEye, Duration::Rounds(2));
        assert_eq!(status.duration(StatusKind::TigerEye), Some(Duration::Rounds(5)));

        status.apply(StatusKind::TigerEye, Duration::Unlimited);
        assert_eq!(status.duration(StatusKind::TigerEye), Some(Duration::Unlimited));
    }

    #[test]
    fn test_zero_duration_is_ignored() {
        let mut status = StatusSet::new();
        status.apply(StatusKind::KnockedOut, Duration::Rounds(0));
        assert!(!status.has(StatusKind::KnockedOut));
    }

    #[test]
    fn test_modifiers() {
        let mut status = StatusSet::new();
        status.apply(StatusKind::PartyTigerEye, Duration::Rounds(3));
        status.apply(StatusKind::Nighthowl, Duration::Rounds(3));
        assert_eq!(status.fighting_prowess_modifier(), PARTY_TIGER_EYE_BONUS - NIGHTHOWL_FPR_PENALTY);
        assert_eq!(status.damage_modifier(), PARTY_TIGER_EYE_BONUS);
    }

    #[test]
    fn test_incapacitation_and_battle_cleanup() {
        let mut status = StatusSet::new();
        status.apply(StatusKind::KnockedOut, Duration::Rounds(1));
        status.apply(StatusKind::Enthralled, Duration::Unlimited);
        assert!(status.is_incapacitated());

        status.clear_battle_statuses();
        assert!(!status.is_incapacitated());
        assert!(status.has(StatusKind::Enthralled));
    }
}
