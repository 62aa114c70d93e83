//! Ordered groups of combatants with stable indices

use serde::{Deserialize, Serialize};

use crate::character::combatant::Combatant;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Party {
    pub members: Vec<Combatant>,
}

impl Party {
    pub fn new(members: Vec<Combatant>) -> Self {
        Self { members }
    }

    pub fn push(&mut self, member: Combatant) -> usize {
        self.members.push(member);
        self.members.len() - 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// At least one living member
    pub fn is_alive(&self) -> bool {
        self.members.iter().any(|m| m.is_alive())
    }

    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.members.get_mut(index)
    }

    /// Living members with their indices
    pub fn living(&self) -> impl Iterator<Item = (usize, &Combatant)> + '_ {
        self.members.iter().enumerate().filter(|(_, m)| m.is_alive())
    }

    pub fn count_alive(&self) -> usize {
        self.living().count()
    }

    pub fn reset_after_battle(&mut self) {
        for member in self.members.iter_mut() {
            member.reset_after_battle();
        }
    }
}

impl FromIterator<Combatant> for Party {
    fn from_iter<T: IntoIterator<Item = Combatant>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
