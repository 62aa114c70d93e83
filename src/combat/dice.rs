//! Six-sided dice with individual faces kept for display

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::DIE_FACES;

/// One roll of `dice.len()` dice plus a flat modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub dice: Vec<u8>,
    pub modifier: i32,
    pub sum: i32,
}

impl Roll {
    /// A roll with fixed faces, for scripted outcomes
    pub fn from_faces(dice: Vec<u8>, modifier: i32) -> Self {
        let sum = dice.iter().map(|d| *d as i32).sum::<i32>() + modifier;
        Self { dice, modifier, sum }
    }

    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

/// Roll `count` dice and add `modifier`
///
/// The sum always lies in `count + modifier ..= 6 * count + modifier`.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, count: u32, modifier: i32) -> Roll {
    let dice = (0..count).map(|_| rng.gen_range(1..=DIE_FACES)).collect();
    Roll::from_faces(dice, modifier)
}
