use rand::RngCore;

use crate::army::Side;

/// Offset between consecutive per-trial streams.
pub const TRIAL_STRIDE: u32 = 9973;

const INCREMENT: u32 = 0x6D2B_79F5;

/// Battle seed derived purely from troop counts, never from wall-clock time
/// or external entropy. Identical armies therefore always replay the same
/// simulation.
pub fn battle_seed(me: &Side, enemy: &Side) -> u32 {
    use crate::army::TroopType::*;
    let sum = me
        .count(Infantry)
        .wrapping_add(me.count(Cavalry).wrapping_mul(3))
        .wrapping_add(me.count(Archers).wrapping_mul(7))
        .wrapping_add(enemy.count(Infantry))
        .wrapping_add(enemy.count(Cavalry).wrapping_mul(5))
        .wrapping_add(enemy.count(Archers).wrapping_mul(11));
    sum as u32
}

/// Deterministic 32-bit mix-function stream.
///
/// The bit recipe is a compatibility contract, not an implementation detail:
/// any reimplementation must produce the identical word sequence for the win
/// estimates to stay bit-identical. Each draw advances the state by a fixed
/// increment and runs it through two multiply-xor mixing rounds; the output
/// word is the mixed state folded once more.
#[derive(Debug, Clone)]
pub struct TrialRng {
    state: u32,
}

impl TrialRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Independent stream for trial `trial` of a battle seeded with `seed`.
    pub fn for_trial(seed: u32, trial: u32) -> Self {
        Self::new(seed.wrapping_add(trial.wrapping_mul(TRIAL_STRIDE)))
    }

    fn next_word(&mut self) -> u32 {
        let mut t = self.state.wrapping_add(INCREMENT);
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        self.state = t;
        t ^ (t >> 14)
    }

    /// Uniform draw in [0, 1).
    pub fn next_fraction(&mut self) -> f64 {
        self.next_word() as f64 / 4_294_967_296.0
    }
}

impl RngCore for TrialRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_word() as u64) << 32) | self.next_word() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
