//! Game-over tips.

use crate::core::TileRng;

pub const TIPS: [&str; 6] = [
    "Try to look for matches that create chain reactions!",
    "Focus on creating matches at the bottom of the grid first.",
    "Sometimes sacrificing a move to set up a big combo is worth it.",
    "Pay attention to potential matches before making a swap.",
    "Try to create special matches of 4 or 5 tiles for bonus points!",
    "Don't rush - take your time to plan your moves carefully.",
];

pub fn random_tip<R: TileRng>(rng: &mut R) -> &'static str {
    rng.choose(&TIPS).unwrap_or(TIPS[0])
}
