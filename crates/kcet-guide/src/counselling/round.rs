use crate::catalog::Round;

/// Rounds to try, in order, when the selected round has no recorded cutoff.
pub fn fallback_order(selected: Round) -> [Round; 3] {
    match selected {
        Round::R1 => [Round::R1, Round::R2, Round::R3],
        Round::R2 => [Round::R2, Round::R1, Round::R3],
        Round::R3 => [Round::R3, Round::R2, Round::R1],
    }
}
