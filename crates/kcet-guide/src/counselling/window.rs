use serde::Serialize;

/// Rank tier that decides how wide the admissible cutoff band is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBand {
    Tight,
    Medium,
    Wide,
    VeryWide,
}

impl RankBand {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            0..=1_000 => RankBand::Tight,
            1_001..=5_000 => RankBand::Medium,
            5_001..=20_000 => RankBand::Wide,
            _ => RankBand::VeryWide,
        }
    }

    /// (opening, closing) multipliers expressed in tenths.
    fn multipliers_in_tenths(self) -> (u64, u64) {
        match self {
            RankBand::Tight => (4, 25),
            RankBand::Medium => (6, 30),
            RankBand::Wide => (7, 35),
            RankBand::VeryWide => (8, 40),
        }
    }
}

/// Inclusive band of cutoff ranks considered reachable for a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankWindow {
    pub opening: u32,
    pub closing: u32,
}

impl RankWindow {
    /// Computed band: `floor(rank * multiplier)` for both bounds.
    pub fn for_rank(rank: u32) -> Self {
        let (opening, closing) = RankBand::for_rank(rank).multipliers_in_tenths();
        Self {
            opening: scale(rank, opening),
            closing: scale(rank, closing),
        }
    }

    /// Honors explicit bounds and computes only the ones left unset.
    pub fn resolve(rank: u32, opening: Option<u32>, closing: Option<u32>) -> Self {
        let computed = Self::for_rank(rank);
        Self {
            opening: opening.unwrap_or(computed.opening),
            closing: closing.unwrap_or(computed.closing),
        }
    }

    pub fn contains(&self, cutoff: u32) -> bool {
        self.opening <= cutoff && cutoff <= self.closing
    }
}

fn scale(rank: u32, tenths: u64) -> u32 {
    let scaled = u64::from(rank) * tenths / 10;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
