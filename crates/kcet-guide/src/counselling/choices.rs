use crate::catalog::{BranchKey, CatalogSnapshot, Round};

/// Category every student may fall back to when their own has no cutoff.
pub const GENERAL_MERIT: &str = "GM";

/// Cutoff shown next to a saved choice.
///
/// Tries the student's category, then its fallback list, then general merit,
/// all at one (year, round) cell; the first present value wins.
pub fn choice_cutoff(
    snapshot: &CatalogSnapshot,
    category: Option<&str>,
    year: &str,
    round: Round,
    branch: &BranchKey,
) -> Option<u32> {
    let mut order: Vec<&str> = Vec::new();
    if let Some(code) = category {
        order.push(code);
        if let Some(known) = snapshot.category(code) {
            order.extend(known.fallback.iter().map(String::as_str));
        }
    }
    if !order.contains(&GENERAL_MERIT) {
        order.push(GENERAL_MERIT);
    }

    order
        .into_iter()
        .find_map(|code| snapshot.cell(branch, code, year, round))
}

/// 1-based position at which a new choice joins an ordered preference list.
///
/// Ranked choices stay ascending by cutoff; a choice without a cutoff goes
/// after every ranked entry but ahead of existing unranked ones.
pub fn insertion_position(existing: &[Option<u32>], candidate: Option<u32>) -> usize {
    for (index, current) in existing.iter().enumerate() {
        let position = index + 1;
        match (candidate, current) {
            (None, None) => return position,
            (None, Some(_)) => continue,
            (Some(_), None) => return position,
            (Some(new), Some(old)) if new <= *old => return position,
            (Some(_), Some(_)) => continue,
        }
    }
    existing.len() + 1
}
