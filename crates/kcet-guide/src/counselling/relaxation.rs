/// Signals that a branch's cutoff history leaves room for it to open up to `rank`.
///
/// `cutoffs` is ordered oldest to newest. True when any year closed at or below
/// `floor(rank * factor)`, or when the latest cutoff is beyond the rank but an
/// earlier year was lower or some year-over-year drop reached `drop_pct`.
pub fn historical_relaxation(cutoffs: &[u32], rank: u32, factor: f64, drop_pct: f64) -> bool {
    let Some(&latest) = cutoffs.last() else {
        return false;
    };

    let threshold = (f64::from(rank) * factor).floor();
    if cutoffs.iter().any(|cutoff| f64::from(*cutoff) <= threshold) {
        return true;
    }

    if latest <= rank {
        return false;
    }

    let earlier = &cutoffs[..cutoffs.len() - 1];
    if earlier.iter().any(|cutoff| *cutoff < latest) {
        return true;
    }

    cutoffs.windows(2).any(|pair| {
        let (previous, current) = (f64::from(pair[0]), f64::from(pair[1]));
        previous > 0.0 && (previous - current) / previous * 100.0 >= drop_pct
    })
}
