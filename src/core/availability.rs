use crate::models::{TimeSlot, Weekday, WeeklyAvailability};

/// Points awarded for a full schedule overlap under the default weights
pub const DEFAULT_AVAILABILITY_POINTS: f64 = 30.0;

/// How slots within one day are combined before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every slot pair counts, duplicates included. Overlap can then exceed
    /// the reference total; the score ceiling absorbs it.
    #[default]
    CrossProduct,
    /// Each day's slots are merged into disjoint intervals first
    MergeOverlapping,
}

type Interval = (u32, u32);

fn raw_intervals(slots: &[TimeSlot]) -> Vec<Interval> {
    slots.iter().map(|s| (s.start_minutes(), s.end_minutes())).collect()
}

fn merged_intervals(slots: &[TimeSlot]) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = raw_intervals(slots)
        .into_iter()
        .filter(|(start, end)| start < end)
        .collect();
    intervals.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[inline]
fn overlap_minutes(a: Interval, b: Interval) -> u32 {
    a.1.min(b.1).saturating_sub(a.0.max(b.0))
}

#[inline]
fn interval_minutes(interval: Interval) -> u32 {
    interval.1.saturating_sub(interval.0)
}

/// Schedule overlap score in `[0, max_points]`
///
/// `reference` (the candidate) supplies the denominator: the summed length of
/// its slots on every weekday where both schedules have slots. The numerator
/// sums the pairwise overlap of those days' slots.
pub fn availability_score(
    reference: Option<&WeeklyAvailability>,
    other: Option<&WeeklyAvailability>,
    max_points: f64,
    policy: OverlapPolicy,
) -> f64 {
    let (Some(reference), Some(other)) = (reference, other) else {
        return 0.0;
    };
    if !reference.has_slots() || !other.has_slots() {
        return 0.0;
    }

    let mut total_overlap: u64 = 0;
    let mut total_slot_minutes: u64 = 0;

    for day in Weekday::ALL {
        let (slots_a, slots_b) = (reference.day_slots(day), other.day_slots(day));
        if slots_a.is_empty() || slots_b.is_empty() {
            continue;
        }

        let (intervals_a, intervals_b) = match policy {
            OverlapPolicy::CrossProduct => (raw_intervals(slots_a), raw_intervals(slots_b)),
            OverlapPolicy::MergeOverlapping => (merged_intervals(slots_a), merged_intervals(slots_b)),
        };

        for &a in &intervals_a {
            for &b in &intervals_b {
                total_overlap += overlap_minutes(a, b) as u64;
            }
        }
        total_slot_minutes += intervals_a.iter().map(|&i| interval_minutes(i) as u64).sum::<u64>();
    }

    if total_slot_minutes == 0 {
        return 0.0;
    }

    let score = (total_overlap as f64 / total_slot_minutes as f64 * max_points).min(max_points);
    tracing::debug!(
        "Availability overlap: {} of {} minutes, Score: {:.2}/{}",
        total_overlap,
        total_slot_minutes,
        score,
        max_points
    );
    score
}
