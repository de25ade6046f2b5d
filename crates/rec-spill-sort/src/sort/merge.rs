use super::runs::RunCursor;
use super::traits::RecordCodec;
use crate::{Result, SortError};
use std::cmp::Ordering;

/// Merges sorted runs into `emit` in comparator order, returning the emitted
/// record count.
///
/// Each cursor feeds one pending slot. Every round refills empty slots,
/// scans them left to right for the smallest head, emits it, and repeats
/// until all runs are exhausted. The scan only replaces its candidate on a
/// strictly smaller head, so comparator ties always go to the lowest run id;
/// records that tied within one run keep that run's order. Cursors close as
/// they drain; on any error the caller still owns every cursor and must
/// release them.
///
/// With `remove_duplicates` set, a selected record that compares equal to
/// the previously emitted one is dropped instead of emitted, which keeps the
/// first record of each equal streak.
pub fn merge_runs_into_sink<C, Cmp, F>(
    cursors: &mut [RunCursor],
    codec: &C,
    compare: &Cmp,
    remove_duplicates: bool,
    mut emit: F,
) -> Result<u64>
where
    C: RecordCodec,
    Cmp: Fn(&C::Record, &C::Record) -> Ordering,
    F: FnMut(&C::Record) -> Result<()>,
{
    let mut slots: Vec<Option<C::Record>> = (0..cursors.len()).map(|_| None).collect();
    let mut exhausted = vec![false; cursors.len()];
    let mut last_emitted: Option<C::Record> = None;
    let mut emitted = 0_u64;

    loop {
        for (slot_index, slot) in slots.iter_mut().enumerate() {
            if slot.is_some() || exhausted[slot_index] {
                continue;
            }
            match cursors[slot_index].next_record(codec)? {
                Some(record) => *slot = Some(record),
                None => {
                    cursors[slot_index].close()?;
                    exhausted[slot_index] = true;
                }
            }
        }

        let Some(winner_index) = select_minimum_slot(slots.as_slice(), compare) else {
            break;
        };
        let record = slots[winner_index]
            .take()
            .ok_or_else(|| SortError::message("merge selected an empty pending slot"))?;

        if remove_duplicates {
            if let Some(last) = last_emitted.as_ref() {
                if compare(&record, last) == Ordering::Equal {
                    continue;
                }
            }
        }

        emit(&record)?;
        emitted = emitted.saturating_add(1);
        last_emitted = Some(record);
    }

    Ok(emitted)
}

// Ties keep the candidate already found, so the lowest slot index wins.
fn select_minimum_slot<T, Cmp>(slots: &[Option<T>], compare: &Cmp) -> Option<usize>
where
    Cmp: Fn(&T, &T) -> Ordering,
{
    let mut winner: Option<usize> = None;
    for (slot_index, slot) in slots.iter().enumerate() {
        let Some(candidate) = slot.as_ref() else {
            continue;
        };
        winner = match winner {
            None => Some(slot_index),
            Some(best_index) => match slots[best_index].as_ref() {
                Some(best) if compare(candidate, best) == Ordering::Less => Some(slot_index),
                _ => Some(best_index),
            },
        };
    }
    winner
}
