use std::cmp::Ordering;

/// Stable in-place sort, optionally collapsing comparator-equal records down
/// to a single representative. Which representative survives a collapse is
/// unspecified; callers must not rely on it.
pub fn sort_in_memory<T, Cmp>(records: &mut Vec<T>, compare: &Cmp, remove_duplicates: bool)
where
    Cmp: Fn(&T, &T) -> Ordering,
{
    records.sort_by(|a, b| compare(a, b));
    if remove_duplicates {
        records.dedup_by(|a, b| compare(a, b) == Ordering::Equal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::natural_order;

    #[test]
    fn sort_is_stable_for_comparator_equal_records() {
        let mut records = vec![(2, "first"), (1, "x"), (2, "second"), (2, "third")];
        sort_in_memory(&mut records, &|a: &(u32, &str), b: &(u32, &str)| a.0.cmp(&b.0), false);
        assert_eq!(
            records,
            vec![(1, "x"), (2, "first"), (2, "second"), (2, "third")]
        );
    }

    #[test]
    fn dedup_keeps_one_record_per_equivalence_class() {
        let mut records = vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e')];
        let original = records.clone();
        sort_in_memory(&mut records, &|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0), true);

        let keys: Vec<u32> = records.iter().map(|record| record.0).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        for record in &records {
            assert!(original.contains(record), "{record:?} is not an input record");
        }
    }

    #[test]
    fn dedup_with_natural_order_removes_exact_duplicates() {
        let mut records = vec![5_u32, 1, 5, 3, 1, 1];
        sort_in_memory(&mut records, &natural_order::<u32>(), true);
        assert_eq!(records, vec![1, 3, 5]);
    }

    #[test]
    fn reverse_comparator_sorts_descending() {
        let mut records = vec![2_u32, 9, 4];
        sort_in_memory(&mut records, &|a: &u32, b: &u32| b.cmp(a), false);
        assert_eq!(records, vec![9, 4, 2]);
    }

    #[test]
    fn empty_input_stays_empty() {
        let mut records: Vec<u32> = Vec::new();
        sort_in_memory(&mut records, &natural_order::<u32>(), true);
        assert!(records.is_empty());
    }
}
