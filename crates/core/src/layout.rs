//! Pagination helpers for laying cards out on printed pages.

/// Split `items` into consecutive groups of at most `size` elements.
///
/// The last group may be shorter. A `size` of zero yields no groups.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// Number of pages needed to print `total` items at `per_page` each.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_preserves_order_and_sizes() {
        let items: Vec<u32> = (1..=7).collect();
        for size in 1..=8 {
            let groups = chunk(&items, size);
            assert_eq!(groups.len(), page_count(items.len(), size));
            let (last, full) = groups.split_last().expect("at least one group");
            assert!(full.iter().all(|group| group.len() == size));
            assert!(!last.is_empty() && last.len() <= size);
            assert_eq!(groups.concat(), items);
        }
    }

    #[test]
    fn chunk_handles_empty_and_zero() {
        assert!(chunk::<u8>(&[], 3).is_empty());
        assert!(chunk(&[1, 2, 3], 0).is_empty());
        assert_eq!(page_count(5, 0), 0);
        assert_eq!(page_count(0, 4), 0);
    }
}
