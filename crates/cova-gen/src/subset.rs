//! Order-preserving fixed-size subsets

/// Every size-`k` subsequence of `items`, in lexicographic position order
///
/// Each subset keeps the relative order of `items`. The enumeration order
/// (include the first element and recurse, then skip it and recurse) decides
/// requirement order downstream, so it must not change.
///
/// Returns no subsets when `k > items.len()` and a single empty subset when
/// `k == 0`.
#[must_use]
pub fn subsets<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    choose(items, k, &mut current, &mut out);
    out
}

fn choose<T: Clone>(items: &[T], k: usize, current: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
    if k == 0 {
        out.push(current.clone());
        return;
    }
    let Some((first, rest)) = items.split_first() else {
        return;
    };
    if items.len() < k {
        return;
    }
    current.push(first.clone());
    choose(rest, k - 1, current, out);
    current.pop();
    choose(rest, k, current, out);
}

/// Number of size-`k` subsets of `n` items
#[must_use]
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsets_pairs_order() {
        let got = subsets(&["A", "B", "C", "D"], 2);
        assert_eq!(
            got,
            vec![
                vec!["A", "B"],
                vec!["A", "C"],
                vec!["A", "D"],
                vec!["B", "C"],
                vec!["B", "D"],
                vec!["C", "D"],
            ]
        );
    }

    #[test]
    fn test_subsets_singletons() {
        assert_eq!(subsets(&[1, 2, 3], 1), vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_subsets_full() {
        assert_eq!(subsets(&[1, 2, 3], 3), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_subsets_k_too_large() {
        assert!(subsets(&[1, 2], 3).is_empty());
    }

    #[test]
    fn test_subsets_k_zero() {
        assert_eq!(subsets(&[1, 2], 0), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_subsets_empty_input() {
        assert!(subsets::<u8>(&[], 1).is_empty());
        assert_eq!(subsets::<u8>(&[], 0).len(), 1);
    }

    #[test]
    fn test_subset_count_matches_binomial() {
        let items: Vec<usize> = (0..7).collect();
        for k in 0..=8 {
            assert_eq!(subsets(&items, k).len(), binomial(7, k), "k = {k}");
        }
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(10, 3), 120);
    }
}
