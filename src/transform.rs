//! Derived views over table columns: counts, rankings and groupings.
//!
//! Every function here is pure and expects parallel slices taken from the same
//! [`Table`](crate::data::Table), so index `i` refers to the same record in each.

use std::collections::{BTreeMap, HashMap};

/// Occurrences of one distinct value in a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// A category ranked by frequency, with the mean of a joined numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCategory {
    pub category: String,
    pub count: usize,
    pub average: f64,
}

/// Distinct values with their counts, sorted by value.
pub fn frequency_count(values: &[String]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Each count as a fraction of the total.
pub fn shares(counts: &[CategoryCount]) -> Vec<f64> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|c| c.count as f64 / total as f64)
        .collect()
}

/// The `k` most frequent categories, each with the mean of `values` over its records.
///
/// Categories are ordered by descending count; equal counts fall back to
/// ascending category name.
pub fn top_k_with_average(categories: &[String], values: &[f64], k: usize) -> Vec<RankedCategory> {
    debug_assert_eq!(categories.len(), values.len());

    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    for (category, &value) in categories.iter().zip(values) {
        let entry = totals.entry(category.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += value;
    }

    let mut ranked: Vec<RankedCategory> = totals
        .into_iter()
        .map(|(category, (count, sum))| RankedCategory {
            category: category.to_string(),
            count,
            average: sum / count as f64,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    ranked.truncate(k);
    ranked
}

/// Split `values` by the parallel `groups` column, groups sorted by name.
pub fn group_values<T: Clone>(groups: &[String], values: &[T]) -> Vec<(String, Vec<T>)> {
    debug_assert_eq!(groups.len(), values.len());

    let mut grouped: BTreeMap<&str, Vec<T>> = BTreeMap::new();
    for (group, value) in groups.iter().zip(values) {
        grouped.entry(group.as_str()).or_default().push(value.clone());
    }

    grouped
        .into_iter()
        .map(|(group, values)| (group.to_string(), values))
        .collect()
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Widen an integer column for numeric aggregation.
pub fn to_f64(values: &[i64]) -> Vec<f64> {
    values.iter().map(|&v| v as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_frequency_count_sorted() {
        let values = strings(&["Queens", "Brooklyn", "Queens", "Bronx", "Queens"]);
        let counts = frequency_count(&values);
        let names: Vec<&str> = counts.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Bronx", "Brooklyn", "Queens"]);
        assert_eq!(counts[2].count, 3);
    }

    #[test]
    fn test_frequency_count_totals_match() {
        let values = strings(&["a", "b", "a", "c", "c", "c", "d"]);
        let counts = frequency_count(&values);
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, values.len());
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_frequency_count_empty() {
        assert!(frequency_count(&[]).is_empty());
    }

    #[test]
    fn test_shares() {
        let counts = frequency_count(&strings(&["x", "y", "y", "y"]));
        assert_eq!(shares(&counts), vec![0.25, 0.75]);
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn test_top_k_average_matches_mean() {
        let cats = strings(&["A", "B", "A", "C", "A", "B"]);
        let prices = vec![100.0, 50.0, 200.0, 80.0, 300.0, 70.0];
        let ranked = top_k_with_average(&cats, &prices, 20);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].category, "A");
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[0].average, 200.0);
        assert_eq!(ranked[1].category, "B");
        assert_eq!(ranked[1].average, 60.0);
        assert_eq!(ranked[2].category, "C");
        assert_eq!(ranked[2].average, 80.0);
    }

    #[test]
    fn test_top_k_truncates_and_breaks_ties_by_name() {
        let cats = strings(&["d", "c", "b", "a", "a"]);
        let values = vec![1.0; 5];
        let ranked = top_k_with_average(&cats, &values, 3);
        let names: Vec<&str> = ranked.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_group_values() {
        let groups = strings(&["Queens", "Bronx", "Queens"]);
        let values = vec![1.0, 2.0, 3.0];
        let grouped = group_values(&groups, &values);
        assert_eq!(
            grouped,
            vec![
                ("Bronx".to_string(), vec![2.0]),
                ("Queens".to_string(), vec![1.0, 3.0]),
            ]
        );
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }
}
