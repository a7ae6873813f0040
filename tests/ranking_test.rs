use proptest::prelude::*;
use std::collections::HashSet;

use survey_cli::naming::{try_unique_code, try_unique_name, unique_name};
use survey_cli::ranking::{Ranked, fix_ranks, is_contiguous};

#[derive(Debug, Clone)]
struct Row {
    position: usize,
    rank: Option<u32>,
}

impl Ranked for Row {
    fn rank(&self) -> Option<u32> {
        self.rank
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
    }
}

fn rows(ranks: &[Option<u32>]) -> Vec<Row> {
    ranks
        .iter()
        .enumerate()
        .map(|(position, rank)| Row { position, rank: *rank })
        .collect()
}

proptest! {
    #[test]
    fn fixed_ranks_are_one_to_n(ranks in prop::collection::vec(prop::option::of(0u32..20), 0..40)) {
        let fixed = fix_ranks(rows(&ranks));
        prop_assert_eq!(fixed.len(), ranks.len());
        prop_assert!(is_contiguous(&fixed));
    }

    #[test]
    fn ties_and_missing_ranks_keep_input_order(ranks in prop::collection::vec(prop::option::of(0u32..5), 0..40)) {
        let fixed = fix_ranks(rows(&ranks));
        for pair in fixed.windows(2) {
            let key = |row: &Row| (ranks[row.position].is_none(), ranks[row.position], row.position);
            prop_assert!(key(&pair[0]) < key(&pair[1]));
        }
    }

    #[test]
    fn fixing_twice_changes_nothing(ranks in prop::collection::vec(prop::option::of(0u32..20), 0..40)) {
        let once = fix_ranks(rows(&ranks));
        let order: Vec<usize> = once.iter().map(|r| r.position).collect();
        let twice = fix_ranks(once);
        prop_assert_eq!(twice.iter().map(|r| r.position).collect::<Vec<_>>(), order);
    }

    #[test]
    fn resolved_name_is_free(
        candidate in "[A-Za-z]{1,8}",
        taken in prop::collection::vec(0usize..6, 0..6),
    ) {
        // scope holds the candidate plus some of its suffixed forms
        let mut scope: Vec<String> = vec![candidate.clone()];
        scope.extend(taken.iter().map(|n| format!("{} {}", candidate, n)));

        let name = try_unique_name(&candidate, scope.iter().map(String::as_str), 100).unwrap();
        prop_assert!(!scope.contains(&name));
        let prefix = format!("{} ", candidate);
        prop_assert!(name.starts_with(&prefix));
    }

    #[test]
    fn free_name_is_unchanged(candidate in "[a-z]{3,8}", others in prop::collection::vec("[A-Z]{3,8}", 0..6)) {
        let name = try_unique_name(&candidate, others.iter().map(String::as_str), 10).unwrap();
        prop_assert_eq!(name, candidate);
    }
}

#[test]
fn test_rank_example_from_creation_order() {
    // S, V, X created with ranks 1, 2, 3; V then moved to 9
    let mut items = vec![
        Row { position: 0, rank: Some(1) },
        Row { position: 1, rank: Some(9) },
        Row { position: 2, rank: Some(3) },
    ];
    items = fix_ranks(items);
    let order: Vec<_> = items.iter().map(|r| (r.position, r.rank)).collect();
    assert_eq!(order, vec![(0, Some(1)), (2, Some(2)), (1, Some(3))]);
}

#[test]
fn test_repeated_resolution_counts_up() {
    let mut scope: HashSet<String> = HashSet::new();
    let mut names = Vec::new();
    for _ in 0..3 {
        let name = unique_name("Stuff", scope.iter().map(String::as_str));
        scope.insert(name.clone());
        names.push(name);
    }
    assert_eq!(names, vec!["Stuff", "Stuff 2", "Stuff 3"]);
}

#[test]
fn test_codes_are_suffixed_without_space() {
    let code = try_unique_code("age", ["age", "age2"], 10).unwrap();
    assert_eq!(code, "age3");
}
