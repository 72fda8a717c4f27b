//! Property tests for grouping dependents into jobs.

use proptest::prelude::*;

use rigcascade::domain::entities::JobSet;
use rigcascade::domain::value_objects::SourceLocator;

fn pairs_strategy() -> impl Strategy<Value = Vec<(SourceLocator, String)>> {
    proptest::collection::vec((0usize..4, "rig[A-D]"), 0..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(scene, subset)| {
                (
                    SourceLocator::normalized(&format!("/proj/rig/scene{}.ma", scene)),
                    subset,
                )
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: planning does not depend on the order dependents arrive in.
    #[test]
    fn property_grouping_is_order_independent(
        (pairs, shuffled) in pairs_strategy()
            .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle())),
    ) {
        prop_assert_eq!(JobSet::group(pairs), JobSet::group(shuffled));
    }

    /// PROPERTY: planning twice gives the same jobs, one per distinct source.
    #[test]
    fn property_grouping_is_idempotent(pairs in pairs_strategy()) {
        let first = JobSet::group(pairs.clone());
        let regrouped = JobSet::group(
            first
                .jobs()
                .iter()
                .flat_map(|job| job.subsets.iter().map(move |s| (job.source.clone(), s.clone())))
                .collect::<Vec<_>>(),
        );

        let mut sources: Vec<_> = pairs.iter().map(|(source, _)| source.clone()).collect();
        sources.sort();
        sources.dedup();

        prop_assert_eq!(first.len(), sources.len());
        prop_assert_eq!(&first, &regrouped);
        for job in first.jobs() {
            prop_assert!(job.subsets.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
