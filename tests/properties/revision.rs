//! Property tests for auto-update revision naming.

use std::path::PathBuf;

use proptest::prelude::*;

use rigcascade::domain::value_objects::{next_revision_path, revision_counter, DEFAULT_REVISION_DIR};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: each automated save of the previous revision bumps the counter by one,
    /// and revisions stay in one directory next to the source.
    #[test]
    fn property_revision_counter_strictly_increases(
        stem in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        ext in "(ma|mb)",
        saves in 1usize..6,
    ) {
        let source = PathBuf::from("/proj/rig").join(format!("{}.{}", stem, ext));
        prop_assert_eq!(revision_counter(&source), None);

        let revision_dir = PathBuf::from("/proj/rig/_auto_update");
        let mut current = source.clone();
        for expected in 1..=saves {
            let next = next_revision_path(&current, DEFAULT_REVISION_DIR);
            prop_assert_eq!(revision_counter(&next), Some(expected as u32));
            prop_assert_eq!(next.parent(), Some(revision_dir.as_path()));
            current = next;
        }
    }
}
