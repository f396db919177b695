//! Property coverage for the compatibility decision: whatever two peers
//! have installed, they must agree on whether they can play together.

use proptest::collection::vec;
use proptest::prelude::*;

use tandem_shared::{compare, Fingerprint, ModDescriptor, ModFile, ModFileSet, ModSource};

fn fingerprint(entries: &[(String, i32)]) -> Fingerprint {
    let mut files = ModFileSet::new();
    let mut mods = Vec::new();
    for (package_id, hash) in entries {
        mods.push(ModDescriptor {
            package_id: package_id.clone(),
            display_name: package_id.to_uppercase(),
            origin_id: 0,
            source: ModSource::Workshop,
        });
        files.add(package_id, ModFile::new("Defs/Main.xml", *hash));
    }
    Fingerprint {
        mods,
        files,
        configs: Vec::new(),
    }
}

proptest! {
    /// The accept/reject verdict never depends on which side runs the
    /// comparison.
    #[test]
    fn verdict_is_symmetric(
        a in vec(("[a-z]{1,6}", any::<i32>()), 0..8),
        b in vec(("[a-z]{1,6}", any::<i32>()), 0..8),
    ) {
        let fa = fingerprint(&a);
        let fb = fingerprint(&b);
        let forward = compare(&fa, &fb, "1.0", "1.0");
        let backward = compare(&fb, &fa, "1.0", "1.0");
        prop_assert_eq!(forward.compatible(), backward.compatible());
    }

    /// A fingerprint is always compatible with itself on equal versions.
    #[test]
    fn self_comparison_is_compatible(
        entries in vec(("[a-z]{1,6}", any::<i32>()), 0..8),
    ) {
        let fp = fingerprint(&entries);
        prop_assert!(compare(&fp, &fp.clone(), "1.0", "1.0").compatible());
    }

    /// Any version skew rejects, regardless of content.
    #[test]
    fn version_skew_always_rejects(
        entries in vec(("[a-z]{1,6}", any::<i32>()), 0..8),
        local in "[0-9.]{1,8}",
        remote in "[0-9.]{1,8}",
    ) {
        prop_assume!(local != remote);
        let fp = fingerprint(&entries);
        prop_assert!(!compare(&fp, &fp.clone(), &local, &remote).compatible());
    }
}
