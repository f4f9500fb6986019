// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn shared_runner_path_is_bare_name() {
    let r = Runner::shared("r1");
    assert_eq!(r.path(), "r1");
}

#[test]
fn group_runner_path_includes_group() {
    let r = Runner::group("r1", "a/b");
    assert_eq!(r.path(), "a/b/r1");
}

#[test]
fn top_level_group_runner_path_is_bare_name() {
    let r = Runner::group("r1", GroupPath::root());
    assert_eq!(r.path(), "r1");
}

#[test]
fn untagged_job_needs_run_untagged_flag() {
    let r = Runner::shared("r1").with_untagged(false);
    assert!(!r.admits_tags(&BTreeSet::new()));
    let r = r.with_untagged(true);
    assert!(r.admits_tags(&BTreeSet::new()));
}

#[test]
fn tagged_job_needs_subset_of_runner_tags() {
    let r = Runner::shared("r1").with_tags(["linux", "docker"]);
    let admissible: BTreeSet<String> = ["linux"].into_iter().map(String::from).collect();
    assert!(r.admits_tags(&admissible));

    let not_admissible: BTreeSet<String> = ["windows"].into_iter().map(String::from).collect();
    assert!(!r.admits_tags(&not_admissible));
}
