// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn root_is_prefix_of_everything() {
    let root = GroupPath::root();
    assert!(root.is_prefix_of(&GroupPath::new("a")));
    assert!(root.is_prefix_of(&GroupPath::new("a/b")));
    assert!(root.is_prefix_of(&root));
}

#[test]
fn exact_match_is_prefix_but_not_strict() {
    let a = GroupPath::new("a/b");
    assert!(a.is_prefix_of(&a));
    assert!(!a.is_strict_prefix_of(&a));
}

#[test]
fn strict_prefix_requires_segment_boundary() {
    // "a/b" must not be considered a prefix of "a/bcd" (no boundary).
    let a_b = GroupPath::new("a/b");
    let a_bcd = GroupPath::new("a/bcd");
    assert!(!a_b.is_prefix_of(&a_bcd));

    let a = GroupPath::new("a");
    assert!(a.is_strict_prefix_of(&a_b));
}

#[test]
fn between_checks_strict_ancestry_on_both_sides() {
    let a = GroupPath::new("a");
    let a_b = GroupPath::new("a/b");
    let a_b_c = GroupPath::new("a/b/c");
    assert!(a.is_strictly_between(&a_b, &a_b_c));
    assert!(!a.is_strictly_between(&a, &a_b_c));
    assert!(!a.is_strictly_between(&a_b_c, &a_b_c));
}

#[test]
fn depth_counts_segments() {
    assert_eq!(GroupPath::root().depth(), 0);
    assert_eq!(GroupPath::new("a").depth(), 1);
    assert_eq!(GroupPath::new("a/b/c").depth(), 3);
}

#[test]
fn runner_path_parses_group_prefix() {
    let p = RunnerPath::parse("a/b/my-runner");
    assert_eq!(p.group_path, Some(GroupPath::new("a/b")));
    assert_eq!(p.name, "my-runner");
    assert!(!p.is_shared());
}

#[test]
fn runner_path_without_prefix_is_shared() {
    let p = RunnerPath::parse("my-runner");
    assert_eq!(p.group_path, None);
    assert_eq!(p.name, "my-runner");
    assert!(p.is_shared());
}
