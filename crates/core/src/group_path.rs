// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slash-delimited group hierarchy paths.
//!
//! A [`GroupPath`] identifies an organizational unit ("group") in the
//! hierarchy that workspaces and group runners live under. `"a/b/c"` is a
//! child of `"a/b"`, which is a child of `"a"`. The empty path is the root
//! and is a prefix of every path.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPath(String);

impl GroupPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// `self` equals `other`, or `self` is an ancestor of `other`.
    pub fn is_prefix_of(&self, other: &GroupPath) -> bool {
        if self.is_root() {
            return true;
        }
        other.0 == self.0 || other.0.starts_with(&format!("{}/", self.0))
    }

    /// `self` is a strict (proper) ancestor of `other`.
    pub fn is_strict_prefix_of(&self, other: &GroupPath) -> bool {
        self != other && self.is_prefix_of(other)
    }

    /// Whether `mid` lies strictly between `self` (exclusive) and
    /// `descendant` (exclusive) in the hierarchy.
    pub fn is_strictly_between(&self, mid: &GroupPath, descendant: &GroupPath) -> bool {
        self.is_strict_prefix_of(mid) && mid.is_strict_prefix_of(descendant)
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for GroupPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GroupPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A parsed `runner_path`: `{group_path}/{runner_name}` or bare `{runner_name}`
/// for a shared runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerPath {
    pub group_path: Option<GroupPath>,
    pub name: String,
}

impl RunnerPath {
    /// Split on `/`; the last segment is the runner name, everything before
    /// it (if present) is the group path. `"name"` has no group prefix.
    pub fn parse(path: &str) -> Self {
        match path.rsplit_once('/') {
            Some((group, name)) => {
                RunnerPath { group_path: Some(GroupPath::new(group)), name: name.to_string() }
            }
            None => RunnerPath { group_path: None, name: path.to_string() },
        }
    }

    pub fn is_shared(&self) -> bool {
        self.group_path.is_none()
    }
}

#[cfg(test)]
#[path = "group_path_tests.rs"]
mod tests;
