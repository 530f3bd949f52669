//! Rewrite plans for `git rebase --interactive`.
//!
//! History lists in this crate are newest first, while the todo file git consumes
//! is oldest first. [`RewritePlan`] always stores its entries oldest first and the
//! builders here are the only place where that reversal happens.
//!
//! # Public API
//! - [`RewriteVerb`]: The todo vocabulary this crate emits
//! - [`PlanEntry`]: One `<verb> <sha> <subject>` line
//! - [`RewritePlan`]: Entries plus the base revision the rewrite replays onto

use crate::core::{
    commit::Commit,
    error::{GitLoomError, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteVerb {
    Pick,
    Reword,
    Edit,
    Squash,
    Fixup,
    Drop,
}

impl RewriteVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteVerb::Pick => "pick",
            RewriteVerb::Reword => "reword",
            RewriteVerb::Edit => "edit",
            RewriteVerb::Squash => "squash",
            RewriteVerb::Fixup => "fixup",
            RewriteVerb::Drop => "drop",
        }
    }

    /// Squash and fixup fold a commit into the one replayed before it
    pub fn folds_into_previous(&self) -> bool {
        matches!(self, RewriteVerb::Squash | RewriteVerb::Fixup)
    }

    /// Whether the verb leaves a commit behind that a later fold can target
    fn keeps_commit(&self) -> bool {
        !matches!(self, RewriteVerb::Drop)
    }
}

impl fmt::Display for RewriteVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewriteVerb {
    type Err = GitLoomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pick" | "p" => Ok(RewriteVerb::Pick),
            "reword" | "r" => Ok(RewriteVerb::Reword),
            "edit" | "e" => Ok(RewriteVerb::Edit),
            "squash" | "s" => Ok(RewriteVerb::Squash),
            "fixup" | "f" => Ok(RewriteVerb::Fixup),
            "drop" | "d" => Ok(RewriteVerb::Drop),
            other => Err(GitLoomError::malformed_plan_line(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub verb: RewriteVerb,
    pub sha: String,
    pub subject: String,
}

impl PlanEntry {
    pub fn new(verb: RewriteVerb, commit: &Commit) -> Self {
        Self {
            verb,
            sha: commit.sha.clone(),
            subject: commit.name.clone(),
        }
    }

    /// Parse a single todo line
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let verb = parts
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GitLoomError::malformed_plan_line(line))?
            .parse::<RewriteVerb>()
            .map_err(|_| GitLoomError::malformed_plan_line(line))?;
        let sha = parts
            .next()
            .filter(|sha| !sha.is_empty() && sha.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| GitLoomError::malformed_plan_line(line))?;
        let subject = parts.next().unwrap_or("").trim();

        Ok(Self {
            verb,
            sha: sha.to_string(),
            subject: subject.to_string(),
        })
    }
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "{} {}", self.verb, self.sha)
        } else {
            write!(f, "{} {} {}", self.verb, self.sha, self.subject)
        }
    }
}

/// An interactive rebase todo plus the revision it replays onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewritePlan {
    /// Oldest first, in replay order
    pub entries: Vec<PlanEntry>,
    pub base_sha: String,
}

impl RewritePlan {
    /// A plan that replays history onto `base` without touching the todo.
    pub fn onto(base: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            base_sha: base.into(),
        }
    }

    /// Plan a single `verb` at `action_index` in a newest-first history.
    ///
    /// Every other commit above the base is picked. Squash and fixup need one
    /// more commit beneath the action to fold into.
    pub fn build(commits: &[Commit], action_index: usize, verb: RewriteVerb) -> Result<Self> {
        Self::build_with_actions(commits, &[(action_index, verb)])
    }

    /// Plan several actions at once. Indices refer to the newest-first history.
    pub fn build_with_actions(commits: &[Commit], actions: &[(usize, RewriteVerb)]) -> Result<Self> {
        let verbs: HashMap<usize, RewriteVerb> = actions.iter().copied().collect();
        let deepest = verbs.keys().copied().max().ok_or(GitLoomError::EmptyPlan)?;

        let mut base_index = deepest + 1;
        if verbs
            .get(&deepest)
            .is_some_and(|verb| verb.folds_into_previous())
        {
            base_index += 1;
        }

        if commits.len() <= base_index {
            return Err(GitLoomError::insufficient_history(
                base_index + 1,
                commits.len(),
            ));
        }

        let entries: Vec<PlanEntry> = commits[..base_index]
            .iter()
            .enumerate()
            .rev()
            .map(|(index, commit)| {
                let verb = verbs.get(&index).copied().unwrap_or(RewriteVerb::Pick);
                PlanEntry::new(verb, commit)
            })
            .collect();

        let plan = Self {
            entries,
            base_sha: commits[base_index].sha.clone(),
        };
        plan.validate_folds()?;
        Ok(plan)
    }

    /// Plan swapping the commit at `index` with the one beneath it.
    pub fn move_down(commits: &[Commit], index: usize) -> Result<Self> {
        // the swapped pair needs a base beneath it
        if commits.len() <= index + 2 {
            return Err(GitLoomError::InsufficientRoom { index });
        }

        let mut reordered: Vec<&Commit> = commits[..index].iter().collect();
        reordered.push(&commits[index + 1]);
        reordered.push(&commits[index]);

        Ok(Self {
            entries: reordered
                .into_iter()
                .rev()
                .map(|commit| PlanEntry::new(RewriteVerb::Pick, commit))
                .collect(),
            base_sha: commits[index + 2].sha.clone(),
        })
    }

    /// Plan replaying `commits` (newest first) on top of `HEAD`.
    pub fn cherry_pick(commits: &[Commit]) -> Self {
        Self {
            entries: commits
                .iter()
                .rev()
                .map(|commit| PlanEntry::new(RewriteVerb::Pick, commit))
                .collect(),
            base_sha: "HEAD".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize into the todo format, one line per entry, oldest first.
    pub fn to_todo(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{entry}\n"))
            .collect()
    }

    /// Parse todo text. Blank and `#` lines are ignored; anything else must be
    /// a well-formed entry.
    pub fn parse_todo(text: &str) -> Result<Vec<PlanEntry>> {
        text.lines()
            .filter(|line| is_todo_entry(line))
            .map(PlanEntry::parse)
            .collect()
    }

    fn validate_folds(&self) -> Result<()> {
        let mut has_target = false;
        for entry in &self.entries {
            if entry.verb.folds_into_previous() && !has_target {
                return Err(GitLoomError::FoldWithoutTarget {
                    sha: entry.sha.clone(),
                });
            }
            if entry.verb.keeps_commit() {
                has_target = true;
            }
        }
        Ok(())
    }
}

/// Whether a todo line names a commit (not blank, not a comment)
pub fn is_todo_entry(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(len: usize) -> Vec<Commit> {
        // newest first: c0 is HEAD
        (0..len)
            .map(|i| Commit::new(format!("{:07x}", 0xa000 + i), format!("commit {i}")))
            .collect()
    }

    fn verbs(plan: &RewritePlan) -> Vec<RewriteVerb> {
        plan.entries.iter().map(|e| e.verb).collect()
    }

    fn shas(plan: &RewritePlan) -> Vec<&str> {
        plan.entries.iter().map(|e| e.sha.as_str()).collect()
    }

    #[test]
    fn test_build_edit_is_oldest_first() {
        let commits = history(4);
        let plan = RewritePlan::build(&commits, 1, RewriteVerb::Edit).unwrap();

        assert_eq!(plan.base_sha, commits[2].sha);
        assert_eq!(shas(&plan), vec![commits[1].sha.as_str(), commits[0].sha.as_str()]);
        assert_eq!(verbs(&plan), vec![RewriteVerb::Edit, RewriteVerb::Pick]);
    }

    #[test]
    fn test_build_squash_needs_extra_commit() {
        let commits = history(3);
        let plan = RewritePlan::build(&commits, 0, RewriteVerb::Squash).unwrap();

        assert_eq!(plan.base_sha, commits[2].sha);
        assert_eq!(verbs(&plan), vec![RewriteVerb::Pick, RewriteVerb::Squash]);
    }

    #[test]
    fn test_build_squash_insufficient_history() {
        let idx = 1;
        let commits = history(idx + 2);
        let err = RewritePlan::build(&commits, idx, RewriteVerb::Squash).unwrap_err();
        assert!(matches!(
            err,
            GitLoomError::InsufficientHistory {
                required: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_build_cannot_reach_root() {
        let commits = history(2);
        let err = RewritePlan::build(&commits, 1, RewriteVerb::Drop).unwrap_err();
        assert!(matches!(err, GitLoomError::InsufficientHistory { .. }));
    }

    #[test]
    fn test_build_with_two_edits() {
        let commits = history(5);
        let plan = RewritePlan::build_with_actions(
            &commits,
            &[(2, RewriteVerb::Edit), (0, RewriteVerb::Edit)],
        )
        .unwrap();

        assert_eq!(plan.base_sha, commits[3].sha);
        assert_eq!(
            verbs(&plan),
            vec![RewriteVerb::Edit, RewriteVerb::Pick, RewriteVerb::Edit]
        );
    }

    #[test]
    fn test_fold_onto_dropped_commit_rejected() {
        let commits = history(4);
        let err = RewritePlan::build_with_actions(
            &commits,
            &[(0, RewriteVerb::Fixup), (1, RewriteVerb::Drop)],
        )
        .unwrap_err();
        assert!(matches!(err, GitLoomError::FoldWithoutTarget { .. }));
    }

    #[test]
    fn test_empty_actions_rejected() {
        let err = RewritePlan::build_with_actions(&history(3), &[]).unwrap_err();
        assert!(matches!(err, GitLoomError::EmptyPlan));
    }

    #[test]
    fn test_move_down_swaps_pair() {
        let commits = history(5);
        let plan = RewritePlan::move_down(&commits, 1).unwrap();

        assert_eq!(plan.base_sha, commits[3].sha);
        assert_eq!(
            shas(&plan),
            vec![
                commits[1].sha.as_str(),
                commits[2].sha.as_str(),
                commits[0].sha.as_str()
            ]
        );
        assert!(verbs(&plan).iter().all(|v| *v == RewriteVerb::Pick));
    }

    #[test]
    fn test_move_down_no_room() {
        let commits = history(3);
        for index in [1, 2, 5] {
            let err = RewritePlan::move_down(&commits, index).unwrap_err();
            assert!(matches!(err, GitLoomError::InsufficientRoom { .. }));
        }
        assert!(RewritePlan::move_down(&commits, 0).is_ok());
    }

    #[test]
    fn test_cherry_pick_plan() {
        let commits = history(2);
        let plan = RewritePlan::cherry_pick(&commits);
        assert_eq!(plan.base_sha, "HEAD");
        assert_eq!(shas(&plan), vec![commits[1].sha.as_str(), commits[0].sha.as_str()]);
    }

    #[test]
    fn test_todo_serialization_order() {
        let commits = vec![
            Commit::new("bbbbbbb", "newest"),
            Commit::new("aaaaaaa", "older"),
            Commit::new("9999999", "base"),
        ];
        let plan = RewritePlan::build(&commits, 1, RewriteVerb::Reword).unwrap();
        assert_eq!(plan.base_sha, "9999999");
        assert_eq!(
            plan.to_todo(),
            "reword aaaaaaa older\npick bbbbbbb newest\n"
        );
    }

    #[test]
    fn test_parse_todo_skips_comments() {
        let text = "pick aaaaaaa older\n\n# Rebase 9999999..bbbbbbb\nfixup bbbbbbb newer one\n";
        let entries = RewritePlan::parse_todo(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].verb, RewriteVerb::Fixup);
        assert_eq!(entries[1].subject, "newer one");
    }

    #[test]
    fn test_parse_todo_rejects_garbage() {
        for line in ["explode aaaaaaa subject", "pick", "pick not-a-sha subject"] {
            let err = RewritePlan::parse_todo(line).unwrap_err();
            assert!(matches!(err, GitLoomError::MalformedPlanLine { .. }), "{line}");
        }
    }

    #[test]
    fn test_todo_parse_inverts_serialization() {
        let commits = history(4);
        let plan = RewritePlan::build(&commits, 1, RewriteVerb::Fixup).unwrap();
        assert_eq!(RewritePlan::parse_todo(&plan.to_todo()).unwrap(), plan.entries);
    }

    #[test]
    fn test_verb_from_str() {
        assert_eq!("s".parse::<RewriteVerb>().unwrap(), RewriteVerb::Squash);
        assert_eq!("drop".parse::<RewriteVerb>().unwrap(), RewriteVerb::Drop);
        assert!("exec".parse::<RewriteVerb>().is_err());
    }
}
