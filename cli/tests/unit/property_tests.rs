//! Property-based tests for selection, job validation and run-directory naming.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use imi_runner::domain::job::{check_launch_style, describe_job};
use imi_runner::domain::manifest::run_directory;
use imi_runner::domain::{
    ExecutionMode, InstanceDescriptor, InstanceState, JobConfigError, LaunchStyle,
    SelectionError, Session,
};

fn listing(n: usize) -> Vec<InstanceDescriptor> {
    (0..n)
        .map(|i| InstanceDescriptor {
            id: format!("i-{i:04}"),
            state: InstanceState::Running,
            address: Some(format!("host-{i}")),
            instance_type: "c5.9xlarge".to_string(),
            launched_at: None,
        })
        .collect()
}

fn config(run_name: &str, use_slurm: bool) -> String {
    format!("RunName: \"{run_name}\"\nUseSlurm: {use_slurm}\n")
}

// ============================================================================
// Instance selection
// ============================================================================

proptest! {
    /// Any in-range index selects exactly that instance.
    #[test]
    fn prop_in_range_selection_picks_that_instance(n in 1usize..20, pick in 0usize..20) {
        let index = pick % n;
        let instances = listing(n);
        let mut session = Session::new();
        let selected = session.select(&instances, index).expect("in range");
        prop_assert_eq!(&selected.id, &instances[index].id);
        prop_assert_eq!(&selected.address, &instances[index].address);
    }

    /// Out-of-range indices fail and leave the previous selection in place.
    #[test]
    fn prop_out_of_range_leaves_session_untouched(n in 1usize..20, extra in 0usize..20) {
        let instances = listing(n);
        let mut session = Session::new();
        session.select(&instances, 0).expect("first");
        let err = session.select(&instances, n + extra).expect_err("out of range");
        prop_assert_eq!(err, SelectionError::OutOfRange { index: n + extra, count: n });
        prop_assert_eq!(
            session.current().map(|s| s.id.clone()),
            Some(instances[0].id.clone())
        );
    }
}

#[test]
fn empty_listing_is_no_instances() {
    let err = Session::new().select(&[], 0).expect_err("empty");
    assert_eq!(err, SelectionError::NoInstances);
}

// ============================================================================
// Job validation
// ============================================================================

proptest! {
    /// A RunName differing from the file stem is always rejected.
    #[test]
    fn prop_name_mismatch_rejected(
        stem in "[a-zA-Z0-9_]{1,16}",
        declared in "[a-zA-Z0-9_]{1,16}",
        slurm in proptest::bool::ANY,
    ) {
        prop_assume!(stem != declared);
        let path = PathBuf::from(format!("{stem}.yml"));
        let err = describe_job(
            &path,
            &config(&declared, slurm),
            if slurm { LaunchStyle::Queued } else { LaunchStyle::Interactive },
            None,
        )
        .expect_err("mismatch");
        let is_mismatch = matches!(err, JobConfigError::NameMismatch { .. });
        prop_assert!(is_mismatch, "unexpected error: {err}");
    }

    /// A matching name with a compatible launch style is accepted.
    #[test]
    fn prop_matching_name_accepted(name in "[a-zA-Z0-9_]{1,16}", slurm in proptest::bool::ANY) {
        let path = PathBuf::from(format!("configs/{name}.yml"));
        let style = if slurm { LaunchStyle::Queued } else { LaunchStyle::Interactive };
        let job = describe_job(&path, &config(&name, slurm), style, None).expect("valid");
        prop_assert_eq!(job.name, name);
    }

    /// The declared mode and the launch style must agree.
    #[test]
    fn prop_mode_conflicts_rejected(slurm in proptest::bool::ANY, tmux in proptest::bool::ANY) {
        let mode = if slurm { ExecutionMode::Queued } else { ExecutionMode::Interactive };
        let result = check_launch_style(mode, LaunchStyle::from_tmux_flag(tmux));
        prop_assert_eq!(result.is_ok(), slurm != tmux);
    }
}

// ============================================================================
// Run-directory naming
// ============================================================================

proptest! {
    /// With k existing directories (run, run_1 .. run_{k-1}) the next is run_k,
    /// and the chosen path never collides.
    #[test]
    fn prop_suffix_is_first_free_slot(k in 0u64..30) {
        let root = Path::new("/data");
        let mut existing: HashSet<PathBuf> = HashSet::new();
        if k > 0 {
            existing.insert(root.join("run"));
        }
        for n in 1..k {
            existing.insert(root.join(format!("run_{n}")));
        }
        let chosen = run_directory(root, "run", false, |p| existing.contains(p));
        prop_assert!(!existing.contains(&chosen));
        let expected = if k == 0 { root.join("run") } else { root.join(format!("run_{k}")) };
        prop_assert_eq!(chosen, expected);
    }

    /// Overwrite always reuses the base directory.
    #[test]
    fn prop_overwrite_reuses_base(k in 0u64..10) {
        let root = Path::new("/data");
        let chosen = run_directory(root, "run", true, |_| k > 0);
        prop_assert_eq!(chosen, root.join("run"));
    }
}
