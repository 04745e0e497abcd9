// tests/router_scenarios.rs
mod common;
use crate::common::{eventually, go_workspace, with_timeout, Harness};

use std::path::PathBuf;
use std::time::Duration;

use goreload::watch::{FsEvent, FsOp};
use goreload_test_utils::builders::DaemonConfigBuilder;
use goreload_test_utils::fake_backend::BackendCall;

const BUILD: &str = "go build -o ws *.go";

#[tokio::test]
async fn initial_walk_registers_everything_but_git() {
    let fs = go_workspace();
    fs.add_file("/ws/pkg/util/util.go", "package util");
    let mut h = Harness::new(fs, DaemonConfigBuilder::new("/ws").build());

    assert_eq!(h.router.registry_mut().register_tree("/ws".as_ref()), 3);

    let mut added = h.notifier.added();
    added.sort();
    assert_eq!(
        added,
        vec![
            PathBuf::from("/ws"),
            PathBuf::from("/ws/pkg"),
            PathBuf::from("/ws/pkg/util"),
        ]
    );

    // Walking again registers nothing new.
    assert_eq!(h.router.registry_mut().register_tree("/ws".as_ref()), 0);
    assert_eq!(h.notifier.add_count("/ws"), 1);
}

#[tokio::test]
async fn source_created_inside_git_never_rebuilds() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());
    h.router.registry_mut().register_tree("/ws".as_ref());

    h.fs.add_file("/ws/.git/main.go", "package main");
    h.create("/ws/.git/main.go").await;
    h.write("/ws/.git/main.go").await;
    h.create("/ws/.git").await;

    assert_eq!(h.backend.build_count(), 0);
    assert!(h.notifier.added().iter().all(|p| !p.starts_with("/ws/.git")));
}

#[tokio::test]
async fn new_nested_directory_is_watched_and_rebuilds_once() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());
    h.router.registry_mut().register_tree("/ws".as_ref());

    // `mkdir sub && touch sub/new.go` arrives as a single Create for `sub`.
    h.fs.add_file("/ws/sub/new.go", "package sub");
    h.create("/ws/sub").await;
    assert_eq!(h.notifier.add_count("/ws/sub"), 1);

    // The file itself is not a directory; creating it is a no-op.
    h.create("/ws/sub/new.go").await;
    assert_eq!(h.notifier.added().len(), 2);

    h.write("/ws/sub/new.go").await;
    assert_eq!(h.backend.build_count(), 1);
    assert_eq!(h.backend.calls(), vec![BackendCall::Build(BUILD.to_string())]);
}

#[tokio::test]
async fn moved_in_tree_with_content_is_registered_completely() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());
    h.router.registry_mut().register_tree("/ws".as_ref());

    h.fs.add_file("/ws/lib/a/b/c.go", "package b");
    h.fs.add_dir("/ws/lib/d");
    h.create("/ws/lib").await;

    for dir in ["/ws/lib", "/ws/lib/a", "/ws/lib/a/b", "/ws/lib/d"] {
        assert_eq!(h.notifier.add_count(dir), 1, "{dir} should be watched once");
    }
}

#[tokio::test]
async fn remove_unregisters_exact_path_and_allows_recreate() {
    let fs = go_workspace();
    fs.add_dir("/ws/sub/inner");
    let mut h = Harness::new(fs, DaemonConfigBuilder::new("/ws").build());
    h.router.registry_mut().register_tree("/ws".as_ref());

    h.fs.remove("/ws/sub");
    h.remove("/ws/sub").await;
    assert_eq!(h.notifier.removed(), vec![PathBuf::from("/ws/sub")]);
    assert!(!h.router.registry().is_registered("/ws/sub/inner".as_ref()));

    h.fs.add_dir("/ws/sub/inner");
    h.create("/ws/sub").await;
    assert_eq!(h.notifier.add_count("/ws/sub"), 2);
    assert_eq!(h.notifier.add_count("/ws/sub/inner"), 2);
}

#[tokio::test]
async fn renamed_file_and_other_events_never_build() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());

    h.router
        .dispatch(FsEvent::new("/ws/main.go", FsOp::Rename))
        .await;
    h.router
        .dispatch(FsEvent::new("/ws/main.go", FsOp::Other))
        .await;

    assert!(h.backend.calls().is_empty());
    assert!(h.notifier.added().is_empty());
}

#[tokio::test]
async fn directory_recreated_after_rename_away_is_watched_again() {
    let fs = go_workspace();
    fs.add_dir("/ws/sub/inner");
    let mut h = Harness::new(fs, DaemonConfigBuilder::new("/ws").build());
    h.router.registry_mut().register_tree("/ws".as_ref());

    // `mv sub sub.old`
    h.fs.remove("/ws/sub");
    h.fs.add_dir("/ws/sub.old/inner");
    h.dispatch("/ws/sub", FsOp::Rename).await;
    h.create("/ws/sub.old").await;
    assert!(!h.router.registry().is_registered("/ws/sub".as_ref()));
    assert!(!h.router.registry().is_registered("/ws/sub/inner".as_ref()));

    // `mkdir -p sub/inner`
    h.fs.add_dir("/ws/sub/inner");
    h.create("/ws/sub").await;
    assert_eq!(h.notifier.add_count("/ws/sub"), 2);
    assert_eq!(h.notifier.add_count("/ws/sub/inner"), 2);

    h.fs.add_file("/ws/sub/x.go", "package sub");
    h.write("/ws/sub/x.go").await;
    assert_eq!(h.backend.build_count(), 1);
}

#[tokio::test]
async fn consecutive_writes_run_one_cycle_each_without_overlap() {
    let h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());
    h.backend.set_build_delay(Duration::from_millis(20));

    for _ in 0..5 {
        h.tx.send(FsEvent::new("/ws/main.go", FsOp::Write)).unwrap();
    }

    let Harness {
        mut router,
        tx,
        backend,
        ..
    } = h;
    drop(tx);
    with_timeout(router.run()).await;

    assert_eq!(backend.build_count(), 5);
    assert_eq!(backend.launch_count(), 5);
    assert_eq!(backend.max_concurrent_builds(), 1);
    assert_eq!(backend.terminated(), vec![1001, 1002, 1003, 1004]);
}

#[tokio::test]
async fn non_source_writes_complete_without_building() {
    let h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());

    for name in ["README.md", "go.mod", "main.go~", "notes.txt"] {
        for _ in 0..3 {
            h.tx
                .send(FsEvent::new(format!("/ws/{name}"), FsOp::Write))
                .unwrap();
        }
    }

    let Harness {
        mut router,
        tx,
        backend,
        ..
    } = h;
    drop(tx);
    with_timeout(router.run()).await;

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn old_group_is_terminated_before_next_build() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());

    h.write("/ws/main.go").await;
    assert_eq!(h.state.child.pid(), Some(1001));

    h.write("/ws/main.go").await;

    assert_eq!(
        h.backend.calls(),
        vec![
            BackendCall::Build(BUILD.to_string()),
            BackendCall::Launch("./ws".to_string()),
            BackendCall::TerminateGroup(1001),
            BackendCall::Build(BUILD.to_string()),
            BackendCall::Launch("./ws".to_string()),
        ]
    );
}

#[tokio::test]
async fn failed_build_does_not_hang_and_skips_relaunch_by_default() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());
    h.backend.fail_builds(true);

    h.write("/ws/main.go").await;
    h.write("/ws/main.go").await;

    assert_eq!(h.backend.build_count(), 2);
    assert_eq!(h.backend.launch_count(), 0);
    assert_eq!(h.state.child.pid(), None);
}

#[tokio::test]
async fn failed_build_relaunches_when_configured() {
    let config = DaemonConfigBuilder::new("/ws")
        .run("./ws")
        .relaunch_on_build_failure(true)
        .build();
    let mut h = Harness::new(go_workspace(), config);
    h.backend.fail_builds(true);

    h.write("/ws/main.go").await;

    assert_eq!(h.backend.launch_count(), 1);
    assert_eq!(h.state.child.pid(), Some(1001));
}

#[tokio::test]
async fn launch_failure_still_releases_the_slot() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./nope").build());
    h.backend.fail_launches(true);

    h.write("/ws/main.go").await;
    h.write("/ws/main.go").await;

    assert_eq!(h.backend.build_count(), 2);
    assert_eq!(h.backend.launch_count(), 2);
    assert_eq!(h.state.child.pid(), None);
}

#[tokio::test]
async fn no_run_command_only_builds() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());

    h.write("/ws/main.go").await;
    h.write("/ws/main.go").await;

    assert_eq!(
        h.backend.calls(),
        vec![
            BackendCall::Build(BUILD.to_string()),
            BackendCall::Build(BUILD.to_string()),
        ]
    );
}

#[tokio::test]
async fn child_exit_clears_the_record() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());

    h.write("/ws/main.go").await;
    assert_eq!(h.state.child.pid(), Some(1001));

    assert!(h.backend.exit_child(1001, 0));
    let state = h.state.clone();
    assert!(eventually(|| state.child.pid().is_none()).await);

    // Nothing left to terminate on the next cycle.
    h.write("/ws/main.go").await;
    assert!(h.backend.terminated().is_empty());
}

#[tokio::test]
async fn stale_exit_does_not_clear_the_new_child() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());

    h.write("/ws/main.go").await;
    h.write("/ws/main.go").await;

    // Let the first child's exit handler run.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.state.child.pid(), Some(1002));
}

#[tokio::test]
async fn rebuild_now_runs_a_cycle_without_an_event() {
    let mut h = Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").run("./ws").build());

    with_timeout(h.router.rebuild_now()).await;

    assert_eq!(h.backend.build_count(), 1);
    assert_eq!(h.state.child.pid(), Some(1001));
}

#[tokio::test]
async fn router_stops_when_channel_closes() {
    let Harness { mut router, tx, .. } =
        Harness::new(go_workspace(), DaemonConfigBuilder::new("/ws").build());
    drop(tx);

    with_timeout(router.run()).await;
}
