use std::fs;
use std::future::Future;
use std::path::Path;

use regex::Regex;
use tempfile::TempDir;
use trellis_core::prelude::*;
use trellis_core::{ControllerEntry, LoadError};

struct UsersController;

impl Controller for UsersController {
    fn declare(d: &mut Declarer<'_>) {
        d.group(GroupDeclaration::new().name("users").prefix("/users"))
            .get("index", "/");
    }
}

struct PostsController;

impl Controller for PostsController {
    fn declare(d: &mut Declarer<'_>) {
        d.resource("posts").api_only();
    }
}

struct ReportsController;

impl Controller for ReportsController {
    fn declare(d: &mut Declarer<'_>) {
        d.get("daily", "/reports/daily").name("daily", "reports.daily");
    }
}

struct ConflictingController;

impl Controller for ConflictingController {
    fn declare(d: &mut Declarer<'_>) {
        d.resource("things").only(["index"]).except(["show"]);
    }
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn loader() -> StaticLoader {
    StaticLoader::new()
        .with::<UsersController>("users_controller.rs")
        .with::<PostsController>("blog/posts_controller.rs")
        .with::<ReportsController>("admin/reports/reports_controller.rs")
        .with::<ConflictingController>("conflicting_controller.rs")
}

fn sorted_names(table: &RouteTable) -> Vec<String> {
    let mut names: Vec<String> = table.routes().into_iter().filter_map(|r| r.name).collect();
    names.sort();
    names
}

#[tokio::test]
async fn boot_registers_controllers_from_nested_directories() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "users_controller.rs");
    touch(dir.path(), "blog/posts_controller.rs");
    touch(dir.path(), "admin/reports/reports_controller.rs");
    touch(dir.path(), "mod.rs");
    touch(dir.path(), "blog/helpers.rs");

    let mut table = RouteTable::new();
    let report = boot(&ScanConfig::new(dir.path()), &loader(), &mut table)
        .await
        .unwrap();

    assert_eq!(report.candidates, 3);
    assert_eq!(report.registrations.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(
        sorted_names(&table),
        vec![
            "posts.destroy",
            "posts.index",
            "posts.show",
            "posts.store",
            "posts.update",
            "reports.daily",
            "users.index",
        ]
    );
}

#[tokio::test]
async fn unregistered_file_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "users_controller.rs");
    touch(dir.path(), "orphan_controller.rs");
    touch(dir.path(), "blog/posts_controller.rs");

    let mut table = RouteTable::new();
    let report = boot(&ScanConfig::new(dir.path()), &loader(), &mut table)
        .await
        .unwrap();

    assert_eq!(report.registrations.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("orphan_controller.rs"));
    assert!(table.find_by_name("users.index").is_some());
    assert!(table.find_by_name("posts.index").is_some());
}

/// Fails to load any file whose name starts with `broken`.
struct FlakyLoader {
    inner: StaticLoader,
}

impl ControllerLoader for FlakyLoader {
    fn load<'a>(&'a self, path: &'a Path) -> impl Future<Output = Result<ControllerEntry, LoadError>> + Send + 'a {
        async move {
            tokio::task::yield_now().await;
            let name = path.file_name().unwrap().to_string_lossy();
            if name.starts_with("broken") {
                return Err(LoadError::Failed {
                    path: path.to_path_buf(),
                    message: "panicked while loading".into(),
                });
            }
            self.inner.load(path).await
        }
    }
}

#[tokio::test]
async fn failing_load_is_isolated_across_directories() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "broken_controller.rs");
    touch(dir.path(), "users_controller.rs");
    touch(dir.path(), "admin/broken_controller.rs");
    touch(dir.path(), "admin/reports/reports_controller.rs");

    let mut table = RouteTable::new();
    let report = boot(
        &ScanConfig::new(dir.path()),
        &FlakyLoader { inner: loader() },
        &mut table,
    )
    .await
    .unwrap();

    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| f.message.contains("panicked while loading")));
    assert_eq!(sorted_names(&table), vec!["reports.daily", "users.index"]);
}

#[tokio::test]
async fn registration_failure_is_reported_per_file() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "conflicting_controller.rs");
    touch(dir.path(), "users_controller.rs");

    let mut table = RouteTable::new();
    let report = boot(&ScanConfig::new(dir.path()), &loader(), &mut table)
        .await
        .unwrap();

    assert_eq!(report.registrations.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("already has a 'only' filter"));
    assert_eq!(sorted_names(&table), vec!["users.index"]);
}

#[tokio::test]
async fn override_pattern_replaces_suffix_rule() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "users_controller.rs");
    touch(dir.path(), "http_users.rs");

    let loader = StaticLoader::new().with::<UsersController>("http_users.rs");
    let config = ScanConfig::new(dir.path()).with_pattern(Regex::new(r"^http_.*\.rs$").unwrap());

    let mut table = RouteTable::new();
    let report = boot(&config, &loader, &mut table).await.unwrap();

    assert_eq!(report.registrations.len(), 1);
    assert!(report.failures.is_empty());
    assert_eq!(sorted_names(&table), vec!["users.index"]);
}

#[tokio::test]
async fn missing_root_aborts_boot() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let mut table = RouteTable::new();
    let err = boot(&ScanConfig::new(&missing), &loader(), &mut table)
        .await
        .unwrap_err();
    assert_eq!(err.root, missing);
    assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
}

#[tokio::test]
async fn rejected_resource_is_listed_in_report() {
    struct BadResourceController;

    impl Controller for BadResourceController {
        fn declare(d: &mut Declarer<'_>) {
            d.get("ping", "/ping").resource("");
        }
    }

    let dir = TempDir::new().unwrap();
    touch(dir.path(), "bad_controller.rs");
    let loader = StaticLoader::new().with::<BadResourceController>("bad_controller.rs");

    let mut table = RouteTable::new();
    let report = boot(&ScanConfig::new(dir.path()), &loader, &mut table)
        .await
        .unwrap();

    let failures: Vec<_> = report.resource_failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "BadResourceController");
    assert_eq!(table.len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_directory_is_not_followed() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "users_controller.rs");
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

    let mut table = RouteTable::new();
    let report = boot(&ScanConfig::new(dir.path()), &loader(), &mut table)
        .await
        .unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.registrations.len(), 1);
    assert_eq!(table.len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    touch(dir.path(), "users_controller.rs");
    touch(dir.path(), "locked/admin/reports/reports_controller.rs");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not apply to a privileged user.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut table = RouteTable::new();
    let result = boot(&ScanConfig::new(dir.path()), &loader(), &mut table).await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let report = result.unwrap();
    assert_eq!(report.registrations.len(), 1);
    assert!(report.failures.is_empty());
    assert_eq!(sorted_names(&table), vec!["users.index"]);
}
