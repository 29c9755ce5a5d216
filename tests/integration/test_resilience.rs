//! Resilience tests: one bad entry never stops the rest of the snapshot

#[cfg(unix)]
mod tests {
    use crate::fixtures::{FIXED_TIMESTAMP, create_save_fixture, fixed_timestamp, options, read_archive};
    use ds3_backup::{EntryErrorKind, SnapshotFormat, run_snapshot_at};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// Make `path` unreadable; returns false when the process can read it anyway (root).
    fn lock_file(path: &Path) -> bool {
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
        fs::File::open(path).is_err()
    }

    #[test]
    fn test_unreadable_file_is_reported_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let source = create_save_fixture(temp_dir.path()).unwrap();
        let locked = source.join("0110000100000001/DS30000.sl2.bak");
        if !lock_file(&locked) {
            eprintln!("skipping: permissions are not enforced for this user");
            return;
        }

        for format in [SnapshotFormat::Directory, SnapshotFormat::Archive] {
            let out = temp_dir.path().join(format!("out-{format}"));
            let result = run_snapshot_at(&options(&source, &out, format), fixed_timestamp())
                .expect("snapshot should complete despite the locked file");

            assert!(!result.is_complete());
            assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
            let error = &result.errors[0];
            assert_eq!(error.path, "0110000100000001/DS30000.sl2.bak");
            assert_eq!(error.kind, EntryErrorKind::Read);
            assert_eq!(error.code, "EACCES");

            // everything else still made it
            assert_eq!(result.file_count(), 4);
            match format {
                SnapshotFormat::Directory => {
                    let snapshot = out.join(FIXED_TIMESTAMP);
                    assert!(snapshot.join("0110000100000001/DS30000.sl2").is_file());
                    assert!(snapshot.join("settings/nested/keys.txt").is_file());
                    assert!(!snapshot.join("0110000100000001/DS30000.sl2.bak").exists());
                }
                SnapshotFormat::Archive => {
                    let contents = read_archive(&out.join(format!("{FIXED_TIMESTAMP}.zip")));
                    assert_eq!(contents.files.len(), 4);
                    assert!(
                        contents
                            .files
                            .contains_key("20240101120000/settings/nested/keys.txt")
                    );
                }
            }
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_unreadable_directory_does_not_stop_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let source = create_save_fixture(temp_dir.path()).unwrap();
        let locked = source.join("settings");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("skipping: permissions are not enforced for this user");
            return;
        }

        let out = temp_dir.path().join("out");
        let result = run_snapshot_at(
            &options(&source, &out, SnapshotFormat::Directory),
            fixed_timestamp(),
        )
        .unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "settings");
        assert!(out.join(FIXED_TIMESTAMP).join("GraphicsConfig.xml").is_file());
        assert!(
            out.join(FIXED_TIMESTAMP)
                .join("0110000100000001/DS30000.sl2")
                .is_file()
        );
    }
}

#[test]
fn test_many_small_files() {
    use crate::fixtures::{collect_files, fixed_timestamp, options};
    use ds3_backup::{SnapshotFormat, run_snapshot_at};
    use tempfile::TempDir;

    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("many");
    std::fs::create_dir_all(&source).unwrap();
    for i in 0..50 {
        std::fs::write(source.join(format!("file{i}.txt")), format!("{i}")).unwrap();
    }

    let out = temp_dir.path().join("out");
    let result = run_snapshot_at(
        &options(&source, &out, SnapshotFormat::Directory),
        fixed_timestamp(),
    )
    .unwrap();

    assert_eq!(result.file_count(), 50);
    assert_eq!(
        collect_files(&out.join(crate::fixtures::FIXED_TIMESTAMP)),
        collect_files(&source)
    );
}

#[test]
fn test_blocked_target_is_a_write_error() {
    use crate::fixtures::{FIXED_TIMESTAMP, create_example_fixture, fixed_timestamp, options};
    use ds3_backup::{EntryErrorKind, SnapshotFormat, run_snapshot_at};
    use tempfile::TempDir;

    let temp_dir = TempDir::new().unwrap();
    let source = create_example_fixture(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("out");
    // a directory sitting where a.txt has to be written
    std::fs::create_dir_all(out.join(FIXED_TIMESTAMP).join("a.txt")).unwrap();

    let result = run_snapshot_at(
        &options(&source, &out, SnapshotFormat::Directory),
        fixed_timestamp(),
    )
    .unwrap();

    assert!(!result.is_complete());
    assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
    assert_eq!(result.errors[0].kind, EntryErrorKind::Write);
    assert_eq!(result.errors[0].path, "a.txt");

    assert_eq!(result.file_count(), 1);
    assert_eq!(
        std::fs::read(out.join(FIXED_TIMESTAMP).join("sub/b.txt")).unwrap(),
        b"world"
    );
    assert!(out.join(FIXED_TIMESTAMP).join("a.txt").is_dir());
}
