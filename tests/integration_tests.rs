/// Integration tests for file-organizer
///
/// These tests run complete organization passes against temporary
/// directories and check the resulting tree.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Collision handling
/// 3. Skipped entries
/// 4. Fatal errors
/// 5. Dry-run and preview
/// 6. Configuration and filtering
use file_organizer::cli::{OrganizeCommand, OutputMode, RunOutcome, run_cli_with_config};
use file_organizer::config::OrganizerConfig;
use file_organizer::directory_walker::{DirectoryWalker, organize};
use file_organizer::report::RecordingReporter;
use file_organizer::{OrganizationStats, OrganizeError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary source directory with helpers to populate and inspect it.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name);
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Sorted names of the direct children of the directory.
    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn organize(&self) -> OrganizationStats {
        organize(self.path(), &mut RecordingReporter::default()).expect("organize should succeed")
    }
}

/// Writes `content` to a config file outside the source directory.
fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create config directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    (dir, path)
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_mixed_directory() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "notes", "archive.xyz"]);

    let stats = fixture.organize();

    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Images/photo.jpg");
    fixture.assert_file_exists("MISC/notes");
    fixture.assert_file_exists("xyz/archive.xyz");
    for name in ["report.pdf", "photo.jpg", "notes", "archive.xyz"] {
        fixture.assert_not_exists(name);
    }

    assert_eq!(stats.total_moved(), 4);
    assert!(stats.errors().is_empty());
    assert_eq!(fixture.entries(), vec!["Documents", "Images", "MISC", "xyz"]);
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let stats = fixture.organize();

    assert_eq!(stats.attempted(), 0);
    assert!(fixture.entries().is_empty(), "No folders should be created");
}

#[test]
fn test_uppercase_extensions_are_classified() {
    let fixture = TestFixture::new();
    fixture.create_files(&["SONG.MP3", "Clip.MoV", "Scan.TIFF"]);

    let stats = fixture.organize();

    fixture.assert_file_exists("Music/SONG.MP3");
    fixture.assert_file_exists("Videos/Clip.MoV");
    fixture.assert_file_exists("Images/Scan.TIFF");
    assert_eq!(stats.total_moved(), 3);
}

#[test]
fn test_uncategorized_folder_uses_lowercase_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&["image.ISO", "backup.tar.gz"]);

    fixture.organize();

    fixture.assert_file_exists("iso/image.ISO");
    fixture.assert_file_exists("gz/backup.tar.gz");
}

#[test]
fn test_organize_many_files() {
    let fixture = TestFixture::new();
    for i in 0..40 {
        let name = match i % 4 {
            0 => format!("doc_{}.docx", i),
            1 => format!("img_{}.webp", i),
            2 => format!("vid_{}.mkv", i),
            _ => format!("mus_{}.flac", i),
        };
        fixture.create_file(&name, "x");
    }

    let stats = fixture.organize();

    assert_eq!(stats.total_moved(), 40);
    for folder in ["Documents", "Images", "Videos", "Music"] {
        assert_eq!(stats.moved_to(folder), 10, "folder {}", folder);
    }
    assert_eq!(fixture.entries(), vec!["Documents", "Images", "Music", "Videos"]);
}

#[test]
fn test_second_run_finds_nothing_to_do() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.png"]);

    fixture.organize();
    let second = fixture.organize();

    assert_eq!(second.attempted(), 0);
    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("Images/b.png");
}

// ============================================================================
// Test Suite 2: Collisions
// ============================================================================

#[test]
fn test_collision_with_existing_destination() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/report.pdf", "already organized");
    fixture.create_file("report.pdf", "new copy");

    let stats = fixture.organize();

    assert_eq!(fixture.read("Documents/report.pdf"), "already organized");
    assert_eq!(fixture.read("Documents/report_1.pdf"), "new copy");
    fixture.assert_not_exists("report.pdf");
    assert_eq!(stats.moved_to("Documents"), 1);
}

#[test]
fn test_repeated_collisions_keep_counting() {
    let fixture = TestFixture::new();
    fixture.create_file("Images/photo.png", "0");
    fixture.create_file("Images/photo_1.png", "1");
    fixture.create_file("Images/photo_2.png", "2");
    fixture.create_file("photo.png", "3");

    fixture.organize();

    assert_eq!(fixture.read("Images/photo_3.png"), "3");
    assert_eq!(fixture.read("Images/photo.png"), "0");
}

#[test]
fn test_collision_without_extension() {
    let fixture = TestFixture::new();
    fixture.create_file("MISC/README", "old");
    fixture.create_file("README", "new");

    fixture.organize();

    assert_eq!(fixture.read("MISC/README"), "old");
    assert_eq!(fixture.read("MISC/README_1"), "new");
}

#[test]
fn test_renamed_moves_are_reported() {
    let fixture = TestFixture::new();
    fixture.create_file("Music/a.mp3", "old");
    fixture.create_file("a.mp3", "new");
    let mut reporter = RecordingReporter::default();

    organize(fixture.path(), &mut reporter).unwrap();

    assert_eq!(reporter.moved.len(), 1);
    assert!(reporter.moved[0].was_renamed());
    assert_eq!(reporter.moved[0].final_name, "a_1.mp3");
}

// ============================================================================
// Test Suite 3: Skipped Entries
// ============================================================================

#[test]
fn test_hidden_files_and_subdirectories_are_ignored() {
    let fixture = TestFixture::new();
    fixture.create_file(".env", "SECRET=1");
    fixture.create_subdir("sub");
    fixture.create_file("sub/inner.pdf", "nested");

    let stats = fixture.organize();

    assert_eq!(stats.total_moved(), 0);
    assert!(stats.errors().is_empty());
    fixture.assert_file_exists(".env");
    fixture.assert_file_exists("sub/inner.pdf");
    assert_eq!(fixture.entries(), vec![".env", "sub"]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_moved() {
    let fixture = TestFixture::new();
    fixture.create_file("target.txt", "x");
    std::os::unix::fs::symlink(fixture.path().join("target.txt"), fixture.path().join("link.txt"))
        .expect("Failed to create symlink");

    let stats = fixture.organize();

    assert_eq!(stats.total_moved(), 1);
    fixture.assert_file_exists("Documents/target.txt");
    assert!(fs::symlink_metadata(fixture.path().join("link.txt")).is_ok());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_organized() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let name = OsStr::from_bytes(b"caf\xe9.pdf");
    fs::write(fixture.path().join(name), "first").expect("Failed to write file");
    fs::create_dir(fixture.path().join("Documents")).expect("Failed to create Documents");
    fs::write(fixture.path().join("Documents").join(name), "existing").expect("Failed to write file");
    fixture.create_file("ok.pdf", "ok");

    let stats = fixture.organize();

    assert_eq!(stats.total_moved(), 2);
    assert!(stats.errors().is_empty());
    assert!(!fixture.path().join(name).exists());
    let renamed = fixture
        .path()
        .join("Documents")
        .join(OsStr::from_bytes(b"caf\xe9_1.pdf"));
    assert_eq!(fs::read_to_string(renamed).unwrap(), "first");
    fixture.assert_file_exists("Documents/ok.pdf");
}

// ============================================================================
// Test Suite 4: Fatal Errors
// ============================================================================

#[test]
fn test_missing_source_is_invalid() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let result = organize(&missing, &mut RecordingReporter::default());

    assert!(matches!(result, Err(OrganizeError::InvalidSource { .. })));
    assert!(fixture.entries().is_empty(), "Nothing should be created");
}

#[test]
fn test_file_as_source_is_invalid() {
    let fixture = TestFixture::new();
    fixture.create_file("plain.txt", "x");

    let result = organize(&fixture.path().join("plain.txt"), &mut RecordingReporter::default());

    assert!(matches!(result, Err(OrganizeError::InvalidSource { .. })));
    fixture.assert_file_exists("plain.txt");
}

#[test]
fn test_cli_reports_invalid_source() {
    let fixture = TestFixture::new();
    let (_config_dir, config) = write_config("");

    let result = run_cli_with_config(
        OrganizeCommand::Organize { confirm: false },
        &fixture.path().join("missing"),
        Some(&config),
        OutputMode::Human,
    );

    assert!(result.is_err());
    assert!(fixture.entries().is_empty());
}

// ============================================================================
// Test Suite 5: Dry Run
// ============================================================================

#[test]
fn test_dry_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.pdf", "c.png", "d"]);
    let (_config_dir, config) = write_config("");

    let outcome = run_cli_with_config(
        OrganizeCommand::DryRun,
        fixture.path(),
        Some(&config),
        OutputMode::Human,
    )
    .expect("dry run should succeed");

    let RunOutcome::Previewed(preview) = outcome else {
        panic!("expected a preview");
    };
    assert_eq!(preview.total_files(), 4);
    assert_eq!(preview.group("Documents").map(|g| g.files.len()), Some(2));
    assert_eq!(preview.group("MISC").map(|g| g.files.len()), Some(1));
    assert_eq!(fixture.entries(), vec!["a.pdf", "b.pdf", "c.png", "d"]);
}

#[test]
fn test_cli_organize_returns_stats() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.wav"]);
    let (_config_dir, config) = write_config("");

    let outcome = run_cli_with_config(
        OrganizeCommand::Organize { confirm: false },
        fixture.path(),
        Some(&config),
        OutputMode::Json,
    )
    .expect("organize should succeed");

    let RunOutcome::Completed(stats) = outcome else {
        panic!("expected completed run");
    };
    assert_eq!(stats.total_moved(), 2);
    fixture.assert_file_exists("Music/b.wav");
}

// ============================================================================
// Test Suite 6: Configuration and Filtering
// ============================================================================

#[test]
fn test_custom_category_table() {
    let fixture = TestFixture::new();
    fixture.create_files(&["main.rs", "photo.png", "notes"]);
    let (_config_dir, config) = write_config(
        r#"
        misc_folder = "Unsorted"

        [[categories]]
        name = "Code"
        extensions = [".rs", ".py"]
        "#,
    );

    run_cli_with_config(
        OrganizeCommand::Organize { confirm: false },
        fixture.path(),
        Some(&config),
        OutputMode::Human,
    )
    .expect("organize should succeed");

    fixture.assert_file_exists("Code/main.rs");
    fixture.assert_file_exists("png/photo.png");
    fixture.assert_file_exists("Unsorted/notes");
}

#[test]
fn test_excluded_files_stay_put() {
    let fixture = TestFixture::new();
    fixture.create_files(&["movie.mkv.part", "Thumbs.db", "keep.txt", "draft.tmp"]);
    let config = OrganizerConfig::from_toml(
        r#"
        [filters.exclude]
        filenames = ["Thumbs.db"]
        patterns = ["*.part"]
        extensions = ["tmp"]
        "#,
    )
    .unwrap()
    .compile()
    .unwrap();

    let stats = DirectoryWalker::new(&config.table, &config.filters)
        .organize(fixture.path(), &mut RecordingReporter::default())
        .unwrap();

    assert_eq!(stats.total_moved(), 1);
    fixture.assert_file_exists("Documents/keep.txt");
    fixture.assert_file_exists("movie.mkv.part");
    fixture.assert_file_exists("Thumbs.db");
    fixture.assert_file_exists("draft.tmp");
}

#[test]
fn test_hidden_files_can_be_enabled() {
    let fixture = TestFixture::new();
    fixture.create_file(".profile", "x");
    let config = OrganizerConfig::from_toml(
        r#"
        [filters]
        enable_hidden_files = true
        "#,
    )
    .unwrap()
    .compile()
    .unwrap();

    DirectoryWalker::new(&config.table, &config.filters)
        .organize(fixture.path(), &mut RecordingReporter::default())
        .unwrap();

    fixture.assert_file_exists("MISC/.profile");
}

#[test]
fn test_invalid_config_aborts_before_touching_files() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "x");
    let (_config_dir, config) = write_config(
        r#"
        [[categories]]
        name = "Docs"
        extensions = ["pdf"]
        "#,
    );

    let result = run_cli_with_config(
        OrganizeCommand::Organize { confirm: false },
        fixture.path(),
        Some(&config),
        OutputMode::Human,
    );

    assert!(result.is_err());
    fixture.assert_file_exists("a.pdf");
}
