use predicates::prelude::*;
use std::fs;
use std::path::Path;
use assert_cmd::Command;
use tempfile::TempDir;

/// Binary with an empty config directory so user settings never leak in
fn renamer(config_home: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("file-renamer")?;
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    Ok(cmd)
}

fn answers(dir: &Path, rest: &[&str]) -> String {
    let mut input = format!("{}\n", dir.display());
    for line in rest {
        input.push_str(line);
        input.push('\n');
    }
    input
}

#[test]
fn backs_up_and_previews_new_names() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "alpha")?;
    fs::write(dir.path().join("b.txt"), "beta")?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3", "y"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Attempting to backup a.txt"))
        .stdout(predicate::str::contains("new file name is img_001_txt"))
        .stdout(predicate::str::contains("new file name is img_002_txt"))
        .stdout(predicate::str::contains("All files renamed successfully."));

    let backup = dir.path().join("FileRenamerBackup");
    assert_eq!(fs::read_to_string(backup.join("a.txt"))?, "alpha");
    assert_eq!(fs::read_to_string(backup.join("b.txt"))?, "beta");

    // Preview only: originals keep their names
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("img_001_txt").exists());
    Ok(())
}

#[test]
fn reprompts_on_invalid_input() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "a")?;

    let input = format!(
        "relative/dir\n{}\nbad*prefix\nimg\n<\n_\n99\n2\ny\n",
        dir.path().display()
    );

    renamer(config_home.path())?
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "That directory does not exist, please try again.",
        ))
        .stdout(predicate::str::contains("not allowed in filenames"))
        .stdout(predicate::str::contains("(10 or less)"))
        .stdout(predicate::str::contains("new file name is img_01_txt"));
    Ok(())
}

#[test]
fn directory_entries_are_reported_as_failures() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "a")?;
    fs::create_dir(dir.path().join("sub"))?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3", "y"]))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error with backup of sub - file not renamed.",
        ))
        .stdout(predicate::str::contains("1 of 2 files not renamed."))
        .stdout(predicate::str::ends_with(
            "The following files were not renamed:\n\nsub\n",
        ));

    assert!(dir.path().join("FileRenamerBackup").join("a.txt").exists());
    Ok(())
}

#[test]
fn second_run_lists_the_backup_folder() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "a")?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3", "y"]))
        .assert()
        .success();

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3", "y"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 files not renamed."))
        .stdout(predicate::str::contains("FileRenamerBackup\n"));
    Ok(())
}

#[test]
fn declining_creates_no_backup() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "a")?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3", "n"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Program aborted successfully."));

    assert!(!dir.path().join("FileRenamerBackup").exists());
    Ok(())
}

#[test]
fn apply_renames_files() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;
    fs::write(dir.path().join("only.jpg"), "pixels")?;

    renamer(config_home.path())?
        .arg("--apply")
        .write_stdin(answers(dir.path(), &["trip", "-", "4", "y"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed only.jpg to trip-0001-jpg"));

    assert_eq!(
        fs::read_to_string(dir.path().join("trip-0001-jpg"))?,
        "pixels"
    );
    assert!(!dir.path().join("only.jpg").exists());
    assert!(dir.path().join("FileRenamerBackup").join("only.jpg").exists());
    Ok(())
}

#[test]
fn closed_input_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img"]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input closed"));
    Ok(())
}

#[test]
fn empty_directory_exits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let dir = TempDir::new()?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "3"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to rename."));
    Ok(())
}

#[test]
fn dump_config_shows_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;

    renamer(config_home.path())?
        .arg("--dump-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_dir_name      = FileRenamerBackup"))
        .stdout(predicate::str::contains("not found, using defaults"));
    Ok(())
}

#[test]
fn config_file_changes_backup_folder() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let config_dir = config_home.path().join("file-renamer");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.ini"),
        "[file-renamer]\nbackup_dir_name = Originals\ncounter_start = 7\n",
    )?;

    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "a")?;

    renamer(config_home.path())?
        .write_stdin(answers(dir.path(), &["img", "_", "2", "y"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("new file name is img_07_txt"));

    assert!(dir.path().join("Originals").join("a.txt").exists());
    Ok(())
}

#[test]
fn invalid_config_exits_with_code_two() -> Result<(), Box<dyn std::error::Error>> {
    let config_home = TempDir::new()?;
    let config_dir = config_home.path().join("file-renamer");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.ini"),
        "[file-renamer]\nconfirm_threshold = lots\n",
    )?;

    renamer(config_home.path())?
        .arg("--dump-config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("confirm_threshold"))
        .stderr(predicate::str::contains("Suggestions:"));
    Ok(())
}
