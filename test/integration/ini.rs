// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{CountingStore, FileFixture, InterruptedStore};

use anyhow::Result;
use dotedit::{EditError, EntryFormat, FileEditor, MalformedEntry, Status, StoreError};
use indoc::indoc;
use pretty_assertions::assert_eq;
use simple_test_case::test_case;

#[test]
fn set_ini_value_in_empty_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "")?;

    let outcome = FileEditor::local().set_ini_value(
        &path,
        "db",
        "host",
        "localhost",
        false,
        EntryFormat::Compact,
    )?;
    assert_eq!(outcome.status(), Status::Created);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=localhost");

    Ok(())
}

#[test]
fn set_ini_value_updates_in_place() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=localhost\nport=5432")?;

    let outcome = FileEditor::local().set_ini_value(
        &path,
        "db",
        "host",
        "127.0.0.1",
        false,
        EntryFormat::Compact,
    )?;
    assert_eq!(outcome.status(), Status::Updated);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=127.0.0.1\nport=5432");

    Ok(())
}

#[test]
fn set_ini_value_same_value_does_not_write() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=localhost\nport=5432")?;
    let editor = FileEditor::new(CountingStore::default());

    let outcome = editor.set_ini_value(
        &path,
        "db",
        "host",
        "localhost",
        false,
        EntryFormat::Compact,
    )?;
    assert_eq!(outcome.status(), Status::Unchanged);
    assert_eq!(editor.store().writes(), 0);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=localhost\nport=5432");

    Ok(())
}

#[test]
fn set_ini_value_twice_writes_once() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("gitconfig", indoc! {r#"
        [user]
            name = Jane Doe
        [core]
            editor = nano
    "#})?;
    let editor = FileEditor::new(CountingStore::default());

    let first = editor.set_ini_value(
        &path,
        "user",
        "email",
        "jane@doe.com",
        false,
        EntryFormat::Spaced,
    )?;
    let second = editor.set_ini_value(
        &path,
        "user",
        "email",
        "jane@doe.com",
        false,
        EntryFormat::Spaced,
    )?;
    assert_eq!(first.status(), Status::Created);
    assert_eq!(second.status(), Status::Unchanged);
    assert_eq!(editor.store().writes(), 1);
    assert_eq!(
        fixture.read("gitconfig")?,
        indoc! {r#"
            [user]
                name = Jane Doe
            email = jane@doe.com
            [core]
                editor = nano
        "#}
    );

    Ok(())
}

#[test]
fn set_ini_value_creates_missing_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path(".config/app/app.ini");

    let outcome = FileEditor::local().set_ini_value(
        &path,
        "db",
        "host",
        "localhost",
        false,
        EntryFormat::Spaced,
    )?;
    assert_eq!(outcome.status(), Status::Created);
    assert_eq!(fixture.read(".config/app/app.ini")?, "[db]\nhost = localhost\n");

    Ok(())
}

#[test]
fn set_ini_value_requires_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path("app.ini");

    let result = FileEditor::local().set_ini_value(
        &path,
        "db",
        "host",
        "localhost",
        true,
        EntryFormat::Compact,
    );
    assert!(matches!(result, Err(EditError::Store(StoreError::NotFound { .. }))));
    assert!(!path.exists());

    Ok(())
}

#[test]
fn set_ini_value_on_directory_fails() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path("");

    let result = FileEditor::local().set_ini_value(
        &path,
        "db",
        "host",
        "localhost",
        false,
        EntryFormat::Compact,
    );
    assert!(matches!(result, Err(EditError::Store(StoreError::NotAFile { .. }))));

    Ok(())
}

#[test]
fn set_ini_value_interrupted_write_keeps_original() -> Result<()> {
    let fixture = FileFixture::new()?;
    let original = "[db]\nhost=localhost\nport=5432\n";
    let path = fixture.write("app.ini", original)?;

    let editor = FileEditor::new(InterruptedStore::default());
    let result = editor.set_ini_value(
        &path,
        "db",
        "host",
        "db.internal.example.com",
        false,
        EntryFormat::Compact,
    );
    assert!(matches!(result, Err(EditError::Store(StoreError::Write { .. }))));
    assert_eq!(fixture.read("app.ini")?, original);

    Ok(())
}

#[test]
fn set_ini_value_leaves_other_sections_alone() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", indoc! {r#"
        [db]
        host=localhost
        port=5432

        [cache]
        host=localhost
        port=6379
    "#})?;
    let editor = FileEditor::local();

    editor.set_ini_value(&path, "cache", "port", "6380", false, EntryFormat::Compact)?;
    editor.set_ini_value(&path, "db", "user", "admin", false, EntryFormat::Compact)?;
    editor.remove_ini_value(&path, "cache", "host")?;
    assert_eq!(
        fixture.read("app.ini")?,
        indoc! {r#"
            [db]
            host=localhost
            port=5432
            user=admin

            [cache]
            port=6380
        "#}
    );

    Ok(())
}

#[test_case("db", "host", "localhost"; "plain value")]
#[test_case("db", "url", "postgres://u:p@h/db?sslmode=require"; "value with equal signs")]
#[test_case("", "editor", "vim"; "unnamed section")]
#[test_case("new section", "key", "a value with spaces"; "new section")]
#[test]
fn set_then_get_ini_value(section: &str, key: &str, value: &str) -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=example.org\n")?;
    let editor = FileEditor::local();

    editor.set_ini_value(&path, section, key, value, false, EntryFormat::Spaced)?;
    let result = editor.get_ini_value(&path, section, key, true, true)?;
    pretty_assertions::assert_eq!(result.as_deref(), Some(value));

    Ok(())
}

#[test]
fn get_ini_value_missing_policies() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=localhost\n")?;
    let missing = fixture.path("nope.ini");
    let editor = FileEditor::local();

    assert_eq!(editor.get_ini_value(&path, "db", "port", false, false)?, None);
    assert!(matches!(
        editor.get_ini_value(&path, "db", "port", false, true),
        Err(EditError::KeyNotFound { .. })
    ));
    assert_eq!(editor.get_ini_value(&missing, "db", "host", false, false)?, None);
    assert!(matches!(
        editor.get_ini_value(&missing, "db", "host", true, false),
        Err(EditError::Store(StoreError::NotFound { .. }))
    ));

    Ok(())
}

#[test]
fn remove_ini_value() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=localhost\nport=5432")?;
    let editor = FileEditor::local();

    let outcome = editor.remove_ini_value(&path, "db", "port")?;
    assert_eq!(outcome.status(), Status::Removed);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=localhost");

    let outcome = editor.remove_ini_value(&path, "db", "port")?;
    assert_eq!(outcome.status(), Status::Unchanged);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=localhost");

    Ok(())
}

#[test]
fn remove_ini_value_missing_file_fails() -> Result<()> {
    let fixture = FileFixture::new()?;
    let result = FileEditor::local().remove_ini_value(fixture.path("app.ini"), "db", "host");
    assert!(matches!(result, Err(EditError::Store(StoreError::NotFound { .. }))));

    Ok(())
}

#[test]
fn set_ini_value_padded_value_writes_once() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("app.ini", "[db]\nhost=a\n")?;
    let editor = FileEditor::new(CountingStore::default());

    let first = editor.set_ini_value(&path, "db", "host", " padded ", false, EntryFormat::Compact)?;
    let second = editor.set_ini_value(
        &path,
        "db",
        "host",
        " padded ",
        false,
        EntryFormat::Compact,
    )?;
    assert_eq!(first.status(), Status::Updated);
    assert_eq!(second.status(), Status::Unchanged);
    assert_eq!(editor.store().writes(), 1);
    assert_eq!(fixture.read("app.ini")?, "[db]\nhost=padded\n");

    Ok(())
}

#[test_case("db", "", "x"; "empty key")]
#[test_case("db", "a=b", "x"; "separator in key")]
#[test_case("db", "host", "a\nb"; "line break in value")]
#[test_case("d\nb", "host", "a"; "line break in section")]
#[test]
fn set_ini_value_rejects_malformed_entry(section: &str, key: &str, value: &str) -> Result<()> {
    let fixture = FileFixture::new()?;
    let original = "[db]\nhost=a\n";
    let path = fixture.write("app.ini", original)?;
    let editor = FileEditor::new(CountingStore::default());

    for _ in 0..3 {
        let result = editor.set_ini_value(&path, section, key, value, false, EntryFormat::Compact);
        assert!(matches!(result, Err(EditError::MalformedInput { .. })));
    }
    pretty_assertions::assert_eq!(editor.store().writes(), 0);
    pretty_assertions::assert_eq!(fixture.read("app.ini")?, original);

    Ok(())
}

#[test]
fn set_ini_value_rejects_malformed_entry_before_creating_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path("app.ini");

    let result = FileEditor::local().set_ini_value(
        &path,
        "db",
        "",
        "x",
        false,
        EntryFormat::Compact,
    );
    assert!(matches!(
        result,
        Err(EditError::MalformedInput {
            source: MalformedEntry::EmptyKey,
            ..
        })
    ));
    assert!(!path.exists());

    Ok(())
}

#[cfg(unix)]
#[test]
fn set_ini_value_failed_local_write_leaves_original_intact() -> Result<()> {
    use std::{
        fs::{read_dir, set_permissions, write, Permissions},
        os::unix::fs::{symlink, PermissionsExt},
    };

    let fixture = FileFixture::new()?;
    let original = "[db]\nhost=localhost\n";
    std::fs::create_dir(fixture.path("real"))?;
    let real = fixture.write("real/app.ini", original)?;
    let target = fixture.path("app.ini");
    symlink(&real, &target)?;

    // No temporary file can be created next to the real file.
    set_permissions(fixture.path("real"), Permissions::from_mode(0o555))?;
    if write(fixture.path("real/canary"), "").is_ok() {
        // Permission bits are not enforced for this user, e.g., root.
        set_permissions(fixture.path("real"), Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let result = FileEditor::local().set_ini_value(
        &target,
        "db",
        "host",
        "db.internal.example.com",
        false,
        EntryFormat::Compact,
    );
    let entries = read_dir(fixture.path("real"))?.count();
    set_permissions(fixture.path("real"), Permissions::from_mode(0o755))?;

    assert!(matches!(result, Err(EditError::Store(StoreError::Write { .. }))));
    assert_eq!(fixture.read("real/app.ini")?, original);
    assert_eq!(entries, 1);
    assert!(std::fs::symlink_metadata(&target)?.file_type().is_symlink());

    Ok(())
}

