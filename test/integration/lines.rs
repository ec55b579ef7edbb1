// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{CountingStore, FileFixture};

use anyhow::Result;
use dotedit::{EditError, FileEditor, LineMatch, Status, StoreError};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn replace_lines_in_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("env", "a=1\nb=2\nc=3")?;

    let outcome = FileEditor::local().replace_lines_in_file(&path, "b=", "b=99", false)?;
    assert_eq!(outcome.status(), Status::Updated);
    assert_eq!(fixture.read("env")?, "a=1\nb=99\nc=3");

    Ok(())
}

#[test]
fn replace_lines_in_file_appends_without_match() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write("env", "a=1\nc=3")?;

    let outcome = FileEditor::local().replace_lines_in_file(&path, "b=", "b=99", true)?;
    assert_eq!(outcome.status(), Status::Updated);
    assert_eq!(fixture.read("env")?, "a=1\nc=3\nb=99");

    Ok(())
}

#[test]
fn replace_lines_in_file_is_idempotent() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.write(".profile", "export PATH=$HOME/bin:$PATH\n")?;
    let editor = FileEditor::new(CountingStore::default());

    let first = editor.replace_lines_in_file(&path, "export EDITOR=", "export EDITOR=vim", true)?;
    let second = editor.replace_lines_in_file(&path, "export EDITOR=", "export EDITOR=vim", true)?;
    assert_eq!(first.status(), Status::Updated);
    assert_eq!(second.status(), Status::Unchanged);
    assert_eq!(editor.store().writes(), 1);
    assert_eq!(
        fixture.read(".profile")?,
        "export PATH=$HOME/bin:$PATH\nexport EDITOR=vim\n"
    );

    Ok(())
}

#[test]
fn replace_lines_in_missing_file_fails() -> Result<()> {
    let fixture = FileFixture::new()?;
    let result = FileEditor::local().replace_lines_in_file(fixture.path("env"), "b=", "b=99", true);
    assert!(matches!(result, Err(EditError::Store(StoreError::NotFound { .. }))));
    assert!(!fixture.path("env").exists());

    Ok(())
}

#[test]
fn remove_lines_in_file_by_prefix_and_exact() -> Result<()> {
    let fixture = FileFixture::new()?;
    let content = indoc! {r#"
        alias ll='ls -l'
        alias l
        alias la='ls -a'
        set -o vi
    "#};
    let path = fixture.write(".bashrc", content)?;
    let editor = FileEditor::local();

    let outcome = editor.remove_lines_in_file(&path, "alias l", LineMatch::Exact)?;
    assert_eq!(outcome.status(), Status::Removed);
    assert_eq!(
        fixture.read(".bashrc")?,
        "alias ll='ls -l'\nalias la='ls -a'\nset -o vi\n"
    );

    let outcome = editor.remove_lines_in_file(&path, "alias l", LineMatch::Exact)?;
    assert_eq!(outcome.status(), Status::Unchanged);

    let outcome = editor.remove_lines_in_file(&path, "alias ", LineMatch::Prefix)?;
    assert_eq!(outcome.status(), Status::Removed);
    assert_eq!(fixture.read(".bashrc")?, "set -o vi\n");

    Ok(())
}

#[test]
fn append_if_absent() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path(".gitconfig");
    let block = "[include]\n    path = ~/.gitconfig.local";
    let editor = FileEditor::new(CountingStore::default());

    let outcome = editor.append_if_absent(&path, "[user]\n    name = Jane Doe\n")?;
    assert_eq!(outcome.status(), Status::Created);

    let outcome = editor.append_if_absent(&path, block)?;
    assert_eq!(outcome.status(), Status::Updated);

    let outcome = editor.append_if_absent(&path, block)?;
    assert_eq!(outcome.status(), Status::Unchanged);

    assert_eq!(editor.store().writes(), 2);
    assert_eq!(
        fixture.read(".gitconfig")?,
        indoc! {r#"
            [user]
                name = Jane Doe
            [include]
                path = ~/.gitconfig.local
        "#}
    );

    Ok(())
}

#[test]
fn copy_file_with_line_update() -> Result<()> {
    let fixture = FileFixture::new()?;
    let template = indoc! {r#"
        [user]
            name = Jane Doe
            email = <email>
    "#};
    let src = fixture.write("gitconfig.template", template)?;
    let dst = fixture.path(".gitconfig");
    let editor = FileEditor::local();
    let expect = indoc! {r#"
        [user]
            name = Jane Doe
            email = jane@doe.com
    "#};

    let outcome = editor.copy_file_with_line_update(
        &src,
        &dst,
        "    email = ",
        "    email = jane@doe.com",
        false,
    )?;
    assert_eq!(outcome.status(), Status::Created);
    assert_eq!(fixture.read(".gitconfig")?, expect);

    let outcome = editor.copy_file_with_line_update(
        &src,
        &dst,
        "    email = ",
        "    email = jane@doe.com",
        false,
    )?;
    assert_eq!(outcome.status(), Status::Unchanged);

    fixture.write(".gitconfig", "drifted\n")?;
    let outcome = editor.copy_file_with_line_update(
        &src,
        &dst,
        "    email = ",
        "    email = jane@doe.com",
        false,
    )?;
    assert_eq!(outcome.status(), Status::Updated);
    assert_eq!(fixture.read(".gitconfig")?, expect);
    assert_eq!(fixture.read("gitconfig.template")?, template);

    Ok(())
}

#[test]
fn copy_file_with_line_update_missing_source_fails() -> Result<()> {
    let fixture = FileFixture::new()?;
    let result = FileEditor::local().copy_file_with_line_update(
        fixture.path("template"),
        fixture.path("out"),
        "a=",
        "a=1",
        true,
    );
    assert!(matches!(result, Err(EditError::Store(StoreError::NotFound { .. }))));
    assert!(!fixture.path("out").exists());

    Ok(())
}

#[test]
fn write_text_file() -> Result<()> {
    let fixture = FileFixture::new()?;
    let path = fixture.path("motd");
    let editor = FileEditor::local();

    assert_eq!(editor.write_text_file(&path, "hello\n", false)?.status(), Status::Created);
    assert_eq!(editor.write_text_file(&path, "hello\n", false)?.status(), Status::Unchanged);
    assert_eq!(editor.write_text_file(&path, "bye\n", false)?.status(), Status::Unchanged);
    assert_eq!(fixture.read("motd")?, "hello\n");
    assert_eq!(editor.write_text_file(&path, "bye\n", true)?.status(), Status::Updated);
    assert_eq!(fixture.read("motd")?, "bye\n");

    Ok(())
}
