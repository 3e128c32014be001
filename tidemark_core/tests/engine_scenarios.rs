use tidemark_core::{
    CheckSettings, Engine, InMemoryWorkspace, LineKind, Message, Patch, PatchHunk, Severity,
};

const MIGRATION: &str = "db/migrate/20220919220000_add_x.rb";
const BASE_OID: &str = "2222222222222222222222222222222222222222";

fn migration() -> Patch {
    Patch::added(
        MIGRATION,
        vec![PatchHunk::additions([
            "class AddX < ActiveRecord::Migration[7.0]",
            "  def change",
            "    add_column :users, :x, :string",
            "  end",
            "end",
        ])],
    )
}

fn edit(path: &str, base_start: u32, lines: &[(LineKind, &str)]) -> Patch {
    let lines = lines
        .iter()
        .map(|(kind, text)| (*kind, (*text).to_owned()))
        .collect();
    Patch::modified(path, BASE_OID, vec![PatchHunk::new(base_start, base_start, lines)])
}

fn schema(version: &str) -> String {
    format!("ActiveRecord::Schema.define(version: {version}) do\nend\n")
}

fn structure(versions: &[&str]) -> String {
    let entries: Vec<String> = versions.iter().map(|v| format!("('{v}')")).collect();
    format!(
        "SET default_tablespace = '';\n\nINSERT INTO \"schema_migrations\" (version) VALUES\n{};\n\n\n",
        entries.join(",\n")
    )
}

fn run(patches: &[Patch], workspace: &InMemoryWorkspace) -> Vec<Message> {
    Engine::default().run(patches, workspace)
}

fn count(messages: &[Message], severity: Severity) -> usize {
    messages
        .iter()
        .filter(|message| message.severity == severity)
        .count()
}

#[test]
fn changes_without_migrations_stay_quiet() {
    let patches = vec![
        edit(
            "app/models/user.rb",
            3,
            &[
                (LineKind::Context, "class User < ApplicationRecord"),
                (LineKind::Addition, "  has_many :posts"),
                (LineKind::Context, "end"),
            ],
        ),
        Patch::added("README.md", vec![PatchHunk::additions(["# Project"])]),
    ];
    let workspace = InMemoryWorkspace::new()
        .with_file("db/schema.rb", schema("2022_09_19_210000"))
        .with_file("db/structure.sql", structure(&["20220101000000"]));

    assert!(run(&patches, &workspace).is_empty());
}

#[test]
fn migration_with_code_change_is_fatal_once() {
    let patches = vec![
        migration(),
        edit(
            "app/models/user.rb",
            1,
            &[
                (LineKind::Context, "class User < ApplicationRecord"),
                (LineKind::Addition, "  validates :x, presence: true"),
            ],
        ),
    ];

    let messages = run(&patches, &InMemoryWorkspace::new());
    assert_eq!(count(&messages, Severity::Fatal), 1);
    let fatal = messages
        .iter()
        .find(|message| message.severity == Severity::Fatal)
        .expect("fatal message");
    assert_eq!(fatal.path, MIGRATION);
    assert!(fatal.text.contains("app/models/user.rb"));
}

#[test]
fn annotation_edits_do_not_count_as_code() {
    let patches = vec![
        migration(),
        edit(
            "app/models/user.rb",
            1,
            &[
                (LineKind::Addition, "# == Schema Information"),
                (LineKind::Addition, "#  x :string"),
                (LineKind::Addition, ""),
                (LineKind::Context, "class User < ApplicationRecord"),
            ],
        ),
    ];

    let messages = run(&patches, &InMemoryWorkspace::new());
    assert_eq!(count(&messages, Severity::Fatal), 0);
}

#[test]
fn migration_newer_than_schema_is_flagged() {
    let patches = vec![
        migration(),
        edit(
            "db/schema.rb",
            1,
            &[
                (
                    LineKind::Deletion,
                    "ActiveRecord::Schema.define(version: 2022_09_19_200000) do",
                ),
                (
                    LineKind::Addition,
                    "ActiveRecord::Schema.define(version: 2022_09_19_210000) do",
                ),
            ],
        ),
    ];
    let workspace = InMemoryWorkspace::new().with_file("db/schema.rb", schema("2022_09_19_210000"));

    let messages = run(&patches, &workspace);
    let flagged: Vec<_> = messages
        .iter()
        .filter(|message| message.check == "schema-version-order")
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].path, MIGRATION);
    assert!(flagged[0].text.contains("20220919220000"));
    assert!(flagged[0].text.contains("20220919210000"));
}

#[test]
fn migration_older_than_schema_passes() {
    let patches = vec![
        migration(),
        edit(
            "db/schema.rb",
            1,
            &[
                (
                    LineKind::Deletion,
                    "ActiveRecord::Schema.define(version: 2022_09_19_200000) do",
                ),
                (
                    LineKind::Addition,
                    "ActiveRecord::Schema.define(version: 2023_01_01_000000) do",
                ),
            ],
        ),
    ];
    let workspace = InMemoryWorkspace::new().with_file("db/schema.rb", schema("2023_01_01_000000"));

    let messages = run(&patches, &workspace);
    assert!(messages
        .iter()
        .all(|message| message.check != "schema-version-order"));
}

#[test]
fn unrecorded_migration_is_missing_from_structure() {
    let patches = vec![migration()];
    let workspace = InMemoryWorkspace::new()
        .with_file("db/structure.sql", structure(&["20220101000000"]));

    let messages = run(&patches, &workspace);
    let missing: Vec<_> = messages
        .iter()
        .filter(|message| message.text.contains("missing from structure file"))
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::Error);
    assert!(missing[0].text.contains("20220919220000"));
}

#[test]
fn lone_migration_needs_regenerated_snapshots() {
    let patches = vec![migration()];
    let workspace = InMemoryWorkspace::new()
        .with_file("db/schema.rb", schema("2022_09_19_220000"))
        .with_file(
            "db/structure.sql",
            structure(&["20220101000000", "20220919220000"]),
        );

    let messages = run(&patches, &workspace);
    assert_eq!(count(&messages, Severity::Fatal), 0);

    let schema_error = messages
        .iter()
        .find(|message| message.text.starts_with("migration present but schema not updated"))
        .expect("schema message");
    assert_eq!(schema_error.severity, Severity::Error);

    let structure_warning = messages
        .iter()
        .find(|message| {
            message
                .text
                .starts_with("migration present but structure file not updated")
        })
        .expect("structure message");
    assert_eq!(structure_warning.severity, Severity::Warning);
}

#[test]
fn recorded_migration_is_clean() {
    let patches = vec![
        migration(),
        edit(
            "db/structure.sql",
            4,
            &[
                (LineKind::Context, "('20220101000000'),"),
                (LineKind::Addition, "('20220919220000'),"),
                (LineKind::Context, "('20221001000000');"),
                (LineKind::Context, ""),
                (LineKind::Context, ""),
            ],
        ),
    ];
    let workspace = InMemoryWorkspace::new().with_file(
        "db/structure.sql",
        structure(&["20220101000000", "20220919220000", "20221001000000"]),
    );

    let messages = run(&patches, &workspace);
    assert!(messages.is_empty(), "unexpected messages: {messages:?}");
}

#[test]
fn schema_diff_over_threshold_warns_once() {
    let lines: Vec<String> = (0..250).map(|n| format!("  add_index :t{n}, :x")).collect();
    let patches = vec![Patch::modified(
        "db/schema.rb",
        BASE_OID,
        vec![PatchHunk::additions(lines)],
    )];
    let settings = CheckSettings {
        large_diff_threshold: Some(200),
        ..CheckSettings::default()
    };

    let messages = Engine::new(settings).run(&patches, &InMemoryWorkspace::new());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Warning);
    assert!(messages[0].text.starts_with("large schema diff"));
}

#[test]
fn sorted_structure_never_reports_order() {
    let sorted = structure(&["20220101000000", "20220601000000", "20220919220000"]);
    let with_patch = vec![
        migration(),
        edit(
            "db/structure.sql",
            5,
            &[
                (LineKind::Deletion, "('20220601000000');"),
                (LineKind::Addition, "('20220601000000'),"),
                (LineKind::Addition, "('20220919220000');"),
            ],
        ),
    ];
    let workspace = InMemoryWorkspace::new().with_file("db/structure.sql", sorted);
    let untouched: &[Patch] = &[];

    for patches in [&with_patch[..], &with_patch[..1], untouched] {
        let messages = run(patches, &workspace);
        assert!(messages
            .iter()
            .all(|message| message.check != "structure-sort-order"));
    }
}
