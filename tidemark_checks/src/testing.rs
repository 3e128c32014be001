use tidemark_api::{LineKind, Message, Patch, PatchHunk};
use tidemark_check_api::{Check, CheckContext, CheckSettings, InMemoryWorkspace, MessageSink};

pub const BASE_OID: &str = "1111111111111111111111111111111111111111";

pub fn migration(version: &str, name: &str) -> Patch {
    Patch::added(
        format!("db/migrate/{version}_{name}.rb"),
        vec![PatchHunk::additions([
            format!("class {name} < ActiveRecord::Migration[7.0]"),
            "  def change".to_owned(),
            "  end".to_owned(),
            "end".to_owned(),
        ])],
    )
}

pub fn edit(path: &str, base_start: u32, lines: &[(LineKind, &str)]) -> Patch {
    let lines = lines
        .iter()
        .map(|(kind, text)| (*kind, (*text).to_owned()))
        .collect();
    Patch::modified(path, BASE_OID, vec![PatchHunk::new(base_start, base_start, lines)])
}

pub fn schema_file(version: &str) -> String {
    format!(
        "ActiveRecord::Schema[7.0].define(version: {version}) do\n  create_table \"users\" do |t|\n  end\nend\n"
    )
}

pub fn structure_file(versions: &[&str]) -> String {
    let entries: Vec<String> = versions.iter().map(|v| format!("('{v}')")).collect();
    format!(
        "SET search_path TO \"$user\", public;\n\nINSERT INTO \"schema_migrations\" (version) VALUES\n{};\n\n\n",
        entries.join(",\n")
    )
}

pub fn run(check: &dyn Check, patches: &[Patch], workspace: &InMemoryWorkspace) -> Vec<Message> {
    run_with(check, patches, workspace, &CheckSettings::default())
}

pub fn run_with(
    check: &dyn Check,
    patches: &[Patch],
    workspace: &InMemoryWorkspace,
    settings: &CheckSettings,
) -> Vec<Message> {
    let ctx = CheckContext::new(patches, workspace, settings);
    let mut sink = MessageSink::new(check.id());
    check.run(&ctx, &mut sink);
    sink.into_messages()
}

pub fn texts(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.text.as_str()).collect()
}
