use std::io;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use uuid::Uuid;

use raven_console::app::{Session, HELP_TEXT};
use raven_console::commands::{parse_input, Command, ParsedInput};
use raven_console::providers;
use raven_workspace::Workspace;
use session_store::SessionStore;

const WORKSPACES_DIR: &str = "workspaces";

fn main() -> io::Result<()> {
    let base_dir = std::env::current_dir()?;
    let store = SessionStore::new(session_store::sessions_root(&base_dir));

    let conversation = match store.load() {
        Ok(conversation) => conversation,
        Err(error) => {
            eprintln!("[WARN] failed to load previous session: {error}");
            Vec::new()
        }
    };

    let session_id = Uuid::new_v4().to_string();
    let provider = providers::provider_from_env(Some(&session_id)).map_err(io::Error::other)?;
    let profile = provider.profile();

    let workspaces_root = base_dir.join(WORKSPACES_DIR);
    let workspace =
        Workspace::open_or_create(&workspaces_root, None).map_err(io::Error::other)?;

    let mut session = Session::new(workspaces_root, workspace, store, provider, conversation);

    println!("{}", session.workspace_banner());
    println!(
        "raven :: {}/{} interactive console (session {session_id}; Ctrl+C or :exit to quit)",
        profile.provider_id, profile.model_id
    );
    println!("{HELP_TEXT}");

    let mut editor = DefaultEditor::new().map_err(io::Error::other)?;

    loop {
        let line = match editor.readline("You > ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("[exit]");
                break;
            }
            Err(error) => return Err(io::Error::other(error)),
        };

        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.trim());
        }

        let output = match parse_input(&line) {
            ParsedInput::Empty => continue,
            ParsedInput::Usage(usage) => vec![usage.to_string()],
            ParsedInput::Unknown(command) => vec![format!("[ERROR] unknown command: {command}")],
            ParsedInput::Chat(message) => session.handle_chat(&message),
            ParsedInput::Command(Command::Exit) => {
                println!("[exit]");
                break;
            }
            ParsedInput::Command(Command::Help) => vec![HELP_TEXT.to_string()],
            ParsedInput::Command(Command::New) => session.handle_new(),
            ParsedInput::Command(Command::Save) => session.handle_save(),
            ParsedInput::Command(Command::Load) => session.handle_load(),
            ParsedInput::Command(Command::Use { name }) => session.handle_use(name.as_deref()),
            ParsedInput::Command(Command::ReadFile { target }) => {
                session.handle_read_file(&target)
            }
            ParsedInput::Command(Command::WriteFile { dest }) => {
                match prompt_instruction(&mut editor, &dest) {
                    Some(instruction) => session.handle_write_file(&dest, &instruction),
                    None => vec!["[cancelled]".to_string()],
                }
            }
            ParsedInput::Command(Command::Ask) => match multiline_input(&mut editor) {
                Some(block) if !block.trim().is_empty() => session.handle_chat(&block),
                _ => vec!["[cancelled or empty]".to_string()],
            },
        };

        for line in output {
            println!("{line}");
        }
    }

    Ok(())
}

fn prompt_instruction(editor: &mut DefaultEditor, dest: &str) -> Option<String> {
    match editor.readline(&format!("(instruction for {dest}) > ")) {
        Ok(instruction) => Some(instruction.trim().to_string()),
        Err(_) => None,
    }
}

/// Collects lines until `:end` alone on a line. Ctrl+C cancels the block
/// without leaving the console.
fn multiline_input(editor: &mut DefaultEditor) -> Option<String> {
    println!("(multiline mode) paste your prompt. finish by typing ':end' on its own line.");
    let mut lines = Vec::new();

    loop {
        match editor.readline("") {
            Ok(line) => {
                if line.trim() == ":end" {
                    break;
                }
                lines.push(line);
            }
            Err(ReadlineError::Eof) => break,
            Err(_) => {
                println!("[cancelled]");
                return None;
            }
        }
    }

    Some(lines.join("\n"))
}
