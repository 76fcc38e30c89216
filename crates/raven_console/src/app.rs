use std::path::{Path, PathBuf};
use std::sync::Arc;

use chat_provider::{ChatProvider, ChatRequest, Role, Turn};
use raven_workspace::{materialize_outcome, write_text, Materialized, Workspace, WorkspaceError};
use session_store::SessionStore;

pub const HELP_TEXT: &str = "\
Commands:
:new                 -> clear in-memory chat (start fresh)
:save                -> write the conversation to sessions/active_session.json
:load                -> load sessions/active_session.json into memory
:use <name?>         -> switch/create workspace under workspaces/<name>
:read_file <path>    -> inject file OR directory content from workspace into chat context
:write_file <path>   -> generate/overwrite a file in the workspace using the model
:ask                 -> multiline prompt mode. finish by typing :end on its own line
:help                -> show this help
:exit                -> quit";

/// One console session: the conversation, the active workspace, and the
/// stores/provider it talks to. Owned by the command loop, with no
/// ambient global state, so sessions can coexist in tests.
///
/// Every handler returns display lines; printing is the loop's job.
pub struct Session {
    conversation: Vec<Turn>,
    workspace: Workspace,
    workspaces_root: PathBuf,
    store: SessionStore,
    provider: Arc<dyn ChatProvider>,
}

impl Session {
    #[must_use]
    pub fn new(
        workspaces_root: PathBuf,
        workspace: Workspace,
        store: SessionStore,
        provider: Arc<dyn ChatProvider>,
        conversation: Vec<Turn>,
    ) -> Self {
        Self {
            conversation,
            workspace,
            workspaces_root,
            store,
            provider,
        }
    }

    #[must_use]
    pub fn conversation(&self) -> &[Turn] {
        &self.conversation
    }

    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    #[must_use]
    pub fn workspace_banner(&self) -> String {
        format!(
            "[workspace active] {} -> {}",
            self.workspace.name(),
            self.workspace.root().display()
        )
    }

    pub fn handle_new(&mut self) -> Vec<String> {
        self.conversation.clear();
        vec!["[chat cleared in memory]".to_string()]
    }

    pub fn handle_save(&self) -> Vec<String> {
        match self.store.save(&self.conversation) {
            Ok(()) => vec![format!(
                "[session saved -> {}]",
                self.store.document_path().display()
            )],
            Err(error) => vec![format!("[ERROR] failed to save session: {error}")],
        }
    }

    /// Replaces the in-memory conversation from the session document. On a
    /// load failure the current conversation is kept as-is.
    pub fn handle_load(&mut self) -> Vec<String> {
        match self.store.load() {
            Ok(conversation) => {
                self.conversation = conversation;
                vec![format!(
                    "[session loaded <- {}]",
                    self.store.document_path().display()
                )]
            }
            Err(error) => vec![format!("[ERROR] failed to load session: {error}")],
        }
    }

    pub fn handle_use(&mut self, name: Option<&str>) -> Vec<String> {
        match Workspace::open_or_create(&self.workspaces_root, name) {
            Ok(workspace) => {
                self.workspace = workspace;
                vec![self.workspace_banner()]
            }
            Err(error) => vec![format!("[ERROR] failed to switch workspace: {error}")],
        }
    }

    /// Normal chat: one completion over the current conversation. The
    /// exchange is recorded only after the provider succeeds, so a failed
    /// call leaves the conversation untouched.
    pub fn handle_chat(&mut self, message: &str) -> Vec<String> {
        let request = ChatRequest::new(self.conversation.clone(), message);
        let reply = match self.provider.complete(request) {
            Ok(reply) => reply,
            Err(error) => return vec![format!("[ERROR] model request failed: {error}")],
        };

        let mut lines = vec![format!("assistant > {reply}")];
        self.conversation.push(Turn::user(message));
        self.conversation.push(Turn::assistant(reply.clone()));
        lines.extend(self.log_turn(Role::User, message));
        lines.extend(self.log_turn(Role::Assistant, &reply));
        lines
    }

    /// Materializes a workspace file or directory into the conversation as a
    /// user turn. Marker outcomes (blocked, missing, skipped, read error)
    /// are echoed to the user as well as injected.
    pub fn handle_read_file(&mut self, target: &str) -> Vec<String> {
        let outcome = materialize_outcome(self.workspace.jail(), target);
        let is_marker = !matches!(
            outcome,
            Materialized::File { .. } | Materialized::Directory { .. }
        );
        let blob = outcome.render();

        let injected = format!("[PROJECT CONTEXT INJECTION from {target}]\n{blob}");
        self.conversation.push(Turn::user(injected.clone()));

        let mut lines = Vec::new();
        if is_marker {
            lines.push(blob);
        }
        lines.extend(self.log_turn(Role::User, &injected));
        lines.push("[context injected into chat history]".to_string());
        lines
    }

    /// Asks the model for the full body of `dest` and persists it through
    /// the jail. The containment check runs before the model call so an
    /// escaping destination never costs a request; a provider failure
    /// records nothing.
    pub fn handle_write_file(&mut self, dest: &str, instruction: &str) -> Vec<String> {
        if let Err(error) = self.workspace.jail().resolve_for_write(Path::new(dest)) {
            let result = render_write_error(&error);
            return self.record_write_exchange(dest, instruction, result);
        }

        let request_for_file = format!(
            "You are generating a source file for path `{dest}`.\n\
             Instruction:\n{instruction}\n\n\
             Return ONLY the complete file content to write. \
             Do not add explanations, headers, or markdown fences."
        );
        let content = match self
            .provider
            .complete(ChatRequest::new(self.conversation.clone(), request_for_file))
        {
            Ok(content) => content,
            Err(error) => return vec![format!("[ERROR] model request failed: {error}")],
        };

        let result = match write_text(self.workspace.jail(), Path::new(dest), &content) {
            Ok(receipt) => format!("[WROTE FILE] {dest} ({} chars)", receipt.chars_written),
            Err(error) => render_write_error(&error),
        };

        self.record_write_exchange(dest, instruction, result)
    }

    fn record_write_exchange(
        &mut self,
        dest: &str,
        instruction: &str,
        result: String,
    ) -> Vec<String> {
        let request_record = format!("[WRITE_FILE REQUEST] {dest}\n{instruction}");
        self.conversation.push(Turn::user(request_record.clone()));
        self.conversation.push(Turn::assistant(result.clone()));

        let mut lines = Vec::new();
        lines.extend(self.log_turn(Role::User, &request_record));
        lines.extend(self.log_turn(Role::Assistant, &result));
        lines.push(result);
        lines
    }

    /// Best-effort audit logging: a log failure becomes a warning line and
    /// never aborts the command that triggered it.
    fn log_turn(&self, role: Role, text: &str) -> Option<String> {
        match self.store.append_log(role, text) {
            Ok(()) => None,
            Err(error) => Some(format!("[WARN] daily log write failed: {error}")),
        }
    }
}

fn render_write_error(error: &WorkspaceError) -> String {
    if error.is_jail_violation() {
        "[SECURITY BLOCKED] target outside workspace.".to_string()
    } else {
        format!("[ERROR] failed to write file: {error}")
    }
}
