//! JSON command protocol for scripted and agent-driven edits.
//!
//! Every command runs against an `AppState` and answers with a
//! `CommandResponse`; store errors become `success: false` responses.

use serde::{Deserialize, Serialize};
use shared::{BlockUpdate, LandUpdate, NewBlock};

use crate::massing::{apply_template, MassingTemplate};
use crate::state::project::block_summary;
use crate::state::AppState;

/// A command against the live project
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ProjectCommand {
    /// Append a block
    AddBlock { block: NewBlock },
    /// Merge fields into a block
    UpdateBlock { id: String, update: BlockUpdate },
    /// Delete a block by ID
    RemoveBlock { id: String },
    /// Copy a block under a new ID
    DuplicateBlock { id: String },
    /// Merge land assumptions
    UpdateLand { update: LandUpdate },
    /// Set the project currency
    SetCurrency { code: String },
    /// Replace the project from a project document
    LoadProject { project: serde_json::Value },
    /// Generate podium + tower from the parcel (settings template unless given)
    ApplyTemplate {
        #[serde(default)]
        template: Option<MassingTemplate>,
    },
    /// Current metrics
    Metrics,
    /// List all blocks
    Inspect,
    /// Export the project as JSON
    ExportProject,
    /// Start a new default project
    Clear,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command.
pub fn execute_command(state: &mut AppState, cmd: ProjectCommand) -> CommandResponse {
    let project = &mut state.project;
    match cmd {
        ProjectCommand::AddBlock { block } => {
            let id = project.add_block(block);
            CommandResponse::ok_with_data(serde_json::json!({
                "id": id,
                "metrics": project.metrics(),
            }))
        }

        ProjectCommand::UpdateBlock { id, update } => match project.update_block(&id, update) {
            Ok(metrics) => CommandResponse::ok_with_data(serde_json::json!({ "metrics": metrics })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ProjectCommand::RemoveBlock { id } => match project.remove_block(&id) {
            Ok(metrics) => CommandResponse::ok_with_data(serde_json::json!({
                "removed": id,
                "metrics": metrics,
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ProjectCommand::DuplicateBlock { id } => match project.duplicate_block(&id) {
            Ok(copy) => CommandResponse::ok_with_data(serde_json::json!({
                "id": copy,
                "metrics": project.metrics(),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ProjectCommand::UpdateLand { update } => {
            let metrics = project.update_land(update);
            CommandResponse::ok_with_data(serde_json::json!({ "metrics": metrics }))
        }

        ProjectCommand::SetCurrency { code } => {
            project.set_currency(code);
            CommandResponse::ok()
        }

        ProjectCommand::LoadProject { project: data } => match project.load_project(data) {
            Ok(metrics) => CommandResponse::ok_with_data(serde_json::json!({
                "block_count": project.blocks().len(),
                "metrics": metrics,
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ProjectCommand::ApplyTemplate { template } => {
            let template = template.unwrap_or_else(|| state.settings.template.clone());
            match apply_template(&mut state.project, &state.geometry, &template) {
                Ok(ids) => CommandResponse::ok_with_data(serde_json::json!({
                    "ids": ids,
                    "metrics": state.project.metrics(),
                })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        ProjectCommand::Metrics => {
            CommandResponse::ok_with_data(serde_json::json!({ "metrics": project.metrics() }))
        }

        ProjectCommand::Inspect => {
            let blocks: Vec<serde_json::Value> = project
                .blocks()
                .iter()
                .map(|block| {
                    serde_json::json!({
                        "id": block.id,
                        "name": block.name,
                        "summary": block_summary(block),
                        "base_area": block.base_area,
                        "color": block.color,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "block_count": blocks.len(),
                "blocks": blocks,
                "currency": project.currency(),
            }))
        }

        ProjectCommand::ExportProject => match project.export_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "project_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        ProjectCommand::Clear => {
            project.reset();
            CommandResponse::ok()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(state: &mut AppState, json: &str) -> Result<CommandResponse, String> {
    let cmd: ProjectCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(state, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    state: &mut AppState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<ProjectCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(state, cmd))
        .collect())
}
