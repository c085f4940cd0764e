//! The operation boundary for external CLI glue.
//!
//! Argument parsing, help text, connection bootstrap and exit codes live
//! outside this workspace. The glue hands us a live store and a [`Command`];
//! we hand back rendered text or the JSON export document.

use filegrant_core::UserSpec;
use filegrant_store::Store;

use crate::admin::{Admin, KeyOutcome, RevokeOutcome};
use crate::error::Result;

/// A requested administrative operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Grant read access for a user specifier to a file.
    AddGrant { user_spec: String, file_path: String },
    /// Revoke read access for a user specifier to a file.
    RevokeGrant { user_spec: String, file_path: String },
    /// Rotate the key for an existing user, or create the user by email.
    NewKey { user_spec: String },
    /// Human-readable listing of every grant.
    Print,
    /// The JSON authorization document.
    Export,
    /// Fill the store with the sample data set.
    Seed,
}

impl Command {
    /// Execute against an administration handle, producing output text.
    ///
    /// Unknown-subject failures surface as [`AdminError::UnknownUser`];
    /// non-fatal outcomes (duplicate add, missing revoke target) render
    /// into the text instead.
    ///
    /// [`AdminError::UnknownUser`]: crate::error::AdminError::UnknownUser
    pub async fn run<S: Store>(&self, admin: &Admin<S>) -> Result<String> {
        match self {
            Command::AddGrant {
                user_spec,
                file_path,
            } => run_add_grant(admin, user_spec, file_path).await,

            Command::RevokeGrant {
                user_spec,
                file_path,
            } => {
                let outcome = admin
                    .revoke_grant(&UserSpec::parse(user_spec), file_path)
                    .await?;

                Ok(match outcome {
                    RevokeOutcome::Revoked => "Successfully revoked grant".to_string(),
                    RevokeOutcome::NotGranted => "Error: failed to revoke grant".to_string(),
                })
            }

            Command::NewKey { user_spec } => {
                let outcome = admin.new_key(&UserSpec::parse(user_spec)).await?;

                Ok(match outcome {
                    KeyOutcome::Rotated(user) => format!(
                        "New key generated for user '{}'. New API Key: {}",
                        user.email, user.api_key
                    ),
                    KeyOutcome::Created(user) => format!(
                        "User '{}' added successfully. Generated API Key: {}",
                        user.email, user.api_key
                    ),
                })
            }

            Command::Print => admin.render_grants().await,

            Command::Export => Ok(admin.export().await?.to_json()?),

            Command::Seed => {
                let mut lines = Vec::new();
                for (spec, path) in [
                    ("bob@example.com", "test1.csv"),
                    ("alice@example.com", "test2.csv"),
                    ("all", "test3.csv"),
                ] {
                    let out = run_add_grant(admin, spec, path).await?;
                    if !out.is_empty() {
                        lines.push(out);
                    }
                }
                Ok(lines.join("\n"))
            }
        }
    }
}

async fn run_add_grant<S: Store>(
    admin: &Admin<S>,
    user_spec: &str,
    file_path: &str,
) -> Result<String> {
    let outcome = admin
        .add_grant(&UserSpec::parse(user_spec), file_path)
        .await?;

    let mut lines = Vec::new();
    if let Some(user) = &outcome.created_user {
        lines.push(format!(
            "User '{}' added successfully. Generated API Key: {}",
            user.email, user.api_key
        ));
    }
    if outcome.newly_granted {
        lines.push("Added grant".to_string());
    }
    Ok(lines.join("\n"))
}
