use async_trait::async_trait;
use nowplaying_common::NotificationPayload;
use std::path::PathBuf;
use tokio::process::Command;

use super::{AuthorizationError, DeliveryError, NotificationSink};

/// Sink that runs a `notify-send` compatible program per notification:
///
/// `<program> --app-name <app> [--icon <artwork>] -- <title> <body>`
pub struct CommandSink {
    program: String,
    app_name: String,
}

impl CommandSink {
    pub fn new(program: &str, app_name: &str) -> Self {
        Self {
            program: program.to_string(),
            app_name: app_name.to_string(),
        }
    }

    fn resolve_program(&self) -> Result<PathBuf, which::Error> {
        which::which(&self.program)
    }

    fn args(&self, payload: &NotificationPayload) -> Vec<String> {
        let mut args = vec!["--app-name".to_string(), self.app_name.clone()];
        if let Some(path) = &payload.attachment_path {
            args.push("--icon".to_string());
            args.push(path.display().to_string());
        }
        args.push("--".to_string());
        args.push(payload.title.clone());
        args.push(payload.body.clone());
        args
    }
}

#[async_trait]
impl NotificationSink for CommandSink {
    fn name(&self) -> &'static str {
        "command"
    }

    /// Granted when the notifier program can be found.
    async fn authorize(&self) -> Result<(), AuthorizationError> {
        let path = self
            .resolve_program()
            .map_err(|e| AuthorizationError::Failed(format!("{}: {}", self.program, e)))?;
        tracing::debug!("Using notifier at {:?}", path);
        Ok(())
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), DeliveryError> {
        let args = self.args(payload);
        tracing::debug!("Executing notifier: {} {:?}", self.program, args);

        let output = Command::new(&self.program).args(&args).output().await?;

        if !output.status.success() {
            return Err(DeliveryError::Rejected {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
