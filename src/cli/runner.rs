//! CLI runner - executes commands

use crate::auth::{CredentialSource, EnvCredentials, TokenClaims};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::HubClient;
use crate::config::HubConfig;
use crate::error::{Result, ResultExt};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Effective configuration: file, then environment, then flags
    pub fn config(&self) -> Result<HubConfig> {
        let mut config =
            HubConfig::load(self.cli.config.as_deref()).context("Failed to load configuration")?;
        if let Some(host) = &self.cli.host {
            config.host.clone_from(host);
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.max_page_results = max_pages;
        }
        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.config()?;
        let source: Arc<dyn CredentialSource> = Arc::new(EnvCredentials::new());
        let client = config.build_client(Some(source)).await?;
        info!(host = %config.host, identity = %client.identity(), "Connected");

        match &self.cli.command {
            Commands::Whoami => self.whoami(&client).await,
            Commands::Repos { namespace } => {
                self.output(&client.list_repositories(namespace).await?)
            }
            Commands::Tags {
                namespace,
                repository,
            } => self.output(&client.list_repository_tags(namespace, repository).await?),
            Commands::Tokens => self.output(&client.list_access_tokens().await?),
            Commands::Members { org } => self.output(&client.list_org_members(org).await?),
            Commands::Teams { org, team } => {
                self.output(&client.list_org_team_members(org, team).await?)
            }
        }
    }

    async fn whoami(&self, client: &HubClient) -> Result<()> {
        let token = client.token_provider().ensure_token().await?;
        let claims = TokenClaims::decode(&token).ok();
        self.output(&json!({
            "identity": client.identity(),
            "base_url": client.base_url(),
            "expires_at": claims.and_then(|c| c.expires_at()),
        }))
    }

    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
