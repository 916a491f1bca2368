//! Repositories, tags and team repository permissions

use crate::client::HubClient;
use crate::error::Result;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Separator used when immutable tag rules are sent as one string
pub const IMMUTABLE_TAG_RULES_SEPARATOR: &str = ",";

/// A repository as returned by the hub
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<String>,
    pub is_private: bool,
    pub status: i64,
    pub status_description: String,
    pub description: String,
    pub star_count: i64,
    pub pull_count: i64,
    pub last_updated: Option<String>,
    pub date_registered: Option<String>,
    pub affiliation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,
    #[serde(rename = "use")]
    pub user: String,
    pub is_automated: bool,
    pub collaborator_count: i64,
    pub hub_user: String,
    pub has_starred: bool,
    pub full_description: Option<String>,
    pub permissions: Permissions,
    pub immutable_tags_settings: ImmutableTagsSettings,
}

impl Repository {
    /// `namespace/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Caller's permissions on a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub admin: bool,
}

/// Tag immutability configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmutableTagsSettings {
    pub enabled: bool,
    pub rules: Vec<String>,
}

/// A repository tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub full_size: i64,
    pub id: i64,
    pub repository: i64,
    pub creator: i64,
    pub last_updated: Option<String>,
    pub last_updater: i64,
    #[serde(rename = "last_updater_username")]
    pub last_updater_name: String,
    pub image_id: Option<String>,
    pub v2: bool,
    pub tag_status: String,
    pub tag_last_pulled: Option<String>,
    pub tag_last_pushed: Option<String>,
    pub media_type: String,
    pub content_type: String,
    pub digest: String,
    pub images: Vec<TagImage>,
}

/// One platform image behind a tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagImage {
    pub architecture: String,
    pub features: String,
    pub variant: Option<String>,
    pub digest: String,
    pub os: String,
    pub os_features: String,
    pub os_version: Option<String>,
    pub size: i64,
    pub status: String,
    pub last_pulled: Option<String>,
    pub last_pushed: Option<String>,
}

/// Body for [`HubClient::create_repository`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub description: String,
    pub full_description: String,
    pub registry: String,
    pub is_private: bool,
}

/// Body for [`HubClient::update_repository`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRepositoryRequest {
    pub description: String,
    pub full_description: String,
    pub immutable_tags: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immutable_tags_rules: Option<String>,
}

impl UpdateRepositoryRequest {
    /// Enable tag immutability with `rules`
    #[must_use]
    pub fn with_immutable_tags(mut self, rules: &[String]) -> Self {
        self.immutable_tags = true;
        self.immutable_tags_rules = Some(rules.join(IMMUTABLE_TAG_RULES_SEPARATOR));
        self
    }
}

/// Access level a team has on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoPermissionLevel {
    Read,
    Write,
    Admin,
}

impl RepoPermissionLevel {
    /// Value as sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            RepoPermissionLevel::Read => "read",
            RepoPermissionLevel::Write => "write",
            RepoPermissionLevel::Admin => "admin",
        }
    }
}

impl std::str::FromStr for RepoPermissionLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(crate::Error::invalid_argument(format!(
                "unknown permission level '{other}'"
            ))),
        }
    }
}

/// A team's permission on a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRepoPermission {
    #[serde(rename = "group_id")]
    pub team_id: i64,
    #[serde(rename = "group_name")]
    pub team_name: String,
    pub permission: String,
}

impl HubClient {
    /// Create a repository under `namespace`
    pub async fn create_repository(
        &self,
        namespace: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository> {
        self.post(&format!("/namespaces/{namespace}/repositories"), request)
            .await
    }

    /// Fetch a repository by `namespace/name`
    pub async fn get_repository(&self, id: &str) -> Result<Repository> {
        self.get(&format!("/repositories/{id}/")).await
    }

    /// Update a repository's descriptions and tag immutability
    pub async fn update_repository(
        &self,
        id: &str,
        request: &UpdateRepositoryRequest,
    ) -> Result<Repository> {
        self.patch(&format!("/repositories/{id}/"), request).await
    }

    /// Make a repository public or private
    pub async fn set_repository_privacy(&self, id: &str, is_private: bool) -> Result<()> {
        self.post_no_content(
            &format!("/repositories/{id}/privacy"),
            &json!({ "is_private": is_private }),
        )
        .await
    }

    /// Delete a repository
    pub async fn delete_repository(&self, id: &str) -> Result<()> {
        self.delete(&format!("/repositories/{id}/")).await
    }

    /// List the repositories of `namespace`
    pub async fn list_repositories(&self, namespace: &str) -> Result<Vec<Repository>> {
        self.paginate(&format!("/repositories/{namespace}/")).await
    }

    /// List the tags of a repository
    pub async fn list_repository_tags(&self, namespace: &str, name: &str) -> Result<Vec<Tag>> {
        self.paginate(&format!("/namespaces/{namespace}/repositories/{name}/tags"))
            .await
    }

    /// First page of a repository's tags, including the server-side count
    pub async fn repository_tags_page(&self, namespace: &str, name: &str) -> Result<Page<Tag>> {
        self.get(&format!("/namespaces/{namespace}/repositories/{name}/tags"))
            .await
    }

    /// Fetch one tag
    pub async fn get_repository_tag(
        &self,
        namespace: &str,
        repository: &str,
        tag: &str,
    ) -> Result<Tag> {
        self.get(&format!("/repositories/{namespace}/{repository}/tags/{tag}"))
            .await
    }

    /// Grant a team access to a repository
    pub async fn create_team_repo_permission(
        &self,
        repository: &str,
        team_id: i64,
        permission: RepoPermissionLevel,
    ) -> Result<TeamRepoPermission> {
        self.post(
            &format!("/repositories/{repository}/groups/"),
            &json!({ "group_id": team_id, "permission": permission }),
        )
        .await
    }

    /// Fetch a team's access to a repository
    pub async fn get_team_repo_permission(
        &self,
        repository: &str,
        team_id: i64,
    ) -> Result<TeamRepoPermission> {
        self.get(&format!("/repositories/{repository}/groups/{team_id}/"))
            .await
    }

    /// Change a team's access to a repository
    pub async fn update_team_repo_permission(
        &self,
        repository: &str,
        team_id: i64,
        permission: RepoPermissionLevel,
    ) -> Result<TeamRepoPermission> {
        self.patch(
            &format!("/repositories/{repository}/groups/{team_id}/"),
            &json!({ "permission": permission }),
        )
        .await
    }

    /// Revoke a team's access to a repository
    pub async fn delete_team_repo_permission(&self, repository: &str, team_id: i64) -> Result<()> {
        self.delete(&format!("/repositories/{repository}/groups/{team_id}/"))
            .await
    }
}
