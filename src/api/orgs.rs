//! Organizations: members, invites, teams and access settings

use crate::client::HubClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Registry id of the hub itself in registry access management
pub const STANDARD_REGISTRY_DOCKER: &str = "DockerHub";

/// An organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Org {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "orgname")]
    pub org_name: String,
    pub full_name: String,
    pub location: String,
    pub company: String,
    pub date_joined: Option<String>,
}

/// A team ("group") inside an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgTeam {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub member_count: i64,
}

/// A member of a team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgTeamMember {
    pub id: String,
    pub uuid: String,
    pub username: String,
    pub full_name: String,
    pub location: String,
    pub company: String,
    pub profile_url: String,
    pub date_joined: Option<String>,
    pub gravatar_url: String,
    pub gravatar_email: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub role: String,
    pub groups: Vec<String>,
    pub is_guest: bool,
    pub primary_email: String,
}

/// A member of an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgMember {
    pub id: String,
    pub username: String,
    pub email: String,
    /// `Owner`, `Member` or `Invitee`
    pub role: String,
    pub groups: Vec<String>,
    pub is_guest: bool,
    pub company: String,
    pub date_joined: Option<String>,
    pub full_name: String,
    pub gravatar_email: String,
    pub gravatar_url: String,
    pub location: String,
    pub profile_url: String,
    /// `User` or `Org`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Role parameter for invites and role changes
///
/// Sent lowercase even though the API reports roles capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Owner,
    Editor,
    Member,
}

impl OrgRole {
    /// Value as sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            OrgRole::Owner => "owner",
            OrgRole::Editor => "editor",
            OrgRole::Member => "member",
        }
    }
}

impl std::str::FromStr for OrgRole {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "member" => Ok(Self::Member),
            other => Err(crate::Error::invalid_argument(format!("unknown org role '{other}'"))),
        }
    }
}

/// A pending invitation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgInvite {
    pub id: String,
    pub inviter_username: String,
    pub invitee: String,
    pub team: String,
    pub org: String,
    pub role: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrgInvitesList {
    data: Vec<OrgInvite>,
}

/// Body for [`HubClient::invite_org_members`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgInviteRequest {
    pub org: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub invitees: Vec<String>,
    pub role: OrgRole,
    pub dry_run: bool,
}

/// Outcome of a bulk invite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgInviteResponse {
    pub invitees: Vec<OrgInvitee>,
}

/// Per-invitee result of a bulk invite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgInvitee {
    pub invitee: String,
    pub status: String,
    pub invite: OrgInvite,
}

/// Image access management settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgSettingImageAccessManagement {
    pub restricted_images: RestrictedImages,
}

/// Which public images members may pull
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictedImages {
    pub enabled: bool,
    pub allow_official_images: bool,
    pub allow_verified_publishers: bool,
}

/// Registry access management settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgSettingRegistryAccessManagement {
    pub enabled: bool,
    pub standard_registries: Vec<StandardRegistry>,
    pub custom_registries: Vec<CustomRegistry>,
}

/// A well-known registry entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardRegistry {
    pub id: String,
    pub allowed: bool,
}

/// A user-defined registry entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomRegistry {
    pub address: String,
    pub friendly_name: String,
    pub allowed: bool,
}

impl HubClient {
    /// Fetch an organization
    pub async fn get_org(&self, org: &str) -> Result<Org> {
        self.get(&format!("/orgs/{org}/")).await
    }

    // ------------------------------------------------------------------------
    // Members and invites
    // ------------------------------------------------------------------------

    /// List the members of an organization
    pub async fn list_org_members(&self, org: &str) -> Result<Vec<OrgMember>> {
        self.paginate(&format!("/orgs/{org}/members")).await
    }

    /// Change a member's role
    pub async fn update_org_member(&self, org: &str, username: &str, role: OrgRole) -> Result<()> {
        self.put_no_content(
            &format!("/orgs/{org}/members/{username}/"),
            &json!({ "role": role }),
        )
        .await
    }

    /// Remove a member from an organization
    pub async fn delete_org_member(&self, org: &str, username: &str) -> Result<()> {
        self.delete(&format!("/orgs/{org}/members/{username}/")).await
    }

    /// List pending invitations
    pub async fn list_org_invites(&self, org: &str) -> Result<Vec<OrgInvite>> {
        let list: OrgInvitesList = self.get(&format!("/orgs/{org}/invites")).await?;
        Ok(list.data)
    }

    /// Invite users (by username or email) to an organization
    pub async fn invite_org_members(&self, request: &OrgInviteRequest) -> Result<OrgInviteResponse> {
        self.post("/invites/bulk", request).await
    }

    /// Withdraw an invitation
    ///
    /// Removing an invitee that already accepted needs
    /// [`delete_org_member`](Self::delete_org_member) instead.
    pub async fn delete_org_invite(&self, invite_id: &str) -> Result<()> {
        self.delete(&format!("/invites/{invite_id}")).await
    }

    // ------------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------------

    /// Fetch a team
    pub async fn get_org_team(&self, org: &str, team: &str) -> Result<OrgTeam> {
        self.get(&format!("/orgs/{org}/groups/{team}/")).await
    }

    /// Create a team
    pub async fn create_org_team(&self, org: &str, team: &OrgTeam) -> Result<OrgTeam> {
        self.post(&format!("/orgs/{org}/groups/"), team).await
    }

    /// Rename a team or change its description
    pub async fn update_org_team(&self, org: &str, team_name: &str, team: &OrgTeam) -> Result<OrgTeam> {
        self.patch(&format!("/orgs/{org}/groups/{team_name}/"), team)
            .await
    }

    /// Delete a team
    pub async fn delete_org_team(&self, org: &str, team: &str) -> Result<()> {
        self.delete(&format!("/orgs/{org}/groups/{team}/")).await
    }

    /// List the members of a team
    pub async fn list_org_team_members(&self, org: &str, team: &str) -> Result<Vec<OrgTeamMember>> {
        self.paginate(&format!("/orgs/{org}/groups/{team}/members/"))
            .await
    }

    /// Add a user to a team
    pub async fn add_org_team_member(&self, org: &str, team: &str, username: &str) -> Result<()> {
        self.post_no_content(
            &format!("/orgs/{org}/groups/{team}/members/"),
            &json!({ "member": username }),
        )
        .await
    }

    /// Remove a user from a team
    pub async fn delete_org_team_member(&self, org: &str, team: &str, username: &str) -> Result<()> {
        self.delete(&format!("/orgs/{org}/groups/{team}/members/{username}"))
            .await
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Fetch image access management settings
    pub async fn get_image_access_management(&self, org: &str) -> Result<OrgSettingImageAccessManagement> {
        self.get(&format!("/orgs/{org}/settings/")).await
    }

    /// Replace image access management settings and return the stored state
    pub async fn set_image_access_management(
        &self,
        org: &str,
        settings: &OrgSettingImageAccessManagement,
    ) -> Result<OrgSettingImageAccessManagement> {
        self.put_no_content(&format!("/orgs/{org}/settings"), settings)
            .await?;
        self.get_image_access_management(org).await
    }

    /// Fetch registry access management settings
    pub async fn get_registry_access_management(
        &self,
        org: &str,
    ) -> Result<OrgSettingRegistryAccessManagement> {
        self.get(&format!("/orgs/{org}/settings/registry-access-management"))
            .await
    }

    /// Replace registry access management settings and return the stored state
    pub async fn set_registry_access_management(
        &self,
        org: &str,
        settings: &OrgSettingRegistryAccessManagement,
    ) -> Result<OrgSettingRegistryAccessManagement> {
        self.put_no_content(
            &format!("/orgs/{org}/settings/registry-access-management"),
            settings,
        )
        .await?;
        self.get_registry_access_management(org).await
    }
}
