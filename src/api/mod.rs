//! Typed hub API
//!
//! Thin wrappers over [`HubClient`](crate::HubClient): each operation is one
//! request (or one paginated traversal) with serde types for the bodies.
//! List operations honour the client's page budget.

mod access_tokens;
mod orgs;
mod repositories;

pub use access_tokens::{AccessToken, AccessTokenCreateParams, AccessTokenUpdateParams};
pub use orgs::{
    CustomRegistry, Org, OrgInvite, OrgInviteRequest, OrgInviteResponse, OrgInvitee, OrgMember,
    OrgRole, OrgSettingImageAccessManagement, OrgSettingRegistryAccessManagement, OrgTeam,
    OrgTeamMember, RestrictedImages, StandardRegistry, STANDARD_REGISTRY_DOCKER,
};
pub use repositories::{
    CreateRepositoryRequest, ImmutableTagsSettings, Permissions, RepoPermissionLevel, Repository,
    Tag, TagImage, TeamRepoPermission, UpdateRepositoryRequest, IMMUTABLE_TAG_RULES_SEPARATOR,
};
