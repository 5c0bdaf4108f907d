// User lookup tool.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, Tool, ToolError};
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to look up a user, or the authenticated user when no username is
/// given.
pub struct GetUserTool {
    client: GithubClient,
    schema: Schema,
}

impl GetUserTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = Schema::new().optional(
            "username",
            FieldKind::String,
            "GitHub username (default: authenticated user)",
        );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetUserArgs {
    username: Option<String>,
}

#[async_trait::async_trait]
impl Tool for GetUserTool {
    fn name(&self) -> &'static str {
        "get_user"
    }

    fn description(&self) -> &'static str {
        "Get information about a GitHub user (or the authenticated user if no username given)"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetUserArgs = parse_args(arguments)?;

        match args.username {
            Some(username) => {
                let u = self.client.users().get_by_username(&username).await?;
                Ok(json!({
                    "login": u.login,
                    "name": u.name,
                    "bio": u.bio,
                    "company": u.company,
                    "location": u.location,
                    "public_repos": u.public_repos,
                    "followers": u.followers,
                    "following": u.following,
                    "url": u.html_url,
                }))
            }
            None => {
                let u = self.client.users().get_authenticated().await?;
                Ok(json!({
                    "login": u.login,
                    "name": u.name,
                    "bio": u.bio,
                    "company": u.company,
                    "location": u.location,
                    "public_repos": u.public_repos,
                    "private_repos": u.total_private_repos,
                    "followers": u.followers,
                    "following": u.following,
                    "url": u.html_url,
                }))
            }
        }
    }
}
