// File and directory tools: read, write, delete, and multi-file push.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::future::try_join_all;
use hubcap_github::api::git::{NewBlob, NewCommit, NewTree, TreeItem, UpdateRef};
use hubcap_github::api::repos::{Contents, CreateFileRequest, DeleteFileRequest};
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Decode base64 file content as sent by the contents endpoint (the payload
/// is newline-wrapped).
fn decode_base64_content(raw: &str) -> Result<String, ToolError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ToolError::Shape(format!("file content is not valid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| ToolError::Shape("decoded file content is not valid UTF-8".to_string()))
}

/// Tool to read a file or list a directory.
pub struct GetFileContentsTool {
    client: GithubClient,
    schema: Schema,
}

impl GetFileContentsTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("path", FieldKind::String, "File path within the repository")
            .optional(
                "ref",
                FieldKind::String,
                "Branch, tag, or commit SHA (default: repo default branch)",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetFileContentsArgs {
    owner: String,
    repo: String,
    path: String,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[async_trait::async_trait]
impl Tool for GetFileContentsTool {
    fn name(&self) -> &'static str {
        "get_file_contents"
    }

    fn description(&self) -> &'static str {
        "Get the contents of a file or directory from a GitHub repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetFileContentsArgs = parse_args(arguments)?;

        let contents = self
            .client
            .repos()
            .get_content(&args.owner, &args.repo, &args.path, args.reference.as_deref())
            .await?;

        match contents {
            Contents::Directory(entries) => Ok(Value::Array(
                entries
                    .into_iter()
                    .map(|entry| {
                        json!({
                            "name": entry.name,
                            "path": entry.path,
                            "type": entry.kind,
                            "size": entry.size,
                            "sha": entry.sha,
                            "url": entry.html_url,
                        })
                    })
                    .collect(),
            )),
            Contents::File(file) => {
                let content = match (file.encoding.as_deref(), file.content) {
                    (Some("base64"), Some(raw)) => decode_base64_content(&raw)?,
                    (_, raw) => raw.unwrap_or_default(),
                };
                Ok(json!({
                    "name": file.name,
                    "path": file.path,
                    "sha": file.sha,
                    "size": file.size,
                    "type": file.kind,
                    "encoding": file.encoding,
                    "content": content,
                    "url": file.html_url,
                }))
            }
        }
    }
}

/// Tool to create or replace a single file in one commit.
pub struct CreateOrUpdateFileTool {
    client: GithubClient,
    schema: Schema,
}

impl CreateOrUpdateFileTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("path", FieldKind::String, "File path within the repository")
            .required("message", FieldKind::String, "Commit message")
            .required(
                "content",
                FieldKind::String,
                "File content (plain text, will be base64-encoded)",
            )
            .optional(
                "branch",
                FieldKind::String,
                "Branch to commit to (default: repo default branch)",
            )
            .optional(
                "sha",
                FieldKind::String,
                "SHA of the file being replaced (required when updating)",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreateOrUpdateFileArgs {
    owner: String,
    repo: String,
    path: String,
    message: String,
    content: String,
    branch: Option<String>,
    sha: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateOrUpdateFileTool {
    fn name(&self) -> &'static str {
        "create_or_update_file"
    }

    fn description(&self) -> &'static str {
        "Create or update a single file and commit it to a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreateOrUpdateFileArgs = parse_args(arguments)?;

        let request = CreateFileRequest {
            message: args.message,
            content: BASE64.encode(args.content.as_bytes()),
            branch: args.branch,
            sha: args.sha,
        };
        let response = self
            .client
            .repos()
            .create_or_update_file(&args.owner, &args.repo, &args.path, &request)
            .await?;

        Ok(json!({
            "commit": {
                "sha": response.commit.sha,
                "message": response.commit.message,
                "url": response.commit.html_url,
            },
            "content": {
                "path": response.content.as_ref().and_then(|c| c.path.clone()),
                "sha": response.content.as_ref().and_then(|c| c.sha.clone()),
                "url": response.content.as_ref().and_then(|c| c.html_url.clone()),
            },
        }))
    }
}

/// Tool to push multiple files to a branch in a single commit.
pub struct PushFilesTool {
    client: GithubClient,
    schema: Schema,
}

impl PushFilesTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("branch", FieldKind::String, "Target branch")
            .required("message", FieldKind::String, "Commit message")
            .required(
                "files",
                FieldKind::Array(Box::new(FieldKind::Object(
                    Schema::new()
                        .required("path", FieldKind::String, "File path")
                        .required("content", FieldKind::String, "File content"),
                ))),
                "Array of files to push",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct PushFilesArgs {
    owner: String,
    repo: String,
    branch: String,
    message: String,
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    path: String,
    content: String,
}

#[async_trait::async_trait]
impl Tool for PushFilesTool {
    fn name(&self) -> &'static str {
        "push_files"
    }

    fn description(&self) -> &'static str {
        "Push multiple files in a single commit to a repository branch"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: PushFilesArgs = parse_args(arguments)?;
        let owner = args.owner.as_str();
        let repo = args.repo.as_str();

        // Stage 1: resolve the branch head and its tree.
        let branch = self
            .client
            .repos()
            .get_branch(owner, repo, &args.branch)
            .await?;
        let head_sha = branch.commit.sha;
        let base_tree_sha = branch.commit.commit.tree.sha;

        // Stage 2: one blob per file; independent, so fan out.
        let tree_items = try_join_all(args.files.iter().map(|file| async move {
            let blob = self
                .client
                .git()
                .create_blob(
                    owner,
                    repo,
                    &NewBlob {
                        content: BASE64.encode(file.content.as_bytes()),
                        encoding: "base64".to_string(),
                    },
                )
                .await?;
            Ok::<_, ToolError>(TreeItem::blob(file.path.clone(), blob.sha))
        }))
        .await?;

        // Stage 3: layer the new entries over the base tree.
        let tree = self
            .client
            .git()
            .create_tree(
                owner,
                repo,
                &NewTree {
                    base_tree: Some(base_tree_sha),
                    tree: tree_items,
                },
            )
            .await?;

        // Stage 4: commit pointing at the new tree with the old head as parent.
        let commit = self
            .client
            .git()
            .create_commit(
                owner,
                repo,
                &NewCommit {
                    message: args.message,
                    tree: tree.sha,
                    parents: vec![head_sha],
                },
            )
            .await?;

        // Stage 5: move the branch. Last on purpose: the only externally
        // visible mutation.
        self.client
            .git()
            .update_ref(
                owner,
                repo,
                &format!("heads/{}", args.branch),
                &UpdateRef {
                    sha: commit.sha.clone(),
                },
            )
            .await?;

        Ok(json!({
            "commit": {
                "sha": commit.sha,
                "message": commit.message,
                "url": commit.html_url,
            },
            "files_pushed": args.files.len(),
        }))
    }
}

/// Tool to delete a file in one commit.
pub struct DeleteFileTool {
    client: GithubClient,
    schema: Schema,
}

impl DeleteFileTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("path", FieldKind::String, "File path to delete")
            .required("message", FieldKind::String, "Commit message")
            .required("sha", FieldKind::String, "SHA of the file to delete")
            .optional("branch", FieldKind::String, "Branch to delete from");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteFileArgs {
    owner: String,
    repo: String,
    path: String,
    message: String,
    sha: String,
    branch: Option<String>,
}

#[async_trait::async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &'static str {
        "delete_file"
    }

    fn description(&self) -> &'static str {
        "Delete a file from a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: DeleteFileArgs = parse_args(arguments)?;

        let request = DeleteFileRequest {
            message: args.message,
            sha: args.sha,
            branch: args.branch,
        };
        let response = self
            .client
            .repos()
            .delete_file(&args.owner, &args.repo, &args.path, &request)
            .await?;

        Ok(json!({
            "commit": {
                "sha": response.commit.sha,
                "message": response.commit.message,
                "url": response.commit.html_url,
            },
        }))
    }
}

/// Tool to list entries at a path without fetching file bodies.
pub struct ListRepoContentsTool {
    client: GithubClient,
    schema: Schema,
}

impl ListRepoContentsTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .optional("path", FieldKind::String, "Directory path (default: root)")
            .optional("ref", FieldKind::String, "Branch, tag, or commit SHA");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListRepoContentsArgs {
    owner: String,
    repo: String,
    path: Option<String>,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListRepoContentsTool {
    fn name(&self) -> &'static str {
        "list_repo_contents"
    }

    fn description(&self) -> &'static str {
        "List files and directories at a path in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListRepoContentsArgs = parse_args(arguments)?;

        let contents = self
            .client
            .repos()
            .get_content(
                &args.owner,
                &args.repo,
                args.path.as_deref().unwrap_or(""),
                args.reference.as_deref(),
            )
            .await?;

        match contents {
            Contents::Directory(entries) => Ok(Value::Array(
                entries
                    .into_iter()
                    .map(|entry| {
                        json!({
                            "name": entry.name,
                            "path": entry.path,
                            "type": entry.kind,
                            "size": entry.size,
                            "sha": entry.sha,
                        })
                    })
                    .collect(),
            )),
            Contents::File(file) => Ok(json!({
                "name": file.name,
                "path": file.path,
                "type": file.kind,
                "size": file.size,
                "sha": file.sha,
            })),
        }
    }
}
