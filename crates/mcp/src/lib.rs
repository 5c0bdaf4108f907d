// MCP (Model Context Protocol) server exposing GitHub operations as tools
// to agent clients (Claude Code, etc.)

pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;

pub use server::McpServer;
