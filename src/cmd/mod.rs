/// Dependency list command.
pub mod deps;
/// Sidecar identity command.
pub mod guid;
/// Container summary command.
pub mod info;
/// Object table command.
pub mod objects;
/// Type tree listing command.
pub mod types;
