//! Remediation content suppliers.
//!
//! - `builtin`: lessons compiled into the crate
//! - `yaml`: a directory of authored YAML lessons
//! - `layered`: precedence stack over several suppliers

pub mod builtin;
pub mod layered;
pub mod yaml;

pub use builtin::BuiltinContent;
pub use layered::LayeredContent;
pub use yaml::YamlContentDirectory;
