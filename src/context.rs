//! Generation context handling for visionbake hooks.
//! The template renderer pipes a JSON payload to each hook's stdin containing
//! the template directory, the output directory and every substituted
//! configuration value. This module parses that payload and interprets the
//! boolean feature flags gating optional content.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// Feature flag gating the MLflow tracking assets.
pub const FLAG_MLFLOW: &str = "enable_mlflow_tracking";
/// Feature flag gating the automatic dependency install.
pub const FLAG_INSTALL_DEPS: &str = "install_dependencies";
/// Feature flag selecting CUDA as the default device.
pub const FLAG_USE_CUDA: &str = "use_cuda_default";
/// Feature flag gating the final configuration confirmation.
pub const FLAG_CONFIRM: &str = "confirm_configuration";

/// Flat mapping from option name to substituted value, in declaration order.
pub type GenerationContext = IndexMap<String, serde_json::Value>;

/// Payload written by the template renderer to the hook's stdin.
#[derive(Debug, Deserialize)]
pub struct HookPayload {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub context: GenerationContext,
}

impl HookPayload {
    /// Reads and parses the payload from a reader (normally stdin).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = String::new();
        reader.read_to_string(&mut buffer).map_err(Error::IoError)?;
        serde_json::from_str(buffer.trim()).map_err(Error::JsonError)
    }

    /// Returns whether the named feature flag is affirmative.
    pub fn flag(&self, name: &str) -> bool {
        self.context.get(name).is_some_and(is_affirmative)
    }
}

/// Interprets a substituted value as a yes/no feature flag.
///
/// Any string beginning with `y` (case-insensitive) is affirmative, matching
/// the convention of the template's prompts. JSON booleans map to their truth
/// value; everything else is negative.
pub fn is_affirmative(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => {
            s.trim_start().chars().next().is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
        }
        _ => false,
    }
}

/// Display category for the configuration confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Project,
    Training,
    Tracking,
    Tooling,
    Other,
}

impl Category {
    pub fn title(self) -> &'static str {
        match self {
            Category::Project => "Project",
            Category::Training => "Model & training",
            Category::Tracking => "Experiment tracking",
            Category::Tooling => "Tooling",
            Category::Other => "Other",
        }
    }

    fn of(key: &str) -> Self {
        match key {
            "project_name" | "project_slug" | "project_description" | "author_name"
            | "author_email" | "open_source_license" => Category::Project,
            "default_device" | "use_cuda_default" | "backbone" | "num_classes"
            | "image_size" => Category::Training,
            "enable_mlflow_tracking" | "mlflow_tracking_uri" => Category::Tracking,
            "install_dependencies" | "confirm_configuration" | "use_pre_commit" => {
                Category::Tooling
            }
            _ => Category::Other,
        }
    }
}

/// Buckets context values by display category, keeping declaration order
/// inside each bucket. Empty categories are omitted.
pub fn grouped_settings(
    context: &GenerationContext,
) -> Vec<(Category, Vec<(&str, String)>)> {
    let categories = [
        Category::Project,
        Category::Training,
        Category::Tracking,
        Category::Tooling,
        Category::Other,
    ];

    categories
        .into_iter()
        .filter_map(|category| {
            let entries: Vec<(&str, String)> = context
                .iter()
                .filter(|(key, _)| Category::of(key) == category)
                .map(|(key, value)| (key.as_str(), display_value(value)))
                .collect();
            if entries.is_empty() {
                None
            } else {
                Some((category, entries))
            }
        })
        .collect()
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative_string_prefixes() {
        assert!(is_affirmative(&serde_json::json!("y")));
        assert!(is_affirmative(&serde_json::json!("Yes")));
        assert!(is_affirmative(&serde_json::json!("yep")));
        assert!(!is_affirmative(&serde_json::json!("n")));
        assert!(!is_affirmative(&serde_json::json!("no")));
        assert!(!is_affirmative(&serde_json::json!("")));
        assert!(!is_affirmative(&serde_json::json!("true")));
    }

    #[test]
    fn test_is_affirmative_booleans() {
        assert!(is_affirmative(&serde_json::json!(true)));
        assert!(!is_affirmative(&serde_json::json!(false)));
        assert!(!is_affirmative(&serde_json::json!(42)));
    }

    #[test]
    fn test_grouped_settings_preserves_order() {
        let mut context = GenerationContext::new();
        context.insert("project_name".into(), serde_json::json!("demo"));
        context.insert("author_name".into(), serde_json::json!("Jo"));
        context.insert("enable_mlflow_tracking".into(), serde_json::json!("n"));
        context.insert("custom_key".into(), serde_json::json!(7));

        let groups = grouped_settings(&context);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Category::Project);
        assert_eq!(groups[0].1[0].0, "project_name");
        assert_eq!(groups[0].1[1].0, "author_name");
        assert_eq!(groups[1].0, Category::Tracking);
        assert_eq!(groups[2].0, Category::Other);
        assert_eq!(groups[2].1[0].1, "7");
    }
}
