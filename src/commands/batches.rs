//! # Batches Command Implementation
//!
//! Displays how the content packages of a feature are grouped into batches,
//! in the order their execution plans would run.
//!
//! This command is read-only: nothing is resolved or registered.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::borrow::Cow;
use std::path::PathBuf;

use content_plan::feature::{self, Feature};
use content_plan::phases::{ordering, Batch, OrderKey};

/// Show how the content packages of a feature are batched
#[derive(Args, Debug)]
pub struct BatchesArgs {
    /// Path to the feature manifest
    #[arg(short, long, value_name = "FILE")]
    pub feature: PathBuf,
}

/// Execute the `batches` command.
pub fn execute(args: BatchesArgs) -> Result<()> {
    let feature = feature::from_file(&args.feature).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load feature from {}: {}",
            args.feature.display(),
            e
        )
    })?;

    let tree = build_tree(&feature)?;
    print_tree(&tree).map_err(|e| anyhow::anyhow!("Failed to display batches: {}", e))?;
    Ok(())
}

fn build_tree(feature: &Feature) -> Result<TreeNode> {
    let batches = match feature.content_packages() {
        Some(extension) => ordering::execute(extension.artifacts.as_slice())?,
        None => Vec::new(),
    };

    Ok(TreeNode {
        label: feature.id.to_string(),
        children: batches.iter().map(batch_node).collect(),
    })
}

fn batch_node(batch: &Batch) -> TreeNode {
    let label = match batch.key {
        OrderKey::Explicit(order) => format!("start-order {}", order),
        OrderKey::Last => "unordered".to_string(),
    };
    TreeNode {
        label,
        children: batch
            .artifacts
            .iter()
            .map(|a| TreeNode {
                label: a.id.to_string(),
                children: Vec::new(),
            })
            .collect(),
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_missing_feature() {
        let result = execute(BatchesArgs {
            feature: PathBuf::from("/nonexistent/feature.yaml"),
        });
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to load feature"));
    }

    #[test]
    fn test_build_tree() {
        let feature = feature::parse(
            r#"
id: g:f:1
extensions:
  - name: content-packages
    type: artifacts
    artifacts:
      - g:late:1
      - id: g:early:1
        metadata:
          start-order: 1
"#,
        )
        .unwrap();

        let tree = build_tree(&feature).unwrap();
        assert_eq!(tree.label, "g:f:1");
        let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["start-order 1", "unordered"]);
        assert_eq!(tree.children[1].children[0].label, "g:late:1");
    }
}
