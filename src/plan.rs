//! # Execution Plans
//!
//! An execution plan is the ordered list of extract tasks produced for one
//! batch. The repository initializer replays each plan exactly once at
//! system start.
//!
//! Plans are assembled through an `ExecutionPlanBuilder`, the per-batch
//! session object. The builder is seeded with the satisfied-package set that
//! enters the batch, accumulates tasks, validates them against the registry
//! and reports the preview of package ids that will be present once the plan
//! has run.
//!
//! `ExecutionPlan::to_xml` renders the plan document handed to the
//! initializer.

use crate::error::{Error, Result};
use crate::package::PackageId;
use crate::registry::PackageRegistry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Cursor;

/// The kind of work a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Extract,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Extract => "extract",
        }
    }
}

/// Import options attached to each extract task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub strict: bool,
    pub auto_save_threshold: i64,
    pub non_recursive: bool,
    pub dry_run: bool,
}

impl ImportOptions {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            strict: false,
            auto_save_threshold: -1,
            non_recursive: false,
            dry_run: false,
        }
    }
}

/// One step of an execution plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTask {
    pub package: PackageId,
    pub kind: TaskKind,
    pub options: ImportOptions,
}

/// An immutable, ordered list of tasks for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    tasks: Vec<PackageTask>,
}

impl ExecutionPlan {
    pub fn tasks(&self) -> &[PackageTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Package ids of the tasks, in plan order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.tasks.iter().map(|t| &t.package)
    }

    /// Render the plan document.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("executionPlan");
        root.push_attribute(("version", "1.0"));
        writer.write_event(Event::Start(root))?;

        for task in &self.tasks {
            let package = task.package.to_string();
            let mut element = BytesStart::new("task");
            element.push_attribute(("cmd", task.kind.as_str()));
            element.push_attribute(("packageId", package.as_str()));
            writer.write_event(Event::Start(element))?;

            let mut options = BytesStart::new("options");
            options.push_attribute(("type", "ImportOptions"));
            writer.write_event(Event::Start(options))?;
            write_text_element(&mut writer, "isStrict", &task.options.strict.to_string())?;
            write_text_element(
                &mut writer,
                "autoSaveThreshold",
                &task.options.auto_save_threshold.to_string(),
            )?;
            write_text_element(
                &mut writer,
                "nonRecursive",
                &task.options.non_recursive.to_string(),
            )?;
            write_text_element(&mut writer, "dryRun", &task.options.dry_run.to_string())?;
            writer.write_event(Event::End(BytesEnd::new("options")))?;

            writer.write_event(Event::End(BytesEnd::new("task")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("executionPlan")))?;

        let mut xml = String::from_utf8(writer.into_inner().into_inner()).map_err(|e| {
            Error::Serialization {
                message: format!("plan document is not valid UTF-8: {}", e),
            }
        })?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Session object accumulating the tasks of one batch
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlanBuilder {
    satisfied: BTreeSet<PackageId>,
    tasks: Vec<PackageTask>,
    planned: BTreeSet<PackageId>,
}

impl ExecutionPlanBuilder {
    /// Start a session for a batch entered with `satisfied` packages.
    pub fn new(satisfied: BTreeSet<PackageId>) -> Self {
        Self {
            satisfied,
            tasks: Vec::new(),
            planned: BTreeSet::new(),
        }
    }

    /// Packages satisfied before this batch.
    pub fn satisfied(&self) -> &BTreeSet<PackageId> {
        &self.satisfied
    }

    /// Whether a task for `id` was already added in this session.
    pub fn is_planned(&self, id: &PackageId) -> bool {
        self.planned.contains(id)
    }

    /// Append an extract task.
    ///
    /// Returns false, adding nothing, if the package is already planned.
    pub fn add_extract_task(&mut self, id: PackageId, options: ImportOptions) -> bool {
        if !self.planned.insert(id.clone()) {
            return false;
        }
        self.tasks.push(PackageTask {
            package: id,
            kind: TaskKind::Extract,
            options,
        });
        true
    }

    pub fn tasks(&self) -> &[PackageTask] {
        &self.tasks
    }

    /// Check referential integrity of the accumulated tasks.
    ///
    /// Every task must name a package the registry knows, and each of its
    /// dependencies must be satisfied before the batch, planned by an earlier
    /// task, or known to the registry.
    pub fn validate<R: PackageRegistry + ?Sized>(&self, registry: &R) -> Result<()> {
        let mut available: BTreeSet<&PackageId> = self.satisfied.iter().collect();
        for task in &self.tasks {
            if !registry.contains(&task.package) {
                return Err(Error::PlanValidationFailed {
                    package: task.package.to_string(),
                    message: "package is not registered".to_string(),
                });
            }
            for dependency in registry.dependencies(&task.package)? {
                if !available.contains(&dependency) && !registry.contains(&dependency) {
                    return Err(Error::PlanValidationFailed {
                        package: task.package.to_string(),
                        message: format!("dependency {} is not available", dependency),
                    });
                }
            }
            available.insert(&task.package);
        }
        Ok(())
    }

    /// Package ids present once the plan has run: the entering satisfied set
    /// plus every planned package.
    pub fn preview(&self) -> BTreeSet<PackageId> {
        self.satisfied
            .iter()
            .chain(self.tasks.iter().map(|t| &t.package))
            .cloned()
            .collect()
    }

    /// Finish the session.
    pub fn build(self) -> ExecutionPlan {
        ExecutionPlan { tasks: self.tasks }
    }
}
