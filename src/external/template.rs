//! Vehicle template substitution
//!
//! Vehicle templates are delimited text with a `Description,Value` header.
//! Writing a candidate copies the template to the simulator's vehicle input
//! file with the drag and lift rows replaced. Fields are split on commas with
//! no quoting.

use std::path::{Path, PathBuf};

use super::VehicleConfigStore;
use crate::record::CoefficientPair;
use crate::{Error, Result};

/// Row and column names used to locate the coefficients in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    /// Header of the column holding row descriptions
    pub description_column: String,
    /// Header of the column holding values
    pub value_column: String,
    /// Description of the drag coefficient row
    pub drag_row: String,
    /// Description of the lift coefficient row
    pub lift_row: String,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            description_column: "Description".to_string(),
            value_column: "Value".to_string(),
            drag_row: "Drag Coefficient CD".to_string(),
            lift_row: "Lift Coefficient CL".to_string(),
        }
    }
}

/// Writes candidates into the simulator's vehicle file from a template directory.
#[derive(Debug, Clone)]
pub struct TemplateConfigStore {
    templates_dir: PathBuf,
    target: PathBuf,
    layout: TemplateLayout,
}

impl TemplateConfigStore {
    /// Store reading templates from `templates_dir` and writing `target`.
    #[must_use]
    pub fn new(templates_dir: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            target: target.into(),
            layout: TemplateLayout::default(),
        }
    }

    /// Use a custom row/column layout.
    #[must_use]
    pub fn with_layout(mut self, layout: TemplateLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Path the vehicle file is written to.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Template text with the drag and lift rows substituted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if the header or either row is missing.
    pub fn substitute(&self, template: &str, pair: &CoefficientPair) -> Result<String> {
        let layout = &self.layout;
        let mut lines = template.lines();
        let header = lines
            .next()
            .ok_or_else(|| Error::ConfigWrite("vehicle template is empty".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let find = |name: &str| {
            columns.iter().position(|c| *c == name).ok_or_else(|| {
                Error::ConfigWrite(format!("vehicle template has no '{name}' column"))
            })
        };
        let description = find(&layout.description_column)?;
        let value = find(&layout.value_column)?;

        let mut out = String::with_capacity(template.len() + 32);
        out.push_str(header);
        out.push('\n');
        let (mut drag_set, mut lift_set) = (false, false);
        for line in lines {
            let mut fields: Vec<String> = line.split(',').map(str::to_string).collect();
            let name = fields.get(description).map(|f| f.trim().to_string());
            let replacement = match name.as_deref() {
                Some(n) if n == layout.drag_row => {
                    drag_set = true;
                    Some(pair.drag())
                }
                Some(n) if n == layout.lift_row => {
                    lift_set = true;
                    Some(pair.lift())
                }
                _ => None,
            };
            if let Some(number) = replacement {
                if fields.len() <= value {
                    fields.resize(value + 1, String::new());
                }
                fields[value] = number.to_string();
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        for (set, row) in [(drag_set, &layout.drag_row), (lift_set, &layout.lift_row)] {
            if !set {
                return Err(Error::ConfigWrite(format!(
                    "vehicle template has no '{row}' row"
                )));
            }
        }
        Ok(out)
    }
}

impl VehicleConfigStore for TemplateConfigStore {
    fn write(&self, pair: &CoefficientPair, vehicle_template: &str) -> Result<()> {
        let source = self.templates_dir.join(vehicle_template);
        let template = std::fs::read_to_string(&source).map_err(|e| {
            Error::ConfigWrite(format!("cannot read template {}: {e}", source.display()))
        })?;
        let vehicle = self.substitute(&template, pair)?;
        std::fs::write(&self.target, vehicle).map_err(|e| {
            Error::ConfigWrite(format!("cannot write {}: {e}", self.target.display()))
        })?;
        tracing::debug!(
            template = %source.display(),
            target = %self.target.display(),
            cl = pair.lift(),
            cd = pair.drag(),
            "vehicle params set"
        );
        Ok(())
    }
}
