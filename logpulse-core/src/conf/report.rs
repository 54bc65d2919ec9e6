use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted path of the offending setting, e.g. `writer.retry.jitter`.
    pub field: String,
    pub message: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, field: &str, message: String, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message,
            help,
        });
    }

    pub(crate) fn warning(&mut self, field: &str, message: String, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
            help,
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            out.push_str(&format!("{}: {}: {}\n", issue.field, severity, issue.message));
            if let Some(help) = &issue.help {
                out.push_str(&format!("  help: {help}\n"));
            }
        }
        out
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();

        if self.has_violations() {
            out.push_str(&format!(
                "configuration validation failed ({} errors, {} warnings)\n\n",
                self.errors.len(),
                self.warnings.len()
            ));
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let label = match issue.severity {
                Severity::Error => format!("{}", "error".red().bold()),
                Severity::Warning => format!("{}", "warning".yellow().bold()),
            };
            out.push_str(&format!("  {label}: {}\n", issue.message));
            out.push_str(&format!("    {} {}\n", "-->".blue(), issue.field));
            if let Some(help) = &issue.help {
                out.push_str(&format!("    {}: {help}\n", "help".cyan()));
            }
            out.push('\n');
        }

        out
    }
}
