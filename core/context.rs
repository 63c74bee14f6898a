use crate::classify::{EntryKind, PathClassifier, relative_path};
use crate::config::{Config, DEFAULT_IGNORE_FILE, DEFAULT_TREE_DEPTH};
use crate::content::ContentRenderer;
use crate::error::Result;
use crate::gather::gather_included_files;
use crate::rules::{IgnoreRules, RuleSet};
use crate::selection::{Mode, SelectionRoot};
use crate::tree::TreeRenderer;
use log;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::thread::{self, JoinHandle};

/// The generated context document, kept in sections until rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub header: String,
    pub project_info: String,
    pub structure: String,
    pub code_blocks: Vec<String>,
    /// Set when single-file mode rejected the selection.
    pub code_warning: Option<String>,
    pub statistics: String,
    pub prompt: String,
    pub files_included: usize,
}

impl RenderedArtifact {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RenderedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        f.write_str(&self.project_info)?;
        f.write_str(&self.structure)?;
        f.write_str("## 📝 CODE\n")?;
        if let Some(warning) = &self.code_warning {
            f.write_str(warning)?;
        }
        for block in &self.code_blocks {
            f.write_str(block)?;
        }
        f.write_str(&self.statistics)?;
        f.write_str(&self.prompt)
    }
}

/// Settings the assembler reads besides the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub ignore_file: String,
    pub tree_depth: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            tree_depth: DEFAULT_TREE_DEPTH,
        }
    }
}

impl From<&Config> for AssemblyOptions {
    fn from(config: &Config) -> Self {
        Self {
            ignore_file: config.general.ignore_file.clone(),
            tree_depth: config.general.tree_depth,
        }
    }
}

/// Builds the artifact for `root`. Per-file and per-directory failures are
/// rendered as markers; nothing here is fatal.
pub fn assemble(
    root: &SelectionRoot,
    rules: &RuleSet,
    options: &AssemblyOptions,
    prompt: &str,
) -> RenderedArtifact {
    log::info!(
        "Assembling context for {} ({})",
        root.base_path().display(),
        root.mode()
    );
    let ignore = IgnoreRules::load(root.base_path(), &options.ignore_file);
    let classifier = PathClassifier::new(rules, &ignore, root);

    let mut artifact = RenderedArtifact {
        header: render_header(root),
        project_info: render_project_info(root, rules),
        ..RenderedArtifact::default()
    };

    let tree_lines = TreeRenderer::new(classifier, root, options.tree_depth).render();
    artifact.structure = render_structure(&tree_lines);

    let renderer = ContentRenderer::new(rules.max_chars());
    match root.selected_file() {
        Some(selected) => {
            if classifier.classify(selected, EntryKind::File).is_included() {
                artifact
                    .code_blocks
                    .push(render_file(&renderer, root, selected));
            } else {
                let name = root.selected_file_name().unwrap_or_default();
                log::warn!("Selected file does not meet the inclusion criteria: {}", name);
                artifact.code_warning = Some(format!(
                    "⚠️ The selected file `{}` doesn't meet the inclusion criteria.\n",
                    name
                ));
            }
        }
        None => {
            for path in gather_included_files(root.base_path(), &classifier) {
                artifact.code_blocks.push(render_file(&renderer, root, &path));
            }
        }
    }
    artifact.files_included = artifact.code_blocks.len();
    log::debug!("Rendered {} code blocks", artifact.files_included);

    artifact.statistics = render_statistics(root, artifact.files_included);
    artifact.prompt = format!("## ❓ PROMPT\n{}\n", prompt);
    artifact
}

fn render_file(renderer: &ContentRenderer, root: &SelectionRoot, path: &Path) -> String {
    let relative = relative_path(root.base_path(), path);
    renderer.render(path, &relative, root.is_selected(path))
}

fn render_header(root: &SelectionRoot) -> String {
    match root.selected_file_name() {
        Some(file) => format!(
            "# 🧑💻 CONTEXT: `{}` (📁 {})\n\n",
            file,
            root.project_name()
        ),
        None => format!("# 🧑💻 CONTEXT: `{}`\n\n", root.project_name()),
    }
}

fn render_project_info(root: &SelectionRoot, rules: &RuleSet) -> String {
    let mut out = String::from("## ℹ️ PROJECT INFO\n");
    out.push_str(&format!("- **Path**: `{}`\n", root.base_path().display()));
    if let Some(file) = root.selected_file_name() {
        out.push_str(&format!("- **Selected file**: `{}`\n", file));
    }
    out.push_str(&format!("- **Mode**: {}\n", root.mode()));
    out.push_str(&format!(
        "- **Included extensions**: {}\n",
        join(rules.allowed_extensions())
    ));
    out.push_str(&format!(
        "- **Excluded directories**: {}\n",
        join(rules.excluded_dirs())
    ));
    out.push_str(&format!(
        "- **Excluded files**: {}\n",
        join(rules.excluded_files())
    ));
    out.push_str(&format!(
        "- **Character limit per file**: {}\n\n",
        rules.max_chars()
    ));
    out
}

fn render_structure(lines: &[String]) -> String {
    let mut out = String::from("## 📁 STRUCTURE\n```\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("```\n\n");
    out
}

fn render_statistics(root: &SelectionRoot, files_included: usize) -> String {
    let mut out = String::from("\n## 📊 STATISTICS\n");
    out.push_str(&format!("- **Files included**: {}\n", files_included));
    if root.mode() == Mode::SingleFile {
        out.push_str(&format!(
            "- **Mode**: Single file ({})\n",
            root.selected_file_name().unwrap_or_default()
        ));
    }
    out.push_str(&format!(
        "- **Base directory**: {}\n\n",
        root.base_path().display()
    ));
    out
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// A ready-to-run generation request: a validated root plus the rules and
/// options to apply. Construction is the only step that can fail.
#[derive(Debug, Clone)]
pub struct ContextGenerator {
    root: SelectionRoot,
    rules: RuleSet,
    options: AssemblyOptions,
}

impl ContextGenerator {
    pub fn new(path: &Path, single_file: bool, rules: RuleSet) -> Result<Self> {
        Ok(Self {
            root: SelectionRoot::new(path, single_file)?,
            rules,
            options: AssemblyOptions::default(),
        })
    }

    pub fn from_config(
        path: &Path,
        single_file: bool,
        config: &Config,
        max_chars_override: Option<usize>,
    ) -> Result<Self> {
        Ok(Self::new(path, single_file, config.rule_set(max_chars_override))?
            .with_options(AssemblyOptions::from(config)))
    }

    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &SelectionRoot {
        &self.root
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn generate(&self, prompt: &str) -> RenderedArtifact {
        assemble(&self.root, &self.rules, &self.options, prompt)
    }

    /// Runs the generation on its own thread. The handle yields the finished
    /// artifact; there is no cancellation.
    pub fn spawn(self, prompt: String) -> JoinHandle<RenderedArtifact> {
        thread::spawn(move || self.generate(&prompt))
    }
}
