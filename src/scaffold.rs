//! Document scaffolding pipeline.
//!
//! [`Scaffolder::create_document`] validates everything it can up front
//! (see [`Scaffolder::plan`]), then runs the [`Step`]s strictly in order.
//! A failing step aborts the rest; steps already performed are not undone,
//! so a half-populated project directory may remain on disk.

use crate::config::Config;
use crate::constants::{
    BIB_DIR, CONFIG_FILE, DOCUMENT_TEMPLATE, GITIGNORE_FILE, GITIGNORE_TEMPLATE, LARGE_FIGS_SUFFIX,
    SCRIPT_TEMPLATE,
};
use crate::document::{human_date, DocumentDescriptor};
use crate::error::{Error, Result};
use crate::git::{Git, ProcessRunner};
use crate::paths::{make_absolute, resolve_path};
use crate::renderer::{render_author_block, Context, TemplateRenderer};
use log::{debug, error};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// One stage of the scaffolding pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CopyTemplate,
    RemoveConfigPlaceholder,
    RenameIgnoreFile,
    CopyBibliography,
    PopulateScript,
    PopulateDocument,
    RenameDocument,
    InitRepository,
    CreateRemote,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Step::CopyTemplate,
        Step::RemoveConfigPlaceholder,
        Step::RenameIgnoreFile,
        Step::CopyBibliography,
        Step::PopulateScript,
        Step::PopulateDocument,
        Step::RenameDocument,
        Step::InitRepository,
        Step::CreateRemote,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CopyTemplate => "copy template tree",
            Step::RemoveConfigPlaceholder => "remove configuration placeholder",
            Step::RenameIgnoreFile => "rename ignore file",
            Step::CopyBibliography => "copy bibliography",
            Step::PopulateScript => "populate automation script",
            Step::PopulateDocument => "populate document",
            Step::RenameDocument => "rename document",
            Step::InitRepository => "initialize repository",
            Step::CreateRemote => "create remote mirror",
        };
        f.write_str(name)
    }
}

/// Paths computed before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub dir_name: String,
    pub doc_name: String,
    pub template_dir: PathBuf,
    pub project_dir: PathBuf,
    pub bib_source: PathBuf,
    pub bib_target: PathBuf,
    pub remote_root: PathBuf,
    /// Bare mirror, `remote_root/{dir_name}.git`.
    pub remote: PathBuf,
    pub large_figs_dir: PathBuf,
}

/// The finished project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirectory {
    pub path: PathBuf,
    pub document: PathBuf,
    pub bibliography: PathBuf,
    pub remote: PathBuf,
    pub large_figs_dir: PathBuf,
}

/// Rejects a path whose final component contains a space; BibTeX and
/// LaTeX tooling break on such directories.
pub fn ensure_no_space(path: &Path) -> Result<()> {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if name.contains(' ') {
        return Err(Error::ValidationError(format!(
            "directory name '{name}' must not contain a space"
        )));
    }
    Ok(())
}

/// Rejects a directory name that is not a single plain path component, so
/// the project always lands directly inside the destination.
pub fn ensure_single_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    );
    if !single || name.contains('\\') {
        return Err(Error::ValidationError(format!(
            "directory name '{name}' must be a single path component"
        )));
    }
    Ok(())
}

/// Recursively copies `source` into `target`, creating `target`.
pub fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::ValidationError(e.to_string()))?;
        let target_path = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)?;
        } else {
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)?;
            }
            debug!("Copying file: {}", target_path.display());
            fs::copy(entry.path(), &target_path)?;
        }
    }
    Ok(())
}

fn render_file(engine: &dyn TemplateRenderer, path: &Path, context: &Context) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let rendered = engine.render(&content, context)?;
    fs::write(path, rendered)?;
    Ok(())
}

/// Context for the automation script: absolute bibliography path and its file name.
pub fn script_context(plan: &ScaffoldPlan) -> Context {
    let mut context = Context::new();
    context.insert("master_bib_file".to_string(), plan.bib_source.display().to_string());
    context.insert("bib_filename".to_string(), file_name(&plan.bib_source));
    context
}

/// Context for the document skeleton.
pub fn document_context(
    engine: &dyn TemplateRenderer,
    config: &Config,
    document: &DocumentDescriptor,
    plan: &ScaffoldPlan,
) -> Result<Context> {
    let default_bib = plan
        .bib_source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("title".to_string(), document.title.clone());
    context.insert("main_author".to_string(), config.main_author()?.to_string());
    context.insert("date".to_string(), human_date(document.creation_date));
    context.insert(
        "author_affiliation_block".to_string(),
        render_author_block(engine, &config.authors, &config.affiliations)?,
    );
    context.insert("default_style".to_string(), config.default_style.clone());
    context.insert("default_bib".to_string(), default_bib);
    context.insert("large_figs_dir".to_string(), plan.large_figs_dir.display().to_string());
    Ok(context)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Orchestrates the creation of one project directory.
pub struct Scaffolder<'a> {
    engine: &'a dyn TemplateRenderer,
    git: Git<'a>,
}

impl<'a> Scaffolder<'a> {
    pub fn new(engine: &'a dyn TemplateRenderer, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            engine,
            git: Git::new(runner),
        }
    }

    /// Computes every path of the new project and validates the inputs.
    /// Touches nothing on disk.
    ///
    /// # Errors
    /// * `Error::ValidationError` if the destination, template tree,
    ///   bibliography or Dropbox root is unusable, or the directory name
    ///   contains a space or is not a single path component
    /// * `Error::OutputDirectoryExistsError` if the project already exists
    pub fn plan(
        &self,
        config: &Config,
        document: &DocumentDescriptor,
        destination: &Path,
    ) -> Result<ScaffoldPlan> {
        let (dir_name, doc_name) = document.names(config.main_author()?)?;
        ensure_single_component(&dir_name)?;

        let destination = make_absolute(destination)?;
        let project_dir = destination.join(&dir_name);
        ensure_no_space(&project_dir)?;

        if !destination.is_dir() {
            return Err(Error::ValidationError(format!(
                "destination '{}' is not an existing directory",
                destination.display()
            )));
        }
        if project_dir.exists() {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: project_dir.display().to_string(),
            });
        }

        let template_dir = make_absolute(&config.template_dir)?;
        for required in [DOCUMENT_TEMPLATE, GITIGNORE_TEMPLATE] {
            if !template_dir.join(required).is_file() {
                return Err(Error::ValidationError(format!(
                    "template directory '{}' has no '{}'",
                    template_dir.display(),
                    required
                )));
            }
        }
        if project_dir.starts_with(&template_dir) {
            return Err(Error::ValidationError(format!(
                "destination '{}' is inside the template directory",
                destination.display()
            )));
        }

        let bib_source = resolve_path(&config.master_bib_file)?;
        if !bib_source.is_file() {
            return Err(Error::ValidationError(format!(
                "master bibliography file '{}' does not exist",
                bib_source.display()
            )));
        }
        let bib_target = project_dir.join(BIB_DIR).join(file_name(&bib_source));

        let remote_root = resolve_path(&config.dropbox)?;
        if !remote_root.is_dir() {
            return Err(Error::ValidationError(format!(
                "Dropbox root '{}' is not an existing directory",
                remote_root.display()
            )));
        }
        let remote = remote_root.join(format!("{dir_name}.git"));
        let large_figs_dir = remote_root.join(format!("{dir_name}{LARGE_FIGS_SUFFIX}"));
        if remote.exists() {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: remote.display().to_string(),
            });
        }

        Ok(ScaffoldPlan {
            dir_name,
            doc_name,
            template_dir,
            project_dir,
            bib_source,
            bib_target,
            remote_root,
            remote,
            large_figs_dir,
        })
    }

    /// Creates `destination/dir_name` from the template tree and links it to a
    /// bare mirror under the Dropbox root.
    ///
    /// `config` must already be validated. Nothing is written before
    /// [`Scaffolder::plan`] and the git preflight succeed.
    pub fn create_document(
        &self,
        config: &Config,
        document: &DocumentDescriptor,
        destination: &Path,
    ) -> Result<ProjectDirectory> {
        let plan = self.plan(config, document, destination)?;
        self.git.check(&plan.remote_root)?;
        self.execute(config, document, &plan)
    }

    /// Runs every [`Step`] of an already validated plan.
    pub fn execute(
        &self,
        config: &Config,
        document: &DocumentDescriptor,
        plan: &ScaffoldPlan,
    ) -> Result<ProjectDirectory> {
        for step in Step::ALL {
            debug!("Step: {step}");
            if let Err(e) = self.run_step(step, config, document, plan) {
                if plan.project_dir.exists() {
                    error!(
                        "Step '{}' failed; '{}' was left on disk and must be removed \
                         before retrying",
                        step,
                        plan.project_dir.display()
                    );
                }
                return Err(e);
            }
        }

        Ok(ProjectDirectory {
            path: plan.project_dir.clone(),
            document: plan.project_dir.join(&plan.doc_name),
            bibliography: plan.bib_target.clone(),
            remote: plan.remote.clone(),
            large_figs_dir: plan.large_figs_dir.clone(),
        })
    }

    fn run_step(
        &self,
        step: Step,
        config: &Config,
        document: &DocumentDescriptor,
        plan: &ScaffoldPlan,
    ) -> Result<()> {
        let project = &plan.project_dir;
        match step {
            Step::CopyTemplate => copy_tree(&plan.template_dir, project),
            Step::RemoveConfigPlaceholder => {
                let placeholder = project.join(CONFIG_FILE);
                if placeholder.exists() {
                    fs::remove_file(placeholder)?;
                }
                Ok(())
            }
            Step::RenameIgnoreFile => {
                fs::rename(project.join(GITIGNORE_TEMPLATE), project.join(GITIGNORE_FILE))?;
                Ok(())
            }
            Step::CopyBibliography => {
                fs::create_dir_all(project.join(BIB_DIR))?;
                fs::copy(&plan.bib_source, &plan.bib_target)?;
                Ok(())
            }
            Step::PopulateScript => {
                let script = project.join(SCRIPT_TEMPLATE);
                if script.is_file() {
                    render_file(self.engine, &script, &script_context(plan))?;
                } else {
                    debug!("No {SCRIPT_TEMPLATE} in template, skipping");
                }
                Ok(())
            }
            Step::PopulateDocument => {
                let context = document_context(self.engine, config, document, plan)?;
                render_file(self.engine, &project.join(DOCUMENT_TEMPLATE), &context)
            }
            Step::RenameDocument => {
                fs::rename(project.join(DOCUMENT_TEMPLATE), project.join(&plan.doc_name))?;
                Ok(())
            }
            Step::InitRepository => self.git.initial_commit(project),
            Step::CreateRemote => {
                self.git.create_bare_mirror(&plan.project_dir, &plan.remote_root)?;
                fs::create_dir_all(&plan.large_figs_dir)?;
                Ok(())
            }
        }
    }
}
