use chrono::NaiveDate;
use newtex::config::Config;
use newtex::document::{DocType, DocumentDescriptor};
use newtex::error::{Error, Result};
use newtex::git::ProcessRunner;
use newtex::renderer::PlaceholderRenderer;
use newtex::scaffold::{
    ensure_no_space, ensure_single_component, ProjectDirectory, Scaffolder, Step,
};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DIR_NAME: &str = "_JAM_MS__Marohn202403__quantum_sensing";

/// Records git invocations; optionally fails the first command named `fail_on`.
struct RecordingRunner {
    calls: RefCell<Vec<Vec<String>>>,
    config_list: &'static str,
    fail_on: Option<&'static str>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            config_list: "user.name=John A. Marohn\nuser.email=jam99@example.com\n",
            fail_on: None,
        }
    }

    fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|args| args[0].clone()).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, _program: &str, args: &[OsString], _cwd: &Path) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.calls.borrow_mut().push(args.clone());
        if self.fail_on == Some(args[0].as_str()) {
            return Err(Error::GitCommandError {
                command: args.join(" "),
                stderr: "boom".to_string(),
            });
        }
        match args[0].as_str() {
            "--version" => Ok("git version 2.43.0".to_string()),
            "config" => Ok(self.config_list.to_string()),
            _ => Ok(String::new()),
        }
    }
}

struct Fixture {
    _root: TempDir,
    template: PathBuf,
    destination: PathBuf,
    dropbox: PathBuf,
    bib: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let template = root.path().join("newtexrc");
        let destination = root.path().join("papers");
        let dropbox = root.path().join("Dropbox");
        let bib = root.path().join("refs").join("jam99.bib");

        fs::create_dir_all(template.join("figs")).unwrap();
        fs::create_dir_all(template.join("styles")).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::create_dir_all(&dropbox).unwrap();
        fs::create_dir_all(bib.parent().unwrap()).unwrap();

        fs::write(template.join("gitignore"), "*.aux\n*.log\n").unwrap();
        fs::write(template.join("config.yaml"), "authors: []\n").unwrap();
        fs::write(
            template.join("template.tex"),
            concat!(
                "% $title by $main_author, $date\n",
                "\\title{$title}\n",
                "$author_affiliation_block\n",
                "\\bibliographystyle{styles/$default_style}\n",
                "\\bibliography{bib/$default_bib}\n",
            ),
        )
        .unwrap();
        fs::write(template.join("figs").join("plot.svg"), "<svg/>").unwrap();
        fs::write(template.join("styles").join("naturemag_jm.bst"), "ENTRY").unwrap();
        fs::write(&bib, "@article{a, title={A}}\n").unwrap();

        Self {
            _root: root,
            template,
            destination,
            dropbox,
            bib,
        }
    }

    fn config(&self) -> Config {
        Config {
            master_bib_file: self.bib.display().to_string(),
            authors: vec!["John A. Marohn".to_string()],
            affiliations: vec!["Cornell University".to_string()],
            default_style: "naturemag_jm".to_string(),
            dropbox: self.dropbox.display().to_string(),
            created: None,
            template_dir: self.template.clone(),
        }
    }

    fn project(&self) -> PathBuf {
        self.destination.join(DIR_NAME)
    }

    fn destination_is_empty(&self) -> bool {
        fs::read_dir(&self.destination).unwrap().next().is_none()
    }
}

fn document() -> DocumentDescriptor {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    DocumentDescriptor::new(DocType::Ms, "quantum sensing", "Example", date).unwrap()
}

fn scaffold(
    fixture: &Fixture,
    runner: &RecordingRunner,
    doc: &DocumentDescriptor,
) -> Result<ProjectDirectory> {
    let engine = PlaceholderRenderer::new();
    Scaffolder::new(&engine, runner).create_document(
        &fixture.config(),
        doc,
        &fixture.destination,
    )
}

#[test_log::test]
fn test_end_to_end_scaffold() {
    let fixture = Fixture::new();
    let runner = RecordingRunner::new();

    let project = scaffold(&fixture, &runner, &document()).unwrap();

    let dir = fixture.project();
    assert_eq!(project.path, dir);
    assert!(dir.join(".gitignore").is_file());
    assert!(!dir.join("gitignore").exists());
    assert!(!dir.join("config.yaml").exists());
    assert!(!dir.join("template.tex").exists());

    assert_eq!(project.document, dir.join("Marohn202403__quantum_sensing.tex"));
    let tex = fs::read_to_string(&project.document).unwrap();
    assert!(tex.contains("Example"));
    assert!(tex.contains("% Example by John A. Marohn, March 15, 2024"));
    assert!(tex.contains("\\author{John A. Marohn}\n    \\affiliation{Cornell University}"));
    assert!(tex.contains("\\bibliographystyle{styles/naturemag_jm}"));
    assert!(tex.contains("\\bibliography{bib/jam99}"));
    assert!(!tex.contains('$'));

    assert_eq!(project.bibliography, dir.join("bib").join("jam99.bib"));
    assert_eq!(fs::read(&project.bibliography).unwrap(), fs::read(&fixture.bib).unwrap());

    assert!(!dir_diff::is_different(fixture.template.join("figs"), dir.join("figs")).unwrap());
    assert!(
        !dir_diff::is_different(fixture.template.join("styles"), dir.join("styles")).unwrap()
    );

    assert_eq!(project.remote, fixture.dropbox.join(format!("{DIR_NAME}.git")));
    assert_eq!(
        project.large_figs_dir,
        fixture.dropbox.join(format!("{DIR_NAME}_large_figs"))
    );
    assert!(project.large_figs_dir.is_dir());

    assert_eq!(
        runner.commands(),
        ["--version", "config", "init", "add", "commit", "clone", "remote", "push"]
    );
}

#[test]
fn test_script_template_populated() {
    let fixture = Fixture::new();
    fs::write(
        fixture.template.join("Makefile"),
        "MASTER_BIB = $master_bib_file\ncpbib:\n\tcp '$(MASTER_BIB)' 'bib/$bib_filename'\n",
    )
    .unwrap();
    let runner = RecordingRunner::new();

    scaffold(&fixture, &runner, &document()).unwrap();

    let script = fs::read_to_string(fixture.project().join("Makefile")).unwrap();
    assert_eq!(
        script,
        format!(
            "MASTER_BIB = {}\ncpbib:\n\tcp '$(MASTER_BIB)' 'bib/jam99.bib'\n",
            fixture.bib.display()
        )
    );
}

#[test]
fn test_missing_placeholder_leaves_partial_directory() {
    let fixture = Fixture::new();
    fs::write(fixture.template.join("template.tex"), "\\title{$title} $journal").unwrap();
    let runner = RecordingRunner::new();

    let result = scaffold(&fixture, &runner, &document());

    match result {
        Err(Error::MissingPlaceholderValue { name }) => assert_eq!(name, "journal"),
        other => panic!("Expected MissingPlaceholderValue, got {other:?}"),
    }
    let dir = fixture.project();
    assert!(dir.join(".gitignore").exists());
    assert!(dir.join("bib").join("jam99.bib").exists());
    assert_eq!(
        fs::read_to_string(dir.join("template.tex")).unwrap(),
        "\\title{$title} $journal"
    );
    assert_eq!(runner.commands(), ["--version", "config"]);
}

#[test]
fn test_space_in_directory_name_rejected_before_copy() {
    let fixture = Fixture::new();
    let mut doc = document();
    doc.short_name = "quantum sensing".to_string();
    let runner = RecordingRunner::new();

    let result = scaffold(&fixture, &runner, &doc);

    assert!(matches!(result, Err(Error::ValidationError(_))));
    assert!(fixture.destination_is_empty());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_path_separator_in_short_name_rejected_before_copy() {
    for short_name in ["afm/tips", "a/../../x", "..\\escape"] {
        let fixture = Fixture::new();
        let mut doc = document();
        doc.short_name = short_name.to_string();
        let runner = RecordingRunner::new();

        let result = scaffold(&fixture, &runner, &doc);

        assert!(
            matches!(result, Err(Error::ValidationError(_))),
            "{short_name}: {result:?}"
        );
        assert!(fixture.destination_is_empty());
        assert!(runner.commands().is_empty());
    }
}

#[test]
fn test_ensure_single_component() {
    assert!(ensure_single_component(DIR_NAME).is_ok());
    assert!(ensure_single_component("_JAM_MS__A202403__afm/tips").is_err());
    assert!(ensure_single_component("..").is_err());
    assert!(ensure_single_component("/abs").is_err());
    assert!(ensure_single_component("dir/").is_err());
}

#[test]
fn test_ensure_no_space() {
    assert!(ensure_no_space(Path::new("/my papers/_JAM_MS__A202403__x")).is_ok());
    assert!(ensure_no_space(Path::new("/papers/_JAM_MS__A 202403__x")).is_err());
}

#[test]
fn test_existing_project_rejected() {
    let fixture = Fixture::new();
    fs::create_dir(fixture.project()).unwrap();
    let runner = RecordingRunner::new();

    let result = scaffold(&fixture, &runner, &document());

    assert!(matches!(result, Err(Error::OutputDirectoryExistsError { .. })));
}

#[test]
fn test_missing_bibliography_rejected_before_copy() {
    let fixture = Fixture::new();
    fs::remove_file(&fixture.bib).unwrap();
    let runner = RecordingRunner::new();

    let result = scaffold(&fixture, &runner, &document());

    assert!(matches!(result, Err(Error::ValidationError(_))));
    assert!(fixture.destination_is_empty());
}

#[test]
fn test_git_identity_checked_before_copy() {
    let fixture = Fixture::new();
    let mut runner = RecordingRunner::new();
    runner.config_list = "core.editor=vim\n";

    let result = scaffold(&fixture, &runner, &document());

    assert!(matches!(result, Err(Error::GitIdentityMissing)));
    assert!(fixture.destination_is_empty());
}

#[test_log::test]
fn test_git_failure_aborts_remaining_steps() {
    let fixture = Fixture::new();
    let mut runner = RecordingRunner::new();
    runner.fail_on = Some("commit");

    let result = scaffold(&fixture, &runner, &document());

    assert!(matches!(result, Err(Error::GitCommandError { .. })));
    assert!(fixture.project().join("Marohn202403__quantum_sensing.tex").is_file());
    assert_eq!(runner.commands(), ["--version", "config", "init", "add", "commit"]);
    assert!(!fixture.dropbox.join(format!("{DIR_NAME}_large_figs")).exists());
}

#[test]
fn test_plan_touches_nothing() {
    let fixture = Fixture::new();
    let engine = PlaceholderRenderer::new();
    let runner = RecordingRunner::new();

    let plan = Scaffolder::new(&engine, &runner)
        .plan(&fixture.config(), &document(), &fixture.destination)
        .unwrap();

    assert_eq!(plan.dir_name, DIR_NAME);
    assert_eq!(plan.project_dir, fixture.project());
    assert!(fixture.destination_is_empty());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_steps_run_in_order() {
    assert_eq!(Step::ALL.first(), Some(&Step::CopyTemplate));
    assert_eq!(Step::ALL.last(), Some(&Step::CreateRemote));
    let populate = Step::ALL.iter().position(|s| *s == Step::PopulateDocument).unwrap();
    let rename = Step::ALL.iter().position(|s| *s == Step::RenameDocument).unwrap();
    assert!(populate < rename);
}
