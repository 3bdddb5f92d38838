//! Common constants used throughout the newtex application.

/// Default configuration (and template) directory
pub const DEFAULT_CONFIG_DIR: &str = "~/.newtexrc";

/// Configuration file inside the configuration directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Default root for shared bare repositories
pub const DEFAULT_DROPBOX: &str = "~/Dropbox";

/// Ignore-file payload as stored in the template tree
pub const GITIGNORE_TEMPLATE: &str = "gitignore";

/// Ignore-file name git expects in the project
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Document skeleton inside the template tree
pub const DOCUMENT_TEMPLATE: &str = "template.tex";

/// Optional per-project automation script template
pub const SCRIPT_TEMPLATE: &str = "Makefile";

/// Bibliography subfolder of a new project
pub const BIB_DIR: &str = "bib";

/// Prefix of every project directory name
pub const DIR_PREFIX: &str = "_JAM_";

/// Suffix of the large-figures directory created next to the bare mirror
pub const LARGE_FIGS_SUFFIX: &str = "_large_figs";

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial automatic commit by newtex";

/// LaTeX working files removed by `newtex clean`
pub const LATEX_INTERMEDIATES: [&str; 19] = [
    "*.aux",
    "*.bak",
    "*.bbl",
    "*.blg",
    "*.dvi",
    "*.fgx",
    "*.log",
    "*.out",
    "*.pdf",
    "*.synctex.gz",
    "*.sav",
    "*.spl",
    "*.tbx",
    "*.vdx",
    "*.fdb_latexmk",
    "*.fls",
    "*.mp",
    "*.top",
    "*.tui",
];
