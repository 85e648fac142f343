use crate::error::Result;
use crate::report::Format;
use crate::utils::parse_pip_conf;
use crate::{audit, export, manifest, report};
use clap::{Arg, ArgAction, Command};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Command line arguments for reqlint
#[derive(Debug)]
pub struct Args {
    /// Path to the project directory or a single requirements file
    pub path: PathBuf,

    /// Report output format
    pub format: Format,

    /// Whether warnings fail the audit
    pub strict: bool,

    /// Whether to write a pyproject.toml from the parsed manifests
    pub export_pyproject: bool,

    /// Additional index URLs to include in the export
    pub import_index: Vec<String>,

    /// Whether to import index URLs from ~/.pip/pip.conf
    pub import_global_pip_conf: bool,
}

/// Configures and runs the CLI; returns whether the audit came back clean
pub fn run() -> Result<bool> {
    let mut cmd = Command::new("reqlint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An auditor for pip requirements manifests")
        .long_about(
            "Reqlint parses requirements.txt manifests, verifies their structure \
            (every line parses, no duplicate packages, valid version pins, ranges \
            with a non-empty satisfying interval), and can convert them into a \
            pyproject.toml for modern tooling.",
        );

    cmd = cmd.arg(
        Arg::new("PATH")
            .help("The path to the project directory or requirements file to audit")
            .long_help(
                "Specifies the directory containing the requirements manifests to \
                audit, or a single requirements file. A directory is searched for \
                requirements.txt and requirements-<group>.txt files.",
            )
            .value_parser(clap::value_parser!(PathBuf))
            .default_value("."),
    );

    cmd = cmd.arg(
        Arg::new("format")
            .long("format")
            .help("Report format: text or json")
            .long_help(
                "Selects the report output. 'text' prints findings with file:line \
                locations and a summary; 'json' prints a machine-readable report \
                for CI consumers.",
            )
            .value_parser(clap::value_parser!(String))
            .default_value("text"),
    );

    cmd = cmd.arg(
        Arg::new("strict")
            .long("strict")
            .help("Treat warnings as failures")
            .long_help(
                "When this flag is set, warnings (such as unpinned requirements) \
                fail the audit alongside errors, which is useful for CI pipelines \
                that require fully pinned manifests.",
            )
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("export-pyproject")
            .long("export-pyproject")
            .help("Write the parsed manifests as a pyproject.toml")
            .long_help(
                "Converts the audited manifests into a pyproject.toml: main \
                requirements under [project.dependencies], dev and named groups \
                under [dependency-groups]. The export is skipped when the audit \
                reports errors, and an existing pyproject.toml is never overwritten.",
            )
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("import-index")
            .long("import-index")
            .help("Additional index URL to include in the export")
            .long_help(
                "Specifies additional package index URLs to record in the exported \
                pyproject.toml under the [tool.uv] section. You can provide this \
                option multiple times.",
            )
            .action(ArgAction::Append)
            .value_parser(clap::value_parser!(String)),
    );

    cmd = cmd.arg(
        Arg::new("import-global-pip-conf")
            .long("import-global-pip-conf")
            .help("Import extra index URLs from ~/.pip/pip.conf")
            .long_help(
                "Reads any package index URLs defined in your global pip \
                configuration file (~/.pip/pip.conf) and records them in the \
                exported pyproject.toml.",
            )
            .action(ArgAction::SetTrue),
    );

    let after_help = "EXAMPLES:
# Audit the manifests in the current directory
reqlint .

# Audit a single requirements file
reqlint requirements.txt

# Fail on unpinned requirements too
reqlint . --strict

# Emit a machine-readable report
reqlint . --format json

# Convert the manifests to a pyproject.toml
reqlint . --export-pyproject

# Convert with a private package index recorded
reqlint . --export-pyproject --import-index https://private.pypi.org/simple/

For more information and documentation, visit:
https://github.com/stvnksslr/reqlint";

    cmd = cmd.after_help(after_help);

    let matches = cmd.get_matches();

    let args = Args {
        path: matches
            .get_one::<PathBuf>("PATH")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        format: matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text")
            .parse()?,
        strict: matches.get_flag("strict"),
        export_pyproject: matches.get_flag("export-pyproject"),
        import_index: matches
            .get_many::<String>("import-index")
            .unwrap_or_default()
            .cloned()
            .collect(),
        import_global_pip_conf: matches.get_flag("import-global-pip-conf"),
    };

    execute(&args)
}

/// Execute the audit with the provided arguments
pub fn execute(args: &Args) -> Result<bool> {
    info!("Auditing manifests at: {}", args.path.display());

    let manifests = manifest::scan(&args.path)?;
    info!(
        "Parsed {} requirements from {} files",
        manifest::requirement_count(&manifests),
        manifests.len()
    );

    let findings = audit::run_audit(&manifests);
    let rendered = report::render(&manifests, &findings, args.format)?;
    print!("{}", rendered);

    let has_errors = audit::has_errors(&findings);
    let clean = if args.strict {
        findings.is_empty()
    } else {
        !has_errors
    };

    if args.export_pyproject {
        if has_errors {
            warn!("Skipping pyproject export: the audit reported errors");
        } else {
            let mut extra_urls = args.import_index.clone();
            if args.import_global_pip_conf {
                extra_urls.extend(parse_pip_conf()?);
            }
            let project_dir = if args.path.is_file() {
                args.path.parent().unwrap_or_else(|| Path::new("."))
            } else {
                args.path.as_path()
            };
            export::export_pyproject(project_dir, &manifests, &extra_urls)?;
        }
    }

    if clean {
        info!("Audit completed successfully!");
    }
    Ok(clean)
}
