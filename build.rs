// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("apkgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dependency graph visualizer for Alpine APK repositories")
        .arg(
            Arg::new("package")
                .long("package")
                .required(true)
                .help("Name of the package to analyze"),
        )
        .arg(
            Arg::new("repository")
                .long("repository")
                .required(true)
                .help("URL of the repository, or path to a test repository file"),
        )
        .arg(
            Arg::new("test_mode")
                .long("test-mode")
                .action(ArgAction::SetTrue)
                .help("Treat --repository as a local APKINDEX file"),
        )
        .arg(
            Arg::new("output_image")
                .long("output-image")
                .value_name("PATH")
                .help("Write the resolved graph for image rendering"),
        )
        .arg(
            Arg::new("ascii_tree")
                .long("ascii-tree")
                .action(ArgAction::SetTrue)
                .help("Display dependencies as an ASCII tree"),
        )
        .arg(
            Arg::new("max_depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum dependency analysis depth"),
        )
        .arg(
            Arg::new("filter_substring")
                .long("filter-substring")
                .value_name("SUBSTRING")
                .help("Substring used to highlight matching packages"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("apkgraph.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
