pub mod convert;
pub mod list;

use std::path::PathBuf;

use thtml2doxy::{ConvertOptions, Converter, CppProvider, DEFAULT_IMAGE_EXTENSION};

use crate::config::Profile;
use crate::discover;
use crate::output::OutputFormat;

pub enum Command {
    /// Rewrite files in place, or print them with `stdout`.
    Convert { paths: Vec<PathBuf>, stdout: bool },
    /// Show the comments that would be converted.
    List {
        paths: Vec<PathBuf>,
        format: OutputFormat,
    },
}

pub fn run(command: Command, profile: &Profile, include_dirs: Vec<PathBuf>) -> Result<(), String> {
    let options = ConvertOptions {
        include_dirs,
        image_extension: profile
            .image_extension
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string()),
        // Listing only reports; the macro files are left to a real conversion
        write_macros: matches!(command, Command::Convert { .. }),
    };
    let provider = CppProvider::new().map_err(|e| format!("cannot load the C++ parser: {e}"))?;
    let converter = Converter::new(provider, options);
    let extensions = profile.extensions();

    match command {
        Command::Convert { paths, stdout } => {
            let files = discover::expand_paths(&paths, &extensions)?;
            convert::run(&converter, &files, stdout)
        }
        Command::List { paths, format } => {
            let files = discover::expand_paths(&paths, &extensions)?;
            list::run(&converter, &files, &format)
        }
    }
}
