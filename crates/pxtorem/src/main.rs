use crate::args::Args;
use anyhow::{Context as _, Result};
use clap::Parser as _;
use css_pxtorem::{ConversionConfig, PxToRemOptions, convert_css};
use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

mod args;

pub fn main() -> ExitCode {
    env_logger::init();

    let result = Args::parse().validate().and_then(|args| run(&args, &mut io::stdout().lock()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load the options and convert every input, writing to `--out` or `stdout`.
///
/// # Errors
/// Returns an error when a file cannot be read or written, or when the options
/// or a per-file root value are invalid.
fn run(args: &Args, stdout: &mut impl Write) -> Result<()> {
    let config = load_config(args)?;
    for input in &args.inputs {
        let css = fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;
        let converted = convert_css(&css, Some(input.as_path()), &config)
            .with_context(|| format!("converting {}", input.display()))?;
        if let Some(out) = &args.out {
            fs::write(out, converted).with_context(|| format!("writing {}", out.display()))?;
            info!("{} -> {}", input.display(), out.display());
        } else {
            stdout.write_all(converted.as_bytes())?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn load_config(args: &Args) -> Result<ConversionConfig> {
    let Some(path) = &args.config else {
        return ConversionConfig::new(PxToRemOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PxToRemOptions::from_json_str(&text)
        .and_then(ConversionConfig::new)
        .with_context(|| format!("invalid options in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::args::Args;
    use std::fs;
    use std::path::Path;

    fn args(config: Option<&Path>, out: Option<&Path>, inputs: &[&Path]) -> Args {
        Args {
            config: config.map(Path::to_path_buf),
            out: out.map(Path::to_path_buf),
            inputs: inputs.iter().map(|input| input.to_path_buf()).collect(),
        }
    }

    #[test]
    fn converts_to_stdout_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.css");
        let second = dir.path().join("b.css");
        fs::write(&first, ".a { font-size: 32px; width: 32px }").unwrap();
        fs::write(&second, ".b { line-height: 8px }").unwrap();

        let mut stdout = Vec::new();
        run(&args(None, None, &[&first, &second]), &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            ".a {\n  font-size: 2rem;\n  width: 32px;\n}\n.b {\n  line-height: 0.5rem;\n}\n"
        );
    }

    #[test]
    fn writes_out_file_with_legacy_options() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        let input = dir.path().join("in.css");
        let out = dir.path().join("out.css");
        fs::write(&config, r#"{ "root_value": 75, "prop_white_list": [], "mediaQuery": true }"#).unwrap();
        fs::write(&input, "@media (min-width: 750px) { .a { width: 150px } }").unwrap();

        let mut stdout = Vec::new();
        run(&args(Some(&config), Some(&out), &[&input]), &mut stdout).unwrap();
        assert!(stdout.is_empty());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "@media (min-width: 10rem) {\n  .a {\n    width: 2rem;\n  }\n}\n"
        );
    }

    #[test]
    fn reports_bad_options_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        let input = dir.path().join("in.css");
        fs::write(&input, ".a { top: 1px }").unwrap();

        fs::write(&config, r#"{ "rootValue": 0 }"#).unwrap();
        let err = run(&args(Some(&config), None, &[&input]), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("invalid options in"));

        let missing = dir.path().join("missing.css");
        let err = run(&args(None, None, &[&missing]), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("reading"));
    }
}
