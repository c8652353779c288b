//! Command-line arguments for the runner binary.

use std::path::PathBuf;

pub const USAGE: &str = "Usage: flowline-runner [config.json] [--frames N] \
[--preset basic_flow|basic_flow_v2] [--respawn-every N]";

/// Parsed runner arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub frames: u64,
    /// Re-seed the system every `n` frames.
    pub respawn_every: Option<u64>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            preset: None,
            frames: 600,
            respawn_every: None,
        }
    }
}

impl RunArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = RunArgs::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => out.frames = count(&arg, args.next())?,
                "--respawn-every" => {
                    let n = count(&arg, args.next())?;
                    if n == 0 {
                        return Err("--respawn-every must be at least 1".into());
                    }
                    out.respawn_every = Some(n);
                }
                "--preset" => {
                    out.preset = Some(args.next().ok_or("--preset needs a name")?);
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown option '{}'", flag));
                }
                _ if out.config.is_none() => out.config = Some(PathBuf::from(&arg)),
                _ => return Err(format!("unexpected argument '{}'", arg)),
            }
        }

        if out.config.is_some() && out.preset.is_some() {
            return Err("pass either a config file or --preset, not both".into());
        }
        Ok(out)
    }
}

fn count(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a whole number, got '{}'", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = RunArgs::parse(Vec::<String>::new()).unwrap();
        assert_eq!(args, RunArgs::default());
    }

    #[test]
    fn test_full_line() {
        let args =
            RunArgs::parse(["scene.json", "--frames", "120", "--respawn-every", "30"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!(args.frames, 120);
        assert_eq!(args.respawn_every, Some(30));
    }

    #[test]
    fn test_preset() {
        let args = RunArgs::parse(["--preset", "basic_flow"]).unwrap();
        assert_eq!(args.preset.as_deref(), Some("basic_flow"));
    }

    #[test]
    fn test_errors() {
        assert!(RunArgs::parse(["--frames"]).is_err());
        assert!(RunArgs::parse(["--frames", "ten"]).is_err());
        assert!(RunArgs::parse(["--respawn-every", "0"]).is_err());
        assert!(RunArgs::parse(["--fast"]).is_err());
        assert!(RunArgs::parse(["a.json", "b.json"]).is_err());
        assert!(RunArgs::parse(["a.json", "--preset", "basic_flow"]).is_err());
    }
}
