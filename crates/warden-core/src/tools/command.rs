//! External tool command lines

use super::ToolError;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use warden_config::ToolsConfig;

/// Command line clients the console knows how to drive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Sqlcl,
    Sqlplus,
    Rman,
    Dgmgrl,
    Sqlldr,
    /// Any other program, given the script path as its only argument
    Custom(String),
}

impl ToolKind {
    pub fn name(&self) -> &str {
        match self {
            ToolKind::Sqlcl => "sqlcl",
            ToolKind::Sqlplus => "sqlplus",
            ToolKind::Rman => "rman",
            ToolKind::Dgmgrl => "dgmgrl",
            ToolKind::Sqlldr => "sqlldr",
            ToolKind::Custom(name) => name,
        }
    }

    /// Program launched when the configuration names none
    pub fn default_program(&self) -> &str {
        match self {
            ToolKind::Sqlcl => "sql",
            other => other.name(),
        }
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "sqlcl" | "sql" => Ok(ToolKind::Sqlcl),
            "sqlplus" => Ok(ToolKind::Sqlplus),
            "rman" => Ok(ToolKind::Rman),
            "dgmgrl" => Ok(ToolKind::Dgmgrl),
            "sqlldr" => Ok(ToolKind::Sqlldr),
            _ if is_program_name(name) => Ok(ToolKind::Custom(name.to_string())),
            _ => Err(ToolError::UnsupportedTool(s.to_string())),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_program_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A program and its arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub tool: String,
    pub program: String,
    pub args: Vec<String>,
    /// Argument holding credentials, masked in [`ToolCommand::display_line`]
    secret_arg: Option<usize>,
}

impl ToolCommand {
    pub fn new(tool: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
            args,
            secret_arg: None,
        }
    }

    /// Command running `script` with `kind` against `connect`
    pub fn for_script(kind: &ToolKind, connect: &str, script: &Path, config: &ToolsConfig) -> Self {
        let script = script.display().to_string();
        let at_script = format!("@{script}");
        let connect = connect.to_string();

        let (args, secret_arg) = match kind {
            ToolKind::Sqlcl | ToolKind::Sqlplus => (vec!["-S".to_string(), connect, at_script], Some(1)),
            ToolKind::Rman => (vec!["target".to_string(), connect, at_script], Some(1)),
            ToolKind::Dgmgrl => (vec![connect, at_script], Some(0)),
            ToolKind::Sqlldr => (vec![connect, format!("control={script}")], Some(0)),
            ToolKind::Custom(_) => (vec![script], None),
        };

        Self {
            tool: kind.name().to_string(),
            program: config
                .program_for(kind.name(), kind.default_program())
                .to_string(),
            args,
            secret_arg,
        }
    }

    /// Command line with any password masked, for logs and listings
    pub fn display_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        for (index, arg) in self.args.iter().enumerate() {
            if Some(index) == self.secret_arg {
                parts.push(mask_password(arg));
            } else {
                parts.push(arg.clone());
            }
        }
        parts.join(" ")
    }

    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// `user/secret@db` becomes `user/***@db`; OS authentication is left alone
fn mask_password(connect: &str) -> String {
    let Some(slash) = connect.find('/') else {
        return connect.to_string();
    };
    let end = connect
        .rfind('@')
        .filter(|&at| at > slash)
        .unwrap_or(connect.len());
    let password = &connect[slash + 1..end];
    if password.is_empty() || password.starts_with(' ') {
        return connect.to_string();
    }
    format!("{}/***{}", &connect[..slash], &connect[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use test_case::test_case;

    #[test_case("sqlcl", ToolKind::Sqlcl ; "sqlcl")]
    #[test_case("SQL", ToolKind::Sqlcl ; "sql alias")]
    #[test_case("RMan", ToolKind::Rman ; "mixed case")]
    #[test_case("orapwd", ToolKind::Custom("orapwd".into()) ; "custom")]
    fn parses_tool_names(name: &str, expected: ToolKind) {
        assert_eq!(name.parse::<ToolKind>().unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("rm -rf" ; "shell words")]
    #[test_case("../bin/x" ; "path")]
    fn rejects_unsupported_tools(name: &str) {
        assert!(matches!(
            name.parse::<ToolKind>(),
            Err(ToolError::UnsupportedTool(_))
        ));
    }

    #[test]
    fn builds_argument_lists() {
        let config = ToolsConfig::default();
        let script = PathBuf::from("/srv/sql/oracle/rman/full.rcv");
        let connect = "sys/secret@prod";

        let rman = ToolCommand::for_script(&ToolKind::Rman, connect, &script, &config);
        assert_eq!(rman.program, "rman");
        assert_eq!(rman.args, vec!["target", connect, "@/srv/sql/oracle/rman/full.rcv"]);

        let sqlcl = ToolCommand::for_script(&ToolKind::Sqlcl, connect, &script, &config);
        assert_eq!(sqlcl.program, "sql");
        assert_eq!(sqlcl.args[2], "@/srv/sql/oracle/rman/full.rcv");

        let dgmgrl = ToolCommand::for_script(&ToolKind::Dgmgrl, connect, &script, &config);
        assert_eq!(dgmgrl.args, vec![connect, "@/srv/sql/oracle/rman/full.rcv"]);

        let loader = ToolCommand::for_script(&ToolKind::Sqlldr, connect, &script, &config);
        assert_eq!(loader.args[1], "control=/srv/sql/oracle/rman/full.rcv");
    }

    #[test]
    fn configured_program_overrides_default() {
        let mut config = ToolsConfig::default();
        config.programs.insert("rman".into(), "/opt/oracle/bin/rman".into());
        let cmd = ToolCommand::for_script(&ToolKind::Rman, "/", Path::new("x.rcv"), &config);
        assert_eq!(cmd.program, "/opt/oracle/bin/rman");
    }

    #[test]
    fn display_line_masks_password() {
        let cmd = ToolCommand::for_script(
            &ToolKind::Sqlplus,
            "system/hunter2@//db01:1521/ORCL",
            Path::new("top.sql"),
            &ToolsConfig::default(),
        );
        let line = cmd.display_line();
        assert!(!line.contains("hunter2"), "{line}");
        assert_eq!(line, "sqlplus -S system/***@//db01:1521/ORCL @top.sql");
    }

    #[test_case("/ as sysdba", "/ as sysdba" ; "os auth")]
    #[test_case("scott/tiger", "scott/***" ; "no service")]
    #[test_case("scott@db", "scott@db" ; "no password")]
    fn masks_connect_strings(input: &str, expected: &str) {
        assert_eq!(mask_password(input), expected);
    }
}
