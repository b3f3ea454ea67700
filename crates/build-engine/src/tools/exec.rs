//! Tool execution and output classification

use std::io;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::messages::{CompilerMessage, CompilerMessageCategory, ToolMessages};

/// `path:line[:col]: error|warning: text`
static POSITIONED_MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<path>.+?):(?P<line>\d+)(?::(?P<col>\d+))?:\s*(?P<kind>error|warning|ERROR|WARNING):\s*(?P<text>.*)$")
        .unwrap()
});

fn classify_line(line: &str, from_stderr: bool) -> Option<CompilerMessage> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return None;
    }

    if let Some(caps) = POSITIONED_MESSAGE.captures(line) {
        let category = if caps["kind"].eq_ignore_ascii_case("error") {
            CompilerMessageCategory::Error
        } else {
            CompilerMessageCategory::Warning
        };
        let line_no = caps["line"].parse().ok();
        let column = caps.name("col").and_then(|c| c.as_str().parse().ok());
        let url = format!("file://{}", &caps["path"]);
        return Some(CompilerMessage::new(category, &caps["text"]).at(url, line_no, column));
    }

    let category = if !from_stderr {
        CompilerMessageCategory::Info
    } else if line.trim_start().to_ascii_lowercase().starts_with("warning") {
        CompilerMessageCategory::Warning
    } else {
        CompilerMessageCategory::Error
    };
    Some(CompilerMessage::new(category, line.trim()))
}

/// Turn a tool's output into categorized messages.
///
/// A failed run that printed no error still yields one error naming the exit status.
pub fn classify_output(tool: &str, stdout: &str, stderr: &str, exit_code: Option<i32>) -> ToolMessages {
    let mut messages = ToolMessages::new();
    for line in stdout.lines() {
        if let Some(msg) = classify_line(line, false) {
            messages.push(msg);
        }
    }
    for line in stderr.lines() {
        if let Some(msg) = classify_line(line, true) {
            messages.push(msg);
        }
    }

    if exit_code != Some(0) && !messages.has_errors() {
        let status = exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        messages.push(CompilerMessage::error(format!("{} exited with status {}", tool, status)));
    }
    messages
}

/// Run `program` with `args` and classify what it prints
pub async fn execute<I, S>(program: &Path, args: I) -> io::Result<ToolMessages>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    debug!("{} {:?}", program.display(), args);

    let output = Command::new(program).args(&args).output().await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let tool = program
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    Ok(classify_output(&tool, &stdout, &stderr, output.status.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioned_lines() {
        let stderr = "/app/res/values/strings.xml:4: error: Resource entry app_name is already defined.\n\
                      /app/res/layout/main.xml:12:8: warning: unused attribute\n";
        let messages = classify_output("aapt", "", stderr, Some(1));
        let messages = messages.messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].category, CompilerMessageCategory::Error);
        assert_eq!(messages[0].url.as_deref(), Some("file:///app/res/values/strings.xml"));
        assert_eq!(messages[0].line, Some(4));
        assert_eq!(messages[0].column, None);
        assert_eq!(messages[0].text, "Resource entry app_name is already defined.");
        assert_eq!(messages[1].category, CompilerMessageCategory::Warning);
        assert_eq!(messages[1].column, Some(8));
    }

    #[test]
    fn test_unpositioned_lines() {
        let messages = classify_output(
            "aapt",
            "Creating package\n\n",
            "warning: string 'x' has no default translation\nERROR: Unable to open manifest\n",
            Some(1),
        );
        let categories: Vec<_> = messages.messages().iter().map(|m| m.category).collect();
        assert_eq!(
            categories,
            vec![
                CompilerMessageCategory::Info,
                CompilerMessageCategory::Warning,
                CompilerMessageCategory::Error,
            ]
        );
    }

    #[test]
    fn test_silent_failure_reports_status() {
        let messages = classify_output("apkbuilder", "", "", Some(3));
        assert!(messages.has_errors());
        assert_eq!(messages.messages()[0].text, "apkbuilder exited with status 3");

        assert!(classify_output("aapt", "ok", "", Some(0)).messages().iter().all(|m| m.category == CompilerMessageCategory::Info));
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let err = execute(Path::new("/nonexistent/rdroid-tool"), ["package"]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
