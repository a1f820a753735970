use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"[site]
url = "http://example.com"
title = "My blog"

# Relative paths are resolved against root_dir.
# To make a path relative to the executable directory use ${exe_dir}/location
[paths]
root_dir = "."
source_dir = "src"
snippets_dir = "snippets"
# Pages are published next to the sources when this is not set
# publish_dir = "public"

[build]
include_drafts = false
header_snippet = "header"
footer_snippet = "footer"

[log]
level = "Info"
log_to_console = true
# location = "/var/log/blogsmith/build.log"
"#;

pub(crate) fn write_sample_cfg(file_path: Option<&Path>) -> io::Result<()> {
    match file_path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(CONFIG_SAMPLE.as_bytes())?;
            file.flush()
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(CONFIG_SAMPLE.as_bytes())?;
            stdout.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use blogsmith::config::parse_config;

    use super::*;

    #[test]
    fn test_sample_cfg_parses() {
        let cfg = parse_config(CONFIG_SAMPLE).unwrap();
        assert_eq!(cfg.site.url, "http://example.com");
        assert_eq!(cfg.build.header_snippet, "header");
        assert!(cfg.paths.publish_dir.is_none());
        assert!(cfg.log.unwrap().log_to_console);
    }
}
