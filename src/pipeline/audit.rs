// file: src/pipeline/audit.rs
// description: finds old-scheme post urls left in the non-protected lines of an export
// reference: https://docs.rs/regex

use crate::config::Config;
use crate::error::{MigrationError, Result};
use crate::parser::patterns::old_post_url;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    pub line: usize,
    pub url: String,
    pub old_basename: String,
}

pub struct LinkAuditor {
    pattern: Regex,
    protected: String,
}

impl LinkAuditor {
    pub fn new(config: &Config) -> Result<Self> {
        let migration = &config.migration;
        let pattern = old_post_url(&migration.old_domain, migration.path_prefix())
            .map_err(|e| MigrationError::Config(format!("invalid old url pattern: {}", e)))?;

        Ok(Self {
            pattern,
            protected: config.markers.protected.clone(),
        })
    }

    pub fn audit(&self, content: &str) -> Vec<UnresolvedLink> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.starts_with(self.protected.as_str()))
            .flat_map(|(i, line)| {
                self.pattern.captures_iter(line).map(move |caps| UnresolvedLink {
                    line: i + 1,
                    url: caps[0].to_string(),
                    old_basename: caps[3].to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_remaining_links_with_line_numbers() {
        let config = Config::default_config();
        let auditor = LinkAuditor::new(&config).unwrap();
        let content = "\
UNIQUE URL: http://gumption.typepad.com/2009/04/a_day_in_the_l.html
<p>https://interrelativity.com/2009/04/a-day-in-the-life-revisited</p>
<p>http://gumption.typepad.com/2009/06/gone.html and https://gumption.typepad.com/2010/01/also_gone.html</p>
";
        let links = auditor.audit(content);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].line, 3);
        assert_eq!(links[0].old_basename, "gone");
        assert_eq!(links[1].url, "https://gumption.typepad.com/2010/01/also_gone.html");
    }

    #[test]
    fn test_respects_old_path_prefix() {
        let mut config = Config::default_config();
        config.migration.old_path_prefix = "blog".to_string();
        let auditor = LinkAuditor::new(&config).unwrap();

        assert_eq!(
            auditor
                .audit("http://gumption.typepad.com/blog/2009/04/x.html")
                .len(),
            1
        );
        assert!(auditor.audit("http://gumption.typepad.com/2009/04/x.html").is_empty());
    }

    #[test]
    fn test_reports_links_with_mixed_case_host() {
        let config = Config::default_config();
        let auditor = LinkAuditor::new(&config).unwrap();

        let links = auditor.audit("<a href=\"http://Gumption.Typepad.com/2009/06/gone.html\">x</a>");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].old_basename, "gone");
    }
}
