// file: src/mapping/builder.rs
// description: builds the basename mapping and url replacement table from post records
// reference: first pass of the export migration

use crate::config::{Config, MigrationConfig};
use crate::models::{MappingSet, PostDate, PostRecord, SkippedPost};
use crate::parser::{BasenameNormalizer, ExportEvent, ExportScanner, is_valid_basename};
use tracing::{debug, warn};

const LAST_RESORT_BASENAME: &str = "post";

pub struct MappingBuilder<'a> {
    migration: &'a MigrationConfig,
    normalizer: BasenameNormalizer,
    set: MappingSet,
}

impl<'a> MappingBuilder<'a> {
    pub fn new(migration: &'a MigrationConfig) -> Self {
        Self {
            migration,
            normalizer: BasenameNormalizer::new(),
            set: MappingSet::default(),
        }
    }

    /// Runs the whole first pass over an export.
    pub fn build(config: &Config, content: &str) -> MappingSet {
        let mut builder = MappingBuilder::new(&config.migration);

        for event in ExportScanner::scan(&config.markers, content) {
            match event {
                ExportEvent::Post(post) => {
                    builder.add_post(&post);
                }
                ExportEvent::Skipped(skipped) => builder.add_skipped(skipped),
            }
        }

        builder.finish()
    }

    /// Maps one post and returns its new basename, or `None` when the old
    /// basename was already mapped by an earlier post.
    pub fn add_post(&mut self, post: &PostRecord) -> Option<String> {
        if self.set.basenames.contains_old(&post.old_basename) {
            debug!(
                "Duplicate basename '{}' at line {} ignored",
                post.old_basename, post.line
            );
            self.set.duplicates += 1;
            return None;
        }

        let candidate = self.candidate(post);
        let new_basename = self.disambiguate(&candidate);
        if new_basename != candidate {
            debug!(
                "Basename '{}' already taken, using '{}' for '{}'",
                candidate, new_basename, post.old_basename
            );
        }
        debug_assert!(is_valid_basename(&new_basename), "{:?}", new_basename);

        if let Some(unique_url) = &post.unique_url
            && !self.migration.is_under_old_root(unique_url)
        {
            warn!(
                "Post '{}' at line {} lives at {}, outside http(s)://{}/",
                post.old_basename,
                post.line,
                unique_url,
                self.migration.old_url_root()
            );
            self.set.root_mismatches += 1;
        }

        self.set
            .basenames
            .insert(&post.old_basename, &new_basename, &post.title);
        self.set.urls.insert(
            old_post_url(self.migration, post.old_scheme(), &post.date, &post.old_basename),
            new_post_url(self.migration, &post.date, &new_basename),
        );

        Some(new_basename)
    }

    pub fn add_skipped(&mut self, skipped: SkippedPost) {
        warn!(
            "Skipping post at line {} ({}): {}",
            skipped.line,
            skipped.old_basename.as_deref().unwrap_or("no basename"),
            skipped.reason
        );
        self.set.skipped.push(skipped);
    }

    pub fn finish(self) -> MappingSet {
        self.set
    }

    fn candidate(&self, post: &PostRecord) -> String {
        let from_title = self.normalizer.normalize(&post.title);
        if !from_title.is_empty() {
            return from_title;
        }

        let from_basename = self.normalizer.normalize_old_basename(&post.old_basename);
        debug!(
            "Title '{}' has no usable characters, falling back to '{}'",
            post.title, from_basename
        );
        if from_basename.is_empty() {
            LAST_RESORT_BASENAME.to_string()
        } else {
            from_basename
        }
    }

    fn disambiguate(&self, candidate: &str) -> String {
        if !self.set.basenames.is_assigned(candidate) {
            return candidate.to_string();
        }

        (2..)
            .map(|n| format!("{}-{}", candidate, n))
            .find(|suffixed| !self.set.basenames.is_assigned(suffixed))
            .unwrap_or_else(|| candidate.to_string())
    }
}

pub fn old_post_url(
    migration: &MigrationConfig,
    scheme: &str,
    date: &PostDate,
    old_basename: &str,
) -> String {
    format!(
        "{}://{}/{}/{}.html",
        scheme,
        migration.old_url_root(),
        date,
        old_basename
    )
}

pub fn new_post_url(migration: &MigrationConfig, date: &PostDate, new_basename: &str) -> String {
    format!("https://{}/{}/{}", migration.new_domain, date, new_basename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MappingSet, SkipReason};
    use crate::parser::is_valid_basename;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn post(old: &str, title: &str, year: u16, month: u8) -> PostRecord {
        PostRecord::new(
            old.to_string(),
            title.to_string(),
            PostDate::new(year, month).unwrap(),
            1,
        )
    }

    fn new_url_for<'s>(set: &'s MappingSet, old_url: &str) -> Option<&'s str> {
        set.urls
            .entries()
            .iter()
            .find(|r| r.old_url == old_url)
            .map(|r| r.new_url.as_str())
    }

    #[test]
    fn test_maps_truncated_basename_to_full_title() {
        let config = Config::default_config();
        let mut builder = MappingBuilder::new(&config.migration);

        let new = builder.add_post(&post("a_day_in_the_l", "A Day In The Life, Revisited!", 2009, 4));
        assert_eq!(new.as_deref(), Some("a-day-in-the-life-revisited"));

        let set = builder.finish();
        assert_eq!(set.basenames.get("a_day_in_the_l"), Some("a-day-in-the-life-revisited"));
        assert_eq!(
            new_url_for(&set, "http://gumption.typepad.com/2009/04/a_day_in_the_l.html"),
            Some("https://interrelativity.com/2009/04/a-day-in-the-life-revisited")
        );
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let config = Config::default_config();
        let mut builder = MappingBuilder::new(&config.migration);

        builder.add_post(&post("update", "Update", 2009, 4));
        builder.add_post(&post("update_1", "Update", 2009, 4));
        builder.add_post(&post("update_2", "Update!", 2009, 5));

        let set = builder.finish();
        assert_eq!(set.basenames.get("update"), Some("update"));
        assert_eq!(set.basenames.get("update_1"), Some("update-2"));
        assert_eq!(set.basenames.get("update_2"), Some("update-3"));
        assert_eq!(
            new_url_for(&set, "http://gumption.typepad.com/2009/04/update_1.html"),
            Some("https://interrelativity.com/2009/04/update-2")
        );
    }

    #[test]
    fn test_suffixed_value_does_not_collide_with_natural_title() {
        let config = Config::default_config();
        let mut builder = MappingBuilder::new(&config.migration);

        builder.add_post(&post("update", "Update", 2009, 4));
        builder.add_post(&post("update_1", "Update", 2009, 4));
        builder.add_post(&post("update_2", "Update 2", 2009, 6));

        let set = builder.finish();
        assert_eq!(set.basenames.get("update_2"), Some("update-2-2"));

        let values: HashSet<_> = set
            .basenames
            .entries()
            .iter()
            .map(|e| e.new_basename.clone())
            .collect();
        assert_eq!(values.len(), set.basenames.len());
    }

    #[test]
    fn test_duplicate_old_basename_first_wins() {
        let config = Config::default_config();
        let mut builder = MappingBuilder::new(&config.migration);

        assert!(builder.add_post(&post("dup", "First Title", 2009, 4)).is_some());
        assert!(builder.add_post(&post("dup", "Second Title", 2010, 1)).is_none());

        let set = builder.finish();
        assert_eq!(set.basenames.get("dup"), Some("first-title"));
        assert_eq!(set.basenames.len(), 1);
        assert_eq!(set.urls.len(), 1);
        assert_eq!(set.duplicates, 1);
    }

    #[test]
    fn test_empty_title_falls_back_to_old_basename() {
        let config = Config::default_config();
        let mut builder = MappingBuilder::new(&config.migration);

        builder.add_post(&post("what_now", "?!?", 2009, 4));
        builder.add_post(&post("___", "...", 2009, 4));
        builder.add_post(&post("____", "", 2009, 4));

        let set = builder.finish();
        assert_eq!(set.basenames.get("what_now"), Some("what-now"));
        assert_eq!(set.basenames.get("___"), Some("post"));
        assert_eq!(set.basenames.get("____"), Some("post-2"));
        assert!(set.basenames.entries().iter().all(|e| is_valid_basename(&e.new_basename)));
    }

    #[test]
    fn test_old_path_prefix_in_old_url() {
        let mut config = Config::default_config();
        config.migration.old_path_prefix = "blog".to_string();
        let mut builder = MappingBuilder::new(&config.migration);

        builder.add_post(&post("hello_world", "Hello World", 2006, 11));

        let set = builder.finish();
        assert_eq!(
            set.urls.entries()[0].old_url,
            "http://gumption.typepad.com/blog/2006/11/hello_world.html"
        );
        assert_eq!(
            set.urls.entries()[0].new_url,
            "https://interrelativity.com/2006/11/hello-world"
        );
    }

    #[test]
    fn test_https_unique_url_keeps_scheme_in_old_url() {
        let config = Config::default_config();
        let content = "\
TITLE: Secure
BASENAME: secure
UNIQUE URL: https://gumption.typepad.com/2009/04/secure.html
DATE: 04/12/2009 10:15:00 AM
-----
--------
TITLE: Plain
BASENAME: plain
UNIQUE URL: http://gumption.typepad.com/2009/04/plain.html
-----
";
        let set = MappingBuilder::build(&config, content);

        let old_urls: Vec<_> = set.urls.entries().iter().map(|r| r.old_url.as_str()).collect();
        assert_eq!(
            old_urls,
            vec![
                "https://gumption.typepad.com/2009/04/secure.html",
                "http://gumption.typepad.com/2009/04/plain.html",
            ]
        );
        assert_eq!(set.root_mismatches, 0);
    }

    #[test]
    fn test_unique_url_outside_old_root_is_counted() {
        let config = Config::default_config();
        let content = "\
TITLE: Hello World
BASENAME: hello_world
UNIQUE URL: http://gumption.typepad.com/blog/2009/04/hello_world.html
-----
";
        let set = MappingBuilder::build(&config, content);
        assert_eq!(set.basenames.len(), 1);
        assert_eq!(set.root_mismatches, 1);

        let mut config = Config::default_config();
        config.migration.old_path_prefix = "blog".to_string();
        let set = MappingBuilder::build(&config, content);
        assert_eq!(set.root_mismatches, 0);
        assert_eq!(
            set.urls.entries()[0].old_url,
            "http://gumption.typepad.com/blog/2009/04/hello_world.html"
        );
    }

    #[test]
    fn test_uppercase_only_glyphs_never_reach_the_mapping() {
        let config = Config::default_config();
        let content = "\
TITLE: 𝐀 Plus ϒ
BASENAME: math
DATE: 04/12/2009 10:15:00 AM
-----
--------
TITLE: 𝐀𝐁𝐂
BASENAME: bold_abc
DATE: 04/13/2009 10:15:00 AM
-----
";
        let set = MappingBuilder::build(&config, content);

        assert_eq!(set.basenames.get("math"), Some("plus"));
        assert_eq!(set.basenames.get("bold_abc"), Some("bold-abc"));
        assert!(set.basenames.entries().iter().all(|e| is_valid_basename(&e.new_basename)));
    }

    #[test]
    fn test_build_from_export_is_deterministic() {
        let config = Config::default_config();
        let content = "\
TITLE: Update
BASENAME: update
DATE: 04/01/2009 10:00:00 AM
-----
--------
BASENAME: no_title
DATE: 04/02/2009 10:00:00 AM
-----
--------
TITLE: Update
BASENAME: update_1
DATE: 04/03/2009 10:00:00 AM
-----
--------
TITLE: Update again
BASENAME: update
DATE: 04/04/2009 10:00:00 AM
-----
";
        let first = MappingBuilder::build(&config, content);
        let second = MappingBuilder::build(&config, content);
        assert_eq!(first, second);

        let rows: Vec<_> = first
            .basenames
            .entries()
            .iter()
            .map(|e| (e.old_basename.as_str(), e.new_basename.as_str()))
            .collect();
        assert_eq!(rows, vec![("update", "update"), ("update_1", "update-2")]);
        assert_eq!(first.skipped.len(), 1);
        assert_eq!(first.skipped[0].reason, SkipReason::MissingTitle);
        assert_eq!(first.duplicates, 1);
        assert_eq!(first.posts_seen(), 4);
    }
}
