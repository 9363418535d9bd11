//! # Profile Tree
//!
//! Path-addressed operations over the nested `Profiles` namespace. A path is a
//! dot-delimited list of segments (`lab.cluster1`); every operation walks the
//! tree from the root, so nodes never need to know their parent.
//!
//! `Config` lookups built on top of the tree (default profile, current
//! profile) live here as well, since they share the same error taxonomy.

use crate::{
    constants::{PROFILE_PATH_DELIMITER, RESERVED_PROFILE_KEYS},
    models::{Config, Profile, Profiles, ResolvedProfile},
};
use thiserror::Error;

/// Represents errors that can occur while addressing profiles by path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The given profile path is empty or only whitespace.
    #[error("input profile name is empty")]
    ProfileNameEmpty,
    /// A segment of the path is not a valid profile name.
    #[error("invalid profile name '{name}': {reason}")]
    InvalidProfileName {
        /// The full path that was rejected.
        name: String,
        /// Why the path was rejected.
        reason: &'static str,
    },
    /// No profile exists at the given path.
    #[error("profile {0} is not existing")]
    ProfileNotExisting(String),
    /// An intermediate group of the path does not exist.
    #[error("parent profile of {0} is not existing")]
    ParentNotExisting(String),
    /// Replacing the node would discard its nested profiles.
    #[error("profile {0} has nested profiles and cannot be replaced; edit it instead")]
    ProfileHasChildren(String),
    /// No profile was given and the store has no default.
    #[error("default profile is not set. please set default profile")]
    DefaultProfileNotSet,
}

impl ProfileError {
    /// Errors caused by how the profile was selected; the CLI reprints the
    /// command's usage example for these.
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Self::ProfileNameEmpty | Self::DefaultProfileNotSet)
    }
}

type ProfileResult<T> = Result<T, ProfileError>;

/// Splits and validates a dotted profile path.
fn split_path(path: &str) -> ProfileResult<Vec<&str>> {
    if path.trim().is_empty() {
        return Err(ProfileError::ProfileNameEmpty);
    }

    let segments: Vec<&str> = path.split(PROFILE_PATH_DELIMITER).collect();
    for segment in &segments {
        let reason = if segment.is_empty() {
            Some("empty segment between delimiters")
        } else if segment.chars().any(char::is_whitespace) {
            Some("whitespace is not allowed")
        } else if RESERVED_PROFILE_KEYS.contains(segment) {
            Some("the name is reserved for profile fields")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ProfileError::InvalidProfileName {
                name: path.to_string(),
                reason,
            });
        }
    }
    Ok(segments)
}

impl Profiles {
    /// Finds the profile at `path`.
    pub fn find(&self, path: &str) -> ProfileResult<&Profile> {
        let segments = split_path(path)?;
        self.walk(&segments)
            .ok_or_else(|| ProfileError::ProfileNotExisting(path.to_string()))
    }

    /// Finds the profile at `path` for in-place editing. Children are kept.
    pub fn find_mut(&mut self, path: &str) -> ProfileResult<&mut Profile> {
        let segments = split_path(path)?;
        self.walk_mut(&segments)
            .ok_or_else(|| ProfileError::ProfileNotExisting(path.to_string()))
    }

    /// Finds the parent of the profile at `path`.
    ///
    /// A single-segment path lives at the root and yields `Ok(None)`.
    pub fn find_parent(&self, path: &str) -> ProfileResult<Option<&Profile>> {
        let segments = split_path(path)?;
        match segments.split_last() {
            Some((_, parents)) if !parents.is_empty() => self
                .walk(parents)
                .map(Some)
                .ok_or_else(|| ProfileError::ParentNotExisting(path.to_string())),
            _ => Ok(None),
        }
    }

    /// Stores `profile` at `path`, creating intermediate groups as needed.
    ///
    /// An existing node without children is replaced. A node that already has
    /// children is never replaced, so a subtree cannot be dropped by accident.
    pub fn set(&mut self, path: &str, profile: Profile) -> ProfileResult<()> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ProfileError::ProfileNameEmpty);
        };

        let mut siblings = &mut self.0;
        for segment in parents {
            siblings = &mut siblings.entry((*segment).to_string()).or_default().children.0;
        }

        if siblings.get(*leaf).is_some_and(|existing| !existing.children.is_empty()) {
            return Err(ProfileError::ProfileHasChildren(path.to_string()));
        }

        log::debug!("Setting profile '{}'", path);
        siblings.insert((*leaf).to_string(), profile);
        Ok(())
    }

    /// Removes the profile at `path` together with its nested profiles.
    pub fn delete(&mut self, path: &str) -> ProfileResult<()> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ProfileError::ProfileNameEmpty);
        };

        let siblings = if parents.is_empty() {
            &mut self.0
        } else {
            &mut self
                .walk_mut(parents)
                .ok_or_else(|| ProfileError::ProfileNotExisting(path.to_string()))?
                .children
                .0
        };

        log::debug!("Deleting profile '{}'", path);
        siblings
            .remove(*leaf)
            .map(|_| ())
            .ok_or_else(|| ProfileError::ProfileNotExisting(path.to_string()))
    }

    /// Lists the dotted paths of every node carrying at least one env entry.
    ///
    /// Groups without envs are skipped but still descended into. The result
    /// is sorted and free of duplicates.
    pub fn list_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names("", self, &mut names);
        names.sort();
        names.dedup();
        names
    }

    fn walk(&self, segments: &[&str]) -> Option<&Profile> {
        let (first, rest) = segments.split_first()?;
        let mut node = self.0.get(*first)?;
        for segment in rest {
            node = node.children.0.get(*segment)?;
        }
        Some(node)
    }

    fn walk_mut(&mut self, segments: &[&str]) -> Option<&mut Profile> {
        let (first, rest) = segments.split_first()?;
        let mut node = self.0.get_mut(*first)?;
        for segment in rest {
            node = node.children.0.get_mut(*segment)?;
        }
        Some(node)
    }
}

/// Depth-first walk building `parent.child` names.
fn collect_names(prefix: &str, profiles: &Profiles, names: &mut Vec<String>) {
    for (name, profile) in profiles.iter() {
        let full_name = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}{}{}", prefix, PROFILE_PATH_DELIMITER, name)
        };
        if !profile.env.is_empty() {
            names.push(full_name.clone());
        }
        collect_names(&full_name, &profile.children, names);
    }
}

impl Config {
    /// Looks up a profile by path and flags whether it is the default.
    pub fn profile<'a>(&'a self, name: &'a str) -> ProfileResult<ResolvedProfile<'a>> {
        let profile = self.profiles.find(name)?;
        Ok(ResolvedProfile {
            name,
            profile,
            is_default: self.default == name,
        })
    }

    /// Looks up the default profile.
    pub fn default_profile(&self) -> ProfileResult<ResolvedProfile<'_>> {
        if self.default.is_empty() {
            return Err(ProfileError::DefaultProfileNotSet);
        }
        self.profile(&self.default)
    }

    /// The explicitly named profile, or the default one when `name` is `None`.
    pub fn current_profile<'a>(&'a self, name: Option<&'a str>) -> ProfileResult<ResolvedProfile<'a>> {
        match name {
            Some(name) => self.profile(name),
            None => self.default_profile(),
        }
    }

    /// Stores a profile at `name` (see [`Profiles::set`]).
    pub fn set_profile(&mut self, name: &str, profile: Profile) -> ProfileResult<()> {
        self.profiles.set(name, profile)
    }

    /// Deletes a profile. Returns `true` when the default profile pointed at
    /// the deleted node (or inside it) and was cleared.
    pub fn delete_profile(&mut self, name: &str) -> ProfileResult<bool> {
        self.profiles.delete(name)?;

        let nested_prefix = format!("{}{}", name, PROFILE_PATH_DELIMITER);
        let default_removed = self.default == name || self.default.starts_with(&nested_prefix);
        if default_removed {
            log::debug!("Clearing default profile '{}'", self.default);
            self.default.clear();
        }
        Ok(default_removed)
    }

    /// Makes `name` the default profile. The profile must exist.
    pub fn set_default(&mut self, name: &str) -> ProfileResult<()> {
        self.profiles.find(name)?;
        self.default = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Env;

    fn profile_with_env(name: &str, value: &str) -> Profile {
        Profile::new(format!("{} profile", name), vec![Env::new(name, value)])
    }

    fn sample_tree() -> Profiles {
        let mut profiles = Profiles::default();
        profiles.set("docker", profile_with_env("DOCKER_HOST", "ssh://a")).unwrap();
        profiles.set("lab.cluster1", profile_with_env("KUBECONFIG", "one")).unwrap();
        profiles.set("lab.cluster2", profile_with_env("KUBECONFIG", "two")).unwrap();
        profiles.set("org.team.dev", profile_with_env("STAGE", "dev")).unwrap();
        profiles
    }

    // --- Find / FindParent ---

    #[test]
    fn test_set_then_find_returns_same_profile() {
        let mut profiles = sample_tree();
        let value = profile_with_env("NEW", "value");
        profiles.set("lab.cluster3", value.clone()).unwrap();

        assert_eq!(profiles.find("lab.cluster3").unwrap(), &value);
        // Siblings at every level are untouched.
        assert!(profiles.find("lab.cluster1").is_ok());
        assert!(profiles.find("lab.cluster2").is_ok());
        assert!(profiles.find("docker").is_ok());
    }

    #[test]
    fn test_set_creates_intermediate_groups() {
        let profiles = sample_tree();
        let org = profiles.find("org").unwrap();
        assert!(org.env.is_empty());
        assert!(profiles.find("org.team").is_ok());
    }

    #[test]
    fn test_find_missing_profile() {
        let profiles = sample_tree();
        assert_eq!(
            profiles.find("lab.cluster9"),
            Err(ProfileError::ProfileNotExisting("lab.cluster9".to_string()))
        );
        assert!(matches!(profiles.find("nope.cluster1"), Err(ProfileError::ProfileNotExisting(_))));
    }

    #[test]
    fn test_malformed_paths_fail_cleanly() {
        let profiles = sample_tree();
        assert_eq!(profiles.find(""), Err(ProfileError::ProfileNameEmpty));
        assert_eq!(profiles.find("   "), Err(ProfileError::ProfileNameEmpty));
        for path in [".lab", "lab.", "lab..cluster1", "my lab", "lab.env"] {
            assert!(
                matches!(profiles.find(path), Err(ProfileError::InvalidProfileName { .. })),
                "path {:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_find_parent() {
        let profiles = sample_tree();
        assert_eq!(profiles.find_parent("docker"), Ok(None));

        let parent = profiles.find_parent("lab.cluster1").unwrap().unwrap();
        assert!(parent.children.get("cluster1").is_some());

        // The leaf itself does not need to exist.
        assert!(profiles.find_parent("lab.unknown").unwrap().is_some());
        assert_eq!(
            profiles.find_parent("ghost.cluster1"),
            Err(ProfileError::ParentNotExisting("ghost.cluster1".to_string()))
        );
    }

    // --- Set policy ---

    #[test]
    fn test_set_replaces_leaf_profile() {
        let mut profiles = sample_tree();
        profiles.set("docker", profile_with_env("DOCKER_HOST", "tcp://b")).unwrap();
        assert_eq!(profiles.find("docker").unwrap().env[0].value, "tcp://b");
    }

    #[test]
    fn test_set_refuses_to_replace_node_with_children() {
        let mut profiles = sample_tree();
        let result = profiles.set("lab", profile_with_env("LAB", "1"));
        assert_eq!(result, Err(ProfileError::ProfileHasChildren("lab".to_string())));
        assert!(profiles.find("lab.cluster1").is_ok());
    }

    #[test]
    fn test_find_mut_keeps_children() {
        let mut profiles = sample_tree();
        profiles.find_mut("lab").unwrap().env.push(Env::new("LAB", "1"));
        assert!(profiles.find("lab.cluster2").is_ok());
        assert!(profiles.list_names().contains(&"lab".to_string()));
    }

    // --- Delete ---

    #[test]
    fn test_delete_nested_keeps_parent() {
        let mut profiles = sample_tree();
        profiles.delete("lab.cluster1").unwrap();
        assert!(matches!(profiles.find("lab.cluster1"), Err(ProfileError::ProfileNotExisting(_))));
        assert!(profiles.find("lab").is_ok());
        assert!(profiles.find("lab.cluster2").is_ok());
    }

    #[test]
    fn test_delete_root_level_and_missing() {
        let mut profiles = sample_tree();
        profiles.delete("docker").unwrap();
        assert!(profiles.find("docker").is_err());

        assert!(matches!(profiles.delete("docker"), Err(ProfileError::ProfileNotExisting(_))));
        assert!(matches!(profiles.delete("ghost.child"), Err(ProfileError::ProfileNotExisting(_))));
        assert_eq!(profiles.delete(""), Err(ProfileError::ProfileNameEmpty));
    }

    // --- ListNames ---

    #[test]
    fn test_list_names_excludes_groups_and_is_sorted() {
        let profiles = sample_tree();
        assert_eq!(
            profiles.list_names(),
            vec!["docker", "lab.cluster1", "lab.cluster2", "org.team.dev"]
        );
    }

    #[test]
    fn test_list_names_includes_group_with_envs() {
        let mut profiles = sample_tree();
        profiles.find_mut("org").unwrap().env.push(Env::new("ORG", "x"));
        let names = profiles.list_names();
        assert!(names.contains(&"org".to_string()));
        assert!(!names.contains(&"org.team".to_string()));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    // --- Config lookups ---

    #[test]
    fn test_default_profile_lookup() {
        let mut config = Config {
            default: String::new(),
            profiles: sample_tree(),
        };
        assert!(matches!(config.default_profile(), Err(ProfileError::DefaultProfileNotSet)));
        assert!(matches!(config.current_profile(None), Err(ProfileError::DefaultProfileNotSet)));

        config.set_default("lab.cluster2").unwrap();
        let resolved = config.current_profile(None).unwrap();
        assert_eq!(resolved.name, "lab.cluster2");
        assert!(resolved.is_default);

        let explicit = config.current_profile(Some("docker")).unwrap();
        assert!(!explicit.is_default);
    }

    #[test]
    fn test_set_default_requires_existing_profile() {
        let mut config = Config {
            default: String::new(),
            profiles: sample_tree(),
        };
        assert!(config.set_default("ghost").is_err());
        assert!(config.default.is_empty());
    }

    #[test]
    fn test_deleting_default_or_its_group_clears_default() {
        let mut config = Config {
            default: "lab.cluster1".to_string(),
            profiles: sample_tree(),
        };
        assert!(!config.delete_profile("docker").unwrap());
        assert_eq!(config.default, "lab.cluster1");

        assert!(config.delete_profile("lab").unwrap());
        assert!(config.default.is_empty());
    }
}
