//! `envp use`: sets the default profile.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons::{self, HandlerContext};

const EXAMPLE: &str = t!("use.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("use.about"))]
struct UseArgs {
    /// Profile to make the default.
    name: String,
}

/// Handles `envp use <name>`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let use_args = UseArgs::try_parse_from(&args)?;
    let name = use_args.name.trim().to_string();

    let store = ctx.open_store()?;
    let mut config = store.read()?;

    config
        .profiles
        .find(&name)
        .map_err(|e| commons::with_example(e, EXAMPLE))?;

    if config.default == name {
        println!("{}", format!(t!("use.info.already_default"), name = name));
        return Ok(());
    }

    config
        .set_default(&name)
        .map_err(|e| commons::with_example(e, EXAMPLE))?;

    let expected = format!(t!("use.verify"), name = name);
    config.commit_verified(&expected, |saved| saved.default == name)?;

    println!("{} {}", t!("use.success"), name.green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile_tree::ProfileError;

    fn context_in(temp_dir: &tempfile::TempDir) -> HandlerContext {
        let path = temp_dir.path().join("config.yaml");
        HandlerContext::new(Some(path.to_string_lossy().into_owned()))
    }

    #[test]
    fn test_empty_name_is_rejected_even_without_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context_in(&temp_dir);

        let err = handle(vec![String::new()], &ctx).unwrap_err();

        assert_eq!(err.downcast_ref::<ProfileError>(), Some(&ProfileError::ProfileNameEmpty));
    }

    #[test]
    fn test_use_sets_existing_profile_as_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context_in(&temp_dir);
        {
            let store = ctx.open_store().unwrap();
            let mut config = store.read().unwrap();
            config
                .set_profile("docker", crate::models::Profile::new("", vec![crate::models::Env::new("A", "b")]))
                .unwrap();
            config.save().unwrap();
        }

        handle(vec!["docker".to_string()], &ctx).unwrap();
        handle(vec!["docker".to_string()], &ctx).unwrap();

        let store = ctx.open_store().unwrap();
        assert_eq!(store.read().unwrap().default, "docker");
    }
}
