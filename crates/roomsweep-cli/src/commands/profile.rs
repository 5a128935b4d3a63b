//! Measurement profile management commands.

use clap::{Args, Subcommand};
use roomsweep_config::{
    MeasurementProfile, ensure_user_profiles_dir, factory_profiles, get_factory_profile,
    list_user_profiles, profile_name_from_path, user_profiles_dir,
};
use std::path::PathBuf;

use super::common::load_profile;

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// List available profiles (factory and user)
    List {
        /// Show only factory profiles
        #[arg(long)]
        factory: bool,

        /// Show only user profiles
        #[arg(long)]
        user: bool,
    },

    /// Print a profile as TOML
    Show {
        /// Profile name or path
        name: String,
    },

    /// Create a user profile from a factory profile
    Init {
        /// Name for the new profile
        name: String,

        /// Factory profile to start from
        #[arg(long, default_value = "default")]
        from: String,

        /// Write here instead of the user profiles directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },

    /// Show the profile directory
    Paths,
}

pub fn run(args: ProfileArgs) -> anyhow::Result<()> {
    match args.command {
        ProfileCommand::List { factory, user } => {
            let show_factory = factory || !user;
            let show_user = user || !factory;

            if show_factory {
                println!("Factory profiles:");
                for profile in factory_profiles() {
                    println!(
                        "  {:<12} {}",
                        profile.name,
                        profile.description.as_deref().unwrap_or("")
                    );
                }
            }

            if show_user {
                if show_factory {
                    println!();
                }
                println!("User profiles ({}):", user_profiles_dir().display());
                let paths = list_user_profiles();
                if paths.is_empty() {
                    println!("  (none)");
                }
                for path in paths {
                    let name = profile_name_from_path(&path).unwrap_or_default();
                    match MeasurementProfile::load(&path) {
                        Ok(profile) => println!("  {:<12} {}", name, profile.name),
                        Err(e) => println!("  {:<12} (unreadable: {})", name, e),
                    }
                }
            }
        }

        ProfileCommand::Show { name } => {
            let profile = load_profile(Some(&name))?;
            print!("{}", profile.to_toml()?);
        }

        ProfileCommand::Init {
            name,
            from,
            output,
            force,
        } => {
            let Some(mut profile) = get_factory_profile(&from) else {
                anyhow::bail!(
                    "Factory profile '{}' not found. Use 'roomsweep profile list --factory'.",
                    from
                );
            };
            profile.name.clone_from(&name);

            let path = match output {
                Some(path) => path,
                None => ensure_user_profiles_dir()?.join(format!("{name}.toml")),
            };
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                );
            }

            profile.save(&path)?;
            println!("Created profile '{}' from '{}' at {}", name, from, path.display());
        }

        ProfileCommand::Paths => {
            println!("User profiles: {}", user_profiles_dir().display());
        }
    }

    Ok(())
}
