//! Interactive GitHub authentication

use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::{Confirm, Password};
use linmerge::auth::{AuthSource, GitHubAuthConfig, get_github_auth, test_github_auth};
use linmerge::config::{RC_FILE_NAME, save_token};
use linmerge::error::{Error, Result};
use std::path::Path;

const TOKEN_URL: &str = "https://github.com/settings/tokens";

/// Resolve a working token, offering to set one up when none works
pub async fn ensure_authenticated(
    flag: Option<&str>,
    config_token: Option<&str>,
    config_path: &Path,
) -> Result<GitHubAuthConfig> {
    match get_github_auth(flag, config_token).await {
        Ok(auth) if test_github_auth(&auth.token, None).await? => {
            tracing::debug!(source = %auth.source, "GitHub authentication succeeded");
            Ok(auth)
        }
        Ok(auth) => {
            println!(
                "{}",
                format!(
                    "Error: GitHub authentication failed (token from {})",
                    auth.source
                )
                .error()
            );
            reauthenticate(config_path).await
        }
        Err(e) => {
            println!(
                "{}",
                format!("Error: Could not authenticate because {e}").error()
            );
            reauthenticate(config_path).await
        }
    }
}

/// Ask for a new token, validate it and save it
pub async fn reauthenticate(config_path: &Path) -> Result<GitHubAuthConfig> {
    let now = Confirm::new()
        .with_prompt("Do you want to (re)authenticate now?")
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?;

    if !now {
        print_manual_setup();
        return Err(Error::Auth("no valid GitHub token".to_string()));
    }

    println!(
        "| Go to {} and generate a new access token (repo, user)",
        TOKEN_URL.accent()
    );
    loop {
        let token = Password::new()
            .with_prompt("Enter the GitHub Access Token")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read token: {e}")))?;
        let token = token.trim().to_string();

        if token.is_empty() {
            println!("{}", "Error: Not a valid token. Please try again".error());
            continue;
        }
        if !test_github_auth(&token, None).await? {
            println!(
                "{}",
                "Error: GitHub authentication failed, did you enter the correct token?".error()
            );
            continue;
        }

        save_token(config_path, &token)?;
        println!("{} Saved token to {}", check(), config_path.display());
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Prompt,
        });
    }
}

fn print_manual_setup() {
    println!("| Ok. To set up authentication manually, follow these steps:");
    println!("  1. Go to {TOKEN_URL} and generate a new access token (repo, user)");
    println!("  2. Create `~/{RC_FILE_NAME}` with the following contents:");
    println!("     [auth]");
    println!("     github_access_token = \"YOUR_GITHUB_ACCESS_TOKEN\"");
    println!("  3. Re-run this command to try again");
    println!(
        "{}",
        "   GITHUB_TOKEN, GH_TOKEN and `gh auth login` are also supported.".muted()
    );
}

/// Run the auth command: report the current token, offer to replace it
pub async fn run_auth(
    flag: Option<&str>,
    config_token: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    match get_github_auth(flag, config_token).await {
        Ok(auth) if test_github_auth(&auth.token, None).await? => {
            println!(
                "{} Authenticated with GitHub (token from {})",
                check(),
                auth.source.emphasis()
            );
            Ok(())
        }
        _ => reauthenticate(config_path).await.map(drop),
    }
}
