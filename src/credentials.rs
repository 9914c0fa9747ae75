//! Credential acquisition: command-line flags with masked prompts for
//! anything missing.

use crate::Result;
use clap::Args;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Credential flags accepted on the command line.
///
/// All three are optional; each omitted flag triggers exactly one
/// interactive prompt with input echo suppressed.
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// Your API client ID
    #[arg(long)]
    pub id: Option<String>,

    /// Your API client secret
    #[arg(long)]
    pub secret: Option<String>,

    /// Your Bitwarden master password
    #[arg(long)]
    pub password: Option<String>,
}

/// The three secrets needed to open a vault session.
///
/// Values are used verbatim, with no format or strength validation.
/// Memory is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// API client id.
    pub client_id: String,
    /// API client secret.
    pub client_secret: String,
    /// Master password, also used to key the backup archive.
    pub master_password: String,
}

impl Credentials {
    /// Resolves credentials from flags, prompting for omitted ones.
    pub fn acquire(args: CredentialArgs) -> Result<Self> {
        Self::acquire_with(args, |prompt| {
            rpassword::prompt_password(prompt).map_err(Into::into)
        })
    }

    /// Resolution with an injectable prompt, so tests can count and
    /// script the interactive path.
    fn acquire_with<F>(args: CredentialArgs, mut prompt: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let client_id = match args.id {
            Some(id) => id,
            None => prompt("Please enter your Bitwarden API client ID: ")?,
        };

        let client_secret = match args.secret {
            Some(secret) => secret,
            None => prompt("Please enter your API client secret: ")?,
        };

        let master_password = match args.password {
            Some(password) => password,
            None => prompt("Please enter your Bitwarden master password: ")?,
        };

        Ok(Self {
            client_id,
            client_secret,
            master_password,
        })
    }
}

impl std::fmt::Debug for Credentials {
    // Secrets never appear in debug output or logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .field("master_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: Option<&str>, secret: Option<&str>, password: Option<&str>) -> CredentialArgs {
        CredentialArgs {
            id: id.map(String::from),
            secret: secret.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_all_flags_no_prompts() {
        let mut prompts = 0;
        let creds = Credentials::acquire_with(args(Some("id"), Some("sec"), Some("pw")), |_| {
            prompts += 1;
            Ok("prompted".to_string())
        })
        .unwrap();

        assert_eq!(prompts, 0);
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "sec");
        assert_eq!(creds.master_password, "pw");
    }

    #[test]
    fn test_one_prompt_per_omitted_flag() {
        let mut prompts = Vec::new();
        let creds = Credentials::acquire_with(args(Some("id"), None, None), |p| {
            prompts.push(p.to_string());
            Ok(format!("value-{}", prompts.len()))
        })
        .unwrap();

        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("client secret"));
        assert!(prompts[1].contains("master password"));
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "value-1");
        assert_eq!(creds.master_password, "value-2");
    }

    #[test]
    fn test_all_omitted_prompts_three_times() {
        let mut prompts = 0;
        Credentials::acquire_with(args(None, None, None), |_| {
            prompts += 1;
            Ok("x".to_string())
        })
        .unwrap();

        assert_eq!(prompts, 3);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            client_id: "user.abc123".to_string(),
            client_secret: "hunter2".to_string(),
            master_password: "correct horse".to_string(),
        };

        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("correct horse"));
        assert!(rendered.contains("<redacted>"));
    }
}
