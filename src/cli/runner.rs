//! Runner wiring arguments, credentials and the registry workflows together

use crate::cli::args::Args;
use crate::cli::operation_mode::OperationMode;
use crate::error::{Result, ResultExt};
use crate::image::ImageReference;
use crate::logging::Logger;
use crate::output::tag_added_message;
use crate::registry::{
    CredentialResolver, Credentials, LoginFileResolver, RegistryClient, StaticCredentials,
    copy_tag, find_equivalent_tags,
};
use std::io::Write;

pub struct Runner {
    args: Args,
    logger: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let logger = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Run against stdout with the credential source selected by the arguments.
    pub async fn run(&self) -> Result<()> {
        let resolver = self.credential_resolver();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(resolver.as_ref(), &mut out).await
    }

    /// `--creds` wins; otherwise the login files (or `--authfile` alone).
    pub fn credential_resolver(&self) -> Box<dyn CredentialResolver> {
        if let Some(creds) = self.args.explicit_creds() {
            return Box::new(StaticCredentials(Credentials::from_flag(creds)));
        }

        match &self.args.authfile {
            Some(path) => Box::new(LoginFileResolver::with_authfile(path, self.logger.clone())),
            None => Box::new(LoginFileResolver::from_env(self.logger.clone())),
        }
    }

    pub async fn run_with<W: Write>(
        &self,
        resolver: &dyn CredentialResolver,
        out: &mut W,
    ) -> Result<()> {
        let mode = OperationMode::from_args(&self.args);
        self.logger.section(mode.description());

        let (image, new_tag) = match &mode {
            OperationMode::Usage => {
                write!(out, "{}", Args::usage())?;
                return Ok(());
            }
            OperationMode::ListEquivalents { image } => (image, None),
            OperationMode::AddTag { image, new_tag } => (image, Some(new_tag)),
        };

        let reference = ImageReference::parse(image)?;
        self.logger.summary_kv(
            "Image",
            &[
                ("registry", reference.registry_url()),
                ("repository", reference.repository.clone()),
                ("tag", reference.tag.clone()),
            ],
        );

        let credentials = resolver
            .resolve(&reference.registry)
            .context("parsing docker authentication failed")?;
        if credentials.is_anonymous() {
            self.logger.verbose("Sending requests anonymously");
        } else {
            self.logger
                .verbose(&format!("Authenticating as {}", credentials.username));
        }

        let base_tag = reference.tag.clone();
        let client = RegistryClient::builder(reference)
            .with_credentials(credentials)
            .with_logger(self.logger.clone())
            .build()?;

        match new_tag {
            None => {
                let table = find_equivalent_tags(&client, &base_tag).await?;
                self.logger.verbose(&format!(
                    "{} tag(s) share the config of {}",
                    table.rows().len(),
                    base_tag
                ));
                table.write_to(out)?;
            }
            Some(new_tag) => {
                ImageReference::validate_tag(new_tag)
                    .with_context(|| format!("invalid new tag {}", new_tag))?;
                copy_tag(&client, &base_tag, new_tag).await?;
                writeln!(out, "{}", tag_added_message(new_tag, image))?;
            }
        }

        if let Some(elapsed) = self.logger.elapsed() {
            self.logger
                .verbose(&format!("Done in {}", self.logger.format_duration(elapsed)));
        }

        Ok(())
    }
}
