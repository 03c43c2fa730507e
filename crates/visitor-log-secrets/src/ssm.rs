//! AWS Systems Manager Parameter Store provider.

use async_trait::async_trait;
use aws_sdk_ssm::Client;

use crate::batch::{Batch, fetch_batched};
use crate::{Error, Result, SecretMap, SecretProvider};

/// `GetParameters` accepts at most this many names per call.
const MAX_NAMES_PER_CALL: usize = 10;

/// Fetches parameters (decrypting `SecureString` values) from SSM.
///
/// Names the service reports as invalid are treated as missing.
#[derive(Clone, Debug)]
pub struct SsmSecretProvider {
    client: Client,
}

impl SsmSecretProvider {
    /// Wrap an existing SSM client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretProvider for SsmSecretProvider {
    fn name(&self) -> &str {
        "aws-ssm"
    }

    async fn fetch(&self, names: &[String]) -> Result<SecretMap> {
        fetch_batched(names, MAX_NAMES_PER_CALL, |chunk| async move {
            let output = self
                .client
                .get_parameters()
                .set_names(Some(chunk))
                .with_decryption(true)
                .send()
                .await
                .map_err(|e| Error::provider_with_source("GetParameters failed", e))?;

            Ok(Batch {
                found: output
                    .parameters()
                    .iter()
                    .filter_map(|p| Some((p.name()?.to_string(), p.value()?.to_string())))
                    .collect(),
                invalid: output.invalid_parameters().to_vec(),
            })
        })
        .await
    }
}
